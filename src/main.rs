use clap::{Parser as ClapParser, Subcommand};
use soql_lang::cli::{
    self, CliError, ComposeOptions, FormatCommandOptions, ParseOptions,
};
use std::io::{self, Read};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(ClapParser)]
#[command(name = "soql")]
#[command(about = "soql - Compose, format and parse Salesforce SOQL queries")]
#[command(version)]
struct Cli {
    /// Log composed clauses to stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat a SOQL query over several lines
    Format {
        /// The SOQL query to format
        query: String,

        /// Tabs per indentation level
        #[arg(long)]
        indent: Option<usize>,

        /// Field list width before wrapping
        #[arg(long)]
        max_line_length: Option<usize>,

        /// Indent AND/OR lines of the WHERE clause
        #[arg(long)]
        indent_where_operators: bool,
    },

    /// Compose SOQL from query JSON
    Compose {
        /// Query JSON (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Format the composed query
        #[arg(short, long)]
        format: bool,
    },

    /// Parse a SOQL query into query JSON
    Parse {
        /// The SOQL query to parse
        query: String,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if cli.log {
        init_logging();
    }

    let result = match cli.command {
        Commands::Format {
            query,
            indent,
            max_line_length,
            indent_where_operators,
        } => cli::execute_format(&FormatCommandOptions {
            query,
            indent,
            max_line_length,
            indent_where_operators,
        }),
        Commands::Compose { input, format } => run_compose(input, format, cli.log),
        Commands::Parse { query, pretty } => cli::execute_parse(&ParseOptions { query, pretty }),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("soql=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run_compose(input: Option<String>, format: bool, logging: bool) -> Result<String, CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    cli::execute_compose(&ComposeOptions {
        input,
        format,
        logging,
    })
}

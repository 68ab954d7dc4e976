/// Declares a closed set of SOQL keywords.
///
/// Each variant maps to exactly one spelling, which is used for the JSON
/// form, for `Display` and for case-insensitive keyword lookup in the parser.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Case-insensitive lookup of a keyword spelling.
            pub fn from_keyword(word: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|kw| kw.as_str().eq_ignore_ascii_case(word))
            }
        }

        // Keywords read from JSON are matched like keywords in query text
        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let word = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                Self::from_keyword(&word).ok_or_else(|| {
                    <D::Error as ::serde::de::Error>::unknown_variant(&word, &[$($text),+])
                })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use keyword_enum;

keyword_enum! {
    /// Comparison operator of a filter condition.
    Operator {
        /// Equal (`=`)
        Equal => "=",
        /// Not equal (`!=`)
        NotEqual => "!=",
        /// Not equal, alternate spelling (`<>`)
        LessGreater => "<>",
        /// Less than (`<`)
        LessThan => "<",
        /// Less than or equal (`<=`)
        LessEqual => "<=",
        /// Greater than (`>`)
        GreaterThan => ">",
        /// Greater than or equal (`>=`)
        GreaterEqual => ">=",
        /// Pattern match (`LIKE`)
        Like => "LIKE",
        /// Set membership (`IN`)
        In => "IN",
        /// Negated set membership (`NOT IN`)
        NotIn => "NOT IN",
        /// Multi-select picklist contains any (`INCLUDES`)
        Includes => "INCLUDES",
        /// Multi-select picklist contains none (`EXCLUDES`)
        Excludes => "EXCLUDES",
    }
}

keyword_enum! {
    /// Operator joining two filter nodes.
    ///
    /// `NOT` only appears on a node without a left condition, negating the
    /// group that follows it.
    LogicalOperator {
        And => "AND",
        Or => "OR",
        Not => "NOT",
    }
}

keyword_enum! {
    /// Prefix negating a single condition (`NOT Name = 'x'`).
    LogicalPrefix {
        Not => "NOT",
    }
}

keyword_enum! {
    /// Sort direction.
    Order {
        Asc => "ASC",
        Desc => "DESC",
    }
}

keyword_enum! {
    /// Placement of null values in a sort.
    Nulls {
        First => "FIRST",
        Last => "LAST",
    }
}

keyword_enum! {
    DataCategorySelector {
        At => "AT",
        Above => "ABOVE",
        Below => "BELOW",
        AboveOrBelow => "ABOVE_OR_BELOW",
    }
}

keyword_enum! {
    /// Token of the `FOR` clause.
    ForClause {
        View => "VIEW",
        Update => "UPDATE",
        Reference => "REFERENCE",
    }
}

keyword_enum! {
    /// Token of the `UPDATE` clause.
    UpdateClause {
        Tracking => "TRACKING",
        Viewstat => "VIEWSTAT",
    }
}

keyword_enum! {
    /// Branch kind of a `TYPEOF` expression.
    TypeOfBranch {
        When => "WHEN",
        Else => "ELSE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(Operator::from_keyword("like"), Some(Operator::Like));
        assert_eq!(Operator::from_keyword("Not In"), Some(Operator::NotIn));
        assert_eq!(Order::from_keyword("desc"), Some(Order::Desc));
        assert_eq!(
            DataCategorySelector::from_keyword("above_or_below"),
            Some(DataCategorySelector::AboveOrBelow)
        );
        assert_eq!(ForClause::from_keyword("NOPE"), None);
    }

    #[test]
    fn json_form_uses_keyword_spelling() {
        assert_eq!(serde_json::to_string(&Operator::NotIn).unwrap(), "\"NOT IN\"");
        let op: Operator = serde_json::from_str("\"<=\"").unwrap();
        assert_eq!(op, Operator::LessEqual);
        let op: Operator = serde_json::from_str("\"not in\"").unwrap();
        assert_eq!(op, Operator::NotIn);
        assert!(serde_json::from_str::<Order>("\"SIDEWAYS\"").is_err());
        assert_eq!(LogicalOperator::Or.to_string(), "OR");
    }
}

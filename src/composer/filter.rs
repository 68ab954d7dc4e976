use crate::ast::{Condition, HavingClause, HavingCondition, LogicalOperator, WhereClause};
use crate::value::render_where_value;

use super::Composer;

/// Node of a `WHERE` or `HAVING` chain.
trait FilterNode {
    fn compose_left(&self, composer: &Composer<'_>) -> String;
    fn operator(&self) -> Option<LogicalOperator>;
    fn right(&self) -> Option<&Self>;
}

impl FilterNode for WhereClause {
    fn compose_left(&self, composer: &Composer<'_>) -> String {
        self.left
            .as_ref()
            .map(|condition| composer.compose_condition(condition))
            .unwrap_or_default()
    }

    fn operator(&self) -> Option<LogicalOperator> {
        self.operator
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl FilterNode for HavingClause {
    fn compose_left(&self, composer: &Composer<'_>) -> String {
        self.left
            .as_ref()
            .map(|condition| composer.compose_having_condition(condition))
            .unwrap_or_default()
    }

    fn operator(&self) -> Option<LogicalOperator> {
        self.operator
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

fn repeat_paren(paren: char, count: u32) -> String {
    std::iter::repeat_n(paren, count as usize).collect()
}

impl Composer<'_> {
    /// # Example
    /// ```text
    /// Id IN (SELECT AccountId FROM Contact) AND (Amount > 100 OR IsWon = true)
    /// ```
    pub fn compose_where(&self, where_clause: &WhereClause) -> String {
        self.compose_filter(where_clause)
    }

    /// # Example
    /// ```text
    /// COUNT(Id) > 1 AND LeadSource = 'Phone'
    /// ```
    pub fn compose_having(&self, having: &HavingClause) -> String {
        self.compose_filter(having)
    }

    /// Walks the chain front to back, then joins it back to front: each node
    /// becomes `left + format_where_operator(op, rest)`, trimmed.
    fn compose_filter<N: FilterNode>(&self, root: &N) -> String {
        let mut links: Vec<(String, Option<LogicalOperator>)> = Vec::new();
        let mut node = Some(root);
        while let Some(current) = node {
            links.push((current.compose_left(self), current.operator()));
            node = current.right();
        }

        let mut links = links.into_iter().rev();
        let mut output = match links.next() {
            Some((last, _)) => last.trim().to_string(),
            None => return String::new(),
        };
        for (left, operator) in links {
            let operator = operator.map(LogicalOperator::as_str).unwrap_or_default();
            let joined = self.formatter.format_where_operator(operator, &output);
            output = format!("{}{}", left, joined).trim().to_string();
        }
        output
    }

    fn compose_condition(&self, condition: &Condition) -> String {
        let mut output = repeat_paren('(', condition.open_paren);
        if let Some(prefix) = condition.logical_prefix {
            output.push_str(prefix.as_str());
            output.push(' ');
        }
        match &condition.function {
            Some(function) => output.push_str(&self.compose_function_exp(function)),
            None => output.push_str(condition.field.as_deref().unwrap_or_default()),
        }
        output.push_str(&format!(" {} ", condition.operator));

        if let Some(value_query) = &condition.value_query {
            let composed = self.compose_query(value_query);
            output.push_str(&self.formatter.format_subquery(&composed, 1, true));
        } else if let Some(value) = &condition.value {
            output.push_str(&render_where_value(value, condition.literal_type.as_ref()));
        }

        output.push_str(&repeat_paren(')', condition.close_paren));
        output
    }

    /// Same layout as a `WHERE` condition, but the value is never quoted or
    /// otherwise interpreted.
    fn compose_having_condition(&self, condition: &HavingCondition) -> String {
        let mut output = repeat_paren('(', condition.open_paren);
        match &condition.function {
            Some(function) => output.push_str(&self.compose_function_exp(function)),
            None => output.push_str(condition.field.as_deref().unwrap_or_default()),
        }
        output.push_str(&format!(" {} {}", condition.operator, condition.value));
        output.push_str(&repeat_paren(')', condition.close_paren));
        output
    }
}

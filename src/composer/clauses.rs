use crate::ast::{
    FunctionExp, GroupByClause, OrderByClause, OrderByClauses, WithDataCategoryClause,
};

use super::Composer;

impl Composer<'_> {
    /// Function used as a filter subject or sort key: the raw text plus the
    /// alias, or `name(params)` when there is no raw text.
    pub(super) fn compose_function_exp(&self, function: &FunctionExp) -> String {
        let text = match (&function.raw_value, &function.function_name) {
            (Some(raw), _) => raw.clone(),
            (None, Some(name)) => format!("{}({})", name, function.parameters.join(", ")),
            (None, None) => String::new(),
        };
        match &function.alias {
            Some(alias) => format!("{} {}", text, alias).trim().to_string(),
            None => text,
        }
    }

    /// # Examples
    /// ```text
    /// LeadSource, Rating
    /// CUBE(Type, BillingCountry)
    /// ```
    pub fn compose_group_by(&self, group_by: &GroupByClause) -> String {
        if let Some(function) = &group_by.function {
            return match &function.function_name {
                Some(name) => format!("{}({})", name, function.parameters.join(", ")),
                None => self.compose_function_exp(function),
            };
        }
        group_by
            .field
            .as_ref()
            .map(|fields| fields.names().join(", "))
            .unwrap_or_default()
    }

    pub fn compose_order_by(&self, order_by: &OrderByClauses) -> String {
        match order_by {
            OrderByClauses::Single(clause) => self.compose_order_by_clause(clause),
            OrderByClauses::Multiple(clauses) => {
                let composed: Vec<String> = clauses
                    .iter()
                    .map(|clause| self.compose_order_by_clause(clause))
                    .collect();
                self.formatter.format_order_by_sequence(&composed)
            }
        }
    }

    /// `subject [ASC|DESC] [NULLS FIRST|LAST]`, leaving out absent parts.
    fn compose_order_by_clause(&self, clause: &OrderByClause) -> String {
        let subject = match (&clause.field, &clause.function) {
            (Some(field), _) => field.clone(),
            (None, Some(function)) => self.compose_function_exp(function),
            (None, None) => String::new(),
        };

        let mut parts = vec![subject];
        if let Some(order) = clause.order {
            parts.push(order.to_string());
        }
        if let Some(nulls) = clause.nulls {
            parts.push(format!("NULLS {}", nulls));
        }
        parts.retain(|part| !part.is_empty());
        parts.join(" ")
    }

    /// # Example
    /// ```text
    /// Geography__c AT (usa__c, uk__c) AND Product__c BELOW all__c
    /// ```
    pub fn compose_with_data_category(&self, data_category: &WithDataCategoryClause) -> String {
        data_category
            .conditions
            .iter()
            .map(|condition| {
                let params = if condition.parameters.len() > 1 {
                    format!("({})", condition.parameters.join(", "))
                } else {
                    condition.parameters.join(", ")
                };
                format!("{} {} {}", condition.group_name, condition.selector, params)
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

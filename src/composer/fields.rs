use crate::ast::{FieldFunctionExpression, FieldType, FieldTypeOf, FunctionParameter};

use super::Composer;

fn with_prefix(object_prefix: Option<&String>, path: String) -> String {
    match object_prefix {
        Some(prefix) => format!("{}.{}", prefix, path),
        None => path,
    }
}

fn with_alias(text: String, alias: Option<&String>) -> String {
    match alias {
        Some(alias) => format!("{} {}", text, alias),
        None => text,
    }
}

impl Composer<'_> {
    /// Composes a field list, one text per field, in input order.
    pub fn compose_fields(&self, fields: &[FieldType]) -> Vec<String> {
        fields.iter().map(|field| self.compose_field(field)).collect()
    }

    fn compose_field(&self, field: &FieldType) -> String {
        match field {
            FieldType::Field(field) => with_alias(
                with_prefix(field.object_prefix.as_ref(), field.field.clone()),
                field.alias.as_ref(),
            ),
            FieldType::FunctionExpression(function) => self.compose_function(function),
            FieldType::Relationship(relationship) => {
                let path = relationship
                    .relationships
                    .iter()
                    .chain(std::iter::once(&relationship.field))
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(".");
                with_alias(
                    with_prefix(relationship.object_prefix.as_ref(), path),
                    relationship.alias.as_ref(),
                )
            }
            FieldType::Subquery(subquery) => {
                let composed = self.compose_query(&subquery.subquery);
                self.formatter.format_subquery(&composed, 2, false)
            }
            FieldType::TypeOf(type_of) => self.compose_type_of(type_of),
        }
    }

    /// `name(p1,p2)[ alias]`; parameters are joined without spaces.
    fn compose_function(&self, function: &FieldFunctionExpression) -> String {
        let params: Vec<String> = function
            .parameters
            .iter()
            .map(|param| match param {
                FunctionParameter::Literal(text) => text.clone(),
                FunctionParameter::Field(nested) => self.compose_field(nested),
            })
            .collect();
        with_alias(
            format!("{}({})", function.function_name, params.join(",")),
            function.alias.as_ref(),
        )
    }

    /// # Example
    /// ```text
    /// TYPEOF What WHEN Account THEN Phone, NumberOfEmployees ELSE Name END
    /// ```
    pub fn compose_type_of(&self, type_of: &FieldTypeOf) -> String {
        let branches: Vec<String> = type_of
            .conditions
            .iter()
            .map(|condition| {
                let fields = condition.field_list.join(", ");
                match &condition.object_type {
                    Some(object_type) => {
                        format!("{} {} THEN {}", condition.kind, object_type, fields)
                    }
                    None => format!("{} {}", condition.kind, fields),
                }
            })
            .collect();
        format!("TYPEOF {} {} END", type_of.field, branches.join(" "))
    }
}

use super::Predicate;
use crate::errors::{MoreDataError, Result};
use crate::model::{EntitySchema, FieldDef, FieldType, Value};

impl Predicate {
    /// Check every leaf against the entity's declared fields
    ///
    /// # Errors
    ///
    /// - `UnknownField` if a leaf names a field the schema does not declare
    /// - `TypeMismatch` if an operator or operand does not fit the field type
    pub fn validate(&self, schema: &EntitySchema) -> Result<()> {
        match self {
            Predicate::True | Predicate::False => Ok(()),
            Predicate::Compare { field, op, value } => {
                let def = lookup(schema, field)?;
                if op.requires_order() && !def.field_type.is_ordered() {
                    return Err(mismatch(schema, def, op.symbol()));
                }
                check_operand(schema, def, value, op.symbol())
            }
            Predicate::Text { field, op, .. } => {
                let def = lookup(schema, field)?;
                if !def.field_type.is_textual() {
                    return Err(mismatch(schema, def, op.keyword()));
                }
                Ok(())
            }
            Predicate::Between {
                field,
                lower,
                upper,
            } => {
                let def = lookup(schema, field)?;
                if !def.field_type.is_ordered() {
                    return Err(mismatch(schema, def, "BETWEEN"));
                }
                check_operand(schema, def, lower, "BETWEEN")?;
                check_operand(schema, def, upper, "BETWEEN")
            }
            Predicate::In { field, values } => {
                let def = lookup(schema, field)?;
                for value in values {
                    check_operand(schema, def, value, "IN")?;
                }
                Ok(())
            }
            Predicate::ContainsElement { field, element } => {
                let def = lookup(schema, field)?;
                if def.field_type != FieldType::Set || element.field_type() == Some(FieldType::Set)
                {
                    return Err(mismatch(schema, def, "CONTAINS"));
                }
                Ok(())
            }
            Predicate::IsNil { field } | Predicate::IsNotNil { field } => {
                lookup(schema, field).map(|_| ())
            }
            Predicate::And { predicates } | Predicate::Or { predicates } => {
                predicates.iter().try_for_each(|p| p.validate(schema))
            }
            Predicate::Not { predicate } => predicate.validate(schema),
        }
    }
}

fn lookup<'a>(schema: &'a EntitySchema, field: &str) -> Result<&'a FieldDef> {
    schema.get(field).ok_or_else(|| MoreDataError::UnknownField {
        entity: schema.entity.clone(),
        field: field.to_string(),
    })
}

fn mismatch(schema: &EntitySchema, def: &FieldDef, operator: &str) -> MoreDataError {
    MoreDataError::TypeMismatch {
        entity: schema.entity.clone(),
        field: def.name.clone(),
        operator: operator.to_string(),
        field_type: def.field_type.to_string(),
    }
}

// Null operands pass; evaluation treats them per the null rules.
fn check_operand(
    schema: &EntitySchema,
    def: &FieldDef,
    value: &Value,
    operator: &str,
) -> Result<()> {
    match value.field_type() {
        None => Ok(()),
        Some(actual) if actual == def.field_type => Ok(()),
        Some(_) => Err(mismatch(schema, def, operator)),
    }
}

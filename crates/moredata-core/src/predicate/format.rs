use std::fmt;

use super::Predicate;

/// Renders the predicate in Foundation predicate-format syntax
///
/// e.g. `name CONTAINS[c] "John" AND age >= 18`. Nested compound children
/// are parenthesised.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::True => f.write_str("TRUEPREDICATE"),
            Predicate::False => f.write_str("FALSEPREDICATE"),
            Predicate::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.symbol(), value)
            }
            Predicate::Text {
                field,
                op,
                text,
                case_insensitive,
            } => {
                let modifier = if *case_insensitive { "[c]" } else { "" };
                let quoted = crate::model::Value::Text(text.clone());
                write!(f, "{} {}{} {}", field, op.keyword(), modifier, quoted)
            }
            Predicate::Between {
                field,
                lower,
                upper,
            } => write!(f, "{} BETWEEN {{{}, {}}}", field, lower, upper),
            Predicate::In { field, values } => {
                write!(f, "{} IN {{", field)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("}")
            }
            Predicate::ContainsElement { field, element } => {
                write!(f, "{} CONTAINS {}", field, element)
            }
            Predicate::IsNil { field } => write!(f, "{} == nil", field),
            Predicate::IsNotNil { field } => write!(f, "{} != nil", field),
            Predicate::And { predicates } => join(f, predicates, " AND "),
            Predicate::Or { predicates } => join(f, predicates, " OR "),
            Predicate::Not { predicate } => {
                f.write_str("NOT ")?;
                operand(f, predicate)
            }
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], separator: &str) -> fmt::Result {
    for (i, p) in predicates.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        operand(f, p)?;
    }
    Ok(())
}

fn operand(f: &mut fmt::Formatter<'_>, p: &Predicate) -> fmt::Result {
    match p {
        Predicate::And { .. } | Predicate::Or { .. } => write!(f, "({})", p),
        _ => write!(f, "{}", p),
    }
}

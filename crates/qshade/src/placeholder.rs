use std::collections::HashMap;

use crate::{consts::DataTable, render_literal, LiteralError, LiteralType};

/// Literal types of the `$name$` placeholders, by name.
pub type PlaceholderTable = HashMap<String, LiteralType>;

/// Replace every `$name$` in `source` by the literal rendering of `data[name]`, for each
/// name of `consts` that has a value in `data`.
///
/// ```rust
/// # use qshade::{substitute_placeholders, ConstValue, LiteralType};
/// let data = [("count".to_string(), ConstValue::Scalar(8.0))].into();
/// let consts = [("count".to_string(), LiteralType::Int)].into();
/// let source = "for (int i = 0; i < $count$; i++) {}";
/// let text = substitute_placeholders(source, &data, &consts).unwrap();
/// assert_eq!(text, "for (int i = 0; i < 8; i++) {}");
/// ```
pub fn substitute_placeholders(
    source: &str,
    data: &DataTable,
    consts: &PlaceholderTable,
) -> Result<String, LiteralError> {
    let mut text = source.to_string();
    for (name, ty) in consts {
        let Some(value) = data.get(name) else {
            continue;
        };
        let placeholder = format!("${name}$");
        if text.contains(&placeholder) {
            let literal = render_literal(value, *ty)?;
            log::debug!("placeholder `{placeholder}` replaced by `{literal}`");
            text = text.replace(&placeholder, &literal);
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConstValue;

    #[test]
    fn every_occurrence() {
        let data = DataTable::from([
            ("n".to_string(), ConstValue::Scalar(3.0)),
            ("tint".to_string(), ConstValue::Vector(vec![1.0, 0.5, 0.0])),
        ]);
        let consts = PlaceholderTable::from([
            ("n".to_string(), LiteralType::Float),
            ("tint".to_string(), LiteralType::Vec(3)),
        ]);
        let text = substitute_placeholders("x = $n$ * $n$ + $tint$.x;", &data, &consts).unwrap();
        assert_eq!(text, "x = 3.0 * 3.0 + vec3(1, 0.5, 0).x;");
    }

    #[test]
    fn missing_entries_are_left_alone() {
        let data = DataTable::from([("a".to_string(), ConstValue::Scalar(1.0))]);
        let consts = PlaceholderTable::from([("b".to_string(), LiteralType::Int)]);
        let text = substitute_placeholders("$a$ $b$", &data, &consts).unwrap();
        assert_eq!(text, "$a$ $b$");
    }

    #[test]
    fn literal_errors() {
        let data = DataTable::from([("a".to_string(), ConstValue::Scalar(1.0))]);
        let consts = PlaceholderTable::from([("a".to_string(), LiteralType::Vec(2))]);
        assert_eq!(
            substitute_placeholders("$a$", &data, &consts),
            Err(LiteralError::ExpectedVector(LiteralType::Vec(2)))
        );
    }
}

use std::collections::HashMap;

use glsl_parse::{
    syntax::{Chunk, Node, NodeKind, Qualifier, VariableDecl},
    Walker,
};

use crate::{render_literal, ConstValue, LiteralError, LiteralType};

/// Host values by name.
pub type DataTable = HashMap<String, ConstValue>;

/// Fill a `const` declaration without initializer with the value of the same name in
/// `data`. Returns whether the declaration was changed.
pub fn substitute_const(decl: &mut VariableDecl, data: &DataTable) -> Result<bool, LiteralError> {
    if !decl.has_qualifier(Qualifier::Const) || decl.value.is_some() {
        return Ok(false);
    }
    let Some(value) = data.get(&decl.name) else {
        return Ok(false);
    };
    let ty = decl.ty.parse::<LiteralType>()?;
    let text = render_literal(value, ty)?;
    log::debug!("const `{}` set to `{text}`", decl.name);
    decl.value = Some(Box::new(Chunk::from(text).into()));
    Ok(true)
}

/// Run [`substitute_const`] on every declaration of `nodes`. On error, the name of the
/// offending declaration is returned with it.
pub fn substitute_consts(
    nodes: Vec<Node>,
    data: &DataTable,
) -> Result<Vec<Node>, (String, LiteralError)> {
    let mut failure = None;
    let nodes = Walker::new()
        .on(NodeKind::VariableDecl, |node| {
            if let Node::VariableDecl(decl) = node {
                if let Err(err) = substitute_const(decl, data) {
                    failure.get_or_insert((decl.name.clone(), err));
                }
            }
            None
        })
        .walk(nodes);
    match failure {
        Some(failure) => Err(failure),
        None => Ok(nodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glsl_parse::{compile, reconstruct};

    fn table(entries: &[(&str, ConstValue)]) -> DataTable {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn run(source: &str, data: &DataTable) -> Result<String, (String, LiteralError)> {
        let nodes = substitute_consts(compile(source).unwrap(), data)?;
        Ok(reconstruct(&nodes))
    }

    #[test]
    fn scalar() {
        let data = table(&[("x", ConstValue::Scalar(3.0))]);
        let text = run("const float x;", &data).unwrap();
        assert!(text.contains("x = 3.0"));
        assert_eq!(text, "const float x = 3.0;");
    }

    #[test]
    fn vector() {
        let data = table(&[("colour", ConstValue::Vector(vec![1.0, 0.0, 0.5]))]);
        assert_eq!(
            run("const vec3 colour;", &data).unwrap(),
            "const vec3 colour = vec3(1, 0, 0.5);"
        );
    }

    #[test]
    fn only_uninitialized_consts() {
        let data = table(&[
            ("x", ConstValue::Scalar(3.0)),
            ("y", ConstValue::Scalar(4.0)),
            ("z", ConstValue::Scalar(5.0)),
        ]);
        let source = "const float x = 1.0;\nuniform float y;\nconst int w;\nconst int z;";
        assert_eq!(
            run(source, &data).unwrap(),
            "const float x = 1.0;\nuniform float y;\nconst int w;\nconst int z = 5;"
        );
    }

    #[test]
    fn bad_values_name_the_declaration() {
        let data = table(&[("n", ConstValue::Vector(vec![1.0, 2.0]))]);
        let (name, err) = run("const int n;", &data).unwrap_err();
        assert_eq!(name, "n");
        assert_eq!(err, LiteralError::ExpectedScalar(LiteralType::Int, 2));

        let data = table(&[("tex", ConstValue::Scalar(1.0))]);
        let (name, err) = run("const sampler2D tex;", &data).unwrap_err();
        assert_eq!(name, "tex");
        assert!(matches!(err, LiteralError::UnsupportedType(_)));
    }
}

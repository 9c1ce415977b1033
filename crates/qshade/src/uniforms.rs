//! Discovery of `uniform` declarations.

use std::collections::HashMap;

use glsl_parse::{
    syntax::{Node, NodeKind, Qualifier, VariableDecl},
    Walker,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the host finds a uniform in the shader.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniformBinding {
    /// The name declared in the shader source, e.g. `uSampleRadius`.
    pub source_name: String,
    /// The declared type name, e.g. `float`.
    pub ty: String,
}

/// Uniforms by host-side key.
pub type UniformTable = HashMap<String, UniformBinding>;

/// The host-side key of a uniform: a leading `u` marker is dropped when it is followed by
/// an uppercase letter, which is lowercased.
///
/// Names such as `u_time` or `u1` keep their `u`, unlike a check that only asks whether
/// the second character is unchanged by uppercasing.
///
/// ```rust
/// # use qshade::uniform_key;
/// assert_eq!(uniform_key("uSampleRadius"), "sampleRadius");
/// assert_eq!(uniform_key("uv"), "uv");
/// assert_eq!(uniform_key("u_time"), "u_time");
/// assert_eq!(uniform_key("time"), "time");
/// ```
pub fn uniform_key(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some('u'), Some(c)) if c.is_uppercase() => c.to_lowercase().chain(chars).collect(),
        _ => name.to_string(),
    }
}

/// Add `decl` to `table` if it is a uniform declaration. Returns the key.
pub fn register_uniform(decl: &VariableDecl, table: &mut UniformTable) -> Option<String> {
    if !decl.has_qualifier(Qualifier::Uniform) {
        return None;
    }
    let key = uniform_key(&decl.name);
    log::debug!("uniform `{}` registered as `{key}`", decl.name);
    let binding = UniformBinding {
        source_name: decl.name.clone(),
        ty: decl.ty.clone(),
    };
    table.insert(key.clone(), binding);
    Some(key)
}

/// Register every uniform declaration of `nodes`. The nodes are returned unchanged.
pub fn register_uniforms(nodes: Vec<Node>, table: &mut UniformTable) -> Vec<Node> {
    Walker::new()
        .on(NodeKind::VariableDecl, |node| {
            if let Node::VariableDecl(decl) = node {
                register_uniform(decl, table);
            }
            None
        })
        .walk(nodes)
}

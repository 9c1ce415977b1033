//! Shader source processing on top of [`glsl_parse`].
//!
//! A [`ShaderProcessor`] takes GLSL fragment or vertex source and:
//! * replaces `$name$` placeholders with literals rendered from host values,
//! * records every `uniform` declaration under a host-side key (see [`uniform_key`]),
//! * gives `const` declarations without initializer the host value of the same name.
//!
//! ```rust
//! # use qshade::{ConstValue, ShaderProcessor};
//! let mut processor = ShaderProcessor::default();
//! processor.data.insert("radius".to_string(), ConstValue::Scalar(2.0));
//! let output = processor.process("uniform float uTime;\nconst float radius;");
//! assert_eq!(output, "uniform float uTime;\nconst float radius = 2.0;");
//! assert_eq!(processor.uniforms["time"].source_name, "uTime");
//! ```

mod consts;
mod error;
mod literal;
mod placeholder;
mod uniforms;

pub use consts::{substitute_const, substitute_consts, DataTable};
pub use error::{Diagnostic, Error};
pub use literal::{render_literal, ConstValue, LiteralError, LiteralType};
pub use placeholder::{substitute_placeholders, PlaceholderTable};
pub use uniforms::{register_uniform, register_uniforms, uniform_key, UniformBinding, UniformTable};

pub use glsl_parse;

use glsl_parse::{
    syntax::{Node, NodeKind},
    Walker,
};

/// Host-side state of the shader processing.
pub struct ShaderProcessor {
    /// When false, only placeholders are substituted.
    pub enable_processing: bool,
    /// Values for placeholders and uninitialized `const` declarations.
    pub data: DataTable,
    /// Literal types of the `$name$` placeholders.
    pub consts: PlaceholderTable,
    /// Filled with the uniforms of every successfully processed source.
    pub uniforms: UniformTable,
}

impl Default for ShaderProcessor {
    fn default() -> Self {
        Self {
            enable_processing: true,
            data: Default::default(),
            consts: Default::default(),
            uniforms: Default::default(),
        }
    }
}

impl ShaderProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process `source`: placeholders, then uniform registration and const substitution.
    ///
    /// The uniform table is left untouched when an error is returned.
    pub fn try_process(&mut self, source: &str) -> Result<String, Error> {
        let text = substitute_placeholders(source, &self.data, &self.consts)?;
        if !self.enable_processing {
            return Ok(text);
        }

        let nodes = glsl_parse::compile(&text)
            .map_err(|e| Diagnostic::from(e).with_source(text.clone()))?;

        let data = &self.data;
        let mut uniforms = UniformTable::new();
        let mut failure = None;
        let nodes = Walker::new()
            .on(NodeKind::VariableDecl, |node| {
                if let Node::VariableDecl(decl) = node {
                    register_uniform(decl, &mut uniforms);
                    if let Err(e) = substitute_const(decl, data) {
                        failure.get_or_insert_with(|| {
                            Diagnostic::from(e).with_declaration(decl.name.clone())
                        });
                    }
                }
                None
            })
            .walk(nodes);

        if let Some(diagnostic) = failure {
            return Err(diagnostic.into());
        }

        self.uniforms.extend(uniforms);
        Ok(glsl_parse::reconstruct(&nodes))
    }

    /// Like [`Self::try_process`], but errors are logged and the source is returned
    /// with only its placeholders substituted, or unmodified if that failed too.
    pub fn process(&mut self, source: &str) -> String {
        match self.try_process(source) {
            Ok(text) => text,
            Err(e) => {
                log::error!("shader processing failed, using the source as is\n{e}");
                substitute_placeholders(source, &self.data, &self.consts)
                    .unwrap_or_else(|_| source.to_string())
            }
        }
    }
}

use std::{fmt::Display, path::PathBuf};

use glsl_parse::span::Span;

use crate::LiteralError;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    ParseError(#[from] glsl_parse::Error),
    #[error("{0}")]
    LiteralError(#[from] LiteralError),
    #[error("{0}")]
    Error(#[from] Diagnostic<Error>),
}

/// An error with the context needed to point at its location.
#[derive(Clone, Debug)]
pub struct Diagnostic<E: std::error::Error> {
    pub error: Box<E>,
    pub source: Option<String>,
    pub file: Option<PathBuf>,
    pub declaration: Option<String>,
    pub span: Option<Span>,
}

impl From<glsl_parse::Error> for Diagnostic<Error> {
    fn from(error: glsl_parse::Error) -> Self {
        let mut res = Self::new(Error::ParseError(error.clone()));
        res.span = Some(error.span());
        res
    }
}

impl From<LiteralError> for Diagnostic<Error> {
    fn from(error: LiteralError) -> Self {
        Self::new(error.into())
    }
}

impl From<Error> for Diagnostic<Error> {
    fn from(error: Error) -> Self {
        match error {
            Error::ParseError(e) => e.into(),
            Error::LiteralError(e) => e.into(),
            Error::Error(e) => e,
        }
    }
}

impl<E: std::error::Error> Diagnostic<E> {
    pub fn new(error: E) -> Diagnostic<E> {
        Self {
            error: Box::new(error),
            source: None,
            file: None,
            declaration: None,
            span: None,
        }
    }
    pub fn with_source(mut self, source: String) -> Self {
        self.source = Some(source);
        self
    }
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
    pub fn with_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = Some(declaration.into());
        self
    }
}

impl<E: std::error::Error> std::error::Error for Diagnostic<E> {}

impl<E: std::error::Error> Display for Diagnostic<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use annotate_snippets::*;
        let title = format!("{}", self.error);
        let mut msg = Level::Error.title(&title);

        let orig = self.file.as_ref().map(|file| file.display().to_string());

        if let Some(span) = &self.span {
            let source = self.source.as_deref();

            if let Some(source) = source {
                if span.range().end <= source.len() {
                    let annot = Level::Error.span(span.range()).label(&title);
                    let mut snip = Snippet::source(source).fold(true).annotation(annot);

                    if let Some(file) = orig.as_ref() {
                        snip = snip.origin(file);
                    }

                    msg = msg.snippet(snip);
                } else {
                    msg = msg.footer(
                        Level::Note.title("cannot display snippet: invalid source location"),
                    )
                }
            } else {
                msg = msg.footer(Level::Note.title("cannot display snippet: missing source file"))
            }
        }

        let note;
        if let Some(decl) = &self.declaration {
            if let Some(file) = orig.as_ref() {
                note = format!("in declaration of `{decl}` in `{file}`");
            } else {
                note = format!("in declaration of `{decl}`");
            }
            msg = msg.footer(Level::Note.title(&note));
        }

        let renderer = Renderer::plain();
        let rendered = renderer.render(msg);
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_point_at_the_remainder() {
        let source = "void main() {\n    x = ;\n}";
        let err = glsl_parse::compile(source).unwrap_err();
        let diagnostic = Diagnostic::from(err)
            .with_source(source.to_string())
            .with_file("shader.frag");
        assert_eq!(diagnostic.span.as_ref().map(Span::range), Some(18..25));
        let text = diagnostic.to_string();
        assert!(text.contains("failed to process tokens: `x = ; }`"));
        assert!(text.contains("shader.frag"));
    }

    #[test]
    fn declaration_note() {
        let diagnostic = Diagnostic::from(LiteralError::UnsupportedType("sampler2D".to_string()))
            .with_declaration("tex");
        let text = diagnostic.to_string();
        assert!(text.contains("type `sampler2D` has no literal form"));
        assert!(text.contains("in declaration of `tex`"));
    }

    #[test]
    fn nested_diagnostics_unwrap() {
        let inner = Diagnostic::from(LiteralError::InvalidValue("x".to_string())).with_declaration("a");
        let outer = Diagnostic::from(Error::Error(inner));
        assert_eq!(outer.declaration.as_deref(), Some("a"));
    }
}

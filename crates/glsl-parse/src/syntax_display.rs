use crate::syntax::*;
use core::fmt;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

// unstable: https://doc.rust-lang.org/std/fmt/struct.FormatterFn.html
struct FormatFn<F: (Fn(&mut Formatter) -> fmt::Result)>(F);

impl<F: Fn(&mut Formatter) -> fmt::Result> Display for FormatFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        (self.0)(f)
    }
}

struct Indent<T: Display>(pub T);

impl<T: Display> Display for Indent<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let indent = "    ";
        let inner_display = self.0.to_string();
        let fmt = inner_display
            .lines()
            .format_with("\n", |l, f| f(&format_args!("{indent}{l}")));
        write!(f, "{}", fmt)?;
        Ok(())
    }
}

/// A statement without its trailing `;`, as written in `for` clauses.
struct Simple<T>(T);

/// Serialize a program back to source text, one top-level node per line.
///
/// ```rust
/// let nodes = glsl_parse::compile("uniform float uTime; void main() { gl_FragColor = vec4(uTime); }").unwrap();
/// assert_eq!(
///     glsl_parse::reconstruct(&nodes),
///     "uniform float uTime;\nvoid main() {\n    gl_FragColor = vec4(uTime);\n}"
/// );
/// ```
pub fn reconstruct(nodes: &[Node]) -> String {
    nodes.iter().format("\n").to_string()
}

fn fmt_body(body: &[Node]) -> impl fmt::Display + '_ {
    FormatFn(move |f| {
        if body.is_empty() {
            write!(f, "{{}}")
        } else {
            let stmts = Indent(body.iter().format("\n"));
            write!(f, "{{\n{stmts}\n}}")
        }
    })
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Precision(print) => write!(f, "{print}"),
            Node::VariableDecl(print) => write!(f, "{print}"),
            Node::VariableAssign(print) => write!(f, "{print}"),
            Node::PropertyAssign(print) => write!(f, "{print}"),
            Node::ExpressionStatement(print) => write!(f, "{print}"),
            Node::EmptyStatement(print) => write!(f, "{print}"),
            Node::FunctionDecl(print) => write!(f, "{print}"),
            Node::If(print) => write!(f, "{print}"),
            Node::For(print) => write!(f, "{print}"),
            Node::Return(print) => write!(f, "{print}"),
            Node::Break(print) => write!(f, "{print}"),
            Node::Float(print) => write!(f, "{print}"),
            Node::Int(print) => write!(f, "{print}"),
            Node::Variable(print) => write!(f, "{print}"),
            Node::Parenthesized(print) => write!(f, "{print}"),
            Node::Unary(print) => write!(f, "{print}"),
            Node::Call(print) => write!(f, "{print}"),
            Node::Binary(print) => write!(f, "{print}"),
            Node::Property(print) => write!(f, "{print}"),
            Node::Crement(print) => write!(f, "{print}"),
            Node::Chunk(print) => write!(f, "{print}"),
        }
    }
}

impl Display for Simple<&Node> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Node::VariableDecl(print) => write!(f, "{}", Simple(print)),
            Node::VariableAssign(print) => write!(f, "{}", Simple(print)),
            Node::PropertyAssign(print) => write!(f, "{}", Simple(print)),
            Node::ExpressionStatement(print) => write!(f, "{}", Simple(print)),
            Node::EmptyStatement(_) => Ok(()),
            node => write!(f, "{node}"),
        }
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = &self.precision;
        let ty = &self.ty;
        write!(f, "precision {precision} {ty};")
    }
}

impl Display for Simple<&VariableDecl> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.0.qualifier {
            write!(f, "{qualifier} ")?;
        }
        let ty = &self.0.ty;
        let name = &self.0.name;
        write!(f, "{ty} {name}")?;
        if let Some(value) = &self.0.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}

impl Display for VariableDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};", Simple(self))
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Varying => write!(f, "varying"),
            Self::Const => write!(f, "const"),
        }
    }
}

impl Display for Simple<&VariableAssign> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = &self.0.name;
        let op = &self.0.op;
        let value = &self.0.value;
        write!(f, "{name} {op} {value}")
    }
}

impl Display for VariableAssign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};", Simple(self))
    }
}

impl Display for Simple<&PropertyAssign> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let target = &self.0.target;
        let op = &self.0.op;
        let value = &self.0.value;
        write!(f, "{target} {op} {value}")
    }
}

impl Display for PropertyAssign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};", Simple(self))
    }
}

impl Display for AssignOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => write!(f, "="),
            Self::AddAssign => write!(f, "+="),
            Self::SubAssign => write!(f, "-="),
            Self::MulAssign => write!(f, "*="),
            Self::DivAssign => write!(f, "/="),
            Self::ModAssign => write!(f, "%="),
        }
    }
}

impl Display for Simple<&ExpressionStatement> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.value)
    }
}

impl Display for ExpressionStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{};", Simple(self))
    }
}

impl Display for EmptyStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, ";")
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ret = &self.return_ty;
        let name = &self.name;
        let params = self.params.iter().format(", ");
        let body = fmt_body(&self.body);
        write!(f, "{ret} {name}({params}) {body}")
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = &self.ty;
        let name = &self.name;
        write!(f, "{ty} {name}")
    }
}

impl Display for If {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let condition = &self.condition;
        let body = fmt_body(&self.body);
        write!(f, "if ({condition}) {body}")?;
        for else_if in &self.else_ifs {
            write!(f, " {else_if}")?;
        }
        if let Some(else_body) = &self.else_body {
            let body = fmt_body(else_body);
            write!(f, " else {body}")?;
        }
        Ok(())
    }
}

impl Display for ElseIf {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let condition = &self.condition;
        let body = fmt_body(&self.body);
        write!(f, "else if ({condition}) {body}")
    }
}

impl Display for For {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let init = Simple(&*self.init);
        let check = Simple(&*self.check);
        let increment = Simple(&*self.increment);
        let body = fmt_body(&self.body);
        write!(f, "for ({init}; {check}; {increment}) {body}")
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {value};"),
            None => write!(f, "return;"),
        }
    }
}

impl Display for Break {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "break;")
    }
}

impl Display for FloatLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for IntLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Parenthesized {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.value)
    }
}

impl Display for Unary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = &self.op;
        let value = self.value.to_string();
        // `- -x` must not become a decrement
        let sep = if value.starts_with(['+', '-']) { " " } else { "" };
        write!(f, "{op}{sep}{value}")
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
            Self::Minus => write!(f, "-"),
            Self::Plus => write!(f, "+"),
        }
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let callee = &self.callee;
        let args = self.args.iter().format(", ");
        write!(f, "{callee}({args})")
    }
}

impl Display for Binary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut operands = self.operands.iter();
        if let Some(first) = operands.next() {
            write!(f, "{first}")?;
        }
        for (op, operand) in self.ops.iter().zip(operands) {
            write!(f, " {op} {operand}")?;
        }
        Ok(())
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Mod => write!(f, "%"),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::Greater => write!(f, ">"),
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::Or => write!(f, "||"),
            Self::And => write!(f, "&&"),
        }
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let value = &self.value;
        let property = &self.property;
        write!(f, "{value}.{property}")
    }
}

impl Display for Crement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = &self.op;
        let value = &self.value;
        if self.postfix {
            write!(f, "{value}{op}")
        } else {
            write!(f, "{op}{value}")
        }
    }
}

impl Display for CrementOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => write!(f, "++"),
            Self::Decrement => write!(f, "--"),
        }
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile, reconstruct};

    fn round_trip(source: &str) -> String {
        let nodes = compile(source).unwrap();
        let text = reconstruct(&nodes);
        assert_eq!(compile(&text).unwrap(), nodes, "reparsing `{text}`");
        text
    }

    #[test]
    fn empty() {
        assert_eq!(reconstruct(&[]), "");
    }

    #[test]
    fn statements() {
        assert_eq!(
            round_trip("precision   mediump float ; const vec3 c=vec3(1.0,0,.5);"),
            "precision mediump float;\nconst vec3 c = vec3(1.0, 0, .5);"
        );
    }

    #[test]
    fn for_clauses_drop_semicolons() {
        assert_eq!(
            round_trip("void main(){for(int i=0;i<3;i++){x+=1.0;}}"),
            "void main() {\n    for (int i = 0; i < 3; i++) {\n        x += 1.0;\n    }\n}"
        );
        assert_eq!(
            round_trip("void main() { for (;;) { break; } }"),
            "void main() {\n    for (; ; ) {\n        break;\n    }\n}"
        );
    }

    #[test]
    fn else_chain() {
        let text = round_trip(
            "void f(float x) { if (x > 3.0) { return; } else if (x > 2.0) {} else { x = 1.0; } }",
        );
        assert_eq!(
            text,
            "void f(float x) {\n    if (x > 3.0) {\n        return;\n    } else if (x > 2.0) {} else {\n        x = 1.0;\n    }\n}"
        );
    }

    #[test]
    fn prefix_operators_keep_apart() {
        assert_eq!(round_trip("float x = - -a;"), "float x = - -a;");
        assert_eq!(round_trip("float x = -(--i);"), "float x = -(--i);");
        assert_eq!(round_trip("float x = !b.c++;"), "float x = !b.c++;");
    }

    #[test]
    fn expressions() {
        round_trip("float x = (1 + 2) * obj.f(a, -b).y / 3 % 2;");
        round_trip("bool b = x >= 1 && y != 2 || !z;");
        round_trip("void main() { gl_FragColor.rgb = mix(a, b, t); f(); ; }");
    }
}

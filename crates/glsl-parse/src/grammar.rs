//! The rules of the GLSL ES subset, registered on a [`Grammar`] in the order they are tried.

use std::sync::LazyLock;

use crate::{
    engine::{Attempt, Cursor, Flags, Grammar, Is},
    error::Error,
    lexer::{tokenize, Token, TokenKind},
    syntax::*,
    syntax_impl::is_reserved,
};

/// The GLSL grammar, built on first use.
pub static GLSL: LazyLock<Grammar> = LazyLock::new(Grammar::glsl);

const ANY_STATEMENT: Flags = Flags::ROOT.union(Flags::STATEMENT);
const ANY_SIMPLE_STATEMENT: Flags = ANY_STATEMENT.union(Flags::SIMPLE);

impl Grammar {
    pub fn glsl() -> Self {
        let mut grammar = Grammar::new();
        grammar
            // statements
            .define("precision", Flags::ROOT, precision)
            .define("variable_decl", ANY_SIMPLE_STATEMENT, variable_decl)
            .define("function_decl", Flags::ROOT, function_decl)
            .define("variable_assign", ANY_SIMPLE_STATEMENT, variable_assign)
            .define("property_assign", ANY_SIMPLE_STATEMENT, property_assign)
            .define("if", ANY_STATEMENT, if_statement)
            .define("for", ANY_STATEMENT, for_statement)
            .define("return", ANY_STATEMENT, return_statement)
            .define("break", ANY_STATEMENT, break_statement)
            .define("expression_statement", ANY_SIMPLE_STATEMENT, expression_statement)
            .define("empty_statement", ANY_SIMPLE_STATEMENT, empty_statement)
            // single values
            .define("float", Flags::SINGLE, float)
            .define("int", Flags::SINGLE, int)
            .define("variable", Flags::SINGLE, variable)
            .define("parenthesized", Flags::SINGLE, parenthesized)
            .define("unary", Flags::SINGLE, unary)
            .define("prefix_crement", Flags::SINGLE, prefix_crement)
            // expressions
            .define("value", Flags::VALUE | Flags::OPERAND, value)
            // postfix
            .define("call", Flags::POSTFIX, call)
            .define("property", Flags::POSTFIX, property)
            .define("postfix_crement", Flags::POSTFIX, postfix_crement);
        grammar
    }
}

/// Parse a GLSL source string with the default grammar.
pub fn compile(source: &str) -> Result<Vec<Node>, Error> {
    compile_with(&GLSL, source)
}

/// Parse a GLSL source string with a custom grammar.
pub fn compile_with(grammar: &Grammar, source: &str) -> Result<Vec<Node>, Error> {
    let tokens = tokenize(source).into_tokens()?;
    let nodes = grammar.compile(&tokens)?;
    Ok(nodes)
}

fn is_name(token: &Token) -> bool {
    token.kind == TokenKind::Identifier && !is_reserved(&token.text)
}

fn is_binary_op(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Operator | TokenKind::Equality | TokenKind::BoolOp
    ) && token.text.parse::<BinaryOp>().is_ok()
}

fn name(c: &mut Cursor) -> Attempt<String> {
    Ok(c.read(Is(is_name))?.text.clone())
}

/// The `;` ending a statement, absent in `for` clauses.
fn end_statement(c: &mut Cursor) -> Attempt<()> {
    let simple = c.flags().contains(Flags::SIMPLE);
    c.read_if(!simple, ";")?;
    Ok(())
}

fn block(c: &mut Cursor) -> Attempt<Vec<Node>> {
    c.read("{")?;
    let body = c.all(Flags::STATEMENT, "}")?;
    c.read("}")?;
    Ok(body)
}

/// `(condition) { body }`
fn conditional(c: &mut Cursor) -> Attempt<(Node, Vec<Node>)> {
    c.read("(")?;
    let condition = c.value(Flags::VALUE)?;
    c.read(")")?;
    let body = block(c)?;
    Ok((condition, body))
}

fn precision(c: &mut Cursor) -> Attempt<Node> {
    c.read("precision")?;
    let precision = name(c)?;
    let ty = name(c)?;
    c.read(";")?;
    Ok(Precision { precision, ty }.into())
}

fn variable_decl(c: &mut Cursor) -> Attempt<Node> {
    let qualifier = match c.maybe_read(["uniform", "varying", "const"]) {
        Some(token) => Some(token.text.parse::<Qualifier>()?),
        None => None,
    };
    c.validate(qualifier.is_none() || c.flags().contains(Flags::ROOT))?;
    let ty = name(c)?;
    let name = name(c)?;
    let value = match c.maybe_read("=") {
        Some(_) => Some(Box::new(c.value(Flags::VALUE)?)),
        None => None,
    };
    end_statement(c)?;
    Ok(VariableDecl {
        qualifier,
        ty,
        name,
        value,
    }
    .into())
}

fn function_decl(c: &mut Cursor) -> Attempt<Node> {
    let return_ty = name(c)?;
    let fn_name = name(c)?;
    c.read("(")?;
    let mut params = Vec::new();
    c.repeat_until(")", |c, count| {
        if count > 0 {
            c.read(",")?;
        }
        let ty = name(c)?;
        let name = name(c)?;
        params.push(Param { ty, name });
        Ok(())
    })?;
    c.read(")")?;
    let body = block(c)?;
    Ok(FunctionDecl {
        return_ty,
        name: fn_name,
        params,
        body,
    }
    .into())
}

fn assign_op(c: &mut Cursor) -> Attempt<AssignOp> {
    Ok(c.read(TokenKind::Assign)?.text.parse()?)
}

fn variable_assign(c: &mut Cursor) -> Attempt<Node> {
    let name = name(c)?;
    let op = assign_op(c)?;
    let value = c.value(Flags::VALUE)?;
    end_statement(c)?;
    Ok(VariableAssign {
        name,
        op,
        value: Box::new(value),
    }
    .into())
}

fn property_assign(c: &mut Cursor) -> Attempt<Node> {
    let target = c.value(Flags::VALUE)?;
    c.validate(target.is_property())?;
    let op = assign_op(c)?;
    let value = c.value(Flags::VALUE)?;
    end_statement(c)?;
    Ok(PropertyAssign {
        target: Box::new(target),
        op,
        value: Box::new(value),
    }
    .into())
}

fn if_statement(c: &mut Cursor) -> Attempt<Node> {
    c.read("if")?;
    let (condition, body) = conditional(c)?;
    let mut else_ifs = Vec::new();
    let mut else_body = None;
    c.repeat_while("else", |c, _| {
        // nothing can follow the final `else`
        c.validate(else_body.is_none())?;
        c.read("else")?;
        if c.maybe_read("if").is_some() {
            let (condition, body) = conditional(c)?;
            else_ifs.push(ElseIf { condition, body });
        } else {
            else_body = Some(block(c)?);
        }
        Ok(())
    })?;
    Ok(If {
        condition: Box::new(condition),
        body,
        else_ifs,
        else_body,
    }
    .into())
}

fn for_statement(c: &mut Cursor) -> Attempt<Node> {
    c.read("for")?;
    c.read("(")?;
    let init = c.value(Flags::SIMPLE)?;
    c.read(";")?;
    let check = c.value(Flags::SIMPLE)?;
    c.read(";")?;
    let increment = c.value(Flags::SIMPLE)?;
    c.read(")")?;
    let body = block(c)?;
    Ok(For {
        init: Box::new(init),
        check: Box::new(check),
        increment: Box::new(increment),
        body,
    }
    .into())
}

fn return_statement(c: &mut Cursor) -> Attempt<Node> {
    c.read("return")?;
    let value = if c.matches(";") {
        None
    } else {
        Some(Box::new(c.value(Flags::VALUE)?))
    };
    c.read(";")?;
    Ok(Return { value }.into())
}

fn break_statement(c: &mut Cursor) -> Attempt<Node> {
    c.read("break")?;
    c.read(";")?;
    Ok(Break.into())
}

fn expression_statement(c: &mut Cursor) -> Attempt<Node> {
    let value = c.value(Flags::VALUE)?;
    end_statement(c)?;
    Ok(ExpressionStatement {
        value: Box::new(value),
    }
    .into())
}

fn empty_statement(c: &mut Cursor) -> Attempt<Node> {
    if c.flags().contains(Flags::SIMPLE) {
        c.validate(c.matches([";", ")"]))?;
    } else {
        c.read(";")?;
    }
    Ok(EmptyStatement.into())
}

fn float(c: &mut Cursor) -> Attempt<Node> {
    let token = c.read(TokenKind::Float)?;
    Ok(FloatLiteral::from(token.text.clone()).into())
}

fn int(c: &mut Cursor) -> Attempt<Node> {
    let token = c.read(TokenKind::Integer)?;
    Ok(IntLiteral::from(token.text.clone()).into())
}

fn variable(c: &mut Cursor) -> Attempt<Node> {
    Ok(Variable::from(name(c)?).into())
}

fn parenthesized(c: &mut Cursor) -> Attempt<Node> {
    c.read("(")?;
    let value = c.value(Flags::VALUE)?;
    c.read(")")?;
    Ok(Parenthesized {
        value: Box::new(value),
    }
    .into())
}

fn unary(c: &mut Cursor) -> Attempt<Node> {
    let op = c.read(["!", "-", "+"])?.text.parse::<UnaryOp>()?;
    let value = c.value(Flags::OPERAND)?;
    Ok(Unary {
        op,
        value: Box::new(value),
    }
    .into())
}

fn prefix_crement(c: &mut Cursor) -> Attempt<Node> {
    let op = c.read(TokenKind::Crement)?.text.parse::<CrementOp>()?;
    let value = c.value(Flags::OPERAND)?;
    c.validate(value.is_crement_target())?;
    Ok(Crement {
        op,
        postfix: false,
        value: Box::new(value),
    }
    .into())
}

/// A single value and its postfix productions.
fn operand(c: &mut Cursor) -> Attempt<Node> {
    let mut node = c.value(Flags::SINGLE)?;
    while let Some(next) = c.postfix(&node)? {
        node = next;
    }
    Ok(node)
}

fn value(c: &mut Cursor) -> Attempt<Node> {
    let first = operand(c)?;
    if c.flags().contains(Flags::OPERAND) {
        return Ok(first);
    }
    let mut ops = Vec::new();
    let mut operands = vec![first];
    while let Some(token) = c.maybe_read(Is(is_binary_op)) {
        ops.push(token.text.parse::<BinaryOp>()?);
        operands.push(operand(c)?);
    }
    if ops.is_empty() {
        Ok(operands.remove(0))
    } else {
        Ok(Binary { ops, operands }.into())
    }
}

fn call(c: &mut Cursor) -> Attempt<Node> {
    let callee = c.subject()?;
    c.read("(")?;
    let mut args = Vec::new();
    c.repeat_until(")", |c, count| {
        if count > 0 {
            c.read(",")?;
        }
        args.push(c.value(Flags::VALUE)?);
        Ok(())
    })?;
    c.read(")")?;
    Ok(Call {
        callee: Box::new(callee.clone()),
        args,
    }
    .into())
}

fn property(c: &mut Cursor) -> Attempt<Node> {
    let value = c.subject()?;
    c.read(".")?;
    let property = c.read(TokenKind::Identifier)?.text.clone();
    Ok(Property {
        value: Box::new(value.clone()),
        property,
    }
    .into())
}

fn postfix_crement(c: &mut Cursor) -> Attempt<Node> {
    let value = c.subject()?;
    let op = c.read(TokenKind::Crement)?.text.parse::<CrementOp>()?;
    c.validate(value.is_crement_target())?;
    Ok(Crement {
        op,
        postfix: true,
        value: Box::new(value.clone()),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;

    fn compiles(source: &str) -> bool {
        compile(source).is_ok()
    }

    fn in_function(body: &str) -> String {
        format!("void main() {{ {body} }}")
    }

    fn single(source: &str) -> Node {
        let mut nodes = compile(source).unwrap();
        assert_eq!(nodes.len(), 1);
        nodes.remove(0)
    }

    fn decl_value(source: &str) -> Node {
        match single(source) {
            Node::VariableDecl(decl) => *decl.value.unwrap(),
            node => panic!("expected a declaration, got {node:?}"),
        }
    }

    #[test]
    fn empty_program() {
        assert_eq!(compile("").unwrap(), Vec::new());
        assert_eq!(compile("  // nothing\n").unwrap(), Vec::new());
    }

    #[test]
    fn precision() {
        assert_eq!(
            single("precision mediump float;"),
            Node::Precision(Precision {
                precision: "mediump".to_string(),
                ty: "float".to_string(),
            })
        );
    }

    #[test]
    fn qualifiers_only_at_root() {
        assert!(compiles("uniform float x;"));
        assert!(compiles("varying vec2 vUv;"));
        assert!(compiles("const float x = 3.0;"));
        assert!(!compiles(&in_function("uniform float x = 1.0;")));
        assert!(compiles(&in_function("float x = 1.0;")));
    }

    #[test]
    fn declarations_only_take_plain_assignment() {
        assert!(!compiles("float x += 3.0;"));
        assert!(!compiles(&in_function("float x += 3.0;")));
    }

    #[test]
    fn crement_targets() {
        assert!(compiles("float x = i++;"));
        assert!(compiles("float x = --i;"));
        assert!(compiles("float x = obj.i++;"));
        assert!(compiles("float x = ++obj.i;"));
        assert!(!compiles("float x = 3++;"));
        assert!(!compiles("float x = ++3;"));
        assert!(!compiles("float x = f()++;"));
    }

    #[test]
    fn binary_chains_are_flat() {
        let Node::Binary(bin) = decl_value("float x = 1 * 2 + 3 * 4 + 5;") else {
            panic!("expected a binary chain");
        };
        use BinaryOp::*;
        assert_eq!(bin.ops, [Mul, Add, Mul, Add]);
        assert_eq!(bin.operands.len(), 5);
    }

    #[test]
    fn unary_binds_to_operand() {
        let Node::Binary(bin) = decl_value("bool b = !x && y;") else {
            panic!("expected a binary chain");
        };
        assert!(bin.operands[0].is_unary());
        let Node::Unary(neg) = decl_value("float x = -a.b(1);") else {
            panic!("expected a unary operator");
        };
        assert!(neg.value.is_call());
    }

    #[test]
    fn postfix_chains() {
        let value = decl_value("float x = obj(1, 2).x.y;");
        let Node::Property(y) = value else {
            panic!("expected a property access");
        };
        assert_eq!(y.property, "y");
        let Node::Property(x) = *y.value else {
            panic!("expected a property access");
        };
        let Node::Call(call) = *x.value else {
            panic!("expected a call");
        };
        assert_eq!(call.args.len(), 2);
        assert!(compiles("float x = (1 + 2)(1, 2);"));
        assert!(compiles(&in_function("(1 + 2).x().y = 1;")));
    }

    #[test]
    fn assignments() {
        let body = in_function("x = 3.0; x.y *= 2.0; y.z += 1;");
        let Node::FunctionDecl(f) = single(&body) else {
            panic!("expected a function");
        };
        assert!(f.body[0].is_variable_assign());
        assert!(f.body[1].is_property_assign());
        assert!(f.body[2].is_property_assign());
    }

    #[test]
    fn if_else_chain() {
        let source = in_function(
            "if (x > 3) { x = 2.0; } else if (x > 2) { y = 1.0; } else if (x > 1) {} else { z = 0.0; }",
        );
        let Node::FunctionDecl(f) = single(&source) else {
            panic!("expected a function");
        };
        let Node::If(stmt) = &f.body[0] else {
            panic!("expected an if statement");
        };
        assert_eq!(stmt.body.len(), 1);
        assert_eq!(stmt.else_ifs.len(), 2);
        assert!(stmt.else_ifs[1].body.is_empty());
        assert_eq!(stmt.else_body.as_ref().map(Vec::len), Some(1));
        assert!(!compiles(&in_function("if (x) {} else {} else {}")));
    }

    #[test]
    fn for_clauses() {
        let source = in_function("for (int i = 1; i < 3; i++) { x = 2.0; }");
        let Node::FunctionDecl(f) = single(&source) else {
            panic!("expected a function");
        };
        let Node::For(stmt) = &f.body[0] else {
            panic!("expected a for loop");
        };
        assert!(stmt.init.is_variable_decl());
        assert!(stmt.check.is_expression_statement());
        assert!(stmt.increment.is_expression_statement());
        assert_eq!(stmt.body.len(), 1);

        let source = in_function("for (;;) {}");
        let Node::FunctionDecl(f) = single(&source) else {
            panic!("expected a function");
        };
        let Node::For(stmt) = &f.body[0] else {
            panic!("expected a for loop");
        };
        assert!(stmt.init.is_empty_statement());
        assert!(stmt.increment.is_empty_statement());
    }

    #[test]
    fn reserved_words() {
        let Node::FunctionDecl(f) = single(&in_function("return x; return; break;")) else {
            panic!("expected a function");
        };
        assert!(f.body.iter().all(|n| n.is_return() || n.is_break()));
        assert!(!compiles("float if = 1.0;"));
    }

    #[test]
    fn trailing_operator_is_a_syntax_error() {
        let err = compile("float x = 1.0 +;").unwrap_err();
        let Error::Syntax(SyntaxError {
            flags,
            expected,
            last,
            remainder,
            ..
        }) = err
        else {
            panic!("expected a syntax error");
        };
        assert_eq!(flags, Flags::ROOT);
        assert_eq!(expected, None);
        assert_eq!(last, None);
        assert_eq!(remainder, "float x = 1.0 + ;");
    }

    #[test]
    fn errors_in_bodies_abort() {
        let err = compile("void main() { x = ; }").unwrap_err();
        let Error::Syntax(err) = err else {
            panic!("expected a syntax error");
        };
        assert_eq!(err.flags, Flags::STATEMENT);
        assert_eq!(err.expected.as_deref(), Some("}"));
        assert_eq!(err.last.map(|t| t.text), Some("{".to_string()));
        assert_eq!(err.remainder, "x = ; }");
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let nested = |n: usize| format!("float x = {}a{};", "(".repeat(n), ")".repeat(n));
        assert!(compiles(&nested(20)));
        assert!(matches!(compile(&nested(1000)), Err(Error::Depth(_))));

        let blocks = in_function(&format!("{}{}", "if (a) { ".repeat(1000), "} ".repeat(1000)));
        assert!(matches!(compile(&blocks), Err(Error::Depth(_))));
    }

    #[test]
    fn lex_errors() {
        assert!(matches!(compile("float x = #;"), Err(Error::Lex(_))));
    }
}

//! Diagnostic pretty-printer
//!
//! Renders an expression tree back to indented text, optionally injecting a
//! `# ^ <explanation>` comment line under one designated node. The layout is
//! purely structural: binary operations become parenthesized blocks with the
//! operator on its own line, calls whose arguments are all leaves render
//! inline, and anything else renders one argument per line. Leaf arguments
//! keep their trailing comma; call arguments carry none.

use crate::ast::ExprNode;
use rust_decimal::Decimal;

const INDENT: &str = "    ";

/// Render an expression tree without any annotation.
pub fn render(expr: &ExprNode) -> String {
    Renderer {
        target: None,
        note: "",
    }
    .render(expr)
}

/// Render an expression tree with `# ^ <note>` injected under `target`.
/// `target` must be a node inside `expr`; it is matched by identity.
pub fn render_annotated(expr: &ExprNode, target: &ExprNode, note: &str) -> String {
    Renderer {
        target: Some(target),
        note,
    }
    .render(expr)
}

struct Renderer<'a> {
    target: Option<&'a ExprNode>,
    note: &'a str,
}

impl Renderer<'_> {
    fn render(&self, expr: &ExprNode) -> String {
        let mut lines = Vec::new();
        self.node(expr, 0, &mut lines);
        lines.join("\n")
    }

    fn node(&self, node: &ExprNode, depth: usize, lines: &mut Vec<String>) {
        let indent = INDENT.repeat(depth);
        match node {
            ExprNode::Number { .. } | ExprNode::StringLit { .. } | ExprNode::Identifier { .. } => {
                lines.push(format!("{indent}{}", leaf_text(node, true)));
                self.annotate_if_target(node, depth, lines);
            }
            ExprNode::Binary {
                op, left, right, ..
            } => {
                lines.push(format!("{indent}("));
                self.node(left, depth + 1, lines);
                lines.push(format!("{}{}", INDENT.repeat(depth + 1), op.symbol()));
                self.node(right, depth + 1, lines);
                lines.push(format!("{indent})"));
                self.annotate_if_target(node, depth, lines);
            }
            ExprNode::Call { name, args, .. } => {
                if args.iter().all(is_leaf) {
                    let rendered: Vec<String> =
                        args.iter().map(|arg| leaf_text(arg, false)).collect();
                    lines.push(format!("{indent}{name}({})", rendered.join(", ")));
                    // A target anywhere inside an inline call annotates the
                    // whole line, since its arguments share it.
                    if self.target.is_some_and(|t| contains(node, t)) {
                        lines.push(format!("{indent}# ^ {}", self.note));
                    }
                } else {
                    lines.push(format!("{indent}{name}("));
                    for (index, arg) in args.iter().enumerate() {
                        if is_leaf(arg) {
                            let mut line =
                                format!("{}{}", INDENT.repeat(depth + 1), leaf_text(arg, false));
                            if index + 1 != args.len() {
                                line.push(',');
                            }
                            lines.push(line);
                            self.annotate_if_target(arg, depth + 1, lines);
                        } else {
                            self.node(arg, depth + 1, lines);
                        }
                    }
                    lines.push(format!("{indent})"));
                    self.annotate_if_target(node, depth, lines);
                }
            }
        }
    }

    fn annotate_if_target(&self, node: &ExprNode, depth: usize, lines: &mut Vec<String>) {
        if self.target.is_some_and(|t| std::ptr::eq(t, node)) {
            lines.push(format!("{}# ^ {}", INDENT.repeat(depth), self.note));
        }
    }
}

/// True when `target` is `node` or any node beneath it, by identity.
fn contains(node: &ExprNode, target: &ExprNode) -> bool {
    if std::ptr::eq(node, target) {
        return true;
    }
    match node {
        ExprNode::Binary { left, right, .. } => {
            contains(left, target) || contains(right, target)
        }
        ExprNode::Call { args, .. } => args.iter().any(|arg| contains(arg, target)),
        _ => false,
    }
}

fn is_leaf(node: &ExprNode) -> bool {
    matches!(
        node,
        ExprNode::Number { .. } | ExprNode::StringLit { .. } | ExprNode::Identifier { .. }
    )
}

fn leaf_text(node: &ExprNode, value_position: bool) -> String {
    match node {
        ExprNode::Number { value, units, .. } => {
            let mut text = number_text(value, value_position);
            if let Some(units) = units {
                text.push(' ');
                text.push_str(&units.to_string());
            }
            text
        }
        ExprNode::StringLit { value, .. } => format!("\"{value}\""),
        ExprNode::Identifier { name, .. } => name.clone(),
        _ => unreachable!("leaf_text called on a non-leaf node"),
    }
}

/// Numbers in expression position render float-style (`2` becomes `2.0`);
/// numbers inside call argument lists stay bare (`FromDate(1960, 1, 1)`).
fn number_text(value: &Decimal, value_position: bool) -> String {
    let value = value.normalize();
    if value.fract().is_zero() {
        let integral = value.trunc();
        if value_position {
            format!("{integral}.0")
        } else {
            integral.to_string()
        }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn parse(input: &str) -> ExprNode {
        Parser::new(input).parse().unwrap()
    }

    #[test]
    fn renders_binary_operations_as_blocks() {
        assert_eq!(render(&parse("1 + 2")), "(\n    1.0\n    +\n    2.0\n)");
    }

    #[test]
    fn renders_leaf_only_calls_inline() {
        assert_eq!(render(&parse("FromDate(1960, 1, 1)")), "FromDate(1960, 1, 1)");
    }

    #[test]
    fn renders_number_with_unit_suffix() {
        assert_eq!(render(&parse("2 delta mm")), "2.0 delta mm");
        assert_eq!(render(&parse("2.5 mm")), "2.5 mm");
    }

    #[test]
    fn annotates_the_designated_node() {
        let expr = parse("1 + 2");
        let ExprNode::Binary { right, .. } = &expr else {
            unreachable!();
        };
        assert_eq!(
            render_annotated(&expr, right, "note"),
            "(\n    1.0\n    +\n    2.0\n    # ^ note\n)"
        );
    }
}

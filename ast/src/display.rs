//! Canonical source rendering
//!
//! Renders nodes back to text in the surface syntax of their variant. The output ignores the
//! original layout and comments; it is meant for outlines and test assertions, not for
//! reformatting a document.

use crate::{NodeId, NodeKind, Tree};
use std::fmt::{self, Write as _};

/// Lazily renders a node as source text
pub struct NodeDisplay<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl Tree {
    pub fn display(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { tree: self, id }
    }

    /// Source text for `id`, or an empty string if it is not in this tree
    pub fn source(&self, id: NodeId) -> String {
        if self.get(id).is_none() {
            return String::new();
        }
        self.display(id).to_string()
    }
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self.tree, self.id, f)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &root) in self.roots().iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write_node(self, root, f)?;
        }
        Ok(())
    }
}

fn write_joined(tree: &Tree, ids: &[NodeId], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, &id) in ids.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write_node(tree, id, f)?;
    }
    Ok(())
}

/// `(head items...)`, without the trailing space when there are no items
fn write_form(
    tree: &Tree,
    head: &dyn fmt::Display,
    items: &[NodeId],
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    write!(f, "({head}")?;
    if !items.is_empty() {
        f.write_char(' ')?;
        write_joined(tree, items, f)?;
    }
    f.write_char(')')
}

/// Children of a sequence node, or the node itself
fn spliced(tree: &Tree, id: NodeId) -> Vec<NodeId> {
    match tree[id].kind() {
        NodeKind::Sequence { exprs, .. } => exprs.clone(),
        _ => vec![id],
    }
}

fn write_node(tree: &Tree, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let show = |id| tree.display(id);
    match tree[id].kind() {
        NodeKind::Unknown { elts } => {
            f.write_char('(')?;
            write_joined(tree, elts, f)?;
            f.write_char(')')
        },
        NodeKind::FunctionApp { func, args } => write_form(tree, &show(*func), args, f),
        NodeKind::IdentifierList { ids, .. } => write_joined(tree, ids, f),
        NodeKind::StructDefinition { name, fields } => {
            write!(f, "(define-struct {} ({}))", show(*name), show(*fields))
        },
        NodeKind::VariableDefinition { name, body } => {
            write!(f, "(define {} {})", show(*name), show(*body))
        },
        NodeKind::LambdaExpression { args, body } => {
            write!(f, "(lambda ({}) {})", show(*args), show(*body))
        },
        NodeKind::FunctionDefinition { name, params, body } => {
            let params = show(*params).to_string();
            if params.is_empty() {
                write!(f, "(define ({}) {})", show(*name), show(*body))
            } else {
                write!(f, "(define ({} {params}) {})", show(*name), show(*body))
            }
        },
        NodeKind::CondClause {
            test_expr,
            then_exprs,
        } => {
            write!(f, "[{}", show(*test_expr))?;
            for &then in then_exprs {
                write!(f, " {}", show(then))?;
            }
            f.write_char(']')
        },
        NodeKind::CondExpression { clauses } => write_form(tree, &"cond", clauses, f),
        NodeKind::IfExpression {
            test_expr,
            then_expr,
            else_expr,
        } => write!(
            f,
            "(if {} {} {})",
            show(*test_expr),
            show(*then_expr),
            show(*else_expr)
        ),
        NodeKind::Literal { value, .. } | NodeKind::Blank { value, .. } => f.write_str(value),
        NodeKind::Comment { comment } => f.write_str(comment),
        NodeKind::Sequence { name, exprs } => write_form(tree, name, exprs, f),
        NodeKind::LetLikeExpr {
            form,
            bindings,
            expr,
        } => {
            write!(f, "({form} (")?;
            for (i, binding) in spliced(tree, *bindings).into_iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                match tree[binding].kind() {
                    NodeKind::VariableDefinition { name, body } => {
                        write!(f, "[{} {}]", show(*name), show(*body))?
                    },
                    _ => write_node(tree, binding, f)?,
                }
            }
            write!(f, ") {})", show(*expr))
        },
        NodeKind::WhenUnless {
            form,
            predicate,
            exprs,
        } => {
            write!(f, "({form} {}", show(*predicate))?;
            for expr in spliced(tree, *exprs) {
                write!(f, " {}", show(expr))?;
            }
            f.write_char(')')
        },
        NodeKind::Binop { op, left, right } => {
            write!(f, "{} {op} {}", show(*left), show(*right))
        },
        NodeKind::ABlank => f.write_str("Any"),
        NodeKind::Bind { id, ann } => match tree[*ann].kind() {
            NodeKind::ABlank => f.write_str(id),
            _ => write!(f, "{id} :: {}", show(*ann)),
        },
        NodeKind::Func {
            name,
            args,
            ret_ann,
            body,
            ..
        } => {
            write!(f, "fun {name}(")?;
            for (i, &arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_node(tree, arg, f)?;
            }
            f.write_char(')')?;
            if let Some(ann) = ret_ann {
                write!(f, " -> {}", show(*ann))?;
            }
            write!(f, ": {} end", show(*body))
        },
        NodeKind::Sekwence { exprs, .. } => {
            f.write_str("block:")?;
            for &expr in exprs {
                write!(f, " {}", show(expr))?;
            }
            f.write_str(" end")
        },
        NodeKind::Var { id, rhs } => write!(f, "var {} = {}", show(*id), show(*rhs)),
        NodeKind::Assign { id, rhs } => write!(f, "{} := {}", show(*id), show(*rhs)),
        NodeKind::Let { id, rhs } => write!(f, "{} = {}", show(*id), show(*rhs)),
    }
}

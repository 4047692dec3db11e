//! Natural-language node descriptions
//!
//! A description expands a node into prose down to [`Tree::description_depth`] levels below
//! the level it was requested at. Anything deeper collapses to the node's label.

use crate::{NodeId, NodeKind, Tree};

/// `"a, b and c"`
pub fn enumerate_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// `"1 argument"`, `"2 arguments"`
pub fn pluralize(noun: &str, count: usize) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

/// `"x"` alone, or `"1: x, 2: y"` when there is more than one item
fn numbered(items: &[String]) -> String {
    if items.len() == 1 {
        return items[0].clone();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}: {item}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Tree {
    /// The node's accessible label, or its variant name when the parser supplied none
    pub fn label(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        match &node.options().aria_label {
            Some(label) => label.to_string(),
            None => node.kind().name().to_string(),
        }
    }

    /// Describe `id` as seen from `level`
    ///
    /// Pass the node's own level to describe it in full. Children reached through the
    /// description are described relative to the same `level`, so they fall back to their
    /// labels once they are [`Tree::description_depth`] levels down.
    pub fn describe(&self, id: NodeId, level: u32) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        let delta = i64::from(node.level()) - i64::from(level);
        let elided = delta >= i64::from(self.description_depth());

        let describe = |id| self.describe(id, level);
        let describe_all = |ids: &[NodeId]| ids.iter().map(|&id| describe(id)).collect::<Vec<_>>();

        if let NodeKind::FunctionApp { func, args } = node.kind() {
            // At its own level an application spells out every argument
            if delta == 0 {
                return format!(
                    "applying the function {} to {} {}",
                    self.label(*func),
                    pluralize("argument", args.len()),
                    numbered(&describe_all(args))
                )
                .trim_end()
                .to_string();
            }
            if elided {
                return self.label(id);
            }
            return format!("{} of {}", self.label(*func), describe_all(args).join(", "));
        }

        if elided || (node.kind().is_leaf() && !matches!(node.kind(), NodeKind::ABlank)) {
            return self.label(id);
        }

        match node.kind() {
            NodeKind::Unknown { elts } => format!(
                "an unknown expression with {} {}",
                pluralize("element", elts.len()),
                numbered(&describe_all(elts))
            ),
            NodeKind::IdentifierList { ids, .. } => enumerate_list(&describe_all(ids)),
            NodeKind::StructDefinition { name, fields } => format!(
                "define {} to be a structure with {}",
                describe(*name),
                describe(*fields)
            ),
            NodeKind::VariableDefinition { name, body } => {
                let insert = if self[*body].kind().is_leaf() {
                    ""
                } else {
                    "the result of: "
                };
                format!("define {} to be {insert}{}", self.source(*name), describe(*body))
            },
            NodeKind::LambdaExpression { args, body } => format!(
                "an anonymous function of {}: {}, with body: {}",
                pluralize("argument", self.children(*args).count()),
                describe(*args),
                describe(*body)
            ),
            NodeKind::FunctionDefinition { name, params, body } => format!(
                "define {} to be a function of {}, with body: {}",
                self.source(*name),
                describe(*params),
                describe(*body)
            ),
            NodeKind::CondClause {
                test_expr,
                then_exprs,
            } => format!(
                "condition: if {}, then, {}",
                describe(*test_expr),
                describe_all(then_exprs).join(", ")
            ),
            NodeKind::CondExpression { clauses } => format!(
                "a conditional expression with {}: {}",
                pluralize("condition", clauses.len()),
                describe_all(clauses).join(", ")
            ),
            NodeKind::IfExpression {
                test_expr,
                then_expr,
                else_expr,
            } => format!(
                "an if expression: if {}, then {} else {}",
                describe(*test_expr),
                describe(*then_expr),
                describe(*else_expr)
            ),
            NodeKind::Sequence { exprs, .. } => {
                format!("a sequence containing {}", enumerate_list(&describe_all(exprs)))
            },
            NodeKind::LetLikeExpr { form, bindings, .. } => format!(
                "a {form} expression with {}",
                pluralize("binding", self.children(*bindings).count())
            ),
            NodeKind::WhenUnless {
                form,
                predicate,
                exprs,
            } => format!(
                "a {form} expression: {form} {}, {}",
                describe(*predicate),
                describe(*exprs)
            ),
            NodeKind::Binop { op, left, right } => format!(
                "a {op} expression with {} and {}",
                describe(*left),
                describe(*right)
            ),
            NodeKind::Bind { id, ann } => {
                format!("a bind expression with {id} and {}", self.source(*ann))
            },
            NodeKind::Func { name, args, body, .. } => format!(
                "a func expression with {name}, {} and {}",
                pluralize("argument", args.len()),
                describe(*body)
            ),
            NodeKind::Sekwence { exprs, .. } => {
                format!("a sequence containing {}", enumerate_list(&describe_all(exprs)))
            },
            NodeKind::Var { id, rhs } => {
                format!("a var setting {} to {}", self.source(*id), self.source(*rhs))
            },
            NodeKind::Assign { id, rhs } => {
                format!("an assign setting {} to {}", self.source(*id), self.source(*rhs))
            },
            NodeKind::Let { id, rhs } => {
                format!("a let setting {} to {}", self.source(*id), self.source(*rhs))
            },
            NodeKind::ABlank => "a blank expression".to_string(),
            NodeKind::FunctionApp { .. }
            | NodeKind::Literal { .. }
            | NodeKind::Comment { .. }
            | NodeKind::Blank { .. } => self.label(id),
        }
    }
}

//! Lowers read data into AST nodes
//!
//! Special forms are recognised by their head symbol; every other list is an application.
//! Each node gets an accessible label when it is built. Line comments are attached to the
//! datum that follows them, or to the previous sibling when nothing follows. Comments after
//! the last top-level form become comment roots.

use crate::{
    lexer::tokenize,
    reader::{Datum, Item, read},
};
use blocks_ast::{
    AttachedComment, Builder, DEFAULT_DESCRIPTION_DEPTH, Node, NodeId, NodeKind, NodeOptions,
    ParseError, Parser, Position, Span, Tree,
};
use compact_str::{CompactString, format_compact};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Parser for a small Scheme dialect
#[derive(Debug, Clone, Copy)]
pub struct SchemeParser {
    description_depth: u32,
}

impl SchemeParser {
    pub fn new() -> Self {
        Self {
            description_depth: DEFAULT_DESCRIPTION_DEPTH,
        }
    }

    /// Description cutoff for the trees this parser produces
    pub fn with_description_depth(mut self, depth: u32) -> Self {
        self.description_depth = depth;
        self
    }
}

impl Default for SchemeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for SchemeParser {
    fn parse(&self, text: &str) -> Result<Tree, ParseError> {
        let items = read(tokenize(text)?)?;

        let mut comments = FxHashMap::default();
        let mut trailing = None;
        plan_comments(&items, None, &mut comments, &mut trailing);

        let mut lower = Lower {
            builder: Builder::new().description_depth(self.description_depth),
            comments,
        };

        let mut roots = Vec::new();
        for item in &items {
            if let Item::Datum(datum) = item {
                let root = lower.datum(datum)?;
                lower.attach_leftovers(root, datum.span());
                roots.push(root);
            }
        }

        if let Some(comment) = trailing {
            let kind = NodeKind::Comment {
                comment: comment.text.clone(),
            };
            let label = NodeOptions::labelled(comment.text.clone());
            roots.push(lower.builder.node(comment.span, kind, label));
        }

        let tree = lower.builder.finish(roots);
        debug!(roots = tree.roots().len(), nodes = tree.len(), hash = %tree.hash(), "parsed");
        Ok(tree)
    }
}

/// Comments waiting for a node, keyed by the start of the datum they belong to
type CommentPlan = FxHashMap<Position, Option<AttachedComment>>;

fn merge(first: AttachedComment, second: AttachedComment) -> AttachedComment {
    AttachedComment {
        span: first.span.union(&second.span),
        text: format_compact!("{}\n{}", first.text, second.text),
    }
}

fn push_comment(slot: &mut Option<AttachedComment>, comment: AttachedComment) {
    *slot = Some(match slot.take() {
        Some(existing) => merge(existing, comment),
        None => comment,
    });
}

/// Decide which datum each comment belongs to, keyed by the datum's start
///
/// `enclosing` is the span of the list being walked, `None` at the top level. Top-level
/// comments with no datum after them end up in `trailing`.
fn plan_comments(
    items: &[Item],
    enclosing: Option<Span>,
    out: &mut CommentPlan,
    trailing: &mut Option<AttachedComment>,
) {
    let mut pending: Option<AttachedComment> = None;
    let mut last: Option<Position> = None;

    for item in items {
        match item {
            Item::Comment { text, span } => push_comment(
                &mut pending,
                AttachedComment {
                    span: *span,
                    text: text.as_str().into(),
                },
            ),
            Item::Datum(datum) => {
                let start = datum.span().from;
                if let Some(comment) = pending.take() {
                    push_comment(out.entry(start).or_insert(None), comment);
                }
                last = Some(start);
                if let Datum::List { items, span } = datum {
                    plan_comments(items, Some(*span), out, trailing);
                }
            },
        }
    }

    let Some(comment) = pending else {
        return;
    };
    match (enclosing, last) {
        (None, _) => push_comment(trailing, comment),
        (Some(_), Some(last)) => push_comment(out.entry(last).or_insert(None), comment),
        (Some(list), None) => push_comment(out.entry(list.from).or_insert(None), comment),
    }
}

fn malformed(span: Span, form: &str) -> ParseError {
    ParseError::at(span.from, format!("malformed {form} expression"))
}

fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') || unsigned == "." {
        return false;
    }
    match unsigned.split_once('/') {
        Some((num, den)) => num.parse::<u64>().is_ok() && den.parse::<u64>().is_ok(),
        None => unsigned.parse::<f64>().is_ok(),
    }
}

fn plural(count: usize, noun: &str) -> CompactString {
    let suffix = if count == 1 { "" } else { "s" };
    format_compact!("{count} {noun}{suffix}")
}

struct Lower {
    builder: Builder,
    comments: CommentPlan,
}

impl Lower {
    fn node(&mut self, span: Span, kind: NodeKind, label: impl Into<CompactString>) -> NodeId {
        let id = self.builder.node(span, kind, NodeOptions::labelled(label));
        if let Some(Some(comment)) = self.comments.remove(&span.from) {
            self.attach(id, comment);
        }
        id
    }

    fn attach(&mut self, id: NodeId, comment: AttachedComment) {
        let merged = match self.builder.get(id).and_then(Node::comment) {
            Some(existing) => merge(existing.clone(), comment),
            None => comment,
        };
        self.builder.attach_comment(id, merged);
    }

    /// Comments whose datum never became a node go to the root that contains them
    fn attach_leftovers(&mut self, root: NodeId, span: Span) {
        let mut inside: Vec<Position> = self
            .comments
            .keys()
            .copied()
            .filter(|pos| span.from <= *pos && *pos <= span.to)
            .collect();
        inside.sort();
        for pos in inside {
            if let Some(Some(comment)) = self.comments.remove(&pos) {
                self.attach(root, comment);
            }
        }
    }

    fn datum(&mut self, datum: &Datum) -> Result<NodeId, ParseError> {
        match datum {
            Datum::Atom { text, span } => Ok(self.atom(text, *span)),
            Datum::Str { text, span } => {
                let kind = NodeKind::Literal {
                    value: text.as_str().into(),
                    data_type: "string".into(),
                };
                Ok(self.node(*span, kind, text.as_str()))
            },
            Datum::List { items, span } => {
                let elems = data(items);
                self.list(&elems, *span)
            },
        }
    }

    fn atom(&mut self, text: &str, span: Span) -> NodeId {
        if text == "..." {
            let kind = NodeKind::Blank {
                value: text.into(),
                data_type: "blank".into(),
            };
            return self.node(span, kind, "blank");
        }

        let data_type = match text {
            "#t" | "#f" | "#true" | "#false" | "true" | "false" => "boolean",
            _ if is_number(text) => "number",
            _ => "symbol",
        };
        let kind = NodeKind::Literal {
            value: text.into(),
            data_type: data_type.into(),
        };
        self.node(span, kind, text)
    }

    fn list(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let Some(head) = elems.first() else {
            return Ok(self.node(span, NodeKind::Unknown { elts: Vec::new() }, "empty list"));
        };

        match head.as_atom() {
            Some("define") => self.define(elems, span),
            Some("define-struct") => self.define_struct(elems, span),
            Some("lambda" | "λ") => self.lambda(elems, span),
            Some("if") => self.if_expr(elems, span),
            Some("cond") => self.cond(elems, span),
            Some(form @ ("let" | "let*" | "letrec")) => self.let_like(form, elems, span),
            Some(form @ ("when" | "unless")) => self.when_unless(form, elems, span),
            Some("begin") => self.begin(elems, span),
            _ => self.application(elems, span),
        }
    }

    /// Identifier list from a bracketed list of symbols
    fn identifiers(
        &mut self,
        kind: &str,
        elems: &[&Datum],
        span: Span,
        form: &str,
    ) -> Result<NodeId, ParseError> {
        let mut ids = Vec::with_capacity(elems.len());
        let mut names = Vec::with_capacity(elems.len());
        for elem in elems {
            let name = elem.as_atom().ok_or_else(|| malformed(elem.span(), form))?;
            names.push(name);
            ids.push(self.atom(name, elem.span()));
        }
        let label = if names.is_empty() {
            format_compact!("no {kind}")
        } else {
            format_compact!("{kind}: {}", names.join(", "))
        };
        let kind = NodeKind::IdentifierList {
            kind: kind.into(),
            ids,
        };
        Ok(self.node(span, kind, label))
    }

    fn define(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, target, body] = elems else {
            return Err(malformed(span, "define"));
        };

        match target {
            Datum::Atom { text, span: name_span } => {
                let name = self.atom(text, *name_span);
                let body = self.datum(body)?;
                let kind = NodeKind::VariableDefinition { name, body };
                Ok(self.node(span, kind, format_compact!("define {text}")))
            },
            Datum::List { items, .. } => {
                let header = data(items);
                let Some((Datum::Atom { text, span: name_span }, params)) = header.split_first()
                else {
                    return Err(malformed(span, "define"));
                };

                let name = self.atom(text, *name_span);
                let params_span = match (params.first(), params.last()) {
                    (Some(first), Some(last)) => first.span().union(&last.span()),
                    _ => Span::empty(name_span.to),
                };
                let params = self.identifiers("parameters", params, params_span, "define")?;
                let body = self.datum(body)?;
                let kind = NodeKind::FunctionDefinition { name, params, body };
                Ok(self.node(span, kind, format_compact!("define {text}")))
            },
            Datum::Str { .. } => Err(malformed(span, "define")),
        }
    }

    fn define_struct(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, Datum::Atom { text, span: name_span }, Datum::List { items, span: fields_span }] =
            elems
        else {
            return Err(malformed(span, "define-struct"));
        };

        let name = self.atom(text, *name_span);
        let fields = data(items);
        let fields = self.identifiers("fields", &fields, *fields_span, "define-struct")?;
        let kind = NodeKind::StructDefinition { name, fields };
        Ok(self.node(span, kind, format_compact!("define-struct {text}")))
    }

    fn lambda(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, Datum::List { items, span: args_span }, body] = elems else {
            return Err(malformed(span, "lambda"));
        };

        let args = self.identifiers("parameters", &data(items), *args_span, "lambda")?;
        let body = self.datum(body)?;
        let kind = NodeKind::LambdaExpression { args, body };
        Ok(self.node(span, kind, "lambda expression"))
    }

    fn if_expr(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, test, then, otherwise] = elems else {
            return Err(malformed(span, "if"));
        };

        let kind = NodeKind::IfExpression {
            test_expr: self.datum(test)?,
            then_expr: self.datum(then)?,
            else_expr: self.datum(otherwise)?,
        };
        Ok(self.node(span, kind, "if expression"))
    }

    fn cond(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        if elems.len() < 2 {
            return Err(malformed(span, "cond"));
        }

        let mut clauses = Vec::with_capacity(elems.len() - 1);
        for clause in &elems[1..] {
            let Datum::List {
                items,
                span: clause_span,
            } = clause
            else {
                return Err(malformed(clause.span(), "cond"));
            };
            let parts = data(items);
            let [test, thens @ ..] = parts.as_slice() else {
                return Err(malformed(*clause_span, "cond"));
            };
            if thens.is_empty() {
                return Err(malformed(*clause_span, "cond"));
            }

            let test_expr = self.datum(test)?;
            let then_exprs = thens
                .iter()
                .map(|then| self.datum(then))
                .collect::<Result<Vec<_>, _>>()?;
            let kind = NodeKind::CondClause {
                test_expr,
                then_exprs,
            };
            clauses.push(self.node(*clause_span, kind, "condition"));
        }

        let label = format_compact!("cond expression with {}", plural(clauses.len(), "condition"));
        Ok(self.node(span, NodeKind::CondExpression { clauses }, label))
    }

    fn let_like(&mut self, form: &str, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, Datum::List {
            items,
            span: bindings_span,
        }, body] = elems
        else {
            return Err(malformed(span, form));
        };

        let mut exprs = Vec::new();
        for binding in data(items) {
            let Datum::List {
                items,
                span: binding_span,
            } = binding
            else {
                return Err(malformed(binding.span(), form));
            };
            let parts = data(items);
            let [Datum::Atom { text, span: name_span }, value] = parts.as_slice() else {
                return Err(malformed(*binding_span, form));
            };

            let name = self.atom(text, *name_span);
            let body = self.datum(value)?;
            let kind = NodeKind::VariableDefinition { name, body };
            exprs.push(self.node(*binding_span, kind, format_compact!("bind {text}")));
        }

        let label = plural(exprs.len(), "binding");
        let bindings = self.node(
            *bindings_span,
            NodeKind::Sequence {
                name: "bindings".into(),
                exprs,
            },
            label,
        );
        let expr = self.datum(body)?;
        let kind = NodeKind::LetLikeExpr {
            form: form.into(),
            bindings,
            expr,
        };
        Ok(self.node(span, kind, format_compact!("{form} expression")))
    }

    fn when_unless(&mut self, form: &str, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let [_, predicate, body @ ..] = elems else {
            return Err(malformed(span, form));
        };
        let (Some(first), Some(last)) = (body.first(), body.last()) else {
            return Err(malformed(span, form));
        };

        let predicate = self.datum(predicate)?;
        let body_span = first.span().union(&last.span());
        let exprs = body
            .iter()
            .map(|expr| self.datum(expr))
            .collect::<Result<Vec<_>, _>>()?;
        let label = plural(exprs.len(), "expression");
        let exprs = self.node(
            body_span,
            NodeKind::Sequence {
                name: "begin".into(),
                exprs,
            },
            label,
        );
        let kind = NodeKind::WhenUnless {
            form: form.into(),
            predicate,
            exprs,
        };
        Ok(self.node(span, kind, format_compact!("{form} expression")))
    }

    fn begin(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        if elems.len() < 2 {
            return Err(malformed(span, "begin"));
        }

        let exprs = elems[1..]
            .iter()
            .map(|expr| self.datum(expr))
            .collect::<Result<Vec<_>, _>>()?;
        let kind = NodeKind::Sequence {
            name: "begin".into(),
            exprs,
        };
        Ok(self.node(span, kind, "begin expression"))
    }

    fn application(&mut self, elems: &[&Datum], span: Span) -> Result<NodeId, ParseError> {
        let Some((head, rest)) = elems.split_first() else {
            return Err(malformed(span, "application"));
        };

        let label = match head.as_atom() {
            Some(name) => format_compact!("{name} expression"),
            None => CompactString::from("expression"),
        };
        let func = self.datum(head)?;
        let args = rest
            .iter()
            .map(|arg| self.datum(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.node(span, NodeKind::FunctionApp { func, args }, label))
    }
}

/// The data in a list, without its comments
fn data(items: &[Item]) -> Vec<&Datum> {
    items
        .iter()
        .filter_map(|item| match item {
            Item::Datum(datum) => Some(datum),
            Item::Comment { .. } => None,
        })
        .collect()
}

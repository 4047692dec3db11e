//! Node variants and their declared child fields

use crate::arena::NodeId;
use compact_str::CompactString;
use smallvec::{SmallVec, smallvec};

/// The contents of one declared child field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// A single child, or `None` for an optional child that is absent
    One(Option<&'a NodeId>),
    /// An ordered sequence of children
    Many(&'a [NodeId]),
}

impl<'a> Field<'a> {
    /// The children held by this field, in order
    pub fn nodes(&self) -> &'a [NodeId] {
        match self {
            Field::One(Some(id)) => std::slice::from_ref(id),
            Field::One(None) => &[],
            Field::Many(ids) => ids,
        }
    }
}

/// Declared fields of a node, in declaration order
pub type Fields<'a> = SmallVec<[(&'static str, Field<'a>); 4]>;

/// One case per syntactic form
///
/// Child-bearing payloads hold [`NodeId`]s into the owning tree's arena. Scalar payloads are
/// stored inline and take part in the content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A form the parser recognised as a list but could not classify
    Unknown { elts: Vec<NodeId> },
    FunctionApp { func: NodeId, args: Vec<NodeId> },
    IdentifierList { kind: CompactString, ids: Vec<NodeId> },
    StructDefinition { name: NodeId, fields: NodeId },
    VariableDefinition { name: NodeId, body: NodeId },
    LambdaExpression { args: NodeId, body: NodeId },
    FunctionDefinition { name: NodeId, params: NodeId, body: NodeId },
    CondClause { test_expr: NodeId, then_exprs: Vec<NodeId> },
    CondExpression { clauses: Vec<NodeId> },
    IfExpression { test_expr: NodeId, then_expr: NodeId, else_expr: NodeId },
    Literal { value: CompactString, data_type: CompactString },
    Comment { comment: CompactString },
    Blank { value: CompactString, data_type: CompactString },
    Sequence { name: CompactString, exprs: Vec<NodeId> },

    // Language extensions
    LetLikeExpr { form: CompactString, bindings: NodeId, expr: NodeId },
    WhenUnless { form: CompactString, predicate: NodeId, exprs: NodeId },
    Binop { op: CompactString, left: NodeId, right: NodeId },
    ABlank,
    Bind { id: CompactString, ann: NodeId },
    Func {
        name: CompactString,
        args: Vec<NodeId>,
        ret_ann: Option<NodeId>,
        doc: CompactString,
        body: NodeId,
    },
    Sekwence { name: CompactString, exprs: Vec<NodeId> },
    Var { id: NodeId, rhs: NodeId },
    Assign { id: NodeId, rhs: NodeId },
    Let { id: NodeId, rhs: NodeId },
}

impl NodeKind {
    /// Stable tag identifying the variant
    ///
    /// This is what the content hash uses for the kind, so it must never change for an
    /// existing variant.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Unknown { .. } => "unknown",
            NodeKind::FunctionApp { .. } => "functionApp",
            NodeKind::IdentifierList { .. } => "identifierList",
            NodeKind::StructDefinition { .. } => "structDefinition",
            NodeKind::VariableDefinition { .. } => "variableDefinition",
            NodeKind::LambdaExpression { .. } => "lambdaExpression",
            NodeKind::FunctionDefinition { .. } => "functionDefinition",
            NodeKind::CondClause { .. } => "condClause",
            NodeKind::CondExpression { .. } => "condExpression",
            NodeKind::IfExpression { .. } => "ifExpression",
            NodeKind::Literal { .. } => "literal",
            NodeKind::Comment { .. } => "comment",
            NodeKind::Blank { .. } => "blank",
            NodeKind::Sequence { .. } => "sequence",
            NodeKind::LetLikeExpr { .. } => "letLikeExpr",
            NodeKind::WhenUnless { .. } => "whenUnlessExpr",
            NodeKind::Binop { .. } => "binop",
            NodeKind::ABlank => "a-blank",
            NodeKind::Bind { .. } => "bind",
            NodeKind::Func { .. } => "func",
            NodeKind::Sekwence { .. } => "sekwence",
            NodeKind::Var { .. } => "var",
            NodeKind::Assign { .. } => "assign",
            NodeKind::Let { .. } => "let",
        }
    }

    /// Human-readable name, used when a node carries no label
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Unknown { .. } => "unknown expression",
            NodeKind::FunctionApp { .. } => "function application",
            NodeKind::IdentifierList { .. } => "identifier list",
            NodeKind::StructDefinition { .. } => "structure definition",
            NodeKind::VariableDefinition { .. } => "variable definition",
            NodeKind::LambdaExpression { .. } => "anonymous function",
            NodeKind::FunctionDefinition { .. } => "function definition",
            NodeKind::CondClause { .. } => "condition",
            NodeKind::CondExpression { .. } => "conditional expression",
            NodeKind::IfExpression { .. } => "if expression",
            NodeKind::Literal { .. } => "literal",
            NodeKind::Comment { .. } => "comment",
            NodeKind::Blank { .. } => "blank",
            NodeKind::Sequence { .. } => "sequence",
            NodeKind::LetLikeExpr { .. } => "let expression",
            NodeKind::WhenUnless { .. } => "when expression",
            NodeKind::Binop { .. } => "binary operation",
            NodeKind::ABlank => "blank annotation",
            NodeKind::Bind { .. } => "binding",
            NodeKind::Func { .. } => "function",
            NodeKind::Sekwence { .. } => "block",
            NodeKind::Var { .. } => "variable",
            NodeKind::Assign { .. } => "assignment",
            NodeKind::Let { .. } => "let binding",
        }
    }

    /// The declared child fields, in declaration order
    ///
    /// Generic traversal, hashing and reconciliation all go through this list, so a variant's
    /// children are exactly the nodes reachable from its fields.
    pub fn fields(&self) -> Fields<'_> {
        match self {
            NodeKind::Unknown { elts } => smallvec![("elts", Field::Many(elts))],
            NodeKind::FunctionApp { func, args } => {
                smallvec![("func", Field::One(Some(func))), ("args", Field::Many(args))]
            },
            NodeKind::IdentifierList { ids, .. } => smallvec![("ids", Field::Many(ids))],
            NodeKind::StructDefinition { name, fields } => smallvec![
                ("name", Field::One(Some(name))),
                ("fields", Field::One(Some(fields))),
            ],
            NodeKind::VariableDefinition { name, body } => smallvec![
                ("name", Field::One(Some(name))),
                ("body", Field::One(Some(body))),
            ],
            NodeKind::LambdaExpression { args, body } => smallvec![
                ("args", Field::One(Some(args))),
                ("body", Field::One(Some(body))),
            ],
            NodeKind::FunctionDefinition { name, params, body } => smallvec![
                ("name", Field::One(Some(name))),
                ("params", Field::One(Some(params))),
                ("body", Field::One(Some(body))),
            ],
            NodeKind::CondClause {
                test_expr,
                then_exprs,
            } => smallvec![
                ("testExpr", Field::One(Some(test_expr))),
                ("thenExprs", Field::Many(then_exprs)),
            ],
            NodeKind::CondExpression { clauses } => smallvec![("clauses", Field::Many(clauses))],
            NodeKind::IfExpression {
                test_expr,
                then_expr,
                else_expr,
            } => smallvec![
                ("testExpr", Field::One(Some(test_expr))),
                ("thenExpr", Field::One(Some(then_expr))),
                ("elseExpr", Field::One(Some(else_expr))),
            ],
            NodeKind::Literal { .. }
            | NodeKind::Comment { .. }
            | NodeKind::Blank { .. }
            | NodeKind::ABlank => SmallVec::new(),
            NodeKind::Sequence { exprs, .. } | NodeKind::Sekwence { exprs, .. } => {
                smallvec![("exprs", Field::Many(exprs))]
            },
            NodeKind::LetLikeExpr { bindings, expr, .. } => smallvec![
                ("bindings", Field::One(Some(bindings))),
                ("expr", Field::One(Some(expr))),
            ],
            NodeKind::WhenUnless {
                predicate, exprs, ..
            } => smallvec![
                ("predicate", Field::One(Some(predicate))),
                ("exprs", Field::One(Some(exprs))),
            ],
            NodeKind::Binop { left, right, .. } => smallvec![
                ("left", Field::One(Some(left))),
                ("right", Field::One(Some(right))),
            ],
            NodeKind::Bind { ann, .. } => smallvec![("ann", Field::One(Some(ann)))],
            NodeKind::Func {
                args,
                ret_ann,
                body,
                ..
            } => smallvec![
                ("args", Field::Many(args)),
                ("retAnn", Field::One(ret_ann.as_ref())),
                ("body", Field::One(Some(body))),
            ],
            NodeKind::Var { id, rhs } | NodeKind::Assign { id, rhs } | NodeKind::Let { id, rhs } => {
                smallvec![("id", Field::One(Some(id))), ("rhs", Field::One(Some(rhs)))]
            },
        }
    }

    /// Scalar payload that takes part in the content hash, in a fixed order
    pub(crate) fn scalars(&self) -> SmallVec<[&str; 2]> {
        match self {
            NodeKind::IdentifierList { kind, .. } => smallvec![kind.as_str()],
            NodeKind::Literal { value, data_type } | NodeKind::Blank { value, data_type } => {
                smallvec![value.as_str(), data_type.as_str()]
            },
            NodeKind::Comment { comment } => smallvec![comment.as_str()],
            NodeKind::Sequence { name, .. } | NodeKind::Sekwence { name, .. } => {
                smallvec![name.as_str()]
            },
            NodeKind::LetLikeExpr { form, .. } | NodeKind::WhenUnless { form, .. } => {
                smallvec![form.as_str()]
            },
            NodeKind::Binop { op, .. } => smallvec![op.as_str()],
            NodeKind::Bind { id, .. } => smallvec![id.as_str()],
            NodeKind::Func { name, doc, .. } => smallvec![name.as_str(), doc.as_str()],
            _ => SmallVec::new(),
        }
    }

    /// Whether this variant can never hold children
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal { .. } | NodeKind::Comment { .. } | NodeKind::Blank { .. } | NodeKind::ABlank
        )
    }
}

//! Test utilities for reducing boilerplate in AST tests

use crate::{Builder, NodeId, NodeKind, NodeOptions, Position, Span, Tree};

/// Lays out s-expressions on a grid while building them, so spans stay consistent
///
/// Atoms are followed by a single space; a list's closing paren takes the place of the space
/// after its last element. `newline` starts the next root on a fresh line.
pub(crate) struct Layout {
    builder: Builder,
    line: u32,
    column: u32,
    roots: Vec<NodeId>,
}

impl Layout {
    pub(crate) fn new() -> Self {
        Self {
            builder: Builder::new(),
            line: 0,
            column: 0,
            roots: Vec::new(),
        }
    }

    fn span(&self, from: u32, to: u32) -> Span {
        Span::new(Position::new(self.line, from), Position::new(self.line, to))
    }

    pub(crate) fn atom(&mut self, text: &str) -> NodeId {
        let from = self.column;
        let to = from + text.chars().count() as u32;
        self.column = to + 1;
        let data_type = if text.parse::<f64>().is_ok() { "number" } else { "symbol" };
        let span = self.span(from, to);
        self.builder.literal(span, text, data_type)
    }

    /// Lay out a parenthesised list and build `kind` from the ids of its elements
    pub(crate) fn list(
        &mut self,
        label: &str,
        elements: impl FnOnce(&mut Self) -> NodeKind,
    ) -> NodeId {
        let from = self.column;
        self.column += 1;
        let before = self.column;
        let kind = elements(self);
        let to = if self.column == before { before + 1 } else { self.column };
        self.column = to + 1;
        let span = self.span(from, to);
        self.builder.node(span, kind, NodeOptions::labelled(label))
    }

    /// `(func args...)`
    pub(crate) fn app(&mut self, func: &str, args: &[&str]) -> NodeId {
        self.list(&format!("{func} expression"), |layout| {
            let func = layout.atom(func);
            let args = args.iter().map(|arg| layout.atom(arg)).collect();
            NodeKind::FunctionApp { func, args }
        })
    }

    pub(crate) fn root(&mut self, id: NodeId) -> NodeId {
        self.roots.push(id);
        id
    }

    pub(crate) fn newline(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    pub(crate) fn finish(self) -> Tree {
        self.builder.finish(self.roots)
    }
}

/// `(+ 1 2)` as a single root
pub(crate) fn plus_one_two() -> Tree {
    let mut layout = Layout::new();
    let app = layout.app("+", &["1", "2"]);
    layout.root(app);
    layout.finish()
}

/// Scalar payloads of [`pyret_function`]
pub(crate) struct FuncShape<'a> {
    pub(crate) name: &'a str,
    pub(crate) doc: &'a str,
    pub(crate) param: &'a str,
    pub(crate) op: &'a str,
}

impl Default for FuncShape<'_> {
    fn default() -> Self {
        Self {
            name: "add",
            doc: "",
            param: "a",
            op: "+",
        }
    }
}

/// `fun add(a :: Number, b) -> Number: block: var t = a + b t := 1 y = t end end`
///
/// Spans are placeholders; the tree is for exercising the extension variants.
pub(crate) fn pyret_function(shape: &FuncShape<'_>) -> Tree {
    let mut column = 0;
    let mut at = || {
        column += 1;
        Span::empty(Position::new(0, column))
    };
    let mut b = Builder::new();

    let number = b.literal(at(), "Number", "symbol");
    let bind_a = b.node(
        at(),
        NodeKind::Bind {
            id: shape.param.into(),
            ann: number,
        },
        NodeOptions::labelled(format!("bind {}", shape.param)),
    );
    let blank = b.node(at(), NodeKind::ABlank, NodeOptions::default());
    let bind_b = b.node(
        at(),
        NodeKind::Bind {
            id: "b".into(),
            ann: blank,
        },
        NodeOptions::labelled("bind b"),
    );

    let left = b.literal(at(), "a", "symbol");
    let right = b.literal(at(), "b", "symbol");
    let sum = b.node(
        at(),
        NodeKind::Binop {
            op: shape.op.into(),
            left,
            right,
        },
        NodeOptions::labelled(format!("{} expression", shape.op)),
    );
    let t = b.literal(at(), "t", "symbol");
    let var = b.node(at(), NodeKind::Var { id: t, rhs: sum }, NodeOptions::labelled("var t"));

    let t = b.literal(at(), "t", "symbol");
    let one = b.literal(at(), "1", "number");
    let assign = b.node(
        at(),
        NodeKind::Assign { id: t, rhs: one },
        NodeOptions::labelled("assign t"),
    );

    let y = b.literal(at(), "y", "symbol");
    let t = b.literal(at(), "t", "symbol");
    let let_ = b.node(at(), NodeKind::Let { id: y, rhs: t }, NodeOptions::labelled("let y"));

    let block = b.node(
        at(),
        NodeKind::Sekwence {
            name: "block".into(),
            exprs: vec![var, assign, let_],
        },
        NodeOptions::labelled("block"),
    );
    let ret = b.literal(at(), "Number", "symbol");
    let func = b.node(
        at(),
        NodeKind::Func {
            name: shape.name.into(),
            args: vec![bind_a, bind_b],
            ret_ann: Some(ret),
            doc: shape.doc.into(),
            body: block,
        },
        NodeOptions::labelled(format!("fun {}", shape.name)),
    );
    b.finish(vec![func])
}

/// Assert that a node has a specific variant
#[macro_export]
macro_rules! assert_kind {
    ($tree:expr, $id:expr, $expected:pat) => {
        assert!(
            matches!($tree[$id].kind(), $expected),
            "Expected {} but got {:?}",
            stringify!($expected),
            $tree[$id].kind()
        );
    };
}

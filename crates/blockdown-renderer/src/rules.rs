//! Conversion rules keyed by markdown construct.
//!
//! A rule decides what tree node a markdown construct becomes. Rules come in
//! three shapes: a literal value attached as-is, a function of the construct's
//! argument payload, or a function that also receives the build's [`RootCtx`]
//! to reach back into the root document (set a title, append head entries).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use blockdown_tree::RootCtx;
use serde_json::Value;

/// Markdown block construct a rule can be registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Heading,
    Paragraph,
    CodeBlock,
    Blockquote,
    List,
    ListItem,
    Html,
    Hr,
    Table,
    TableRow,
    TableCell,
}

/// Argument payload handed to a rule, one variant per [`NodeKind`].
///
/// Inline content arrives pre-rendered: `text` fields hold escaped inline
/// HTML, `raw` the plain text without markup. Container variants carry their
/// already-converted children as tree values.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeArgs {
    Heading {
        /// Rendered inline HTML of the heading.
        text: String,
        /// Heading level (1-6).
        level: u8,
        /// Plain text without inline markup.
        raw: String,
    },
    Paragraph {
        text: String,
    },
    CodeBlock {
        code: String,
        language: Option<String>,
    },
    Blockquote {
        content: Vec<Value>,
    },
    List {
        items: Vec<Value>,
        ordered: bool,
        /// Start number of an ordered list, when not 1.
        start: Option<u64>,
    },
    ListItem {
        content: Vec<Value>,
    },
    Html {
        html: String,
    },
    Hr,
    Table {
        head: Vec<Value>,
        body: Vec<Value>,
    },
    TableRow {
        cells: Vec<Value>,
    },
    TableCell {
        text: String,
        header: bool,
        /// Column alignment: "left", "center" or "right".
        align: Option<String>,
    },
}

impl NodeArgs {
    /// The kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Heading { .. } => NodeKind::Heading,
            Self::Paragraph { .. } => NodeKind::Paragraph,
            Self::CodeBlock { .. } => NodeKind::CodeBlock,
            Self::Blockquote { .. } => NodeKind::Blockquote,
            Self::List { .. } => NodeKind::List,
            Self::ListItem { .. } => NodeKind::ListItem,
            Self::Html { .. } => NodeKind::Html,
            Self::Hr => NodeKind::Hr,
            Self::Table { .. } => NodeKind::Table,
            Self::TableRow { .. } => NodeKind::TableRow,
            Self::TableCell { .. } => NodeKind::TableCell,
        }
    }
}

/// Function rule signature.
pub type PlainRuleFn = dyn Fn(&NodeArgs) -> Value + Send + Sync;

/// Context-taking function rule signature.
pub type CtxRuleFn = dyn Fn(&NodeArgs, &mut RootCtx) -> Value + Send + Sync;

/// A conversion rule for one node kind.
#[derive(Clone)]
pub enum Rule {
    /// Fixed tree value, attached unmodified.
    Literal(Value),
    /// Node computed from the argument payload.
    Plain(Arc<PlainRuleFn>),
    /// Node computed from the payload plus the root context.
    WithCtx(Arc<CtxRuleFn>),
}

impl Rule {
    /// Rule computing the node from the payload.
    pub fn plain(rule: impl Fn(&NodeArgs) -> Value + Send + Sync + 'static) -> Self {
        Self::Plain(Arc::new(rule))
    }

    /// Rule receiving the payload and, as trailing argument, the context.
    pub fn with_ctx(
        rule: impl Fn(&NodeArgs, &mut RootCtx) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::WithCtx(Arc::new(rule))
    }

    /// Apply the rule to one converted construct.
    ///
    /// Literal values pass through untouched. Function rules receive the
    /// payload exactly as the converter built it; `WithCtx` rules get the
    /// context appended after it.
    #[must_use]
    pub fn apply(&self, args: &NodeArgs, ctx: &mut RootCtx) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Plain(rule) => rule(args),
            Self::WithCtx(rule) => rule(args, ctx),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Plain(_) => f.write_str("Plain(..)"),
            Self::WithCtx(_) => f.write_str("WithCtx(..)"),
        }
    }
}

impl From<Value> for Rule {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

/// Registry of conversion rules keyed by node kind.
///
/// Cloning shares the underlying closures, so a per-build clone is cheap and
/// rules installed on the clone never leak into other builds.
#[derive(Clone, Debug, Default)]
pub struct Rules {
    rules: HashMap<NodeKind, Rule>,
}

impl Rules {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any previous one for the kind.
    pub fn insert(&mut self, kind: NodeKind, rule: Rule) {
        self.rules.insert(kind, rule);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, kind: NodeKind, rule: Rule) -> Self {
        self.insert(kind, rule);
        self
    }

    /// The rule registered for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: NodeKind) -> Option<&Rule> {
        self.rules.get(&kind)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

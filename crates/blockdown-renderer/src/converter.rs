//! Markdown to block tree conversion.
//!
//! # Architecture
//!
//! The converter walks pulldown-cmark events with a state machine:
//! - `InlineState`: dual buffers, rendered inline HTML plus plain text
//! - `CodeCapture`: language and content buffering for code blocks
//! - `ImageCapture`: alt text capture while inside image tags
//! - `TableCapture`: header/body rows, alignments, current cell index
//! - `Container` stack: open blockquotes, lists and items collecting
//!   already-converted child nodes
//!
//! Each completed block construct becomes one tree node by applying the
//! rule registered for its kind, falling back to the default rendition.
//! Inline constructs render into the HTML buffer and reach rules as the
//! `text` of their enclosing block.

use std::fmt::Write;

use blockdown_tree::RootCtx;
use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use serde_json::{Value, json};

use crate::rules::{NodeArgs, NodeKind, Rule, Rules};
use crate::util::escape_html;

/// Conversion options.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Block name wrapping the converted nodes; `None` leaves the bare
    /// sequence.
    pub wrapper: Option<String>,
    /// Rules applied per construct.
    pub rules: Rules,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            wrapper: Some("content".to_owned()),
            rules: Rules::new(),
        }
    }
}

/// Converts markdown text into a block document subtree.
///
/// Tables, strikethrough and task lists are enabled. Conversion never
/// fails: rules produce values, and recoverable issues surface as
/// warnings on the [`RootCtx`].
#[derive(Clone, Debug, Default)]
pub struct MarkdownConverter {
    options: ConvertOptions,
}

impl MarkdownConverter {
    /// Create a converter with the given options.
    #[must_use]
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// The options the converter was built with.
    #[must_use]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert markdown into a tree node, applying rules against `ctx`.
    #[must_use]
    pub fn convert(&self, markdown: &str, ctx: &mut RootCtx) -> Value {
        let parser = Parser::new_ext(
            markdown,
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
        );
        let mut conversion = Conversion::new(&self.options.rules, ctx);
        for event in parser {
            conversion.process_event(event);
        }
        let nodes = conversion.finish();
        match &self.options.wrapper {
            Some(block) => json!({ "block": block, "content": nodes }),
            None => Value::Array(nodes),
        }
    }
}

/// Dual inline buffers: rendered HTML and plain text.
#[derive(Default)]
struct InlineState {
    html: String,
    text: String,
}

impl InlineState {
    fn push(&mut self, html: &str, text: &str) {
        self.html.push_str(html);
        self.text.push_str(text);
    }

    fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    fn take(&mut self) -> (String, String) {
        (
            std::mem::take(&mut self.html),
            std::mem::take(&mut self.text),
        )
    }

    fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Code block capture.
#[derive(Default)]
struct CodeCapture {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeCapture {
    fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    fn finish(&mut self) -> NodeArgs {
        self.active = false;
        NodeArgs::CodeBlock {
            code: std::mem::take(&mut self.buffer),
            language: self.language.take(),
        }
    }
}

/// Image alt text capture.
#[derive(Default)]
struct ImageCapture {
    active: bool,
    alt: String,
}

impl ImageCapture {
    fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    fn finish(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }
}

/// Table assembly: current row cells plus finished header and body rows.
#[derive(Default)]
struct TableCapture {
    in_head: bool,
    aligns: Vec<Alignment>,
    cell_index: usize,
    cells: Vec<Value>,
    head: Vec<Value>,
    body: Vec<Value>,
}

impl TableCapture {
    fn start(&mut self, aligns: Vec<Alignment>) {
        self.in_head = false;
        self.aligns = aligns;
        self.cell_index = 0;
        self.cells.clear();
        self.head.clear();
        self.body.clear();
    }

    fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    fn start_row(&mut self) {
        self.cell_index = 0;
    }

    fn cell_args(&self, text: String) -> NodeArgs {
        let align = match self.aligns.get(self.cell_index) {
            Some(Alignment::Left) => Some("left".to_owned()),
            Some(Alignment::Center) => Some("center".to_owned()),
            Some(Alignment::Right) => Some("right".to_owned()),
            Some(Alignment::None) | None => None,
        };
        NodeArgs::TableCell {
            text,
            header: self.in_head,
            align,
        }
    }

    fn push_cell(&mut self, cell: Value) {
        self.cells.push(cell);
        self.cell_index += 1;
    }

    fn row_args(&mut self) -> NodeArgs {
        NodeArgs::TableRow {
            cells: std::mem::take(&mut self.cells),
        }
    }

    fn finish(&mut self) -> NodeArgs {
        NodeArgs::Table {
            head: std::mem::take(&mut self.head),
            body: std::mem::take(&mut self.body),
        }
    }
}

/// An open block construct collecting child nodes.
enum Container {
    Blockquote { children: Vec<Value> },
    List {
        ordered: bool,
        start: Option<u64>,
        items: Vec<Value>,
    },
    Item { children: Vec<Value> },
}

impl Container {
    fn children_mut(&mut self) -> &mut Vec<Value> {
        match self {
            Self::Blockquote { children } | Self::Item { children } => children,
            Self::List { items, .. } => items,
        }
    }
}

struct Conversion<'a> {
    rules: &'a Rules,
    ctx: &'a mut RootCtx,
    nodes: Vec<Value>,
    stack: Vec<Container>,
    inline: InlineState,
    code: CodeCapture,
    image: ImageCapture,
    table: TableCapture,
    html_block: String,
}

impl<'a> Conversion<'a> {
    fn new(rules: &'a Rules, ctx: &'a mut RootCtx) -> Self {
        Self {
            rules,
            ctx,
            nodes: Vec::new(),
            stack: Vec::new(),
            inline: InlineState::default(),
            code: CodeCapture::default(),
            image: ImageCapture::default(),
            table: TableCapture::default(),
            html_block: String::new(),
        }
    }

    fn finish(self) -> Vec<Value> {
        self.nodes
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.html_block.push_str(&html),
            Event::InlineHtml(html) => self.inline.push_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.inline.push("<br>", "\n"),
            Event::Rule => {
                let node = self.apply_rule(NodeArgs::Hr);
                self.push_node(node);
            }
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => self.flush_inline(),
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.stack.push(Container::Blockquote {
                    children: Vec::new(),
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let language = match kind {
                    CodeBlockKind::Fenced(ref lang) if !lang.is_empty() => {
                        lang.split_whitespace().next().map(String::from)
                    }
                    _ => None,
                };
                self.code.start(language);
            }
            Tag::List(start) => {
                self.flush_inline();
                self.stack.push(Container::List {
                    ordered: start.is_some(),
                    start: start.filter(|&n| n != 1),
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.stack.push(Container::Item {
                    children: Vec::new(),
                });
            }
            Tag::Table(alignments) => {
                self.flush_inline();
                self.table.start(alignments);
            }
            Tag::TableHead => self.table.start_head(),
            Tag::TableRow => self.table.start_row(),
            Tag::Emphasis => self.inline.push_html("<em>"),
            Tag::Strong => self.inline.push_html("<strong>"),
            Tag::Strikethrough => self.inline.push_html("<del>"),
            Tag::Superscript => self.inline.push_html("<sup>"),
            Tag::Subscript => self.inline.push_html("<sub>"),
            Tag::Link { dest_url, .. } => {
                write!(self.inline.html, r#"<a href="{}">"#, escape_html(&dest_url)).unwrap();
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text collects until end_tag closes the img
                self.image.start();
                write!(self.inline.html, r#"<img src="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(self.inline.html, r#" title="{}""#, escape_html(&title)).unwrap();
                }
            }
            Tag::Paragraph
            | Tag::TableCell
            | Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let (html, _) = self.inline.take();
                let node = self.apply_rule(NodeArgs::Paragraph { text: html });
                self.push_node(node);
            }
            TagEnd::Heading(level) => {
                let (html, text) = self.inline.take();
                let node = self.apply_rule(NodeArgs::Heading {
                    text: html.trim().to_owned(),
                    level: heading_level_to_num(level),
                    raw: text.trim().to_owned(),
                });
                self.push_node(node);
            }
            TagEnd::BlockQuote(_) => {
                if let Some(Container::Blockquote { children }) = self.stack.pop() {
                    let node = self.apply_rule(NodeArgs::Blockquote { content: children });
                    self.push_node(node);
                }
            }
            TagEnd::CodeBlock => {
                let args = self.code.finish();
                let node = self.apply_rule(args);
                self.push_node(node);
            }
            TagEnd::List(_) => {
                if let Some(Container::List {
                    ordered,
                    start,
                    items,
                }) = self.stack.pop()
                {
                    let node = self.apply_rule(NodeArgs::List {
                        items,
                        ordered,
                        start,
                    });
                    self.push_node(node);
                }
            }
            TagEnd::Item => {
                self.flush_inline();
                if let Some(Container::Item { children }) = self.stack.pop() {
                    let node = self.apply_rule(NodeArgs::ListItem { content: children });
                    self.push_node(node);
                }
            }
            TagEnd::Table => {
                let args = self.table.finish();
                let node = self.apply_rule(args);
                self.push_node(node);
            }
            TagEnd::TableHead => {
                let args = self.table.row_args();
                let row = self.apply_rule(args);
                self.table.head.push(row);
                self.table.in_head = false;
            }
            TagEnd::TableRow => {
                let args = self.table.row_args();
                let row = self.apply_rule(args);
                self.table.body.push(row);
            }
            TagEnd::TableCell => {
                let (html, _) = self.inline.take();
                let args = self.table.cell_args(html);
                let cell = self.apply_rule(args);
                self.table.push_cell(cell);
            }
            TagEnd::HtmlBlock => {
                let html = std::mem::take(&mut self.html_block);
                let node = self.apply_rule(NodeArgs::Html { html });
                self.push_node(node);
            }
            TagEnd::Emphasis => self.inline.push_html("</em>"),
            TagEnd::Strong => self.inline.push_html("</strong>"),
            TagEnd::Strikethrough => self.inline.push_html("</del>"),
            TagEnd::Superscript => self.inline.push_html("</sup>"),
            TagEnd::Subscript => self.inline.push_html("</sub>"),
            TagEnd::Link => self.inline.push_html("</a>"),
            TagEnd::Image => {
                let alt = self.image.finish();
                write!(self.inline.html, r#" alt="{}">"#, escape_html(&alt)).unwrap();
            }
            TagEnd::FootnoteDefinition
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.active {
            self.code.buffer.push_str(text);
        } else if self.image.active {
            self.image.alt.push_str(text);
        } else {
            self.inline.push(&escape_html(text), text);
        }
    }

    fn inline_code(&mut self, code: &str) {
        write!(self.inline.html, "<code>{}</code>", escape_html(code)).unwrap();
        self.inline.text.push_str(code);
    }

    fn soft_break(&mut self) {
        if self.code.active {
            self.code.buffer.push('\n');
        } else {
            self.inline.push("\n", "\n");
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.inline
                .push_html(r#"<input type="checkbox" checked disabled> "#);
        } else {
            self.inline.push_html(r#"<input type="checkbox" disabled> "#);
        }
    }

    /// Flush pending inline content as a bare text node.
    ///
    /// Covers tight list items, where inline text arrives without an
    /// enclosing paragraph and a nested block can start right after it.
    fn flush_inline(&mut self) {
        if self.inline.is_empty() {
            return;
        }
        let (html, _) = self.inline.take();
        self.push_node(Value::String(html));
    }

    fn apply_rule(&mut self, args: NodeArgs) -> Value {
        match self.rules.get(args.kind()) {
            Some(rule) => rule.apply(&args, self.ctx),
            None => default_node(&args),
        }
    }

    fn push_node(&mut self, node: Value) {
        // Empty-string results are dropped (a rule's way to discard a block)
        if node.as_str() == Some("") {
            return;
        }
        match self.stack.last_mut() {
            Some(container) => container.children_mut().push(node),
            None => self.nodes.push(node),
        }
    }
}

/// Default rendition of a construct when no rule is registered.
fn default_node(args: &NodeArgs) -> Value {
    match args {
        NodeArgs::Heading { text, level, .. } => {
            json!({ "elem": format!("h{level}"), "content": text })
        }
        NodeArgs::Paragraph { text } => json!({ "elem": "p", "content": text }),
        NodeArgs::CodeBlock { code, language } => {
            let inner = match language {
                Some(lang) => json!({
                    "tag": "code",
                    "attrs": { "class": format!("language-{lang}") },
                    "content": escape_html(code),
                }),
                None => json!({ "tag": "code", "content": escape_html(code) }),
            };
            json!({ "elem": "code", "tag": "pre", "content": inner })
        }
        NodeArgs::Blockquote { content } => {
            json!({ "elem": "quote", "tag": "blockquote", "content": content })
        }
        NodeArgs::List {
            items,
            ordered,
            start,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            match start {
                Some(n) => json!({
                    "elem": "list",
                    "tag": tag,
                    "attrs": { "start": n },
                    "content": items,
                }),
                None => json!({ "elem": "list", "tag": tag, "content": items }),
            }
        }
        NodeArgs::ListItem { content } => {
            json!({ "elem": "item", "tag": "li", "content": content })
        }
        NodeArgs::Html { html } => Value::String(html.clone()),
        NodeArgs::Hr => json!({ "elem": "hr", "tag": "hr" }),
        NodeArgs::Table { head, body } => json!({
            "elem": "table",
            "tag": "table",
            "content": [
                { "tag": "thead", "content": head },
                { "tag": "tbody", "content": body },
            ],
        }),
        NodeArgs::TableRow { cells } => {
            json!({ "elem": "row", "tag": "tr", "content": cells })
        }
        NodeArgs::TableCell {
            text,
            header,
            align,
        } => {
            let tag = if *header { "th" } else { "td" };
            match align {
                Some(dir) => json!({
                    "elem": "cell",
                    "tag": tag,
                    "attrs": { "align": dir },
                    "content": text,
                }),
                None => json!({ "elem": "cell", "tag": tag, "content": text }),
            }
        }
    }
}

/// Convert heading level enum to number.
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

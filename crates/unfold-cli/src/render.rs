//! Plain-terminal rendering of content trees.

use colored::Colorize;
use unfold_core::markup::decode_entities;
use unfold_core::{ContentTree, NodeId, NodeKind};
use unfold_engine::LinkDirective;

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "blockquote", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Render a tree as terminal text.
///
/// Links carrying directives are numbered `[n]` in document order, which is
/// the order of the session's live links. Links disabled with
/// `disabled_class` are dimmed.
pub fn render(tree: &ContentTree, disabled_class: &str) -> String {
    let mut renderer = Renderer {
        tree,
        disabled_class,
        links: 0,
    };
    let text = renderer.children(tree.root());
    tidy(&text)
}

struct Renderer<'a> {
    tree: &'a ContentTree,
    disabled_class: &'a str,
    links: usize,
}

impl Renderer<'_> {
    fn children(&mut self, id: NodeId) -> String {
        let tree = self.tree;
        tree.children(id)
            .iter()
            .map(|&child| self.node(child))
            .collect()
    }

    fn node(&mut self, id: NodeId) -> String {
        let tree = self.tree;
        let element = match tree.kind(id) {
            NodeKind::Text(text) => return collapse_whitespace(&decode_entities(text)),
            NodeKind::Comment(_) => return String::new(),
            NodeKind::Element(element) => element,
        };

        if element.is("br") {
            return "\n".to_string();
        }
        if element.is("hr") {
            return "\n────────\n".to_string();
        }

        let numbered = element.is("a") && !LinkDirective::from_element(element).is_empty();
        let number = numbered.then(|| {
            self.links += 1;
            self.links
        });

        let inner = self.children(id);
        let styled = if let Some(n) = number {
            format!("{} {}", format!("[{n}]").cyan().bold(), inner.underline())
        } else if element.attr("class") == Some(self.disabled_class) {
            inner.dimmed().to_string()
        } else if element.is("em") || element.is("i") {
            inner.italic().to_string()
        } else if ["strong", "b", "h1", "h2", "h3"].iter().any(|tag| element.is(tag)) {
            inner.bold().to_string()
        } else {
            inner
        };

        if BLOCK_TAGS.iter().any(|tag| element.is(tag)) {
            format!("\n{styled}\n")
        } else {
            styled
        }
    }
}

/// Collapse runs of whitespace into single spaces.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Trim each line and squeeze blank lines down to one.
fn tidy(text: &str) -> String {
    let mut out = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().is_none_or(|l: &&str| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

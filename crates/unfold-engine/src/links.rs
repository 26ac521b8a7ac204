//! Link directives, activation, and disabling.

use unfold_core::{ContentTree, Element, NodeId};

/// Attribute naming a section to navigate to.
pub const GOTO_SECTION_ATTR: &str = "data-goto-section";
/// Attribute naming a callable to invoke.
pub const CALL_FUNCTION_ATTR: &str = "data-call-function";
/// Attribute holding a macro payload to replace the link with.
pub const REPLACE_WITH_ATTR: &str = "data-replace-with";

/// Tag of link-capable elements.
const LINK_TAG: &str = "a";

/// What activating a link does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDirective {
    /// Navigate to the named section.
    GotoSection(String),
    /// Invoke the named callable.
    CallFunction(String),
    /// Replace the link in place with the expansion of a macro payload.
    ReplaceWith(String),
}

impl LinkDirective {
    /// Decode a directive attribute. `None` for unrelated attributes.
    pub fn from_attribute(name: &str, value: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            GOTO_SECTION_ATTR => Some(Self::GotoSection(value.to_string())),
            CALL_FUNCTION_ATTR => Some(Self::CallFunction(value.to_string())),
            REPLACE_WITH_ATTR => Some(Self::ReplaceWith(value.to_string())),
            _ => None,
        }
    }

    /// All directives on an element, in attribute order.
    pub fn from_element(element: &Element) -> Vec<Self> {
        element
            .attributes
            .iter()
            .filter_map(|a| {
                a.value
                    .as_deref()
                    .and_then(|v| Self::from_attribute(&a.name, v))
            })
            .collect()
    }
}

/// A link in the current section whose directives are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveLink {
    /// The `a` element.
    pub node: NodeId,
    /// Directives captured at activation time.
    pub directives: Vec<LinkDirective>,
}

/// Bind every link under `root`, in document order.
///
/// Links without any directive attribute are left inert.
pub fn activate_links(tree: &ContentTree, root: NodeId) -> Vec<LiveLink> {
    tree.walk(root)
        .into_iter()
        .filter_map(|node| {
            let element = tree.element(node).filter(|e| e.is(LINK_TAG))?;
            let directives = LinkDirective::from_element(element);
            (!directives.is_empty()).then_some(LiveLink { node, directives })
        })
        .collect()
}

/// Turn every link under `root` into an inert `span` with `class`, keeping its content.
///
/// Returns the number of links disabled.
pub fn disable_links(tree: &mut ContentTree, root: NodeId, class: &str) -> usize {
    let links: Vec<NodeId> = tree
        .walk(root)
        .into_iter()
        .filter(|&n| tree.element(n).is_some_and(|e| e.is(LINK_TAG)))
        .collect();
    for &link in &links {
        tree.retag(link, Element::new("span").with_attr("class", class));
    }
    links.len()
}

#[cfg(test)]
mod tests {
    use unfold_core::markup;

    use super::*;

    #[test]
    fn decodes_directives() {
        assert_eq!(
            LinkDirective::from_attribute("data-goto-section", "cellar"),
            Some(LinkDirective::GotoSection("cellar".into()))
        );
        assert_eq!(
            LinkDirective::from_attribute("DATA-CALL-FUNCTION", "ring"),
            Some(LinkDirective::CallFunction("ring".into()))
        );
        assert_eq!(LinkDirective::from_attribute("href", "#"), None);
    }

    #[test]
    fn binds_links_in_document_order() {
        let tree = markup::parse(concat!(
            r#"<p><a data-goto-section="b">B</a></p>"#,
            r#"<a href="x">plain</a>"#,
            r#"<div><a data-call-function="f" data-replace-with="@r">both</a></div>"#,
        ));
        let links = activate_links(&tree, tree.root());
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0].directives,
            vec![LinkDirective::GotoSection("b".into())]
        );
        assert_eq!(
            links[1].directives,
            vec![
                LinkDirective::CallFunction("f".into()),
                LinkDirective::ReplaceWith("@r".into()),
            ]
        );
        assert_eq!(tree.text_content(links[1].node), "both");
    }

    #[test]
    fn directives_on_other_tags_are_ignored() {
        let tree = markup::parse(r#"<span data-goto-section="b">not a link</span>"#);
        assert!(activate_links(&tree, tree.root()).is_empty());
    }

    #[test]
    fn disabling_keeps_visible_text() {
        let mut tree = markup::parse(
            r#"Go <a data-goto-section="b">north <em>now</em></a> or <a href="x">away</a>."#,
        );
        let root = tree.root();
        assert_eq!(disable_links(&mut tree, root, "__disabledLink"), 2);
        assert_eq!(
            tree.to_markup(),
            r#"Go <span class="__disabledLink">north <em>now</em></span> or <span class="__disabledLink">away</span>."#
        );
        assert!(activate_links(&tree, root).is_empty());
    }
}

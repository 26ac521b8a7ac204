//! Reading sessions: the current section, the history log, and navigation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use unfold_core::{ContentTree, Context, Element, EngineConfig, NodeId, markup};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, MacroError, MacroWarning};
use crate::expander::{Expansion, expand_macro, expand_section};
use crate::history::History;
use crate::inline::set_inline_macros_active;
use crate::links::{LinkDirective, LiveLink, activate_links, disable_links};
use crate::surface::DisplaySurface;

/// Unique identifier of a reading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The live section: expanded, inline macros active, links bound.
#[derive(Debug, Clone)]
struct CurrentSection {
    id: String,
    content: ContentTree,
    links: Vec<LiveLink>,
}

/// One reader's progress through a story.
///
/// Each section instance is either current or retired to history; the only
/// transition is retire-then-promote, driven by [`Session::goto_section`].
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    config: EngineConfig,
    current: Option<CurrentSection>,
    history: History,
    history_visible: bool,
}

impl Session {
    /// Create a session with nothing displayed yet.
    pub fn new(config: EngineConfig) -> Self {
        let id = SessionId::new();
        info!(session = %id, "session created");
        Self {
            id,
            history_visible: config.show_history,
            config,
            current: None,
            history: History::new(),
        }
    }

    /// This session's id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The engine configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Id of the current section.
    pub fn current_section_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }

    /// Content of the current section.
    pub fn current(&self) -> Option<&ContentTree> {
        self.current.as_ref().map(|c| &c.content)
    }

    /// Serialized markup of the current section.
    pub fn current_markup(&self) -> Option<String> {
        self.current().map(ContentTree::to_markup)
    }

    /// The history log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the history region is shown.
    pub fn history_visible(&self) -> bool {
        self.history_visible
    }

    /// Live links of the current section, in document order.
    pub fn live_links(&self) -> &[LiveLink] {
        self.current
            .as_ref()
            .map(|c| c.links.as_slice())
            .unwrap_or_default()
    }

    /// Visible text of a node in the current section.
    pub fn link_label(&self, node: NodeId) -> Option<String> {
        self.current().map(|content| content.text_content(node))
    }

    /// Navigate to a section.
    ///
    /// The target is expanded before anything else happens, so a failed
    /// expansion leaves the current section and history untouched.
    pub fn goto_section(
        &mut self,
        ctx: &Context<'_>,
        surface: &mut dyn DisplaySurface,
        id: &str,
    ) -> EngineResult<Vec<MacroWarning>> {
        let Expansion {
            section,
            mut content,
            warnings,
        } = expand_section(ctx, &self.config, id)?;

        self.retire_current(surface);

        let root = content.root();
        set_inline_macros_active(&mut content, root, true);
        let links = activate_links(&content, root);

        surface.mount_current(&content);
        surface.reset_current_scroll();
        debug!(
            session = %self.id,
            section = %section,
            links = links.len(),
            warnings = warnings.len(),
            "section mounted"
        );

        self.current = Some(CurrentSection {
            id: section,
            content,
            links,
        });
        Ok(warnings)
    }

    /// Disable the current section's links and move it to history.
    fn retire_current(&mut self, surface: &mut dyn DisplaySurface) {
        let Some(mut current) = self.current.take() else {
            return;
        };
        let root = current.content.root();
        let disabled = disable_links(&mut current.content, root, &self.config.disabled_link_class);
        let markup = current.content.to_markup();

        surface.append_history(&markup);
        surface.scroll_history_to_end();
        debug!(session = %self.id, section = %current.id, disabled, "section retired");
        self.history.push(current.id, markup);
    }

    /// Activate a live link, running every one of its directives in
    /// attribute order.
    ///
    /// Directives after a navigation still run, against the new section. A
    /// replacement whose link has already left the current section is skipped.
    pub fn activate_link(
        &mut self,
        ctx: &Context<'_>,
        surface: &mut dyn DisplaySurface,
        node: NodeId,
    ) -> EngineResult<Vec<MacroWarning>> {
        let current = self.current.as_ref().ok_or(EngineError::NoCurrentSection)?;
        let directives = current
            .links
            .iter()
            .find(|link| link.node == node)
            .map(|link| link.directives.clone())
            .ok_or(EngineError::LinkNotLive(node))?;
        debug!(
            session = %self.id,
            section = %current.id,
            link = %current.content.outer_markup(node),
            "link activated"
        );

        // Every navigation retires exactly one section.
        let retired = self.history.len();
        let mut warnings = Vec::new();
        for directive in directives {
            match directive {
                LinkDirective::GotoSection(target) => {
                    warnings.extend(self.goto_section(ctx, surface, &target)?);
                }
                LinkDirective::CallFunction(name) => match ctx.callables().invoke(&name) {
                    Some(output) => debug!(callable = %name, %output, "callable invoked"),
                    None => {
                        let error = MacroError::CallableNotFound(name);
                        warn!("{error}");
                        warnings.push(MacroWarning {
                            section: self.current_section_id().map(str::to_string),
                            offset: 0,
                            error,
                        });
                    }
                },
                LinkDirective::ReplaceWith(payload) => {
                    if self.history.len() != retired || !self.is_live(node) {
                        debug!(
                            session = %self.id,
                            %node,
                            %payload,
                            "link gone, replacement skipped"
                        );
                        continue;
                    }
                    warnings.extend(self.replace_link(ctx, surface, node, &payload)?);
                }
            }
        }
        Ok(warnings)
    }

    /// Whether `node` is a live link of the current section.
    fn is_live(&self, node: NodeId) -> bool {
        self.live_links().iter().any(|link| link.node == node)
    }

    /// Replace a link with the expansion of `payload`, then activate what came in.
    fn replace_link(
        &mut self,
        ctx: &Context<'_>,
        surface: &mut dyn DisplaySurface,
        node: NodeId,
        payload: &str,
    ) -> EngineResult<Vec<MacroWarning>> {
        let expansion = expand_macro(ctx, &self.config, payload);
        let fragment = markup::parse(&expansion.markup);
        let wrapper = Element::new("span").with_attr("class", &self.config.inline_wrapper_class);

        let current = self.current.as_mut().ok_or(EngineError::NoCurrentSection)?;
        let removed = current.content.walk(node);
        let wrapper = current.content.replace_with_element(node, wrapper, &fragment);
        set_inline_macros_active(&mut current.content, wrapper, true);

        current.links.retain(|link| !removed.contains(&link.node));
        current
            .links
            .extend(activate_links(&current.content, wrapper));
        let order = current.content.nodes();
        current
            .links
            .sort_by_key(|link| order.iter().position(|n| *n == link.node));

        surface.patch_current(&current.content);
        debug!(session = %self.id, payload, "inline macro replaced");
        Ok(expansion.warnings)
    }

    /// Show or hide the history region.
    pub fn set_history_visible(&mut self, surface: &mut dyn DisplaySurface, visible: bool) {
        self.history_visible = visible;
        surface.set_history_visible(visible);
    }
}

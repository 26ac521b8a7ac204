//! The display surface the session renders into.

use unfold_core::ContentTree;

/// A concrete display with a current-section region and a history region.
///
/// The session calls these in a fixed order on navigation: history append,
/// history scroll, mount, scroll reset.
pub trait DisplaySurface {
    /// Discard the current-section region and mount `content` in a freshly
    /// built one, so any presentation state (animations) starts over.
    fn mount_current(&mut self, content: &ContentTree);

    /// Update the current-section region in place after an inline replacement.
    fn patch_current(&mut self, content: &ContentTree);

    /// Scroll the current-section region back to its start.
    fn reset_current_scroll(&mut self);

    /// Append retired markup to the end of the history region.
    fn append_history(&mut self, markup: &str);

    /// Scroll the history region to its end.
    fn scroll_history_to_end(&mut self);

    /// Show or hide the history region.
    fn set_history_visible(&mut self, _visible: bool) {}
}

/// A surface that records what it was asked to show. Useful headless and in tests.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    current: Option<String>,
    history: String,
    mounts: usize,
    patches: usize,
    scroll_resets: usize,
    history_scrolls: usize,
    history_visible: bool,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            current: None,
            history: String::new(),
            mounts: 0,
            patches: 0,
            scroll_resets: 0,
            history_scrolls: 0,
            history_visible: true,
        }
    }
}

impl MemorySurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of the mounted current section.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Everything appended to the history region.
    pub fn history(&self) -> &str {
        &self.history
    }

    /// How many times a current section was mounted from scratch.
    pub fn mounts(&self) -> usize {
        self.mounts
    }

    /// How many in-place updates happened.
    pub fn patches(&self) -> usize {
        self.patches
    }

    /// How many times the current region's scroll was reset.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    /// How many times history was scrolled to its end.
    pub fn history_scrolls(&self) -> usize {
        self.history_scrolls
    }

    /// Whether the history region is visible.
    pub fn history_visible(&self) -> bool {
        self.history_visible
    }
}

impl DisplaySurface for MemorySurface {
    fn mount_current(&mut self, content: &ContentTree) {
        self.current = Some(content.to_markup());
        self.mounts += 1;
    }

    fn patch_current(&mut self, content: &ContentTree) {
        self.current = Some(content.to_markup());
        self.patches += 1;
    }

    fn reset_current_scroll(&mut self) {
        self.scroll_resets += 1;
    }

    fn append_history(&mut self, markup: &str) {
        self.history.push_str(markup);
    }

    fn scroll_history_to_end(&mut self) {
        self.history_scrolls += 1;
    }

    fn set_history_visible(&mut self, visible: bool) {
        self.history_visible = visible;
    }
}

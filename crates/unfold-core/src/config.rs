//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for expansion and navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting of `{@section}` inclusions before giving up.
    pub max_include_depth: usize,
    /// Treat `{{` and `}}` outside a macro as literal braces.
    pub brace_escapes: bool,
    /// Class given to links once their section is retired to history.
    pub disabled_link_class: String,
    /// Class of the wrapper that replaces an activated inline-macro link.
    pub inline_wrapper_class: String,
    /// Whether the history region starts visible.
    pub show_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_include_depth: 32,
            brace_escapes: false,
            disabled_link_class: "__disabledLink".to_string(),
            inline_wrapper_class: "__inlineMacro".to_string(),
            show_history: true,
        }
    }
}

impl EngineConfig {
    /// Set the inclusion depth limit (at least 1).
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth.max(1);
        self
    }

    /// Enable or disable `{{` / `}}` escapes.
    pub fn with_brace_escapes(mut self, enabled: bool) -> Self {
        self.brace_escapes = enabled;
        self
    }

    /// Set whether history starts visible.
    pub fn with_show_history(mut self, show: bool) -> Self {
        self.show_history = show;
        self
    }
}

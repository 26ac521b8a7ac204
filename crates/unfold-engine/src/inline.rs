//! Inline-macro activation.
//!
//! Inline macros are elements whose id contains `inline-`. Stored sections
//! carry them dormant (`_inline-3`); only the copy in the current section is
//! switched to the active form (`inline-3`), so an active id is unique within
//! the live content.

use unfold_core::{ContentTree, NodeId};

/// Marker identifying inline-macro ids.
pub const INLINE_MARKER: &str = "inline-";
/// Prefix marking an inline-macro id as dormant.
pub const DORMANT_PREFIX: char = '_';

/// Whether an id follows the inline-macro convention (either form).
pub fn is_inline_id(id: &str) -> bool {
    id.strip_prefix(DORMANT_PREFIX)
        .unwrap_or(id)
        .starts_with(INLINE_MARKER)
}

/// Whether an inline-macro id is in its active form.
pub fn is_active_id(id: &str) -> bool {
    id.starts_with(INLINE_MARKER)
}

/// The id in the requested form. Ids outside the convention are returned as is.
pub fn with_activation(id: &str, active: bool) -> String {
    if !is_inline_id(id) {
        return id.to_string();
    }
    match (active, is_active_id(id)) {
        (true, false) => id[DORMANT_PREFIX.len_utf8()..].to_string(),
        (false, true) => format!("{DORMANT_PREFIX}{id}"),
        _ => id.to_string(),
    }
}

/// Switch every inline-macro id under `root` to the active or dormant form.
///
/// Idempotent. Returns how many ids changed.
pub fn set_inline_macros_active(tree: &mut ContentTree, root: NodeId, active: bool) -> usize {
    let mut changed = 0;
    for node in tree.walk(root) {
        let Some(element) = tree.element_mut(node) else {
            continue;
        };
        let Some(id) = element.id() else {
            continue;
        };
        let target = with_activation(id, active);
        if target != id {
            element.set_id(target);
            changed += 1;
        }
    }
    changed
}

//! Scroll-container resolution
//!
//! "Scrollable" means a positive maximum scroll offset. The maximum is the
//! usual `scroll_height - client_height`, corrected for a trailing margin:
//! some layouts include the last child's collapsed bottom margin in
//! `scroll_height` even though it is not visually scrollable distance.

use scrollkit_core::{Display, Dom, ElementId};

/// Largest vertical offset `el` can scroll to
///
/// Descends the last-child chain while each link has `display: block`,
/// tracking the largest `margin_bottom` seen; that margin is subtracted
/// from the naive `scroll_height - client_height`, and the result is
/// clamped to zero.
pub fn max_scroll_top(dom: &dyn Dom, el: ElementId) -> f32 {
    let naive = dom.scroll_height(el) - dom.client_height(el);

    let mut trailing_margin = 0.0f32;
    let mut cursor = dom.last_child(el);
    while let Some(node) = cursor {
        let style = dom.computed_style(node);
        if style.display != Display::Block {
            break;
        }
        trailing_margin = trailing_margin.max(style.margin_bottom);
        cursor = dom.last_child(node);
    }

    (naive - trailing_margin).max(0.0)
}

/// Nearest ancestor of `el` that is actually scrollable
///
/// Walks the parent chain starting at `el`'s parent (never `el` itself) and
/// returns the first ancestor with a positive [`max_scroll_top`], or `None`
/// when the root is reached without finding one.
pub fn scroll_parent(dom: &dyn Dom, el: ElementId) -> Option<ElementId> {
    let mut cursor = dom.parent(el);
    while let Some(node) = cursor {
        if max_scroll_top(dom, node) > 0.0 {
            return Some(node);
        }
        cursor = dom.parent(node);
    }
    None
}

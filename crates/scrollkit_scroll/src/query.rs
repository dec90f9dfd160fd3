//! Element position queries
//!
//! Stateless reads over the host geometry primitives. Every result is a
//! snapshot; re-query whenever layout may have changed.

use scrollkit_core::{Dom, ElementId, Rect};

/// Page-relative position, summed over the offset-parent chain
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagePosition {
    pub page_left: f32,
    pub page_top: f32,
}

/// Viewport-relative position of an element's top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClientPosition {
    pub client_left: f32,
    pub client_top: f32,
}

/// Bounding box of the element in viewport coordinates
///
/// Direct passthrough of the host's bounding-box query. Detached elements
/// are not validated; hosts report a zero rect for them.
pub fn rect(dom: &dyn Dom, el: ElementId) -> Rect {
    dom.bounding_rect(el)
}

/// Position of the element relative to the page
///
/// Walks the offset-parent chain from `el` upward, summing each node's
/// offsets. The chain always ends at the root, so the walk terminates.
pub fn page_position(dom: &dyn Dom, el: ElementId) -> PagePosition {
    let mut position = PagePosition::default();
    let mut cursor = Some(el);
    while let Some(node) = cursor {
        position.page_left += dom.offset_left(node);
        position.page_top += dom.offset_top(node);
        cursor = dom.offset_parent(node);
    }
    position
}

/// Position of the element relative to the viewport, derived from [`rect`]
pub fn client_position(dom: &dyn Dom, el: ElementId) -> ClientPosition {
    let rect = rect(dom, el);
    ClientPosition {
        client_left: rect.left,
        client_top: rect.top,
    }
}

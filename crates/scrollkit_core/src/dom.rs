//! Host document abstraction
//!
//! Everything scrollkit knows about the page goes through the [`Dom`] trait:
//! bounding-box queries, offset/scroll/size properties, the two computed
//! style values the geometry math reads, probe insertion for scrollbar
//! measurement, and scroll-event subscription. A real embedder backs this
//! with its layout engine; tests and headless embedders use
//! [`MockDom`](crate::MockDom).
//!
//! Elements are identified by opaque copyable keys; identity comparison is
//! `==` on [`ElementId`].

use std::sync::Arc;

use slotmap::new_key_type;

use crate::error::HostError;
use crate::geometry::Rect;

new_key_type! {
    /// Handle to an element owned by the host document
    pub struct ElementId;
    /// Handle to a registered scroll listener
    pub struct ListenerId;
}

/// The computed `display` value, reduced to what the margin-collapsing
/// descent needs: block or not-block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    None,
}

/// Snapshot of the two computed style values scrollkit reads
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub margin_bottom: f32,
}

/// A scroll event dispatched by the host when an element's scroll position
/// changes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    /// The element that scrolled
    pub target: ElementId,
    /// Vertical scroll offset after the change
    pub scroll_top: f32,
}

/// Callback invoked by the host for each scroll event on a subscribed element
pub type ScrollListener = Arc<dyn Fn(&ScrollEvent) + Send + Sync>;

/// Shared handle to a host document
pub type DomHandle = Arc<dyn Dom>;

/// Host document interface
///
/// Unknown or detached elements are not validated: geometry accessors return
/// a zero rect / zero values for them, mirroring what a live DOM reports.
/// Only the document accessors and probe insertion are fallible.
pub trait Dom: Send + Sync {
    // =========================================================================
    // Geometry
    // =========================================================================

    /// Bounding box of the element in viewport coordinates
    fn bounding_rect(&self, el: ElementId) -> Rect;

    /// Offset-left relative to the offset parent
    fn offset_left(&self, el: ElementId) -> f32;

    /// Offset-top relative to the offset parent
    fn offset_top(&self, el: ElementId) -> f32;

    /// Nearest positioned ancestor used as the reference frame for
    /// `offset_left`/`offset_top`, or `None` at the root
    fn offset_parent(&self, el: ElementId) -> Option<ElementId>;

    // =========================================================================
    // Tree
    // =========================================================================

    /// Parent element in the containment tree
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Last child element, if any
    fn last_child(&self, el: ElementId) -> Option<ElementId>;

    // =========================================================================
    // Scroll and size properties
    // =========================================================================

    /// Current vertical scroll offset
    fn scroll_top(&self, el: ElementId) -> f32;

    /// Set the vertical scroll offset
    ///
    /// Hosts clamp to the scrollable range and dispatch a [`ScrollEvent`] to
    /// listeners registered on the element when the value changes.
    fn set_scroll_top(&self, el: ElementId, value: f32);

    /// Total scrollable content height
    fn scroll_height(&self, el: ElementId) -> f32;

    /// Inner width, excluding any scrollbar
    fn client_width(&self, el: ElementId) -> f32;

    /// Inner height, excluding any scrollbar
    fn client_height(&self, el: ElementId) -> f32;

    /// Outer width, including any scrollbar
    fn offset_width(&self, el: ElementId) -> f32;

    /// Outer height, including any scrollbar
    fn offset_height(&self, el: ElementId) -> f32;

    // =========================================================================
    // Style
    // =========================================================================

    /// Computed style snapshot (display and margin-bottom only)
    fn computed_style(&self, el: ElementId) -> ComputedStyle;

    // =========================================================================
    // Document
    // =========================================================================

    /// The document body
    fn body(&self) -> Result<ElementId, HostError>;

    /// The document's root scrolling element
    fn root_element(&self) -> Result<ElementId, HostError>;

    /// Attach an off-screen, non-interactive, square probe element of the
    /// given size with forced scrollbars to the document body
    ///
    /// Used for native scrollbar measurement; callers must remove the probe
    /// with [`Dom::remove_probe`] once measured.
    fn insert_probe(&self, size: f32) -> Result<ElementId, HostError>;

    /// Detach and drop a probe element created by [`Dom::insert_probe`]
    fn remove_probe(&self, el: ElementId);

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to scroll events on an element
    fn add_scroll_listener(&self, el: ElementId, listener: ScrollListener) -> ListenerId;

    /// Remove a previously registered scroll listener
    fn remove_scroll_listener(&self, el: ElementId, id: ListenerId);
}

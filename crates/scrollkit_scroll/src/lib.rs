//! scrollkit scroll
//!
//! Scroll-aware element queries and animated scrolling over a [`Dom`] host:
//!
//! - **Queries**: page- and client-space element positions ([`page_position`],
//!   [`client_position`])
//! - **Scrollbar metrics**: native scrollbar width via probe measurement,
//!   with a process-wide cache ([`native_scrollbar_width`])
//! - **Resolution**: finding the scrollable ancestor of an element and its
//!   margin-corrected scroll range ([`scroll_parent`], [`max_scroll_top`])
//! - **Animated scrolling**: [`scroll_to_element`], an eased scroll toward a
//!   target with optional propagation up the ancestor chain
//! - **Visibility**: [`observe_visibility`], a scroll-driven tracker of which
//!   candidate elements occupy the container's viewport
//!
//! [`Dom`]: scrollkit_core::Dom

pub mod query;
pub mod resolver;
pub mod scroll_to;
pub mod scrollbar;
pub mod visibility;

pub use query::{client_position, page_position, rect, ClientPosition, PagePosition};
pub use resolver::{max_scroll_top, scroll_parent};
pub use scroll_to::{scroll_to_element, ScrollToOptions};
pub use scrollbar::{
    native_scrollbar_width, ScrollbarWidth, ScrollbarWidthCache, SCROLLBAR_FALLBACK,
};
pub use visibility::{
    observe_visibility, ElementRect, ViewEntry, VisibilitySubscription,
};

//! scrollkit core
//!
//! Foundation crate for the scrollkit browser-geometry utilities:
//!
//! - **Geometry primitives**: [`Point`], [`Size`], [`Rect`] in viewport
//!   coordinates
//! - **Host abstraction**: the [`Dom`] trait, the seam between scrollkit and
//!   whatever owns the element tree (a browser DOM, a layout engine, or the
//!   bundled mock)
//! - **Mock document**: [`MockDom`], an in-memory tree for tests and
//!   headless embedding
//!
//! # Example
//!
//! ```rust
//! use scrollkit_core::{Dom, MockDom, NodeConfig, Rect};
//!
//! let dom = MockDom::new();
//! let body = dom.body().unwrap();
//! let el = dom.insert(body, NodeConfig::new(Rect::new(0.0, 120.0, 100.0, 40.0)));
//!
//! assert_eq!(dom.bounding_rect(el).top, 120.0);
//! ```

pub mod dom;
pub mod error;
pub mod geometry;
pub mod mock;

pub use dom::{
    ComputedStyle, Display, Dom, DomHandle, ElementId, ListenerId, ScrollEvent, ScrollListener,
};
pub use error::HostError;
pub use geometry::{Point, Rect, Size};
pub use mock::{MockDom, NodeConfig};

//! Native scrollbar-width detection
//!
//! The page-global measurement inserts a disposable probe element, reads the
//! offset/client deltas, and caches the result for the life of the process.
//! Per-element measurement uses the element itself as the probe, so it is
//! never cached and the element is never re-attached or mutated.

use std::sync::Mutex;

use scrollkit_core::{Dom, ElementId, HostError};

/// Probe edge length, large enough that scrollbars render at full thickness
const PROBE_SIZE: f32 = 200.0;

/// Returned when no renderable document exists; a typical scrollbar width
pub const SCROLLBAR_FALLBACK: ScrollbarWidth = ScrollbarWidth { x: 17.0, y: 17.0 };

/// Scrollbar thickness in both axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollbarWidth {
    /// Horizontal scrollbar thickness
    pub x: f32,
    /// Vertical scrollbar thickness
    pub y: f32,
}

impl ScrollbarWidth {
    fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Process-lifetime cache for the page-global scrollbar measurement
///
/// An explicit handle rather than a module global, so embedders own its
/// scope and tests get independent instances. A cached value that has gone
/// non-finite is treated as absent and re-measured.
#[derive(Debug, Default)]
pub struct ScrollbarWidthCache {
    cached: Mutex<Option<ScrollbarWidth>>,
}

impl ScrollbarWidthCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Measure native scrollbar thickness
///
/// With no `target`, returns the page-global measurement: cached after the
/// first call, which inserts a [`PROBE_SIZE`] probe into the body, reads
/// `offset_width - client_width` (vertical thickness, `y`) and
/// `offset_height - client_height` (horizontal thickness, `x`), and removes
/// the probe. With a `target`, the same deltas are read directly off that
/// element on every call, uncached.
///
/// If the host has no renderable document, the fixed
/// [`SCROLLBAR_FALLBACK`] is returned instead of an error, and nothing is
/// cached.
pub fn native_scrollbar_width(
    dom: &dyn Dom,
    cache: &ScrollbarWidthCache,
    target: Option<ElementId>,
) -> ScrollbarWidth {
    if let Some(el) = target {
        return measure(dom, el);
    }

    let mut cached = cache.cached.lock().unwrap();
    if let Some(info) = *cached {
        if info.is_valid() {
            return info;
        }
    }

    match measure_with_probe(dom) {
        Ok(info) => {
            tracing::debug!(x = info.x, y = info.y, "measured native scrollbar width");
            *cached = Some(info);
            info
        }
        Err(error) => {
            tracing::debug!(%error, "scrollbar probe unavailable, using fallback");
            SCROLLBAR_FALLBACK
        }
    }
}

fn measure_with_probe(dom: &dyn Dom) -> Result<ScrollbarWidth, HostError> {
    let probe = dom.insert_probe(PROBE_SIZE)?;
    let info = measure(dom, probe);
    dom.remove_probe(probe);
    Ok(info)
}

fn measure(dom: &dyn Dom, el: ElementId) -> ScrollbarWidth {
    ScrollbarWidth {
        y: dom.offset_width(el) - dom.client_width(el),
        x: dom.offset_height(el) - dom.client_height(el),
    }
}

//! Viewport visibility tracking
//!
//! Watches scroll events on a container and recomputes, for a fixed set of
//! candidate elements, how much of each candidate's vertical band is inside
//! the container's visible band. The callback fires only when the ordered
//! set of visible elements actually changes.
//!
//! Candidates are sorted by viewport top once, at observation time, and the
//! order is never revisited: each candidate's "owned" band runs from its top
//! to the next candidate's top. If candidates visually reorder later (a
//! dynamic reflow), the owned bands go stale; re-observe after such changes.

use std::sync::{Arc, Mutex, Weak};

use scrollkit_core::{Dom, DomHandle, ElementId, ListenerId, Rect, ScrollEvent, ScrollListener};

/// A candidate's rect plus its derived visibility measures
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRect {
    /// Bounding rect at the time of the recompute
    pub rect: Rect,
    /// Vertical span owned by this element: the distance to the next
    /// candidate in top-sorted order, or its own height for the last one
    pub area_height: f32,
    /// Portion of `area_height` inside the container's visible band
    pub view_area_height: f32,
    /// `view_area_height / area_height`; 0 when `area_height` is 0
    pub view_percent: f32,
}

/// An element currently in view, paired with its visibility measures
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewEntry {
    pub element: ElementId,
    pub rect: ElementRect,
}

/// Active observation handle
///
/// The scroll listener stays attached until [`unsubscribe`] is called;
/// dropping the handle without calling it leaves the listener in place.
/// There is no automatic teardown when elements are removed from the
/// document — that remains the caller's responsibility.
///
/// [`unsubscribe`]: VisibilitySubscription::unsubscribe
#[must_use = "dropping the subscription without calling unsubscribe leaves the listener attached"]
pub struct VisibilitySubscription {
    connection: Option<(Weak<dyn Dom>, ElementId, ListenerId)>,
}

impl VisibilitySubscription {
    fn noop() -> Self {
        Self { connection: None }
    }

    /// Whether a listener is attached
    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    /// Remove the scroll listener; no callbacks fire afterwards
    pub fn unsubscribe(mut self) {
        if let Some((dom, container, listener)) = self.connection.take() {
            if let Some(dom) = dom.upgrade() {
                dom.remove_scroll_listener(container, listener);
            }
        }
    }
}

type VisibilityCallback = dyn Fn(&[ViewEntry], Rect, Option<&ScrollEvent>) + Send + Sync;

struct Tracker {
    dom: Weak<dyn Dom>,
    container: ElementId,
    /// Candidate order fixed at observation time
    ordered: Vec<ElementId>,
    /// Elements reported by the previous recompute, in reported order
    previous: Mutex<Vec<ElementId>>,
    callback: Box<VisibilityCallback>,
}

impl Tracker {
    fn recompute(&self, event: Option<&ScrollEvent>) {
        let Some(dom) = self.dom.upgrade() else {
            return;
        };
        let container_rect = dom.bounding_rect(self.container);
        let rects: Vec<Rect> = self
            .ordered
            .iter()
            .map(|&el| dom.bounding_rect(el))
            .collect();

        let mut entries = Vec::with_capacity(self.ordered.len());
        for (i, &element) in self.ordered.iter().enumerate() {
            let rect = rects[i];
            let area_height = match rects.get(i + 1) {
                Some(next) => next.top - rect.top,
                None => rect.height,
            };
            let view_area_height = visible_span(rect.top, area_height, &container_rect);
            let view_percent = if area_height == 0.0 {
                0.0
            } else {
                view_area_height / area_height
            };
            entries.push(ViewEntry {
                element,
                rect: ElementRect {
                    rect,
                    area_height,
                    view_area_height,
                    view_percent,
                },
            });
        }

        entries.sort_by(|a, b| {
            b.rect
                .view_percent
                .partial_cmp(&a.rect.view_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.retain(|entry| entry.rect.view_percent > 0.0);

        let changed = {
            let mut previous = self.previous.lock().unwrap();
            let changed = previous.len() != entries.len()
                || previous
                    .iter()
                    .zip(&entries)
                    .any(|(&old, new)| old != new.element);
            if changed {
                *previous = entries.iter().map(|entry| entry.element).collect();
            }
            changed
        };

        if changed {
            tracing::trace!(visible = entries.len(), "visible element set changed");
            (self.callback)(&entries, container_rect, event);
        }
    }
}

/// Vertical overlap between `[top, top + area_height]` and the container's
/// visible band
fn visible_span(top: f32, area_height: f32, container: &Rect) -> f32 {
    let farthest_bottom = (top + area_height).max(container.bottom());
    let nearest_top = container.top.min(top);
    (container.height + area_height - (farthest_bottom - nearest_top)).max(0.0)
}

/// Track which candidates are visible inside `container`
///
/// The callback runs once synchronously with no triggering event, then once
/// per scroll event on the container — but only when the visible list
/// differs from the previous one in membership or order. Entries arrive
/// sorted by descending `view_percent`, filtered to `view_percent > 0`.
///
/// An empty candidate list attaches nothing and returns an inert
/// subscription.
pub fn observe_visibility<F>(
    dom: &DomHandle,
    container: ElementId,
    candidates: &[ElementId],
    callback: F,
) -> VisibilitySubscription
where
    F: Fn(&[ViewEntry], Rect, Option<&ScrollEvent>) + Send + Sync + 'static,
{
    if candidates.is_empty() {
        return VisibilitySubscription::noop();
    }

    let mut ordered = candidates.to_vec();
    ordered.sort_by(|&a, &b| {
        dom.bounding_rect(a)
            .top
            .partial_cmp(&dom.bounding_rect(b).top)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let tracker = Arc::new(Tracker {
        dom: Arc::downgrade(dom),
        container,
        ordered,
        previous: Mutex::new(Vec::new()),
        callback: Box::new(callback),
    });

    tracker.recompute(None);

    let listener: ScrollListener = {
        let tracker = Arc::clone(&tracker);
        Arc::new(move |event: &ScrollEvent| tracker.recompute(Some(event)))
    };
    let listener_id = dom.add_scroll_listener(container, listener);

    VisibilitySubscription {
        connection: Some((Arc::downgrade(dom), container, listener_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollkit_core::{MockDom, NodeConfig};

    type Calls = Arc<Mutex<Vec<Vec<(ElementId, f32)>>>>;

    /// Container with three stacked 300px candidates and a 300px viewport
    fn stacked_setup() -> (Arc<MockDom>, DomHandle, ElementId, Vec<ElementId>) {
        let mock = Arc::new(MockDom::new());
        let dom: DomHandle = mock.clone();
        let body = dom.body().unwrap();

        let container_cfg =
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0);
        let container = mock.insert(body, container_cfg);
        let candidates = vec![
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0))),
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 300.0, 100.0, 300.0))),
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 600.0, 100.0, 300.0))),
        ];
        (mock, dom, container, candidates)
    }

    fn recording() -> (Calls, impl Fn(&[ViewEntry], Rect, Option<&ScrollEvent>) + Send + Sync) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let callback = move |entries: &[ViewEntry], _rect: Rect, _event: Option<&ScrollEvent>| {
            sink.lock().unwrap().push(
                entries
                    .iter()
                    .map(|e| (e.element, e.rect.view_percent))
                    .collect(),
            );
        };
        (calls, callback)
    }

    #[test]
    fn test_initial_callback_reports_visible_candidate() {
        let (mock, dom, container, candidates) = stacked_setup();
        // Show the middle candidate before observing
        mock.set_scroll_top(container, 300.0);

        let (calls, callback) = recording();
        let sub = observe_visibility(&dom, container, &candidates, callback);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![(candidates[1], 1.0)]);
        drop(calls);
        sub.unsubscribe();
    }

    #[test]
    fn test_scroll_produces_ordered_partial_visibility() {
        let (mock, dom, container, candidates) = stacked_setup();
        mock.set_scroll_top(container, 300.0);

        let (calls, callback) = recording();
        let sub = observe_visibility(&dom, container, &candidates, callback);

        // Expose 150px of the first candidate and 150px of the second
        mock.set_scroll_top(container, 150.0);

        {
            let calls = calls.lock().unwrap();
            assert_eq!(calls.len(), 2);
            let visible = &calls[1];
            assert_eq!(visible.len(), 2);
            assert_eq!(visible[0].1, 0.5);
            assert_eq!(visible[1].1, 0.5);
            assert_eq!(visible[0].0, candidates[0]);
            assert_eq!(visible[1].0, candidates[1]);
        }

        // Same membership and order, different percentages: no callback
        mock.set_scroll_top(container, 140.0);
        assert_eq!(calls.lock().unwrap().len(), 2);

        // Order flips once the second candidate dominates
        mock.set_scroll_top(container, 200.0);
        {
            let calls = calls.lock().unwrap();
            assert_eq!(calls.len(), 3);
            assert_eq!(calls[2][0].0, candidates[1]);
        }
        sub.unsubscribe();
    }

    #[test]
    fn test_unsubscribe_stops_callbacks() {
        let (mock, dom, container, candidates) = stacked_setup();
        let (calls, callback) = recording();

        let sub = observe_visibility(&dom, container, &candidates, callback);
        assert!(sub.is_active());
        sub.unsubscribe();

        mock.set_scroll_top(container, 300.0);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_candidates_never_attach() {
        let (mock, dom, container, _candidates) = stacked_setup();
        let (calls, callback) = recording();

        let sub = observe_visibility(&dom, container, &[], callback);
        assert!(!sub.is_active());

        mock.set_scroll_top(container, 300.0);
        assert!(calls.lock().unwrap().is_empty());
        sub.unsubscribe();
    }

    #[test]
    fn test_zero_area_candidate_guarded() {
        let mock = Arc::new(MockDom::new());
        let dom: DomHandle = mock.clone();
        let body = dom.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(600.0),
        );
        // Two candidates sharing a top: the first owns a zero-height band
        let a = mock.insert(container, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)));
        let b = mock.insert(container, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)));

        let (calls, callback) = recording();
        let sub = observe_visibility(&dom, container, &[a, b], callback);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        // The zero-band candidate reports 0% (not NaN) and is filtered out
        assert_eq!(calls[0].len(), 1);
        assert!(calls[0][0].1.is_finite());
        drop(calls);
        sub.unsubscribe();
    }

    #[test]
    fn test_visible_span_matches_rect_overlap() {
        let container = Rect::new(0.0, 0.0, 100.0, 300.0);
        for (top, height) in [(-150.0, 300.0), (100.0, 50.0), (250.0, 300.0), (400.0, 10.0)] {
            let band = Rect::new(0.0, top, 100.0, height);
            assert_eq!(
                visible_span(top, height, &container),
                container.vertical_overlap(&band),
                "top={top} height={height}"
            );
        }
    }
}

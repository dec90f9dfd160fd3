//! Scroll-to-element orchestration
//!
//! Composes the resolver (where to scroll) with the animation driver (how
//! the scroll position changes over time). The work starts when the
//! function is called; the returned future only observes completion.
//!
//! There is no cancellation. Starting a second scroll on the same container
//! while one is in flight lets both drive `scroll_top` until the first
//! finishes; callers that need exclusivity must serialize externally.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use scrollkit_animation::{animate, RateFactor, SchedulerHandle};
use scrollkit_core::{DomHandle, ElementId};

use crate::resolver::{max_scroll_top, scroll_parent};

/// Options for [`scroll_to_element`]
#[derive(Clone)]
pub struct ScrollToOptions {
    /// Animation duration (default 300ms)
    pub time: Duration,
    /// Cascade the scroll up the ancestor chain once this level settles
    pub affect_parent: bool,
    /// Easing curve; the driver default when `None`
    pub rate_factor: Option<RateFactor>,
    /// Additional delta in pixels, applied to the original target only
    /// (never propagated to cascaded ancestors)
    pub offset: f32,
}

impl Default for ScrollToOptions {
    fn default() -> Self {
        Self {
            time: Duration::from_millis(300),
            affect_parent: false,
            rate_factor: None,
            offset: 0.0,
        }
    }
}

impl ScrollToOptions {
    pub fn time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    pub fn affect_parent(mut self, affect: bool) -> Self {
        self.affect_parent = affect;
        self
    }

    pub fn rate_factor(mut self, rate_factor: RateFactor) -> Self {
        self.rate_factor = Some(rate_factor);
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

/// Animate `el` into view within its nearest scrollable ancestor
///
/// Resolves the scroll ancestor, computes the delta that brings the
/// element's top to the ancestor's top (plus `options.offset`, capped at the
/// ancestor's maximum scroll), and animates `scroll_top` there. Resolves
/// immediately when there is nothing to do: no scrollable ancestor, or the
/// element is already aligned. With `affect_parent` set, the same operation
/// cascades to the ancestor's own scroll ancestor after this level settles,
/// one level at a time, all the way up.
pub fn scroll_to_element(
    dom: &DomHandle,
    scheduler: &SchedulerHandle,
    el: ElementId,
    options: ScrollToOptions,
) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    let Some(mut ancestor) = scroll_parent(dom.as_ref(), el) else {
        return Box::pin(std::future::ready(()));
    };
    let mut max_scroll = max_scroll_top(dom.as_ref(), ancestor);

    // Some environments hang the scrollable box off the root element while
    // the body reports zero max-scroll; retry against the root in that case.
    if max_scroll == 0.0 {
        if let (Ok(body), Ok(root)) = (dom.body(), dom.root_element()) {
            if ancestor == body {
                ancestor = root;
                max_scroll = max_scroll_top(dom.as_ref(), root);
            }
        }
    }

    let offset_top = dom.bounding_rect(el).top - dom.bounding_rect(ancestor).top;
    let delta = (offset_top + options.offset).min(max_scroll);

    let animation = if delta != 0.0 && offset_top != 0.0 && max_scroll > 0.0 {
        let base = dom.scroll_top(ancestor);
        tracing::debug!(?ancestor, base, delta, "scrolling element into view");
        let frame_dom = Arc::clone(dom);
        Some(animate(
            scheduler,
            options.time,
            move |rate| frame_dom.set_scroll_top(ancestor, base + delta * rate),
            options.rate_factor.clone(),
        ))
    } else {
        None
    };

    let dom = Arc::clone(dom);
    let scheduler = Arc::clone(scheduler);
    Box::pin(async move {
        if let Some(done) = animation {
            done.await;
        }
        if options.affect_parent {
            let cascaded = ScrollToOptions {
                offset: 0.0,
                ..options
            };
            scroll_to_element(&dom, &scheduler, ancestor, cascaded).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollkit_animation::ManualFrameScheduler;
    use scrollkit_core::{Dom, MockDom, NodeConfig, Rect};
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn noop_waker() -> Waker {
        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        fn noop(_: *const ()) {}
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) }
    }

    /// Poll the future to completion, pumping scheduler frames between polls
    fn drive(scheduler: &ManualFrameScheduler, mut fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        for _ in 0..10_000 {
            if let Poll::Ready(()) = fut.as_mut().poll(&mut cx) {
                return;
            }
            scheduler.advance(Duration::from_millis(16));
        }
        panic!("scroll did not settle");
    }

    fn setup() -> (Arc<MockDom>, DomHandle, Arc<ManualFrameScheduler>, SchedulerHandle) {
        let dom = Arc::new(MockDom::new());
        let scheduler = Arc::new(ManualFrameScheduler::new());
        (Arc::clone(&dom), dom.clone(), scheduler.clone(), scheduler.clone())
    }

    fn options() -> ScrollToOptions {
        ScrollToOptions::default().time(Duration::from_millis(100))
    }

    #[test]
    fn test_no_scrollable_ancestor_resolves_immediately() {
        let (mock, dom, _scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let el = mock.insert(body, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 50.0)));

        pollster::block_on(scroll_to_element(&dom, &handle, el, options()));
    }

    #[test]
    fn test_aligned_element_is_a_noop() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let el = mock.insert(container, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 50.0)));

        drive(&scheduler, scroll_to_element(&dom, &handle, el, options()));
        assert_eq!(mock.scroll_top(container), 0.0);
    }

    #[test]
    fn test_below_fold_scrolls_to_exact_delta() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let el = mock.insert(container, NodeConfig::new(Rect::new(0.0, 150.0, 100.0, 50.0)));

        drive(&scheduler, scroll_to_element(&dom, &handle, el, options()));
        assert_eq!(mock.scroll_top(container), 150.0);
    }

    #[test]
    fn test_delta_capped_by_max_scroll() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(400.0),
        );
        let el = mock.insert(container, NodeConfig::new(Rect::new(0.0, 350.0, 100.0, 50.0)));

        drive(&scheduler, scroll_to_element(&dom, &handle, el, options()));
        // max_scroll_top is 100, less than the 350 offset
        assert_eq!(mock.scroll_top(container), 100.0);
    }

    #[test]
    fn test_above_fold_scrolls_upward() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let el = mock.insert(container, NodeConfig::new(Rect::new(0.0, 50.0, 100.0, 50.0)));
        mock.set_scroll_top(container, 100.0);

        drive(&scheduler, scroll_to_element(&dom, &handle, el, options()));
        // Element sat 50px above the fold; the container scrolled back up
        assert_eq!(mock.scroll_top(container), 50.0);
    }

    #[test]
    fn test_extra_offset_applies_to_target_only() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let el = mock.insert(container, NodeConfig::new(Rect::new(0.0, 150.0, 100.0, 50.0)));

        drive(
            &scheduler,
            scroll_to_element(&dom, &handle, el, options().offset(-30.0)),
        );
        assert_eq!(mock.scroll_top(container), 120.0);
    }

    #[test]
    fn test_affect_parent_cascades_upward() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let outer = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let inner = mock.insert(
            outer,
            NodeConfig::new(Rect::new(0.0, 200.0, 100.0, 100.0)).scroll_height(400.0),
        );
        let el = mock.insert(inner, NodeConfig::new(Rect::new(0.0, 250.0, 100.0, 20.0)));

        drive(
            &scheduler,
            scroll_to_element(&dom, &handle, el, options().affect_parent(true)),
        );

        // Level one: el aligned within the inner container
        assert_eq!(mock.scroll_top(inner), 50.0);
        // Level two: the inner container aligned within the outer one
        assert_eq!(mock.scroll_top(outer), 200.0);
    }

    #[test]
    fn test_guard_failure_still_cascades_when_requested() {
        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let outer = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let inner = mock.insert(
            outer,
            NodeConfig::new(Rect::new(0.0, 200.0, 100.0, 100.0)).scroll_height(400.0),
        );
        // Aligned within the inner container already
        let el = mock.insert(inner, NodeConfig::new(Rect::new(0.0, 200.0, 100.0, 20.0)));

        drive(
            &scheduler,
            scroll_to_element(&dom, &handle, el, options().affect_parent(true)),
        );

        assert_eq!(mock.scroll_top(inner), 0.0);
        assert_eq!(mock.scroll_top(outer), 200.0);
    }

    #[test]
    fn test_animated_scroll_drives_visibility_observer() {
        use crate::visibility::observe_visibility;
        use std::sync::Mutex;

        let (mock, dom, scheduler, handle) = setup();
        let body = mock.body().unwrap();
        let container = mock.insert(
            body,
            NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0)).scroll_height(900.0),
        );
        let children = [
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 0.0, 100.0, 300.0))),
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 300.0, 100.0, 300.0))),
            mock.insert(container, NodeConfig::new(Rect::new(0.0, 600.0, 100.0, 300.0))),
        ];

        let seen: Arc<Mutex<Vec<Vec<ElementId>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = observe_visibility(&dom, container, &children, move |entries, _, _| {
            sink.lock()
                .unwrap()
                .push(entries.iter().map(|e| e.element).collect());
        });

        drive(
            &scheduler,
            scroll_to_element(&dom, &handle, children[2], options()),
        );
        assert_eq!(mock.scroll_top(container), 600.0);

        let seen = seen.lock().unwrap();
        // Initial snapshot, then the animation sweeping the visible set
        // across all three children until only the target remains
        assert_eq!(seen.first(), Some(&vec![children[0]]));
        assert_eq!(seen.last(), Some(&vec![children[2]]));
        assert!(seen.iter().any(|set| set.contains(&children[1])));
        drop(seen);
        sub.unsubscribe();
    }
}

//! Timed progress driver
//!
//! [`animate`] drives a progress callback from 0 to 1 over a fixed duration,
//! one invocation per scheduled frame, with an easing curve applied. The
//! returned [`Completion`] future resolves when the raw fraction reaches 1.
//!
//! The driver starts eagerly: the first frame is requested before the
//! future is ever polled, matching promise-style semantics. There is no
//! cancellation; once started, an animation runs to completion (or stalls if
//! the scheduler stops delivering frames). Callers that need to abort early
//! must gate their own `on_progress` callback.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::easing::{default_rate_factor, RateFactor};
use crate::scheduler::SchedulerHandle;

/// Resolves once the driving animation reaches its end
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}

enum DriverState {
    Running,
    Done,
}

/// Per-animation state, ticked once per frame by the scheduler
struct Driver {
    start: Instant,
    duration: Duration,
    on_progress: Box<dyn FnMut(f32) + Send>,
    rate_factor: RateFactor,
    done_tx: Option<oneshot::Sender<()>>,
    state: DriverState,
}

impl Driver {
    /// Advance one frame. Returns true while another frame is needed.
    fn tick(&mut self, now: Instant) -> bool {
        if matches!(self.state, DriverState::Done) {
            return false;
        }

        // Zero duration completes on the first frame; saturating elapsed
        // guards against a frame timestamp taken before `animate` ran.
        let raw = if self.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(self.start);
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };

        let applied = (self.rate_factor)(raw);
        (self.on_progress)(applied);

        if raw >= 1.0 {
            self.state = DriverState::Done;
            if let Some(tx) = self.done_tx.take() {
                let _ = tx.send(());
            }
            tracing::trace!(duration_ms = self.duration.as_millis() as u64, "animation done");
            false
        } else {
            true
        }
    }
}

/// Animate a progress callback from 0 to 1 over `duration`
///
/// Each frame the driver computes the raw elapsed fraction, clamped to 1,
/// feeds it through `rate_factor` (the default ease-out when `None`), and
/// invokes `on_progress` with the result. `on_progress` runs at least once
/// even for a zero duration, and exactly one terminal invocation happens
/// with a raw fraction of 1 before the returned future resolves.
pub fn animate<F>(
    scheduler: &SchedulerHandle,
    duration: Duration,
    on_progress: F,
    rate_factor: Option<RateFactor>,
) -> Completion
where
    F: FnMut(f32) + Send + 'static,
{
    let (done_tx, rx) = oneshot::channel();
    let driver = Arc::new(Mutex::new(Driver {
        start: Instant::now(),
        duration,
        on_progress: Box::new(on_progress),
        rate_factor: rate_factor.unwrap_or_else(|| Arc::new(default_rate_factor)),
        done_tx: Some(done_tx),
        state: DriverState::Running,
    }));

    schedule_tick(Arc::clone(scheduler), driver);
    Completion { rx }
}

fn schedule_tick(scheduler: SchedulerHandle, driver: Arc<Mutex<Driver>>) {
    let reschedule = Arc::clone(&scheduler);
    scheduler.request_frame(Box::new(move |now| {
        if driver.lock().unwrap().tick(now) {
            schedule_tick(reschedule, driver);
        }
    }));
}

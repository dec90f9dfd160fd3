//! Frame scheduling
//!
//! The host's per-frame callback primitive, behind the [`FrameScheduler`]
//! trait. The driver requests one frame at a time and re-requests from
//! inside the callback while the animation is still running.
//!
//! Two implementations ship with the crate:
//! - [`ThreadedFrameScheduler`] delivers frames from a background thread at
//!   a target FPS, for embedders without their own frame loop.
//! - [`ManualFrameScheduler`] queues callbacks and fires them when told to,
//!   with a synthetic clock. Tests drive it; so can hosts that already own a
//!   render loop.
//!
//! If a scheduler stops delivering frames, in-flight animations stall
//! forever; there is no timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A single frame callback, invoked with the frame timestamp
pub type FrameCallback = Box<dyn FnOnce(Instant) + Send>;

/// Per-frame scheduling primitive
pub trait FrameScheduler: Send + Sync {
    /// Schedule `callback` to run on the next frame
    fn request_frame(&self, callback: FrameCallback);
}

/// Shared handle to a frame scheduler
pub type SchedulerHandle = Arc<dyn FrameScheduler>;

// ============================================================================
// Threaded scheduler
// ============================================================================

/// Frame scheduler backed by a background thread
///
/// The thread wakes at the target FPS and drains whatever callbacks were
/// requested since the previous frame. It keeps running while the window (or
/// whatever owns it) is unfocused, and stops when the scheduler is dropped.
pub struct ThreadedFrameScheduler {
    queue: Arc<Mutex<Vec<FrameCallback>>>,
    stop_flag: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ThreadedFrameScheduler {
    /// Start a scheduler ticking at 120 frames per second
    pub fn new() -> Self {
        Self::with_fps(120)
    }

    /// Start a scheduler ticking at the given frame rate
    pub fn with_fps(fps: u32) -> Self {
        let queue: Arc<Mutex<Vec<FrameCallback>>> = Arc::new(Mutex::new(Vec::new()));
        let stop_flag = Arc::new(AtomicBool::new(false));

        let thread_queue = Arc::clone(&queue);
        let thread_stop = Arc::clone(&stop_flag);
        let frame_duration = Duration::from_micros(1_000_000 / u64::from(fps.max(1)));

        let thread_handle = Some(thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                let start = Instant::now();

                let batch = std::mem::take(&mut *thread_queue.lock().unwrap());
                if !batch.is_empty() {
                    let now = Instant::now();
                    for callback in batch {
                        callback(now);
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));

        Self {
            queue,
            stop_flag,
            thread_handle,
        }
    }
}

impl Default for ThreadedFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ThreadedFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.queue.lock().unwrap().push(callback);
    }
}

impl Drop for ThreadedFrameScheduler {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

// ============================================================================
// Manual scheduler
// ============================================================================

struct ManualInner {
    queue: Vec<FrameCallback>,
    now: Instant,
}

/// Frame scheduler driven by explicit [`advance`](ManualFrameScheduler::advance)
/// calls with a synthetic clock
///
/// Callbacks requested during a frame land in the next batch, so one
/// `advance` delivers exactly one frame to each pending animation.
pub struct ManualFrameScheduler {
    inner: Mutex<ManualInner>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ManualInner {
                queue: Vec::new(),
                now: Instant::now(),
            }),
        }
    }

    /// Current synthetic frame timestamp
    pub fn now(&self) -> Instant {
        self.inner.lock().unwrap().now
    }

    /// Number of callbacks waiting for a frame
    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Move the clock forward by `dt` and deliver one frame to every
    /// pending callback
    pub fn advance(&self, dt: Duration) {
        let (batch, now) = {
            let mut inner = self.inner.lock().unwrap();
            inner.now += dt;
            (std::mem::take(&mut inner.queue), inner.now)
        };
        for callback in batch {
            callback(now);
        }
    }
}

impl Default for ManualFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        self.inner.lock().unwrap().queue.push(callback);
    }
}

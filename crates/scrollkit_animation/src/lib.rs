//! scrollkit animation
//!
//! Frame-synchronized, time-bounded progress animation:
//!
//! - **Frame scheduling**: the [`FrameScheduler`] trait plus threaded and
//!   manually-driven implementations
//! - **Easing**: [`RateFactor`] curves with the stock [`Easing`] presets
//! - **Driver**: [`animate`], a `{Running, Done}` state machine ticked once
//!   per frame, resolving a [`Completion`] future at the end
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use scrollkit_animation::{animate, ManualFrameScheduler, SchedulerHandle};
//!
//! let scheduler = Arc::new(ManualFrameScheduler::new());
//! let handle: SchedulerHandle = scheduler.clone();
//!
//! let done = animate(&handle, Duration::from_millis(100), |rate| {
//!     // apply `rate` to whatever is being animated
//!     let _ = rate;
//! }, None);
//!
//! while scheduler.pending() > 0 {
//!     scheduler.advance(Duration::from_millis(16));
//! }
//! pollster::block_on(done);
//! ```

pub mod driver;
pub mod easing;
pub mod scheduler;

pub use driver::{animate, Completion};
pub use easing::{default_rate_factor, Easing, RateFactor};
pub use scheduler::{
    FrameCallback, FrameScheduler, ManualFrameScheduler, SchedulerHandle, ThreadedFrameScheduler,
};

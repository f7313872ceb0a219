//! # stepgen
//!
//! step driven generators for cooperative event loops
//!
//! a [`StepGenerator`] wraps a [`Producer`] and hands out one value per
//! `step()` call. Suspension happens between steps, never inside one, so
//! any external loop can poll it: a plain `loop`, the round robin
//! [`Scheduler`], or an async task through [`drive_async`].
//!
//! ```
//! use stepgen::{Gn, Step, Counter};
//!
//! let mut g = Gn::new(Counter::new(0..=2));
//! let mut sum = 0;
//! while let Step::Produced(v) = g.step().unwrap() {
//!     sum += *v;
//! }
//! assert_eq!(sum, 3);
//! assert!(g.is_done());
//!
//! let mut g = Gn::builder().label("count").build(Counter::new(5..=5));
//! assert_eq!(g.step().unwrap().produced(), Some(&5));
//! ```
//!

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod builtin;
mod driver;
mod error;
mod gen_impl;
mod observer;
mod producer;
mod state;

pub use crate::builtin::{BubbleSort, Counter};
pub use crate::driver::{drive, drive_async, drive_with, yield_now, Report, Scheduler, YieldNow};
pub use crate::error::{BoxError, Error, Hook, Misuse};
pub use crate::gen_impl::{Config, Gn, Step, StepGenerator, DEFAULT_LABEL};
pub use crate::observer::{Event, LogObserver, Observer, Recorder, Silent};
pub use crate::producer::{from_fn, from_iter, try_from_fn, FromFn, FromIter, Producer, TryFromFn};
pub use crate::state::{State, Watch};

/// return a produced value from a `try_from_fn` closure
#[macro_export]
macro_rules! yield_ {
    ($val:expr) => {
        return ::std::result::Result::Ok(::std::option::Option::Some($val))
    };
}

/// signal exhaustion from a `try_from_fn` closure
#[macro_export]
macro_rules! done {
    () => {
        return ::std::result::Result::Ok(::std::option::Option::None)
    };
}

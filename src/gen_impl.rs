//! # generator
//!
//! step generator implementation
//!

use std::fmt;
use std::panic;

use crate::error::{Error, Hook, Misuse};
use crate::observer::{LogObserver, Observer};
use crate::producer::Producer;
use crate::state::{State, Tracker, Watch};

/// label used when none is configured
pub const DEFAULT_LABEL: &str = "generator";

/// result of a successful `step()`
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Step<T> {
    /// the producer made a new value
    Produced(T),
    /// the producer is exhausted
    Completed,
}

impl<T> Step<T> {
    /// the produced value, if any
    pub fn produced(self) -> Option<T> {
        match self {
            Step::Produced(v) => Some(v),
            Step::Completed => None,
        }
    }

    /// is this the completion signal
    pub fn is_completed(&self) -> bool {
        matches!(self, Step::Completed)
    }
}

/// per generator options
#[derive(Debug, Clone)]
pub struct Config {
    /// diagnostic label passed to every lifecycle hook
    pub label: String,
    /// let the default observer log every produced value
    pub log_steps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            label: DEFAULT_LABEL.to_owned(),
            log_steps: true,
        }
    }
}

/// Generator helper
pub struct Gn<'a> {
    config: Config,
    observer: Option<Box<dyn Observer + 'a>>,
}

impl<'a> Gn<'a> {
    /// create a generator with the default config
    pub fn new<T, P>(producer: P) -> StepGenerator<'a, T>
    where
        P: Producer<T> + 'a,
    {
        Gn::builder().build(producer)
    }

    /// start configuring a generator
    pub fn builder() -> Self {
        Gn {
            config: Config::default(),
            observer: None,
        }
    }

    /// use the given config
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// set the diagnostic label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// enable or disable per value logging of the default observer
    pub fn log_steps(mut self, enable: bool) -> Self {
        self.config.log_steps = enable;
        self
    }

    /// replace the default `LogObserver`
    pub fn observer<O: Observer + 'a>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// build the generator in `Created` state, nothing runs yet
    pub fn build<T, P>(self, producer: P) -> StepGenerator<'a, T>
    where
        P: Producer<T> + 'a,
    {
        let observer = match self.observer {
            Some(o) => o,
            None => Box::new(LogObserver::new(self.config.log_steps)),
        };
        StepGenerator {
            label: self.config.label,
            producer: Some(Box::new(producer)),
            observer,
            value: None,
            tracker: Tracker::new(),
        }
    }
}

/// a resumable unit of work polled one step at a time
///
/// `on_init` runs on the first `step()`, `on_dispose` runs exactly once
/// either at the step that reaches a terminal state, on `cancel()`, or
/// when the generator is dropped
pub struct StepGenerator<'a, T> {
    label: String,
    // taken on dispose, so the producer's resources go with it
    producer: Option<Box<dyn Producer<T> + 'a>>,
    observer: Box<dyn Observer + 'a>,
    // only set right after a `Produced` step
    value: Option<T>,
    tracker: Tracker,
}

impl<'a, T> StepGenerator<'a, T> {
    /// the diagnostic label
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// current lifecycle state
    #[inline]
    pub fn state(&self) -> State {
        self.tracker.state()
    }

    /// is the generator in a terminal state
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state().is_terminal()
    }

    /// has the dispose hook run
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.tracker.is_disposed()
    }

    /// number of values produced so far
    #[inline]
    pub fn produced(&self) -> usize {
        self.tracker.produced()
    }

    /// get a read-only view of state and progress
    pub fn watch(&self) -> Watch {
        self.tracker.watch()
    }

    /// the value produced by the last step
    pub fn current(&self) -> Result<&T, Error> {
        self.value.as_ref().ok_or(Error::Misuse(Misuse::NoValue))
    }

    /// run exactly the work needed for the next value
    ///
    /// a producer fault is returned as `Error::Producer` after the generator
    /// moved to `Failed` and ran dispose. A panic inside the producer is
    /// handled the same way and then resumed on the caller.
    pub fn step(&mut self) -> Result<Step<&T>, Error> {
        let state = self.state();
        if state.is_terminal() {
            return Err(Misuse::Terminated(state).into());
        }
        if state == State::Created {
            self.init()?;
        }

        self.value = None;
        let producer = match self.producer.as_mut() {
            Some(p) => p,
            None => return Err(Misuse::Terminated(self.state()).into()),
        };

        match panic::catch_unwind(panic::AssertUnwindSafe(|| producer.resume())) {
            Err(cause) => {
                error!("producer of `{}` panicked", self.label);
                if let Err(e) = self.terminate(State::Failed) {
                    error!("{e}");
                }
                panic::resume_unwind(cause)
            }
            Ok(Err(fault)) => {
                if let Err(e) = self.terminate(State::Failed) {
                    error!("`{}` failed twice, dropping: {e}", self.label);
                }
                Err(Error::Producer(fault))
            }
            Ok(Ok(None)) => {
                self.terminate(State::Completed)?;
                Ok(Step::Completed)
            }
            Ok(Ok(Some(v))) => {
                let index = self.produced();
                self.tracker.set_state(State::Running);
                if let Err(source) = self.observer.on_step(&self.label, index) {
                    self.poison();
                    return Err(Error::Host {
                        hook: Hook::Step,
                        source,
                    });
                }
                self.tracker.inc_produced();
                let v: &T = self.value.insert(v);
                Ok(Step::Produced(v))
            }
        }
    }

    /// step and report if a value was produced
    ///
    /// `Ok(false)` means the generator just completed
    pub fn move_next(&mut self) -> Result<bool, Error> {
        self.step().map(|s| !s.is_completed())
    }

    /// release the producer now, running dispose if it has not run yet
    ///
    /// an unfinished generator ends up `Completed`, the dispose hook still
    /// sees the state it was released from. Unlike dropping the generator
    /// this surfaces a dispose hook fault.
    pub fn cancel(&mut self) -> Result<(), Error> {
        if self.is_disposed() {
            return Ok(());
        }
        if !self.is_done() {
            debug!("`{}` cancelled in {} state", self.label, self.state());
        }
        self.value = None;
        self.release()
    }

    fn init(&mut self) -> Result<(), Error> {
        if let Err(source) = self.observer.on_init(&self.label) {
            self.poison();
            return Err(Error::Host {
                hook: Hook::Init,
                source,
            });
        }
        self.tracker.set_state(State::Initialized);
        Ok(())
    }

    // host fault, the original error is the one surfaced
    fn poison(&mut self) {
        if let Err(e) = self.terminate(State::Failed) {
            error!("`{}` poisoned: {e}", self.label);
        }
    }

    fn terminate(&mut self, state: State) -> Result<(), Error> {
        self.tracker.set_state(state);
        self.value = None;
        self.dispose()
    }

    // dispose out of band, then settle in a terminal state
    fn release(&mut self) -> Result<(), Error> {
        let ret = self.dispose();
        if !self.is_done() {
            self.tracker.set_state(State::Completed);
        }
        ret
    }

    fn dispose(&mut self) -> Result<(), Error> {
        if self.is_disposed() {
            return Ok(());
        }
        self.tracker.set_disposed();
        drop(self.producer.take());

        let state = self.state();
        self.observer
            .on_dispose(&self.label, state)
            .map_err(|source| {
                self.tracker.set_state(State::Failed);
                Error::Host {
                    hook: Hook::Dispose,
                    source,
                }
            })
    }
}

impl<'a, T> Drop for StepGenerator<'a, T> {
    fn drop(&mut self) {
        if self.is_disposed() {
            return;
        }

        if self.state() != State::Created {
            warn!("generator `{}` is not done while drop", self.label);
        }

        if let Err(e) = self.release() {
            error!("{e}");
        }
    }
}

impl<'a, T: Clone> Iterator for StepGenerator<'a, T> {
    type Item = Result<T, Error>;

    // a fault is yielded once, after that the iterator is fused
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done() || self.is_disposed() {
            return None;
        }
        match self.step() {
            Ok(Step::Produced(v)) => Some(Ok(v.clone())),
            Ok(Step::Completed) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'a, T> fmt::Debug for StepGenerator<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepGenerator")
            .field("label", &self.label)
            .field("state", &self.state())
            .field("produced", &self.produced())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

//! # state
//!
//! generator lifecycle state and read-only watchers
//!

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// lifecycle state of a step generator
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum State {
    /// built but never stepped
    Created,
    /// init hook has run, the first value is being computed
    Initialized,
    /// the last step produced a value
    Running,
    /// the producer is exhausted
    Completed,
    /// the producer or a lifecycle hook failed
    Failed,
}

impl State {
    /// `Completed` or `Failed`
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Completed | State::Failed)
    }

    /// states in which `step()` may be called
    #[inline]
    pub fn can_step(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Created => "created",
            State::Initialized => "initialized",
            State::Running => "running",
            State::Completed => "completed",
            State::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone)]
struct Snapshot {
    state: State,
    produced: usize,
    disposed: bool,
}

/// read-only view of a generator's progress
///
/// any number of watches can exist next to the single writable generator,
/// they stay valid after the generator itself is dropped
#[derive(Debug, Clone)]
pub struct Watch {
    inner: Rc<Cell<Snapshot>>,
}

impl Watch {
    /// current lifecycle state
    pub fn state(&self) -> State {
        self.inner.get().state
    }

    /// number of values produced so far
    pub fn produced(&self) -> usize {
        self.inner.get().produced
    }

    /// has the dispose hook run
    pub fn is_disposed(&self) -> bool {
        self.inner.get().disposed
    }
}

/// writer side of `Watch`, owned by the generator
#[derive(Debug)]
pub(crate) struct Tracker {
    inner: Rc<Cell<Snapshot>>,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        Tracker {
            inner: Rc::new(Cell::new(Snapshot {
                state: State::Created,
                produced: 0,
                disposed: false,
            })),
        }
    }

    pub(crate) fn watch(&self) -> Watch {
        Watch {
            inner: self.inner.clone(),
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> State {
        self.inner.get().state
    }

    #[inline]
    pub(crate) fn produced(&self) -> usize {
        self.inner.get().produced
    }

    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.inner.get().disposed
    }

    pub(crate) fn set_state(&self, state: State) {
        let mut snap = self.inner.get();
        snap.state = state;
        self.inner.set(snap);
    }

    pub(crate) fn inc_produced(&self) {
        let mut snap = self.inner.get();
        snap.produced += 1;
        self.inner.set(snap);
    }

    pub(crate) fn set_disposed(&self) {
        let mut snap = self.inner.get();
        snap.disposed = true;
        self.inner.set(snap);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_terminal() {
        assert!(State::Completed.is_terminal());
        assert!(State::Failed.is_terminal());
        assert!(State::Created.can_step());
        assert!(State::Running.can_step());
    }

    #[test]
    fn test_watch_follows_tracker() {
        let tracker = Tracker::new();
        let watch = tracker.watch();
        assert_eq!(watch.state(), State::Created);

        tracker.set_state(State::Running);
        tracker.inc_produced();
        tracker.inc_produced();
        assert_eq!(watch.state(), State::Running);
        assert_eq!(watch.produced(), 2);
        assert!(!watch.is_disposed());

        tracker.set_disposed();
        drop(tracker);
        assert!(watch.is_disposed());
    }
}

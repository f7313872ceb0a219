//! # observer
//!
//! lifecycle hooks of a step generator
//!
//! hooks fire in a fixed order: `on_init` once on the first step,
//! `on_step` after every produced value and `on_dispose` once when the
//! generator terminates or is released
//!

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::BoxError;
use crate::state::State;

/// receives lifecycle notifications
///
/// an error returned from any hook is fatal for the generator
pub trait Observer {
    /// first `step()`, before the first value is computed
    fn on_init(&mut self, _label: &str) -> Result<(), BoxError> {
        Ok(())
    }

    /// a value was produced, `index` counts from zero
    fn on_step(&mut self, _label: &str, _index: usize) -> Result<(), BoxError> {
        Ok(())
    }

    /// the generator is released, `state` is the state it was released from
    fn on_dispose(&mut self, _label: &str, _state: State) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_init(&mut self, label: &str) -> Result<(), BoxError> {
        (**self).on_init(label)
    }

    fn on_step(&mut self, label: &str, index: usize) -> Result<(), BoxError> {
        (**self).on_step(label, index)
    }

    fn on_dispose(&mut self, label: &str, state: State) -> Result<(), BoxError> {
        (**self).on_dispose(label, state)
    }
}

/// observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Observer for Silent {}

/// the default observer, reports the lifecycle through `log`
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    log_steps: bool,
}

impl LogObserver {
    /// create a log observer, `log_steps` enables the per value lines
    pub fn new(log_steps: bool) -> Self {
        LogObserver { log_steps }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        LogObserver::new(true)
    }
}

impl Observer for LogObserver {
    fn on_init(&mut self, label: &str) -> Result<(), BoxError> {
        info!("{label} init");
        Ok(())
    }

    fn on_step(&mut self, label: &str, index: usize) -> Result<(), BoxError> {
        if self.log_steps {
            debug!("{label} step {index}");
        }
        Ok(())
    }

    fn on_dispose(&mut self, label: &str, state: State) -> Result<(), BoxError> {
        match state {
            State::Failed => warn!("{label} dispose after failure"),
            _ => info!("{label} dispose"),
        }
        Ok(())
    }
}

/// a lifecycle notification captured by [`Recorder`]
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Event {
    /// `on_init(label)`
    Init(String),
    /// `on_step(label, index)`
    Step(String, usize),
    /// `on_dispose(label, state)`
    Dispose(String, State),
}

/// observer that records every notification in order
///
/// clones share the same event list, so one clone can be handed to a
/// generator while another one is kept for inspection
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    /// create an empty recorder
    pub fn new() -> Self {
        Recorder::default()
    }

    /// all events recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// number of `on_init` calls
    pub fn inits(&self) -> usize {
        self.count(|e| matches!(e, Event::Init(_)))
    }

    /// number of `on_step` calls
    pub fn steps(&self) -> usize {
        self.count(|e| matches!(e, Event::Step(..)))
    }

    /// number of `on_dispose` calls
    pub fn disposes(&self) -> usize {
        self.count(|e| matches!(e, Event::Dispose(..)))
    }

    fn count(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| f(e)).count()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl Observer for Recorder {
    fn on_init(&mut self, label: &str) -> Result<(), BoxError> {
        self.push(Event::Init(label.to_owned()));
        Ok(())
    }

    fn on_step(&mut self, label: &str, index: usize) -> Result<(), BoxError> {
        self.push(Event::Step(label.to_owned(), index));
        Ok(())
    }

    fn on_dispose(&mut self, label: &str, state: State) -> Result<(), BoxError> {
        self.push(Event::Dispose(label.to_owned(), state));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_recorder_shared() {
        let rec = Recorder::new();
        let mut obs: Box<dyn Observer> = Box::new(rec.clone());

        obs.on_init("a").unwrap();
        obs.on_step("a", 0).unwrap();
        obs.on_dispose("a", State::Completed).unwrap();

        assert_eq!(
            rec.events(),
            vec![
                Event::Init("a".into()),
                Event::Step("a".into(), 0),
                Event::Dispose("a".into(), State::Completed),
            ]
        );
        assert_eq!((rec.inits(), rec.steps(), rec.disposes()), (1, 1, 1));
    }

    #[test]
    fn test_defaults_never_fail() {
        let mut obs = LogObserver::new(false);
        assert!(obs.on_init("x").is_ok());
        assert!(obs.on_step("x", 3).is_ok());
        assert!(obs.on_dispose("x", State::Failed).is_ok());
        assert!(Silent.on_init("x").is_ok());
    }
}

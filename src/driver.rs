//! # driver
//!
//! loops that poll step generators from the outside
//!
//! every driver follows the same contract: give other work a chance to run,
//! call `step()` once, and stop the first time it returns `Completed` or an
//! error. The drivers are plain functions and hold no global state.
//!

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::Error;
use crate::gen_impl::{Step, StepGenerator};

/// drive a generator to its end, handing every value to `sink`
///
/// returns the number of produced values
pub fn drive<T, F>(gen: &mut StepGenerator<'_, T>, sink: F) -> Result<usize, Error>
where
    F: FnMut(&T),
{
    drive_with(gen, || {}, sink)
}

/// drive a generator, calling `yield_` before every step
///
/// `yield_` is where the caller hands control back to its own scheduler
pub fn drive_with<T, Y, F>(
    gen: &mut StepGenerator<'_, T>,
    mut yield_: Y,
    mut sink: F,
) -> Result<usize, Error>
where
    Y: FnMut(),
    F: FnMut(&T),
{
    let mut count = 0;
    loop {
        yield_();
        match gen.step()? {
            Step::Produced(v) => {
                sink(v);
                count += 1;
            }
            Step::Completed => return Ok(count),
        }
    }
}

/// future that is pending exactly once
///
/// awaiting it lets the executor run other tasks before continuing
#[derive(Debug, Default)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// hand control back to the executor once
pub fn yield_now() -> YieldNow {
    YieldNow::default()
}

/// drive a generator from an async task
///
/// the task yields to its executor before every step, so several
/// generators driven on one executor interleave step by step
pub async fn drive_async<T, F>(gen: &mut StepGenerator<'_, T>, mut sink: F) -> Result<usize, Error>
where
    F: FnMut(&T),
{
    let mut count = 0;
    loop {
        yield_now().await;
        match gen.step()? {
            Step::Produced(v) => {
                sink(v);
                count += 1;
            }
            Step::Completed => return Ok(count),
        }
    }
}

/// the final outcome of one scheduled generator
#[derive(Debug)]
pub struct Report {
    /// the generator's label
    pub label: String,
    /// number of produced values, or the fault that ended it
    pub outcome: Result<usize, Error>,
}

trait Task {
    fn label(&self) -> &str;

    // `Some` once the generator reached its end
    fn tick(&mut self) -> Option<Result<usize, Error>>;
}

struct Driven<'a, T, F> {
    gen: StepGenerator<'a, T>,
    sink: F,
    count: usize,
}

impl<'a, T, F: FnMut(&T)> Task for Driven<'a, T, F> {
    fn label(&self) -> &str {
        self.gen.label()
    }

    fn tick(&mut self) -> Option<Result<usize, Error>> {
        match self.gen.step() {
            Ok(Step::Produced(v)) => {
                (self.sink)(v);
                self.count += 1;
                None
            }
            Ok(Step::Completed) => Some(Ok(self.count)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// round robin scheduler for several generators on one thread
///
/// each round steps every live generator once, in spawn order. A generator
/// is released as soon as it completes or fails.
#[derive(Default)]
pub struct Scheduler<'a> {
    tasks: Vec<Box<dyn Task + 'a>>,
    rounds: usize,
}

impl<'a> Scheduler<'a> {
    /// create an empty scheduler
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// add a generator, its values go to `sink`
    pub fn spawn<T, F>(&mut self, gen: StepGenerator<'a, T>, sink: F)
    where
        T: 'a,
        F: FnMut(&T) + 'a,
    {
        self.tasks.push(Box::new(Driven {
            gen,
            sink,
            count: 0,
        }));
    }

    /// number of generators still running
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// is there nothing left to run
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// number of rounds run so far
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// step every live generator once
    ///
    /// returns the reports of generators that finished in this round
    pub fn tick(&mut self) -> Vec<Report> {
        let mut reports = Vec::new();
        self.tasks.retain_mut(|task| match task.tick() {
            None => true,
            Some(outcome) => {
                if let Err(e) = &outcome {
                    warn!("`{}` stopped: {e}", task.label());
                }
                reports.push(Report {
                    label: task.label().to_owned(),
                    outcome,
                });
                false
            }
        });
        self.rounds += 1;
        reports
    }

    /// run rounds until every generator finished
    ///
    /// reports come in completion order
    pub fn run(&mut self) -> Vec<Report> {
        let mut reports = Vec::new();
        while !self.is_empty() {
            reports.extend(self.tick());
        }
        reports
    }
}

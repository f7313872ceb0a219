use stepgen::*;

fn recorded<'a, T, P: Producer<T> + 'a>(label: &str, p: P) -> (StepGenerator<'a, T>, Recorder) {
    let rec = Recorder::new();
    let g = Gn::builder().label(label).observer(rec.clone()).build(p);
    (g, rec)
}

fn fails_on_second() -> impl Producer<i32> {
    let mut i = 0;
    try_from_fn(move || {
        i += 1;
        match i {
            1 => Ok(Some(0)),
            _ => Err("second value unavailable".into()),
        }
    })
}

#[test]
fn produces_then_completes() {
    let (mut g, _) = recorded("a", from_iter([0, 1, 2]));

    assert_eq!(g.step().unwrap(), Step::Produced(&0));
    assert_eq!(g.step().unwrap(), Step::Produced(&1));
    assert_eq!(g.step().unwrap(), Step::Produced(&2));
    assert_eq!(g.step().unwrap(), Step::Completed);
    assert!(g.is_done());
    assert!(g.current().is_err());
}

#[test]
fn n_values_then_completed() {
    for n in [0usize, 1, 5, 11] {
        let (mut g, rec) = recorded("n", from_iter(0..n));
        let mut produced = 0;
        loop {
            match g.step().unwrap() {
                Step::Produced(_) => produced += 1,
                Step::Completed => break,
            }
        }
        assert_eq!(produced, n);
        assert_eq!(rec.steps(), n);
        assert!(matches!(
            g.step(),
            Err(Error::Misuse(Misuse::Terminated(State::Completed)))
        ));
    }
}

#[test]
fn empty_producer() {
    let (mut g, rec) = recorded("empty", from_iter(Vec::<u8>::new()));

    assert_eq!(g.step().unwrap(), Step::Completed);
    assert!(g.current().is_err());
    drop(g);
    assert_eq!(
        rec.events(),
        vec![
            Event::Init("empty".into()),
            Event::Dispose("empty".into(), State::Completed),
        ]
    );
}

#[test]
fn fault_on_second_value() {
    let (mut g, rec) = recorded("c", fails_on_second());

    assert_eq!(g.step().unwrap(), Step::Produced(&0));
    let err = g.step().unwrap_err();
    assert!(err.is_producer());
    assert_eq!(err.to_string(), "producer fault: second value unavailable");
    assert_eq!(g.state(), State::Failed);
    assert_eq!(rec.disposes(), 1);

    // the fault is not retried
    assert!(matches!(
        g.step(),
        Err(Error::Misuse(Misuse::Terminated(State::Failed)))
    ));
    drop(g);
    assert_eq!(
        rec.events(),
        vec![
            Event::Init("c".into()),
            Event::Step("c".into(), 0),
            Event::Dispose("c".into(), State::Failed),
        ]
    );
}

#[test]
fn init_runs_once_before_first_value() {
    let rec = Recorder::new();
    let probe = rec.clone();
    let mut g = Gn::builder().label("i").observer(rec.clone()).build(from_fn(move || {
        // init must already be recorded when the producer runs
        assert_eq!(probe.inits(), 1);
        Some(())
    }));

    for _ in 0..3 {
        g.step().unwrap();
    }
    assert_eq!(rec.inits(), 1);
    assert_eq!(rec.events()[0], Event::Init("i".into()));
}

#[test]
fn dispose_once_on_every_exit_path() {
    // normal exhaustion
    let (mut g, rec) = recorded("done", Counter::new(0..=2));
    assert_eq!(drive(&mut g, |_| {}).unwrap(), 3);
    drop(g);
    assert_eq!(rec.disposes(), 1);

    // fault
    let (mut g, rec) = recorded("fault", fails_on_second());
    assert!(drive(&mut g, |_| {}).is_err());
    drop(g);
    assert_eq!(rec.disposes(), 1);

    // abandoned half way
    let (mut g, rec) = recorded("abandoned", Counter::new(0..=10));
    g.step().unwrap();
    g.step().unwrap();
    assert_eq!(rec.disposes(), 0);
    drop(g);
    assert_eq!(rec.disposes(), 1);
    assert_eq!(
        rec.events().last(),
        Some(&Event::Dispose("abandoned".into(), State::Running))
    );
}

#[test]
fn never_stepped_still_disposes() {
    let (g, rec) = recorded("idle", Counter::new(0..=10));
    let watch = g.watch();
    assert_eq!(watch.state(), State::Created);
    drop(g);

    assert_eq!(
        rec.events(),
        vec![Event::Dispose("idle".into(), State::Created)]
    );
    assert!(watch.is_disposed());
    assert!(watch.state().is_terminal());
}

#[test]
fn abandoned_generator_ends_terminal() {
    let (mut g, rec) = recorded("half", Counter::new(0..=10));
    let watch = g.watch();
    g.step().unwrap();
    drop(g);

    assert_eq!(watch.state(), State::Completed);
    assert_eq!(watch.produced(), 1);
    assert_eq!(
        rec.events().last(),
        Some(&Event::Dispose("half".into(), State::Running))
    );
}

#[test]
fn cancelled_generator_is_done() {
    let (mut g, rec) = recorded("cancel", Counter::new(0..=10));
    let watch = g.watch();
    g.step().unwrap();
    g.cancel().unwrap();

    assert!(g.is_done());
    assert!(watch.state().is_terminal());
    assert!(!watch.state().can_step());
    assert!(matches!(
        g.step(),
        Err(Error::Misuse(Misuse::Terminated(State::Completed)))
    ));
    // driving it again is refused without stepping
    assert!(drive(&mut g, |_| {}).unwrap_err().is_misuse());
    assert_eq!(rec.disposes(), 1);
}

#[test]
fn current_before_step_is_misuse() {
    let (g, _) = recorded("m", Counter::new(0..=1));
    assert!(matches!(g.current(), Err(Error::Misuse(Misuse::NoValue))));
}

#[test]
fn watch_is_read_only_view() {
    let (mut g, _) = recorded("w", Counter::new(1..=3));
    let watch = g.watch();
    let other = watch.clone();

    g.step().unwrap();
    g.step().unwrap();
    assert_eq!(watch.state(), State::Running);
    assert_eq!(other.produced(), 2);
    assert_eq!(*g.current().unwrap(), 2);

    drive(&mut g, |_| {}).unwrap();
    assert_eq!(watch.state(), State::Completed);
    assert_eq!(watch.produced(), 3);
    assert!(watch.is_disposed());
}

#[test]
fn producer_released_on_dispose() {
    use std::rc::Rc;

    let token = Rc::new(());
    let held = token.clone();
    let mut g = Gn::builder().observer(Silent).build(from_fn(move || {
        let _keep = &held;
        None::<u8>
    }));
    assert_eq!(Rc::strong_count(&token), 2);

    assert_eq!(g.step().unwrap(), Step::Completed);
    // the generator is still alive, its producer is gone
    assert_eq!(Rc::strong_count(&token), 1);
    assert!(g.is_disposed());
}

#[test]
fn bubble_sort_trace() {
    let (mut g, _) = recorded("sort", BubbleSort::new(vec![4, 3, 1]));
    let mut trace = Vec::new();
    drive(&mut g, |v| trace.push(v.clone())).unwrap();
    assert_eq!(
        trace,
        vec![vec![3, 4, 1], vec![3, 1, 4], vec![1, 3, 4]]
    );
}

#[test]
fn scheduler_runs_all() {
    let rec = Recorder::new();
    let mut sched = Scheduler::new();
    for (label, end) in [("Coro1", 10), ("Coro2", 10), ("Coro3", 3)] {
        let g = Gn::builder()
            .label(label)
            .observer(rec.clone())
            .build(Counter::new(0..=end));
        sched.spawn(g, |_| {});
    }

    let reports = sched.run();
    let order: Vec<_> = reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(order, vec!["Coro3", "Coro1", "Coro2"]);
    assert_eq!(*reports[1].outcome.as_ref().unwrap(), 11);
    assert_eq!(rec.inits(), 3);
    assert_eq!(rec.disposes(), 3);
    assert_eq!(rec.steps(), 11 + 11 + 4);
}

#[tokio::test]
async fn async_driver_scenario() {
    let (mut g, rec) = recorded("async", from_iter([0, 1, 2]));
    let mut out = Vec::new();

    let n = drive_async(&mut g, |v| out.push(*v)).await.unwrap();
    assert_eq!(n, 3);
    assert_eq!(out, vec![0, 1, 2]);
    assert_eq!(rec.disposes(), 1);
}

#[tokio::test]
async fn async_drivers_interleave() {
    let rec = Recorder::new();
    let mut a = Gn::builder()
        .label("a")
        .observer(rec.clone())
        .build(Counter::new(0..=3));
    let mut b = Gn::builder()
        .label("b")
        .observer(rec.clone())
        .build(Counter::new(0..=3));

    let (ra, rb) = tokio::join!(drive_async(&mut a, |_| {}), drive_async(&mut b, |_| {}));
    assert_eq!(ra.unwrap(), 4);
    assert_eq!(rb.unwrap(), 4);

    let events = rec.events();
    let last_init = events
        .iter()
        .rposition(|e| matches!(e, Event::Init(_)))
        .unwrap();
    let first_dispose = events
        .iter()
        .position(|e| matches!(e, Event::Dispose(..)))
        .unwrap();
    assert!(last_init < first_dispose);
}

#[tokio::test]
async fn async_driver_propagates_fault() {
    let (mut g, rec) = recorded("bad", fails_on_second());
    let err = drive_async(&mut g, |_| {}).await.unwrap_err();
    assert!(err.is_producer());
    assert_eq!(rec.disposes(), 1);
}

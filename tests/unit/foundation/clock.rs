use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn manual_clock_advances_monotonically() {
    let clock = ManualClock::new(100.0);
    assert_eq!(clock.now_ms(), 100.0);
    assert_eq!(clock.advance(16.5), 116.5);
    assert_eq!(clock.advance(-5.0), 116.5);
    clock.set(10.0);
    assert_eq!(clock.now_ms(), 10.0);
}

#[test]
fn callbacks_run_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut sched = FrameScheduler::new();
    for name in ["a", "b"] {
        let log = log.clone();
        sched.on_tick(move |now| log.borrow_mut().push((name, now)));
    }
    sched.tick(16.0);
    sched.tick(32.0);
    assert_eq!(
        *log.borrow(),
        vec![("a", 16.0), ("b", 16.0), ("a", 32.0), ("b", 32.0)]
    );
    assert_eq!(sched.frames(), 2);
}

#[test]
fn cancelled_handles_stop_firing() {
    let hits = Rc::new(RefCell::new(0u32));
    let mut sched = FrameScheduler::new();
    let h = {
        let hits = hits.clone();
        sched.on_tick(move |_| *hits.borrow_mut() += 1)
    };
    sched.tick(0.0);
    assert!(sched.cancel(h));
    assert!(!sched.cancel(h));
    sched.tick(16.0);
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(sched.active(), 0);
}

#[test]
fn callback_can_cancel_itself_through_canceller() {
    let hits = Rc::new(RefCell::new(0u32));
    let mut sched = FrameScheduler::new();
    let canceller = sched.canceller();
    let slot: Rc<RefCell<Option<TickHandle>>> = Rc::new(RefCell::new(None));
    let h = {
        let hits = hits.clone();
        let slot = slot.clone();
        sched.on_tick(move |_| {
            *hits.borrow_mut() += 1;
            if *hits.borrow() == 2 {
                if let Some(h) = *slot.borrow() {
                    canceller.cancel(h);
                }
            }
        })
    };
    *slot.borrow_mut() = Some(h);
    for f in 0..5 {
        sched.tick(f as f64 * 16.0);
    }
    assert_eq!(*hits.borrow(), 2);
    assert_eq!(sched.active(), 0);
}

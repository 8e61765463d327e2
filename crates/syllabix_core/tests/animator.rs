use std::time::{Duration, Instant};

use syllabix_core::{FrameOutcome, PageCounter, ProgressAnimator};

const DURATION: Duration = Duration::from_millis(500);

fn at(start: Instant, millis: u64) -> Instant {
    start + Duration::from_millis(millis)
}

#[test]
fn converges_to_target_with_monotonic_ease() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let generation = animator.retarget(50.0, start).expect("target changed");

    assert_eq!(animator.on_frame(generation, start), FrameOutcome::Continue);
    assert_eq!(animator.displayed(), 0.0);

    let mut previous = animator.displayed();
    for millis in (16..500).step_by(16) {
        assert_eq!(
            animator.on_frame(generation, at(start, millis)),
            FrameOutcome::Continue
        );
        let value = animator.displayed();
        assert!(value > previous, "{value} <= {previous} at {millis}ms");
        assert!(value < 50.0);
        previous = value;
    }

    assert_eq!(
        animator.on_frame(generation, at(start, 500)),
        FrameOutcome::Settled
    );
    assert_eq!(animator.displayed(), 50.0);
    assert!(!animator.is_running());
}

#[test]
fn settles_exactly_when_frame_arrives_late() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let generation = animator.retarget(37.5, start).unwrap();

    assert_eq!(
        animator.on_frame(generation, at(start, 5_000)),
        FrameOutcome::Settled
    );
    assert_eq!(animator.displayed(), 37.5);
}

#[test]
fn retarget_restarts_from_displayed_value() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let first = animator.retarget(50.0, start).unwrap();

    // Walk forward until the bar has passed 30%.
    let mut millis = 0;
    while animator.displayed() < 30.0 {
        millis += 1;
        animator.on_frame(first, at(start, millis));
    }
    let shown = animator.displayed();

    let second = animator.retarget(80.0, at(start, millis)).unwrap();

    assert_ne!(first, second);
    assert_eq!(animator.start_value(), shown);
    assert_eq!(animator.target(), 80.0);

    assert_eq!(
        animator.on_frame(second, at(start, millis)),
        FrameOutcome::Continue
    );
    assert_eq!(animator.displayed(), shown);
}

#[test]
fn stale_frames_are_ignored_after_retarget() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let first = animator.retarget(50.0, start).unwrap();
    animator.on_frame(first, at(start, 100));
    let second = animator.retarget(80.0, at(start, 100)).unwrap();
    let restart_value = animator.displayed();

    assert_eq!(
        animator.on_frame(first, at(start, 400)),
        FrameOutcome::Stale
    );
    assert_eq!(animator.displayed(), restart_value);

    assert_eq!(
        animator.on_frame(second, at(start, 600)),
        FrameOutcome::Settled
    );
    assert_eq!(animator.displayed(), 80.0);
}

#[test]
fn unchanged_target_does_not_restart() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let generation = animator.retarget(20.0, start).unwrap();

    assert_eq!(animator.retarget(20.0, at(start, 50)), None);
    assert_eq!(animator.generation(), generation);
}

#[test]
fn targets_are_clamped_to_percent_range() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let generation = animator.retarget(140.0, start).unwrap();

    animator.on_frame(generation, at(start, 500));
    assert_eq!(animator.displayed(), 100.0);
}

#[test]
fn stop_freezes_and_rejects_pending_frames() {
    let start = Instant::now();
    let mut animator = ProgressAnimator::new(DURATION);
    let generation = animator.retarget(60.0, start).unwrap();
    animator.on_frame(generation, at(start, 100));
    let frozen = animator.displayed();

    assert!(animator.stop());
    assert!(!animator.stop());
    assert_eq!(
        animator.on_frame(generation, at(start, 600)),
        FrameOutcome::Stale
    );
    assert_eq!(animator.displayed(), frozen);
}

#[test]
fn page_counter_only_moves_forward() {
    let mut counter = PageCounter::default();

    assert!(!counter.observe(0, None));
    assert!(counter.observe(3, Some("exam.pdf")));
    assert!(!counter.observe(2, Some("exam.pdf")));
    assert_eq!(counter.shown(), 3);
    assert!(counter.observe(5, Some("exam.pdf")));
    assert_eq!(counter.shown(), 5);
}

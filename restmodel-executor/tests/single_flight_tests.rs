use restmodel_executor::{ExecutorError, SingleFlight};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn counting_action(
    counter: &Arc<AtomicUsize>,
    delay: Duration,
) -> impl FnOnce() -> futures::future::BoxFuture<'static, usize> {
    let counter = Arc::clone(counter);
    move || {
        Box::pin(async move {
            let runs = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(delay).await;
            runs
        })
    }
}

// ── Coalescing ───────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn concurrent_runs_execute_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let guard = SingleFlight::new("test");

    let first = guard.run(counting_action(&counter, Duration::from_millis(5)));
    let second = guard.run(counting_action(&counter, Duration::from_millis(5)));
    let third = guard.run(counting_action(&counter, Duration::from_millis(5)));

    let (a, b, c) = tokio::join!(first, second, third);
    assert_eq!(a, Ok(1));
    assert_eq!(b, Ok(1));
    assert_eq!(c, Ok(1));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(guard.started(), 1);
}

#[tokio::test(start_paused = true)]
async fn sequential_runs_execute_each_time() {
    let counter = Arc::new(AtomicUsize::new(0));
    let guard = SingleFlight::new("test");

    assert_eq!(guard.run(counting_action(&counter, Duration::from_millis(5))).await, Ok(1));
    assert_eq!(guard.run(counting_action(&counter, Duration::from_millis(5))).await, Ok(2));
    assert_eq!(guard.run(counting_action(&counter, Duration::from_millis(5))).await, Ok(3));
    assert_eq!(guard.started(), 3);
}

#[tokio::test(start_paused = true)]
async fn joined_caller_does_not_invoke_its_action() {
    let guard = SingleFlight::new("test");
    let counter = Arc::new(AtomicUsize::new(0));
    let ignored = Arc::new(AtomicUsize::new(0));
    let first = guard.run(counting_action(&counter, Duration::from_millis(10)));

    let second = guard.run(counting_action(&ignored, Duration::from_millis(10)));

    assert_eq!(first.await, Ok(1));
    assert_eq!(second.await, Ok(1));
    assert_eq!(ignored.load(Ordering::SeqCst), 0);
}

// ── State ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn is_running_tracks_busy_window() {
    let counter = Arc::new(AtomicUsize::new(0));
    let guard = SingleFlight::new("test");
    assert!(!guard.is_running());
    assert!(guard.in_flight().is_none());

    let flight = guard.run(counting_action(&counter, Duration::from_millis(5)));
    assert!(guard.is_running());

    let pending = guard.in_flight().expect("flight should be pending");
    assert_eq!(pending.await, Ok(1));
    assert_eq!(flight.await, Ok(1));
    assert!(!guard.is_running());
}

#[tokio::test(start_paused = true)]
async fn dropped_flight_still_runs_to_completion() {
    let counter = Arc::new(AtomicUsize::new(0));
    let guard = SingleFlight::new("test");

    drop(guard.run(counting_action(&counter, Duration::from_millis(5))));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(!guard.is_running());
}

// ── Failure ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn failed_action_returns_to_idle() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let guard: SingleFlight<Result<u32, String>> = SingleFlight::new("test");

    let counted = Arc::clone(&attempts);
    let result = guard
        .run(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
            Err("boom".to_string())
        })
        .await;
    assert_eq!(result, Ok(Err("boom".to_string())));
    assert!(!guard.is_running());

    let counted = Arc::clone(&attempts);
    let retry = guard
        .run(move || async move {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        })
        .await;
    assert_eq!(retry, Ok(Ok(7)));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

async fn explode() -> u32 {
    panic!("exploded")
}

#[tokio::test]
async fn panicking_action_reports_and_releases() {
    let guard: SingleFlight<u32> = SingleFlight::new("test");

    let result = guard.run(explode).await;
    assert_eq!(result, Err(ExecutorError::Panicked("exploded".to_string())));
    assert!(!guard.is_running());

    assert_eq!(guard.run(|| async { 3 }).await, Ok(3));
}

#[tokio::test]
async fn action_panicking_before_its_future_leaves_guard_idle() {
    let guard: SingleFlight<u32> = SingleFlight::new("test");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        guard.run(|| -> futures::future::Ready<u32> { panic!("failed while building") })
    }));

    assert!(outcome.is_err());
    assert!(!guard.is_running());
    assert!(guard.in_flight().is_none());
    assert_eq!(guard.started(), 0);
    assert_eq!(guard.run(|| async { 5 }).await, Ok(5));
    assert_eq!(guard.started(), 1);
}

#[test]
fn run_outside_runtime_fails_cleanly() {
    let guard: SingleFlight<u32> = SingleFlight::new("test");
    let result = futures::executor::block_on(guard.run(|| async { 1 }));
    assert_eq!(result, Err(ExecutorError::NoRuntime));
    assert!(!guard.is_running());
}

use std::time::Duration;

use flowcase_exec::executor::concurrency::ConcurrencyLimits;

#[tokio::test]
async fn concurrency_limits_enforce_global_limit() {
    let limits = ConcurrencyLimits::new(2);

    let permit1 = limits.acquire().await.unwrap();
    let permit2 = limits.acquire().await.unwrap();
    assert_eq!(limits.available(), 0);

    let start = std::time::Instant::now();
    let permit3_fut = limits.acquire();
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(permit1);
    let permit3 = permit3_fut.await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(50));
    drop(permit2);
    drop(permit3);
    assert_eq!(limits.available(), 2);
}

#[tokio::test]
async fn zero_limit_still_admits_one() {
    let limits = ConcurrencyLimits::new(0);
    let permit = limits.acquire().await.unwrap();
    assert_eq!(limits.available(), 0);
    drop(permit);
}

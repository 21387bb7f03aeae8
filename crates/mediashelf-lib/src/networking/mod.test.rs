use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[test]
fn test_networking_manager_creation() {
    let manager = NetworkingManager::new(NetworkingConfig::default());

    assert!(manager.is_ok(), "Should create networking manager");
    let manager = manager.unwrap();
    assert!(manager.jobs() > 0, "Should calculate positive job count");
    assert!(manager.jobs() <= MAX_DEFAULT_JOBS);
}

#[test]
fn test_explicit_job_count_is_respected() {
    let config = NetworkingConfig {
        max_jobs: Some(9),
        ..Default::default()
    };
    let manager = NetworkingManager::new(config).unwrap();

    assert_eq!(manager.jobs(), 9);
}

#[test]
fn test_zero_jobs_rejected() {
    let config = NetworkingConfig {
        max_jobs: Some(0),
        ..Default::default()
    };

    assert!(matches!(
        NetworkingManager::new(config),
        Err(NetworkingError::InvalidJobCount { count: 0 })
    ));
}

#[tokio::test]
async fn test_run_bounded_preserves_input_order() {
    // later inputs finish first
    let inputs: Vec<u64> = vec![40, 30, 20, 10];

    let outputs = run_bounded(4, inputs, |delay| async move {
        tokio::time::sleep(Duration::from_millis(delay)).await;
        delay * 2
    })
    .await
    .unwrap();

    assert_eq!(outputs, vec![80, 60, 40, 20]);
}

#[tokio::test]
async fn test_run_bounded_limits_concurrency() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (in_flight_task, peak_task) = (in_flight.clone(), peak.clone());
    let outputs = run_bounded(2, (0..8).collect::<Vec<u32>>(), move |n| {
        let in_flight = in_flight_task.clone();
        let peak = peak_task.clone();
        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            n
        }
    })
    .await
    .unwrap();

    assert_eq!(outputs, (0..8).collect::<Vec<u32>>());
    assert!(peak.load(Ordering::SeqCst) <= 2, "peak {}", peak.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_run_bounded_empty_input() {
    let outputs: Vec<u32> = run_bounded(3, Vec::<u32>::new(), |n| async move { n })
        .await
        .unwrap();

    assert!(outputs.is_empty());
}

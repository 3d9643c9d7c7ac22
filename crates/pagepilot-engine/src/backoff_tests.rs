use std::time::Duration;

use tokio::time::Instant;

use super::*;
use crate::config::BackoffConfig;

#[tokio::test(start_paused = true)]
async fn advance_schedules_with_pre_advance_delay() {
    let backoff = Backoff::new(&BackoffConfig::default());
    let now = Instant::now();

    assert!(backoff.eligible(now));
    let new_delay = backoff.advance(now);
    assert_eq!(new_delay, Duration::from_secs(2));

    // Eligibility was scheduled with the 1 s pre-advance delay.
    assert!(!backoff.eligible(now + Duration::from_millis(999)));
    assert!(backoff.eligible(now + Duration::from_millis(1000)));
}

#[tokio::test(start_paused = true)]
async fn delay_doubles_and_caps_at_ceiling() {
    let backoff = Backoff::new(&BackoffConfig::default());
    let now = Instant::now();

    let mut seen = vec![backoff.current_delay()];
    for _ in 0..10 {
        seen.push(backoff.advance(now));
    }
    let secs: Vec<u64> = seen.iter().map(|d| d.as_secs()).collect();
    assert_eq!(&secs[..6], &[1, 2, 4, 8, 16, 32]);
    assert_eq!(*secs.last().unwrap(), 300);

    // Monotone non-decreasing, never above the ceiling.
    for pair in seen.windows(2) {
        assert!(pair[1] >= pair[0]);
        assert!(pair[1] <= Duration::from_secs(300));
    }
}

#[tokio::test(start_paused = true)]
async fn reset_returns_to_floor_and_immediate_eligibility() {
    let backoff = Backoff::new(&BackoffConfig::default());
    let now = Instant::now();

    backoff.advance(now);
    backoff.advance(now);
    assert!(!backoff.eligible(now));

    backoff.reset();
    assert!(backoff.eligible(now));
    assert_eq!(backoff.current_delay(), Duration::from_secs(1));
}

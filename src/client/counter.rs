use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, time::Instant};
use tracing::{debug, warn};

use crate::client::api::WaitlistApi;

pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const ANIMATION_DURATION: Duration = Duration::from_millis(1500);

/// Animated display value that eases from the number on screen to the
/// latest count.
#[derive(Debug, Clone)]
pub struct CountUp {
    from: i64,
    to: i64,
    started: Instant,
    duration: Duration,
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

impl CountUp {
    pub fn new(initial: i64, duration: Duration, now: Instant) -> Self {
        Self {
            from: initial,
            to: initial,
            started: now,
            duration,
        }
    }

    pub fn target(&self) -> i64 {
        self.to
    }

    pub fn value_at(&self, now: Instant) -> i64 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let span = (self.to - self.from) as f64;
        self.from + (span * ease_out_cubic(t)).round() as i64
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Starts a new animation towards `target` from whatever is shown at `now`.
    pub fn retarget(&mut self, target: i64, now: Instant) {
        if target == self.to {
            return;
        }
        self.from = self.value_at(now);
        self.to = target;
        self.started = now;
    }
}

/// Fetches the count immediately and then every `interval`, publishing it
/// on `tx`. Failed polls keep the last value. Returns once every receiver
/// is gone.
pub async fn poll_count(api: Arc<dyn WaitlistApi>, interval: Duration, tx: watch::Sender<i64>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tx.closed() => break,
        }
        match api.count().await {
            Ok(count) => {
                debug!(count, "waitlist count polled");
                tx.send_if_modified(|current| {
                    if *current != count {
                        *current = count;
                        true
                    } else {
                        false
                    }
                });
            }
            Err(e) => warn!(error = %e, "waitlist count poll failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::client::api::ClientError;
    use crate::waitlist::{dto::SignupResponse, trade::TradeType};

    #[test]
    fn animation_starts_at_previous_and_ends_at_target() {
        let t0 = Instant::now();
        let mut c = CountUp::new(0, ANIMATION_DURATION, t0);
        c.retarget(100, t0);
        assert_eq!(c.value_at(t0), 0);
        let mid = c.value_at(t0 + Duration::from_millis(750));
        assert!(mid > 50 && mid < 100, "ease-out should be past halfway, got {mid}");
        assert_eq!(c.value_at(t0 + ANIMATION_DURATION), 100);
        assert_eq!(c.value_at(t0 + Duration::from_secs(60)), 100);
        assert!(c.is_settled(t0 + ANIMATION_DURATION));
    }

    #[test]
    fn values_never_decrease_while_counting_up() {
        let t0 = Instant::now();
        let mut c = CountUp::new(10, ANIMATION_DURATION, t0);
        c.retarget(42, t0);
        let mut last = c.value_at(t0);
        for ms in (0..=1500).step_by(50) {
            let v = c.value_at(t0 + Duration::from_millis(ms));
            assert!(v >= last);
            last = v;
        }
        assert_eq!(last, 42);
    }

    #[test]
    fn retarget_mid_animation_starts_from_shown_value() {
        let t0 = Instant::now();
        let mut c = CountUp::new(0, ANIMATION_DURATION, t0);
        c.retarget(100, t0);
        let t1 = t0 + Duration::from_millis(500);
        let shown = c.value_at(t1);
        c.retarget(200, t1);
        assert_eq!(c.value_at(t1), shown);
        assert_eq!(c.value_at(t1 + ANIMATION_DURATION), 200);
    }

    #[test]
    fn zero_duration_jumps() {
        let t0 = Instant::now();
        let mut c = CountUp::new(3, Duration::ZERO, t0);
        c.retarget(7, t0);
        assert_eq!(c.value_at(t0), 7);
    }

    const TEST_INTERVAL: Duration = Duration::from_millis(10);

    struct CountingApi {
        value: AtomicI64,
        polls: AtomicUsize,
        fail_every_other: bool,
    }

    #[async_trait]
    impl WaitlistApi for CountingApi {
        async fn signup(&self, _e: &str, _t: TradeType) -> Result<SignupResponse, ClientError> {
            unreachable!("poller never signs up")
        }

        async fn count(&self) -> Result<i64, ClientError> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if self.fail_every_other && n % 2 == 1 {
                return Err(ClientError::Rejected {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: "down".into(),
                });
            }
            Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[tokio::test]
    async fn poller_publishes_each_new_count() {
        let api = Arc::new(CountingApi {
            value: AtomicI64::new(0),
            polls: AtomicUsize::new(0),
            fail_every_other: false,
        });
        let (tx, mut rx) = watch::channel(0);
        let task = tokio::spawn(poll_count(api.clone(), TEST_INTERVAL, tx));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);

        drop(rx);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn failed_poll_keeps_last_value() {
        let api = Arc::new(CountingApi {
            value: AtomicI64::new(4),
            polls: AtomicUsize::new(0),
            fail_every_other: true,
        });
        let (tx, mut rx) = watch::channel(0);
        let task = tokio::spawn(poll_count(api.clone(), TEST_INTERVAL, tx));

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 5);
        // Second poll fails, third succeeds.
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 6);
        assert!(api.polls.load(Ordering::SeqCst) >= 3);

        drop(rx);
        task.await.unwrap();
    }
}

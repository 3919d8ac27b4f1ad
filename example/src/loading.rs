//! Busy flag with an automatic reset, standing in for the action the control
//! confirms.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use draggle::Callback;
use parking_lot::Mutex;
use tracing::info;

/// How long the simulated action keeps the control busy.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Default)]
struct LoadingInner {
    requested: bool,
    deadline: Option<Instant>,
}

/// Shared busy flag.
///
/// The unlock callback only raises a request; the frame loop picks it up in
/// [`poll`](Self::poll), which starts the countdown on that frame and clears
/// the flag once it runs out. A request while already busy does not extend
/// the countdown.
#[derive(Debug, Clone)]
pub struct LoadingCoordinator {
    inner: Arc<Mutex<LoadingInner>>,
    timeout: Duration,
}

impl LoadingCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LoadingInner::default())),
            timeout,
        }
    }

    /// Asks for the control to become busy on the next poll.
    pub fn request(&self) {
        let mut inner = self.inner.lock();
        if inner.deadline.is_none() {
            inner.requested = true;
        }
    }

    /// Callback that raises a request; hand it to the control as `on_unlock`.
    pub fn request_callback(&self) -> Callback {
        let coordinator = self.clone();
        Callback::new(move || coordinator.request())
    }

    /// Advances the countdown to `now` and returns whether the control is busy.
    pub fn poll(&self, now: Instant) -> bool {
        let mut inner = self.inner.lock();
        if inner.requested {
            inner.requested = false;
            inner.deadline = Some(now + self.timeout);
            info!(timeout_ms = self.timeout.as_millis() as u64, "loading started");
        }
        match inner.deadline {
            Some(deadline) if now >= deadline => {
                inner.deadline = None;
                info!("loading timed out");
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_starts_countdown_on_poll() {
        let t0 = Instant::now();
        let coordinator = LoadingCoordinator::new(Duration::from_secs(4));
        assert!(!coordinator.poll(t0));

        coordinator.request_callback().call();
        assert!(coordinator.poll(t0 + Duration::from_millis(10)));
        assert!(coordinator.poll(t0 + Duration::from_millis(4009)));
        assert!(!coordinator.poll(t0 + Duration::from_millis(4010)));
        assert!(!coordinator.poll(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_request_while_busy_does_not_extend() {
        let t0 = Instant::now();
        let coordinator = LoadingCoordinator::new(Duration::from_secs(1));
        coordinator.request();
        assert!(coordinator.poll(t0));

        coordinator.request();
        assert!(coordinator.poll(t0 + Duration::from_millis(500)));
        assert!(!coordinator.poll(t0 + Duration::from_secs(1)));
        assert!(!coordinator.poll(t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_can_restart_after_timeout() {
        let t0 = Instant::now();
        let coordinator = LoadingCoordinator::new(Duration::from_secs(1));
        coordinator.request();
        coordinator.poll(t0);
        assert!(!coordinator.poll(t0 + Duration::from_secs(1)));

        coordinator.request();
        assert!(coordinator.poll(t0 + Duration::from_secs(2)));
    }
}

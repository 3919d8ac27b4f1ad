//! Release velocity estimation from drag samples.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Samples older than this no longer contribute to the estimate.
const SAMPLE_WINDOW: Duration = Duration::from_millis(90);
/// A pointer that has not moved for this long is considered at rest.
const IDLE_CUTOFF: Duration = Duration::from_millis(65);
/// Upper bound on a single sample's speed, in pixels per second.
const MAX_VELOCITY: f32 = 8000.0;

/// Recency-weighted velocity estimate over the last few pointer moves.
///
/// Each move contributes `delta / elapsed` weighted by how recent it is. When
/// the pointer pauses before release the estimate is damped toward zero, so a
/// drag that stops and then lifts does not fling.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
    last_sample_time: Option<Instant>,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all samples and starts a new gesture at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.samples.clear();
        self.last_sample_time = Some(now);
    }

    /// Records a move of `delta` pixels that happened at `now`.
    pub fn push_delta(&mut self, now: Instant, delta: f32) {
        let Some(last) = self.last_sample_time.replace(now) else {
            return;
        };
        let delta_time = now.saturating_duration_since(last).as_secs_f32();
        if delta_time <= 0.0 || !delta.is_finite() {
            return;
        }

        let velocity = (delta / delta_time).clamp(-MAX_VELOCITY, MAX_VELOCITY);
        self.samples.push_back((now, velocity));
        self.prune(now);
    }

    /// Estimated velocity at `now`, in pixels per second.
    pub fn resolve(&mut self, now: Instant) -> f32 {
        self.prune(now);
        let Some(last) = self.last_sample_time else {
            return 0.0;
        };
        if self.samples.is_empty() {
            return 0.0;
        }

        let window_secs = SAMPLE_WINDOW.as_secs_f32();
        let mut weighted_sum = 0.0f32;
        let mut total_weight = 0.0f32;
        for &(timestamp, velocity) in &self.samples {
            let age = now
                .saturating_duration_since(timestamp)
                .as_secs_f32()
                .clamp(0.0, window_secs);
            let weight = window_secs - age;
            if weight > 0.0 {
                weighted_sum += velocity * weight;
                total_weight += weight;
            }
        }
        if total_weight <= f32::EPSILON {
            return 0.0;
        }

        let idle = now.saturating_duration_since(last).as_secs_f32();
        let damping = (1.0 - idle / IDLE_CUTOFF.as_secs_f32()).clamp(0.0, 1.0);
        weighted_sum / total_weight * damping
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&(timestamp, _)) = self.samples.front() {
            if now.saturating_duration_since(timestamp) > SAMPLE_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(10);

    #[test]
    fn test_steady_drag() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.reset(t0);
        for i in 1..=5 {
            tracker.push_delta(t0 + FRAME * i, 5.0);
        }
        let velocity = tracker.resolve(t0 + FRAME * 5);
        assert!((velocity - 500.0).abs() < 1.0, "{velocity}");
    }

    #[test]
    fn test_pause_before_release_damps_to_zero() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.reset(t0);
        tracker.push_delta(t0 + FRAME, 10.0);
        tracker.push_delta(t0 + FRAME * 2, 10.0);
        assert_eq!(tracker.resolve(t0 + FRAME * 2 + IDLE_CUTOFF), 0.0);
    }

    #[test]
    fn test_old_samples_are_dropped() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.reset(t0);
        tracker.push_delta(t0 + FRAME, 100.0);
        // Long gap, then a slow backwards move.
        tracker.push_delta(t0 + Duration::from_millis(500), -1.0);
        tracker.push_delta(t0 + Duration::from_millis(510), -1.0);
        let velocity = tracker.resolve(t0 + Duration::from_millis(510));
        assert!(velocity < 0.0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let t0 = Instant::now();
        let mut tracker = VelocityTracker::new();
        tracker.reset(t0);
        tracker.push_delta(t0 + Duration::from_millis(1), 1_000.0);
        let velocity = tracker.resolve(t0 + Duration::from_millis(1));
        assert!((velocity - MAX_VELOCITY).abs() < 1.0, "{velocity}");
    }

    #[test]
    fn test_no_samples() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.resolve(Instant::now()), 0.0);
    }
}

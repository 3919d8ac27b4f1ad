//! Animation curves driving the thumb.
//!
//! Every curve is sampled with an explicit frame [`Instant`]; nothing here
//! owns a timer. Replacing a curve is how an animation gets cancelled.

use std::time::{Duration, Instant};

/// Distance (in pixels) and speed (in pixels per second) under which a spring
/// is considered at rest.
const SPRING_REST_THRESHOLD: f32 = 0.5;

/// Easing curves mapping linear time progress to value progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Material standard curve, cubic Bézier `(0.4, 0.0, 0.2, 1.0)`.
    #[default]
    FastOutSlowIn,
    /// Cubic ease-in-out.
    EaseInOutCubic,
    /// Arbitrary cubic Bézier through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`.
    CubicBezier {
        /// First control point, x.
        x1: f32,
        /// First control point, y.
        y1: f32,
        /// Second control point, x.
        x2: f32,
        /// Second control point, y.
        y2: f32,
    },
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    ///
    /// Both endpoints are exact: `transform(0.0) == 0.0` and
    /// `transform(1.0) == 1.0` for every curve.
    pub fn transform(self, progress: f32) -> f32 {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::FastOutSlowIn => cubic_bezier(t, 0.4, 0.0, 0.2, 1.0),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

fn bezier_component(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

fn bezier_slope(t: f32, p1: f32, p2: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

fn cubic_bezier(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    // Newton first, bisection when the slope is too flat to trust.
    let mut t = x;
    for _ in 0..8 {
        let error = bezier_component(t, x1, x2) - x;
        if error.abs() < 1e-6 {
            return bezier_component(t, y1, y2);
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
        let value = bezier_component(t, x1, x2);
        if (value - x).abs() < 1e-6 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    bezier_component(t, y1, y2)
}

/// How the thumb settles onto an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum AnimationSpec {
    /// Fixed-duration interpolation along an easing curve.
    Tween {
        /// Total duration of the animation.
        #[cfg_attr(feature = "serde", serde(rename = "duration_ms", with = "millis"))]
        duration: Duration,
        /// Easing curve.
        #[cfg_attr(feature = "serde", serde(default))]
        easing: Easing,
    },
    /// Damped spring; duration follows from the physics.
    Spring {
        /// Spring stiffness, in 1/s².
        stiffness: f32,
        /// `1.0` is critically damped, below bounces, above creeps.
        damping_ratio: f32,
    },
}

impl AnimationSpec {
    /// Default tween duration.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

    /// A tween with the given duration and easing.
    pub const fn tween(duration: Duration, easing: Easing) -> Self {
        AnimationSpec::Tween { duration, easing }
    }

    /// A spring with the given stiffness and damping ratio.
    pub const fn spring(stiffness: f32, damping_ratio: f32) -> Self {
        AnimationSpec::Spring {
            stiffness,
            damping_ratio,
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        AnimationSpec::tween(Self::DEFAULT_DURATION, Easing::FastOutSlowIn)
    }
}

#[cfg(feature = "serde")]
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Fixed-duration interpolation between two offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Starts a tween at `now`.
    pub fn new(from: f32, to: f32, now: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            started_at: now,
            duration,
            easing,
        }
    }

    /// Destination offset.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Offset at `now`. Times before the start sample the origin.
    pub fn sample(&self, now: Instant) -> f32 {
        let fraction = self.time_fraction(now);
        self.from + (self.to - self.from) * self.easing.transform(fraction)
    }

    /// Whether the tween has reached its destination at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.time_fraction(now) >= 1.0
    }

    fn time_fraction(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Damped spring pulling a value toward a target.
///
/// Like [`Tween`], the spring is sampled in closed form from its start
/// instant, so the frame rate and stiffness never affect stability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    initial_displacement: f32,
    initial_velocity: f32,
    angular_frequency: f32,
    damping_ratio: f32,
    started_at: Instant,
}

impl Spring {
    /// Lowest damping ratio a spring runs with. Undamped springs never rest.
    pub const MIN_DAMPING_RATIO: f32 = 0.01;

    /// Starts a spring at `value` with `velocity` toward `target`.
    ///
    /// A non-positive or non-finite stiffness makes the spring jump straight
    /// to `target`.
    pub fn new(
        value: f32,
        velocity: f32,
        target: f32,
        now: Instant,
        stiffness: f32,
        damping_ratio: f32,
    ) -> Self {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let angular_frequency = if stiffness.is_finite() && stiffness > 0.0 {
            stiffness.sqrt()
        } else {
            0.0
        };
        let damping_ratio = if damping_ratio.is_finite() {
            damping_ratio.max(Self::MIN_DAMPING_RATIO)
        } else {
            1.0
        };
        Self {
            value,
            velocity,
            target,
            initial_displacement: value - target,
            initial_velocity: velocity,
            angular_frequency,
            damping_ratio,
            started_at: now,
        }
    }

    /// Destination value.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Samples the spring at `now` and returns the new value.
    pub fn advance(&mut self, now: Instant) -> f32 {
        if self.angular_frequency == 0.0 || self.is_at_rest() {
            self.snap_to_target();
            return self.value;
        }

        let t = now.saturating_duration_since(self.started_at).as_secs_f32();
        let (displacement, velocity) = self.displacement_at(t);
        if !displacement.is_finite() || !velocity.is_finite() {
            self.snap_to_target();
            return self.value;
        }
        self.value = self.target + displacement;
        self.velocity = velocity;

        if self.is_at_rest() {
            self.snap_to_target();
        }
        self.value
    }

    /// Whether the spring has come to rest on its target.
    pub fn is_at_rest(&self) -> bool {
        (self.value - self.target).abs() < SPRING_REST_THRESHOLD
            && self.velocity.abs() < SPRING_REST_THRESHOLD
    }

    /// Displacement from the target and velocity `t` seconds after the start.
    fn displacement_at(&self, t: f32) -> (f32, f32) {
        let x0 = self.initial_displacement;
        let v0 = self.initial_velocity;
        let omega = self.angular_frequency;
        let zeta = self.damping_ratio;

        if (zeta - 1.0).abs() < 1e-4 {
            let envelope = (-omega * t).exp();
            let b = v0 + omega * x0;
            ((x0 + b * t) * envelope, (v0 - omega * b * t) * envelope)
        } else if zeta < 1.0 {
            let a = zeta * omega;
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (v0 + a * x0) / omega_d;
            let envelope = (-a * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            (
                envelope * (x0 * cos + b * sin),
                envelope * ((b * omega_d - a * x0) * cos - (x0 * omega_d + a * b) * sin),
            )
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            // r_slow * r_fast == omega^2; this form avoids cancellation.
            let r_slow = -omega / (zeta + root);
            let r_fast = -omega * (zeta + root);
            let c_fast = (v0 - r_slow * x0) / (r_fast - r_slow);
            let c_slow = x0 - c_fast;
            let (e_slow, e_fast) = ((r_slow * t).exp(), (r_fast * t).exp());
            (
                c_slow * e_slow + c_fast * e_fast,
                c_slow * r_slow * e_slow + c_fast * r_fast * e_fast,
            )
        }
    }

    fn snap_to_target(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }
}

/// Parameters of the exponential fling deceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecaySpec {
    /// Exponential friction constant `k` in `v(t) = v0 * e^(-k t)`, in 1/s.
    pub friction: f32,
    /// Speed (pixels per second) below which the fling is over.
    pub stop_velocity: f32,
}

impl DecaySpec {
    /// Default friction constant.
    pub const DEFAULT_FRICTION: f32 = 5.0;
    /// Default stop speed.
    pub const DEFAULT_STOP_VELOCITY: f32 = 1.0;
    /// Lowest friction a fling runs with, in 1/s.
    pub const MIN_FRICTION: f32 = 0.1;

    /// Offset at which a thumb released at `offset` with `velocity` would
    /// come to rest, ignoring the track bounds.
    ///
    /// ```
    /// use draggle::DecaySpec;
    ///
    /// let spec = DecaySpec { friction: 5.0, stop_velocity: 0.0 };
    /// assert_eq!(spec.project(30.0, 500.0), 130.0);
    /// ```
    pub fn project(&self, offset: f32, velocity: f32) -> f32 {
        if !velocity.is_finite() || self.friction <= 0.0 {
            return offset;
        }
        let speed = velocity.abs();
        if speed <= self.stop_velocity {
            return offset;
        }
        offset + (velocity - velocity.signum() * self.stop_velocity) / self.friction
    }
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self {
            friction: Self::DEFAULT_FRICTION,
            stop_velocity: Self::DEFAULT_STOP_VELOCITY,
        }
    }
}

/// A fling decelerating from its release velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    origin: f32,
    initial_velocity: f32,
    started_at: Instant,
    spec: DecaySpec,
}

impl Decay {
    /// Starts a fling at `now`. Friction below [`DecaySpec::MIN_FRICTION`]
    /// is raised to it.
    pub fn new(origin: f32, initial_velocity: f32, now: Instant, spec: DecaySpec) -> Self {
        let friction = if spec.friction.is_finite() {
            spec.friction.max(DecaySpec::MIN_FRICTION)
        } else {
            DecaySpec::DEFAULT_FRICTION
        };
        Self {
            origin,
            initial_velocity: if initial_velocity.is_finite() {
                initial_velocity
            } else {
                0.0
            },
            started_at: now,
            spec: DecaySpec { friction, ..spec },
        }
    }

    /// Where the fling comes to rest.
    pub fn target(&self) -> f32 {
        self.spec.project(self.origin, self.initial_velocity)
    }

    /// Time the fling takes to slow down to the stop velocity.
    pub fn duration(&self) -> Duration {
        let speed = self.initial_velocity.abs();
        if self.spec.friction <= 0.0 || speed <= self.spec.stop_velocity {
            return Duration::ZERO;
        }
        let stop = self.spec.stop_velocity.max(f32::EPSILON);
        Duration::try_from_secs_f32((speed / stop).ln() / self.spec.friction)
            .unwrap_or(Duration::MAX)
    }

    /// Offset at `now`.
    pub fn sample(&self, now: Instant) -> f32 {
        if self.is_finished(now) {
            return self.target();
        }
        let t = self.elapsed_secs(now);
        let k = self.spec.friction;
        self.origin + self.initial_velocity / k * (1.0 - (-k * t).exp())
    }

    /// Velocity at `now`.
    pub fn velocity_at(&self, now: Instant) -> f32 {
        if self.is_finished(now) {
            return 0.0;
        }
        self.initial_velocity * (-self.spec.friction * self.elapsed_secs(now)).exp()
    }

    /// Whether the fling has run out of momentum at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration()
    }

    fn elapsed_secs(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.started_at).as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_easing_endpoints() {
        let curves = [
            Easing::Linear,
            Easing::FastOutSlowIn,
            Easing::EaseInOutCubic,
            Easing::CubicBezier {
                x1: 0.25,
                y1: 0.1,
                x2: 0.25,
                y2: 1.0,
            },
        ];
        for easing in curves {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
            assert_eq!(easing.transform(-3.0), 0.0);
            assert_eq!(easing.transform(3.0), 1.0);
        }
    }

    #[test]
    fn test_easing_monotonic() {
        for easing in [Easing::Linear, Easing::FastOutSlowIn, Easing::EaseInOutCubic] {
            let mut previous = 0.0;
            for step in 0..=100 {
                let value = easing.transform(step as f32 / 100.0);
                assert!(value + 1e-5 >= previous, "{easing:?} not monotonic at {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_fast_out_slow_in_leads_linear() {
        // The standard curve is ahead of linear through most of its course.
        assert!(Easing::FastOutSlowIn.transform(0.5) > 0.5);
        assert!((Easing::EaseInOutCubic.transform(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tween_sampling() {
        let t0 = Instant::now();
        let tween = Tween::new(0.0, 100.0, t0, Duration::from_millis(100), Easing::Linear);
        assert_eq!(tween.sample(t0), 0.0);
        assert!((tween.sample(t0 + Duration::from_millis(50)) - 50.0).abs() < 0.01);
        assert!(!tween.is_finished(t0 + Duration::from_millis(99)));
        assert!(tween.is_finished(t0 + Duration::from_millis(100)));
        assert_eq!(tween.sample(t0 + Duration::from_secs(5)), 100.0);
    }

    #[test]
    fn test_zero_duration_tween_finishes_immediately() {
        let t0 = Instant::now();
        let tween = Tween::new(10.0, 20.0, t0, Duration::ZERO, Easing::FastOutSlowIn);
        assert!(tween.is_finished(t0));
        assert_eq!(tween.sample(t0), 20.0);
    }

    #[test]
    fn test_spring_converges() {
        let t0 = Instant::now();
        let mut spring = Spring::new(0.0, 0.0, 200.0, t0, 400.0, 1.0);
        let mut now = t0;
        for _ in 0..120 {
            now += FRAME;
            spring.advance(now);
            assert!(spring.value() <= 200.0 + 0.5);
        }
        assert!(spring.is_at_rest());
        assert_eq!(spring.value(), 200.0);
    }

    #[test]
    fn test_underdamped_spring_still_settles() {
        let t0 = Instant::now();
        let mut spring = Spring::new(0.0, 0.0, 100.0, t0, 600.0, 0.3);
        let mut now = t0;
        let mut overshot = false;
        for _ in 0..600 {
            now += FRAME;
            overshot |= spring.advance(now) > 100.0;
        }
        assert!(overshot);
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_stiff_spring_stays_finite() {
        let t0 = Instant::now();
        let mut spring = Spring::new(0.0, 0.0, 100.0, t0, 1_000_000.0, 1.0);
        let mut now = t0;
        for _ in 0..3 {
            now += FRAME;
            let value = spring.advance(now);
            assert!(value.is_finite());
            assert!((0.0..=100.0).contains(&value));
        }
        assert!(spring.is_at_rest());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_overdamped_spring_creeps_without_overshoot() {
        let t0 = Instant::now();
        let mut spring = Spring::new(0.0, 0.0, 100.0, t0, 300.0, 4.0);
        let mut now = t0;
        let mut previous = 0.0;
        for _ in 0..2_000 {
            now += FRAME;
            let value = spring.advance(now);
            assert!(value >= previous && value <= 100.0);
            previous = value;
        }
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_undamped_spring_is_damped_to_rest() {
        let t0 = Instant::now();
        let mut spring = Spring::new(0.0, 0.0, 100.0, t0, 400.0, 0.0);
        let mut now = t0;
        for _ in 0..6_000 {
            now += FRAME;
            spring.advance(now);
            if spring.is_at_rest() {
                break;
            }
        }
        assert!(spring.is_at_rest());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_spring_keeps_release_velocity() {
        let t0 = Instant::now();
        let mut spring = Spring::new(50.0, 400.0, 100.0, t0, 400.0, 1.0);
        spring.advance(t0 + Duration::from_millis(1));
        assert!(spring.velocity() > 300.0);
        assert!(spring.value() > 50.0);
    }

    #[test]
    fn test_decay_with_negligible_friction() {
        let t0 = Instant::now();
        let spec = DecaySpec {
            friction: 1e-20,
            stop_velocity: 1.0,
        };
        let decay = Decay::new(0.0, 1000.0, t0, spec);
        assert!(decay.duration() > Duration::ZERO);
        assert!(!decay.is_finished(t0 + FRAME));
        // Raised to the minimum friction, the fling still moves.
        assert!(decay.sample(t0 + FRAME * 6) > 90.0);
        assert!(decay.target().is_finite());
    }

    #[test]
    fn test_decay_projection_and_sampling() {
        let t0 = Instant::now();
        let spec = DecaySpec {
            friction: 5.0,
            stop_velocity: 1.0,
        };
        let decay = Decay::new(10.0, 501.0, t0, spec);
        assert!((decay.target() - 110.0).abs() < 1e-3);

        let mut previous = decay.sample(t0);
        assert_eq!(previous, 10.0);
        let mut now = t0;
        while !decay.is_finished(now) {
            now += FRAME;
            let value = decay.sample(now);
            assert!(value >= previous);
            assert!(value <= decay.target() + 1e-3);
            previous = value;
        }
        assert!((previous - decay.target()).abs() < 1e-3);
        assert_eq!(decay.velocity_at(now), 0.0);
    }

    #[test]
    fn test_decay_velocity_decreases() {
        let t0 = Instant::now();
        let decay = Decay::new(0.0, -800.0, t0, DecaySpec::default());
        let early = decay.velocity_at(t0 + FRAME);
        let late = decay.velocity_at(t0 + FRAME * 10);
        assert!(early < 0.0 && late < 0.0);
        assert!(late.abs() < early.abs());
        assert!(decay.target() < 0.0);
    }

    #[test]
    fn test_slow_release_has_no_decay() {
        let spec = DecaySpec::default();
        assert_eq!(spec.project(42.0, 0.5), 42.0);
        assert_eq!(spec.project(42.0, f32::NAN), 42.0);
        let decay = Decay::new(42.0, 0.5, Instant::now(), spec);
        assert_eq!(decay.duration(), Duration::ZERO);
    }
}

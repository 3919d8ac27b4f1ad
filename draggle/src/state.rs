//! Drag-anchor state machine.
//!
//! [`DraggableState`] owns the thumb offset and decides where it comes to
//! rest. It is driven entirely from the outside: pointer events, track
//! resizes, the busy flag and frame ticks, each stamped with the frame
//! [`Instant`] they belong to.
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use draggle::{Anchor, Dp, DragPhase, DraggableConfig, DraggableState};
//!
//! let t0 = Instant::now();
//! let mut state = DraggableState::new(DraggableConfig::default().thumb_size(Dp(0.0)), false)?;
//! state.on_track_resize(100.0, t0);
//!
//! assert!(state.pointer_down(t0));
//! state.pointer_move(60.0, t0 + Duration::from_millis(200));
//! state.release(0.0, t0 + Duration::from_millis(400));
//! assert_eq!(state.phase(), DragPhase::Animating(Anchor::End));
//!
//! while state.tick(t0 + Duration::from_secs(1)) {}
//! assert_eq!(state.settled(), Some(Anchor::End));
//! assert_eq!(state.offset(), 100.0);
//! # Ok::<(), draggle::ConfigError>(())
//! ```

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::{
    anchor::{Anchor, Anchors},
    animation::{AnimationSpec, Decay, Spring, Tween},
    config::DraggableConfig,
    error::ConfigError,
    velocity::VelocityTracker,
};

/// Where the state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Resting on an anchor.
    Idle(Anchor),
    /// Following the pointer.
    Dragging,
    /// Settling toward an anchor.
    Animating(Anchor),
}

/// The single animation in flight. Replacing it cancels the previous one.
#[derive(Debug, Clone, Copy)]
enum Motion {
    /// Fling toward `target`; stops as soon as it gets there.
    Fling {
        decay: Decay,
        target: f32,
        forward: bool,
    },
    Tween(Tween),
    Spring(Spring),
}

enum Step {
    Continue(f32),
    Settled,
    FlingExhausted(f32),
}

/// Drag-anchor state machine for a horizontal slide-to-confirm thumb.
#[derive(Debug, Clone)]
pub struct DraggableState {
    config: DraggableConfig,
    anchors: Option<Anchors>,
    offset: f32,
    phase: DragPhase,
    target: Anchor,
    motion: Option<Motion>,
    velocity_tracker: VelocityTracker,
    busy: bool,
}

impl DraggableState {
    /// Creates a state resting at `End` when mounted busy, else at `Start`.
    ///
    /// The track is unmeasured until [`on_track_resize`](Self::on_track_resize)
    /// is called; until then input is ignored.
    pub fn new(config: DraggableConfig, busy: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial = if busy { Anchor::End } else { Anchor::Start };
        Ok(Self {
            config,
            anchors: None,
            offset: 0.0,
            phase: DragPhase::Idle(initial),
            target: initial,
            motion: None,
            velocity_tracker: VelocityTracker::new(),
            busy,
        })
    }

    /// The configuration this state was built with.
    pub fn config(&self) -> &DraggableConfig {
        &self.config
    }

    /// Anchors of the measured track, `None` before the first resize.
    pub fn anchors(&self) -> Option<Anchors> {
        self.anchors
    }

    /// Current thumb offset in pixels from the start of the track.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Current offset normalized to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.anchors
            .map(|anchors| anchors.fraction_of(self.offset))
            .unwrap_or(0.0)
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Anchor of the running or most recent settle.
    pub fn target(&self) -> Anchor {
        self.target
    }

    /// Anchor the thumb rests on, if it is resting on a measured track.
    pub fn settled(&self) -> Option<Anchor> {
        match (self.phase, self.anchors) {
            (DragPhase::Idle(anchor), Some(_)) => Some(anchor),
            _ => None,
        }
    }

    /// Whether the external busy flag is set.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the thumb is following the pointer.
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Whether a settle animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    /// Whether a pointer-down would start a drag.
    pub fn drag_enabled(&self) -> bool {
        !self.busy && self.anchors.is_some()
    }

    /// Recomputes the anchors for a new track length.
    ///
    /// A resting thumb follows its anchor to the new offset, a dragged thumb
    /// is clamped into the new bounds and a running animation is retargeted.
    pub fn on_track_resize(&mut self, track_length: f32, now: Instant) {
        if !track_length.is_finite() {
            warn!(track_length, "ignoring non-finite track length");
            return;
        }
        let anchors = Anchors::compute(track_length, self.config.thumb_extent_px());
        if self.anchors == Some(anchors) {
            return;
        }
        debug!(track_length, end = anchors.end(), phase = ?self.phase, "anchors updated");
        self.anchors = Some(anchors);

        match self.phase {
            DragPhase::Idle(anchor) => self.offset = anchors.offset_of(anchor),
            DragPhase::Dragging => self.offset = anchors.clamp(self.offset),
            DragPhase::Animating(anchor) => {
                let velocity = self.motion_velocity(now);
                self.offset = anchors.clamp(self.offset);
                self.start_snap(anchor, velocity, now);
            }
        }
    }

    /// Starts a drag. Returns `false` when dragging is disabled.
    ///
    /// Catching the thumb mid-animation cancels the animation.
    pub fn pointer_down(&mut self, now: Instant) -> bool {
        if self.busy {
            trace!("pointer down ignored while busy");
            return false;
        }
        if self.anchors.is_none() {
            trace!("pointer down ignored before the track is measured");
            return false;
        }
        if self.motion.take().is_some() {
            debug!(offset = self.offset, "settle interrupted by pointer");
        }
        self.phase = DragPhase::Dragging;
        self.velocity_tracker.reset(now);
        debug!(offset = self.offset, "drag started");
        true
    }

    /// Moves the dragged thumb by `delta` pixels and returns the distance
    /// actually travelled after clamping.
    pub fn pointer_move(&mut self, delta: f32, now: Instant) -> f32 {
        if self.phase != DragPhase::Dragging {
            trace!(delta, "pointer move ignored outside a drag");
            return 0.0;
        }
        let Some(anchors) = self.anchors else {
            return 0.0;
        };
        if !delta.is_finite() {
            warn!(delta, "ignoring non-finite drag delta");
            return 0.0;
        }

        let previous = self.offset;
        self.offset = anchors.clamp(previous + delta);
        self.velocity_tracker.push_delta(now, delta);
        self.offset - previous
    }

    /// Ends the drag using the velocity estimated from the move samples.
    pub fn pointer_up(&mut self, now: Instant) -> Option<Anchor> {
        if self.phase != DragPhase::Dragging {
            return None;
        }
        let velocity = self.velocity_tracker.resolve(now);
        self.release(velocity, now)
    }

    /// Ends the drag with an explicit release `velocity` (pixels per second,
    /// positive toward the end) and starts settling.
    ///
    /// Returns the chosen anchor, or `None` when no drag was in progress.
    pub fn release(&mut self, velocity: f32, now: Instant) -> Option<Anchor> {
        if self.phase != DragPhase::Dragging {
            trace!(velocity, "release ignored outside a drag");
            return None;
        }
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            warn!(velocity, "treating non-finite release velocity as zero");
            0.0
        };
        let anchor = self.settle_decision(self.offset, velocity)?;
        debug!(offset = self.offset, velocity, anchor = %anchor, "released");
        self.start_settle(anchor, velocity, now);
        Some(anchor)
    }

    /// Anchor a thumb released at `offset` with `velocity` settles on.
    ///
    /// Slow releases compare the release position with the positional
    /// threshold. Fast releases compare the point where the fling would come
    /// to rest instead. `None` while the track is unmeasured.
    pub fn settle_decision(&self, offset: f32, velocity: f32) -> Option<Anchor> {
        let anchors = self.anchors?;
        let decision_offset = if velocity.abs() > self.config.velocity_threshold_px() {
            anchors.clamp(self.config.decay.project(offset, velocity))
        } else {
            offset
        };
        Some(anchors.anchor_for(decision_offset, self.config.positional_threshold))
    }

    /// Animates to `anchor`, overriding any drag or animation in progress.
    ///
    /// Already settling toward or resting on `anchor` is a no-op.
    pub fn animate_to(&mut self, anchor: Anchor, now: Instant) {
        match self.phase {
            DragPhase::Animating(current) if current == anchor => return,
            DragPhase::Idle(current) if current == anchor && self.is_on_anchor(anchor) => return,
            _ => {}
        }
        debug!(from = ?self.phase, anchor = %anchor, "animating to anchor");
        let velocity = self.motion_velocity(now);
        self.start_snap(anchor, velocity, now);
    }

    /// Jumps to `anchor` without animating.
    pub fn snap_to(&mut self, anchor: Anchor) {
        self.motion = None;
        self.target = anchor;
        self.phase = DragPhase::Idle(anchor);
        if let Some(anchors) = self.anchors {
            self.offset = anchors.offset_of(anchor);
        }
        debug!(anchor = %anchor, "snapped to anchor");
    }

    /// Applies the external busy flag.
    ///
    /// Turning busy on drives the thumb to the end regardless of what the
    /// user is doing; turning it off sends it back to the start.
    pub fn set_busy(&mut self, busy: bool, now: Instant) {
        if self.busy == busy {
            return;
        }
        self.busy = busy;
        debug!(busy, phase = ?self.phase, "busy changed");
        let anchor = if busy { Anchor::End } else { Anchor::Start };
        self.animate_to(anchor, now);
    }

    /// Advances the running animation to `now`. Returns whether it is still
    /// running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anchors) = self.anchors else {
            return false;
        };
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };

        let step = match motion {
            Motion::Fling {
                decay,
                target,
                forward,
            } => {
                let value = decay.sample(now);
                let reached = if *forward {
                    value >= *target
                } else {
                    value <= *target
                };
                if reached {
                    Step::Settled
                } else if decay.is_finished(now) {
                    Step::FlingExhausted(value)
                } else {
                    Step::Continue(value)
                }
            }
            Motion::Tween(tween) => {
                if tween.is_finished(now) {
                    Step::Settled
                } else {
                    Step::Continue(tween.sample(now))
                }
            }
            Motion::Spring(spring) => {
                let value = spring.advance(now);
                if spring.is_at_rest() {
                    Step::Settled
                } else {
                    Step::Continue(value)
                }
            }
        };

        match step {
            Step::Continue(value) => {
                self.offset = anchors.clamp(value);
                true
            }
            Step::FlingExhausted(value) => {
                self.offset = anchors.clamp(value);
                trace!(offset = self.offset, "fling ran out before reaching the anchor");
                self.start_snap(self.target, 0.0, now);
                self.motion.is_some()
            }
            Step::Settled => {
                self.finish_settle(anchors);
                false
            }
        }
    }

    fn is_on_anchor(&self, anchor: Anchor) -> bool {
        match self.anchors {
            Some(anchors) => (self.offset - anchors.offset_of(anchor)).abs() <= f32::EPSILON,
            None => true,
        }
    }

    fn motion_velocity(&self, now: Instant) -> f32 {
        match self.motion {
            Some(Motion::Fling { decay, .. }) => decay.velocity_at(now),
            Some(Motion::Spring(spring)) => spring.velocity(),
            Some(Motion::Tween(_)) | None => 0.0,
        }
    }

    /// Settles after a release: flings when the release is fast and heading
    /// toward `anchor`, snaps otherwise.
    fn start_settle(&mut self, anchor: Anchor, velocity: f32, now: Instant) {
        let Some(anchors) = self.anchors else {
            self.start_snap(anchor, velocity, now);
            return;
        };
        let target = anchors.offset_of(anchor);
        let distance = target - self.offset;
        let flinging = velocity.abs() > self.config.velocity_threshold_px()
            && distance.abs() > f32::EPSILON
            && distance.signum() == velocity.signum();
        if !flinging {
            self.start_snap(anchor, velocity, now);
            return;
        }

        self.target = anchor;
        self.phase = DragPhase::Animating(anchor);
        self.motion = Some(Motion::Fling {
            decay: Decay::new(self.offset, velocity, now, self.config.decay),
            target,
            forward: velocity > 0.0,
        });
        trace!(anchor = %anchor, velocity, "fling started");
    }

    /// Starts the configured snap animation toward `anchor`, replacing any
    /// motion in flight.
    fn start_snap(&mut self, anchor: Anchor, velocity: f32, now: Instant) {
        self.target = anchor;
        let Some(anchors) = self.anchors else {
            // Nothing to animate on an unmeasured track; the offset follows
            // the anchor once it is measured.
            self.motion = None;
            self.phase = DragPhase::Idle(anchor);
            return;
        };

        let target = anchors.offset_of(anchor);
        if (target - self.offset).abs() <= f32::EPSILON {
            self.finish_settle(anchors);
            return;
        }

        self.phase = DragPhase::Animating(anchor);
        self.motion = Some(match self.config.snap_animation {
            AnimationSpec::Tween { duration, easing } => {
                Motion::Tween(Tween::new(self.offset, target, now, duration, easing))
            }
            AnimationSpec::Spring {
                stiffness,
                damping_ratio,
            } => Motion::Spring(Spring::new(
                self.offset,
                velocity,
                target,
                now,
                stiffness,
                damping_ratio,
            )),
        });
    }

    fn finish_settle(&mut self, anchors: Anchors) {
        self.motion = None;
        self.offset = anchors.offset_of(self.target);
        self.phase = DragPhase::Idle(self.target);
        debug!(anchor = %self.target, offset = self.offset, "settled");
    }
}

//! The slide-to-confirm control as a whole.
//!
//! [`DraggableUnlocker`] ties the drag state machine to the unlock trigger
//! and the progress mapper. The host forwards pointer events, the measured
//! track length, the busy flag and frame ticks; each frame it reads back an
//! [`UnlockerFrame`] to draw.
//!
//! ## Usage
//!
//! ```
//! use std::{
//!     sync::{
//!         Arc,
//!         atomic::{AtomicBool, Ordering},
//!     },
//!     time::{Duration, Instant},
//! };
//!
//! use draggle::{Anchor, DraggableUnlocker, DraggableUnlockerArgs, ThumbVisual};
//!
//! let unlocked = Arc::new(AtomicBool::new(false));
//! let flag = unlocked.clone();
//! let args = DraggableUnlockerArgs::default().on_unlock(move || flag.store(true, Ordering::SeqCst));
//! let mut unlocker = DraggableUnlocker::new(args)?;
//!
//! let t0 = Instant::now();
//! unlocker.on_track_resize(340.0, t0);
//! assert!(unlocker.pointer_down(t0));
//! unlocker.pointer_move(250.0, t0 + Duration::from_millis(300));
//! assert_eq!(unlocker.release(0.0, t0 + Duration::from_millis(400)), Some(Anchor::End));
//! assert!(unlocked.load(Ordering::SeqCst));
//!
//! // The host reacts to the unlock by marking the control busy.
//! unlocker.set_busy(true, t0 + Duration::from_millis(416));
//! assert_eq!(unlocker.frame().thumb, ThumbVisual::Spinner);
//! # Ok::<(), draggle::ConfigError>(())
//! ```

use std::time::Instant;

use derive_setters::Setters;

use crate::{
    anchor::Anchor,
    color::Color,
    config::DraggableConfig,
    error::ConfigError,
    progress::{ProgressMapper, ThumbVisual},
    prop::{Callback, CallbackWith},
    state::{DragPhase, DraggableState},
    unlock::{HapticFeedbackType, UnlockTrigger},
};

/// Arguments for building a [`DraggableUnlocker`].
#[derive(Clone, Setters)]
pub struct DraggableUnlockerArgs {
    /// Tunables of the control.
    pub config: DraggableConfig,
    /// Whether the action is already running when the control is created.
    pub busy: bool,
    /// Whether the control accepts input at all. A disabled control also draws
    /// its track with the disabled color.
    pub enabled: bool,
    /// Called once each time the thumb is committed to the end anchor.
    #[setters(skip)]
    pub on_unlock: Callback,
    /// Plays haptic feedback on unlock.
    #[setters(skip)]
    pub haptic_feedback: CallbackWith<HapticFeedbackType>,
}

impl Default for DraggableUnlockerArgs {
    fn default() -> Self {
        Self {
            config: DraggableConfig::default(),
            busy: false,
            enabled: true,
            on_unlock: Callback::noop(),
            haptic_feedback: CallbackWith::noop(),
        }
    }
}

impl DraggableUnlockerArgs {
    /// Set the unlock handler.
    pub fn on_unlock<F>(mut self, on_unlock: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_unlock = Callback::new(on_unlock);
        self
    }

    /// Set the unlock handler using a shared callback.
    pub fn on_unlock_shared(mut self, on_unlock: impl Into<Callback>) -> Self {
        self.on_unlock = on_unlock.into();
        self
    }

    /// Set the haptic feedback hook.
    pub fn haptic_feedback<F>(mut self, haptic_feedback: F) -> Self
    where
        F: Fn(HapticFeedbackType) + Send + Sync + 'static,
    {
        self.haptic_feedback = CallbackWith::new(haptic_feedback);
        self
    }

    /// Set the haptic feedback hook using a shared callback.
    pub fn haptic_feedback_shared(
        mut self,
        haptic_feedback: impl Into<CallbackWith<HapticFeedbackType>>,
    ) -> Self {
        self.haptic_feedback = haptic_feedback.into();
        self
    }
}

/// Everything the presentation needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnlockerFrame {
    /// Thumb offset in pixels.
    pub offset: f32,
    /// Offset normalized to `[0, 1]`.
    pub progress: f32,
    /// State machine phase.
    pub phase: DragPhase,
    /// Track background color.
    pub track_color: Color,
    /// Hint text color, alpha already faded.
    pub hint_color: Color,
    /// Hint opacity in `[0, 1]`.
    pub hint_opacity: f32,
    /// Icon on the thumb.
    pub thumb: ThumbVisual,
    /// Whether a pointer-down would start a drag.
    pub drag_enabled: bool,
}

/// A slide-to-confirm control.
#[derive(Debug, Clone)]
pub struct DraggableUnlocker {
    state: DraggableState,
    trigger: UnlockTrigger,
    enabled: bool,
}

impl DraggableUnlocker {
    /// Creates the control. Fails when the configuration is out of range.
    pub fn new(args: DraggableUnlockerArgs) -> Result<Self, ConfigError> {
        let state = DraggableState::new(args.config, args.busy)?;
        let trigger = UnlockTrigger::new(state.target(), args.on_unlock, args.haptic_feedback);
        Ok(Self {
            state,
            trigger,
            enabled: args.enabled,
        })
    }

    /// The underlying state machine.
    pub fn state(&self) -> &DraggableState {
        &self.state
    }

    /// How many times the control has unlocked.
    pub fn unlock_count(&self) -> u64 {
        self.trigger.unlock_count()
    }

    /// Whether the control accepts input.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables input.
    ///
    /// Disabling mid-drag cancels the drag and sends the thumb back to the
    /// anchor it was last heading for; a settle already running continues.
    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        if !enabled && self.state.is_dragging() {
            self.state.animate_to(self.state.target(), now);
            self.sync();
        }
    }

    /// Forwards the measured track length.
    pub fn on_track_resize(&mut self, track_length: f32, now: Instant) {
        self.state.on_track_resize(track_length, now);
        self.sync();
    }

    /// Starts a drag if the control is enabled and not busy.
    pub fn pointer_down(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        self.state.pointer_down(now)
    }

    /// Moves the thumb with the pointer. Returns the distance travelled.
    pub fn pointer_move(&mut self, delta: f32, now: Instant) -> f32 {
        self.state.pointer_move(delta, now)
    }

    /// Lifts the pointer, estimating the release velocity from the drag.
    pub fn pointer_up(&mut self, now: Instant) -> Option<Anchor> {
        let anchor = self.state.pointer_up(now);
        self.sync();
        anchor
    }

    /// Lifts the pointer with an explicit release velocity.
    pub fn release(&mut self, velocity: f32, now: Instant) -> Option<Anchor> {
        let anchor = self.state.release(velocity, now);
        self.sync();
        anchor
    }

    /// Forwards the external busy flag.
    pub fn set_busy(&mut self, busy: bool, now: Instant) {
        self.state.set_busy(busy, now);
        self.sync();
    }

    /// Animates to `anchor`, overriding any drag in progress.
    pub fn animate_to(&mut self, anchor: Anchor, now: Instant) {
        self.state.animate_to(anchor, now);
        self.sync();
    }

    /// Jumps to `anchor` without animating.
    pub fn snap_to(&mut self, anchor: Anchor) {
        self.state.snap_to(anchor);
        self.sync();
    }

    /// Advances animations to `now`. Returns whether another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let running = self.state.tick(now);
        self.sync();
        running
    }

    /// Outputs for the current frame.
    pub fn frame(&self) -> UnlockerFrame {
        let offset = self.state.offset();
        let mapper = self.mapper();
        UnlockerFrame {
            offset,
            progress: mapper.progress(offset),
            phase: self.state.phase(),
            track_color: mapper.track_color_for(offset, self.enabled),
            hint_color: mapper.hint_color(offset),
            hint_opacity: mapper.hint_opacity(offset),
            thumb: self.thumb_visual(),
            drag_enabled: self.enabled && self.state.drag_enabled(),
        }
    }

    /// Thumb offset in pixels.
    pub fn offset(&self) -> f32 {
        self.state.offset()
    }

    /// Offset normalized to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    /// Anchor of the running or most recent settle.
    pub fn target(&self) -> Anchor {
        self.state.target()
    }

    /// Anchor the thumb rests on, if any.
    pub fn settled(&self) -> Option<Anchor> {
        self.state.settled()
    }

    /// Track background color.
    pub fn track_color(&self) -> Color {
        self.mapper().track_color_for(self.state.offset(), self.enabled)
    }

    /// Hint opacity in `[0, 1]`.
    pub fn hint_opacity(&self) -> f32 {
        self.mapper().hint_opacity(self.state.offset())
    }

    /// Hint color with the fade applied.
    pub fn hint_color(&self) -> Color {
        self.mapper().hint_color(self.state.offset())
    }

    /// Icon on the thumb.
    pub fn thumb_visual(&self) -> ThumbVisual {
        ThumbVisual::for_busy(self.state.is_busy())
    }

    fn mapper(&self) -> ProgressMapper {
        ProgressMapper::new(self.state.config(), self.state.anchors())
    }

    fn sync(&mut self) {
        self.trigger.observe(self.state.target());
    }
}

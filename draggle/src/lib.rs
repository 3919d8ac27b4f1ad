//! draggle is the state machine behind a slide-to-confirm control.
//!
//! A thumb sits at the start of a horizontal track. Dragging it past a
//! threshold, or flinging it hard enough, commits it to the end of the track
//! and fires an unlock action exactly once. While the action runs the host
//! marks the control busy: the thumb is held at the end, input is ignored and
//! the thumb shows a spinner. Clearing busy sends the thumb home.
//!
//! The crate draws nothing. The host forwards pointer events, the measured
//! track length, the busy flag and frame ticks, and reads back the thumb
//! offset, the track and hint colors and the thumb icon.
//!
//! # Time
//!
//! Nothing here owns a clock. Every operation that can start or advance an
//! animation takes the frame [`std::time::Instant`] it belongs to, so hosts
//! can drive the control from a real frame loop and tests can drive it from
//! a simulated one.
//!
//! # Layers
//!
//! - [`DraggableState`] is the drag-anchor state machine on its own.
//! - [`UnlockTrigger`] turns target changes into the unlock and haptic
//!   callbacks.
//! - [`ProgressMapper`] maps an offset to progress, colors and hint opacity.
//! - [`DraggableUnlocker`] composes the three; most hosts only need this one.
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use draggle::{Anchor, DraggableUnlocker, DraggableUnlockerArgs};
//!
//! let mut unlocker = DraggableUnlocker::new(DraggableUnlockerArgs::default())?;
//! let t0 = Instant::now();
//! unlocker.on_track_resize(340.0, t0);
//!
//! assert!(unlocker.pointer_down(t0));
//! unlocker.pointer_move(40.0, t0 + Duration::from_millis(100));
//! assert_eq!(unlocker.release(0.0, t0 + Duration::from_millis(300)), Some(Anchor::Start));
//! assert_eq!(unlocker.unlock_count(), 0);
//! # Ok::<(), draggle::ConfigError>(())
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod anchor;
pub mod animation;
pub mod color;
pub mod config;
pub mod dp;
pub mod error;
pub mod progress;
pub mod prop;
pub mod state;
pub mod unlock;
pub mod unlocker;
pub mod velocity;

pub use crate::{
    anchor::{Anchor, Anchors},
    animation::{AnimationSpec, Decay, DecaySpec, Easing, Spring, Tween},
    color::Color,
    config::{DraggableConfig, DraggableDefaults},
    dp::Dp,
    error::ConfigError,
    progress::{ProgressMapper, ThumbVisual},
    prop::{Callback, CallbackWith},
    state::{DragPhase, DraggableState},
    unlock::{HapticFeedbackType, UnlockTrigger},
    unlocker::{DraggableUnlocker, DraggableUnlockerArgs, UnlockerFrame},
    velocity::VelocityTracker,
};

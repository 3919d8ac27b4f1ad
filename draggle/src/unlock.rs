//! Unlock notification.

use tracing::debug;

use crate::{
    anchor::Anchor,
    prop::{Callback, CallbackWith},
};

/// Kind of haptic feedback the host should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticFeedbackType {
    /// Strong confirmation pulse, played when the control unlocks.
    LongPress,
}

/// Fires the unlock side effects when the settle target becomes `End`.
///
/// The trigger is edge-triggered on the target anchor: it remembers the last
/// target it saw and fires only on a change into [`Anchor::End`]. The target
/// present at construction is the baseline, so a control mounted busy does
/// not unlock again.
#[derive(Debug, Clone)]
pub struct UnlockTrigger {
    last_target: Anchor,
    on_unlock: Callback,
    haptic_feedback: CallbackWith<HapticFeedbackType>,
    unlock_count: u64,
}

impl UnlockTrigger {
    /// Creates a trigger whose baseline is `initial_target`.
    pub fn new(
        initial_target: Anchor,
        on_unlock: Callback,
        haptic_feedback: CallbackWith<HapticFeedbackType>,
    ) -> Self {
        Self {
            last_target: initial_target,
            on_unlock,
            haptic_feedback,
            unlock_count: 0,
        }
    }

    /// Feeds the current target. Returns whether the unlock fired.
    ///
    /// Haptic feedback plays before `on_unlock` runs.
    pub fn observe(&mut self, target: Anchor) -> bool {
        if target == self.last_target {
            return false;
        }
        self.last_target = target;
        if target != Anchor::End {
            return false;
        }

        self.unlock_count += 1;
        debug!(count = self.unlock_count, "unlocked");
        self.haptic_feedback.call(HapticFeedbackType::LongPress);
        self.on_unlock.call();
        true
    }

    /// Last target observed.
    pub fn last_target(&self) -> Anchor {
        self.last_target
    }

    /// How many times the unlock has fired.
    pub fn unlock_count(&self) -> u64 {
        self.unlock_count
    }
}

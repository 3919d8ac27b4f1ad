//! Scripted gestures replayed on a simulated 60 fps clock.

use std::time::{Duration, Instant};

use anyhow::Result;
use clap::ValueEnum;
use draggle::{
    Anchor, DragPhase, DraggableUnlocker, DraggableUnlockerArgs, HapticFeedbackType,
    UnlockerFrame,
};
use tracing::{debug, info};

use crate::{config::DemoConfig, loading::LoadingCoordinator};

/// One simulated frame at 60 Hz.
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Built-in gesture scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Slow drag all the way across, then wait out the loading timeout.
    Swipe,
    /// Drag a third of the way, pause and let go; the thumb returns.
    ShortDrag,
    /// Quick flick from the start; the fling carries the thumb home.
    Fling,
    /// The action starts on its own while the user is dragging.
    Interrupt,
    /// Unlock, then shrink the track while loading.
    Resize,
}

impl Scenario {
    pub fn steps(self) -> Vec<Step> {
        use Step::*;

        match self {
            Scenario::Swipe => vec![
                Down,
                MoveTo {
                    fraction: 0.9,
                    over: Duration::from_millis(450),
                },
                Up,
                Wait(Duration::from_secs(5)),
            ],
            Scenario::ShortDrag => vec![
                Down,
                MoveTo {
                    fraction: 0.35,
                    over: Duration::from_millis(300),
                },
                Wait(Duration::from_millis(150)),
                Up,
                Wait(Duration::from_millis(500)),
            ],
            Scenario::Fling => vec![
                Down,
                MoveTo {
                    fraction: 0.25,
                    over: Duration::from_millis(60),
                },
                Up,
                Wait(Duration::from_secs(5)),
            ],
            Scenario::Interrupt => vec![
                Down,
                MoveTo {
                    fraction: 0.2,
                    over: Duration::from_millis(200),
                },
                StartLoading,
                MoveTo {
                    fraction: 0.0,
                    over: Duration::from_millis(100),
                },
                Up,
                Wait(Duration::from_secs(5)),
            ],
            Scenario::Resize => vec![
                Down,
                MoveTo {
                    fraction: 1.0,
                    over: Duration::from_millis(400),
                },
                Up,
                Wait(Duration::from_millis(600)),
                ResizeBy(0.6),
                Wait(Duration::from_secs(4)),
            ],
        }
    }
}

/// One instruction of a gesture script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Down,
    /// Moves the pointer so the thumb would reach `fraction` of the travel,
    /// spread evenly over `over`.
    MoveTo { fraction: f32, over: Duration },
    Up,
    Wait(Duration),
    /// Multiplies the track width.
    ResizeBy(f32),
    /// Starts the action without a gesture.
    StartLoading,
}

/// Something worth reporting that happened during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Phase(DragPhase),
    Unlocked,
    Busy(bool),
    Resized(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub events: Vec<(Duration, Event)>,
    pub frames: usize,
    pub unlock_count: u64,
    pub final_frame: UnlockerFrame,
}

impl Report {
    pub fn settled(&self) -> Option<Anchor> {
        match self.final_frame.phase {
            DragPhase::Idle(anchor) => Some(anchor),
            _ => None,
        }
    }
}

/// Drives one control through a script.
pub struct Harness {
    unlocker: DraggableUnlocker,
    loading: LoadingCoordinator,
    track_width: f32,
    origin: Instant,
    now: Instant,
    frames: usize,
    events: Vec<(Duration, Event)>,
    last_phase: DragPhase,
    last_unlocks: u64,
}

impl Harness {
    pub fn new(config: &DemoConfig) -> Result<Self> {
        let loading = LoadingCoordinator::new(config.timeout());
        let args = DraggableUnlockerArgs::default()
            .config(config.control.clone())
            .on_unlock_shared(loading.request_callback())
            .haptic_feedback(|kind| match kind {
                HapticFeedbackType::LongPress => debug!("haptic: long press"),
            });
        let mut unlocker = DraggableUnlocker::new(args)?;

        let origin = Instant::now();
        let track_width = config.track_width_px();
        unlocker.on_track_resize(track_width, origin);
        let last_phase = unlocker.state().phase();
        Ok(Self {
            unlocker,
            loading,
            track_width,
            origin,
            now: origin,
            frames: 0,
            events: Vec::new(),
            last_phase,
            last_unlocks: 0,
        })
    }

    pub fn unlocker(&self) -> &DraggableUnlocker {
        &self.unlocker
    }

    /// Runs `steps` and reports what happened. `on_frame` sees every frame.
    pub fn run(
        mut self,
        steps: &[Step],
        mut on_frame: impl FnMut(Duration, &UnlockerFrame),
    ) -> Report {
        for &step in steps {
            self.apply(step, &mut on_frame);
        }
        Report {
            events: self.events,
            frames: self.frames,
            unlock_count: self.unlocker.unlock_count(),
            final_frame: self.unlocker.frame(),
        }
    }

    fn apply(&mut self, step: Step, on_frame: &mut impl FnMut(Duration, &UnlockerFrame)) {
        match step {
            Step::Down => {
                let started = self.unlocker.pointer_down(self.now);
                debug!(started, "pointer down");
            }
            Step::MoveTo { fraction, over } => {
                let travel = self
                    .unlocker
                    .state()
                    .anchors()
                    .map(|anchors| anchors.distance())
                    .unwrap_or(0.0);
                let start = self.unlocker.state().offset();
                let frames = frames_in(over);
                let delta = (fraction * travel - start) / frames as f32;
                for _ in 0..frames {
                    self.advance(on_frame);
                    self.unlocker.pointer_move(delta, self.now);
                    self.record();
                }
            }
            Step::Up => {
                let anchor = self.unlocker.pointer_up(self.now);
                debug!(?anchor, "pointer up");
            }
            Step::Wait(duration) => {
                for _ in 0..frames_in(duration) {
                    self.advance(on_frame);
                }
            }
            Step::ResizeBy(factor) => {
                self.track_width *= factor;
                self.unlocker.on_track_resize(self.track_width, self.now);
                self.push(Event::Resized(self.track_width));
            }
            Step::StartLoading => {
                self.loading.request();
                self.sync_busy();
            }
        }
        self.record();
    }

    /// Moves the clock one frame forward and runs the per-frame work.
    fn advance(&mut self, on_frame: &mut impl FnMut(Duration, &UnlockerFrame)) {
        self.now += FRAME;
        self.frames += 1;
        self.sync_busy();
        self.unlocker.tick(self.now);
        self.record();
        on_frame(self.elapsed(), &self.unlocker.frame());
    }

    fn sync_busy(&mut self) {
        let busy = self.loading.poll(self.now);
        if busy != self.unlocker.state().is_busy() {
            self.unlocker.set_busy(busy, self.now);
            self.push(Event::Busy(busy));
        }
    }

    fn record(&mut self) {
        let phase = self.unlocker.state().phase();
        if phase != self.last_phase {
            self.last_phase = phase;
            self.push(Event::Phase(phase));
        }
        let unlocks = self.unlocker.unlock_count();
        if unlocks != self.last_unlocks {
            self.last_unlocks = unlocks;
            info!(unlocks, "unlocked");
            self.push(Event::Unlocked);
        }
    }

    fn push(&mut self, event: Event) {
        let at = self.elapsed();
        self.events.push((at, event));
    }

    fn elapsed(&self) -> Duration {
        self.now.saturating_duration_since(self.origin)
    }
}

fn frames_in(duration: Duration) -> usize {
    ((duration.as_secs_f64() / FRAME.as_secs_f64()).round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scenario: Scenario) -> Report {
        let harness = Harness::new(&DemoConfig::default()).expect("default config");
        harness.run(&scenario.steps(), |_, _| {})
    }

    fn busy_changes(report: &Report) -> Vec<bool> {
        report
            .events
            .iter()
            .filter_map(|(_, event)| match event {
                Event::Busy(busy) => Some(*busy),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_swipe_unlocks_once_and_returns() {
        let report = run(Scenario::Swipe);
        assert_eq!(report.unlock_count, 1);
        assert_eq!(busy_changes(&report), [true, false]);
        assert_eq!(report.settled(), Some(Anchor::Start));
        assert_eq!(report.final_frame.offset, 0.0);
    }

    #[test]
    fn test_short_drag_returns_without_unlock() {
        let report = run(Scenario::ShortDrag);
        assert_eq!(report.unlock_count, 0);
        assert!(busy_changes(&report).is_empty());
        assert_eq!(report.settled(), Some(Anchor::Start));
    }

    #[test]
    fn test_fling_unlocks() {
        let report = run(Scenario::Fling);
        assert_eq!(report.unlock_count, 1);
        assert_eq!(busy_changes(&report), [true, false]);
        // Released a quarter of the way in, yet the thumb went all the way.
        assert!(
            report
                .events
                .iter()
                .any(|(_, event)| *event == Event::Phase(DragPhase::Idle(Anchor::End)))
        );
    }

    #[test]
    fn test_interrupt_takes_over_drag() {
        let report = run(Scenario::Interrupt);
        assert_eq!(report.unlock_count, 1);
        assert!(
            report
                .events
                .iter()
                .any(|(_, event)| *event == Event::Phase(DragPhase::Animating(Anchor::End)))
        );
        assert_eq!(report.settled(), Some(Anchor::Start));
    }

    #[test]
    fn test_resize_while_loading() {
        let report = run(Scenario::Resize);
        assert_eq!(report.unlock_count, 1);
        assert!(
            report
                .events
                .iter()
                .any(|(_, event)| matches!(event, Event::Resized(_)))
        );
        assert_eq!(report.settled(), Some(Anchor::Start));
    }

    #[test]
    fn test_frames_in() {
        assert_eq!(frames_in(Duration::from_secs(1)), 60);
        assert_eq!(frames_in(Duration::ZERO), 1);
    }
}

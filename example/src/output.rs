use std::time::Duration;

use console::style;
use draggle::{Anchor, DragPhase, ThumbVisual, UnlockerFrame};

use crate::scenario::Event;

const STATUS_WIDTH: usize = 12;
const BAR_WIDTH: usize = 40;

pub fn status(label: &str, message: impl AsRef<str>) {
    eprintln!(
        "{:>width$} {}",
        style(label).green().bold(),
        message.as_ref(),
        width = STATUS_WIDTH
    );
}

pub fn note(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("note").blue().bold(), message.as_ref());
}

pub fn step(message: impl AsRef<str>) {
    eprintln!("    {}", message.as_ref());
}

pub fn event(at: Duration, event: &Event) {
    let (label, message) = match event {
        Event::Phase(phase) => ("Phase", describe_phase(*phase)),
        Event::Unlocked => ("Unlocked", "on_unlock fired".to_string()),
        Event::Busy(true) => ("Busy", "loading started".to_string()),
        Event::Busy(false) => ("Idle", "loading finished".to_string()),
        Event::Resized(width) => ("Resized", format!("track is now {width:.0} px")),
    };
    status(label, format!("{} {message}", style(timestamp(at)).dim()));
}

/// One-line picture of the track: thumb position, hint and color fraction.
pub fn frame(at: Duration, frame: &UnlockerFrame) {
    let position = (frame.progress * (BAR_WIDTH - 1) as f32).round() as usize;
    let position = position.min(BAR_WIDTH - 1);
    let thumb = match frame.thumb {
        ThumbVisual::Arrow => '>',
        ThumbVisual::Spinner => '*',
    };
    let bar: String = (0..BAR_WIDTH)
        .map(|i| {
            if i == position {
                thumb
            } else if i < position {
                '='
            } else {
                ' '
            }
        })
        .collect();
    let rgb = frame.track_color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    step(format!(
        "{} [{}] {:>5.1}%  hint {:.2}  #{:02X}{:02X}{:02X}",
        style(timestamp(at)).dim(),
        style(bar).green(),
        frame.progress * 100.0,
        frame.hint_opacity,
        rgb[0],
        rgb[1],
        rgb[2],
    ));
}

pub fn timestamp(at: Duration) -> String {
    format!("{:>6.3}s", at.as_secs_f32())
}

fn describe_phase(phase: DragPhase) -> String {
    match phase {
        DragPhase::Idle(anchor) => format!("resting at {}", anchor_name(anchor)),
        DragPhase::Dragging => "dragging".to_string(),
        DragPhase::Animating(anchor) => format!("settling toward {}", anchor_name(anchor)),
    }
}

fn anchor_name(anchor: Anchor) -> String {
    style(anchor).bold().to_string()
}

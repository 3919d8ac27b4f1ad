//! Offset-to-visual mapping.
//!
//! Every output is a pure function of the thumb offset and the anchors, so
//! the presentation can recompute them every frame in any order.

use crate::{anchor::Anchors, color::Color, config::DraggableConfig};

/// Icon the thumb should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbVisual {
    /// Idle thumb, pointing toward the end of the track.
    Arrow,
    /// Busy thumb, an indeterminate progress spinner.
    Spinner,
}

impl ThumbVisual {
    /// The icon for the given busy state.
    pub fn for_busy(busy: bool) -> Self {
        if busy {
            ThumbVisual::Spinner
        } else {
            ThumbVisual::Arrow
        }
    }
}

/// Maps a thumb offset to progress, track color and hint opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressMapper {
    anchors: Option<Anchors>,
    color_full_at: f32,
    fade_full_at: f32,
    start_color: Color,
    end_color: Color,
    disabled_track_color: Color,
    hint_color: Color,
}

impl ProgressMapper {
    /// Creates a mapper for the given anchors; `None` while the track is
    /// unmeasured.
    pub fn new(config: &DraggableConfig, anchors: Option<Anchors>) -> Self {
        Self {
            anchors,
            color_full_at: config.color_full_at,
            fade_full_at: config.fade_full_at,
            start_color: config.start_color,
            end_color: config.end_color,
            disabled_track_color: config.disabled_track_color,
            hint_color: config.hint_color,
        }
    }

    /// Normalized travel in `[0, 1]`.
    ///
    /// Unknown or degenerate anchors report `0.0`.
    pub fn progress(&self, offset: f32) -> f32 {
        self.anchors
            .map(|anchors| anchors.fraction_of(offset))
            .unwrap_or(0.0)
    }

    /// Interpolation fraction of the track color, reaching `1.0` once the
    /// thumb has travelled `color_full_at` of the track.
    pub fn color_fraction(&self, offset: f32) -> f32 {
        ramp(self.raw_fraction(offset), self.color_full_at)
    }

    /// Track background color for `offset`.
    pub fn track_color(&self, offset: f32) -> Color {
        self.start_color.lerp(self.end_color, self.color_fraction(offset))
    }

    /// Track background color, honoring the enabled state.
    pub fn track_color_for(&self, offset: f32, enabled: bool) -> Color {
        if enabled {
            self.track_color(offset)
        } else {
            self.disabled_track_color
        }
    }

    /// Hint opacity for `offset`: `1.0` at the start, `0.0` once the thumb
    /// has travelled `fade_full_at` of the track.
    pub fn hint_opacity(&self, offset: f32) -> f32 {
        1.0 - ramp(self.raw_fraction(offset), self.fade_full_at)
    }

    /// Hint color with the fade applied to its alpha.
    pub fn hint_color(&self, offset: f32) -> Color {
        let opacity = self.hint_opacity(offset);
        self.hint_color.with_alpha(self.hint_color.a * opacity)
    }

    /// `offset / end`, without clamping. Fling overshoot can push this past
    /// `1.0`; [`ramp`] clamps it.
    fn raw_fraction(&self, offset: f32) -> f32 {
        match self.anchors {
            Some(anchors) if !anchors.is_degenerate() && offset.is_finite() => {
                (offset - anchors.start()) / anchors.distance()
            }
            _ => 0.0,
        }
    }
}

/// Maps `fraction` onto `[0, 1]`, saturating at `full_at`.
fn ramp(fraction: f32, full_at: f32) -> f32 {
    if full_at <= 0.0 || !full_at.is_finite() {
        return if fraction > 0.0 { 1.0 } else { 0.0 };
    }
    (fraction.clamp(0.0, full_at) / full_at).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DraggableDefaults;

    fn mapper() -> ProgressMapper {
        let config = DraggableConfig::default()
            .color_full_at(0.4)
            .fade_full_at(0.35);
        ProgressMapper::new(&config, Some(Anchors::compute(100.0, 0.0)))
    }

    #[test]
    fn test_progress_fraction() {
        let mapper = mapper();
        assert_eq!(mapper.progress(0.0), 0.0);
        assert_eq!(mapper.progress(25.0), 0.25);
        assert_eq!(mapper.progress(100.0), 1.0);
        assert_eq!(mapper.progress(140.0), 1.0);
        assert_eq!(mapper.progress(-10.0), 0.0);
    }

    #[test]
    fn test_color_and_opacity_monotonic() {
        let mapper = mapper();
        let mut previous_color = -1.0;
        let mut previous_opacity = 2.0;
        for step in 0..=200 {
            let offset = step as f32 * 0.5;
            let color = mapper.color_fraction(offset);
            let opacity = mapper.hint_opacity(offset);
            assert!(color >= previous_color);
            assert!(opacity <= previous_opacity);
            assert!((0.0..=1.0).contains(&color));
            assert!((0.0..=1.0).contains(&opacity));
            previous_color = color;
            previous_opacity = opacity;
        }
    }

    #[test]
    fn test_terminal_values_past_full_at() {
        let mapper = mapper();
        assert_eq!(mapper.track_color(0.0), DraggableDefaults::START_COLOR);
        assert_eq!(mapper.color_fraction(40.0), 1.0);
        assert_eq!(mapper.track_color(40.0), DraggableDefaults::END_COLOR);
        assert_eq!(mapper.track_color(90.0), DraggableDefaults::END_COLOR);
        assert_eq!(mapper.hint_opacity(35.0), 0.0);
        assert_eq!(mapper.hint_opacity(100.0), 0.0);
        assert!((mapper.color_fraction(20.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let mapper = mapper();
        assert_eq!(mapper.color_fraction(250.0), 1.0);
        assert_eq!(mapper.hint_opacity(250.0), 0.0);
        assert_eq!(mapper.color_fraction(-50.0), 0.0);
        assert_eq!(mapper.hint_opacity(-50.0), 1.0);
        assert_eq!(mapper.hint_opacity(f32::NAN), 1.0);
    }

    #[test]
    fn test_unmeasured_and_degenerate_track() {
        let config = DraggableConfig::default();
        let unmeasured = ProgressMapper::new(&config, None);
        assert_eq!(unmeasured.progress(30.0), 0.0);
        assert_eq!(unmeasured.hint_opacity(30.0), 1.0);
        assert_eq!(unmeasured.track_color(30.0), config.start_color);

        let degenerate = ProgressMapper::new(&config, Some(Anchors::compute(20.0, 40.0)));
        assert_eq!(degenerate.progress(0.0), 0.0);
        assert_eq!(degenerate.color_fraction(0.0), 0.0);
    }

    #[test]
    fn test_hint_color_alpha_and_disabled_track() {
        let config = DraggableConfig::default()
            .hint_color(Color::new(1.0, 1.0, 1.0, 0.8))
            .disabled_track_color(Color::BLACK);
        let mapper = ProgressMapper::new(&config, Some(Anchors::compute(100.0, 0.0)));
        assert!((mapper.hint_color(0.0).a - 0.8).abs() < 1e-6);
        assert_eq!(mapper.hint_color(50.0).a, 0.0);
        assert_eq!(mapper.track_color_for(50.0, false), Color::BLACK);
        assert_eq!(mapper.track_color_for(50.0, true), config.end_color);
    }

    #[test]
    fn test_thumb_visual() {
        assert_eq!(ThumbVisual::for_busy(false), ThumbVisual::Arrow);
        assert_eq!(ThumbVisual::for_busy(true), ThumbVisual::Spinner);
    }
}

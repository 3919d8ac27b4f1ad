//! The two resting positions of the thumb.

use std::fmt;

/// A named resting position for the thumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    /// The left end of the track; the control is unconfirmed.
    #[default]
    Start,
    /// The right end of the track; the control is confirmed.
    End,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Start => f.write_str("start"),
            Anchor::End => f.write_str("end"),
        }
    }
}

/// Pixel offsets of both anchors along the track.
///
/// `start` is always `0.0` and `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchors {
    start: f32,
    end: f32,
}

impl Anchors {
    /// Computes the anchors for a measured track.
    ///
    /// The thumb travels from `0` to `track_length - thumb_length`. A track
    /// shorter than the thumb collapses the end anchor onto the start anchor;
    /// dragging is then inert but nothing fails.
    ///
    /// ```
    /// use draggle::Anchors;
    ///
    /// let anchors = Anchors::compute(300.0, 40.0);
    /// assert_eq!(anchors.end(), 260.0);
    /// assert_eq!(Anchors::compute(20.0, 40.0).end(), 0.0);
    /// ```
    pub fn compute(track_length: f32, thumb_length: f32) -> Self {
        let track_length = finite_non_negative(track_length);
        let thumb_length = finite_non_negative(thumb_length);
        Self {
            start: 0.0,
            end: (track_length - thumb_length).max(0.0),
        }
    }

    /// Offset of the start anchor.
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Offset of the end anchor.
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Offset of the given anchor.
    pub fn offset_of(&self, anchor: Anchor) -> f32 {
        match anchor {
            Anchor::Start => self.start,
            Anchor::End => self.end,
        }
    }

    /// Distance between the two anchors.
    pub fn distance(&self) -> f32 {
        self.end - self.start
    }

    /// Whether the thumb has any room to travel.
    pub fn is_degenerate(&self) -> bool {
        self.distance() <= f32::EPSILON
    }

    /// Clamps `offset` into `[start, end]`.
    pub fn clamp(&self, offset: f32) -> f32 {
        if offset.is_nan() {
            return self.start;
        }
        offset.clamp(self.start, self.end)
    }

    /// Position of `offset` between the anchors, `0.0` at start and `1.0` at
    /// end. Degenerate anchors always report `0.0`.
    pub fn fraction_of(&self, offset: f32) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((self.clamp(offset) - self.start) / self.distance()).clamp(0.0, 1.0)
    }

    /// The anchor a resting thumb at `offset` belongs to, given a positional
    /// threshold in `[0, 1]`.
    ///
    /// Positions at or past the threshold belong to the end anchor. This is a
    /// pure function of the normalized position; there is no hysteresis.
    pub fn anchor_for(&self, offset: f32, positional_threshold: f32) -> Anchor {
        if self.is_degenerate() {
            return Anchor::Start;
        }
        if self.fraction_of(offset) >= positional_threshold {
            Anchor::End
        } else {
            Anchor::Start
        }
    }
}

/// Clamps a measured length into `[0, f32::MAX]`; NaN counts as zero.
fn finite_non_negative(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, f32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_bounds() {
        for (track, thumb) in [(100.0, 0.0), (100.0, 40.0), (40.0, 40.0), (1000.0, 56.5)] {
            let anchors = Anchors::compute(track, thumb);
            assert_eq!(anchors.start(), 0.0);
            assert_eq!(anchors.end(), track - thumb);
        }
    }

    #[test]
    fn test_short_track_collapses_end() {
        let anchors = Anchors::compute(30.0, 40.0);
        assert_eq!(anchors.end(), 0.0);
        assert!(anchors.is_degenerate());
        assert_eq!(anchors.fraction_of(10.0), 0.0);
        assert_eq!(anchors.anchor_for(10.0, 0.5), Anchor::Start);
    }

    #[test]
    fn test_invalid_lengths_are_zeroed() {
        assert_eq!(Anchors::compute(f32::NAN, 10.0).end(), 0.0);
        assert_eq!(Anchors::compute(-50.0, 10.0).end(), 0.0);
        assert_eq!(Anchors::compute(100.0, f32::NEG_INFINITY).end(), 100.0);
    }

    #[test]
    fn test_infinite_thumb_collapses_travel() {
        let anchors = Anchors::compute(100.0, f32::INFINITY);
        assert_eq!(anchors.end(), 0.0);
        assert!(anchors.is_degenerate());
    }

    #[test]
    fn test_anchor_for_threshold() {
        let anchors = Anchors::compute(100.0, 0.0);
        assert_eq!(anchors.anchor_for(40.0, 0.5), Anchor::Start);
        assert_eq!(anchors.anchor_for(50.0, 0.5), Anchor::End);
        assert_eq!(anchors.anchor_for(60.0, 0.5), Anchor::End);
        assert_eq!(anchors.anchor_for(30.0, 0.25), Anchor::End);
        assert_eq!(anchors.anchor_for(500.0, 0.5), Anchor::End);
        assert_eq!(anchors.anchor_for(-20.0, 0.5), Anchor::Start);
    }

    #[test]
    fn test_clamp() {
        let anchors = Anchors::compute(100.0, 20.0);
        assert_eq!(anchors.clamp(-1.0), 0.0);
        assert_eq!(anchors.clamp(81.0), 80.0);
        assert_eq!(anchors.clamp(f32::NAN), 0.0);
        assert_eq!(anchors.offset_of(Anchor::End), 80.0);
    }
}

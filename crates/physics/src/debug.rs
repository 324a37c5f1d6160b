//! Debug line buffer for visualizing traces.

use glam::Vec3;

/// Colors available to debug segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    /// Trace that hit something.
    Green,
    /// Trace that hit nothing.
    Red,
}

/// A line segment kept alive for a limited time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSegment {
    /// Segment start.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// Draw color.
    pub color: DebugColor,
    /// Seconds left before the segment expires.
    pub remaining: f32,
}

/// Segments queued for drawing by whatever renderer the host owns.
#[derive(Debug, Default)]
pub struct DebugLines {
    segments: Vec<DebugSegment>,
}

impl DebugLines {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a segment for `lifetime` seconds.
    pub fn push(&mut self, start: Vec3, end: Vec3, color: DebugColor, lifetime: f32) {
        self.segments.push(DebugSegment {
            start,
            end,
            color,
            remaining: lifetime,
        });
    }

    /// Age every segment by `dt` seconds and drop expired ones.
    pub fn tick(&mut self, dt: f32) {
        for segment in &mut self.segments {
            segment.remaining -= dt;
        }
        self.segments.retain(|segment| segment.remaining > 0.0);
    }

    /// Live segments.
    pub fn iter(&self) -> impl Iterator<Item = &DebugSegment> {
        self.segments.iter()
    }

    /// Number of live segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segments are queued.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_expire() {
        let mut lines = DebugLines::new();
        lines.push(Vec3::ZERO, Vec3::X, DebugColor::Green, 2.0);
        lines.push(Vec3::ZERO, Vec3::Y, DebugColor::Red, 0.5);

        lines.tick(1.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.iter().next().map(|s| s.color), Some(DebugColor::Green));

        lines.tick(1.0);
        assert!(lines.is_empty());
    }
}

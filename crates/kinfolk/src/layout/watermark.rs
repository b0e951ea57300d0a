//! Per-depth occupancy tracking.

/// Occupied horizontal spans at one depth.
///
/// The watermark is the right edge of the rightmost occupied span.
#[derive(Debug, Default, Clone)]
pub(super) struct Watermark {
    right_edge: Option<f32>,
    spans: Vec<(f32, f32)>,
}

impl Watermark {
    /// Moves `desired` right until it starts at least `gap` past the watermark.
    pub(super) fn clamp(&self, desired: f32, gap: f32) -> f32 {
        match self.right_edge {
            Some(edge) => desired.max(edge + gap),
            None => desired,
        }
    }

    /// First position `gap` past the watermark, or `0` for an empty depth.
    pub(super) fn next_slot(&self, gap: f32) -> f32 {
        self.right_edge.map_or(0.0, |edge| edge + gap)
    }

    /// Returns `true` when `[start, end)` intersects no occupied span.
    pub(super) fn is_free(&self, start: f32, end: f32) -> bool {
        self.spans
            .iter()
            .all(|(min, max)| end <= *min || start >= *max)
    }

    /// Records `[start, end)` as occupied.
    pub(super) fn occupy(&mut self, start: f32, end: f32) {
        self.spans.push((start, end));
        self.right_edge = Some(self.right_edge.map_or(end, |edge| edge.max(end)));
    }
}

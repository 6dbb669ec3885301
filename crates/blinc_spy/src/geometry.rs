//! Vertical band arithmetic for visibility tests
//!
//! Everything here works on the y axis only. A [`Band`] is the visible slice
//! of the page (or of a scroll container's content) and an element is a span
//! described by its top offset and height.

/// A half-open vertical range `[top, bottom)`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Band {
    /// Top edge (inclusive)
    pub top: f32,
    /// Bottom edge (exclusive)
    pub bottom: f32,
}

impl Band {
    /// Create a new band
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Height of the band (may be negative when thresholds overlap)
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap: the span's bottom edge is below the band's top edge
    /// and the span's top edge is above the band's bottom edge.
    pub fn overlaps_span(&self, top: f32, height: f32) -> bool {
        top + height > self.top && top < self.bottom
    }

    /// Inclusive overlap: touching edges count as visible.
    pub fn touches_span(&self, top: f32, height: f32) -> bool {
        top + height >= self.top && top <= self.bottom
    }
}

/// The visible band of the window, shrunk by the top and bottom thresholds
pub fn window_band(
    scroll_top: f32,
    viewport_height: f32,
    threshold_top: f32,
    threshold_bottom: f32,
) -> Band {
    Band {
        top: scroll_top + threshold_top,
        bottom: scroll_top + viewport_height - threshold_bottom,
    }
}

/// The visible slice of a scroll container's content, in layout coordinates
///
/// `container_offset` is the container's layout offset on the page and
/// `container_scroll_top` how far its content is scrolled. Only the part of
/// the container above the window's bottom edge counts. Returns `None` when
/// the container starts below the fold.
///
/// A container scrolled partly above the window's top edge still reports its
/// full upper portion as visible.
pub fn container_band(
    container_offset: f32,
    container_scroll_top: f32,
    container_height: f32,
    window_scroll_top: f32,
    viewport_height: f32,
) -> Option<Band> {
    // < 0: container top is above the window, > 0: on or below it
    let distance = container_offset - window_scroll_top;
    let visible_height = (viewport_height - distance).min(container_height);
    if visible_height < 0.0 {
        return None;
    }

    let top = container_offset + container_scroll_top;
    Some(Band {
        top,
        bottom: top + visible_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps_span_is_strict() {
        let band = Band::new(100.0, 200.0);

        assert!(band.overlaps_span(50.0, 100.0));
        assert!(band.overlaps_span(150.0, 10.0));
        assert!(band.overlaps_span(0.0, 1000.0));

        // Touching the top edge from above
        assert!(!band.overlaps_span(0.0, 100.0));
        // Touching the bottom edge from below
        assert!(!band.overlaps_span(200.0, 50.0));
    }

    #[test]
    fn test_touches_span_is_inclusive() {
        let band = Band::new(100.0, 200.0);

        assert!(band.touches_span(0.0, 100.0));
        assert!(band.touches_span(200.0, 50.0));
        assert!(!band.touches_span(0.0, 99.0));
        assert!(!band.touches_span(201.0, 50.0));
    }

    #[test]
    fn test_window_band_applies_thresholds() {
        let band = window_band(500.0, 800.0, 60.0, 100.0);
        assert_eq!(band, Band::new(560.0, 1200.0));
        assert_eq!(band.height(), 640.0);
    }

    #[test]
    fn test_container_band_fully_on_screen() {
        // Container at y=100, 300 tall, content scrolled by 40, window at top
        let band = container_band(100.0, 40.0, 300.0, 0.0, 800.0).unwrap();
        assert_eq!(band, Band::new(140.0, 440.0));
    }

    #[test]
    fn test_container_band_cut_by_fold() {
        // Only 200px of the container fit above the window's bottom edge
        let band = container_band(600.0, 0.0, 500.0, 0.0, 800.0).unwrap();
        assert_eq!(band, Band::new(600.0, 800.0));
    }

    #[test]
    fn test_container_band_below_fold() {
        assert_eq!(container_band(1000.0, 0.0, 300.0, 0.0, 800.0), None);
    }

    #[test]
    fn test_container_band_exactly_at_fold_is_empty() {
        let band = container_band(800.0, 0.0, 300.0, 0.0, 800.0).unwrap();
        assert_eq!(band.height(), 0.0);
        assert!(!band.overlaps_span(800.0, 100.0));
    }
}

//! Visibility math for the section reveal effect.

/// Fraction of a section that must be visible before it reveals.
pub const REVEAL_THRESHOLD: f64 = 0.15;

/// Scroll offset under which the page counts as freshly loaded, revealing
/// everything currently on screen without animation staging.
pub const TOP_SCROLL_LIMIT: f64 = 100.0;

/// Sections whose top edge is within this many pixels of the viewport
/// bottom are still considered off screen.
pub const BOTTOM_EDGE_MARGIN: f64 = 20.0;

/// Fraction of an element's height currently inside the viewport, given
/// its bounding-rect top and bottom. Zero-height elements count as not
/// visible.
pub fn visible_fraction(top: f64, bottom: f64, viewport_height: f64) -> f64 {
    let height = bottom - top;
    if height <= 0.0 {
        return 0.0;
    }
    let visible = bottom.min(viewport_height) - top.max(0.0);
    (visible / height).clamp(0.0, 1.0)
}

/// Whether an element is visible enough to reveal right now.
pub fn is_in_view(top: f64, bottom: f64, viewport_height: f64, threshold: f64) -> bool {
    visible_fraction(top, bottom, viewport_height) >= threshold
        && top < viewport_height - BOTTOM_EDGE_MARGIN
}

/// Whether the page is scrolled near enough to the top to skip staging.
pub fn at_page_top(scroll_y: f64) -> bool {
    scroll_y < TOP_SCROLL_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_visible() {
        assert_eq!(visible_fraction(0.0, 100.0, 800.0), 1.0);
    }

    #[test]
    fn test_half_scrolled_off_top() {
        assert_eq!(visible_fraction(-50.0, 50.0, 800.0), 0.5);
    }

    #[test]
    fn test_partially_below_fold() {
        assert_eq!(visible_fraction(750.0, 950.0, 800.0), 0.25);
    }

    #[test]
    fn test_entirely_below_fold() {
        assert_eq!(visible_fraction(900.0, 1100.0, 800.0), 0.0);
    }

    #[test]
    fn test_zero_height_is_invisible() {
        assert_eq!(visible_fraction(100.0, 100.0, 800.0), 0.0);
    }

    #[test]
    fn test_in_view_respects_threshold() {
        assert!(is_in_view(0.0, 400.0, 800.0, REVEAL_THRESHOLD));
        assert!(!is_in_view(790.0, 1400.0, 800.0, REVEAL_THRESHOLD));
    }

    #[test]
    fn test_top_near_viewport_bottom_stays_hidden() {
        // Fully visible sliver, but its top sits inside the bottom margin.
        assert!(!is_in_view(785.0, 795.0, 800.0, REVEAL_THRESHOLD));
        assert!(is_in_view(700.0, 790.0, 800.0, REVEAL_THRESHOLD));
    }

    #[test]
    fn test_page_top() {
        assert!(at_page_top(0.0));
        assert!(at_page_top(99.9));
        assert!(!at_page_top(100.0));
    }
}

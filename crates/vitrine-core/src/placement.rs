//! Anchored panel geometry.
//!
//! A dropdown panel wants to sit centered under its parent item, but must
//! stay inside the viewport with a fixed padding on both edges. All values
//! are viewport-space pixels; `left_px` offsets are relative to the parent
//! element's left edge, ready for an absolute-positioned child.

/// Gap kept between a panel and the viewport edge.
pub const DEFAULT_EDGE_PADDING: f64 = 20.0;

/// Which viewport edge a clamped panel hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAlignment {
    Left,
    Right,
}

/// Where to place a panel relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelPlacement {
    /// Centered under the parent: `left: 50%; translate(-50%, 0)`.
    Centered,
    /// Pinned at a fixed offset from the parent's left edge.
    Edge {
        left_px: f64,
        alignment: PanelAlignment,
    },
}

impl PanelPlacement {
    /// Computes panel placement.
    ///
    /// `panel_width` should be measured after [`max_panel_width`] has been
    /// applied, so an oversized panel is exactly viewport-wide minus
    /// padding and pins to the left edge.
    pub fn compute(
        panel_width: f64,
        parent_left: f64,
        parent_width: f64,
        viewport_width: f64,
        padding: f64,
    ) -> PanelPlacement {
        let max_width = max_panel_width(viewport_width, padding);
        if panel_width >= max_width {
            return PanelPlacement::Edge {
                left_px: padding - parent_left,
                alignment: PanelAlignment::Left,
            };
        }

        let parent_center = parent_left + parent_width / 2.0;
        let panel_left = parent_center - panel_width / 2.0;
        let panel_right = parent_center + panel_width / 2.0;

        if panel_left < padding {
            PanelPlacement::Edge {
                left_px: padding - parent_left,
                alignment: PanelAlignment::Left,
            }
        } else if panel_right > viewport_width - padding {
            PanelPlacement::Edge {
                left_px: (viewport_width - padding - panel_width) - parent_left,
                alignment: PanelAlignment::Right,
            }
        } else {
            PanelPlacement::Centered
        }
    }
}

/// Widest a panel may be inside the viewport.
pub fn max_panel_width(viewport_width: f64, padding: f64) -> f64 {
    viewport_width - padding * 2.0
}

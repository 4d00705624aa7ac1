//! Nine-grid placement math.
//!
//! An overlay box is anchored to one of nine positions (3x3 grid of
//! top/center/bottom x left/center/right) inside an image, offset from the
//! edges by a margin, and clamped so the placement never goes negative.

/// Nine-grid preset for placing an overlay box within an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GridPosition {
    /// Top edge, left edge.
    TopLeft,
    /// Top edge, horizontally centered.
    TopCenter,
    /// Top edge, right edge.
    TopRight,
    /// Vertically centered, left edge.
    CenterLeft,
    /// Centered on both axes.
    Center,
    /// Vertically centered, right edge.
    CenterRight,
    /// Bottom edge, left edge.
    BottomLeft,
    /// Bottom edge, horizontally centered.
    BottomCenter,
    /// Bottom edge, right edge (the conventional watermark corner).
    #[default]
    BottomRight,
}

impl GridPosition {
    /// All nine presets, row by row.
    pub const ALL: [GridPosition; 9] = [
        GridPosition::TopLeft,
        GridPosition::TopCenter,
        GridPosition::TopRight,
        GridPosition::CenterLeft,
        GridPosition::Center,
        GridPosition::CenterRight,
        GridPosition::BottomLeft,
        GridPosition::BottomCenter,
        GridPosition::BottomRight,
    ];

    /// Fixed display label for this preset.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GridPosition::TopLeft => "Top Left",
            GridPosition::TopCenter => "Top Center",
            GridPosition::TopRight => "Top Right",
            GridPosition::CenterLeft => "Center Left",
            GridPosition::Center => "Center",
            GridPosition::CenterRight => "Center Right",
            GridPosition::BottomLeft => "Bottom Left",
            GridPosition::BottomCenter => "Bottom Center",
            GridPosition::BottomRight => "Bottom Right",
        }
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            GridPosition::TopLeft => "top-left",
            GridPosition::TopCenter => "top-center",
            GridPosition::TopRight => "top-right",
            GridPosition::CenterLeft => "center-left",
            GridPosition::Center => "center",
            GridPosition::CenterRight => "center-right",
            GridPosition::BottomLeft => "bottom-left",
            GridPosition::BottomCenter => "bottom-center",
            GridPosition::BottomRight => "bottom-right",
        };
        write!(f, "{token}")
    }
}

/// Per-axis placement: edge-near (margin), centered, or edge-far.
fn axis_offset(dim: i64, box_dim: i64, margin: i64, near: bool, far: bool) -> i64 {
    if near {
        margin
    } else if far {
        dim - box_dim - margin
    } else {
        (dim - box_dim) / 2
    }
}

/// Compute the top-left pixel coordinate for placing a `box_w` x `box_h`
/// overlay inside an `img_w` x `img_h` image at the given preset.
///
/// The result is clamped into `[0, dim - box_dim]` on each axis. A box
/// larger than the image clamps to 0 and overflows the image bounds; that
/// is accepted, not an error. The center presets ignore the margin on the
/// centered axis.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_position(
    img_w: u32,
    img_h: u32,
    box_w: u32,
    box_h: u32,
    position: GridPosition,
    margin: u32,
) -> (u32, u32) {
    let (img_w, img_h) = (i64::from(img_w), i64::from(img_h));
    let (box_w, box_h) = (i64::from(box_w), i64::from(box_h));
    let margin = i64::from(margin);

    let left = matches!(
        position,
        GridPosition::TopLeft | GridPosition::CenterLeft | GridPosition::BottomLeft
    );
    let right = matches!(
        position,
        GridPosition::TopRight | GridPosition::CenterRight | GridPosition::BottomRight
    );
    let top = matches!(
        position,
        GridPosition::TopLeft | GridPosition::TopCenter | GridPosition::TopRight
    );
    let bottom = matches!(
        position,
        GridPosition::BottomLeft | GridPosition::BottomCenter | GridPosition::BottomRight
    );

    let x = axis_offset(img_w, box_w, margin, left, right);
    let y = axis_offset(img_h, box_h, margin, top, bottom);

    // Clamp to keep the overlay anchored inside the image.
    let x = x.clamp(0, (img_w - box_w).max(0));
    let y = y.clamp(0, (img_h - box_h).max(0));

    (x as u32, y as u32)
}

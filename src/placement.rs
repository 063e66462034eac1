//! Named overlay anchors and the shared coordinate resolution used by both the
//! text and logo watermark paths.

use clap::ValueEnum;

/// Default distance between an overlay and the container edge, in pixels.
pub const MARGIN: u32 = 20;

/// Where an overlay sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Placement {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Placement::TopLeft => "top-left",
            Placement::TopRight => "top-right",
            Placement::BottomLeft => "bottom-left",
            Placement::BottomRight => "bottom-right",
            Placement::Center => "center",
        };
        f.write_str(name)
    }
}

/// Resolves an anchor to the overlay's top-left pixel coordinate.
///
/// Coordinates are signed: an overlay larger than its container resolves to a
/// negative anchor, which the compositor clips rather than clamps. Keeping the
/// overlay fully inside the container is the caller's responsibility.
pub fn resolve(
    container: (u32, u32),
    overlay: (u32, u32),
    margin: u32,
    anchor: Placement,
) -> (i64, i64) {
    let (cw, ch) = (i64::from(container.0), i64::from(container.1));
    let (ow, oh) = (i64::from(overlay.0), i64::from(overlay.1));
    let m = i64::from(margin);

    match anchor {
        Placement::TopLeft => (m, m),
        Placement::TopRight => (cw - ow - m, m),
        Placement::BottomLeft => (m, ch - oh - m),
        Placement::BottomRight => (cw - ow - m, ch - oh - m),
        // Floored division: a centered overlay larger than its container
        // anchors one pixel further up-left than truncation would give.
        Placement::Center => ((cw - ow).div_euclid(2), (ch - oh).div_euclid(2)),
    }
}

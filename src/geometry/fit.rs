use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{PosterError, PosterResult};
use crate::model::descriptor::FitMode;

/// Compute where a source image of natural size `source` is drawn for a target box.
///
/// The box is `(x, y, width, height)` in device pixels. `Contain` and `Cover` pick the
/// constrained axis from the source shape and the box shape respectively, and center the
/// other axis. Zero-area sources are rejected instead of producing NaN geometry.
pub fn resolve_fit(target: Rect, source: Size, mode: FitMode) -> PosterResult<Rect> {
    let (x, y) = (target.x0, target.y0);
    let (width, height) = (target.width(), target.height());

    let (dx, dy, dw, dh) = match mode {
        FitMode::Full => (x, y, width, height),
        FitMode::Contain => {
            let (w, h) = natural_size(source)?;
            if w > h {
                let dw = width;
                let dh = width / w * h;
                (x, y + (width - dh) / 2.0, dw, dh)
            } else {
                let dh = height;
                let dw = height / h * w;
                (x + (height - dw) / 2.0, y, dw, dh)
            }
        }
        FitMode::Cover => {
            let (w, h) = natural_size(source)?;
            if width > height {
                let dw = width;
                let dh = width / w * h;
                (x, y - (dh - height) / 2.0, dw, dh)
            } else {
                let dh = height;
                let dw = height / h * w;
                (x - (dw - width) / 2.0, y, dw, dh)
            }
        }
    };

    Ok(Rect::new(dx, dy, dx + dw, dy + dh))
}

fn natural_size(source: Size) -> PosterResult<(f64, f64)> {
    let (w, h) = (source.width, source.height);
    if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
        return Err(PosterError::geometry(format!(
            "source image has degenerate size {w}x{h}"
        )));
    }
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;

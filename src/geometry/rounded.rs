use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, Vec2};

use crate::foundation::core::{BezPath, Point, Rect};

const ARC_TOLERANCE: f64 = 0.1;

/// Radius actually used for a rounded box.
///
/// The clamp is against half of the *larger* side, so the radius may still exceed half of
/// the smaller side.
pub fn effective_radius(width: f64, height: f64, radius: f64) -> f64 {
    let max_radius = width.max(height) / 2.0;
    radius.min(max_radius).max(0.0)
}

/// Closed rounded-rectangle outline.
///
/// Starts on the top edge inset by the radius and runs clockwise: four straight edges, each
/// followed by a quarter arc around the next corner.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let (x, y) = (rect.x0, rect.y0);
    let (w, h) = (rect.width(), rect.height());
    let r = effective_radius(w, h, radius);

    // (edge end point, arc center, arc start angle) per corner, clockwise from top-right.
    let corners = [
        (Point::new(x + w - r, y), Point::new(x + w - r, y + r), -FRAC_PI_2),
        (Point::new(x + w, y + h - r), Point::new(x + w - r, y + h - r), 0.0),
        (Point::new(x + r, y + h), Point::new(x + r, y + h - r), FRAC_PI_2),
        (Point::new(x, y + r), Point::new(x + r, y + r), PI),
    ];

    let mut path = BezPath::new();
    path.move_to(Point::new(x + r, y));
    for (edge_end, center, start) in corners {
        path.line_to(edge_end);
        if r > 0.0 {
            let arc = Arc::new(center, Vec2::new(r, r), start, FRAC_PI_2, 0.0);
            for el in arc.append_iter(ARC_TOLERANCE) {
                path.push(el);
            }
        }
    }
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rounded.rs"]
mod tests;

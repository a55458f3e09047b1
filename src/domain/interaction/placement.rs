//! Pure geometry used by the interaction manager: grid snap, collision
//! avoidance, viewport clamping and handle-driven resizing.

use super::state::ResizeHandle;
use crate::domain::display::{Position, Rect, Size, SizeBounds, ViewportBounds};

/// Round each coordinate to the nearest multiple of `cell`.
pub fn snap_to_grid(position: Position, cell: Option<f64>) -> Position {
    match cell {
        Some(cell) if cell.is_finite() && cell > 0.0 => Position::new(
            (position.x / cell).round() * cell,
            (position.y / cell).round() * cell,
        ),
        _ => position,
    }
}

/// Keep at least `margin` px of the rect inside the viewport on each axis.
/// The top edge never goes above the viewport so the display stays grabbable.
pub fn clamp_to_viewport(rect: Rect, viewport: ViewportBounds, margin: f64) -> Position {
    let margin_x = margin.min(rect.width).max(0.0);
    let margin_y = margin.min(rect.height).max(0.0);

    let min_x = margin_x - rect.width;
    let max_x = (viewport.width - margin_x).max(min_x);
    let max_y = (viewport.height - margin_y).max(0.0);

    Position::new(rect.x.clamp(min_x, max_x), rect.y.clamp(0.0, max_y)).sanitized()
}

fn collides(rect: &Rect, others: &[Rect], gap: f64) -> bool {
    others.iter().any(|o| rect.intersects(&o.inflate(gap)))
}

/// Resolve a drag candidate against the other displays.
///
/// Returns the candidate itself when it is free, otherwise the nearest
/// edge-adjacent placement next to one of the colliding boxes that collides
/// with nothing (after viewport clamping). `None` when no such spot exists.
pub fn avoid_collisions(
    candidate: Rect,
    others: &[Rect],
    gap: f64,
    viewport: ViewportBounds,
    margin: f64,
) -> Option<Position> {
    let gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
    if !collides(&candidate, others, gap) {
        return Some(candidate.position());
    }

    let origin = candidate.position();
    others
        .iter()
        .filter(|o| candidate.intersects(&o.inflate(gap)))
        .flat_map(|o| {
            [
                Position::new(o.x - gap - candidate.width, candidate.y),
                Position::new(o.right() + gap, candidate.y),
                Position::new(candidate.x, o.y - gap - candidate.height),
                Position::new(candidate.x, o.bottom() + gap),
            ]
        })
        .map(|p| clamp_to_viewport(Rect::new(p, candidate_size(&candidate)), viewport, margin))
        .filter(|p| !collides(&Rect::new(*p, candidate_size(&candidate)), others, gap))
        .min_by(|a, b| origin.distance_to(*a).total_cmp(&origin.distance_to(*b)))
}

fn candidate_size(rect: &Rect) -> Size {
    Size::new(rect.width, rect.height)
}

/// Move the near edge of a span whose far edge is fixed.
///
/// The near edge is held inside `[lo, hi]`, then the extent is re-derived from
/// the fixed edge and bounded to `[min, max]`. Returns `(near, extent)`.
fn pull_edge(far: f64, extent: f64, lo: f64, hi: f64, min: f64, max: f64) -> (f64, f64) {
    let near = (far - extent).max(lo).min(hi.max(lo));
    let extent = (far - near).max(min).min(max.max(min));
    (far - extent, extent)
}

/// Apply a pointer delta to `start` through `handle`.
///
/// Edges not named by the handle stay put. For west/north grips the opposite
/// edge stays fixed: the moving edge is held inside the viewport first and the
/// size follows from it, so neither the viewport nor the size bounds can slide
/// the fixed edge.
pub fn resize_rect(
    start: Rect,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    bounds: &SizeBounds,
    viewport: ViewportBounds,
    margin: f64,
) -> Rect {
    let mut width = start.width;
    let mut height = start.height;
    if handle.moves_east() {
        width += dx;
    }
    if handle.moves_south() {
        height += dy;
    }
    let size = bounds.clamp(Size::new(width, height));
    let (mut x, mut y) = (start.x, start.y);
    let (mut width, mut height) = (size.width, size.height);

    if handle.moves_west() {
        let max_x = viewport.width - margin.min(bounds.min.width).max(0.0);
        (x, width) = pull_edge(
            start.right(),
            start.width - dx,
            f64::NEG_INFINITY,
            max_x,
            bounds.min.width,
            bounds.max.width,
        );
    }
    if handle.moves_north() {
        let max_y = viewport.height - margin.min(bounds.min.height).max(0.0);
        (y, height) =
            pull_edge(start.bottom(), start.height - dy, 0.0, max_y, bounds.min.height, bounds.max.height);
    }
    Rect::new(Position::new(x, y), Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(Position::new(x, y), Size::new(w, h))
    }

    fn vp() -> ViewportBounds {
        ViewportBounds::new(1920.0, 1080.0)
    }

    #[test]
    fn snap_rounds_to_nearest_cell() {
        let snapped = snap_to_grid(Position::new(27.0, 33.0), Some(20.0));
        assert_eq!(snapped, Position::new(20.0, 40.0));
        assert_eq!(snap_to_grid(Position::new(7.0, 3.0), None), Position::new(7.0, 3.0));
    }

    #[test]
    fn west_resize_keeps_right_edge() {
        let start = rect(100.0, 100.0, 220.0, 120.0);
        let resized = resize_rect(start, ResizeHandle::W, -30.0, 0.0, &SizeBounds::default(), vp(), 40.0);
        assert_eq!(resized.width, 250.0);
        assert_eq!(resized.right(), start.right());
    }

    #[test]
    fn north_resize_at_minimum_does_not_slide() {
        let start = rect(100.0, 100.0, 220.0, 120.0);
        let resized = resize_rect(start, ResizeHandle::Nw, 500.0, 500.0, &SizeBounds::default(), vp(), 40.0);
        assert_eq!(resized.bottom(), start.bottom());
        assert_eq!(resized.right(), start.right());
        assert_eq!(resized.height, SizeBounds::default().min.height);
    }

    #[test]
    fn north_edge_stops_at_viewport_top() {
        let start = rect(100.0, 10.0, 220.0, 120.0);
        let resized = resize_rect(start, ResizeHandle::Ne, 30.0, -50.0, &SizeBounds::default(), vp(), 40.0);
        assert_eq!(resized.y, 0.0);
        assert_eq!(resized.height, 130.0);
        assert_eq!(resized.bottom(), start.bottom());
        assert_eq!(resized.width, 250.0);
    }

    #[test]
    fn west_edge_shrinking_near_right_border_keeps_right_edge() {
        let start = rect(1700.0, 100.0, 220.0, 120.0);
        let bounds = SizeBounds::default();
        let resized = resize_rect(start, ResizeHandle::W, 400.0, 0.0, &bounds, vp(), 40.0);
        assert_eq!(resized.right(), start.right());
        assert!(resized.x <= 1920.0 - 40.0f64.min(bounds.min.width));
    }

    #[test]
    fn collision_picks_nearest_free_edge() {
        let other = rect(200.0, 100.0, 100.0, 100.0);
        let candidate = rect(190.0, 110.0, 50.0, 50.0);
        let resolved =
            avoid_collisions(candidate, &[other], 0.0, ViewportBounds::default(), 40.0).unwrap();
        assert_eq!(resolved, Position::new(150.0, 110.0));
    }

    #[test]
    fn clamp_keeps_margin_visible() {
        let off = rect(5000.0, -300.0, 220.0, 120.0);
        let p = clamp_to_viewport(off, ViewportBounds::new(1000.0, 800.0), 40.0);
        assert_eq!(p, Position::new(960.0, 0.0));
    }
}

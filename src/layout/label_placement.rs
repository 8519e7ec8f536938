// Obstacle-aware anchoring for a single label. Pure geometry: the label is
// an axis-aligned box of known size, the obstacle is reduced to its bounding
// box, and regions are either boxes (bars, legend cells) or annular sectors.

use super::{
    Anchor, AnnularSector, AxisAlignedBox, Obstacle, Placement, PlacementCandidate,
    PlacementStrategy, Point, Rect, Region, polar_to_cartesian,
};
use crate::config::{BoxAnchor, MAX_ANGULAR_STEPS, MAX_RADIUS_STEPS, PlacementConfig};
use std::f32::consts::PI;

const COST_EPS: f32 = 1e-6;
const RADIUS_DEDUP_EPS: f32 = 1e-3;
const CONTAIN_EPS: f32 = 1e-3;

/// Resolve the position of a label of `label_size` (width, height) near
/// `preferred`, avoiding `obstacle`.
pub fn place(
    preferred: Anchor,
    label_size: (f32, f32),
    obstacle: Option<&Obstacle>,
    region: &Region,
    cfg: &PlacementConfig,
) -> Placement {
    match region {
        Region::Sector(sector) => place_polar(preferred, label_size, obstacle, sector, cfg),
        Region::Box(bounds) => {
            place_in_box(preferred.to_point(), label_size, obstacle, bounds, cfg)
        }
    }
}

/// Polar search around the preferred (angle, radius), falling back to
/// pushing the label straight away from the obstacle.
pub fn place_polar(
    preferred: Anchor,
    label_size: (f32, f32),
    obstacle: Option<&Obstacle>,
    sector: &AnnularSector,
    cfg: &PlacementConfig,
) -> Placement {
    let origin = sector.origin();
    let (pref_angle, pref_radius) = match preferred {
        Anchor::Polar {
            origin: anchor_origin,
            angle,
            radius,
        } if anchor_origin == origin => (angle, radius),
        other => polar_of(other.to_point(), origin),
    };
    let anchor = polar_to_cartesian(origin, pref_angle, pref_radius);
    let at_anchor = Placement {
        candidate: PlacementCandidate {
            x: anchor.x,
            y: anchor.y,
            deviation_cost: 0.0,
        },
        strategy: PlacementStrategy::Preferred,
        inside_region: sector.contains(anchor),
    };

    let Some(obstacle) = active_obstacle(obstacle) else {
        return at_anchor;
    };
    if is_zero_area(label_size) {
        return at_anchor;
    }
    let obstacle_rect = inflate_rect(obstacle.bounds(), cfg.obstacle_padding);
    if overlap_area(&label_rect(anchor, label_size), &obstacle_rect) <= 0.0 {
        return at_anchor;
    }

    let step = cfg.angular_step_deg.to_radians();
    let radii = candidate_radii(pref_radius, sector, cfg.radius_steps.min(MAX_RADIUS_STEPS));
    let mut best: Option<PlacementCandidate> = None;
    for offset in angular_offsets(cfg.angular_steps.min(MAX_ANGULAR_STEPS)) {
        let delta = offset as f32 * step;
        for &radius in &radii {
            let center = polar_to_cartesian(origin, pref_angle + delta, radius);
            if overlap_area(&label_rect(center, label_size), &obstacle_rect) > 0.0 {
                continue;
            }
            let cost = deviation_cost(delta, radius, pref_radius, cfg.radius_weight);
            if best.is_none_or(|b| cost + COST_EPS < b.deviation_cost) {
                best = Some(PlacementCandidate {
                    x: center.x,
                    y: center.y,
                    deviation_cost: cost,
                });
            }
        }
    }

    if let Some(candidate) = best {
        return Placement {
            candidate,
            strategy: PlacementStrategy::Searched,
            inside_region: sector.contains(Point::new(candidate.x, candidate.y)),
        };
    }

    tracing::debug!(
        angle = pref_angle,
        radius = pref_radius,
        "no clear candidate in polar search, pushing label out"
    );
    let pushed = push_out(anchor, pref_angle, label_size, obstacle, cfg.obstacle_padding);
    let (angle, radius) = polar_of(pushed, origin);
    Placement {
        candidate: PlacementCandidate {
            x: pushed.x,
            y: pushed.y,
            deviation_cost: deviation_cost(
                normalize_angle(angle - pref_angle),
                radius,
                pref_radius,
                cfg.radius_weight,
            ),
        },
        strategy: PlacementStrategy::PushOut,
        inside_region: sector.contains(pushed),
    }
}

/// Ordered candidate positions for box regions. Inside positions must fit
/// the box; every position must clear the obstacle. When nothing qualifies
/// the last position of the order is used.
pub fn place_in_box(
    preferred: Point,
    label_size: (f32, f32),
    obstacle: Option<&Obstacle>,
    bounds: &AxisAlignedBox,
    cfg: &PlacementConfig,
) -> Placement {
    let region_rect = bounds.rect();
    let diag = half_diagonal(label_size) * 2.0;
    let cost_of = |p: Point| distance(p, preferred) / diag.max(1.0);

    let obstacle = active_obstacle(obstacle);
    if obstacle.is_none() || is_zero_area(label_size) {
        return Placement {
            candidate: PlacementCandidate {
                x: preferred.x,
                y: preferred.y,
                deviation_cost: 0.0,
            },
            strategy: PlacementStrategy::Preferred,
            inside_region: contains_rect(&region_rect, &label_rect(preferred, label_size)),
        };
    }
    let obstacle_rect = obstacle.map(|o| inflate_rect(o.bounds(), cfg.obstacle_padding));

    for &which in &cfg.box_order {
        let center = box_anchor_point(which, bounds, label_size, cfg.box_gap);
        let rect = label_rect(center, label_size);
        if which.is_inside() && !contains_rect(&region_rect, &rect) {
            continue;
        }
        if obstacle_rect.is_some_and(|o| overlap_area(&rect, &o) > 0.0) {
            continue;
        }
        return Placement {
            candidate: PlacementCandidate {
                x: center.x,
                y: center.y,
                deviation_cost: cost_of(center),
            },
            strategy: PlacementStrategy::Searched,
            inside_region: which.is_inside(),
        };
    }

    let last = cfg.box_order.last().copied().unwrap_or(BoxAnchor::Below);
    tracing::debug!(?last, "no clear box position, drawing at last candidate");
    let center = box_anchor_point(last, bounds, label_size, cfg.box_gap);
    Placement {
        candidate: PlacementCandidate {
            x: center.x,
            y: center.y,
            deviation_cost: cost_of(center),
        },
        strategy: PlacementStrategy::Outside,
        inside_region: last.is_inside()
            && contains_rect(&region_rect, &label_rect(center, label_size)),
    }
}

/// Label center for a box candidate.
pub fn box_anchor_point(
    which: BoxAnchor,
    bounds: &AxisAlignedBox,
    label_size: (f32, f32),
    gap: f32,
) -> Point {
    let (w, h) = label_size;
    let cx = bounds.x + bounds.width / 2.0;
    let cy = bounds.y + bounds.height / 2.0;
    match which {
        BoxAnchor::Start => Point::new(bounds.x + gap + w / 2.0, cy),
        BoxAnchor::End => Point::new(bounds.x + bounds.width - gap - w / 2.0, cy),
        BoxAnchor::Center => Point::new(cx, cy),
        BoxAnchor::Above => Point::new(cx, bounds.y - gap - h / 2.0),
        BoxAnchor::Below => Point::new(cx, bounds.y + bounds.height + gap + h / 2.0),
    }
}

/// `|Δθ| + weight · |r − r₀| / r₀`; the radial term is absolute when r₀ is 0.
pub fn deviation_cost(angular_offset: f32, radius: f32, preferred_radius: f32, weight: f32) -> f32 {
    let radial = if preferred_radius > COST_EPS {
        (radius - preferred_radius).abs() / preferred_radius
    } else {
        (radius - preferred_radius).abs()
    };
    angular_offset.abs() + weight * radial
}

/// Offsets in step units, nearest first: 0, +1, −1, +2, −2, …
fn angular_offsets(steps: usize) -> Vec<i32> {
    let steps = steps.min(MAX_ANGULAR_STEPS) as i32;
    std::iter::once(0)
        .chain((1..=steps).flat_map(|k| [k, -k]))
        .collect()
}

/// The preferred radius, then `steps` radii spread evenly through the band
/// (never on its edges), nearest to the preferred radius first.
fn candidate_radii(preferred: f32, sector: &AnnularSector, steps: usize) -> Vec<f32> {
    let inner = sector.inner_radius.max(0.0);
    let outer = sector.outer_radius.max(inner);
    let mut radii = vec![preferred];
    for k in 0..steps {
        let r = inner + (outer - inner) * (k + 1) as f32 / (steps + 1) as f32;
        if radii.iter().all(|existing| (existing - r).abs() > RADIUS_DEDUP_EPS) {
            radii.push(r);
        }
    }
    radii[1..].sort_by(|a, b| (a - preferred).abs().total_cmp(&(b - preferred).abs()));
    radii
}

fn push_out(
    anchor: Point,
    preferred_angle: f32,
    label_size: (f32, f32),
    obstacle: &Obstacle,
    padding: f32,
) -> Point {
    let center = obstacle.center();
    let dx = anchor.x - center.x;
    let dy = anchor.y - center.y;
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len > COST_EPS {
        (dx / len, dy / len)
    } else {
        // same direction convention as polar_to_cartesian
        (preferred_angle.sin(), -preferred_angle.cos())
    };
    let dist = obstacle.effective_radius() + padding.max(0.0) + half_diagonal(label_size);
    Point::new(center.x + ux * dist, center.y + uy * dist)
}

/// Inverse of [`polar_to_cartesian`].
pub fn polar_of(point: Point, origin: Point) -> (f32, f32) {
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    (dx.atan2(-dy), (dx * dx + dy * dy).sqrt())
}

fn normalize_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped.is_finite() { wrapped } else { 0.0 }
}

fn active_obstacle(obstacle: Option<&Obstacle>) -> Option<&Obstacle> {
    match obstacle {
        Some(o) if o.is_degenerate() => {
            tracing::debug!(obstacle = ?o, "ignoring degenerate obstacle");
            None
        }
        other => other,
    }
}

fn is_zero_area(size: (f32, f32)) -> bool {
    !(size.0 > 0.0 && size.1 > 0.0)
}

fn half_diagonal(size: (f32, f32)) -> f32 {
    (size.0 * size.0 + size.1 * size.1).sqrt() / 2.0
}

fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

pub(crate) fn label_rect(center: Point, size: (f32, f32)) -> Rect {
    (
        center.x - size.0 / 2.0,
        center.y - size.1 / 2.0,
        size.0,
        size.1,
    )
}

pub(crate) fn overlap_area(a: &Rect, b: &Rect) -> f32 {
    let x0 = a.0.max(b.0);
    let y0 = a.1.max(b.1);
    let x1 = (a.0 + a.2).min(b.0 + b.2);
    let y1 = (a.1 + a.3).min(b.1 + b.3);
    let w = (x1 - x0).max(0.0);
    let h = (y1 - y0).max(0.0);
    w * h
}

fn inflate_rect(rect: Rect, pad: f32) -> Rect {
    if pad <= 0.0 {
        return rect;
    }
    (
        rect.0 - pad,
        rect.1 - pad,
        rect.2 + pad * 2.0,
        rect.3 + pad * 2.0,
    )
}

fn contains_rect(outer: &Rect, inner: &Rect) -> bool {
    inner.0 >= outer.0 - CONTAIN_EPS
        && inner.1 >= outer.1 - CONTAIN_EPS
        && inner.0 + inner.2 <= outer.0 + outer.2 + CONTAIN_EPS
        && inner.1 + inner.3 <= outer.1 + outer.3 + CONTAIN_EPS
}

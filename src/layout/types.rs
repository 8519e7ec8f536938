use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Axis-aligned rectangle as `(x, y, width, height)`.
pub type Rect = (f32, f32, f32, f32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f32,
    pub weight: u16,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size_px: f32, weight: u16) -> Self {
        Self {
            family: family.into(),
            size_px,
            weight,
        }
    }

    /// Same family and weight at another size.
    pub fn with_size(&self, size_px: f32) -> Self {
        Self {
            family: self.family.clone(),
            size_px,
            weight: self.weight,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("sans-serif", 16.0, 400)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextMeasurement {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Cartesian position of `(angle, radius)` around `origin`.
///
/// Angles are radians clockwise from 12 o'clock with y growing downwards,
/// which is how pie and donut slices are laid out.
pub fn polar_to_cartesian(origin: Point, angle: f32, radius: f32) -> Point {
    Point::new(
        origin.x + radius * angle.sin(),
        origin.y - radius * angle.cos(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Anchor {
    Point(Point),
    Polar { origin: Point, angle: f32, radius: f32 },
}

impl Anchor {
    pub fn to_point(&self) -> Point {
        match *self {
            Anchor::Point(point) => point,
            Anchor::Polar {
                origin,
                angle,
                radius,
            } => polar_to_cartesian(origin, angle, radius),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAlignedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl AxisAlignedBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn rect(&self) -> Rect {
        (self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnularSector {
    pub cx: f32,
    pub cy: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

impl AnnularSector {
    pub fn origin(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn span(&self) -> f32 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn mid_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    /// Whether `point` lies within the band and between the start and end
    /// angles (clockwise from 12 o'clock).
    pub fn contains(&self, point: Point) -> bool {
        let dx = point.x - self.cx;
        let dy = point.y - self.cy;
        let radius = (dx * dx + dy * dy).sqrt();
        if !(radius >= self.inner_radius && radius <= self.outer_radius) {
            return false;
        }
        if self.span() >= 2.0 * PI {
            return true;
        }
        let from_start = (dx.atan2(-dy) - self.start_angle).rem_euclid(2.0 * PI);
        from_start <= self.span()
    }

    fn is_valid(&self) -> bool {
        [
            self.cx,
            self.cy,
            self.inner_radius,
            self.outer_radius,
            self.start_angle,
            self.end_angle,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.inner_radius >= 0.0
            && self.outer_radius > self.inner_radius
            && self.span() > 0.0
    }
}

/// The area a label is fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Box(AxisAlignedBox),
    Sector(AnnularSector),
}

impl Region {
    pub fn is_valid(&self) -> bool {
        match self {
            Region::Box(b) => b.is_valid(),
            Region::Sector(s) => s.is_valid(),
        }
    }

    pub fn max_width(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }
        match self {
            Region::Box(b) => b.width,
            Region::Sector(s) => {
                let r_mid = s.mid_radius();
                if s.span() >= PI {
                    2.0 * r_mid
                } else {
                    2.0 * r_mid * (s.span() / 2.0).sin()
                }
            }
        }
    }

    pub fn max_height(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }
        match self {
            Region::Box(b) => b.height,
            Region::Sector(s) => s.outer_radius - s.inner_radius,
        }
    }

    pub fn preferred_anchor(&self) -> Anchor {
        match self {
            Region::Box(b) => Anchor::Point(Point::new(b.x + b.width / 2.0, b.y + b.height / 2.0)),
            Region::Sector(s) => Anchor::Polar {
                origin: s.origin(),
                angle: s.mid_angle(),
                radius: s.mid_radius(),
            },
        }
    }
}

/// Something a placed label must not cover, usually an icon or marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    Circle { cx: f32, cy: f32, r: f32 },
    Box { x: f32, y: f32, w: f32, h: f32 },
}

impl Obstacle {
    pub fn center(&self) -> Point {
        match *self {
            Obstacle::Circle { cx, cy, .. } => Point::new(cx, cy),
            Obstacle::Box { x, y, w, h } => Point::new(x + w / 2.0, y + h / 2.0),
        }
    }

    /// Radius of the smallest circle around [`Obstacle::center`] covering the shape.
    pub fn effective_radius(&self) -> f32 {
        match *self {
            Obstacle::Circle { r, .. } => r,
            Obstacle::Box { w, h, .. } => (w * w + h * h).sqrt() / 2.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            Obstacle::Circle { cx, cy, r } => (cx - r, cy - r, r * 2.0, r * 2.0),
            Obstacle::Box { x, y, w, h } => (x, y, w, h),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match *self {
            Obstacle::Circle { cx, cy, r } => {
                !(cx.is_finite() && cy.is_finite() && r.is_finite()) || r <= 0.0
            }
            Obstacle::Box { x, y, w, h } => {
                !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite())
                    || w <= 0.0
                    || h <= 0.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementCandidate {
    pub x: f32,
    pub y: f32,
    pub deviation_cost: f32,
}

/// Which path of the placer produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStrategy {
    /// Preferred anchor used as-is, no search needed.
    Preferred,
    /// An obstacle-free candidate from the bounded search.
    Searched,
    /// Polar search exhausted; label pushed away from the obstacle.
    PushOut,
    /// Box search exhausted; label drawn at the last outside position.
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub candidate: PlacementCandidate,
    pub strategy: PlacementStrategy,
    /// False when the label ended up outside its region (box mode), which
    /// means it sits on the chart background rather than the region fill.
    pub inside_region: bool,
}

/// Everything a renderer needs to emit one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResult {
    pub lines: Vec<String>,
    pub font_size_px: f32,
    /// Center of the text block.
    pub x: f32,
    pub y: f32,
    /// False means the label must not be drawn.
    pub fits: bool,
    pub width: f32,
    pub height: f32,
    pub line_height: f32,
    pub strategy: PlacementStrategy,
    pub inside_region: bool,
}

impl LabelResult {
    /// Baseline-independent center y of every line, top to bottom.
    pub fn line_positions(&self) -> Vec<f32> {
        super::text::line_offsets(self.lines.len(), self.line_height)
            .into_iter()
            .map(|offset| self.y + offset)
            .collect()
    }
}

/// One label to lay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRequest {
    pub text: String,
    pub region: Region,
    #[serde(default)]
    pub obstacle: Option<Obstacle>,
}

impl LabelRequest {
    pub fn new(text: impl Into<String>, region: Region) -> Self {
        Self {
            text: text.into(),
            region,
            obstacle: None,
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacle = Some(obstacle);
        self
    }
}

// File: crates/chart-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math (points, rects, polyline length/trim).

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pt {
    pub x: f32,
    pub y: f32,
}

impl Pt {
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }

    pub fn distance(self, other: Pt) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn lerp(self, other: Pt, t: f32) -> Pt {
        Pt::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

impl From<(f32, f32)> for Pt {
    fn from((x, y): (f32, f32)) -> Self { Pt::new(x, y) }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Total arc length of a polyline.
pub fn polyline_length(points: &[Pt]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Leading part of a polyline covering `fraction` of its arc length.
/// `fraction` is clamped to [0, 1]; 0 yields an empty path.
pub fn trim_polyline(points: &[Pt], fraction: f32) -> Vec<Pt> {
    let fraction = clamp(fraction, 0.0, 1.0);
    if points.len() < 2 || fraction >= 1.0 {
        return points.to_vec();
    }
    if fraction <= 0.0 {
        return Vec::new();
    }
    let mut remaining = polyline_length(points) * fraction;
    let mut out = vec![points[0]];
    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if seg >= remaining {
            let t = if seg > 0.0 { remaining / seg } else { 0.0 };
            out.push(w[0].lerp(w[1], t));
            break;
        }
        remaining -= seg;
        out.push(w[1]);
    }
    out
}

/// Axis-aligned bounds of a point set.
pub fn bounds(points: &[Pt]) -> Option<RectF> {
    let first = points.first()?;
    let mut r = RectF::from_ltrb(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        r.left = r.left.min(p.x);
        r.right = r.right.max(p.x);
        r.top = r.top.min(p.y);
        r.bottom = r.bottom.max(p.y);
    }
    Some(r)
}

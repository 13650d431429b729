//! Basic rounded types shared by the arrangement and the face search.
//!
//! - `Precision`: decimal digits for coordinates and line parameters.
//! - `Point`: rounded `(x, y)`; equality, hashing and ordering by exact value.
//! - `Line`: one of the three triangle sides or a rounded `(slope, intercept)`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use nalgebra::Vector2;

/// Number of decimal digits kept when rounding coordinates and line parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(pub u32);

impl Precision {
    /// First attempt.
    pub const DEFAULT: Precision = Precision(8);
    /// Rerun after a retryable failure at `DEFAULT`.
    pub const FALLBACK: Precision = Precision(10);
    /// Used to split nodes where unrelated lines collided after rounding.
    pub const FINE: Precision = Precision(15);

    #[inline]
    pub fn digits(self) -> usize {
        self.0 as usize
    }

    /// Round to `self` decimal digits and normalize `-0.0` to `0.0`.
    ///
    /// Goes through the decimal representation so that ties and
    /// representation error round exactly as the printed value does.
    pub fn round(self, v: f64) -> f64 {
        if !v.is_finite() {
            return v;
        }
        let text = format!("{:.*}", self.digits(), v);
        text.parse::<f64>().map_or(v, |r| r + 0.0)
    }

    /// Slack on `x + y = 1` accepted for points on the hypotenuse.
    #[inline]
    pub fn margin(self) -> f64 {
        2.0 * 10f64.powi(-(self.0 as i32))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A node position inside the cost triangle.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };
    pub const TOP: Point = Point { x: 0.0, y: 1.0 };
    pub const RIGHT: Point = Point { x: 1.0, y: 0.0 };

    /// Construct without rounding; `-0.0` is still normalized.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x + 0.0,
            y: y + 0.0,
        }
    }

    #[inline]
    pub fn rounded(x: f64, y: f64, precision: Precision) -> Self {
        Self::new(precision.round(x), precision.round(y))
    }

    #[inline]
    pub fn vec(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    #[inline]
    pub fn from_vec(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Inside the closed unit square (the triangle test adds `x + y <= 1`).
    #[inline]
    pub fn in_unit_square(self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A line of the arrangement.
///
/// Invariant: `Cost` parameters are already rounded; two cost lines are the
/// same line iff both parameters are bitwise equal.
#[derive(Clone, Copy, Debug)]
pub enum Line {
    /// `y = slope * x + intercept`, where two predictors cost the same.
    Cost { slope: f64, intercept: f64 },
    /// `x + y = 1`
    Hypotenuse,
    /// `y = 0`
    XAxis,
    /// `x = 0`
    YAxis,
}

impl Line {
    /// Rounded cost line.
    pub fn cost(slope: f64, intercept: f64, precision: Precision) -> Self {
        Line::Cost {
            slope: precision.round(slope),
            intercept: precision.round(intercept),
        }
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        !matches!(self, Line::Cost { .. })
    }

    /// `(slope, intercept)` of a cost line.
    #[inline]
    pub fn params(&self) -> Option<(f64, f64)> {
        match *self {
            Line::Cost { slope, intercept } => Some((slope, intercept)),
            _ => None,
        }
    }

    /// Cost lines that coincide with the x axis or the hypotenuse add nothing.
    pub fn duplicates_boundary(&self) -> bool {
        matches!(self.params(), Some((s, b)) if (s == 0.0 && b == 0.0) || (s == -1.0 && b == 1.0))
    }

    fn rank(&self) -> u8 {
        match self {
            Line::Cost { .. } => 0,
            Line::Hypotenuse => 1,
            Line::XAxis => 2,
            Line::YAxis => 3,
        }
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Line {}

impl PartialOrd for Line {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Line {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.params(), other.params()) {
            (Some((s1, b1)), Some((s2, b2))) => s1.total_cmp(&s2).then_with(|| b1.total_cmp(&b2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Line {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        if let Some((s, b)) = self.params() {
            s.to_bits().hash(state);
            b.to_bits().hash(state);
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Cost { slope, intercept } => write!(f, "({slope}, {intercept})"),
            Line::Hypotenuse => f.write_str("hypotenuse"),
            Line::XAxis => f.write_str("x_axis"),
            Line::YAxis => f.write_str("y_axis"),
        }
    }
}

use crate::MIN_FLATNESS;
use std::{
    fmt,
    ops::{Add, Mul, Sub},
};

pub type Scalar = f64;
pub const EPSILON: f64 = f64::EPSILON;
pub const PI: f64 = std::f64::consts::PI;

/// Upper bound on the number of lines a single arc is flattened into
pub const MAX_ARC_LINES: usize = 1 << 16;

/// Format floats in a compact way suitable for SVG path
///
/// Integers are written without fractional part, everything else is rounded to
/// three decimal digits which is plenty for pixel coordinates.
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value = (value * 1000.0).round() / 1000.0;
    if value.fract().abs() < EPSILON {
        write!(f, "{}", value.trunc() as i64)
    } else {
        let mut buffer = [0u8; lexical_core::BUFFER_SIZE];
        let bytes = lexical_core::write(value, &mut buffer);
        f.write_str(std::str::from_utf8(bytes).map_err(|_| fmt::Error)?)
    }
}

/// Value representing a 2D point or vector.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)?;
        Ok(())
    }
}

impl Point {
    #[inline]
    pub fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` compenent of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Determine if self is close to the other within the marging of error (EPSILON)
    pub fn is_close_to(self, other: Point) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() < EPSILON && (y0 - y1).abs() < EPSILON
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Self::Output {
        let Point([x, y]) = other;
        Point([self * x, self * y])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 - x1, y0 - y1])
    }
}

/// Straight line segment
#[derive(Clone, Copy, PartialEq)]
pub struct Line(pub [Point; 2]);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Line([p0, p1]) = self;
        write!(f, "Line {:?} {:?}", p0, p1)
    }
}

impl Line {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    pub fn start(&self) -> Point {
        self.0[0]
    }

    pub fn end(&self) -> Point {
        self.0[1]
    }

    /// Point on the line at parameter `t` in `[0, 1]`
    pub fn at(&self, t: Scalar) -> Point {
        let Self([p0, p1]) = self;
        (1.0 - t) * *p0 + t * *p1
    }

    pub fn length(&self) -> Scalar {
        let Self([p0, p1]) = self;
        p0.dist(*p1)
    }

    pub fn reverse(&self) -> Self {
        let Self([p0, p1]) = self;
        Self([*p1, *p0])
    }
}

/// Circular arc
///
/// Angles are in radians and grow from the positive `x` axis towards the
/// positive `y` axis, which is clockwise on screen since `y` points down.
#[derive(Clone, Copy, PartialEq)]
pub struct Arc {
    center: Point,
    radius: Scalar,
    /// angle of the starting point
    start: Scalar,
    /// signed angular size
    sweep: Scalar,
}

impl fmt::Debug for Arc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arc center:{:?} radius:{:.3?} start:{:.3?} sweep:{:.3?}",
            self.center, self.radius, self.start, self.sweep
        )
    }
}

impl Arc {
    pub fn new(center: impl Into<Point>, radius: Scalar, start: Scalar, sweep: Scalar) -> Self {
        Self {
            center: center.into(),
            radius: radius.abs(),
            start,
            sweep,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> Scalar {
        self.radius
    }

    pub fn sweep(&self) -> Scalar {
        self.sweep
    }

    /// Point on the arc at parameter `t` in `[0, 1]`
    pub fn at(&self, t: Scalar) -> Point {
        let (angle_sin, angle_cos) = (self.start + t * self.sweep).sin_cos();
        self.center + Point([self.radius * angle_cos, self.radius * angle_sin])
    }

    pub fn start(&self) -> Point {
        self.at(0.0)
    }

    pub fn end(&self) -> Point {
        self.at(1.0)
    }

    pub fn reverse(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start: self.start + self.sweep,
            sweep: -self.sweep,
        }
    }

    /// Number of lines needed so that no chord deviates from the arc by more than `flatness`
    ///
    /// Flatness is raised to `MIN_FLATNESS`, and the count never exceeds `MAX_ARC_LINES`.
    pub fn flatten_count(&self, flatness: Scalar) -> usize {
        let flatness = if flatness >= MIN_FLATNESS {
            flatness
        } else {
            MIN_FLATNESS
        };
        let max_step = PI / 2.0;
        let step = if flatness >= self.radius {
            max_step
        } else {
            (2.0 * (1.0 - flatness / self.radius).acos()).min(max_step)
        };
        let count = (self.sweep.abs() / step).ceil();
        if count.is_nan() || count < 1.0 {
            1
        } else {
            count.min(MAX_ARC_LINES as Scalar) as usize
        }
    }

    /// Approximate arc with a sequence of lines
    pub fn flatten(&self, flatness: Scalar) -> ArcFlattenIter {
        ArcFlattenIter {
            arc: *self,
            index: 0,
            count: self.flatten_count(flatness),
            last: self.start(),
        }
    }
}

pub struct ArcFlattenIter {
    arc: Arc,
    index: usize,
    count: usize,
    last: Point,
}

impl Iterator for ArcFlattenIter {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        self.index += 1;
        let point = self.arc.at(self.index as Scalar / self.count as Scalar);
        let line = Line([self.last, point]);
        self.last = point;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.count - self.index;
        (size, Some(size))
    }
}

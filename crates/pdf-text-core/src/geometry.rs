//! Affine matrices, points, and axis-aligned boxes in page coordinate space.

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An affine transform: `[a, b, c, d, e, f]` corresponding to
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
/// Point transformation: `(x', y') = (a*x + c*y + e, b*x + d*y + f)`.
/// Composition is left-multiplication of the 3x3 forms; identity is
/// `[1, 0, 0, 1, 0, 0]`, a two-sided neutral element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    /// Create a new matrix with the given values.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Identity matrix (no transformation).
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Transform a point through this matrix.
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Concatenate this matrix with another: `self × other`.
    ///
    /// Matches the content-stream convention for `cm`: the new CTM is
    /// `thisMatrix × priorCtm`, so `a.concat(&b)` reads as "apply `a`,
    /// then `b`".
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }
}

/// Axis-aligned bounding box `[xMin, yMin, xMax, yMax]` in the coordinate
/// frame noted by its caller (text space, or default user space once
/// transformed).
///
/// Invariant: `xMin <= xMax && yMin <= yMax` after [`Box::normalized`];
/// degenerate zero-width/zero-height boxes are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Box {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Reorder corners so that `x_min <= x_max` and `y_min <= y_max`.
    pub fn normalized(&self) -> Box {
        Box {
            x_min: self.x_min.min(self.x_max),
            y_min: self.y_min.min(self.y_max),
            x_max: self.x_min.max(self.x_max),
            y_max: self.y_min.max(self.y_max),
        }
    }

    /// Axis-aligned box spanning a set of points.
    ///
    /// Panics if `points` is empty; callers always pass the four corners of
    /// a local box.
    pub fn bounding(points: &[Point]) -> Box {
        let mut x_min = f64::INFINITY;
        let mut y_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in points {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }
        Box {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Compute the union of two boxes.
    pub fn union(&self, other: &Box) -> Box {
        Box {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

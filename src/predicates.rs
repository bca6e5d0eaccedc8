//! Robust geometric predicates.
//!
//! All sign-sensitive tests go through the `robust` crate's adaptive-precision
//! arithmetic rather than plain `f64` arithmetic, so that degenerate and
//! near-degenerate configurations (collinear triples, cocircular quadruples)
//! get a trustworthy answer instead of a coin flip from rounding error.

use robust::{incircle as robust_incircle, orient2d as robust_orient2d, Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    fn of(v: f64) -> Sign {
        if v > 0.0 {
            Sign::Positive
        } else if v < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Sign::Positive)
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }
}

/// Orientation of `c` relative to the directed line `a -> b`.
///
/// Positive: `c` is to the left (the triple is CCW).
/// Negative: `c` is to the right (the triple is CW).
/// Zero: the three points are collinear.
pub fn orient2d(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Sign {
    let pa = Coord { x: a.0, y: a.1 };
    let pb = Coord { x: b.0, y: b.1 };
    let pc = Coord { x: c.0, y: c.1 };
    Sign::of(robust_orient2d(pa, pb, pc))
}

/// Whether `d` lies inside the circumcircle of the CCW triangle `(a, b, c)`.
///
/// Positive: `d` is strictly inside.
/// Negative: `d` is strictly outside.
/// Zero: the four points are cocircular.
///
/// Callers must never pass the symbolic infinite vertex here -- edges
/// adjacent to it are never flip candidates, so the in-circle predicate is
/// simply never evaluated for them (see `mesh::MeshStore::legalize`).
pub fn incircle(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> Sign {
    let pa = Coord { x: a.0, y: a.1 };
    let pb = Coord { x: b.0, y: b.1 };
    let pc = Coord { x: c.0, y: c.1 };
    let pd = Coord { x: d.0, y: d.1 };
    Sign::of(robust_incircle(pa, pb, pc, pd))
}

//! Point location: stochastic jump-and-walk over the triangle arena.

use crate::mesh::{MeshStore, INFINITE_VERTEX};
use crate::predicates::{orient2d, Sign};
use rand::seq::SliceRandom;
use rand::thread_rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Vertex(usize),
    Edge(usize, usize),
    Triangle(usize),
    /// Outside the convex hull; carries the ghost triangle whose real edge is
    /// the nearest hull boundary.
    Outside(usize),
}

impl MeshStore {
    fn finite_triangle_indices(&self) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alive && !t.is_ghost())
            .map(|(i, _)| i)
            .collect()
    }

    fn centroid(&self, t: usize) -> (f64, f64) {
        let v = self.triangles[t].v;
        let (x0, y0) = self.xy(v[0]);
        let (x1, y1) = self.xy(v[1]);
        let (x2, y2) = self.xy(v[2]);
        ((x0 + x1 + x2) / 3.0, (y0 + y1 + y2) / 3.0)
    }

    fn pick_start(&self, x: f64, y: f64, jump_and_walk: bool) -> Option<usize> {
        let candidates = self.finite_triangle_indices();
        if candidates.is_empty() {
            return None;
        }
        if !jump_and_walk {
            if self.triangles.get(self.last_triangle_hint).map(|t| t.alive && !t.is_ghost()).unwrap_or(false) {
                return Some(self.last_triangle_hint);
            }
            return Some(candidates[0]);
        }
        let sample_size = (candidates.len() as f64).cbrt().ceil().max(1.0) as usize;
        let mut rng = thread_rng();
        let mut sample: Vec<usize> = candidates.clone();
        sample.shuffle(&mut rng);
        sample.truncate(sample_size.min(sample.len()));

        sample
            .into_iter()
            .min_by(|&a, &b| {
                let da = dist2(self.centroid(a), (x, y));
                let db = dist2(self.centroid(b), (x, y));
                da.partial_cmp(&db).unwrap()
            })
    }

    /// Walks from a starting finite triangle toward `(x, y)`. Returns either
    /// the finite triangle/edge/vertex containing the query, or the ghost
    /// triangle confirming the query is outside the hull.
    fn walk_from(&self, start: usize, x: f64, y: f64) -> Location {
        let mut t = start;
        loop {
            let tri = self.triangles[t];
            debug_assert!(!tri.is_ghost());
            let mut crossed = None;
            for i in 0..3 {
                let a = tri.v[i];
                let b = tri.v[(i + 1) % 3];
                if orient2d(self.xy(a), self.xy(b), (x, y)).is_negative() {
                    crossed = Some((i, tri.opp[(i + 2) % 3]));
                    break;
                }
            }
            match crossed {
                None => return self.classify_within(t, x, y),
                Some((_, next)) => {
                    if self.triangles[next].is_ghost() {
                        return Location::Outside(next);
                    }
                    t = next;
                }
            }
        }
    }

    fn classify_within(&self, t: usize, x: f64, y: f64) -> Location {
        let tri = self.triangles[t];
        const EPS: f64 = 1e-12;
        for i in 0..3 {
            let v = tri.v[i];
            let (vx, vy) = self.xy(v);
            if (vx - x).abs() < EPS && (vy - y).abs() < EPS {
                return Location::Vertex(v);
            }
        }
        for i in 0..3 {
            let a = tri.v[i];
            let b = tri.v[(i + 1) % 3];
            if orient2d(self.xy(a), self.xy(b), (x, y)) == Sign::Zero {
                return Location::Edge(a, b);
            }
        }
        Location::Triangle(t)
    }

    /// Locates `(x, y)` in the current triangulation. `jump_and_walk` toggles
    /// stochastic restarts vs. reusing the last-touched triangle as a hint.
    pub(crate) fn locate(&self, x: f64, y: f64, jump_and_walk: bool) -> Location {
        if self.is_bootstrapping() {
            for &v in &self.bootstrap {
                let (vx, vy) = self.xy(v);
                if (vx - x).abs() < 1e-12 && (vy - y).abs() < 1e-12 {
                    return Location::Vertex(v);
                }
            }
            return Location::Outside(0);
        }
        match self.pick_start(x, y, jump_and_walk) {
            Some(start) => self.walk_from(start, x, y),
            None => Location::Outside(0),
        }
    }

    /// Distance from `(x,y)` to the nearest candidate vertex implied by a
    /// location result, used for duplicate/snap detection.
    pub(crate) fn nearest_candidate(&self, loc: Location, x: f64, y: f64) -> Option<(usize, f64)> {
        let candidates: Vec<usize> = match loc {
            Location::Vertex(v) => vec![v],
            Location::Edge(a, b) => vec![a, b],
            Location::Triangle(t) => self.triangles[t].v.to_vec(),
            // `Outside(0)` is also the bootstrap-phase sentinel (no triangle
            // exists yet), in which case there is nothing to index.
            Location::Outside(g) => match self.triangles.get(g) {
                Some(tri) => tri.v.iter().copied().filter(|&v| v != INFINITE_VERTEX).collect(),
                None => Vec::new(),
            },
        };
        candidates
            .into_iter()
            .map(|v| (v, dist2(self.xy(v), (x, y)).sqrt()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
    }
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

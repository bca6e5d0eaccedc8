//! Elevation interpolation: nearest-neighbour, TIN-linear, Laplace, natural
//! neighbour (Sibson), and inverse distance weighting.

use crate::error::{DtError, DtResult};
use crate::locate::Location;
use crate::mesh::MeshStore;

#[derive(Debug, Clone, Copy)]
pub enum InterpolationMethod {
    NearestNeighbour,
    TinLinear,
    Laplace,
    Sibson,
    Idw { radius: f64, power: f64 },
}

impl MeshStore {
    pub(crate) fn interpolate(&mut self, x: f64, y: f64, method: InterpolationMethod, strict: bool) -> DtResult<f64> {
        let loc = self.locate(x, y, true);
        if matches!(loc, Location::Outside(_)) {
            if strict {
                return Err(DtError::EmptyMesh);
            }
            return Ok(f64::NAN);
        }

        let value = match method {
            InterpolationMethod::NearestNeighbour => self.interpolate_nn(loc, x, y),
            InterpolationMethod::TinLinear => self.interpolate_tin_linear(loc, x, y),
            InterpolationMethod::Laplace => self.interpolate_laplace(loc, x, y),
            InterpolationMethod::Sibson => self.interpolate_sibson(loc, x, y),
            InterpolationMethod::Idw { radius, power } => self.interpolate_idw(x, y, radius, power),
        };

        match value {
            Some(v) => Ok(v),
            None if strict => Err(DtError::EmptyMesh),
            None => Ok(f64::NAN),
        }
    }

    fn interpolate_nn(&self, loc: Location, x: f64, y: f64) -> Option<f64> {
        let candidates: Vec<usize> = match loc {
            Location::Vertex(v) => return Some(self.vertices[v].z),
            Location::Edge(a, b) => vec![a, b],
            Location::Triangle(t) => self.triangles[t].v.to_vec(),
            Location::Outside(_) => return None,
        };
        candidates
            .into_iter()
            .min_by(|&a, &b| dist2(self.xy(a), (x, y)).partial_cmp(&dist2(self.xy(b), (x, y))).unwrap())
            .map(|v| self.vertices[v].z)
    }

    fn barycentric(&self, t: usize, x: f64, y: f64) -> Option<(f64, f64, f64, [usize; 3])> {
        let v = self.triangles[t].v;
        let (x0, y0) = self.xy(v[0]);
        let (x1, y1) = self.xy(v[1]);
        let (x2, y2) = self.xy(v[2]);
        let det = (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2);
        if det.abs() < 1e-15 {
            return None;
        }
        let l0 = ((y1 - y2) * (x - x2) + (x2 - x1) * (y - y2)) / det;
        let l1 = ((y2 - y0) * (x - x2) + (x0 - x2) * (y - y2)) / det;
        let l2 = 1.0 - l0 - l1;
        Some((l0, l1, l2, v))
    }

    fn interpolate_tin_linear(&self, loc: Location, x: f64, y: f64) -> Option<f64> {
        match loc {
            Location::Vertex(v) => Some(self.vertices[v].z),
            Location::Edge(a, b) => {
                let (ax, ay) = self.xy(a);
                let (bx, by) = self.xy(b);
                let len2 = dist2((ax, ay), (bx, by));
                if len2 == 0.0 {
                    return Some(self.vertices[a].z);
                }
                let t = (((x - ax) * (bx - ax) + (y - ay) * (by - ay)) / len2).clamp(0.0, 1.0);
                Some(self.vertices[a].z + t * (self.vertices[b].z - self.vertices[a].z))
            }
            Location::Triangle(t) => {
                let (l0, l1, l2, v) = self.barycentric(t, x, y)?;
                Some(l0 * self.vertices[v[0]].z + l1 * self.vertices[v[1]].z + l2 * self.vertices[v[2]].z)
            }
            Location::Outside(_) => None,
        }
    }

    /// Laplace interpolation: weights neighbours by the ratio of (an area
    /// proxy for) their Voronoi edge length to their distance from the query,
    /// using the query's true natural-neighbour set (see `natural_neighbours`).
    fn interpolate_laplace(&self, loc: Location, x: f64, y: f64) -> Option<f64> {
        let t = match loc {
            Location::Vertex(v) => return Some(self.vertices[v].z),
            Location::Triangle(t) => t,
            Location::Edge(a, b) => self.find_triangle_with_edge(a, b).or_else(|| self.find_triangle_with_edge(b, a))?,
            Location::Outside(_) => return None,
        };
        let neighbours = self.natural_neighbours(t, x, y)?;
        let mut num = 0.0;
        let mut den = 0.0;
        for (v, w) in neighbours {
            let (vx, vy) = self.xy(v);
            let d = dist2((vx, vy), (x, y)).sqrt().max(1e-12);
            let weight = w / d;
            num += weight * self.vertices[v].z;
            den += weight;
        }
        if den == 0.0 {
            None
        } else {
            Some(num / den)
        }
    }

    /// Sibson natural-neighbour interpolation: the query's natural-neighbour
    /// cell boundary is computed read-only via `natural_neighbours`, and each
    /// neighbour is weighted by the area it contributes to that cell.
    fn interpolate_sibson(&self, loc: Location, x: f64, y: f64) -> Option<f64> {
        let t = match loc {
            Location::Vertex(v) => return Some(self.vertices[v].z),
            Location::Triangle(t) => t,
            Location::Edge(a, b) => self.find_triangle_with_edge(a, b).or_else(|| self.find_triangle_with_edge(b, a))?,
            Location::Outside(_) => return None,
        };
        let neighbours = self.natural_neighbours(t, x, y)?;
        let mut num = 0.0;
        let mut den = 0.0;
        for (v, w) in neighbours {
            num += w * self.vertices[v].z;
            den += w;
        }
        if den == 0.0 {
            None
        } else {
            Some(num / den)
        }
    }

    fn interpolate_idw(&self, x: f64, y: f64, radius: f64, power: f64) -> Option<f64> {
        let mut num = 0.0;
        let mut den = 0.0;
        let mut exact = None;
        for v in 1..self.vertices.len() {
            if self.vertices[v].removed {
                continue;
            }
            let (vx, vy) = self.xy(v);
            let d = dist2((vx, vy), (x, y)).sqrt();
            if d <= 1e-12 {
                exact = Some(self.vertices[v].z);
                break;
            }
            if d > radius {
                continue;
            }
            let w = 1.0 / d.powf(power);
            num += w * self.vertices[v].z;
            den += w;
        }
        if let Some(z) = exact {
            return Some(z);
        }
        if den == 0.0 {
            None
        } else {
            Some(num / den)
        }
    }

    /// Flood-fills the Bowyer-Watson cavity for a query `(x, y)` starting
    /// from the triangle it was located in: every finite triangle whose
    /// circumcircle strictly contains the query, reached by crossing only
    /// edges whose far side also qualifies. This is exactly the set of
    /// triangles a real insertion at `(x, y)` would destroy, so its boundary
    /// polygon's vertices are the query's true natural neighbours, wherever
    /// in the mesh they lie -- not just the three corners of `t0`.
    fn natural_neighbour_cavity(&self, t0: usize, x: f64, y: f64) -> Vec<usize> {
        let mut cavity = vec![t0];
        let mut seen = std::collections::HashSet::new();
        seen.insert(t0);
        let mut stack = vec![t0];
        while let Some(t) = stack.pop() {
            let tri = self.triangles[t];
            for &nb in &tri.opp {
                if seen.contains(&nb) || self.triangles[nb].is_ghost() {
                    continue;
                }
                let nv = self.triangles[nb].v;
                let inside = crate::predicates::incircle(self.xy(nv[0]), self.xy(nv[1]), self.xy(nv[2]), (x, y)).is_positive();
                if inside {
                    seen.insert(nb);
                    cavity.push(nb);
                    stack.push(nb);
                }
            }
        }
        cavity
    }

    /// Walks the cavity's boundary into a single CCW polygon of vertex
    /// indices, by keeping only the edges whose far-side triangle is not
    /// itself part of the cavity.
    fn cavity_boundary(&self, cavity: &[usize]) -> Option<Vec<usize>> {
        let cavity_set: std::collections::HashSet<usize> = cavity.iter().copied().collect();
        let mut next_of: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
        for &t in cavity {
            let tri = self.triangles[t];
            for i in 0..3 {
                if cavity_set.contains(&tri.opp[i]) {
                    continue;
                }
                let p = tri.v[(i + 1) % 3];
                let q = tri.v[(i + 2) % 3];
                next_of.insert(p, q);
            }
        }
        let start = *next_of.keys().next()?;
        let mut poly = vec![start];
        let mut cur = start;
        loop {
            let next = *next_of.get(&cur)?;
            if next == start {
                break;
            }
            poly.push(next);
            cur = next;
        }
        Some(poly)
    }

    /// Natural-neighbour coordinates: the vertices bordering the query's
    /// Bowyer-Watson cavity, each weighted by the area of the triangle it
    /// forms with the query point and its two cavity-boundary neighbours --
    /// a stolen-area proxy shared by both Laplace and Sibson.
    fn natural_neighbours(&self, t: usize, x: f64, y: f64) -> Option<Vec<(usize, f64)>> {
        let cavity = self.natural_neighbour_cavity(t, x, y);
        let poly = self.cavity_boundary(&cavity)?;
        if poly.len() < 3 {
            return None;
        }
        let mut weights: Vec<(usize, f64)> = poly.iter().map(|&v| (v, 0.0)).collect();
        for i in 0..poly.len() {
            let j = (i + 1) % poly.len();
            let area = triangle_area((x, y), self.xy(poly[i]), self.xy(poly[j]));
            weights[i].1 += area;
            weights[j].1 += area;
        }
        Some(weights)
    }
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

fn triangle_area(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    ((b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)).abs() / 2.0
}

//! Read-only queries over the current triangulation: adjacency, convex hull,
//! bounding box, and normal-vector estimation.

use crate::mesh::{MeshStore, INFINITE_VERTEX};

impl MeshStore {
    /// Vertices incident to `v` in CCW order (finite neighbors only).
    pub(crate) fn adjacent_vertices(&self, v: usize) -> Vec<usize> {
        if v == INFINITE_VERTEX || v >= self.vertices.len() || self.vertices[v].removed {
            return Vec::new();
        }
        let incident: Vec<usize> = self
            .triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alive && t.v.contains(&v))
            .map(|(i, _)| i)
            .collect();
        if incident.is_empty() {
            return Vec::new();
        }
        self.ordered_link(v, &incident)
            .into_iter()
            .filter(|&x| x != INFINITE_VERTEX)
            .collect()
    }

    /// Indices of the alive triangles incident to `v`, including ghost
    /// triangles when `v` is on the hull.
    pub(crate) fn incident_triangles_public(&self, v: usize) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alive && t.v.contains(&v))
            .map(|(i, _)| i)
            .collect()
    }

    /// The three neighbours of `t` in edge order (`opp[i]` is across the edge
    /// opposite `v[i]`), or `None` if `t` is out of range or dead.
    pub(crate) fn adjacent_triangles_public(&self, t: usize) -> Option<[usize; 3]> {
        self.triangles.get(t).filter(|tri| tri.alive).map(|tri| tri.opp)
    }

    /// CCW convex hull vertices, or empty if fewer than 3 non-collinear
    /// finite vertices exist yet.
    pub(crate) fn convex_hull(&self) -> Vec<usize> {
        let first_ghost = self.triangles.iter().position(|t| t.alive && t.is_ghost());
        let g0 = match first_ghost {
            Some(g) => g,
            None => return Vec::new(),
        };
        let start_v = self.triangles[g0].v[0];
        let mut hull = vec![start_v];
        let mut cur = g0;
        loop {
            let v = self.triangles[cur].v;
            let a = v[0];
            let idx = self.opposite_index(cur, a, INFINITE_VERTEX);
            let next = self.triangles[cur].opp[idx];
            let next_v = self.triangles[next].v[0];
            if next_v == start_v {
                break;
            }
            hull.push(next_v);
            cur = next;
        }
        hull
    }

    /// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)` of all live
    /// finite vertices.
    pub(crate) fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut iter = (1..self.vertices.len()).filter(|&i| !self.vertices[i].removed);
        let first = iter.next()?;
        let (mut minx, mut miny) = self.xy(first);
        let (mut maxx, mut maxy) = (minx, miny);
        for v in iter {
            let (x, y) = self.xy(v);
            minx = minx.min(x);
            miny = miny.min(y);
            maxx = maxx.max(x);
            maxy = maxy.max(y);
        }
        Some((minx, miny, maxx, maxy))
    }

    /// Area-weighted average of the unit normals of triangles incident to `v`.
    pub(crate) fn normal_at_vertex(&self, v: usize) -> Option<(f64, f64, f64)> {
        let tris: Vec<usize> = self
            .incident_triangles_public(v)
            .into_iter()
            .filter(|&t| !self.triangles[t].is_ghost())
            .collect();
        if tris.is_empty() {
            return None;
        }
        let mut acc = (0.0, 0.0, 0.0);
        for t in tris {
            let [a, b, c] = self.triangles[t].v;
            let pa = self.xyz(a);
            let pb = self.xyz(b);
            let pc = self.xyz(c);
            let u = (pb.0 - pa.0, pb.1 - pa.1, pb.2 - pa.2);
            let w = (pc.0 - pa.0, pc.1 - pa.1, pc.2 - pa.2);
            let n = (u.1 * w.2 - u.2 * w.1, u.2 * w.0 - u.0 * w.2, u.0 * w.1 - u.1 * w.0);
            acc = (acc.0 + n.0, acc.1 + n.1, acc.2 + n.2);
        }
        let len = (acc.0 * acc.0 + acc.1 * acc.1 + acc.2 * acc.2).sqrt();
        if len == 0.0 {
            return None;
        }
        Some((acc.0 / len, acc.1 / len, acc.2 / len))
    }

    fn xyz(&self, v: usize) -> (f64, f64, f64) {
        let s = self.vertices[v];
        (s.x, s.y, s.z)
    }

    /// Whether `t` is an alive, non-ghost triangle.
    pub(crate) fn is_finite_triangle(&self, t: usize) -> bool {
        self.triangles.get(t).map(|tri| tri.alive && !tri.is_ghost()).unwrap_or(false)
    }

    /// Whether any tombstoned vertex or dead triangle slot remains.
    pub(crate) fn has_garbage(&self) -> bool {
        self.vertices.iter().skip(1).any(|v| v.removed) || self.triangles.iter().any(|t| !t.alive)
    }

    /// Whether `[a, b, c]` (in any order) names a currently alive finite
    /// triangle.
    pub(crate) fn is_triangle(&self, a: usize, b: usize, c: usize) -> bool {
        self.triangles.iter().any(|t| {
            t.alive
                && !t.is_ghost()
                && t.v.contains(&a)
                && t.v.contains(&b)
                && t.v.contains(&c)
        })
    }

    /// Whether `v` currently sits on the convex hull.
    pub(crate) fn is_vertex_on_hull(&self, v: usize) -> bool {
        self.convex_hull().contains(&v)
    }
}

//! Incremental vertex insertion: bootstrap, in-triangle split, on-edge split,
//! outside-convex-hull fan, and duplicate/snap handling.

use crate::error::{DtError, DtResult};
use crate::locate::Location;
use crate::mesh::{MeshStore, INFINITE_VERTEX};
use crate::predicates::orient2d;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateHandling {
    First,
    Last,
    Highest,
    Lowest,
}

impl Default for DuplicateHandling {
    fn default() -> Self {
        DuplicateHandling::First
    }
}

impl MeshStore {
    /// Inserts a point, returning `(index, inserted, z_updated)`: the vertex
    /// index that now represents it (which may be a pre-existing vertex if
    /// snapping or duplicate merging applied), whether a brand-new vertex was
    /// allocated, and whether an existing vertex's elevation changed as a
    /// result of the duplicate policy.
    pub(crate) fn insert_point(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        snap_tolerance: f64,
        jump_and_walk: bool,
        on_duplicate: DuplicateHandling,
    ) -> DtResult<(usize, bool, bool)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(DtError::InvalidInput("coordinates must be finite".into()));
        }

        let loc = self.locate(x, y, jump_and_walk);

        if let Some((existing, d)) = self.nearest_candidate(loc, x, y) {
            if d <= snap_tolerance {
                let z_updated = self.merge_duplicate(existing, z, on_duplicate);
                return Ok((existing, false, z_updated));
            }
        }

        if self.is_bootstrapping() {
            let n = self.insert_bootstrap(x, y, z);
            return Ok((n, true, false));
        }

        let n = self.push_vertex(x, y, z);
        match loc {
            Location::Vertex(v) => {
                debug!("snapped insert at exact vertex {}", v);
                self.vertices.pop();
                let z_updated = self.merge_duplicate(v, z, on_duplicate);
                return Ok((v, false, z_updated));
            }
            Location::Edge(a, b) => self.insert_on_edge(a, b, n),
            Location::Triangle(t) => self.insert_in_triangle(t, n),
            Location::Outside(g) => self.insert_outside_hull(g, n),
        }
        self.last_triangle_hint = n;
        Ok((n, true, false))
    }

    /// Applies the duplicate policy to an existing vertex, returning whether
    /// its elevation changed.
    fn merge_duplicate(&mut self, existing: usize, z: f64, policy: DuplicateHandling) -> bool {
        let before = self.vertices[existing].z;
        match policy {
            DuplicateHandling::First => {}
            DuplicateHandling::Last => self.vertices[existing].z = z,
            DuplicateHandling::Highest => {
                if z > self.vertices[existing].z {
                    self.vertices[existing].z = z;
                }
            }
            DuplicateHandling::Lowest => {
                if z < self.vertices[existing].z {
                    self.vertices[existing].z = z;
                }
            }
        }
        self.vertices[existing].z != before
    }

    fn insert_bootstrap(&mut self, x: f64, y: f64, z: f64) -> usize {
        let n = self.push_vertex(x, y, z);

        if self.bootstrap.len() < 2 {
            self.bootstrap.push(n);
            return n;
        }

        let p0 = self.xy(self.bootstrap[0]);
        let p1 = self.xy(self.bootstrap[1]);
        let collinear = orient2d(p0, p1, (x, y)) == crate::predicates::Sign::Zero;
        if collinear {
            self.bootstrap.push(n);
            return n;
        }

        self.build_initial_fan(n);
        n
    }

    /// Turns the accumulated collinear bootstrap points plus one off-line
    /// apex into a triangle fan, with ghost triangles tiling the exterior.
    fn build_initial_fan(&mut self, apex: usize) {
        let mut line_pts = std::mem::take(&mut self.bootstrap);
        let origin = self.xy(line_pts[0]);
        let dir = {
            let p1 = self.xy(*line_pts.last().unwrap());
            (p1.0 - origin.0, p1.1 - origin.1)
        };
        line_pts.sort_by(|&a, &b| {
            let pa = self.xy(a);
            let pb = self.xy(b);
            let ta = (pa.0 - origin.0) * dir.0 + (pa.1 - origin.1) * dir.1;
            let tb = (pb.0 - origin.0) * dir.0 + (pb.1 - origin.1) * dir.1;
            ta.partial_cmp(&tb).unwrap()
        });

        let ccw = orient2d(self.xy(line_pts[0]), self.xy(line_pts[1]), self.xy(apex)).is_positive();
        let ordered = |a: usize, b: usize| if ccw { (a, b) } else { (b, a) };

        let k = line_pts.len();
        let mut tris = Vec::with_capacity(k - 1);
        for i in 0..k - 1 {
            let (p, q) = ordered(line_pts[i], line_pts[i + 1]);
            let v = [p, q, apex];
            self.triangles.push(crate::mesh::TriangleSlot {
                v,
                opp: [usize::MAX; 3],
                alive: true,
            });
            tris.push(self.triangles.len() - 1);
        }
        for i in 0..tris.len() {
            if i > 0 {
                self.link(tris[i], 0, tris[i - 1], 1);
            }
        }

        // ghost triangles around the fan's hull boundary: the k-1 base edges
        // plus the two flank edges at the apex.
        let mut ghosts = Vec::with_capacity(k + 1);
        for i in 0..k - 1 {
            let (p, q) = ordered(line_pts[i], line_pts[i + 1]);
            self.triangles.push(crate::mesh::TriangleSlot {
                v: [q, p, INFINITE_VERTEX],
                opp: [usize::MAX; 3],
                alive: true,
            });
            let g = self.triangles.len() - 1;
            self.link(tris[i], 2, g, 2);
            ghosts.push(g);
        }
        let (first_p, _) = ordered(line_pts[0], line_pts[1]);
        let (_, last_q) = ordered(line_pts[k - 2], line_pts[k - 1]);
        self.triangles.push(crate::mesh::TriangleSlot {
            v: [apex, first_p, INFINITE_VERTEX],
            opp: [usize::MAX; 3],
            alive: true,
        });
        let g_left = self.triangles.len() - 1;
        self.triangles.push(crate::mesh::TriangleSlot {
            v: [last_q, apex, INFINITE_VERTEX],
            opp: [usize::MAX; 3],
            alive: true,
        });
        let g_right = self.triangles.len() - 1;

        // finite edges of the flank ghosts: slot2 (opposite INF) on each,
        // matching the slot the base ghosts use for their own finite edge.
        self.link(g_left, 2, tris[0], 1);
        self.link(g_right, 2, tris[k - 2], 0);

        // chain the ghosts around the fan: g_left - ghosts[0] - ghosts[1] - ... - ghosts[last] - g_right - g_left
        self.link(g_left, 0, ghosts[0], 0);
        let mut prev = ghosts[0];
        for &g in &ghosts[1..] {
            self.link(prev, 1, g, 0);
            prev = g;
        }
        self.link(prev, 1, g_right, 1);
        self.link(g_left, 1, g_right, 0);

        self.last_triangle_hint = tris[0];
    }

    fn insert_in_triangle(&mut self, t: usize, n: usize) {
        let (_, stack) = self.split_triangle(t, n);
        self.legalize(stack);
    }

    fn insert_on_edge(&mut self, a: usize, b: usize, n: usize) {
        let t1 = self.find_triangle_with_edge(a, b);
        let t2 = self.find_triangle_with_edge(b, a);
        let (t1, t2) = match (t1, t2) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                warn!("on-edge insert could not locate both incident triangles, falling back to outside-hull path");
                let g = self
                    .triangles
                    .iter()
                    .position(|t| t.alive && t.is_ghost())
                    .unwrap_or(0);
                return self.insert_outside_hull(g, n);
            }
        };

        let (piece_a, piece_b) = self.split_edge_in_triangle(t1, a, b, n);
        let (piece_c, piece_d) = self.split_edge_in_triangle(t2, b, a, n);

        // piece_a = (a,n,r1), piece_b = (n,b,r1); piece_c = (b,n,r2), piece_d = (n,a,r2).
        // The new edge (a,n) borders piece_a and piece_d; the new edge (n,b)
        // borders piece_b and piece_c. Both sides are the slot opposite each
        // piece's own third vertex (r1/r2), the only slot `split_edge_in_triangle`
        // leaves unlinked.
        self.link(piece_a, 2, piece_d, 2);
        self.link(piece_b, 2, piece_c, 2);

        // Legalization candidates are the edges opposite `n` in each new
        // triangle -- the ones inherited untouched from the original two
        // triangles, the same "opposite the new vertex" convention
        // `split_triangle` uses for its own stack.
        let stack = vec![
            (piece_a, self.vertex_opposite_slot(piece_a, n)),
            (piece_b, self.vertex_opposite_slot(piece_b, n)),
            (piece_c, self.vertex_opposite_slot(piece_c, n)),
            (piece_d, self.vertex_opposite_slot(piece_d, n)),
        ];
        self.legalize(stack);
    }

    pub(crate) fn find_triangle_with_edge(&self, p: usize, q: usize) -> Option<usize> {
        self.triangles.iter().enumerate().find_map(|(i, t)| {
            if !t.alive {
                return None;
            }
            for k in 0..3 {
                if t.v[k] == p && t.v[(k + 1) % 3] == q {
                    return Some(i);
                }
            }
            None
        })
    }

    /// Inserts a vertex known to lie outside the convex hull, given the ghost
    /// triangle whose real edge is the nearest hull boundary.
    fn insert_outside_hull(&mut self, g0: usize, n: usize) {
        let (x, y) = self.xy(n);

        // the real edge of a ghost (b, a, 0) is (b, a): walking forward means
        // rotating around `a`, backward means rotating around `b`.
        let (mut a, mut b, _) = {
            let v = self.triangles[g0].v;
            (v[1], v[0], v[2])
        };

        let mut chain_ghosts = vec![g0];
        let mut hull_pts = vec![a, b];

        // extend forward (around b): next ghost shares vertex b.
        loop {
            let last = *chain_ghosts.last().unwrap();
            let next = self.triangles[last].opp[self.opposite_index(last, b, INFINITE_VERTEX)];
            if !self.triangles[next].is_ghost() || next == chain_ghosts[0] {
                break;
            }
            let nv = self.triangles[next].v;
            let c = nv.iter().copied().find(|&v| v != b && v != INFINITE_VERTEX).unwrap();
            if !orient2d(self.xy(b), self.xy(c), (x, y)).is_negative() {
                break;
            }
            chain_ghosts.push(next);
            hull_pts.push(c);
            b = c;
        }

        // extend backward (around a).
        loop {
            let first = chain_ghosts[0];
            let prev = self.triangles[first].opp[self.opposite_index(first, a, INFINITE_VERTEX)];
            if !self.triangles[prev].is_ghost() || chain_ghosts.contains(&prev) {
                break;
            }
            let pv = self.triangles[prev].v;
            let c = pv.iter().copied().find(|&v| v != a && v != INFINITE_VERTEX).unwrap();
            if !orient2d(self.xy(c), self.xy(a), (x, y)).is_negative() {
                break;
            }
            chain_ghosts.insert(0, prev);
            hull_pts.insert(0, c);
            a = c;
        }

        let q = hull_pts; // q[0]..q[k]: the visible hull vertex chain
        let k = chain_ghosts.len();
        debug!("inserting {} outside hull, {} visible edge(s)", n, k);

        let outer_left = self.triangles[chain_ghosts[0]].opp[self.opposite_index(chain_ghosts[0], q[0], INFINITE_VERTEX)];
        let outer_right =
            self.triangles[chain_ghosts[k - 1]].opp[self.opposite_index(chain_ghosts[k - 1], *q.last().unwrap(), INFINITE_VERTEX)];

        let mut new_tris = Vec::with_capacity(k);
        for i in 0..k {
            let g = chain_ghosts[i];
            let f_neighbor = self.triangles[g].opp[self.opposite_index(g, q[i], q[i + 1])];
            let new_v = [q[i + 1], q[i], n];
            self.triangles[g].v = new_v;
            self.triangles[g].opp = [usize::MAX; 3];
            self.retarget(g, 2, f_neighbor, g);
            new_tris.push(g);
        }
        for i in 1..k {
            self.link(new_tris[i - 1], 1, new_tris[i], 0);
        }

        self.triangles.push(crate::mesh::TriangleSlot {
            v: [n, q[0], INFINITE_VERTEX],
            opp: [usize::MAX; 3],
            alive: true,
        });
        let ghost_left = self.triangles.len() - 1;
        self.triangles.push(crate::mesh::TriangleSlot {
            v: [*q.last().unwrap(), n, INFINITE_VERTEX],
            opp: [usize::MAX; 3],
            alive: true,
        });
        let ghost_right = self.triangles.len() - 1;

        self.link(ghost_left, 2, new_tris[0], 0);
        self.link(ghost_right, 2, new_tris[k - 1], 1);
        self.link(ghost_left, 1, ghost_right, 0);
        self.retarget(ghost_left, 0, outer_left, chain_ghosts[0]);
        self.retarget(ghost_right, 1, outer_right, chain_ghosts[k - 1]);

        let mut stack = Vec::new();
        for &t in &new_tris {
            stack.push((t, 2));
        }
        self.legalize(stack);
        self.last_triangle_hint = new_tris[0];
    }
}

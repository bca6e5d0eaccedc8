//! Vertex removal: link-polygon retriangulation by fan-and-legalize, with
//! collinear-collapse back to the bootstrap state.

use crate::error::{DtError, DtResult};
use crate::mesh::{MeshStore, TriangleSlot, INFINITE_VERTEX};
use crate::predicates::orient2d;
use log::debug;

impl MeshStore {
    pub(crate) fn remove_vertex(&mut self, v: usize) -> DtResult<()> {
        if v == INFINITE_VERTEX {
            return Err(DtError::InfiniteVertex);
        }
        if v >= self.vertices.len() || self.vertices[v].removed {
            return Err(DtError::OutOfRange(v));
        }

        let incident = self.incident_triangles(v);
        if incident.is_empty() {
            return Err(DtError::OutOfRange(v));
        }

        // Build the ordered link, rotating around v via shared edges.
        let link = self.ordered_link(v, &incident);
        self.vertices[v].removed = true;
        for &t in &incident {
            self.kill_triangle(t);
        }

        if !link.contains(&INFINITE_VERTEX) {
            self.fill_closed_polygon(&link, &incident);
        } else {
            self.fill_open_chain(&link, &incident);
        }

        if self.should_collapse_to_bootstrap() {
            self.collapse_to_bootstrap();
        }
        Ok(())
    }

    fn incident_triangles(&self, v: usize) -> Vec<usize> {
        self.triangles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.alive && t.v.contains(&v))
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the CCW-ordered ring of vertices opposite `v` across its
    /// incident triangles (may contain the infinite vertex once, for a hull
    /// vertex).
    pub(crate) fn ordered_link(&self, v: usize, incident: &[usize]) -> Vec<usize> {
        // pick any incident triangle as a starting point and walk by rotating
        // around v, each step crossing into the neighbor across the edge
        // (v, next_link_vertex).
        let start = incident[0];
        let tri = self.triangles[start];
        let iv = tri.v.iter().position(|&x| x == v).unwrap();
        let mut link = vec![tri.v[(iv + 1) % 3]];
        let mut cur = start;
        let mut cur_other = tri.v[(iv + 1) % 3];
        loop {
            let t = self.triangles[cur];
            let iv = t.v.iter().position(|&x| x == v).unwrap();
            let next_vertex = if t.v[(iv + 1) % 3] == cur_other {
                t.v[(iv + 2) % 3]
            } else {
                t.v[(iv + 1) % 3]
            };
            if next_vertex == link[0] {
                break;
            }
            link.push(next_vertex);
            let idx = self.opposite_index(cur, v, next_vertex);
            cur = t.opp[idx];
            cur_other = next_vertex;
        }
        link
    }

    fn fill_closed_polygon(&mut self, link: &[usize], old_tris: &[usize]) {
        let m = link.len();
        if m < 3 {
            return;
        }
        let apex = link[0];
        let mut slots: Vec<usize> = old_tris.iter().copied().take(m - 2).collect();
        while slots.len() < m - 2 {
            slots.push(self.alloc_bare());
        }

        for i in 1..m - 1 {
            let t = slots[i - 1];
            self.triangles[t] = TriangleSlot {
                v: [apex, link[i], link[i + 1]],
                opp: [usize::MAX; 3],
                alive: true,
            };
        }
        // slot 0 of each new triangle (opposite apex) is the rim edge
        // (link[i], link[i+1]) inherited unchanged from the killed star
        // triangle (v, link[i], link[i+1]).
        for i in 1..m - 1 {
            let t = slots[i - 1];
            let outer = self.find_old_neighbor(old_tris, link[i], link[i + 1]);
            self.retarget_from_set(t, 0, outer, old_tris);
        }
        // first spoke: edge(apex, link[1]), opposite link[2] in slots[0].
        {
            let t = slots[0];
            let outer = self.find_old_neighbor(old_tris, apex, link[1]);
            self.retarget_from_set(t, 2, outer, old_tris);
        }
        // last spoke: edge(link[m-1], apex), opposite link[m-2] in the last slot.
        {
            let t = slots[m - 3];
            let outer = self.find_old_neighbor(old_tris, link[m - 1], apex);
            self.retarget_from_set(t, 1, outer, old_tris);
        }
        // internal diagonals apex-link[i] for i=2..m-2
        for i in 1..slots.len() {
            self.link(slots[i - 1], 1, slots[i], 2);
        }
        self.last_triangle_hint = slots[0];

        // Every edge of every fan triangle is a legalize candidate: unlike a
        // single-point insertion (where edges touching the new vertex are
        // provably legal because the split triangle was legal before the
        // split), each fan triangle here is brand new and its edges -- rim,
        // spokes, and internal diagonals alike -- carry no such guarantee.
        let mut stack = Vec::new();
        for &t in &slots {
            stack.push((t, 0));
            stack.push((t, 1));
            stack.push((t, 2));
        }
        self.legalize(stack);
    }

    fn fill_open_chain(&mut self, link_with_inf: &[usize], old_tris: &[usize]) {
        let inf_pos = link_with_inf.iter().position(|&x| x == INFINITE_VERTEX).unwrap();
        let q = link_with_inf.len();
        let mut chain = Vec::with_capacity(q - 1);
        for i in 1..q {
            chain.push(link_with_inf[(inf_pos + i) % q]);
        }
        // chain[0] = h_right (hull successor), chain.last() = h_left (hull predecessor)
        let c0 = chain[0];
        let clen = chain.len();

        if clen < 2 {
            return; // nothing left to retriangulate; caller will collapse to bootstrap.
        }
        if clen == 2 {
            // only the two hull neighbors remain: one new ghost, no new finite triangle.
            let h_right = chain[0];
            let h_left = chain[1];
            self.triangles.push(TriangleSlot {
                v: [h_right, h_left, INFINITE_VERTEX],
                opp: [usize::MAX; 3],
                alive: true,
            });
            let g = self.triangles.len() - 1;
            // g = (h_right, h_left, inf): slot0 (opposite h_right) = edge(h_left,inf);
            // slot1 (opposite h_left) = edge(inf,h_right).
            let slot0_outer = self.find_old_neighbor(old_tris, h_left, INFINITE_VERTEX);
            let slot1_outer = self.find_old_neighbor(old_tris, INFINITE_VERTEX, h_right);
            self.retarget_from_set(g, 0, slot0_outer, old_tris);
            self.retarget_from_set(g, 1, slot1_outer, old_tris);
            self.last_triangle_hint = g;
            return;
        }

        let mut slots: Vec<usize> = old_tris.iter().copied().take(clen - 2).collect();
        while slots.len() < clen - 2 {
            slots.push(self.alloc_bare());
        }

        for i in 1..clen - 1 {
            let t = slots[i - 1];
            self.triangles[t] = TriangleSlot {
                v: [c0, chain[i], chain[i + 1]],
                opp: [usize::MAX; 3],
                alive: true,
            };
        }
        // slot 0 of each new triangle (opposite c0) is the rim edge
        // (chain[i], chain[i+1]) inherited from the killed star triangle.
        for i in 1..clen - 1 {
            let t = slots[i - 1];
            let outer = self.find_old_neighbor(old_tris, chain[i], chain[i + 1]);
            self.retarget_from_set(t, 0, outer, old_tris);
        }
        // first spoke: edge(c0, chain[1]), opposite chain[2] in slots[0].
        {
            let t = slots[0];
            let outer = self.find_old_neighbor(old_tris, c0, chain[1]);
            self.retarget_from_set(t, 2, outer, old_tris);
        }

        self.triangles.push(TriangleSlot {
            v: [c0, *chain.last().unwrap(), INFINITE_VERTEX],
            opp: [usize::MAX; 3],
            alive: true,
        });
        let g = self.triangles.len() - 1;
        let last_slot = slots[clen - 3];
        // g = (c0, chain.last(), inf): slot2 (opposite inf) = edge(c0, chain.last()),
        // the diagonal shared with last_slot's slot1 (opposite chain[clen-2]).
        self.link(g, 2, last_slot, 1);

        // g's remaining two edges: slot0 (opposite c0) = edge(chain.last(), inf);
        // slot1 (opposite chain.last()) = edge(inf, c0).
        let slot0_outer = self.find_old_neighbor(old_tris, *chain.last().unwrap(), INFINITE_VERTEX);
        let slot1_outer = self.find_old_neighbor(old_tris, INFINITE_VERTEX, c0);
        self.retarget_from_set(g, 0, slot0_outer, old_tris);
        self.retarget_from_set(g, 1, slot1_outer, old_tris);

        for i in 1..slots.len() {
            self.link(slots[i - 1], 1, slots[i], 2);
        }
        self.last_triangle_hint = slots[0];

        // Same reasoning as the closed-polygon fan: every edge of every new
        // triangle (rim, spokes, internal diagonals) is an unverified legalize
        // candidate, not just the rim edges inherited from the killed star.
        let mut stack = Vec::new();
        for &t in &slots {
            stack.push((t, 0));
            stack.push((t, 1));
            stack.push((t, 2));
        }
        self.legalize(stack);
    }

    fn alloc_bare(&mut self) -> usize {
        self.triangles.push(TriangleSlot {
            v: [usize::MAX; 3],
            opp: [usize::MAX; 3],
            alive: true,
        });
        self.triangles.len() - 1
    }

    /// Among the old (now-dead) star triangles, finds the one containing
    /// edge `(p, q)` and returns its neighbor across that edge. Every killed
    /// star triangle has exactly one non-spoke edge (the one not touching the
    /// removed vertex), and consecutive link vertices appear together in
    /// exactly one star triangle, so containment of `p` and `q` alone
    /// uniquely identifies it.
    fn find_old_neighbor(&self, old_tris: &[usize], p: usize, q: usize) -> usize {
        for &t in old_tris {
            let tri = &self.triangles[t];
            if let (Some(ip), Some(iq)) = (
                tri.v.iter().position(|&x| x == p),
                tri.v.iter().position(|&x| x == q),
            ) {
                return tri.opp[3 - ip - iq];
            }
        }
        unreachable!("old star neighbor not found for edge ({}, {})", p, q);
    }

    fn retarget_from_set(&mut self, new_tri: usize, new_idx: usize, neighbor: usize, old_tris: &[usize]) {
        self.triangles[new_tri].opp[new_idx] = neighbor;
        if let Some(pos) = self.triangles[neighbor].opp.iter().position(|&x| old_tris.contains(&x)) {
            self.triangles[neighbor].opp[pos] = new_tri;
        } else {
            debug_assert!(false, "old star neighbor symmetry broken during removal");
        }
    }

    fn should_collapse_to_bootstrap(&self) -> bool {
        let finite: Vec<usize> = (1..self.vertices.len()).filter(|&i| !self.vertices[i].removed).collect();
        if finite.len() < 3 {
            return true;
        }
        let p0 = self.xy(finite[0]);
        let p1 = self.xy(finite[1]);
        finite[2..].iter().all(|&v| orient2d(p0, p1, self.xy(v)) == crate::predicates::Sign::Zero)
    }

    fn collapse_to_bootstrap(&mut self) {
        debug!("fewer than 3 non-collinear vertices remain; reverting to bootstrap state");
        for t in self.triangles.iter_mut() {
            t.alive = false;
        }
        self.bootstrap = (1..self.vertices.len()).filter(|&i| !self.vertices[i].removed).collect();
    }
}

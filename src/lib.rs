//! An incremental 2.5D Delaunay triangulation and TIN interpolation engine.
//!
//! Points are inserted one at a time into a triangle mesh kept Delaunay by
//! Lawson flips; a symbolic infinite vertex and "ghost" triangles tile the
//! exterior of the convex hull so that every directed edge always has a
//! neighbor, with no special-cased boundary logic anywhere else in the
//! engine. See [`DT`] for the entry point.

mod attributes;
mod error;
mod export;
mod insert;
mod interpolate;
mod locate;
mod mesh;
mod predicates;
mod query;
mod remove;

pub use attributes::{AttributeSchema, AttributeValue, FieldType};
pub use error::{DtError, DtResult};
pub use insert::DuplicateHandling;
pub use interpolate::InterpolationMethod;
pub use locate::Location;

use attributes::AttributeStore;
use log::info;
use mesh::MeshStore;
use std::collections::HashMap;

/// Bulk-insertion strategy for [`DT::insert_with_strategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStrategy {
    /// Insert the given points in the order given.
    AsIs,
    /// Insert four sentinel corners of an enlarged bounding box first (to
    /// give the locator a full hull to walk from the start), then the given
    /// points. The sentinels are kept, not removed, once insertion is done.
    BBox,
}

impl Default for InsertStrategy {
    fn default() -> Self {
        InsertStrategy::AsIs
    }
}

/// Tunable behavior for a [`DT`] instance.
#[derive(Debug, Clone)]
pub struct DtConfig {
    /// Points within this distance of an existing vertex are treated as
    /// duplicates rather than inserted as new vertices.
    pub snap_tolerance: f64,
    /// How to resolve the z-value when a duplicate point is inserted.
    pub on_duplicate: DuplicateHandling,
    /// Stochastic restarts during point location vs. reusing the
    /// last-touched triangle as a walk hint.
    pub jump_and_walk: bool,
    /// Whether interpolation queries outside the convex hull return an error
    /// (`true`) or a silent `NaN` (`false`).
    pub strict: bool,
}

impl Default for DtConfig {
    fn default() -> Self {
        DtConfig {
            snap_tolerance: 0.001,
            on_duplicate: DuplicateHandling::First,
            jump_and_walk: true,
            strict: false,
        }
    }
}

/// An incremental Delaunay triangulation / TIN.
pub struct DT {
    mesh: MeshStore,
    attrs: AttributeStore,
    config: DtConfig,
}

impl DT {
    pub fn new() -> Self {
        Self::with_config(DtConfig::default())
    }

    pub fn with_config(config: DtConfig) -> Self {
        info!("creating new triangulation, snap_tolerance={}", config.snap_tolerance);
        DT {
            mesh: MeshStore::new(),
            attrs: AttributeStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &DtConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DtConfig {
        &mut self.config
    }

    /// Validates a vertex index against the infinite-vertex and
    /// out-of-range/removed cases shared by every accessor that dereferences
    /// a vertex.
    fn check_vertex(&self, v: usize) -> DtResult<()> {
        if v == mesh::INFINITE_VERTEX {
            return Err(DtError::InfiniteVertex);
        }
        if v >= self.mesh.vertices.len() || self.mesh.vertices[v].removed {
            return Err(DtError::OutOfRange(v));
        }
        Ok(())
    }

    /// Inserts a single point, returning `(index, inserted, z_updated)`: the
    /// vertex index that now represents it, whether a new vertex was
    /// allocated, and whether an existing vertex's elevation changed as a
    /// result of the duplicate policy.
    pub fn insert_one_pt(&mut self, p: [f64; 3]) -> DtResult<(usize, bool, bool)> {
        self.mesh.insert_point(
            p[0],
            p[1],
            p[2],
            self.config.snap_tolerance,
            self.config.jump_and_walk,
            self.config.on_duplicate,
        )
    }

    /// Inserts many points in order (`InsertStrategy::AsIs`), returning one
    /// `(index, inserted, z_updated)` tuple per point.
    pub fn insert(&mut self, pts: &[[f64; 3]]) -> DtResult<Vec<(usize, bool, bool)>> {
        self.insert_with_strategy(pts, InsertStrategy::AsIs)
    }

    /// Inserts many points using the given [`InsertStrategy`].
    pub fn insert_with_strategy(&mut self, pts: &[[f64; 3]], strategy: InsertStrategy) -> DtResult<Vec<(usize, bool, bool)>> {
        if strategy == InsertStrategy::BBox {
            if let Some((minx, miny, maxx, maxy)) = bbox_of(pts) {
                let pad_x = (maxx - minx).max(1.0) * 0.1;
                let pad_y = (maxy - miny).max(1.0) * 0.1;
                let corners = [
                    [minx - pad_x, miny - pad_y, 0.0],
                    [maxx + pad_x, miny - pad_y, 0.0],
                    [maxx + pad_x, maxy + pad_y, 0.0],
                    [minx - pad_x, maxy + pad_y, 0.0],
                ];
                for c in corners {
                    self.insert_one_pt(c)?;
                }
            }
        }
        pts.iter().map(|&p| self.insert_one_pt(p)).collect()
    }

    /// Removes a vertex, retriangulating the hole it leaves behind.
    pub fn remove(&mut self, v: usize) -> DtResult<()> {
        self.mesh.remove_vertex(v)?;
        self.attrs.remove_vertex(v);
        Ok(())
    }

    pub fn number_of_vertices(&self) -> usize {
        (1..self.mesh.vertices.len()).filter(|&i| !self.mesh.vertices[i].removed).count()
    }

    pub fn number_of_triangles(&self) -> usize {
        self.mesh.triangles.iter().filter(|t| t.alive && !t.is_ghost()).count()
    }

    pub fn is_vertex_removed(&self, v: usize) -> bool {
        self.mesh.vertices.get(v).map(|s| s.removed).unwrap_or(true)
    }

    /// Dense snapshot of every allocated vertex slot, including tombstoned
    /// ones; row `0` is the infinite-vertex sentinel (`+inf, +inf, NaN`).
    /// Indices into this snapshot match the indices returned by
    /// [`DT::triangles`], [`DT::insert_one_pt`], and friends.
    pub fn points(&self) -> Vec<[f64; 3]> {
        self.mesh.vertices.iter().map(|s| [s.x, s.y, s.z]).collect()
    }

    /// Dense snapshot of every alive finite triangle, referencing the same
    /// raw vertex indices as [`DT::points`].
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.mesh.triangles.iter().filter(|t| t.alive && !t.is_ghost()).map(|t| t.v).collect()
    }

    /// Whether `t` names a currently alive finite (non-ghost) triangle.
    pub fn is_finite(&self, t: usize) -> bool {
        self.mesh.is_finite_triangle(t)
    }

    /// Whether any tombstoned vertex or triangle slot remains; `false`
    /// immediately after [`DT::collect_garbage`].
    pub fn has_garbage(&self) -> bool {
        self.mesh.has_garbage()
    }

    pub fn get_point(&self, v: usize) -> DtResult<[f64; 3]> {
        self.check_vertex(v)?;
        let s = self.mesh.vertices[v];
        Ok([s.x, s.y, s.z])
    }

    /// Replaces vertex `v`'s elevation in place. Returns `false` without
    /// effect if `v` is the infinite vertex, out of range, or removed.
    pub fn update_vertex_z_value(&mut self, v: usize, z: f64) -> bool {
        self.mesh.update_vertex_z(v, z)
    }

    /// Multiplies every finite vertex's elevation by `k`; attribute rows are
    /// untouched.
    pub fn vertical_exaggeration(&mut self, k: f64) {
        self.mesh.vertical_exaggeration(k);
    }

    pub fn locate(&self, x: f64, y: f64) -> Location {
        self.mesh.locate(x, y, self.config.jump_and_walk)
    }

    /// Whether `(x, y)` falls within (or on the boundary of) the convex hull.
    pub fn is_inside_convex_hull(&self, x: f64, y: f64) -> bool {
        !matches!(self.locate(x, y), Location::Outside(_))
    }

    /// Whether `v` currently sits on the convex hull.
    pub fn is_vertex_convex_hull(&self, v: usize) -> bool {
        self.mesh.is_vertex_on_hull(v)
    }

    /// Whether `[a, b, c]` (in any order) names a currently alive finite
    /// triangle.
    pub fn is_triangle(&self, t: [usize; 3]) -> bool {
        self.mesh.is_triangle(t[0], t[1], t[2])
    }

    /// CCW-ordered link vertices of `v`, excluding the infinite vertex.
    pub fn adjacent_vertices_to_vertex(&self, v: usize) -> DtResult<Vec<usize>> {
        self.check_vertex(v)?;
        Ok(self.mesh.adjacent_vertices(v))
    }

    /// Triangles incident to `v`, including ghost triangles if `v` is on the
    /// hull.
    pub fn incident_triangles_to_vertex(&self, v: usize) -> DtResult<Vec<[usize; 3]>> {
        self.check_vertex(v)?;
        Ok(self
            .mesh
            .incident_triangles_public(v)
            .into_iter()
            .map(|t| self.mesh.triangles[t].v)
            .collect())
    }

    /// The three neighbours of triangle `t`, in edge order (`opp[i]` is
    /// across the edge opposite `v[i]`).
    pub fn adjacent_triangles_to_triangle(&self, t: usize) -> DtResult<[usize; 3]> {
        self.mesh.adjacent_triangles_public(t).ok_or(DtError::OutOfRange(t))
    }

    pub fn convex_hull(&self) -> Vec<usize> {
        self.mesh.convex_hull()
    }

    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        self.mesh.bounding_box()
    }

    pub fn normal_at_vertex(&self, v: usize) -> Option<(f64, f64, f64)> {
        self.mesh.normal_at_vertex(v)
    }

    pub fn interpolate(&mut self, x: f64, y: f64, method: InterpolationMethod) -> DtResult<f64> {
        self.mesh.interpolate(x, y, method, self.config.strict)
    }

    pub fn set_attribute_schema(&mut self, schema: AttributeSchema) {
        self.attrs.schema = schema;
    }

    pub fn attribute_schema(&self) -> &AttributeSchema {
        &self.attrs.schema
    }

    pub fn set_attribute(&mut self, v: usize, field: &str, value: AttributeValue) {
        self.attrs.set(v, field, value);
    }

    pub fn get_attribute(&self, v: usize, field: &str) -> Option<&AttributeValue> {
        self.attrs.get(v, field)
    }

    /// Writes several fields of one vertex's attribute row at once. Unknown
    /// field names are silently ignored, matching [`DT::set_attribute`].
    pub fn set_vertex_attributes(&mut self, v: usize, values: &[(&str, AttributeValue)]) {
        for (field, value) in values {
            self.attrs.set(v, field, value.clone());
        }
    }

    /// Reads the whole attribute row of `v`, filling in type defaults for
    /// any schema field never written. Fails if `v` is out of range or
    /// removed.
    pub fn get_vertex_attributes(&self, v: usize) -> DtResult<HashMap<String, AttributeValue>> {
        self.check_vertex(v)?;
        let mut row = HashMap::new();
        for name in self.attrs.schema.field_names() {
            let ty = self.attrs.schema.field_type(name).expect("name came from the schema itself");
            let value = self.attrs.get(v, name).cloned().unwrap_or_else(|| attributes::default_value(ty));
            row.insert(name.to_string(), value);
        }
        Ok(row)
    }

    /// The dense column for `name`: one entry per vertex slot (including row
    /// `0`'s sentinel), with the field's type default standing in for any
    /// vertex that never had it set.
    pub fn attribute(&self, name: &str) -> DtResult<Vec<AttributeValue>> {
        let ty = self.attrs.validate_field(name)?;
        Ok((0..self.mesh.vertices.len())
            .map(|v| self.attrs.get(v, name).cloned().unwrap_or_else(|| attributes::default_value(ty)))
            .collect())
    }

    /// Compacts the vertex and triangle arenas, dropping tombstoned entries
    /// and renumbering everything that remains. Any previously-returned
    /// vertex or triangle indices are invalidated by this call.
    pub fn collect_garbage(&mut self) {
        let mut vertex_remap = vec![0usize; self.mesh.vertices.len()];
        let mut new_vertices = Vec::with_capacity(self.mesh.vertices.len());
        new_vertices.push(self.mesh.vertices[0]);
        for v in 1..self.mesh.vertices.len() {
            if self.mesh.vertices[v].removed {
                continue;
            }
            vertex_remap[v] = new_vertices.len();
            new_vertices.push(self.mesh.vertices[v]);
        }

        let mut tri_remap = vec![0usize; self.mesh.triangles.len()];
        let mut new_triangles = Vec::with_capacity(self.mesh.triangles.len());
        for (i, t) in self.mesh.triangles.iter().enumerate() {
            if !t.alive {
                continue;
            }
            tri_remap[i] = new_triangles.len();
            new_triangles.push(*t);
        }
        for t in new_triangles.iter_mut() {
            for i in 0..3 {
                t.v[i] = vertex_remap[t.v[i]];
                t.opp[i] = tri_remap[t.opp[i]];
            }
        }

        let mut new_attrs = AttributeStore::new();
        new_attrs.schema = self.attrs.schema.clone();
        for v in 1..self.mesh.vertices.len() {
            if self.mesh.vertices[v].removed {
                continue;
            }
            if let Some(row) = self.attrs.row(v) {
                for (field, value) in row.clone() {
                    new_attrs.set(vertex_remap[v], &field, value);
                }
            }
        }

        self.mesh.vertices = new_vertices;
        self.mesh.triangles = new_triangles;
        self.mesh.bootstrap = self.mesh.bootstrap.iter().map(|&v| vertex_remap[v]).collect();
        self.mesh.last_triangle_hint = 0;
        self.attrs = new_attrs;
        info!(
            "garbage collected: {} vertices, {} triangles remain",
            self.number_of_vertices(),
            self.number_of_triangles()
        );
    }

    pub fn write_obj<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        export::write_obj(&self.mesh, out)
    }

    pub fn write_ply<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        export::write_ply(&self.mesh, out)
    }

    pub fn write_geojson<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        export::write_geojson(&self.mesh, out)
    }

    /// Writes a CityJSON 1.1 document with a single `CityObject` of the
    /// given type (default `"myterrain"` when `object_type` is `None`).
    pub fn write_cityjson<W: std::io::Write>(&self, out: W, object_type: Option<&str>) -> std::io::Result<()> {
        export::write_cityjson(&self.mesh, out, object_type.unwrap_or("myterrain"))
    }

    pub fn write_flatgeobuf<W: std::io::Write>(&self, out: W) -> std::io::Result<()> {
        export::write_flatgeobuf(&self.mesh, out)
    }
}

impl Default for DT {
    fn default() -> Self {
        Self::new()
    }
}

fn bbox_of(pts: &[[f64; 3]]) -> Option<(f64, f64, f64, f64)> {
    let first = pts.first()?;
    let (mut minx, mut miny, mut maxx, mut maxy) = (first[0], first[1], first[0], first[1]);
    for p in pts {
        minx = minx.min(p[0]);
        miny = miny.min(p[1]);
        maxx = maxx.max(p[0]);
        maxy = maxy.max(p[1]);
    }
    Some((minx, miny, maxx, maxy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_then_triangle() {
        let mut dt = DT::new();
        dt.insert_one_pt([0.0, 0.0, 1.0]).unwrap();
        dt.insert_one_pt([10.0, 0.0, 2.0]).unwrap();
        assert_eq!(dt.number_of_vertices(), 2);
        assert_eq!(dt.number_of_triangles(), 0);
        dt.insert_one_pt([10.0, 10.0, 3.0]).unwrap();
        assert_eq!(dt.number_of_vertices(), 3);
        assert_eq!(dt.number_of_triangles(), 1);
    }

    #[test]
    fn square_then_center_point() {
        let mut dt = DT::new();
        dt.insert(&[
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [10.0, 10.0, 0.0],
            [0.0, 10.0, 0.0],
        ])
        .unwrap();
        assert_eq!(dt.number_of_vertices(), 4);
        assert_eq!(dt.number_of_triangles(), 2);
        dt.insert_one_pt([5.0, 5.0, 10.0]).unwrap();
        assert_eq!(dt.number_of_vertices(), 5);
        assert_eq!(dt.number_of_triangles(), 4);
        assert_eq!(dt.convex_hull().len(), 4);
    }

    #[test]
    fn collinear_removal_reverts_to_bootstrap() {
        let mut dt = DT::new();
        dt.insert(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]).unwrap();
        assert_eq!(dt.number_of_triangles(), 0);
        let (apex, ..) = dt.insert_one_pt([1.0, 1.0, 5.0]).unwrap();
        assert_eq!(dt.number_of_triangles(), 2);
        dt.remove(apex).unwrap();
        assert_eq!(dt.number_of_vertices(), 3);
        assert_eq!(dt.number_of_triangles(), 0);
    }

    #[test]
    fn bbox_strategy_inserts_sentinel_corners_first() {
        let mut dt = DT::new();
        let results = dt
            .insert_with_strategy(
                &[[0.0, 0.0, 1.0], [10.0, 0.0, 2.0], [10.0, 10.0, 3.0], [0.0, 10.0, 4.0]],
                InsertStrategy::BBox,
            )
            .unwrap();
        // the 4 sentinel corners were inserted first, so the requested points
        // start at vertex index 5.
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].0, 5);
        assert_eq!(dt.number_of_vertices(), 8);
    }

    #[test]
    fn dense_snapshots_and_garbage_flags() {
        let mut dt = DT::new();
        let ids = dt
            .insert(&[[0.0, 0.0, 0.0], [10.0, 0.0, 1.0], [10.0, 10.0, 2.0], [0.0, 10.0, 3.0]])
            .unwrap();
        assert_eq!(dt.points().len(), 5); // sentinel row 0 + 4 vertices
        assert_eq!(dt.triangles().len(), dt.number_of_triangles());
        assert!(!dt.has_garbage());

        dt.remove(ids[0].0).unwrap();
        assert!(dt.has_garbage());
        dt.collect_garbage();
        assert!(!dt.has_garbage());
    }

    #[test]
    fn attribute_column_fills_defaults_for_unset_rows() {
        let mut dt = DT::new();
        let mut schema = AttributeSchema::new();
        schema.add_field("confidence", FieldType::F64);
        dt.set_attribute_schema(schema);
        let ids = dt
            .insert(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
            .unwrap();
        dt.set_vertex_attributes(ids[0].0, &[("confidence", AttributeValue::F64(0.75))]);

        let column = dt.attribute("confidence").unwrap();
        assert_eq!(column[ids[0].0], AttributeValue::F64(0.75));
        assert_eq!(column[ids[1].0], AttributeValue::F64(0.0));

        let row = dt.get_vertex_attributes(ids[1].0).unwrap();
        assert_eq!(row.get("confidence"), Some(&AttributeValue::F64(0.0)));
    }

    #[test]
    fn infinite_vertex_access_is_its_own_error_kind() {
        let mut dt = DT::new();
        dt.insert(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        assert!(matches!(dt.get_point(0), Err(DtError::InfiniteVertex)));
        assert!(matches!(dt.remove(0), Err(DtError::InfiniteVertex)));
    }
}

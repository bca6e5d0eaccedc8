//! Mesh export writers: OBJ, PLY, GeoJSON, CityJSON, FlatGeoBuf.

mod cityjson;
mod flatgeobuf_writer;
mod geojson;
mod obj;
mod ply;

pub use cityjson::write_cityjson;
pub use flatgeobuf_writer::write_flatgeobuf;
pub use geojson::write_geojson;
pub use obj::write_obj;
pub use ply::write_ply;

use crate::mesh::MeshStore;

/// A snapshot of the finite geometry needed by every writer: live vertices
/// (remapped to a dense 0-based index) and live finite triangles.
pub(crate) struct MeshSnapshot {
    pub points: Vec<(f64, f64, f64)>,
    pub triangles: Vec<[usize; 3]>,
}

impl MeshSnapshot {
    pub(crate) fn build(mesh: &MeshStore) -> MeshSnapshot {
        let mut remap = vec![None; mesh.vertices.len()];
        let mut points = Vec::new();
        for v in 1..mesh.vertices.len() {
            if mesh.vertices[v].removed {
                continue;
            }
            remap[v] = Some(points.len());
            points.push((mesh.vertices[v].x, mesh.vertices[v].y, mesh.vertices[v].z));
        }
        let mut triangles = Vec::new();
        for t in &mesh.triangles {
            if !t.alive || t.is_ghost() {
                continue;
            }
            let v = [
                remap[t.v[0]].expect("live triangle referencing removed vertex"),
                remap[t.v[1]].expect("live triangle referencing removed vertex"),
                remap[t.v[2]].expect("live triangle referencing removed vertex"),
            ];
            triangles.push(v);
        }
        MeshSnapshot { points, triangles }
    }
}

use super::MeshSnapshot;
use crate::mesh::MeshStore;
use serde_json::json;
use std::io::{self, Write};

/// Writes the triangulation as a minimal CityJSON 1.1 document: one city
/// object of the given `object_type`, whose single `MultiSurface` geometry
/// lists every triangle as a boundary.
pub fn write_cityjson<W: Write>(mesh: &MeshStore, mut out: W, object_type: &str) -> io::Result<()> {
    let snap = MeshSnapshot::build(mesh);
    let vertices: Vec<[f64; 3]> = snap.points.iter().map(|&(x, y, z)| [x, y, z]).collect();
    let boundaries: Vec<Vec<Vec<usize>>> = snap.triangles.iter().map(|t| vec![vec![t[0], t[1], t[2]]]).collect();

    let doc = json!({
        "type": "CityJSON",
        "version": "1.1",
        "transform": {
            "scale": [1.0, 1.0, 1.0],
            "translate": [0.0, 0.0, 0.0],
        },
        "CityObjects": {
            object_type: {
                "type": object_type,
                "geometry": [{
                    "type": "MultiSurface",
                    "lod": "1",
                    "boundaries": boundaries,
                }]
            }
        },
        "vertices": vertices,
    });

    let text = serde_json::to_string_pretty(&doc).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    out.write_all(text.as_bytes())
}

use super::MeshSnapshot;
use crate::mesh::MeshStore;
use serde_json::{json, Value};
use std::io::{self, Write};

/// Writes one RFC 7946 `Point` feature per finite vertex, followed by one
/// `Polygon` feature per finite triangle, with elevation carried as the
/// third coordinate throughout.
pub fn write_geojson<W: Write>(mesh: &MeshStore, mut out: W) -> io::Result<()> {
    let snap = MeshSnapshot::build(mesh);

    let mut features: Vec<Value> = snap
        .points
        .iter()
        .map(|&(x, y, z)| {
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Point",
                    "coordinates": [x, y, z],
                }
            })
        })
        .collect();

    features.extend(snap.triangles.iter().map(|t| {
        let ring: Vec<[f64; 3]> = [t[0], t[1], t[2], t[0]]
            .iter()
            .map(|&i| {
                let (x, y, z) = snap.points[i];
                [x, y, z]
            })
            .collect();
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [ring],
            }
        })
    }));

    let fc = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    let text = serde_json::to_string_pretty(&fc).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    out.write_all(text.as_bytes())
}

use super::MeshSnapshot;
use crate::mesh::MeshStore;
use flatgeobuf::{ColumnType, FgbWriter, FgbWriterOptions, GeometryType};
use geozero::{ColumnValue, GeomProcessor, PropertyProcessor};
use std::io::{self, Write};

/// Writes the triangulation as a binary, little-endian FlatGeoBuf of
/// `Polygon` features, one per triangle, each carrying `z0`, `z1`, `z2`
/// double properties for the per-vertex elevations.
pub fn write_flatgeobuf<W: Write>(mesh: &MeshStore, mut out: W) -> io::Result<()> {
    let snap = MeshSnapshot::build(mesh);

    let mut fgb = FgbWriter::create_with_options(
        "triangles",
        GeometryType::Polygon,
        FgbWriterOptions::default(),
    )
    .map_err(to_io_err)?;
    fgb.add_column("z0", ColumnType::Double, |_, _| {});
    fgb.add_column("z1", ColumnType::Double, |_, _| {});
    fgb.add_column("z2", ColumnType::Double, |_, _| {});

    for t in &snap.triangles {
        let (x0, y0, z0) = snap.points[t[0]];
        let (x1, y1, z1) = snap.points[t[1]];
        let (x2, y2, z2) = snap.points[t[2]];

        fgb.add_feature_geom(GeometryType::Polygon, |fbb| {
            fbb.polygon_begin(false, 1, 0);
            fbb.ring_begin(4, 0);
            fbb.xy(x0, y0, 0).unwrap();
            fbb.xy(x1, y1, 1).unwrap();
            fbb.xy(x2, y2, 2).unwrap();
            fbb.xy(x0, y0, 3).unwrap();
            fbb.ring_end(0).unwrap();
            fbb.polygon_end(false, 0).unwrap();
        })
        .map_err(to_io_err)?;

        fgb.properties_begin().map_err(to_io_err)?;
        fgb.property(0, "z0", &ColumnValue::Double(z0)).map_err(to_io_err)?;
        fgb.property(1, "z1", &ColumnValue::Double(z1)).map_err(to_io_err)?;
        fgb.property(2, "z2", &ColumnValue::Double(z2)).map_err(to_io_err)?;
        fgb.properties_end().map_err(to_io_err)?;
    }

    let mut buf = Vec::new();
    fgb.write(&mut buf).map_err(to_io_err)?;
    out.write_all(&buf)
}

fn to_io_err<E: std::fmt::Display>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

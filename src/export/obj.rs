use super::MeshSnapshot;
use crate::mesh::MeshStore;
use std::io::{self, Write};

/// Writes the triangulation as a Wavefront OBJ mesh (1-indexed faces).
pub fn write_obj<W: Write>(mesh: &MeshStore, mut out: W) -> io::Result<()> {
    let snap = MeshSnapshot::build(mesh);
    for (x, y, z) in &snap.points {
        writeln!(out, "v {} {} {}", x, y, z)?;
    }
    for t in &snap.triangles {
        writeln!(out, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
    }
    Ok(())
}

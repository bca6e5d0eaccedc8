use super::MeshSnapshot;
use crate::mesh::MeshStore;
use std::io::{self, Write};

/// Writes the triangulation as an ASCII PLY mesh.
pub fn write_ply<W: Write>(mesh: &MeshStore, mut out: W) -> io::Result<()> {
    let snap = MeshSnapshot::build(mesh);
    writeln!(out, "ply")?;
    writeln!(out, "format ascii 1.0")?;
    writeln!(out, "element vertex {}", snap.points.len())?;
    writeln!(out, "property float x")?;
    writeln!(out, "property float y")?;
    writeln!(out, "property float z")?;
    writeln!(out, "element face {}", snap.triangles.len())?;
    writeln!(out, "property list uchar int vertex_indices")?;
    writeln!(out, "end_header")?;
    for (x, y, z) in &snap.points {
        writeln!(out, "{} {} {}", x, y, z)?;
    }
    for t in &snap.triangles {
        writeln!(out, "3 {} {} {}", t[0], t[1], t[2])?;
    }
    Ok(())
}

//! PLY (Stanford polygon) format support.
//!
//! Loading reads `vertex` elements (`x`, `y`, `z`, plus `red`, `green`,
//! `blue` when present) and `face` elements (`vertex_indices`). Every face
//! must be a triangle. Saving writes ASCII PLY, optionally with per-vertex
//! colors as `uchar` channels.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, Color, TriMesh, VertexId};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use cornice::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// println!("{} triangles", mesh.num_triangles());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read(&mut reader, path)
}

/// Read a mesh from PLY data; `path` is only used in error messages.
pub fn read<R: BufRead>(reader: &mut R, path: &Path) -> Result<TriMesh> {
    let load_error = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser.read_ply(reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Extract vertices
    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    let mut colors: Vec<Option<Color>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x")
            .ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y")
            .ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z")
            .ok_or_else(|| load_error("vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
        colors.push(get_color(vertex));
    }

    // Extract faces
    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        faces.push(indices);
    }

    debug!(
        "read {}: {} vertices, {} faces",
        path.display(),
        vertices.len(),
        faces.len()
    );

    let mut mesh = build_from_polygons(&vertices, &faces)?;
    for (i, color) in colors.into_iter().enumerate() {
        if let Some(color) = color {
            mesh.set_color(VertexId::new(i), color);
        }
    }
    Ok(mesh)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

/// Vertex color from `uchar` (0..=255) or float (0..=1) channels.
fn get_color(element: &DefaultElement) -> Option<Color> {
    let channel = |name: &str| match element.get(name)? {
        Property::UChar(v) => Some(*v as f64 / 255.0),
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        _ => None,
    };
    Some([channel("red")?, channel("green")?, channel("blue")?])
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format, positions only).
///
/// # Example
///
/// ```no_run
/// use cornice::io::ply;
///
/// let mesh = ply::load("model.ply").unwrap();
/// ply::save(&mesh, "output.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    write_file(mesh, path.as_ref(), false)
}

/// Save a mesh to a PLY file with per-vertex `red green blue` colors.
pub fn save_with_colors<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    write_file(mesh, path.as_ref(), true)
}

fn write_file(mesh: &TriMesh, path: &Path, colors: bool) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer, colors)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII PLY.
pub fn write<W: Write>(mesh: &TriMesh, writer: &mut W, colors: bool) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by cornice")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if colors {
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
    }
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for (i, v) in vertices.iter().enumerate() {
        if colors {
            let [r, g, b] = mesh.vertex(VertexId::new(i)).color.map(to_uchar);
            writeln!(writer, "{} {} {} {} {} {}", v.x, v.y, v.z, r, g, b)?;
        } else {
            writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
        }
    }

    // Write faces
    for f in &faces {
        writeln!(writer, "3 {} {} {}", f[0], f[1], f[2])?;
    }

    Ok(())
}

fn to_uchar(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TETRAHEDRON: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 4
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0.5 1 0
0.5 0.5 1
3 0 2 1
3 0 1 3
3 1 2 3
3 2 0 3
";

    fn read_str(data: &str) -> Result<TriMesh> {
        read(&mut Cursor::new(data.as_bytes()), Path::new("test.ply"))
    }

    #[test]
    fn test_read_tetrahedron() {
        let mesh = read_str(TETRAHEDRON).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.position(VertexId::new(3)), &Point3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_read_rejects_quads() {
        let data = TETRAHEDRON.replace("3 2 0 3", "4 2 0 3 1");
        let result = read_str(&data);
        assert!(matches!(
            result,
            Err(MeshError::NonTriangularFace { face: 3, count: 4 })
        ));
    }

    #[test]
    fn test_read_missing_faces() {
        let data = "ply
format ascii 1.0
element vertex 1
property float x
property float y
property float z
end_header
0 0 0
";
        assert!(matches!(read_str(data), Err(MeshError::LoadError { .. })));
    }

    #[test]
    fn test_write_then_read() {
        let mesh = read_str(TETRAHEDRON).unwrap();
        let mut buffer = Vec::new();
        write(&mesh, &mut buffer, false).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("ply\nformat ascii 1.0\n"));
        assert!(text.contains("element face 4\n"));

        let again = read_str(&text).unwrap();
        assert_eq!(to_face_vertex(&again), to_face_vertex(&mesh));
    }

    #[test]
    fn test_colors_survive() {
        let mut mesh = read_str(TETRAHEDRON).unwrap();
        mesh.set_color(VertexId::new(1), [1.0, 0.0, 0.0]);

        let mut buffer = Vec::new();
        write(&mesh, &mut buffer, true).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("property uchar red\n"));
        assert!(text.contains("1 0 0 255 0 0\n"));

        let again = read_str(&text).unwrap();
        assert_eq!(again.vertex(VertexId::new(1)).color, [1.0, 0.0, 0.0]);
        assert_eq!(to_uchar(again.vertex(VertexId::new(0)).color[0]), 153);
    }

    #[test]
    fn test_save_and_load_file() {
        let mesh = read_str(TETRAHEDRON).unwrap();
        let path = std::env::temp_dir().join("cornice_ply_roundtrip.ply");
        save(&mesh, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.num_triangles(), 4);
        let _ = std::fs::remove_file(&path);
    }
}

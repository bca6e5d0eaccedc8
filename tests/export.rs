use dtin::DT;

fn sample_mesh() -> DT {
    let mut dt = DT::new();
    dt.insert(&[
        [0.0, 0.0, 1.0],
        [10.0, 0.0, 2.0],
        [10.0, 10.0, 3.0],
        [0.0, 10.0, 4.0],
        [5.0, 5.0, 10.0],
    ])
    .unwrap();
    dt
}

#[test]
fn obj_writer_emits_one_line_per_vertex_and_face() {
    let dt = sample_mesh();
    let mut buf = Vec::new();
    dt.write_obj(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let v_lines = text.lines().filter(|l| l.starts_with("v ")).count();
    let f_lines = text.lines().filter(|l| l.starts_with("f ")).count();
    assert_eq!(v_lines, dt.number_of_vertices());
    assert_eq!(f_lines, dt.number_of_triangles());
}

#[test]
fn ply_writer_header_matches_element_counts() {
    let dt = sample_mesh();
    let mut buf = Vec::new();
    dt.write_ply(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    assert!(text.contains(&format!("element vertex {}", dt.number_of_vertices())));
    assert!(text.contains(&format!("element face {}", dt.number_of_triangles())));
}

#[test]
fn geojson_writer_emits_one_point_and_one_polygon_feature_per_vertex_and_triangle() {
    let dt = sample_mesh();
    let mut buf = Vec::new();
    dt.write_geojson(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(doc["type"], "FeatureCollection");
    let features = doc["features"].as_array().unwrap();
    assert_eq!(features.len(), dt.number_of_vertices() + dt.number_of_triangles());

    let points = features.iter().filter(|f| f["geometry"]["type"] == "Point").count();
    let polygons = features.iter().filter(|f| f["geometry"]["type"] == "Polygon").count();
    assert_eq!(points, dt.number_of_vertices());
    assert_eq!(polygons, dt.number_of_triangles());
}

#[test]
fn cityjson_writer_lists_every_triangle_as_a_boundary() {
    let dt = sample_mesh();
    let mut buf = Vec::new();
    dt.write_cityjson(&mut buf, None).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(doc["type"], "CityJSON");
    let object = &doc["CityObjects"]["myterrain"];
    assert_eq!(object["type"], "myterrain");
    let boundaries = object["geometry"][0]["boundaries"].as_array().unwrap();
    assert_eq!(boundaries.len(), dt.number_of_triangles());
}

#[test]
fn cityjson_writer_honors_caller_chosen_object_type() {
    let dt = sample_mesh();
    let mut buf = Vec::new();
    dt.write_cityjson(&mut buf, Some("BuildingPad")).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

    let object = &doc["CityObjects"]["BuildingPad"];
    assert_eq!(object["type"], "BuildingPad");
}

// Host-side tests for GLB import.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod animation {
        include!("../src/core/animation.rs");
    }
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod error {
        include!("../src/core/error.rs");
    }
    pub mod materials {
        include!("../src/core/materials.rs");
    }
    pub mod model {
        include!("../src/core/model.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
}

use draco_oxide::core::attribute::{AttributeDomain, AttributeType};
use draco_oxide::core::types::{ConfigType, NdVector};
use draco_oxide::encode::{encode_mesh, Config};
use draco_oxide::MeshBuilder;
use glam::{Vec2, Vec3};

use crate::core::animation::{AnimationMixer, Keyframes};
use crate::core::error::SceneError;
use crate::core::materials::{apply_overrides, lab_overrides, MaterialParams};
use crate::core::model::LabModel;
use crate::core::scene::lab_placement;

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Binary payload: one triangle with UVs and u16 indices, then a
/// two-key translation track.
fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for v in [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        bin.extend(v.iter().flat_map(|c| c.to_le_bytes()));
    }
    for uv in [[0.0_f32, 0.0], [1.0, 0.0], [0.0, 1.0]] {
        bin.extend(uv.iter().flat_map(|c| c.to_le_bytes()));
    }
    for i in [0_u16, 1, 2] {
        bin.extend(i.to_le_bytes());
    }
    bin.extend([0, 0]);
    for t in [0.0_f32, 1.0] {
        bin.extend(t.to_le_bytes());
    }
    for v in [[1.0_f32, 2.0, 3.0], [1.0, 4.0, 3.0]] {
        bin.extend(v.iter().flat_map(|c| c.to_le_bytes()));
    }
    assert_eq!(bin.len(), 100);
    bin
}

fn triangle_json(mode: u32, attributes: &str) -> String {
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [
    {{ "name": "Cube004", "mesh": 0, "translation": [1, 2, 3], "children": [1] }},
    {{ "name": "Frame" }}
  ],
  "meshes": [{{ "name": "Tri", "primitives": [{{ "attributes": {attributes}, "indices": 2, "mode": {mode} }}] }}],
  "animations": [{{
    "name": "Idle",
    "channels": [{{ "sampler": 0, "target": {{ "node": 0, "path": "translation" }} }}],
    "samplers": [{{ "input": 3, "output": 4 }}]
  }}],
  "buffers": [{{ "byteLength": 100 }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 24 }},
    {{ "buffer": 0, "byteOffset": 60, "byteLength": 6 }},
    {{ "buffer": 0, "byteOffset": 68, "byteLength": 8 }},
    {{ "buffer": 0, "byteOffset": 76, "byteLength": 24 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" }},
    {{ "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }},
    {{ "bufferView": 3, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0], "max": [1] }},
    {{ "bufferView": 4, "componentType": 5126, "count": 2, "type": "VEC3" }}
  ]
}}"#
    )
}

fn pad_to_four(mut bytes: Vec<u8>, fill: u8) -> Vec<u8> {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
    bytes
}

fn glb(json: &str, bin: Vec<u8>) -> Vec<u8> {
    let json = pad_to_four(json.as_bytes().to_vec(), b' ');
    let bin = pad_to_four(bin, 0);
    let total = 12 + 8 + json.len() + 8 + bin.len();

    let mut out = Vec::with_capacity(total);
    out.extend(GLB_MAGIC.to_le_bytes());
    out.extend(2_u32.to_le_bytes());
    out.extend((total as u32).to_le_bytes());
    out.extend((json.len() as u32).to_le_bytes());
    out.extend(CHUNK_JSON.to_le_bytes());
    out.extend(json);
    out.extend((bin.len() as u32).to_le_bytes());
    out.extend(CHUNK_BIN.to_le_bytes());
    out.extend(bin);
    out
}

const TRIANGLES: u32 = 4;
const LINES: u32 = 1;
const WITH_UVS: &str = r#"{ "POSITION": 0, "TEXCOORD_0": 1 }"#;

fn triangle_glb() -> Vec<u8> {
    glb(&triangle_json(TRIANGLES, WITH_UVS), triangle_bin())
}

#[test]
fn parses_nodes_and_hierarchy() {
    let model = LabModel::from_glb_unplaced(&triangle_glb()).unwrap();
    let graph = &model.graph;
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.roots, vec![0]);
    assert_eq!(graph.nodes[0].name, "Cube004");
    assert_eq!(graph.nodes[0].mesh, Some(0));
    assert_eq!(graph.nodes[0].children, vec![1]);
    assert_eq!(graph.nodes[0].local.translation, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(graph.nodes[1].parent, Some(0));
    assert_eq!(graph.nodes[1].mesh, None);
    assert!(graph
        .nodes
        .iter()
        .all(|n| n.material == MaterialParams::default()));
}

#[test]
fn parses_triangle_mesh() {
    let model = LabModel::from_glb_unplaced(&triangle_glb()).unwrap();
    assert_eq!(model.meshes.len(), 1);
    let mesh = &model.meshes[0];
    assert_eq!(mesh.name, "Tri");
    assert_eq!(mesh.primitives.len(), 1);

    let primitive = &mesh.primitives[0];
    assert_eq!(primitive.indices, vec![0, 1, 2]);
    assert_eq!(primitive.vertices.len(), 3);
    assert_eq!(primitive.vertices[1].position, [1.0, 0.0, 0.0]);
    assert_eq!(primitive.vertices[2].uv, [0.0, 1.0]);
    // Unskinned geometry carries zero joints and weights
    assert_eq!(primitive.vertices[0].joints, [0; 4]);
    assert_eq!(primitive.vertices[0].weights, [0.0; 4]);
}

#[test]
fn parses_translation_animation() {
    let model = LabModel::from_glb_unplaced(&triangle_glb()).unwrap();
    assert_eq!(model.animations.len(), 1);
    let clip = &model.animations[0];
    assert_eq!(clip.name, "Idle");
    assert_eq!(clip.duration, 1.0);
    assert_eq!(clip.channels.len(), 1);
    assert_eq!(clip.channels[0].node, 0);
    match &clip.channels[0].keyframes {
        Keyframes::Translation(values) => {
            assert_eq!(values, &vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 4.0, 3.0)]);
        }
        other => panic!("unexpected keyframes {other:?}"),
    }

    let mut graph = model.graph.clone();
    let mut mixer = AnimationMixer::new(clip.clone());
    mixer.update(0.5);
    mixer.apply(&mut graph);
    assert!((graph.nodes[0].local.translation.y - 3.0).abs() < 1e-5);
}

#[test]
fn placed_model_uses_lab_transform() {
    let placed = LabModel::from_glb(&triangle_glb()).unwrap();
    assert_eq!(placed.graph.root_transform, lab_placement());
    let unplaced = LabModel::from_glb_unplaced(&triangle_glb()).unwrap();
    assert_eq!(unplaced.graph.root_transform, glam::Mat4::IDENTITY);
}

#[test]
fn overrides_fail_when_model_lacks_a_named_node() {
    let mut model = LabModel::from_glb(&triangle_glb()).unwrap();
    let err = apply_overrides(&mut model.graph, &lab_overrides()).unwrap_err();
    assert!(matches!(err, SceneError::MissingNode { ref name } if name == "Cube137"));
    // Cube004 exists but was not touched
    assert!(!model.graph.nodes[0].material.transparent);
}

#[test]
fn rejects_non_triangle_primitives() {
    let bytes = glb(&triangle_json(LINES, WITH_UVS), triangle_bin());
    let err = LabModel::from_glb(&bytes).unwrap_err();
    assert!(matches!(err, SceneError::UnsupportedPrimitive { ref mesh, .. } if mesh == "Tri"));
}

#[test]
fn requires_uv_coordinates() {
    let bytes = glb(&triangle_json(TRIANGLES, r#"{ "POSITION": 0 }"#), triangle_bin());
    let err = LabModel::from_glb(&bytes).unwrap_err();
    assert!(matches!(
        err,
        SceneError::MissingAttribute {
            attribute: "TEXCOORD_0",
            ..
        }
    ));
}

#[test]
fn rejects_unknown_required_extension() {
    let json = triangle_json(TRIANGLES, WITH_UVS).replacen(
        "\"asset\"",
        "\"extensionsUsed\": [\"KHR_mesh_quantization\"],\n  \"extensionsRequired\": [\"KHR_mesh_quantization\"],\n  \"asset\"",
        1,
    );
    let err = LabModel::from_glb(&glb(&json, triangle_bin())).unwrap_err();
    assert!(
        matches!(err, SceneError::UnsupportedExtension { ref name } if name == "KHR_mesh_quantization")
    );
}

const QUAD: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];

/// A unit quad compressed with Draco. Its UVs equal the XY of each corner.
fn draco_quad() -> Vec<u8> {
    let mut builder = MeshBuilder::new();
    let position = builder.add_attribute::<NdVector<3, f32>, 3>(
        QUAD.iter().map(|&c| NdVector::from(c)).collect(),
        AttributeType::Position,
        AttributeDomain::Position,
        Vec::new(),
    );
    builder.add_attribute::<NdVector<2, f32>, 2>(
        QUAD.iter().map(|c| NdVector::from([c[0], c[1]])).collect(),
        AttributeType::TextureCoordinate,
        AttributeDomain::Position,
        vec![position],
    );
    builder.set_connectivity_attribute(vec![[0, 1, 2], [0, 2, 3]]);
    let mesh = builder.build().unwrap();

    let mut bytes = Vec::new();
    encode_mesh(mesh, &mut bytes, <Config as ConfigType>::default()).unwrap();
    bytes
}

fn draco_json(view: u32, byte_length: usize) -> String {
    format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "extensionsUsed": ["KHR_draco_mesh_compression"],
  "extensionsRequired": ["KHR_draco_mesh_compression"],
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "name": "Cube004", "mesh": 0 }}],
  "meshes": [{{ "name": "Quad", "primitives": [{{
    "attributes": {{ "POSITION": 0, "TEXCOORD_0": 1 }},
    "indices": 2,
    "mode": 4,
    "extensions": {{ "KHR_draco_mesh_compression": {{
      "bufferView": {view},
      "attributes": {{ "POSITION": 0, "TEXCOORD_0": 1 }}
    }} }}
  }}] }}],
  "buffers": [{{ "byteLength": {byte_length} }}],
  "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": {byte_length} }}],
  "accessors": [
    {{ "componentType": 5126, "count": 4, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }},
    {{ "componentType": 5126, "count": 4, "type": "VEC2" }},
    {{ "componentType": 5123, "count": 6, "type": "SCALAR" }}
  ]
}}"#
    )
}

#[test]
fn decodes_draco_compressed_primitive() {
    let compressed = draco_quad();
    let bytes = glb(&draco_json(0, compressed.len()), compressed);
    let model = LabModel::from_glb(&bytes).unwrap();

    let primitive = &model.meshes[0].primitives[0];
    assert_eq!(primitive.vertices.len(), 4);
    assert_eq!(primitive.indices.len(), 6);
    assert!(primitive.indices.iter().all(|&i| i < 4));

    // Point order is up to the codec; each corner keeps its own UV
    for corner in QUAD {
        let corner = Vec3::from(corner);
        let vertex = primitive
            .vertices
            .iter()
            .find(|v| Vec3::from(v.position).abs_diff_eq(corner, 1e-2))
            .unwrap();
        assert!(Vec2::from(vertex.uv).abs_diff_eq(corner.truncate(), 1e-2));
        assert_eq!(vertex.weights, [0.0; 4]);
    }

    // The two faces still cover the unit quad
    let area: f32 = primitive
        .indices
        .chunks_exact(3)
        .map(|t| {
            let [a, b, c] =
                [t[0], t[1], t[2]].map(|i| Vec3::from(primitive.vertices[i as usize].position));
            (b - a).cross(c - a).length() / 2.0
        })
        .sum();
    assert!((area - 1.0).abs() < 1e-2, "{area}");
}

#[test]
fn draco_buffer_view_must_exist() {
    let compressed = draco_quad();
    let bytes = glb(&draco_json(7, compressed.len()), compressed);
    let err = LabModel::from_glb(&bytes).unwrap_err();
    assert!(matches!(err, SceneError::MalformedDraco { ref mesh, .. } if mesh == "Quad"));
}

#[test]
fn corrupt_draco_stream_is_a_draco_error() {
    let garbage = b"DRACO but not really a mesh".to_vec();
    let bytes = glb(&draco_json(0, garbage.len()), garbage);
    let err = LabModel::from_glb(&bytes).unwrap_err();
    assert!(matches!(err, SceneError::Draco { ref mesh, .. } if mesh == "Quad"));
    assert!(err.to_string().starts_with("Draco mesh `Quad`: "));
}

#[test]
fn rejects_garbage_bytes() {
    let err = LabModel::from_glb(b"not a model").unwrap_err();
    assert!(matches!(err, SceneError::Gltf(_)));
    assert!(err.to_string().starts_with("glTF: "));
}

// Binary glTF (GLB) import for the lab model.
//
// Only what the viewer draws is kept: positions, the first UV set and skin
// weights per triangle primitive, the node hierarchy, skins and animations.
// Source materials are ignored; every mesh uses the baked texture.
// Primitives compressed with KHR_draco_mesh_compression are decoded in place.

use bytemuck::{Pod, Zeroable};
use draco_oxide_core::attribute::{Attribute as DracoAttribute, ComponentDataType};
use draco_oxide_core::types::PointIdx;
use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::json::Value;

use crate::core::animation::{AnimationClip, Channel, Interpolation, Keyframes};
use crate::core::error::SceneError;
use crate::core::materials::MaterialParams;
use crate::core::scene::{lab_placement, SceneGraph, SceneNode, Skin, Transform};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u32; 4],
    pub weights: [f32; 4],
}

#[derive(Clone, Debug, Default)]
pub struct MeshPrimitive {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<MeshPrimitive>,
}

#[derive(Clone, Debug, Default)]
pub struct LabModel {
    pub graph: SceneGraph,
    pub meshes: Vec<Mesh>,
    pub animations: Vec<AnimationClip>,
}

type Buffers = [gltf::buffer::Data];

pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

impl LabModel {
    /// Parse a GLB and place it with the lab's world transform.
    pub fn from_glb(bytes: &[u8]) -> Result<Self, SceneError> {
        let mut model = Self::from_glb_unplaced(bytes)?;
        model.graph.root_transform = lab_placement();
        Ok(model)
    }

    pub fn from_glb_unplaced(bytes: &[u8]) -> Result<Self, SceneError> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes)?;
        let document = accept_required_extensions(document)?;
        let buffers = gltf::import_buffers(&document, None, blob)?;

        let meshes = document
            .meshes()
            .map(|mesh| read_mesh(&mesh, &document, &buffers))
            .collect::<Result<Vec<_>, _>>()?;

        let nodes = read_nodes(&document);
        let skins = document.skins().map(|s| read_skin(&s, &buffers)).collect();

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(SceneError::NoScene)?;
        let roots = scene.nodes().map(|n| n.index()).collect();

        let animations = document
            .animations()
            .map(|a| read_animation(&a, &buffers))
            .collect();

        let model = Self {
            graph: SceneGraph {
                nodes,
                roots,
                skins,
                root_transform: Mat4::IDENTITY,
            },
            meshes,
            animations,
        };
        log::info!(
            "[scene] model parsed: nodes={} meshes={} skins={} animations={}",
            model.graph.nodes.len(),
            model.meshes.len(),
            model.graph.skins.len(),
            model.animations.len()
        );
        Ok(model)
    }
}

/// Validate the document with Draco treated as supported. Any other required
/// extension is refused.
fn accept_required_extensions(document: gltf::Document) -> Result<gltf::Document, SceneError> {
    let mut root = document.into_json();
    if let Some(name) = root
        .extensions_required
        .iter()
        .find(|name| name.as_str() != DRACO_EXTENSION)
    {
        return Err(SceneError::UnsupportedExtension { name: name.clone() });
    }
    if !root.extensions_required.is_empty() {
        log::info!("[scene] model uses {DRACO_EXTENSION}");
    }
    root.extensions_required.clear();
    Ok(gltf::Document::from_json(root)?)
}

fn read_nodes(document: &gltf::Document) -> Vec<SceneNode> {
    let mut nodes: Vec<SceneNode> = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = node.transform().decomposed();
            SceneNode {
                name: node
                    .name()
                    .map(String::from)
                    .unwrap_or_else(|| format!("node{}", node.index())),
                parent: None,
                children: node.children().map(|c| c.index()).collect(),
                local: Transform {
                    translation: Vec3::from(translation),
                    rotation: Quat::from_array(rotation),
                    scale: Vec3::from(scale),
                },
                mesh: node.mesh().map(|m| m.index()),
                skin: node.skin().map(|s| s.index()),
                material: MaterialParams::default(),
            }
        })
        .collect();
    for parent in 0..nodes.len() {
        for child in nodes[parent].children.clone() {
            if let Some(node) = nodes.get_mut(child) {
                node.parent = Some(parent);
            }
        }
    }
    nodes
}

fn read_mesh(
    mesh: &gltf::Mesh,
    document: &gltf::Document,
    buffers: &Buffers,
) -> Result<Mesh, SceneError> {
    let name = mesh
        .name()
        .map(String::from)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()));
    let mut primitives = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            return Err(SceneError::UnsupportedPrimitive {
                mesh: name,
                mode: format!("{:?}", primitive.mode()),
            });
        }
        let decoded = match primitive.extension_value(DRACO_EXTENSION) {
            Some(extension) => {
                read_draco_primitive(&name, &primitive, extension, document, buffers)?
            }
            None => read_primitive(&name, &primitive, buffers)?,
        };
        primitives.push(decoded);
    }

    Ok(Mesh { name, primitives })
}

fn read_primitive(
    name: &str,
    primitive: &gltf::Primitive,
    buffers: &Buffers,
) -> Result<MeshPrimitive, SceneError> {
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| missing(name, "POSITION"))?
        .collect();
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .ok_or_else(|| missing(name, "TEXCOORD_0"))?
        .into_f32()
        .collect();
    let joints: Option<Vec<[u32; 4]>> = reader
        .read_joints(0)
        .map(|j| j.into_u16().map(|j| j.map(u32::from)).collect());
    let weights: Option<Vec<[f32; 4]>> = reader.read_weights(0).map(|w| w.into_f32().collect());

    let vertices = assemble_vertices(&positions, &uvs, joints.as_deref(), weights.as_deref());
    let indices = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    Ok(MeshPrimitive { vertices, indices })
}

/// Decode a KHR_draco_mesh_compression primitive. The extension names the
/// compressed buffer view and maps each glTF semantic to a Draco attribute id.
fn read_draco_primitive(
    name: &str,
    primitive: &gltf::Primitive,
    extension: &Value,
    document: &gltf::Document,
    buffers: &Buffers,
) -> Result<MeshPrimitive, SceneError> {
    let malformed = |reason: &'static str| SceneError::MalformedDraco {
        mesh: name.to_string(),
        reason,
    };
    let view_index = extension
        .get("bufferView")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("missing bufferView"))?;
    let ids = extension
        .get("attributes")
        .filter(|ids| ids.is_object())
        .ok_or_else(|| malformed("missing attributes"))?;
    let view = document
        .views()
        .nth(view_index as usize)
        .ok_or_else(|| malformed("bufferView out of range"))?;
    let bytes = buffers
        .get(view.buffer().index())
        .and_then(|data| data.0.get(view.offset()..view.offset() + view.length()))
        .ok_or_else(|| malformed("bufferView outside its buffer"))?;

    let mesh = draco_oxide_decoder::decode_mesh(bytes).map_err(|source| SceneError::Draco {
        mesh: name.to_string(),
        source,
    })?;
    log::debug!(
        "[scene] draco primitive in `{name}`: faces={} attributes={}",
        mesh.faces.len(),
        mesh.attributes.len()
    );
    draco_primitive(name, primitive, &mesh, ids)
}

/// Flatten a decoded Draco mesh into vertices, one per Draco point. `ids`
/// maps glTF semantics to Draco attribute ids.
fn draco_primitive(
    name: &str,
    primitive: &gltf::Primitive,
    mesh: &draco_oxide_core::mesh::Mesh,
    ids: &Value,
) -> Result<MeshPrimitive, SceneError> {
    let attribute = |semantic: &'static str| draco_attribute(name, mesh, ids, semantic);
    // Integer UVs and weights are normalized in glTF
    let normalized = |semantic: &gltf::Semantic| {
        primitive
            .get(semantic)
            .map(|a| a.normalized())
            .unwrap_or(true)
    };

    let position = attribute("POSITION")?.ok_or_else(|| missing(name, "POSITION"))?;
    let uv = attribute("TEXCOORD_0")?.ok_or_else(|| missing(name, "TEXCOORD_0"))?;
    let positions = draco_values::<3>(name, position, false)?;
    let uvs = draco_values::<2>(name, uv, normalized(&gltf::Semantic::TexCoords(0)))?;
    let joints = attribute("JOINTS_0")?
        .map(|a| draco_values::<4>(name, a, false))
        .transpose()?
        .map(|j| j.into_iter().map(|j| j.map(|c| c as u32)).collect::<Vec<_>>());
    let weights = attribute("WEIGHTS_0")?
        .map(|a| draco_values::<4>(name, a, normalized(&gltf::Semantic::Weights(0))))
        .transpose()?;

    let vertices = assemble_vertices(&positions, &uvs, joints.as_deref(), weights.as_deref());
    let indices = mesh
        .faces
        .iter()
        .flat_map(|face| face.map(|p| usize::from(p) as u32))
        .collect();
    Ok(MeshPrimitive { vertices, indices })
}

/// The decoded attribute a glTF semantic points at, if the primitive maps it.
fn draco_attribute<'m>(
    name: &str,
    mesh: &'m draco_oxide_core::mesh::Mesh,
    ids: &Value,
    semantic: &str,
) -> Result<Option<&'m DracoAttribute>, SceneError> {
    let malformed = |reason: &'static str| SceneError::MalformedDraco {
        mesh: name.to_string(),
        reason,
    };
    let Some(id) = ids.get(semantic) else {
        return Ok(None);
    };
    let id = id
        .as_u64()
        .ok_or_else(|| malformed("attribute id is not an integer"))?;
    mesh.attributes
        .iter()
        .find(|a| a.get_id().as_usize() as u64 == id)
        .map(Some)
        .ok_or_else(|| malformed("attribute id not in the compressed stream"))
}

/// Per-point values of a decoded attribute, widened to f32.
fn draco_values<const N: usize>(
    name: &str,
    attribute: &DracoAttribute,
    normalize: bool,
) -> Result<Vec<[f32; N]>, SceneError> {
    let ty = attribute.get_component_type();
    let width = ty.size();
    let components = attribute.get_num_components();
    if width == 0 || components < N {
        return Err(SceneError::MalformedDraco {
            mesh: name.to_string(),
            reason: "attribute has too few components",
        });
    }
    let stride = width * components;
    let bytes = attribute.get_data_as_bytes();

    (0..attribute.len())
        .map(|point| -> Result<[f32; N], SceneError> {
            let value = usize::from(attribute.get_unique_val_idx(PointIdx::from(point)));
            let mut out = [0.0; N];
            for (c, slot) in out.iter_mut().enumerate() {
                let start = value * stride + c * width;
                *slot = bytes
                    .get(start..start + width)
                    .and_then(|raw| component_as_f32(raw, ty, normalize))
                    .ok_or_else(|| SceneError::MalformedDraco {
                        mesh: name.to_string(),
                        reason: "attribute value out of range",
                    })?;
            }
            Ok(out)
        })
        .collect()
}

fn component_as_f32(raw: &[u8], ty: ComponentDataType, normalize: bool) -> Option<f32> {
    let read = |max: f32, value: f32| {
        if normalize {
            (value / max).max(-1.0)
        } else {
            value
        }
    };
    Some(match ty {
        ComponentDataType::F32 => bytemuck::pod_read_unaligned::<f32>(raw),
        ComponentDataType::F64 => bytemuck::pod_read_unaligned::<f64>(raw) as f32,
        ComponentDataType::U8 => read(255.0, f32::from(raw[0])),
        ComponentDataType::I8 => read(127.0, f32::from(raw[0] as i8)),
        ComponentDataType::U16 => read(65535.0, f32::from(bytemuck::pod_read_unaligned::<u16>(raw))),
        ComponentDataType::I16 => read(32767.0, f32::from(bytemuck::pod_read_unaligned::<i16>(raw))),
        ComponentDataType::U32 => bytemuck::pod_read_unaligned::<u32>(raw) as f32,
        ComponentDataType::I32 => bytemuck::pod_read_unaligned::<i32>(raw) as f32,
        ComponentDataType::U64 | ComponentDataType::I64 | ComponentDataType::Invalid => {
            return None
        }
    })
}

fn missing(mesh: &str, attribute: &'static str) -> SceneError {
    SceneError::MissingAttribute {
        mesh: mesh.to_string(),
        attribute,
    }
}

fn assemble_vertices(
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    joints: Option<&[[u32; 4]]>,
    weights: Option<&[[f32; 4]]>,
) -> Vec<Vertex> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Vertex {
            position,
            uv: uvs.get(i).copied().unwrap_or_default(),
            joints: joints.and_then(|j| j.get(i)).copied().unwrap_or_default(),
            weights: weights.and_then(|w| w.get(i)).copied().unwrap_or_default(),
        })
        .collect()
}

fn read_skin(skin: &gltf::Skin, buffers: &Buffers) -> Skin {
    let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
    let reader = skin.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
    let inverse_bind = match reader.read_inverse_bind_matrices() {
        Some(matrices) => matrices.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
        None => vec![Mat4::IDENTITY; joints.len()],
    };
    Skin {
        joints,
        inverse_bind,
    }
}

fn read_animation(animation: &gltf::Animation, buffers: &Buffers) -> AnimationClip {
    let name = animation
        .name()
        .map(String::from)
        .unwrap_or_else(|| format!("animation{}", animation.index()));
    let mut channels = Vec::new();

    for channel in animation.channels() {
        let reader = channel.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };
        let keyframes = match reader.read_outputs() {
            Some(ReadOutputs::Translations(v)) => Keyframes::Translation(key_values(
                v.map(Vec3::from).collect(),
                interpolation,
            )),
            Some(ReadOutputs::Scales(v)) => {
                Keyframes::Scale(key_values(v.map(Vec3::from).collect(), interpolation))
            }
            Some(ReadOutputs::Rotations(v)) => Keyframes::Rotation(key_values(
                v.into_f32().map(Quat::from_array).collect(),
                interpolation,
            )),
            // Morph targets are not drawn
            Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
        };
        channels.push(Channel {
            node: channel.target().node().index(),
            times,
            keyframes,
            interpolation,
        });
    }

    AnimationClip::new(name, channels)
}

/// Cubic-spline samplers store (in-tangent, value, out-tangent) per key; keep the values.
fn key_values<T: Copy>(values: Vec<T>, interpolation: Interpolation) -> Vec<T> {
    match interpolation {
        Interpolation::CubicSpline => values.chunks_exact(3).map(|c| c[1]).collect(),
        Interpolation::Linear | Interpolation::Step => values,
    }
}

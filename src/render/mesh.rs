use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::core::model::LabModel;
use crate::core::scene::back_to_front;
use crate::core::texture::BakedTexture;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct NodeUniform {
    model: [[f32; 4]; 4],
    opacity: f32,
    skinned: u32,
    _pad: [u32; 2],
}

pub(crate) struct GpuPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

/// One drawable scene node with its own uniforms and joint palette.
pub(crate) struct NodeDraw {
    node: usize,
    mesh: usize,
    skin: Option<usize>,
    opacity: f32,
    pub(crate) transparent: bool,
    uniform_buffer: wgpu::Buffer,
    joint_buffer: wgpu::Buffer,
    joint_capacity: usize,
    bind_group: wgpu::BindGroup,
}

/// GPU copy of the loaded lab: mesh buffers, the baked texture and per-node draws.
pub(crate) struct GpuScene {
    meshes: Vec<Vec<GpuPrimitive>>,
    draws: Vec<NodeDraw>,
    _texture: wgpu::Texture,
    texture_bg: wgpu::BindGroup,
}

pub(crate) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &BakedTexture,
) -> wgpu::Texture {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("baked_texture"),
        size: wgpu::Extent3d {
            width: texture.width().max(1),
            height: texture.height().max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: texture.levels.len().max(1) as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (mip, level) in texture.levels.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &tex,
                mip_level: mip as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &level.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * level.width),
                rows_per_image: Some(level.height),
            },
            wgpu::Extent3d {
                width: level.width,
                height: level.height,
                depth_or_array_layers: 1,
            },
        );
    }
    tex
}

impl GpuScene {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_bgl: &wgpu::BindGroupLayout,
        node_bgl: &wgpu::BindGroupLayout,
        model: &LabModel,
        texture: &BakedTexture,
    ) -> Self {
        let meshes: Vec<Vec<GpuPrimitive>> = model
            .meshes
            .iter()
            .map(|mesh| {
                mesh.primitives
                    .iter()
                    .enumerate()
                    .map(|(i, primitive)| GpuPrimitive {
                        vertex_buffer: device.create_buffer_init(
                            &wgpu::util::BufferInitDescriptor {
                                label: Some(&format!("vb {} #{}", mesh.name, i)),
                                contents: bytemuck::cast_slice(&primitive.vertices),
                                usage: wgpu::BufferUsages::VERTEX,
                            },
                        ),
                        index_buffer: device.create_buffer_init(
                            &wgpu::util::BufferInitDescriptor {
                                label: Some(&format!("ib {} #{}", mesh.name, i)),
                                contents: bytemuck::cast_slice(&primitive.indices),
                                usage: wgpu::BufferUsages::INDEX,
                            },
                        ),
                        num_indices: primitive.indices.len() as u32,
                    })
                    .collect()
            })
            .collect();

        let baked = upload_texture(device, queue, texture);
        let baked_view = baked.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("baked_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("baked_bg"),
            layout: texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&baked_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let draws = model
            .graph
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let mesh = node.mesh?;
                let joint_capacity = node
                    .skin
                    .and_then(|s| model.graph.skins.get(s))
                    .map(|s| s.joints.len())
                    .unwrap_or(0)
                    .max(1);
                let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("node {}", node.name)),
                    size: std::mem::size_of::<NodeUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let joint_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("joints {}", node.name)),
                    contents: bytemuck::cast_slice(&vec![Mat4::IDENTITY; joint_capacity]),
                    usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("node_bg"),
                    layout: node_bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: joint_buffer.as_entire_binding(),
                        },
                    ],
                });
                Some(NodeDraw {
                    node: index,
                    mesh,
                    skin: node.skin,
                    opacity: node.material.opacity,
                    transparent: node.material.draw_state().blend,
                    uniform_buffer,
                    joint_buffer,
                    joint_capacity,
                    bind_group,
                })
            })
            .collect::<Vec<_>>();

        log::info!(
            "[gpu] scene uploaded: draws={} transparent={}",
            draws.len(),
            draws.iter().filter(|d| d.transparent).count()
        );

        Self {
            meshes,
            draws,
            _texture: baked,
            texture_bg,
        }
    }

    /// Push the current pose of every drawn node to the GPU.
    /// Upload node transforms and joint palettes. `world` comes from one
    /// `world_matrices` walk per frame.
    pub(crate) fn write_pose(&self, queue: &wgpu::Queue, model: &LabModel, world: &[Mat4]) {
        for draw in &self.draws {
            let model_matrix = world.get(draw.node).copied().unwrap_or(Mat4::IDENTITY);
            let uniform = NodeUniform {
                model: model_matrix.to_cols_array_2d(),
                opacity: draw.opacity,
                skinned: draw.skin.is_some() as u32,
                _pad: [0; 2],
            };
            queue.write_buffer(&draw.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
            if let Some(skin) = draw.skin {
                let mut joints = model.graph.joint_matrices(skin, world, draw.node);
                joints.truncate(draw.joint_capacity);
                if joints.is_empty() {
                    continue;
                }
                queue.write_buffer(&draw.joint_buffer, 0, bytemuck::cast_slice(&joints));
            }
        }
    }

    /// Indices of transparent draws, farthest from the eye first.
    pub(crate) fn transparent_order(&self, world: &[Mat4], eye: Vec3) -> Vec<usize> {
        let transparent = self
            .draws
            .iter()
            .enumerate()
            .filter(|(_, d)| d.transparent)
            .map(|(i, d)| (i, d.node));
        back_to_front(transparent, world, eye)
    }

    pub(crate) fn draw_opaque(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(1, &self.texture_bg, &[]);
        for draw in self.draws.iter().filter(|d| !d.transparent) {
            self.draw_node(rpass, draw);
        }
    }

    pub(crate) fn draw_transparent(&self, rpass: &mut wgpu::RenderPass<'_>, order: &[usize]) {
        rpass.set_bind_group(1, &self.texture_bg, &[]);
        for &i in order {
            if let Some(draw) = self.draws.get(i) {
                self.draw_node(rpass, draw);
            }
        }
    }

    fn draw_node(&self, rpass: &mut wgpu::RenderPass<'_>, draw: &NodeDraw) {
        let Some(primitives) = self.meshes.get(draw.mesh) else {
            return;
        };
        rpass.set_bind_group(2, &draw.bind_group, &[]);
        for primitive in primitives {
            rpass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
            rpass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..primitive.num_indices, 0, 0..1);
        }
    }
}

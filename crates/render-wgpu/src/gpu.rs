use bytemuck::{Pod, Zeroable};
use gridscene_common::ObjectKind;
use gridscene_render::{FrameSink, ProjectionConfig, SubmitError, batch_draws};
use gridscene_scene::{FLOATS_PER_SLOT, RenderSnapshot};
use wgpu::util::DeviceExt;

use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    base_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Base mesh for a triangle: one upright face in the XY plane.
fn triangle_mesh() -> Vec<Vertex> {
    let n = [0.0, 0.0, 1.0];
    vec![
        Vertex { position: [0.0, 0.5, 0.0], normal: n },
        Vertex { position: [-0.5, -0.5, 0.0], normal: n },
        Vertex { position: [0.5, -0.5, 0.0], normal: n },
    ]
}

/// Base mesh for a quad: a unit floor tile in the XZ plane, two triangles.
fn quad_mesh() -> Vec<Vertex> {
    let n = [0.0, 1.0, 0.0];
    let (a, b, c, d) = (
        [-0.5, 0.0, -0.5],
        [-0.5, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [0.5, 0.0, -0.5],
    );
    vec![
        Vertex { position: a, normal: n },
        Vertex { position: b, normal: n },
        Vertex { position: c, normal: n },
        Vertex { position: c, normal: n },
        Vertex { position: d, normal: n },
        Vertex { position: a, normal: n },
    ]
}

/// Flat base color standing in for a full material; textures and samplers
/// are an asset-loader concern outside this crate.
fn material_color(kind: ObjectKind) -> [f32; 4] {
    match kind {
        ObjectKind::Triangle => [0.8, 0.3, 0.3, 1.0],
        ObjectKind::Quad => [0.3, 0.65, 0.3, 1.0],
    }
}

/// GPU-side resources for one object kind: its base mesh and the bind
/// group carrying its material alongside the shared buffers.
struct KindResources {
    kind: ObjectKind,
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
    bind_group: wgpu::BindGroup,
}

/// wgpu frame sink: owns the surface, the pipeline, the shared camera
/// uniform and transform storage buffers, and per-kind mesh/material
/// resources. One `submit` per tick.
pub struct GpuFrameSink {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    transform_buffer: wgpu::Buffer,
    capacity_slots: usize,
    kinds: Vec<KindResources>,
    depth_view: wgpu::TextureView,
}

impl GpuFrameSink {
    /// Build all pipeline state. `capacity_slots` sizes the transform
    /// storage buffer and must match the scene arena's capacity.
    pub fn new(
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        capacity_slots: usize,
    ) -> Self {
        surface.configure(&device, &config);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transform_buffer"),
            size: (capacity_slots * FLOATS_PER_SLOT * std::mem::size_of::<f32>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        // One vertex buffer, material buffer, and bind group per kind,
        // built in the fixed kind order.
        let kinds = ObjectKind::ORDERED
            .into_iter()
            .map(|kind| {
                let vertices = match kind {
                    ObjectKind::Triangle => triangle_mesh(),
                    ObjectKind::Quad => quad_mesh(),
                };
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("kind_vertex_buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let material_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("kind_material_buffer"),
                        contents: bytemuck::bytes_of(&MaterialUniform {
                            base_color: material_color(kind),
                        }),
                        usage: wgpu::BufferUsages::UNIFORM,
                    });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("kind_bind_group"),
                    layout: &bind_group_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: camera_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: transform_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: material_buffer.as_entire_binding(),
                        },
                    ],
                });
                KindResources {
                    kind,
                    vertex_buffer,
                    vertex_count: vertices.len() as u32,
                    bind_group,
                }
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Triangles and floor quads are visible from both sides.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = Self::create_depth_texture(&device, config.width, config.height);

        tracing::debug!(capacity_slots, "gpu frame sink ready");

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            camera_buffer,
            transform_buffer,
            capacity_slots,
            kinds,
            depth_view,
        }
    }

    /// Reconfigure the surface and depth buffer for a new window size.
    /// The projection stays fixed; only presentation resources change.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn resources_for(&self, kind: ObjectKind) -> Option<&KindResources> {
        self.kinds.iter().find(|r| r.kind == kind)
    }
}

impl FrameSink for GpuFrameSink {
    fn submit(
        &mut self,
        snapshot: &RenderSnapshot<'_>,
        projection: &ProjectionConfig,
    ) -> Result<(), SubmitError> {
        debug_assert!(
            snapshot.transforms.len() <= self.capacity_slots * FLOATS_PER_SLOT,
            "snapshot exceeds transform buffer capacity"
        );

        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view: snapshot.view.to_cols_array_2d(),
                projection: projection.matrix().to_cols_array_2d(),
            }),
        );
        if !snapshot.transforms.is_empty() {
            self.queue.write_buffer(
                &self.transform_buffer,
                0,
                bytemuck::cast_slice(snapshot.transforms),
            );
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(SubmitError::SurfaceUnavailable(
                    "surface lost or outdated, reconfigured".into(),
                ));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(SubmitError::DeviceLost("surface out of memory".into()));
            }
            Err(e) => return Err(SubmitError::SurfaceUnavailable(e.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.5,
                            g: 0.0,
                            b: 0.25,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);

            // Same layout table the scene packed from, same fixed order.
            for draw in batch_draws(snapshot.layout) {
                let Some(resources) = self.resources_for(draw.kind) else {
                    continue;
                };
                debug_assert_eq!(resources.vertex_count, draw.vertex_count);
                pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
                pass.set_bind_group(0, &resources.bind_group, &[]);
                pass.draw(
                    0..draw.vertex_count,
                    draw.first_instance..draw.first_instance + draw.instance_count,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_vertex_counts_match_kind_contract() {
        assert_eq!(
            triangle_mesh().len() as u32,
            ObjectKind::Triangle.vertices_per_instance()
        );
        assert_eq!(
            quad_mesh().len() as u32,
            ObjectKind::Quad.vertices_per_instance()
        );
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn camera_uniform_is_two_matrices() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
    }

    #[test]
    fn quad_mesh_lies_in_the_floor_plane() {
        assert!(quad_mesh().iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn each_kind_has_a_material_color() {
        for kind in ObjectKind::ORDERED {
            let c = material_color(kind);
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

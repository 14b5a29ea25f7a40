use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use mascot_geometry::Topology;
use mascot_render::OrbitCamera;
use mascot_scene::{NodeId, SceneGraph};
use wgpu::util::DeviceExt;

use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SolidVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct FlatVertex {
    position: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    // Only .x is meaningful; padded to vec4 for layout simplicity.
    emissive: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4], emissive: f32) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color,
            emissive: [emissive, 0.0, 0.0, 0.0],
        }
    }
}

/// Geometry uploaded for one scene node.
struct GpuShape {
    node: NodeId,
    topology: Topology,
    vertex_buffer: wgpu::Buffer,
    /// Present for indexed (solid) geometry only.
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

/// wgpu renderer over a built scene graph.
///
/// Construction uploads one vertex/index buffer per shape node; the scene
/// structure is static so the upload never repeats. `render` rewrites the
/// per-shape instance slot from the node's current global transform.
pub struct WgpuSceneRenderer {
    solid_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    shapes: Vec<GpuShape>,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    clear_color: wgpu::Color,
}

impl WgpuSceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        scene: &SceneGraph,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &wgpu::vertex_attr_array![
                2 => Float32x4,
                3 => Float32x4,
                4 => Float32x4,
                5 => Float32x4,
                6 => Float32x4,
                7 => Float32x4,
            ],
        };

        let solid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("solid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SOLID_SHADER.into()),
        });
        let flat_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::FLAT_SHADER.into()),
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        };

        let solid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("solid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &solid_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SolidVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    instance_layout.clone(),
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &solid_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let make_flat_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &flat_shader,
                    entry_point: Some("vs_flat"),
                    compilation_options: Default::default(),
                    buffers: &[
                        wgpu::VertexBufferLayout {
                            array_stride: std::mem::size_of::<FlatVertex>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                        },
                        instance_layout.clone(),
                    ],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &flat_shader,
                    entry_point: Some("fs_flat"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil.clone()),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };
        let line_pipeline = make_flat_pipeline("line_pipeline", wgpu::PrimitiveTopology::LineList);
        let point_pipeline =
            make_flat_pipeline("point_pipeline", wgpu::PrimitiveTopology::PointList);

        let shapes = upload_shapes(device, scene);

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (shapes.len().max(1) as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = create_depth_texture(device, width, height);

        tracing::info!(shapes = shapes.len(), "gpu scene renderer ready");

        Self {
            solid_pipeline,
            line_pipeline,
            point_pipeline,
            uniform_buffer,
            uniform_bind_group,
            shapes,
            instance_buffer,
            depth_texture,
            surface_format,
            clear_color: wgpu::Color {
                r: 0.06,
                g: 0.05,
                b: 0.1,
                a: 1.0,
            },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame of the scene. Rendering an empty scene is valid
    /// and just clears.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &SceneGraph,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
            }),
        );

        // One instance slot per uploaded shape, in upload order.
        let instances: Vec<InstanceData> = self
            .shapes
            .iter()
            .map(|gpu_shape| {
                let model = scene.global(gpu_shape.node).unwrap_or(Mat4::IDENTITY);
                let (color, emissive) = scene
                    .shape(gpu_shape.node)
                    .map(|s| (s.material.base_color, s.material.emissive))
                    .unwrap_or(([1.0; 4], 0.0));
                InstanceData::new(model, color, emissive)
            })
            .collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            for (slot, gpu_shape) in self.shapes.iter().enumerate() {
                let pipeline = match gpu_shape.topology {
                    Topology::Triangles => &self.solid_pipeline,
                    Topology::Lines => &self.line_pipeline,
                    Topology::Points => &self.point_pipeline,
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, gpu_shape.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                let instance_range = slot as u32..slot as u32 + 1;
                match &gpu_shape.index_buffer {
                    Some(index_buffer) => {
                        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..gpu_shape.draw_count, 0, instance_range);
                    }
                    None => {
                        pass.draw(0..gpu_shape.draw_count, instance_range);
                    }
                }
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn upload_shapes(device: &wgpu::Device, scene: &SceneGraph) -> Vec<GpuShape> {
    let mut shapes = Vec::new();
    for (node, shape, _) in scene.shapes() {
        let gpu_shape = match shape.geometry.topology() {
            Topology::Triangles => {
                let Some(mesh) = shape.geometry.build_mesh() else {
                    continue;
                };
                let vertices: Vec<SolidVertex> = mesh
                    .positions
                    .iter()
                    .zip(&mesh.normals)
                    .map(|(p, n)| SolidVertex {
                        position: *p,
                        normal: *n,
                    })
                    .collect();
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("solid_vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                let index_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("solid_indices"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                GpuShape {
                    node,
                    topology: Topology::Triangles,
                    vertex_buffer,
                    index_buffer: Some(index_buffer),
                    draw_count: mesh.indices.len() as u32,
                }
            }
            Topology::Lines => {
                let Some(wireframe) = shape.geometry.build_wireframe() else {
                    continue;
                };
                // Expand the edge list into a plain line-list vertex run.
                let vertices: Vec<FlatVertex> = wireframe
                    .edges
                    .iter()
                    .flat_map(|[a, b]| {
                        [
                            FlatVertex {
                                position: wireframe.vertices[*a as usize].to_array(),
                            },
                            FlatVertex {
                                position: wireframe.vertices[*b as usize].to_array(),
                            },
                        ]
                    })
                    .collect();
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("line_vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                GpuShape {
                    node,
                    topology: Topology::Lines,
                    vertex_buffer,
                    index_buffer: None,
                    draw_count: vertices.len() as u32,
                }
            }
            Topology::Points => {
                let Some(points) = shape.geometry.build_particles() else {
                    continue;
                };
                let vertices: Vec<FlatVertex> = points
                    .iter()
                    .map(|p| FlatVertex {
                        position: p.to_array(),
                    })
                    .collect();
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("point_vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                GpuShape {
                    node,
                    topology: Topology::Points,
                    vertex_buffer,
                    index_buffer: None,
                    draw_count: vertices.len() as u32,
                }
            }
        };
        shapes.push(gpu_shape);
    }
    shapes
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

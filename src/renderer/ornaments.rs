use std::cmp::Ordering;
use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::geometry::{self, MeshData};
use crate::scene::{Material, Scene};

use super::DEPTH_FORMAT;

const GLOW_RINGS: u32 = 32;
const GLOW_SEGMENTS: u32 = 32;

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct ObjectUniforms {
    model: Mat4,
    color: Vec4,
    material: Vec4,
}

impl ObjectUniforms {
    fn new(material: &Material, model: Mat4) -> Self {
        let unlit = if material.unlit { 1.0 } else { 0.0 };
        Self {
            model,
            color: material.color.extend(material.opacity),
            material: Vec4::new(material.roughness, material.metalness, unlit, 0.0),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

/// GPU residence of a single mesh: geometry buffers plus its per-object
/// uniform slot. Dropping one releases everything it holds.
struct OrnamentBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl OrnamentBuffers {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &MeshData,
    ) -> Self {
        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub struct OrnamentPass {
    pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    batch: Vec<OrnamentBuffers>,
    glow: OrnamentBuffers,
    order: Vec<usize>,
}

impl OrnamentPass {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        globals_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ornament shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ornaments.wgsl").into()),
        });
        let object_layout = Self::make_object_layout(device);
        let pipeline = Self::make_pipeline(
            device,
            &shader,
            globals_layout,
            &object_layout,
            color_format,
            true,
            "Ornament pipeline",
        );
        // The glow shell is seen through everything behind it, so it must
        // not occlude in the depth buffer.
        let glow_pipeline = Self::make_pipeline(
            device,
            &shader,
            globals_layout,
            &object_layout,
            color_format,
            false,
            "Glow pipeline",
        );
        let glow = Self::make_glow(device, &object_layout, scene);

        let mut pass = Self {
            pipeline,
            glow_pipeline,
            object_layout,
            batch: Vec::new(),
            glow,
            order: Vec::new(),
        };
        pass.rebuild(device, scene);
        pass
    }

    /// Upload the scene's current generation, dropping the previous batch
    /// first so two full generations never coexist on the device.
    pub fn rebuild(&mut self, device: &wgpu::Device, scene: &Scene) {
        self.batch.clear();
        self.order.clear();
        for ornament in &scene.ornaments {
            let mesh = geometry::generate(&ornament.shape);
            self.batch
                .push(OrnamentBuffers::new(device, &self.object_layout, "Ornament", &mesh));
        }
        self.glow = Self::make_glow(device, &self.object_layout, scene);
    }

    pub fn prepare(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let rig = scene.rig.matrix();
        for (buffers, ornament) in self.batch.iter().zip(&scene.ornaments) {
            let uniforms = ObjectUniforms::new(&ornament.material, rig * ornament.model_matrix());
            queue.write_buffer(&buffers.uniform_buffer, 0, bytes_of(&uniforms));
        }
        let glow_uniforms = ObjectUniforms::new(&scene.glow.material, rig);
        queue.write_buffer(&self.glow.uniform_buffer, 0, bytes_of(&glow_uniforms));

        // Translucent meshes draw farthest first.
        let view = scene.camera.view_matrix();
        let depths: Vec<f32> = scene
            .ornaments
            .iter()
            .map(|o| (view * rig * o.position.extend(1.0)).z)
            .collect();
        self.order = (0..self.batch.len().min(depths.len())).collect();
        self.order
            .sort_by(|&a, &b| depths[a].partial_cmp(&depths[b]).unwrap_or(Ordering::Equal));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.glow_pipeline);
        self.glow.draw(render_pass);
        render_pass.set_pipeline(&self.pipeline);
        for &index in &self.order {
            self.batch[index].draw(render_pass);
        }
    }

    fn make_glow(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> OrnamentBuffers {
        let mesh = geometry::uv_sphere(scene.glow.radius, GLOW_RINGS, GLOW_SEGMENTS).inverted();
        OrnamentBuffers::new(device, layout, "Glow", &mesh)
    }

    fn make_object_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<ObjectUniforms>() as _),
                },
                count: None,
            }],
        })
    }

    fn make_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        globals_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        depth_write: bool,
        label: &str,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[globals_layout, object_layout],
            push_constant_ranges: &[],
        });
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vertex>() as _,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRIBUTES,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

//! Point-sprite pass.
//!
//! One storage buffer of [`PointInstance`], one bind group, one pipeline,
//! and a `draw(0..6, 0..count)` call. Two upload paths:
//!
//! - [`PointsPass::replace`] destroys the previous buffer and bind group
//!   and allocates new ones sized to the cloud. Used when the galaxy is
//!   regenerated.
//! - [`PointsPass::write`] overwrites the existing buffer, growing it only
//!   if needed. Used for the per-frame particle-field animation.

use bytemuck::{Pod, Zeroable};

use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, ShaderError};
use crate::point_cloud::PointCloud;

const VERTICES_PER_POINT: u32 = 6;
const LABEL: &str = "Points";
const SHADER: &str = include_str!("../../assets/shaders/points.wgsl");

/// Per-point GPU record. Matches `PointInstance` in `points.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// xyz = world position, w = sprite size in world units.
    pub position: [f32; 4],
    /// rgb = color, a = 1.
    pub color: [f32; 4],
}

/// Interleave a cloud into GPU records, reusing `out`'s allocation.
///
/// Cloud colors are linear light, which an sRGB target takes as is. With
/// `encode_srgb` set, they are encoded for a target that stores raw values.
pub fn fill_instances(
    cloud: &PointCloud,
    size: f32,
    encode_srgb: bool,
    out: &mut Vec<PointInstance>,
) {
    out.clear();
    out.reserve(cloud.len());
    out.extend(cloud.iter().map(|(p, c)| {
        let c = if encode_srgb { c.to_srgb() } else { c };
        PointInstance {
            position: [p.x, p.y, p.z, size],
            color: [c.r, c.g, c.b, 1.0],
        }
    }));
}

struct PointBuffers {
    instances: TypedBuffer<PointInstance>,
    bind_group: wgpu::BindGroup,
}

/// Pipeline plus the currently uploaded cloud.
pub struct PointsPass {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    buffers: Option<PointBuffers>,
    scratch: Vec<PointInstance>,
    encode_srgb: bool,
    instance_count: u32,
}

impl PointsPass {
    /// Build the pipeline against the camera layout (group 0).
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if `points.wgsl` fails to compose.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        composer: &mut ShaderComposer,
    ) -> Result<Self, ShaderError> {
        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Points Layout"),
                entries: &[pipeline_helpers::vertex_storage_buffer(0)],
            },
        );
        let pipeline =
            Self::create_pipeline(context, camera_layout, &layout, composer)?;

        Ok(Self {
            pipeline,
            layout,
            buffers: None,
            scratch: Vec::new(),
            encode_srgb: !context.is_srgb(),
            instance_count: 0,
        })
    }

    fn create_pipeline(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        points_layout: &wgpu::BindGroupLayout,
        composer: &mut ShaderComposer,
    ) -> Result<wgpu::RenderPipeline, ShaderError> {
        let shader = composer.compose(
            &context.device,
            "Points Shader",
            SHADER,
            "points.wgsl",
        )?;

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Points Pipeline Layout"),
                bind_group_layouts: &[camera_layout, points_layout],
                push_constant_ranges: &[],
            },
        );

        Ok(context
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Points Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &pipeline_helpers::additive_target(
                        context.format(),
                    ),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                // Sprites blend additively and never occlude each other.
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            }))
    }

    fn create_bind_group(
        &self,
        device: &wgpu::Device,
        instances: &TypedBuffer<PointInstance>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points Bind Group"),
            layout: &self.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: instances.buffer().as_entire_binding(),
            }],
        })
    }

    /// Release the current buffer and bind group, then upload `cloud` into
    /// a fresh allocation of exactly its size.
    pub fn replace(
        &mut self,
        context: &RenderContext,
        cloud: &PointCloud,
        size: f32,
    ) {
        if let Some(old) = self.buffers.take() {
            old.instances.destroy();
        }

        fill_instances(cloud, size, self.encode_srgb, &mut self.scratch);
        let instances = TypedBuffer::new_with_data(
            &context.device,
            LABEL,
            &self.scratch,
            wgpu::BufferUsages::STORAGE,
        );
        let bind_group = self.create_bind_group(&context.device, &instances);
        self.instance_count = self.scratch.len() as u32;
        self.buffers = Some(PointBuffers {
            instances,
            bind_group,
        });
        log::debug!("points buffer replaced: {} instances", self.instance_count);
    }

    /// Overwrite the current buffer with `cloud`, growing it if needed.
    pub fn write(
        &mut self,
        context: &RenderContext,
        cloud: &PointCloud,
        size: f32,
    ) {
        fill_instances(cloud, size, self.encode_srgb, &mut self.scratch);
        let Some(mut buffers) = self.buffers.take() else {
            self.replace(context, cloud, size);
            return;
        };
        if buffers
            .instances
            .write(&context.device, &context.queue, &self.scratch)
        {
            buffers.bind_group =
                self.create_bind_group(&context.device, &buffers.instances);
        }
        self.instance_count = self.scratch.len() as u32;
        self.buffers = Some(buffers);
    }

    /// Record the draw into `render_pass`.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        let Some(buffers) = &self.buffers else {
            return;
        };
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &buffers.bind_group, &[]);
        render_pass.draw(0..VERTICES_PER_POINT, 0..self.instance_count);
    }

    /// Points drawn per frame.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

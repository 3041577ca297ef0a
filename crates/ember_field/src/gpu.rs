//! wgpu renderer backend
//!
//! Each field gets three instance-rate vertex buffers (positions, sizes,
//! colors). Sizes and colors are written once at allocation; positions are
//! rewritten with `Queue::write_buffer` after every tick. Per-frame state
//! (matrices and opacity) goes through one shared uniform buffer.
//!
//! Pipeline creation and the point shader belong to the host application.

use crate::hero::FrameOutput;
use crate::render::{FieldBuffers, FieldRenderer};
use bytemuck::{Pod, Zeroable};
use ember_core::Mat4;
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// Uniforms for the field's point shader
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FieldUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub opacity: f32,
    pub pixel_ratio: f32,
    pub _padding: [f32; 2],
}

impl FieldUniforms {
    pub fn new(frame: &FrameOutput<'_>, device_pixel_ratio: f32) -> Self {
        Self {
            view_projection: frame.view_projection.cols,
            model: frame.model.cols,
            opacity: frame.opacity,
            pixel_ratio: device_pixel_ratio.min(frame.max_pixel_ratio),
            _padding: [0.0; 2],
        }
    }
}

impl Default for FieldUniforms {
    fn default() -> Self {
        Self {
            view_projection: Mat4::IDENTITY.cols,
            model: Mat4::IDENTITY.cols,
            opacity: 0.0,
            pixel_ratio: 1.0,
            _padding: [0.0; 2],
        }
    }
}

/// Device buffers backing one particle field
#[derive(Debug)]
pub struct FieldGpuBuffers {
    pub positions: wgpu::Buffer,
    pub sizes: wgpu::Buffer,
    pub colors: wgpu::Buffer,
    pub count: u32,
}

impl FieldGpuBuffers {
    /// Bind as vertex buffers 0..=2 in the order of [`WgpuRenderer::vertex_layouts`]
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.sizes.slice(..));
        pass.set_vertex_buffer(2, self.colors.slice(..));
    }
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const SIZE_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

pub struct WgpuRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    uniform_buffer: wgpu::Buffer,
    live_fields: usize,
}

impl WgpuRenderer {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ember Field Uniforms"),
            contents: bytemuck::bytes_of(&FieldUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            device,
            queue,
            uniform_buffer,
            live_fields: 0,
        }
    }

    /// Vertex layouts matching [`FieldGpuBuffers::bind`]: one particle per instance
    pub fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
        [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &SIZE_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &COLOR_ATTRIBUTES,
            },
        ]
    }

    pub fn uniform_buffer(&self) -> &wgpu::Buffer {
        &self.uniform_buffer
    }

    /// Write this frame's matrices, opacity and capped pixel ratio
    pub fn write_frame(&self, frame: &FrameOutput<'_>, device_pixel_ratio: f32) {
        let uniforms = FieldUniforms::new(frame, device_pixel_ratio);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Fields currently holding device buffers
    pub fn live_fields(&self) -> usize {
        self.live_fields
    }

    fn vertex_buffer(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}

impl FieldRenderer for WgpuRenderer {
    type Handle = FieldGpuBuffers;

    fn allocate(&mut self, buffers: &FieldBuffers<'_>) -> FieldGpuBuffers {
        self.live_fields += 1;
        tracing::debug!(
            "WgpuRenderer: allocating buffers for {} particles",
            buffers.len()
        );
        FieldGpuBuffers {
            positions: self.vertex_buffer("Ember Particle Positions", buffers.position_bytes()),
            sizes: self.vertex_buffer("Ember Particle Sizes", buffers.size_bytes()),
            colors: self.vertex_buffer("Ember Particle Colors", buffers.color_bytes()),
            count: buffers.len() as u32,
        }
    }

    fn upload(&mut self, handle: &FieldGpuBuffers, buffers: &FieldBuffers<'_>) {
        if buffers.len() as u32 != handle.count {
            tracing::warn!(
                "WgpuRenderer: skipping upload of {} particles into buffers sized for {}",
                buffers.len(),
                handle.count
            );
            return;
        }
        self.queue
            .write_buffer(&handle.positions, 0, buffers.position_bytes());
    }

    fn release(&mut self, handle: FieldGpuBuffers) {
        handle.positions.destroy();
        handle.sizes.destroy();
        handle.colors.destroy();
        self.live_fields = self.live_fields.saturating_sub(1);
    }
}

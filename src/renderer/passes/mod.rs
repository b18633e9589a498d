//! Render Passes
//!
//! Each pass implements [`RenderPass`]: it registers its shaders at
//! initialization, collects the scene components of its category during
//! `prepare_render`, binds programs from the registry by key and issues draw
//! calls in `render`, and drops its per-frame list in `clear_render_arr`.
//! The renderer invokes the passes in a fixed order each frame.

mod billboard;
mod depth_debug;
mod editor;
mod fog;
mod gizmo;
mod light_buffer;
mod line;
mod static_mesh;

pub use billboard::BillboardRenderPass;
pub use depth_debug::DepthDebugRenderPass;
pub use editor::EditorRenderPass;
pub use fog::FogRenderPass;
pub use gizmo::GizmoRenderPass;
pub use light_buffer::LightBufferPass;
pub use line::LineRenderPass;
pub use static_mesh::StaticMeshRenderPass;

use crate::renderer::buffers::BufferManager;
use crate::renderer::pipeline::{PipelineCache, ShaderModuleCache, ShaderRegistry};
use crate::renderer::viewport::{Viewport, ViewportRect};
use crate::scene::Scene;

/// Initialization context handed to every pass once, at renderer startup.
pub struct PassInit<'a> {
    pub device: &'a wgpu::Device,
    pub buffers: &'a mut BufferManager,
    pub shaders: &'a mut ShaderRegistry,
}

/// Per-frame context handed to every pass's `render`.
pub struct FrameContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
    pub shaders: &'a ShaderRegistry,
    pub modules: &'a mut ShaderModuleCache,
    pub pipelines: &'a mut PipelineCache,
    pub buffers: &'a BufferManager,
}

/// One stage of the fixed per-frame pass sequence.
pub trait RenderPass {
    fn name(&self) -> &'static str;

    /// Registers shaders and creates GPU state. Compile failures are logged
    /// and leave the pass inert; they never abort renderer startup.
    fn initialize(&mut self, init: &mut PassInit<'_>);

    /// Collects this frame's objects of the pass's component category. No
    /// drawing.
    fn prepare_render(&mut self, scene: &Scene);

    /// Binds shaders and buffers and issues draw calls for the active
    /// viewport.
    fn render(&mut self, frame: &mut FrameContext<'_>, viewport: &Viewport);

    /// Drops the per-frame object list.
    fn clear_render_arr(&mut self);
}

// ── Shared GPU helpers ───────────────────────────────────────────────────────

pub(crate) fn uniform_layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size: None,
        },
        count: None,
    }
}

pub(crate) fn depth_texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Depth,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(crate) fn single_uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

pub(crate) fn apply_viewport(rpass: &mut wgpu::RenderPass<'_>, rect: ViewportRect) {
    rpass.set_viewport(rect.x, rect.y, rect.width, rect.height, 0.0, 1.0);
}

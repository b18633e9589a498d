//! Renderer
//!
//! Owns the GPU context, the shader registry, the GPU-side caches and the
//! fixed pass sequence. Per frame the editor loop calls, in order:
//!
//! 1. [`Renderer::handle_hot_reload`] — development builds only; rescans the
//!    registered shaders and swaps any whose sources changed.
//! 2. [`Renderer::prepare_render`] — passes collect their scene components.
//! 3. [`Renderer::render`] — one call per active viewport: light buffer
//!    update, static meshes, billboards, depth-debug or fog depending on the
//!    view mode, grid lines, gizmo, editor helpers. Per-frame lists are
//!    cleared when the frame is submitted.

pub mod buffers;
pub mod context;
pub mod passes;
pub mod pipeline;
pub mod settings;
pub mod viewport;

use glam::Vec4;

pub use context::GraphicsContext;
pub use settings::RendererSettings;
pub use viewport::{ViewMode, Viewport, ViewportRect};

use self::buffers::BufferManager;
use self::passes::{
    BillboardRenderPass, DepthDebugRenderPass, EditorRenderPass, FogRenderPass, FrameContext,
    GizmoRenderPass, LightBufferPass, LineRenderPass, PassInit, RenderPass, StaticMeshRenderPass,
};
use self::pipeline::{PipelineCache, ShaderCompiler, ShaderModuleCache, ShaderRegistry};
use crate::resources::uniforms::{
    CameraUniforms, FogUniforms, HelperUniforms, LightingUniforms, ScreenUniforms,
};
use crate::scene::Scene;

pub(crate) const CAMERA_BUFFER: &str = "CameraConstants";
pub(crate) const SCREEN_BUFFER: &str = "ScreenConstants";
pub(crate) const LIGHTING_BUFFER: &str = "LightingConstants";
pub(crate) const FOG_BUFFER: &str = "FogConstants";
pub(crate) const GIZMO_BUFFER: &str = "GizmoConstants";

/// The texture a frame is rendered into, typically one editor viewport's
/// offscreen color buffer or the window surface.
pub struct RenderTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

struct DepthTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// The editor renderer. See the module docs for the frame protocol.
pub struct Renderer {
    ctx: GraphicsContext,
    settings: RendererSettings,
    buffers: BufferManager,
    shaders: ShaderRegistry,
    modules: ShaderModuleCache,
    pipelines: PipelineCache,
    depth: Option<DepthTarget>,

    light_buffer_pass: LightBufferPass,
    static_mesh_pass: StaticMeshRenderPass,
    billboard_pass: BillboardRenderPass,
    depth_debug_pass: DepthDebugRenderPass,
    fog_pass: FogRenderPass,
    line_pass: LineRenderPass,
    gizmo_pass: GizmoRenderPass,
    editor_pass: EditorRenderPass,
}

impl Renderer {
    /// Creates the renderer: constant buffers first, then every pass
    /// initializes against the shared registry. Shader failures during
    /// initialization are logged by the registry and leave the affected
    /// variant or pass unavailable; startup always completes.
    #[must_use]
    pub fn new(ctx: GraphicsContext, settings: RendererSettings) -> Self {
        let mut buffers = BufferManager::new();
        Self::create_constant_buffers(&ctx.device, &mut buffers);

        let mut shaders = ShaderRegistry::new(ShaderCompiler::new(settings.shader_root.clone()));

        let mut light_buffer_pass = LightBufferPass::new();
        let mut static_mesh_pass = StaticMeshRenderPass::new();
        let mut billboard_pass = BillboardRenderPass::new();
        let mut depth_debug_pass = DepthDebugRenderPass::new();
        let mut fog_pass = FogRenderPass::new();
        let mut line_pass = LineRenderPass::new();
        let mut gizmo_pass = GizmoRenderPass::new();
        let mut editor_pass = EditorRenderPass::new();

        {
            let mut init = PassInit {
                device: &ctx.device,
                buffers: &mut buffers,
                shaders: &mut shaders,
            };
            light_buffer_pass.initialize(&mut init);
            static_mesh_pass.initialize(&mut init);
            billboard_pass.initialize(&mut init);
            depth_debug_pass.initialize(&mut init);
            fog_pass.initialize(&mut init);
            line_pass.initialize(&mut init);
            gizmo_pass.initialize(&mut init);
            editor_pass.initialize(&mut init);
        }

        Self {
            ctx,
            settings,
            buffers,
            shaders,
            modules: ShaderModuleCache::new(),
            pipelines: PipelineCache::new(),
            depth: None,
            light_buffer_pass,
            static_mesh_pass,
            billboard_pass,
            depth_debug_pass,
            fog_pass,
            line_pass,
            gizmo_pass,
            editor_pass,
        }
    }

    fn create_constant_buffers(device: &wgpu::Device, buffers: &mut BufferManager) {
        buffers.create_uniform::<CameraUniforms>(device, CAMERA_BUFFER);
        buffers.create_uniform::<ScreenUniforms>(device, SCREEN_BUFFER);
        buffers.create_uniform::<LightingUniforms>(device, LIGHTING_BUFFER);
        buffers.create_uniform::<FogUniforms>(device, FOG_BUFFER);
        buffers.create_uniform::<HelperUniforms>(device, GIZMO_BUFFER);
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.ctx.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.ctx.queue
    }

    #[must_use]
    pub fn shaders(&self) -> &ShaderRegistry {
        &self.shaders
    }

    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Runs the hot-reload scan when enabled. Returns `true` when at least
    /// one shader program was replaced this frame.
    pub fn handle_hot_reload(&mut self) -> bool {
        if !self.settings.enable_shader_hot_reload {
            return false;
        }
        if self.shaders.scan_and_reload() {
            log::info!("Shader hot reload succeeded");
            true
        } else {
            false
        }
    }

    /// Lets every pass collect its components for this frame. Call once per
    /// frame, before rendering any viewport.
    pub fn prepare_render(&mut self, scene: &Scene) {
        self.light_buffer_pass.prepare_render(scene);
        self.static_mesh_pass.prepare_render(scene);
        self.billboard_pass.prepare_render(scene);
        self.depth_debug_pass.prepare_render(scene);
        self.fog_pass.prepare_render(scene);
        self.line_pass.prepare_render(scene);
        self.gizmo_pass.prepare_render(scene);
        self.editor_pass.prepare_render(scene);
    }

    /// Drops every pass's per-frame list. Called automatically at the end of
    /// [`Renderer::render`].
    pub fn clear_render_arr(&mut self) {
        self.light_buffer_pass.clear_render_arr();
        self.static_mesh_pass.clear_render_arr();
        self.billboard_pass.clear_render_arr();
        self.depth_debug_pass.clear_render_arr();
        self.fog_pass.clear_render_arr();
        self.line_pass.clear_render_arr();
        self.gizmo_pass.clear_render_arr();
        self.editor_pass.clear_render_arr();
    }

    /// Renders the prepared frame into `target` through the active viewport.
    pub fn render(&mut self, viewport: &Viewport, target: &RenderTarget<'_>) {
        if target.width == 0 || target.height == 0 {
            return;
        }

        self.ensure_depth(target.width, target.height);
        self.update_frame_uniforms(viewport, target);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let Some(depth) = &self.depth else {
            return;
        };

        // Clear both attachments once; every pass then loads.
        {
            let _clear = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.settings.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
        }

        let mut frame = FrameContext {
            device: &self.ctx.device,
            queue: &self.ctx.queue,
            encoder: &mut encoder,
            color_view: target.view,
            depth_view: &depth.view,
            color_format: target.format,
            depth_format: self.settings.depth_format,
            shaders: &self.shaders,
            modules: &mut self.modules,
            pipelines: &mut self.pipelines,
            buffers: &self.buffers,
        };

        self.light_buffer_pass.render(&mut frame, viewport);
        self.static_mesh_pass.render(&mut frame, viewport);
        self.billboard_pass.render(&mut frame, viewport);
        match viewport.view_mode {
            ViewMode::SceneDepth => self.depth_debug_pass.render(&mut frame, viewport),
            ViewMode::Lit(_) => self.fog_pass.render(&mut frame, viewport),
        }
        self.line_pass.render(&mut frame, viewport);
        self.gizmo_pass.render(&mut frame, viewport);
        self.editor_pass.render(&mut frame, viewport);

        drop(frame);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        self.clear_render_arr();
    }

    fn update_frame_uniforms(&self, viewport: &Viewport, target: &RenderTarget<'_>) {
        let camera = CameraUniforms {
            view: viewport.view,
            proj: viewport.projection,
            view_proj: viewport.view_proj(),
            eye: viewport.eye.extend(1.0),
        };
        self.buffers.update(&self.ctx.queue, CAMERA_BUFFER, &camera);

        let screen = ScreenUniforms {
            size: Vec4::new(
                target.width as f32,
                target.height as f32,
                viewport.near,
                viewport.far,
            ),
        };
        self.buffers.update(&self.ctx.queue, SCREEN_BUFFER, &screen);
    }

    fn ensure_depth(&mut self, width: u32, height: u32) {
        if let Some(depth) = &self.depth {
            if depth.width == width && depth.height == height {
                return;
            }
        }
        let texture = self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.settings.depth_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        self.depth = Some(DepthTarget {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            width,
            height,
        });
    }
}

//! Viewports and View Modes
//!
//! A [`Viewport`] is one rectangular view into the scene with its own camera
//! and view mode. The level editor renders several of them per frame; the
//! renderer only ever sees the currently active one.

use glam::{Mat4, Vec3};

use crate::renderer::pipeline::LightingModel;

/// How a viewport shades the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Shade static meshes with the given lighting-model variant.
    Lit(LightingModel),
    /// Visualize the frame's linearized depth buffer instead of fog.
    SceneDepth,
}

impl ViewMode {
    /// The lighting-model variant the static-mesh pass should draw with.
    ///
    /// Depth visualization still needs the scene rendered to fill the depth
    /// buffer; it draws unlit since shading is discarded anyway.
    #[must_use]
    pub fn lighting_model(self) -> LightingModel {
        match self {
            ViewMode::Lit(model) => model,
            ViewMode::SceneDepth => LightingModel::Unlit,
        }
    }
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Lit(LightingModel::BlinnPhong)
    }
}

/// Pixel rectangle of a viewport inside the render target.
#[derive(Debug, Clone, Copy)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One active editor viewport.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub rect: ViewportRect,
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
    pub near: f32,
    pub far: f32,
    pub view_mode: ViewMode,
}

impl Viewport {
    /// A perspective viewport looking from `eye` at `target`.
    #[must_use]
    pub fn perspective(
        rect: ViewportRect,
        eye: Vec3,
        target: Vec3,
        fov_y: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let aspect = rect.width / rect.height.max(1.0);
        Self {
            rect,
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y, aspect, near, far),
            eye,
            near,
            far,
            view_mode: ViewMode::default(),
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

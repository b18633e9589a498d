//! Renderer Settings
//!
//! Global configuration consumed once during [`crate::Renderer::new`].

use std::path::PathBuf;

/// Global configuration for renderer initialization.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Root directory all shader template and include names resolve against.
    pub shader_root: PathBuf,

    /// Runs the hot-reload scan once per frame when `true`.
    ///
    /// Defaults to on in debug builds only: the scan stats every recorded
    /// shader dependency and a recompile blocks the frame, which is
    /// acceptable while iterating on shaders but not in shipped builds.
    pub enable_shader_hot_reload: bool,

    /// Background clear color for the main render target.
    pub clear_color: wgpu::Color,

    /// Depth buffer texture format.
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("shaders"),
            enable_shader_hot_reload: cfg!(debug_assertions),
            clear_color: wgpu::Color {
                r: 0.03,
                g: 0.03,
                b: 0.04,
                a: 1.0,
            },
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

//! GPU Shader Module Cache
//!
//! Deduplicates `wgpu::ShaderModule`s by the xxh3-128 hash of the final WGSL
//! source. Passes ask for the module of whatever program the registry
//! currently holds; after a hot swap the hash differs, so a fresh GPU module
//! is created on the next lookup and the stale one ages out with its
//! pipelines.

use rustc_hash::FxHashMap;

use super::compiler::ShaderProgram;

/// Centralized `wgpu::ShaderModule` cache, keyed by generated-source hash.
#[derive(Default)]
pub struct ShaderModuleCache {
    modules: FxHashMap<u128, wgpu::ShaderModule>,
}

impl ShaderModuleCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            modules: FxHashMap::default(),
        }
    }

    /// Returns the GPU module for a compiled program, creating it on first
    /// use. The module is created from the already-validated WGSL source.
    pub fn get_or_create(
        &mut self,
        device: &wgpu::Device,
        program: &ShaderProgram,
    ) -> &wgpu::ShaderModule {
        self.modules
            .entry(program.source_hash())
            .or_insert_with(|| {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(&format!("Shader Module {}", program.request().source)),
                    source: wgpu::ShaderSource::Wgsl(program.wgsl().into()),
                })
            })
    }

    /// Number of cached GPU modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

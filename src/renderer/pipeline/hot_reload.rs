//! Shader Hot Reload
//!
//! Once per frame (development builds only) the renderer asks the registry to
//! scan every registered program for stale dependencies and recompile the
//! ones whose sources changed.
//!
//! The swap is fail-safe: a recompile that errors leaves the previous,
//! working program bound and its timestamp snapshot untouched, so the unit is
//! retried on every following scan until the source compiles again or is
//! reverted. There is deliberately no backoff.

use std::sync::Arc;

use super::compiler::ShaderStage;
use super::registry::ShaderRegistry;

impl ShaderRegistry {
    /// Scans every registered program and recompiles the stale ones.
    ///
    /// Returns `true` when at least one program was replaced. Intended to be
    /// called at most once per frame, from the main thread.
    ///
    /// Programs are visited vertex table first, then pixel table. A vertex
    /// program shared by several pixel variants appears once in the vertex
    /// table and is therefore scanned (and recompiled) once per pass; every
    /// variant that references it by key picks up the replacement on its next
    /// lookup.
    pub fn scan_and_reload(&mut self) -> bool {
        let mut reloaded = false;

        let vertex_keys: Vec<String> = self.vertex_shaders.keys().cloned().collect();
        for key in &vertex_keys {
            reloaded |= self.reload_if_stale(ShaderStage::Vertex, key);
        }

        let pixel_keys: Vec<String> = self.pixel_shaders.keys().cloned().collect();
        for key in &pixel_keys {
            reloaded |= self.reload_if_stale(ShaderStage::Pixel, key);
        }

        reloaded
    }

    /// Recompiles one program if any of its dependencies changed on disk.
    ///
    /// On success the new program (with its fresh dependency snapshot) is
    /// installed under the same key and the old handle is released. On
    /// failure the diagnostic is logged and nothing is replaced.
    fn reload_if_stale(&mut self, stage: ShaderStage, key: &str) -> bool {
        let (table, compiler) = match stage {
            ShaderStage::Vertex => (&mut self.vertex_shaders, &self.compiler),
            ShaderStage::Pixel => (&mut self.pixel_shaders, &self.compiler),
        };

        let Some(current) = table.get(key) else {
            return false;
        };
        if !current.metadata().is_stale() {
            return false;
        }

        let request = current.request().clone();
        match compiler.compile(&request) {
            Ok(fresh) => {
                table.insert(key.to_string(), Arc::new(fresh));
                log::info!("Reloaded {stage:?} shader '{key}' from '{}'", request.source);
                true
            }
            Err(e) => {
                log::error!("Recompile of {stage:?} shader '{key}' failed, keeping previous program: {e}");
                false
            }
        }
    }
}

//! Shader Variant Registry
//!
//! The keyed store for every compiled shader program in the process. Three
//! tables, all keyed by stable human-readable strings: vertex programs, pixel
//! programs and vertex input layouts.
//!
//! Render passes hold registry **keys**, not program handles — a hot-swapped
//! program is transparently picked up on the next lookup. Entries are
//! replaced, never removed; the registry lives from renderer initialization
//! to shutdown.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::compiler::{CompileRequest, ShaderCompiler, ShaderProgram, ShaderStage};
use super::variant::{LightingModel, STATIC_MESH_VERTEX_KEY};
use super::vertex::VertexLayout;

/// Template and entry-point names of the built-in static-mesh shaders.
const STATIC_MESH_VERTEX_SOURCE: &str = "static_mesh_vertex";
const STATIC_MESH_PIXEL_SOURCE: &str = "static_mesh_pixel";

/// Entry-point symbol every vertex program exports.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry-point symbol every pixel program exports.
pub const PIXEL_ENTRY: &str = "fs_main";

/// The (vertex, pixel) program pair a draw pass binds for one variant.
#[derive(Clone)]
pub struct ShaderPipeline {
    pub vertex: Arc<ShaderProgram>,
    pub pixel: Arc<ShaderProgram>,
}

/// Process-wide shader store. See the module docs.
pub struct ShaderRegistry {
    pub(crate) compiler: ShaderCompiler,
    pub(crate) vertex_shaders: FxHashMap<String, Arc<ShaderProgram>>,
    pub(crate) pixel_shaders: FxHashMap<String, Arc<ShaderProgram>>,
    input_layouts: FxHashMap<String, VertexLayout>,
}

impl ShaderRegistry {
    #[must_use]
    pub fn new(compiler: ShaderCompiler) -> Self {
        Self {
            compiler,
            vertex_shaders: FxHashMap::default(),
            pixel_shaders: FxHashMap::default(),
            input_layouts: FxHashMap::default(),
        }
    }

    /// The compilation backend this registry compiles through.
    #[must_use]
    pub fn compiler(&self) -> &ShaderCompiler {
        &self.compiler
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Compiles and registers a vertex program under `key`.
    ///
    /// A key that is already registered is skipped without recompiling.
    pub fn register_vertex(&mut self, key: &str, request: CompileRequest) -> crate::Result<()> {
        if self.vertex_shaders.contains_key(key) {
            log::debug!("Vertex shader '{key}' already registered, skipping compile");
            return Ok(());
        }
        debug_assert_eq!(request.stage, ShaderStage::Vertex);
        let program = self.compiler.compile(&request)?;
        self.vertex_shaders.insert(key.to_string(), Arc::new(program));
        Ok(())
    }

    /// Compiles and registers a pixel program under `key`.
    ///
    /// A key that is already registered is skipped without recompiling.
    pub fn register_pixel(&mut self, key: &str, request: CompileRequest) -> crate::Result<()> {
        if self.pixel_shaders.contains_key(key) {
            log::debug!("Pixel shader '{key}' already registered, skipping compile");
            return Ok(());
        }
        debug_assert_eq!(request.stage, ShaderStage::Pixel);
        let program = self.compiler.compile(&request)?;
        self.pixel_shaders.insert(key.to_string(), Arc::new(program));
        Ok(())
    }

    /// Registers the vertex input layout bound together with the vertex
    /// program of the same key.
    pub fn register_input_layout(&mut self, key: &str, layout: VertexLayout) {
        self.input_layouts.entry(key.to_string()).or_insert(layout);
    }

    /// Builds every lighting-model variant of the static-mesh shaders.
    ///
    /// Compiles the shared vertex program, Gouraud's dedicated vertex program
    /// and one pixel program per [`LightingModel`], each from the same
    /// sources with only the `LIGHTING_MODEL` define differing. A failure for
    /// one variant is logged and leaves that variant unavailable; the
    /// remaining variants still register. Calling this again without source
    /// changes performs no new compiles.
    pub fn register_builtin_variants(&mut self) {
        let shared = CompileRequest::new(STATIC_MESH_VERTEX_SOURCE, VERTEX_ENTRY, ShaderStage::Vertex)
            .with_define("LIGHTING_MODEL", "0");
        if let Err(e) = self.register_vertex(STATIC_MESH_VERTEX_KEY, shared) {
            log::error!("Failed to compile vertex shader '{STATIC_MESH_VERTEX_KEY}': {e}");
        }

        for model in LightingModel::ALL {
            if model.owns_vertex_shader() {
                let request =
                    CompileRequest::new(STATIC_MESH_VERTEX_SOURCE, VERTEX_ENTRY, ShaderStage::Vertex)
                        .with_define("LIGHTING_MODEL", model.define_value());
                if let Err(e) = self.register_vertex(model.key(), request) {
                    log::error!("Failed to compile vertex shader '{}': {e}", model.key());
                }
            }

            let request =
                CompileRequest::new(STATIC_MESH_PIXEL_SOURCE, PIXEL_ENTRY, ShaderStage::Pixel)
                    .with_define("LIGHTING_MODEL", model.define_value());
            if let Err(e) = self.register_pixel(model.key(), request) {
                log::error!("Failed to compile pixel shader '{}': {e}", model.key());
            }
        }
    }

    // ── Lookup ───────────────────────────────────────────────────────────────

    /// The (vertex, pixel) pair for a lighting model, or `None` when either
    /// stage never registered successfully. Pure lookup, no side effects.
    #[must_use]
    pub fn pipeline_for(&self, model: LightingModel) -> Option<ShaderPipeline> {
        let vertex = self.vertex_shaders.get(model.vertex_key())?;
        let pixel = self.pixel_shaders.get(model.key())?;
        Some(ShaderPipeline {
            vertex: Arc::clone(vertex),
            pixel: Arc::clone(pixel),
        })
    }

    /// Generic vertex-program lookup for non-variant shaders.
    #[must_use]
    pub fn vertex_by_key(&self, key: &str) -> Option<&Arc<ShaderProgram>> {
        self.vertex_shaders.get(key)
    }

    /// Generic pixel-program lookup for non-variant shaders.
    #[must_use]
    pub fn pixel_by_key(&self, key: &str) -> Option<&Arc<ShaderProgram>> {
        self.pixel_shaders.get(key)
    }

    /// Input-layout lookup.
    #[must_use]
    pub fn input_layout_by_key(&self, key: &str) -> Option<&VertexLayout> {
        self.input_layouts.get(key)
    }

    /// Number of registered vertex programs.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_shaders.len()
    }

    /// Number of registered pixel programs.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixel_shaders.len()
    }
}

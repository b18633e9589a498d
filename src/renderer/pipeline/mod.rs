//! Shader Pipeline
//!
//! The shader-variant and hot-reload core: compilation backend, include
//! dependency tracking, the keyed program registry, the per-frame hot-reload
//! scan, and the GPU-side module/pipeline caches the render passes consume.

mod compiler;
mod dependency;
mod hot_reload;
mod module_cache;
mod pipeline_cache;
mod registry;
mod variant;
mod vertex;

pub use compiler::{CompileRequest, ShaderCompiler, ShaderProgram, ShaderStage};
pub use dependency::FileMetadata;
pub use module_cache::ShaderModuleCache;
pub use pipeline_cache::{PipelineCache, PipelineKey, fx_hash_key};
pub use registry::{PIXEL_ENTRY, ShaderPipeline, ShaderRegistry, VERTEX_ENTRY};
pub use variant::{LightingModel, STATIC_MESH_VERTEX_KEY};
pub use vertex::{LineVertex, VertexLayout};

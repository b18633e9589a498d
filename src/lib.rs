#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{PrismError, Result};
pub use renderer::pipeline::{
    CompileRequest, LightingModel, ShaderCompiler, ShaderPipeline, ShaderProgram, ShaderRegistry,
    ShaderStage,
};
pub use renderer::{
    GraphicsContext, RenderTarget, Renderer, RendererSettings, ViewMode, Viewport, ViewportRect,
};
pub use resources::ShaderDefines;
pub use scene::{
    BillboardComponent, FogComponent, Light, LightKind, Scene, SceneComponent, StaticMesh,
    StaticMeshComponent, Vertex,
};
pub use utils::interner;

pub mod shader_defines;
pub mod uniforms;

pub use shader_defines::ShaderDefines;

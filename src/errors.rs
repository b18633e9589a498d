//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! All public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, PrismError>`. Shader compilation failures carry the
//! raw compiler diagnostic so callers can surface it verbatim in the log; no
//! structured error codes are exposed beyond the variant itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::pipeline::ShaderStage;

/// The main error type for the Prism engine.
#[derive(Error, Debug)]
pub enum PrismError {
    // ========================================================================
    // GPU Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    // ========================================================================
    // Shader Compilation Errors
    // ========================================================================
    /// A shader source or include file could not be resolved.
    #[error("Shader source not found: {path}")]
    ShaderSourceNotFound {
        /// The unresolved path.
        path: PathBuf,
    },

    /// Preprocessing (template rendering / include expansion) failed.
    #[error("Shader preprocess error in '{name}': {message}")]
    ShaderPreprocess {
        /// Template name relative to the shader root.
        name: String,
        /// Raw preprocessor diagnostic.
        message: String,
    },

    /// The generated WGSL failed to parse.
    #[error("Shader parse error in '{name}':\n{message}")]
    ShaderParse {
        /// Template name relative to the shader root.
        name: String,
        /// Raw compiler diagnostic.
        message: String,
    },

    /// The parsed module failed validation.
    #[error("Shader validation error in '{name}':\n{message}")]
    ShaderValidation {
        /// Template name relative to the shader root.
        name: String,
        /// Raw validator diagnostic.
        message: String,
    },

    /// The requested entry point does not exist in the compiled module.
    #[error("Entry point '{entry}' ({stage:?} stage) not found in shader '{name}'")]
    EntryPointNotFound {
        /// Template name relative to the shader root.
        name: String,
        /// Requested entry-point symbol.
        entry: String,
        /// Requested stage.
        stage: ShaderStage,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, PrismError>`.
pub type Result<T> = std::result::Result<T, PrismError>;

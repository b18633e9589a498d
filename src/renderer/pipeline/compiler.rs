//! Shader Compilation Backend
//!
//! Turns a [`CompileRequest`] — source template, entry point, stage and
//! define set — into a validated [`ShaderProgram`] or a diagnostic.
//!
//! Compilation is a two-step pipeline:
//!
//! 1. **Preprocess**: the template named by the request is rendered with the
//!    defines as context. Include directives are resolved by the
//!    dependency-tracking loader, so every file the compile touches is
//!    recorded with its modification timestamp.
//! 2. **Compile**: the rendered WGSL is parsed and validated headlessly with
//!    `naga`, and the requested entry point is checked against the module.
//!    GPU module objects are created later, by the consumer layer, from the
//!    validated source.
//!
//! The environment is rebuilt per compile so that every compilation re-reads
//! its sources from disk — a prerequisite for hot reload.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_128;

use super::dependency::{DependencyRecorder, FileMetadata};
use crate::errors::{PrismError, Result};
use crate::resources::ShaderDefines;
use crate::utils::interner;

/// The shader stage a program is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    /// Stage marker define injected into shared source chunks.
    #[must_use]
    pub fn define(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX_SHADER",
            ShaderStage::Pixel => "PIXEL_SHADER",
        }
    }

    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Pixel => naga::ShaderStage::Fragment,
        }
    }
}

/// Everything needed to compile (and later recompile) one shader program.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Template name relative to the shader root, e.g. `"static_mesh_pixel"`.
    pub source: String,
    /// Entry-point symbol, e.g. `"fs_main"`.
    pub entry_point: String,
    pub stage: ShaderStage,
    pub defines: ShaderDefines,
}

impl CompileRequest {
    #[must_use]
    pub fn new(source: &str, entry_point: &str, stage: ShaderStage) -> Self {
        let mut defines = ShaderDefines::new();
        defines.set(stage.define(), "1");
        Self {
            source: source.to_string(),
            entry_point: entry_point.to_string(),
            stage,
            defines,
        }
    }

    /// Adds a define on top of the stage marker.
    #[must_use]
    pub fn with_define(mut self, key: &str, value: &str) -> Self {
        self.defines.set(key, value);
        self
    }
}

/// One compiled, stage-bound shader program.
///
/// Owned by the registry as `Arc<ShaderProgram>`; hot reload replaces the
/// `Arc` wholesale, so a program is never mutated after compilation and the
/// old one is released once the last pass drops its reference.
pub struct ShaderProgram {
    request: CompileRequest,
    wgsl: String,
    source_hash: u128,
    module: naga::Module,
    info: naga::valid::ModuleInfo,
    metadata: FileMetadata,
}

impl ShaderProgram {
    /// The request this program was compiled from, reused verbatim by the
    /// hot-reload scanner.
    #[must_use]
    pub fn request(&self) -> &CompileRequest {
        &self.request
    }

    /// The final generated WGSL.
    #[must_use]
    pub fn wgsl(&self) -> &str {
        &self.wgsl
    }

    /// xxh3-128 of the generated WGSL; the identity GPU-side caches key by.
    #[must_use]
    pub fn source_hash(&self) -> u128 {
        self.source_hash
    }

    /// The validated naga module.
    #[must_use]
    pub fn naga_module(&self) -> &naga::Module {
        &self.module
    }

    /// Validation info for the module.
    #[must_use]
    pub fn module_info(&self) -> &naga::valid::ModuleInfo {
        &self.info
    }

    /// Dependency snapshot from the most recent successful compile.
    #[must_use]
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }
}

#[derive(Serialize)]
struct TemplateContext {
    #[serde(flatten)]
    defines: BTreeMap<String, String>,
}

/// The shader compilation backend.
///
/// Stateless apart from the shader root and a compile counter; safe to call
/// repeatedly from the frame loop (each call is a full, blocking compile).
pub struct ShaderCompiler {
    root: PathBuf,
    compile_count: AtomicU64,
}

impl ShaderCompiler {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        interner::preload_common_defines();
        Self {
            root: root.into(),
            compile_count: AtomicU64::new(0),
        }
    }

    /// The shader-source root all template and include names resolve against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total number of compile attempts since creation (successes and
    /// failures alike).
    #[must_use]
    pub fn compile_count(&self) -> u64 {
        self.compile_count.load(Ordering::Relaxed)
    }

    /// Compiles one shader program.
    ///
    /// On failure the returned error carries the raw diagnostic; the caller
    /// must keep whatever program it currently has bound.
    pub fn compile(&self, request: &CompileRequest) -> Result<ShaderProgram> {
        self.compile_count.fetch_add(1, Ordering::Relaxed);

        let recorder = Arc::new(DependencyRecorder::new(self.root.clone()));
        let env = build_environment(Arc::clone(&recorder));

        let context = TemplateContext {
            defines: request.defines.to_map(),
        };

        let template = env.get_template(&request.source).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                PrismError::ShaderSourceNotFound {
                    path: self.root.join(format!("{}.wgsl", request.source)),
                }
            } else {
                PrismError::ShaderPreprocess {
                    name: request.source.clone(),
                    message: e.to_string(),
                }
            }
        })?;
        let wgsl = template.render(&context).map_err(|e| PrismError::ShaderPreprocess {
            name: request.source.clone(),
            message: e.to_string(),
        })?;

        let module = naga::front::wgsl::parse_str(&wgsl).map_err(|e| PrismError::ShaderParse {
            name: request.source.clone(),
            message: e.emit_to_string(&wgsl),
        })?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        let info = validator
            .validate(&module)
            .map_err(|e| PrismError::ShaderValidation {
                name: request.source.clone(),
                message: e.emit_to_string(&wgsl),
            })?;

        let naga_stage = request.stage.to_naga();
        let entry_found = module
            .entry_points
            .iter()
            .any(|ep| ep.stage == naga_stage && ep.name == request.entry_point);
        if !entry_found {
            return Err(PrismError::EntryPointNotFound {
                name: request.source.clone(),
                entry: request.entry_point.clone(),
                stage: request.stage,
            });
        }

        let source_hash = xxh3_128(wgsl.as_bytes());
        let metadata = recorder.snapshot(&request.source);

        Ok(ShaderProgram {
            request: request.clone(),
            wgsl,
            source_hash,
            module,
            info,
            metadata,
        })
    }
}

/// Builds the template environment for one compilation.
///
/// Syntax is chosen to coexist with WGSL: `{$ … $}` blocks, `$$` line
/// statements and `{{ … }}` variables never collide with shader code.
/// Include names are joined under the `chunks/` subdirectory of the root.
fn build_environment(recorder: Arc<DependencyRecorder>) -> Environment<'static> {
    let mut env = Environment::new();

    let syntax = SyntaxConfig::builder()
        .block_delimiters("{$", "$}")
        .variable_delimiters("{{", "}}")
        .line_statement_prefix("$$")
        .build()
        .expect("Failed to configure template syntax");

    env.set_syntax(syntax);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_undefined_behavior(UndefinedBehavior::SemiStrict);

    env.set_loader(move |name| recorder.load(name));
    env.set_path_join_callback(|name, _parent| format!("chunks/{name}").into());

    env
}

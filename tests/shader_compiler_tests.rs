//! Shader Compiler Tests
//!
//! Tests for:
//! - ShaderCompiler: template rendering, include resolution, naga validation,
//!   entry-point checks, failure taxonomy
//! - Define handling: stage markers, LIGHTING_MODEL permutations producing
//!   distinct generated sources
//! - FileMetadata: dependency recording across includes

use std::path::PathBuf;

use prism::{CompileRequest, PrismError, ShaderCompiler, ShaderStage};

fn fixture_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("prism_compiler_{}_{tag}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("chunks")).unwrap();

    std::fs::write(
        root.join("chunks/types.wgsl"),
        "struct VOut {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) color: vec4<f32>,\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("triangle.wgsl"),
        concat!(
            "{$ include \"types\" $}\n",
            "\n",
            "@vertex\n",
            "fn vs_main(@location(0) position: vec3<f32>) -> VOut {\n",
            "    var out: VOut;\n",
            "    out.pos = vec4<f32>(position, 1.0);\n",
            "$$ if LIGHTING_MODEL is defined and LIGHTING_MODEL == \"1\"\n",
            "    out.color = vec4<f32>(1.0, 0.0, 0.0, 1.0);\n",
            "$$ else\n",
            "    out.color = vec4<f32>(1.0);\n",
            "$$ endif\n",
            "    return out;\n",
            "}\n",
            "\n",
            "@fragment\n",
            "fn fs_main(in: VOut) -> @location(0) vec4<f32> {\n",
            "    return in.color;\n",
            "}\n",
        ),
    )
    .unwrap();

    root
}

// ============================================================================
// Success Path
// ============================================================================

#[test]
fn compiles_vertex_and_pixel_stages_from_one_source() {
    let root = fixture_root("both_stages");
    let compiler = ShaderCompiler::new(&root);

    let vertex = compiler
        .compile(&CompileRequest::new("triangle", "vs_main", ShaderStage::Vertex))
        .unwrap();
    let pixel = compiler
        .compile(&CompileRequest::new("triangle", "fs_main", ShaderStage::Pixel))
        .unwrap();

    assert!(vertex.wgsl().contains("vs_main"));
    assert!(pixel.wgsl().contains("fs_main"));
    assert_eq!(compiler.compile_count(), 2);
}

#[test]
fn records_every_transitively_opened_file() {
    let root = fixture_root("dependencies");
    let compiler = ShaderCompiler::new(&root);

    let program = compiler
        .compile(&CompileRequest::new("triangle", "vs_main", ShaderStage::Vertex))
        .unwrap();

    let deps = program.metadata().dependencies();
    assert_eq!(deps.len(), 2);
    assert_eq!(program.metadata().source_path(), root.join("triangle.wgsl"));
    assert!(deps.iter().any(|(p, _)| p == &root.join("chunks/types.wgsl")));
}

#[test]
fn defines_select_distinct_permutations() {
    let root = fixture_root("permutations");
    let compiler = ShaderCompiler::new(&root);

    let base = CompileRequest::new("triangle", "vs_main", ShaderStage::Vertex);
    let gouraud = compiler
        .compile(&base.clone().with_define("LIGHTING_MODEL", "1"))
        .unwrap();
    let unlit = compiler
        .compile(&base.with_define("LIGHTING_MODEL", "4"))
        .unwrap();

    assert_ne!(gouraud.source_hash(), unlit.source_hash());
    assert!(gouraud.wgsl().contains("1.0, 0.0, 0.0"));
    assert!(!unlit.wgsl().contains("1.0, 0.0, 0.0"));
}

// ============================================================================
// Failure Taxonomy
// ============================================================================

#[test]
fn missing_source_file_is_reported() {
    let root = fixture_root("missing_source");
    let compiler = ShaderCompiler::new(&root);

    let result = compiler.compile(&CompileRequest::new(
        "no_such_template",
        "vs_main",
        ShaderStage::Vertex,
    ));
    assert!(matches!(
        result,
        Err(PrismError::ShaderSourceNotFound { .. })
    ));
}

#[test]
fn missing_include_fails_the_compile() {
    let root = fixture_root("missing_include");
    std::fs::write(
        root.join("broken.wgsl"),
        "{$ include \"nope\" $}\n@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0);\n}\n",
    )
    .unwrap();
    let compiler = ShaderCompiler::new(&root);

    let result = compiler.compile(&CompileRequest::new("broken", "fs_main", ShaderStage::Pixel));
    assert!(matches!(result, Err(PrismError::ShaderPreprocess { .. })));
}

#[test]
fn invalid_wgsl_is_reported_with_a_diagnostic() {
    let root = fixture_root("parse_error");
    std::fs::write(root.join("bad.wgsl"), "this is not wgsl at all\n").unwrap();
    let compiler = ShaderCompiler::new(&root);

    let result = compiler.compile(&CompileRequest::new("bad", "fs_main", ShaderStage::Pixel));
    match result {
        Err(PrismError::ShaderParse { message, .. }) => {
            assert!(!message.is_empty());
        }
        Err(other) => panic!("expected a parse error, got {other}"),
        Ok(_) => panic!("expected a parse error, got a compiled program"),
    }
}

#[test]
fn wrong_entry_point_is_rejected() {
    let root = fixture_root("entry_point");
    let compiler = ShaderCompiler::new(&root);

    // fs_main exists, but not as a vertex entry point.
    let result = compiler.compile(&CompileRequest::new(
        "triangle",
        "fs_main",
        ShaderStage::Vertex,
    ));
    assert!(matches!(result, Err(PrismError::EntryPointNotFound { .. })));

    let result = compiler.compile(&CompileRequest::new(
        "triangle",
        "does_not_exist",
        ShaderStage::Pixel,
    ));
    assert!(matches!(result, Err(PrismError::EntryPointNotFound { .. })));
}

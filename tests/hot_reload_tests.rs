//! Hot Reload Tests
//!
//! Tests for:
//! - Staleness detection: untouched sources never recompile
//! - Fail-safe swap: a broken recompile keeps the previous program bound and
//!   retries on every scan (no backoff)
//! - Baseline update: a successful swap installs a fresh dependency snapshot
//! - Shared vertex program: scanned once per pass, replacement visible to
//!   every variant that references it by key
//!
//! Fixtures are real files in a per-test temp directory named like the
//! built-in sources, so `register_builtin_variants` runs against them
//! unchanged. Staleness is driven deterministically with
//! `File::set_modified`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use prism::{LightingModel, ShaderCompiler, ShaderPipeline, ShaderRegistry};

const GOOD_PIXEL: &str = concat!(
    "{$ include \"types\" $}\n",
    "{$ include \"util\" $}\n",
    "\n",
    "@fragment\n",
    "fn fs_main(in: VOut) -> @location(0) vec4<f32> {\n",
    "$$ if LIGHTING_MODEL == \"4\"\n",
    "    return in.color;\n",
    "$$ else\n",
    "    return vec4<f32>(brighten(in.color.rgb), in.color.a);\n",
    "$$ endif\n",
    "}\n",
);

fn fixture_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("prism_hot_reload_{}_{tag}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("chunks")).unwrap();

    std::fs::write(
        root.join("chunks/types.wgsl"),
        "struct VOut {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) color: vec4<f32>,\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("chunks/util.wgsl"),
        "fn brighten(color: vec3<f32>) -> vec3<f32> {\n    return min(color * 1.25, vec3<f32>(1.0));\n}\n",
    )
    .unwrap();
    std::fs::write(
        root.join("static_mesh_vertex.wgsl"),
        concat!(
            "{$ include \"types\" $}\n",
            "\n",
            "@vertex\n",
            "fn vs_main(@location(0) position: vec3<f32>) -> VOut {\n",
            "    var out: VOut;\n",
            "    out.pos = vec4<f32>(position, 1.0);\n",
            "$$ if LIGHTING_MODEL == \"1\"\n",
            "    out.color = vec4<f32>(1.0, 0.0, 0.0, 1.0);\n",
            "$$ else\n",
            "    out.color = vec4<f32>(1.0);\n",
            "$$ endif\n",
            "    return out;\n",
            "}\n",
        ),
    )
    .unwrap();
    std::fs::write(root.join("static_mesh_pixel.wgsl"), GOOD_PIXEL).unwrap();

    root
}

fn registry_for(root: &Path) -> ShaderRegistry {
    let mut registry = ShaderRegistry::new(ShaderCompiler::new(root));
    registry.register_builtin_variants();
    assert_eq!(registry.vertex_count(), 2);
    assert_eq!(registry.pixel_count(), 4);
    registry
}

static TOUCH_OFFSET: AtomicU64 = AtomicU64::new(10);

/// Bumps a file's mtime to a unique future instant so consecutive touches
/// always differ regardless of filesystem timestamp granularity.
fn touch(path: &Path) {
    let offset = TOUCH_OFFSET.fetch_add(7, Ordering::Relaxed);
    let file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(offset))
        .unwrap();
}

fn all_pipelines(registry: &ShaderRegistry) -> Vec<ShaderPipeline> {
    LightingModel::ALL
        .iter()
        .map(|&m| registry.pipeline_for(m).unwrap())
        .collect()
}

// ============================================================================
// Staleness Detection
// ============================================================================

#[test]
fn scan_without_changes_recompiles_nothing() {
    let root = fixture_root("no_changes");
    let mut registry = registry_for(&root);
    let compiles = registry.compiler().compile_count();

    assert!(!registry.scan_and_reload());
    assert!(!registry.scan_and_reload());
    assert_eq!(registry.compiler().compile_count(), compiles);
}

#[test]
fn touching_a_pixel_only_include_reloads_only_pixel_variants() {
    let root = fixture_root("pixel_include");
    let mut registry = registry_for(&root);
    let before = all_pipelines(&registry);
    let compiles = registry.compiler().compile_count();

    touch(&root.join("chunks/util.wgsl"));
    assert!(registry.scan_and_reload());

    let after = all_pipelines(&registry);
    for (old, new) in before.iter().zip(&after) {
        assert!(!Arc::ptr_eq(&old.pixel, &new.pixel));
        assert!(Arc::ptr_eq(&old.vertex, &new.vertex));
    }
    // One recompile per pixel variant, none for the vertex programs.
    assert_eq!(registry.compiler().compile_count(), compiles + 4);
}

#[test]
fn successful_reload_installs_a_new_baseline() {
    let root = fixture_root("baseline");
    let mut registry = registry_for(&root);

    touch(&root.join("chunks/util.wgsl"));
    assert!(registry.scan_and_reload());

    // The fresh dependency snapshot is the new reference; nothing is stale.
    let compiles = registry.compiler().compile_count();
    assert!(!registry.scan_and_reload());
    assert_eq!(registry.compiler().compile_count(), compiles);
}

// ============================================================================
// Fail-Safe Swap
// ============================================================================

#[test]
fn failed_recompile_keeps_the_old_program_and_retries_every_scan() {
    let root = fixture_root("fail_safe");
    let mut registry = registry_for(&root);
    let old = registry.pipeline_for(LightingModel::Lambert).unwrap();

    let pixel_path = root.join("static_mesh_pixel.wgsl");
    std::fs::write(&pixel_path, "this is no longer wgsl\n").unwrap();
    touch(&pixel_path);

    // No successful reload; the previous programs stay bound.
    let compiles = registry.compiler().compile_count();
    assert!(!registry.scan_and_reload());
    let current = registry.pipeline_for(LightingModel::Lambert).unwrap();
    assert!(Arc::ptr_eq(&old.pixel, &current.pixel));
    assert_eq!(registry.compiler().compile_count(), compiles + 4);

    // Timestamps were not updated, so the next scan retries identically.
    assert!(!registry.scan_and_reload());
    assert_eq!(registry.compiler().compile_count(), compiles + 8);

    // Fixing the source recovers on the following scan.
    std::fs::write(&pixel_path, GOOD_PIXEL).unwrap();
    touch(&pixel_path);
    assert!(registry.scan_and_reload());
    let recovered = registry.pipeline_for(LightingModel::Lambert).unwrap();
    assert!(!Arc::ptr_eq(&old.pixel, &recovered.pixel));
    assert!(!registry.scan_and_reload());
}

// ============================================================================
// Shared Vertex Program
// ============================================================================

#[test]
fn touching_the_vertex_source_reloads_each_vertex_program_once() {
    let root = fixture_root("vertex_source");
    let mut registry = registry_for(&root);
    let before = all_pipelines(&registry);
    let compiles = registry.compiler().compile_count();

    touch(&root.join("static_mesh_vertex.wgsl"));
    assert!(registry.scan_and_reload());

    let after = all_pipelines(&registry);
    for (old, new) in before.iter().zip(&after) {
        assert!(!Arc::ptr_eq(&old.vertex, &new.vertex));
        assert!(Arc::ptr_eq(&old.pixel, &new.pixel));
    }
    // The shared program compiles once per scan, not once per variant that
    // references it: one shared + one Gouraud.
    assert_eq!(registry.compiler().compile_count(), compiles + 2);

    // The replacement is shared again.
    let lambert = registry.pipeline_for(LightingModel::Lambert).unwrap();
    let blinn = registry.pipeline_for(LightingModel::BlinnPhong).unwrap();
    assert!(Arc::ptr_eq(&lambert.vertex, &blinn.vertex));
}

#[test]
fn touching_a_shared_include_reloads_every_unit_exactly_once() {
    let root = fixture_root("shared_include");
    let mut registry = registry_for(&root);
    let compiles = registry.compiler().compile_count();

    touch(&root.join("chunks/types.wgsl"));
    assert!(registry.scan_and_reload());

    // 2 vertex programs + 4 pixel variants, each recompiled exactly once.
    assert_eq!(registry.compiler().compile_count(), compiles + 6);
}

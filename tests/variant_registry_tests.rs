//! Variant Registry Tests
//!
//! Tests for:
//! - register_builtin_variants against the crate's real shader sources:
//!   4 pixel programs, 2 distinct vertex programs, idempotent re-registration
//! - pipeline_for lookup semantics: shared vertex reuse, explicit None for
//!   unavailable variants
//! - Partial registration failure leaving the registry otherwise intact

use std::sync::Arc;

use prism::{
    CompileRequest, LightingModel, ShaderCompiler, ShaderRegistry, ShaderStage,
};

fn registry_with_builtins() -> ShaderRegistry {
    let mut registry = ShaderRegistry::new(ShaderCompiler::new("shaders"));
    registry.register_builtin_variants();
    registry
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn builtin_variants_register_four_pixel_and_two_vertex_programs() {
    let registry = registry_with_builtins();

    assert_eq!(registry.pixel_count(), 4);
    assert_eq!(registry.vertex_count(), 2);

    // Every variant resolves to a full pipeline.
    for model in LightingModel::ALL {
        assert!(registry.pipeline_for(model).is_some(), "{model:?}");
    }

    // Four distinct pixel programs from one shared source.
    let mut hashes: Vec<u128> = LightingModel::ALL
        .iter()
        .map(|&m| registry.pipeline_for(m).unwrap().pixel.source_hash())
        .collect();
    hashes.sort_unstable();
    hashes.dedup();
    assert_eq!(hashes.len(), 4);
}

#[test]
fn registering_builtin_variants_twice_compiles_nothing_new() {
    let mut registry = registry_with_builtins();
    let compiles_after_first = registry.compiler().compile_count();

    registry.register_builtin_variants();

    assert_eq!(registry.compiler().compile_count(), compiles_after_first);
    assert_eq!(registry.pixel_count(), 4);
    assert_eq!(registry.vertex_count(), 2);
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn non_gouraud_variants_share_one_vertex_program() {
    let registry = registry_with_builtins();

    let lambert = registry.pipeline_for(LightingModel::Lambert).unwrap();
    let blinn = registry.pipeline_for(LightingModel::BlinnPhong).unwrap();
    let unlit = registry.pipeline_for(LightingModel::Unlit).unwrap();
    let gouraud = registry.pipeline_for(LightingModel::Gouraud).unwrap();

    assert!(Arc::ptr_eq(&lambert.vertex, &blinn.vertex));
    assert!(Arc::ptr_eq(&lambert.vertex, &unlit.vertex));
    assert!(!Arc::ptr_eq(&lambert.vertex, &gouraud.vertex));
}

#[test]
fn unregistered_variant_lookup_returns_none() {
    let registry = ShaderRegistry::new(ShaderCompiler::new("shaders"));

    for model in LightingModel::ALL {
        assert!(registry.pipeline_for(model).is_none());
    }
    assert!(registry.vertex_by_key("StaticMeshVertexShader").is_none());
    assert!(registry.pixel_by_key("BlinnPhong").is_none());
}

#[test]
fn failed_registration_leaves_the_variant_unavailable() {
    let mut registry = registry_with_builtins();

    let result = registry.register_pixel(
        "Broken",
        CompileRequest::new("does_not_exist", "fs_main", ShaderStage::Pixel),
    );

    assert!(result.is_err());
    assert!(registry.pixel_by_key("Broken").is_none());
    // The rest of the registry is untouched.
    assert_eq!(registry.pixel_count(), 4);
}

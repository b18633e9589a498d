//! Lighting-Model Variants
//!
//! One [`LightingModel`] names one permutation of the shared static-mesh
//! shader source, selected at compile time through the `LIGHTING_MODEL`
//! define. Gouraud is the only variant that owns a dedicated vertex program
//! (lighting runs per vertex); every other variant shares the vertex program
//! registered under [`STATIC_MESH_VERTEX_KEY`] and varies only in pixel-stage
//! lighting math.

/// Registry key of the vertex program shared by all non-Gouraud variants.
pub const STATIC_MESH_VERTEX_KEY: &str = "StaticMeshVertexShader";

/// The lighting models the static-mesh pixel shader can be compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingModel {
    /// Per-vertex lighting, interpolated across the triangle.
    Gouraud,
    /// Per-pixel diffuse-only lighting.
    Lambert,
    /// Per-pixel diffuse + Blinn specular lighting.
    BlinnPhong,
    /// No lighting; surface color passes through.
    Unlit,
}

impl LightingModel {
    /// Every known variant, in registration order.
    pub const ALL: [LightingModel; 4] = [
        LightingModel::Gouraud,
        LightingModel::Lambert,
        LightingModel::BlinnPhong,
        LightingModel::Unlit,
    ];

    /// Stable registry key for this variant.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            LightingModel::Gouraud => "Gouraud",
            LightingModel::Lambert => "Lambert",
            LightingModel::BlinnPhong => "BlinnPhong",
            LightingModel::Unlit => "Unlit",
        }
    }

    /// Value of the `LIGHTING_MODEL` define baked into this variant.
    #[must_use]
    pub fn define_value(self) -> &'static str {
        match self {
            LightingModel::Gouraud => "1",
            LightingModel::Lambert => "2",
            LightingModel::BlinnPhong => "3",
            LightingModel::Unlit => "4",
        }
    }

    /// `true` for the variant that compiles its own vertex program.
    #[must_use]
    pub fn owns_vertex_shader(self) -> bool {
        matches!(self, LightingModel::Gouraud)
    }

    /// Registry key of the vertex program this variant draws with.
    #[must_use]
    pub fn vertex_key(self) -> &'static str {
        if self.owns_vertex_shader() {
            self.key()
        } else {
            STATIC_MESH_VERTEX_KEY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_gouraud_owns_a_vertex_shader() {
        assert_eq!(LightingModel::Gouraud.vertex_key(), "Gouraud");
        for model in [
            LightingModel::Lambert,
            LightingModel::BlinnPhong,
            LightingModel::Unlit,
        ] {
            assert!(!model.owns_vertex_shader());
            assert_eq!(model.vertex_key(), STATIC_MESH_VERTEX_KEY);
        }
    }

    #[test]
    fn define_values_are_distinct() {
        let mut values: Vec<_> = LightingModel::ALL
            .iter()
            .map(|m| m.define_value())
            .collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), LightingModel::ALL.len());
    }
}

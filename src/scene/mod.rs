//! Scene Model
//!
//! A deliberately small editor scene: a flat list of components over a closed
//! tagged set of categories. Render passes collect the components of their
//! category during `prepare_render` by matching on [`SceneComponent`] — no
//! runtime type inspection.

mod light;
mod mesh;

use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};

pub use light::{Light, LightKind};
pub use mesh::{StaticMesh, Vertex};

/// A mesh instance with its material constants.
#[derive(Clone)]
pub struct StaticMeshComponent {
    pub mesh: Arc<StaticMesh>,
    pub transform: Mat4,
    pub diffuse: Vec4,
    /// rgb: specular color, w: shininess exponent.
    pub specular: Vec4,
}

/// A camera-facing sprite.
#[derive(Debug, Clone)]
pub struct BillboardComponent {
    pub position: Vec3,
    pub size: f32,
    pub color: Vec4,
}

/// Height-fog settings for the fog pass.
#[derive(Debug, Clone)]
pub struct FogComponent {
    pub color: Vec3,
    pub density: f32,
    pub start: f32,
    pub end: f32,
    pub height_falloff: f32,
    pub max_opacity: f32,
}

impl Default for FogComponent {
    fn default() -> Self {
        Self {
            color: Vec3::new(0.6, 0.65, 0.7),
            density: 0.6,
            start: 5.0,
            end: 60.0,
            height_falloff: 0.05,
            max_opacity: 0.9,
        }
    }
}

/// The closed set of component categories the render passes consume.
#[derive(Clone)]
pub enum SceneComponent {
    StaticMesh(StaticMeshComponent),
    Billboard(BillboardComponent),
    Light(Light),
    Fog(FogComponent),
}

impl SceneComponent {
    /// World position of the component, used by the gizmo pass to anchor the
    /// selection gizmo.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        match self {
            SceneComponent::StaticMesh(mesh) => mesh.transform.w_axis.truncate(),
            SceneComponent::Billboard(billboard) => billboard.position,
            SceneComponent::Light(light) => light.position,
            SceneComponent::Fog(_) => Vec3::ZERO,
        }
    }
}

/// The editor scene: components plus the current selection.
#[derive(Default)]
pub struct Scene {
    pub components: Vec<SceneComponent>,
    pub selected: Option<usize>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns its index.
    pub fn add(&mut self, component: SceneComponent) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    /// The currently selected component, if any.
    #[must_use]
    pub fn selected_component(&self) -> Option<&SceneComponent> {
        self.selected.and_then(|index| self.components.get(index))
    }
}

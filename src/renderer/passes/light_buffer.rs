//! Light Buffer Update Pass
//!
//! Runs first every frame: collects the scene's light components and writes
//! the combined [`LightingUniforms`] into the `LightingConstants` buffer the
//! lit passes bind. Issues no draw calls.

use glam::{Vec3, Vec4};

use super::{FrameContext, PassInit, RenderPass};
use crate::renderer::LIGHTING_BUFFER;
use crate::renderer::viewport::Viewport;
use crate::resources::uniforms::{
    LightingUniforms, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS, PointLightData, SpotLightData,
};
use crate::scene::{LightKind, Scene, SceneComponent};

pub struct LightBufferPass {
    ambient: Option<Vec4>,
    sun: Option<(Vec3, Vec4)>,
    point_lights: Vec<PointLightData>,
    spot_lights: Vec<SpotLightData>,
}

impl LightBufferPass {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ambient: None,
            sun: None,
            point_lights: Vec::new(),
            spot_lights: Vec::new(),
        }
    }
}

impl Default for LightBufferPass {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPass for LightBufferPass {
    fn name(&self) -> &'static str {
        "Light Buffer Pass"
    }

    fn initialize(&mut self, _init: &mut PassInit<'_>) {}

    fn prepare_render(&mut self, scene: &Scene) {
        for component in &scene.components {
            let SceneComponent::Light(light) = component else {
                continue;
            };
            match &light.kind {
                LightKind::Ambient => {
                    self.ambient = Some(light.color.extend(light.intensity));
                }
                LightKind::Directional { direction } => {
                    self.sun = Some((*direction, light.color.extend(light.intensity)));
                }
                LightKind::Point { range } => {
                    if self.point_lights.len() < MAX_POINT_LIGHTS {
                        self.point_lights.push(PointLightData {
                            position: light.position.extend(*range),
                            color: light.color.extend(light.intensity),
                        });
                    } else {
                        log::debug!("Point light capacity exceeded, dropping light");
                    }
                }
                LightKind::Spot {
                    direction,
                    range,
                    inner_cone,
                    outer_cone,
                } => {
                    if self.spot_lights.len() < MAX_SPOT_LIGHTS {
                        self.spot_lights.push(SpotLightData {
                            position: light.position.extend(*range),
                            direction: direction.normalize_or_zero().extend(inner_cone.cos()),
                            color: (light.color * light.intensity).extend(outer_cone.cos()),
                        });
                    } else {
                        log::debug!("Spot light capacity exceeded, dropping light");
                    }
                }
            }
        }
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, _viewport: &Viewport) {
        let mut data = LightingUniforms {
            // Editor default lighting when the scene carries none of its own.
            ambient: self
                .ambient
                .unwrap_or(Vec4::new(0.2, 0.2, 0.25, 1.0)),
            ..Default::default()
        };

        let (sun_direction, sun_color) = self.sun.unwrap_or((
            Vec3::new(-1.0, -0.7, -0.5),
            Vec4::new(1.0, 1.0, 0.95, 1.5),
        ));
        data.sun_direction = sun_direction.normalize_or_zero().extend(0.0);
        data.sun_color = sun_color;

        data.counts = [
            self.point_lights.len() as u32,
            self.spot_lights.len() as u32,
            0,
            0,
        ];
        data.point_lights[..self.point_lights.len()].copy_from_slice(&self.point_lights);
        data.spot_lights[..self.spot_lights.len()].copy_from_slice(&self.spot_lights);

        frame.buffers.update(frame.queue, LIGHTING_BUFFER, &data);
    }

    fn clear_render_arr(&mut self) {
        self.ambient = None;
        self.sun = None;
        self.point_lights.clear();
        self.spot_lights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Light;

    #[test]
    fn prepare_collects_lights_by_category() {
        let mut scene = Scene::new();
        scene.add(SceneComponent::Light(Light::new_ambient(Vec3::ONE, 0.5)));
        scene.add(SceneComponent::Light(Light::new_point(
            Vec3::ONE,
            2.0,
            Vec3::new(1.0, 2.0, 3.0),
            10.0,
        )));
        scene.add(SceneComponent::Light(Light::new_spot(
            Vec3::ONE,
            1.0,
            Vec3::ZERO,
            Vec3::NEG_Y,
            15.0,
            0.3,
            0.5,
        )));

        let mut pass = LightBufferPass::new();
        pass.prepare_render(&scene);

        assert!(pass.ambient.is_some());
        assert_eq!(pass.point_lights.len(), 1);
        assert_eq!(pass.spot_lights.len(), 1);

        pass.clear_render_arr();
        assert!(pass.ambient.is_none());
        assert!(pass.point_lights.is_empty());
    }

    #[test]
    fn light_capacity_is_enforced() {
        let mut scene = Scene::new();
        for i in 0..(MAX_POINT_LIGHTS + 3) {
            scene.add(SceneComponent::Light(Light::new_point(
                Vec3::ONE,
                1.0,
                Vec3::new(i as f32, 0.0, 0.0),
                5.0,
            )));
        }

        let mut pass = LightBufferPass::new();
        pass.prepare_render(&scene);
        assert_eq!(pass.point_lights.len(), MAX_POINT_LIGHTS);
    }
}

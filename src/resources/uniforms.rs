//! Constant-Buffer Layouts
//!
//! CPU-side mirrors of the uniform ("constant") buffer structs declared by the
//! shader templates. Field order and padding must match the WGSL declarations
//! in `shaders/` exactly; every struct is `Pod` so it can be written into a
//! GPU buffer byte-for-byte.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Maximum number of point lights the light buffer holds per frame.
pub const MAX_POINT_LIGHTS: usize = 8;
/// Maximum number of spot lights the light buffer holds per frame.
pub const MAX_SPOT_LIGHTS: usize = 4;

/// Per-viewport camera constants (`camera` in `chunks/common.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view: Mat4,
    pub proj: Mat4,
    pub view_proj: Mat4,
    /// xyz: eye position, w unused.
    pub eye: Vec4,
}

/// Per-object constants (`object` in `chunks/object.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: Mat4,
    pub diffuse: Vec4,
    /// rgb: specular color, w: shininess exponent.
    pub specular: Vec4,
    /// x: selection highlight flag.
    pub flags: [u32; 4],
}

/// One point light entry in [`LightingUniforms`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct PointLightData {
    /// xyz: world position, w: range.
    pub position: Vec4,
    /// rgb: color, w: intensity.
    pub color: Vec4,
}

/// One spot light entry in [`LightingUniforms`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct SpotLightData {
    /// xyz: world position, w: range.
    pub position: Vec4,
    /// xyz: direction, w: cos(inner cone).
    pub direction: Vec4,
    /// rgb: color, w: cos(outer cone).
    pub color: Vec4,
}

/// Frame light buffer (`lights` in `chunks/lighting.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct LightingUniforms {
    /// rgb: ambient color, w: intensity.
    pub ambient: Vec4,
    /// xyz: directional light direction.
    pub sun_direction: Vec4,
    /// rgb: directional light color, w: intensity.
    pub sun_color: Vec4,
    /// x: point light count, y: spot light count.
    pub counts: [u32; 4],
    pub point_lights: [PointLightData; MAX_POINT_LIGHTS],
    pub spot_lights: [SpotLightData; MAX_SPOT_LIGHTS],
}

/// Height-fog constants (`fog` in `shaders/fog.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct FogUniforms {
    /// rgb: fog color, w: maximum opacity.
    pub color: Vec4,
    /// x: density, y: start distance, z: end distance, w: height falloff.
    pub params: Vec4,
    /// xyz: eye position.
    pub eye: Vec4,
    pub inv_view_proj: Mat4,
}

/// Screen constants shared by the fullscreen passes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct ScreenUniforms {
    /// x: width, y: height, z: near plane, w: far plane.
    pub size: Vec4,
}

/// Per-billboard constants (`billboard` in `shaders/billboard.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct BillboardUniforms {
    /// xyz: world position, w: half size.
    pub position: Vec4,
    pub color: Vec4,
}

/// Helper-geometry constants (`gizmo` in `shaders/gizmo.wgsl`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct HelperUniforms {
    pub model: Mat4,
    pub color: Vec4,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The WGSL side declares fixed-size uniform structs; a silent size drift
    // on the CPU side would corrupt every following field on the GPU.
    #[test]
    fn uniform_struct_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 208);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 112);
        assert_eq!(std::mem::size_of::<PointLightData>(), 32);
        assert_eq!(std::mem::size_of::<SpotLightData>(), 48);
        assert_eq!(
            std::mem::size_of::<LightingUniforms>(),
            48 + 16 + 32 * MAX_POINT_LIGHTS + 48 * MAX_SPOT_LIGHTS
        );
        assert_eq!(std::mem::size_of::<FogUniforms>(), 112);
        assert_eq!(std::mem::size_of::<HelperUniforms>(), 80);
    }
}

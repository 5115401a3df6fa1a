//! Constant-buffer records as the shader sees them.
//!
//! Layouts follow WGSL uniform rules: every `vec3` is padded to 16 bytes and
//! matrices are stored column-major (`Mat4::to_cols_array_2d`), which is what
//! `mat4x4<f32>` expects.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::item::RenderItem;
use crate::material::Material;

pub const MAX_DIRECTIONAL_LIGHTS: usize = 3;

/// Per-object record (`object_cb` in the shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world: [[f32; 4]; 4],
    pub world_inv_transpose: [[f32; 4]; 4],
    pub tex_transform: [[f32; 4]; 4],
}

impl ObjectConstants {
    pub fn from_item(item: &RenderItem) -> Self {
        Self {
            world: item.world.to_cols_array_2d(),
            world_inv_transpose: inverse_transpose(item.world).to_cols_array_2d(),
            tex_transform: item.tex_transform.to_cols_array_2d(),
        }
    }
}

/// Per-material record (`material_cb` in the shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaterialConstants {
    pub diffuse_albedo: [f32; 4],
    pub fresnel_r0: [f32; 3],
    pub roughness: f32,
    pub mat_transform: [[f32; 4]; 4],
}

impl MaterialConstants {
    pub fn from_material(material: &Material) -> Self {
        Self {
            diffuse_albedo: material.albedo.to_array(),
            fresnel_r0: material.fresnel_r0.to_array(),
            roughness: material.roughness,
            mat_transform: material.transform.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLight {
    pub strength: [f32; 3],
    pub _pad0: f32,
    /// Direction the light travels (from the light toward the scene).
    pub direction: [f32; 3],
    pub _pad1: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, strength: Vec3) -> Self {
        Self {
            strength: strength.to_array(),
            _pad0: 0.0,
            direction: direction.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Ambient term plus a fixed set of directional lights.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightRig {
    pub ambient: Vec4,
    pub lights: [DirectionalLight; MAX_DIRECTIONAL_LIGHTS],
}

impl Default for LightRig {
    /// One green key light shining along +Z; the other two slots are dark.
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            lights: [
                DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.99, 0.0)),
                DirectionalLight::new(Vec3::new(-0.57735, -0.57735, 0.57735), Vec3::ZERO),
                DirectionalLight::new(Vec3::new(0.0, -0.707, -0.707), Vec3::ZERO),
            ],
        }
    }
}

/// Per-frame inputs that feed [`PassConstants`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassInputs {
    pub view: Mat4,
    pub proj: Mat4,
    pub eye: Vec3,
    pub render_target_size: Vec2,
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
    pub lights: LightRig,
}

/// Per-pass record (`pass_cb` in the shader). Rebuilt every frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PassConstants {
    pub view: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye_pos_w: [f32; 3],
    pub _pad0: f32,
    pub render_target_size: [f32; 2],
    pub inv_render_target_size: [f32; 2],
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
    pub ambient_light: [f32; 4],
    pub lights: [DirectionalLight; MAX_DIRECTIONAL_LIGHTS],
}

impl PassConstants {
    pub fn new(inputs: &PassInputs) -> Self {
        let view_proj = inputs.proj * inputs.view;
        let size = inputs.render_target_size.max(Vec2::ONE);

        Self {
            view: inputs.view.to_cols_array_2d(),
            inv_view: inputs.view.inverse().to_cols_array_2d(),
            proj: inputs.proj.to_cols_array_2d(),
            inv_proj: inputs.proj.inverse().to_cols_array_2d(),
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            eye_pos_w: inputs.eye.to_array(),
            _pad0: 0.0,
            render_target_size: size.to_array(),
            inv_render_target_size: size.recip().to_array(),
            near_z: inputs.near_z,
            far_z: inputs.far_z,
            total_time: inputs.total_time,
            delta_time: inputs.delta_time,
            ambient_light: inputs.lights.ambient.to_array(),
            lights: inputs.lights.lights,
        }
    }
}

/// Normal matrix: inverse-transpose of the world with translation removed.
pub fn inverse_transpose(world: Mat4) -> Mat4 {
    let mut linear = world;
    linear.w_axis = Vec4::W;
    linear.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{OrbitCamera, Projection};

    #[test]
    fn record_sizes_match_the_shader_layout() {
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 192);
        assert_eq!(std::mem::size_of::<MaterialConstants>(), 96);
        assert_eq!(std::mem::size_of::<DirectionalLight>(), 32);
        assert_eq!(std::mem::size_of::<PassConstants>(), 544);
        assert_eq!(std::mem::offset_of!(PassConstants, eye_pos_w), 384);
        assert_eq!(std::mem::offset_of!(PassConstants, ambient_light), 432);
        assert_eq!(std::mem::offset_of!(PassConstants, lights), 448);
    }

    #[test]
    fn inverse_transpose_keeps_normals_perpendicular_under_nonuniform_scale() {
        let world = Mat4::from_scale(Vec3::new(6.0, 1.0, 1.0))
            * Mat4::from_rotation_y(0.3)
            * Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        let tangent = world.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        let normal = inverse_transpose(world).transform_vector3(Vec3::new(1.0, -1.0, 0.0));
        assert!(tangent.dot(normal).abs() < 1e-4);
    }

    #[test]
    fn pass_constants_carry_consistent_inverses() {
        let cam = OrbitCamera::default();
        let proj = Projection::default();
        let pass = PassConstants::new(&PassInputs {
            view: cam.view(),
            proj: proj.matrix(800.0 / 600.0),
            eye: cam.eye(),
            render_target_size: Vec2::new(800.0, 600.0),
            near_z: proj.near,
            far_z: proj.far,
            total_time: 1.5,
            delta_time: 0.016,
            lights: LightRig::default(),
        });

        let view_proj = Mat4::from_cols_array_2d(&pass.view_proj);
        let inv = Mat4::from_cols_array_2d(&pass.inv_view_proj);
        assert!((view_proj * inv).abs_diff_eq(Mat4::IDENTITY, 1e-3));
        assert_eq!(pass.inv_render_target_size, [1.0 / 800.0, 1.0 / 600.0]);
        assert_eq!(pass.lights[0].strength, [0.0, 0.99, 0.0]);
    }
}

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use stilllife_render::{UniformValue, uniforms};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct PointLightBlock {
    /// xyz position, w active.
    pub position: [f32; 4],
    /// w constant attenuation.
    pub ambient: [f32; 4],
    /// w linear attenuation.
    pub diffuse: [f32; 4],
    /// w quadratic attenuation.
    pub specular: [f32; 4],
}

/// Per-frame block at group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct GlobalUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz eye position, w use-lighting flag.
    pub view_position: [f32; 4],
    /// xyz direction, w active.
    pub light_direction: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub point_lights: [PointLightBlock; uniforms::MAX_POINT_LIGHTS],
}

/// Per-draw block at group 1, bound with a dynamic offset.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// xy uv scale, z use-texture flag.
    pub uv_scale: [f32; 4],
    /// xyz diffuse color, w shininess.
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            ..Zeroable::zeroed()
        }
    }
}

impl Default for ObjectUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            uv_scale: [1.0, 1.0, 0.0, 0.0],
            diffuse: [1.0, 1.0, 1.0, 32.0],
            specular: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// CPU copy of every named uniform the shader understands.
#[derive(Debug, Default)]
pub(crate) struct UniformMirror {
    pub globals: GlobalUniforms,
    pub object: ObjectUniforms,
    /// Unit `objectTexture` samples from.
    pub texture_unit: u32,
}

fn flag(value: UniformValue) -> Option<f32> {
    value.as_bool().map(|b| if b { 1.0 } else { 0.0 })
}

fn write_xyz(slot: &mut [f32; 4], value: UniformValue) -> bool {
    match value.as_vec3() {
        Some(v) => {
            slot[..3].copy_from_slice(&v.to_array());
            true
        }
        None => false,
    }
}

fn write_w(slot: &mut [f32; 4], value: Option<f32>) -> bool {
    match value {
        Some(v) => {
            slot[3] = v;
            true
        }
        None => false,
    }
}

impl UniformMirror {
    /// Store `value` under `name`. Returns false for names or value types the
    /// shader has no slot for.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        let g = &mut self.globals;
        let o = &mut self.object;
        match name {
            uniforms::MODEL => match value.as_mat4() {
                Some(model) => {
                    o.model = model.to_cols_array_2d();
                    o.normal_matrix = model.inverse().transpose().to_cols_array_2d();
                    true
                }
                None => false,
            },
            uniforms::VIEW => value
                .as_mat4()
                .map(|m| g.view = m.to_cols_array_2d())
                .is_some(),
            uniforms::PROJECTION => value
                .as_mat4()
                .map(|m| g.projection = m.to_cols_array_2d())
                .is_some(),
            uniforms::VIEW_POSITION => write_xyz(&mut g.view_position, value),
            uniforms::USE_LIGHTING => write_w(&mut g.view_position, flag(value)),
            uniforms::USE_TEXTURE => match flag(value) {
                Some(f) => {
                    o.uv_scale[2] = f;
                    true
                }
                None => false,
            },
            uniforms::OBJECT_COLOR => value
                .as_vec4()
                .map(|c| o.color = c.to_array())
                .is_some(),
            uniforms::OBJECT_TEXTURE => match value.as_int() {
                Some(unit) if unit >= 0 => {
                    self.texture_unit = unit as u32;
                    true
                }
                _ => false,
            },
            uniforms::UV_SCALE => match value.as_vec2() {
                Some(uv) => {
                    o.uv_scale[0] = uv.x;
                    o.uv_scale[1] = uv.y;
                    true
                }
                None => false,
            },
            uniforms::MATERIAL_DIFFUSE => write_xyz(&mut o.diffuse, value),
            uniforms::MATERIAL_SHININESS => write_w(&mut o.diffuse, value.as_float()),
            uniforms::MATERIAL_SPECULAR => write_xyz(&mut o.specular, value),
            uniforms::DIRECTIONAL_DIRECTION => write_xyz(&mut g.light_direction, value),
            uniforms::DIRECTIONAL_ACTIVE => write_w(&mut g.light_direction, flag(value)),
            uniforms::DIRECTIONAL_AMBIENT => write_xyz(&mut g.light_ambient, value),
            uniforms::DIRECTIONAL_DIFFUSE => write_xyz(&mut g.light_diffuse, value),
            uniforms::DIRECTIONAL_SPECULAR => write_xyz(&mut g.light_specular, value),
            _ => self.set_point_light(name, value),
        }
    }

    fn set_point_light(&mut self, name: &str, value: UniformValue) -> bool {
        use uniforms::point_light as field;

        let Some((index, name)) = uniforms::parse_point_light_field(name) else {
            return false;
        };
        let Some(light) = self.globals.point_lights.get_mut(index) else {
            return false;
        };
        match name {
            field::POSITION => write_xyz(&mut light.position, value),
            field::ACTIVE => write_w(&mut light.position, flag(value)),
            field::AMBIENT => write_xyz(&mut light.ambient, value),
            field::CONSTANT => write_w(&mut light.ambient, value.as_float()),
            field::DIFFUSE => write_xyz(&mut light.diffuse, value),
            field::LINEAR => write_w(&mut light.diffuse, value.as_float()),
            field::SPECULAR => write_xyz(&mut light.specular, value),
            field::QUADRATIC => write_w(&mut light.specular, value.as_float()),
            _ => false,
        }
    }

    pub fn uses_texture(&self) -> bool {
        self.object.uv_scale[2] != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn block_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<PointLightBlock>(), 64);
        assert_eq!(std::mem::size_of::<GlobalUniforms>(), 464);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 192);
    }

    #[test]
    fn packs_flags_into_spare_lanes() {
        let mut mirror = UniformMirror::default();
        assert!(mirror.set("viewPosition", UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))));
        assert!(mirror.set("bUseLighting", UniformValue::Bool(true)));
        assert_eq!(mirror.globals.view_position, [1.0, 2.0, 3.0, 1.0]);

        assert!(mirror.set("UVscale", UniformValue::Vec2(Vec2::new(4.0, 2.0))));
        assert!(mirror.set("bUseTexture", UniformValue::Bool(true)));
        assert_eq!(mirror.object.uv_scale, [4.0, 2.0, 1.0, 0.0]);
        assert!(mirror.uses_texture());

        assert!(mirror.set("material.diffuseColor", UniformValue::Vec3(Vec3::splat(0.4))));
        assert!(mirror.set("material.shininess", UniformValue::Float(30.0)));
        assert_eq!(mirror.object.diffuse, [0.4, 0.4, 0.4, 30.0]);
    }

    #[test]
    fn point_light_fields_land_in_their_slot() {
        let mut mirror = UniformMirror::default();
        let pos = uniforms::point_light_field(1, uniforms::point_light::POSITION);
        let quad = uniforms::point_light_field(1, uniforms::point_light::QUADRATIC);
        assert!(mirror.set(&pos, UniformValue::Vec3(Vec3::new(-2.0, 6.0, -4.0))));
        assert!(mirror.set(&quad, UniformValue::Float(0.0075)));
        let light = mirror.globals.point_lights[1];
        assert_eq!(light.position[..3], [-2.0, 6.0, -4.0]);
        assert_eq!(light.specular[3], 0.0075);
        assert_eq!(mirror.globals.point_lights[0], PointLightBlock::zeroed());
    }

    #[test]
    fn rejects_unknown_names_and_wrong_types() {
        let mut mirror = UniformMirror::default();
        assert!(!mirror.set("fogDensity", UniformValue::Float(1.0)));
        assert!(!mirror.set("objectColor", UniformValue::Float(1.0)));
        assert!(!mirror.set("objectTexture", UniformValue::Int(-1)));
        let overflow = uniforms::point_light_field(uniforms::MAX_POINT_LIGHTS, "position");
        assert!(!mirror.set(&overflow, UniformValue::Vec3(Vec3::ONE)));
        assert_eq!(mirror.object.color, [1.0; 4]);
    }

    #[test]
    fn model_updates_normal_matrix() {
        let mut mirror = UniformMirror::default();
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        assert!(mirror.set("model", UniformValue::Mat4(model)));
        let normal = Mat4::from_cols_array_2d(&mirror.object.normal_matrix);
        assert!(normal.abs_diff_eq(Mat4::from_scale(Vec3::new(0.5, 1.0, 1.0)), 1e-6));
    }
}

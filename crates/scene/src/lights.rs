use glam::Vec3;
use serde::Serialize;
use stilllife_render::RenderContext;
use stilllife_render::uniforms::{self, point_light, point_light_field};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub active: bool,
}

/// Lighting state pushed once during preparation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightingSetup {
    pub use_lighting: bool,
    pub directional: DirectionalLight,
    pub point_lights: Vec<PointLight>,
}

impl Default for LightingSetup {
    /// Warm key light from above and behind, plus one sun-like point light.
    fn default() -> Self {
        Self {
            use_lighting: true,
            directional: DirectionalLight {
                direction: Vec3::new(0.3, -1.0, 0.5).normalize(),
                ambient: Vec3::splat(0.15),
                diffuse: Vec3::new(1.0, 0.95, 0.8),
                specular: Vec3::splat(0.8),
                active: true,
            },
            point_lights: vec![PointLight {
                position: Vec3::new(-2.0, 6.0, -4.0),
                ambient: Vec3::splat(0.2),
                diffuse: Vec3::new(1.0, 0.98, 0.9),
                specular: Vec3::splat(0.8),
                constant: 1.0,
                linear: 0.045,
                quadratic: 0.0075,
                active: true,
            }],
        }
    }
}

impl LightingSetup {
    pub fn apply(&self, ctx: &mut RenderContext<'_>) {
        ctx.set_bool(uniforms::USE_LIGHTING, self.use_lighting);

        let d = &self.directional;
        ctx.set_vec3(uniforms::DIRECTIONAL_DIRECTION, d.direction);
        ctx.set_vec3(uniforms::DIRECTIONAL_AMBIENT, d.ambient);
        ctx.set_vec3(uniforms::DIRECTIONAL_DIFFUSE, d.diffuse);
        ctx.set_vec3(uniforms::DIRECTIONAL_SPECULAR, d.specular);
        ctx.set_bool(uniforms::DIRECTIONAL_ACTIVE, d.active);

        if self.point_lights.len() > uniforms::MAX_POINT_LIGHTS {
            tracing::warn!(
                "{} point lights configured, only {} are shaded",
                self.point_lights.len(),
                uniforms::MAX_POINT_LIGHTS
            );
        }
        for (i, light) in self
            .point_lights
            .iter()
            .take(uniforms::MAX_POINT_LIGHTS)
            .enumerate()
        {
            ctx.set_vec3(&point_light_field(i, point_light::POSITION), light.position);
            ctx.set_vec3(&point_light_field(i, point_light::AMBIENT), light.ambient);
            ctx.set_vec3(&point_light_field(i, point_light::DIFFUSE), light.diffuse);
            ctx.set_vec3(&point_light_field(i, point_light::SPECULAR), light.specular);
            ctx.set_float(&point_light_field(i, point_light::CONSTANT), light.constant);
            ctx.set_float(&point_light_field(i, point_light::LINEAR), light.linear);
            ctx.set_float(&point_light_field(i, point_light::QUADRATIC), light.quadratic);
            ctx.set_bool(&point_light_field(i, point_light::ACTIVE), light.active);
        }
        tracing::debug!("lighting applied with {} point lights", self.point_lights.len());
    }
}

use crate::backend::{RenderBackend, RenderError, TextureHandle, TextureUpload, UniformValue};
use glam::{Mat4, Vec2, Vec3, Vec4};
use stilllife_common::ShapeKind;
use stilllife_geometry::MeshData;

/// Explicit handle to the active shading backend.
///
/// Passed by reference into every registry, composer and script operation.
/// A detached context drops uniform writes, unit binds and draws without
/// complaint; operations that must produce a resource report
/// [`RenderError::BackendUnavailable`].
pub struct RenderContext<'a> {
    backend: Option<&'a mut dyn RenderBackend>,
}

impl<'a> RenderContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A context with no backend behind it.
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match self.backend.as_deref_mut() {
            Some(backend) => backend.set_uniform(name, value),
            None => tracing::trace!("detached: skipped uniform {name}"),
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    pub fn create_texture(
        &mut self,
        label: &str,
        upload: &TextureUpload<'_>,
    ) -> Result<TextureHandle, RenderError> {
        upload.validate()?;
        self.backend
            .as_deref_mut()
            .ok_or(RenderError::BackendUnavailable)?
            .create_texture(label, upload)
    }

    pub fn bind_texture_unit(&mut self, unit: u32, handle: TextureHandle) {
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.bind_texture_unit(unit, handle);
        }
    }

    pub fn destroy_texture(&mut self, handle: TextureHandle) {
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.destroy_texture(handle);
        }
    }

    pub fn load_mesh(&mut self, shape: ShapeKind, mesh: &MeshData) -> Result<(), RenderError> {
        if mesh.triangle_count() == 0 {
            return Err(RenderError::EmptyMesh(shape));
        }
        self.backend
            .as_deref_mut()
            .ok_or(RenderError::BackendUnavailable)?
            .load_mesh(shape, mesh)
    }

    pub fn draw_mesh(&mut self, shape: ShapeKind) {
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.draw_mesh(shape);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::PixelFormat;
    use crate::recording::RecordingBackend;

    #[test]
    fn detached_context_skips_silently() {
        let mut ctx = RenderContext::detached();
        assert!(!ctx.is_attached());
        ctx.set_bool("bUseTexture", true);
        ctx.set_mat4("model", Mat4::IDENTITY);
        ctx.bind_texture_unit(0, TextureHandle(1));
        ctx.draw_mesh(ShapeKind::Box);
    }

    #[test]
    fn detached_context_cannot_create_resources() {
        let mut ctx = RenderContext::detached();
        let pixels = [255u8; 3];
        let upload = TextureUpload {
            width: 1,
            height: 1,
            format: PixelFormat::Rgb8,
            pixels: &pixels,
        };
        assert!(matches!(
            ctx.create_texture("t", &upload),
            Err(RenderError::BackendUnavailable)
        ));
        let mesh = stilllife_geometry::generate(ShapeKind::Plane);
        assert!(matches!(
            ctx.load_mesh(ShapeKind::Plane, &mesh),
            Err(RenderError::BackendUnavailable)
        ));
    }

    #[test]
    fn attached_context_forwards_calls() {
        let mut backend = RecordingBackend::new();
        {
            let mut ctx = RenderContext::new(&mut backend);
            ctx.set_float("material.shininess", 30.0);
            ctx.set_vec2("UVscale", Vec2::new(4.0, 3.0));
        }
        assert_eq!(
            backend.uniform("material.shininess"),
            Some(UniformValue::Float(30.0))
        );
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn invalid_upload_never_reaches_backend() {
        let mut backend = RecordingBackend::new();
        let mut ctx = RenderContext::new(&mut backend);
        let upload = TextureUpload {
            width: 2,
            height: 2,
            format: PixelFormat::Rgba8,
            pixels: &[0u8; 4],
        };
        assert!(ctx.create_texture("bad", &upload).is_err());
        drop(ctx);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut backend = RecordingBackend::new();
        let mut ctx = RenderContext::new(&mut backend);
        assert!(matches!(
            ctx.load_mesh(ShapeKind::Sphere, &MeshData::default()),
            Err(RenderError::EmptyMesh(ShapeKind::Sphere))
        ));
    }
}

use crate::backend::{
    MeshBackend, PixelFormat, RenderError, ShaderBackend, TextureBackend, TextureHandle,
    TextureUpload, UniformValue,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use stilllife_common::ShapeKind;
use stilllife_geometry::MeshData;

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum BackendCall {
    SetUniform {
        name: String,
        value: UniformValue,
    },
    CreateTexture {
        label: String,
        handle: TextureHandle,
        width: u32,
        height: u32,
        format: PixelFormat,
    },
    BindTextureUnit {
        unit: u32,
        handle: TextureHandle,
    },
    DestroyTexture {
        handle: TextureHandle,
    },
    LoadMesh {
        shape: ShapeKind,
        vertices: usize,
        triangles: usize,
    },
    DrawMesh {
        shape: ShapeKind,
    },
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendCall::SetUniform { name, value } => write!(f, "uniform {name} = {value}"),
            BackendCall::CreateTexture {
                label,
                handle,
                width,
                height,
                format,
            } => write!(f, "create {handle} '{label}' {width}x{height} {format:?}"),
            BackendCall::BindTextureUnit { unit, handle } => write!(f, "bind unit {unit} <- {handle}"),
            BackendCall::DestroyTexture { handle } => write!(f, "destroy {handle}"),
            BackendCall::LoadMesh {
                shape,
                vertices,
                triangles,
            } => write!(f, "load mesh {shape} ({vertices} vertices, {triangles} triangles)"),
            BackendCall::DrawMesh { shape } => write!(f, "draw {shape}"),
        }
    }
}

/// Uniform and texture-unit state observed by one draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawRecord {
    pub shape: ShapeKind,
    pub uniforms: BTreeMap<String, UniformValue>,
    pub units: BTreeMap<u32, TextureHandle>,
}

impl DrawRecord {
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }
}

/// Backend that performs no rendering and records every call it receives.
///
/// Tracks the same persistent state a GPU backend would: current uniform
/// values, texture-unit bindings and live textures.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    uniforms: BTreeMap<String, UniformValue>,
    units: BTreeMap<u32, TextureHandle>,
    live: BTreeSet<TextureHandle>,
    meshes: BTreeSet<ShapeKind>,
    draws: Vec<DrawRecord>,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Current value of a uniform.
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name).copied()
    }

    /// Texture currently bound to `unit`.
    pub fn bound_unit(&self, unit: u32) -> Option<TextureHandle> {
        self.units.get(&unit).copied()
    }

    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    pub fn is_mesh_loaded(&self, shape: ShapeKind) -> bool {
        self.meshes.contains(&shape)
    }

    /// Drop recorded calls and draws, keeping backend state.
    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.draws.clear();
    }

    /// Human-readable listing of every recorded call.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Backend transcript ({} calls, {} draws, {} live textures) ===\n",
            self.calls.len(),
            self.draws.len(),
            self.live.len()
        ));
        for (i, call) in self.calls.iter().enumerate() {
            out.push_str(&format!("{i:>4}  {call}\n"));
        }
        out
    }
}

impl ShaderBackend for RecordingBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
        self.calls.push(BackendCall::SetUniform {
            name: name.to_string(),
            value,
        });
    }
}

impl TextureBackend for RecordingBackend {
    fn create_texture(
        &mut self,
        label: &str,
        upload: &TextureUpload<'_>,
    ) -> Result<TextureHandle, RenderError> {
        upload.validate()?;
        let handle = TextureHandle(self.next_handle.max(1));
        self.next_handle = handle.0 + 1;
        self.live.insert(handle);
        self.calls.push(BackendCall::CreateTexture {
            label: label.to_string(),
            handle,
            width: upload.width,
            height: upload.height,
            format: upload.format,
        });
        Ok(handle)
    }

    fn bind_texture_unit(&mut self, unit: u32, handle: TextureHandle) {
        self.units.insert(unit, handle);
        self.calls.push(BackendCall::BindTextureUnit { unit, handle });
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if !self.live.remove(&handle) {
            tracing::warn!("destroy of unknown or already destroyed texture {handle}");
        }
        self.units.retain(|_, bound| *bound != handle);
        self.calls.push(BackendCall::DestroyTexture { handle });
    }
}

impl MeshBackend for RecordingBackend {
    fn load_mesh(&mut self, shape: ShapeKind, mesh: &MeshData) -> Result<(), RenderError> {
        self.meshes.insert(shape);
        self.calls.push(BackendCall::LoadMesh {
            shape,
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
        });
        Ok(())
    }

    fn draw_mesh(&mut self, shape: ShapeKind) {
        if !self.meshes.contains(&shape) {
            tracing::warn!("draw of {shape} before its mesh was loaded");
        }
        self.draws.push(DrawRecord {
            shape,
            uniforms: self.uniforms.clone(),
            units: self.units.clone(),
        });
        self.calls.push(BackendCall::DrawMesh { shape });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_upload(pixels: &[u8]) -> TextureUpload<'_> {
        TextureUpload {
            width: 1,
            height: 1,
            format: PixelFormat::Rgb8,
            pixels,
        }
    }

    #[test]
    fn handles_are_distinct_and_nonzero() {
        let mut backend = RecordingBackend::new();
        let a = backend.create_texture("a", &rgb_upload(&[0, 0, 0])).unwrap();
        let b = backend.create_texture("b", &rgb_upload(&[1, 1, 1])).unwrap();
        assert_ne!(a, b);
        assert_ne!(a.0, 0);
        assert_eq!(backend.live_textures(), 2);
    }

    #[test]
    fn draws_snapshot_current_state() {
        let mut backend = RecordingBackend::new();
        backend.set_uniform("bUseTexture", UniformValue::Bool(false));
        backend.draw_mesh(ShapeKind::Box);
        backend.set_uniform("bUseTexture", UniformValue::Bool(true));
        backend.draw_mesh(ShapeKind::Box);

        let draws = backend.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].uniform("bUseTexture"), Some(UniformValue::Bool(false)));
        assert_eq!(draws[1].uniform("bUseTexture"), Some(UniformValue::Bool(true)));
    }

    #[test]
    fn destroy_unbinds_and_frees() {
        let mut backend = RecordingBackend::new();
        let t = backend.create_texture("t", &rgb_upload(&[9, 9, 9])).unwrap();
        backend.bind_texture_unit(0, t);
        assert_eq!(backend.bound_unit(0), Some(t));
        backend.destroy_texture(t);
        assert_eq!(backend.bound_unit(0), None);
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn transcript_lists_calls() {
        let mut backend = RecordingBackend::new();
        backend.set_uniform("material.shininess", UniformValue::Float(5.0));
        backend.draw_mesh(ShapeKind::Plane);
        let text = backend.transcript();
        assert!(text.contains("2 calls, 1 draws"));
        assert!(text.contains("uniform material.shininess = 5.000"));
        assert!(text.contains("draw plane"));
    }

    #[test]
    fn calls_serialize_as_tagged_json() {
        let call = BackendCall::DrawMesh {
            shape: ShapeKind::Torus,
        };
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, r#"{"call":"draw_mesh","shape":"Torus"}"#);
    }

    #[test]
    fn clear_log_keeps_state() {
        let mut backend = RecordingBackend::new();
        backend.set_uniform("model", UniformValue::Int(1));
        backend.clear_log();
        assert!(backend.calls().is_empty());
        assert_eq!(backend.uniform("model"), Some(UniformValue::Int(1)));
    }
}

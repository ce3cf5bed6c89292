use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt;
use stilllife_common::ShapeKind;
use stilllife_geometry::MeshData;

/// Errors raised by render backends and the render context.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no render backend attached")]
    BackendUnavailable,
    #[error("texture has zero extent: {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },
    #[error("texture data size mismatch: expected {expected} bytes, got {actual}")]
    UploadSizeMismatch { expected: usize, actual: usize },
    #[error("mesh for {0} has no triangles")]
    EmptyMesh(ShapeKind),
    #[error("backend error: {0}")]
    Backend(String),
}

/// A value written to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UniformValue::Bool(b) => Some(*b),
            UniformValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            UniformValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            UniformValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            UniformValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_mat4(&self) -> Option<Mat4> {
        match self {
            UniformValue::Mat4(m) => Some(*m),
            _ => None,
        }
    }
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Bool(b) => write!(f, "{b}"),
            UniformValue::Int(i) => write!(f, "{i}"),
            UniformValue::Float(v) => write!(f, "{v:.3}"),
            UniformValue::Vec2(v) => write!(f, "({:.3}, {:.3})", v.x, v.y),
            UniformValue::Vec3(v) => write!(f, "({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
            UniformValue::Vec4(v) => {
                write!(f, "({:.3}, {:.3}, {:.3}, {:.3})", v.x, v.y, v.z, v.w)
            }
            UniformValue::Mat4(m) => {
                f.write_str("[")?;
                for (i, col) in m.to_cols_array_2d().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{:.3} {:.3} {:.3} {:.3}", col[0], col[1], col[2], col[3])?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Opaque backend texture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Pixel layout of an upload. Only 3 and 4 channel images are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Decoded, already-flipped pixel rows ready for upload.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: &'a [u8],
}

impl TextureUpload<'_> {
    /// Check extent and buffer length against the declared format.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyTexture {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize * self.format.channels();
        if self.pixels.len() != expected {
            return Err(RenderError::UploadSizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Number of mip levels down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }
}

/// Named uniform writes.
pub trait ShaderBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// Texture creation, unit binding and teardown.
///
/// Created textures use repeat wrapping, linear filtering and a full mip chain.
pub trait TextureBackend {
    fn create_texture(
        &mut self,
        label: &str,
        upload: &TextureUpload<'_>,
    ) -> Result<TextureHandle, RenderError>;
    fn bind_texture_unit(&mut self, unit: u32, handle: TextureHandle);
    fn destroy_texture(&mut self, handle: TextureHandle);
}

/// Shape mesh upload and draw.
pub trait MeshBackend {
    fn load_mesh(&mut self, shape: ShapeKind, mesh: &MeshData) -> Result<(), RenderError>;
    /// Draw a loaded shape with the uniform and texture state current right now.
    fn draw_mesh(&mut self, shape: ShapeKind);
}

/// Everything the scene needs from a backend.
pub trait RenderBackend: ShaderBackend + TextureBackend + MeshBackend {}

impl<T: ShaderBackend + TextureBackend + MeshBackend + ?Sized> RenderBackend for T {}

//! Rendering adapter: the contract between the scene and a shading backend.
//!
//! Scene code never talks to a backend directly. Every uniform write, texture
//! upload and draw goes through a [`RenderContext`] that is passed by
//! reference into each operation. A context may be detached, in which case
//! uniform writes and draws are silently skipped.
//!
//! # Invariants
//! - Uniform names are the wire contract with the shader; see [`uniforms`].
//! - A backend keeps the last value written to each uniform until it is
//!   overwritten. Draws observe whatever state is current when they are issued.
//! - Texture units are plain indices; binding a unit replaces what it held.
//!
//! # Backends
//! [`RecordingBackend`] captures every call for tests and the CLI transcript.
//! The wgpu backend lives in `stilllife-render-wgpu` and implements the same
//! traits, so consumers never change when the backend does.

mod backend;
mod context;
mod recording;
pub mod uniforms;

pub use backend::{
    MeshBackend, PixelFormat, RenderBackend, RenderError, ShaderBackend, TextureBackend,
    TextureHandle, TextureUpload, UniformValue,
};
pub use context::RenderContext;
pub use recording::{BackendCall, DrawRecord, RecordingBackend};

pub fn crate_info() -> &'static str {
    "stilllife-render v0.1.0"
}

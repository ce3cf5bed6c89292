use glam::Vec3;
use serde::Serialize;

/// Surface response used by the lighting model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectMaterial {
    pub tag: String,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
}

/// Append-only list of named materials.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: Vec<ObjectMaterial>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material. Tags are not checked for duplicates.
    pub fn define(
        &mut self,
        tag: impl Into<String>,
        diffuse_color: Vec3,
        specular_color: Vec3,
        shininess: f32,
    ) {
        let tag = tag.into();
        if shininess <= 0.0 {
            tracing::warn!("material '{tag}' has non-positive shininess {shininess}");
        }
        tracing::debug!("defined material '{tag}'");
        self.materials.push(ObjectMaterial {
            tag,
            diffuse_color,
            specular_color,
            shininess,
        });
    }

    /// First material whose tag matches exactly.
    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectMaterial> {
        self.materials.iter()
    }
}

//! Compiled-in scene data: material presets and the texture manifest.

use glam::Vec3;
use stilllife_assets::MaterialRegistry;
use stilllife_common::ShapeKind;

/// Named material values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPreset {
    pub tag: &'static str,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
}

pub const MATERIAL_PRESETS: [MaterialPreset; 5] = [
    MaterialPreset {
        tag: "wood",
        diffuse_color: Vec3::new(0.2, 0.2, 0.3),
        specular_color: Vec3::ZERO,
        shininess: 5.0,
    },
    MaterialPreset {
        tag: "mug",
        diffuse_color: Vec3::splat(0.4),
        specular_color: Vec3::splat(0.2),
        shininess: 30.0,
    },
    MaterialPreset {
        tag: "tackleBox",
        diffuse_color: Vec3::splat(0.4),
        specular_color: Vec3::splat(0.2),
        shininess: 15.0,
    },
    MaterialPreset {
        tag: "fish",
        diffuse_color: Vec3::splat(0.6),
        specular_color: Vec3::splat(0.3),
        shininess: 50.0,
    },
    MaterialPreset {
        tag: "cork",
        diffuse_color: Vec3::new(0.8, 0.6, 0.4),
        specular_color: Vec3::splat(0.1),
        shininess: 5.0,
    },
];

/// Image file and the tag it is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSource {
    /// Relative to the asset root.
    pub path: &'static str,
    pub tag: &'static str,
}

/// Textures in load order. Slot numbers follow this order when every load
/// succeeds.
pub const TEXTURE_MANIFEST: [TextureSource; 8] = [
    TextureSource {
        path: "Textures/Mug_Texture.jpg",
        tag: "mugTexture",
    },
    TextureSource {
        path: "Textures/Table_Texture.jpg",
        tag: "tableTexture",
    },
    TextureSource {
        path: "Textures/Trout_Texture.jpg",
        tag: "troutTexture",
    },
    TextureSource {
        path: "Textures/Rod_Texture.jpg",
        tag: "rodTexture",
    },
    TextureSource {
        path: "Textures/Box_Texture.jpg",
        tag: "boxTexture",
    },
    TextureSource {
        path: "Textures/Cork_Texture.jpg",
        tag: "corkTexture",
    },
    TextureSource {
        path: "Textures/Tail_Texture.jpg",
        tag: "tailTexture",
    },
    TextureSource {
        path: "Textures/Reel_Texture.jpg",
        tag: "reelTexture",
    },
];

/// Meshes are uploaded once each, in this order.
pub const MESH_LOAD_ORDER: [ShapeKind; 5] = [
    ShapeKind::Plane,
    ShapeKind::Cylinder,
    ShapeKind::Torus,
    ShapeKind::Box,
    ShapeKind::Sphere,
];

/// Append every preset to `registry`.
pub fn define_presets(registry: &mut MaterialRegistry) {
    for preset in &MATERIAL_PRESETS {
        registry.define(
            preset.tag,
            preset.diffuse_color,
            preset.specular_color,
            preset.shininess,
        );
    }
}

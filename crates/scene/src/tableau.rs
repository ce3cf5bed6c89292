use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;
use std::collections::BTreeMap;
use stilllife_common::{ShapeKind, TransformParams};

const WHITE: Vec4 = Vec4::ONE;
const DARK_METAL: Vec4 = Vec4::new(0.2, 0.2, 0.2, 1.0);

/// One draw in the tableau.
///
/// Surface state is applied in field order: color, then texture, then UV
/// scale, then material. Unset fields leave the backend's current value alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneObject {
    pub label: String,
    pub shape: ShapeKind,
    pub transform: TransformParams,
    /// Flat color; also switches texture sampling off.
    pub color: Option<Vec4>,
    /// Texture tag; switches texture sampling on.
    pub texture: Option<String>,
    pub uv_scale: Option<Vec2>,
    pub material: Option<String>,
}

impl SceneObject {
    pub fn new(label: impl Into<String>, shape: ShapeKind, transform: TransformParams) -> Self {
        Self {
            label: label.into(),
            shape,
            transform,
            color: None,
            texture: None,
            uv_scale: None,
            material: None,
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_texture(mut self, tag: impl Into<String>) -> Self {
        self.texture = Some(tag.into());
        self
    }

    pub fn with_uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some(Vec2::new(u, v));
        self
    }

    pub fn with_material(mut self, tag: impl Into<String>) -> Self {
        self.material = Some(tag.into());
        self
    }

    /// White base color under a tiled texture, the common textured setup.
    fn textured(self, tag: &str, u: f32, v: f32) -> Self {
        self.with_color(WHITE).with_texture(tag).with_uv_scale(u, v)
    }
}

fn place(scale: Vec3, rotation_degrees: Vec3, translation: Vec3) -> TransformParams {
    TransformParams::new(scale, rotation_degrees, translation)
}

/// Ordered list of everything drawn each frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Tableau {
    objects: Vec<SceneObject>,
}

impl Tableau {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        Self { objects }
    }

    /// Mug of coffee, tackle box, rod and reel, and a trout on a wooden table.
    pub fn still_life() -> Self {
        let mut objects = vec![
            SceneObject::new(
                "table",
                ShapeKind::Plane,
                place(Vec3::new(25.0, 1.0, 15.0), Vec3::ZERO, Vec3::new(0.0, -0.5, 0.0)),
            )
            .textured("tableTexture", 4.0, 3.0)
            .with_material("wood"),
            SceneObject::new(
                "mug body",
                ShapeKind::Cylinder,
                place(
                    Vec3::new(1.2, 2.0, 1.2),
                    Vec3::new(0.0, 30.0, 0.0),
                    Vec3::new(4.0, 0.0, 0.0),
                ),
            )
            .textured("mugTexture", 1.0, 1.0)
            .with_material("mug"),
            SceneObject::new(
                "mug handle",
                ShapeKind::Torus,
                place(Vec3::new(0.5, 0.75, 0.5), Vec3::ZERO, Vec3::new(5.25, 1.0, 0.0)),
            )
            .textured("mugTexture", 1.0, 1.0)
            .with_material("mug"),
            SceneObject::new(
                "coffee",
                ShapeKind::Cylinder,
                place(
                    Vec3::new(1.1, 0.1, 1.1),
                    Vec3::new(0.0, 30.0, 0.0),
                    Vec3::new(4.0, 1.91, 0.0),
                ),
            )
            .with_color(Vec4::new(0.2, 0.1, 0.05, 1.0)),
            SceneObject::new(
                "tackle box",
                ShapeKind::Box,
                place(
                    Vec3::new(4.0, 2.0, 2.5),
                    Vec3::new(0.0, 15.0, 0.0),
                    Vec3::new(-4.0, 1.0, -1.0),
                ),
            )
            .textured("boxTexture", 1.0, 1.0)
            .with_material("tackleBox"),
            SceneObject::new(
                "rod handle",
                ShapeKind::Cylinder,
                place(
                    Vec3::new(0.3, 3.0, 0.3),
                    Vec3::new(0.0, -20.0, 90.0),
                    Vec3::new(0.0, 0.15, 2.0),
                ),
            )
            .textured("corkTexture", 1.0, 1.0)
            .with_material("cork"),
            SceneObject::new(
                "rod shaft",
                ShapeKind::Cylinder,
                place(
                    Vec3::new(0.15, 14.0, 0.15),
                    Vec3::new(0.0, -20.0, 90.0),
                    Vec3::new(1.25, 0.15, 2.0),
                ),
            )
            .textured("rodTexture", 1.0, 3.0),
            SceneObject::new(
                "reel body",
                ShapeKind::Cylinder,
                place(Vec3::new(0.6, 0.2, 0.6), Vec3::ZERO, Vec3::new(0.65, 0.05, 2.75)),
            )
            .textured("reelTexture", 1.0, 1.0)
            .with_material("tackleBox"),
            SceneObject::new(
                "reel side",
                ShapeKind::Cylinder,
                place(Vec3::new(0.3, 0.1, 0.3), Vec3::ZERO, Vec3::new(0.65, 0.2, 2.75)),
            )
            .with_color(DARK_METAL)
            .with_material("tackleBox"),
            SceneObject::new(
                "fish body",
                ShapeKind::Sphere,
                place(
                    Vec3::new(3.0, 0.8, 0.4),
                    Vec3::new(270.0, 10.0, 0.0),
                    Vec3::new(0.0, -0.4, 6.0),
                ),
            )
            .textured("troutTexture", 2.0, 1.0)
            .with_material("fish"),
            SceneObject::new(
                "fish eye",
                ShapeKind::Sphere,
                place(
                    Vec3::new(0.15, 0.15, 0.05),
                    Vec3::new(270.0, 10.0, 10.0),
                    Vec3::new(-2.3, -0.2, 6.1),
                ),
            )
            .with_color(Vec4::new(0.1, 0.1, 0.1, 1.0)),
            SceneObject::new(
                "fish tail",
                ShapeKind::Box,
                place(
                    Vec3::new(0.8, 0.1, 0.8),
                    Vec3::new(0.0, 54.0, 0.0),
                    Vec3::new(2.95, -0.4, 5.475),
                ),
            )
            .textured("tailTexture", 1.0, 1.0)
            .with_material("fish"),
        ];

        // Eyelets are spaced along the rod, projected onto X at -20 degrees.
        let rod_cos = (-20.0_f32).to_radians().cos();
        for (i, along) in [2.5_f32, 4.5, 6.5, 8.5, 10.5].into_iter().enumerate() {
            objects.push(
                SceneObject::new(
                    format!("eyelet {}", i + 1),
                    ShapeKind::Torus,
                    place(
                        Vec3::splat(0.15),
                        Vec3::new(0.0, 90.0, 0.0),
                        Vec3::new(-15.0 + along * rod_cos, 0.15, 2.26),
                    ),
                )
                .with_color(DARK_METAL)
                .with_material("tackleBox"),
            );
        }

        // Steam shares one translucent color set on the first puff.
        for (i, (height, offset)) in [(2.2_f32, 0.1_f32), (2.5, -0.1), (2.8, 0.0)]
            .into_iter()
            .enumerate()
        {
            let puff = SceneObject::new(
                format!("steam {}", i + 1),
                ShapeKind::Sphere,
                place(Vec3::splat(0.2), Vec3::ZERO, Vec3::new(4.0 + offset, height, 0.0)),
            );
            objects.push(if i == 0 {
                puff.with_color(Vec4::new(1.0, 1.0, 1.0, 0.3))
            } else {
                puff
            });
        }

        Self { objects }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.label == label)
    }

    pub fn draws_per_shape(&self) -> BTreeMap<ShapeKind, usize> {
        let mut counts = BTreeMap::new();
        for object in &self.objects {
            *counts.entry(object.shape).or_insert(0) += 1;
        }
        counts
    }

    /// Every texture tag referenced, first use first.
    pub fn texture_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for tag in self.objects.iter().filter_map(|o| o.texture.as_deref()) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

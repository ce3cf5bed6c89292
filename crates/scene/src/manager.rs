use crate::lights::LightingSetup;
use crate::presets::{self, MESH_LOAD_ORDER, TEXTURE_MANIFEST};
use crate::tableau::{SceneObject, Tableau};
use glam::{Vec2, Vec4};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stilllife_assets::{MaterialRegistry, TextureRegistry};
use stilllife_common::TransformParams;
use stilllife_render::{RenderContext, uniforms};

/// A manifest texture that could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureFailure {
    pub tag: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of [`SceneManager::prepare_scene`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrepareReport {
    pub textures_loaded: usize,
    pub texture_failures: Vec<TextureFailure>,
    pub materials_defined: usize,
    pub meshes_loaded: usize,
}

/// Owns the scene registries and drives preparation, rendering and teardown.
pub struct SceneManager {
    asset_root: PathBuf,
    textures: TextureRegistry,
    materials: MaterialRegistry,
    lighting: LightingSetup,
    tableau: Tableau,
}

impl SceneManager {
    /// Scene with the still-life tableau and default lighting. Texture paths
    /// are resolved against `asset_root`.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self::with_tableau(asset_root, Tableau::still_life())
    }

    pub fn with_tableau(asset_root: impl Into<PathBuf>, tableau: Tableau) -> Self {
        Self {
            asset_root: asset_root.into(),
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            lighting: LightingSetup::default(),
            tableau,
        }
    }

    /// Load textures, define materials, push lights and upload meshes.
    ///
    /// Failures are logged and reported, never returned. Preparing again
    /// releases the previous textures and rebuilds both registries.
    pub fn prepare_scene(&mut self, ctx: &mut RenderContext<'_>) -> PrepareReport {
        if !self.textures.is_empty() || !self.materials.is_empty() {
            tracing::info!("re-preparing scene, releasing previous resources");
            self.release(ctx);
            self.materials = MaterialRegistry::new();
        }

        let mut report = PrepareReport::default();
        self.load_scene_textures(ctx, &mut report);
        self.define_object_materials();
        report.materials_defined = self.materials.len();
        self.lighting.apply(ctx);

        for shape in MESH_LOAD_ORDER {
            let mesh = stilllife_geometry::generate(shape);
            match ctx.load_mesh(shape, &mesh) {
                Ok(()) => report.meshes_loaded += 1,
                Err(e) => tracing::warn!("could not load {shape} mesh: {e}"),
            }
        }

        tracing::info!(
            "scene prepared: {} textures ({} failed), {} materials, {} meshes",
            report.textures_loaded,
            report.texture_failures.len(),
            report.materials_defined,
            report.meshes_loaded
        );
        report
    }

    fn load_scene_textures(&mut self, ctx: &mut RenderContext<'_>, report: &mut PrepareReport) {
        for source in &TEXTURE_MANIFEST {
            let path = self.asset_root.join(source.path);
            match self.textures.load(ctx, &path, source.tag) {
                Ok(_) => report.textures_loaded += 1,
                Err(e) => report.texture_failures.push(TextureFailure {
                    tag: source.tag.to_string(),
                    path,
                    reason: e.to_string(),
                }),
            }
        }
        self.textures.bind_all(ctx);
    }

    fn define_object_materials(&mut self) {
        presets::define_presets(&mut self.materials);
    }

    /// Issue one frame of draws for every tableau object, in order.
    pub fn render_scene(&self, ctx: &mut RenderContext<'_>) {
        for object in self.tableau.objects() {
            self.draw_object(ctx, object);
        }
    }

    fn draw_object(&self, ctx: &mut RenderContext<'_>, object: &SceneObject) {
        tracing::trace!("drawing {} as {}", object.label, object.shape);
        self.set_transformations(ctx, &object.transform);
        if let Some(color) = object.color {
            self.set_shader_color(ctx, color);
        }
        if let Some(tag) = &object.texture {
            self.set_shader_texture(ctx, tag);
        }
        if let Some(uv) = object.uv_scale {
            self.set_texture_uv_scale(ctx, uv);
        }
        if let Some(tag) = &object.material {
            self.set_shader_material(ctx, tag);
        }
        ctx.draw_mesh(object.shape);
    }

    /// Compose the model matrix and push it.
    pub fn set_transformations(&self, ctx: &mut RenderContext<'_>, transform: &TransformParams) {
        ctx.set_mat4(uniforms::MODEL, transform.model_matrix());
    }

    /// Draw with a flat color and texture sampling off.
    pub fn set_shader_color(&self, ctx: &mut RenderContext<'_>, color: Vec4) {
        ctx.set_bool(uniforms::USE_TEXTURE, false);
        ctx.set_vec4(uniforms::OBJECT_COLOR, color);
    }

    /// Sample the texture registered under `tag`.
    ///
    /// An unknown tag turns texture sampling off; the object draws with the
    /// current color.
    pub fn set_shader_texture(&self, ctx: &mut RenderContext<'_>, tag: &str) {
        match self.textures.find_slot(tag) {
            Some(slot) => {
                ctx.set_bool(uniforms::USE_TEXTURE, true);
                ctx.set_int(uniforms::OBJECT_TEXTURE, slot as i32);
            }
            None => {
                tracing::debug!("texture '{tag}' not registered, drawing untextured");
                ctx.set_bool(uniforms::USE_TEXTURE, false);
            }
        }
    }

    pub fn set_texture_uv_scale(&self, ctx: &mut RenderContext<'_>, uv: Vec2) {
        ctx.set_vec2(uniforms::UV_SCALE, uv);
    }

    /// Push the material registered under `tag`; unknown tags push nothing.
    pub fn set_shader_material(&self, ctx: &mut RenderContext<'_>, tag: &str) {
        match self.materials.find(tag) {
            Some(material) => {
                ctx.set_vec3(uniforms::MATERIAL_DIFFUSE, material.diffuse_color);
                ctx.set_vec3(uniforms::MATERIAL_SPECULAR, material.specular_color);
                ctx.set_float(uniforms::MATERIAL_SHININESS, material.shininess);
            }
            None => tracing::debug!("material '{tag}' not defined"),
        }
    }

    /// Destroy every loaded texture exactly once.
    pub fn release(&mut self, ctx: &mut RenderContext<'_>) {
        self.textures.release_all(ctx);
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn lighting(&self) -> &LightingSetup {
        &self.lighting
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use image::{Rgb, RgbImage};
    use stilllife_common::ShapeKind;
    use stilllife_render::{RecordingBackend, UniformValue};

    /// Write every manifest texture under a fresh asset root.
    fn asset_root_with_textures() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (i, source) in TEXTURE_MANIFEST.iter().enumerate() {
            let path = dir.path().join(source.path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            RgbImage::from_pixel(4, 4, Rgb([i as u8 * 20, 100, 50]))
                .save(&path)
                .unwrap();
        }
        dir
    }

    fn prepared(root: &Path) -> (SceneManager, RecordingBackend, PrepareReport) {
        let mut backend = RecordingBackend::new();
        let mut scene = SceneManager::new(root);
        let report = scene.prepare_scene(&mut RenderContext::new(&mut backend));
        (scene, backend, report)
    }

    fn draw<'a>(
        scene: &SceneManager,
        backend: &'a RecordingBackend,
        label: &str,
    ) -> &'a stilllife_render::DrawRecord {
        let index = scene
            .tableau()
            .objects()
            .iter()
            .position(|o| o.label == label)
            .unwrap();
        &backend.draws()[index]
    }

    #[test]
    fn prepare_loads_everything() {
        let root = asset_root_with_textures();
        let (scene, backend, report) = prepared(root.path());

        assert_eq!(report.textures_loaded, 8);
        assert!(report.texture_failures.is_empty());
        assert_eq!(report.materials_defined, 5);
        assert_eq!(report.meshes_loaded, 5);

        for (slot, source) in TEXTURE_MANIFEST.iter().enumerate() {
            assert_eq!(scene.textures().find_slot(source.tag), Some(slot as u32));
            assert_eq!(
                backend.bound_unit(slot as u32),
                scene.textures().find_handle(source.tag)
            );
        }
        for shape in ShapeKind::ALL {
            assert!(backend.is_mesh_loaded(shape));
        }
        assert_eq!(backend.uniform("bUseLighting"), Some(UniformValue::Bool(true)));
    }

    #[test]
    fn render_issues_one_draw_per_object() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        backend.clear_log();
        scene.render_scene(&mut RenderContext::new(&mut backend));

        let shapes: Vec<_> = backend.draws().iter().map(|d| d.shape).collect();
        let expected: Vec<_> = scene.tableau().objects().iter().map(|o| o.shape).collect();
        assert_eq!(shapes.len(), 20);
        assert_eq!(shapes, expected);
    }

    #[test]
    fn table_draw_state() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        scene.render_scene(&mut RenderContext::new(&mut backend));

        let table = draw(&scene, &backend, "table");
        let slot = scene.textures().find_slot("tableTexture").unwrap() as i32;
        assert_eq!(table.uniform("bUseTexture"), Some(UniformValue::Bool(true)));
        assert_eq!(table.uniform("objectTexture"), Some(UniformValue::Int(slot)));
        assert_eq!(
            table.uniform("UVscale"),
            Some(UniformValue::Vec2(Vec2::new(4.0, 3.0)))
        );
        assert_eq!(table.uniform("material.shininess"), Some(UniformValue::Float(5.0)));
    }

    #[test]
    fn mug_samples_the_unit_its_slot_names() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        scene.render_scene(&mut RenderContext::new(&mut backend));

        let mug = draw(&scene, &backend, "mug body");
        let slot = scene.textures().find_slot("mugTexture").unwrap();
        assert_eq!(mug.uniform("objectTexture"), Some(UniformValue::Int(slot as i32)));
        assert_eq!(mug.units.get(&slot).copied(), scene.textures().find_handle("mugTexture"));

        let expected = scene.tableau().find("mug body").unwrap().transform.model_matrix();
        let model = mug.uniform("model").and_then(|v| v.as_mat4()).unwrap();
        assert!(model.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn coffee_inherits_material_and_disables_texture() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        scene.render_scene(&mut RenderContext::new(&mut backend));

        let coffee = draw(&scene, &backend, "coffee");
        assert_eq!(coffee.uniform("bUseTexture"), Some(UniformValue::Bool(false)));
        assert_eq!(
            coffee.uniform("objectColor"),
            Some(UniformValue::Vec4(Vec4::new(0.2, 0.1, 0.05, 1.0)))
        );
        assert_eq!(coffee.uniform("material.shininess"), Some(UniformValue::Float(30.0)));
    }

    #[test]
    fn steam_puffs_share_translucent_color() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        scene.render_scene(&mut RenderContext::new(&mut backend));

        for label in ["steam 1", "steam 2", "steam 3"] {
            let puff = draw(&scene, &backend, label);
            assert_eq!(
                puff.uniform("objectColor"),
                Some(UniformValue::Vec4(Vec4::new(1.0, 1.0, 1.0, 0.3)))
            );
            assert_eq!(puff.uniform("bUseTexture"), Some(UniformValue::Bool(false)));
        }
    }

    #[test]
    fn missing_textures_draw_untextured() {
        let empty = tempfile::tempdir().unwrap();
        let (scene, mut backend, report) = prepared(empty.path());
        assert_eq!(report.textures_loaded, 0);
        assert_eq!(report.texture_failures.len(), 8);
        assert!(scene.textures().is_empty());

        scene.render_scene(&mut RenderContext::new(&mut backend));
        assert_eq!(backend.draws().len(), 20);
        let table = draw(&scene, &backend, "table");
        assert_eq!(table.uniform("bUseTexture"), Some(UniformValue::Bool(false)));
        assert_eq!(table.uniform("objectTexture"), None);
    }

    #[test]
    fn frames_are_identical() {
        let root = asset_root_with_textures();
        let (scene, mut backend, _) = prepared(root.path());
        backend.clear_log();
        scene.render_scene(&mut RenderContext::new(&mut backend));
        let first = backend.draws().to_vec();
        backend.clear_log();
        scene.render_scene(&mut RenderContext::new(&mut backend));
        assert_eq!(backend.draws(), first.as_slice());
    }

    #[test]
    fn untextured_table_stays_opaque_across_frames() {
        let empty = tempfile::tempdir().unwrap();
        let (scene, mut backend, _) = prepared(empty.path());
        backend.clear_log();
        scene.render_scene(&mut RenderContext::new(&mut backend));
        let first = backend.draws().to_vec();
        backend.clear_log();
        scene.render_scene(&mut RenderContext::new(&mut backend));
        let second = backend.draws();

        assert_eq!(second, first.as_slice());
        let table = &second[0];
        assert_eq!(table.uniform("bUseTexture"), Some(UniformValue::Bool(false)));
        assert_eq!(
            table.uniform("objectColor"),
            Some(UniformValue::Vec4(Vec4::ONE))
        );
    }

    #[test]
    fn release_frees_every_texture() {
        let root = asset_root_with_textures();
        let (mut scene, mut backend, _) = prepared(root.path());
        assert_eq!(backend.live_textures(), 8);
        scene.release(&mut RenderContext::new(&mut backend));
        assert_eq!(backend.live_textures(), 0);
        assert!(scene.textures().is_empty());
    }

    #[test]
    fn prepare_twice_does_not_leak() {
        let root = asset_root_with_textures();
        let mut backend = RecordingBackend::new();
        let mut scene = SceneManager::new(root.path());
        scene.prepare_scene(&mut RenderContext::new(&mut backend));
        scene.prepare_scene(&mut RenderContext::new(&mut backend));
        assert_eq!(backend.live_textures(), 8);
        assert_eq!(scene.materials().len(), 5);
        assert_eq!(scene.textures().find_slot("mugTexture"), Some(0));
    }

    #[test]
    fn detached_context_is_harmless() {
        let root = asset_root_with_textures();
        let mut scene = SceneManager::new(root.path());
        let mut ctx = RenderContext::detached();
        let report = scene.prepare_scene(&mut ctx);
        assert_eq!(report.textures_loaded, 0);
        assert_eq!(report.meshes_loaded, 0);
        assert_eq!(report.materials_defined, 5);
        scene.render_scene(&mut ctx);
    }

    #[test]
    fn unknown_material_pushes_nothing() {
        let mut backend = RecordingBackend::new();
        let mut scene = SceneManager::new(".");
        scene.define_object_materials();
        scene.set_shader_material(&mut RenderContext::new(&mut backend), "glass");
        assert!(backend.calls().is_empty());
        scene.set_shader_material(&mut RenderContext::new(&mut backend), "fish");
        assert_eq!(
            backend.uniform("material.diffuseColor"),
            Some(UniformValue::Vec3(Vec3::splat(0.6)))
        );
    }
}

use std::collections::BTreeMap;
use stilllife_common::ShapeKind;
use stilllife_scene::SceneManager;
use stilllife_view::{ProjectionMode, ViewManager};

/// Read-only queries against the scene for the CLI and the overlay.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &SceneManager) -> SceneSummary {
        let tableau = scene.tableau();
        SceneSummary {
            textures: scene.textures().len(),
            materials: scene.materials().len(),
            objects: tableau.len(),
            draws_per_shape: tableau.draws_per_shape(),
            point_lights: scene.lighting().point_lights.len(),
        }
    }

    pub fn view(view: &ViewManager) -> ViewSummary {
        let camera = view.camera();
        ViewSummary {
            position: camera.position.to_array(),
            front: camera.front().to_array(),
            yaw: camera.yaw(),
            pitch: camera.pitch(),
            zoom: camera.zoom,
            speed: camera.movement_speed,
            mode: view.projection_mode(),
        }
    }

    /// Surface setup of one tableau object.
    pub fn inspect_object(scene: &SceneManager, label: &str) -> Option<ObjectInfo> {
        let Some(object) = scene.tableau().find(label) else {
            tracing::debug!("no tableau object labelled {label:?}");
            return None;
        };
        let texture_slot = object
            .texture
            .as_deref()
            .and_then(|tag| scene.textures().find_slot(tag));
        Some(ObjectInfo {
            label: object.label.clone(),
            shape: object.shape,
            translation: object.transform.translation.to_array(),
            scale: object.transform.scale.to_array(),
            rotation_degrees: object.transform.rotation_degrees.to_array(),
            texture: object.texture.clone(),
            texture_slot,
            material: object.material.clone(),
        })
    }

    pub fn list_objects(scene: &SceneManager) -> Vec<String> {
        scene
            .tableau()
            .objects()
            .iter()
            .map(|o| o.label.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub textures: usize,
    pub materials: usize,
    pub objects: usize,
    pub draws_per_shape: BTreeMap<ShapeKind, usize>,
    pub point_lights: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: textures={} materials={} objects={} point_lights={}",
            self.textures, self.materials, self.objects, self.point_lights
        )?;
        for (shape, count) in &self.draws_per_shape {
            write!(f, " {shape}={count}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ViewSummary {
    pub position: [f32; 3],
    pub front: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub speed: f32,
    pub mode: ProjectionMode,
}

impl std::fmt::Display for ViewSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} camera pos=({:.2}, {:.2}, {:.2}) yaw={:.1} pitch={:.1} zoom={:.0} speed={:.1}",
            self.mode,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.pitch,
            self.zoom,
            self.speed,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub label: String,
    pub shape: ShapeKind,
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    pub rotation_degrees: [f32; 3],
    pub texture: Option<String>,
    /// `None` when the object has no texture or its texture failed to load.
    pub texture_slot: Option<u32>,
    pub material: Option<String>,
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.label,
            self.shape,
            self.translation[0],
            self.translation[1],
            self.translation[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )?;
        match (&self.texture, self.texture_slot) {
            (Some(tag), Some(slot)) => write!(f, " texture={tag}@{slot}")?,
            (Some(tag), None) => write!(f, " texture={tag} (missing)")?,
            _ => {}
        }
        if let Some(material) = &self.material {
            write!(f, " material={material}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stilllife_input::Action;
    use stilllife_render::{RecordingBackend, RenderContext};

    #[test]
    fn summary_before_prepare() {
        let scene = SceneManager::new(".");
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.textures, 0);
        assert_eq!(summary.materials, 0);
        assert_eq!(summary.objects, 20);
        assert_eq!(summary.draws_per_shape[&ShapeKind::Torus], 6);
    }

    #[test]
    fn summary_after_prepare_without_textures() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = SceneManager::new(dir.path());
        let mut backend = RecordingBackend::new();
        scene.prepare_scene(&mut RenderContext::new(&mut backend));

        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.materials, 5);
        assert_eq!(summary.point_lights, 1);
        let text = summary.to_string();
        assert!(text.contains("materials=5"));
        assert!(text.contains("cylinder=6"));
    }

    #[test]
    fn inspect_known_and_unknown_objects() {
        let scene = SceneManager::new(".");
        let mug = SceneInspector::inspect_object(&scene, "mug body").unwrap();
        assert_eq!(mug.shape, ShapeKind::Cylinder);
        assert_eq!(mug.texture.as_deref(), Some("mugTexture"));
        assert_eq!(mug.texture_slot, None);
        assert!(mug.to_string().contains("(missing)"));
        assert!(SceneInspector::inspect_object(&scene, "teapot").is_none());
    }

    #[test]
    fn view_summary_reports_mode() {
        let mut view = ViewManager::new();
        view.apply(Action::UseOrthographic, 0.0);
        let summary = SceneInspector::view(&view);
        assert_eq!(summary.mode, ProjectionMode::Orthographic);
        assert!(summary.to_string().starts_with("Orthographic camera"));
    }

    #[test]
    fn lists_objects_in_order() {
        let scene = SceneManager::new(".");
        let labels = SceneInspector::list_objects(&scene);
        assert_eq!(labels.first().map(String::as_str), Some("table"));
        assert_eq!(labels.last().map(String::as_str), Some("steam 3"));
    }
}

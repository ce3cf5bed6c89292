use crate::image_data::{TextureError, TextureImage};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use stilllife_render::{PixelFormat, RenderContext, TextureHandle};

/// A successfully uploaded texture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureEntry {
    pub tag: String,
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

/// Insertion-ordered, tag-keyed texture table.
///
/// The slot of an entry is its index, and [`bind_all`](Self::bind_all) binds
/// each entry to the texture unit with that number.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
    /// First slot seen for each tag.
    first_slot: HashMap<String, usize>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path`, upload it and register it under `tag`.
    ///
    /// Returns the new slot. On failure the error is logged and the registry
    /// is left unchanged.
    pub fn load(
        &mut self,
        ctx: &mut RenderContext<'_>,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<u32, TextureError> {
        let path = path.as_ref();
        let result = TextureImage::open(path).and_then(|image| self.insert(ctx, tag, &image));
        match &result {
            Ok(slot) => tracing::info!(
                "loaded texture {} as '{tag}' in slot {slot}",
                path.display()
            ),
            Err(e) => tracing::warn!("could not load texture {} as '{tag}': {e}", path.display()),
        }
        result
    }

    /// Upload an already decoded image and register it under `tag`.
    pub fn insert(
        &mut self,
        ctx: &mut RenderContext<'_>,
        tag: &str,
        image: &TextureImage,
    ) -> Result<u32, TextureError> {
        let handle = ctx.create_texture(tag, &image.upload())?;
        let slot = self.entries.len();
        if self.first_slot.contains_key(tag) {
            tracing::warn!("duplicate texture tag '{tag}' in slot {slot} will never be found");
        } else {
            self.first_slot.insert(tag.to_string(), slot);
        }
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            width: image.width,
            height: image.height,
            format: image.format,
        });
        Ok(slot as u32)
    }

    /// Bind every entry to the unit equal to its slot, in insertion order.
    pub fn bind_all(&self, ctx: &mut RenderContext<'_>) {
        for (unit, entry) in self.entries.iter().enumerate() {
            ctx.bind_texture_unit(unit as u32, entry.handle);
        }
        tracing::debug!("bound {} textures", self.entries.len());
    }

    pub fn find_handle(&self, tag: &str) -> Option<TextureHandle> {
        self.first_slot.get(tag).map(|&slot| self.entries[slot].handle)
    }

    pub fn find_slot(&self, tag: &str) -> Option<u32> {
        self.first_slot.get(tag).map(|&slot| slot as u32)
    }

    /// Destroy every registered texture once and empty the registry.
    pub fn release_all(&mut self, ctx: &mut RenderContext<'_>) {
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            ctx.destroy_texture(entry.handle);
        }
        self.first_slot.clear();
        if count > 0 {
            tracing::info!("released {count} textures");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TextureEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, Rgb, RgbImage, Rgba, RgbaImage};
    use stilllife_render::RecordingBackend;

    fn write_rgb(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        RgbImage::from_pixel(4, 4, Rgb([120, 80, 40])).save(&path).unwrap();
        path
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = TextureRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.find_handle("mugTexture"), None);
        assert_eq!(registry.find_slot("mugTexture"), None);
    }

    #[test]
    fn slots_follow_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(dir.path(), "a.png");
        let b = dir.path().join("b.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 128])).save(&b).unwrap();

        let mut backend = RecordingBackend::new();
        let mut ctx = RenderContext::new(&mut backend);
        let mut registry = TextureRegistry::new();
        assert_eq!(registry.load(&mut ctx, &a, "first").unwrap(), 0);
        assert_eq!(registry.load(&mut ctx, &b, "second").unwrap(), 1);

        assert_eq!(registry.find_slot("first"), Some(0));
        assert_eq!(registry.find_slot("second"), Some(1));
        assert_eq!(registry.entries()[1].format, PixelFormat::Rgba8);
        assert_ne!(registry.find_handle("first"), registry.find_handle("second"));
        assert_eq!(registry.find_slot("First"), None);
    }

    #[test]
    fn one_and_two_channel_images_fail_and_append_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gray = dir.path().join("gray.png");
        GrayImage::new(2, 2).save(&gray).unwrap();
        let gray_alpha = dir.path().join("gray_alpha.png");
        GrayAlphaImage::new(2, 2).save(&gray_alpha).unwrap();

        let mut backend = RecordingBackend::new();
        let mut ctx = RenderContext::new(&mut backend);
        let mut registry = TextureRegistry::new();
        assert!(matches!(
            registry.load(&mut ctx, &gray, "gray"),
            Err(TextureError::UnsupportedChannels(1))
        ));
        assert!(matches!(
            registry.load(&mut ctx, &gray_alpha, "grayAlpha"),
            Err(TextureError::UnsupportedChannels(2))
        ));
        assert!(registry.is_empty());
        drop(ctx);
        assert_eq!(backend.live_textures(), 0);
    }

    #[test]
    fn duplicate_tags_first_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb(dir.path(), "wood.png");

        let mut backend = RecordingBackend::new();
        let mut ctx = RenderContext::new(&mut backend);
        let mut registry = TextureRegistry::new();
        let first = registry.load(&mut ctx, &path, "wood").unwrap();
        let second = registry.load(&mut ctx, &path, "wood").unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(second, 1);
        assert_eq!(registry.find_slot("wood"), Some(first));
        assert_eq!(registry.find_handle("wood"), Some(registry.entries()[0].handle));
    }

    #[test]
    fn mug_texture_slot_matches_bound_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Textures").join("Mug_Texture.jpg");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(8, 8, Rgb([200, 200, 200])).save(&path).unwrap();

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        {
            let mut ctx = RenderContext::new(&mut backend);
            registry.load(&mut ctx, &path, "mugTexture").unwrap();
            registry.bind_all(&mut ctx);
        }

        let slot = registry.find_slot("mugTexture").unwrap();
        assert_eq!(backend.bound_unit(slot), registry.find_handle("mugTexture"));
    }

    #[test]
    fn release_destroys_each_texture_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_rgb(dir.path(), "a.png");
        let b = write_rgb(dir.path(), "b.png");

        let mut backend = RecordingBackend::new();
        let mut registry = TextureRegistry::new();
        {
            let mut ctx = RenderContext::new(&mut backend);
            registry.load(&mut ctx, &a, "a").unwrap();
            registry.load(&mut ctx, &b, "b").unwrap();
            registry.release_all(&mut ctx);
            registry.release_all(&mut ctx);
        }

        assert!(registry.is_empty());
        assert_eq!(backend.live_textures(), 0);
        let destroys = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, stilllife_render::BackendCall::DestroyTexture { .. }))
            .count();
        assert_eq!(destroys, 2);
    }

    #[test]
    fn detached_load_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rgb(dir.path(), "a.png");
        let mut ctx = RenderContext::detached();
        let mut registry = TextureRegistry::new();
        assert!(matches!(
            registry.load(&mut ctx, &path, "a"),
            Err(TextureError::Render(_))
        ));
        assert!(registry.is_empty());
    }
}

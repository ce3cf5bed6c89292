//! Scene assets: decoded texture images and the two tag-keyed registries.
//!
//! Textures are identified by short string tags. The registry hands out
//! backend handles and texture-unit slots; callers never keep raw file paths
//! past load time.
//!
//! # Invariants
//! - Lookups are exact, case-sensitive tag matches. The first entry with a
//!   given tag wins; later duplicates are stored but never returned.
//! - A texture's slot is its insertion index and is also the unit it is
//!   bound to by [`TextureRegistry::bind_all`].
//! - A failed load appends nothing.
//! - Registries grow during preparation and are read-only while rendering.

mod image_data;
mod materials;
mod textures;

pub use image_data::{TextureError, TextureImage};
pub use materials::{MaterialRegistry, ObjectMaterial};
pub use textures::{TextureEntry, TextureRegistry};

pub fn crate_info() -> &'static str {
    "stilllife-assets v0.1.0"
}

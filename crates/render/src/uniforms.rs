//! Shader uniform names shared by the scene and every backend.

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";

pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const UV_SCALE: &str = "UVscale";

pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

pub const DIRECTIONAL_DIRECTION: &str = "directionalLight.direction";
pub const DIRECTIONAL_AMBIENT: &str = "directionalLight.ambient";
pub const DIRECTIONAL_DIFFUSE: &str = "directionalLight.diffuse";
pub const DIRECTIONAL_SPECULAR: &str = "directionalLight.specular";
pub const DIRECTIONAL_ACTIVE: &str = "directionalLight.bActive";

/// Point-light slots the shading backends reserve.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Fields of a `pointLights[i]` entry.
pub mod point_light {
    pub const POSITION: &str = "position";
    pub const AMBIENT: &str = "ambient";
    pub const DIFFUSE: &str = "diffuse";
    pub const SPECULAR: &str = "specular";
    pub const CONSTANT: &str = "constant";
    pub const LINEAR: &str = "linear";
    pub const QUADRATIC: &str = "quadratic";
    pub const ACTIVE: &str = "bActive";
}

/// Full uniform name for a field of point light `index`.
pub fn point_light_field(index: usize, field: &str) -> String {
    format!("pointLights[{index}].{field}")
}

/// Split `pointLights[i].field` into `(i, field)`.
pub fn parse_point_light_field(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("pointLights[")?;
    let (index, field) = rest.split_once("].")?;
    Some((index.parse().ok()?, field))
}

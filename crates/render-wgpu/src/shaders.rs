/// WGSL Phong shader for every scene object.
///
/// Group 0 holds camera and lights, group 1 the per-draw object block
/// (dynamic offset), group 2 the object texture and its sampler.
pub const OBJECT_SHADER: &str = r#"
struct PointLight {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
};

struct Globals {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    view_position: vec4<f32>,
    light_direction: vec4<f32>,
    light_ambient: vec4<f32>,
    light_diffuse: vec4<f32>,
    light_specular: vec4<f32>,
    point_lights: array<PointLight, 4>,
};

struct Object {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    uv_scale: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var<uniform> obj: Object;

@group(2) @binding(0)
var object_texture: texture_2d<f32>;
@group(2) @binding(1)
var object_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = obj.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.projection * globals.view * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = (obj.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.uv = vertex.uv;
    return out;
}

fn directional(normal: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(-globals.light_direction.xyz);
    let diff = max(dot(normal, light_dir), 0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), max(obj.diffuse.w, 1.0));

    let ambient = globals.light_ambient.xyz * base;
    let diffuse = globals.light_diffuse.xyz * diff * base * obj.diffuse.xyz;
    let specular = globals.light_specular.xyz * spec * obj.specular.xyz;
    return ambient + diffuse + specular;
}

fn point_light(light: PointLight, normal: vec3<f32>, frag_pos: vec3<f32>, view_dir: vec3<f32>, base: vec3<f32>) -> vec3<f32> {
    let to_light = light.position.xyz - frag_pos;
    let light_dir = normalize(to_light);
    let diff = max(dot(normal, light_dir), 0.0);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), max(obj.diffuse.w, 1.0));

    let dist = length(to_light);
    let attenuation = 1.0 / (light.ambient.w + light.diffuse.w * dist
        + light.specular.w * dist * dist);

    let ambient = light.ambient.xyz * base;
    let diffuse = light.diffuse.xyz * diff * base * obj.diffuse.xyz;
    let specular = light.specular.xyz * spec * obj.specular.xyz;
    return (ambient + diffuse + specular) * attenuation;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let sampled = textureSample(object_texture, object_sampler, in.uv * obj.uv_scale.xy);
    let base = select(obj.color, sampled, obj.uv_scale.z != 0.0);

    if (globals.view_position.w == 0.0) {
        return base;
    }

    let normal = normalize(in.world_normal);
    let view_dir = normalize(globals.view_position.xyz - in.world_position);

    var lit = vec3<f32>(0.0);
    if (globals.light_direction.w != 0.0) {
        lit += directional(normal, view_dir, base.rgb);
    }
    for (var i = 0u; i < 4u; i++) {
        let light = globals.point_lights[i];
        if (light.position.w != 0.0) {
            lit += point_light(light, normal, in.world_position, view_dir, base.rgb);
        }
    }
    return vec4<f32>(lit, base.a);
}
"#;

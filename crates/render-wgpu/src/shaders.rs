/// WGSL shader for all object kinds: per-instance model matrices are
/// fetched from a read-only storage buffer by instance index, so every
/// kind's draw shares one pipeline and one transform buffer.
pub const SCENE_SHADER: &str = r#"
struct CameraUniform {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct MaterialUniform {
    base_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(0) @binding(1)
var<storage, read> transforms: array<mat4x4<f32>>;

@group(0) @binding(2)
var<uniform> material: MaterialUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, @builtin(instance_index) instance: u32) -> VertexOutput {
    let model = transforms[instance];
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = camera.projection * camera.view * world_pos;
    out.world_normal = normalize(world_normal);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.3;
    let diffuse = max(abs(dot(in.world_normal, light_dir)), 0.0);
    let lighting = ambient + diffuse * 0.7;
    return vec4<f32>(material.base_color.rgb * lighting, material.base_color.a);
}
"#;

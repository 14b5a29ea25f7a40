/// WGSL shader for lit solid meshes.
///
/// Lighting mimics the page's soft pastel setup: warm key light, pink
/// fill, and a generous ambient term.
pub const SOLID_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
    @location(2) emissive: f32,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.emissive = instance.emissive.x;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let key_dir = normalize(vec3<f32>(3.0, 4.0, 5.0));
    let fill_dir = normalize(vec3<f32>(-3.0, 2.0, 2.0));
    let key = max(dot(in.world_normal, key_dir), 0.0) * 0.55;
    let fill = max(dot(in.world_normal, fill_dir), 0.0) * 0.25
        * vec3<f32>(1.0, 0.82, 0.86);
    let ambient = 0.45;
    let lighting = vec3<f32>(ambient + key) + fill;
    let lit = in.color.rgb * lighting + in.color.rgb * in.emissive;
    return vec4<f32>(lit, in.color.a);
}
"#;

/// WGSL shader for unlit lines and particle points.
pub const FLAT_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct FlatVertex {
    @location(0) position: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct FlatOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_flat(vertex: FlatVertex, instance: InstanceInput) -> FlatOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    var out: FlatOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_flat(in: FlatOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

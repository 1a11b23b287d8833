/// Uniform block, vertex stage and the fragment stage inputs shared by every
/// variant. Must stay in sync with [`crate::params::ShaderUniforms`].
pub(crate) const SHADER_PRELUDE: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    color_a: vec4<f32>,
    color_b: vec4<f32>,
    mouse: vec2<f32>,
    resolution: vec2<f32>,
    time: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) frag_coord: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) local: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.frag_coord = globals.view_proj * vec4<f32>(input.position, 1.0);
    out.uv = input.uv;
    out.local = input.position;
    return out;
}
"#;

/// Floats per vertex: position (3) + uv (2).
pub(crate) const QUAD_VERTEX_STRIDE: usize = 5;

/// A 2×2 plane centred on the origin in the XY plane.
pub const QUAD_VERTICES: &[f32] = &[
    // positions      // uvs
    -1.0, -1.0, 0.0, 0.0, 0.0, //
    1.0, -1.0, 0.0, 1.0, 0.0, //
    1.0, 1.0, 0.0, 1.0, 1.0, //
    -1.0, 1.0, 0.0, 0.0, 1.0, //
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 2, 0, 2, 3];

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::ParamName;

use super::shared::SHADER_PRELUDE;

/// Built-in fragment programs for the preview quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShaderVariant {
    /// Texture coordinates as red/green.
    #[default]
    Uv,
    /// Quad-local position as red/green.
    Position,
    /// Vertical blend from `u_color_a` to `u_color_b` in screen space.
    Gradient,
    /// Both colors blended over time.
    Pulse,
    /// A glow following the pointer.
    Pointer,
}

impl ShaderVariant {
    pub const ALL: [ShaderVariant; 5] = [
        ShaderVariant::Uv,
        ShaderVariant::Position,
        ShaderVariant::Gradient,
        ShaderVariant::Pulse,
        ShaderVariant::Pointer,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShaderVariant::Uv => "uv",
            ShaderVariant::Position => "position",
            ShaderVariant::Gradient => "gradient",
            ShaderVariant::Pulse => "pulse",
            ShaderVariant::Pointer => "pointer",
        }
    }

    /// Parameters the fragment program reads.
    pub fn parameters(self) -> &'static [ParamName] {
        match self {
            ShaderVariant::Uv | ShaderVariant::Position => &[],
            ShaderVariant::Gradient => &[
                ParamName::Resolution,
                ParamName::ColorA,
                ParamName::ColorB,
            ],
            ShaderVariant::Pulse => &[ParamName::Time, ParamName::ColorA, ParamName::ColorB],
            ShaderVariant::Pointer => &[
                ParamName::Pointer,
                ParamName::Resolution,
                ParamName::ColorA,
                ParamName::ColorB,
            ],
        }
    }

    fn fragment(self) -> &'static str {
        match self {
            ShaderVariant::Uv => {
                r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.uv.x, input.uv.y, 0.0, 1.0);
}
"#
            }
            ShaderVariant::Position => {
                r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.local.x, input.local.y, 0.0, 1.0);
}
"#
            }
            ShaderVariant::Gradient => {
                r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let uv = input.frag_coord.xy / globals.resolution;
    let color = mix(globals.color_a.rgb, globals.color_b.rgb, 1.0 - uv.y);
    return vec4<f32>(color, 1.0);
}
"#
            }
            ShaderVariant::Pulse => {
                r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let t = 0.5 + 0.5 * sin(globals.time);
    let color = mix(globals.color_a.rgb, globals.color_b.rgb, t);
    return vec4<f32>(color, 1.0);
}
"#
            }
            ShaderVariant::Pointer => {
                r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let radius = 0.25 * min(globals.resolution.x, globals.resolution.y);
    let d = distance(input.frag_coord.xy, globals.mouse);
    let glow = 1.0 - smoothstep(0.0, radius, d);
    let base = globals.color_b.rgb * vec3<f32>(input.uv, 0.5);
    return vec4<f32>(mix(base, globals.color_a.rgb, glow), 1.0);
}
"#
            }
        }
    }

    /// Complete WGSL module: shared prelude plus this variant's fragment stage.
    pub fn source(self) -> String {
        format!("{SHADER_PRELUDE}{}", self.fragment())
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for variant in ShaderVariant::ALL {
            assert_eq!(ShaderVariant::from_name(variant.name()), Some(variant));
        }
        assert_eq!(ShaderVariant::from_name("plasma"), None);
    }

    #[test]
    fn sources_declare_both_entry_points() {
        for variant in ShaderVariant::ALL {
            let source = variant.source();
            assert!(source.contains("fn vs_main"));
            assert!(source.contains("fn fs_main"));
        }
    }

    #[test]
    fn declared_parameters_match_source_usage() {
        let fields = [
            (ParamName::Time, "globals.time"),
            (ParamName::Pointer, "globals.mouse"),
            (ParamName::Resolution, "globals.resolution"),
            (ParamName::ColorA, "globals.color_a"),
            (ParamName::ColorB, "globals.color_b"),
        ];
        for variant in ShaderVariant::ALL {
            let fragment = variant.fragment();
            for (name, field) in fields {
                assert_eq!(
                    variant.parameters().contains(&name),
                    fragment.contains(field),
                    "{variant} / {name}"
                );
            }
        }
    }
}

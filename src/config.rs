use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::InputMode;
use crate::params::{ParamName, ParameterLayout};
use crate::render::ShaderVariant;
use crate::render_loop::TimeOrdering;

pub const USAGE: &str = "Usage: shader-preview [--variant uv|position|gradient|pulse|pointer] \
[--input auto|touch|pointer] [--advance-first] [--params u_time,u_mouse,...] \
[--color-a HEX] [--color-b HEX] [--size WxH] [--headless] [--frames N]";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("{0} expects a value")]
    MissingValue(&'static str),
    #[error("unknown shader variant {0:?}")]
    UnknownVariant(String),
    #[error("unknown input mode {0:?}")]
    UnknownInputMode(String),
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),
    #[error("invalid color {0:?} (expected hex such as #ff0000)")]
    InvalidColor(String),
    #[error("invalid window size {0:?} (expected WIDTHxHEIGHT)")]
    InvalidSize(String),
    #[error("invalid frame count {0:?}")]
    InvalidFrames(String),
    #[error("shader variant {variant} reads {missing}, which is not in the parameter set")]
    MissingParameter {
        variant: ShaderVariant,
        missing: ParamName,
    },
}

/// Startup configuration for a preview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub variant: ShaderVariant,
    pub input: InputMode,
    pub time_ordering: TimeOrdering,
    pub layout: ParameterLayout,
    pub width: u32,
    pub height: u32,
    pub headless: bool,
    pub frames: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            variant: ShaderVariant::default(),
            input: InputMode::default(),
            time_ordering: TimeOrdering::default(),
            layout: ParameterLayout::default(),
            width: 1280,
            height: 720,
            headless: false,
            frames: 120,
        }
    }
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parses command-line arguments, excluding the program name.
    pub fn parse_from<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().map(Into::<String>::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => config.headless = true,
                "--advance-first" => config.time_ordering = TimeOrdering::AdvanceThenDraw,
                "--variant" => {
                    let value = next_value(&mut args, "--variant")?;
                    config.variant = ShaderVariant::from_name(&value)
                        .ok_or(ConfigError::UnknownVariant(value))?;
                }
                "--input" => {
                    let value = next_value(&mut args, "--input")?;
                    config.input =
                        InputMode::from_name(&value).ok_or(ConfigError::UnknownInputMode(value))?;
                }
                "--params" => {
                    let value = next_value(&mut args, "--params")?;
                    config.layout.names = parse_param_list(&value)?;
                }
                "--color-a" => {
                    config.layout.color_a = parse_color(&next_value(&mut args, "--color-a")?)?;
                }
                "--color-b" => {
                    config.layout.color_b = parse_color(&next_value(&mut args, "--color-b")?)?;
                }
                "--size" => {
                    let (width, height) = parse_size(&next_value(&mut args, "--size")?)?;
                    config.width = width;
                    config.height = height;
                }
                "--frames" => {
                    let value = next_value(&mut args, "--frames")?;
                    config.frames = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidFrames(value))?;
                }
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
        }
        Ok(config)
    }

    /// Checks that the parameter set covers everything the variant reads.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .variant
            .parameters()
            .iter()
            .find(|name| !self.layout.contains(**name))
        {
            Some(&missing) => Err(ConfigError::MissingParameter {
                variant: self.variant,
                missing,
            }),
            None => Ok(()),
        }
    }
}

fn next_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ConfigError> {
    args.next().ok_or(ConfigError::MissingValue(flag))
}

fn parse_param_list(value: &str) -> Result<Vec<ParamName>, ConfigError> {
    let names = value
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            ParamName::from_uniform_name(name)
                .ok_or_else(|| ConfigError::UnknownParameter(name.trim().to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParameterLayout::with_names(names).names)
}

/// Parses `#rrggbb`, `0xrrggbb` or `rrggbb` into linear 0–1 components.
pub fn parse_color(value: &str) -> Result<Vec3, ConfigError> {
    let digits = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .unwrap_or(value);
    if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(value.to_string()));
    }
    let hex =
        u32::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidColor(value.to_string()))?;
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Ok(Vec3::new(channel(16), channel(8), channel(0)))
}

fn parse_size(value: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidSize(value.to_string());
    let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

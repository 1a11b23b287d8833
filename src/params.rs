use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names of the parameters the preview exposes to shader programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParamName {
    Time,
    Pointer,
    Resolution,
    ColorA,
    ColorB,
}

impl ParamName {
    pub const ALL: [ParamName; 5] = [
        ParamName::Time,
        ParamName::Pointer,
        ParamName::Resolution,
        ParamName::ColorA,
        ParamName::ColorB,
    ];

    /// Name of the uniform as shader authors refer to it.
    pub fn uniform_name(self) -> &'static str {
        match self {
            ParamName::Time => "u_time",
            ParamName::Pointer => "u_mouse",
            ParamName::Resolution => "u_resolution",
            ParamName::ColorA => "u_color_a",
            ParamName::ColorB => "u_color_b",
        }
    }

    pub fn from_uniform_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|param| param.uniform_name() == name || param.short_name() == name)
    }

    fn short_name(self) -> &'static str {
        &self.uniform_name()[2..]
    }

    pub fn kind(self) -> ParamKind {
        match self {
            ParamName::Time => ParamKind::Float,
            ParamName::Pointer | ParamName::Resolution => ParamKind::Vec2,
            ParamName::ColorA | ParamName::ColorB => ParamKind::Color,
        }
    }

    /// The single producer allowed to write this entry after setup.
    pub fn writer(self) -> Writer {
        match self {
            ParamName::Time => Writer::Clock,
            ParamName::Pointer => Writer::PointerChannel,
            ParamName::Resolution => Writer::ViewportFitter,
            ParamName::ColorA | ParamName::ColorB => Writer::Setup,
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uniform_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Float,
    Vec2,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Writer {
    Clock,
    PointerChannel,
    ViewportFitter,
    Setup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f32),
    Vec2(Vec2),
    Color(Vec3),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Vec2(_) => ParamKind::Vec2,
            ParamValue::Color(_) => ParamKind::Color,
        }
    }

    fn zero(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Float => ParamValue::Float(0.0),
            ParamKind::Vec2 => ParamValue::Vec2(Vec2::ZERO),
            ParamKind::Color => ParamValue::Color(Vec3::ZERO),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(value) => write!(f, "{value:.2}"),
            ParamValue::Vec2(value) => write!(f, "({:.2}, {:.2})", value.x, value.y),
            ParamValue::Color(value) => {
                write!(f, "color({:.2}, {:.2}, {:.2})", value.x, value.y, value.z)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("parameter {0} is not configured")]
    Missing(ParamName),
    #[error("parameter {name} expects a {expected:?} value, got {actual:?}")]
    KindMismatch {
        name: ParamName,
        expected: ParamKind,
        actual: ParamKind,
    },
    #[error("parameter {0} is fixed after setup")]
    Fixed(ParamName),
}

/// Which entries exist in a store, plus the values of the fixed colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterLayout {
    pub names: Vec<ParamName>,
    pub color_a: Vec3,
    pub color_b: Vec3,
}

impl ParameterLayout {
    pub fn with_names(names: impl IntoIterator<Item = ParamName>) -> Self {
        let mut names: Vec<ParamName> = names.into_iter().collect();
        names.sort();
        names.dedup();
        Self {
            names,
            ..Self::default()
        }
    }

    pub fn contains(&self, name: ParamName) -> bool {
        self.names.contains(&name)
    }
}

impl Default for ParameterLayout {
    fn default() -> Self {
        Self {
            names: ParamName::ALL.to_vec(),
            color_a: Vec3::new(1.0, 0.0, 0.0),
            color_b: Vec3::new(0.0, 1.0, 1.0),
        }
    }
}

/// Shared handle to the named values fed to the shader program.
///
/// Cloning the handle shares the underlying entries. The set of entries is
/// fixed when the store is built; values are only ever overwritten.
#[derive(Debug)]
pub struct ParameterStore {
    entries: Arc<RwLock<BTreeMap<ParamName, ParamValue>>>,
}

impl Clone for ParameterStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(&ParameterLayout::default())
    }
}

impl ParameterStore {
    /// Creates a store with zeroed entries and the configured colors.
    pub fn new(layout: &ParameterLayout) -> Self {
        let entries = layout
            .names
            .iter()
            .map(|&name| {
                let value = match name {
                    ParamName::ColorA => ParamValue::Color(layout.color_a),
                    ParamName::ColorB => ParamValue::Color(layout.color_b),
                    other => ParamValue::zero(other.kind()),
                };
                (name, value)
            })
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    pub fn contains(&self, name: ParamName) -> bool {
        self.entries.read().contains_key(&name)
    }

    pub fn get(&self, name: ParamName) -> Result<ParamValue, ParamError> {
        self.entries
            .read()
            .get(&name)
            .copied()
            .ok_or(ParamError::Missing(name))
    }

    /// Overwrites a configured entry.
    pub fn set(&self, name: ParamName, value: ParamValue) -> Result<(), ParamError> {
        if name.writer() == Writer::Setup {
            return Err(ParamError::Fixed(name));
        }
        if value.kind() != name.kind() {
            return Err(ParamError::KindMismatch {
                name,
                expected: name.kind(),
                actual: value.kind(),
            });
        }
        let mut guard = self.entries.write();
        let slot = guard.get_mut(&name).ok_or(ParamError::Missing(name))?;
        *slot = value;
        Ok(())
    }

    /// Writes the entry only if it is configured. Returns whether it was written.
    pub fn set_if_present(&self, name: ParamName, value: ParamValue) -> Result<bool, ParamError> {
        match self.set(name, value) {
            Ok(()) => Ok(true),
            Err(ParamError::Missing(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Fails with the first parameter in `names` that has no entry.
    pub fn require(&self, names: &[ParamName]) -> Result<(), ParamError> {
        let guard = self.entries.read();
        match names.iter().find(|name| !guard.contains_key(name)) {
            Some(&name) => Err(ParamError::Missing(name)),
            None => Ok(()),
        }
    }

    pub fn time(&self) -> Option<f32> {
        match self.get(ParamName::Time) {
            Ok(ParamValue::Float(value)) => Some(value),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.vec2(ParamName::Pointer)
    }

    pub fn resolution(&self) -> Option<Vec2> {
        self.vec2(ParamName::Resolution)
    }

    fn vec2(&self, name: ParamName) -> Option<Vec2> {
        match self.get(name) {
            Ok(ParamValue::Vec2(value)) => Some(value),
            _ => None,
        }
    }

    fn color(&self, name: ParamName) -> Option<Vec3> {
        match self.get(name) {
            Ok(ParamValue::Color(value)) => Some(value),
            _ => None,
        }
    }

    /// Ordered copy of every entry.
    pub fn snapshot(&self) -> Vec<(ParamName, ParamValue)> {
        self.entries
            .read()
            .iter()
            .map(|(name, value)| (*name, *value))
            .collect()
    }

    /// Flattens the store into the block uploaded before each draw.
    /// Entries missing from the store upload as zeros.
    pub fn uniform_block(&self, view_proj: Mat4) -> ShaderUniforms {
        ShaderUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            color_a: self.color(ParamName::ColorA).unwrap_or(Vec3::ZERO).extend(1.0).into(),
            color_b: self.color(ParamName::ColorB).unwrap_or(Vec3::ZERO).extend(1.0).into(),
            pointer: self.pointer().unwrap_or(Vec2::ZERO).into(),
            resolution: self.resolution().unwrap_or(Vec2::ZERO).into(),
            time: self.time().unwrap_or(0.0),
            _padding: [0.0; 3],
        }
    }
}

/// GPU-side layout of the parameters, mirrored by the WGSL `Globals` struct.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub color_a: [f32; 4],
    pub color_b: [f32; 4],
    pub pointer: [f32; 2],
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding: [f32; 3],
}

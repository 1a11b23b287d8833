use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::params::{ParamError, ParamName, ParamValue, ParameterStore};

/// How the user asked for the input device to be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Auto,
    Touch,
    Pointer,
}

impl InputMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(Self::Auto),
            "touch" => Some(Self::Touch),
            "pointer" | "mouse" => Some(Self::Pointer),
            _ => None,
        }
    }

    /// Resolves the mode once at startup, probing the platform for `Auto`.
    pub fn resolve(self) -> InputStrategy {
        let strategy = match self {
            Self::Auto => InputStrategy::from_capability(platform_has_touch_support()),
            Self::Touch => InputStrategy::Touch,
            Self::Pointer => InputStrategy::Pointer,
        };
        debug!("input mode {self:?} resolved to {strategy:?}");
        strategy
    }
}

/// Whether the platform reports touch as its primary input.
pub fn platform_has_touch_support() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}

/// Input strategy selected once at startup and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputStrategy {
    Touch,
    Pointer,
}

impl InputStrategy {
    pub fn from_capability(has_touch_support: bool) -> Self {
        if has_touch_support {
            Self::Touch
        } else {
            Self::Pointer
        }
    }

    /// Touch-capable hosts only listen for touch moves; everything else
    /// listens for resizes and mouse moves.
    pub fn subscriptions(self) -> Subscriptions {
        match self {
            Self::Touch => Subscriptions {
                resize: false,
                mouse_move: false,
                touch_move: true,
            },
            Self::Pointer => Subscriptions {
                resize: true,
                mouse_move: true,
                touch_move: false,
            },
        }
    }
}

/// Event sources the host forwards to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscriptions {
    pub resize: bool,
    pub mouse_move: bool,
    pub touch_move: bool,
}

/// A raw move event, in device pixels with a top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Mouse(Vec2),
    /// Simultaneous touch points in contact order.
    Touch(Vec<Vec2>),
}

impl PointerEvent {
    /// The coordinate the event contributes: the first touch point wins.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            PointerEvent::Mouse(position) => Some(*position),
            PointerEvent::Touch(points) => points.first().copied(),
        }
    }
}

/// Writes the latest mouse or touch position into `u_mouse`.
#[derive(Debug, Clone)]
pub struct PointerChannel {
    store: ParameterStore,
}

impl PointerChannel {
    pub fn new(store: ParameterStore) -> Self {
        Self { store }
    }

    /// Stores the event's position and returns it. Empty touch lists and
    /// stores without a pointer entry leave the store untouched.
    pub fn on_move(&self, event: &PointerEvent) -> Result<Option<Vec2>, ParamError> {
        let Some(position) = event.position() else {
            return Ok(None);
        };
        let written = self
            .store
            .set_if_present(ParamName::Pointer, ParamValue::Vec2(position))?;
        Ok(written.then_some(position))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Rebuilds multi-point touch events from per-contact updates.
///
/// Contacts are kept in the order they touched down, so the first point of
/// every emitted event is the oldest contact still on the surface.
#[derive(Debug, Default)]
pub struct TouchTracker {
    contacts: Vec<(u64, Vec2)>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one contact update. Returns a touch event for moves.
    pub fn update(&mut self, id: u64, phase: TouchPhase, position: Vec2) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                self.contacts.retain(|(existing, _)| *existing != id);
                self.contacts.push((id, position));
                None
            }
            TouchPhase::Moved => {
                match self.contacts.iter_mut().find(|(existing, _)| *existing == id) {
                    Some(contact) => contact.1 = position,
                    None => self.contacts.push((id, position)),
                }
                Some(PointerEvent::Touch(
                    self.contacts.iter().map(|(_, point)| *point).collect(),
                ))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.contacts.retain(|(existing, _)| *existing != id);
                None
            }
        }
    }

    pub fn active_contacts(&self) -> usize {
        self.contacts.len()
    }
}

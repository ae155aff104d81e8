//! Collaborator interfaces provided by the host engine
//!
//! The lane runner never touches rendering, physics or input devices directly.
//! It talks to the engine through these traits: a scene graph that can spawn,
//! move and destroy objects, an axis input poller, and a character controller
//! with ground detection.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::game::state::PrefabRef;

/// Opaque handle to an object owned by the host
pub type Handle = u64;

/// Errors reported by a host implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("unknown prefab '{0}'")]
    UnknownPrefab(String),
    #[error("unknown object handle {0}")]
    UnknownHandle(Handle),
}

/// Input axes polled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    MouseX,
    MouseY,
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::MouseX, Axis::MouseY, Axis::Horizontal, Axis::Vertical];

    /// Engine-facing axis name
    pub fn name(&self) -> &'static str {
        match self {
            Axis::MouseX => "Mouse X",
            Axis::MouseY => "Mouse Y",
            Axis::Horizontal => "Horizontal",
            Axis::Vertical => "Vertical",
        }
    }
}

/// Scene graph operations
pub trait SceneHost {
    /// Instantiate a prefab, optionally under a parent object
    fn spawn(&mut self, prefab: &PrefabRef, parent: Option<Handle>) -> Result<Handle, HostError>;

    /// Destroy an object and everything parented to it
    fn destroy(&mut self, handle: Handle);

    fn set_local_position(&mut self, handle: Handle, position: Vec3);

    /// Move an object by `offset` relative to its current position
    fn translate(&mut self, handle: Handle, offset: Vec3);

    fn set_local_rotation(&mut self, handle: Handle, rotation: Quat);

    /// Current local rotation, or `None` if the handle is unknown
    fn local_rotation(&self, handle: Handle) -> Option<Quat>;
}

/// Per-frame axis polling
pub trait AxisInput {
    fn read_axis(&self, axis: Axis) -> f32;
}

/// Capsule-collider character controller
pub trait CharacterHost {
    /// Whether the controller touched ground during its last move
    fn is_grounded(&self, controller: Handle) -> bool;

    /// Collision-aware displacement
    fn move_by(&mut self, controller: Handle, displacement: Vec3);

    /// Displacement that ignores gravity
    fn simple_move(&mut self, controller: Handle, displacement: Vec3);
}

/// Everything the runner needs from the engine during a frame
pub trait Host: SceneHost + CharacterHost {}

impl<T: SceneHost + CharacterHost + ?Sized> Host for T {}

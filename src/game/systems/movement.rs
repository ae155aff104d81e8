//! First-person player movement
//!
//! Kinematic only: the controller never stores a velocity. Grounded players
//! get horizontal displacement from input plus a backward drift that keeps
//! them anchored to the scrolling lane; gravity is applied every frame.

use glam::{Quat, Vec3};

use crate::game::host::{CharacterHost, Handle};
use crate::game::state::InputSnapshot;

/// Project a direction onto the ground plane
fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    handle: Handle,
    move_speed: f32,
    gravity: f32,
}

impl PlayerController {
    pub fn new(handle: Handle, move_speed: f32, gravity: f32) -> Self {
        Self {
            handle,
            move_speed,
            gravity,
        }
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Apply one frame of movement. Returns whether the player was grounded.
    pub fn update<H: CharacterHost + ?Sized>(
        &self,
        host: &mut H,
        orientation: Quat,
        input: &InputSnapshot,
        scroll_speed: f32,
        dt: f32,
    ) -> bool {
        let grounded = host.is_grounded(self.handle);

        if grounded {
            let forward = flatten(orientation * Vec3::Z);
            let right = flatten(orientation * Vec3::X);

            host.simple_move(self.handle, forward * input.vertical * self.move_speed * dt);
            host.simple_move(self.handle, right * input.horizontal * self.move_speed * dt);
            host.move_by(self.handle, Vec3::NEG_Z * scroll_speed * dt);
        }

        host.move_by(self.handle, Vec3::NEG_Y * self.gravity * dt);

        tracing::trace!(
            grounded,
            vertical = input.vertical,
            horizontal = input.horizontal,
            "player moved"
        );
        grounded
    }
}

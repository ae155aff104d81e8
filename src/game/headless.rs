//! In-memory host used by the headless binary, tests and benches
//!
//! Keeps a flat object table with parent links, scripted axis values and a
//! flat ground plane at `ground_height` for character controllers.

use glam::{Quat, Vec3};
use hashbrown::{HashMap, HashSet};

use crate::game::host::{Axis, AxisInput, CharacterHost, Handle, HostError, SceneHost};
use crate::game::state::PrefabRef;

/// Tolerance for treating a controller as standing on the ground
const GROUND_EPSILON: f32 = 1e-4;

/// An object living in the headless scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub prefab: PrefabRef,
    pub parent: Option<Handle>,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    objects: HashMap<Handle, SceneObject>,
    next_handle: Handle,
    /// When set, only these prefabs can be spawned
    known_prefabs: Option<HashSet<PrefabRef>>,
    axes: HashMap<Axis, f32>,
    ground_height: f32,
    spawned: u64,
    destroyed: u64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict spawning to a fixed prefab catalogue
    pub fn with_prefabs<I>(prefabs: I) -> Self
    where
        I: IntoIterator<Item = PrefabRef>,
    {
        Self {
            known_prefabs: Some(prefabs.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.axes.insert(axis, value);
    }

    pub fn clear_axes(&mut self) {
        self.axes.clear();
    }

    pub fn set_ground_height(&mut self, height: f32) {
        self.ground_height = height;
    }

    pub fn object(&self, handle: Handle) -> Option<&SceneObject> {
        self.objects.get(&handle)
    }

    pub fn position(&self, handle: Handle) -> Option<Vec3> {
        self.objects.get(&handle).map(|o| o.position)
    }

    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    /// Live objects spawned from `prefab`
    pub fn count_prefab(&self, prefab: &PrefabRef) -> usize {
        self.objects.values().filter(|o| &o.prefab == prefab).count()
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned
    }

    pub fn destroyed_total(&self) -> u64 {
        self.destroyed
    }

    fn settle_on_ground(&mut self, handle: Handle) {
        let ground = self.ground_height;
        if let Some(object) = self.objects.get_mut(&handle) {
            if object.position.y < ground {
                object.position.y = ground;
            }
        }
    }
}

impl SceneHost for HeadlessHost {
    fn spawn(&mut self, prefab: &PrefabRef, parent: Option<Handle>) -> Result<Handle, HostError> {
        if let Some(known) = &self.known_prefabs {
            if !known.contains(prefab) {
                return Err(HostError::UnknownPrefab(prefab.to_string()));
            }
        }
        if let Some(parent) = parent {
            if !self.objects.contains_key(&parent) {
                return Err(HostError::UnknownHandle(parent));
            }
        }

        let handle = self.next_handle;
        self.next_handle += 1;
        self.objects.insert(
            handle,
            SceneObject {
                prefab: prefab.clone(),
                parent,
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
            },
        );
        self.spawned += 1;
        Ok(handle)
    }

    fn destroy(&mut self, handle: Handle) {
        if self.objects.remove(&handle).is_none() {
            return;
        }
        self.destroyed += 1;

        let children: Vec<Handle> = self
            .objects
            .iter()
            .filter(|(_, o)| o.parent == Some(handle))
            .map(|(h, _)| *h)
            .collect();
        for child in children {
            self.destroy(child);
        }
    }

    fn set_local_position(&mut self, handle: Handle, position: Vec3) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.position = position;
        }
    }

    fn translate(&mut self, handle: Handle, offset: Vec3) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.position += offset;
        }
    }

    fn set_local_rotation(&mut self, handle: Handle, rotation: Quat) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.rotation = rotation;
        }
    }

    fn local_rotation(&self, handle: Handle) -> Option<Quat> {
        self.objects.get(&handle).map(|o| o.rotation)
    }
}

impl AxisInput for HeadlessHost {
    fn read_axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

impl CharacterHost for HeadlessHost {
    fn is_grounded(&self, controller: Handle) -> bool {
        self.objects
            .get(&controller)
            .map(|o| o.position.y <= self.ground_height + GROUND_EPSILON)
            .unwrap_or(false)
    }

    fn move_by(&mut self, controller: Handle, displacement: Vec3) {
        self.translate(controller, displacement);
        self.settle_on_ground(controller);
    }

    fn simple_move(&mut self, controller: Handle, displacement: Vec3) {
        self.translate(controller, Vec3::new(displacement.x, 0.0, displacement.z));
    }
}

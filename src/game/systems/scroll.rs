//! Lane scrolling
//!
//! Moves every active row toward the camera, recycles rows that pass the near
//! boundary, and arms generation once the farthest row has moved far enough
//! forward to make room for the next one.

use glam::Vec3;
use rand::Rng;

use crate::error::RunnerError;
use crate::game::constants::lane::{NEAR_BOUNDARY, ROW_SPACING};
use crate::game::host::SceneHost;
use crate::game::state::{RowId, RowQueue, TilePools};
use crate::game::systems::generation::RowGenerator;

/// Lane events produced during a frame
#[derive(Debug, Clone, PartialEq)]
pub enum LaneEvent {
    /// A new row entered the lane
    RowSpawned { row: RowId, depth: f32 },
    /// A row crossed the near boundary and was destroyed
    RowRecycled { row: RowId },
}

/// Owns the row queue and the generation trigger
#[derive(Debug)]
pub struct ScrollManager {
    rows: RowQueue,
    needs_generation: bool,
}

impl Default for ScrollManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollManager {
    /// Starts empty with generation armed so the first update spawns a row
    pub fn new() -> Self {
        Self {
            rows: RowQueue::new(),
            needs_generation: true,
        }
    }

    pub fn rows(&self) -> &RowQueue {
        &self.rows
    }

    pub fn needs_generation(&self) -> bool {
        self.needs_generation
    }

    /// Run the generator once if armed; appends the new row at the far end
    pub fn generate_if_needed<R: Rng, H: SceneHost + ?Sized>(
        &mut self,
        generator: &mut RowGenerator<R>,
        host: &mut H,
        lane_width: u8,
        pools: &TilePools,
        spawn_depth: f32,
    ) -> Result<Option<LaneEvent>, RunnerError> {
        if !self.needs_generation {
            return Ok(None);
        }

        let row = generator.generate_row(host, lane_width, pools, self.rows.last_depth(), spawn_depth)?;
        let event = LaneEvent::RowSpawned {
            row: row.id,
            depth: row.depth,
        };
        self.rows.push(row);
        self.needs_generation = false;
        Ok(Some(event))
    }

    /// Advance all rows by `scroll_speed * dt` toward the camera
    pub fn scroll<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        scroll_speed: f32,
        spawn_depth: f32,
        dt: f32,
    ) -> Vec<LaneEvent> {
        let mut events = Vec::new();
        let step = Vec3::new(0.0, 0.0, -scroll_speed * dt);

        for row in self.rows.rows_mut().iter_mut() {
            row.depth += step.z;
            for tile in &row.tiles {
                host.translate(tile.handle, step);
            }
        }

        // Remove recycled rows (order of the rest is preserved)
        self.rows.rows_mut().retain(|row| {
            if row.depth > NEAR_BOUNDARY {
                return true;
            }
            for tile in &row.tiles {
                host.destroy(tile.handle);
            }
            tracing::debug!("Recycled {} at depth {:.2}", row.name(), row.depth);
            events.push(LaneEvent::RowRecycled { row: row.id });
            false
        });

        match self.rows.last_depth() {
            Some(depth) if depth < spawn_depth - ROW_SPACING => self.needs_generation = true,
            Some(_) => {}
            // Everything was recycled in one frame; refill from the spawn depth
            None => self.needs_generation = true,
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::headless::HeadlessHost;
    use crate::game::state::PrefabRef;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f32 = 1e-4;

    fn pools() -> TilePools {
        TilePools::new(vec![PrefabRef::from("rock")], vec![PrefabRef::from("floor")])
    }

    fn setup() -> (ScrollManager, RowGenerator<StdRng>, HeadlessHost) {
        (
            ScrollManager::new(),
            RowGenerator::new(StdRng::seed_from_u64(11)),
            HeadlessHost::new(),
        )
    }

    /// One frame in runner order: generate if armed, then scroll
    fn frame(
        manager: &mut ScrollManager,
        gen: &mut RowGenerator<StdRng>,
        host: &mut HeadlessHost,
        speed: f32,
        dt: f32,
    ) -> Vec<LaneEvent> {
        let mut events = Vec::new();
        events.extend(manager.generate_if_needed(gen, host, 5, &pools(), 5.0).unwrap());
        events.extend(manager.scroll(host, speed, 5.0, dt));
        events
    }

    #[test]
    fn test_starts_armed() {
        let manager = ScrollManager::new();
        assert!(manager.needs_generation());
        assert!(manager.rows().is_empty());
    }

    #[test]
    fn test_generate_only_when_armed() {
        let (mut manager, mut gen, mut host) = setup();

        let event = manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();
        assert_eq!(event, Some(LaneEvent::RowSpawned { row: 0, depth: 5.0 }));
        assert!(!manager.needs_generation());

        let event = manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();
        assert_eq!(event, None);
        assert_eq!(manager.rows().len(), 1);
    }

    #[test]
    fn test_scroll_moves_rows_and_tiles() {
        let (mut manager, mut gen, mut host) = setup();
        frame(&mut manager, &mut gen, &mut host, 1.0, 2.0);

        let row = manager.rows().get(0).unwrap();
        assert!((row.depth - 3.0).abs() < EPSILON);
        for tile in &row.tiles {
            let z = host.position(tile.handle).unwrap().z;
            assert!((z - 3.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_row_recycled_past_near_boundary() {
        let (mut manager, mut gen, mut host) = setup();
        manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();

        // 5 -> 3 -> 1 -> -1, all still alive
        for expected in [3.0, 1.0, -1.0] {
            let events = manager.scroll(&mut host, 1.0, 5.0, 2.0);
            assert!(events.is_empty());
            assert!((manager.rows().get(0).unwrap().depth - expected).abs() < EPSILON);
        }

        // -1 -> -3 crosses -2
        let events = manager.scroll(&mut host, 1.0, 5.0, 2.0);
        assert_eq!(events, vec![LaneEvent::RowRecycled { row: 0 }]);
        assert!(manager.rows().is_empty());
        assert_eq!(host.live_objects(), 0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let (mut manager, mut gen, mut host) = setup();
        manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();

        // 5 -> -2 lands exactly on the boundary
        let events = manager.scroll(&mut host, 7.0, 5.0, 1.0);
        assert_eq!(events, vec![LaneEvent::RowRecycled { row: 0 }]);
    }

    #[test]
    fn test_rearms_when_last_row_moves_forward() {
        let (mut manager, mut gen, mut host) = setup();
        manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();

        // 5.0 -> 4.5 is not below spawn_depth - 1
        manager.scroll(&mut host, 1.0, 5.0, 0.5);
        assert!(!manager.needs_generation());

        // 4.5 -> 3.9 is
        manager.scroll(&mut host, 1.0, 5.0, 0.6);
        assert!(manager.needs_generation());
    }

    #[test]
    fn test_rearms_when_queue_empties() {
        let (mut manager, mut gen, mut host) = setup();
        manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();

        manager.scroll(&mut host, 100.0, 5.0, 1.0);
        assert!(manager.rows().is_empty());
        assert!(manager.needs_generation());

        let event = manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();
        assert_eq!(event, Some(LaneEvent::RowSpawned { row: 1, depth: 5.0 }));
    }

    #[test]
    fn test_queue_stays_nearest_first() {
        let (mut manager, mut gen, mut host) = setup();

        for i in 0..500 {
            let dt = 0.05 + (i % 7) as f32 * 0.1;
            frame(&mut manager, &mut gen, &mut host, 2.0, dt);

            let depths: Vec<f32> = manager.rows().iter().map(|r| r.depth).collect();
            assert!(depths.windows(2).all(|w| w[0] <= w[1]), "out of order: {:?}", depths);
            assert!(depths.iter().all(|d| *d > NEAR_BOUNDARY));
        }
    }

    #[test]
    fn test_at_most_one_row_per_frame() {
        let (mut manager, mut gen, mut host) = setup();

        for _ in 0..200 {
            let before = gen.rows_generated();
            frame(&mut manager, &mut gen, &mut host, 3.0, 0.5);
            assert!(gen.rows_generated() - before <= 1);
        }
    }

    #[test]
    fn test_depth_after_n_updates() {
        let (mut manager, mut gen, mut host) = setup();
        manager
            .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
            .unwrap();

        let (speed, dt, n) = (0.7, 0.016, 300);
        for _ in 0..n {
            manager.scroll(&mut host, speed, 5.0, dt);
        }

        let expected = 5.0 - n as f32 * speed * dt;
        let row = manager.rows().get(0).unwrap();
        assert_eq!(row.id, 0);
        assert!((row.depth - expected).abs() < 1e-3);
    }

    #[test]
    fn test_rows_contiguous_at_spawn() {
        let (mut manager, mut gen, mut host) = setup();

        let mut spawned = Vec::new();
        for _ in 0..40 {
            if manager.needs_generation() {
                let previous = manager.rows().last_depth();
                let event = manager
                    .generate_if_needed(&mut gen, &mut host, 5, &pools(), 5.0)
                    .unwrap();
                if let (Some(prev), Some(LaneEvent::RowSpawned { depth, .. })) = (previous, event) {
                    spawned.push(depth - prev);
                }
            }
            manager.scroll(&mut host, 1.0, 5.0, 0.25);
        }

        assert!(!spawned.is_empty());
        assert!(spawned.iter().all(|gap| (gap - 1.0).abs() < EPSILON));
    }
}

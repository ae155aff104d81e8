//! Row generation
//!
//! Builds one row of tiles per call. Each slot draws a uniform value and
//! becomes an obstacle or a clear tile; the first clear tile of a row is
//! forced before the last slot so every row stays traversable.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::error::{ConfigError, RunnerError};
use crate::game::constants::lane::{CLEAR_THRESHOLD, ROW_SPACING};
use crate::game::host::SceneHost;
use crate::game::state::{Row, RowId, Tile, TileKind, TilePools};

/// Lateral offset of slot `index` in a row of `lane_width` tiles.
///
/// Odd widths put the middle tile at 0, even widths straddle 0 at ±0.5, so
/// the row is always symmetric around the lane centre.
pub fn lateral_offset(index: usize, lane_width: u8) -> f32 {
    index as f32 - (lane_width as f32 - 1.0) / 2.0
}

/// Classify a slot from its random draw.
///
/// A single-slot row has no "before the last slot", so its only tile is
/// always clear.
pub fn classify(draw: f32, index: usize, lane_width: u8, clear_so_far: usize) -> TileKind {
    let forced = clear_so_far == 0 && (index + 1 < lane_width as usize || lane_width == 1);
    if draw >= CLEAR_THRESHOLD || forced {
        TileKind::Clear
    } else {
        TileKind::Obstacle
    }
}

/// Produces rows and counts how many it has made
#[derive(Debug)]
pub struct RowGenerator<R: Rng> {
    rng: R,
    generated: u64,
}

impl<R: Rng> RowGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, generated: 0 }
    }

    /// Rows produced so far
    pub fn rows_generated(&self) -> u64 {
        self.generated
    }

    /// Spawn a row one unit behind `previous_depth`, or at `spawn_depth`
    /// when the lane is empty.
    ///
    /// On failure every tile already spawned for this row is destroyed and
    /// the generation counter is left untouched.
    pub fn generate_row<H: SceneHost + ?Sized>(
        &mut self,
        host: &mut H,
        lane_width: u8,
        pools: &TilePools,
        previous_depth: Option<f32>,
        spawn_depth: f32,
    ) -> Result<Row, RunnerError> {
        let id: RowId = self.generated;
        let depth = previous_depth.map_or(spawn_depth, |d| d + ROW_SPACING);
        let mut tiles: SmallVec<[Tile; 8]> = SmallVec::with_capacity(lane_width as usize);
        let mut clear_count = 0;

        for index in 0..lane_width as usize {
            let draw: f32 = self.rng.gen();
            let kind = classify(draw, index, lane_width, clear_count);

            let spawned = match pools.pool(kind).choose(&mut self.rng) {
                Some(prefab) => host
                    .spawn(prefab, None)
                    .map(|handle| (handle, prefab.clone()))
                    .map_err(RunnerError::from),
                None => Err(ConfigError::EmptyPool(kind).into()),
            };
            let (handle, prefab) = match spawned {
                Ok(spawned) => spawned,
                Err(e) => {
                    for tile in &tiles {
                        host.destroy(tile.handle);
                    }
                    return Err(e);
                }
            };

            let offset = lateral_offset(index, lane_width);
            host.set_local_position(handle, Vec3::new(offset, 0.0, depth));

            if kind == TileKind::Clear {
                clear_count += 1;
            }
            tiles.push(Tile {
                handle,
                kind,
                prefab,
                offset,
            });
        }

        self.generated += 1;
        let row = Row { id, depth, tiles };
        tracing::debug!(
            "Generated {} at depth {:.2}: {} clear, {} obstacle",
            row.name(),
            depth,
            clear_count,
            row.count(TileKind::Obstacle)
        );
        Ok(row)
    }
}

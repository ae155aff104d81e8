//! Lane state definitions
//!
//! Rows of tiles, the queue that orders them nearest-first, and the
//! per-frame context handed to the runner.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::ConfigError;
use crate::game::host::{Axis, AxisInput, Handle};

/// Monotonic row identifier
pub type RowId = u64;

/// Whether a tile blocks the lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Obstacle,
    Clear,
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Obstacle => write!(f, "obstacle"),
            TileKind::Clear => write!(f, "clear"),
        }
    }
}

/// Reference to a spawnable prefab, resolved by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabRef(String);

impl PrefabRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefabRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PrefabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two prefab pools tiles are drawn from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilePools {
    pub obstacle: Vec<PrefabRef>,
    pub clear: Vec<PrefabRef>,
}

impl TilePools {
    pub fn new(obstacle: Vec<PrefabRef>, clear: Vec<PrefabRef>) -> Self {
        Self { obstacle, clear }
    }

    pub fn pool(&self, kind: TileKind) -> &[PrefabRef] {
        match kind {
            TileKind::Obstacle => &self.obstacle,
            TileKind::Clear => &self.clear,
        }
    }

    /// Both pools must contain at least one prefab
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.obstacle.is_empty() {
            return Err(ConfigError::EmptyPool(TileKind::Obstacle));
        }
        if self.clear.is_empty() {
            return Err(ConfigError::EmptyPool(TileKind::Clear));
        }
        Ok(())
    }
}

/// A spawned tile inside a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub handle: Handle,
    pub kind: TileKind,
    pub prefab: PrefabRef,
    /// Lateral offset from the lane centre
    pub offset: f32,
}

/// One lateral strip of tiles at a shared depth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub depth: f32,
    pub tiles: SmallVec<[Tile; 8]>,
}

impl Row {
    pub fn name(&self) -> String {
        format!("Row{}", self.id)
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    pub fn offsets(&self) -> impl Iterator<Item = f32> + '_ {
        self.tiles.iter().map(|t| t.offset)
    }
}

/// Active rows, nearest to the camera first
#[derive(Debug, Clone, Default)]
pub struct RowQueue {
    rows: Vec<Row>,
}

impl RowQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Depth of the farthest row from the camera
    pub fn last_depth(&self) -> Option<f32> {
        self.rows.last().map(|r| r.depth)
    }

    pub(crate) fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }
}

impl<'a> IntoIterator for &'a RowQueue {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// High level game status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Paused,
}

/// Axis values sampled once at the start of a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub horizontal: f32,
    pub vertical: f32,
}

impl InputSnapshot {
    pub fn poll<I: AxisInput + ?Sized>(input: &I) -> Self {
        Self {
            mouse_x: input.read_axis(Axis::MouseX),
            mouse_y: input.read_axis(Axis::MouseY),
            horizontal: input.read_axis(Axis::Horizontal),
            vertical: input.read_axis(Axis::Vertical),
        }
    }
}

/// Everything that varies from one frame to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    /// Seconds since the previous frame
    pub delta_time: f32,
    pub input: InputSnapshot,
}

impl FrameContext {
    pub fn new(delta_time: f32, input: InputSnapshot) -> Self {
        Self { delta_time, input }
    }

    /// Frame with no input
    pub fn idle(delta_time: f32) -> Self {
        Self::new(delta_time, InputSnapshot::default())
    }
}

/// Serializable view of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub name: String,
    pub depth: f32,
    pub tiles: Vec<TileKind>,
}

/// Serializable view of the whole lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub frame: u64,
    pub status: GameStatus,
    pub rows_generated: u64,
    pub rows: Vec<RowSnapshot>,
}

impl LaneSnapshot {
    pub fn capture(frame: u64, status: GameStatus, rows_generated: u64, queue: &RowQueue) -> Self {
        Self {
            frame,
            status,
            rows_generated,
            rows: queue
                .iter()
                .map(|row| RowSnapshot {
                    name: row.name(),
                    depth: row.depth,
                    tiles: row.tiles.iter().map(|t| t.kind).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn tile(handle: Handle, kind: TileKind, offset: f32) -> Tile {
        Tile {
            handle,
            kind,
            prefab: PrefabRef::from("floor"),
            offset,
        }
    }

    #[test]
    fn test_row_name_and_counts() {
        let row = Row {
            id: 7,
            depth: 5.0,
            tiles: smallvec![
                tile(1, TileKind::Clear, -1.0),
                tile(2, TileKind::Obstacle, 0.0),
                tile(3, TileKind::Clear, 1.0),
            ],
        };
        assert_eq!(row.name(), "Row7");
        assert_eq!(row.count(TileKind::Clear), 2);
        assert_eq!(row.count(TileKind::Obstacle), 1);
        assert_eq!(row.offsets().collect::<Vec<_>>(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_pool_validation() {
        let pools = TilePools::new(vec![], vec![PrefabRef::from("floor")]);
        assert_eq!(
            pools.validate(),
            Err(ConfigError::EmptyPool(TileKind::Obstacle))
        );

        let pools = TilePools::new(vec![PrefabRef::from("rock")], vec![]);
        assert_eq!(pools.validate(), Err(ConfigError::EmptyPool(TileKind::Clear)));

        let pools = TilePools::new(vec![PrefabRef::from("rock")], vec![PrefabRef::from("floor")]);
        assert!(pools.validate().is_ok());
    }

    #[test]
    fn test_input_snapshot_poll() {
        struct Fixed;
        impl AxisInput for Fixed {
            fn read_axis(&self, axis: Axis) -> f32 {
                match axis {
                    Axis::MouseX => 1.0,
                    Axis::MouseY => 2.0,
                    Axis::Horizontal => 3.0,
                    Axis::Vertical => 4.0,
                }
            }
        }

        let snapshot = InputSnapshot::poll(&Fixed);
        assert_eq!(snapshot.mouse_x, 1.0);
        assert_eq!(snapshot.mouse_y, 2.0);
        assert_eq!(snapshot.horizontal, 3.0);
        assert_eq!(snapshot.vertical, 4.0);
    }

    #[test]
    fn test_lane_snapshot_serializes() {
        let mut queue = RowQueue::new();
        queue.push(Row {
            id: 0,
            depth: 5.0,
            tiles: smallvec![tile(1, TileKind::Clear, 0.0)],
        });

        let snapshot = LaneSnapshot::capture(3, GameStatus::Playing, 1, &queue);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"Row0\""));

        let decoded: LaneSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snapshot);
    }
}

use std::str::FromStr;

use crate::error::ConfigError;
use crate::game::constants::{frame, lane, look, movement};
use crate::game::state::{PrefabRef, TilePools};
use crate::game::systems::look::LookAxes;

/// Mouse-look configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LookConfig {
    /// Which axes drive the camera
    pub axes: LookAxes,
    pub sensitivity_x: f32,
    pub sensitivity_y: f32,
    /// Yaw clamp in degrees
    pub min_x: f32,
    pub max_x: f32,
    /// Pitch clamp in degrees
    pub min_y: f32,
    pub max_y: f32,
    /// Number of frames averaged per axis
    pub smoothing_frames: usize,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            axes: LookAxes::Both,
            sensitivity_x: look::DEFAULT_SENSITIVITY_X,
            sensitivity_y: look::DEFAULT_SENSITIVITY_Y,
            min_x: look::DEFAULT_MIN_X,
            max_x: look::DEFAULT_MAX_X,
            min_y: look::DEFAULT_MIN_Y,
            max_y: look::DEFAULT_MAX_Y,
            smoothing_frames: look::DEFAULT_SMOOTHING_FRAMES,
        }
    }
}

impl LookConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_frames == 0 {
            return Err(ConfigError::ZeroSmoothingWindow);
        }
        check_range("yaw", self.min_x, self.max_x)?;
        check_range("pitch", self.min_y, self.max_y)?;
        // Negative sensitivity inverts an axis
        for (name, value) in [("sensitivity_x", self.sensitivity_x), ("sensitivity_y", self.sensitivity_y)] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidScalar { name, value });
            }
        }
        Ok(())
    }
}

/// Runner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    /// Prefabs tiles are drawn from
    pub tile_pools: TilePools,
    /// Units per second rows move toward the camera
    pub scroll_speed: f32,
    /// Tiles per row (lane width)
    pub tiles_per_row: u8,
    /// Depth of the first row and reference for re-arming generation
    pub spawn_depth: f32,
    pub look: LookConfig,
    /// Horizontal player speed in units per second
    pub move_speed: f32,
    /// Downward displacement per second
    pub gravity: f32,
    /// Seed for tile selection; entropy when unset
    pub seed: Option<u64>,
    /// Frame rate of the headless loop
    pub tick_rate: u32,
    /// Stop the headless loop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tile_pools: TilePools::new(
                vec![PrefabRef::from("tile_rock"), PrefabRef::from("tile_barrier")],
                vec![PrefabRef::from("tile_floor")],
            ),
            scroll_speed: lane::DEFAULT_SCROLL_SPEED,
            tiles_per_row: lane::DEFAULT_TILES_PER_ROW,
            spawn_depth: lane::DEFAULT_SPAWN_DEPTH,
            look: LookConfig::default(),
            move_speed: movement::DEFAULT_MOVE_SPEED,
            gravity: movement::DEFAULT_GRAVITY,
            seed: None,
            tick_rate: frame::DEFAULT_TICK_RATE,
            max_frames: None,
        }
    }
}

impl RunnerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(pool) = env_pool("TILES_OBSTACLE") {
            config.tile_pools.obstacle = pool;
        }
        if let Some(pool) = env_pool("TILES_CLEAR") {
            config.tile_pools.clear = pool;
        }

        env_override("SCROLL_SPEED", &mut config.scroll_speed, |v| {
            v.is_finite() && *v >= 0.0
        });
        env_override("TILES_PER_ROW", &mut config.tiles_per_row, |v| *v > 0);
        env_override("ROW_SPAWN_DEPTH", &mut config.spawn_depth, |v| v.is_finite());
        env_override("MOVE_SPEED", &mut config.move_speed, |v| {
            v.is_finite() && *v >= 0.0
        });
        env_override("GRAVITY", &mut config.gravity, |v| v.is_finite() && *v >= 0.0);
        env_override("TICK_RATE", &mut config.tick_rate, |v| *v > 0 && *v <= 1000);

        let look = &mut config.look;
        env_override("LOOK_AXES", &mut look.axes, |_| true);
        env_override("MOUSE_SENSITIVITY_X", &mut look.sensitivity_x, |v| v.is_finite());
        env_override("MOUSE_SENSITIVITY_Y", &mut look.sensitivity_y, |v| v.is_finite());
        env_override("LOOK_MIN_X", &mut look.min_x, |v| v.is_finite());
        env_override("LOOK_MAX_X", &mut look.max_x, |v| v.is_finite());
        env_override("LOOK_MIN_Y", &mut look.min_y, |v| v.is_finite());
        env_override("LOOK_MAX_Y", &mut look.max_y, |v| v.is_finite());
        env_override("LOOK_SMOOTHING_FRAMES", &mut look.smoothing_frames, |v| *v > 0);

        if let Ok(seed) = std::env::var("RUNNER_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => config.seed = Some(parsed),
                Err(_) => tracing::warn!("Invalid RUNNER_SEED '{}', using entropy", seed),
            }
        }

        if let Ok(frames) = std::env::var("MAX_FRAMES") {
            match frames.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.max_frames = Some(parsed),
                _ => tracing::warn!("Invalid MAX_FRAMES '{}', running until interrupted", frames),
            }
        }

        config
    }

    /// Validate configuration before the first frame
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tile_pools.validate()?;
        if self.tiles_per_row == 0 {
            return Err(ConfigError::ZeroLaneWidth);
        }
        check_finite("scroll_speed", self.scroll_speed)?;
        check_finite("move_speed", self.move_speed)?;
        check_finite("gravity", self.gravity)?;
        if !self.spawn_depth.is_finite() {
            return Err(ConfigError::InvalidScalar {
                name: "spawn_depth",
                value: self.spawn_depth,
            });
        }
        self.look.validate()
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScalar { name, value })
    }
}

fn check_range(axis: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedClamp { axis, min, max })
    }
}

/// Overwrite `target` with a parsed env value if it is present and accepted
fn env_override<T, F>(name: &str, target: &mut T, accept: F)
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    let Ok(raw) = std::env::var(name) else {
        return;
    };
    match raw.parse::<T>() {
        Ok(parsed) if accept(&parsed) => *target = parsed,
        _ => tracing::warn!("Invalid {} '{}', using default", name, raw),
    }
}

/// Comma-separated prefab list; empty entries are dropped
fn env_pool(name: &str) -> Option<Vec<PrefabRef>> {
    let raw = std::env::var(name).ok()?;
    let pool: Vec<PrefabRef> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PrefabRef::from)
        .collect();
    if pool.is_empty() {
        tracing::warn!("{} has no prefab names, using default pool", name);
        return None;
    }
    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::TileKind;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.tiles_per_row, 5);
        assert_eq!(config.spawn_depth, 5.0);
        assert_eq!(config.look.smoothing_frames, 20);
        assert_eq!(config.look.min_y, -60.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default() {
        let config = RunnerConfig::load_or_default();
        assert!(config.tick_rate > 0);
    }

    #[test]
    fn test_env_override_applies_valid_value() {
        std::env::set_var("RUNA_TEST_SPEED_OK", "2.5");
        let mut speed = 1.0f32;
        env_override("RUNA_TEST_SPEED_OK", &mut speed, |v| v.is_finite());
        assert_eq!(speed, 2.5);
    }

    #[test]
    fn test_env_override_keeps_default_on_parse_error() {
        std::env::set_var("RUNA_TEST_WIDTH_GARBAGE", "five");
        let mut width = 5u8;
        env_override("RUNA_TEST_WIDTH_GARBAGE", &mut width, |v| *v > 0);
        assert_eq!(width, 5);

        std::env::set_var("RUNA_TEST_AXES_GARBAGE", "sideways");
        let mut axes = LookAxes::Both;
        env_override("RUNA_TEST_AXES_GARBAGE", &mut axes, |_| true);
        assert_eq!(axes, LookAxes::Both);
    }

    #[test]
    fn test_env_override_keeps_default_when_rejected() {
        std::env::set_var("RUNA_TEST_GRAVITY_NEGATIVE", "-9.8");
        let mut gravity = 20.0f32;
        env_override("RUNA_TEST_GRAVITY_NEGATIVE", &mut gravity, |v| *v >= 0.0);
        assert_eq!(gravity, 20.0);
    }

    #[test]
    fn test_env_pool() {
        std::env::set_var("RUNA_TEST_POOL_LIST", " rock, ,barrier,");
        assert_eq!(
            env_pool("RUNA_TEST_POOL_LIST"),
            Some(vec![PrefabRef::from("rock"), PrefabRef::from("barrier")])
        );

        std::env::set_var("RUNA_TEST_POOL_COMMAS", ",, ,");
        assert_eq!(env_pool("RUNA_TEST_POOL_COMMAS"), None);
        assert_eq!(env_pool("RUNA_TEST_POOL_UNSET"), None);
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = RunnerConfig::default();
        config.tile_pools.clear.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyPool(TileKind::Clear)));
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let config = RunnerConfig {
            tiles_per_row: 0,
            ..RunnerConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLaneWidth));
    }

    #[test]
    fn test_validate_rejects_inverted_clamp() {
        let mut config = RunnerConfig::default();
        config.look.min_y = 30.0;
        config.look.max_y = -30.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedClamp { axis: "pitch", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = RunnerConfig::default();
        config.look.smoothing_frames = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroSmoothingWindow));
    }

    #[test]
    fn test_validate_rejects_negative_speed() {
        let config = RunnerConfig {
            scroll_speed: -1.0,
            ..RunnerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScalar { name: "scroll_speed", .. })
        ));
    }
}

//! Frame runner
//!
//! Owns the lane, the look filter and the player controller and drives them
//! in a fixed order every frame:
//!
//! 1. generate a row if the scroll manager asked for one
//! 2. scroll and recycle rows
//! 3. update the camera from the mouse axes
//! 4. move the player
//!
//! Nothing advances unless the game status is [`GameStatus::Playing`].

use rand::rngs::StdRng;
use glam::Quat;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::error::{ConfigError, RunnerError};
use crate::game::host::{Handle, Host, SceneHost};
use crate::game::state::{FrameContext, GameStatus, LaneSnapshot, RowQueue};
use crate::game::systems::generation::RowGenerator;
use crate::game::systems::look::LookFilter;
use crate::game::systems::movement::PlayerController;
use crate::game::systems::scroll::{LaneEvent, ScrollManager};

/// Systems created by `initialize()`
#[derive(Debug)]
struct Bound {
    camera: Handle,
    look: LookFilter,
    player: PlayerController,
}

pub struct LaneRunner<R: Rng = StdRng> {
    config: RunnerConfig,
    status: GameStatus,
    generator: RowGenerator<R>,
    scroll: ScrollManager,
    camera: Option<Handle>,
    player: Option<Handle>,
    /// Camera rotation captured the first time the bound camera is initialized
    origin: Option<Quat>,
    bound: Option<Bound>,
    frame: u64,
}

impl LaneRunner<StdRng> {
    /// Create a runner seeded from `config.seed`, or from entropy when unset
    pub fn new(config: RunnerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> LaneRunner<R> {
    pub fn with_rng(config: RunnerConfig, rng: R) -> Self {
        Self {
            config,
            status: GameStatus::Menu,
            generator: RowGenerator::new(rng),
            scroll: ScrollManager::new(),
            camera: None,
            player: None,
            origin: None,
            bound: None,
            frame: 0,
        }
    }

    pub fn bind_camera(&mut self, camera: Handle) {
        if self.camera != Some(camera) {
            self.origin = None;
        }
        self.camera = Some(camera);
    }

    pub fn bind_player(&mut self, player: Handle) {
        self.player = Some(player);
    }

    /// Validate configuration and bindings, capture the camera's origin
    /// orientation and start playing.
    pub fn initialize<H: SceneHost + ?Sized>(&mut self, host: &H) -> Result<(), RunnerError> {
        self.config.validate()?;

        let camera = self.camera.ok_or(ConfigError::CameraUnbound)?;
        let player = self.player.ok_or(ConfigError::PlayerUnbound)?;
        let current = host.local_rotation(camera).ok_or(ConfigError::CameraUnbound)?;
        if host.local_rotation(player).is_none() {
            return Err(ConfigError::PlayerUnbound.into());
        }

        let origin = *self.origin.get_or_insert(current);
        self.bound = Some(Bound {
            camera,
            look: LookFilter::new(&self.config.look, origin),
            player: PlayerController::new(player, self.config.move_speed, self.config.gravity),
        });

        info!(
            "Runner initialized: {} tiles/row, spawn depth {}, scroll speed {}, look {:?}",
            self.config.tiles_per_row,
            self.config.spawn_depth,
            self.config.scroll_speed,
            self.config.look.axes
        );
        self.set_status(GameStatus::Playing);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.bound.is_some()
    }

    /// Advance one frame and return the lane events it produced
    pub fn step<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        ctx: &FrameContext,
    ) -> Result<Vec<LaneEvent>, RunnerError> {
        let bound = self.bound.as_mut().ok_or(RunnerError::NotInitialized)?;
        if self.status != GameStatus::Playing {
            return Ok(Vec::new());
        }

        self.frame += 1;
        let dt = ctx.delta_time;
        let config = &self.config;
        let mut events = Vec::new();

        events.extend(self.scroll.generate_if_needed(
            &mut self.generator,
            host,
            config.tiles_per_row,
            &config.tile_pools,
            config.spawn_depth,
        )?);
        events.extend(self.scroll.scroll(host, config.scroll_speed, config.spawn_depth, dt));

        let orientation = bound.look.update(ctx.input.mouse_x, ctx.input.mouse_y);
        host.set_local_rotation(bound.camera, orientation);

        bound
            .player
            .update(host, orientation, &ctx.input, config.scroll_speed, dt);

        Ok(events)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            info!("Game status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
    }

    pub fn pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.set_status(GameStatus::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.status == GameStatus::Paused {
            self.set_status(GameStatus::Playing);
        }
    }

    /// Destroy every row, put the camera back at its origin and return to the
    /// menu; bindings are kept
    pub fn reset<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        for row in self.scroll.rows() {
            for tile in &row.tiles {
                host.destroy(tile.handle);
            }
        }
        debug!("Reset lane, {} rows destroyed", self.scroll.rows().len());
        self.scroll = ScrollManager::new();
        self.frame = 0;
        if let Some(bound) = self.bound.as_mut() {
            let origin = bound.look.origin();
            bound.look = LookFilter::new(&self.config.look, origin);
            host.set_local_rotation(bound.camera, origin);
        }
        self.set_status(GameStatus::Menu);
    }

    pub fn rows(&self) -> &RowQueue {
        self.scroll.rows()
    }

    pub fn look(&self) -> Option<&LookFilter> {
        self.bound.as_ref().map(|b| &b.look)
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Frames advanced while playing
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn rows_generated(&self) -> u64 {
        self.generator.rows_generated()
    }

    pub fn snapshot(&self) -> LaneSnapshot {
        LaneSnapshot::capture(self.frame, self.status, self.rows_generated(), self.scroll.rows())
    }
}

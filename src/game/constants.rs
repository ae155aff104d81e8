/// Lane generation and scrolling constants
pub mod lane {
    /// Random draws at or above this value produce a clear tile
    pub const CLEAR_THRESHOLD: f32 = 0.3;
    /// Rows at or below this depth are destroyed
    pub const NEAR_BOUNDARY: f32 = -2.0;
    /// Depth gap between consecutive rows at spawn time
    pub const ROW_SPACING: f32 = 1.0;
    /// Default number of tiles per row
    pub const DEFAULT_TILES_PER_ROW: u8 = 5;
    /// Default depth for the first row
    pub const DEFAULT_SPAWN_DEPTH: f32 = 5.0;
    /// Default scroll speed in units per second
    pub const DEFAULT_SCROLL_SPEED: f32 = 1.0;
}

/// Mouse-look defaults
pub mod look {
    pub const DEFAULT_SENSITIVITY_X: f32 = 15.0;
    pub const DEFAULT_SENSITIVITY_Y: f32 = 15.0;
    /// Yaw clamp (degrees)
    pub const DEFAULT_MIN_X: f32 = -360.0;
    pub const DEFAULT_MAX_X: f32 = 360.0;
    /// Pitch clamp (degrees)
    pub const DEFAULT_MIN_Y: f32 = -60.0;
    pub const DEFAULT_MAX_Y: f32 = 60.0;
    /// Number of frames averaged by the look filter
    pub const DEFAULT_SMOOTHING_FRAMES: usize = 20;
    /// Angles are reduced modulo a full turn before clamping
    pub const FULL_TURN: f32 = 360.0;
}

/// Player movement constants
pub mod movement {
    /// Horizontal speed in units per second
    pub const DEFAULT_MOVE_SPEED: f32 = 6.0;
    /// Downward displacement per second
    pub const DEFAULT_GRAVITY: f32 = 20.0;
}

/// Headless loop constants
pub mod frame {
    /// Frame rate of the headless loop in Hz
    pub const DEFAULT_TICK_RATE: u32 = 60;
}

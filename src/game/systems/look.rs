//! Smoothed mouse-look
//!
//! Each axis accumulates sensitivity-scaled input into a running angle and
//! averages the last N accumulated values. The average is reduced modulo a
//! full turn and clamped before it becomes a rotation.

use std::collections::VecDeque;
use std::str::FromStr;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::LookConfig;
use crate::game::constants::look::FULL_TURN;

/// Which mouse axes drive the camera
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookAxes {
    #[default]
    Both,
    Horizontal,
    Vertical,
}

impl LookAxes {
    pub fn uses_horizontal(&self) -> bool {
        matches!(self, LookAxes::Both | LookAxes::Horizontal)
    }

    pub fn uses_vertical(&self) -> bool {
        matches!(self, LookAxes::Both | LookAxes::Vertical)
    }
}

impl FromStr for LookAxes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "xy" => Ok(LookAxes::Both),
            "horizontal" | "x" => Ok(LookAxes::Horizontal),
            "vertical" | "y" => Ok(LookAxes::Vertical),
            other => Err(format!("unknown look axes '{}'", other)),
        }
    }
}

/// Reduce `angle` modulo 360 and clamp it to `[min, max]`
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    (angle % FULL_TURN).clamp(min, max)
}

/// Sliding-window filter for one look axis
#[derive(Debug, Clone)]
pub struct AxisFilter {
    sensitivity: f32,
    min: f32,
    max: f32,
    /// Maximum retained samples
    cap: usize,
    /// Running sum of scaled input
    accumulated: f32,
    history: VecDeque<f32>,
    smoothed: f32,
}

impl AxisFilter {
    pub fn new(sensitivity: f32, min: f32, max: f32, cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            sensitivity,
            min,
            max,
            cap,
            accumulated: 0.0,
            history: VecDeque::with_capacity(cap),
            smoothed: 0.0,
        }
    }

    /// Feed one frame of raw input and return the smoothed, clamped angle
    pub fn update(&mut self, raw_delta: f32) -> f32 {
        self.accumulated += raw_delta * self.sensitivity;
        self.history.push_back(self.accumulated);
        while self.history.len() > self.cap {
            self.history.pop_front();
        }

        let mean = self.history.iter().sum::<f32>() / self.history.len() as f32;
        self.smoothed = clamp_angle(mean, self.min, self.max);
        self.smoothed
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

/// Camera orientation driven by filtered mouse input
#[derive(Debug, Clone)]
pub struct LookFilter {
    axes: LookAxes,
    yaw: AxisFilter,
    pitch: AxisFilter,
    /// Orientation captured when the camera was bound
    origin: Quat,
    orientation: Quat,
}

impl LookFilter {
    pub fn new(config: &LookConfig, origin: Quat) -> Self {
        Self {
            axes: config.axes,
            yaw: AxisFilter::new(
                config.sensitivity_x,
                config.min_x,
                config.max_x,
                config.smoothing_frames,
            ),
            pitch: AxisFilter::new(
                config.sensitivity_y,
                config.min_y,
                config.max_y,
                config.smoothing_frames,
            ),
            origin,
            orientation: origin,
        }
    }

    /// Update from this frame's mouse axes and return the new orientation
    pub fn update(&mut self, mouse_x: f32, mouse_y: f32) -> Quat {
        let mut rotation = self.origin;
        if self.axes.uses_horizontal() {
            let yaw = self.yaw.update(mouse_x);
            rotation *= Quat::from_axis_angle(Vec3::Y, yaw.to_radians());
        }
        if self.axes.uses_vertical() {
            let pitch = self.pitch.update(mouse_y);
            rotation *= Quat::from_axis_angle(Vec3::NEG_X, pitch.to_radians());
        }
        self.orientation = rotation.normalize();
        self.orientation
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn origin(&self) -> Quat {
        self.origin
    }

    pub fn axes(&self) -> LookAxes {
        self.axes
    }

    pub fn yaw(&self) -> &AxisFilter {
        &self.yaw
    }

    pub fn pitch(&self) -> &AxisFilter {
        &self.pitch
    }
}

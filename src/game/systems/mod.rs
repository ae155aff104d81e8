pub mod generation;
pub mod look;
pub mod movement;
pub mod scroll;

pub mod constants;
pub mod headless;
pub mod host;
pub mod runner;
pub mod state;
pub mod systems;

pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod noise;
pub mod physics;
pub mod players;
pub mod scene;
pub mod simulation;
pub mod world;

pub use constants::*;
pub use simulation::{FrameReport, SceneSimulation};

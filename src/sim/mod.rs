pub mod error;
pub mod event;
pub mod hud;
pub mod level;
pub mod spawn;
pub mod step;
pub mod world;

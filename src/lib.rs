//! Simulation core of a small cat stealth game: a component store, a deferred
//! event bus, a fixed-timestep driver and the systems that run each step.

pub mod app;
pub mod config;
pub mod ecs;
pub mod error;
pub mod events;
pub mod hud;
pub mod input;
pub mod scene;
pub mod session;
pub mod sim;
pub mod terrain;
pub mod time;

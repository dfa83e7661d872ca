//! Small predator/prey ecosystem: herbivores, carnivores and plants
//! steering, eating, breeding and dying in a bounded 2D world.

pub mod color;
pub mod config;
pub mod ecosystem;
pub mod engine;
pub mod entity;
pub mod food;
pub mod render;
pub mod simulation_stats;
pub mod vector;

pub use color::Color;
pub use config::{Config, ConfigError};
pub use ecosystem::Ecosystem;
pub use engine::{Command, Simulation};
pub use entity::{DeathCause, Entity, EntityType};
pub use food::Food;
pub use simulation_stats::Statistics;
pub use vector::Vector2D;

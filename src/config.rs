//! Simulation configuration, loadable from YAML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::food::DEFAULT_FOOD_ENERGY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub food: FoodConfig,
    pub driver: DriverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    /// Hard cap on entities; offspring beyond it are discarded
    pub max_entities: usize,
}

/// Seed population used on start and on reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub herbivores: usize,
    pub carnivores: usize,
    pub plants: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Energy granted by each food item
    pub energy: f32,
    /// Seconds of simulated time between growth bursts
    pub spawn_interval: f64,
    /// Food items grown per burst
    pub per_spawn: usize,
    /// Growth stops once this many items exist
    pub max_food: usize,
    /// Distance from a plant within which new food grows
    pub plant_spread: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Update ticks per second requested from the window loop
    pub ups: u64,
    /// Frame time cap in seconds, applied before time scaling
    pub max_frame_time: f64,
    /// Factor applied by speed-up / slow-down
    pub time_scale_step: f64,
    /// Simulated seconds between statistics log lines
    pub stats_interval: f64,
    /// Food items dropped by the spawn-food command
    pub food_burst: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 600.0,
            max_entities: 500,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            herbivores: 20,
            carnivores: 5,
            plants: 30,
        }
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            energy: DEFAULT_FOOD_ENERGY,
            spawn_interval: 1.0,
            per_spawn: 3,
            max_food: 200,
            plant_spread: 30.0,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            ups: 60,
            max_frame_time: 0.1,
            time_scale_step: 1.5,
            stats_interval: 2.0,
            food_burst: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return invalid("world width and height must be positive");
        }
        if self.world.max_entities == 0 {
            return invalid("max_entities must be > 0");
        }
        let seeded = self.population.herbivores + self.population.carnivores + self.population.plants;
        if seeded > self.world.max_entities {
            return invalid("initial population cannot exceed max_entities");
        }
        if !(self.food.spawn_interval > 0.0) {
            return invalid("food spawn_interval must be positive");
        }
        if self.food.energy < 0.0 {
            return invalid("food energy cannot be negative");
        }
        if !(self.driver.max_frame_time > 0.0) || !(self.driver.stats_interval > 0.0) {
            return invalid("driver max_frame_time and stats_interval must be positive");
        }
        if !(self.driver.time_scale_step > 1.0) {
            return invalid("time_scale_step must be greater than 1");
        }
        if self.driver.ups == 0 {
            return invalid("ups must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.population.plants = 12;
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded.population.plants, 12);
        assert_eq!(loaded.world.max_entities, config.world.max_entities);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let loaded: Config = serde_yaml::from_str("world:\n  width: 300.0\n").unwrap();
        assert_eq!(loaded.world.width, 300.0);
        assert_eq!(loaded.world.height, 600.0);
        assert_eq!(loaded.population.herbivores, 20);
    }

    #[test]
    fn test_rejects_bad_world() {
        let mut config = Config::default();
        config.world.width = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.world.max_entities = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join("ecosim_config_test.yaml");
        let config = Config::default();
        config.save(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.driver.ups, config.driver.ups);
        std::fs::remove_file(path).ok();
    }
}

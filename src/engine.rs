//! Frame driver: pause, reset, time scaling and periodic statistics logging.

use log::info;

use crate::config::Config;
use crate::ecosystem::Ecosystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Reset,
    SpawnFood,
    SpeedUp,
    SlowDown,
    Quit,
}

pub struct Simulation {
    pub ecosystem: Ecosystem,
    config: Config,
    paused: bool,
    running: bool,
    time_scale: f64,
    stats_timer: f64,
    reported_births: usize,
    reported_deaths: usize,
}

impl Simulation {
    /// Builds the world from `config` and seeds the configured population.
    pub fn new(config: Config, seed: u64) -> Self {
        let mut ecosystem = Ecosystem::from_config(&config, seed);
        let population = &config.population;
        ecosystem.initialize(population.herbivores, population.carnivores, population.plants);

        Simulation {
            ecosystem,
            config,
            paused: false,
            running: true,
            time_scale: 1.0,
            stats_timer: 0.0,
            reported_births: 0,
            reported_deaths: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.paused = !self.paused;
                info!("{}", if self.paused { "Simulation paused" } else { "Simulation resumed" });
            }
            Command::Reset => {
                let population = &self.config.population;
                self.ecosystem
                    .initialize(population.herbivores, population.carnivores, population.plants);
                self.stats_timer = 0.0;
                self.reported_births = 0;
                self.reported_deaths = 0;
                info!("Simulation reset");
            }
            Command::SpawnFood => {
                self.ecosystem.spawn_food(self.config.driver.food_burst);
                info!("Added {} food", self.config.driver.food_burst);
            }
            Command::SpeedUp => {
                self.time_scale *= self.config.driver.time_scale_step;
                info!("Speed: {:.2}x", self.time_scale);
            }
            Command::SlowDown => {
                self.time_scale /= self.config.driver.time_scale_step;
                info!("Speed: {:.2}x", self.time_scale);
            }
            Command::Quit => {
                self.running = false;
                info!("Quitting");
            }
        }
    }

    /// Advances by `elapsed` wall-clock seconds. Does nothing while paused.
    ///
    /// Returns the simulated time actually applied.
    pub fn advance(&mut self, elapsed: f64) -> f64 {
        if self.paused || !self.running {
            return 0.0;
        }

        let dt = elapsed.clamp(0.0, self.config.driver.max_frame_time) * self.time_scale;
        self.ecosystem.update(dt);

        self.stats_timer += dt;
        if self.stats_timer >= self.config.driver.stats_interval {
            self.stats_timer = 0.0;
            self.log_statistics();
        }
        dt
    }

    /// Steps `steps` times with a fixed `dt`, stopping early if the population dies out.
    pub fn run_headless(&mut self, steps: u64, dt: f64) {
        for step in 0..steps {
            if !self.running {
                break;
            }
            self.advance(dt);
            if self.ecosystem.entity_count() == 0 {
                info!("Population extinct after {} steps", step + 1);
                break;
            }
        }
        self.log_statistics();
    }

    /// Logs the population and the births and deaths since the previous report, which it returns.
    pub fn log_statistics(&mut self) -> (usize, usize) {
        let stats = self.ecosystem.statistics();
        let births = stats.total_births - self.reported_births;
        let deaths = stats.total_deaths - self.reported_deaths;
        self.reported_births = stats.total_births;
        self.reported_deaths = stats.total_deaths;
        info!(
            "Stats - herbivores: {}, carnivores: {}, plants: {}, food: {}, births: {}, deaths: {} (total {}/{})",
            stats.herbivores,
            stats.carnivores,
            stats.plants,
            stats.food,
            births,
            deaths,
            stats.total_births,
            stats.total_deaths
        );
        (births, deaths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> Simulation {
        Simulation::new(Config::default(), 7)
    }

    #[test]
    fn starts_with_configured_population() {
        let sim = simulation();
        let stats = sim.ecosystem.statistics();
        assert_eq!((stats.herbivores, stats.carnivores, stats.plants), (20, 5, 30));
    }

    #[test]
    fn paused_simulation_does_not_advance() {
        let mut sim = simulation();
        sim.handle_command(Command::TogglePause);
        assert_eq!(sim.advance(0.016), 0.0);
        assert_eq!(sim.ecosystem.statistics().tick, 0);

        sim.handle_command(Command::TogglePause);
        assert!(sim.advance(0.016) > 0.0);
        assert_eq!(sim.ecosystem.statistics().tick, 1);
    }

    #[test]
    fn time_scale_and_frame_cap() {
        let mut sim = simulation();
        sim.handle_command(Command::SpeedUp);
        assert!((sim.time_scale() - 1.5).abs() < 1e-9);
        assert!((sim.advance(1.0) - 0.15).abs() < 1e-9);

        sim.handle_command(Command::SlowDown);
        sim.handle_command(Command::SlowDown);
        assert!((sim.time_scale() - 1.0 / 1.5).abs() < 1e-9);
    }

    #[test]
    fn spawn_food_and_reset() {
        let mut sim = simulation();
        sim.handle_command(Command::SpawnFood);
        assert_eq!(sim.ecosystem.food_count(), 10);

        sim.handle_command(Command::Reset);
        assert_eq!(sim.ecosystem.food_count(), 0);
        assert_eq!(sim.ecosystem.entity_count(), 55);
    }

    #[test]
    fn quit_stops_advancing() {
        let mut sim = simulation();
        sim.handle_command(Command::Quit);
        assert!(!sim.is_running());
        assert_eq!(sim.advance(0.016), 0.0);
    }

    #[test]
    fn report_covers_interval_not_last_tick() {
        let mut config = Config::default();
        config.population = crate::config::PopulationConfig { herbivores: 0, carnivores: 0, plants: 3 };
        config.driver.stats_interval = 1000.0;
        let mut sim = Simulation::new(config, 3);

        // Plants reach max age after 30 s; run past that in capped frames.
        for _ in 0..400 {
            sim.advance(0.1);
        }
        assert_eq!(sim.ecosystem.statistics().deaths_today, 0);
        let (births, deaths) = sim.log_statistics();
        assert_eq!(births, 0);
        assert_eq!(deaths, 3);
        assert_eq!(sim.log_statistics(), (0, 0));
    }

    #[test]
    fn headless_run_ticks() {
        let mut sim = simulation();
        sim.run_headless(30, 1.0 / 60.0);
        assert!(sim.ecosystem.statistics().tick > 0);
    }
}

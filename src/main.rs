use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use ecosim::engine::{Command, Simulation};
use ecosim::render::{self, STATS_AREA_HEIGHT};
use ecosim::Config;
use piston_window::*;
use rand::Rng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecosim")]
#[command(version)]
#[command(about = "Herbivores, carnivores and plants living in a small 2D world")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Number of steps for a headless run
    #[arg(short, long, default_value = "600")]
    steps: u64,

    /// Fixed time step in seconds for a headless run
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.log_level))
        .init();

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Starting ecosystem simulator (seed {})", seed);

    let mut simulation = Simulation::new(config, seed);

    if cli.headless {
        simulation.run_headless(cli.steps, cli.dt);
        return Ok(());
    }

    run_window(&mut simulation)
}

fn command_for_key(key: Key) -> Option<Command> {
    match key {
        Key::Space => Some(Command::TogglePause),
        Key::R => Some(Command::Reset),
        Key::F => Some(Command::SpawnFood),
        Key::Up => Some(Command::SpeedUp),
        Key::Down => Some(Command::SlowDown),
        Key::Escape => Some(Command::Quit),
        _ => None,
    }
}

fn run_window(simulation: &mut Simulation) -> Result<()> {
    let world = &simulation.config().world;
    let mut window: PistonWindow = WindowSettings::new(
        "Ecosystem Simulator",
        [world.width as u32, (world.height + STATS_AREA_HEIGHT) as u32],
    )
    .exit_on_esc(false)
    .build()
    .map_err(|e| anyhow!("could not create window: {e}"))?;
    window.set_ups(simulation.config().driver.ups);

    let mut glyphs = {
        let font_path = std::path::Path::new("assets/FiraSans-Regular.ttf");
        if font_path.exists() {
            window.load_font(font_path).ok()
        } else {
            log::warn!("Could not load font file at {:?}", font_path);
            None
        }
    };

    log::info!("Controls: SPACE pause, R reset, F add food, UP/DOWN speed, ESC quit");

    while let Some(e) = window.next() {
        if let Some(Button::Keyboard(key)) = e.press_args() {
            if let Some(command) = command_for_key(key) {
                simulation.handle_command(command);
            }
        }
        if !simulation.is_running() {
            window.set_should_close(true);
            continue;
        }

        if let Some(args) = e.update_args() {
            simulation.advance(args.dt);
        }

        if e.render_args().is_some() {
            let status = render::stats_line(&simulation.ecosystem, simulation.time_scale(), simulation.is_paused());
            let ecosystem = &simulation.ecosystem;
            window.draw_2d(&e, |c, g, device| {
                render::draw_world(ecosystem, c, g);
                if let Some(glyphs) = glyphs.as_mut() {
                    if render::draw_status(&status, glyphs, c, g) {
                        glyphs.factory.encoder.flush(device);
                    }
                }
            });
        }
    }

    log::info!("Simulation finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(command_for_key(Key::Space), Some(Command::TogglePause));
        assert_eq!(command_for_key(Key::R), Some(Command::Reset));
        assert_eq!(command_for_key(Key::F), Some(Command::SpawnFood));
        assert_eq!(command_for_key(Key::Up), Some(Command::SpeedUp));
        assert_eq!(command_for_key(Key::Down), Some(Command::SlowDown));
        assert_eq!(command_for_key(Key::Escape), Some(Command::Quit));
        assert_eq!(command_for_key(Key::Q), None);
    }
}

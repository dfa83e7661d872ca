use piston_window::*;

use crate::color::Color;
use crate::ecosystem::Ecosystem;
use crate::entity::{Entity, EntityType};
use crate::food::Food;

pub const STATS_AREA_HEIGHT: f64 = 50.0;
const FOOD_SIZE: f64 = 5.0;
const ENERGY_BAR_HEIGHT: f64 = 2.0;

pub fn draw_entity(entity: &Entity, transform: math::Matrix2d, g: &mut G2d) {
    if !entity.is_alive() {
        return;
    }

    let size = entity.size;
    let left = entity.position.x - size / 2.0;
    let top = entity.position.y - size / 2.0;
    rectangle(entity.display_color().to_rgba_f32(), [left, top, size, size], transform, g);

    if entity.entity_type() != EntityType::Plant {
        let width = size * entity.energy_ratio() as f64;
        rectangle(
            Color::energy_bar().to_rgba_f32(),
            [left, top - ENERGY_BAR_HEIGHT - 1.0, width, ENERGY_BAR_HEIGHT],
            transform,
            g,
        );
    }
}

pub fn draw_food(food: &Food, transform: math::Matrix2d, g: &mut G2d) {
    rectangle(
        Color::food_green().to_rgba_f32(),
        [
            food.position.x - FOOD_SIZE / 2.0,
            food.position.y - FOOD_SIZE / 2.0,
            FOOD_SIZE,
            FOOD_SIZE,
        ],
        transform,
        g,
    );
}

pub fn stats_line(ecosystem: &Ecosystem, time_scale: f64, paused: bool) -> String {
    let stats = ecosystem.statistics();
    format!(
        "H:{} C:{} P:{} | Food: {} | Births: {} Deaths: {} | Speed: {:.2}x{} | Threads: {}",
        stats.herbivores,
        stats.carnivores,
        stats.plants,
        stats.food,
        stats.total_births,
        stats.total_deaths,
        time_scale,
        if paused { " (paused)" } else { "" },
        rayon::current_num_threads()
    )
}

/// Clears the frame and draws the stats panel background, food and entities.
pub fn draw_world(ecosystem: &Ecosystem, c: Context, g: &mut G2d) {
    clear(Color::background().to_rgba_f32(), g);

    rectangle(
        Color::panel().to_rgba_f32(),
        [0.0, 0.0, ecosystem.world_width(), STATS_AREA_HEIGHT],
        c.transform,
        g,
    );

    let world = c.transform.trans(0.0, STATS_AREA_HEIGHT);
    for food in ecosystem.foods() {
        draw_food(food, world, g);
    }
    for entity in ecosystem.entities() {
        draw_entity(entity, world, g);
    }
}

/// Writes `status` into the stats panel. Returns false if the glyphs failed to render.
pub fn draw_status(status: &str, glyphs: &mut Glyphs, c: Context, g: &mut G2d) -> bool {
    text::Text::new_color([1.0, 1.0, 1.0, 1.0], 16)
        .draw(status, glyphs, &c.draw_state, c.transform.trans(10.0, 30.0), g)
        .is_ok()
}

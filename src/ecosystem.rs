use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::{Config, FoodConfig};
use crate::entity::{DeathCause, Entity, EntityType};
use crate::food::Food;
use crate::simulation_stats::Statistics;
use crate::vector::Vector2D;

/// Extra reach added to a herbivore's half-size when eating food.
pub const FOOD_RADIUS: f64 = 2.5;
/// Share of the prey's energy a carnivore gets from a kill.
pub const PREDATION_EFFICIENCY: f32 = 0.95;
/// Max per-axis distance between a newborn and its parent.
const OFFSPRING_SPREAD: f64 = 10.0;

/// Owns every entity and food item and advances them one tick at a time.
pub struct Ecosystem {
    entities: Vec<Entity>,
    foods: Vec<Food>,
    world_width: f64,
    world_height: f64,
    max_entities: usize,
    food_config: FoodConfig,
    food_timer: f64,
    next_id: u64,
    rng: ChaCha8Rng,
    stats: Statistics,
}

impl Ecosystem {
    /// Panics if a world dimension is not positive.
    pub fn with_seed(world_width: f64, world_height: f64, max_entities: usize, seed: u64) -> Self {
        assert!(
            world_width > 0.0 && world_height > 0.0,
            "world dimensions must be positive"
        );
        Ecosystem {
            entities: Vec::new(),
            foods: Vec::new(),
            world_width,
            world_height,
            max_entities,
            food_config: FoodConfig::default(),
            food_timer: 0.0,
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: Statistics::default(),
        }
    }

    pub fn from_config(config: &Config, seed: u64) -> Self {
        let mut ecosystem = Self::with_seed(
            config.world.width,
            config.world.height,
            config.world.max_entities,
            seed,
        );
        ecosystem.food_config = config.food.clone();
        ecosystem
    }

    /// Clears the world and seeds it with fresh entities at random positions. No food is placed.
    pub fn initialize(&mut self, herbivores: usize, carnivores: usize, plants: usize) {
        self.entities.clear();
        self.foods.clear();
        self.stats = Statistics::default();
        self.food_timer = 0.0;
        self.next_id = 0;

        for (entity_type, count) in [
            (EntityType::Herbivore, herbivores),
            (EntityType::Carnivore, carnivores),
            (EntityType::Plant, plants),
        ] {
            for _ in 0..count {
                self.spawn_random_entity(entity_type);
            }
        }

        self.update_statistics();
        info!(
            "Ecosystem initialized: {} herbivores, {} carnivores, {} plants in {}x{}",
            self.stats.herbivores, self.stats.carnivores, self.stats.plants, self.world_width, self.world_height
        );
    }

    /// Runs one tick: steering and movement, eating, reproduction, death sweep, food growth, statistics.
    pub fn update(&mut self, dt: f64) {
        self.stats.start_tick();
        self.update_entities(dt);
        self.handle_eating();
        self.handle_reproduction();
        self.remove_dead_entities();
        self.handle_plant_growth(dt);
        self.update_statistics();
    }

    /// Adds `count` food items at random positions with the configured energy.
    pub fn spawn_food(&mut self, count: usize) {
        for _ in 0..count {
            let food = Food::random(&mut self.rng, self.world_width, self.world_height, self.food_config.energy);
            self.foods.push(food);
        }
    }

    pub fn remove_dead_entities(&mut self) {
        let before = self.entities.len();
        self.entities.retain(Entity::is_alive);
        let removed = before - self.entities.len();
        self.stats.record_deaths(removed);
    }

    /// Gives every entity a chance to breed. Offspring beyond the entity cap are discarded.
    pub fn handle_reproduction(&mut self) {
        let room = self.max_entities.saturating_sub(self.entities.len());
        let mut born = Vec::new();

        for entity in &mut self.entities {
            if let Some(child) = entity.reproduce() {
                if born.len() < room {
                    born.push(child);
                } else {
                    debug!("No room for {}, offspring discarded", child.name);
                }
            }
        }

        for child in &mut born {
            let offset = Vector2D::new(
                self.rng.random_range(-OFFSPRING_SPREAD..=OFFSPRING_SPREAD),
                self.rng.random_range(-OFFSPRING_SPREAD..=OFFSPRING_SPREAD),
            );
            child.position = clamp_to_world(child.position + offset, self.world_width, self.world_height);
        }

        self.stats.record_births(born.len());
        self.entities.extend(born);
    }

    /// Herbivores eat food in reach, then carnivores kill herbivores they touch.
    pub fn handle_eating(&mut self) {
        let before = self.foods.len();
        let entities = &mut self.entities;
        self.foods.retain(|food| {
            let eater = entities.iter_mut().find(|e| {
                e.is_alive()
                    && e.entity_type() == EntityType::Herbivore
                    && e.position.distance(food.position) <= e.size / 2.0 + FOOD_RADIUS
            });
            match eater {
                Some(herbivore) => {
                    herbivore.eat(food.energy);
                    false
                }
                None => true,
            }
        });
        self.stats.food_eaten += before - self.foods.len();

        for hunter in 0..self.entities.len() {
            let predator = &self.entities[hunter];
            if !predator.is_alive() || predator.entity_type() != EntityType::Carnivore {
                continue;
            }
            let prey = self.entities.iter().position(|prey| {
                prey.is_alive()
                    && prey.entity_type() == EntityType::Herbivore
                    && predator.position.distance(prey.position) <= (predator.size + prey.size) / 2.0
            });
            if let Some(prey) = prey {
                let gain = self.entities[prey].energy() * PREDATION_EFFICIENCY;
                self.entities[prey].kill(DeathCause::Predation);
                self.entities[hunter].eat(gain);
                self.stats.kills += 1;
                debug!("{} catches {}", self.entities[hunter].name, self.entities[prey].name);
            }
        }
    }

    /// Adds an entity unless the population cap is reached. Returns whether it was added.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if self.entities.len() >= self.max_entities {
            debug!("Entity cap reached, {} dropped", entity.name);
            return false;
        }
        self.entities.push(entity);
        true
    }

    pub fn add_food(&mut self, position: Vector2D, energy: f32) {
        self.foods.push(Food::new(position, energy));
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn world_width(&self) -> f64 {
        self.world_width
    }

    pub fn world_height(&self) -> f64 {
        self.world_height
    }

    pub fn max_entities(&self) -> usize {
        self.max_entities
    }

    fn update_entities(&mut self, dt: f64) {
        let (width, height) = (self.world_width, self.world_height);
        let forces: Vec<Vector2D> = {
            let (entities, foods) = (&self.entities, &self.foods);
            entities
                .par_iter()
                .map(|entity| steering_force(entity, entities, foods, width, height))
                .collect()
        };

        self.entities
            .par_iter_mut()
            .zip(forces)
            .for_each(|(entity, force)| {
                entity.apply_force(force);
                entity.update(dt);
                entity.position = clamp_to_world(entity.position, width, height);
            });
    }

    fn handle_plant_growth(&mut self, dt: f64) {
        self.food_timer += dt;
        let interval = self.food_config.spawn_interval;
        if self.food_timer < interval {
            return;
        }
        let bursts = (self.food_timer / interval).floor();
        self.food_timer -= bursts * interval;

        let plants: Vec<Vector2D> = self
            .entities
            .iter()
            .filter(|e| e.is_alive() && e.entity_type() == EntityType::Plant)
            .map(|e| e.position)
            .collect();

        let room = self.food_config.max_food.saturating_sub(self.foods.len());
        let wanted = (bursts as usize).saturating_mul(self.food_config.per_spawn).min(room);
        let spread = self.food_config.plant_spread;
        for _ in 0..wanted {
            let food = if plants.is_empty() {
                Food::random(&mut self.rng, self.world_width, self.world_height, self.food_config.energy)
            } else {
                let origin = plants[self.rng.random_range(0..plants.len())];
                let offset = Vector2D::new(
                    self.rng.random_range(-spread..=spread),
                    self.rng.random_range(-spread..=spread),
                );
                let position = clamp_to_world(origin + offset, self.world_width, self.world_height);
                Food::new(position, self.food_config.energy)
            };
            self.foods.push(food);
        }
    }

    fn update_statistics(&mut self) {
        let stats = &mut self.stats;
        stats.herbivores = 0;
        stats.carnivores = 0;
        stats.plants = 0;

        let mut energy = 0.0;
        for entity in self.entities.iter().filter(|e| e.is_alive()) {
            match entity.entity_type() {
                EntityType::Herbivore => stats.herbivores += 1,
                EntityType::Carnivore => stats.carnivores += 1,
                EntityType::Plant => stats.plants += 1,
            }
            energy += entity.energy();
        }

        let population = stats.population();
        stats.food = self.foods.len();
        stats.max_population = stats.max_population.max(population);
        stats.average_energy = if population > 0 { energy / population as f32 } else { 0.0 };
    }

    fn spawn_random_entity(&mut self, entity_type: EntityType) {
        let position = self.random_position();
        let name = format!("{}_{}", entity_type.label(), self.next_id);
        self.next_id += 1;
        let entity = Entity::with_seed(entity_type, position, name, self.rng.random());
        self.add_entity(entity);
    }

    fn random_position(&mut self) -> Vector2D {
        Vector2D::new(
            self.rng.random_range(0.0..self.world_width),
            self.rng.random_range(0.0..self.world_height),
        )
    }
}

/// Sum of every steering rule that applies to `entity`. Plants and the dead get none.
fn steering_force(entity: &Entity, entities: &[Entity], foods: &[Food], width: f64, height: f64) -> Vector2D {
    if !entity.is_alive() || !entity.entity_type().can_move() {
        return Vector2D::ZERO;
    }
    entity.seek_food(foods)
        + entity.avoid_predators(entities)
        + entity.seek_prey(entities)
        + entity.stay_in_bounds(width, height)
}

fn clamp_to_world(position: Vector2D, width: f64, height: f64) -> Vector2D {
    Vector2D::new(position.x.clamp(0.0, width), position.y.clamp(0.0, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ecosystem() -> Ecosystem {
        Ecosystem::with_seed(800.0, 600.0, 500, 42)
    }

    #[test]
    fn initialize_resets_previous_state() {
        let mut eco = ecosystem();
        eco.initialize(3, 2, 1);
        eco.spawn_food(5);
        eco.update(0.1);

        eco.initialize(1, 1, 1);
        assert_eq!(eco.entity_count(), 3);
        assert_eq!(eco.food_count(), 0);
        assert_eq!(eco.statistics().total_births, 0);
        assert_eq!(eco.statistics().tick, 0);
    }

    #[test]
    fn entities_spawn_inside_world() {
        let mut eco = ecosystem();
        eco.initialize(20, 5, 30);
        for entity in eco.entities() {
            assert!((0.0..800.0).contains(&entity.position.x));
            assert!((0.0..600.0).contains(&entity.position.y));
        }
    }

    #[test]
    fn entity_cap_drops_excess() {
        let mut eco = Ecosystem::with_seed(800.0, 600.0, 4, 1);
        eco.initialize(3, 3, 3);
        assert_eq!(eco.entity_count(), 4);
        assert!(!eco.add_entity(Entity::with_seed(EntityType::Plant, Vector2D::ZERO, "p", 1)));
    }

    #[test]
    fn offspring_beyond_cap_is_discarded() {
        let mut eco = Ecosystem::with_seed(800.0, 600.0, 1, 5);
        let mut parent = Entity::with_seed(EntityType::Plant, Vector2D::new(400.0, 300.0), "p", 5);
        parent.eat(100.0);
        parent.update(3.0);
        assert!(parent.can_reproduce());
        eco.add_entity(parent);

        for _ in 0..100 {
            eco.handle_reproduction();
        }
        assert_eq!(eco.entity_count(), 1);
        assert_eq!(eco.statistics().total_births, 0);
        assert!(eco.entities()[0].energy() < 100.0);
    }

    #[test]
    fn reproduction_adds_children() {
        let mut eco = ecosystem();
        let mut parent = Entity::with_seed(EntityType::Plant, Vector2D::new(400.0, 300.0), "p", 5);
        parent.eat(100.0);
        parent.update(3.0);
        eco.add_entity(parent);

        for _ in 0..100 {
            eco.handle_reproduction();
        }
        assert_eq!(eco.entity_count(), 2);
        assert_eq!(eco.statistics().births_today, 1);
        let child = &eco.entities()[1];
        assert_eq!(child.age(), 0);
        assert!(child.position.distance(Vector2D::new(400.0, 300.0)) <= 15.0);
    }

    #[test]
    fn predation_kills_touching_herbivore() {
        let mut eco = ecosystem();
        let position = Vector2D::new(400.0, 300.0);
        let hunter = Entity::with_seed(EntityType::Carnivore, position, "c", 1);
        let hunger = hunter.energy();
        eco.add_entity(hunter);
        eco.add_entity(Entity::with_seed(EntityType::Herbivore, position, "h", 2));

        eco.handle_eating();

        assert!(!eco.entities()[1].is_alive());
        assert_eq!(eco.entities()[1].death_cause(), Some(DeathCause::Predation));
        assert!(eco.entities()[0].energy() > hunger);
        assert_eq!(eco.statistics().kills, 1);

        eco.remove_dead_entities();
        assert_eq!(eco.entity_count(), 1);
        assert_eq!(eco.statistics().deaths_today, 1);
    }

    #[test]
    fn each_food_is_eaten_once() {
        let mut eco = ecosystem();
        let position = Vector2D::new(100.0, 100.0);
        eco.add_entity(Entity::with_seed(EntityType::Herbivore, position, "h1", 1));
        eco.add_entity(Entity::with_seed(EntityType::Herbivore, position, "h2", 2));
        eco.add_food(position, 25.0);

        eco.handle_eating();

        assert_eq!(eco.food_count(), 0);
        let fed = eco.entities().iter().filter(|e| e.energy() > 80.0).count();
        assert_eq!(fed, 1);
    }

    #[test]
    fn carnivores_and_plants_do_not_eat_food() {
        let mut eco = ecosystem();
        let position = Vector2D::new(100.0, 100.0);
        eco.add_entity(Entity::with_seed(EntityType::Carnivore, position, "c", 1));
        eco.add_entity(Entity::with_seed(EntityType::Plant, position, "p", 2));
        eco.add_food(position, 25.0);
        eco.handle_eating();
        assert_eq!(eco.food_count(), 1);
    }

    #[test]
    fn food_grows_near_plants_on_interval() {
        let mut eco = ecosystem();
        let plant = Vector2D::new(400.0, 300.0);
        eco.add_entity(Entity::with_seed(EntityType::Plant, plant, "p", 1));

        eco.update(0.5);
        assert_eq!(eco.food_count(), 0);
        eco.update(0.6);
        assert_eq!(eco.food_count(), 3);
        for food in eco.foods() {
            assert!((food.position.x - plant.x).abs() <= 30.0);
            assert!((food.position.y - plant.y).abs() <= 30.0);
        }
    }

    #[test]
    fn huge_cap_allocates_lazily() {
        let mut eco = Ecosystem::with_seed(800.0, 600.0, 1_000_000_000, 1);
        eco.initialize(2, 1, 3);
        assert_eq!(eco.entity_count(), 6);
        assert_eq!(eco.max_entities(), 1_000_000_000);
    }

    #[test]
    fn huge_step_caps_food_growth() {
        let mut eco = ecosystem();
        eco.add_entity(Entity::with_seed(EntityType::Plant, Vector2D::new(400.0, 300.0), "p", 1));
        eco.update(1.0e19);
        assert_eq!(eco.food_count(), FoodConfig::default().max_food);
        assert_eq!(eco.entity_count(), 0);
        assert_eq!(eco.statistics().deaths_today, 1);
    }

    #[test]
    fn positions_stay_in_world() {
        let mut eco = Ecosystem::with_seed(200.0, 150.0, 500, 11);
        eco.initialize(20, 5, 5);
        for _ in 0..300 {
            eco.update(0.1);
            for entity in eco.entities() {
                assert!((0.0..=200.0).contains(&entity.position.x));
                assert!((0.0..=150.0).contains(&entity.position.y));
            }
        }
    }

    #[test]
    fn same_seed_same_world() {
        let run = || {
            let mut eco = Ecosystem::with_seed(800.0, 600.0, 500, 99);
            eco.initialize(10, 3, 10);
            eco.spawn_food(20);
            for _ in 0..100 {
                eco.update(0.1);
            }
            eco.entities().iter().map(|e| e.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::color::Color;
use crate::food::Food;
use crate::vector::Vector2D;

pub const MAX_STEERING_FORCE: f64 = 0.5;
pub const SEEK_RADIUS: f64 = 150.0;
pub const AVOID_RADIUS: f64 = 120.0;
pub const HUNT_RADIUS: f64 = 180.0;
pub const BOUNDS_MARGIN: f64 = 40.0;
pub const MAX_SPEED: f64 = 1.5;
pub const MATURITY_AGE: u32 = 20;
pub const REPRODUCTION_CHANCE: f64 = 0.3;

const SPEED: f64 = 20.0;
const MOVE_DRAG: f64 = 0.1;
const WANDER_CHANCE: f64 = 0.02;
// Age ticks per simulated second.
const AGE_RATE: f64 = 10.0;
const REPRODUCTION_THRESHOLD: f32 = 0.8;
const PARENT_ENERGY_KEPT: f32 = 0.6;
const CHILD_ENERGY_SHARE: f32 = 0.7;
const CHILD_SIZE_SHARE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Herbivore,
    Carnivore,
    Plant,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Herbivore, EntityType::Carnivore, EntityType::Plant];

    pub fn initial_energy(self) -> f32 {
        match self {
            EntityType::Herbivore => 80.0,
            EntityType::Carnivore => 100.0,
            EntityType::Plant => 50.0,
        }
    }

    pub fn max_energy(self) -> f32 {
        match self {
            EntityType::Herbivore => 150.0,
            EntityType::Carnivore => 200.0,
            EntityType::Plant => 100.0,
        }
    }

    pub fn max_age(self) -> u32 {
        match self {
            EntityType::Herbivore => 200,
            EntityType::Carnivore => 150,
            EntityType::Plant => 300,
        }
    }

    pub fn base_color(self) -> Color {
        match self {
            EntityType::Herbivore => Color::herbivore_blue(),
            EntityType::Carnivore => Color::carnivore_red(),
            EntityType::Plant => Color::plant_green(),
        }
    }

    pub fn size(self) -> f64 {
        match self {
            EntityType::Herbivore => 8.0,
            EntityType::Carnivore => 12.0,
            EntityType::Plant => 6.0,
        }
    }

    /// Energy spent per second of simulated time. Plants photosynthesise, so theirs is negative.
    fn base_consumption(self) -> f32 {
        match self {
            EntityType::Herbivore => 1.5,
            EntityType::Carnivore => 2.0,
            EntityType::Plant => -0.5,
        }
    }

    pub fn can_move(self) -> bool {
        self != EntityType::Plant
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityType::Herbivore => "Herbivore",
            EntityType::Carnivore => "Carnivore",
            EntityType::Plant => "Plant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Predation,
}

/// A single agent of the ecosystem.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub position: Vector2D,
    /// Base colour; see [`Entity::display_color`] for the energy-tinted one.
    pub color: Color,
    pub size: f64,
    energy: f32,
    max_energy: f32,
    age: u32,
    age_remainder: f64,
    max_age: u32,
    alive: bool,
    death_cause: Option<DeathCause>,
    velocity: Vector2D,
    entity_type: EntityType,
    offspring: u32,
    rng: ChaCha8Rng,
}

impl Entity {
    /// Entity whose wandering and reproduction draws come from a stream seeded with `seed`.
    pub fn with_seed(entity_type: EntityType, position: Vector2D, name: impl Into<String>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let velocity = random_direction(&mut rng);
        let entity = Entity {
            name: name.into(),
            position,
            color: entity_type.base_color(),
            size: entity_type.size(),
            energy: entity_type.initial_energy(),
            max_energy: entity_type.max_energy(),
            age: 0,
            age_remainder: 0.0,
            max_age: entity_type.max_age(),
            alive: true,
            death_cause: None,
            velocity,
            entity_type,
            offspring: 0,
            rng,
        };
        trace!(
            "{} created at ({:.1}, {:.1})",
            entity.name, entity.position.x, entity.position.y
        );
        entity
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn max_energy(&self) -> f32 {
        self.max_energy
    }

    pub fn energy_ratio(&self) -> f32 {
        self.energy / self.max_energy
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn display_color(&self) -> Color {
        self.color.with_energy_ratio(self.energy_ratio())
    }

    /// Advances the entity by `dt` seconds: metabolism, aging, movement, then the vitality check.
    pub fn update(&mut self, dt: f64) {
        if !self.alive {
            return;
        }

        self.consume_energy(dt);
        self.advance_age(dt);
        self.move_by(dt);
        self.energy = self.energy.clamp(0.0, self.max_energy);
        self.check_vitality();
    }

    /// Integrates position along the current heading. Plants never move.
    pub fn move_by(&mut self, dt: f64) {
        if !self.alive || !self.entity_type.can_move() {
            return;
        }

        if self.rng.random_bool(WANDER_CHANCE) {
            self.velocity = random_direction(&mut self.rng);
        }

        self.position += self.velocity * dt * SPEED;
        self.energy -= (self.velocity.length() * dt * MOVE_DRAG) as f32;
    }

    /// Nudges the heading by a steering force, keeping speed under [`MAX_SPEED`].
    pub fn apply_force(&mut self, force: Vector2D) {
        if !self.alive || !self.entity_type.can_move() {
            return;
        }
        self.velocity = (self.velocity + force).limit(MAX_SPEED);
    }

    pub fn eat(&mut self, amount: f32) {
        if !self.alive {
            return;
        }
        self.energy = (self.energy + amount).min(self.max_energy);
        trace!("{} eats and gains {:.1} energy", self.name, amount);
    }

    /// Marks the entity dead once it has starved or grown too old. Death is final.
    pub fn check_vitality(&mut self) {
        if !self.alive {
            return;
        }
        if self.energy <= 0.0 {
            self.energy = 0.0;
            self.die(DeathCause::Starvation);
        } else if self.age >= self.max_age {
            self.die(DeathCause::OldAge);
        }
    }

    pub(crate) fn kill(&mut self, cause: DeathCause) {
        if self.alive {
            self.die(cause);
        }
    }

    fn die(&mut self, cause: DeathCause) {
        self.alive = false;
        self.death_cause = Some(cause);
        debug!("{} dies ({:?}) at age {}", self.name, cause, self.age);
    }

    pub fn can_reproduce(&self) -> bool {
        self.alive && self.energy > self.max_energy * REPRODUCTION_THRESHOLD && self.age > MATURITY_AGE
    }

    /// Attempts to produce offspring. Eligible parents succeed with [`REPRODUCTION_CHANCE`].
    ///
    /// The child receives 70% of the parent's energy measured before the parent
    /// pays its cost; the parent then keeps 60% of that same amount.
    pub fn reproduce(&mut self) -> Option<Entity> {
        if !self.can_reproduce() || !self.rng.random_bool(REPRODUCTION_CHANCE) {
            return None;
        }

        let parent_energy = self.energy;
        self.energy = parent_energy * PARENT_ENERGY_KEPT;
        self.offspring += 1;

        let child = Entity {
            name: format!("{}.{}", self.name, self.offspring),
            position: self.position,
            color: self.color,
            size: self.size * CHILD_SIZE_SHARE,
            energy: parent_energy * CHILD_ENERGY_SHARE,
            max_energy: self.max_energy,
            age: 0,
            age_remainder: 0.0,
            max_age: self.max_age,
            alive: true,
            death_cause: None,
            velocity: self.velocity,
            entity_type: self.entity_type,
            offspring: 0,
            rng: ChaCha8Rng::seed_from_u64(self.rng.random()),
        };
        debug!("{} gives birth to {}", self.name, child.name);
        Some(child)
    }

    /// Steers towards the nearest food within [`SEEK_RADIUS`]. Carnivores ignore food.
    pub fn seek_food(&self, foods: &[Food]) -> Vector2D {
        if foods.is_empty() || self.entity_type == EntityType::Carnivore {
            return Vector2D::ZERO;
        }

        let mut closest = SEEK_RADIUS * SEEK_RADIUS;
        let mut target = None;
        for food in foods {
            let dist_sq = self.position.distance_squared(food.position);
            if dist_sq < closest {
                closest = dist_sq;
                target = Some(food.position);
            }
        }

        match target {
            Some(target) => (target - self.position).normalize() * MAX_STEERING_FORCE,
            None => Vector2D::ZERO,
        }
    }

    /// Flee force away from living carnivores in [`AVOID_RADIUS`], closer ones weighing more.
    pub fn avoid_predators(&self, candidates: &[Entity]) -> Vector2D {
        if matches!(self.entity_type, EntityType::Plant | EntityType::Carnivore) {
            return Vector2D::ZERO;
        }

        let mut steer = Vector2D::ZERO;
        let mut total_weight = 0.0;
        for predator in candidates {
            if !predator.alive || predator.entity_type != EntityType::Carnivore {
                continue;
            }
            let away = self.position - predator.position;
            let dist_sq = away.length_squared();
            if dist_sq > 0.0 && dist_sq < AVOID_RADIUS * AVOID_RADIUS {
                let weight = 1.0 / dist_sq.sqrt();
                steer += away.normalize() * weight;
                total_weight += weight;
            }
        }

        if total_weight <= 0.0 {
            return Vector2D::ZERO;
        }
        (steer * (1.0 / total_weight)).normalize() * MAX_STEERING_FORCE
    }

    /// Chase force towards the nearest living herbivore in [`HUNT_RADIUS`]. Carnivores only.
    pub fn seek_prey(&self, candidates: &[Entity]) -> Vector2D {
        if self.entity_type != EntityType::Carnivore {
            return Vector2D::ZERO;
        }

        candidates
            .iter()
            .filter(|prey| prey.alive && prey.entity_type == EntityType::Herbivore)
            .map(|prey| (prey.position, self.position.distance_squared(prey.position)))
            .filter(|&(_, dist_sq)| dist_sq < HUNT_RADIUS * HUNT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(target, _)| (target - self.position).normalize() * MAX_STEERING_FORCE)
            .unwrap_or(Vector2D::ZERO)
    }

    /// Pushes the entity back inside when it is within [`BOUNDS_MARGIN`] of an edge.
    pub fn stay_in_bounds(&self, world_width: f64, world_height: f64) -> Vector2D {
        let mut steer = Vector2D::ZERO;

        if self.position.x < BOUNDS_MARGIN {
            steer.x = BOUNDS_MARGIN - self.position.x;
        } else if self.position.x > world_width - BOUNDS_MARGIN {
            steer.x = world_width - BOUNDS_MARGIN - self.position.x;
        }

        if self.position.y < BOUNDS_MARGIN {
            steer.y = BOUNDS_MARGIN - self.position.y;
        } else if self.position.y > world_height - BOUNDS_MARGIN {
            steer.y = world_height - BOUNDS_MARGIN - self.position.y;
        }

        steer.normalize() * MAX_STEERING_FORCE
    }

    fn consume_energy(&mut self, dt: f64) {
        self.energy -= self.entity_type.base_consumption() * dt as f32;
    }

    fn advance_age(&mut self, dt: f64) {
        self.age_remainder += dt * AGE_RATE;
        let whole = self.age_remainder.floor();
        self.age_remainder -= whole;
        self.age = self.age.saturating_add(whole.min(u32::MAX as f64) as u32);
    }
}

fn random_direction(rng: &mut impl Rng) -> Vector2D {
    Vector2D::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0))
}

use rand::Rng;

use crate::vector::Vector2D;

/// Energy granted by a food item when none is specified.
pub const DEFAULT_FOOD_ENERGY: f32 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub position: Vector2D,
    pub energy: f32,
}

impl Food {
    pub fn new(position: Vector2D, energy: f32) -> Self {
        Food { position, energy }
    }

    /// Food at a uniformly random spot inside `width` x `height`.
    pub fn random(rng: &mut impl Rng, width: f64, height: f64, energy: f32) -> Self {
        Food {
            position: Vector2D::new(rng.random_range(0.0..width), rng.random_range(0.0..height)),
            energy,
        }
    }
}

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector used for positions, headings and steering forces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(&self, other: Vector2D) -> f64 {
        (*self - other).length_squared()
    }

    pub fn distance(&self, other: Vector2D) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalize(&self) -> Vector2D {
        let len = self.length();
        if len > 1e-6 {
            Vector2D::new(self.x / len, self.y / len)
        } else {
            Vector2D::ZERO
        }
    }

    /// Caps the length at `max`, keeping the direction.
    pub fn limit(&self, max: f64) -> Vector2D {
        if self.length_squared() > max * max {
            self.normalize() * max
        } else {
            *self
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, scale: f64) -> Vector2D {
        Vector2D::new(self.x * scale, self.y * scale)
    }
}

impl Neg for Vector2D {
    type Output = Vector2D;

    fn neg(self) -> Vector2D {
        Vector2D::new(-self.x, -self.y)
    }
}

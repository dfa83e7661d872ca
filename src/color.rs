/// RGBA colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Below this energy ratio an entity is drawn in a starving tint.
const LOW_ENERGY_RATIO: f32 = 0.3;

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    pub const fn herbivore_blue() -> Self {
        Color::rgb(40, 110, 255)
    }

    pub const fn carnivore_red() -> Self {
        Color::rgb(230, 40, 40)
    }

    pub const fn plant_green() -> Self {
        Color::rgb(40, 180, 60)
    }

    pub const fn food_green() -> Self {
        Color::rgb(0, 255, 0)
    }

    pub const fn energy_bar() -> Self {
        Color::rgb(0, 255, 0)
    }

    pub const fn background() -> Self {
        Color::rgb(25, 25, 25)
    }

    pub const fn panel() -> Self {
        Color::rgb(50, 50, 50)
    }

    /// Display tint for an entity at `ratio` of its max energy.
    pub fn with_energy_ratio(self, ratio: f32) -> Self {
        if ratio >= LOW_ENERGY_RATIO {
            return self;
        }
        let ratio = ratio.clamp(0.0, 1.0);
        Color {
            r: 255,
            g: (self.g as f32 * ratio) as u8,
            b: (self.b as f32 * ratio) as u8,
            a: self.a,
        }
    }

    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Population snapshot recomputed at the end of every tick.
///
/// `births_today` and `deaths_today` cover the current tick only; the `total_*`
/// counters, `food_eaten`, `kills` and `max_population` accumulate across ticks
/// until the next reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub tick: u64,
    pub herbivores: usize,
    pub carnivores: usize,
    pub plants: usize,
    pub food: usize,
    pub births_today: usize,
    pub deaths_today: usize,
    pub total_births: usize,
    pub total_deaths: usize,
    pub food_eaten: usize,
    pub kills: usize,
    pub max_population: usize,
    pub average_energy: f32,
}

impl Statistics {
    pub fn population(&self) -> usize {
        self.herbivores + self.carnivores + self.plants
    }

    pub(crate) fn record_births(&mut self, count: usize) {
        self.births_today += count;
        self.total_births += count;
    }

    pub(crate) fn record_deaths(&mut self, count: usize) {
        self.deaths_today += count;
        self.total_deaths += count;
    }

    pub(crate) fn start_tick(&mut self) {
        self.tick += 1;
        self.births_today = 0;
        self.deaths_today = 0;
    }
}

//! Adaptive control state of the generation loop.
//!
//! Tracks the previous best fitness, the current mutation probability and a
//! stagnation counter, and decides how the population is rebuilt at the end
//! of each generation.

/// How the population is rebuilt at the end of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reshuffle {
    /// Swap once in every individual except the last, reset the stagnation
    /// counter, and discard the offspring.
    PerturbAllButLast,
    /// Swap once in every individual except the first and the last, and
    /// discard the offspring.
    PerturbInterior,
    /// Refill the second quarter with fresh random squares and the second
    /// half with the offspring.
    Replace,
}

/// Mutable control state owned by the runner for the duration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Best fitness of the previous generation, `None` before the first.
    pub last_fitness: Option<u32>,
    /// Current mutation probability. Never below the base rate; may exceed 1.0.
    pub mutation_probability: f64,
    /// Stagnation counter.
    pub unchanged_count: usize,
    base: f64,
    step: f64,
}

impl ControlState {
    /// Creates the initial state.
    pub fn new(base_probability: f64, step: f64) -> Self {
        Self {
            last_fitness: None,
            mutation_probability: base_probability,
            unchanged_count: 0,
            base: base_probability,
            step,
        }
    }

    /// Adapts the mutation probability to this generation's best fitness.
    ///
    /// No improvement: the counter goes up and the probability rises by one
    /// step, without an upper cap. Improvement: the counter goes down
    /// (floored at 0) and the probability either snaps back to the base rate
    /// (if it had reached 1.0) or drops by one step, floored at the base rate.
    pub fn adapt(&mut self, best_fitness: u32) {
        if self.last_fitness == Some(best_fitness) {
            self.unchanged_count += 1;
            self.mutation_probability += self.step;
        } else {
            self.unchanged_count = self.unchanged_count.saturating_sub(1);
            if self.mutation_probability >= 1.0 {
                self.mutation_probability = self.base;
            } else if self.mutation_probability > self.base {
                self.mutation_probability = (self.mutation_probability - self.step).max(self.base);
            }
        }
    }

    /// Records this generation's best fitness for the next comparison.
    pub fn record(&mut self, best_fitness: u32) {
        self.last_fitness = Some(best_fitness);
    }

    /// Picks the rebuild strategy from the stagnation counter.
    ///
    /// The three branches are keyed on `unchanged_count % 50` and `% 100` and
    /// are mutually exclusive. Choosing [`Reshuffle::PerturbAllButLast`]
    /// resets the counter.
    pub fn reshuffle(&mut self) -> Reshuffle {
        if self.unchanged_count % 50 != 0 {
            if self.unchanged_count % 100 != 0 {
                self.unchanged_count = 0;
                return Reshuffle::PerturbAllButLast;
            }
            return Reshuffle::PerturbInterior;
        }
        Reshuffle::Replace
    }
}

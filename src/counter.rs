//! Optimistic stepper state.
//!
//! A counter is split into the `base` implied by the tile currently on screen
//! and a `bump` of local edits. Every mutator keeps `base + bump >= 0`, so the
//! effective value can always be read back without clamping surprises.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayCounter {
    base: u32,
    bump: i64,
}

impl DisplayCounter {
    pub fn new(base: u32) -> Self {
        Self { base, bump: 0 }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn bump(&self) -> i64 {
        self.bump
    }

    pub fn value(&self) -> u32 {
        (i64::from(self.base) + self.bump).clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn step(&mut self, step: Step) {
        match step {
            Step::Up if self.value() < u32::MAX => self.bump += 1,
            Step::Down if self.value() > 0 => self.bump -= 1,
            _ => {}
        }
    }

    pub fn set_value(&mut self, value: u32) {
        self.bump = i64::from(value) - i64::from(self.base);
    }

    /// Absolute set from user input. Negative values floor at zero and
    /// non-finite values count as zero.
    pub fn set_from_input(&mut self, raw: f64) {
        let value = if raw.is_finite() {
            raw.round().clamp(0.0, f64::from(u32::MAX)) as u32
        } else {
            0
        };
        self.set_value(value);
    }

    /// Moves the baseline while keeping pending edits, floored so the
    /// effective value stays non-negative.
    pub fn rebase(&mut self, base: u32) {
        self.base = base;
        self.bump = self.bump.max(-i64::from(base));
    }

    /// Drops pending edits and adopts a confirmed baseline.
    pub fn reset(&mut self, base: u32) {
        self.base = base;
        self.bump = 0;
    }
}

/// Commit rule for the stepper text box: anything other than digits and `-`
/// is ignored, an empty box reads as zero, and garbage reads as NaN.
pub fn parse_counter_input(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_never_goes_below_zero() {
        for base in [0u32, 1, 5, 40] {
            for delta in -(base as i64) - 3..=6 {
                let mut counter = DisplayCounter::new(base);
                let step = if delta < 0 { Step::Down } else { Step::Up };
                for _ in 0..delta.unsigned_abs() {
                    counter.step(step);
                }
                let expected = (base as i64 + delta).max(0) as u32;
                assert_eq!(counter.value(), expected, "base {base} delta {delta}");
                assert!(i64::from(counter.base()) + counter.bump() >= 0);
            }
        }
    }

    #[test]
    fn decrement_at_zero_then_increment_recovers_immediately() {
        let mut counter = DisplayCounter::new(1);
        counter.step(Step::Down);
        counter.step(Step::Down);
        counter.step(Step::Down);
        assert_eq!(counter.value(), 0);
        counter.step(Step::Up);
        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn absolute_set_is_a_delta_against_base() {
        let mut counter = DisplayCounter::new(12);
        counter.set_from_input(20.0);
        assert_eq!(counter.value(), 20);
        assert_eq!(counter.bump(), 8);

        counter.set_from_input(3.0);
        assert_eq!(counter.value(), 3);
        assert_eq!(counter.bump(), -9);

        counter.set_from_input(-7.0);
        assert_eq!(counter.value(), 0);
    }

    #[test]
    fn absolute_set_treats_non_finite_as_zero() {
        for raw in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut counter = DisplayCounter::new(9);
            counter.set_from_input(raw);
            assert_eq!(counter.value(), 0);
        }
    }

    #[test]
    fn rebase_keeps_edits_but_floors_them() {
        let mut counter = DisplayCounter::new(10);
        counter.set_value(4);
        counter.rebase(2);
        assert_eq!(counter.value(), 0);

        let mut counter = DisplayCounter::new(10);
        counter.step(Step::Up);
        counter.rebase(3);
        assert_eq!(counter.value(), 4);
    }

    #[test]
    fn parse_input_follows_commit_rule() {
        assert_eq!(parse_counter_input("42"), 42.0);
        assert_eq!(parse_counter_input(" 1,204 "), 1204.0);
        assert_eq!(parse_counter_input(""), 0.0);
        assert_eq!(parse_counter_input("-5"), -5.0);
        assert!(parse_counter_input("-").is_nan());
        assert!(parse_counter_input("3-4").is_nan());
    }
}

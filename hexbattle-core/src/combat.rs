//! Damage formula and the random variance it draws from

use rand::Rng;
use std::f64::consts::TAU;

/// Source of the multiplicative damage factor.
///
/// Values may be negative; [`damage`] clamps them to zero.
pub trait Variance {
    fn factor(&mut self) -> f64;
}

/// Normally distributed factor (Box-Muller over any `Rng`)
#[derive(Clone, Debug)]
pub struct Gaussian<R> {
    rng: R,
    mean: f64,
    std_dev: f64,
}

impl<R: Rng> Gaussian<R> {
    pub const DEFAULT_MEAN: f64 = 1.0;
    pub const DEFAULT_STD_DEV: f64 = 0.2;

    /// Mean 1, standard deviation 0.2
    pub fn new(rng: R) -> Self {
        Self::with_params(rng, Self::DEFAULT_MEAN, Self::DEFAULT_STD_DEV)
    }

    pub fn with_params(rng: R, mean: f64, std_dev: f64) -> Self {
        Self { rng, mean, std_dev }
    }

    fn standard_normal(&mut self) -> f64 {
        // u1 in (0, 1] keeps ln finite
        let u1 = 1.0 - self.rng.gen::<f64>();
        let u2 = self.rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

impl<R: Rng> Variance for Gaussian<R> {
    fn factor(&mut self) -> f64 {
        self.mean + self.std_dev * self.standard_normal()
    }
}

/// Constant factor, for reproducible outcomes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixed(pub f64);

impl Variance for Fixed {
    fn factor(&mut self) -> f64 {
        self.0
    }
}

/// Scripted factors, replayed in order and then repeating the last one
#[derive(Clone, Debug)]
pub struct Sequence {
    factors: Vec<f64>,
    next: usize,
}

impl Sequence {
    pub fn new(factors: Vec<f64>) -> Self {
        Self { factors, next: 0 }
    }
}

impl Variance for Sequence {
    fn factor(&mut self) -> f64 {
        let value = match self.factors.get(self.next) {
            Some(&v) => v,
            None => self.factors.last().copied().unwrap_or(1.0),
        };
        self.next += 1;
        value
    }
}

/// Expected (pre-variance) damage at a given path cost.
///
/// Cost acts as range falloff: `power / (1 + ln(cost))`, cost 0 treated as 1.
pub fn base_damage(attack_power: u32, cost: u32) -> f64 {
    let cost = cost.max(1) as f64;
    attack_power as f64 / (1.0 + cost.ln())
}

/// `floor(base_damage * max(0, factor))`
pub fn damage(attack_power: u32, cost: u32, factor: f64) -> u32 {
    let scaled = base_damage(attack_power, cost) * factor.max(0.0);
    scaled.floor() as u32
}

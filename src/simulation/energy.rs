//! Energy budgets and metabolic cost functions.
//!
//! The cost functions are pure so the budget-keeping side never needs to know
//! anything about brains or sensors, and vice versa.

use serde::{Deserialize, Serialize};

use super::params::Params;

/// A creature's energy budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyBudget {
    /// Energy currently available.
    pub current: f32,
    /// Ceiling the budget refills to.
    pub max: f32,
}

impl EnergyBudget {
    /// Creates a full budget with the given ceiling.
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Adds energy, capped at the ceiling.
    pub fn add(&mut self, energy: f32) {
        self.current = (self.current + energy).min(self.max);
    }

    /// Spends energy, saturating at zero.
    pub fn spend(&mut self, energy: f32) {
        self.current = (self.current - energy).max(0.0);
    }

    /// Raises (or lowers) the ceiling, e.g. when organs are attached.
    pub fn adjust_max(&mut self, delta: f32) {
        self.max += delta;
        self.current = self.current.min(self.max);
    }

    /// Refills to the ceiling.
    pub fn maximize(&mut self) {
        self.current = self.max;
    }

    /// Whether the budget has run dry.
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

/// Metabolic cost of one brain update.
///
/// Scales with how much of the network is actually alive: the cleaned
/// connection and neuron counts, times the number of propagation passes.
pub fn propagation_cost(
    params: &Params,
    signal_passes: usize,
    used_connections: usize,
    used_neurons: usize,
) -> f32 {
    params.propagation_energy_rate * signal_passes as f32 * (used_connections + used_neurons) as f32
}

/// Metabolic cost of one eye sensing update.
///
/// A bigger field of view, a longer view distance, and more tracked entities
/// all make the update more expensive.
pub fn sensing_cost(
    params: &Params,
    complexity: usize,
    activators_per_entity: usize,
    view_distance: f32,
    fov_degrees: f32,
) -> f32 {
    let channels = (complexity * activators_per_entity) as f32;
    params.sensing_energy_rate * channels * (1.0 + view_distance * fov_degrees / 360.0)
}

/// Metabolic cost of moving a given distance.
pub fn movement_cost(params: &Params, distance: f32) -> f32 {
    params.move_energy_rate * distance
}

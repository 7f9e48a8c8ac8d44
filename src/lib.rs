//! # Creatura - Neuroevolution Creature Simulation
//!
//! A simulation of creatures whose neural-network brains are synthesized from
//! an evolvable genome and refined across generations by selection alone —
//! no gradient training, only fitness pressure.
//!
//! ## Features
//!
//! - Genome-driven brain topology (layered neuron map built from organ descriptors)
//! - Three connection-synthesis strategies (full forward, partial forward, random)
//! - Graph cleaning: only neurons reachable from the output layer are propagated
//! - Per-tick signal propagation with per-neuron activation functions
//! - Generational loop: elitism, crossover, brain randomization, fresh spawns
//! - Organ catalog with per-variant sensor/effector descriptors
//! - Energy budgets with pure metabolic-cost functions
//! - Genome and brain JSON encode/decode for copy/paste persistence
//!
//! ## Core Modules
//!
//! - [`simulation::genome`] - Heritable creature description
//! - [`simulation::brain`] - Neuron map, network synthesis, and propagation
//! - [`simulation::genetics`] - Crossover and mutation operators
//! - [`simulation::population`] - Generational loop
//! - [`simulation::world`] - Headless world the creatures act in

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neuron map construction, network synthesis, and signal propagation.
    pub mod brain;
    /// Organ catalog: sensor/effector variant descriptors.
    pub mod catalog;
    /// Creature lifecycle: genome to brain to behavior.
    pub mod creature;
    /// Energy budgets and metabolic cost functions.
    pub mod energy;
    /// Typed errors for decode failures.
    pub mod error;
    /// Crossover and mutation operators over genomes.
    pub mod genetics;
    /// Heritable creature description and its JSON form.
    pub mod genome;
    /// Simulation parameters.
    pub mod params;
    /// Generational population management.
    pub mod population;
    /// Signal scaling helpers.
    pub mod utils;
    /// Headless world: food, sensing queries, and the tick loop.
    pub mod world;
}

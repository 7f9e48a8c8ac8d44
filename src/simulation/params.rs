use serde::{Deserialize, Serialize};

/// Simulation parameters that control creatures, brains, and the
/// generational loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Number of creatures in every generation.
    pub population_size: usize,
    /// Percent of the population kept verbatim into the next generation.
    pub keep_percent: usize,
    /// Percent of the population produced by crossover of two elites.
    pub crossover_percent: usize,
    /// Percent of the population produced by brain-weight randomization of an elite.
    pub brain_randomize_percent: usize,
    /// Percent of the population spawned with entirely fresh genomes.
    pub fresh_percent: usize,
    /// Wall-clock budget of a single generation, in simulated seconds.
    pub seconds_per_generation: f32,
    /// Hard stop: the loop ends after this many generations.
    pub max_generations: usize,
    /// Smallest body size a genome may carry.
    pub min_creature_size: f32,
    /// Largest body size a genome may carry.
    pub max_creature_size: f32,
    /// Lower bound for a fresh genome's hidden-layer count.
    pub min_brain_hidden_layers: usize,
    /// Upper bound for a fresh genome's hidden-layer count.
    pub max_brain_hidden_layers: usize,
    /// Minimum outgoing connections per neuron for the random synthesis method.
    pub min_connections: usize,
    /// Maximum outgoing connections per neuron for the random synthesis method.
    pub max_connections: usize,
    /// Full propagation passes performed per brain update.
    pub signal_passes: usize,
    /// Seconds between brain updates while a creature is alive.
    pub brain_update_interval: f32,
    /// Per-gene mutation probability during crossover.
    pub mutation_rate: f32,
    /// Weight jitter bound for the brain-randomization operator.
    pub brain_randomize_delta: f32,
    /// Side length of the square world.
    pub world_extent: f32,
    /// Food items the world keeps alive.
    pub food_count: usize,
    /// Energy granted by one food item.
    pub food_energy: f32,
    /// Forward speed multiplier applied to the movement output.
    pub move_multiplier: f32,
    /// Heading change multiplier applied to the rotation output.
    pub rot_multiplier: f32,
    /// Base energy a creature starts with before organ bonuses.
    pub base_max_energy: f32,
    /// Energy charged per live connection per propagation pass.
    pub propagation_energy_rate: f32,
    /// Energy charged per sensing update, scaled by eye complexity.
    pub sensing_energy_rate: f32,
    /// Energy charged per unit of distance travelled.
    pub move_energy_rate: f32,
    /// Fitness weight of total distance travelled.
    pub fitness_distance_weight: f32,
    /// Fitness weight of total energy harvested.
    pub fitness_energy_weight: f32,
    /// Fitness weight of survival time in seconds.
    pub fitness_survival_weight: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            population_size: 100,
            keep_percent: 10,
            crossover_percent: 30,
            brain_randomize_percent: 30,
            fresh_percent: 30,
            seconds_per_generation: 20.0,
            max_generations: 10,
            min_creature_size: 0.5,
            max_creature_size: 2.0,
            min_brain_hidden_layers: 0,
            max_brain_hidden_layers: 5,
            min_connections: 1,
            max_connections: 4,
            signal_passes: 1,
            brain_update_interval: 0.5,
            mutation_rate: 0.05,
            brain_randomize_delta: 0.1,
            world_extent: 100.0,
            food_count: 200,
            food_energy: 25.0,
            move_multiplier: 20.0,
            rot_multiplier: 0.05,
            base_max_energy: 100.0,
            propagation_energy_rate: 0.001,
            sensing_energy_rate: 0.002,
            move_energy_rate: 0.01,
            fitness_distance_weight: 1.0,
            fitness_energy_weight: 2.0,
            fitness_survival_weight: 0.5,
        }
    }
}

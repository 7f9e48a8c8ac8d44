//! Generational population management.
//!
//! Runs the loop: creatures act for a fixed wall-clock budget, fitness is
//! frozen, and the next generation is assembled from elites, crossover
//! offspring, brain-randomized offspring, and fresh spawns.

use log::{info, warn};
use ndarray::Array1;
use rand::Rng;

use super::catalog::OrganCatalog;
use super::creature::Creature;
use super::genetics;
use super::genome::Genome;
use super::params::Params;
use super::world::World;

/// Where the generational loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A generation is running; creatures are acting.
    Running,
    /// The configured generation count has been reached.
    Done,
}

/// Aggregate fitness of a finished generation.
#[derive(Debug, Clone, Copy)]
pub struct FitnessStats {
    /// Highest fitness in the generation.
    pub best: f32,
    /// Mean fitness across the generation.
    pub average: f32,
    /// Lowest fitness in the generation.
    pub worst: f32,
}

/// Orchestrates generations over a fixed-size population.
pub struct PopulationManager {
    params: Params,
    catalog: OrganCatalog,
    /// The current generation's creatures, replaced wholesale at generation end.
    pub creatures: Vec<Creature>,
    /// The world the creatures act in.
    pub world: World,
    generation: usize,
    generation_time: f32,
    phase: Phase,
    keep_count: usize,
    crossover_count: usize,
    brain_randomize_count: usize,
    next_creature_id: usize,
}

impl PopulationManager {
    /// Creates a manager with a fresh random population.
    pub fn new(params: Params, catalog: OrganCatalog) -> Self {
        let mut manager = Self::empty(params, catalog);
        let mut rng = rand::rng();
        for _ in 0..manager.params.population_size {
            let genome = Genome::random(&manager.params, &manager.catalog, &mut rng);
            let creature = manager.build_creature(genome, &mut rng);
            manager.creatures.push(creature);
        }
        info!("Start simulation cycle {}", manager.generation);
        manager
    }

    /// Creates a manager from persisted genome encodings.
    ///
    /// A corrupt entry must not take the whole generation down: it is logged,
    /// skipped, and its slot backfilled with a fresh random creature. Missing
    /// slots (fewer encodings than the population size) are backfilled too.
    pub fn from_encoded_genomes(params: Params, catalog: OrganCatalog, encoded: &[String]) -> Self {
        let mut manager = Self::empty(params, catalog);
        let mut rng = rand::rng();
        for text in encoded.iter().take(manager.params.population_size) {
            let genome = match Genome::decode(text) {
                Ok(mut genome) => {
                    genome.validate(&manager.params, &manager.catalog);
                    genome
                }
                Err(err) => {
                    warn!("skipping corrupt genome, backfilling with a fresh one: {err}");
                    Genome::random(&manager.params, &manager.catalog, &mut rng)
                }
            };
            let creature = manager.build_creature(genome, &mut rng);
            manager.creatures.push(creature);
        }
        while manager.creatures.len() < manager.params.population_size {
            let genome = Genome::random(&manager.params, &manager.catalog, &mut rng);
            let creature = manager.build_creature(genome, &mut rng);
            manager.creatures.push(creature);
        }
        info!("Start simulation cycle {}", manager.generation);
        manager
    }

    fn empty(params: Params, catalog: OrganCatalog) -> Self {
        let keep_count = params.keep_percent * params.population_size / 100;
        let crossover_count = params.crossover_percent * params.population_size / 100;
        let brain_randomize_count = params.brain_randomize_percent * params.population_size / 100;
        let world = World::new(&params);
        Self {
            params,
            catalog,
            creatures: Vec::new(),
            world,
            generation: 0,
            generation_time: 0.0,
            phase: Phase::Running,
            keep_count,
            crossover_count,
            brain_randomize_count,
            next_creature_id: 0,
        }
    }

    fn build_creature(&mut self, genome: Genome, rng: &mut impl Rng) -> Creature {
        let id = self.next_creature_id;
        self.next_creature_id += 1;
        let spawn = random_spawn(&self.params, rng);
        Creature::from_genome(id, genome, spawn, &self.params, &self.catalog, rng)
    }

    /// Advances the simulation by one tick.
    ///
    /// The generation's wall-clock budget is checked between ticks only;
    /// depleted creatures are disabled by their own tick and stay in the
    /// population until the generation ends.
    pub fn step(&mut self, dt: f32) {
        if self.phase == Phase::Done {
            return;
        }
        self.world.step(&mut self.creatures, &self.params, dt);
        self.generation_time += dt;
        if self.generation_time > self.params.seconds_per_generation {
            self.finish_cycle();
        }
    }

    /// Runs the whole configured generation count at a fixed timestep.
    pub fn run_to_completion(&mut self, dt: f32) {
        while self.phase != Phase::Done {
            self.step(dt);
        }
    }

    /// Ends the running generation: freezes fitness for every creature,
    /// alive or disabled, then either assembles the next generation or
    /// stops.
    fn finish_cycle(&mut self) {
        for creature in &mut self.creatures {
            creature.calculate_fitness(&self.params);
        }

        let stats = self.fitness_stats();
        info!(
            "Generation {} finished. Best: {:.2}, average: {:.2}, worst: {:.2}",
            self.generation, stats.best, stats.average, stats.worst
        );

        self.generation += 1;
        if self.generation < self.params.max_generations {
            self.prepare_next_generation();
            self.generation_time = 0.0;
            info!("Start simulation cycle {}", self.generation);
        } else {
            self.phase = Phase::Done;
            info!("Simulation finished");
        }
    }

    /// Builds the next generation from the fitness-ranked current one.
    ///
    /// Split: elites kept verbatim, crossover offspring of two random elites
    /// (inheriting the fitter parent's already-built brain), brain-randomized
    /// elite copies, and fresh randoms filling the remainder so the
    /// population size never drifts.
    fn prepare_next_generation(&mut self) {
        let mut rng = rand::rng();
        self.creatures
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let keep = self.keep_count.max(1).min(self.creatures.len());
        let mut offspring: Vec<Creature> = Vec::with_capacity(self.params.population_size);

        for _ in 0..self.crossover_count {
            let a = rng.random_range(0..keep);
            let b = rng.random_range(0..keep);
            let genome = genetics::crossover(
                &self.creatures[a].genome,
                &self.creatures[b].genome,
                &self.params,
                &self.catalog,
                &mut rng,
            );
            let fitter = if self.creatures[a].fitness > self.creatures[b].fitness {
                a
            } else {
                b
            };
            // The body plan recombines genetically, but the brain transfers
            // by copy from the fitter parent.
            let brain = self.creatures[fitter].brain.clone();
            let id = self.next_creature_id;
            self.next_creature_id += 1;
            let spawn = random_spawn(&self.params, &mut rng);
            let mut child =
                Creature::from_genome(id, genome, spawn, &self.params, &self.catalog, &mut rng);
            child.set_brain(brain);
            offspring.push(child);
        }

        for _ in 0..self.brain_randomize_count {
            let parent = rng.random_range(0..keep);
            let genome = self.creatures[parent].genome.clone();
            let mut brain = self.creatures[parent].brain.clone();
            brain
                .network_mut()
                .perturb_weights(self.params.brain_randomize_delta, &mut rng);
            let id = self.next_creature_id;
            self.next_creature_id += 1;
            let spawn = random_spawn(&self.params, &mut rng);
            let mut child =
                Creature::from_genome(id, genome, spawn, &self.params, &self.catalog, &mut rng);
            child.set_brain(brain);
            offspring.push(child);
        }

        // Fresh randoms absorb any rounding slack in the percentage splits.
        while keep + offspring.len() < self.params.population_size {
            let genome = Genome::random(&self.params, &self.catalog, &mut rng);
            let id = self.next_creature_id;
            self.next_creature_id += 1;
            let spawn = random_spawn(&self.params, &mut rng);
            offspring.push(Creature::from_genome(
                id,
                genome,
                spawn,
                &self.params,
                &self.catalog,
                &mut rng,
            ));
        }

        // Elites stay; the rest of the old generation is released.
        self.creatures.truncate(keep);
        for elite in &mut self.creatures {
            elite.enable_at(random_spawn(&self.params, &mut rng));
        }
        self.creatures.append(&mut offspring);
    }

    /// Aggregate fitness of the current population.
    pub fn fitness_stats(&self) -> FitnessStats {
        let mut best = f32::MIN;
        let mut worst = f32::MAX;
        let mut sum = 0.0;
        for creature in &self.creatures {
            best = best.max(creature.fitness);
            worst = worst.min(creature.fitness);
            sum += creature.fitness;
        }
        if self.creatures.is_empty() {
            return FitnessStats {
                best: 0.0,
                average: 0.0,
                worst: 0.0,
            };
        }
        FitnessStats {
            best,
            average: sum / self.creatures.len() as f32,
            worst,
        }
    }

    /// The generation currently running (0-based).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Whether the configured generation count has been reached.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The parameters the manager was built with.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

fn random_spawn(params: &Params, rng: &mut impl Rng) -> Array1<f32> {
    Array1::from_vec(vec![
        rng.random_range(0.0..params.world_extent),
        rng.random_range(0.0..params.world_extent),
    ])
}

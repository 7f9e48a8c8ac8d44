//! Creature lifecycle: building an agent from its genome and running it.
//!
//! A creature owns one genome, one brain, its organ instances, and an energy
//! budget. Movement and collision stay outside: the creature exposes plain
//! position/heading data and the world integrates it.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::{Brain, BrainZone, ZoneKind};
use super::catalog::{EyeDescriptor, MouthDescriptor, OrganCatalog};
use super::energy::{self, EnergyBudget};
use super::genome::Genome;
use super::params::Params;
use super::utils::scale_value;

/// What kind of entity a sensed contact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Another creature.
    Creature,
    /// A food item.
    Food,
}

/// Number of [`EntityKind`] variants, for scaling the type channel.
const ENTITY_KIND_COUNT: usize = 2;

/// One entity visible to a creature this tick, already expressed relative to
/// the creature: signed bearing from its heading and straight-line distance.
#[derive(Debug, Clone)]
pub struct SensedEntity {
    /// What was seen.
    pub kind: EntityKind,
    /// Signed bearing in degrees; negative is left of the heading.
    pub bearing_degrees: f32,
    /// Distance from the creature.
    pub distance: f32,
    /// Apparent size of the entity.
    pub size: f32,
}

/// An eye instance wired into the brain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Eye {
    /// The catalog variant this eye was built from.
    pub descriptor: EyeDescriptor,
    /// Mounting direction gene, kept for telemetry and inheritance.
    pub angle: Array1<f32>,
    /// Input neuron ids this eye writes, channel-major per tracked entity.
    pub input_ids: Vec<usize>,
}

/// A mouth instance wired into the brain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mouth {
    /// The catalog variant this mouth was built from.
    pub descriptor: MouthDescriptor,
    /// Mounting direction gene.
    pub angle: Array1<f32>,
    /// Input neuron id carrying the food-in-reach signal.
    pub input_id: usize,
    /// Output neuron ids read as consumption gates.
    pub output_ids: Vec<usize>,
}

/// The fitness-relevant accumulators of one creature, frozen at generation
/// end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitnessInputs {
    /// Total distance travelled this generation.
    pub distance_travelled: f32,
    /// Total energy harvested this generation.
    pub energy_harvested: f32,
    /// Seconds survived this generation.
    pub survival_time: f32,
}

/// A simulated creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    /// Unique id within the current population.
    pub id: usize,
    /// The genome this creature was built from. Immutable afterwards.
    pub genome: Genome,
    /// The synthesized brain.
    pub brain: Brain,
    /// Eye instances in genome order.
    pub eyes: Vec<Eye>,
    /// Mouth instances in genome order.
    pub mouths: Vec<Mouth>,
    /// Energy budget; the creature is disabled when it runs dry.
    pub energy: EnergyBudget,
    /// Position in the world plane.
    pub pos: Array1<f32>,
    /// Heading in radians.
    pub heading: f32,
    /// Resolved body size (catalog base size times the size gene).
    pub size: f32,
    /// Whether the creature still acts this generation.
    pub alive: bool,
    /// Distance travelled this generation.
    pub distance_travelled: f32,
    /// Energy harvested this generation.
    pub energy_harvested: f32,
    /// Seconds survived this generation.
    pub survival_time: f32,
    /// Fitness frozen at the last generation end.
    pub fitness: f32,
    since_brain_update: f32,
}

impl Creature {
    /// Builds a creature from a genome: organ wiring, neuron map, network
    /// synthesis, and the energy ceiling the organs grant.
    pub fn from_genome(
        id: usize,
        genome: Genome,
        pos: Array1<f32>,
        params: &Params,
        catalog: &OrganCatalog,
        rng: &mut impl Rng,
    ) -> Self {
        let mut input_zones = Vec::new();
        let mut output_zones = Vec::new();
        let mut next_input = 0;

        let mut eyes = Vec::with_capacity(genome.eyes.len());
        for (slot, gene) in genome.eyes.iter().enumerate() {
            let descriptor = catalog.eye(gene.id).clone();
            let count = descriptor.neuron_count();
            eyes.push(Eye {
                descriptor,
                angle: gene.angle.clone(),
                input_ids: (next_input..next_input + count).collect(),
            });
            input_zones.push(BrainZone::linked(ZoneKind::Visual, count, slot));
            next_input += count;
        }

        output_zones.push(BrainZone::new(ZoneKind::Movement, 2));

        let mut mouths = Vec::with_capacity(genome.mouths.len());
        for (slot, gene) in genome.mouths.iter().enumerate() {
            let descriptor = catalog.mouth(gene.id).clone();
            mouths.push(Mouth {
                descriptor: descriptor.clone(),
                angle: gene.angle.clone(),
                input_id: next_input,
                output_ids: Vec::new(),
            });
            input_zones.push(BrainZone::linked(ZoneKind::Consumption, 1, slot));
            next_input += 1;
            output_zones.push(BrainZone::linked(
                ZoneKind::Consumption,
                descriptor.output_neurons,
                slot,
            ));
        }

        let brain = Brain::initialize(
            &input_zones,
            &output_zones,
            genome.brain.hidden_layers,
            genome.brain.connection_method,
            params,
            rng,
        );

        // Output ids: the movement pair first, then each mouth's gates in
        // genome order, mirroring the zone layout above.
        let mut offset = 2;
        for mouth in &mut mouths {
            mouth.output_ids = (0..mouth.descriptor.output_neurons)
                .map(|k| brain.output_id(offset + k))
                .collect();
            offset += mouth.descriptor.output_neurons;
        }

        let mut energy = EnergyBudget::new(params.base_max_energy);
        for eye in &eyes {
            energy.adjust_max(eye.descriptor.neuron_count() as f32 * eye.descriptor.base_energy);
        }
        for mouth in &mouths {
            let neurons = 1 + mouth.descriptor.output_neurons;
            energy.adjust_max(neurons as f32 * mouth.descriptor.base_energy);
        }
        energy.maximize();

        let size = catalog.body(genome.body.id).base_size * genome.body.size;

        Self {
            id,
            genome,
            brain,
            eyes,
            mouths,
            energy,
            pos,
            heading: rng.random_range(0.0..std::f32::consts::TAU),
            size,
            alive: true,
            distance_travelled: 0.0,
            energy_harvested: 0.0,
            survival_time: 0.0,
            fitness: 0.0,
            since_brain_update: 0.0,
        }
    }

    /// Advances the creature by one tick: sense and think at the brain
    /// update interval, act every tick, charge metabolic cost throughout.
    ///
    /// `view` holds every entity within sensing range this tick;
    /// `food_in_reach` is the per-mouth contact flag the world computed.
    pub fn tick(&mut self, view: &[SensedEntity], food_in_reach: &[bool], params: &Params, dt: f32) {
        if !self.alive {
            return;
        }
        self.survival_time += dt;
        self.since_brain_update += dt;
        if self.since_brain_update >= params.brain_update_interval {
            self.since_brain_update = 0.0;
            self.sense(view, food_in_reach, params);
            self.think(params);
        }
        self.act(params, dt);
        if self.energy.is_depleted() {
            self.alive = false;
        }
    }

    /// Writes every sensor's channels into the brain's input neurons.
    fn sense(&mut self, view: &[SensedEntity], food_in_reach: &[bool], params: &Params) {
        let mut writes: Vec<(usize, f32)> = Vec::new();
        let mut cost = 0.0;

        for eye in &self.eyes {
            let d = &eye.descriptor;
            // Biggest entities first, up to the eye's tracking capacity.
            let mut visible: Vec<&SensedEntity> = view
                .iter()
                .filter(|e| {
                    e.distance <= d.view_distance && e.bearing_degrees.abs() <= d.fov_degrees / 2.0
                })
                .collect();
            visible.sort_by(|a, b| b.size.total_cmp(&a.size));
            visible.truncate(d.complexity);

            let channels = d.activators_per_entity.min(4);
            for (slot, entity) in visible.iter().enumerate() {
                let base = slot * d.activators_per_entity;
                if channels > 0 {
                    writes.push((
                        eye.input_ids[base],
                        scale_value(entity.kind as u32 as f32, 0.0, ENTITY_KIND_COUNT as f32),
                    ));
                }
                if channels > 1 {
                    writes.push((
                        eye.input_ids[base + 1],
                        scale_value(
                            entity.bearing_degrees,
                            -d.fov_degrees / 2.0,
                            d.fov_degrees / 2.0,
                        ),
                    ));
                }
                if channels > 2 {
                    writes.push((eye.input_ids[base + 2], scale_value(entity.size, 0.0, 100.0)));
                }
                if channels > 3 {
                    writes.push((
                        eye.input_ids[base + 3],
                        scale_value(entity.distance, 0.0, d.view_distance),
                    ));
                }
            }
            cost += energy::sensing_cost(
                params,
                d.complexity,
                d.activators_per_entity,
                d.view_distance,
                d.fov_degrees,
            );
        }

        for (mouth, &in_reach) in self.mouths.iter().zip(food_in_reach) {
            writes.push((mouth.input_id, if in_reach { 1.0 } else { 0.0 }));
        }

        for (id, value) in writes {
            self.brain.set_neuron_value(id, value);
        }
        self.energy.spend(cost);
    }

    /// Advances the brain and charges the propagation cost.
    fn think(&mut self, params: &Params) {
        self.brain.update();
        let network = self.brain.network();
        self.energy.spend(energy::propagation_cost(
            params,
            network.signal_passes,
            network.connection_count(),
            network.used_neuron_count(),
        ));
    }

    /// Reads the movement outputs and integrates position and heading.
    fn act(&mut self, params: &Params, dt: f32) {
        let velocity = self.brain.neuron_value(self.brain.output_id(0));
        let rotation = self.brain.neuron_value(self.brain.output_id(1));

        self.heading += rotation * params.rot_multiplier;
        let step = velocity * params.move_multiplier * dt;
        self.pos[0] = (self.pos[0] + self.heading.cos() * step).clamp(0.0, params.world_extent);
        self.pos[1] = (self.pos[1] + self.heading.sin() * step).clamp(0.0, params.world_extent);

        self.distance_travelled += step.abs();
        self.energy.spend(energy::movement_cost(params, step.abs()));
    }

    /// Whether the given mouth's consumption gate fired on the last update.
    ///
    /// The gate neurons are BinaryStep, so "open" is an output above zero.
    pub fn mouth_gate_open(&self, slot: usize) -> bool {
        self.mouths[slot]
            .output_ids
            .iter()
            .any(|&id| self.brain.neuron_value(id) > 0.0)
    }

    /// Credits harvested food energy to the budget and the fitness inputs.
    pub fn consume(&mut self, food_energy: f32) {
        self.energy.add(food_energy);
        self.energy_harvested += food_energy;
    }

    /// Replaces the brain wholesale, e.g. with a copy of a parent's brain.
    pub fn set_brain(&mut self, brain: Brain) {
        self.brain = brain;
    }

    /// The raw accumulators fitness is computed from.
    pub fn fitness_inputs(&self) -> FitnessInputs {
        FitnessInputs {
            distance_travelled: self.distance_travelled,
            energy_harvested: self.energy_harvested,
            survival_time: self.survival_time,
        }
    }

    /// Freezes fitness from the current accumulators.
    pub fn calculate_fitness(&mut self, params: &Params) -> f32 {
        self.fitness = self.distance_travelled * params.fitness_distance_weight
            + self.energy_harvested * params.fitness_energy_weight
            + self.survival_time * params.fitness_survival_weight;
        self.fitness
    }

    /// Re-enables the creature for a new generation: fresh energy, a new
    /// spawn position, and cleared accumulators.
    pub fn enable_at(&mut self, pos: Array1<f32>) {
        self.alive = true;
        self.energy.maximize();
        self.pos = pos;
        self.distance_travelled = 0.0;
        self.energy_harvested = 0.0;
        self.survival_time = 0.0;
        self.since_brain_update = 0.0;
    }
}

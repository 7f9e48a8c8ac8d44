#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use creatura::simulation::catalog::OrganCatalog;
use creatura::simulation::creature::Creature;
use creatura::simulation::genome::Genome;
use creatura::simulation::params::Params;
use creatura::simulation::population::PopulationManager;
use creatura::simulation::world::World;
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    Params {
        population_size: 12,
        seconds_per_generation: 0.5,
        max_generations: 3,
        world_extent: 50.0,
        food_count: 30,
        brain_update_interval: 0.1,
        ..Params::default()
    }
}

fn spawn_creature(params: &Params, catalog: &OrganCatalog, rng: &mut StdRng) -> Creature {
    let genome = Genome::random(params, catalog, rng);
    let pos = Array1::from_vec(vec![params.world_extent / 2.0, params.world_extent / 2.0]);
    Creature::from_genome(0, genome, pos, params, catalog, rng)
}

#[test]
fn test_population_size_is_constant_across_generations() {
    let params = create_test_params();
    let mut manager = PopulationManager::new(params.clone(), OrganCatalog::default());

    assert_eq!(manager.creatures.len(), params.population_size);
    while !manager.is_done() {
        manager.step(0.05);
        assert_eq!(manager.creatures.len(), params.population_size);
    }
    assert_eq!(manager.generation(), params.max_generations);
}

#[test]
fn test_creature_construction_wires_organs_into_brain() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(61);

    for _ in 0..10 {
        let creature = spawn_creature(&params, &catalog, &mut rng);

        // Inputs: eye channels first, then one food-in-reach channel per mouth.
        let eye_inputs: usize = creature
            .eyes
            .iter()
            .map(|e| e.descriptor.neuron_count())
            .sum();
        assert_eq!(creature.brain.num_inputs(), eye_inputs + creature.mouths.len());

        // Outputs: the movement pair plus every mouth's gates.
        let gate_outputs: usize = creature
            .mouths
            .iter()
            .map(|m| m.descriptor.output_neurons)
            .sum();
        assert_eq!(creature.brain.num_outputs(), 2 + gate_outputs);

        // The network never comes up empty.
        assert!(creature.brain.network().connection_count() >= 1);
        assert!(creature.energy.current > 0.0);
    }
}

#[test]
fn test_ticking_spends_energy_and_accumulates_survival() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(67);

    let mut creature = spawn_creature(&params, &catalog, &mut rng);
    let initial_energy = creature.energy.current;

    for _ in 0..20 {
        creature.tick(&[], &[false], &params, 0.2);
    }

    assert!(creature.energy.current < initial_energy);
    assert!(creature.survival_time > 0.0);
}

#[test]
fn test_depleted_creature_is_disabled_not_removed() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(71);

    let mut creature = spawn_creature(&params, &catalog, &mut rng);
    creature.energy.spend(creature.energy.current - 1e-4);

    for _ in 0..50 {
        creature.tick(&[], &[false], &params, 0.2);
    }
    assert!(!creature.alive);

    // Disabled creatures stop accumulating but still report fitness inputs.
    let survival_before = creature.survival_time;
    creature.tick(&[], &[false], &params, 0.2);
    assert_eq!(creature.survival_time, survival_before);
}

#[test]
fn test_fitness_combines_weighted_inputs() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(73);

    let mut creature = spawn_creature(&params, &catalog, &mut rng);
    creature.distance_travelled = 10.0;
    creature.energy_harvested = 4.0;
    creature.survival_time = 6.0;

    let inputs = creature.fitness_inputs();
    assert_eq!(inputs.distance_travelled, 10.0);
    assert_eq!(inputs.energy_harvested, 4.0);
    assert_eq!(inputs.survival_time, 6.0);

    let fitness = creature.calculate_fitness(&params);
    let expected = 10.0 * params.fitness_distance_weight
        + 4.0 * params.fitness_energy_weight
        + 6.0 * params.fitness_survival_weight;
    assert!((fitness - expected).abs() < 1e-5);
    assert_eq!(creature.fitness, fitness);
}

#[test]
fn test_world_step_keeps_food_topped_up() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(79);

    let mut world = World::new(&params);
    let mut creatures: Vec<Creature> = (0..4)
        .map(|_| spawn_creature(&params, &catalog, &mut rng))
        .collect();

    for _ in 0..10 {
        world.step(&mut creatures, &params, 0.05);
        assert_eq!(world.food.len(), params.food_count);
    }
}

#[test]
fn test_enable_at_resets_budget_and_accumulators() {
    let params = create_test_params();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(83);

    let mut creature = spawn_creature(&params, &catalog, &mut rng);
    for _ in 0..10 {
        creature.tick(&[], &[false], &params, 0.2);
    }
    creature.alive = false;

    let spawn = Array1::from_vec(vec![1.0, 2.0]);
    creature.enable_at(spawn.clone());

    assert!(creature.alive);
    assert_eq!(creature.energy.current, creature.energy.max);
    assert_eq!(creature.distance_travelled, 0.0);
    assert_eq!(creature.survival_time, 0.0);
    assert_eq!(creature.pos, spawn);
}

#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use creatura::simulation::catalog::{OrganCatalog, OrganKind};
use creatura::simulation::genetics::crossover;
use creatura::simulation::genome::Genome;
use creatura::simulation::params::Params;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn assert_genome_within_domain(genome: &Genome, params: &Params, catalog: &OrganCatalog) {
    assert!(genome.body.size >= params.min_creature_size);
    assert!(genome.body.size <= params.max_creature_size);
    assert!(genome.brain.hidden_layers <= params.max_brain_hidden_layers);

    let (eye_min, eye_max) = catalog.id_bounds(OrganKind::Eye);
    for gene in &genome.eyes {
        assert!(gene.id >= eye_min && gene.id <= eye_max);
        for &component in gene.angle.iter() {
            assert!((-1.0..=1.0).contains(&component));
        }
    }
    let (mouth_min, mouth_max) = catalog.id_bounds(OrganKind::Mouth);
    for gene in &genome.mouths {
        assert!(gene.id >= mouth_min && gene.id <= mouth_max);
        for &component in gene.angle.iter() {
            assert!((-1.0..=1.0).contains(&component));
        }
    }
}

#[test]
fn test_repeated_crossover_stays_within_legal_domain() {
    let params = Params::default();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(17);

    let mut parent_a = Genome::random(&params, &catalog, &mut rng);
    let mut parent_b = Genome::random(&params, &catalog, &mut rng);

    for _ in 0..1000 {
        let offspring = crossover(&parent_a, &parent_b, &params, &catalog, &mut rng);
        assert_genome_within_domain(&offspring, &params, &catalog);
        parent_b = parent_a;
        parent_a = offspring;
    }
}

#[test]
fn test_crossover_of_identical_parents_without_mutation_is_identity() {
    let params = Params {
        mutation_rate: 0.0,
        ..Params::default()
    };
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(23);

    let parent = Genome::random(&params, &catalog, &mut rng);
    let offspring = crossover(&parent, &parent, &params, &catalog, &mut rng);

    assert_eq!(parent.encode(), offspring.encode());
}

#[test]
fn test_crossover_aligns_lists_and_appends_longer_parent_remainder() {
    let params = Params::default();
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(31);

    let mut parent_a = Genome::random(&params, &catalog, &mut rng);
    let parent_b = Genome::random(&params, &catalog, &mut rng);
    // Give parent A a second eye the other parent lacks.
    let extra = parent_a.eyes[0].clone();
    parent_a.eyes.push(extra);

    for _ in 0..20 {
        let offspring = crossover(&parent_a, &parent_b, &params, &catalog, &mut rng);
        assert_eq!(offspring.eyes.len(), 2);
        assert_eq!(offspring.mouths.len(), 1);
    }
}

#[test]
fn test_crossover_body_size_is_parent_average_without_mutation() {
    let params = Params {
        mutation_rate: 0.0,
        ..Params::default()
    };
    let catalog = OrganCatalog::default();
    let mut rng = StdRng::seed_from_u64(37);

    let mut parent_a = Genome::random(&params, &catalog, &mut rng);
    let mut parent_b = Genome::random(&params, &catalog, &mut rng);
    parent_a.body.size = 0.6;
    parent_b.body.size = 1.8;

    let offspring = crossover(&parent_a, &parent_b, &params, &catalog, &mut rng);
    assert!((offspring.body.size - 1.2).abs() < 1e-6);
}

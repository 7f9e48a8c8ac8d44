//! Crossover and mutation operators over genomes.
//!
//! Crossover recombines two parent genomes gene by gene; every chosen gene is
//! then independently subject to mutation, and the offspring is clamped back
//! into its legal domain before it leaves this module. Weight-level brain
//! randomization lives on [`Network::perturb_weights`] instead - it operates
//! on a built network, not on a genome.
//!
//! [`Network::perturb_weights`]: super::brain::Network::perturb_weights

use rand::Rng;

use super::catalog::OrganCatalog;
use super::genome::{BodyGene, BrainGene, Genome, OrganGene};
use super::params::Params;

/// Multiplicative jitter factor for continuous gene mutation.
const MUTATION_JITTER: f32 = 0.05;

/// Produces an offspring genome from two parents.
///
/// Body size is averaged across the parents; every other scalar or enum gene
/// is picked from either parent with even odds. Organ-gene lists are aligned
/// by position up to the shorter list, then the longer parent's remainder is
/// appended. The offspring is validated (clamped) before being returned, so
/// a mutated organ id always references a real catalog variant.
pub fn crossover(
    parent_a: &Genome,
    parent_b: &Genome,
    params: &Params,
    catalog: &OrganCatalog,
    rng: &mut impl Rng,
) -> Genome {
    let mut offspring = Genome {
        body: cross_body(&parent_a.body, &parent_b.body, params, rng),
        brain: cross_brain(&parent_a.brain, &parent_b.brain, params, rng),
        eyes: cross_organ_list(&parent_a.eyes, &parent_b.eyes, params, rng),
        mouths: cross_organ_list(&parent_a.mouths, &parent_b.mouths, params, rng),
    };
    offspring.validate(params, catalog);
    offspring
}

fn cross_body(a: &BodyGene, b: &BodyGene, params: &Params, rng: &mut impl Rng) -> BodyGene {
    let mut size = (a.size + b.size) / 2.0;
    if should_mutate(params, rng) {
        size += jitter(size, rng);
    }
    let mut id = if rng.random_range(0..2) == 0 { a.id } else { b.id };
    if should_mutate(params, rng) {
        id = nudge_u32(id, rng);
    }
    BodyGene { id, size }
}

fn cross_brain(a: &BrainGene, b: &BrainGene, params: &Params, rng: &mut impl Rng) -> BrainGene {
    let mut hidden_layers = if rng.random_range(0..2) == 0 {
        a.hidden_layers
    } else {
        b.hidden_layers
    };
    if should_mutate(params, rng) {
        hidden_layers = nudge_usize(hidden_layers, rng);
    }
    // The connection method recombines but does not drift on its own.
    let connection_method = if rng.random_range(0..2) == 0 {
        a.connection_method
    } else {
        b.connection_method
    };
    BrainGene {
        hidden_layers,
        connection_method,
    }
}

fn cross_organ_list(
    list_a: &[OrganGene],
    list_b: &[OrganGene],
    params: &Params,
    rng: &mut impl Rng,
) -> Vec<OrganGene> {
    let max_len = list_a.len().max(list_b.len());
    let mut result = Vec::with_capacity(max_len);
    for i in 0..max_len {
        let chosen = match (list_a.get(i), list_b.get(i)) {
            (Some(a), Some(b)) => {
                if rng.random_range(0..2) == 0 {
                    a.clone()
                } else {
                    b.clone()
                }
            }
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.clone(),
            (None, None) => unreachable!("index below max of both lengths"),
        };
        result.push(mutate_organ_gene(chosen, params, rng));
    }
    result
}

fn mutate_organ_gene(mut gene: OrganGene, params: &Params, rng: &mut impl Rng) -> OrganGene {
    if should_mutate(params, rng) {
        gene.id = nudge_u32(gene.id, rng);
        // Each angle component draws its own independent jitter.
        gene.angle.mapv_inplace(|a| a + jitter(a, rng));
    }
    gene
}

fn should_mutate(params: &Params, rng: &mut impl Rng) -> bool {
    rng.random::<f32>() < params.mutation_rate
}

/// Small multiplicative change: `value * U(-1, 1) * 0.05`.
fn jitter(value: f32, rng: &mut impl Rng) -> f32 {
    value * rng.random_range(-1.0..1.0) * MUTATION_JITTER
}

fn nudge_u32(value: u32, rng: &mut impl Rng) -> u32 {
    if rng.random_range(0..2) == 0 {
        value.saturating_add(1)
    } else {
        value.saturating_sub(1)
    }
}

fn nudge_usize(value: usize, rng: &mut impl Rng) -> usize {
    if rng.random_range(0..2) == 0 {
        value.saturating_add(1)
    } else {
        value.saturating_sub(1)
    }
}

//! Heritable creature description.
//!
//! A genome fully determines a creature's body plan and brain shape. It is
//! created randomly at population start or by the genetic operators, consumed
//! once at creature construction, and never mutated afterwards.

use ndarray::Array1;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::brain::network::ConnectionMethod;
use super::catalog::{OrganCatalog, OrganKind};
use super::error::DecodeError;
use super::params::Params;

/// Body shell gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyGene {
    /// Body variant id in the catalog.
    pub id: u32,
    /// Body size, clamped into the configured creature-size range.
    pub size: f32,
}

/// Brain shape gene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainGene {
    /// Hidden layers between the input and output layers.
    pub hidden_layers: usize,
    /// How connections are generated when the network is synthesized.
    pub connection_method: ConnectionMethod,
}

/// Per-instance gene of a placed organ (eye or mouth).
///
/// The angle is a 3-vector with components in `[-1, 1]` describing where on
/// the body the organ is mounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganGene {
    /// Variant id in the catalog table for this organ's kind.
    pub id: u32,
    /// Mounting direction on the body.
    pub angle: Array1<f32>,
}

/// The complete heritable description of a creature.
///
/// The organ-list composition (one entry per organ instance, counts fixed by
/// the body plan) does not vary; only per-instance parameters do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome {
    /// Body shell gene.
    pub body: BodyGene,
    /// Brain shape gene.
    pub brain: BrainGene,
    /// One gene per eye instance.
    pub eyes: Vec<OrganGene>,
    /// One gene per mouth instance.
    pub mouths: Vec<OrganGene>,
}

impl Genome {
    /// Creates a random genome with the standard body plan: one eye, one
    /// mouth, randomized placement and brain shape.
    pub fn random(params: &Params, catalog: &OrganCatalog, rng: &mut impl Rng) -> Self {
        let (eye_min, eye_max) = catalog.id_bounds(OrganKind::Eye);
        let (mouth_min, mouth_max) = catalog.id_bounds(OrganKind::Mouth);

        Self {
            body: BodyGene {
                id: 1,
                size: rng.random_range(params.min_creature_size..=params.max_creature_size),
            },
            brain: BrainGene {
                hidden_layers: rng
                    .random_range(params.min_brain_hidden_layers..=params.max_brain_hidden_layers),
                connection_method: ConnectionMethod::random(rng),
            },
            eyes: vec![OrganGene {
                id: rng.random_range(eye_min..=eye_max),
                angle: Array1::random(3, Uniform::new(-1.0, 1.0)),
            }],
            mouths: vec![OrganGene {
                id: rng.random_range(mouth_min..=mouth_max),
                angle: Array1::random(3, Uniform::new(-1.0, 1.0)),
            }],
        }
    }

    /// Clamps every gene into its legal domain.
    ///
    /// Out-of-range values are not errors: an unclamped organ id could
    /// reference a variant that does not exist, so this pass runs after every
    /// crossover or decode and always yields a viable genome.
    pub fn validate(&mut self, params: &Params, catalog: &OrganCatalog) {
        self.body.id = catalog.clamp_id(OrganKind::Body, self.body.id);
        self.body.size = self
            .body
            .size
            .clamp(params.min_creature_size, params.max_creature_size);
        self.brain.hidden_layers = self.brain.hidden_layers.min(params.max_brain_hidden_layers);

        for gene in &mut self.eyes {
            gene.id = catalog.clamp_id(OrganKind::Eye, gene.id);
            gene.angle.mapv_inplace(|a| a.clamp(-1.0, 1.0));
        }
        for gene in &mut self.mouths {
            gene.id = catalog.clamp_id(OrganKind::Mouth, gene.id);
            gene.angle.mapv_inplace(|a| a.clamp(-1.0, 1.0));
        }
    }

    /// Encodes the genome as pretty-printed JSON with stable field names,
    /// suitable for copy/paste persistence and human diffing.
    pub fn encode(&self) -> String {
        // Serialization of this struct cannot fail; the derive has no
        // fallible fields.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Decodes a genome from its JSON form.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError::Genome)
    }
}

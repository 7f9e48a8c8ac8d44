//! Organ catalog: the read-only tables of available organ variants.
//!
//! The catalog is loaded once and shared by reference across all creatures;
//! nothing in it mutates after construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Organ families a genome can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganKind {
    /// The body shell. Carries no neurons.
    Body,
    /// Vision sensor. Contributes input neurons.
    Eye,
    /// Consumption effector. Contributes one input and some output neurons.
    Mouth,
}

/// What a mouth variant is able to digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietType {
    /// Eats other creatures.
    Carnivore,
    /// Eats plant food.
    Herbivore,
    /// Eats both.
    Omnivore,
}

/// A body variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDescriptor {
    /// Variant id within the body table.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Base size multiplier applied to the genome's size gene.
    pub base_size: f32,
}

/// An eye variant.
///
/// An eye tracks up to `complexity` visible entities per sensing update and
/// emits `activators_per_entity` channels for each, so it owns
/// `complexity * activators_per_entity` input neurons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyeDescriptor {
    /// Variant id within the eye table.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Maximum distance at which entities are visible.
    pub view_distance: f32,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Entities processed per sensing update.
    pub complexity: usize,
    /// Channels emitted per tracked entity.
    pub activators_per_entity: usize,
    /// Max-energy bonus granted per owned neuron.
    pub base_energy: f32,
}

impl EyeDescriptor {
    /// Input neurons this eye contributes to the brain.
    pub fn neuron_count(&self) -> usize {
        self.complexity * self.activators_per_entity
    }
}

/// A mouth variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouthDescriptor {
    /// Variant id within the mouth table.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// What this mouth digests.
    pub diet: DietType,
    /// Distance at which food can be consumed.
    pub reach: f32,
    /// Output neurons (consumption gates) this mouth reads.
    pub output_neurons: usize,
    /// Max-energy bonus granted per owned neuron.
    pub base_energy: f32,
}

/// Lookup tables of every organ variant available to the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganCatalog {
    bodies: BTreeMap<u32, BodyDescriptor>,
    eyes: BTreeMap<u32, EyeDescriptor>,
    mouths: BTreeMap<u32, MouthDescriptor>,
}

impl OrganCatalog {
    /// Creates an empty catalog. Mostly useful for tests that register
    /// hand-built variants.
    pub fn empty() -> Self {
        Self {
            bodies: BTreeMap::new(),
            eyes: BTreeMap::new(),
            mouths: BTreeMap::new(),
        }
    }

    /// Registers a body variant.
    pub fn add_body(&mut self, body: BodyDescriptor) {
        self.bodies.insert(body.id, body);
    }

    /// Registers an eye variant.
    pub fn add_eye(&mut self, eye: EyeDescriptor) {
        self.eyes.insert(eye.id, eye);
    }

    /// Registers a mouth variant.
    pub fn add_mouth(&mut self, mouth: MouthDescriptor) {
        self.mouths.insert(mouth.id, mouth);
    }

    /// Resolves a body variant, clamping the id into the table's bounds.
    pub fn body(&self, id: u32) -> &BodyDescriptor {
        &self.bodies[&self.clamp_id(OrganKind::Body, id)]
    }

    /// Resolves an eye variant, clamping the id into the table's bounds.
    pub fn eye(&self, id: u32) -> &EyeDescriptor {
        &self.eyes[&self.clamp_id(OrganKind::Eye, id)]
    }

    /// Resolves a mouth variant, clamping the id into the table's bounds.
    pub fn mouth(&self, id: u32) -> &MouthDescriptor {
        &self.mouths[&self.clamp_id(OrganKind::Mouth, id)]
    }

    /// Smallest and largest registered id for a kind.
    ///
    /// Genome validation clamps organ genes into this range so a mutated id
    /// always resolves to a real variant.
    pub fn id_bounds(&self, kind: OrganKind) -> (u32, u32) {
        let keys: Vec<u32> = match kind {
            OrganKind::Body => self.bodies.keys().copied().collect(),
            OrganKind::Eye => self.eyes.keys().copied().collect(),
            OrganKind::Mouth => self.mouths.keys().copied().collect(),
        };
        let min = keys.first().copied().unwrap_or(0);
        let max = keys.last().copied().unwrap_or(0);
        (min, max)
    }

    /// Clamps an id into the registered range for `kind`.
    pub fn clamp_id(&self, kind: OrganKind, id: u32) -> u32 {
        let (min, max) = self.id_bounds(kind);
        id.clamp(min, max)
    }
}

impl Default for OrganCatalog {
    /// The stock catalog the simulation ships with.
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.add_body(BodyDescriptor {
            id: 1,
            name: "Body_01".into(),
            base_size: 1.0,
        });
        catalog.add_eye(EyeDescriptor {
            id: 1,
            name: "Eye_01".into(),
            view_distance: 20.0,
            fov_degrees: 120.0,
            complexity: 4,
            activators_per_entity: 3,
            base_energy: 1.0,
        });
        catalog.add_eye(EyeDescriptor {
            id: 2,
            name: "Eye_02".into(),
            view_distance: 35.0,
            fov_degrees: 60.0,
            complexity: 2,
            activators_per_entity: 4,
            base_energy: 1.5,
        });
        catalog.add_mouth(MouthDescriptor {
            id: 1,
            name: "Mouth_01".into(),
            diet: DietType::Herbivore,
            reach: 2.5,
            output_neurons: 1,
            base_energy: 2.0,
        });
        catalog.add_mouth(MouthDescriptor {
            id: 2,
            name: "Mouth_02".into(),
            diet: DietType::Omnivore,
            reach: 1.5,
            output_neurons: 2,
            base_energy: 3.0,
        });
        catalog
    }
}

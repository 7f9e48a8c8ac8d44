//! Neuron map: the ordered description of every neuron's id, layer, and
//! activation function, built once per creature before the network itself.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::neuron::Activation;

/// Brain regions a neuron can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    /// Eye input channels.
    Visual,
    /// Hearing input channels. Reserved; no stock organ emits these yet.
    Audial,
    /// Locomotion output channels.
    Movement,
    /// Mouth input and output channels.
    Consumption,
    /// Hidden neurons between the input and output layers.
    Internal,
}

/// A contiguous run of neurons owned by one zone, optionally linked to one of
/// the creature's organ slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainZone {
    /// Which region these neurons belong to.
    pub kind: ZoneKind,
    /// How many neurons the zone contributes.
    pub neuron_count: usize,
    /// Index into the creature's organ list for this kind, if organ-linked.
    pub organ_slot: Option<usize>,
}

impl BrainZone {
    /// Creates a zone without an organ link (e.g. movement outputs).
    pub fn new(kind: ZoneKind, neuron_count: usize) -> Self {
        Self {
            kind,
            neuron_count,
            organ_slot: None,
        }
    }

    /// Creates a zone linked to an organ slot.
    pub fn linked(kind: ZoneKind, neuron_count: usize, organ_slot: usize) -> Self {
        Self {
            kind,
            neuron_count,
            organ_slot: Some(organ_slot),
        }
    }
}

/// One entry of the neuron map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NeuronMapItem {
    /// Dense id, contiguous from 0.
    pub id: usize,
    /// Layer rank. 0 is the input layer; the maximum layer is the output layer.
    pub layer: usize,
    /// Activation function the neuron will carry.
    pub activation: Activation,
    /// Zone the neuron belongs to.
    pub zone: ZoneKind,
}

/// Fixed per-channel activation cycle for visual input neurons.
///
/// Each tracked entity emits its channels in a fixed order (entity type,
/// angle, size, distance), and every channel keeps the same activation across
/// all creatures so downstream consumers can rely on channel semantics.
const VISUAL_CHANNEL_CYCLE: [Activation; 4] = [
    Activation::Sigmoid,
    Activation::HyperbolicTangent,
    Activation::Sigmoid,
    Activation::Sigmoid,
];

fn input_activation(zone: ZoneKind, channel: usize) -> Activation {
    match zone {
        ZoneKind::Visual | ZoneKind::Audial => {
            VISUAL_CHANNEL_CYCLE[channel % VISUAL_CHANNEL_CYCLE.len()]
        }
        // Consumption inputs carry a food-presence signal in [0, 1].
        _ => Activation::Sigmoid,
    }
}

fn output_activation(zone: ZoneKind) -> Activation {
    match zone {
        // Consumption gates are binary by design.
        ZoneKind::Consumption => Activation::BinaryStep,
        // Movement and any other unlinked effector steer with a signed signal.
        _ => Activation::HyperbolicTangent,
    }
}

/// Builds the neuron map for a brain.
///
/// Input neurons take ids `0..num_inputs` at layer 0, in zone order, with the
/// fixed per-channel activation cycle of their zone. Hidden neurons fill
/// layers `1..=hidden_layers`, each layer's width drawn uniformly from
/// `[num_inputs, num_inputs + num_outputs]` with a random activation per
/// neuron; the hidden entries are shuffled before ids are assigned, so hidden
/// ids are not layer-monotonic. Output neurons take the final layer in zone
/// order.
///
/// Guarantees: ids are contiguous `0..total`; layer 0 holds exactly the input
/// count; the maximum layer holds exactly the output count.
pub fn build_neuron_map(
    input_zones: &[BrainZone],
    output_zones: &[BrainZone],
    hidden_layers: usize,
    rng: &mut impl Rng,
) -> Vec<NeuronMapItem> {
    let num_inputs: usize = input_zones.iter().map(|z| z.neuron_count).sum();
    let num_outputs: usize = output_zones.iter().map(|z| z.neuron_count).sum();

    let mut map = Vec::with_capacity(num_inputs + num_outputs);
    let mut next_id = 0;

    for zone in input_zones {
        for channel in 0..zone.neuron_count {
            map.push(NeuronMapItem {
                id: next_id,
                layer: 0,
                activation: input_activation(zone.kind, channel),
                zone: zone.kind,
            });
            next_id += 1;
        }
    }

    // Hidden layers: widths first, then one shuffle across all hidden
    // neurons so ids spread over the layers.
    let mut hidden: Vec<(usize, Activation)> = Vec::new();
    for layer in 1..=hidden_layers {
        let width = rng.random_range(num_inputs..=num_inputs + num_outputs);
        for _ in 0..width {
            hidden.push((layer, Activation::random(rng)));
        }
    }
    hidden.shuffle(rng);
    for (layer, activation) in hidden {
        map.push(NeuronMapItem {
            id: next_id,
            layer,
            activation,
            zone: ZoneKind::Internal,
        });
        next_id += 1;
    }

    let output_layer = hidden_layers + 1;
    for zone in output_zones {
        for _ in 0..zone.neuron_count {
            map.push(NeuronMapItem {
                id: next_id,
                layer: output_layer,
                activation: output_activation(zone.kind),
                zone: zone.kind,
            });
            next_id += 1;
        }
    }

    map
}

//! Brain: neuron map construction, network synthesis, and the tick API.
//!
//! A brain is built once per creature. Sensors write scaled values into input
//! neurons, [`Brain::update`] advances the network, and effectors read output
//! neurons back out.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub mod map;
pub mod network;
pub mod neuron;

pub use map::{BrainZone, NeuronMapItem, ZoneKind, build_neuron_map};
pub use network::{ConnectionMethod, Network, NeuronConnection};
pub use neuron::{Activation, Neuron};

use crate::simulation::error::DecodeError;
use crate::simulation::params::Params;

/// A creature's brain: the neuron map it was built from plus the synthesized
/// network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brain {
    map: Vec<NeuronMapItem>,
    network: Network,
    num_inputs: usize,
    num_outputs: usize,
}

impl Brain {
    /// Builds a brain from zone lists and the genome's brain-shape gene.
    ///
    /// Input zones are laid out first (ids `0..num_inputs`), hidden layers in
    /// between, output zones last; the network is then synthesized with the
    /// genome's connection method and cleaned.
    pub fn initialize(
        input_zones: &[BrainZone],
        output_zones: &[BrainZone],
        hidden_layers: usize,
        method: ConnectionMethod,
        params: &Params,
        rng: &mut impl Rng,
    ) -> Self {
        let map = build_neuron_map(input_zones, output_zones, hidden_layers, rng);
        let network = Network::synthesize(&map, method, params, rng);
        let num_inputs = input_zones.iter().map(|z| z.neuron_count).sum();
        let num_outputs = output_zones.iter().map(|z| z.neuron_count).sum();
        Self {
            map,
            network,
            num_inputs,
            num_outputs,
        }
    }

    /// Advances the network by one update.
    pub fn update(&mut self) {
        self.network.update();
    }

    /// Writes a sensor value into an input neuron. The caller scales the
    /// value into the neuron's activation domain beforehand.
    pub fn set_neuron_value(&mut self, id: usize, value: f32) {
        self.network.set_neuron(id, value);
    }

    /// Reads a neuron's current output.
    pub fn neuron_value(&self, id: usize) -> f32 {
        self.network.neuron_output(id)
    }

    /// Number of input neurons (ids `0..num_inputs`).
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// Number of output neurons, occupying the final ids.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Total neurons in the map.
    pub fn num_total(&self) -> usize {
        self.map.len()
    }

    /// Id of the `index`-th output neuron.
    pub fn output_id(&self, index: usize) -> usize {
        self.map.len() - self.num_outputs + index
    }

    /// The neuron map the network was synthesized from.
    pub fn map(&self) -> &[NeuronMapItem] {
        &self.map
    }

    /// The synthesized network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Mutable access to the network, for the brain-randomization operator.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Encodes the brain as pretty-printed JSON ("copy this brain").
    pub fn encode(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Decodes a brain from its JSON form and rebuilds the derived
    /// incoming-edge index, which does not travel with the text.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let mut brain: Self = serde_json::from_str(text).map_err(DecodeError::Brain)?;
        brain.network.rebuild_index();
        Ok(brain)
    }
}

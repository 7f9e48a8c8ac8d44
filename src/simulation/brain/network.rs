//! Network synthesis, graph cleaning, and signal propagation.
//!
//! A network is built once per creature from its neuron map, pruned so only
//! neurons that can influence an output survive, and then evaluated once per
//! brain update for the rest of the creature's life.

use std::collections::HashMap;

use log::{error, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::map::NeuronMapItem;
use super::neuron::Neuron;
use crate::simulation::params::Params;

/// How connections are generated when a network is synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionMethod {
    /// Every neuron in layer L connects from every neuron in layer L-1.
    /// Deterministic structure; only the weights are random.
    Full,
    /// Every neuron in layer L connects to a non-empty random subset of
    /// layer L+1. Sparser, randomly shaped, still strictly layer-ordered.
    Partial,
    /// Every neuron draws a bounded number of outgoing edges to targets
    /// anywhere in the network, layers ignored. May produce cycles.
    Random,
}

impl ConnectionMethod {
    /// Draws a uniformly random connection method.
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..3) {
            0 => ConnectionMethod::Full,
            1 => ConnectionMethod::Partial,
            _ => ConnectionMethod::Random,
        }
    }
}

/// A directed weighted edge between two neurons.
///
/// Multiple edges between the same pair are permitted and are not
/// deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronConnection {
    /// Id of the neuron the signal is read from.
    pub source: usize,
    /// Id of the neuron the signal feeds into.
    pub target: usize,
    /// Weight in `[-1, 1]` at creation; brain randomization keeps it clamped.
    pub weight: f32,
    /// Layer of the source neuron, cached for traversal.
    pub from_layer: usize,
}

/// A synthesized, cleaned network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    /// All neurons, ordered by id. Disabled neurons are retained so ids stay
    /// stable; they are simply never propagated.
    pub neurons: Vec<Neuron>,
    /// Connections that survived graph cleaning.
    pub connections: Vec<NeuronConnection>,
    /// Ids of neurons reachable from the output layer, ascending. Only these
    /// are visited during propagation.
    used: Vec<usize>,
    /// Full propagation passes per update.
    pub signal_passes: usize,
    /// Incoming-edge index: target id to indices into `connections`. Derived
    /// from the cleaned edge set; rebuilt after decode.
    #[serde(skip)]
    incoming: HashMap<usize, Vec<usize>>,
}

/// Retries with the genome's own method before the forced fallback kicks in.
const SYNTHESIS_ATTEMPTS: usize = 5;

impl Network {
    /// Synthesizes a network from a neuron map.
    ///
    /// Generation runs with the requested method, then the graph is cleaned.
    /// If cleaning empties the edge set the attempt is discarded and retried;
    /// once the retries are exhausted the `Random` method is forced with
    /// parameters that guarantee at least one live edge per output, so every
    /// creature receives a working brain.
    pub fn synthesize(
        map: &[NeuronMapItem],
        method: ConnectionMethod,
        params: &Params,
        rng: &mut impl Rng,
    ) -> Self {
        for _ in 0..SYNTHESIS_ATTEMPTS {
            let neurons: Vec<Neuron> = map
                .iter()
                .map(|item| Neuron::new(item.id, item.layer, item.activation, rng))
                .collect();
            let raw = generate_connections(&neurons, method, params, rng);
            let (connections, used) = clean_graph(&neurons, raw);
            if !connections.is_empty() {
                return Self::assemble(neurons, connections, used, params.signal_passes);
            }
        }

        // A genome/catalog mismatch is the only way to get here; the
        // simulation still needs a creature with a working brain.
        error!(
            "network synthesis produced no usable connections after {} attempts ({:?}); forcing random fallback",
            SYNTHESIS_ATTEMPTS, method
        );
        let neurons: Vec<Neuron> = map
            .iter()
            .map(|item| Neuron::new(item.id, item.layer, item.activation, rng))
            .collect();
        let raw = generate_guaranteed_random(&neurons, params, rng);
        let (connections, used) = clean_graph(&neurons, raw);
        Self::assemble(neurons, connections, used, params.signal_passes)
    }

    fn assemble(
        neurons: Vec<Neuron>,
        connections: Vec<NeuronConnection>,
        used: Vec<usize>,
        signal_passes: usize,
    ) -> Self {
        let mut network = Self {
            neurons,
            connections,
            used,
            signal_passes,
            incoming: HashMap::new(),
        };
        network.rebuild_index();
        network
    }

    /// Rebuilds the incoming-edge index from the connection list.
    ///
    /// Needed after decoding a persisted network, where only the edge list
    /// travels.
    pub fn rebuild_index(&mut self) {
        let mut incoming: HashMap<usize, Vec<usize>> = HashMap::new();
        for (idx, connection) in self.connections.iter().enumerate() {
            incoming.entry(connection.target).or_default().push(idx);
        }
        self.incoming = incoming;
    }

    /// Advances the network by one update: `signal_passes` full passes over
    /// the used neurons in id order.
    ///
    /// Neurons with incoming edges overwrite their output with the weighted
    /// sum plus bias; input neurons keep the value their sensor last wrote.
    /// The activation function is then applied to every used neuron,
    /// including inputs - a sensor value written between updates is
    /// re-squashed into the neuron's own activation range before it can
    /// influence anything downstream.
    pub fn update(&mut self) {
        for _ in 0..self.signal_passes {
            for &id in &self.used {
                if let Some(edges) = self.incoming.get(&id) {
                    let mut sum = 0.0;
                    for &edge in edges {
                        let connection = &self.connections[edge];
                        sum += self.neurons[connection.source].output * connection.weight;
                    }
                    let neuron = &mut self.neurons[id];
                    neuron.output = sum + neuron.bias;
                }
                let neuron = &mut self.neurons[id];
                neuron.output = neuron.activation.apply(neuron.output);
            }
        }
    }

    /// Writes a raw value into a neuron. Sensors call this with values
    /// already scaled into the neuron's activation domain.
    pub fn set_neuron(&mut self, id: usize, value: f32) {
        self.neurons[id].output = value;
    }

    /// Reads a neuron's current output value.
    pub fn neuron_output(&self, id: usize) -> f32 {
        self.neurons[id].output
    }

    /// Applies a bounded random perturbation to every surviving connection
    /// weight, leaving the topology untouched.
    pub fn perturb_weights(&mut self, delta: f32, rng: &mut impl Rng) {
        for connection in &mut self.connections {
            connection.weight += rng.random_range(-delta..delta);
            connection.weight = connection.weight.clamp(-1.0, 1.0);
        }
    }

    /// Ids of the neurons that survived graph cleaning, ascending.
    pub fn used_neuron_ids(&self) -> &[usize] {
        &self.used
    }

    /// Number of neurons iterated during propagation.
    pub fn used_neuron_count(&self) -> usize {
        self.used.len()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// The output layer's rank.
    pub fn max_layer(&self) -> usize {
        self.neurons.iter().map(|n| n.layer).max().unwrap_or(0)
    }
}

/// Generates the raw (pre-cleaning) edge set for a method.
fn generate_connections(
    neurons: &[Neuron],
    method: ConnectionMethod,
    params: &Params,
    rng: &mut impl Rng,
) -> Vec<NeuronConnection> {
    match method {
        ConnectionMethod::Full => generate_full(neurons, rng),
        ConnectionMethod::Partial => generate_partial(neurons, rng),
        ConnectionMethod::Random => {
            generate_random(neurons, params.min_connections, params.max_connections, rng)
        }
    }
}

fn ids_by_layer(neurons: &[Neuron]) -> Vec<Vec<usize>> {
    let max_layer = neurons.iter().map(|n| n.layer).max().unwrap_or(0);
    let mut layers = vec![Vec::new(); max_layer + 1];
    for neuron in neurons {
        layers[neuron.layer].push(neuron.id);
    }
    layers
}

/// Full forward: every neuron in layer L connects from every neuron in
/// layer L-1. The structure is deterministic; only the weights are drawn.
fn generate_full(neurons: &[Neuron], rng: &mut impl Rng) -> Vec<NeuronConnection> {
    let layers = ids_by_layer(neurons);
    let mut connections = Vec::new();
    for layer in 1..layers.len() {
        for &target in &layers[layer] {
            for &source in &layers[layer - 1] {
                connections.push(NeuronConnection {
                    source,
                    target,
                    weight: rng.random_range(-1.0..1.0),
                    from_layer: layer - 1,
                });
            }
        }
    }
    connections
}

/// Partial forward: every neuron in layer L connects to a non-empty random
/// subset of layer L+1, looking forward from the current layer to the next.
/// (Full looks backward from L to L-1; the asymmetry is long-standing
/// observed behavior and is kept as is.)
fn generate_partial(neurons: &[Neuron], rng: &mut impl Rng) -> Vec<NeuronConnection> {
    let layers = ids_by_layer(neurons);
    let mut connections = Vec::new();
    for layer in 0..layers.len().saturating_sub(1) {
        let next = &layers[layer + 1];
        if next.is_empty() {
            continue;
        }
        for &source in &layers[layer] {
            let count = rng.random_range(1..=next.len());
            for &target in next.choose_multiple(rng, count) {
                connections.push(NeuronConnection {
                    source,
                    target,
                    weight: rng.random_range(-1.0..1.0),
                    from_layer: layer,
                });
            }
        }
    }
    connections
}

/// Random: every neuron draws a bounded number of outgoing edges to targets
/// anywhere in the network. Self-loops and cycles are possible and survive
/// cleaning when they can still reach an output.
fn generate_random(
    neurons: &[Neuron],
    min_connections: usize,
    max_connections: usize,
    rng: &mut impl Rng,
) -> Vec<NeuronConnection> {
    let mut connections = Vec::new();
    for neuron in neurons {
        let count = rng.random_range(min_connections..=max_connections);
        for _ in 0..count {
            let target = rng.random_range(0..neurons.len());
            connections.push(NeuronConnection {
                source: neuron.id,
                target,
                weight: rng.random_range(-1.0..1.0),
                from_layer: neuron.layer,
            });
        }
    }
    connections
}

/// Fallback generation: random edges plus one guaranteed incoming edge per
/// output neuron, so cleaning cannot produce an empty graph.
fn generate_guaranteed_random(
    neurons: &[Neuron],
    params: &Params,
    rng: &mut impl Rng,
) -> Vec<NeuronConnection> {
    let min = params.min_connections.max(1);
    let max = params.max_connections.max(min);
    let mut connections = generate_random(neurons, min, max, rng);

    let max_layer = neurons.iter().map(|n| n.layer).max().unwrap_or(0);
    let non_outputs: Vec<&Neuron> = neurons.iter().filter(|n| n.layer < max_layer).collect();
    for neuron in neurons.iter().filter(|n| n.layer == max_layer) {
        if let Some(source) = non_outputs.choose(rng) {
            connections.push(NeuronConnection {
                source: source.id,
                target: neuron.id,
                weight: rng.random_range(-1.0..1.0),
                from_layer: source.layer,
            });
        } else {
            warn!("network has no non-output neurons; output {} left unfed", neuron.id);
        }
    }
    connections
}

/// Graph cleaning: walks backward (target to source) from every output-layer
/// neuron, marking everything reached as used. Connections with an unused
/// endpoint are discarded; unused neurons are excluded from the used set but
/// retained in the neuron list so ids stay stable.
fn clean_graph(
    neurons: &[Neuron],
    connections: Vec<NeuronConnection>,
) -> (Vec<NeuronConnection>, Vec<usize>) {
    let max_layer = neurons.iter().map(|n| n.layer).max().unwrap_or(0);

    let mut incoming: HashMap<usize, Vec<&NeuronConnection>> = HashMap::new();
    for connection in &connections {
        incoming.entry(connection.target).or_default().push(connection);
    }

    let mut used = vec![false; neurons.len()];
    let mut stack: Vec<usize> = neurons
        .iter()
        .filter(|n| n.layer == max_layer)
        .map(|n| n.id)
        .collect();
    for &id in &stack {
        used[id] = true;
    }
    while let Some(id) = stack.pop() {
        if let Some(edges) = incoming.get(&id) {
            for connection in edges {
                if !used[connection.source] {
                    used[connection.source] = true;
                    stack.push(connection.source);
                }
            }
        }
    }

    let kept: Vec<NeuronConnection> = connections
        .into_iter()
        .filter(|c| used[c.source] && used[c.target])
        .collect();
    let used_ids: Vec<usize> = (0..neurons.len()).filter(|&id| used[id]).collect();
    (kept, used_ids)
}

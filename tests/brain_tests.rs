#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use creatura::simulation::brain::{
    Activation, BrainZone, ConnectionMethod, Network, NeuronMapItem, ZoneKind, build_neuron_map,
};
use creatura::simulation::params::Params;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    Params {
        min_connections: 1,
        max_connections: 4,
        signal_passes: 1,
        ..Params::default()
    }
}

fn test_zones() -> (Vec<BrainZone>, Vec<BrainZone>) {
    let input_zones = vec![
        BrainZone::linked(ZoneKind::Visual, 6, 0),
        BrainZone::linked(ZoneKind::Consumption, 1, 0),
    ];
    let output_zones = vec![
        BrainZone::new(ZoneKind::Movement, 2),
        BrainZone::linked(ZoneKind::Consumption, 1, 0),
    ];
    (input_zones, output_zones)
}

/// Hand-built three-layer map: 2 inputs, 3 hidden, 1 output.
fn map_2_3_1() -> Vec<NeuronMapItem> {
    let layout = [
        (0, Activation::HyperbolicTangent, ZoneKind::Visual),
        (0, Activation::HyperbolicTangent, ZoneKind::Visual),
        (1, Activation::Sigmoid, ZoneKind::Internal),
        (1, Activation::HyperbolicTangent, ZoneKind::Internal),
        (1, Activation::Sign, ZoneKind::Internal),
        (2, Activation::Sigmoid, ZoneKind::Movement),
    ];
    layout
        .iter()
        .enumerate()
        .map(|(id, &(layer, activation, zone))| NeuronMapItem {
            id,
            layer,
            activation,
            zone,
        })
        .collect()
}

#[test]
fn test_topology_invariants() {
    let (input_zones, output_zones) = test_zones();
    let num_inputs = 7;
    let num_outputs = 3;
    let mut rng = StdRng::seed_from_u64(11);

    for hidden_layers in [0, 1, 3, 5] {
        let map = build_neuron_map(&input_zones, &output_zones, hidden_layers, &mut rng);

        // Ids are contiguous from 0.
        for (i, item) in map.iter().enumerate() {
            assert_eq!(item.id, i);
        }

        let max_layer = map.iter().map(|n| n.layer).max().unwrap();
        assert_eq!(max_layer, hidden_layers + 1);

        let at_layer_0 = map.iter().filter(|n| n.layer == 0).count();
        let at_max_layer = map.iter().filter(|n| n.layer == max_layer).count();
        assert_eq!(at_layer_0, num_inputs);
        assert_eq!(at_max_layer, num_outputs);

        // Every hidden layer's width is within the configured range.
        for layer in 1..=hidden_layers {
            let width = map.iter().filter(|n| n.layer == layer).count();
            assert!(width >= num_inputs);
            assert!(width <= num_inputs + num_outputs);
        }
    }
}

#[test]
fn test_input_channel_activation_cycle() {
    let (input_zones, output_zones) = test_zones();
    let mut rng = StdRng::seed_from_u64(3);
    let map = build_neuron_map(&input_zones, &output_zones, 2, &mut rng);

    // Visual channels follow the fixed cycle so channel semantics are stable.
    assert_eq!(map[0].activation, Activation::Sigmoid);
    assert_eq!(map[1].activation, Activation::HyperbolicTangent);
    assert_eq!(map[2].activation, Activation::Sigmoid);
    assert_eq!(map[3].activation, Activation::Sigmoid);
    assert_eq!(map[4].activation, Activation::Sigmoid);

    // Movement outputs are tanh, consumption gates binary.
    let total = map.len();
    assert_eq!(map[total - 3].activation, Activation::HyperbolicTangent);
    assert_eq!(map[total - 2].activation, Activation::HyperbolicTangent);
    assert_eq!(map[total - 1].activation, Activation::BinaryStep);
}

#[test]
fn test_networks_are_never_empty() {
    let params = create_test_params();
    let (input_zones, output_zones) = test_zones();
    let mut rng = StdRng::seed_from_u64(99);

    for method in [
        ConnectionMethod::Full,
        ConnectionMethod::Partial,
        ConnectionMethod::Random,
    ] {
        for hidden_layers in [0, 2, 4] {
            for _ in 0..20 {
                let map = build_neuron_map(&input_zones, &output_zones, hidden_layers, &mut rng);
                let network = Network::synthesize(&map, method, &params, &mut rng);
                assert!(
                    network.connection_count() >= 1,
                    "{method:?} with {hidden_layers} hidden layers produced an empty network"
                );
            }
        }
    }
}

#[test]
fn test_pruning_keeps_only_output_reachable_neurons() {
    let params = create_test_params();
    let (input_zones, output_zones) = test_zones();
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..20 {
        let map = build_neuron_map(&input_zones, &output_zones, 3, &mut rng);
        let network = Network::synthesize(&map, ConnectionMethod::Random, &params, &mut rng);

        let used: Vec<usize> = network.used_neuron_ids().to_vec();
        let max_layer = network.max_layer();

        // Every surviving connection has both endpoints in the used set.
        for connection in &network.connections {
            assert!(used.contains(&connection.source));
            assert!(used.contains(&connection.target));
        }

        // Every used neuron reaches some output neuron along kept edges.
        for &id in &used {
            let mut stack = vec![id];
            let mut visited = vec![false; network.neurons.len()];
            visited[id] = true;
            let mut reached_output = false;
            while let Some(current) = stack.pop() {
                if network.neurons[current].layer == max_layer {
                    reached_output = true;
                    break;
                }
                for connection in &network.connections {
                    if connection.source == current && !visited[connection.target] {
                        visited[connection.target] = true;
                        stack.push(connection.target);
                    }
                }
            }
            assert!(reached_output, "used neuron {id} cannot reach any output");
        }

        // Disabled neurons appear in no surviving connection.
        for neuron in &network.neurons {
            if !used.contains(&neuron.id) {
                for connection in &network.connections {
                    assert_ne!(connection.source, neuron.id);
                    assert_ne!(connection.target, neuron.id);
                }
            }
        }
    }
}

#[test]
fn test_full_forward_synthesis_is_deterministic_given_seed() {
    let params = create_test_params();
    let map = map_2_3_1();

    let mut rng_a = StdRng::seed_from_u64(1234);
    let mut rng_b = StdRng::seed_from_u64(1234);
    let network_a = Network::synthesize(&map, ConnectionMethod::Full, &params, &mut rng_a);
    let network_b = Network::synthesize(&map, ConnectionMethod::Full, &params, &mut rng_b);

    assert_eq!(network_a.connection_count(), network_b.connection_count());
    for (a, b) in network_a.connections.iter().zip(&network_b.connections) {
        assert_eq!(a.source, b.source);
        assert_eq!(a.target, b.target);
        assert_eq!(a.weight, b.weight);
        assert_eq!(a.from_layer, b.from_layer);
    }
    for (a, b) in network_a.neurons.iter().zip(&network_b.neurons) {
        assert_eq!(a.bias, b.bias);
    }
}

#[test]
fn test_activation_boundary_values() {
    assert_eq!(Activation::BinaryStep.apply(0.0), 0.0);
    assert_eq!(Activation::BinaryStep.apply(1e-6), 1.0);
    assert_eq!(Activation::BinaryStep.apply(-0.5), 0.0);
    assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
    assert_eq!(Activation::HyperbolicTangent.apply(0.0), 0.0);
    assert_eq!(Activation::Sign.apply(0.0), 0.0);
    assert_eq!(Activation::Sign.apply(2.0), 1.0);
    assert_eq!(Activation::Sign.apply(-3.0), -1.0);
}

#[test]
fn test_full_forward_2_3_1_has_nine_connections() {
    let params = create_test_params();
    let map = map_2_3_1();
    let mut rng = StdRng::seed_from_u64(7);

    let network = Network::synthesize(&map, ConnectionMethod::Full, &params, &mut rng);

    // 2*3 + 3*1 edges; full forward never produces dead edges in a chain,
    // so cleaning removes nothing.
    assert_eq!(network.connection_count(), 9);
    assert_eq!(network.used_neuron_count(), 6);
}

#[test]
fn test_propagation_applies_weights_bias_and_activation() {
    let params = create_test_params();
    // 2 inputs straight into 1 sigmoid output.
    let map = vec![
        NeuronMapItem {
            id: 0,
            layer: 0,
            activation: Activation::HyperbolicTangent,
            zone: ZoneKind::Visual,
        },
        NeuronMapItem {
            id: 1,
            layer: 0,
            activation: Activation::HyperbolicTangent,
            zone: ZoneKind::Visual,
        },
        NeuronMapItem {
            id: 2,
            layer: 1,
            activation: Activation::Sigmoid,
            zone: ZoneKind::Movement,
        },
    ];
    let mut rng = StdRng::seed_from_u64(21);
    let mut network = Network::synthesize(&map, ConnectionMethod::Full, &params, &mut rng);

    network.set_neuron(0, 0.5);
    network.set_neuron(1, -0.25);
    network.update();

    // Input neurons keep their sensor value but are re-squashed through
    // their own activation before anything reads them downstream.
    let in_0 = 0.5_f32.tanh();
    let in_1 = (-0.25_f32).tanh();
    assert!((network.neuron_output(0) - in_0).abs() < 1e-6);
    assert!((network.neuron_output(1) - in_1).abs() < 1e-6);

    let mut raw = network.neurons[2].bias;
    for connection in &network.connections {
        let source_value = if connection.source == 0 { in_0 } else { in_1 };
        raw += source_value * connection.weight;
    }
    let expected = 1.0 / (1.0 + (-raw).exp());
    assert!((network.neuron_output(2) - expected).abs() < 1e-5);
}

#[test]
fn test_scale_value_maps_into_activation_domains() {
    use creatura::simulation::utils::scale_value;

    // Non-negative source ranges land in [0, 1].
    assert_eq!(scale_value(0.0, 0.0, 100.0), 0.0);
    assert_eq!(scale_value(50.0, 0.0, 100.0), 0.5);
    assert_eq!(scale_value(100.0, 0.0, 100.0), 1.0);

    // Signed source ranges land in [-1, 1].
    assert_eq!(scale_value(-60.0, -60.0, 60.0), -1.0);
    assert_eq!(scale_value(0.0, -60.0, 60.0), 0.0);
    assert_eq!(scale_value(60.0, -60.0, 60.0), 1.0);

    // A degenerate range yields the fixed midpoint, never NaN.
    assert_eq!(scale_value(7.0, 3.0, 3.0), 0.5);
}

#[test]
fn test_perturb_weights_stays_bounded_and_keeps_topology() {
    let params = create_test_params();
    let map = map_2_3_1();
    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::synthesize(&map, ConnectionMethod::Full, &params, &mut rng);

    let before: Vec<(usize, usize)> = network
        .connections
        .iter()
        .map(|c| (c.source, c.target))
        .collect();

    for _ in 0..100 {
        network.perturb_weights(0.1, &mut rng);
    }

    let after: Vec<(usize, usize)> = network
        .connections
        .iter()
        .map(|c| (c.source, c.target))
        .collect();
    assert_eq!(before, after);
    for connection in &network.connections {
        assert!(connection.weight >= -1.0);
        assert!(connection.weight <= 1.0);
    }
}

//! Neurons and their activation functions.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Activation functions a neuron can squash its raw sum through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// 1 if the value is strictly positive, else 0.
    BinaryStep,
    /// `1 / (1 + e^-x)`, output in (0, 1).
    Sigmoid,
    /// `tanh(x)`, output in (-1, 1).
    HyperbolicTangent,
    /// -1, 0, or 1 by sign of the value.
    Sign,
}

impl Activation {
    /// Applies the activation function.
    pub fn apply(self, value: f32) -> f32 {
        match self {
            Activation::BinaryStep => {
                if value > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => 1.0 / (1.0 + (-value).exp()),
            Activation::HyperbolicTangent => value.tanh(),
            Activation::Sign => {
                if value > 0.0 {
                    1.0
                } else if value < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Draws a uniformly random activation function.
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..4) {
            0 => Activation::BinaryStep,
            1 => Activation::Sigmoid,
            2 => Activation::HyperbolicTangent,
            _ => Activation::Sign,
        }
    }
}

/// A neuron in a synthesized network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    /// Dense id, unique within the network.
    pub id: usize,
    /// Layer rank: 0 is the input layer, the maximum layer is the output layer.
    pub layer: usize,
    /// Activation function applied every propagation pass.
    pub activation: Activation,
    /// Fixed bias added to the incoming sum. Drawn once at creation.
    pub bias: f32,
    /// Post-activation output, updated every pass (or by a sensor write).
    pub output: f32,
}

impl Neuron {
    /// Creates a neuron with a random bias and a random initial output, so a
    /// freshly built network propagates defined values before the first
    /// sensor write.
    pub fn new(id: usize, layer: usize, activation: Activation, rng: &mut impl Rng) -> Self {
        Self {
            id,
            layer,
            activation,
            bias: rng.random_range(-1.0..1.0),
            output: rng.random_range(-1.0..1.0),
        }
    }
}

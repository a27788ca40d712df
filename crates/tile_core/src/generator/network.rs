//! A small dense feed-forward network usable as a generator.
//!
//! Weights are drawn from a seeded `StdRng`, so the same seed always yields
//! the same network and therefore the same sprites.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::TileError;

use super::Generator;

/// One fully connected layer, weights stored row-major as `outputs x inputs`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayerData", into = "LayerData")]
struct Layer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

/// Serialized form of a [`Layer`], checked for consistent lengths on load.
#[derive(Serialize, Deserialize)]
struct LayerData {
    inputs: usize,
    outputs: usize,
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl TryFrom<LayerData> for Layer {
    type Error = TileError;

    fn try_from(data: LayerData) -> Result<Self, Self::Error> {
        let expected = data.inputs * data.outputs;
        if data.weights.len() != expected {
            return Err(TileError::BufferSize {
                expected,
                actual: data.weights.len(),
            });
        }
        if data.biases.len() != data.outputs {
            return Err(TileError::BufferSize {
                expected: data.outputs,
                actual: data.biases.len(),
            });
        }
        Ok(Self {
            inputs: data.inputs,
            outputs: data.outputs,
            weights: data.weights,
            biases: data.biases,
        })
    }
}

impl From<Layer> for LayerData {
    fn from(layer: Layer) -> Self {
        Self {
            inputs: layer.inputs,
            outputs: layer.outputs,
            weights: layer.weights,
            biases: layer.biases,
        }
    }
}

impl Layer {
    fn random(inputs: usize, outputs: usize, rng: &mut StdRng) -> Self {
        let scale = 1.0 / (inputs.max(1) as f64).sqrt();
        Self {
            inputs,
            outputs,
            weights: (0..inputs * outputs)
                .map(|_| rng.gen_range(-2.0..2.0) * scale)
                .collect(),
            biases: (0..outputs).map(|_| rng.gen_range(-1.0..1.0)).collect(),
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        (0..self.outputs)
            .map(|o| {
                let row = &self.weights[o * self.inputs..(o + 1) * self.inputs];
                let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                sum + self.biases[o]
            })
            .collect()
    }
}

/// Feed-forward network with tanh hidden layers and a sigmoid output layer.
///
/// Outputs lie in `(0, 1)`, which matches the default `ValueRange` for
/// whole-tile sprites and the RGB convention of per-pixel sprites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    layers: Vec<Layer>,
}

impl DenseNetwork {
    /// Build a network with random weights.
    ///
    /// `hidden` lists the width of each hidden layer; it may be empty.
    pub fn random(inputs: usize, hidden: &[usize], outputs: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut widths = Vec::with_capacity(hidden.len() + 2);
        widths.push(inputs);
        widths.extend_from_slice(hidden);
        widths.push(outputs);
        let layers = widths
            .windows(2)
            .map(|pair| Layer::random(pair[0], pair[1], &mut rng))
            .collect();
        Self { layers }
    }

    pub fn input_len(&self) -> usize {
        self.layers.first().map_or(0, |l| l.inputs)
    }

    pub fn output_len(&self) -> usize {
        self.layers.last().map_or(0, |l| l.outputs)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Generator for DenseNetwork {
    /// Missing inputs read as 0 and extra inputs are ignored.
    fn activate(&self, input: &[f64]) -> Vec<f64> {
        let mut values: Vec<f64> = (0..self.input_len())
            .map(|i| input.get(i).copied().unwrap_or(0.0))
            .collect();
        let last = self.layers.len().saturating_sub(1);
        for (i, layer) in self.layers.iter().enumerate() {
            values = layer.forward(&values);
            let activation: fn(f64) -> f64 = if i == last { sigmoid } else { f64::tanh };
            values.iter_mut().for_each(|v| *v = activation(*v));
        }
        values
    }
}

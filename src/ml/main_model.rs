// ============================================================
// Layer 5 — Main Models
// ============================================================
// The main model turns an input batch into the representation
// the detection model classifies. It is a fixed feature
// extractor: its outputs are detached, so no gradient reaches
// it, and it is never handed to the optimiser.
//
//   identity   — the inputs already are hidden states
//   projection — frozen random projection + tanh, seeded

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::tanh,
};

pub trait FeatureExtractor<B: Backend> {
    /// inputs: [batch, input_dim] → [batch, output_dim]
    fn represent(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2>;

    fn output_dim(&self) -> usize;

    fn name(&self) -> &str;
}

// ─── Identity ─────────────────────────────────────────────────────────────────
pub struct IdentityExtractor {
    dim: usize,
}

impl IdentityExtractor {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl<B: Backend> FeatureExtractor<B> for IdentityExtractor {
    fn represent(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        inputs.detach()
    }

    fn output_dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "identity"
    }
}

// ─── Projection ───────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct ProjectionExtractor<B: Backend> {
    projection: Linear<B>,
    output_dim: usize,
}

impl<B: Backend> ProjectionExtractor<B> {
    /// Seeds the backend before drawing weights, so a given seed
    /// always yields the same projection.
    pub fn new(input_dim: usize, output_dim: usize, seed: u64, device: &B::Device) -> Self {
        B::seed(seed);
        let projection = LinearConfig::new(input_dim, output_dim).init(device).no_grad();
        Self { projection, output_dim }
    }
}

impl<B: Backend> FeatureExtractor<B> for ProjectionExtractor<B> {
    fn represent(&self, inputs: Tensor<B, 2>) -> Tensor<B, 2> {
        tanh(self.projection.forward(inputs)).detach()
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn name(&self) -> &str {
        "projection"
    }
}

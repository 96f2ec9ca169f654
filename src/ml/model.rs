use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

// #[derive(Config)] also derives Clone, Serialize and Deserialize.
#[derive(Config, Debug)]
pub struct DetectionModelConfig {
    /// Width of the main model's representation
    pub input_dim:   usize,
    /// Hidden layer widths, empty for a single linear layer
    pub hidden:      Vec<usize>,
    pub num_classes: usize,
    pub dropout:     f64,
}

impl DetectionModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DetectionModel<B> {
        let widths: Vec<usize> = std::iter::once(self.input_dim)
            .chain(self.hidden.iter().copied())
            .chain(std::iter::once(self.num_classes))
            .collect();
        let layers = widths
            .windows(2)
            .map(|w| LinearConfig::new(w[0], w[1]).init(device))
            .collect();
        DetectionModel {
            layers,
            dropout:     DropoutConfig::new(self.dropout).init(),
            input_dim:   self.input_dim,
            num_classes: self.num_classes,
        }
    }
}

/// Classifier over main-model representations. The only module
/// whose parameters the optimiser updates and checkpoints hold.
#[derive(Module, Debug)]
pub struct DetectionModel<B: Backend> {
    pub layers:      Vec<Linear<B>>,
    pub dropout:     Dropout,
    pub input_dim:   usize,
    pub num_classes: usize,
}

impl<B: Backend> DetectionModel<B> {
    /// state: [batch, input_dim] → logits: [batch, num_classes]
    pub fn forward(&self, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let last  = self.layers.len().saturating_sub(1);
        let mut x = state;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(x);
            if i < last {
                x = self.dropout.forward(relu(x));
            }
        }
        x
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}

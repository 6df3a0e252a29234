// ============================================================
// Layer 5 — Pre / Post Projection Stacks
// ============================================================
// Per-time-step MLPs around the recurrent block.
//
// With n_layers = L each stack holds L + 1 linear transforms.
//
// Pre stack (E → H):
//   Linear(E,H) → ReLU → Dropout
//   Linear(H,H) → ReLU → Dropout      × (L - 1)
//   Linear(H,H) → ReLU                ← no dropout: the recurrent
//                                        block comes next
//
// Post stack (H → H):
//   Dropout → Linear(H,H) → ReLU      × L
//   Dropout → Linear(H,H)             ← raw, feeds the output layer
//
// The dropout lists are built once, sized to the transforms that
// get one: L for the pre stack, L + 1 for the post stack.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct ProjectionConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
    pub n_layers: usize,
    #[config(default = 0.0)]
    pub dropout:  f64,
}

impl ProjectionConfig {
    fn linear_stack<B: Backend>(&self, device: &B::Device) -> Vec<Linear<B>> {
        std::iter::once(LinearConfig::new(self.d_input, self.d_hidden).init(device))
            .chain(
                (0..self.n_layers)
                    .map(|_| LinearConfig::new(self.d_hidden, self.d_hidden).init(device)),
            )
            .collect()
    }

    fn dropouts(&self, count: usize) -> Vec<Dropout> {
        (0..count)
            .map(|_| DropoutConfig::new(self.dropout).init())
            .collect()
    }

    pub fn init_pre<B: Backend>(&self, device: &B::Device) -> PreProjection<B> {
        PreProjection {
            layers:   self.linear_stack(device),
            dropouts: self.dropouts(self.n_layers),
        }
    }

    /// The post stack never changes dimension, `d_input` must equal `d_hidden`.
    pub fn init_post<B: Backend>(&self, device: &B::Device) -> PostProjection<B> {
        PostProjection {
            layers:   self.linear_stack(device),
            dropouts: self.dropouts(self.n_layers + 1),
        }
    }
}

// ─── PreProjection ────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct PreProjection<B: Backend> {
    pub layers:   Vec<Linear<B>>,
    /// One per transform except the last.
    pub dropouts: Vec<Dropout>,
}

impl<B: Backend> PreProjection<B> {
    /// x: [batch, seq_len, d_input] → [batch, seq_len, d_hidden]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.layers
            .iter()
            .enumerate()
            .fold(x, |x, (i, layer)| {
                let x = relu(layer.forward(x));
                match self.dropouts.get(i) {
                    Some(dropout) => dropout.forward(x),
                    None          => x,
                }
            })
    }

    pub fn num_transforms(&self) -> usize {
        self.layers.len()
    }
}

// ─── PostProjection ───────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct PostProjection<B: Backend> {
    pub layers:   Vec<Linear<B>>,
    /// One per transform, applied before it.
    pub dropouts: Vec<Dropout>,
}

impl<B: Backend> PostProjection<B> {
    /// x: [batch, seq_len, d_hidden] → [batch, seq_len, d_hidden]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let last = self.layers.len() - 1;
        self.layers
            .iter()
            .zip(&self.dropouts)
            .enumerate()
            .fold(x, |x, (i, (layer, dropout))| {
                let x = layer.forward(dropout.forward(x));
                if i < last { relu(x) } else { x }
            })
    }

    pub fn num_transforms(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray<f32>;

    fn input(shape: [usize; 3]) -> Tensor<TB, 3> {
        Tensor::random(shape, burn::tensor::Distribution::Normal(0.0, 1.0), &Default::default())
    }

    #[test]
    fn test_pre_stack_layout() {
        let pre = ProjectionConfig::new(3, 5, 2).init_pre::<TB>(&Default::default());
        assert_eq!(pre.num_transforms(), 3);
        assert_eq!(pre.dropouts.len(), 2);
        assert_eq!(pre.forward(input([2, 4, 3])).dims(), [2, 4, 5]);
    }

    #[test]
    fn test_post_stack_layout() {
        let post = ProjectionConfig::new(5, 5, 1).init_post::<TB>(&Default::default());
        assert_eq!(post.num_transforms(), 2);
        assert_eq!(post.dropouts.len(), 2);
        assert_eq!(post.forward(input([2, 4, 5])).dims(), [2, 4, 5]);
    }

    #[test]
    fn test_pre_output_is_non_negative() {
        // Every pre transform ends in ReLU.
        let pre = ProjectionConfig::new(3, 5, 1).init_pre::<TB>(&Default::default());
        let out = pre.forward(input([2, 3, 3])).into_data().to_vec::<f32>().unwrap();
        assert!(out.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_post_last_transform_is_raw() {
        // With a large negative bias on the last layer and no ReLU after it,
        // outputs must be able to go below zero.
        let device = Default::default();
        let mut post = ProjectionConfig::new(4, 4, 1).init_post::<TB>(&device);
        let last = post.layers.pop().unwrap();
        let bias = Tensor::<TB, 1>::full([4], -100.0, &device);
        post.layers.push(Linear {
            bias: Some(burn::module::Param::from_tensor(bias)),
            ..last
        });

        let out = post.forward(input([1, 2, 4])).into_data().to_vec::<f32>().unwrap();
        assert!(out.iter().all(|v| *v < 0.0));
    }

    #[test]
    fn test_pre_last_transform_is_never_dropped() {
        // Dropout only acts on an autodiff backend. The last layer maps
        // everything to ReLU(0·x + 1) = 1, so a dropout after it would
        // leave zeros (or twos) behind.
        type AD = burn::backend::Autodiff<NdArray<f32>>;
        let device = Default::default();
        let mut pre = ProjectionConfig::new(3, 5, 1)
            .with_dropout(0.5)
            .init_pre::<AD>(&device);
        pre.layers.pop();
        pre.layers.push(Linear {
            weight: burn::module::Param::from_tensor(Tensor::zeros([5, 5], &device)),
            bias:   Some(burn::module::Param::from_tensor(Tensor::ones([5], &device))),
        });

        let x = Tensor::<AD, 3>::random([4, 6, 3], burn::tensor::Distribution::Normal(0.0, 1.0), &device);
        let out = pre.forward(x).into_data().to_vec::<f32>().unwrap();
        assert_eq!(out, vec![1.0; 4 * 6 * 5]);
    }
}

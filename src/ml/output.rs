// ============================================================
// Layer 5 — Vocabulary Projection
// ============================================================
// [batch, seq_len, hidden] → raw logits [batch, seq_len, vocab]
// One linear transform, no activation.
//
// Weight tying is an explicit, opt-in relationship:
//   weight = Some(W)  → this layer owns W  [hidden, vocab]
//   weight = None     → the effective weight IS the embedding
//                       table transposed; the same Param is read,
//                       so any update to the table shows up here
// The bias always belongs to this layer.
//
// Reference: Press & Wolf (2017) Using the Output Embedding

use burn::{
    module::Param,
    prelude::*,
    tensor::Distribution,
};

use crate::ml::embedding::TokenEmbedding;

#[derive(Config, Debug)]
pub struct VocabProjectionConfig {
    pub d_hidden:   usize,
    pub vocab_size: usize,
    #[config(default = false)]
    pub tied:       bool,
}

impl VocabProjectionConfig {
    /// Uniform(-1/√d_hidden, 1/√d_hidden) init, as for a standard linear layer.
    pub fn init<B: Backend>(&self, device: &B::Device) -> VocabProjection<B> {
        let bound = 1.0 / (self.d_hidden as f64).sqrt();
        let uniform = || Distribution::Uniform(-bound, bound);

        let weight = (!self.tied).then(|| {
            Param::from_tensor(Tensor::random([self.d_hidden, self.vocab_size], uniform(), device))
        });
        let bias = Param::from_tensor(Tensor::random([self.vocab_size], uniform(), device));

        VocabProjection { weight, bias, vocab_size: self.vocab_size }
    }
}

#[derive(Module, Debug)]
pub struct VocabProjection<B: Backend> {
    /// Own weight [d_hidden, vocab_size]; `None` when tied to the embedding.
    pub weight:     Option<Param<Tensor<B, 2>>>,
    pub bias:       Param<Tensor<B, 1>>,
    pub vocab_size: usize,
}

impl<B: Backend> VocabProjection<B> {
    pub fn forward(&self, x: Tensor<B, 3>, embedding: &TokenEmbedding<B>) -> Tensor<B, 3> {
        let [batch, seq_len, d_hidden] = x.dims();
        let logits = x
            .reshape([batch * seq_len, d_hidden])
            .matmul(self.effective_weight(embedding))
            + self.bias.val().unsqueeze::<2>();
        logits.reshape([batch, seq_len, self.vocab_size])
    }

    /// The matrix actually used, [d_hidden, vocab_size].
    pub fn effective_weight(&self, embedding: &TokenEmbedding<B>) -> Tensor<B, 2> {
        match &self.weight {
            Some(weight) => weight.val(),
            None         => embedding.table().transpose(),
        }
    }

    pub fn is_tied(&self) -> bool {
        self.weight.is_none()
    }
}

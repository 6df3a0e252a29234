// ============================================================
// Layer 5 — Token Embedding
// ============================================================
// Lookup table of shape [vocab_size, embedding_dim].
//
// The padding row starts at zero and stays at zero:
//   1. init zeroes it once
//   2. mask_padding_grad() zeroes its gradient before every
//      optimizer step, so no update rule can move it
// The forward pass never re-zeroes anything.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    module::Param,
    optim::GradientsParams,
    prelude::*,
    tensor::{backend::AutodiffBackend, module::embedding, Distribution},
};

use crate::domain::error::{ModelError, ModelResult};

#[derive(Config, Debug)]
pub struct TokenEmbeddingConfig {
    pub vocab_size:    usize,
    pub embedding_dim: usize,
    pub padding_id:    usize,
}

impl TokenEmbeddingConfig {
    /// Weights ~ N(0, 1), padding row zero.
    pub fn init<B: Backend>(&self, device: &B::Device) -> TokenEmbedding<B> {
        let table = Tensor::<B, 2>::random(
            [self.vocab_size, self.embedding_dim],
            Distribution::Normal(0.0, 1.0),
            device,
        );
        TokenEmbedding {
            weight:     Param::from_tensor(zero_row(table, self.padding_id)),
            vocab_size: self.vocab_size,
            padding_id: self.padding_id,
        }
    }
}

#[derive(Module, Debug)]
pub struct TokenEmbedding<B: Backend> {
    /// [vocab_size, embedding_dim]; also the output weight when tied.
    pub weight:     Param<Tensor<B, 2>>,
    pub vocab_size: usize,
    pub padding_id: usize,
}

impl<B: Backend> TokenEmbedding<B> {
    /// token_ids: [batch, seq_len] → [batch, seq_len, embedding_dim]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> ModelResult<Tensor<B, 3>> {
        self.check_ids(&token_ids)?;
        Ok(embedding(self.weight.val(), token_ids))
    }

    /// Reject empty batches and ids outside `[0, vocab_size)` before any
    /// computation runs.
    pub fn check_ids(&self, token_ids: &Tensor<B, 2, Int>) -> ModelResult<()> {
        let [batch, seq_len] = token_ids.dims();
        if batch == 0 || seq_len == 0 {
            return Err(ModelError::ShapeMismatch {
                context:  "token ids",
                expected: vec![batch.max(1), seq_len.max(1)],
                actual:   vec![batch, seq_len],
            });
        }

        let min = token_ids.clone().min().into_scalar().elem::<i64>();
        if min < 0 {
            return Err(ModelError::TokenOutOfRange {
                token_id:   min,
                vocab_size: self.vocab_size,
            });
        }

        let max = token_ids.clone().max().into_scalar().elem::<i64>();
        if max >= self.vocab_size as i64 {
            return Err(ModelError::TokenOutOfRange {
                token_id:   max,
                vocab_size: self.vocab_size,
            });
        }

        Ok(())
    }

    /// The lookup table, [vocab_size, embedding_dim].
    pub fn table(&self) -> Tensor<B, 2> {
        self.weight.val()
    }

    pub fn embedding_dim(&self) -> usize {
        self.weight.val().dims()[1]
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn padding_id(&self) -> usize {
        self.padding_id
    }
}

impl<B: AutodiffBackend> TokenEmbedding<B> {
    /// Zero the padding row of this table's gradient, if one was recorded.
    pub fn mask_padding_grad(&self, grads: &mut GradientsParams) {
        let id = self.weight.id;
        if let Some(grad) = grads.remove::<B::InnerBackend, 2>(id) {
            grads.register::<B::InnerBackend, 2>(id, zero_row(grad, self.padding_id));
        }
    }
}

/// Overwrite one row of a matrix with zeros.
fn zero_row<B: Backend>(matrix: Tensor<B, 2>, row: usize) -> Tensor<B, 2> {
    let [_, cols] = matrix.dims();
    let zeros = Tensor::zeros([1, cols], &matrix.device());
    matrix.slice_assign([row..row + 1, 0..cols], zeros)
}

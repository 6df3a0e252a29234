// ============================================================
// Layer 5 — Residual Recurrent Language Model
// ============================================================
// token ids [B, S]
//   → TokenEmbedding            [B, S, E]
//   → embedding dropout
//   → PreProjection             [B, S, H]
//   → ResidualRecurrentBlock    [B, S, H]
//   → PostProjection            [B, S, H]
//   → VocabProjection           [B, S, V]  raw logits
//
// The configuration is validated once in ModelConfig::init.
// A forward call only checks what the embedding checks (token
// ids in range, non-empty batch).
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    nn::{Dropout, DropoutConfig},
    prelude::*,
};

use crate::domain::error::ModelResult;
use crate::ml::{
    config::ModelConfig,
    embedding::{TokenEmbedding, TokenEmbeddingConfig},
    output::{VocabProjection, VocabProjectionConfig},
    projection::{PostProjection, PreProjection, ProjectionConfig},
    recurrent::{ResidualRecurrentBlock, ResidualRecurrentBlockConfig},
};

impl ModelConfig {
    /// Validate the configuration and build a freshly initialised model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> ModelResult<LanguageModel<B>> {
        self.validate()?;

        let embedding = TokenEmbeddingConfig::new(
            self.vocab_size, self.embedding_dim, self.padding_id,
        ).init(device);
        let embedding_dropout = DropoutConfig::new(self.embedding_dropout).init();

        let pre = ProjectionConfig::new(self.embedding_dim, self.hidden_dim, self.n_pre_layers)
            .with_dropout(self.hidden_dropout)
            .init_pre(device);
        let block = ResidualRecurrentBlockConfig::new(self.hidden_dim, self.n_recurrent_layers)
            .with_dropout(self.hidden_dropout)
            .with_cell_variant(self.cell_variant)
            .init(device);
        let post = ProjectionConfig::new(self.hidden_dim, self.hidden_dim, self.n_post_layers)
            .with_dropout(self.hidden_dropout)
            .init_post(device);
        let output = VocabProjectionConfig::new(self.hidden_dim, self.vocab_size)
            .with_tied(self.tie_output_weights)
            .init(device);

        tracing::debug!(
            "Built {} model: vocab={}, emb={}, hid={}, layers={}/{}/{}, tied={}",
            self.cell_variant,
            self.vocab_size,
            self.embedding_dim,
            self.hidden_dim,
            self.n_pre_layers,
            self.n_recurrent_layers,
            self.n_post_layers,
            self.tie_output_weights,
        );

        Ok(LanguageModel { embedding, embedding_dropout, pre, block, post, output })
    }
}

#[derive(Module, Debug)]
pub struct LanguageModel<B: Backend> {
    pub embedding:         TokenEmbedding<B>,
    pub embedding_dropout: Dropout,
    pub pre:               PreProjection<B>,
    pub block:             ResidualRecurrentBlock<B>,
    pub post:              PostProjection<B>,
    pub output:            VocabProjection<B>,
}

impl<B: Backend> LanguageModel<B> {
    /// token_ids: [batch, seq_len] → logits [batch, seq_len, vocab_size]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> ModelResult<Tensor<B, 3>> {
        let x = self.embedding.forward(token_ids)?;
        let x = self.embedding_dropout.forward(x);
        let x = self.pre.forward(x);
        let x = self.block.forward(x)?;
        let x = self.post.forward(x);
        Ok(self.output.forward(x, &self.embedding))
    }

    pub fn vocab_size(&self) -> usize {
        self.embedding.vocab_size()
    }

    pub fn padding_id(&self) -> usize {
        self.embedding.padding_id()
    }

    pub fn is_tied(&self) -> bool {
        self.output.is_tied()
    }

    /// Effective output weight [hidden_dim, vocab_size].
    pub fn output_weight(&self) -> Tensor<B, 2> {
        self.output.effective_weight(&self.embedding)
    }
}

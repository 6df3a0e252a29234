// ============================================================
// Layer 5 — Next-Token Predictor
// ============================================================
// Runs the model over a padded batch and reads the distribution
// after each sequence's last real token. Softmax is applied here
// for display only; the model itself returns raw logits.
use anyhow::{Context, Result};
use burn::{prelude::*, tensor::activation::softmax};

use crate::data::batcher::TokenBatch;
use crate::infra::model_store::ModelStore;
use crate::ml::{config::ModelConfig, model::LanguageModel};

/// One candidate next token.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub token_id:    u32,
    pub probability: f32,
}

pub struct Predictor<B: Backend> {
    model:  LanguageModel<B>,
    config: ModelConfig,
}

impl<B: Backend> Predictor<B> {
    pub fn new(model: LanguageModel<B>, config: ModelConfig) -> Self {
        Self { model, config }
    }

    pub fn from_store(store: &ModelStore, device: &B::Device) -> Result<Self> {
        let (model, config) = store.load::<B>(device)?;
        tracing::info!("Model loaded from '{}'", store.dir().display());
        Ok(Self::new(model, config))
    }

    pub fn model(&self) -> &LanguageModel<B> {
        &self.model
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Top-`top_k` next tokens for every sequence in the batch.
    pub fn predict_next(&self, batch: TokenBatch<B>, top_k: usize) -> Result<Vec<Vec<Prediction>>> {
        let logits = self.model.forward(batch.input_ids)?;
        let [_, _, vocab] = logits.dims();

        batch
            .lengths
            .iter()
            .enumerate()
            .map(|(row, &len)| {
                let pos = len.saturating_sub(1);
                let row_logits = logits
                    .clone()
                    .slice([row..row + 1, pos..pos + 1, 0..vocab])
                    .reshape([1, vocab]);
                let probs = softmax(row_logits, 1)
                    .into_data()
                    .to_vec::<f32>()
                    .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))
                    .with_context(|| format!("Sequence {row}"))?;
                Ok(top_k_of(&probs, top_k))
            })
            .collect()
    }
}

/// Highest-probability entries, best first; ties keep the lower id first.
pub fn top_k_of(probs: &[f32], k: usize) -> Vec<Prediction> {
    let mut ranked: Vec<Prediction> = probs
        .iter()
        .enumerate()
        .map(|(id, &p)| Prediction { token_id: id as u32, probability: p })
        .collect();
    ranked.sort_by(|a, b| {
        b.probability
            .total_cmp(&a.probability)
            .then(a.token_id.cmp(&b.token_id))
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::TokenBatcher;
    use crate::ml::config::CellVariant;
    use burn::backend::NdArray;
    use burn::data::dataloader::batcher::Batcher;

    type TB = NdArray<f32>;

    #[test]
    fn test_top_k_order() {
        let top = top_k_of(&[0.1, 0.4, 0.2, 0.4], 3);
        let ids: Vec<u32> = top.iter().map(|p| p.token_id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn test_top_k_larger_than_vocab() {
        assert_eq!(top_k_of(&[0.5, 0.5], 10).len(), 2);
    }

    #[test]
    fn test_predict_next_distribution() {
        let device = Default::default();
        let config = ModelConfig::new(9, 2)
            .with_embedding_dim(4)
            .with_hidden_dim(4)
            .with_cell_variant(CellVariant::Basic);
        let model = config.init::<TB>(&device).unwrap();
        let predictor = Predictor::new(model, config);

        let batch = TokenBatcher::<TB>::new(device, 2).batch(vec![vec![1, 3, 4], vec![5]]);
        let preds = predictor.predict_next(batch, 9).unwrap();

        assert_eq!(preds.len(), 2);
        for row in preds {
            assert_eq!(row.len(), 9);
            let total: f32 = row.iter().map(|p| p.probability).sum();
            assert!((total - 1.0).abs() < 1e-4);
            assert!(row.windows(2).all(|w| w[0].probability >= w[1].probability));
        }
    }
}

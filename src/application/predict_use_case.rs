// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Next-token prediction for raw text:
//   1. Encode each text with the bundle's tokenizer
//   2. Right-pad the id sequences into one batch
//   3. Run the model and read the distribution after the
//      last real token of every text
//   4. Turn the winning ids back into tokens

use anyhow::{bail, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::batcher::TokenBatcher;
use crate::domain::traits::{TextCodec, Vocabulary};
use crate::infra::{
    model_store::ModelStore,
    tokenizer_store::{TokenizerStore, TokenizerVocabulary},
};
use crate::ml::inferencer::Predictor;

/// Ranked next-token guesses for one input text.
#[derive(Debug, Clone)]
pub struct TextPrediction {
    pub text:       String,
    pub candidates: Vec<(String, f32)>,
}

pub struct PredictUseCase<B: Backend> {
    vocab:     TokenizerVocabulary,
    predictor: Predictor<B>,
    device:    B::Device,
}

impl<B: Backend> PredictUseCase<B> {
    pub fn new(tokenizer_dir: &str, model_dir: &str, device: B::Device) -> Result<Self> {
        let vocab     = TokenizerStore::new(tokenizer_dir).load()?;
        let predictor = Predictor::<B>::from_store(&ModelStore::new(model_dir), &device)?;

        let cfg = predictor.config();
        if cfg.vocab_size != vocab.vocab_size() || cfg.padding_id != vocab.padding_id() {
            bail!(
                "Tokenizer (vocab={}, pad={}) does not match model (vocab={}, pad={})",
                vocab.vocab_size(),
                vocab.padding_id(),
                cfg.vocab_size,
                cfg.padding_id
            );
        }

        Ok(Self { vocab, predictor, device })
    }

    pub fn predict(
        &self,
        texts:       &[String],
        top_k:       usize,
        max_seq_len: Option<usize>,
    ) -> Result<Vec<TextPrediction>> {
        if texts.is_empty() {
            bail!("Nothing to predict: no input text given");
        }

        let encoded = texts
            .iter()
            .map(|text| self.prompt_ids(text, max_seq_len))
            .collect::<Result<Vec<_>>>()?;
        if let Some(i) = encoded.iter().position(Vec::is_empty) {
            bail!("Text '{}' produced no tokens", texts[i]);
        }
        tracing::debug!(
            "Encoded {} texts, longest {} tokens",
            encoded.len(),
            encoded.iter().map(Vec::len).max().unwrap_or(0)
        );

        let pad     = self.predictor.config().padding_id as u32;
        let batcher = TokenBatcher::<B>::new(self.device.clone(), pad);
        let ranked  = self.predictor.predict_next(batcher.batch(encoded), top_k)?;

        texts
            .iter()
            .zip(ranked)
            .map(|(text, preds)| {
                let candidates = preds
                    .into_iter()
                    .map(|p| Ok((self.token_text(p.token_id)?, p.probability)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TextPrediction { text: text.clone(), candidates })
            })
            .collect()
    }

    /// Ids the model continues from: the encoded text without the trailing
    /// `[eos]` a post-processor may append, then truncated to `max_seq_len`.
    fn prompt_ids(&self, text: &str, max_seq_len: Option<usize>) -> Result<Vec<u32>> {
        let mut ids = self.vocab.encode(text, None)?;
        if ids.last() == Some(&self.vocab.special_tokens().eos) {
            ids.pop();
        }
        if let Some(max) = max_seq_len {
            ids.truncate(max);
        }
        Ok(ids)
    }

    fn token_text(&self, id: u32) -> Result<String> {
        let text = self.vocab.decode(&[id], false)?;
        Ok(if text.is_empty() { format!("<{id}>") } else { text })
    }
}

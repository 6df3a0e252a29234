// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Builds a fresh, untrained model bundle:
//
//   Step 1: Load the tokenizer          (Layer 6 - infra)
//   Step 2: Size the model from it      (Layer 5 - ml)
//   Step 3: Initialise all parameters   (Layer 5 - ml)
//   Step 4: Save config + weights       (Layer 6 - infra)
//
// The tokenizer fixes vocab_size and padding_id; every other
// hyperparameter comes from InitConfig.

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

use crate::application::inspect_use_case::ModelSummary;
use crate::infra::{model_store::ModelStore, tokenizer_store::TokenizerStore};
use crate::ml::config::ModelConfig;

// ─── Init Configuration ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    pub tokenizer_dir:      String,
    pub model_dir:          String,
    pub embedding_dim:      usize,
    pub hidden_dim:         usize,
    pub n_pre_layers:       usize,
    pub n_recurrent_layers: usize,
    pub n_post_layers:      usize,
    pub embedding_dropout:  f64,
    pub hidden_dropout:     f64,
    pub cell_variant:       String,
    pub tie_output_weights: bool,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            tokenizer_dir:      "tokenizer".to_string(),
            model_dir:          "model".to_string(),
            embedding_dim:      100,
            hidden_dim:         300,
            n_pre_layers:       1,
            n_recurrent_layers: 1,
            n_post_layers:      1,
            embedding_dropout:  0.1,
            hidden_dropout:     0.1,
            cell_variant:       "gated".to_string(),
            tie_output_weights: false,
        }
    }
}

// ─── InitUseCase ──────────────────────────────────────────────────────────────
pub struct InitUseCase {
    config: InitConfig,
}

impl InitUseCase {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    /// Resolve the full ModelConfig against the tokenizer's vocabulary.
    pub fn model_config(&self) -> Result<ModelConfig> {
        let cfg = &self.config;
        let vocab = TokenizerStore::new(&cfg.tokenizer_dir).load()?;

        let model_cfg = ModelConfig::for_vocabulary(&vocab)
            .with_embedding_dim(cfg.embedding_dim)
            .with_hidden_dim(cfg.hidden_dim)
            .with_n_pre_layers(cfg.n_pre_layers)
            .with_n_recurrent_layers(cfg.n_recurrent_layers)
            .with_n_post_layers(cfg.n_post_layers)
            .with_embedding_dropout(cfg.embedding_dropout)
            .with_hidden_dropout(cfg.hidden_dropout)
            .with_tie_output_weights(cfg.tie_output_weights)
            .with_cell_variant_name(&cfg.cell_variant)?;

        model_cfg.validate()?;
        Ok(model_cfg)
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ModelSummary> {
        let model_cfg = self.model_config()?;

        tracing::info!(
            "Initialising {} model: vocab={}, E={}, H={}",
            model_cfg.cell_variant,
            model_cfg.vocab_size,
            model_cfg.embedding_dim,
            model_cfg.hidden_dim
        );

        let model = model_cfg
            .init::<B>(device)
            .context("Cannot build model from the given hyperparameters")?;

        let store = ModelStore::new(&self.config.model_dir);
        if store.exists() {
            tracing::warn!("Overwriting existing bundle in '{}'", self.config.model_dir);
        }
        store.save(&model, &model_cfg)?;

        Ok(ModelSummary::new(model_cfg, model.num_params()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::fixtures;
    use burn::backend::NdArray;

    type TB = NdArray<f32>;

    fn config(dir: &std::path::Path) -> InitConfig {
        fixtures::write_tokenizer(&dir.join("tok"));
        InitConfig {
            tokenizer_dir: dir.join("tok").display().to_string(),
            model_dir:     dir.join("model").display().to_string(),
            embedding_dim: 6,
            hidden_dim:    6,
            ..InitConfig::default()
        }
    }

    #[test]
    fn test_init_writes_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let summary = InitUseCase::new(cfg.clone()).execute::<TB>(&Default::default()).unwrap();

        assert_eq!(summary.config.vocab_size, 10);
        assert_eq!(summary.config.padding_id, 2);
        assert!(summary.num_params > 0);
        assert!(ModelStore::new(&cfg.model_dir).exists());
    }

    #[test]
    fn test_tied_init_has_fewer_params() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let untied = InitUseCase::new(cfg.clone()).execute::<TB>(&Default::default()).unwrap();
        let tied = InitUseCase::new(InitConfig { tie_output_weights: true, ..cfg })
            .execute::<TB>(&Default::default())
            .unwrap();

        assert_eq!(untied.num_params - tied.num_params, 10 * 6);
    }

    #[test]
    fn test_rejects_bad_hyperparameters() {
        let dir = tempfile::tempdir().unwrap();
        let base = config(dir.path());

        let bad_cell = InitConfig { cell_variant: "lstm".to_string(), ..base.clone() };
        assert!(InitUseCase::new(bad_cell).model_config().is_err());

        let bad_tie = InitConfig { hidden_dim: 8, tie_output_weights: true, ..base.clone() };
        assert!(InitUseCase::new(bad_tie).model_config().is_err());

        let bad_dropout = InitConfig { hidden_dropout: 1.5, ..base };
        assert!(InitUseCase::new(bad_dropout).model_config().is_err());
    }
}

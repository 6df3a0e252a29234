// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Reads a saved bundle back and reports what it contains.

use anyhow::Result;
use burn::prelude::*;

use crate::infra::model_store::ModelStore;
use crate::ml::config::ModelConfig;

/// Stored configuration plus the parameter count it produces.
#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub config:     ModelConfig,
    pub num_params: usize,
}

impl ModelSummary {
    pub fn new(config: ModelConfig, num_params: usize) -> Self {
        Self { config, num_params }
    }
}

impl std::fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = &self.config;
        writeln!(f, "cell variant         : {}", c.cell_variant)?;
        writeln!(f, "vocab size           : {}", c.vocab_size)?;
        writeln!(f, "padding id           : {}", c.padding_id)?;
        writeln!(f, "embedding dim        : {}", c.embedding_dim)?;
        writeln!(f, "hidden dim           : {}", c.hidden_dim)?;
        writeln!(
            f,
            "layers (pre/rnn/post): {}/{}/{}",
            c.n_pre_layers, c.n_recurrent_layers, c.n_post_layers
        )?;
        writeln!(
            f,
            "dropout (emb/hidden) : {}/{}",
            c.embedding_dropout, c.hidden_dropout
        )?;
        writeln!(f, "tied output          : {}", c.tie_output_weights)?;
        write!(f, "parameters           : {}", self.num_params)
    }
}

pub struct InspectUseCase {
    store: ModelStore,
}

impl InspectUseCase {
    pub fn new(model_dir: impl Into<std::path::PathBuf>) -> Self {
        Self { store: ModelStore::new(model_dir) }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ModelSummary> {
        let (model, config) = self.store.load::<B>(device)?;
        Ok(ModelSummary::new(config, model.num_params()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray<f32>;

    #[test]
    fn test_inspect_reports_saved_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ModelConfig::new(10, 0).with_embedding_dim(4).with_hidden_dim(4);
        let model = cfg.init::<TB>(&Default::default()).unwrap();
        ModelStore::new(dir.path()).save(&model, &cfg).unwrap();

        let summary = InspectUseCase::new(dir.path()).execute::<TB>(&Default::default()).unwrap();
        assert_eq!(summary.num_params, model.num_params());
        assert_eq!(summary.config.hidden_dim, 4);
        assert!(summary.to_string().contains("parameters"));
    }

    #[test]
    fn test_inspect_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InspectUseCase::new(dir.path()).execute::<TB>(&Default::default()).is_err());
    }
}

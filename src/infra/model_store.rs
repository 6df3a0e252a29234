// ============================================================
// Layer 6 — Model Store
// ============================================================
// Saves and restores a complete model bundle.
//
// What gets saved:
//   1. model_config.json — the ModelConfig (architecture + vocab)
//   2. model.mpk.gz      — every parameter, keyed by module path:
//                            embedding.weight
//                            pre.layers.<i>.{weight,bias}
//                            block.cells.<i>.…
//                            post.layers.<i>.{weight,bias}
//                            output.{weight,bias}
//
// The config alone is enough to rebuild the exact architecture,
// then the record is loaded into it. Weights are stored at full
// precision so a reloaded model reproduces the saved one exactly.
//
// Layout:
//   <dir>/
//     model_config.json
//     model.mpk.gz
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::ml::{config::ModelConfig, model::LanguageModel};

const CONFIG_FILE:  &str = "model_config.json";
const WEIGHTS_FILE: &str = "model";

type BundleRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when a config has been written to this directory.
    pub fn exists(&self) -> bool {
        self.dir.join(CONFIG_FILE).exists()
    }

    /// Write config and weights. Creates the directory if needed.
    pub fn save<B: Backend>(&self, model: &LanguageModel<B>, cfg: &ModelConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        self.save_config(cfg)?;

        let path = self.dir.join(WEIGHTS_FILE);
        BundleRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))?;

        tracing::info!("Saved model bundle to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild the model from the stored config, then load its weights.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<(LanguageModel<B>, ModelConfig)> {
        let cfg = self.load_config()?;
        let model: LanguageModel<B> = cfg
            .init(device)
            .with_context(|| format!("Invalid config in '{}'", self.dir.display()))?;

        let path = self.dir.join(WEIGHTS_FILE);
        let record = BundleRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load weights '{}'. Have you run 'init' first?", path.display())
            })?;

        tracing::debug!("Loaded weights from '{}'", path.display());
        Ok((model.load_record(record), cfg))
    }

    pub fn save_config(&self, cfg: &ModelConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<ModelConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'init' first.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::config::CellVariant;
    use burn::backend::NdArray;

    type TB = NdArray<f32>;

    fn ids() -> Tensor<TB, 2, Int> {
        Tensor::from_data(TensorData::new(vec![1, 4, 2, 2, 3, 5, 6, 2], [2, 4]), &Default::default())
    }

    fn logits(model: &LanguageModel<TB>) -> Vec<f32> {
        model.forward(ids()).unwrap().into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_bundle_reproduces_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("bundle"));
        assert!(!store.exists());

        for (variant, tied) in [(CellVariant::Gated, false), (CellVariant::Basic, true)] {
            let cfg = ModelConfig::new(8, 2)
                .with_embedding_dim(5)
                .with_hidden_dim(5)
                .with_n_recurrent_layers(2)
                .with_embedding_dropout(0.0)
                .with_hidden_dropout(0.0)
                .with_cell_variant(variant)
                .with_tie_output_weights(tied);
            let model = cfg.init::<TB>(&Default::default()).unwrap();
            store.save(&model, &cfg).unwrap();
            assert!(store.exists());

            let (loaded, loaded_cfg) = store.load::<TB>(&Default::default()).unwrap();
            assert_eq!(loaded_cfg.cell_variant, variant);
            assert_eq!(loaded.is_tied(), tied);
            assert_eq!(logits(&loaded), logits(&model));
        }
    }

    #[test]
    fn test_missing_bundle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let err = store.load::<TB>(&Default::default()).unwrap_err();
        assert!(err.to_string().contains("Cannot read config"));
    }

    #[test]
    fn test_invalid_stored_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        store
            .save_config(&ModelConfig::new(8, 2).with_n_post_layers(0))
            .unwrap();
        assert!(store.load::<TB>(&Default::default()).is_err());
    }
}

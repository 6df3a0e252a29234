// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace tokenizer.json and exposes it to the model
// through the Vocabulary / TextCodec traits.
//
// Training a tokenizer is done elsewhere; this store only reads
// <dir>/tokenizer.json. The reserved tokens are looked up by name
// ([bos], [eos], [pad], [unk]) so their ids come from the file,
// not from constants.
//
// Reference: HuggingFace tokenizers documentation

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::domain::{
    traits::{TextCodec, Vocabulary},
    vocabulary::{SpecialTokens, BOS_TOKEN, EOS_TOKEN, PAD_TOKEN, UNK_TOKEN},
};

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load a previously trained tokenizer from JSON file
    pub fn load(&self) -> Result<TokenizerVocabulary> {
        let path = self.path();
        let tokenizer = Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;
        let vocab = TokenizerVocabulary::new(tokenizer)
            .with_context(|| format!("Tokenizer '{}' is unusable", path.display()))?;

        tracing::info!(
            "Loaded tokenizer: vocab_size={}, pad_id={}",
            vocab.vocab_size(),
            vocab.padding_id()
        );
        Ok(vocab)
    }
}

/// A tokenizer plus the ids of its reserved tokens.
pub struct TokenizerVocabulary {
    tokenizer: Tokenizer,
    special:   SpecialTokens,
}

impl TokenizerVocabulary {
    pub fn new(tokenizer: Tokenizer) -> Result<Self> {
        let id_of = |token: &str| {
            tokenizer
                .token_to_id(token)
                .with_context(|| format!("Missing reserved token '{token}'"))
        };
        let special = SpecialTokens {
            bos: id_of(BOS_TOKEN)?,
            eos: id_of(EOS_TOKEN)?,
            pad: id_of(PAD_TOKEN)?,
            unk: id_of(UNK_TOKEN)?,
        };
        Ok(Self { tokenizer, special })
    }

    pub fn special_tokens(&self) -> SpecialTokens {
        self.special
    }
}

impl Vocabulary for TokenizerVocabulary {
    fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(true)
    }

    fn padding_id(&self) -> usize {
        self.special.pad as usize
    }
}

impl TextCodec for TokenizerVocabulary {
    fn encode(&self, text: &str, max_seq_len: Option<usize>) -> Result<Vec<u32>> {
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        let mut ids = enc.get_ids().to_vec();
        if let Some(max) = max_seq_len {
            ids.truncate(max);
        }
        Ok(ids)
    }

    fn decode(&self, ids: &[u32], skip_special: bool) -> Result<String> {
        let ids: Vec<u32> = if skip_special {
            ids.iter().copied().filter(|id| !self.special.contains(*id)).collect()
        } else {
            ids.to_vec()
        };
        self.tokenizer
            .decode(&ids, false)
            .map_err(|e| anyhow::anyhow!("Decode: {e}"))
    }
}

/// A small word-level tokenizer in HuggingFace format, for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    pub const WORDS: [&str; 6] = ["hello", "world", "the", "cat", "sat", "down"];

    /// Writes `<dir>/tokenizer.json` with ids:
    /// [bos]=0 [eos]=1 [pad]=2 [unk]=3, then WORDS from 4.
    pub fn write_tokenizer(dir: &Path) {
        write(dir, serde_json::Value::Null);
    }

    /// Same vocabulary, but encoding wraps every text as `[bos] … [eos]`.
    pub fn write_bert_tokenizer(dir: &Path) {
        write(dir, serde_json::json!({
            "type": "BertProcessing",
            "sep": ["[eos]", 1],
            "cls": ["[bos]", 0]
        }));
    }

    fn write(dir: &Path, post_processor: serde_json::Value) {
        let mut vocab = serde_json::json!({
            "[bos]": 0,
            "[eos]": 1,
            "[pad]": 2,
            "[unk]": 3,
        });
        for (i, w) in WORDS.iter().enumerate() {
            vocab[*w] = serde_json::json!(4 + i);
        }

        let special = |id: u32, content: &str| serde_json::json!({
            "id": id, "content": content, "single_word": false, "lstrip": false,
            "rstrip": false, "normalized": false, "special": true
        });

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                special(0, "[bos]"),
                special(1, "[eos]"),
                special(2, "[pad]"),
                special(3, "[unk]"),
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": post_processor,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[unk]"
            }
        });

        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join("tokenizer.json"),
            serde_json::to_string_pretty(&tokenizer_json).unwrap(),
        )
        .unwrap();
    }
}

// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `init`, `predict` and `inspect` and
// all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::init_use_case::InitConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a fresh model sized to a tokenizer and save it
    Init(InitArgs),

    /// Show the most likely next tokens for some text
    Predict(PredictArgs),

    /// Print the configuration and size of a saved model
    Inspect(InspectArgs),
}

/// All arguments for the `init` command.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory containing tokenizer.json
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    /// Directory to write the model bundle to
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Width of each token embedding (E)
    #[arg(long, default_value_t = 100)]
    pub embedding_dim: usize,

    /// Width of the hidden representation (H)
    #[arg(long, default_value_t = 300)]
    pub hidden_dim: usize,

    /// Extra H→H layers after the first projection
    #[arg(long, default_value_t = 1)]
    pub n_pre_layers: usize,

    /// Stacked residual recurrent layers
    #[arg(long, default_value_t = 1)]
    pub n_recurrent_layers: usize,

    /// H→H layers before the final projection
    #[arg(long, default_value_t = 1)]
    pub n_post_layers: usize,

    /// Dropout applied to the embeddings
    #[arg(long, default_value_t = 0.1)]
    pub embedding_dropout: f64,

    /// Dropout applied between hidden layers
    #[arg(long, default_value_t = 0.1)]
    pub hidden_dropout: f64,

    /// Recurrent cell: basic (res-RNN) or gated (res-GRU)
    #[arg(long, default_value = "gated")]
    pub cell: String,

    /// Share the embedding table with the output layer (needs E == H)
    #[arg(long)]
    pub tie_weights: bool,
}

impl From<InitArgs> for InitConfig {
    fn from(a: InitArgs) -> Self {
        InitConfig {
            tokenizer_dir:      a.tokenizer_dir,
            model_dir:          a.model_dir,
            embedding_dim:      a.embedding_dim,
            hidden_dim:         a.hidden_dim,
            n_pre_layers:       a.n_pre_layers,
            n_recurrent_layers: a.n_recurrent_layers,
            n_post_layers:      a.n_post_layers,
            embedding_dropout:  a.embedding_dropout,
            hidden_dropout:     a.hidden_dropout,
            cell_variant:       a.cell,
            tie_output_weights: a.tie_weights,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Input text; repeat the flag to predict for several texts at once
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    /// Number of candidates to show per text
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,

    /// Truncate each encoded text to this many tokens
    #[arg(long)]
    pub max_seq_len: Option<usize>,

    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_dir: String,

    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[arg(long, default_value = "model")]
    pub model_dir: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_init_args_convert() {
        let cli = Cli::parse_from([
            "res-rnn-lm", "init", "--hidden-dim", "100", "--cell", "res-RNN", "--tie-weights",
        ]);
        let Commands::Init(args) = cli.command else { panic!("expected init") };
        let cfg: InitConfig = args.into();
        assert_eq!(cfg.hidden_dim, 100);
        assert_eq!(cfg.cell_variant, "res-RNN");
        assert!(cfg.tie_output_weights);
        assert_eq!(cfg.embedding_dim, 100);
    }

    #[test]
    fn test_predict_accepts_many_texts() {
        let cli = Cli::parse_from([
            "res-rnn-lm", "predict", "--text", "the cat", "--text", "hello", "--top-k", "2",
        ]);
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.texts, vec!["the cat", "hello"]);
        assert_eq!(args.top_k, 2);
        assert_eq!(args.max_seq_len, None);
    }

    #[test]
    fn test_predict_requires_text() {
        assert!(Cli::try_parse_from(["res-rnn-lm", "predict"]).is_err());
    }
}

// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `init`    — build and save an untrained model
//   2. `predict` — top-k next tokens for one or more texts
//   3. `inspect` — show a saved model's configuration
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitArgs, InspectArgs, PredictArgs};

type InferBackend = burn::backend::Wgpu;

#[derive(Parser, Debug)]
#[command(
    name = "res-rnn-lm",
    version = "0.1.0",
    about = "Residual recurrent language model: build, inspect and query model bundles."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args)    => Self::run_init(args),
            Commands::Predict(args) => Self::run_predict(args),
            Commands::Inspect(args) => Self::run_inspect(args),
        }
    }

    fn run_init(args: InitArgs) -> Result<()> {
        use crate::application::init_use_case::InitUseCase;

        let model_dir = args.model_dir.clone();
        let device    = burn::backend::wgpu::WgpuDevice::default();
        let summary   = InitUseCase::new(args.into()).execute::<InferBackend>(&device)?;

        println!("Model saved to '{}'.\n{}", model_dir, summary);
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let device   = burn::backend::wgpu::WgpuDevice::default();
        let use_case = PredictUseCase::<InferBackend>::new(
            &args.tokenizer_dir,
            &args.model_dir,
            device,
        )?;

        for p in use_case.predict(&args.texts, args.top_k, args.max_seq_len)? {
            println!("\n{}", p.text);
            for (rank, (token, prob)) in p.candidates.iter().enumerate() {
                println!("  {:>2}. {:<20} {:.4}", rank + 1, token, prob);
            }
        }
        Ok(())
    }

    fn run_inspect(args: InspectArgs) -> Result<()> {
        use crate::application::inspect_use_case::InspectUseCase;

        let device  = burn::backend::wgpu::WgpuDevice::default();
        let summary = InspectUseCase::new(&args.model_dir).execute::<InferBackend>(&device)?;

        println!("{}", summary);
        Ok(())
    }
}

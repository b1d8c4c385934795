// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Arguments are parsed
// with clap and all business logic is delegated to Layer 2.
//
// Two commands are supported:
//   1. `train`   — trains the model on a prepared dataset
//   2. `predict` — loads a checkpoint and answers a question

pub mod commands;

use anyhow::Result;
use clap::Parser;

use commands::{Commands, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "bidaf",
    version = "0.1.0",
    about = "Train a bidirectional attention flow model, then answer questions against passages."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This layer only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on dataset in: {}", args.data_dir);

        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::{PredictOptions, PredictUseCase};
        use crate::domain::traits::QuestionAnswerer;

        let options = PredictOptions {
            squad_version: args
                .squad_version
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
            max_span_length: args.max_span_length,
            lowercase: !args.keep_case,
        };

        let use_case = PredictUseCase::new(&args.checkpoint_dir, options)?;
        let prediction = use_case.answer(&args.passage, &args.question)?;

        match &prediction.answer {
            Some(answer) => {
                println!("\nAnswer: {}", answer.text);
                if args.char_offsets {
                    println!("Offsets: [{}, {})", answer.byte_start, answer.byte_end);
                }
            }
            None => println!("\nNo answer found in the passage."),
        }
        println!(
            "Span: [{}, {}]  Confidence: {:.4}",
            prediction.answer_span.span.start,
            prediction.answer_span.span.end,
            prediction.answer_span.confidence,
        );
        Ok(())
    }
}

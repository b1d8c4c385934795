// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and all
// their configurable flags. clap's derive macros generate the
// help text, error messages and type conversion.

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the attention-flow model on a prepared dataset
    Train(TrainArgs),

    /// Answer a question against a passage using a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory with train.context/question/span and dev.* files
    #[arg(long, default_value = "data/squad")]
    pub data_dir: String,

    /// GloVe-format word-vector file used for both training and
    /// prediction
    #[arg(long, default_value = "data/glove.txt")]
    pub embeddings: String,

    /// Directory to save model checkpoints and the run config
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Width of the input word vectors
    #[arg(long, default_value_t = 100)]
    pub emdim: usize,

    /// Stacked highway layers applied to both input sequences
    #[arg(long, default_value_t = 2)]
    pub num_highway_layers: usize,

    /// Stacked bidirectional encoders refining the merged context
    #[arg(long, default_value_t = 1)]
    pub num_modeling_layers: usize,

    /// Dropout on encoder inputs during training
    #[arg(long, default_value_t = 0.0)]
    pub encoder_dropout: f64,

    /// Dropout between modeling encoders during training
    #[arg(long, default_value_t = 0.0)]
    pub decoder_dropout: f64,

    /// Number of examples per forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Keep the training examples in file order instead of shuffling
    #[arg(long)]
    pub no_shuffle: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir: a.data_dir,
            embeddings_file: a.embeddings,
            checkpoint_dir: a.checkpoint_dir,
            emdim: a.emdim,
            num_highway_layers: a.num_highway_layers,
            num_modeling_layers: a.num_modeling_layers,
            encoder_dropout: a.encoder_dropout,
            decoder_dropout: a.decoder_dropout,
            batch_size: a.batch_size,
            epochs: a.epochs,
            lr: a.lr,
            shuffle: !a.no_shuffle,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    /// The passage to search for the answer
    #[arg(long)]
    pub passage: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Dataset flavor: "1.1" always answers, "2.0" reserves the
    /// no-answer sentinel
    #[arg(long, default_value = "1.1")]
    pub squad_version: String,

    /// Longest answer span considered, in tokens
    #[arg(long, default_value_t = 25)]
    pub max_span_length: usize,

    /// Keep the original casing instead of lowercasing the inputs
    #[arg(long)]
    pub keep_case: bool,

    /// Also print the answer's byte offsets into the passage
    #[arg(long)]
    pub char_offsets: bool,
}

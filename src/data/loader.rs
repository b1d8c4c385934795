// ============================================================
// Layer 4 — Training File Loader
// ============================================================
// Reads one dataset split from the parallel-file layout:
//
//   {split}.context   — space-separated passage tokens, one per line
//   {split}.question  — space-separated question tokens, one per line
//   {split}.span      — "start end" inclusive token indices, one per line
//
// Line N of the three files describes example N; the loader
// validates that the files agree in length, that every span parses,
// that start <= end, and that the span fits inside its passage.
// Malformed input is a typed error, never a silent skip.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::data::dataset::BidafSample;
use crate::domain::span::SpanLabel;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("split '{split}': {contexts} contexts, {questions} questions, {spans} spans; files out of sync")]
    LineCountMismatch {
        split: String,
        contexts: usize,
        questions: usize,
        spans: usize,
    },

    #[error("'{path}' line {line}: expected 'start end' token indices")]
    MalformedSpan { path: String, line: usize },

    #[error("'{path}' line {line}: span start {start} is after end {end}")]
    InvalidSpan {
        path: String,
        line: usize,
        start: usize,
        end: usize,
    },

    #[error("'{path}' line {line}: span end {end} is outside the {len}-token passage")]
    SpanOutOfRange {
        path: String,
        line: usize,
        end: usize,
        len: usize,
    },

    #[error("'{path}' line {line}: empty token sequence")]
    EmptySequence { path: String, line: usize },
}

/// Loads dataset splits from a directory in the parallel-file layout.
pub struct SquadDirLoader {
    dir: PathBuf,
}

impl SquadDirLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every example of one split (e.g. "train" or "dev").
    pub fn load_split(&self, split: &str) -> Result<Vec<BidafSample>, DataError> {
        let context_path = self.dir.join(format!("{split}.context"));
        let question_path = self.dir.join(format!("{split}.question"));
        let span_path = self.dir.join(format!("{split}.span"));

        let contexts = read_token_lines(&context_path)?;
        let questions = read_token_lines(&question_path)?;
        let spans = read_lines(&span_path)?;

        if contexts.len() != questions.len() || contexts.len() != spans.len() {
            return Err(DataError::LineCountMismatch {
                split: split.to_string(),
                contexts: contexts.len(),
                questions: questions.len(),
                spans: spans.len(),
            });
        }

        let span_display = span_path.display().to_string();
        let context_display = context_path.display().to_string();
        let question_display = question_path.display().to_string();

        let mut samples = Vec::with_capacity(contexts.len());
        for (index, ((context_tokens, question_tokens), span_line)) in contexts
            .into_iter()
            .zip(questions.into_iter())
            .zip(spans.into_iter())
            .enumerate()
        {
            let line = index + 1;

            if context_tokens.is_empty() {
                return Err(DataError::EmptySequence {
                    path: context_display.clone(),
                    line,
                });
            }
            if question_tokens.is_empty() {
                return Err(DataError::EmptySequence {
                    path: question_display.clone(),
                    line,
                });
            }

            let label = parse_span_line(&span_line, &span_display, line)?;
            if label.end >= context_tokens.len() {
                return Err(DataError::SpanOutOfRange {
                    path: span_display.clone(),
                    line,
                    end: label.end,
                    len: context_tokens.len(),
                });
            }

            samples.push(BidafSample {
                context_tokens,
                question_tokens,
                label,
            });
        }

        tracing::info!("Loaded {} '{}' examples from {}", samples.len(), split, self.dir.display());
        Ok(samples)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    BufReader::new(file)
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })
}

fn read_token_lines(path: &Path) -> Result<Vec<Vec<String>>, DataError> {
    Ok(read_lines(path)?
        .into_iter()
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect())
}

fn parse_span_line(line: &str, path: &str, line_no: usize) -> Result<SpanLabel, DataError> {
    let mut parts = line.split_whitespace();
    let start: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DataError::MalformedSpan {
            path: path.to_string(),
            line: line_no,
        })?;
    let end: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DataError::MalformedSpan {
            path: path.to_string(),
            line: line_no,
        })?;

    SpanLabel::new(start, end).map_err(|_| DataError::InvalidSpan {
        path: path.to_string(),
        line: line_no,
        start,
        end,
    })
}

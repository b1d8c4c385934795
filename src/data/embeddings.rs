// ============================================================
// Layer 4 — Pre-trained Word Vectors
// ============================================================
// Implements the EmbeddingProvider seam over a GloVe-format text
// file: one token per line followed by its vector components,
// whitespace separated.
//
// Out-of-vocabulary tokens get a pseudo-random vector seeded by
// the token's own bytes, so the same unknown word embeds to the
// same vector in every run and on both the train and predict
// paths.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::domain::traits::EmbeddingProvider;

/// Magnitude of each component of an out-of-vocabulary vector.
const OOV_SCALE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot read embeddings file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' line {line}: expected {expected} vector components, found {found}")]
    DimensionMismatch {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("'{path}' line {line}: vector component is not a number")]
    MalformedComponent { path: String, line: usize },
}

/// Fixed-width word vectors loaded from a GloVe-format file.
#[derive(Debug)]
pub struct WordVectors {
    emdim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Load a vector file, validating that every line carries exactly
    /// `emdim` components.
    pub fn load(path: impl AsRef<Path>, emdim: usize) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = File::open(path).map_err(|source| EmbeddingError::Io {
            path: display.clone(),
            source,
        })?;

        let mut vectors = HashMap::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| EmbeddingError::Io {
                path: display.clone(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let token = match parts.next() {
                Some(t) => t.to_string(),
                None => continue,
            };

            let components: Result<Vec<f32>, _> = parts.map(str::parse::<f32>).collect();
            let components = components.map_err(|_| EmbeddingError::MalformedComponent {
                path: display.clone(),
                line: index + 1,
            })?;

            if components.len() != emdim {
                return Err(EmbeddingError::DimensionMismatch {
                    path: display,
                    line: index + 1,
                    expected: emdim,
                    found: components.len(),
                });
            }

            vectors.insert(token, components);
        }

        tracing::info!("Loaded {} word vectors of width {}", vectors.len(), emdim);
        Ok(Self { emdim, vectors })
    }

    /// Number of in-vocabulary tokens
    pub fn vocab_size(&self) -> usize {
        self.vectors.len()
    }

    fn oov_vector(&self, token: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let mut rng = StdRng::seed_from_u64(hasher.finish());
        (0..self.emdim)
            .map(|_| rng.gen_range(-OOV_SCALE..OOV_SCALE))
            .collect()
    }
}

impl EmbeddingProvider for WordVectors {
    fn emdim(&self) -> usize {
        self.emdim
    }

    fn embed(&self, token: &str) -> Vec<f32> {
        self.vectors
            .get(token)
            .cloned()
            .unwrap_or_else(|| self.oov_vector(token))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_vectors(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_loads_known_tokens() {
        let file = write_vectors("the 0.1 0.2 0.3\ncat -0.5 0.0 0.5\n");
        let vectors = WordVectors::load(file.path(), 3).unwrap();

        assert_eq!(vectors.vocab_size(), 2);
        assert_eq!(vectors.embed("cat"), vec![-0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_rejects_wrong_width_line() {
        let file = write_vectors("the 0.1 0.2 0.3\ncat 1.0\n");
        let err = WordVectors::load(file.path(), 3).unwrap_err();

        match err {
            EmbeddingError::DimensionMismatch { line, expected, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_component() {
        let file = write_vectors("the 0.1 oops 0.3\n");
        let err = WordVectors::load(file.path(), 3).unwrap_err();
        assert!(matches!(err, EmbeddingError::MalformedComponent { line: 1, .. }));
    }

    #[test]
    fn test_oov_vectors_are_deterministic_and_sized() {
        let file = write_vectors("the 0.1 0.2 0.3\n");
        let vectors = WordVectors::load(file.path(), 3).unwrap();

        let first = vectors.embed("zyzzyva");
        let second = vectors.embed("zyzzyva");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|c| c.abs() < OOV_SCALE));

        // Different unknown tokens should not collide on one vector.
        assert_ne!(vectors.embed("zyzzyva"), vectors.embed("qwerty"));
    }

    #[test]
    fn test_embed_sequence_pads_with_zeros() {
        let file = write_vectors("a 1.0 2.0\nb 3.0 4.0\n");
        let vectors = WordVectors::load(file.path(), 2).unwrap();

        let tokens = vec!["a".to_string(), "b".to_string()];
        let embedded = vectors.embed_sequence(&tokens, Some(4));

        assert_eq!(embedded.len(), 4);
        assert_eq!(embedded[0], vec![1.0, 2.0]);
        assert_eq!(embedded[1], vec![3.0, 4.0]);
        assert_eq!(embedded[2], vec![0.0, 0.0]);
        assert_eq!(embedded[3], vec![0.0, 0.0]);
    }
}

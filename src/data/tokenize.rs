// ============================================================
// Layer 4 — Word Tokenization
// ============================================================
// The tokenization boundary for the predict path. Training data
// arrives pre-tokenized (space-separated files), but raw passages
// and questions need splitting into words, and answers need the
// reverse mapping from token indices back to byte offsets in the
// original text.
//
// The Whitespace pre-tokenizer splits into word and punctuation
// runs and reports the byte range of every token, which is exactly
// the word-to-character mapping answer materialization needs.

use anyhow::Result;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

/// Split `text` into word-level tokens, returning each token together
/// with its byte range in the original string.
pub fn tokenize_with_offsets(text: &str) -> Result<(Vec<String>, Vec<(usize, usize)>)> {
    let mut pre_tokenized = PreTokenizedString::from(text);
    Whitespace
        .pre_tokenize(&mut pre_tokenized)
        .map_err(|e| anyhow::anyhow!("pre-tokenization failed: {e}"))?;

    let mut tokens = Vec::new();
    let mut offsets = Vec::new();
    for (token, (start, end), _) in
        pre_tokenized.get_splits(OffsetReferential::Original, OffsetType::Byte)
    {
        tokens.push(token.to_string());
        offsets.push((start, end));
    }

    Ok((tokens, offsets))
}

//! # Text Chunking Module
//!
//! Splits plain-text documents into bounded segments for embedding. The
//! splitter prefers newline boundaries, packing whole lines into a chunk
//! until the size cap is reached, and falls back to fixed windows when a
//! single line exceeds the cap. Consecutive chunks share a short overlap:
//! up to `overlap` trailing characters of one chunk reappear at the head of
//! the next, so context is not lost at a split point.
//!
//! All arithmetic is in characters, never bytes, so multi-byte UTF-8 input
//! is split safely.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Configuration for chunking text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkOptions {
    /// Maximum size of each chunk in characters
    pub chunk_size: usize,

    /// Characters of trailing overlap carried into the next chunk
    pub overlap: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 15,
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the nth character, or the string length if past the end
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

fn head_chars(s: &str, n: usize) -> &str {
    &s[..byte_offset(s, n)]
}

fn tail_chars(s: &str, n: usize) -> &str {
    let len = char_len(s);
    &s[byte_offset(s, len.saturating_sub(n))..]
}

/// Split text into chunks of at most `chunk_size` characters
///
/// # Arguments
///
/// * `text` - The text to split
/// * `options` - Chunking options
///
/// # Returns
///
/// The chunk texts in document order
#[instrument(skip(text))]
pub fn chunk_text(text: &str, options: &ChunkOptions) -> Vec<String> {
    // An overlap as large as the chunk itself would never make progress.
    let overlap = options.overlap.min(options.chunk_size.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');

        if !current.is_empty() && char_len(&current) + 1 + char_len(line) > options.chunk_size {
            let carry = tail_chars(&current, overlap).to_string();
            chunks.push(std::mem::take(&mut current));
            current = carry;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);

        // A line longer than the cap is split into fixed windows, each
        // window starting with the previous window's trailing overlap.
        while char_len(&current) > options.chunk_size {
            let head = head_chars(&current, options.chunk_size).to_string();
            let keep_from = options.chunk_size - overlap;
            current = current[byte_offset(&current, keep_from)..].to_string();
            chunks.push(head);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    debug!(chunks = chunks.len(), "split text into chunks");
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_long_line_yields_overlapping_windows() {
        let text: String = (0..1200)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let options = ChunkOptions {
            chunk_size: 500,
            overlap: 15,
        };

        let chunks = chunk_text(&text, &options);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 500);
        assert_eq!(chunks[1].chars().count(), 500);
        assert_eq!(chunks[2].chars().count(), 230);

        let tail_of = |s: &str| s.chars().rev().take(15).collect::<Vec<_>>();
        assert_eq!(
            chunks[1].chars().take(15).collect::<Vec<_>>(),
            tail_of(&chunks[0]).into_iter().rev().collect::<Vec<_>>()
        );
        assert_eq!(
            chunks[2].chars().take(15).collect::<Vec<_>>(),
            tail_of(&chunks[1]).into_iter().rev().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_lines_are_packed_up_to_the_cap() {
        let line = "x".repeat(200);
        let text = vec![line.clone(); 5].join("\n");
        let options = ChunkOptions::default();

        let chunks = chunk_text(&text, &options);

        // Two 200-char lines plus a newline fit in 500; a third does not.
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 500);
        }
        assert!(chunks[0].starts_with(&line));
    }

    #[test]
    fn test_next_chunk_carries_previous_tail() {
        let first = "a".repeat(300);
        let second = "b".repeat(300);
        let text = format!("{}\n{}", first, second);
        let options = ChunkOptions::default();

        let chunks = chunk_text(&text, &options);

        assert_eq!(chunks.len(), 2);
        // The second chunk opens with the 15-character tail of the first.
        assert!(chunks[1].starts_with(&"a".repeat(15)));
        assert!(chunks[1].ends_with(&second));
    }

    #[test]
    fn test_empty_and_blank_input_yield_no_chunks() {
        let options = ChunkOptions::default();
        assert!(chunk_text("", &options).is_empty());
        assert!(chunk_text("\n\n\n", &options).is_empty());
    }

    #[test]
    fn test_multibyte_input_is_split_on_character_boundaries() {
        let text = "日本語のテキスト。".repeat(100);
        let options = ChunkOptions {
            chunk_size: 100,
            overlap: 10,
        };

        let chunks = chunk_text(&text, &options);

        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
            // Slicing on a non-boundary would have panicked already; this
            // confirms the chunks are themselves valid strings.
            assert!(std::str::from_utf8(chunk.as_bytes()).is_ok());
        }
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let options = ChunkOptions::default();
        let chunks = chunk_text("just a short note", &options);
        assert_eq!(chunks, vec!["just a short note"]);
    }
}

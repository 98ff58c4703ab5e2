//! crates/recall_core/src/chunking.rs
//!
//! Paragraph chunking of raw text and cosine similarity between stored embeddings.

use std::cmp::Ordering;

use crate::domain::{Chunk, EmbeddingVector, SimilarPair, TextChunk, TextChunkKind};
use crate::generator::ellipsize;

pub const DEFAULT_MAX_CHUNK_CHARS: usize = 400;
pub const DEFAULT_SIMILAR_PAIRS: usize = 3;
const PREVIEW_CHARS: usize = 80;

/// Splits `text` into paragraph chunks of at most `max_chars` characters.
///
/// Each non-blank line is a paragraph. Paragraphs that are too long are cut on
/// `.` and the sentences packed greedily while the packed text stays under the
/// limit, so the `.` re-appended to each sentence never pushes a chunk past it.
/// A single sentence longer than the limit still becomes its own chunk.
/// `length` counts the trimmed content.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();

    for paragraph in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if paragraph.chars().count() <= max_chars {
            push_chunk(&mut chunks, paragraph, TextChunkKind::Paragraph);
            continue;
        }

        let mut current = String::new();
        for sentence in paragraph.split('.').filter(|s| !s.trim().is_empty()) {
            let fits = current.chars().count() + sentence.chars().count() < max_chars;
            if !fits && !current.is_empty() {
                push_chunk(&mut chunks, current.trim(), TextChunkKind::SplitParagraph);
                current.clear();
            }
            current.push_str(sentence);
            current.push('.');
        }
        if !current.trim().is_empty() {
            push_chunk(&mut chunks, current.trim(), TextChunkKind::SplitParagraph);
        }
    }

    chunks
}

fn push_chunk(chunks: &mut Vec<TextChunk>, content: &str, kind: TextChunkKind) {
    chunks.push(TextChunk {
        id: format!("chunk_{:03}", chunks.len() + 1),
        content: content.to_string(),
        length: content.chars().count(),
        kind,
    });
}

/// Lays text chunks out on page 1 with running character offsets, one
/// separator character between neighbours.
pub fn to_page_chunks(chunks: &[TextChunk]) -> Vec<Chunk> {
    let mut offset = 0;
    chunks
        .iter()
        .map(|chunk| {
            let start_char = offset;
            let end_char = start_char + chunk.length;
            offset = end_char + 1;
            Chunk {
                id: chunk.id.clone(),
                content: chunk.content.clone(),
                page: 1,
                start_char,
                end_char,
            }
        })
        .collect()
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Dimension mismatch in similarity computation");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// The `limit` most similar pairs of distinct vectors, best first.
pub fn most_similar_pairs(vectors: &[EmbeddingVector], limit: usize) -> Vec<SimilarPair> {
    let mut pairs = Vec::new();
    for (i, first) in vectors.iter().enumerate() {
        for second in &vectors[i + 1..] {
            if first.vector.len() != second.vector.len() {
                continue;
            }
            pairs.push(SimilarPair {
                first_chunk: first.id.clone(),
                second_chunk: second.id.clone(),
                similarity: cosine_similarity(&first.vector, &second.vector),
                first_preview: ellipsize(&first.metadata.content, PREVIEW_CHARS),
                second_preview: ellipsize(&second.metadata.content, PREVIEW_CHARS),
            });
        }
    }

    pairs.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    pairs.truncate(limit);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmbeddingMetadata;

    fn embedding(id: &str, vector: Vec<f32>) -> EmbeddingVector {
        EmbeddingVector {
            id: id.to_string(),
            metadata: EmbeddingMetadata {
                content: format!("content of {id}"),
                page: 1,
                chunk_id: id.to_string(),
                length: 13,
            },
            vector,
        }
    }

    #[test]
    fn short_paragraphs_become_one_chunk_each() {
        let text = "\n  First paragraph.  \n\n\nSecond paragraph here.\n";
        let chunks = split_into_chunks(text, DEFAULT_MAX_CHUNK_CHARS);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "chunk_001");
        assert_eq!(chunks[0].content, "First paragraph.");
        assert_eq!(chunks[0].kind, TextChunkKind::Paragraph);
        assert_eq!(chunks[1].id, "chunk_002");
        assert_eq!(chunks[1].length, "Second paragraph here.".len());
    }

    #[test]
    fn long_paragraphs_are_packed_by_sentence() {
        let text = "Alpha beta gamma. Delta epsilon zeta. Eta theta iota.";
        let chunks = split_into_chunks(text, 40);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["Alpha beta gamma. Delta epsilon zeta.", "Eta theta iota."]
        );
        assert!(chunks.iter().all(|c| c.kind == TextChunkKind::SplitParagraph));
        assert!(chunks.iter().all(|c| c.length <= 40));
    }

    #[test]
    fn packing_stops_before_reaching_the_limit() {
        // "Aaaaaaaaa." plus " Bbbbbbbbb" is exactly 20 characters, so the
        // second sentence starts a new chunk and no chunk exceeds the limit.
        let text = "Aaaaaaaaa. Bbbbbbbbb. Cc.";
        let chunks = split_into_chunks(text, 20);

        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["Aaaaaaaaa.", "Bbbbbbbbb. Cc."]);
        assert_eq!(chunks[1].length, "Bbbbbbbbb. Cc.".len());
        assert!(chunks.iter().all(|c| c.length <= 20));
    }

    #[test]
    fn paragraph_of_exactly_max_chars_stays_whole() {
        let paragraph = "a".repeat(20);
        let chunks = split_into_chunks(&paragraph, 20);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].kind, TextChunkKind::Paragraph);
        assert_eq!(chunks[0].length, 20);
    }

    #[test]
    fn page_chunks_have_running_offsets() {
        let chunks = split_into_chunks("abc\ndefgh", 10);
        let page = to_page_chunks(&chunks);
        assert_eq!((page[0].start_char, page[0].end_char), (0, 3));
        assert_eq!((page[1].start_char, page[1].end_char), (4, 9));
        assert!(page.iter().all(|c| c.page == 1));
    }

    #[test]
    fn cosine_of_parallel_and_orthogonal_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn pairs_are_ranked_best_first_and_limited() {
        let vectors = vec![
            embedding("a", vec![1.0, 0.0]),
            embedding("b", vec![0.9, 0.1]),
            embedding("c", vec![0.0, 1.0]),
        ];
        let pairs = most_similar_pairs(&vectors, 2);

        assert_eq!(pairs.len(), 2);
        assert_eq!((pairs[0].first_chunk.as_str(), pairs[0].second_chunk.as_str()), ("a", "b"));
        assert_eq!((pairs[1].first_chunk.as_str(), pairs[1].second_chunk.as_str()), ("b", "c"));
        assert!(pairs[0].similarity >= pairs[1].similarity);
        assert_eq!(pairs[0].first_preview, "content of a");
    }
}

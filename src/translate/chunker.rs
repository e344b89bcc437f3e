//! Sentence-aligned chunking
//!
//! Providers cap request size, so long text is packed into chunks of whole
//! sentences. A sentence ends at `.`, `!`, `?` or a newline followed by
//! whitespace; the boundary whitespace becomes a single space inside a chunk.
//! Sentences longer than the limit are hard-split on character count.

use super::types::TextChunk;

/// Separator placed between sentences packed into one chunk
const SENTENCE_JOIN: char = ' ';

/// Separator placed between translated chunks on reassembly
pub const CHUNK_JOIN: &str = "\n";

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Text that already fits is returned as one unchanged chunk.
pub fn split_text(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![TextChunk {
            content: text.to_string(),
            sequence_index: 0,
        }];
    }

    let mut packer = Packer::new(max_chars);
    for sentence in split_sentences(text) {
        packer.push(sentence);
    }
    packer.finish()
}

/// Join translated chunk texts in sequence order
pub fn reassemble<S: AsRef<str>>(parts: &[S]) -> String {
    parts.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(CHUNK_JOIN)
}

/// Greedy sentence packer
struct Packer {
    max_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Packer {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    fn push(&mut self, sentence: &str) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return;
        }
        let len = sentence.chars().count();
        let separator = usize::from(self.current_len > 0);

        if self.current_len + separator + len <= self.max_chars {
            if separator == 1 {
                self.current.push(SENTENCE_JOIN);
            }
            self.current.push_str(sentence);
            self.current_len += separator + len;
            return;
        }

        self.flush();
        if len > self.max_chars {
            self.hard_split(sentence);
        } else {
            self.current.push_str(sentence);
            self.current_len = len;
        }
    }

    fn hard_split(&mut self, sentence: &str) {
        let chars: Vec<char> = sentence.chars().collect();
        for slice in chars.chunks(self.max_chars) {
            self.chunks.push(slice.iter().collect());
        }
    }

    fn flush(&mut self) {
        if self.current_len > 0 {
            self.chunks.push(std::mem::take(&mut self.current));
            self.current_len = 0;
        }
    }

    fn finish(mut self) -> Vec<TextChunk> {
        self.flush();
        self.chunks
            .into_iter()
            .enumerate()
            .map(|(sequence_index, content)| TextChunk {
                content,
                sequence_index,
            })
            .collect()
    }
}

/// Split at whitespace runs that follow a sentence terminator
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?' | '\n')) {
            let mut end = i + ch.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = j + next.len_utf8();
                chars.next();
            }
            sentences.push(&text[start..i]);
            start = end;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }
    sentences.push(&text[start..]);
    sentences
}

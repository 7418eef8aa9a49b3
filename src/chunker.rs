const SENTENCE_DELIMITER: &str = ". ";

/// One publishable unit of a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// 1-based position.
    pub index: usize,
    pub total: usize,
}

/// Split `text` into segments of at most `max_len` characters, breaking only
/// after `". "`.
///
/// A single sentence longer than `max_len` is emitted whole as its own
/// segment rather than cut mid-sentence.
pub fn split(text: &str, max_len: usize) -> Vec<Segment> {
    if text.chars().count() <= max_len {
        return number(vec![text.to_string()]);
    }

    let units: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    let last = units.len() - 1;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for (i, unit) in units.iter().enumerate() {
        let mut sentence = unit.to_string();
        if i < last {
            sentence.push_str(SENTENCE_DELIMITER);
        }
        let len = sentence.chars().count();

        if current_len + len <= max_len {
            current.push_str(&sentence);
            current_len += len;
        } else {
            push_trimmed(&mut chunks, &current);
            current = sentence;
            current_len = len;
        }
    }
    push_trimmed(&mut chunks, &current);

    number(chunks)
}

/// Re-number a concatenation of segments so `index`/`total` describe their
/// position in the combined thread.
pub fn renumber(segments: Vec<Segment>) -> Vec<Segment> {
    number(segments.into_iter().map(|s| s.text).collect())
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn number(chunks: Vec<String>) -> Vec<Segment> {
    let total = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| Segment {
            text,
            index: i + 1,
            total,
        })
        .collect()
}

use crate::{DomainError, Subtitle, Word};

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// True when the word closes a sentence.
pub fn ends_sentence(text: &str) -> bool {
    text.ends_with(SENTENCE_TERMINATORS)
}

/// Splits a flat word stream wherever the silence between two consecutive
/// words is longer than `max_gap_secs`.
pub fn split_on_pauses(words: &[Word], max_gap_secs: f64) -> Vec<Vec<Word>> {
    let mut groups: Vec<Vec<Word>> = Vec::new();
    let mut current: Vec<Word> = Vec::new();

    for word in words {
        if let Some(previous) = current.last() {
            if word.start - previous.end > max_gap_secs {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(word.clone());
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Partitions timed words into cues bounded by a word count and by
/// sentence-ending punctuation.
///
/// Output is a pure function of the input words and `max_words_per_cue`,
/// so re-segmenting the same words always yields the same ids and bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueSegmenter {
    max_words_per_cue: usize,
}

impl CueSegmenter {
    pub fn new(max_words_per_cue: usize) -> Result<Self, DomainError> {
        if max_words_per_cue < 1 {
            return Err(DomainError::invalid_input(
                "max_words_per_cue must be at least 1",
            ));
        }
        Ok(Self { max_words_per_cue })
    }

    pub fn max_words_per_cue(&self) -> usize {
        self.max_words_per_cue
    }

    /// Segments one group of words. Cue ids are keyed by the first word's start.
    pub fn segment(&self, words: &[Word]) -> Vec<Subtitle> {
        let mut cues = Vec::new();
        if let Some(first) = words.first() {
            self.segment_group(&group_key(first), words, &mut cues);
        }
        cues
    }

    /// Pre-groups words at long silences, then segments each group.
    pub fn segment_with_pauses(&self, words: &[Word], max_gap_secs: f64) -> Vec<Subtitle> {
        let mut cues = Vec::new();
        for group in split_on_pauses(words, max_gap_secs) {
            if let Some(first) = group.first() {
                self.segment_group(&group_key(first), &group, &mut cues);
            }
        }
        cues
    }

    /// Re-segments every source cue independently, keyed by its id.
    ///
    /// Cues without word timings pass through as `{id}-0`; cues with an empty
    /// word list produce nothing.
    pub fn resegment(&self, subtitles: &[Subtitle]) -> Vec<Subtitle> {
        let mut cues = Vec::with_capacity(subtitles.len());
        for subtitle in subtitles {
            match subtitle.words.as_deref() {
                Some(words) => self.segment_group(&subtitle.id, words, &mut cues),
                None => cues.push(Subtitle {
                    id: format!("{}-0", subtitle.id),
                    ..subtitle.clone()
                }),
            }
        }

        tracing::debug!(
            source_cue_count = subtitles.len(),
            output_cue_count = cues.len(),
            max_words_per_cue = self.max_words_per_cue,
            "re-segmented subtitles"
        );
        cues
    }

    /// Splits one group into word buckets: a bucket closes at the word limit
    /// or after a sentence-ending word.
    pub fn chunk(&self, words: &[Word]) -> Vec<Vec<Word>> {
        let mut chunks = Vec::new();
        let mut bucket: Vec<Word> = Vec::with_capacity(self.max_words_per_cue);

        for word in words {
            bucket.push(word.clone());
            if bucket.len() >= self.max_words_per_cue || ends_sentence(&word.text) {
                chunks.push(std::mem::take(&mut bucket));
            }
        }

        if !bucket.is_empty() {
            chunks.push(bucket);
        }
        chunks
    }

    fn segment_group(&self, key: &str, words: &[Word], out: &mut Vec<Subtitle>) {
        out.extend(
            self.chunk(words)
                .into_iter()
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    Subtitle::from_words(format!("{key}-{chunk_index}"), chunk)
                }),
        );
    }
}

fn group_key(first: &Word) -> String {
    first.start.to_string()
}

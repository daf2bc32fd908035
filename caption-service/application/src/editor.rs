use std::collections::HashMap;
use std::ops::Range;

use serde_json::json;

use caption_domain::{
    to_segments, to_subtitles, CueSegmenter, DomainError, HistoryEntrySummary, HistoryManager,
    HistoryMetadata, HistoryState, HistoryStats, Subtitle, SubtitleStyle, Word,
};

use crate::ApplicationError;

/// Changes to a single word. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordEdit {
    pub text: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// One source group the live cues are cut from. Cue ids are
/// `{key}-{n}`, with `n` counting up across every group sharing a key.
#[derive(Debug, Clone, PartialEq)]
enum SourceGroup {
    Words {
        key: String,
        words: Vec<Word>,
    },
    /// A cue whose word timings were dropped by a free-text edit.
    Plain {
        key: String,
        text: String,
        start: f64,
        end: f64,
    },
}

impl SourceGroup {
    fn key(&self) -> &str {
        match self {
            SourceGroup::Words { key, .. } | SourceGroup::Plain { key, .. } => key,
        }
    }
}

/// Where a live cue comes from: its source group and, for timed groups,
/// the word range inside it.
#[derive(Debug, Clone)]
struct CueOrigin {
    group: usize,
    words: Range<usize>,
}

/// Live editing model for one project: the word-level source groups, the
/// cues segmented from them, the style and the undo/redo history that
/// snapshots cues and style.
///
/// The cue list is always a pure function of the source groups and the
/// current words-per-cue limit.
pub struct EditorSession {
    sources: Vec<SourceGroup>,
    subtitles: Vec<Subtitle>,
    origins: Vec<CueOrigin>,
    style: SubtitleStyle,
    segmenter: CueSegmenter,
    history: HistoryManager,
    cue_limits: HashMap<String, usize>,
}

impl EditorSession {
    /// Starts a session over source word groups. The groups are segmented
    /// immediately and recorded as the initial history entry.
    pub fn new(
        source: Vec<Subtitle>,
        style: SubtitleStyle,
        max_words_per_cue: usize,
        history: HistoryManager,
    ) -> Result<Self, ApplicationError> {
        let segmenter = CueSegmenter::new(max_words_per_cue)?;
        let sources = source
            .into_iter()
            .filter_map(|cue| match cue.words {
                Some(words) if words.is_empty() => None,
                Some(words) => Some(SourceGroup::Words { key: cue.id, words }),
                None => Some(SourceGroup::Plain {
                    key: cue.id,
                    text: cue.text,
                    start: cue.start,
                    end: cue.end,
                }),
            })
            .collect();

        let mut session = Self {
            sources,
            subtitles: Vec::new(),
            origins: Vec::new(),
            style,
            segmenter,
            history,
            cue_limits: HashMap::new(),
        };
        session.rebuild();
        session.history.clear();
        session.snapshot("Initial state", None);
        Ok(session)
    }

    /// Starts a session from one flat word stream, keyed like
    /// [`CueSegmenter::segment`].
    pub fn from_words(
        words: Vec<Word>,
        style: SubtitleStyle,
        max_words_per_cue: usize,
        history: HistoryManager,
    ) -> Result<Self, ApplicationError> {
        let source = match words.first() {
            Some(first) => vec![Subtitle::from_words(first.start.to_string(), words)],
            None => Vec::new(),
        };
        Self::new(source, style, max_words_per_cue, history)
    }

    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn style(&self) -> &SubtitleStyle {
        &self.style
    }

    pub fn max_words_per_cue(&self) -> usize {
        self.segmenter.max_words_per_cue()
    }

    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn history_timeline(&self) -> Vec<HistoryEntrySummary> {
        self.history.timeline()
    }

    /// Re-segments the source groups with a new per-cue limit.
    pub fn set_max_words_per_cue(&mut self, max_words_per_cue: usize) -> Result<(), ApplicationError> {
        self.segmenter = CueSegmenter::new(max_words_per_cue)?;
        self.rebuild();
        self.snapshot(
            format!("Set {max_words_per_cue} words per cue"),
            Some(
                HistoryMetadata::new("slider-change")
                    .with_change("maxWordsPerCue", json!(max_words_per_cue)),
            ),
        );
        Ok(())
    }

    /// Replaces a cue's text. If the new text has as many tokens as the cue
    /// has words, the words keep their timings; otherwise the cue is cut out
    /// of its group as plain text that keeps only its bounds.
    pub fn edit_cue_text(&mut self, cue_id: &str, text: &str) -> Result<(), ApplicationError> {
        let index = self.cue_index(cue_id)?;
        let CueOrigin { group, words: range } = self.origins[index].clone();
        let (start, end) = (self.subtitles[index].start, self.subtitles[index].end);
        let tokens: Vec<&str> = text.split_whitespace().collect();

        match &mut self.sources[group] {
            SourceGroup::Words { words, .. } if range.len() == tokens.len() => {
                for (word, token) in words[range].iter_mut().zip(&tokens) {
                    word.text = token.to_string();
                }
            }
            SourceGroup::Words { key, words } => {
                let key = key.clone();
                let after = words.split_off(range.end);
                words.truncate(range.start);
                let before = std::mem::take(words);

                let mut replacement = Vec::with_capacity(3);
                if !before.is_empty() {
                    replacement.push(SourceGroup::Words {
                        key: key.clone(),
                        words: before,
                    });
                }
                replacement.push(SourceGroup::Plain {
                    key: key.clone(),
                    text: tokens.join(" "),
                    start,
                    end,
                });
                if !after.is_empty() {
                    replacement.push(SourceGroup::Words { key, words: after });
                }
                self.sources.splice(group..=group, replacement);
            }
            SourceGroup::Plain { text: plain, .. } => {
                *plain = tokens.join(" ");
            }
        }
        self.rebuild();

        self.snapshot(
            "Edit subtitle text",
            Some(
                HistoryMetadata::new("text-edit")
                    .affecting([cue_id])
                    .with_change("text", json!(text)),
            ),
        );
        Ok(())
    }

    pub fn edit_word(
        &mut self,
        cue_id: &str,
        word_index: usize,
        edit: WordEdit,
    ) -> Result<(), ApplicationError> {
        let index = self.cue_index(cue_id)?;
        let CueOrigin { group, words: range } = self.origins[index].clone();
        let word = match &mut self.sources[group] {
            SourceGroup::Words { words, .. } if word_index < range.len() => {
                &mut words[range.start + word_index]
            }
            _ => {
                return Err(ApplicationError::Validation(format!(
                    "subtitle {cue_id} has no word at index {word_index}"
                )))
            }
        };

        let start = edit.start.unwrap_or(word.start);
        let end = edit.end.unwrap_or(word.end);
        if start < 0.0 || end <= start {
            return Err(ApplicationError::Validation(format!(
                "word timing must satisfy 0 <= start < end (got {start}..{end})"
            )));
        }

        let mut edited = Word {
            start,
            end,
            ..word.clone()
        };
        if let Some(text) = edit.text.as_deref().map(str::trim) {
            if text.is_empty() || text.contains(char::is_whitespace) {
                return Err(ApplicationError::Validation(
                    "word text must be a single non-empty token".to_string(),
                ));
            }
            edited.text = text.to_string();
        }
        *word = edited;
        self.rebuild();

        self.snapshot(
            "Edit word",
            Some(
                HistoryMetadata::new("text-edit")
                    .affecting([cue_id])
                    .with_change("wordIndex", json!(word_index)),
            ),
        );
        Ok(())
    }

    pub fn update_style(&mut self, style: SubtitleStyle) {
        self.style = style;
        self.snapshot("Update style", Some(HistoryMetadata::new("style-change")));
    }

    /// Removes a cue and the source words behind it.
    pub fn delete_cue(&mut self, cue_id: &str) -> Result<(), ApplicationError> {
        let index = self.cue_index(cue_id)?;
        let CueOrigin { group, words: range } = self.origins[index].clone();

        let emptied = match &mut self.sources[group] {
            SourceGroup::Words { words, .. } => {
                words.drain(range);
                words.is_empty()
            }
            SourceGroup::Plain { .. } => true,
        };
        if emptied {
            self.sources.remove(group);
        }
        self.rebuild();

        self.snapshot(
            "Delete subtitle",
            Some(HistoryMetadata::new("delete-segment").affecting([cue_id])),
        );
        Ok(())
    }

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo().cloned() else {
            return false;
        };
        self.apply(&state);
        true
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo().cloned() else {
            return false;
        };
        self.apply(&state);
        true
    }

    pub fn go_to_state(&mut self, state_id: &str) -> Result<(), ApplicationError> {
        let state = self.history.go_to_state(state_id)?.clone();
        self.apply(&state);
        Ok(())
    }

    /// Restores a snapshot: the words-per-cue limit it was taken with, and
    /// source groups recovered from its cues.
    fn apply(&mut self, state: &HistoryState) {
        if let Some(segmenter) = self
            .cue_limits
            .get(&state.id)
            .and_then(|limit| CueSegmenter::new(*limit).ok())
        {
            self.segmenter = segmenter;
        }
        self.sources = regroup(&to_subtitles(&state.segments));
        self.style = state.style.clone();
        self.rebuild();
        tracing::debug!(
            state_id = %state.id,
            description = %state.description,
            cue_count = self.subtitles.len(),
            max_words_per_cue = self.segmenter.max_words_per_cue(),
            "applied history state"
        );
    }

    /// Re-derives the live cues from the source groups.
    fn rebuild(&mut self) {
        merge_adjacent(&mut self.sources);

        let mut next_chunk: HashMap<&str, usize> = HashMap::new();
        let mut subtitles = Vec::with_capacity(self.subtitles.len());
        let mut origins = Vec::with_capacity(self.origins.len());

        for (group, source) in self.sources.iter().enumerate() {
            let key = source.key();
            match source {
                SourceGroup::Words { words, .. } => {
                    let mut offset = 0;
                    for chunk in self.segmenter.chunk(words) {
                        let len = chunk.len();
                        let id = cue_id(key, &mut next_chunk);
                        subtitles.push(Subtitle::from_words(id, chunk));
                        origins.push(CueOrigin {
                            group,
                            words: offset..offset + len,
                        });
                        offset += len;
                    }
                }
                SourceGroup::Plain {
                    text, start, end, ..
                } => {
                    subtitles.push(Subtitle {
                        id: cue_id(key, &mut next_chunk),
                        text: text.clone(),
                        start: *start,
                        end: *end,
                        words: None,
                    });
                    origins.push(CueOrigin { group, words: 0..0 });
                }
            }
        }

        self.subtitles = subtitles;
        self.origins = origins;
    }

    fn snapshot(&mut self, description: impl Into<String>, metadata: Option<HistoryMetadata>) {
        let segments = to_segments(&self.subtitles);
        let state_id = self
            .history
            .save_state(&segments, &self.style, description, metadata)
            .id
            .clone();

        let history = &self.history;
        self.cue_limits
            .retain(|id, _| history.entries().iter().any(|entry| entry.id == *id));
        self.cue_limits
            .insert(state_id, self.segmenter.max_words_per_cue());
    }

    fn cue_index(&self, cue_id: &str) -> Result<usize, DomainError> {
        self.subtitles
            .iter()
            .position(|cue| cue.id == cue_id)
            .ok_or_else(|| DomainError::not_found("subtitle", cue_id))
    }
}

fn cue_id<'a>(key: &'a str, next_chunk: &mut HashMap<&'a str, usize>) -> String {
    let chunk = next_chunk.entry(key).or_insert(0);
    let id = format!("{key}-{chunk}");
    *chunk += 1;
    id
}

/// Joins neighbouring timed groups that share a key, so a group split by a
/// plain cue becomes whole again once that cue is gone.
fn merge_adjacent(sources: &mut Vec<SourceGroup>) {
    let mut merged: Vec<SourceGroup> = Vec::with_capacity(sources.len());
    for source in sources.drain(..) {
        if let (
            Some(SourceGroup::Words {
                key: last_key,
                words: last_words,
            }),
            SourceGroup::Words { key, words },
        ) = (merged.last_mut(), &source)
        {
            if last_key == key {
                last_words.extend(words.iter().cloned());
                continue;
            }
        }
        merged.push(source);
    }
    *sources = merged;
}

/// Recovers source groups from segmented cues. A cue id `{key}-{n}` belongs
/// to group `key`; consecutive timed cues of one key are merged back into a
/// single word list.
fn regroup(subtitles: &[Subtitle]) -> Vec<SourceGroup> {
    let mut groups: Vec<SourceGroup> = Vec::new();

    for cue in subtitles {
        let key = cue
            .id
            .rsplit_once('-')
            .map_or(cue.id.as_str(), |(key, _)| key)
            .to_string();

        match cue.words.as_deref() {
            Some(words) if !words.is_empty() => groups.push(SourceGroup::Words {
                key,
                words: words.to_vec(),
            }),
            _ => groups.push(SourceGroup::Plain {
                key,
                text: cue.text.clone(),
                start: cue.start,
                end: cue.end,
            }),
        }
    }

    merge_adjacent(&mut groups);
    groups
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single timed word, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f32,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64, confidence: f32) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            confidence,
        }
    }
}

/// A display cue. When `words` is present, `text`, `start` and `end` are
/// derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub id: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

impl Subtitle {
    /// Builds a cue whose text and bounds come from `words`.
    pub fn from_words(id: impl Into<String>, words: Vec<Word>) -> Self {
        let mut subtitle = Self {
            id: id.into(),
            text: String::new(),
            start: 0.0,
            end: 0.0,
            words: Some(words),
        };
        subtitle.rederive();
        subtitle
    }

    /// Recomputes `text`, `start` and `end` from the word list, if any.
    pub fn rederive(&mut self) {
        let Some(words) = self.words.as_ref() else {
            return;
        };
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            self.text.clear();
            return;
        };
        self.start = first.start;
        self.end = last.end;
        self.text = join_word_text(words);
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn word_count(&self) -> usize {
        self.words.as_ref().map_or(0, Vec::len)
    }
}

pub fn join_word_text(words: &[Word]) -> String {
    words
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Editor-facing view of [`Subtitle`] using `startTime` / `endTime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleSegment {
    pub id: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

impl From<Subtitle> for SubtitleSegment {
    fn from(subtitle: Subtitle) -> Self {
        Self {
            id: subtitle.id,
            text: subtitle.text,
            start_time: subtitle.start,
            end_time: subtitle.end,
            words: subtitle.words,
        }
    }
}

impl From<SubtitleSegment> for Subtitle {
    fn from(segment: SubtitleSegment) -> Self {
        Self {
            id: segment.id,
            text: segment.text,
            start: segment.start_time,
            end: segment.end_time,
            words: segment.words,
        }
    }
}

pub fn to_segments(subtitles: &[Subtitle]) -> Vec<SubtitleSegment> {
    subtitles.iter().cloned().map(SubtitleSegment::from).collect()
}

pub fn to_subtitles(segments: &[SubtitleSegment]) -> Vec<Subtitle> {
    segments.iter().cloned().map(Subtitle::from).collect()
}

/// Presentation settings handed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_animation")]
    pub animation: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_color(),
            highlight_color: None,
            background_color: None,
            position: default_position(),
            animation: default_animation(),
            extra: Map::new(),
        }
    }
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_font_size() -> u32 {
    48
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_position() -> String {
    "bottom".to_string()
}

fn default_animation() -> String {
    "none".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMetadata {
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub changes: Map<String, Value>,
}

impl HistoryMetadata {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn affecting<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_segments = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_change(mut self, key: impl Into<String>, value: Value) -> Self {
        self.changes.insert(key.into(), value);
        self
    }
}

/// Immutable snapshot stored by the history manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    pub id: String,
    pub timestamp: i64,
    pub description: String,
    pub segments: Vec<SubtitleSegment>,
    pub style: SubtitleStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HistoryMetadata>,
}

impl HistoryState {
    pub fn action(&self) -> Option<&str> {
        self.metadata.as_ref().map(|metadata| metadata.action.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_states: usize,
    pub current_index: isize,
    pub can_undo: bool,
    pub can_redo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntrySummary {
    pub id: String,
    pub timestamp: i64,
    pub description: String,
    pub action: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Word as reported by the transcription provider, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderWord {
    pub text: String,
    pub start: u64,
    pub end: u64,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTranscript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: TranscriptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub words: Vec<ProviderWord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ProviderWord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ProviderWord>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionJob {
    pub media_url: String,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub video_url: String,
    pub video_duration: f64,
    pub subtitles: Vec<Subtitle>,
    pub style: SubtitleStyle,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub output_url: String,
}

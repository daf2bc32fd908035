pub mod history;
pub mod normalizer;
pub mod segmenter;

pub use history::{Clock, HistoryConfig, HistoryManager, SystemClock, DEFAULT_GROUPABLE_ACTIONS};
pub use normalizer::normalize_words;
pub use segmenter::{ends_sentence, split_on_pauses, CueSegmenter};

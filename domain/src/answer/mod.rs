//! Answer normalization: recovering answer text from provider replies and
//! reconciling it with the question's options.

pub mod matching;
pub mod parsing;

pub use matching::{MatchKind, OptionEntry, OptionMatch, match_option, match_option_detailed};
pub use parsing::{MULTI_ANSWER_SEPARATOR, ParseStrategy, ParsedAnswer, parse_answer, parse_answer_detailed};

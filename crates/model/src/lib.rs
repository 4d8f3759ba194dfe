#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod poll;
pub mod recency;

pub use chrono::{DateTime, Utc};
pub use poll::{Choice, ChoiceId, Poll, Question, QuestionId, VoteForm};
pub use recency::was_published_recently;

/// Maximum number of characters accepted for question and choice text.
pub const MAX_TEXT_LEN: usize = 200;

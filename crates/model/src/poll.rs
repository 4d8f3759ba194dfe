use alloc::{string::String, vec::Vec};
use chrono::{DateTime, Utc};
use core::{
    fmt::{self, Display},
    num::{NonZeroI32, ParseIntError},
    str::FromStr,
};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a [`Question`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub NonZeroI32);

/// Store-assigned identifier of a [`Choice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChoiceId(pub NonZeroI32);

macro_rules! impl_id {
    ($id:ident) => {
        impl $id {
            pub const fn get(self) -> i32 {
                self.0.get()
            }
        }

        impl TryFrom<i32> for $id {
            type Error = core::num::TryFromIntError;
            fn try_from(raw: i32) -> Result<Self, Self::Error> {
                NonZeroI32::try_from(raw).map(Self)
            }
        }

        impl FromStr for $id {
            type Err = ParseIntError;
            fn from_str(text: &str) -> Result<Self, Self::Err> {
                text.parse().map(Self)
            }
        }

        impl Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Display::fmt(&self.0, f)
            }
        }
    };
}

impl_id!(QuestionId);
impl_id!(ChoiceId);

/// A poll prompt. The publication date is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: QuestionId,
    /// Prompt shown to voters.
    pub text: String,
    /// When the question went (or goes) live.
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// See [`was_published_recently`](crate::was_published_recently).
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        crate::recency::was_published_recently(self.pub_date, now)
    }
}

impl Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A selectable option under a [`Question`] along with its tally.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub id: ChoiceId,
    /// The question that owns this choice.
    pub question: QuestionId,
    pub text: String,
    /// Number of accepted votes. Never decreases.
    pub votes: u32,
}

impl Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A question bundled with its choices in creation order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Poll {
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl Poll {
    /// Sum of all votes cast on this poll.
    pub fn total_votes(&self) -> u64 {
        self.choices.iter().map(|choice| u64::from(choice.votes)).sum()
    }
}

/// A submitted ballot. The selection is absent when the voter did not pick
/// anything (or sent something that is not a choice identifier at all).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VoteForm {
    pub choice: Option<ChoiceId>,
}

impl VoteForm {
    /// Parses an `application/x-www-form-urlencoded` body. Only the `choice`
    /// field is considered. When it repeats, the last occurrence wins.
    pub fn from_urlencoded(body: &str) -> Self {
        let mut choice = None;
        for chunk in body.split('&') {
            let (key, value) = match chunk.split_once('=') {
                Some(pair) => pair,
                _ => continue,
            };
            if key == "choice" {
                choice = Some(value);
            }
        }

        let choice = choice.and_then(|value| value.trim().parse().ok());
        Self { choice }
    }
}

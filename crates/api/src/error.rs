use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The referenced question does not exist.
    NotFound,
    /// The submission did not name a choice of the question being voted on.
    MissingSelection,
    /// The store failed for reasons unrelated to the request.
    Fatal,
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        match err {
            db::error::Error::NotFound => Self::NotFound,
            _ => Self::Fatal,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Question not found.",
            Self::MissingSelection => "You didn't select a choice.",
            Self::Fatal => "Oops! We have encountered an unrecoverable error on our end.",
        })
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

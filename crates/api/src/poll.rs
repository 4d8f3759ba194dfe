use crate::error;
use db::Store;
use model::{DateTime, Poll, Question, QuestionId, Utc, VoteForm};

/// Number of questions shown on the index page.
pub const LATEST_LIMIT: u16 = 5;

/// Lists the `limit` most recently published questions, newest first.
/// Questions scheduled for the future are not visible yet.
pub async fn latest_questions<S: Store>(store: &S, now: DateTime<Utc>, limit: u16) -> error::Result<Vec<Question>> {
    Ok(store.published_questions(now, limit).await?)
}

pub async fn get_question<S: Store>(store: &S, id: QuestionId) -> error::Result<Question> {
    Ok(store.get_question(id).await?)
}

/// Fetches a question together with its choices.
pub async fn get_poll<S: Store>(store: &S, id: QuestionId) -> error::Result<Poll> {
    let question = store.get_question(id).await?;
    let choices = store.get_choices(id).await?;
    Ok(Poll { question, choices })
}

/// Counts a single vote. On success, returns the question to redirect to.
/// Nothing is mutated unless the form names a choice owned by the question.
pub async fn record_vote<S: Store>(store: &S, question: QuestionId, form: &VoteForm) -> error::Result<QuestionId> {
    let Question { id, .. } = store.get_question(question).await?;
    let choice = form.choice.ok_or(error::Error::MissingSelection)?;
    match store.increment_votes(id, choice, 1).await {
        Ok(()) => {
            log::info!("Recorded vote for choice {choice} of question {id}.");
            Ok(id)
        }
        Err(db::error::Error::NotFound) => Err(error::Error::MissingSelection),
        Err(err) => {
            log::error!("Cannot record vote for choice {choice} of question {id}: {err}");
            Err(error::Error::Fatal)
        }
    }
}

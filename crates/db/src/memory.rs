use crate::{error, Store};
use core::sync::atomic::{AtomicI32, Ordering};
use dashmap::DashMap;
use model::{Choice, ChoiceId, DateTime, Question, QuestionId, Utc, MAX_TEXT_LEN};

/// In-process [`Store`]. Identifiers are handed out in creation order.
/// Each tally is updated while holding its shard lock, so concurrent votes
/// on the same choice never overwrite each other.
#[derive(Default)]
pub struct MemoryStore {
    questions: DashMap<QuestionId, Question>,
    choices: DashMap<ChoiceId, Choice>,
    last_question: AtomicI32,
    last_choice: AtomicI32,
}

fn next_id(counter: &AtomicI32) -> error::Result<i32> {
    let prev = counter.fetch_add(1, Ordering::Relaxed);
    prev.checked_add(1).ok_or(error::Error::Fatal)
}

fn check_text(text: &str) -> error::Result<()> {
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(error::Error::BadInput);
    }
    Ok(())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn create_question(&self, text: &str, pub_date: DateTime<Utc>) -> error::Result<QuestionId> {
        check_text(text)?;
        let id = QuestionId::try_from(next_id(&self.last_question)?).map_err(|_| error::Error::Fatal)?;
        let question = Question { id, text: text.into(), pub_date };
        assert!(self.questions.insert(id, question).is_none());
        Ok(id)
    }

    async fn create_choice(&self, question: QuestionId, text: &str) -> error::Result<ChoiceId> {
        check_text(text)?;
        if !self.questions.contains_key(&question) {
            return Err(error::Error::NotFound);
        }

        let id = ChoiceId::try_from(next_id(&self.last_choice)?).map_err(|_| error::Error::Fatal)?;
        let choice = Choice { id, question, text: text.into(), votes: 0 };
        assert!(self.choices.insert(id, choice).is_none());
        Ok(id)
    }

    async fn get_question(&self, id: QuestionId) -> error::Result<Question> {
        self.questions.get(&id).map(|entry| entry.value().clone()).ok_or(error::Error::NotFound)
    }

    async fn get_choices(&self, question: QuestionId) -> error::Result<Vec<Choice>> {
        let mut choices: Vec<_> = self
            .choices
            .iter()
            .filter(|entry| entry.question == question)
            .map(|entry| entry.value().clone())
            .collect();
        choices.sort_unstable_by_key(|choice| choice.id);
        Ok(choices)
    }

    async fn published_questions(&self, until: DateTime<Utc>, limit: u16) -> error::Result<Vec<Question>> {
        let mut questions: Vec<_> = self
            .questions
            .iter()
            .filter(|entry| entry.pub_date <= until)
            .map(|entry| entry.value().clone())
            .collect();
        questions.sort_unstable_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        questions.truncate(limit.into());
        Ok(questions)
    }

    async fn increment_votes(&self, question: QuestionId, choice: ChoiceId, delta: u16) -> error::Result<()> {
        let mut entry = self
            .choices
            .get_mut(&choice)
            .filter(|entry| entry.question == question)
            .ok_or(error::Error::NotFound)?;
        entry.votes = entry.votes.checked_add(delta.into()).ok_or(error::Error::Fatal)?;
        Ok(())
    }
}

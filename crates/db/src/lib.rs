pub mod error;
pub mod memory;

use core::future::Future;
use futures_util::TryStreamExt;
use model::{Choice, ChoiceId, DateTime, Question, QuestionId, Utc};
use tokio_postgres::{error::SqlState, Client, Row};

pub use memory::MemoryStore;
pub use tokio_postgres::{tls::NoTls, Config};

/// Persistence collaborator for questions and choices. All mutation of a
/// vote tally goes through [`Store::increment_votes`], which must apply the
/// change atomically relative to the stored value.
pub trait Store {
    /// Inserts a new question and returns its store-assigned identifier.
    fn create_question(
        &self,
        text: &str,
        pub_date: DateTime<Utc>,
    ) -> impl Future<Output = error::Result<QuestionId>> + Send;

    /// Attaches a new choice (with zero votes) to an existing question.
    fn create_choice(&self, question: QuestionId, text: &str)
        -> impl Future<Output = error::Result<ChoiceId>> + Send;

    fn get_question(&self, id: QuestionId) -> impl Future<Output = error::Result<Question>> + Send;

    /// Lists the choices of a question in creation order.
    fn get_choices(&self, question: QuestionId) -> impl Future<Output = error::Result<Vec<Choice>>> + Send;

    /// Returns at most `limit` questions published no later than `until`,
    /// newest first. Questions sharing a publication date are ordered by
    /// descending identifier, i.e. the most recently created comes first.
    fn published_questions(
        &self,
        until: DateTime<Utc>,
        limit: u16,
    ) -> impl Future<Output = error::Result<Vec<Question>>> + Send;

    /// Adds `delta` to the tally of `choice`. Fails with
    /// [`NotFound`](error::Error::NotFound) unless `choice` belongs to `question`.
    fn increment_votes(
        &self,
        question: QuestionId,
        choice: ChoiceId,
        delta: u16,
    ) -> impl Future<Output = error::Result<()>> + Send;
}

/// PostgreSQL-backed [`Store`]. See `schema.sql` for the table layout.
pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn classify(err: tokio_postgres::Error) -> error::Error {
    let Some(db) = err.as_db_error() else {
        log::error!("database connection failure: {err}");
        return error::Error::Fatal;
    };

    match db.code() {
        // The referenced question does not exist.
        &SqlState::FOREIGN_KEY_VIOLATION => error::Error::NotFound,
        // We tried to insert a string that is too long for the `VARCHAR`.
        &SqlState::STRING_DATA_RIGHT_TRUNCATION => error::Error::BadInput,
        code => {
            log::error!("unexpected database error {}: {}", code.code(), db.message());
            error::Error::Fatal
        }
    }
}

fn deserialize_question_from_row(row: &Row) -> error::Result<Question> {
    let id: i32 = row.try_get("id").map_err(|_| error::Error::Fatal)?;
    let id = QuestionId::try_from(id).map_err(|_| error::Error::Fatal)?;
    let text = row.try_get("question_text").map_err(|_| error::Error::Fatal)?;
    let pub_date = row.try_get("pub_date").map_err(|_| error::Error::Fatal)?;
    Ok(Question { id, text, pub_date })
}

fn deserialize_choice_from_row(row: &Row) -> error::Result<Choice> {
    let id: i32 = row.try_get("id").map_err(|_| error::Error::Fatal)?;
    let id = ChoiceId::try_from(id).map_err(|_| error::Error::Fatal)?;
    let question: i32 = row.try_get("question").map_err(|_| error::Error::Fatal)?;
    let question = QuestionId::try_from(question).map_err(|_| error::Error::Fatal)?;
    let text = row.try_get("choice_text").map_err(|_| error::Error::Fatal)?;
    let votes: i32 = row.try_get("votes").map_err(|_| error::Error::Fatal)?;
    let votes = u32::try_from(votes).map_err(|_| error::Error::Fatal)?;
    Ok(Choice { id, question, text, votes })
}

impl Database {
    /// Creates the tables and indices if they do not exist yet.
    pub async fn init_schema(&self) -> error::Result<()> {
        self.0.batch_execute(include_str!("../schema.sql")).await.map_err(classify)
    }
}

impl Store for Database {
    async fn create_question(&self, text: &str, pub_date: DateTime<Utc>) -> error::Result<QuestionId> {
        let row = self
            .0
            .query_one(
                "INSERT INTO question (question_text, pub_date) VALUES ($1, $2) RETURNING id",
                &[&text, &pub_date],
            )
            .await
            .map_err(classify)?;
        let id: i32 = row.try_get("id").map_err(|_| error::Error::Fatal)?;
        QuestionId::try_from(id).map_err(|_| error::Error::Fatal)
    }

    async fn create_choice(&self, question: QuestionId, text: &str) -> error::Result<ChoiceId> {
        let qid = question.get();
        let row = self
            .0
            .query_one("INSERT INTO choice (question, choice_text) VALUES ($1, $2) RETURNING id", &[&qid, &text])
            .await
            .map_err(classify)?;
        let id: i32 = row.try_get("id").map_err(|_| error::Error::Fatal)?;
        ChoiceId::try_from(id).map_err(|_| error::Error::Fatal)
    }

    async fn get_question(&self, id: QuestionId) -> error::Result<Question> {
        let qid = id.get();
        let row = self
            .0
            .query_opt("SELECT id, question_text, pub_date FROM question WHERE id = $1", &[&qid])
            .await
            .map_err(classify)?
            .ok_or(error::Error::NotFound)?;
        deserialize_question_from_row(&row)
    }

    async fn get_choices(&self, question: QuestionId) -> error::Result<Vec<Choice>> {
        let qid = question.get();
        let rows = self
            .0
            .query_raw(
                "SELECT id, question, choice_text, votes FROM choice WHERE question = $1 ORDER BY id",
                &[&qid],
            )
            .await
            .map_err(classify)?;
        rows.map_err(classify)
            .and_then(|row| core::future::ready(deserialize_choice_from_row(&row)))
            .try_collect()
            .await
    }

    async fn published_questions(&self, until: DateTime<Utc>, limit: u16) -> error::Result<Vec<Question>> {
        let limit = i64::from(limit);
        let rows = self
            .0
            .query(
                "SELECT id, question_text, pub_date FROM question WHERE pub_date <= $1 \
                 ORDER BY pub_date DESC, id DESC LIMIT $2",
                &[&until, &limit],
            )
            .await
            .map_err(classify)?;
        rows.iter().map(deserialize_question_from_row).collect()
    }

    async fn increment_votes(&self, question: QuestionId, choice: ChoiceId, delta: u16) -> error::Result<()> {
        let qid = question.get();
        let cid = choice.get();
        let delta = i32::from(delta);
        match self
            .0
            .execute(
                "UPDATE choice SET votes = votes + $3 WHERE id = $1 AND question = $2",
                &[&cid, &qid, &delta],
            )
            .await
        {
            Ok(1) => Ok(()),
            Ok(0) => Err(error::Error::NotFound),
            Ok(_) => Err(error::Error::Fatal),
            Err(err) => Err(classify(err)),
        }
    }
}

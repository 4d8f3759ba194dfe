use crate::{poll, render, Reply};
use db::Store;
use hyper::StatusCode;
use model::{DateTime, Utc};

pub async fn try_respond<S: Store>(store: &S, now: DateTime<Utc>, json: bool) -> Result<Reply, StatusCode> {
    let questions = poll::latest_questions(store, now, poll::LATEST_LIMIT)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    render::try_respond(&render::Page::Index { latest_question_list: &questions }, json)
}

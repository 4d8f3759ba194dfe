use crate::{error, poll, render, Reply};
use db::Store;
use hyper::StatusCode;
use model::QuestionId;

/// Which view of a single poll to show.
#[derive(Clone, Copy)]
pub enum View {
    Detail,
    Results,
}

pub async fn try_respond<S: Store>(store: &S, id: QuestionId, view: View, json: bool) -> Result<Reply, StatusCode> {
    let poll = poll::get_poll(store, id).await.map_err(|err| match err {
        error::Error::NotFound => {
            log::debug!("Question {id} does not exist.");
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })?;

    let page = match view {
        View::Detail => render::Page::Detail { poll: &poll, error_message: None },
        View::Results => render::Page::Results { poll: &poll },
    };
    render::try_respond(&page, json)
}

use crate::{error, poll, render, BoxError, Reply};
use db::Store;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::Body,
    header::{HeaderValue, LOCATION},
    Response, StatusCode,
};
use model::{QuestionId, VoteForm};

/// Upper bound on the size of a submitted ballot.
const MAX_FORM_LEN: usize = 4096;

async fn read_form<B>(body: B) -> Result<VoteForm, StatusCode>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let bytes = Limited::new(body, MAX_FORM_LEN)
        .collect()
        .await
        .map_err(|err| {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                StatusCode::BAD_REQUEST
            }
        })?
        .to_bytes();
    let text = core::str::from_utf8(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok(VoteForm::from_urlencoded(text))
}

pub async fn try_respond<S, B>(body: B, store: &S, id: QuestionId, json: bool) -> Result<Reply, StatusCode>
where
    S: Store,
    B: Body,
    B::Error: Into<BoxError>,
{
    // The question must exist before the ballot is even looked at.
    poll::get_question(store, id).await.map_err(|err| match err {
        error::Error::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })?;

    let form = read_form(body).await?;
    let err = match poll::record_vote(store, id, &form).await {
        Ok(id) => {
            let location = format!("/polls/{id}/results/");
            let mut res = Response::new(Full::default());
            *res.status_mut() = StatusCode::FOUND;
            let value = HeaderValue::from_str(&location).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            assert!(!res.headers_mut().append(LOCATION, value));
            return Ok(res);
        }
        Err(err) => err,
    };

    match err {
        error::Error::MissingSelection => (),
        error::Error::NotFound => return Err(StatusCode::NOT_FOUND),
        error::Error::Fatal => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    // Redisplay the voting form.
    log::debug!("Rejected vote on question {id}: no valid choice.");
    let poll = poll::get_poll(store, id).await.map_err(|err| match err {
        error::Error::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    })?;
    let message = error::Error::MissingSelection.to_string();
    render::try_respond(&render::Page::Detail { poll: &poll, error_message: Some(&message) }, json)
}

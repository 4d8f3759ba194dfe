pub mod error;
pub mod poll;
pub mod render;

mod detail;
mod index;
mod vote;

use db::Store;
use http_body_util::Full;
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use model::{DateTime, QuestionId, Utc};

pub type Reply = Response<Full<Bytes>>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Index,
    Detail(QuestionId),
    Results(QuestionId),
    Vote(QuestionId),
}

/// Matches `/polls/`, `/polls/{id}/`, `/polls/{id}/results/`, and
/// `/polls/{id}/vote/`. The trailing slash is optional.
fn parse_route(path: &str) -> Option<Route> {
    let rest = path.strip_prefix("/polls")?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if rest.starts_with('/') {
        return None;
    }

    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Some(Route::Index);
    }

    let (id, action) = match rest.split_once('/') {
        Some((id, action)) => (id, Some(action)),
        None => (rest, None),
    };
    let id = id.parse().ok()?;
    Some(match action {
        None => Route::Detail(id),
        Some("results") => Route::Results(id),
        Some("vote") => Route::Vote(id),
        Some(_) => return None,
    })
}

pub async fn try_respond<S, B>(req: Request<B>, store: &S, now: DateTime<Utc>) -> Result<Reply, StatusCode>
where
    S: Store,
    B: hyper::body::Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = req.into_parts();
    let route = parse_route(parts.uri.path()).ok_or(StatusCode::NOT_FOUND)?;
    let json = render::wants_json(&parts.headers);
    match (&parts.method, route) {
        (&Method::GET, Route::Index) => index::try_respond(store, now, json).await,
        (&Method::GET, Route::Detail(id)) => detail::try_respond(store, id, detail::View::Detail, json).await,
        (&Method::GET, Route::Results(id)) => detail::try_respond(store, id, detail::View::Results, json).await,
        (&Method::POST, Route::Vote(id)) => vote::try_respond(body, store, id, json).await,
        _ => Err(StatusCode::METHOD_NOT_ALLOWED),
    }
}

/// Handles a request at the current time. Failures become empty responses
/// carrying the appropriate status code.
pub async fn respond<S, B>(req: Request<B>, store: &S) -> Reply
where
    S: Store,
    B: hyper::body::Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    match try_respond(req, store, Utc::now()).await {
        Ok(res) => {
            log::debug!("{method} {path} -> {}", res.status());
            res
        }
        Err(status) => {
            if status.is_server_error() {
                log::error!("{method} {path} -> {status}");
            } else {
                log::warn!("{method} {path} -> {status}");
            }
            let mut res = Response::new(Full::default());
            *res.status_mut() = status;
            res
        }
    }
}

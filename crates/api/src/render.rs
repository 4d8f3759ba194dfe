use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderValue, ACCEPT, CONTENT_TYPE},
    HeaderMap, Response, StatusCode,
};
use model::{Poll, Question};
use serde_json::{json, Value};

/// A view ready to be rendered, paired with its template.
pub enum Page<'a> {
    Index { latest_question_list: &'a [Question] },
    Detail { poll: &'a Poll, error_message: Option<&'a str> },
    Results { poll: &'a Poll },
}

impl Page<'_> {
    pub const fn template(&self) -> &'static str {
        match self {
            Self::Index { .. } => "polls/index.html",
            Self::Detail { .. } => "polls/detail.html",
            Self::Results { .. } => "polls/result.html",
        }
    }

    /// The variables handed to the template.
    pub fn context(&self) -> Value {
        match *self {
            Self::Index { latest_question_list } => json!({ "latest_question_list": latest_question_list }),
            Self::Detail { poll, error_message } => json!({
                "question": poll.question,
                "choices": poll.choices,
                "error_message": error_message,
            }),
            Self::Results { poll } => json!({
                "question": poll.question,
                "choices": poll.choices,
                "total_votes": poll.total_votes(),
            }),
        }
    }

    pub fn to_html(&self) -> String {
        match *self {
            Self::Index { latest_question_list } => index_html(latest_question_list),
            Self::Detail { poll, error_message } => detail_html(poll, error_message),
            Self::Results { poll } => results_html(poll),
        }
    }
}

/// Escapes text for safe inclusion in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    let title = escape(title);
    format!("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>{body}</body></html>")
}

fn index_html(questions: &[Question]) -> String {
    if questions.is_empty() {
        return layout("Polls", "<p>No polls are available.</p>");
    }

    let items: String = questions
        .iter()
        .map(|question| format!("<li><a href=\"/polls/{}/\">{}</a></li>", question.id, escape(&question.text)))
        .collect();
    layout("Polls", &format!("<ul>{items}</ul>"))
}

fn detail_html(poll: &Poll, error_message: Option<&str>) -> String {
    let Poll { question, choices } = poll;
    let mut body = format!(
        "<form action=\"/polls/{}/vote/\" method=\"post\"><fieldset><legend><h1>{}</h1></legend>",
        question.id,
        escape(&question.text)
    );

    if let Some(message) = error_message {
        body += &format!("<p><strong>{}</strong></p>", escape(message));
    }

    for (i, choice) in choices.iter().enumerate() {
        let n = i + 1;
        body += &format!(
            "<input type=\"radio\" name=\"choice\" id=\"choice{n}\" value=\"{}\"><label for=\"choice{n}\">{}</label><br>",
            choice.id,
            escape(&choice.text)
        );
    }

    body += "</fieldset><input type=\"submit\" value=\"Vote\"></form>";
    layout(&question.text, &body)
}

fn results_html(poll: &Poll) -> String {
    let Poll { question, choices } = poll;
    let items: String = choices
        .iter()
        .map(|choice| {
            let unit = if choice.votes == 1 { "vote" } else { "votes" };
            format!("<li>{} -- {} {unit}</li>", escape(&choice.text), choice.votes)
        })
        .collect();
    let body = format!(
        "<h1>{}</h1><ul>{items}</ul><a href=\"/polls/{}/\">Vote again?</a>",
        escape(&question.text),
        question.id
    );
    layout(&question.text, &body)
}

/// Whether the client asked for the raw template context instead of markup.
pub fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

pub fn try_respond(page: &Page<'_>, json: bool) -> Result<Response<Full<Bytes>>, StatusCode> {
    log::debug!("Rendering {} (json: {json}).", page.template());
    let (bytes, mime) = if json {
        let bytes = serde_json::to_vec(&page.context()).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        (bytes, "application/json")
    } else {
        (page.to_html().into_bytes(), "text/html; charset=utf-8")
    };

    let mut res = Response::new(Full::new(Bytes::from(bytes)));
    assert!(res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(mime)).is_none());
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::{escape, wants_json, Page};
    use hyper::{header::ACCEPT, HeaderMap};
    use chrono::TimeZone;
    use model::{Choice, ChoiceId, Poll, Question, QuestionId, Utc};

    fn poll() -> Poll {
        let id = QuestionId::try_from(3).unwrap();
        let question = Question {
            id,
            text: "Cats <or> dogs?".into(),
            pub_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let choices = vec![
            Choice { id: ChoiceId::try_from(7).unwrap(), question: id, text: "Cats".into(), votes: 1 },
            Choice { id: ChoiceId::try_from(8).unwrap(), question: id, text: "Dogs & more".into(), votes: 2 },
        ];
        Poll { question, choices }
    }

    #[test]
    fn escaping() {
        assert_eq!(escape("What's <up> & \"down\""), "What&#x27;s &lt;up&gt; &amp; &quot;down&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn empty_index() {
        let page = Page::Index { latest_question_list: &[] };
        assert_eq!(page.template(), "polls/index.html");
        assert!(page.to_html().contains("No polls are available."));
        assert_eq!(page.context()["latest_question_list"], serde_json::json!([]));
    }

    #[test]
    fn index_links_to_details() {
        let poll = poll();
        let list = [poll.question];
        let html = Page::Index { latest_question_list: &list }.to_html();
        assert!(html.contains("<li><a href=\"/polls/3/\">Cats &lt;or&gt; dogs?</a></li>"));
        assert!(!html.contains("No polls are available."));
    }

    #[test]
    fn detail_form() {
        let poll = poll();
        let page = Page::Detail { poll: &poll, error_message: None };
        let html = page.to_html();
        assert!(html.contains("action=\"/polls/3/vote/\""));
        assert!(html.contains("id=\"choice2\" value=\"8\""));
        assert!(html.contains("Dogs &amp; more"));
        assert!(!html.contains("<strong>"));
        assert!(page.context()["error_message"].is_null());

        let page = Page::Detail { poll: &poll, error_message: Some("You didn't select a choice.") };
        assert!(page.to_html().contains("<strong>You didn&#x27;t select a choice.</strong>"));
        assert_eq!(page.context()["error_message"], "You didn't select a choice.");
    }

    #[test]
    fn results_tally() {
        let poll = poll();
        let page = Page::Results { poll: &poll };
        assert_eq!(page.template(), "polls/result.html");
        let html = page.to_html();
        assert!(html.contains("<li>Cats -- 1 vote</li>"));
        assert!(html.contains("<li>Dogs &amp; more -- 2 votes</li>"));
        assert!(html.contains("<a href=\"/polls/3/\">Vote again?</a>"));
        assert_eq!(page.context()["total_votes"], 3);
    }

    #[test]
    fn accept_header() {
        let mut headers = HeaderMap::new();
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, "text/html".parse().unwrap());
        assert!(!wants_json(&headers));
        headers.insert(ACCEPT, "application/json, text/plain".parse().unwrap());
        assert!(wants_json(&headers));
    }
}

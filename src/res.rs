use std::borrow::Cow;

use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::AppResult;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

/// Fills `{key}` slots in one pass, so text pasted into one slot is never
/// read as another slot. Unknown `{...}` is left alone.
pub(crate) fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let slot = tail.find('}').and_then(|end| {
            let key = &tail[1..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (end, *value))
        });

        match slot {
            Some((end, value)) => {
                out.push_str(value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escapes user text for element content and quoted attributes alike.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_safe(text)
}

pub(crate) fn sorry(status: StatusCode, message: &str) -> AppResult<Response> {
    let body = render(include_res!(str, "/pages/sorry.html"), &[("message", &*escape(message))]);
    Ok((status, Html(body)).into_response())
}

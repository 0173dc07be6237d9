use crate::errors::ServerError;
use crate::responses::{json_response, ResultResp};
use crate::search::SearchOutcome;
use crate::state::AppState;
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::io::Read;

/// Largest POST body accepted for a search.
const MAX_BODY_BYTES: u64 = 16 * 1024;

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    query: String,
}

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    match (method.as_str(), path.as_str()) {
        ("GET", "/health") => json_response(200, &json!({ "status": "ok" })),

        ("GET", "/api/search") => {
            let params = parse_query(&req);
            let query = params.get("q").map(String::as_str).unwrap_or("");
            search(state, query)
        }

        ("POST", "/api/search") => {
            let body: SearchRequest = read_json(&mut req)?;
            search(state, &body.query)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn search(state: &AppState, query: &str) -> ResultResp {
    let outcome: SearchOutcome = state.search.search(query);
    json_response(200, &outcome)
}

fn read_json<T: for<'de> Deserialize<'de>>(req: &mut Request) -> Result<T, ServerError> {
    let mut raw = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;

    if raw.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }

    serde_json::from_slice(&raw).map_err(|e| ServerError::BadRequest(format!("invalid JSON: {e}")))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

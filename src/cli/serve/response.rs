//! HTTP response handlers.

use anyhow::Result;
use serde_json::{Value, json};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use itemroute::resolve::ResolutionOutcome;

const JSON: &str = "application/json; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// HTTP status for a resolution outcome. Skipped resolution maps to 404.
pub fn outcome_status(outcome: Option<&ResolutionOutcome>) -> u16 {
    match outcome {
        Some(ResolutionOutcome::Found { .. }) => 200,
        Some(ResolutionOutcome::PermissionDenied) => 403,
        Some(ResolutionOutcome::NotFound) | None => 404,
    }
}

/// Respond with a resolution report.
pub fn respond_report(request: Request, status: u16, report: &Value) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, JSON);
    }
    let body = serde_json::to_vec_pretty(report)?;
    send_body(request, status, JSON, body)
}

/// Respond with a JSON error document.
pub fn respond_error(request: Request, status: u16, error: &anyhow::Error) -> Result<()> {
    let report = json!({ "error": format!("{error:#}") });
    respond_report(request, status, &report)
}

/// Respond with 405 for anything but GET and HEAD.
pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", PLAIN))
        .with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn is_allowed_method(method: &Method) -> bool {
    matches!(method, Method::Get | Method::Head)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Static ASCII names and values always form a valid header.
    Header::from_bytes(key, value).unwrap_or_else(|()| unreachable!("invalid header {key}"))
}

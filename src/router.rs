//! Frame routing (C10): split the wire request into method/action/content-type/
//! body, then dispatch on `METHOD:ACTION`.

use crate::BioGuardError;

/// A single parsed request frame: `METHOD ACTION\nCONTENT-TYPE\nBODY`.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub action: String,
    pub content_type: String,
    pub body: String,
}

/// The three routes this service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    RegisterPatient,
    RegisterDisease,
    Diagnose,
}

/// Split the raw frame into its three parts and resolve the route. The
/// third split piece is the body and may itself contain newlines (the
/// FASTA body), so this splits on at most 3 pieces (spec.md §4.5.1).
/// `method`/`action` are trimmed only, never case-folded — routeKey
/// matching is case-sensitive (spec.md §4.5 step 3).
pub fn parse_frame(frame: &str) -> Result<Request, BioGuardError> {
    let parts: Vec<&str> = frame.splitn(3, '\n').collect();
    if parts.len() != 3 {
        return Err(BioGuardError::MalformedRequest(format!(
            "frame must have 3 newline-separated parts, got {}",
            parts.len()
        )));
    }

    let mut method_action = parts[0].splitn(2, ' ');
    let method = method_action
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BioGuardError::MalformedRequest("missing method".to_string()))?;
    let action = method_action
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| BioGuardError::MalformedRequest("missing action".to_string()))?;

    let content_type = parts[1].trim();
    if content_type.is_empty() {
        return Err(BioGuardError::MalformedRequest(
            "missing content-type".to_string(),
        ));
    }

    Ok(Request {
        method: method.trim().to_string(),
        action: action.trim().to_string(),
        content_type: content_type.to_string(),
        body: parts[2].to_string(),
    })
}

/// Resolve a parsed request to a route. Unknown `METHOD:ACTION`
/// combinations are `RouteNotFound`.
pub fn resolve(request: &Request) -> Result<Route, BioGuardError> {
    match (request.method.as_str(), request.action.as_str()) {
        ("POST", "patient") => Ok(Route::RegisterPatient),
        ("POST", "disease") => Ok(Route::RegisterDisease),
        ("POST", "diagnose") => Ok(Route::Diagnose),
        _ => Err(BioGuardError::RouteNotFound(format!(
            "{}:{}",
            request.method, request.action
        ))),
    }
}

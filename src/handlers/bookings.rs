use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};

use crate::errors::AppError;
use crate::models::{NewBooking, Rejection};
use crate::state::AppState;

const ACTION_UPDATE_STATUS: &str = "updateStatus";

/// Request fields as one loosely-typed map, regardless of whether they
/// arrived as query parameters, an url-encoded body or a JSON body.
struct Payload(Map<String, Value>);

impl Payload {
    fn from_params(params: &HashMap<String, String>) -> Self {
        let mut map = Map::new();
        for (key, value) in params {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Payload(map)
    }

    /// Decode a write request body. A JSON content type takes the body
    /// alone; an url-encoded body is overlaid on the query parameters
    /// (callers put fields in either place); an empty body falls back
    /// to the query parameters.
    fn from_body(
        headers: &HeaderMap,
        body: &Bytes,
        params: &HashMap<String, String>,
    ) -> Result<Self, AppError> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.contains("json") {
            let value: Value = serde_json::from_slice(body)
                .map_err(|_| AppError::Validation("Invalid JSON body".to_string()))?;
            let Value::Object(map) = value else {
                return Err(AppError::Validation("Invalid JSON body".to_string()));
            };
            return Ok(Payload(map));
        }

        if body.is_empty() {
            return Ok(Self::from_params(params));
        }

        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|_| AppError::Validation("Invalid form body".to_string()))?;
        let mut payload = Self::from_params(params);
        for (key, value) in pairs {
            payload.0.insert(key, Value::String(value));
        }
        Ok(payload)
    }

    fn is_update(&self) -> bool {
        self.0.get("action").and_then(Value::as_str) == Some(ACTION_UPDATE_STATUS)
    }

    /// A required-field read: present, non-empty strings only. Numbers
    /// are tolerated since JSON callers send ids and prices unquoted.
    fn field(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn price(&self) -> f64 {
        match self.0.get("price") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

// GET /exec — list, or a JSONP-eligible status update selected by
// ?action=updateStatus.
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let callback = params.get("callback").cloned();
    let payload = Payload::from_params(&params);

    let body = if payload.is_update() {
        write_outcome(update_status(&state, &payload))
    } else {
        match list(&state) {
            Ok(rows) => rows,
            Err(e) => json!({ "error": e.to_string() }),
        }
    };

    respond(body, callback.as_deref(), true)
}

// POST /exec — create, or a status update selected by the payload's
// action field. Never JSONP, even when a callback name is present.
pub async fn post_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let outcome = Payload::from_body(&headers, &body, &params).and_then(|payload| {
        if payload.is_update() {
            update_status(&state, &payload)
        } else {
            create(&state, &payload)
        }
    });

    respond(write_outcome(outcome), None, false)
}

// PUT /exec — legacy route, always treated as a status update.
pub async fn put_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let payload = if body.is_empty() {
        Ok(Payload(Map::new()))
    } else {
        Payload::from_body(&headers, &body, &HashMap::new())
    };
    let outcome = payload.and_then(|payload| update_status(&state, &payload));

    respond(write_outcome(outcome), None, false)
}

fn list(state: &AppState) -> Result<Value, AppError> {
    let sheet = state.sheet.lock().unwrap();
    let rows = sheet.read_all()?;
    Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
}

fn create(state: &AppState, payload: &Payload) -> Result<Value, AppError> {
    let name = payload.field("name").ok_or_else(AppError::missing_fields)?;
    let email = payload.field("email").ok_or_else(AppError::missing_fields)?;
    let phone = payload.field("phone").ok_or_else(AppError::missing_fields)?;
    let room_type = payload.field("roomType").ok_or_else(AppError::missing_fields)?;
    let check_in = payload.field("checkIn").ok_or_else(AppError::missing_fields)?;
    let check_out = payload.field("checkOut").ok_or_else(AppError::missing_fields)?;
    let message = payload.field("message").unwrap_or_default();
    let booking = NewBooking::new(
        name, email, phone, room_type, check_in, check_out, message,
        payload.price(),
    );

    {
        let sheet = state.sheet.lock().unwrap();
        sheet.append(&booking)?;
    }

    tracing::info!(booking_id = booking.id, "booking appended");

    Ok(json!({
        "success": true,
        "message": "Booking added successfully",
        "bookingId": booking.id,
    }))
}

fn update_status(state: &AppState, payload: &Payload) -> Result<Value, AppError> {
    let booking_id = payload.field("bookingId");
    let status = payload.field("status");
    let (Some(booking_id), Some(status)) = (booking_id, status) else {
        return Err(AppError::Validation(
            "Missing bookingId or status".to_string(),
        ));
    };

    let rejection = Rejection {
        reason: payload.field("rejectionReason"),
        comments: payload.field("rejectionComments"),
        date: payload.field("rejectionDate"),
    };

    let found = {
        let sheet = state.sheet.lock().unwrap();
        sheet.update_status(&booking_id, &status, &rejection)?
    };
    if !found {
        return Err(AppError::NotFound);
    }

    tracing::info!(booking_id = %booking_id, status = %status, "booking status updated");

    Ok(json!({
        "success": true,
        "message": "Booking status updated successfully",
    }))
}

fn write_outcome(result: Result<Value, AppError>) -> Value {
    match result {
        Ok(body) => body,
        Err(e) => json!({ "success": false, "error": e.to_string() }),
    }
}

/// Emit the response body, JSONP-wrapped only for read-style requests
/// that named a callback. Write acknowledgements are never rendered as
/// script, so a stray callback parameter cannot turn them executable.
fn respond(body: Value, callback: Option<&str>, read_style: bool) -> Response {
    let json = body.to_string();
    match callback {
        Some(cb) if read_style => (
            [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
            format!("{cb}({json})"),
        )
            .into_response(),
        _ => (
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
    }
}

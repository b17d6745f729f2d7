use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Placeholder payload for responses that carry no data; serializes as `{}`.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct EmptyObj {}

/// Uniform JSON wrapper returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            error: None,
            data,
        }
    }
}

impl Envelope<EmptyObj> {
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            error: Some(error.into()),
            data: EmptyObj {},
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::success("OK!", data)))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, Json(Envelope::success("OK!", data)))
}

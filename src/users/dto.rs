use serde::Serialize;
use uuid::Uuid;

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
}

/// Body of a 422 response.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody<'a> {
    pub code: u16,
    pub reason: &'static str,
    pub message: &'a str,
    pub location: &'static str,
}

/// Body of a 500 response.
#[derive(Debug, Serialize)]
pub struct InternalErrorBody {
    pub code: u16,
    pub message: &'static str,
}

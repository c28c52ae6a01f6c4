use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    state::AppState,
    users::{dto::PublicUser, error::RegisterError, services::register_user},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(register))
}

/// A missing or malformed JSON body is treated as an empty object.
/// A body that cannot be read at all (e.g. over the size limit) keeps axum's rejection.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<PublicUser>), RegisterError> {
    let body = match payload {
        Ok(Json(v)) => v,
        Err(JsonRejection::BytesRejection(e)) => return Err(e.into()),
        Err(e) => {
            debug!(error = %e, "unusable JSON body, treating as empty");
            Value::Null
        }
    };
    let user = register_user(&state, &body).await?;

    let location = format!(
        "{}/{}",
        state.config.users_base_path.trim_end_matches('/'),
        user.id
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        LOCATION,
        HeaderValue::from_str(&location).context("build Location header")?,
    );

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, headers, Json(user.public_view())))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::app::build_app;
    use crate::state::fakes::{self, MemoryUsers};

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/users")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, headers, json)
    }

    #[tokio::test]
    async fn register_returns_201_with_public_view() {
        let users = Arc::new(MemoryUsers::default());
        let app = build_app(fakes::state(users.clone(), Arc::new(fakes::catalog(5))));

        let (status, headers, json) =
            send(app, post_json(json!({"username": "bob", "password": "longenough1"}))).await;

        assert_eq!(status, StatusCode::CREATED);
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2, "only id and username are returned: {}", json);
        assert_eq!(obj["username"], "bob");

        let stored = users.find_by_username("bob").unwrap();
        assert_eq!(obj["id"], stored.id.to_string());
        assert_eq!(
            headers[LOCATION].to_str().unwrap(),
            format!("/api/users/{}", stored.id)
        );
        assert_eq!(stored.performance.0.len(), 5);
    }

    #[tokio::test]
    async fn missing_field_is_422() {
        for (body, field) in [
            (json!({"password": "longenough1"}), "username"),
            (json!({"username": "bob"}), "password"),
        ] {
            let app = build_app(AppState::fake());
            let (status, _, json) = send(app, post_json(body)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(json["code"], 422);
            assert_eq!(json["reason"], "MissingField");
            assert_eq!(json["location"], field);
        }
    }

    #[tokio::test]
    async fn non_json_body_is_missing_username() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method("POST")
            .uri("/api/users")
            .body(Body::from("username=bob"))
            .unwrap();

        let (status, _, json) = send(app, req).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "MissingField");
        assert_eq!(json["location"], "username");
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        let users = Arc::new(MemoryUsers::default());
        let app = build_app(fakes::state(users.clone(), Arc::new(fakes::catalog(1))));
        let huge = "a".repeat(3 * 1024 * 1024);

        let resp = app
            .oneshot(post_json(json!({"username": huge, "password": "longenough1"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(users.len(), 0);
    }

    #[tokio::test]
    async fn numeric_field_is_422_unexpected_type() {
        let app = build_app(AppState::fake());
        let (status, _, json) =
            send(app, post_json(json!({"username": "bob", "password": 12345678}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "UnexpectedType");
        assert_eq!(json["location"], "password");
    }

    #[tokio::test]
    async fn padded_password_is_422() {
        let app = build_app(AppState::fake());
        let (status, _, json) =
            send(app, post_json(json!({"username": "bob", "password": "  secret1"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "WhitespaceNotAllowed");
        assert_eq!(json["location"], "password");
    }

    #[tokio::test]
    async fn overlong_password_is_422() {
        let app = build_app(AppState::fake());
        let (status, _, json) =
            send(app, post_json(json!({"username": "bob", "password": "p".repeat(73)}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "LengthOutOfBounds");
        assert_eq!(json["message"], "Must be at most 72 characters long");
        assert_eq!(json["location"], "password");
    }

    #[tokio::test]
    async fn duplicate_username_is_422() {
        let users = Arc::new(MemoryUsers::default());
        let app = build_app(fakes::state(users, Arc::new(fakes::catalog(1))));
        let body = json!({"username": "alice", "password": "longenough1"});

        let (status, _, _) = send(app.clone(), post_json(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _, json) = send(app, post_json(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["reason"], "DuplicateUsername");
        assert_eq!(json["message"], "Username already taken");
        assert_eq!(json["location"], "username");
    }

    #[tokio::test]
    async fn concurrent_duplicates_never_500() {
        let users = Arc::new(MemoryUsers::racing());
        let app = build_app(fakes::state(users.clone(), Arc::new(fakes::catalog(3))));
        let body = json!({"username": "grace", "password": "longenough1"});

        let (a, b) = tokio::join!(
            send(app.clone(), post_json(body.clone())),
            send(app, post_json(body))
        );

        let mut statuses = vec![a.0.as_u16(), b.0.as_u16()];
        statuses.sort();
        assert_eq!(statuses, vec![201, 422]);
        let rejected = if a.0 == StatusCode::CREATED { b.2 } else { a.2 };
        assert_eq!(rejected["reason"], "DuplicateUsername");
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn collaborator_failure_is_generic_500() {
        let users = Arc::new(MemoryUsers::default());
        let app = build_app(fakes::state(users.clone(), Arc::new(fakes::BrokenCatalog)));

        let (status, _, json) =
            send(app, post_json(json!({"username": "heidi", "password": "longenough1"}))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({"code": 500, "message": "Something went wrong"}));
        assert_eq!(users.len(), 0);
    }
}

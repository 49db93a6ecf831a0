pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::dashboard::upload::MAX_UPLOAD_BYTES;
use crate::generation::handlers as generation;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts & profile
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route(
            "/api/v1/profile",
            get(auth::handle_get_profile).patch(auth::handle_update_profile),
        )
        // Generation & scoring
        .route("/api/v1/resumes/generate", post(generation::handle_generate))
        .route("/api/v1/resumes/ats-score", post(generation::handle_ats_score))
        // Stored resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_save_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).patch(resumes::handle_update_resume),
        )
        .route(
            "/api/v1/resumes/:id/export",
            get(resumes::handle_export_resume),
        )
        // Dashboard view state
        .route("/api/v1/dashboard", get(dashboard::handle_get_dashboard))
        .route("/api/v1/dashboard/create", post(dashboard::handle_select_create))
        .route(
            "/api/v1/dashboard/upload-existing",
            post(dashboard::handle_select_upload),
        )
        .route("/api/v1/dashboard/generate", post(dashboard::handle_generate))
        .route(
            "/api/v1/dashboard/upload",
            post(dashboard::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/dashboard/edit", post(dashboard::handle_edit))
        .route("/api/v1/dashboard/back", post(dashboard::handle_back))
        .route("/api/v1/dashboard/ats-scan", post(dashboard::handle_ats_scan))
        .route("/api/v1/dashboard/export", get(dashboard::handle_export))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::memory::InMemoryCredentialStore;
    use crate::config::Config;
    use crate::dashboard::DashboardRegistry;
    use crate::generation::template::render_template;
    use crate::generation::writer::ResumeWriter;
    use crate::models::resume::fixtures::sample_input;
    use crate::models::resume::StoredResume;
    use crate::resumes::memory::InMemoryResumeStore;

    fn test_app() -> Router {
        let config = Config {
            database_url: None,
            redis_url: None,
            openai_api_key: None,
            openai_api_url: crate::llm_client::DEFAULT_API_URL.to_string(),
            session_ttl_secs: 3600,
            bcrypt_cost: 4,
            port: 0,
            rust_log: "info".to_string(),
        };
        build_router(AppState {
            credentials: Arc::new(InMemoryCredentialStore::new(config.bcrypt_cost)),
            resumes: Arc::new(InMemoryResumeStore::new()),
            writer: ResumeWriter::offline(),
            dashboards: DashboardRegistry::new(std::time::Duration::from_secs(3600)),
            config,
        })
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    fn upload_request(token: &str, file_name: &str, content_type: &str, body: &str) -> Request<Body> {
        let boundary = "resume-upload-boundary";
        let payload = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {body}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/dashboard/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(app: &Router, email: &str) -> String {
        let response = send(
            app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"email": email, "password": "secret-pw", "displayName": "Jane"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["profile"]["hasCompletedOnboarding"], false);
        body["session"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_demo_backends() {
        let app = test_app();
        let response = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["generation"], "template");
        assert_eq!(body["storage"], "memory");
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let app = test_app();
        let response = send(&app, empty_request("GET", "/api/v1/dashboard", "bogus")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_generate_flow_reaches_preview_and_exports() {
        let app = test_app();
        let token = register(&app, "jane@example.com").await;

        let response = send(&app, empty_request("POST", "/api/v1/dashboard/create", &token)).await;
        assert_eq!(body_json(response).await["view"], "create");

        let input = sample_input();
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/dashboard/generate",
                Some(&token),
                serde_json::to_value(&input).unwrap(),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["dashboard"]["view"], "preview");
        assert_eq!(body["dashboard"]["canEdit"], true);
        assert_eq!(body["dashboard"]["preview"]["kind"], "generated");
        assert_eq!(body["dashboard"]["preview"]["text"], render_template(&input));

        // Generated resume was persisted for the user
        let response = send(&app, empty_request("GET", "/api/v1/resumes", &token)).await;
        let listed: Vec<StoredResume> =
            serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.to_string(), body["resumeId"]);

        let response = send(&app, empty_request("GET", "/api/v1/dashboard/export", &token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.txt\""
        );

        let response = send(&app, empty_request("POST", "/api/v1/dashboard/edit", &token)).await;
        let body = body_json(response).await;
        assert_eq!(body["view"], "edit");
        assert_eq!(body["draft"]["fullName"], "Jane Doe");

        let response = send(&app, empty_request("POST", "/api/v1/dashboard/back", &token)).await;
        assert_eq!(body_json(response).await["view"], "main");
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_without_state_change() {
        let app = test_app();
        let token = register(&app, "jane@example.com").await;
        send(&app, empty_request("POST", "/api/v1/dashboard/create", &token)).await;

        let mut input = sample_input();
        input.full_name.clear();
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/dashboard/generate",
                Some(&token),
                serde_json::to_value(&input).unwrap(),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["fields"][0]["field"],
            "fullName"
        );

        let response = send(&app, empty_request("GET", "/api/v1/dashboard", &token)).await;
        let body = body_json(response).await;
        assert_eq!(body["view"], "create");
        assert_eq!(body["inFlight"], false);
    }

    #[tokio::test]
    async fn test_csv_upload_is_rejected_and_txt_upload_previews() {
        let app = test_app();
        let token = register(&app, "jane@example.com").await;
        send(&app, empty_request("POST", "/api/v1/dashboard/upload-existing", &token)).await;

        let response = send(&app, upload_request(&token, "resume.csv", "text/csv", "a,b")).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let response = send(&app, empty_request("GET", "/api/v1/dashboard", &token)).await;
        assert_eq!(body_json(response).await["view"], "upload");

        let response = send(&app, upload_request(&token, "cv.pdf", "application/pdf", "%PDF")).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = send(&app, upload_request(&token, "resume.txt", "text/plain", "hello")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["view"], "preview");
        assert_eq!(body["preview"]["kind"], "uploaded");
        assert_eq!(body["preview"]["text"], "hello");
        assert_eq!(body["canEdit"], false);

        let response = send(&app, empty_request("POST", "/api/v1/dashboard/edit", &token)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, empty_request("POST", "/api/v1/dashboard/ats-scan", &token)).await;
        let body = body_json(response).await;
        assert_eq!(body["score"], 60);
        assert_eq!(body["band"], "fair");
        assert_eq!(body["source"], "fallback");
    }

    #[tokio::test]
    async fn test_saved_resume_round_trips_and_is_private() {
        let app = test_app();
        let alice = register(&app, "alice@example.com").await;
        let bob = register(&app, "bob@example.com").await;

        let mut payload = serde_json::to_value(sample_input()).unwrap();
        payload["generatedResume"] = json!("JANE DOE");
        let response = send(
            &app,
            json_request("POST", "/api/v1/resumes", Some(&alice), payload),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = send(&app, empty_request("GET", &format!("/api/v1/resumes/{id}"), &alice)).await;
        let stored: StoredResume = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(stored.input, sample_input());
        assert_eq!(stored.generated_resume.as_deref(), Some("JANE DOE"));

        let response = send(&app, empty_request("GET", &format!("/api/v1/resumes/{id}"), &bob)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            empty_request("GET", &format!("/api/v1/resumes/{id}/export"), &alice),
        )
        .await;
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"JANE DOE");
    }

    #[tokio::test]
    async fn test_profile_update_and_logout() {
        let app = test_app();
        let token = register(&app, "jane@example.com").await;

        let response = send(
            &app,
            json_request(
                "PATCH",
                "/api/v1/profile",
                Some(&token),
                json!({"hasCompletedOnboarding": true}),
            ),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["hasCompletedOnboarding"], true);
        assert_eq!(body["displayName"], "Jane");

        let response = send(&app, empty_request("POST", "/api/v1/auth/logout", &token)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, empty_request("GET", "/api/v1/profile", &token)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_surfaces_provider_message() {
        let app = test_app();
        register(&app, "jane@example.com").await;
        let response = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"email": "jane@example.com", "password": "another-pw"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Email already in use"
        );
    }

    #[tokio::test]
    async fn test_upload_outside_upload_view_is_refused() {
        let app = test_app();
        let token = register(&app, "jane@example.com").await;

        let response = send(&app, upload_request(&token, "resume.txt", "text/plain", "hello")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "INVALID_TRANSITION"
        );

        let response = send(&app, empty_request("GET", "/api/v1/dashboard", &token)).await;
        let body = body_json(response).await;
        assert_eq!(body["view"], "main");
        assert!(body["preview"].is_null());
    }
}


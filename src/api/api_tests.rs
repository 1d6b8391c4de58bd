#[cfg(test)]
mod router_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::AppConfig;
    use crate::models::LogEntry;
    use crate::observability::AppMetrics;
    use crate::storage::{StorageFactory, Stores};

    fn app_with(config: AppConfig) -> (Router, Stores) {
        let stores = StorageFactory::in_memory();
        let state = AppState::from_config(&config, stores.clone(), Arc::new(AppMetrics::default()));
        (create_router(state), stores)
    }

    fn app() -> Router {
        app_with(AppConfig::testing()).0
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn add_a(app: &Router) -> Value {
        let (status, body) = send(
            app,
            form_post("/add_student", "name=A&register_no=1&room_no=101&course=CS"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn test_admin_login() {
        let app = app();

        let (status, body) = send(
            &app,
            json_post("/login", json!({"username": "admin", "password": "1234"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "success", "message": "Admin logged in", "admin": {"username": "admin"}})
        );

        let (status, body) = send(
            &app,
            json_post("/login", json!({"username": "admin", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"status": "error", "message": "Invalid credentials"}));
    }

    #[tokio::test]
    async fn test_logouts_always_succeed() {
        let app = app();
        let (status, body) = send(&app, get("/logout")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Admin logged out");

        let (status, body) = send(&app, get("/student/logout")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student logged out");
    }

    #[tokio::test]
    async fn test_add_student_on_empty_collection() {
        let app = app();
        let body = add_a(&app).await;
        assert_eq!(
            body,
            json!({
                "status": "success",
                "message": "Student added",
                "student": {"id": 1, "name": "A", "register_no": "1", "room_no": "101", "course": "CS"}
            })
        );
    }

    #[tokio::test]
    async fn test_add_student_without_fields_stores_nulls() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/add_student")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["student"],
            json!({"id": 1, "name": null, "register_no": null, "room_no": null, "course": null})
        );
    }

    #[tokio::test]
    async fn test_edit_student() {
        let app = app();
        add_a(&app).await;

        let (status, body) = send(&app, form_post("/edit_student/1", "room_no=202")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student updated");
        assert_eq!(
            body["student"],
            json!({"id": 1, "name": "A", "register_no": "1", "room_no": "202", "course": "CS"})
        );

        let (status, body) = send(&app, form_post("/edit_student/999", "room_no=303")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Student not found"}));
    }

    #[tokio::test]
    async fn test_edit_with_non_integer_id_is_not_found() {
        let app = app();
        let (status, body) = send(&app, form_post("/edit_student/abc", "room_no=1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_delete_student_is_idempotent() {
        let app = app();
        add_a(&app).await;

        for _ in 0..2 {
            let (status, body) = send(&app, delete("/delete_student/1")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"status": "success", "message": "Student deleted"}));
        }

        let (_, body) = send(&app, get("/students")).await;
        assert_eq!(body, json!({"status": "success", "students": []}));
    }

    #[tokio::test]
    async fn test_list_students_preserves_order() {
        let app = app();
        for name in ["C", "A", "B"] {
            send(&app, form_post("/add_student", &format!("name={}", name))).await;
        }

        let (status, body) = send(&app, get("/students")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["students"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_student_login() {
        let app = app();
        add_a(&app).await;

        let (status, body) = send(
            &app,
            json_post("/student/login", json!({"name": "A", "register_no": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Student logged in");
        assert_eq!(body["student"]["id"], 1);

        // 数字学号按文本比较
        let (status, _) = send(
            &app,
            json_post("/student/login", json!({"name": "A", "register_no": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            json_post("/student/login", json!({"name": "A", "register_no": "999"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Student not found"}));
    }

    #[tokio::test]
    async fn test_view_logs_and_my_logs() {
        let (app, stores) = app_with(AppConfig::testing());
        let logs: Vec<LogEntry> = serde_json::from_value(json!([
            {"id": 1, "student_id": 1, "entry_time": "2024-05-01T08:00:00Z"},
            {"id": 2, "student_id": 2, "entry_time": "2024-05-01T08:05:00Z"},
            {"id": 3, "student_id": 1, "exit_time": "2024-05-01T19:00:00Z"}
        ]))
        .unwrap();
        stores.logs.save(&logs).await.unwrap();

        let (status, body) = send(&app, get("/view_logs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logs"].as_array().unwrap().len(), 3);
        assert_eq!(body["logs"][2]["id"], 3);

        let (status, body) = send(&app, get("/my_logs?student_id=1")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = body["logs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_my_logs_rejects_bad_student_id() {
        let app = app();
        for uri in ["/my_logs", "/my_logs?student_id=abc"] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["status"], "error");
        }
    }

    #[tokio::test]
    async fn test_record_movement() {
        let app = app();
        add_a(&app).await;

        let (status, body) = send(
            &app,
            json_post(
                "/log_movement",
                json!({"student_id": 1, "kind": "entry", "status": "On Time"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["log"]["id"], 1);
        assert_eq!(body["log"]["name"], "A");
        assert_eq!(body["log"]["entry_status"], "On Time");

        let (status, _) = send(
            &app,
            json_post("/log_movement", json!({"student_id": 1, "kind": "Exit"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, get("/my_logs?student_id=1")).await;
        let logs = body["logs"].as_array().unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0]["exit_time"].is_string());

        let (status, body) = send(
            &app,
            json_post("/log_movement", json!({"student_id": 42, "kind": "entry"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Student not found");
    }

    #[tokio::test]
    async fn test_unique_register_no_conflict() {
        let mut config = AppConfig::testing();
        config.storage.unique_register_no = true;
        let (app, _) = app_with(config);
        add_a(&app).await;

        let (status, body) = send(&app, form_post("/add_student", "name=B&register_no=1")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_envelope() {
        let app = app();
        let (status, body) = send(&app, get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Not found"}));
    }

    #[tokio::test]
    async fn test_wrong_method_returns_envelope() {
        let app = app();
        let response = app.clone().oneshot(get("/add_student")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow = response
            .headers()
            .get("allow")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(allow.contains("POST"));

        let (status, body) = send(&app, get("/delete_student/1")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"status": "error", "message": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_admin_login_rejects_numeric_password() {
        let app = app();
        let (status, body) = send(
            &app,
            json_post("/login", json!({"username": "admin", "password": 1234})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"status": "error", "message": "Invalid credentials"}));
    }

    #[tokio::test]
    async fn test_external_logs_served_as_stored() {
        let (app, stores) = app_with(AppConfig::testing());
        let stored = json!([
            {"student_id": 1, "action": "in"},
            {"student_id": 1, "entry_time": 1714597800},
            {"action": "heartbeat"},
            {"student_id": "1"}
        ]);
        let logs: Vec<LogEntry> = serde_json::from_value(stored.clone()).unwrap();
        stores.logs.save(&logs).await.unwrap();

        let (status, body) = send(&app, get("/view_logs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logs"], stored);

        let (status, body) = send(&app, get("/my_logs?student_id=1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logs"], Value::Array(stored.as_array().unwrap()[..2].to_vec()));
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let app = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/students")
                    .header("Origin", "http://192.168.43.137:8081")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }
}

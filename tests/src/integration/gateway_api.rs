//! # In-Process HTTP Tests
//!
//! Drives the assembled gateway router with `tower::ServiceExt::oneshot` —
//! no socket, no framework mocking. Covers authentication, role denial,
//! the randomization endpoint, and the `{message}` error payload shape.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use rct_04_api_gateway::{ApiGatewayService, BootstrapAdmin, GatewayConfig};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn gateway(seed: u64) -> Router {
        let config = GatewayConfig {
            rng_seed: Some(seed),
            bootstrap_admin: Some(BootstrapAdmin {
                username: "root".to_string(),
                secret: "rootpw".to_string(),
            }),
            ..GatewayConfig::default()
        };
        ApiGatewayService::new(config)
            .expect("gateway construction")
            .router()
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(router: &Router, username: &str, secret: &str) -> String {
        let (status, body) = send(
            router,
            "POST",
            "/login",
            None,
            Some(json!({ "username": username, "secret": secret })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        assert_eq!(body["success"], json!(true));
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a randomized study with 1:1 arms, returning its id.
    async fn setup_study(router: &Router, token: &str, randomization_type: &str) -> u64 {
        let (status, study) = send(
            router,
            "POST",
            "/api/studies",
            Some(token),
            Some(json!({
                "name": "Hypertension Trial",
                "randomization_type": randomization_type,
                "is_randomized": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create study: {}", study);
        let study_id = study["id"].as_u64().unwrap();

        for name in ["A", "B"] {
            let (status, arm) = send(
                router,
                "POST",
                &format!("/api/studies/{}/arms", study_id),
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "create arm: {}", arm);
        }
        study_id
    }

    #[tokio::test]
    async fn test_health_is_open() {
        let router = gateway(1);
        let (status, body) = send(&router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
    }

    #[tokio::test]
    async fn test_api_requires_a_token() {
        let router = gateway(1);

        let (status, body) = send(&router, "GET", "/api/studies", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], json!("Token is missing!"));

        let (status, body) =
            send(&router, "GET", "/api/studies", Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], json!("Invalid token!"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let router = gateway(1);
        let (status, body) = send(
            &router,
            "POST",
            "/login",
            None,
            Some(json!({ "username": "root", "secret": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], json!("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_logout_revokes_the_session() {
        let router = gateway(1);
        let token = login(&router, "root", "rootpw").await;

        let (status, _) = send(&router, "POST", "/api/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&router, "GET", "/api/studies", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_randomize_end_to_end_cluster() {
        let router = gateway(42);
        let token = login(&router, "root", "rootpw").await;
        let study_id = setup_study(&router, &token, "cluster").await;

        let (status, first) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&token),
            Some(json!({ "study_id": study_id, "patient_id": 1, "site_id": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "randomize: {}", first);
        let arm = first["assigned_arm"].as_str().unwrap();
        assert!(["A", "B"].contains(&arm));
        assert!(first["treatment_arm_id"].is_u64());

        // A different patient at the same site reuses the fixed arm.
        let (status, second) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&token),
            Some(json!({ "study_id": study_id, "patient_id": 2, "site_id": 7 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["assigned_arm"], first["assigned_arm"]);

        // Both decisions are on the site's audit trail.
        let (status, history) = send(
            &router,
            "GET",
            "/api/sites/7/assignments",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 2);

        let (status, patient_history) = send(
            &router,
            "GET",
            "/api/patients/1/assignments",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patient_history.as_array().unwrap().len(), 1);
        assert_eq!(patient_history[0]["arm_name"].as_str().unwrap(), arm);
    }

    #[tokio::test]
    async fn test_randomize_records_stratification_values() {
        let router = gateway(9);
        let token = login(&router, "root", "rootpw").await;
        let study_id = setup_study(&router, &token, "stratified").await;

        let (status, _) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&token),
            Some(json!({
                "study_id": study_id,
                "patient_id": 5,
                "stratification_values": { "sex": "F", "age_group": "18-35" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, history) = send(
            &router,
            "GET",
            "/api/patients/5/assignments",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(
            history[0]["stratification_values"],
            json!({ "age_group": "18-35", "sex": "F" })
        );
    }

    #[tokio::test]
    async fn test_unsupported_strategy_maps_to_400_with_message() {
        let router = gateway(1);
        let token = login(&router, "root", "rootpw").await;
        let study_id = setup_study(&router, &token, "quantum").await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&token),
            Some(json!({ "study_id": study_id, "patient_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Unsupported randomization type"));
    }

    #[tokio::test]
    async fn test_randomize_unknown_study_is_404() {
        let router = gateway(1);
        let token = login(&router, "root", "rootpw").await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&token),
            Some(json!({ "study_id": 404, "patient_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_staff_role_is_denied_study_creation() {
        let router = gateway(1);
        let admin_token = login(&router, "root", "rootpw").await;

        let (status, _) = send(
            &router,
            "POST",
            "/api/users",
            Some(&admin_token),
            Some(json!({ "username": "nurse1", "role": "staff", "secret": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let staff_token = login(&router, "nurse1", "pw").await;
        let (status, body) = send(
            &router,
            "POST",
            "/api/studies",
            Some(&staff_token),
            Some(json!({ "name": "Rogue", "is_randomized": true })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["message"].as_str().unwrap().contains("Access denied"));
    }

    #[tokio::test]
    async fn test_staff_can_randomize() {
        let router = gateway(2);
        let admin_token = login(&router, "root", "rootpw").await;
        let study_id = setup_study(&router, &admin_token, "simple").await;

        send(
            &router,
            "POST",
            "/api/users",
            Some(&admin_token),
            Some(json!({ "username": "nurse2", "role": "staff", "secret": "pw" })),
        )
        .await;
        let staff_token = login(&router, "nurse2", "pw").await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/randomize",
            Some(&staff_token),
            Some(json!({ "study_id": study_id, "patient_id": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "randomize: {}", body);
    }

    #[tokio::test]
    async fn test_site_crud_round_trip() {
        let router = gateway(1);
        let token = login(&router, "root", "rootpw").await;

        let (status, site) = send(
            &router,
            "POST",
            "/api/sites",
            Some(&token),
            Some(json!({ "name": "North", "location": "Oslo" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let site_id = site["id"].as_u64().unwrap();

        let (status, updated) = send(
            &router,
            "PUT",
            &format!("/api/sites/{}", site_id),
            Some(&token),
            Some(json!({ "location": "Trondheim" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["location"], json!("Trondheim"));

        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/api/sites/{}", site_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, sites) = send(&router, "GET", "/api/sites", Some(&token), None).await;
        assert!(sites.as_array().unwrap().is_empty());
    }
}

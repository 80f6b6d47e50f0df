use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use serde_json::json;
use sqlx::PgPool;
use taskvault::auth::{AuthMiddleware, TokenService};
use taskvault::routes;
use taskvault::routes::health;

const TEST_JWT_SECRET: &str = "taskvault-test-secret";

async fn test_pool() -> PgPool {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    taskvault::db::create_tables(&pool)
        .await
        .expect("Failed to create tables");
    pool
}

async fn cleanup_user(pool: &PgPool, email: &str) {
    // owner_id cascades, so the user's tasks go with them
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

#[actix_rt::test]
async fn test_signup_and_login_flow() {
    let pool = test_pool().await;
    cleanup_user(&pool, "integration@example.com").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(TokenService::new(TEST_JWT_SECRET)))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    // Sign up a new user
    let signup_payload = json!({
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Signup failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );
    let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(body["message"], "User created successfully");

    // Sign up the same email again (should fail with a conflict)
    let req_conflict = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(&json!({
            "email": "integration@example.com",
            "password": "AnotherPassword!"
        }))
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    let status_conflict = resp_conflict.status();
    let body_conflict: serde_json::Value = test::read_body_json(resp_conflict).await;
    assert_eq!(status_conflict, actix_web::http::StatusCode::BAD_REQUEST);
    assert_eq!(body_conflict["error"], "Email already registered");

    // Login with the registered user (form-encoded, OAuth2 password-flow shape)
    let req_login = test::TestRequest::post()
        .uri("/api/login")
        .set_form(&[
            ("username", "integration@example.com"),
            ("password", "Password123!"),
        ])
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let body_bytes_login = test::read_body(resp_login).await;
    assert_eq!(
        status_login,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes_login)
    );

    let login_response: taskvault::auth::TokenResponse =
        serde_json::from_slice(&body_bytes_login).expect("Failed to parse login response JSON");
    assert_eq!(login_response.token_type, "bearer");
    assert!(
        !login_response.access_token.is_empty(),
        "Token should be a non-empty string"
    );

    // The token's subject must be the registered user's id
    let subject = TokenService::new(TEST_JWT_SECRET)
        .verify(&login_response.access_token)
        .expect("Freshly issued token must verify");
    let (user_id,): (i32,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind("integration@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(subject, user_id);

    cleanup_user(&pool, "integration@example.com").await;
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let pool = test_pool().await;
    let email = "login_probe@example.com";
    cleanup_user(&pool, email).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(TokenService::new(TEST_JWT_SECRET)))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    // Register a real user
    let req = test::TestRequest::post()
        .uri("/api/signup")
        .set_json(&json!({ "email": email, "password": "RightPassword1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success(), "Setup: signup failed");

    // Wrong password for an existing account
    let req_wrong_pw = test::TestRequest::post()
        .uri("/api/login")
        .set_form(&[("username", email), ("password", "WrongPassword1")])
        .to_request();
    let resp_wrong_pw = test::call_service(&app, req_wrong_pw).await;
    assert_eq!(
        resp_wrong_pw.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        resp_wrong_pw
            .headers()
            .get("WWW-Authenticate")
            .map(|v| v.to_str().unwrap()),
        Some("Bearer")
    );
    let body_wrong_pw = test::read_body(resp_wrong_pw).await;

    // Unknown email entirely
    let req_unknown = test::TestRequest::post()
        .uri("/api/login")
        .set_form(&[
            ("username", "nobody@example.com"),
            ("password", "RightPassword1"),
        ])
        .to_request();
    let resp_unknown = test::call_service(&app, req_unknown).await;
    assert_eq!(
        resp_unknown.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );
    let body_unknown = test::read_body(resp_unknown).await;

    // Both failure causes produce byte-identical bodies (no account enumeration)
    assert_eq!(body_wrong_pw, body_unknown);
    let body: serde_json::Value = serde_json::from_slice(&body_unknown).unwrap();
    assert_eq!(body["error"], "Incorrect username or password");

    cleanup_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_invalid_signup_inputs() {
    let pool = test_pool().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(TokenService::new(TEST_JWT_SECRET)))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await;

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": "test@example.com" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (expect 422 after successful deserialization)
        (
            json!({ "email": "invalid-email", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "a".repeat(73) }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password over 72 bytes",
        ),
        (
            // 37 two-byte characters: 74 UTF-8 bytes despite only 37 chars
            json!({ "email": "test@example.com", "password": "ü".repeat(37) }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "multibyte password over 72 bytes",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/signup")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

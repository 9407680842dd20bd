use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

use wicket_api::app::build_app;
use wicket_api::config::Config;
use wicket_auth::HashCost;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build the same router as prod (in-memory store), bound to an
        // ephemeral port.
        let config = Config {
            jwt_secret: jwt_secret.to_string(),
            token_ttl: chrono::Duration::minutes(10),
            hash_cost: HashCost { iterations: 1 },
            port: 0,
            use_persistent_stores: false,
            database_url: None,
        };
        let app = build_app(config).await.expect("failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn register(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    role_id: Option<i16>,
) -> reqwest::Response {
    let mut body = json!({
        "username": username,
        "password": "Sup3rSecret1",
        "email": format!("{username}@example.com"),
        "first_name": "Test",
        "last_name": "User",
    });
    if let Some(role_id) = role_id {
        body["role_id"] = json!(role_id);
    }

    client
        .post(format!("{base_url}/api/users/register"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn login(client: &reqwest::Client, base_url: &str, username: &str, password: &str) -> String {
    let res = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

fn mint_raw_token(secret: &str, claims: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn error_code(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn public_routes_skip_authentication() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/healthcheck", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "unauthenticated");

    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_malformed");
}

#[tokio::test]
async fn register_login_and_read_own_details() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = register(&client, &srv.base_url, "nitish", None).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["username"], "nitish");
    assert_eq!(created["role"], "SUB ADMIN");
    assert!(created.get("password_hash").is_none());
    assert!(created.get("deleted_at").is_none());

    let token = login(&client, &srv.base_url, "nitish", "Sup3rSecret1").await;

    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let details: serde_json::Value = res.json().await.unwrap();
    assert_eq!(details["username"], "nitish");
    assert_eq!(details["role_id"], 2);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "nitish", None).await;

    // Wrong password and unknown username produce identical responses.
    let mut codes = Vec::new();
    for (username, password) in [("nitish", "WrongPass1"), ("no-such-user", "WrongPass1")] {
        let res = client
            .post(format!("{}/api/auth/login", srv.base_url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        codes.push(error_code(res).await);
    }
    assert_eq!(codes[0], "invalid_credentials");
    assert_eq!(codes[0], codes[1]);
}

#[tokio::test]
async fn deactivated_user_cannot_login() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/users/register", srv.base_url))
        .json(&json!({
            "username": "parked",
            "password": "Sup3rSecret1",
            "email": "parked@example.com",
            "first_name": "Parked",
            "last_name": "User",
            "is_active": false,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Correct password, deactivated account.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "parked", "password": "Sup3rSecret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "inactive_user");
}

#[tokio::test]
async fn sub_admin_is_forbidden_on_admin_routes() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "subadmin", None).await;
    let token = login(&client, &srv.base_url, "subadmin", "Sup3rSecret1").await;

    let res = client
        .get(format!("{}/api/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "forbidden");
}

#[tokio::test]
async fn admin_can_manage_the_directory() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "boss", Some(1)).await;
    register(&client, &srv.base_url, "other-boss", Some(1)).await;
    register(&client, &srv.base_url, "sub1", None).await;
    register(&client, &srv.base_url, "sub2", None).await;
    let token = login(&client, &srv.base_url, "boss", "Sup3rSecret1").await;

    // Listing shows sub-admins only.
    let res = client
        .get(format!("{}/api/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["sub1", "sub2"]);

    // Sub-admin details are readable; other admins are not.
    let res = client
        .get(format!("{}/api/users/details/sub1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/users/details/other-boss", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin updates a sub-admin's profile.
    let res = client
        .patch(format!("{}/api/users/update/sub1", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "first_name": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["first_name"], "Renamed");

    // Deactivate blocks login, activate restores it.
    let res = client
        .patch(format!("{}/api/users/deactivate/sub1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "sub1", "password": "Sup3rSecret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "inactive_user");

    let res = client
        .patch(format!("{}/api/users/activate/sub1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    login(&client, &srv.base_url, "sub1", "Sup3rSecret1").await;

    // Soft delete: gone from lookups and from login.
    let res = client
        .delete(format!("{}/api/users/delete/sub2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/users/details/sub2", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "sub2", "password": "Sup3rSecret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credentials");

    // The username can be registered again after the soft delete.
    let res = client
        .post(format!("{}/api/users/register", srv.base_url))
        .json(&json!({
            "username": "sub2",
            "password": "Sup3rSecret1",
            "email": "sub2-next@example.com",
            "first_name": "Second",
            "last_name": "Life",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn forged_and_expired_tokens_are_rejected() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "nitish", None).await;
    let token = login(&client, &srv.base_url, "nitish", "Sup3rSecret1").await;

    // One tampered signature character.
    let (head, sig) = token.rsplit_once('.').unwrap();
    let mut sig: Vec<char> = sig.chars().collect();
    sig[0] = if sig[0] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{head}.{}", sig.into_iter().collect::<String>());

    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth(&tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_invalid");

    // Signed with somebody else's secret.
    let now = Utc::now().timestamp();
    let forged = mint_raw_token(
        "not-the-server-secret",
        json!({
            "sub": uuid::Uuid::now_v7().to_string(),
            "username": "nitish",
            "role_id": 1,
            "iat": now,
            "exp": now + 600,
        }),
    );
    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth(&forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_invalid");

    // Correct secret, past expiry.
    let expired = mint_raw_token(
        "test-secret",
        json!({
            "sub": uuid::Uuid::now_v7().to_string(),
            "username": "nitish",
            "role_id": 1,
            "iat": now - 600,
            "exp": now - 10,
        }),
    );
    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth(&expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_expired");
}

#[tokio::test]
async fn token_without_a_role_is_authenticated_but_forbidden() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let now = Utc::now().timestamp();
    let roleless = mint_raw_token(
        "test-secret",
        json!({
            "sub": uuid::Uuid::now_v7().to_string(),
            "username": "ghost",
            "iat": now,
            "exp": now + 600,
        }),
    );

    let res = client
        .get(format!("{}/api/users/details", srv.base_url))
        .bearer_auth(&roleless)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "forbidden");
}

#[tokio::test]
async fn registration_is_validated_and_unique() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/users/register", srv.base_url))
        .json(&json!({
            "username": "weak",
            "password": "password",
            "email": "weak@example.com",
            "first_name": "Weak",
            "last_name": "Password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "validation_error");

    let res = register(&client, &srv.base_url, "nitish", None).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = register(&client, &srv.base_url, "nitish", None).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "conflict");
}

#[tokio::test]
async fn users_can_rotate_their_own_password() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "rotator", None).await;
    let token = login(&client, &srv.base_url, "rotator", "Sup3rSecret1").await;

    let res = client
        .patch(format!("{}/api/users/update", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "password": "N3wSecret!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The old password no longer works; the new one does.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "rotator", "password": "Sup3rSecret1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    login(&client, &srv.base_url, "rotator", "N3wSecret!").await;
}

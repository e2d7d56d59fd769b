//! End-to-end session and CRUD flows against a mock REST API.
//!
//! | Flow | Routes | Test |
//! |------|--------|------|
//! | login → admin → logout | `/login`, `/`, `/admin` | `login_unlocks_admin_until_logout` |
//! | bad credentials | `/login` | `invalid_credentials_leave_no_marker` |
//! | already signed in | `/login` → `/` | `login_while_authenticated_skips_lookup` |
//! | prisoner round-trips | `/` | `prisoner_round_trips` |
//! | user add / update / delete | `/admin` | `user_management_hides_passwords` |
//! | corrupt state file | `/login` | `login_replaces_corrupt_state_file` |
//! | unwritable state | `/login` | `login_fails_when_session_cannot_be_saved` |

use anyhow::Result;
use cellblock::{
    api::ApiClient,
    app::AppContext,
    cli::actions::{
        Action,
        prisoners::{PrisonerCommand, parse_fields},
        session::LoginArgs,
        users::UserCommand,
    },
    config::AppConfig,
    errors::AppError,
    features::{
        auth::{AuthStore, FileStore, KeyValueStore, MemoryStore, state::AUTH_KEY},
        prisoners::Prisoner,
    },
};
use secrecy::SecretString;
use serde_json::json;
use std::{net::TcpListener, path::Path};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn api(server: &MockServer) -> ApiClient {
    let config = AppConfig::new(Some(&format!("{}/api", server.uri())), None, None).unwrap();
    ApiClient::new(&config).unwrap()
}

fn file_context(server: &MockServer, state: &Path) -> AppContext<FileStore> {
    AppContext::new(AuthStore::hydrate(FileStore::new(state)), api(server))
}

fn login_action(username: &str, password: &str) -> Action {
    Action::Login(LoginArgs {
        username: username.to_string(),
        password: SecretString::from(password.to_string()),
    })
}

async fn mount_users(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "1", "username": "warden", "password": "s3cret" },
            { "id": "2", "username": "guard", "password": "night-shift" }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_unlocks_admin_until_logout() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_users(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/prisoners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("state.json");

    let ctx = file_context(&server, &state);
    let err = Action::Users(UserCommand::List).run(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("authentication required"));

    let output = login_action("warden", "s3cret").run(&ctx).await?;
    assert_eq!(output["status"], "authenticated");
    assert_eq!(output["route"], "/");
    assert_eq!(output["user"], json!({ "id": "1", "username": "warden" }));
    assert!(ctx.auth.is_authenticated());

    // A new process over the same state file picks the session up.
    let ctx = file_context(&server, &state);
    assert!(ctx.auth.is_authenticated());
    assert_eq!(ctx.auth.storage().get(AUTH_KEY)?.as_deref(), Some("true"));

    let users = Action::Users(UserCommand::List).run(&ctx).await?;
    assert_eq!(
        users,
        json!([
            { "id": "1", "username": "warden" },
            { "id": "2", "username": "guard" }
        ])
    );

    let page = Action::Open {
        path: "/login".to_string(),
    }
    .run(&ctx)
    .await?;
    assert_eq!(page["route"], "/");
    assert_eq!(page["redirected"], true);
    assert_eq!(page["data"], json!([]));

    let output = Action::Logout.run(&ctx).await?;
    assert_eq!(output["status"], "signed out");
    assert_eq!(ctx.auth.storage().get(AUTH_KEY)?, None);

    let page = Action::Open {
        path: "/admin".to_string(),
    }
    .run(&ctx)
    .await?;
    assert_eq!(page["requested"], "/admin");
    assert_eq!(page["route"], "/login");
    assert!(page["data"]["hint"].is_string());

    let status = Action::Status.run(&ctx).await?;
    assert_eq!(status, json!({ "authenticated": false }));
    Ok(())
}

#[tokio::test]
async fn invalid_credentials_leave_no_marker() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_users(&server).await;
    let ctx = AppContext::new(AuthStore::new(MemoryStore::new()), api(&server));

    for (username, password) in [("warden", "wrong"), ("nobody", "s3cret")] {
        let err = login_action(username, password).run(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("Invalid username or password"));
        assert!(!ctx.auth.is_authenticated());
        assert_eq!(ctx.auth.storage().get(AUTH_KEY)?, None);
    }
    Ok(())
}

#[tokio::test]
async fn login_while_authenticated_skips_lookup() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = AppContext::new(AuthStore::new(MemoryStore::new()), api(&server));
    ctx.auth.login();

    let output = login_action("warden", "s3cret").run(&ctx).await?;
    assert_eq!(output["status"], "already authenticated");
    assert_eq!(output["route"], "/");
    Ok(())
}

#[tokio::test]
async fn prisoner_round_trips() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    // Collection reads in order: empty, after save, after delete.
    Mock::given(method("GET"))
        .and(path("/api/prisoners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prisoners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "7", "name": "Edmond Dantes", "cell": 34 }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prisoners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/prisoners"))
        .and(body_json(json!({ "name": "Edmond Dantes", "cell": 34 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "7", "name": "Edmond Dantes", "cell": 34
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Item reads: before the update (for the merge) and after it.
    Mock::given(method("GET"))
        .and(path("/api/prisoners/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7", "name": "Edmond Dantes", "cell": 34
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/prisoners/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7", "name": "Edmond Dantes", "cell": 35
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/prisoners/7"))
        .and(body_json(json!({ "name": "Edmond Dantes", "cell": 35 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7", "name": "Edmond Dantes", "cell": 35
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/prisoners/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "7", "name": "Edmond Dantes", "cell": 35
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = AppContext::new(AuthStore::new(MemoryStore::new()), api(&server));

    assert_eq!(ctx.prisoners.find_all().await?, Vec::<Prisoner>::new());

    let created = Action::Prisoners(PrisonerCommand::Add {
        fields: parse_fields(["name=Edmond Dantes", "cell=34"])?,
    })
    .run(&ctx)
    .await?;
    assert_eq!(created["id"], "7");

    let all = ctx.prisoners.find_all().await?;
    assert!(all.iter().any(|p| p.id.as_deref() == Some("7")
        && p.field("name") == Some(&json!("Edmond Dantes"))));

    let updated = Action::Prisoners(PrisonerCommand::Update {
        id: "7".to_string(),
        fields: parse_fields(["cell=35"])?,
    })
    .run(&ctx)
    .await?;
    assert_eq!(updated["cell"], 35);

    let fetched = ctx.prisoners.find_by_id("7").await?;
    assert_eq!(fetched.field("cell"), Some(&json!(35)));

    let confirmation = Action::Prisoners(PrisonerCommand::Delete { id: "7".to_string() })
        .run(&ctx)
        .await?;
    assert_eq!(confirmation["id"], "7");

    let all = ctx.prisoners.find_all().await?;
    assert!(all.iter().all(|p| p.id.as_deref() != Some("7")));
    Ok(())
}

#[tokio::test]
async fn user_management_hides_passwords() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({ "username": "cook", "password": "stew" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "5", "username": "cook", "password": "stew"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "username": "cook", "password": "stew", "shift": "night"
        })))
        .mount(&server)
        .await;
    // The fetched record is sent back without its id, extra fields kept.
    Mock::given(method("PUT"))
        .and(path("/api/users/5"))
        .and(body_json(json!({
            "username": "cook", "password": "soup", "shift": "night"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "username": "cook", "password": "soup", "shift": "night"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "5", "username": "cook", "password": "soup", "shift": "night"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = AppContext::new(AuthStore::new(MemoryStore::new()), api(&server));
    ctx.auth.login();

    let created = Action::Users(UserCommand::Add {
        username: "cook".to_string(),
        password: SecretString::from("stew".to_string()),
    })
    .run(&ctx)
    .await?;
    assert_eq!(created, json!({ "id": "5", "username": "cook" }));

    let updated = Action::Users(UserCommand::Update {
        id: "5".to_string(),
        username: None,
        password: Some(SecretString::from("soup".to_string())),
    })
    .run(&ctx)
    .await?;
    assert_eq!(
        updated,
        json!({ "id": "5", "username": "cook", "shift": "night" })
    );

    let deleted = Action::Users(UserCommand::Delete { id: "5".to_string() })
        .run(&ctx)
        .await?;
    assert_eq!(
        deleted,
        json!({ "id": "5", "username": "cook", "shift": "night" })
    );
    assert!(deleted.get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn login_replaces_corrupt_state_file() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_users(&server).await;
    let dir = tempfile::tempdir()?;
    let state = dir.path().join("state.json");
    std::fs::write(&state, "{not json")?;

    let ctx = file_context(&server, &state);
    assert!(!ctx.auth.is_authenticated());

    let output = login_action("warden", "s3cret").run(&ctx).await?;
    assert_eq!(output["status"], "authenticated");
    assert!(file_context(&server, &state).auth.is_authenticated());

    Action::Logout.run(&ctx).await?;
    assert!(!file_context(&server, &state).auth.is_authenticated());
    Ok(())
}

/// Storage that accepts reads but refuses every write.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> std::result::Result<Option<String>, AppError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), AppError> {
        Err(AppError::Storage("read-only".to_string()))
    }

    fn remove(&self, _key: &str) -> std::result::Result<(), AppError> {
        Err(AppError::Storage("read-only".to_string()))
    }
}

#[tokio::test]
async fn login_fails_when_session_cannot_be_saved() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_users(&server).await;
    let ctx = AppContext::new(AuthStore::new(ReadOnlyStore), api(&server));

    let err = login_action("warden", "s3cret").run(&ctx).await.unwrap_err();
    assert!(err.to_string().contains("could not be saved"));
    assert!(!ctx.auth.is_authenticated());
    Ok(())
}

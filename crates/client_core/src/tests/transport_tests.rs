use std::sync::{Arc, Mutex};

use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<ContactDraft>>>,
}

impl ServerState {
    fn record(&self, line: String) {
        self.requests.lock().expect("requests lock").push(line);
    }
}

async fn list_users(State(state): State<ServerState>) -> Json<Value> {
    state.record("GET /users".into());
    Json(json!([
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "phone": "010-692-6593 x09125"
        },
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031 x56442"
        },
        {
            "id": "a1b2",
            "name": "Clementine Bauch",
            "email": "Nathan@yesenia.net",
            "phone": "1-463-123-4447"
        }
    ]))
}

async fn create_user(
    State(state): State<ServerState>,
    Json(draft): Json<ContactDraft>,
) -> (StatusCode, Json<Value>) {
    state.record("POST /users".into());
    state.bodies.lock().expect("bodies lock").push(draft.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "name": draft.name,
            "email": draft.email,
            "phone": draft.phone,
            "id": 11
        })),
    )
}

async fn update_user(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(draft): Json<ContactDraft>,
) -> Result<Json<Value>, StatusCode> {
    state.record(format!("PUT /users/{id}"));
    if id > 10 {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "name": draft.name,
        "email": draft.email,
        "phone": draft.phone,
        "id": id
    })))
}

async fn delete_user(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    state.record(format!("DELETE /users/{id}"));
    if id == 404 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn spawn_contacts_server() -> anyhow::Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), state))
}

#[tokio::test]
async fn lists_contacts_in_server_order_with_mixed_ids() {
    let (base_url, state) = spawn_contacts_server().await.expect("spawn server");
    let api = HttpContactsApi::new(base_url);

    let contacts = api.list_contacts().await.expect("list contacts");

    let ids: Vec<_> = contacts.iter().map(|c| c.id.clone()).collect();
    assert_eq!(
        ids,
        vec![ContactId::from(2), ContactId::from(1), ContactId::from("a1b2")]
    );
    assert_eq!(contacts[1].phone, "1-770-736-8031 x56442");
    assert_eq!(contacts[0].extra.get("username"), Some(&Value::from("Antonette")));
    assert_eq!(
        state.requests.lock().expect("requests lock").as_slice(),
        ["GET /users"]
    );
}

#[tokio::test]
async fn create_posts_draft_and_decodes_assigned_id() {
    let (base_url, state) = spawn_contacts_server().await.expect("spawn server");
    let api = HttpContactsApi::new(base_url);
    let draft = ContactDraft::new("John", "j@x.com", "5551234");

    let created = api.create_contact(&draft).await.expect("create contact");

    assert_eq!(created.id, ContactId::from(11));
    assert_eq!(created.to_draft(), draft);
    assert_eq!(
        state.bodies.lock().expect("bodies lock").as_slice(),
        [draft]
    );
}

#[tokio::test]
async fn update_addresses_contact_path() {
    let (base_url, state) = spawn_contacts_server().await.expect("spawn server");
    let api = HttpContactsApi::new(base_url);
    let draft = ContactDraft::new("Leanne", "leanne@x.io", "555-0100");

    let updated = api
        .update_contact(&ContactId::from(1), &draft)
        .await
        .expect("update contact");

    assert_eq!(updated.id, ContactId::from(1));
    assert_eq!(updated.name, "Leanne");
    assert_eq!(
        state.requests.lock().expect("requests lock").as_slice(),
        ["PUT /users/1"]
    );
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let (base_url, _state) = spawn_contacts_server().await.expect("spawn server");
    let api = HttpContactsApi::new(base_url);

    let err = api
        .update_contact(&ContactId::from(11), &ContactDraft::new("John", "j@x.com", "5551234"))
        .await
        .expect_err("server rejects unknown ids");

    let status = err
        .downcast_ref::<reqwest::Error>()
        .and_then(reqwest::Error::status);
    assert_eq!(status, Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    assert!(format!("{err:#}").contains("update contact was rejected"));
}

#[tokio::test]
async fn delete_succeeds_and_fails_by_status() {
    let (base_url, state) = spawn_contacts_server().await.expect("spawn server");
    let api = HttpContactsApi::new(base_url);

    api.delete_contact(&ContactId::from(7)).await.expect("delete contact 7");
    assert!(api.delete_contact(&ContactId::from(404)).await.is_err());
    assert_eq!(
        state.requests.lock().expect("requests lock").as_slice(),
        ["DELETE /users/7", "DELETE /users/404"]
    );
}

#[tokio::test]
async fn unreachable_server_is_an_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = HttpContactsApi::new(format!("http://{addr}"));

    assert!(api.list_contacts().await.is_err());
}

#[test]
fn trailing_slash_is_trimmed_from_base_url() {
    let api = HttpContactsApi::new("https://jsonplaceholder.typicode.com/");
    assert_eq!(api.base_url(), "https://jsonplaceholder.typicode.com");
    assert_eq!(
        api.contact_url(&ContactId::from(3)),
        "https://jsonplaceholder.typicode.com/users/3"
    );
    assert_eq!(
        api.contact_url(&ContactId::from("a1 b/2")),
        "https://jsonplaceholder.typicode.com/users/a1%20b%2F2"
    );
}

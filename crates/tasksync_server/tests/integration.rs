//! End-to-end tests for the register / login / sync flows over the
//! in-memory stores.

use std::sync::Arc;
use std::thread;
use tasksync_protocol::{codes, AccountRequest, Snapshot, SyncRequest, SyncTimestamp, Task};
use tasksync_server::{MemoryDeviceRegistry, ServerConfig, SyncServer, TokenIssuer};

const SECRET: &[u8] = b"integration-test-secret-32-bytes";

fn server() -> SyncServer {
    SyncServer::new(ServerConfig::new(SECRET.to_vec()))
}

fn user_data() -> AccountRequest {
    serde_json::from_str(
        r#"{
            "user": "test",
            "password": "test",
            "mail": "t@t",
            "device": "0.0.0.0",
            "platform": "Linux"
        }"#,
    )
    .unwrap()
}

fn snapshot_with_tasks(last_sync: Option<&str>) -> Snapshot {
    Snapshot {
        last_sync: last_sync.map(|text| SyncTimestamp::parse(text).unwrap()),
        tasks: vec![
            Task {
                id: "t1".into(),
                name: "water the plants".into(),
                done: false,
                labels: vec!["home".into()],
            },
            Task {
                id: "t2".into(),
                name: "file the report".into(),
                done: true,
                labels: vec![],
            },
        ],
        labels: vec![],
    }
}

#[test]
fn register_then_login_then_sync_scenario() {
    let server = server();

    // Register.
    let response = server.handle_register(&user_data());
    assert!(response.success, "register failed: {response:?}");

    // Login with the same credentials.
    let response = server.handle_login(&user_data());
    assert!(response.success);
    assert_eq!(response.code, codes::OK);
    let token = response.token.expect("login must return a token");

    // First sync seeds the server with the client's snapshot.
    let request = SyncRequest {
        data: Some(snapshot_with_tasks(None).with_last_sync(SyncTimestamp::now())),
    };
    let response = server.handle_sync(Some(&token), &request);
    assert!(response.success);
    assert_eq!(response.code, codes::OK);
    let server_last_sync = response.last_sync.expect("seed must report lastSync");

    // Syncing again with the reported lastSync is a no-op.
    let request = SyncRequest {
        data: Some(snapshot_with_tasks(None).with_last_sync(server_last_sync)),
    };
    let response = server.handle_sync(Some(&token), &request);
    assert!(response.success);
    assert_eq!(response.code, codes::UP_TO_DATE);
    assert!(response.data.is_none());

    // A client stuck in 1975 gets the authoritative snapshot pushed back.
    let request = SyncRequest {
        data: Some(Snapshot::empty().with_last_sync(
            SyncTimestamp::parse("1975-01-01 00:00:00").unwrap(),
        )),
    };
    let response = server.handle_sync(Some(&token), &request);
    assert!(response.success);
    assert_eq!(response.code, codes::OK);
    assert_eq!(response.last_sync, Some(server_last_sync));

    let data = response.data.expect("server must push its snapshot");
    assert_eq!(data.tasks.len(), 2);
    assert_eq!(data.tasks[0].name, "water the plants");
}

#[test]
fn sync_is_idempotent_across_immediate_repeats() {
    let server = server();
    server.handle_register(&user_data());
    let token = server.handle_login(&user_data()).token.unwrap();

    let request = SyncRequest {
        data: Some(snapshot_with_tasks(None).with_last_sync(SyncTimestamp::now())),
    };
    let first = server.handle_sync(Some(&token), &request);
    assert!(first.success);

    // Re-submitting the same snapshot, now stamped with what the server
    // reported, is UP_TO_DATE.
    let request = SyncRequest {
        data: Some(snapshot_with_tasks(None).with_last_sync(first.last_sync.unwrap())),
    };
    let second = server.handle_sync(Some(&token), &request);
    assert_eq!(second.code, codes::UP_TO_DATE);
}

#[test]
fn register_with_missing_field_creates_no_records() {
    for missing in ["user", "password", "mail", "device"] {
        let mut body: serde_json::Value = serde_json::to_value(user_data()).unwrap();
        body.as_object_mut().unwrap().remove(missing);
        let request: AccountRequest = serde_json::from_value(body).unwrap();

        let server = server();
        let response = server.handle_register(&request);
        assert!(!response.success, "register must fail without {missing}");
        assert_eq!(response.code, codes::MISSING_PARAMETERS);

        // The user was never created, so login cannot succeed either.
        let response = server.handle_login(&user_data());
        assert_eq!(response.code, codes::INCORRECT_CREDENTIALS);
    }
}

#[test]
fn login_from_unseen_device_registers_exactly_one_device() {
    let devices = Arc::new(MemoryDeviceRegistry::new());
    let server = SyncServer::with_stores(
        ServerConfig::new(SECRET.to_vec()),
        Arc::new(tasksync_server::MemoryAccountStore::new()),
        devices.clone(),
        Arc::new(tasksync_server::MemorySnapshotStore::new()),
    );

    server.handle_register(&user_data());
    assert_eq!(devices.len(), 1);

    let phone = AccountRequest {
        device_id: Some("phone-7".into()),
        platform: Some("Android".into()),
        ..user_data()
    };
    let response = server.handle_login(&phone);
    assert!(response.success);
    assert_eq!(devices.len(), 2);

    // The issued token verifies statelessly with the shared secret.
    let claims = TokenIssuer::new(SECRET.to_vec())
        .verify(&response.token.unwrap())
        .unwrap();
    assert_eq!(claims.username, "test");
    assert_eq!(claims.device_id, "phone-7");
}

#[test]
fn token_for_one_device_does_not_grant_another_user() {
    let server = server();
    server.handle_register(&user_data());
    server.handle_login(&user_data());

    // A token minted for a user that never registered a device.
    let stranger = TokenIssuer::new(SECRET.to_vec())
        .issue("stranger", "0.0.0.0")
        .unwrap();
    let response = server.handle_sync(Some(&stranger), &SyncRequest::default());
    assert!(!response.success);
    assert_eq!(response.code, codes::UNAUTHENTICATED);
}

#[test]
fn concurrent_syncs_for_one_user_serialize() {
    let server = Arc::new(server());
    server.handle_register(&user_data());
    let token = server.handle_login(&user_data()).token.unwrap();

    // Two devices racing with snapshots that both claim to be newest.
    let handles: Vec<_> = ["2999-01-01 00:00:00", "2999-06-01 00:00:00"]
        .into_iter()
        .map(|claimed| {
            let server = Arc::clone(&server);
            let token = token.clone();
            thread::spawn(move || {
                let request = SyncRequest {
                    data: Some(snapshot_with_tasks(Some(claimed))),
                };
                server.handle_sync(Some(&token), &request)
            })
        })
        .collect();

    for handle in handles {
        let response = handle.join().unwrap();
        assert!(response.success);
        assert_eq!(response.code, codes::OK);
    }

    // Whichever writer went second won; the state is one whole snapshot,
    // not an interleaving.
    let stale = SyncRequest {
        data: Some(Snapshot::empty().with_last_sync(
            SyncTimestamp::parse("1975-01-01 00:00:00").unwrap(),
        )),
    };
    let authoritative = server.handle_sync(Some(&token), &stale);
    assert_eq!(authoritative.data.unwrap().tasks.len(), 2);

    // Echoing the authoritative lastSync reports up to date.
    let again = SyncRequest {
        data: Some(snapshot_with_tasks(None).with_last_sync(authoritative.last_sync.unwrap())),
    };
    let response = server.handle_sync(Some(&token), &again);
    assert_eq!(response.code, codes::UP_TO_DATE);
}

use std::collections::HashSet;

use smartroom_api::models::{Floor, Room};
use smartroom_client::services::HomeService;
use smartroom_mock::data::MockData;

mod common;
use common::{sign_in, start_backend};

fn floor(id: i64, name: &str, level: i32) -> Floor {
    Floor {
        id,
        name: name.to_string(),
        description: None,
        level,
    }
}

fn room(id: i64, name: &str, floor_id: i64) -> Room {
    Room {
        id,
        name: name.to_string(),
        description: None,
        floor_id,
    }
}

/// Three floors with two rooms each, where floor 2's room listing fails.
fn three_floor_home() -> MockData {
    MockData {
        floors: vec![
            floor(1, "Ground", 0),
            floor(2, "First", 1),
            floor(3, "Second", 2),
        ],
        rooms: vec![
            room(1, "Lounge", 1),
            room(2, "Kitchen", 1),
            room(3, "Bedroom", 2),
            room(4, "Bathroom", 2),
            room(5, "Study", 3),
            room(6, "Attic", 3),
        ],
        fail_rooms_for: HashSet::from([2]),
        rooms_delay_ms: 50,
        ..MockData::default()
    }
}

#[tokio::test]
async fn merges_rooms_from_every_floor() {
    let (_state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let home = HomeService::new(api);
    home.load().await;

    let state = home.current();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.floors.len(), 2);
    assert_eq!(state.rooms.len(), 4);
}

#[tokio::test]
async fn failing_floor_contributes_no_rooms_and_blocks_nothing() {
    let (_state, api, auth) = start_backend(three_floor_home()).await;
    sign_in(&auth).await;

    let home = HomeService::new(api);

    // Watch every published state: loading may only drop to false once all
    // three floors have settled, i.e. with the full four-room merge.
    let mut updates = home.state();
    let observer = tokio::spawn(async move {
        let mut early_completions = 0;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if !state.loading && state.error.is_none() && state.rooms.len() != 4 {
                early_completions += 1;
            }
        }
        early_completions
    });

    home.load().await;

    let state = home.current();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.rooms.len(), 4);
    assert!(state.rooms.iter().all(|r| r.floor_id == 1 || r.floor_id == 3));

    drop(home);
    assert_eq!(observer.await.expect("observer"), 0);
}

#[tokio::test]
async fn floors_failure_reports_error_and_retry_recovers() {
    let mut data = MockData::demo();
    data.fail_floors = true;
    let (state, api, auth) = start_backend(data).await;
    sign_in(&auth).await;

    let home = HomeService::new(api);
    home.load().await;

    let failed = home.current();
    assert!(!failed.loading);
    assert!(failed.error.as_deref().is_some_and(|e| e.contains("500")));
    assert!(failed.rooms.is_empty());

    state.data.write().await.fail_floors = false;
    home.retry().await;

    let recovered = home.current();
    assert!(recovered.error.is_none());
    assert_eq!(recovered.rooms.len(), 4);
}

#[tokio::test]
async fn home_without_floors_reports_a_message() {
    let (_state, api, auth) = start_backend(MockData::default()).await;
    sign_in(&auth).await;

    let home = HomeService::new(api);
    home.load().await;

    let state = home.current();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("no floors available"));
}

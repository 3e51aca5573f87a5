use smartroom_client::services::RoomService;
use smartroom_mock::data::MockData;

mod common;
use common::{sign_in, start_backend};

#[tokio::test]
async fn loads_name_lights_and_temperature() {
    let (_state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let room = RoomService::new(api, 1);
    room.load().await;

    let state = room.current();
    assert!(!state.loading);
    assert_eq!(state.room_name, "Living Room");
    assert_eq!(state.lights.len(), 2);
    // First temperature sensor in the room wins.
    assert_eq!(state.current_temp, Some(21.5));
    assert!(state.error.is_none());
}

#[tokio::test]
async fn unknown_room_falls_back_to_placeholder_name() {
    let (_state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let room = RoomService::new(api, 99);
    room.load().await;

    let state = room.current();
    assert_eq!(state.room_name, "Room 99");
    assert!(state.lights.is_empty());
    assert_eq!(state.current_temp, None);
}

#[tokio::test]
async fn toggle_patches_the_backend_state_into_the_list() {
    let (_state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let room = RoomService::new(api, 1);
    room.load().await;
    assert!(room.current().lights[0].is_active);

    room.toggle_light(1).await;

    let state = room.current();
    assert!(!state.lights[0].is_active);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn set_all_only_touches_lights_that_differ() {
    let (state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let room = RoomService::new(api, 1);
    room.load().await;

    // Ceiling is already on; only the floor lamp needs a toggle.
    room.set_all(true).await;

    assert!(room.current().lights.iter().all(|l| l.is_active));
    let backend = state.data.read().await;
    assert!(
        backend
            .lights
            .iter()
            .filter(|l| l.room_id == 1)
            .all(|l| l.is_active)
    );
}

#[tokio::test]
async fn toggle_failure_keeps_the_list_and_sets_an_error() {
    let (_state, api, auth) = start_backend(MockData::demo()).await;
    sign_in(&auth).await;

    let room = RoomService::new(api, 1);
    room.load().await;

    room.toggle_light(42).await;

    let state = room.current();
    assert_eq!(state.lights.len(), 2);
    assert!(state.error.as_deref().is_some_and(|e| e.contains("404")));
}

//! End-to-end directory browsing through the public event API.

use yellowpage::worker::{DirectoryWorker, WorkerMessage};
use yellowpage::{handle_event, initialize, Action, AppState, Config, Event, QueryField, SortMode};

const DIRECTORY: &str = r#"[
  {"id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz", "phone": "1-770-736-8031 x56442",
   "address": {"street": "Kulas Light", "suite": "Apt. 556", "city": "Gwenborough", "zipcode": "92998-3874",
               "geo": {"lat": "-37.3159", "lng": "81.1496"}},
   "company": {"name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net", "bs": "harness real-time e-markets"}},
  {"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv",
   "address": {"city": "Wisokyburgh", "geo": {"lat": "-43.9509", "lng": "-34.4618"}}},
  {"id": 3, "name": "Clementine Bauch", "email": "Nathan@yesenia.net",
   "address": {"city": "McKenziehaven", "geo": {"lat": "-68.6102", "lng": "-47.0653"}}},
  {"id": 4, "name": "Patricia Lebsack", "email": "Julianne.OConner@kory.org",
   "address": {"city": "South Elvis", "geo": {"lat": "29.4572", "lng": "-164.2990"}}},
  {"id": 5, "name": "Chelsey Dietrich", "email": "Lucio_Hettinger@annie.ca",
   "address": {"city": "Roscoeview", "geo": {"lat": "-31.8129", "lng": "62.5342"}}}
]"#;

const LOCATION: &str = r#"{"status": "success", "country": "Nowhere", "lat": -37.3159, "lon": 81.1496}"#;

fn send(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
    handle_event(state, &event).unwrap()
}

/// Runs the grant → fetch → worker decode round trip.
fn load(state: &mut AppState) {
    let (_, actions) = send(state, Event::PermissionsResult { granted: true });
    assert!(actions.iter().any(|a| matches!(a, Action::FetchDirectory { .. })));

    let (_, actions) = send(
        state,
        Event::DirectoryFetched {
            status: 200,
            body: DIRECTORY.to_string(),
        },
    );
    let [Action::PostToWorker(message)] = actions.as_slice() else {
        panic!("expected a single worker message, got {actions:?}");
    };

    let payload = serde_json::to_string(message).unwrap();
    let response = DirectoryWorker::default().handle_payload(&payload);
    send(state, Event::WorkerResponse(response));
}

fn working_ids(state: &AppState) -> Vec<i64> {
    state.directory.working().iter().map(|l| l.id()).collect()
}

fn visible_ids(state: &AppState) -> Vec<i64> {
    state.visible().iter().map(|l| l.id()).collect()
}

fn type_into(state: &mut AppState, field: QueryField, text: &str) {
    send(state, Event::FocusQuery(field));
    for c in text.chars() {
        send(state, Event::Char(c));
    }
    send(state, Event::FocusResults);
}

#[test]
fn loads_sorted_by_first_name_and_keeps_fetch_order_canonical() {
    let mut state = initialize(&Config::default());
    load(&mut state);

    assert_eq!(working_ids(&state), vec![5, 3, 2, 1, 4]);
    let canonical: Vec<i64> = state.directory.canonical().iter().map(|u| u.id).collect();
    assert_eq!(canonical, vec![1, 2, 3, 4, 5]);
}

#[test]
fn sorts_by_each_key() {
    let mut state = initialize(&Config::default());
    load(&mut state);

    send(&mut state, Event::SelectSort(SortMode::LastName));
    assert_eq!(working_ids(&state), vec![3, 5, 1, 2, 4]);

    send(&mut state, Event::SelectSort(SortMode::City));
    assert_eq!(working_ids(&state), vec![1, 3, 5, 4, 2]);

    send(&mut state, Event::CycleSort);
    assert_eq!(state.sort_mode, Some(SortMode::FirstName));
    assert_eq!(working_ids(&state), vec![5, 3, 2, 1, 4]);
}

#[test]
fn filters_by_name_and_city_without_touching_the_list() {
    let mut state = initialize(&Config::default());
    load(&mut state);

    type_into(&mut state, QueryField::Name, "EL");
    assert_eq!(visible_ids(&state), vec![5, 2]);

    let vm = state.compute_viewmodel(40, 140);
    assert_eq!(vm.display_items.len(), 2);
    assert_eq!(vm.display_items[0].name, "Chelsey Dietrich");
    assert_eq!(vm.display_items[0].name_highlights, vec![(2, 4)]);

    type_into(&mut state, QueryField::City, "burgh");
    assert_eq!(visible_ids(&state), vec![2]);
    assert_eq!(working_ids(&state).len(), 5);

    send(&mut state, Event::Escape);
    assert_eq!(visible_ids(&state).len(), 5);
}

#[test]
fn distance_sort_appears_after_location_and_annotates_rows() {
    let mut state = initialize(&Config::default());
    load(&mut state);

    assert!(!state.compute_viewmodel(40, 140).sort_bar.options.iter().any(|o| o.shortcut == '4'));
    let (render, _) = send(&mut state, Event::SelectSort(SortMode::Distance));
    assert!(!render);
    assert_eq!(working_ids(&state), vec![5, 3, 2, 1, 4]);

    send(
        &mut state,
        Event::LocationFetched {
            status: 200,
            body: LOCATION.to_string(),
        },
    );
    send(&mut state, Event::SelectSort(SortMode::Distance));
    assert_eq!(working_ids(&state), vec![1, 5, 3, 2, 4]);

    let distances: Vec<f64> = state.directory.working().iter().filter_map(|l| l.distance).collect();
    assert_eq!(distances.len(), 5);
    assert!(distances[0].abs() < 1e-6);
    assert!((distances[1] - 1_807_288.7).abs() < 1.0);

    let vm = state.compute_viewmodel(40, 140);
    assert!(vm.show_distance);
    assert_eq!(vm.display_items[0].distance.as_deref(), Some("0 m"));
}

#[test]
fn configured_location_skips_lookup() {
    let config = Config {
        location: Some(yellowpage::Coordinates::new(-37.3159, 81.1496)),
        ..Config::default()
    };
    let mut state = initialize(&config);
    let (_, actions) = send(&mut state, Event::PermissionsResult { granted: true });
    assert!(!actions.iter().any(|a| matches!(a, Action::RequestLocation { .. })));
}

#[test]
fn delete_and_restore_round_trip() {
    let mut state = initialize(&Config::default());
    load(&mut state);
    assert!(!state.directory.can_restore());

    send(&mut state, Event::DeleteSelected);
    send(&mut state, Event::KeyDown);
    send(&mut state, Event::DeleteSelected);
    assert_eq!(working_ids(&state), vec![3, 1, 4]);
    assert!(state.directory.can_restore());

    let (render, _) = send(&mut state, Event::Restore);
    assert!(render);
    assert_eq!(working_ids(&state), vec![1, 2, 3, 4, 5]);
    assert_eq!(state.sort_mode, None);
    assert!(state.directory.working().iter().all(|l| l.distance.is_none()));
    assert!(!state.directory.can_restore());
}

#[test]
fn failed_fetch_leaves_directory_empty() {
    let mut state = initialize(&Config::default());
    send(&mut state, Event::PermissionsResult { granted: true });
    send(
        &mut state,
        Event::DirectoryFetched {
            status: 404,
            body: "not found".to_string(),
        },
    );

    assert!(state.directory.working().is_empty());
    let vm = state.compute_viewmodel(24, 80);
    assert_eq!(vm.empty_state.map(|e| e.message).as_deref(), Some("Directory unavailable"));
}

#[test]
fn decode_request_carries_the_body() {
    let message = WorkerMessage::decode_directory(DIRECTORY.to_string());
    let mut worker = DirectoryWorker::default();
    let response = worker.handle_message(message);
    assert!(matches!(
        response,
        yellowpage::worker::WorkerResponse::DirectoryDecoded { ref users } if users.len() == 5
    ));
}

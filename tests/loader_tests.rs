mod common;

use common::{dead_url, serve_once, state_names};
use json_table::api_client::ApiClient;
use json_table::services::{DataLoaderService, DataSource};
use json_table::state::{AppState, StateEvent, LOAD_ERROR_MESSAGE};
use std::time::Duration;

const TIMEOUT: Option<Duration> = Some(Duration::from_secs(5));

fn load_into_state(url: String) -> AppState {
    let mut state = AppState::default();
    state.begin_load(&url);
    let rx = DataLoaderService::new(DataSource::Url(url), TIMEOUT).spawn();
    let message = rx.recv_timeout(Duration::from_secs(10)).expect("load settles");
    state.finish_load(message.result);
    state
}

#[test]
fn test_fetch_success() {
    let url = serve_once(
        "200 OK",
        r#"[{"state":"Texas","pop":29000000,"_links":"x"},{"state":"Ohio","capital":"Columbus"}]"#,
    );
    let state = load_into_state(url);

    assert!(!state.is_loading());
    assert!(state.error().is_none());
    assert_eq!(state_names(state.view().rows()), vec!["Texas", "Ohio"]);
    assert_eq!(state.view().column_names(), &["state", "pop", "capital"]);
    assert_eq!(
        state.last_event(),
        Some(&StateEvent::DataLoaded { rows: 2, columns: 3 })
    );
}

#[test]
fn test_api_client_direct() {
    let url = serve_once("200 OK", r#"[{"state":"Maine"}]"#);
    let rows = ApiClient::new(&url, TIMEOUT).unwrap().fetch_rows().unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_connection_refused_collapses_to_one_message() {
    let state = load_into_state(dead_url());
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(state.view().row_count(), 0);
}

#[test]
fn test_http_error_status_collapses_to_one_message() {
    let state = load_into_state(serve_once("500 Internal Server Error", r#"{"error":"boom"}"#));
    assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(state.view().row_count(), 0);
}

#[test]
fn test_malformed_json_collapses_to_one_message() {
    let state = load_into_state(serve_once("200 OK", r#"[{"state":"Texas""#));
    assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
    assert_eq!(state.view().row_count(), 0);
}

#[test]
fn test_non_array_payload_is_a_fetch_failure() {
    let state = load_into_state(serve_once("200 OK", r#"{"state":"Texas"}"#));
    assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
}

#[test]
fn test_api_client_reports_status() {
    let url = serve_once("404 Not Found", "missing");
    let err = ApiClient::new(&url, TIMEOUT).unwrap().fetch_rows().unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_fetch_without_timeout_uses_config_default() {
    let config = json_table::config::config::Config::default();
    assert_eq!(config.api.timeout(), None);

    let url = serve_once("200 OK", r#"[{"state":"Ohio"}]"#);
    let rx = DataLoaderService::new(DataSource::Url(url), config.api.timeout()).spawn();
    let message = rx.recv_timeout(Duration::from_secs(10)).expect("load settles");
    assert_eq!(state_names(&message.result.unwrap()), vec!["Ohio"]);
}

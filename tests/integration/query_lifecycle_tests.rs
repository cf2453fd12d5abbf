use std::time::Duration;

use oxide_query::testing::TestClient;
use oxide_query::{
    ComponentHost, ControllerHost, DefaultOptions, Error, FetchStatus, Observer, QueryDefaults,
    QueryObserverResult, TestRenderer,
};

use super::{given_a_provided_client, given_client_defaults, repo_key, Repo, RepoCard, RepoProps};

fn tanstack_query() -> Repo {
    Repo {
        full_name: "TanStack/query".to_string(),
        stars: 42,
    }
}

#[test]
fn given_a_provided_client_before_connect_should_expose_the_current_snapshot() {
    let test = given_a_provided_client();

    let result = test.card.query.result();
    assert!(result.is_pending());
    assert_eq!(result.data, None);
    assert_eq!(result, test.card.observer().current_result());

    assert_eq!(test.client().observer_count(), 1);
    assert_eq!(test.card.observer().subscribe_count(), 0);
    assert_eq!(test.host.pending_updates(), 0);
    assert_eq!(test.renders.count(), 0);
}

#[test]
fn given_no_provider_when_constructed_should_fail_without_registering() {
    let host = ComponentHost::new(TestRenderer::<RepoProps>::new());

    let Err(error) = RepoCard::new(&host, host.scope(), "TanStack/query") else {
        panic!("construction should fail without a client in scope");
    };

    assert_eq!(error, Error::NoClient { key: "query-client" });
    assert_eq!(host.controller_count(), 0);
}

#[test]
fn given_connected_when_result_emitted_should_expose_it_and_request_one_update() {
    let test = given_a_provided_client();
    test.connect();
    assert_eq!(test.renders.last(), Some(RepoProps::Loading));

    test.card
        .observer()
        .emit(QueryObserverResult::success(tanstack_query()));

    assert_eq!(test.host.pending_updates(), 1);
    assert_eq!(
        test.card.query.result(),
        QueryObserverResult::success(tanstack_query())
    );

    assert!(test.process_updates());
    assert_eq!(
        test.renders.last(),
        Some(RepoProps::Loaded {
            full_name: "TanStack/query".to_string(),
            stars: 42,
            updating: false,
        })
    );
}

#[test]
fn given_connected_when_several_results_emitted_should_keep_the_latest() {
    let test = given_a_provided_client();
    test.connect();

    let observer = test.card.observer();
    observer.emit(QueryObserverResult::pending().with_fetch_status(FetchStatus::Fetching));
    observer.emit(QueryObserverResult::success(tanstack_query()));
    observer.emit(
        QueryObserverResult::success(tanstack_query()).with_fetch_status(FetchStatus::Fetching),
    );

    assert_eq!(test.host.pending_updates(), 3);
    assert!(test.process_updates());
    assert_eq!(test.renders.count(), 2);
    assert_eq!(
        test.renders.last(),
        Some(RepoProps::Loaded {
            full_name: "TanStack/query".to_string(),
            stars: 42,
            updating: true,
        })
    );
}

#[test]
fn given_disconnected_when_result_emitted_should_ignore_it() {
    let test = given_a_provided_client();
    test.connect();
    test.host.disconnect();

    test.card
        .observer()
        .emit(QueryObserverResult::success(tanstack_query()));

    assert!(test.card.query.result().is_pending());
    assert_eq!(test.host.pending_updates(), 0);
    assert_eq!(test.card.observer().unsubscribe_count(), 1);
    assert_eq!(test.card.observer().listener_count(), 0);
    assert!(!test.card.query.is_subscribed());
}

#[test]
fn given_a_reconnect_should_expose_what_the_observer_holds_now() {
    let test = given_a_provided_client();
    test.connect();
    test.host.disconnect();

    test.card
        .observer()
        .emit(QueryObserverResult::success(tanstack_query()));
    test.host.connect();

    assert_eq!(
        test.card.query.result(),
        test.card.observer().current_result()
    );
    assert!(test.process_updates());
    assert_eq!(
        test.renders.last(),
        Some(RepoProps::Loaded {
            full_name: "TanStack/query".to_string(),
            stars: 42,
            updating: false,
        })
    );
}

#[test]
fn given_a_lifecycle_sequence_should_subscribe_once_per_connect() {
    let test = given_a_provided_client();

    test.connect();
    for _ in 0..3 {
        test.host.request_update();
        test.process_updates();
    }
    test.host.disconnect();

    assert_eq!(test.card.observer().subscribe_count(), 1);
    assert_eq!(test.card.observer().unsubscribe_count(), 1);

    test.host.connect();
    test.host.disconnect();

    assert_eq!(test.card.observer().subscribe_count(), 2);
    assert_eq!(test.card.observer().unsubscribe_count(), 2);
    assert_eq!(test.client().observer_count(), 1);
}

#[test]
fn given_an_update_should_push_the_latest_options_merged_with_defaults() {
    let test = given_client_defaults(DefaultOptions {
        queries: QueryDefaults {
            stale_time: Some(Duration::from_secs(30)),
            ..QueryDefaults::default()
        },
        ..DefaultOptions::default()
    });
    test.connect();
    assert_eq!(test.card.observer().set_options_count(), 1);

    test.card.set_repo_name("rust-lang/rust");
    test.host.request_update();
    test.process_updates();

    let options = test.card.observer().options();
    assert_eq!(options.query_key, repo_key("rust-lang/rust"));
    assert_eq!(options.query_hash, Some(repo_key("rust-lang/rust").hash()));
    assert_eq!(options.stale_time, Some(Duration::from_secs(30)));
    assert!(options.defaulted);

    // Nothing changed, the options are pushed anyway.
    test.host.request_update();
    test.process_updates();
    assert_eq!(test.card.observer().set_options_count(), 3);
}

#[test]
fn given_changed_client_defaults_should_merge_them_on_the_next_update() {
    let test = given_a_provided_client();
    test.connect();

    test.client().set_default_options(DefaultOptions {
        queries: QueryDefaults {
            enabled: Some(false),
            ..QueryDefaults::default()
        },
        ..DefaultOptions::default()
    });
    test.host.request_update();
    test.process_updates();

    assert_eq!(test.card.observer().options().enabled, Some(false));
}

#[test]
fn given_a_query_error_should_surface_it_as_data() {
    let test = given_a_provided_client();
    test.connect();

    test.card
        .observer()
        .emit(QueryObserverResult::error("rate limited".to_string()));
    test.process_updates();

    assert!(test.card.query.result().is_error());
    assert_eq!(
        test.renders.last(),
        Some(RepoProps::Failed("rate limited".to_string()))
    );
}

#[test]
fn given_a_refetch_should_delegate_to_the_observer() {
    let test = given_a_provided_client();

    test.card.query.refetch();

    assert_eq!(test.card.observer().refetch_count(), 1);
}

#[test]
fn given_an_explicit_client_should_not_need_a_scope() {
    let host = ComponentHost::new(TestRenderer::<RepoProps>::new());
    let client = std::sync::Arc::new(TestClient::new());

    let query = oxide_query::QueryController::<TestClient, Repo, String>::with_client(
        &host,
        client.clone(),
        || oxide_query::QueryObserverOptions::new(repo_key("explicit")),
    );

    assert_eq!(host.controller_count(), 1);
    assert_eq!(client.observer_count(), 1);
    assert_eq!(query.observer().options().query_key, repo_key("explicit"));
}

use std::sync::Arc;

use oxide_query::testing::TestClient;
use oxide_query::{query_client, ComponentHost, ProviderState, QueryClientProvider, TestRenderer};

use super::{given_a_provided_client, CardHost, RepoCard};

#[test]
fn given_connect_disconnect_cycles_should_balance_mounts() {
    let test = given_a_provided_client();

    test.app.connect();
    test.app.disconnect();
    test.app.connect();
    test.app.disconnect();

    assert_eq!(test.client().mount_count(), 2);
    assert_eq!(test.client().unmount_count(), 2);
    assert_eq!(test.provider.state(), ProviderState::Unmounted);
}

#[test]
fn given_a_card_lifecycle_should_not_touch_the_client_mount() {
    let test = given_a_provided_client();
    test.connect();

    test.host.disconnect();
    test.host.connect();

    assert_eq!(test.client().mount_count(), 1);
    assert_eq!(test.client().unmount_count(), 0);
    assert_eq!(test.provider.state(), ProviderState::Mounted);
}

#[test]
fn given_a_provider_should_share_one_client_with_every_descendant() {
    let test = given_a_provided_client();
    let sibling_host = CardHost::with_scope(test.app.scope().child(), TestRenderer::new());
    let sibling = RepoCard::new(&sibling_host, sibling_host.scope(), "rust-lang/rust").unwrap();

    let from_card = query_client::<TestClient>(test.host.scope()).unwrap();
    let from_sibling = query_client::<TestClient>(sibling_host.scope()).unwrap();

    assert!(Arc::ptr_eq(&from_card, test.provider.client()));
    assert!(Arc::ptr_eq(&from_sibling, test.provider.client()));
    assert_eq!(test.client().observer_count(), 2);
    assert_ne!(
        sibling.observer().options().query_key,
        test.card.observer().options().query_key
    );
}

#[test]
fn given_nested_providers_should_resolve_the_nearest_client() {
    let test = given_a_provided_client();

    let nested_app = ComponentHost::<(), _>::with_scope(test.app.scope().child(), TestRenderer::new());
    let nested = QueryClientProvider::new(&nested_app, nested_app.scope(), TestClient::new());

    let inner_host = CardHost::with_scope(nested_app.scope().child(), TestRenderer::new());
    RepoCard::new(&inner_host, inner_host.scope(), "inner").unwrap();

    assert_eq!(nested.client().observer_count(), 1);
    assert_eq!(test.client().observer_count(), 1);
}

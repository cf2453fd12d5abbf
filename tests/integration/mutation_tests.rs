use std::sync::Arc;

use futures::executor::block_on;
use oxide_query::testing::TestClient;
use oxide_query::{
    ComponentHost, DefaultOptions, MutationController, MutationDefaults, MutationObserverOptions,
    MutationObserverResult, QueryClientProvider, ReactiveController, Retry, TestRenderer,
};

type StarController = MutationController<TestClient, u32, String, u32>;

struct StarTest {
    host: ComponentHost<(), TestRenderer<()>>,
    star: Arc<StarController>,
}

fn given_a_star_mutation(defaults: DefaultOptions) -> StarTest {
    let host = ComponentHost::new(TestRenderer::new());
    QueryClientProvider::new(&host, host.scope(), TestClient::with_defaults(defaults));

    let star = StarController::new(&host, &host.scope().child(), || {
        MutationObserverOptions::new()
            .mutation_key("star")
            .mutation_fn(|stars: u32| async move {
                if stars >= 100 {
                    Err("star limit reached".to_string())
                } else {
                    Ok(stars + 1)
                }
            })
    })
    .expect("client is provided");

    StarTest { host, star }
}

#[test]
fn given_a_new_mutation_should_start_idle() {
    let test = given_a_star_mutation(DefaultOptions::default());

    assert!(test.star.result().is_idle());
    assert_eq!(test.host.pending_updates(), 0);
}

#[test]
fn given_connected_when_mutated_should_follow_pending_then_success() {
    let test = given_a_star_mutation(DefaultOptions::default());
    test.host.connect();
    test.host.process_updates(&|| ());

    let future = test.star.mutate(41);
    assert_eq!(test.star.result(), MutationObserverResult::pending(41));

    assert_eq!(block_on(future), Ok(42));
    assert_eq!(test.star.result(), MutationObserverResult::success(42, 41));
    assert_eq!(test.host.pending_updates(), 2);
}

#[test]
fn given_a_failing_mutation_should_surface_the_error_as_data() {
    let test = given_a_star_mutation(DefaultOptions::default());
    test.host.connect();

    let outcome = block_on(test.star.mutate(100));

    assert_eq!(outcome, Err("star limit reached".to_string()));
    let result = test.star.result();
    assert!(result.is_error());
    assert_eq!(result.error.as_deref(), Some("star limit reached"));
    assert_eq!(result.variables, Some(100));
}

#[test]
fn given_a_reset_should_return_to_idle() {
    let test = given_a_star_mutation(DefaultOptions::default());
    test.host.connect();
    block_on(test.star.mutate(1)).unwrap();

    test.star.reset();

    assert!(test.star.result().is_idle());
}

#[test]
fn given_client_defaults_should_merge_them_into_mutation_options() {
    let test = given_a_star_mutation(DefaultOptions {
        mutations: MutationDefaults {
            retry: Some(Retry::Flag(false)),
            ..MutationDefaults::default()
        },
        ..DefaultOptions::default()
    });

    let options = test.star.observer().options();

    assert_eq!(options.retry, Some(Retry::Flag(false)));
    assert!(options.defaulted);
}

#[test]
fn given_disconnect_before_connect_should_do_nothing() {
    let test = given_a_star_mutation(DefaultOptions::default());

    test.host.disconnect();
    test.star.host_disconnected();

    assert_eq!(test.star.observer().unsubscribe_count(), 0);
    assert!(test.star.result().is_idle());
    assert_eq!(test.host.pending_updates(), 0);
}

mod repo_card;

use std::sync::Arc;

use oxide_query::testing::TestClient;
use oxide_query::{ComponentHost, DefaultOptions, QueryClientProvider, TestRenderer};
pub(crate) use repo_card::*;

mod mutation_tests;
mod provider_tests;
mod query_lifecycle_tests;

pub(crate) type AppHost = ComponentHost<(), TestRenderer<()>>;
pub(crate) type CardHost = ComponentHost<RepoProps, TestRenderer<RepoProps>>;

/// An app host providing a client, with a repo card hosted one level below.
pub(crate) struct IntegrationTest {
    pub(crate) app: AppHost,
    pub(crate) provider: Arc<QueryClientProvider<TestClient>>,
    pub(crate) host: CardHost,
    pub(crate) renders: TestRenderer<RepoProps>,
    pub(crate) card: RepoCard,
}

impl IntegrationTest {
    pub(crate) fn client(&self) -> &TestClient {
        self.provider.client()
    }

    /// Connect the app and the card, then flush the initial render.
    pub(crate) fn connect(&self) {
        self.app.connect();
        self.host.connect();
        self.host.process_updates(&self.card);
    }

    pub(crate) fn process_updates(&self) -> bool {
        self.host.process_updates(&self.card)
    }
}

pub(crate) fn given_a_provided_client() -> IntegrationTest {
    given_client_defaults(DefaultOptions::default())
}

pub(crate) fn given_client_defaults(defaults: DefaultOptions) -> IntegrationTest {
    let app = AppHost::new(TestRenderer::new());
    let provider = QueryClientProvider::new(&app, app.scope(), TestClient::with_defaults(defaults));

    let renders = TestRenderer::new();
    let host = CardHost::with_scope(app.scope().child(), renders.clone());
    let card = RepoCard::new(&host, host.scope(), "TanStack/query")
        .expect("client is provided by the app host");

    IntegrationTest {
        app,
        provider,
        host,
        renders,
        card,
    }
}

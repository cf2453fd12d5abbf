use std::sync::{Arc, Mutex};

use oxide_query::testing::{TestClient, TestObserver};
use oxide_query::{
    Component, ControllerHost, QueryController, QueryKey, QueryObserverOptions,
    QueryObserverResult, Result, Scope,
};

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Repo {
    pub(crate) full_name: String,
    pub(crate) stars: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RepoProps {
    Loading,
    Failed(String),
    Loaded {
        full_name: String,
        stars: u32,
        updating: bool,
    },
}

pub(crate) type RepoObserver =
    TestObserver<QueryObserverOptions<Repo, String>, QueryObserverResult<Repo, String>>;

/// Shows one repository; which one is a property that can change between
/// renders.
pub(crate) struct RepoCard {
    pub(crate) repo_name: Arc<Mutex<String>>,
    pub(crate) query: Arc<QueryController<TestClient, Repo, String>>,
}

pub(crate) fn repo_key(name: &str) -> QueryKey {
    QueryKey::from("repoData").with(name)
}

impl RepoCard {
    pub(crate) fn new<H: ControllerHost>(host: &H, scope: &Scope, repo_name: &str) -> Result<Self> {
        let repo_name = Arc::new(Mutex::new(repo_name.to_string()));

        let name = Arc::clone(&repo_name);
        let query = QueryController::new(host, scope, move || {
            let name = name.lock().unwrap().clone();
            QueryObserverOptions::new(repo_key(&name)).query_fn(move |_| {
                let full_name = name.clone();
                async move { Ok(Repo { full_name, stars: 0 }) }
            })
        })?;

        Ok(RepoCard { repo_name, query })
    }

    pub(crate) fn set_repo_name(&self, name: &str) {
        *self.repo_name.lock().unwrap() = name.to_string();
    }

    pub(crate) fn observer(&self) -> &RepoObserver {
        self.query.observer()
    }
}

impl Component<RepoProps> for RepoCard {
    fn render(&self) -> RepoProps {
        self.query.with_result(|result| {
            if let Some(error) = &result.error {
                return RepoProps::Failed(error.clone());
            }
            match &result.data {
                Some(repo) => RepoProps::Loaded {
                    full_name: repo.full_name.clone(),
                    stars: repo.stars,
                    updating: result.is_fetching(),
                },
                None => RepoProps::Loading,
            }
        })
    }
}

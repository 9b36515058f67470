//! Scenario state for the team digest BDD tests.

use prdigest::DigestError;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

use super::harness::RepositoryFixture;
use super::runtime::ScenarioRuntime;

#[derive(ScenarioState, Default)]
pub(crate) struct DigestState {
    pub(crate) runtime: Slot<ScenarioRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) organization: Slot<String>,
    pub(crate) team: Slot<String>,
    pub(crate) team_missing: Slot<bool>,
    pub(crate) repositories: Slot<Vec<RepositoryFixture>>,
    pub(crate) output: Slot<String>,
    pub(crate) error: Slot<DigestError>,
}

impl DigestState {
    /// Applies `update` to the registered repository called `name`.
    pub(crate) fn update_repository(&self, name: &str, update: impl FnOnce(&mut RepositoryFixture)) {
        let mut repositories = self.repositories.get_or_insert_with(Vec::new);
        let repository = repositories
            .iter_mut()
            .find(|repository| repository.name == name)
            .unwrap_or_else(|| panic!("repository {name} is not registered"));
        update(repository);
    }
}

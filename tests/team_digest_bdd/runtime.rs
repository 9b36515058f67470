//! Per-scenario Tokio runtime and mock GitHub server.

use std::future::Future;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::{Builder, Runtime};
use wiremock::MockServer;

/// Runtime driving one scenario's async calls from synchronous steps.
#[derive(Clone)]
pub(crate) struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }

    pub(crate) fn enter(&self) -> tokio::runtime::EnterGuard<'_> {
        self.0.enter()
    }
}

/// Returns the scenario runtime, starting it and the mock server on first
/// use.
pub(crate) fn scenario_runtime(
    runtime: &Slot<ScenarioRuntime>,
    server: &Slot<MockServer>,
) -> ScenarioRuntime {
    let scenario = runtime.get().unwrap_or_else(|| {
        let started = Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap_or_else(|error| panic!("failed to start runtime: {error}"));
        let scenario = ScenarioRuntime(Rc::new(started));
        runtime.set(scenario.clone());
        scenario
    });

    if server.with_ref(|_| ()).is_none() {
        server.set(scenario.block_on(MockServer::start()));
    }
    scenario
}

//! Shared application state and the corpus readiness state machine

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::config::ServerConfig;
use crate::rag::MealPlanService;
use crate::rag::RecipeQueryService;

/// Lifecycle of the corpus behind the query endpoints.
///
/// Moves forward only: `Uninitialized -> Loading -> Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Loading,
    Ready,
}

/// Cloneable handle on the [`ServiceState`] of one process
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    tx: Arc<watch::Sender<ServiceState>>,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessGate {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ServiceState::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn state(&self) -> ServiceState {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    /// `Uninitialized -> Loading`; returns whether the transition happened
    pub fn begin_loading(&self) -> bool {
        self.advance(ServiceState::Uninitialized, ServiceState::Loading)
    }

    /// `Loading -> Ready`; returns whether the transition happened
    pub fn mark_ready(&self) -> bool {
        self.advance(ServiceState::Loading, ServiceState::Ready)
    }

    fn advance(&self, from: ServiceState, to: ServiceState) -> bool {
        let changed = self.tx.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        });
        if changed {
            info!("Service state: {:?} -> {:?}", from, to);
        }
        changed
    }
}

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub readiness: ReadinessGate,
    pub recipes: Arc<RecipeQueryService>,
    pub meal_plans: Arc<MealPlanService>,
    pub query_timeout: Duration,
    pub meal_plan_timeout: Duration,
    /// Whether `/api/meal-plan` also waits for the corpus
    pub gate_meal_plan: bool,
}

impl AppState {
    pub fn new(
        readiness: ReadinessGate,
        recipes: RecipeQueryService,
        meal_plans: MealPlanService,
        server: &ServerConfig,
    ) -> Self {
        Self {
            readiness,
            recipes: Arc::new(recipes),
            meal_plans: Arc::new(meal_plans),
            query_timeout: Duration::from_secs(server.query_timeout_secs),
            meal_plan_timeout: Duration::from_secs(server.meal_plan_timeout_secs),
            gate_meal_plan: server.gate_meal_plan_on_corpus,
        }
    }
}

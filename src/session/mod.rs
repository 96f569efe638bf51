//! Per-test state and lifecycle.
//!
//! A [`World`] is created for every scenario or spec case. It is either
//! inactive or active: [`World::start`] opens a fresh HTTP context and
//! clears scenario state, [`World::finish`] cleans up what the test created,
//! disposes the context and hands back the evidence gathered. Steps share
//! data only through the World: the last captured response, entity drafts
//! and the ids of entities created on the service.

mod error;

pub use error::StepError;

use std::mem;
use std::sync::Arc;

use serde_json::Value;

use crate::evidence::{Evidence, EvidenceSink, NoopEvidenceSink};
use crate::generate::ORDER_ID_RANGE;
use crate::petstore::{
    ApiClients, ApiResponse, CapturedResponse, ContextSettings, HttpContext, Order, Pet,
    PetClient, ResponseBody, StoreClient, User, UserClient,
};

#[derive(Debug, Default)]
enum Lifecycle {
    #[default]
    Inactive,
    Active(HttpContext),
}

#[derive(Debug, Default)]
struct ScenarioState {
    last_response: Option<CapturedResponse>,
    pet: Option<Pet>,
    order: Option<Order>,
    user: Option<User>,
    pet_id: Option<i64>,
    order_id: Option<i64>,
    username: Option<String>,
}

/// Per-test world shared by the steps of one scenario or spec case.
pub struct World {
    lifecycle: Lifecycle,
    state: ScenarioState,
    evidence: Vec<Evidence>,
    sink: Arc<dyn EvidenceSink>,
}

impl std::fmt::Debug for World {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("World")
            .field("lifecycle", &self.lifecycle)
            .field("state", &self.state)
            .field("evidence", &self.evidence.len())
            .finish_non_exhaustive()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Arc::new(NoopEvidenceSink))
    }
}

impl World {
    /// Creates an inactive World that forwards evidence to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn EvidenceSink>) -> Self {
        Self {
            lifecycle: Lifecycle::Inactive,
            state: ScenarioState::default(),
            evidence: Vec::new(),
            sink,
        }
    }

    /// Opens a fresh context and clears all scenario state.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::AlreadyActive`] when called twice without
    /// [`World::finish`], or [`StepError::Transport`] when the context
    /// cannot be opened.
    pub fn start(&mut self, settings: &ContextSettings) -> Result<(), StepError> {
        if self.is_active() {
            return Err(StepError::AlreadyActive);
        }
        let context = HttpContext::open(settings)?;
        self.state = ScenarioState::default();
        self.evidence.clear();
        self.lifecycle = Lifecycle::Active(context);
        Ok(())
    }

    /// Deletes tracked entities, disposes the context and resets state.
    ///
    /// Cleanup is best effort: failures are logged and never reported.
    /// Calling this on an inactive World only resets state. Returns the
    /// evidence gathered since [`World::start`].
    pub async fn finish(&mut self) -> Vec<Evidence> {
        let state = mem::take(&mut self.state);
        if let Lifecycle::Active(context) = mem::take(&mut self.lifecycle) {
            cleanup(&context, &state).await;
            context.dispose();
        }
        mem::take(&mut self.evidence)
    }

    /// Returns true between [`World::start`] and [`World::finish`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Active(_))
    }

    /// The open HTTP context.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Inactive`] before [`World::start`].
    pub const fn context(&self) -> Result<&HttpContext, StepError> {
        match &self.lifecycle {
            Lifecycle::Active(context) => Ok(context),
            Lifecycle::Inactive => Err(StepError::Inactive),
        }
    }

    /// All client wrappers bound to the open context.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Inactive`] before [`World::start`].
    pub fn clients(&self) -> Result<ApiClients<'_>, StepError> {
        self.context().map(ApiClients::new)
    }

    /// Pet client bound to the open context.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Inactive`] before [`World::start`].
    pub fn pets(&self) -> Result<PetClient<'_>, StepError> {
        self.context().map(PetClient::new)
    }

    /// Store client bound to the open context.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Inactive`] before [`World::start`].
    pub fn store(&self) -> Result<StoreClient<'_>, StepError> {
        self.context().map(StoreClient::new)
    }

    /// User client bound to the open context.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Inactive`] before [`World::start`].
    pub fn users(&self) -> Result<UserClient<'_>, StepError> {
        self.context().map(UserClient::new)
    }

    /// Reads `response`, stores it as the last response and records
    /// evidence labelled `label`.
    ///
    /// The previous response and body are replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Transport`] when the body cannot be read.
    pub async fn capture(
        &mut self,
        label: &str,
        response: ApiResponse,
    ) -> Result<&CapturedResponse, StepError> {
        let captured = response.capture().await?;
        self.record(label, captured);
        self.last_response()
    }

    /// Stores an already captured response as the last response.
    pub fn record(&mut self, label: &str, captured: CapturedResponse) {
        let evidence = captured.to_evidence(label);
        self.sink.attach(&evidence);
        self.evidence.push(evidence);
        self.state.last_response = Some(captured);
    }

    /// The last captured response.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when nothing was captured yet.
    pub fn last_response(&self) -> Result<&CapturedResponse, StepError> {
        self.state
            .last_response
            .as_ref()
            .ok_or_else(|| StepError::precondition("response"))
    }

    /// Best-effort body of the last captured response.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when nothing was captured yet.
    pub fn last_body(&self) -> Result<&ResponseBody, StepError> {
        self.last_response().map(CapturedResponse::body)
    }

    /// JSON body of the last captured response.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when nothing was captured yet and
    /// [`StepError::NoJsonBody`] when the body is empty or not JSON.
    pub fn last_json(&self) -> Result<&Value, StepError> {
        let response = self.last_response()?;
        response.body().as_json().ok_or_else(|| StepError::NoJsonBody {
            url: response.url().to_owned(),
        })
    }

    /// Replaces the pet draft.
    pub fn set_pet_draft(&mut self, pet: Pet) {
        self.state.pet = Some(pet);
    }

    /// The pet draft.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no draft was set.
    pub fn pet_draft(&self) -> Result<&Pet, StepError> {
        self.state
            .pet
            .as_ref()
            .ok_or_else(|| StepError::precondition("pet draft"))
    }

    /// Replaces the order draft.
    pub fn set_order_draft(&mut self, order: Order) {
        self.state.order = Some(order);
    }

    /// The order draft.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no draft was set.
    pub fn order_draft(&self) -> Result<&Order, StepError> {
        self.state
            .order
            .as_ref()
            .ok_or_else(|| StepError::precondition("order draft"))
    }

    /// Replaces the user draft.
    pub fn set_user_draft(&mut self, user: User) {
        self.state.user = Some(user);
    }

    /// The user draft.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no draft was set.
    pub fn user_draft(&self) -> Result<&User, StepError> {
        self.state
            .user
            .as_ref()
            .ok_or_else(|| StepError::precondition("user draft"))
    }

    /// Mutable user draft.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no draft was set.
    pub fn user_draft_mut(&mut self) -> Result<&mut User, StepError> {
        self.state
            .user
            .as_mut()
            .ok_or_else(|| StepError::precondition("user draft"))
    }

    /// Records the id of a pet to clean up, replacing any previous id.
    pub const fn track_pet(&mut self, id: i64) {
        self.state.pet_id = Some(id);
    }

    /// Tracked pet id.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no pet was tracked.
    pub fn pet_id(&self) -> Result<i64, StepError> {
        self.state
            .pet_id
            .ok_or_else(|| StepError::precondition("pet id"))
    }

    /// Records the id of an order to clean up, replacing any previous id.
    pub const fn track_order(&mut self, id: i64) {
        self.state.order_id = Some(id);
    }

    /// Tracked order id.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no order was tracked.
    pub fn order_id(&self) -> Result<i64, StepError> {
        self.state
            .order_id
            .ok_or_else(|| StepError::precondition("order id"))
    }

    /// Records a username to clean up, replacing any previous one.
    pub fn track_user(&mut self, username: impl Into<String>) {
        self.state.username = Some(username.into());
    }

    /// Tracked username.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Precondition`] when no user was tracked.
    pub fn username(&self) -> Result<&str, StepError> {
        self.state
            .username
            .as_deref()
            .ok_or_else(|| StepError::precondition("username"))
    }

    /// Evidence recorded since [`World::start`].
    #[must_use]
    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

impl Drop for World {
    fn drop(&mut self) {
        if let Lifecycle::Active(context) = mem::take(&mut self.lifecycle) {
            tracing::debug!("World dropped while active; disposing context without cleanup");
            context.dispose();
        }
    }
}

async fn cleanup(context: &HttpContext, state: &ScenarioState) {
    let clients = ApiClients::new(context);
    if let Some(id) = state.pet_id {
        log_cleanup("pet", &id.to_string(), clients.pets.delete(id).await);
    }
    if let Some(id) = state.order_id.filter(|id| ORDER_ID_RANGE.contains(id)) {
        log_cleanup("order", &id.to_string(), clients.store.delete_order(id).await);
    }
    if let Some(username) = state.username.as_deref() {
        log_cleanup("user", username, clients.users.delete(username).await);
    }
}

fn log_cleanup(
    entity: &str,
    key: &str,
    outcome: Result<ApiResponse, crate::petstore::ApiError>,
) {
    match outcome {
        Ok(response) => {
            tracing::debug!(entity, key, status = response.status(), "cleanup request sent");
        }
        Err(error) => {
            tracing::warn!(entity, key, %error, "cleanup failed");
        }
    }
}

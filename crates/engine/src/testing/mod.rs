//! In-memory provider for tests.
//!
//! `FakeProvider` implements `ProviderGateway` over a small in-memory
//! directory: users carry a real `SuspensionState`, courses may require a
//! purchase, users may own content that blocks deletion without
//! reassignment. Tests can inject per-id failures, latency or hangs, fail
//! searches or array-endpoint calls wholesale, and inspect call counts and
//! the peak number of concurrent calls.
//!
//! Only compiled with the `test-utils` feature or under `cfg(test)`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use roster_client::{
    BulkItemResult, ClientError, CreateUserResponse, EnrollmentResponse, OperationResponse, Page,
    SearchQuery, SortOrder, SuspensionResponse,
};
use secrecy::SecretString;

use crate::action::NewUser;
use crate::gateway::ProviderGateway;
use crate::resource::{RemoteResource, ResourceId, ResourceKind};
use crate::suspension::SuspensionState;

/// URL returned for purchase-gated enrollments.
pub const FAKE_ORDER_URL: &str = "https://shop.example.com/checkout";

#[derive(Debug, Clone)]
struct FakeUser {
    username: String,
    display_name: String,
    email: Option<String>,
    suspension: SuspensionState,
    owns_content: bool,
}

#[derive(Debug, Clone)]
struct FakeCourse {
    title: String,
    requires_purchase: bool,
}

#[derive(Debug, Clone)]
enum Injected {
    Status { status: u16, code: Option<String> },
    Hang,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<u64, FakeUser>,
    courses: BTreeMap<u64, FakeCourse>,
    enrollments: HashSet<(u64, u64)>,
    purchases: HashSet<(u64, u64)>,
    failures: HashMap<u64, Injected>,
    latency: HashMap<u64, Duration>,
    omit_from_bulk: HashSet<u64>,
    fail_searches: bool,
    fail_bulk: bool,
    next_id: u64,
    last_search: Option<SearchQuery>,
}

/// In-memory `ProviderGateway`.
#[derive(Debug, Default)]
pub struct FakeProvider {
    state: Mutex<State>,
    search_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    bulk_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a> {
    current: &'a AtomicUsize,
}

impl<'a> InFlight<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self { current }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

fn api_error(status: u16, code: &str, message: &str) -> ClientError {
    ClientError::ApiError {
        status,
        url: "fake://provider".to_string(),
        code: Some(code.to_string()),
        message: message.to_string(),
    }
}

fn user_not_found() -> ClientError {
    api_error(404, "rest_user_invalid_id", "Invalid user ID.")
}

fn bulk_failure(id: Option<u64>, username: Option<String>, error: &ClientError) -> BulkItemResult {
    let (code, message) = match error {
        ClientError::ApiError { code, message, .. } => (code.clone(), Some(message.clone())),
        other => (None, Some(other.to_string())),
    };
    BulkItemResult {
        id,
        username,
        success: false,
        already_in_state: false,
        code,
        message,
        generated_password: None,
    }
}

fn bulk_success(id: Option<u64>, already_in_state: bool) -> BulkItemResult {
    BulkItemResult {
        id,
        username: None,
        success: true,
        already_in_state,
        code: None,
        message: None,
        generated_password: None,
    }
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
            ..Self::default()
        }
    }

    /// Active users `1..=count` named `user {id}`.
    pub fn with_users(count: u64) -> Self {
        let fake = Self::new();
        for id in 1..=count {
            fake.add_user(id, &format!("user {id}"), false);
        }
        fake
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ----- setup -----

    pub fn add_user(&self, id: u64, display_name: &str, suspended: bool) {
        let mut suspension = SuspensionState::Active;
        if suspended {
            suspension.suspend(None);
        }
        self.state().users.insert(
            id,
            FakeUser {
                username: format!("user{id}"),
                display_name: display_name.to_string(),
                email: Some(format!("user{id}@example.com")),
                suspension,
                owns_content: false,
            },
        );
    }

    pub fn add_course(&self, id: u64, title: &str, requires_purchase: bool) {
        self.state().courses.insert(
            id,
            FakeCourse {
                title: title.to_string(),
                requires_purchase,
            },
        );
    }

    /// Record a completed purchase of `course` by `user`.
    pub fn add_purchase(&self, user: u64, course: u64) {
        self.state().purchases.insert((user, course));
    }

    /// Deleting `id` without a reassignment target will be refused.
    pub fn set_owns_content(&self, id: u64) {
        if let Some(user) = self.state().users.get_mut(&id) {
            user.owns_content = true;
        }
    }

    /// Every call touching `id` fails with `status` and optional `code`.
    pub fn fail_with(&self, id: u64, status: u16, code: Option<&str>) {
        self.state().failures.insert(
            id,
            Injected::Status {
                status,
                code: code.map(str::to_string),
            },
        );
    }

    /// Every call touching `id` never completes.
    pub fn hang_on(&self, id: u64) {
        self.state().failures.insert(id, Injected::Hang);
    }

    /// Calls touching `id` sleep for `delay` first.
    pub fn set_latency(&self, id: u64, delay: Duration) {
        self.state().latency.insert(id, delay);
    }

    /// Array-endpoint replies silently leave out `id`.
    pub fn omit_from_bulk(&self, id: u64) {
        self.state().omit_from_bulk.insert(id);
    }

    pub fn fail_searches(&self, fail: bool) {
        self.state().fail_searches = fail;
    }

    pub fn fail_bulk(&self, fail: bool) {
        self.state().fail_bulk = fail;
    }

    // ----- introspection -----

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Single-resource and array-endpoint mutations issued so far.
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn bulk_calls(&self) -> usize {
        self.bulk_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<SearchQuery> {
        self.state().last_search.clone()
    }

    pub fn user_exists(&self, id: ResourceId) -> bool {
        self.state().users.contains_key(&id.get())
    }

    pub fn suspension(&self, id: ResourceId) -> Option<SuspensionState> {
        self.state()
            .users
            .get(&id.get())
            .map(|u| u.suspension.clone())
    }

    pub fn is_suspended(&self, id: ResourceId) -> bool {
        self.suspension(id)
            .is_some_and(|s| s.is_suspended())
    }

    pub fn is_enrolled(&self, subject: ResourceId, course: ResourceId) -> bool {
        self.state()
            .enrollments
            .contains(&(subject.get(), course.get()))
    }

    pub fn user_id_by_username(&self, username: &str) -> Option<u64> {
        self.state()
            .users
            .iter()
            .find(|(_, u)| u.username == username)
            .map(|(id, _)| *id)
    }

    // ----- behaviour -----

    /// Apply injected latency and failures for `id`.
    async fn interfere(&self, id: u64) -> Result<(), ClientError> {
        let (delay, injected) = {
            let state = self.state();
            (
                state.latency.get(&id).copied(),
                state.failures.get(&id).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match injected {
            Some(Injected::Hang) => std::future::pending::<Result<(), ClientError>>().await,
            Some(Injected::Status { status, code }) => Err(ClientError::ApiError {
                status,
                url: format!("fake://provider/{id}"),
                code,
                message: format!("injected failure for {id}"),
            }),
            None => Ok(()),
        }
    }

    fn apply_suspension(
        &self,
        id: u64,
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<SuspensionResponse, ClientError> {
        let mut state = self.state();
        let user = state.users.get_mut(&id).ok_or_else(user_not_found)?;
        let transition = user.suspension.set(suspended, reason.map(str::to_string));
        Ok(SuspensionResponse {
            success: true,
            already_in_state: transition.is_noop(),
        })
    }

    fn apply_delete(&self, id: u64, reassign_to: Option<u64>) -> Result<(), ClientError> {
        let mut state = self.state();
        let owns_content = state
            .users
            .get(&id)
            .ok_or_else(user_not_found)?
            .owns_content;
        match reassign_to {
            Some(heir) if !state.users.contains_key(&heir) => {
                return Err(api_error(
                    400,
                    "rest_user_invalid_reassign",
                    "Invalid user ID for reassignment.",
                ));
            }
            None if owns_content => {
                return Err(api_error(
                    409,
                    "reassignment_required",
                    "User owns content; a reassignment target is required.",
                ));
            }
            _ => {}
        }
        state.users.remove(&id);
        state.enrollments.retain(|(subject, _)| *subject != id);
        Ok(())
    }

    fn apply_create(&self, user: &NewUser) -> Result<CreateUserResponse, ClientError> {
        let mut state = self.state();
        if state.users.values().any(|u| u.username == user.username) {
            return Err(api_error(
                400,
                "existing_user_login",
                "Sorry, that username already exists!",
            ));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.users.insert(
            id,
            FakeUser {
                username: user.username.clone(),
                display_name: user
                    .display_name
                    .clone()
                    .unwrap_or_else(|| user.username.clone()),
                email: Some(user.email.clone()),
                suspension: SuspensionState::Active,
                owns_content: false,
            },
        );
        let generated_password = user
            .password
            .is_none()
            .then(|| SecretString::new(format!("generated-{id}").into()));
        Ok(CreateUserResponse {
            success: true,
            id: Some(id),
            generated_password,
        })
    }

    fn search_page(&self, kind: ResourceKind, query: &SearchQuery) -> Page<RemoteResource> {
        let mut state = self.state();
        state.last_search = Some(query.clone());
        let needle = query.term.to_lowercase();

        let all: Vec<RemoteResource> = match kind {
            ResourceKind::Users => state
                .users
                .iter()
                .filter_map(|(id, u)| {
                    Some(RemoteResource {
                        id: ResourceId::new(*id)?,
                        display_name: u.display_name.clone(),
                        email: u.email.clone(),
                        is_suspended: u.suspension.is_suspended(),
                    })
                })
                .collect(),
            ResourceKind::Courses => state
                .courses
                .iter()
                .filter_map(|(id, c)| {
                    Some(RemoteResource {
                        id: ResourceId::new(*id)?,
                        display_name: c.title.clone(),
                        email: None,
                        is_suspended: false,
                    })
                })
                .collect(),
        };
        let total_global = all.len() as u64;

        let mut matching: Vec<RemoteResource> = all
            .into_iter()
            .filter(|r| query.include.is_empty() || query.include.contains(&r.id.get()))
            .filter(|r| {
                needle.is_empty()
                    || r.display_name.to_lowercase().contains(&needle)
                    || r.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .collect();
        if query.order == Some(SortOrder::Desc) {
            matching.reverse();
        }
        let total_filtered = matching.len() as u64;

        let per_page = query.per_page.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * per_page;
        let items: Vec<RemoteResource> = matching.into_iter().skip(start).take(per_page).collect();
        let has_more = (start + items.len()) < total_filtered as usize;

        Page {
            items,
            has_more,
            total_filtered,
            total_global,
        }
    }

    fn check_bulk(&self) -> Result<(), ClientError> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.state().fail_bulk {
            return Err(api_error(500, "internal_server_error", "bulk endpoint failed"));
        }
        Ok(())
    }

    fn omitted(&self, id: u64) -> bool {
        self.state().omit_from_bulk.contains(&id)
    }
}

#[async_trait]
impl ProviderGateway for FakeProvider {
    async fn search(
        &self,
        kind: ResourceKind,
        query: &SearchQuery,
    ) -> Result<Page<RemoteResource>, ClientError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.state().fail_searches {
            return Err(api_error(503, "service_unavailable", "search backend down"));
        }
        Ok(self.search_page(kind, query))
    }

    async fn set_suspension(
        &self,
        id: ResourceId,
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<SuspensionResponse, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.interfere(id.get()).await?;
        self.apply_suspension(id.get(), suspended, reason)
    }

    async fn delete(
        &self,
        id: ResourceId,
        reassign_to: Option<ResourceId>,
    ) -> Result<OperationResponse, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.interfere(id.get()).await?;
        self.apply_delete(id.get(), reassign_to.map(ResourceId::get))?;
        Ok(OperationResponse { success: true })
    }

    async fn create(&self, user: &NewUser) -> Result<CreateUserResponse, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_create(user)
    }

    async fn enroll(
        &self,
        subject: ResourceId,
        course: ResourceId,
    ) -> Result<EnrollmentResponse, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.interfere(course.get()).await?;

        let mut state = self.state();
        if !state.users.contains_key(&subject.get()) {
            return Err(user_not_found());
        }
        let requires_purchase = state
            .courses
            .get(&course.get())
            .ok_or_else(|| api_error(404, "rest_course_invalid_id", "Invalid course ID."))?
            .requires_purchase;

        let pair = (subject.get(), course.get());
        if state.enrollments.contains(&pair) {
            return Ok(EnrollmentResponse {
                success: true,
                already_enrolled: true,
                precondition_required: false,
                order_url: None,
            });
        }
        if requires_purchase && !state.purchases.contains(&pair) {
            return Ok(EnrollmentResponse {
                success: false,
                already_enrolled: false,
                precondition_required: true,
                order_url: Some(format!("{FAKE_ORDER_URL}?course={}", course.get())),
            });
        }
        state.enrollments.insert(pair);
        Ok(EnrollmentResponse {
            success: true,
            already_enrolled: false,
            precondition_required: false,
            order_url: None,
        })
    }

    async fn bulk_set_suspension(
        &self,
        ids: &[ResourceId],
        suspended: bool,
        reason: Option<&str>,
    ) -> Result<Vec<BulkItemResult>, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.check_bulk()?;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let raw = id.get();
            if self.omitted(raw) {
                continue;
            }
            let outcome = match self.interfere(raw).await {
                Ok(()) => self.apply_suspension(raw, suspended, reason),
                Err(e) => Err(e),
            };
            results.push(match outcome {
                Ok(reply) => bulk_success(Some(raw), reply.already_in_state),
                Err(e) => bulk_failure(Some(raw), None, &e),
            });
        }
        Ok(results)
    }

    async fn bulk_delete(
        &self,
        ids: &[ResourceId],
        reassign_to: Option<ResourceId>,
    ) -> Result<Vec<BulkItemResult>, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.check_bulk()?;
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let raw = id.get();
            if self.omitted(raw) {
                continue;
            }
            let outcome = match self.interfere(raw).await {
                Ok(()) => self.apply_delete(raw, reassign_to.map(ResourceId::get)),
                Err(e) => Err(e),
            };
            results.push(match outcome {
                Ok(()) => bulk_success(Some(raw), false),
                Err(e) => bulk_failure(Some(raw), None, &e),
            });
        }
        Ok(results)
    }

    async fn bulk_create(&self, users: &[NewUser]) -> Result<Vec<BulkItemResult>, ClientError> {
        let _guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        self.check_bulk()?;
        Ok(users
            .iter()
            .map(|user| match self.apply_create(user) {
                Ok(reply) => BulkItemResult {
                    id: reply.id,
                    username: Some(user.username.clone()),
                    success: true,
                    already_in_state: false,
                    code: None,
                    message: None,
                    generated_password: reply.generated_password,
                },
                Err(e) => bulk_failure(None, Some(user.username.clone()), &e),
            })
            .collect())
    }
}

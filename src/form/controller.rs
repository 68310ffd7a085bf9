use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::callbacks::{FormCallbacks, Verdict};
use super::model::{ModelCollection, ModelInput};
use super::strategy::{AdapterKind, FormStrategy};
use super::task::{LifecycleTask, TaskKind};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

/// Why a callback or model operation refused to complete.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    message: String,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Rejection {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Rejection {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form is invalid{}", invalid_suffix(.reason))]
    Invalid { reason: Option<Rejection> },
    #[error("lifecycle callback rejected: {0}")]
    Rejected(Rejection),
    #[error("unknown form adapter `{0}`")]
    UnknownAdapter(String),
}

pub type FormResult<T> = Result<T, FormError>;

fn invalid_suffix(reason: &Option<Rejection>) -> String {
    reason
        .as_ref()
        .map(|reason| format!(": {reason}"))
        .unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormOptions {
    pub adapter: AdapterKind,
}

impl FormOptions {
    pub fn named(adapter: &str) -> FormResult<Self> {
        Ok(Self {
            adapter: adapter.parse()?,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FormSnapshot {
    pub is_dirty: bool,
    pub is_pristine: bool,
    pub is_invalid: bool,
    pub is_valid: bool,
    pub is_cancelling: bool,
    pub is_submitting: bool,
    pub is_validating: bool,
    pub is_submittable: bool,
    pub is_unsubmittable: bool,
    pub did_cancel: bool,
    pub did_submit: bool,
    pub did_validate: bool,
}

struct AdapterState<A, V> {
    id: FormId,
    models: ModelCollection,
    strategy: FormStrategy,
    callbacks: FormCallbacks<A, V>,
    cancel_task: LifecycleTask<V>,
    validate_task: LifecycleTask<V>,
    submit_task: LifecycleTask<V>,
}

/// Coordinates cancel, validate and submit over a collection of models.
///
/// Cloning is cheap and yields a handle to the same instance, which is what lifecycle
/// callbacks receive as their last argument.
pub struct FormAdapter<A = (), V = ()> {
    state: Arc<AdapterState<A, V>>,
}

impl<A, V> Clone for FormAdapter<A, V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<A, V> Debug for FormAdapter<A, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormAdapter")
            .field("id", &self.state.id)
            .field("strategy", &self.state.strategy)
            .field("models", &self.state.models)
            .finish()
    }
}

impl<A, V> FormAdapter<A, V>
where
    A: Clone + Send + Sync + 'static,
    V: Clone + Default + Send + Sync + 'static,
{
    pub fn new(
        models: impl Into<ModelInput>,
        options: FormOptions,
        callbacks: FormCallbacks<A, V>,
    ) -> Self {
        Self::with_strategy(models, options.adapter, callbacks)
    }

    pub fn named(
        adapter: &str,
        models: impl Into<ModelInput>,
        callbacks: FormCallbacks<A, V>,
    ) -> FormResult<Self> {
        Ok(Self::new(models, FormOptions::named(adapter)?, callbacks))
    }

    pub fn with_strategy(
        models: impl Into<ModelInput>,
        strategy: impl Into<FormStrategy>,
        callbacks: FormCallbacks<A, V>,
    ) -> Self {
        let id = FormId::next();
        let strategy = strategy.into();
        let models = ModelCollection::normalize(models);
        tracing::debug!(
            form = %id,
            adapter = %strategy.kind(),
            models = models.len(),
            "form adapter created"
        );
        Self {
            state: Arc::new(AdapterState {
                id,
                models,
                strategy,
                callbacks,
                cancel_task: LifecycleTask::new(TaskKind::Cancel, id),
                validate_task: LifecycleTask::new(TaskKind::Validate, id),
                submit_task: LifecycleTask::new(TaskKind::Submit, id),
            }),
        }
    }

    /// A fresh adapter over new models, keeping this one's strategy and callbacks.
    pub fn with_models(&self, models: impl Into<ModelInput>) -> Self {
        Self::with_strategy(
            models,
            self.state.strategy.clone(),
            self.state.callbacks.clone(),
        )
    }

    pub fn id(&self) -> FormId {
        self.state.id
    }

    pub fn adapter(&self) -> AdapterKind {
        self.state.strategy.kind()
    }

    pub fn models(&self) -> &ModelCollection {
        &self.state.models
    }

    pub fn cancel_task(&self) -> &LifecycleTask<V> {
        &self.state.cancel_task
    }

    pub fn validate_task(&self) -> &LifecycleTask<V> {
        &self.state.validate_task
    }

    pub fn submit_task(&self) -> &LifecycleTask<V> {
        &self.state.submit_task
    }

    pub fn is_dirty(&self) -> bool {
        self.state.strategy.is_dirty(&self.state.models)
    }

    pub fn is_pristine(&self) -> bool {
        !self.is_dirty()
    }

    pub fn is_invalid(&self) -> bool {
        self.state.strategy.is_invalid(&self.state.models)
    }

    pub fn is_valid(&self) -> bool {
        !self.is_invalid()
    }

    pub fn is_cancelling(&self) -> bool {
        self.state.cancel_task.is_running()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.submit_task.is_running()
    }

    pub fn is_validating(&self) -> bool {
        self.state.validate_task.is_running()
    }

    pub fn is_unsubmittable(&self) -> bool {
        self.is_pristine() || self.is_invalid() || self.is_submitting() || self.is_cancelling()
    }

    pub fn is_submittable(&self) -> bool {
        !self.is_unsubmittable()
    }

    pub fn did_cancel(&self) -> bool {
        self.state.cancel_task.did_complete()
    }

    pub fn did_submit(&self) -> bool {
        self.state.submit_task.did_complete()
    }

    pub fn did_validate(&self) -> bool {
        self.state.validate_task.did_complete()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let is_dirty = self.is_dirty();
        let is_invalid = self.is_invalid();
        let is_cancelling = self.is_cancelling();
        let is_submitting = self.is_submitting();
        let is_unsubmittable = !is_dirty || is_invalid || is_submitting || is_cancelling;
        FormSnapshot {
            is_dirty,
            is_pristine: !is_dirty,
            is_invalid,
            is_valid: !is_invalid,
            is_cancelling,
            is_submitting,
            is_validating: self.is_validating(),
            is_submittable: !is_unsubmittable,
            is_unsubmittable,
            did_cancel: self.did_cancel(),
            did_submit: self.did_submit(),
            did_validate: self.did_validate(),
        }
    }

    /// Runs the cancel action. Failures are returned; no callback observes them.
    pub async fn cancel(&self, args: A) -> FormResult<V> {
        self.perform_cancel(args).await
    }

    /// Runs validation, returning `None` once an invalid result reached `oninvalid`.
    pub async fn validate(&self, args: A) -> Option<V> {
        self.perform_validate(args).await.ok()
    }

    /// Validates then submits, returning `None` once a failure reached its callback.
    pub async fn submit(&self, args: A) -> Option<V> {
        self.perform_submit(args).await.ok()
    }

    pub async fn perform_cancel(&self, args: A) -> FormResult<V> {
        self.state
            .cancel_task
            .run(async {
                if let Some(oncancel) = &self.state.callbacks.oncancel {
                    return oncancel(args, self.clone())
                        .await
                        .map_err(FormError::Rejected);
                }
                match self.state.strategy.default_cancel(&self.state.models) {
                    Some(cancelling) => cancelling
                        .await
                        .map(|()| V::default())
                        .map_err(FormError::Rejected),
                    None => Ok(V::default()),
                }
            })
            .await
    }

    pub async fn perform_validate(&self, args: A) -> FormResult<V> {
        let result = self
            .state
            .validate_task
            .run(async {
                let verdict = if let Some(onvalidate) = &self.state.callbacks.onvalidate {
                    onvalidate(args, self.clone()).await
                } else {
                    match self.state.strategy.default_validate(&self.state.models) {
                        Some(validating) => validating.await.map(Verdict::from),
                        None => Ok(Verdict::Valid(V::default())),
                    }
                };
                match verdict {
                    Ok(Verdict::Valid(value)) => Ok(value),
                    Ok(Verdict::Invalid) => Err(FormError::Invalid { reason: None }),
                    Err(reason) => Err(FormError::Invalid {
                        reason: Some(reason),
                    }),
                }
            })
            .await;

        if let Err(FormError::Invalid { reason }) = &result {
            tracing::debug!(form = %self.state.id, "form failed validation");
            if let Some(oninvalid) = &self.state.callbacks.oninvalid {
                oninvalid(reason.clone(), self);
            }
        }
        result
    }

    pub async fn perform_submit(&self, args: A) -> FormResult<V> {
        let result = self
            .state
            .submit_task
            .run(async {
                self.perform_validate(args.clone()).await?;
                if let Some(onsubmit) = &self.state.callbacks.onsubmit {
                    return onsubmit(args, self.clone())
                        .await
                        .map_err(FormError::Rejected);
                }
                match self.state.strategy.default_submit(&self.state.models) {
                    Some(submitting) => submitting
                        .await
                        .map(|()| V::default())
                        .map_err(FormError::Rejected),
                    None => Ok(V::default()),
                }
            })
            .await;

        match &result {
            Ok(value) => {
                if let Some(onsuccess) = &self.state.callbacks.onsuccess {
                    onsuccess(value.clone(), self);
                }
            }
            // Invalid results were already handed to `oninvalid` by the validate step.
            Err(FormError::Rejected(reason)) => {
                tracing::debug!(form = %self.state.id, error = %reason, "form submission rejected");
                if let Some(onerror) = &self.state.callbacks.onerror {
                    onerror(reason.clone(), self);
                }
            }
            Err(_) => {}
        }
        result
    }
}

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::controller::{FormError, FormId, FormResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TaskKind {
    Cancel,
    Validate,
    Submit,
}

impl TaskKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskKind::Cancel => "cancel",
            TaskKind::Validate => "validate",
            TaskKind::Submit => "submit",
        }
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome<V> {
    Pending,
    Success(V),
    Error(FormError),
}

impl<V> Outcome<V> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

struct TaskState<V> {
    running: usize,
    performs: u64,
    last: Option<Outcome<V>>,
    last_successful: Option<V>,
    last_errored: Option<FormError>,
}

/// Tracks runs of one lifecycle action.
///
/// Overlapping performs are not serialized: each one holds a running slot until it
/// settles, and whichever settles last owns `last`.
pub struct LifecycleTask<V> {
    kind: TaskKind,
    form_id: FormId,
    state: Arc<RwLock<TaskState<V>>>,
}

impl<V> Clone for LifecycleTask<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            form_id: self.form_id,
            state: self.state.clone(),
        }
    }
}

impl<V> LifecycleTask<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(super) fn new(kind: TaskKind, form_id: FormId) -> Self {
        Self {
            kind,
            form_id,
            state: Arc::new(RwLock::new(TaskState {
                running: 0,
                performs: 0,
                last: None,
                last_successful: None,
                last_errored: None,
            })),
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.read().running > 0
    }

    pub fn running_count(&self) -> usize {
        self.read().running
    }

    pub fn perform_count(&self) -> u64 {
        self.read().performs
    }

    pub fn last(&self) -> Option<Outcome<V>> {
        self.read().last.clone()
    }

    pub fn did_complete(&self) -> bool {
        self.read().last.as_ref().is_some_and(Outcome::is_settled)
    }

    pub fn last_successful(&self) -> Option<V> {
        self.read().last_successful.clone()
    }

    pub fn last_errored(&self) -> Option<FormError> {
        self.read().last_errored.clone()
    }

    pub(super) async fn run<F>(&self, operation: F) -> FormResult<V>
    where
        F: Future<Output = FormResult<V>>,
    {
        let mut slot = self.begin();
        let result = operation.await;
        slot.settle(&result);
        result
    }

    fn begin(&self) -> RunningSlot<'_, V> {
        {
            let mut state = self.write();
            state.running += 1;
            state.performs += 1;
            state.last = Some(Outcome::Pending);
            tracing::debug!(
                form = %self.form_id,
                task = %self.kind,
                running = state.running,
                "lifecycle task started"
            );
        }
        RunningSlot {
            task: self,
            settled: false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TaskState<V>> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, TaskState<V>> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

struct RunningSlot<'a, V>
where
    V: Clone + Send + Sync + 'static,
{
    task: &'a LifecycleTask<V>,
    settled: bool,
}

impl<V> RunningSlot<'_, V>
where
    V: Clone + Send + Sync + 'static,
{
    fn settle(&mut self, result: &FormResult<V>) {
        let mut state = self.task.write();
        state.running = state.running.saturating_sub(1);
        match result {
            Ok(value) => {
                state.last = Some(Outcome::Success(value.clone()));
                state.last_successful = Some(value.clone());
            }
            Err(error) => {
                state.last = Some(Outcome::Error(error.clone()));
                state.last_errored = Some(error.clone());
            }
        }
        self.settled = true;
        tracing::debug!(
            form = %self.task.form_id,
            task = %self.task.kind,
            success = result.is_ok(),
            running = state.running,
            "lifecycle task settled"
        );
    }
}

impl<V> Drop for RunningSlot<'_, V>
where
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        // Dropped mid-flight: release the slot, leave `last` as the run left it.
        let mut state = self.task.write();
        state.running = state.running.saturating_sub(1);
        tracing::debug!(
            form = %self.task.form_id,
            task = %self.task.kind,
            "lifecycle task dropped before settling"
        );
    }
}

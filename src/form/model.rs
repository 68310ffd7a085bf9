use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{self, BoxFuture};

use super::controller::Rejection;

pub type ModelFuture = BoxFuture<'static, Result<(), Rejection>>;

pub type ModelRef = Arc<dyn Model>;

/// Validation state nested under a record-store model.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ValidationState {
    pub is_invalid: bool,
}

/// An externally owned editable record.
///
/// Every member has a neutral default, so a model implements only what it supports.
/// Missing flags read as `false`, and `save`/`rollback` resolve immediately.
pub trait Model: Send + Sync + 'static {
    fn is_dirty(&self) -> bool {
        false
    }

    fn is_invalid(&self) -> bool {
        false
    }

    fn has_dirty_attributes(&self) -> bool {
        false
    }

    fn validations(&self) -> Option<ValidationState> {
        None
    }

    /// `None` when the model has no validation of its own; adapters skip it.
    fn validate(&self) -> Option<ModelFuture> {
        None
    }

    fn save(&self) -> ModelFuture {
        resolved()
    }

    fn rollback(&self) -> ModelFuture {
        resolved()
    }

    fn rollback_attributes(&self) {}
}

fn resolved() -> ModelFuture {
    Box::pin(future::ready(Ok(())))
}

pub trait ModelFlag {
    fn is_set(&self) -> bool;
}

impl ModelFlag for bool {
    fn is_set(&self) -> bool {
        *self
    }
}

impl ModelFlag for AtomicBool {
    fn is_set(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl<T> ModelFlag for Arc<T>
where
    T: ModelFlag + ?Sized,
{
    fn is_set(&self) -> bool {
        self.as_ref().is_set()
    }
}

/// Raw models as a view supplies them: nothing, one model, or a nested list.
#[derive(Clone, Default)]
pub enum ModelInput {
    #[default]
    Absent,
    One(ModelRef),
    Many(Vec<ModelInput>),
}

impl From<ModelRef> for ModelInput {
    fn from(model: ModelRef) -> Self {
        Self::One(model)
    }
}

impl From<Option<ModelRef>> for ModelInput {
    fn from(model: Option<ModelRef>) -> Self {
        model.map_or(Self::Absent, Self::One)
    }
}

impl From<Vec<ModelRef>> for ModelInput {
    fn from(models: Vec<ModelRef>) -> Self {
        Self::Many(models.into_iter().map(Self::One).collect())
    }
}

impl From<Vec<ModelInput>> for ModelInput {
    fn from(models: Vec<ModelInput>) -> Self {
        Self::Many(models)
    }
}

impl From<()> for ModelInput {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

#[derive(Clone)]
pub struct ModelEntry {
    model: ModelRef,
}

impl ModelEntry {
    fn new(model: ModelRef) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn model_ref(&self) -> &ModelRef {
        &self.model
    }

    pub fn is(&self, model: &ModelRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.model), Arc::as_ptr(model))
    }
}

/// Ordered, compacted models owned by one adapter instance.
#[derive(Clone, Default)]
pub struct ModelCollection {
    entries: Arc<[ModelEntry]>,
}

impl ModelCollection {
    pub fn normalize(input: impl Into<ModelInput>) -> Self {
        let mut entries = Vec::new();
        match input.into() {
            ModelInput::Absent => {}
            ModelInput::One(model) => entries.push(ModelEntry::new(model)),
            ModelInput::Many(items) => {
                for item in items {
                    match item {
                        ModelInput::Absent => {}
                        ModelInput::One(model) => entries.push(ModelEntry::new(model)),
                        ModelInput::Many(nested) => {
                            for inner in nested {
                                match inner {
                                    ModelInput::Absent => {}
                                    ModelInput::One(model) => entries.push(ModelEntry::new(model)),
                                    ModelInput::Many(deeper) => {
                                        tracing::warn!(
                                            discarded = deeper.len(),
                                            "model input nested more than one level deep"
                                        );
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        Self {
            entries: entries.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ModelEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.iter()
    }

    pub fn any(&self, predicate: impl Fn(&dyn Model) -> bool) -> bool {
        self.entries.iter().any(|entry| predicate(entry.model()))
    }
}

impl Debug for ModelCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCollection")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<'a> IntoIterator for &'a ModelCollection {
    type Item = &'a ModelEntry;
    type IntoIter = std::slice::Iter<'a, ModelEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

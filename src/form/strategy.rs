use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use futures::future::try_join_all;

use super::callbacks::FormFuture;
use super::controller::FormError;
use super::model::{ModelCollection, ModelFuture};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum AdapterKind {
    #[default]
    Passthrough,
    Changeset,
    RecordStore,
}

impl AdapterKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AdapterKind::Passthrough => "passthrough",
            AdapterKind::Changeset => "changeset",
            AdapterKind::RecordStore => "record-store",
        }
    }
}

impl Display for AdapterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names are dasherized before matching, so `emberChangeset` reads as `ember-changeset`.
///
/// `changeset` and `ember-changeset` select the same variant. A user `oncancel` therefore
/// replaces the rollback for both; call `ModelEntry::model().rollback()` from the hook to
/// keep it.
impl FromStr for AdapterKind {
    type Err = FormError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match dasherize(name).as_str() {
            "base" | "passthrough" => Ok(AdapterKind::Passthrough),
            "changeset" | "ember-changeset" => Ok(AdapterKind::Changeset),
            "record-store" | "ember-model" => Ok(AdapterKind::RecordStore),
            _ => Err(FormError::UnknownAdapter(name.to_string())),
        }
    }
}

fn dasherize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.trim().chars().enumerate() {
        if ch == '_' || ch == ' ' {
            out.push('-');
        } else if ch.is_ascii_uppercase() {
            if index > 0 && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

pub type ModelPredicate = Arc<dyn Fn(&ModelCollection) -> bool + Send + Sync>;

/// How an adapter reads its models and what it does when the user leaves a hook unset.
#[derive(Clone)]
pub enum FormStrategy {
    /// The caller owns dirty/invalid tracking; no model-aware lifecycle defaults.
    Passthrough {
        dirty: Option<ModelPredicate>,
        invalid: Option<ModelPredicate>,
    },
    /// Every model is a changeset: flags, `validate`, `save` and `rollback` on all of them.
    Changeset,
    /// Record-store models: dirty attributes, nested validations, optional `validate`.
    RecordStore,
}

impl Default for FormStrategy {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl Debug for FormStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormStrategy::Passthrough { dirty, invalid } => f
                .debug_struct("Passthrough")
                .field("dirty", &dirty.is_some())
                .field("invalid", &invalid.is_some())
                .finish(),
            FormStrategy::Changeset => f.write_str("Changeset"),
            FormStrategy::RecordStore => f.write_str("RecordStore"),
        }
    }
}

impl From<AdapterKind> for FormStrategy {
    fn from(kind: AdapterKind) -> Self {
        match kind {
            AdapterKind::Passthrough => FormStrategy::passthrough(),
            AdapterKind::Changeset => FormStrategy::Changeset,
            AdapterKind::RecordStore => FormStrategy::RecordStore,
        }
    }
}

impl FormStrategy {
    pub fn passthrough() -> Self {
        FormStrategy::Passthrough {
            dirty: None,
            invalid: None,
        }
    }

    /// Sets the passthrough dirty predicate. Other variants are returned unchanged.
    pub fn dirty_when(
        self,
        predicate: impl Fn(&ModelCollection) -> bool + Send + Sync + 'static,
    ) -> Self {
        match self {
            FormStrategy::Passthrough { invalid, .. } => FormStrategy::Passthrough {
                dirty: Some(Arc::new(predicate)),
                invalid,
            },
            other => other,
        }
    }

    /// Sets the passthrough invalid predicate. Other variants are returned unchanged.
    pub fn invalid_when(
        self,
        predicate: impl Fn(&ModelCollection) -> bool + Send + Sync + 'static,
    ) -> Self {
        match self {
            FormStrategy::Passthrough { dirty, .. } => FormStrategy::Passthrough {
                dirty,
                invalid: Some(Arc::new(predicate)),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> AdapterKind {
        match self {
            FormStrategy::Passthrough { .. } => AdapterKind::Passthrough,
            FormStrategy::Changeset => AdapterKind::Changeset,
            FormStrategy::RecordStore => AdapterKind::RecordStore,
        }
    }

    pub(super) fn is_dirty(&self, models: &ModelCollection) -> bool {
        match self {
            FormStrategy::Passthrough { dirty, .. } => {
                dirty.as_ref().is_some_and(|predicate| predicate(models))
            }
            FormStrategy::Changeset => models.any(|model| model.is_dirty()),
            FormStrategy::RecordStore => models.any(|model| model.has_dirty_attributes()),
        }
    }

    pub(super) fn is_invalid(&self, models: &ModelCollection) -> bool {
        match self {
            FormStrategy::Passthrough { invalid, .. } => {
                invalid.as_ref().is_some_and(|predicate| predicate(models))
            }
            FormStrategy::Changeset => models.any(|model| model.is_invalid()),
            FormStrategy::RecordStore => models.any(|model| {
                model
                    .validations()
                    .is_some_and(|validations| validations.is_invalid)
            }),
        }
    }

    pub(super) fn default_cancel(&self, models: &ModelCollection) -> Option<FormFuture<()>> {
        match self {
            FormStrategy::Passthrough { .. } => None,
            FormStrategy::Changeset => Some(join_models(
                models,
                "rollback",
                models.iter().map(|entry| entry.model().rollback()).collect(),
            )),
            FormStrategy::RecordStore => {
                for entry in models {
                    entry.model().rollback_attributes();
                }
                tracing::trace!(models = models.len(), "rolled back model attributes");
                Some(Box::pin(futures::future::ready(Ok(()))))
            }
        }
    }

    pub(super) fn default_submit(&self, models: &ModelCollection) -> Option<FormFuture<()>> {
        match self {
            FormStrategy::Passthrough { .. } => None,
            FormStrategy::Changeset | FormStrategy::RecordStore => Some(join_models(
                models,
                "save",
                models.iter().map(|entry| entry.model().save()).collect(),
            )),
        }
    }

    /// Resolves to whether the form counts as valid once every model validated.
    ///
    /// Both model-aware variants call `validate` on exactly the models that provide one.
    pub(super) fn default_validate(&self, models: &ModelCollection) -> Option<FormFuture<bool>> {
        if let FormStrategy::Passthrough { .. } = self {
            return None;
        }
        let validating = join_models(
            models,
            "validate",
            models
                .iter()
                .filter_map(|entry| entry.model().validate())
                .collect(),
        );
        let strategy = self.clone();
        let models = models.clone();
        Some(Box::pin(async move {
            validating.await?;
            Ok(match strategy {
                FormStrategy::Changeset => !strategy.is_invalid(&models),
                _ => true,
            })
        }))
    }
}

fn join_models(
    models: &ModelCollection,
    operation: &'static str,
    pending: Vec<ModelFuture>,
) -> FormFuture<()> {
    tracing::trace!(
        models = models.len(),
        issued = pending.len(),
        operation,
        "joining model operations"
    );
    Box::pin(async move {
        try_join_all(pending).await?;
        Ok(())
    })
}

mod callbacks;
mod controller;
mod model;
mod strategy;
mod task;


pub use calmform_derive::Model;
pub use callbacks::{FormCallbacks, FormFuture, Verdict};
pub use controller::{
    FormAdapter, FormError, FormId, FormOptions, FormResult, FormSnapshot, Rejection,
};
pub use model::{
    Model, ModelCollection, ModelEntry, ModelFlag, ModelFuture, ModelInput, ModelRef,
    ValidationState,
};
pub use strategy::{AdapterKind, FormStrategy, ModelPredicate};
pub use task::{LifecycleTask, Outcome, TaskKind};

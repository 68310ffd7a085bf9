pub use crate::form::{
    AdapterKind, FormAdapter, FormCallbacks, FormError, FormOptions, FormResult, FormSnapshot,
    FormStrategy, Model, ModelInput, ModelRef, Outcome, Rejection, Verdict,
};

pub mod form;
pub mod prelude;

pub use form::{FormAdapter, FormCallbacks, FormError, FormOptions, FormResult};

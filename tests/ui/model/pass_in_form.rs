use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use calmform::prelude::*;

#[derive(Default, calmform::form::Model)]
struct Comment {
    #[model(dirty)]
    dirty: AtomicBool,
}

fn main() {
    let comment = Arc::new(Comment::default());
    let model: ModelRef = comment.clone();
    let form: FormAdapter = FormAdapter::new(
        model,
        FormOptions {
            adapter: AdapterKind::Changeset,
        },
        FormCallbacks::new(),
    );
    assert!(!form.is_submittable());
    comment.dirty.store(true, Ordering::SeqCst);
    assert!(form.is_submittable());
}

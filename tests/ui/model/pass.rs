use std::sync::atomic::{AtomicBool, Ordering};

use calmform::form::Model;

#[derive(Default, calmform::form::Model)]
struct DraftPost {
    #[model(dirty)]
    title_changed: AtomicBool,
    #[model(dirty)]
    body_changed: AtomicBool,
    #[model(invalid)]
    invalid: bool,
    #[model(dirty_attributes)]
    attributes_changed: AtomicBool,
    #[model(validations)]
    rules_failed: AtomicBool,
    _untracked: u32,
}

fn main() {
    let post = DraftPost::default();
    assert!(!post.is_dirty());
    post.body_changed.store(true, Ordering::SeqCst);
    assert!(post.is_dirty());
    assert!(!post.is_invalid());
    assert!(!post.has_dirty_attributes());
    assert!(post.validations().is_some_and(|state| !state.is_invalid));
    post.rules_failed.store(true, Ordering::SeqCst);
    assert!(post.validations().is_some_and(|state| state.is_invalid));
    let _ = &post.title_changed;
    let _ = &post.attributes_changed;
}

use calmform::form::Model;

#[derive(Model)]
struct Draft<T> {
    #[model(dirty)]
    dirty: bool,
    value: T,
}

fn main() {
    let draft = Draft { dirty: false, value: 1u8 };
    let _ = (draft.dirty, draft.value);
}

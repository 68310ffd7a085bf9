use calmform::form::Model;

#[derive(Model)]
struct Draft {
    #[model(bogus)]
    dirty: bool,
}

fn main() {
    let draft = Draft { dirty: true };
    let _ = draft.dirty;
}

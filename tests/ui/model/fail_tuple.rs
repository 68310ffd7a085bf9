use calmform::form::Model;

#[derive(Model)]
struct Draft(bool);

fn main() {
    let draft = Draft(true);
    let _ = draft.0;
}

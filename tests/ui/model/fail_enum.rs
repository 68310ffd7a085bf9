use calmform::form::Model;

#[derive(Model)]
enum Draft {
    Clean,
    Dirty,
}

fn main() {
    let _ = [Draft::Clean, Draft::Dirty];
}

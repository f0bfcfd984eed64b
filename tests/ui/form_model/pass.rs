use caseform::form::{FieldLens, FormModel};

#[derive(Clone, caseform::form::FormModel)]
struct DemoForm {
    email: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@firm.example".to_string(),
    };
    lens.set(&mut model, "b@firm.example".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@firm.example");
}

use caseform::form::{FieldLens, FormModel};

#[derive(Clone, caseform::form::FormModel)]
struct AuditedForm {
    email: String,
    #[form(skip)]
    revision: u32,
}

fn main() {
    let fields = AuditedForm::fields();
    let mut model = AuditedForm {
        email: String::new(),
        revision: 7,
    };
    fields.email().set(&mut model, "desk@firm.example".to_string());
    assert_eq!(model.revision, 7);
    assert_eq!(fields.email().key().as_str(), "email");
}

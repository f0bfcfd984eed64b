mod controller;
mod rules;
mod validation;


pub use caseform_form_derive::FormModel;
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitState, ValidationMode,
};
pub use rules::{Constraint, Rule, RuleSet};
pub use validation::{FieldLens, FieldValidator, FormModel, FormValidator, ValidationError};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalogue::SERVICE_OPTION_VALUES;
use crate::form::{
    Constraint, FieldLens, FormController, FormModel, FormResult, Rule, RuleSet, ValidationError,
};

#[derive(Clone, Debug, Default, Eq, PartialEq, caseform_form_derive::FormModel)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldError(&'static str);

impl FieldError {
    pub const fn new(message: &'static str) -> Self {
        Self(message)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl ValidationError for FieldError {
    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.0)
    }
}

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("name pattern must compile"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile"));
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+27|0)[6-8][0-9]{8}$").expect("phone pattern must compile")
});

static NAME_RULE_LIST: [Rule; 3] = [
    Rule::new(
        Constraint::MinLength(2),
        "Name must be at least 2 characters",
    ),
    Rule::new(
        Constraint::MaxLength(100),
        "Name must be less than 100 characters",
    ),
    Rule::new(
        Constraint::Pattern(&NAME_PATTERN),
        "Name can only contain letters, spaces, hyphens, and apostrophes",
    ),
];

static EMAIL_RULE_LIST: [Rule; 2] = [
    Rule::new(Constraint::Required, "Email is required"),
    Rule::new(
        Constraint::Pattern(&EMAIL_PATTERN),
        "Please enter a valid email address",
    ),
];

static PHONE_RULE_LIST: [Rule; 2] = [
    Rule::new(Constraint::Required, "Phone number is required"),
    Rule::new(
        Constraint::Pattern(&PHONE_PATTERN),
        "Please enter a valid South African phone number (e.g., 0761731018 or +27761731018)",
    ),
];

static SERVICE_RULE_LIST: [Rule; 2] = [
    Rule::new(Constraint::Required, "Please select a legal service"),
    Rule::new(
        Constraint::OneOf(&SERVICE_OPTION_VALUES),
        "Please select a legal service",
    ),
];

static MESSAGE_RULE_LIST: [Rule; 2] = [
    Rule::new(
        Constraint::MinLength(10),
        "Message must be at least 10 characters",
    ),
    Rule::new(
        Constraint::MaxLength(1000),
        "Message must be less than 1000 characters",
    ),
];

pub static NAME_RULES: RuleSet = RuleSet::new(&NAME_RULE_LIST);
pub static EMAIL_RULES: RuleSet = RuleSet::new(&EMAIL_RULE_LIST);
pub static PHONE_RULES: RuleSet = RuleSet::new(&PHONE_RULE_LIST);
pub static SERVICE_RULES: RuleSet = RuleSet::new(&SERVICE_RULE_LIST);
pub static MESSAGE_RULES: RuleSet = RuleSet::new(&MESSAGE_RULE_LIST);

pub const FIELD_NAMES: [&str; 5] = ["name", "email", "phone", "service", "message"];

pub fn field_rules(field: &str) -> Option<RuleSet> {
    match field {
        "name" => Some(NAME_RULES),
        "email" => Some(EMAIL_RULES),
        "phone" => Some(PHONE_RULES),
        "service" => Some(SERVICE_RULES),
        "message" => Some(MESSAGE_RULES),
        _ => None,
    }
}

pub fn validate(field: &str, value: &str) -> Option<&'static str> {
    field_rules(field).and_then(|rules| rules.first_violation(value))
}

pub fn validate_all(form: &InquiryForm) -> BTreeMap<&'static str, &'static str> {
    let values = [
        ("name", form.name.as_str()),
        ("email", form.email.as_str()),
        ("phone", form.phone.as_str()),
        ("service", form.service.as_str()),
        ("message", form.message.as_str()),
    ];
    values
        .into_iter()
        .filter_map(|(field, value)| validate(field, value).map(|message| (field, message)))
        .collect()
}

pub(super) fn register_inquiry_rules(
    controller: &FormController<InquiryForm, FieldError>,
) -> FormResult<()> {
    let fields = InquiryForm::fields();

    register_rules(controller, fields.name(), NAME_RULES)?;
    register_rules(controller, fields.email(), EMAIL_RULES)?;
    register_rules(controller, fields.phone(), PHONE_RULES)?;
    register_rules(controller, fields.service(), SERVICE_RULES)?;
    register_rules(controller, fields.message(), MESSAGE_RULES)?;

    controller.register_required_field(fields.name())?;
    controller.register_required_field(fields.email())?;
    controller.register_required_field(fields.phone())?;
    controller.register_required_field(fields.service())?;
    controller.register_required_field(fields.message())?;

    controller.register_field_description(fields.phone(), "0761731018 or +27761731018")?;
    controller.register_field_description(fields.service(), "Select a legal service")?;
    controller.register_field_description(
        fields.message(),
        "Brief description of your legal matter (10-1000 characters)",
    )?;

    Ok(())
}

fn register_rules<L>(
    controller: &FormController<InquiryForm, FieldError>,
    lens: L,
    rules: RuleSet,
) -> FormResult<()>
where
    L: FieldLens<InquiryForm, Value = String>,
{
    controller.register_field_validator(lens, move |_model: &InquiryForm, value: &String| {
        match rules.first_violation(value) {
            Some(message) => Err(FieldError::new(message)),
            None => Ok(()),
        }
    })
}

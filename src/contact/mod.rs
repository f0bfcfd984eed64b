mod phone;
mod schema;


pub use phone::normalize_phone;
pub use schema::{
    EMAIL_RULES, FIELD_NAMES, FieldError, InquiryForm, InquiryFormEmailLens, InquiryFormFields,
    InquiryFormMessageLens, InquiryFormNameLens, InquiryFormPhoneLens, InquiryFormServiceLens,
    MESSAGE_RULES, NAME_RULES, PHONE_RULES, SERVICE_RULES, field_rules, validate, validate_all,
};

use std::borrow::Cow;
use std::sync::Arc;

use crate::feedback::{ToastEntry, ToastKind, ToastManager};
use crate::form::{
    FieldLens, FormController, FormError, FormModel, FormOptions, FormResult, FormSnapshot,
    SubmitState, ValidationMode,
};
use crate::relay::{HttpRelaySender, InquiryPayload, RelayConfig, RelaySender};

pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Thank you for your message. We will contact you shortly.";
pub const SUBMIT_FAILURE_MESSAGE: &str =
    "There was an error submitting the form. Please try again.";

const SUCCESS_TOAST_TITLE: &str = "Message sent";
const FAILURE_TOAST_TITLE: &str = "Submission failed";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmissionOutcome {
    Delivered,
    RefusedInvalid,
    Failed { reason: String },
    AlreadyInFlight,
}

// One rendered contact form owns one intake; clones share the same state.
#[derive(Clone)]
pub struct ContactIntake {
    controller: FormController<InquiryForm, FieldError>,
    toasts: ToastManager,
    relay: RelayConfig,
}

impl ContactIntake {
    pub fn new(relay: RelayConfig) -> FormResult<Self> {
        let controller = FormController::new(
            InquiryForm::default(),
            FormOptions {
                validate_mode: ValidationMode::OnBlur,
                validate_first_error_only: true,
            },
        );
        schema::register_inquiry_rules(&controller)?;
        Ok(Self {
            controller,
            toasts: ToastManager::new(),
            relay,
        })
    }

    pub fn from_env() -> FormResult<Self> {
        Self::new(RelayConfig::from_env())
    }

    pub fn fields() -> InquiryFormFields {
        InquiryForm::fields()
    }

    pub fn controller(&self) -> &FormController<InquiryForm, FieldError> {
        &self.controller
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn relay_config(&self) -> &RelayConfig {
        &self.relay
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<InquiryForm, FieldError>> {
        self.controller.snapshot()
    }

    pub fn input<L>(&self, lens: L, value: impl Into<String>) -> FormResult<()>
    where
        L: FieldLens<InquiryForm, Value = String>,
    {
        self.controller.set(lens, value.into())
    }

    // Phone keystrokes are reshaped before they land in the model, so the
    // rules only ever see normalized input.
    pub fn input_phone(&self, raw: &str) -> FormResult<()> {
        self.controller
            .set(Self::fields().phone(), normalize_phone(raw))
    }

    pub fn blur<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<InquiryForm, Value = String>,
    {
        self.controller.touch(lens)
    }

    pub fn display_error<L>(&self, lens: L) -> FormResult<Option<Cow<'static, str>>>
    where
        L: FieldLens<InquiryForm, Value = String>,
    {
        self.controller.display_error(lens)
    }

    pub fn submit<S>(&self, sender: &S) -> FormResult<SubmissionOutcome>
    where
        S: RelaySender + ?Sized,
    {
        let result = self.controller.submit(|model| {
            let payload = payload_for(model);
            sender
                .send(&payload)
                .map(drop)
                .map_err(|err| FormError::SubmissionFailed(err.to_string()))
        });
        self.conclude(result)
    }

    pub async fn submit_async<S>(&self, sender: Arc<S>) -> FormResult<SubmissionOutcome>
    where
        S: RelaySender + ?Sized + 'static,
    {
        let result = self
            .controller
            .submit_async(|model| {
                let payload = payload_for(model);
                let sender = Arc::clone(&sender);
                async move {
                    sender
                        .send(&payload)
                        .map(drop)
                        .map_err(|err| FormError::SubmissionFailed(err.to_string()))
                }
            })
            .await;
        self.conclude(result)
    }

    pub fn submit_http(&self) -> FormResult<SubmissionOutcome> {
        let sender = HttpRelaySender::new(self.relay.clone());
        self.submit(&sender)
    }

    fn conclude(&self, result: FormResult<()>) -> FormResult<SubmissionOutcome> {
        match result {
            Ok(()) => {
                if self.controller.snapshot()?.submit_state == SubmitState::Succeeded {
                    self.toasts.show(
                        ToastEntry::new(SUCCESS_TOAST_TITLE, SUBMIT_SUCCESS_MESSAGE)
                            .kind(ToastKind::Success),
                    );
                    self.controller.reset_values()?;
                    Ok(SubmissionOutcome::Delivered)
                } else {
                    // Validation refused the submit; surface every field
                    // error at once and keep what the user typed.
                    self.controller.touch_all()?;
                    Ok(SubmissionOutcome::RefusedInvalid)
                }
            }
            Err(FormError::AlreadySubmitting) => Ok(SubmissionOutcome::AlreadyInFlight),
            Err(FormError::SubmissionFailed(reason)) => {
                self.toasts.show(
                    ToastEntry::new(FAILURE_TOAST_TITLE, SUBMIT_FAILURE_MESSAGE)
                        .kind(ToastKind::Error),
                );
                Ok(SubmissionOutcome::Failed { reason })
            }
            Err(other) => Err(other),
        }
    }
}

fn payload_for(model: &InquiryForm) -> InquiryPayload {
    InquiryPayload::new(
        &model.name,
        &model.email,
        &model.phone,
        &model.service,
        &model.message,
    )
}

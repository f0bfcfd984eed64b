use std::env;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use url::Url;

pub const DEFAULT_RELAY_BASE: &str = "https://formsubmit.co";
pub const DEFAULT_DESTINATION: &str = "nongcebogazide@gmail.com";
pub const RELAY_BASE_ENV: &str = "CASEFORM_RELAY_BASE";
pub const DESTINATION_ENV: &str = "CASEFORM_CONTACT_EMAIL";

pub const RELAY_CONNECT_TIMEOUT_MS_DEFAULT: u64 = 5_000;
pub const RELAY_REQUEST_TIMEOUT_MS_DEFAULT: u64 = 15_000;

pub const SUBJECT_PREFIX: &str = "New Legal Inquiry - ";

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SubmissionError {
    Transport(String),
    Rejected { status: u16 },
    InvalidEndpoint(String),
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Transport(reason) => {
                write!(f, "submission transport error: {reason}")
            }
            SubmissionError::Rejected { status } => {
                write!(f, "relay rejected submission with http status {status}")
            }
            SubmissionError::InvalidEndpoint(reason) => {
                write!(f, "relay endpoint invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelayConfig {
    pub base: String,
    pub destination: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl RelayConfig {
    pub fn new(base: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            destination: destination.into(),
            connect_timeout_ms: RELAY_CONNECT_TIMEOUT_MS_DEFAULT,
            request_timeout_ms: RELAY_REQUEST_TIMEOUT_MS_DEFAULT,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            relay_base_or_default(env::var(RELAY_BASE_ENV).ok()),
            destination_or_default(env::var(DESTINATION_ENV).ok()),
        )
    }

    // The destination address rides in the endpoint path, not the body.
    pub fn endpoint(&self) -> Result<Url, SubmissionError> {
        let base = Url::parse(&self.base)
            .map_err(|err| SubmissionError::InvalidEndpoint(err.to_string()))?;
        base.join(&self.destination)
            .map_err(|err| SubmissionError::InvalidEndpoint(err.to_string()))
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_BASE, DEFAULT_DESTINATION)
    }
}

fn destination_or_default(candidate: Option<String>) -> String {
    candidate
        .map(|value| value.trim().to_string())
        .filter(|value| value.contains('@'))
        .unwrap_or_else(|| DEFAULT_DESTINATION.to_string())
}

fn relay_base_or_default(candidate: Option<String>) -> String {
    candidate
        .map(|value| value.trim().to_string())
        .filter(|value| Url::parse(value).is_ok())
        .unwrap_or_else(|| DEFAULT_RELAY_BASE.to_string())
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InquiryPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub subject: String,
}

impl InquiryPayload {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let service = service.into();
        let subject = format!("{SUBJECT_PREFIX}{service}");
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            service,
            message: message.into(),
            subject,
        }
    }

    // Field order matches what the relay's table template expects.
    pub fn form_fields(&self) -> [(&'static str, &str); 8] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("_subject", self.subject.as_str()),
            ("service", self.service.as_str()),
            ("message", self.message.as_str()),
            ("_captcha", "false"),
            ("_template", "table"),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelayReceipt {
    pub status: u16,
}

pub trait RelaySender: Send + Sync {
    fn send(&self, payload: &InquiryPayload) -> Result<RelayReceipt, SubmissionError>;
}

pub struct HttpRelaySender {
    config: RelayConfig,
}

impl HttpRelaySender {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

impl RelaySender for HttpRelaySender {
    fn send(&self, payload: &InquiryPayload) -> Result<RelayReceipt, SubmissionError> {
        let endpoint = self.config.endpoint()?;
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_millis(self.config.connect_timeout_ms))
            .timeout_read(Duration::from_millis(self.config.request_timeout_ms))
            .timeout_write(Duration::from_millis(self.config.request_timeout_ms))
            .build();
        let fields = payload.form_fields();
        let request = agent
            .post(endpoint.as_str())
            .set("accept", "application/json");
        match request.send_form(&fields) {
            Ok(response) if (200..=299).contains(&response.status()) => Ok(RelayReceipt {
                status: response.status(),
            }),
            Ok(response) => Err(SubmissionError::Rejected {
                status: response.status(),
            }),
            Err(ureq::Error::Status(code, _response)) => {
                Err(SubmissionError::Rejected { status: code })
            }
            Err(ureq::Error::Transport(err)) => Err(SubmissionError::Transport(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_the_destination_address() {
        let config = RelayConfig::default();
        let endpoint = config.endpoint().expect("endpoint should build");
        assert_eq!(
            endpoint.as_str(),
            "https://formsubmit.co/nongcebogazide@gmail.com"
        );
    }

    #[test]
    fn endpoint_rejects_an_unparseable_base() {
        let config = RelayConfig::new("not a url", DEFAULT_DESTINATION);
        let error = config.endpoint().expect_err("endpoint must fail");
        assert!(matches!(error, SubmissionError::InvalidEndpoint(_)));
    }

    #[test]
    fn destination_override_must_look_like_an_address() {
        assert_eq!(
            destination_or_default(Some(" inbox@firm.example ".to_string())),
            "inbox@firm.example"
        );
        assert_eq!(
            destination_or_default(Some("not-an-address".to_string())),
            DEFAULT_DESTINATION
        );
        assert_eq!(destination_or_default(None), DEFAULT_DESTINATION);
    }

    #[test]
    fn relay_base_override_must_parse_as_a_url() {
        assert_eq!(
            relay_base_or_default(Some("https://relay.test".to_string())),
            "https://relay.test"
        );
        assert_eq!(
            relay_base_or_default(Some("://broken".to_string())),
            DEFAULT_RELAY_BASE
        );
        assert_eq!(relay_base_or_default(None), DEFAULT_RELAY_BASE);
    }

    #[test]
    fn http_sender_keeps_the_configured_destination() {
        let sender = HttpRelaySender::new(RelayConfig::default());
        assert_eq!(sender.config().destination, DEFAULT_DESTINATION);
        assert_eq!(
            sender.config().connect_timeout_ms,
            RELAY_CONNECT_TIMEOUT_MS_DEFAULT
        );
    }

    #[test]
    fn payload_serializes_in_relay_field_order() {
        let payload = InquiryPayload::new(
            "Nomsa Dlamini",
            "nomsa@example.com",
            "0761731018",
            "family",
            "I need help with a custody arrangement.",
        );
        assert_eq!(payload.subject, "New Legal Inquiry - family");

        let fields = payload.form_fields();
        let keys = fields.iter().map(|(key, _)| *key).collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "name", "email", "phone", "_subject", "service", "message", "_captcha",
                "_template"
            ]
        );
        assert_eq!(fields[3].1, "New Legal Inquiry - family");
        assert_eq!(fields[6], ("_captcha", "false"));
        assert_eq!(fields[7], ("_template", "table"));
    }
}

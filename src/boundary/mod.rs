use std::panic::{self, AssertUnwindSafe, UnwindSafe};
use std::sync::{Arc, RwLock};

// Last-resort containment at the composition root: any panic escaping the
// supervised work is converted into a static fallback with recovery
// actions, instead of tearing the whole surface down.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecoveryAction {
    Reload,
    GoHome,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrashReport {
    pub message: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FallbackScreen {
    pub heading: &'static str,
    pub message: &'static str,
    pub contact_line: &'static str,
    pub detail: String,
    pub actions: [RecoveryAction; 2],
}

pub const FALLBACK_HEADING: &str = "Oops! Something went wrong";
pub const FALLBACK_MESSAGE: &str =
    "We're sorry for the inconvenience. An unexpected error has occurred.";
pub const FALLBACK_CONTACT_LINE: &str = "076 173 1018 | nongcebogazide@gmail.com";

#[derive(Clone, Debug, Eq, PartialEq)]
enum BoundaryState {
    Operational,
    Crashed(CrashReport),
}

#[derive(Clone, Default)]
pub struct Supervisor {
    state: Arc<RwLock<BoundaryState>>,
}

impl Default for BoundaryState {
    fn default() -> Self {
        BoundaryState::Operational
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    // Runs the supervised work unless a previous crash is still showing
    // its fallback. The crash detail is captured here, once; there is no
    // later update to the report.
    pub fn run<R>(&self, work: impl FnOnce() -> R + UnwindSafe) -> Option<R> {
        if self.has_crashed() {
            return None;
        }
        match panic::catch_unwind(work) {
            Ok(value) => Some(value),
            Err(payload) => {
                let report = CrashReport {
                    message: panic_message(payload.as_ref()),
                };
                *write_state(&self.state) = BoundaryState::Crashed(report);
                None
            }
        }
    }

    // For work that holds shared handles; the caller asserts that partial
    // mutations are discarded with the crashed surface.
    pub fn run_shared<R>(&self, work: impl FnOnce() -> R) -> Option<R> {
        self.run(AssertUnwindSafe(work))
    }

    pub fn has_crashed(&self) -> bool {
        matches!(*read_state(&self.state), BoundaryState::Crashed(_))
    }

    pub fn crash_report(&self) -> Option<CrashReport> {
        match &*read_state(&self.state) {
            BoundaryState::Operational => None,
            BoundaryState::Crashed(report) => Some(report.clone()),
        }
    }

    pub fn fallback(&self) -> Option<FallbackScreen> {
        self.crash_report().map(|report| FallbackScreen {
            heading: FALLBACK_HEADING,
            message: FALLBACK_MESSAGE,
            contact_line: FALLBACK_CONTACT_LINE,
            detail: report.message,
            actions: [RecoveryAction::Reload, RecoveryAction::GoHome],
        })
    }

    // Clears the fallback and hands the chosen action back to the host,
    // which owns actual navigation.
    pub fn recover(&self, action: RecoveryAction) -> RecoveryAction {
        *write_state(&self.state) = BoundaryState::Operational;
        action
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure".to_string()
    }
}

fn read_state(lock: &RwLock<BoundaryState>) -> std::sync::RwLockReadGuard<'_, BoundaryState> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_state(lock: &RwLock<BoundaryState>) -> std::sync::RwLockWriteGuard<'_, BoundaryState> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_work_passes_its_value_through() {
        let supervisor = Supervisor::new();
        let value = supervisor.run(|| 21 * 2);
        assert_eq!(value, Some(42));
        assert!(!supervisor.has_crashed());
        assert!(supervisor.fallback().is_none());
    }

    #[test]
    fn panicking_work_becomes_a_fallback_with_the_panic_detail() {
        let supervisor = Supervisor::new();
        let value: Option<()> = supervisor.run(|| panic!("render exploded"));
        assert_eq!(value, None);
        assert!(supervisor.has_crashed());

        let fallback = supervisor.fallback().expect("fallback should be shown");
        assert_eq!(fallback.heading, FALLBACK_HEADING);
        assert_eq!(fallback.detail, "render exploded");
        assert_eq!(
            fallback.actions,
            [RecoveryAction::Reload, RecoveryAction::GoHome]
        );
    }

    #[test]
    fn crashed_boundary_skips_further_work_until_recovered() {
        let supervisor = Supervisor::new();
        let _: Option<()> = supervisor.run(|| panic!("first failure"));

        let skipped = supervisor.run(|| "should not run");
        assert_eq!(skipped, None);

        let action = supervisor.recover(RecoveryAction::Reload);
        assert_eq!(action, RecoveryAction::Reload);
        assert!(!supervisor.has_crashed());
        assert_eq!(supervisor.run(|| "back in service"), Some("back in service"));
    }

    #[test]
    fn formatted_panic_payloads_are_captured() {
        let supervisor = Supervisor::new();
        let code = 503;
        let _: Option<()> = supervisor.run_shared(|| panic!("upstream said {code}"));
        let report = supervisor.crash_report().expect("report should exist");
        assert_eq!(report.message, "upstream said 503");
    }
}

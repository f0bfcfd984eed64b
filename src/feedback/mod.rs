use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures_timer::Delay;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ToastId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

pub const TOAST_AUTO_CLOSE_MS: u32 = 4_000;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastEntry {
    pub id: Option<ToastId>,
    pub title: Cow<'static, str>,
    pub message: Cow<'static, str>,
    pub kind: ToastKind,
    pub position: ToastPosition,
    pub auto_close_ms: Option<u32>,
    pub closable: bool,
}

impl ToastEntry {
    pub fn new(title: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: None,
            title: title.into(),
            message: message.into(),
            kind: ToastKind::Info,
            position: ToastPosition::TopRight,
            auto_close_ms: Some(TOAST_AUTO_CLOSE_MS),
            closable: true,
        }
    }

    pub fn kind(mut self, value: ToastKind) -> Self {
        self.kind = value;
        self
    }

    pub fn position(mut self, value: ToastPosition) -> Self {
        self.position = value;
        self
    }

    pub fn auto_close_ms(mut self, value: Option<u32>) -> Self {
        self.auto_close_ms = value;
        self
    }

    pub fn closable(mut self, value: bool) -> Self {
        self.closable = value;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastViewport {
    pub position: ToastPosition,
    pub max_visible: usize,
}

impl ToastViewport {
    pub fn new(position: ToastPosition) -> Self {
        Self {
            position,
            max_visible: 5,
        }
    }

    pub fn max_visible(mut self, value: usize) -> Self {
        self.max_visible = value.max(1);
        self
    }
}

#[derive(Default)]
struct ToastState {
    queues: BTreeMap<ToastPosition, VecDeque<ToastEntry>>,
    max_visible: BTreeMap<ToastPosition, usize>,
}

#[derive(Clone, Default)]
pub struct ToastManager {
    next_id: Arc<AtomicU64>,
    state: Arc<RwLock<ToastState>>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure_viewport(&self, viewport: ToastViewport) {
        self.state
            .write()
            .expect("toast state poisoned")
            .max_visible
            .insert(viewport.position, viewport.max_visible);
    }

    pub fn show(&self, mut entry: ToastEntry) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        entry.id = Some(id);

        let mut state = self.state.write().expect("toast state poisoned");
        let limit = *state.max_visible.get(&entry.position).unwrap_or(&5);
        let queue = state.queues.entry(entry.position).or_default();
        queue.push_back(entry);

        while queue.len() > limit {
            queue.pop_front();
        }
        id
    }

    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut state = self.state.write().expect("toast state poisoned");
        for queue in state.queues.values_mut() {
            if let Some(index) = queue.iter().position(|entry| entry.id == Some(id)) {
                queue.remove(index);
                return true;
            }
        }
        false
    }

    pub fn dismiss_all(&self) {
        for queue in self
            .state
            .write()
            .expect("toast state poisoned")
            .queues
            .values_mut()
        {
            queue.clear();
        }
    }

    // Drives the entry's auto-close metadata; hosts without their own
    // timer can await this after `show`.
    pub async fn dismiss_after(&self, id: ToastId, duration: Duration) -> bool {
        Delay::new(duration).await;
        self.dismiss(id)
    }

    pub fn list(&self, position: ToastPosition) -> Vec<ToastEntry> {
        self.state
            .read()
            .expect("toast state poisoned")
            .queues
            .get(&position)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn toast_manager_enforces_position_limit() {
        let manager = ToastManager::new();
        manager.configure_viewport(ToastViewport::new(ToastPosition::TopRight).max_visible(2));
        manager.show(ToastEntry::new("a", "1"));
        manager.show(ToastEntry::new("b", "2"));
        manager.show(ToastEntry::new("c", "3"));

        let top_right = manager.list(ToastPosition::TopRight);
        assert_eq!(top_right.len(), 2);
        assert_eq!(top_right[0].title, "b");
        assert_eq!(top_right[1].title, "c");
    }

    #[test]
    fn dismiss_after_expires_the_toast() {
        let manager = ToastManager::new();
        let id = manager.show(
            ToastEntry::new("sent", "on its way").kind(ToastKind::Success),
        );
        assert_eq!(manager.list(ToastPosition::TopRight).len(), 1);

        let dismissed = block_on(manager.dismiss_after(id, Duration::from_millis(5)));
        assert!(dismissed);
        assert!(manager.list(ToastPosition::TopRight).is_empty());
    }

    #[test]
    fn dismissing_unknown_toast_is_a_no_op() {
        let manager = ToastManager::new();
        assert!(!manager.dismiss(ToastId(42)));
    }
}

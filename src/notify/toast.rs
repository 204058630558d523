//! Toast Lifecycle
//!
//! A toast is shown as soon as it is created, fades out when dismissed
//! (automatically after its delay, or by the user) and is removed from the
//! page once the fade has finished.

use std::fmt;
use std::time::{Duration, Instant};

/// Bootstrap contextual color of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    #[default]
    Info,
    Light,
    Dark,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Primary => "primary",
            Severity::Secondary => "secondary",
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Light => "light",
            Severity::Dark => "dark",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primary" => Ok(Severity::Primary),
            "secondary" => Ok(Severity::Secondary),
            "success" => Ok(Severity::Success),
            "danger" | "error" => Ok(Severity::Danger),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "light" => Ok(Severity::Light),
            "dark" => Ok(Severity::Dark),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// Element id of a toast on the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToastId(String);

impl ToastId {
    fn generate() -> Self {
        Self(format!("toast-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a toast hides itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDismiss {
    /// Stays until the user closes it
    Never,
    /// Hides after the given delay
    After(Duration),
}

/// Where a toast is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Shown,
    /// Fading out since the given instant
    Hiding(Instant),
    Removed,
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
    pub shown_at: Instant,
    pub auto_dismiss: AutoDismiss,
}

impl Toast {
    /// Create a toast that is shown immediately
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: ToastId::generate(),
            message: message.into(),
            severity,
            phase: ToastPhase::Shown,
            shown_at: Instant::now(),
            auto_dismiss: AutoDismiss::After(ToastTiming::default().delay),
        }
    }

    pub fn auto_dismiss(mut self, auto_dismiss: AutoDismiss) -> Self {
        self.auto_dismiss = auto_dismiss;
        self
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, ToastPhase::Removed)
    }

    /// Start the fade. Dismissing twice keeps the first fade start.
    pub fn dismiss(&mut self, now: Instant) {
        if self.phase == ToastPhase::Shown {
            self.phase = ToastPhase::Hiding(now);
        }
    }

    /// Advance the lifecycle to `now`
    pub fn advance(&mut self, now: Instant, fade: Duration) {
        if self.phase == ToastPhase::Shown {
            if let AutoDismiss::After(delay) = self.auto_dismiss {
                let deadline = self.shown_at + delay;
                if now >= deadline {
                    self.phase = ToastPhase::Hiding(deadline);
                }
            }
        }

        if let ToastPhase::Hiding(since) = self.phase {
            if now >= since + fade {
                self.phase = ToastPhase::Removed;
            }
        }
    }
}

/// Timing shared by every toast on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    /// Time a toast stays fully visible
    pub delay: Duration,
    /// Length of the hide animation
    pub fade: Duration,
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(5000),
            fade: Duration::from_millis(150),
        }
    }
}

/// Stacked toasts, newest last. No deduplication.
#[derive(Debug, Default)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    timing: ToastTiming,
}

impl ToastStack {
    pub fn new(timing: ToastTiming) -> Self {
        Self {
            toasts: Vec::new(),
            timing,
        }
    }

    pub fn timing(&self) -> ToastTiming {
        self.timing
    }

    /// Add a toast, applying the stack delay unless it never dismisses
    pub fn push(&mut self, mut toast: Toast) -> ToastId {
        if let AutoDismiss::After(_) = toast.auto_dismiss {
            toast.auto_dismiss = AutoDismiss::After(self.timing.delay);
        }
        let id = toast.id.clone();
        tracing::debug!(toast = %id, severity = %toast.severity, "Toast shown");
        self.toasts.push(toast);
        id
    }

    /// User-initiated close. Returns false for unknown ids.
    pub fn dismiss(&mut self, id: &ToastId, now: Instant) -> bool {
        match self.toasts.iter_mut().find(|t| &t.id == id) {
            Some(toast) => {
                toast.dismiss(now);
                true
            }
            None => false,
        }
    }

    /// Advance every toast and drop the ones whose fade has completed
    pub fn tick(&mut self, now: Instant) {
        let fade = self.timing.fade;
        for toast in &mut self.toasts {
            toast.advance(now, fade);
        }
        self.toasts.retain(|t| {
            if t.is_visible() {
                true
            } else {
                tracing::debug!(toast = %t.id, "Toast removed");
                false
            }
        });
    }

    pub fn get(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| &t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

//! Transient notifications ("toasts").
//!
//! Pages hold a cloneable `Toaster` and push messages into it; the shell owns
//! the single `ToastHost`, drains it every tick and renders what is still
//! visible.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;

/// Success toasts stay up for 2 seconds
const SUCCESS_TOAST_MS: i64 = 2000;

/// Error toasts stay up for 4 seconds
const ERROR_TOAST_MS: i64 = 4000;

const INFO_TOAST_MS: i64 = 3000;

/// Upper bound on simultaneously visible toasts; the oldest is dropped first
const MAX_VISIBLE_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn lifetime(&self) -> Duration {
        Duration::milliseconds(match self {
            ToastKind::Success => SUCCESS_TOAST_MS,
            ToastKind::Error => ERROR_TOAST_MS,
            ToastKind::Info => INFO_TOAST_MS,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + self.kind.lifetime()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Handle used to raise notifications from anywhere
#[derive(Debug, Clone)]
pub struct Toaster {
    tx: mpsc::UnboundedSender<Toast>,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        // Host gone means the shell is shutting down; nothing to show
        let _ = self.tx.send(Toast {
            kind,
            message,
            created_at: Utc::now(),
        });
    }
}

/// The single notification surface mounted by the shell
#[derive(Debug)]
pub struct ToastHost {
    rx: mpsc::UnboundedReceiver<Toast>,
    visible: Vec<Toast>,
}

impl ToastHost {
    /// Create the host and the first handle pointing at it
    pub fn new() -> (Self, Toaster) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                rx,
                visible: Vec::new(),
            },
            Toaster { tx },
        )
    }

    /// Take newly raised toasts and drop the expired ones
    pub fn poll(&mut self, now: DateTime<Utc>) {
        while let Ok(toast) = self.rx.try_recv() {
            self.visible.push(toast);
        }
        self.visible.retain(|t| !t.is_expired(now));
        if self.visible.len() > MAX_VISIBLE_TOASTS {
            let excess = self.visible.len() - MAX_VISIBLE_TOASTS;
            self.visible.drain(..excess);
        }
    }

    pub fn visible(&self) -> &[Toast] {
        &self.visible
    }
}

//! Toast notifications rendered through the view tree.

use std::time::Duration;

use crate::view::{Element, Node};

/// Flash alerts close themselves after this long.
pub const ALERT_AUTO_DISMISS: Duration = Duration::from_secs(5);

/// Element id of the toast container.
pub const CONTAINER_ID: &str = "toast-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl ToastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastLevel::Info => "info",
            ToastLevel::Success => "success",
            ToastLevel::Warning => "warning",
            ToastLevel::Danger => "danger",
        }
    }
}

impl std::str::FromStr for ToastLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(ToastLevel::Info),
            "success" => Ok(ToastLevel::Success),
            "warning" => Ok(ToastLevel::Warning),
            "danger" | "error" => Ok(ToastLevel::Danger),
            other => Err(format!("unknown toast level '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self { message: message.into(), level }
    }

    pub fn to_node(&self) -> Node {
        Element::new("div")
            .class("toast align-items-center text-white border-0")
            .class(&format!("bg-{}", self.level.as_str()))
            .attr("role", "alert")
            .child(
                Element::new("div")
                    .class("d-flex")
                    .child(Element::new("div").class("toast-body").text(self.message.clone()))
                    .child(
                        Element::new("button")
                            .class("btn-close btn-close-white me-2 m-auto")
                            .attr("type", "button")
                            .attr("data-bs-dismiss", "toast"),
                    ),
            )
            .into()
    }
}

/// Visible toasts in display order. A toast is removed once it has been hidden.
#[derive(Debug, Default)]
pub struct ToastStack {
    next_id: u64,
    toasts: Vec<(u64, Toast)>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, toast: Toast) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push((id, toast));
        id
    }

    /// Drop a hidden toast. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|(toast_id, _)| *toast_id != id);
        self.toasts.len() != before
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn to_node(&self) -> Node {
        Element::new("div")
            .class("toast-container position-fixed top-0 end-0 p-3")
            .attr("id", CONTAINER_ID)
            .children(self.toasts.iter().map(|(_, toast)| toast.to_node()))
            .into()
    }
}

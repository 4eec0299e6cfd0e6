//! # Push Notification Contract
//!
//! Pass-through types for host-dispatched push events and notification
//! clicks. The service relays payloads to the host for display; the only
//! logic here is defaulting an empty event and routing the two named
//! actions.

use serde::{Deserialize, Serialize};

/// Identifier of a notification action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionId {
    /// Open the site root in a new or focused window.
    Explore,
    /// Dismiss the notification.
    Close,
}

/// Named action attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: ActionId,
    pub title: String,
    pub icon: String,
}

/// Notification content relayed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Vibration pattern as millisecond durations.
    pub vibrate: Vec<u64>,
    pub actions: Vec<NotificationAction>,
}

impl PushPayload {
    /// Build the notification for a push event, falling back to the
    /// configured body when the event carries no data.
    pub fn from_message(message: Option<&str>, defaults: &PushDefaults) -> Self {
        Self {
            title: defaults.title.clone(),
            body: message.unwrap_or(&defaults.body).to_owned(),
            icon: defaults.icon.clone(),
            badge: defaults.badge.clone(),
            vibrate: defaults.vibrate.clone(),
            actions: vec![
                NotificationAction {
                    action: ActionId::Explore,
                    title: defaults.explore_title.clone(),
                    icon: defaults.icon.clone(),
                },
                NotificationAction {
                    action: ActionId::Close,
                    title: defaults.close_title.clone(),
                    icon: defaults.icon.clone(),
                },
            ],
        }
    }
}

/// Defaults applied when building a notification.
#[derive(Debug, Clone)]
pub struct PushDefaults {
    pub title: String,
    /// Body used when the push event carries no data.
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u64>,
    pub explore_title: String,
    pub close_title: String,
    /// URL opened by the explore action.
    pub root_url: String,
}

impl Default for PushDefaults {
    fn default() -> Self {
        Self {
            title: "Site update".to_owned(),
            body: "New content is available.".to_owned(),
            icon: "/icon-192x192.png".to_owned(),
            badge: "/badge-72x72.png".to_owned(),
            vibrate: vec![100, 50, 100],
            explore_title: "View".to_owned(),
            close_title: "Dismiss".to_owned(),
            root_url: "/".to_owned(),
        }
    }
}

/// Outcome of a notification click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Open the given URL in a new or focused window.
    OpenWindow(String),
    /// Close the notification and do nothing else.
    Dismiss,
}

/// Route a notification click. Clicks outside a named action dismiss.
pub fn click_outcome(action: Option<ActionId>, defaults: &PushDefaults) -> ClickOutcome {
    match action {
        Some(ActionId::Explore) => ClickOutcome::OpenWindow(defaults.root_url.clone()),
        Some(ActionId::Close) | None => ClickOutcome::Dismiss,
    }
}

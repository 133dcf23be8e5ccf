pub mod bookmarks;
pub mod chat;
pub mod controller;
pub mod gateway;
pub mod reminders;
pub mod tasks;
pub mod topology;

use tracing::{debug, info, warn};

use crate::core::activity::ActivityLog;
use crate::core::clock::ClockTicker;
use crate::core::error::{DashResult, DashboardError};
use crate::core::models::{
    Bookmark, ChatMessage, GatewayStatus, Reminder, Task, TopologySnapshot, TunnelStatus,
};
use crate::core::tabs::{RefreshTicket, Tab, TabController};

use bookmarks::BookmarkManager;
use chat::ChatManager;
use gateway::GatewayView;
use reminders::ReminderManager;
use tasks::TaskView;
use topology::TopologyEngine;

/// Logical canvas the topology layout is computed in; the TUI scales it to
/// whatever area it has.
pub const TOPOLOGY_CANVAS: (f64, f64) = (200.0, 100.0);

/// Results flowing back from spawned request tasks.
#[derive(Debug)]
pub enum DashboardEvent {
    Gateway {
        ticket: RefreshTicket,
        health: DashResult<GatewayStatus>,
        tunnel: DashResult<TunnelStatus>,
    },
    Bookmarks {
        ticket: RefreshTicket,
        result: DashResult<Vec<Bookmark>>,
    },
    Tasks {
        ticket: RefreshTicket,
        result: DashResult<Vec<Task>>,
    },
    Schedule {
        ticket: RefreshTicket,
        result: DashResult<Vec<Reminder>>,
    },
    Chat {
        ticket: RefreshTicket,
        result: DashResult<Vec<ChatMessage>>,
    },
    Topology {
        ticket: RefreshTicket,
        result: DashResult<TopologySnapshot>,
    },
    /// `record` names the optimistic record the backend just accepted.
    MutationSucceeded {
        domain: Tab,
        action: String,
        record: Option<String>,
    },
    /// `rollback` names the optimistic record to withdraw, if any.
    MutationFailed {
        domain: Tab,
        action: String,
        error: DashboardError,
        rollback: Option<String>,
    },
    Reply(ChatMessage),
}

/// Work the controller must start after an event has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Resync(Tab),
}

/// All client-side state of one dashboard session.
pub struct Dashboard {
    pub tabs: TabController,
    pub activity: ActivityLog,
    pub clock: ClockTicker,
    pub gateway: GatewayView,
    pub bookmarks: BookmarkManager,
    pub tasks: TaskView,
    pub reminders: ReminderManager,
    pub chat: ChatManager,
    pub topology: TopologyEngine,
    alert: Option<String>,
}

impl Dashboard {
    pub fn new(initial_tab: Tab, activity: ActivityLog) -> Self {
        Self {
            tabs: TabController::new(initial_tab),
            activity,
            clock: ClockTicker::new(),
            gateway: GatewayView::new(),
            bookmarks: BookmarkManager::new(),
            tasks: TaskView::new(),
            reminders: ReminderManager::new(),
            chat: ChatManager::new(),
            topology: TopologyEngine::new(TOPOLOGY_CANVAS.0, TOPOLOGY_CANVAS.1),
            alert: None,
        }
    }

    /// Blocking user-facing message (mutation failures only).
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn raise_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn accept(&self, ticket: RefreshTicket) -> bool {
        if self.tabs.is_current(ticket) {
            return true;
        }
        debug!(
            "Discarding stale {} response (generation {})",
            ticket.tab, ticket.generation
        );
        false
    }

    /// Apply one event. Read failures have already been logged by the API
    /// client and leave the cached state untouched; mutation failures also
    /// raise an alert.
    pub fn apply(&mut self, event: DashboardEvent) -> Option<FollowUp> {
        match event {
            DashboardEvent::Gateway {
                ticket,
                health,
                tunnel,
            } => {
                if self.accept(ticket) {
                    self.gateway.apply(health, tunnel);
                }
            }
            DashboardEvent::Bookmarks { ticket, result } => {
                if self.accept(ticket)
                    && let Ok(items) = result
                {
                    self.bookmarks.apply_list(items);
                }
            }
            DashboardEvent::Tasks { ticket, result } => {
                if self.accept(ticket)
                    && let Ok(items) = result
                {
                    self.tasks.apply_list(items);
                }
            }
            DashboardEvent::Schedule { ticket, result } => {
                if self.accept(ticket)
                    && let Ok(items) = result
                {
                    self.reminders.apply_list(items);
                }
            }
            DashboardEvent::Chat { ticket, result } => {
                if self.accept(ticket)
                    && let Ok(items) = result
                {
                    self.chat.apply_list(items);
                }
            }
            DashboardEvent::Topology { ticket, result } => {
                if !self.accept(ticket) {
                    return None;
                }
                match result {
                    Ok(snapshot) => self.topology.apply_snapshot(snapshot),
                    Err(e) => warn!("Keeping previous topology layout: {}", e),
                }
            }
            DashboardEvent::MutationSucceeded {
                domain,
                action,
                record,
            } => {
                info!("{} succeeded", action);
                if let Some(key) = record {
                    let settled = match domain {
                        Tab::Schedule => self.reminders.settle(&key),
                        Tab::Chat => self.chat.settle(&key),
                        _ => false,
                    };
                    if settled {
                        debug!("Persisted optimistic {} record {}", domain, key);
                    }
                }
                self.activity.success(action);
                if matches!(domain, Tab::Bookmarks | Tab::Schedule) {
                    return Some(FollowUp::Resync(domain));
                }
            }
            DashboardEvent::MutationFailed {
                domain,
                action,
                error,
                rollback,
            } => {
                if let Some(key) = rollback {
                    let removed = match domain {
                        Tab::Schedule => self.reminders.rollback(&key),
                        Tab::Chat => self.chat.rollback(&key),
                        _ => false,
                    };
                    if removed {
                        debug!("Rolled back optimistic {} record {}", domain, key);
                    }
                }
                self.raise_alert(format!("{} failed: {}", action, error));
            }
            DashboardEvent::Reply(message) => {
                self.chat.append_reply(message);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests;

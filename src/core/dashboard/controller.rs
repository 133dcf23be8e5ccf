use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::bookmarks::{BookmarkDraft, ConfirmedDelete};
use super::chat::ReplyGenerator;
use super::reminders::ReminderDraft;
use super::{Dashboard, DashboardEvent, FollowUp};
use crate::core::api::ApiClient;
use crate::core::error::DashResult;
use crate::core::store::Record;
use crate::core::tabs::{RefreshTicket, Tab};

/// Drives a [`Dashboard`]: issues requests as spawned tasks and applies
/// their results, one event at a time, on the caller's task.
///
/// No in-flight request is cancelled when the view changes; stale results
/// are dropped by ticket when they arrive.
pub struct DashboardController {
    dashboard: Dashboard,
    api: ApiClient,
    replies: Arc<dyn ReplyGenerator>,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl DashboardController {
    pub fn new(dashboard: Dashboard, api: ApiClient, replies: Arc<dyn ReplyGenerator>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            dashboard,
            api,
            replies,
            events_tx,
            events_rx,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Load the initial tab.
    pub fn start(&mut self) {
        let tab = self.dashboard.tabs.active();
        info!("Dashboard starting on tab {}", tab);
        self.switch_tab(tab);
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.dashboard.tabs.active() == Tab::Topology && tab != Tab::Topology {
            self.dashboard.topology.leave();
        }
        let ticket = self.dashboard.tabs.switch_tab(tab);
        self.spawn_fetch(ticket, false);
    }

    pub fn next_tab(&mut self) {
        let tab = self.dashboard.tabs.active().next();
        self.switch_tab(tab);
    }

    pub fn previous_tab(&mut self) {
        let tab = self.dashboard.tabs.active().previous();
        self.switch_tab(tab);
    }

    /// Re-fetch the active tab without switching.
    pub fn refresh_active(&mut self) {
        let tab = self.dashboard.tabs.active();
        let ticket = self.dashboard.tabs.issue(tab);
        self.spawn_fetch(ticket, false);
    }

    /// Ask the backend to rescan the topology, then redraw.
    pub fn rescan_topology(&mut self) {
        let ticket = self.dashboard.tabs.issue(Tab::Topology);
        self.dashboard.activity.info("Topology rescan requested");
        self.spawn_fetch(ticket, true);
    }

    fn spawn_fetch(&self, ticket: RefreshTicket, rescan: bool) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = fetch(&api, ticket, rescan).await;
            let _ = tx.send(event);
        });
    }

    /// Validate locally, then persist; the bookmark list is reloaded once the
    /// backend acknowledges.
    pub fn create_bookmark(&mut self, draft: BookmarkDraft) -> DashResult<()> {
        draft.validate()?;
        let action = format!("Add bookmark '{}'", draft.title);
        self.dashboard.activity.info(format!("Saving bookmark '{}'", draft.title));
        let api = self.api.clone();
        self.spawn_mutation(Tab::Bookmarks, action, None, async move {
            api.create_bookmark(&draft).await
        });
        Ok(())
    }

    pub fn update_bookmark(&mut self, id: i64, draft: BookmarkDraft) -> DashResult<()> {
        draft.validate()?;
        let action = format!("Update bookmark '{}'", draft.title);
        let api = self.api.clone();
        self.spawn_mutation(Tab::Bookmarks, action, None, async move {
            api.update_bookmark(id, &draft).await
        });
        Ok(())
    }

    pub fn delete_bookmark(&mut self, confirmed: ConfirmedDelete) {
        let action = format!("Delete bookmark #{}", confirmed.id());
        let api = self.api.clone();
        self.spawn_mutation(Tab::Bookmarks, action, None, async move {
            api.delete_bookmark(&confirmed).await
        });
    }

    /// Optimistic append, persist, then reload. A failed persist rolls the
    /// local record back.
    pub fn create_reminder(&mut self, draft: ReminderDraft) -> DashResult<()> {
        let reminder = self.dashboard.reminders.stage_create(draft)?;
        let action = format!("Add reminder '{}'", reminder.title);
        let key = reminder.key();
        let api = self.api.clone();
        self.spawn_mutation(Tab::Schedule, action, Some(key), async move {
            api.create_reminder(&reminder).await
        });
        Ok(())
    }

    /// Append the user message, persist it in the background and, on an
    /// independent path, ask the reply generator for an answer.
    pub fn send_chat(&mut self, text: &str) -> DashResult<()> {
        let message = self.dashboard.chat.stage_send(text)?;
        let key = message.key();

        let api = self.api.clone();
        let persisted = message.clone();
        self.spawn_mutation(Tab::Chat, "Send message".to_string(), Some(key), async move {
            api.post_chat(&persisted).await
        });

        let replies = self.replies.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match replies.reply(&message).await {
                Ok(Some(reply)) => {
                    let _ = tx.send(DashboardEvent::Reply(reply));
                }
                Ok(None) => {}
                Err(e) => warn!("Reply generation failed: {}", e),
            }
        });
        Ok(())
    }

    fn spawn_mutation<F>(&self, domain: Tab, action: String, record: Option<String>, fut: F)
    where
        F: Future<Output = DashResult<()>> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match fut.await {
                Ok(()) => DashboardEvent::MutationSucceeded {
                    domain,
                    action,
                    record,
                },
                Err(error) => DashboardEvent::MutationFailed {
                    domain,
                    action,
                    error,
                    rollback: record,
                },
            };
            let _ = tx.send(event);
        });
    }

    pub fn handle_event(&mut self, event: DashboardEvent) {
        if let Some(FollowUp::Resync(tab)) = self.dashboard.apply(event) {
            let ticket = self.dashboard.tabs.issue(tab);
            self.spawn_fetch(ticket, false);
        }
    }

    /// Apply every event that has already arrived. Returns how many.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait up to `timeout` for the next event and apply it.
    pub async fn process_next(&mut self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.events_rx.recv()).await {
            Ok(Some(event)) => {
                self.handle_event(event);
                true
            }
            _ => false,
        }
    }
}

async fn fetch(api: &ApiClient, ticket: RefreshTicket, rescan: bool) -> DashboardEvent {
    match ticket.tab {
        Tab::Gateway => {
            let (health, tunnel) = tokio::join!(api.health(), api.tunnel_status());
            DashboardEvent::Gateway {
                ticket,
                health,
                tunnel,
            }
        }
        Tab::Bookmarks => DashboardEvent::Bookmarks {
            ticket,
            result: api.list_bookmarks().await,
        },
        Tab::Tasks => DashboardEvent::Tasks {
            ticket,
            result: api.list_tasks().await,
        },
        Tab::Schedule => DashboardEvent::Schedule {
            ticket,
            result: api.list_schedule().await,
        },
        Tab::Chat => DashboardEvent::Chat {
            ticket,
            result: api.chat_history().await,
        },
        Tab::Topology => DashboardEvent::Topology {
            ticket,
            result: if rescan {
                api.refresh_topology().await
            } else {
                api.topology().await
            },
        },
    }
}

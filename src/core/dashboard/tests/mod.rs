mod mock_backend;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::Dashboard;
use super::chat::ReplyGenerator;
use super::controller::DashboardController;
use crate::core::activity::ActivityLog;
use crate::core::api::ApiClient;
use crate::core::error::DashResult;
use crate::core::models::ChatMessage;
use crate::core::tabs::Tab;
use mock_backend::MockBackend;

/// Answers immediately with a fixed text.
struct InstantReply;

#[async_trait]
impl ReplyGenerator for InstantReply {
    async fn reply(&self, message: &ChatMessage) -> DashResult<Option<ChatMessage>> {
        Ok(Some(ChatMessage::assistant(format!("echo: {}", message.message))))
    }
}

fn controller_for(backend: &MockBackend, tab: Tab) -> DashboardController {
    let activity = ActivityLog::new();
    let api = ApiClient::new(&backend.base_url, Duration::from_secs(5), activity.clone()).unwrap();
    DashboardController::new(Dashboard::new(tab, activity), api, Arc::new(InstantReply))
}

/// Apply events until the channel has been quiet for a while.
async fn settle(ctl: &mut DashboardController) {
    while ctl.process_next(Duration::from_millis(300)).await {}
}

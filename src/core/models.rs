//! Wire records exchanged with the dashboard backend.
//!
//! Every collection endpoint returns a bare JSON array; fields the backend
//! may omit carry serde defaults.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::store::Record;

fn default_folder() -> String {
    "General".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Comma-separated.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub created: String,
}

impl Bookmark {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Record for Bookmark {
    fn key(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Pending,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Running,
        TaskStatus::Pending,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub created: String,
}

impl Record for Task {
    fn key(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReminderKind {
    #[default]
    #[serde(rename = "one-time", alias = "once")]
    OneTime,
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 3] = [
        ReminderKind::OneTime,
        ReminderKind::Daily,
        ReminderKind::Weekly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReminderKind::OneTime => "one-time",
            ReminderKind::Daily => "daily",
            ReminderKind::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one-time" | "once" | "" => Some(ReminderKind::OneTime),
            "daily" => Some(ReminderKind::Daily),
            "weekly" => Some(ReminderKind::Weekly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(rename = "type", default)]
    pub kind: ReminderKind,
}

impl Record for Reminder {
    fn key(&self) -> String {
        self.id.clone()
    }

    /// Backends that drop client ids echo the reminder's content instead.
    fn same_record(&self, fetched: &Self) -> bool {
        if fetched.id.is_empty() {
            self.title == fetched.title && self.date == fetched.date && self.kind == fetched.kind
        } else {
            self.id == fetched.id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    pub role: ChatRole,
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
}

impl ChatMessage {
    fn now(role: ChatRole, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            message: message.into(),
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::now(ChatRole::User, message)
    }

    pub fn assistant(message: impl Into<String>) -> Self {
        Self::now(ChatRole::Assistant, message)
    }
}

impl Record for ChatMessage {
    fn key(&self) -> String {
        if self.id.is_empty() {
            let role = match self.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            format!("{}|{}|{}", role, self.timestamp, self.message)
        } else {
            self.id.clone()
        }
    }

    /// The backend may drop the client id and restamp the time of a posted
    /// message, so an id-less copy matches on role and text.
    fn same_record(&self, fetched: &Self) -> bool {
        if fetched.id.is_empty() {
            self.role == fetched.role && self.message == fetched.message
        } else {
            self.id == fetched.id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyCategory {
    Skills,
    Channels,
    Providers,
    Tools,
}

impl TopologyCategory {
    /// Declared order; each category owns the sector at its index.
    pub const ALL: [TopologyCategory; 4] = [
        TopologyCategory::Skills,
        TopologyCategory::Channels,
        TopologyCategory::Providers,
        TopologyCategory::Tools,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TopologyCategory::Skills => "skills",
            TopologyCategory::Channels => "channels",
            TopologyCategory::Providers => "providers",
            TopologyCategory::Tools => "tools",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TopologyNode {
    /// Tooltip text: the description when present, otherwise the status.
    pub fn detail(&self) -> &str {
        self.description
            .as_deref()
            .or(self.status.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    #[serde(default)]
    pub skills: Vec<TopologyNode>,
    #[serde(default)]
    pub channels: Vec<TopologyNode>,
    #[serde(default)]
    pub providers: Vec<TopologyNode>,
    #[serde(default)]
    pub tools: Vec<TopologyNode>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl TopologySnapshot {
    pub fn category(&self, category: TopologyCategory) -> &[TopologyNode] {
        match category {
            TopologyCategory::Skills => &self.skills,
            TopologyCategory::Channels => &self.channels,
            TopologyCategory::Providers => &self.providers,
            TopologyCategory::Tools => &self.tools,
        }
    }

    pub fn node_count(&self) -> usize {
        TopologyCategory::ALL
            .iter()
            .map(|c| self.category(*c).len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TunnelStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tunnel_id: Option<String>,
    /// Seconds since the tunnel process started.
    #[serde(default)]
    pub uptime: Option<u64>,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TunnelStatus {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Parse the loosely formatted date/timestamp strings the backend stores.
/// Accepts ISO datetimes with or without seconds/fractions and bare dates.
pub fn parse_loose_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Chronological ordering for stored date strings. Parseable values sort
/// before unparseable ones; ties and unparseable values fall back to text.
pub fn cmp_loose_datetime(a: &str, b: &str) -> Ordering {
    match (parse_loose_datetime(a), parse_loose_datetime(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

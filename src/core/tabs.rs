use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The six dashboard domains, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Gateway,
    Bookmarks,
    Tasks,
    Schedule,
    Chat,
    Topology,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Gateway,
        Tab::Bookmarks,
        Tab::Tasks,
        Tab::Schedule,
        Tab::Chat,
        Tab::Topology,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Gateway => "gateway",
            Tab::Bookmarks => "bookmarks",
            Tab::Tasks => "tasks",
            Tab::Schedule => "schedule",
            Tab::Chat => "chat",
            Tab::Topology => "topology",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Gateway => "Gateway",
            Tab::Bookmarks => "Bookmarks",
            Tab::Tasks => "Tasks",
            Tab::Schedule => "Schedule",
            Tab::Chat => "Chat",
            Tab::Topology => "Topology",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tab::ALL
            .iter()
            .copied()
            .find(|t| t.id() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown tab '{}' (expected one of: gateway, bookmarks, tasks, schedule, chat, topology)",
                    s
                )
            })
    }
}

/// Tag attached to every refresh request. Only the most recently issued
/// ticket of a domain is current; responses carrying older tickets are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub tab: Tab,
    pub generation: u64,
}

pub struct TabController {
    active: Tab,
    generation: u64,
    latest: [u64; 6],
}

impl TabController {
    pub fn new(initial: Tab) -> Self {
        Self {
            active: initial,
            generation: 0,
            latest: [0; 6],
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn is_active(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Activate `tab` and hand back a refresh ticket for it. The refresh is
    /// unconditional: re-selecting the active tab, or a tab whose data is
    /// already loaded, still issues a new ticket.
    pub fn switch_tab(&mut self, tab: Tab) -> RefreshTicket {
        if self.active != tab {
            debug!("Deactivating tab {} in favour of {}", self.active, tab);
        }
        self.active = tab;
        self.issue(tab)
    }

    pub fn next(&mut self) -> RefreshTicket {
        self.switch_tab(self.active.next())
    }

    pub fn previous(&mut self) -> RefreshTicket {
        self.switch_tab(self.active.previous())
    }

    /// Issue a ticket without changing the active tab (periodic refreshes and
    /// post-mutation resyncs).
    pub fn issue(&mut self, tab: Tab) -> RefreshTicket {
        self.generation += 1;
        self.latest[tab.index()] = self.generation;
        RefreshTicket {
            tab,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.latest[ticket.tab.index()] == ticket.generation
    }
}

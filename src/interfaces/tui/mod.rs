mod events;
mod forms;
mod ui;

use std::time::{Duration, Instant};

use crate::core::dashboard::bookmarks::PendingDelete;
use crate::core::dashboard::controller::DashboardController;

use forms::FormState;

/// What keystrokes currently go to.
enum InputMode {
    Normal,
    Search,
    Chat,
    Form(FormState),
    ConfirmDelete(PendingDelete),
}

pub struct DashboardTui {
    controller: DashboardController,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,

    mode: InputMode,
    input_buffer: String,
    cursor_pos: usize,
    bookmark_selected: usize,
    chat_scroll: u16,
    should_quit: bool,
}

impl DashboardTui {
    pub fn new(controller: DashboardController, refresh_interval: Option<Duration>) -> Self {
        Self {
            controller,
            refresh_interval,
            last_refresh: Instant::now(),
            mode: InputMode::Normal,
            input_buffer: String::new(),
            cursor_pos: 0,
            bookmark_selected: 0,
            chat_scroll: u16::MAX,
            should_quit: false,
        }
    }

    fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_pos = 0;
    }

    fn scroll_to_bottom(&mut self) {
        // Clamped during render
        self.chat_scroll = u16::MAX;
    }

    /// Keep the bookmark cursor inside the filtered list.
    fn clamp_selection(&mut self) {
        let visible = self.controller.dashboard().bookmarks.visible().len();
        if visible == 0 {
            self.bookmark_selected = 0;
        } else if self.bookmark_selected >= visible {
            self.bookmark_selected = visible - 1;
        }
    }

    fn selected_bookmark_id(&self) -> Option<i64> {
        self.controller
            .dashboard()
            .bookmarks
            .visible()
            .get(self.bookmark_selected)
            .map(|bm| bm.id)
    }

    /// Periodic refresh of whatever tab is showing.
    fn refresh_if_due(&mut self) {
        let Some(interval) = self.refresh_interval else {
            return;
        };
        if self.last_refresh.elapsed() >= interval {
            self.last_refresh = Instant::now();
            self.controller.refresh_active();
        }
    }
}

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend};
use std::{io, time::Duration};
use tracing::info;

use super::forms::{FormKind, FormState};
use super::{DashboardTui, InputMode};
use crate::core::tabs::Tab;
use crate::platform::{NativePlatform, Platform};

impl DashboardTui {
    pub async fn run_tui(&mut self) -> Result<()> {
        self.controller.start();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        <B as Backend>::Error: std::error::Error + Send + Sync + 'static,
    {
        loop {
            if self.should_quit {
                info!("Dashboard closing");
                return Ok(());
            }

            if self.controller.drain_events() > 0 {
                self.clamp_selection();
            }
            self.controller.dashboard_mut().clock.poll();
            self.refresh_if_due();

            terminal.draw(|f| self.render(f))?;

            // Short poll keeps the clock and incoming results flowing
            if crossterm::event::poll(Duration::from_millis(80))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.controller.dashboard().alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.controller.dashboard_mut().dismiss_alert();
            }
            return;
        }

        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Chat => self.handle_chat_key(key),
            InputMode::Form(form) => self.handle_form_key(form, key),
            InputMode::ConfirmDelete(pending) => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.controller.delete_bookmark(pending.confirm());
                } else {
                    self.controller
                        .dashboard()
                        .activity
                        .info(format!("Kept bookmark #{}", pending.id()));
                }
            }
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.controller.switch_tab(tab);
        self.last_refresh = std::time::Instant::now();
        if tab == Tab::Chat {
            self.scroll_to_bottom();
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let active = self.controller.dashboard().tabs.active();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[index]);
            }
            KeyCode::Tab => self.switch_tab(active.next()),
            KeyCode::BackTab => self.switch_tab(active.previous()),
            KeyCode::Char('r') if active == Tab::Topology => self.controller.rescan_topology(),
            KeyCode::Char('r') => self.controller.refresh_active(),
            _ => match active {
                Tab::Bookmarks => self.handle_bookmark_key(key),
                Tab::Schedule => {
                    if key.code == KeyCode::Char('n') {
                        self.mode = InputMode::Form(FormState::new_reminder());
                    }
                }
                Tab::Chat => self.handle_chat_browse_key(key),
                Tab::Topology => self.handle_topology_key(key),
                Tab::Gateway | Tab::Tasks => {}
            },
        }
    }

    fn handle_bookmark_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.mode = InputMode::Form(FormState::new_bookmark()),
            KeyCode::Char('e') => {
                if let Some(bm) = self
                    .selected_bookmark_id()
                    .and_then(|id| self.controller.dashboard().bookmarks.get(id))
                {
                    self.mode = InputMode::Form(FormState::edit_bookmark(bm));
                }
            }
            KeyCode::Char('d') => {
                if let Some(pending) = self
                    .selected_bookmark_id()
                    .and_then(|id| self.controller.dashboard().bookmarks.request_delete(id))
                {
                    self.mode = InputMode::ConfirmDelete(pending);
                }
            }
            KeyCode::Char('o') => {
                let url = self
                    .selected_bookmark_id()
                    .and_then(|id| self.controller.dashboard().bookmarks.get(id))
                    .map(|bm| bm.url.clone());
                if let Some(url) = url
                    && let Err(e) = NativePlatform::open_url(&url)
                {
                    self.controller
                        .dashboard()
                        .activity
                        .warn(format!("Could not open {}: {}", url, e));
                }
            }
            KeyCode::Char('f') => {
                self.controller.dashboard_mut().bookmarks.cycle_folder();
                self.bookmark_selected = 0;
            }
            KeyCode::Char('/') => {
                self.input_buffer = self.controller.dashboard().bookmarks.search().to_string();
                self.cursor_pos = self.input_buffer.len();
                self.mode = InputMode::Search;
            }
            KeyCode::Up => self.bookmark_selected = self.bookmark_selected.saturating_sub(1),
            KeyCode::Down => {
                self.bookmark_selected += 1;
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_chat_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('i') | KeyCode::Enter => {
                self.clear_input();
                self.mode = InputMode::Chat;
            }
            KeyCode::Up => {
                if self.chat_scroll == u16::MAX {
                    self.chat_scroll = self.controller.dashboard().chat.len() as u16 * 2;
                }
                self.chat_scroll = self.chat_scroll.saturating_sub(3);
            }
            KeyCode::Down => {
                if self.chat_scroll != u16::MAX {
                    self.chat_scroll = self.chat_scroll.saturating_add(3);
                }
            }
            KeyCode::End => self.scroll_to_bottom(),
            _ => {}
        }
    }

    fn handle_topology_key(&mut self, key: KeyEvent) {
        let topology = &mut self.controller.dashboard_mut().topology;
        match key.code {
            KeyCode::Down | KeyCode::Right => topology.hover_next(),
            KeyCode::Up | KeyCode::Left => topology.hover_previous(),
            KeyCode::Esc => {
                topology.leave();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {}
            KeyCode::Esc => {
                self.clear_input();
                self.controller.dashboard_mut().bookmarks.set_search("");
            }
            code => {
                self.edit_input(code);
                let search = self.input_buffer.clone();
                self.controller.dashboard_mut().bookmarks.set_search(search);
                self.mode = InputMode::Search;
            }
        }
        self.bookmark_selected = 0;
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.clear_input(),
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input_buffer);
                self.cursor_pos = 0;
                match self.controller.send_chat(&input) {
                    Ok(()) => self.scroll_to_bottom(),
                    Err(e) => self.controller.dashboard().activity.warn(e.to_string()),
                }
                self.mode = InputMode::Chat;
            }
            code => {
                self.edit_input(code);
                self.mode = InputMode::Chat;
            }
        }
    }

    fn handle_form_key(&mut self, mut form: FormState, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.push_char(c),
            KeyCode::Enter => {
                let submitted = match form.kind {
                    FormKind::NewBookmark => self.controller.create_bookmark(form.bookmark_draft()),
                    FormKind::EditBookmark(id) => {
                        self.controller.update_bookmark(id, form.bookmark_draft())
                    }
                    FormKind::NewReminder => form
                        .reminder_draft()
                        .and_then(|draft| self.controller.create_reminder(draft)),
                };
                match submitted {
                    Ok(()) => return,
                    Err(e) => form.error = Some(e.to_string()),
                }
            }
            _ => {}
        }
        self.mode = InputMode::Form(form);
    }

    /// Single-line editing shared by the search and chat inputs.
    fn edit_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.input_buffer.insert(self.cursor_pos, c);
                self.cursor_pos += c.len_utf8();
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.input_buffer[..self.cursor_pos].chars().next_back() {
                    self.cursor_pos -= prev.len_utf8();
                    self.input_buffer.remove(self.cursor_pos);
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.input_buffer[..self.cursor_pos].chars().next_back() {
                    self.cursor_pos -= prev.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(next) = self.input_buffer[self.cursor_pos..].chars().next() {
                    self.cursor_pos += next.len_utf8();
                }
            }
            KeyCode::Home => self.cursor_pos = 0,
            KeyCode::End => self.cursor_pos = self.input_buffer.len(),
            _ => {}
        }
    }
}

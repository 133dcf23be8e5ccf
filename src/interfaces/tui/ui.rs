use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap,
        canvas::{self, Canvas},
    },
};

use super::{DashboardTui, InputMode};
use crate::core::activity::Severity;
use crate::core::dashboard::topology::ANCHOR_LABEL;
use crate::core::models::{ChatRole, TaskStatus, TopologyCategory};
use crate::core::tabs::Tab;

const BORDER: Style = Style::new().fg(Color::DarkGray);

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(BORDER)
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Blue,
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

fn category_color(category: TopologyCategory) -> Color {
    match category {
        TopologyCategory::Skills => Color::Cyan,
        TopologyCategory::Channels => Color::Magenta,
        TopologyCategory::Providers => Color::Yellow,
        TopologyCategory::Tools => Color::Green,
    }
}

impl DashboardTui {
    pub(super) fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(8),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.controller.dashboard().tabs.active() {
            Tab::Gateway => self.render_gateway(f, chunks[1]),
            Tab::Bookmarks => self.render_bookmarks(f, chunks[1]),
            Tab::Tasks => self.render_tasks(f, chunks[1]),
            Tab::Schedule => self.render_schedule(f, chunks[1]),
            Tab::Chat => self.render_chat(f, chunks[1]),
            Tab::Topology => self.render_topology(f, chunks[1]),
        }
        self.render_activity(f, chunks[2]);

        match &self.mode {
            InputMode::Form(form) => {
                let area = centered_rect(f.area(), 60, form.fields.len() as u16 * 2 + 4);
                let mut lines = Vec::new();
                for (i, field) in form.fields.iter().enumerate() {
                    let focused = i == form.focused;
                    let label_style = if focused {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    lines.push(Line::from(Span::styled(field.label, label_style)));
                    let cursor = if focused { "_" } else { "" };
                    lines.push(Line::from(format!("  {}{}", field.value, cursor)));
                }
                match &form.error {
                    Some(err) => lines.push(Line::from(Span::styled(
                        err.as_str(),
                        Style::default().fg(Color::Red),
                    ))),
                    None => lines.push(Line::from(Span::styled(
                        "Tab next field · Enter save · Esc cancel",
                        Style::default().fg(Color::DarkGray),
                    ))),
                }
                let widget = Paragraph::new(lines).block(
                    Block::default()
                        .title(form.title())
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                );
                f.render_widget(Clear, area);
                f.render_widget(widget, area);
            }
            InputMode::ConfirmDelete(pending) => {
                let area = centered_rect(f.area(), 50, 3);
                let widget = Paragraph::new(pending.prompt()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                );
                f.render_widget(Clear, area);
                f.render_widget(widget, area);
            }
            _ => {}
        }

        if let Some(alert) = self.controller.dashboard().alert() {
            let area = centered_rect(f.area(), 60, 5);
            let widget = Paragraph::new(vec![
                Line::from(alert),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to dismiss",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Error ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            );
            f.render_widget(Clear, area);
            f.render_widget(widget, area);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let dashboard = self.controller.dashboard();
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|t| Line::from(format!("{} {}", t.index() + 1, t.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(dashboard.tabs.active().index())
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .block(
                Block::default()
                    .title(" nanodash ")
                    .title(Line::from(format!(" {} ", dashboard.clock.display())).right_aligned())
                    .borders(Borders::ALL)
                    .border_style(BORDER),
            );
        f.render_widget(tabs, area);
    }

    fn render_gateway(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(vec![
            Span::styled("  Endpoint: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(self.controller.api().api_base().to_string()),
        ])];
        for line in self.controller.dashboard().gateway.view() {
            let color = if line.healthy { Color::Green } else { Color::Red };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<14}", format!("{}:", line.label)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(line.value, Style::default().fg(color)),
            ]));
        }
        f.render_widget(Paragraph::new(lines).block(panel(" Gateway · r refresh ")), area);
    }

    fn render_bookmarks(&self, f: &mut Frame, area: Rect) {
        let view = self.controller.dashboard().bookmarks.view();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let searching = matches!(self.mode, InputMode::Search);
        let search_text = if searching {
            self.input_buffer.clone()
        } else if view.search.is_empty() {
            "(press / to search)".to_string()
        } else {
            view.search.clone()
        };
        let filter = Paragraph::new(Line::from(vec![
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(search_text),
            Span::styled(
                format!("   Folder: {} (f)", view.folder),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(panel(""));
        f.render_widget(filter, chunks[0]);
        if searching {
            f.set_cursor_position((
                chunks[0].x + 9 + self.cursor_pos as u16,
                chunks[0].y + 1,
            ));
        }

        let items: Vec<ListItem> = view
            .rows
            .iter()
            .map(|row| {
                let mut spans = vec![
                    Span::styled(row.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(row.url.clone(), Style::default().fg(Color::Cyan)),
                    Span::styled(format!("  [{}]", row.folder), Style::default().fg(Color::DarkGray)),
                ];
                for tag in &row.tags {
                    spans.push(Span::styled(format!(" #{}", tag), Style::default().fg(Color::Yellow)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let title = if view.loaded {
            format!(
                " Bookmarks {}/{} · n new · e edit · d delete · o open ",
                view.rows.len(),
                view.total
            )
        } else {
            " Bookmarks · loading... ".to_string()
        };
        let list = List::new(items)
            .block(panel(&title))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");
        let mut state = ListState::default().with_selected(
            (!view.rows.is_empty()).then_some(self.bookmark_selected),
        );
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn render_tasks(&self, f: &mut Frame, area: Rect) {
        let tasks = &self.controller.dashboard().tasks;
        let summary: Vec<String> = tasks
            .summary()
            .iter()
            .map(|s| format!("{} {}", s.count, s.status.label()))
            .collect();

        let rows: Vec<Row> = tasks
            .tasks()
            .iter()
            .map(|t| {
                let color = match t.status {
                    TaskStatus::Running => Color::Cyan,
                    TaskStatus::Pending => Color::Yellow,
                    TaskStatus::Completed => Color::Green,
                    TaskStatus::Failed => Color::Red,
                };
                Row::new(vec![
                    Cell::from(t.name.clone()),
                    Cell::from(t.status.label()).style(Style::default().fg(color)),
                    Cell::from(t.created.clone()),
                ])
            })
            .collect();
        let title = format!(" Tasks · {} ", summary.join(" · "));
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Length(12),
                Constraint::Min(10),
            ],
        )
        .header(
            Row::new(vec!["Name", "Status", "Created"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(panel(&title));
        f.render_widget(table, area);
    }

    fn render_schedule(&self, f: &mut Frame, area: Rect) {
        let view = self.controller.dashboard().reminders.view();
        let items: Vec<ListItem> = view
            .rows
            .iter()
            .map(|row| {
                let mut spans = vec![
                    Span::styled(format!("{:<18}", row.date), Style::default().fg(Color::Cyan)),
                    Span::raw(row.title.clone()),
                    Span::styled(format!("  ({})", row.kind), Style::default().fg(Color::DarkGray)),
                ];
                if row.pending {
                    spans.push(Span::styled(" saving...", Style::default().fg(Color::Yellow)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let title = format!(
            " Upcoming reminders {} of {} · n new ",
            view.rows.len(),
            view.total
        );
        f.render_widget(List::new(items).block(panel(&title)), area);
    }

    fn render_chat(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        for msg in self.controller.dashboard().chat.view() {
            let (prefix, prefix_style, content_style) = match msg.role {
                ChatRole::User => (
                    "  > ",
                    Style::default().fg(Color::Cyan),
                    Style::default().fg(Color::White),
                ),
                ChatRole::Assistant => (
                    "  ",
                    Style::default().fg(Color::Green),
                    Style::default().fg(Color::Green),
                ),
            };
            let content_style = if msg.pending {
                content_style.add_modifier(Modifier::DIM)
            } else {
                content_style
            };
            for text_line in msg.message.lines() {
                let mut spans = vec![Span::styled(prefix, prefix_style)];
                spans.extend(
                    parse_inline_markdown(text_line, content_style)
                        .into_iter()
                        .map(|s| Span::styled(s.content.into_owned(), s.style)),
                );
                lines.push(Line::from(spans));
            }
            lines.push(Line::from(""));
        }

        let total_lines = lines.len() as u16;
        let visible_height = chunks[0].height.saturating_sub(2);
        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll = if self.chat_scroll == u16::MAX {
            max_scroll
        } else {
            self.chat_scroll.min(max_scroll)
        };
        let history = Paragraph::new(lines)
            .block(panel(" Chat · i type · ↑↓ scroll "))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(history, chunks[0]);

        let typing = matches!(self.mode, InputMode::Chat);
        let input_style = if typing {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(format!("> {}", self.input_buffer))
            .style(input_style)
            .block(panel(""));
        f.render_widget(input, chunks[1]);
        if typing {
            f.set_cursor_position((chunks[1].x + 3 + self.cursor_pos as u16, chunks[1].y + 1));
        }
    }

    fn render_topology(&self, f: &mut Frame, area: Rect) {
        let topology = &self.controller.dashboard().topology;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        let Some(layout) = topology.layout() else {
            f.render_widget(
                Paragraph::new("  Loading topology...").block(panel(" Topology ")),
                chunks[0],
            );
            return;
        };

        let selected = topology.selected();
        let canvas = Canvas::default()
            .block(panel(" Topology · ↑↓ inspect · r rescan "))
            .marker(Marker::Braille)
            .x_bounds([0.0, layout.width])
            .y_bounds([0.0, layout.height])
            .paint(|ctx| {
                // Layout y grows downward; canvas y grows upward.
                let flip = |y: f64| layout.height - y;
                for edge in &layout.edges {
                    let color = category_color(layout.nodes[edge.node].category);
                    ctx.draw(&canvas::Line::new(
                        edge.from.x,
                        flip(edge.from.y),
                        edge.to.x,
                        flip(edge.to.y),
                        color,
                    ));
                }
                ctx.layer();
                ctx.print(
                    layout.anchor.x,
                    flip(layout.anchor.y),
                    Line::styled(
                        ANCHOR_LABEL,
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                );
                for (i, node) in layout.nodes.iter().enumerate() {
                    let mut style = Style::default().fg(category_color(node.category));
                    if selected == Some(i) {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    ctx.print(
                        node.position.x,
                        flip(node.position.y),
                        Line::styled(node.name.clone(), style),
                    );
                }
            });
        f.render_widget(canvas, chunks[0]);

        let mut legend: Vec<Span> = TopologyCategory::ALL
            .iter()
            .map(|c| {
                Span::styled(
                    format!("■ {} ({})  ", c.label(), layout.nodes_in(*c).count()),
                    Style::default().fg(category_color(*c)),
                )
            })
            .collect();
        if let Some(tip) = topology.tooltips().first() {
            legend.push(Span::styled(
                tip.text.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(legend)).block(panel("")), chunks[1]);
    }

    fn render_activity(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .controller
            .dashboard()
            .activity
            .entries()
            .into_iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", entry.time), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{:<8}", entry.severity.label()),
                        Style::default().fg(severity_color(entry.severity)),
                    ),
                    Span::raw(entry.message),
                ]))
            })
            .collect();
        f.render_widget(
            List::new(items).block(panel(" Activity · 1-6/Tab switch · q quit ")),
            area,
        );
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Parse basic inline markdown: **bold**, `code`
pub(super) fn parse_inline_markdown<'a>(text: &'a str, base_style: Style) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if let Some(pos) = remaining.find("**") {
            if pos > 0 {
                spans.push(Span::styled(&remaining[..pos], base_style));
            }
            let after = &remaining[pos + 2..];
            if let Some(end) = after.find("**") {
                spans.push(Span::styled(
                    &after[..end],
                    base_style.add_modifier(Modifier::BOLD),
                ));
                remaining = &after[end + 2..];
            } else {
                spans.push(Span::styled(&remaining[pos..], base_style));
                break;
            }
        } else if let Some(pos) = remaining.find('`') {
            if pos > 0 {
                spans.push(Span::styled(&remaining[..pos], base_style));
            }
            let after = &remaining[pos + 1..];
            if let Some(end) = after.find('`') {
                spans.push(Span::styled(&after[..end], Style::default().fg(Color::Yellow)));
                remaining = &after[end + 1..];
            } else {
                spans.push(Span::styled(&remaining[pos..], base_style));
                break;
            }
        } else {
            spans.push(Span::styled(remaining, base_style));
            break;
        }
    }

    if spans.is_empty() {
        spans.push(Span::styled("", base_style));
    }

    spans
}

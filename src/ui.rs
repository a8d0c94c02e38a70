//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: the
//! folder tree on the left, the photo preview on the right and the status and
//! controls boxes below.

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Widget, Wrap},
};
use std::time::Instant;

use crate::app::{App, InputMode};
use crate::config::{ThemeSettings, UiSettings};
use crate::preview::Thumbnail;
use crate::tree::NodeKind;

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter/l", "open folder / show on map"),
    ("h", "collapse / parent"),
    ("s", "toggle sort"),
    ("o", "open directory"),
    ("q", "quit"),
];

/// Colours resolved from `ThemeSettings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub highlight: Color,
}

impl Theme {
    /// Parse every `#rrggbb` entry; the error names the offending key.
    pub fn from_settings(settings: &ThemeSettings) -> Result<Self, String> {
        let parse = |key: &str, value: &str| {
            parse_hex_color(value)
                .ok_or_else(|| format!("ui.theme.{key} must be a #rrggbb colour, got '{value}'"))
        };
        Ok(Self {
            background: parse("background", &settings.background)?,
            text: parse("text", &settings.text)?,
            muted: parse("muted", &settings.muted)?,
            accent: parse("accent", &settings.accent)?,
            highlight: parse("highlight", &settings.highlight)?,
        })
    }

    fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.muted))
            .title(title)
            .title_style(Style::default().fg(self.accent))
            .style(self.base())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_settings(&ThemeSettings::default()).unwrap_or(Self {
            background: Color::Reset,
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            highlight: Color::DarkGray,
        })
    }
}

/// `#rrggbb` (leading `#` optional) to an RGB colour.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(k, v)| format!("[{k}] {v}"))
        .collect::<Vec<String>>()
        .join(" | ")
}

fn padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Largest size with the aspect ratio of `src` that fits inside `max`.
pub fn fit_size(src: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = src;
    let (mw, mh) = max;
    if sw == 0 || sh == 0 || mw == 0 || mh == 0 {
        return (0, 0);
    }
    let scale = f64::min(mw as f64 / sw as f64, mh as f64 / sh as f64);
    let w = ((sw as f64 * scale).round() as u32).clamp(1, mw);
    let h = ((sh as f64 * scale).round() as u32).clamp(1, mh);
    (w, h)
}

/// Draws a bitmap with upper-half blocks, two pixel rows per terminal row.
struct ThumbnailView<'a> {
    thumbnail: &'a Thumbnail,
    theme: &'a Theme,
}

impl Widget for ThumbnailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let img = &self.thumbnail.image;
        let (w, h) = fit_size(
            img.dimensions(),
            (area.width as u32, area.height as u32 * 2),
        );
        if w == 0 || h == 0 {
            return;
        }
        let x0 = area.x + ((area.width as u32 - w) / 2) as u16;
        let y0 = area.y + ((area.height as u32 * 2 - h) / 4) as u16;

        let sample = |px: u32, py: u32| {
            let sx = (px * img.width() / w).min(img.width() - 1);
            let sy = (py * img.height() / h).min(img.height() - 1);
            let p = img.get_pixel(sx, sy).0;
            Color::Rgb(p[0], p[1], p[2])
        };

        for cy in 0..h.div_ceil(2) {
            for cx in 0..w {
                let top = sample(cx, cy * 2);
                let bottom = if cy * 2 + 1 < h {
                    sample(cx, cy * 2 + 1)
                } else {
                    self.theme.background
                };
                if let Some(cell) = buf.cell_mut((x0 + cx as u16, y0 + cy as u16)) {
                    cell.set_char('▀').set_fg(top).set_bg(bottom);
                }
            }
        }

        if let Some(text) = &self.thumbnail.fallback_text {
            let row = y0 + (h.div_ceil(2) / 2) as u16;
            let line = Rect {
                x: x0,
                y: row,
                width: w as u16,
                height: 1,
            };
            Paragraph::new(text.as_str())
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.text).add_modifier(Modifier::BOLD))
                .render(line, buf);
        }
    }
}

fn status_text(app: &App, now: Instant) -> String {
    if app.input_mode == InputMode::OpenPrompt {
        return format!("Open directory: {}_", app.prompt);
    }
    if let Some(text) = app.active_status(now) {
        return text.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("{} photos", app.store.len()));
    parts.push(format!("Root: {}", app.store.root_label()));
    parts.push(format!("Sort: {}", app.sort_mode.label()));
    match &app.map_target {
        Some(t) => parts.push(format!("Map: {t}")),
        None => parts.push("Map: off".to_string()),
    }
    parts.join(" • ")
}

/// Details of the record behind the highlighted row, if it is a leaf.
fn highlighted_details(app: &App) -> String {
    app.rows
        .get(app.cursor)
        .and_then(|row| app.tree.node(row.id))
        .and_then(|n| n.photo_index())
        .and_then(|i| app.store.get(i))
        .map(|r| r.details())
        .unwrap_or_default()
}

fn draw_tree(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(6)])
        .split(area);

    // Only build items for the window around the cursor.
    let total = app.rows.len();
    let list_height = parts[0].height.saturating_sub(2) as usize;
    let (start, end, selected_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, app.cursor)
    } else {
        let half = list_height / 2;
        let mut start = app.cursor.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, app.cursor - start)
    };

    let items: Vec<ListItem> = app.rows[start..end]
        .iter()
        .filter_map(|row| {
            let node = app.tree.node(row.id)?;
            let indent = "  ".repeat(row.depth);
            let line = match node.kind {
                NodeKind::Group => {
                    let marker = if app.is_collapsed(row.id) { "▸" } else { "▾" };
                    format!("{indent}{marker} {}", node.label)
                }
                NodeKind::Leaf { .. } => format!("{indent}  {}", node.label),
            };
            let style = match node.kind {
                NodeKind::Group => Style::default().fg(theme.accent),
                NodeKind::Leaf { .. } => Style::default().fg(theme.text),
            };
            Some(ListItem::new(line).style(style))
        })
        .collect();

    let list = List::new(items)
        .block(theme.block(" photos "))
        .highlight_style(
            Style::default()
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_visible));
    }
    frame.render_stateful_widget(list, parts[0], &mut state);

    let details = Paragraph::new(highlighted_details(app))
        .block(theme.block(" details ").padding(padded()))
        .wrap(Wrap { trim: true });
    frame.render_widget(details, parts[1]);
}

fn draw_preview(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = theme.block(" preview ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(inner);

    frame.render_widget(
        ThumbnailView {
            thumbnail: &app.preview.thumbnail,
            theme,
        },
        parts[0],
    );

    let caption = Paragraph::new(app.preview.caption.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.muted))
        .wrap(Wrap { trim: true });
    frame.render_widget(caption, parts[1]);
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, theme: &Theme, ui_settings: &UiSettings) {
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            theme
                .block(" photomap ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    draw_tree(frame, app, theme, body[0]);
    draw_preview(frame, app, theme, body[1]);

    let status = Paragraph::new(status_text(app, Instant::now()))
        .block(theme.block(" status ").padding(padded()))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);

    let footer = Paragraph::new(controls_text())
        .style(Style::default().fg(theme.muted))
        .block(theme.block(" controls ").padding(padded()))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

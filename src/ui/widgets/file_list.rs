// src/ui/widgets/file_list.rs
//! File browser list widget.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::fs::Entry;
use crate::ui::icons::icon_for_entry;

/// Render the file browser list. Non-audio files are dimmed.
pub fn render_file_list(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    entries: &[Entry],
    state: &mut ListState,
) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let style = if entry.is_dir || entry.is_audio() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(format!(
                "{} {}",
                icon_for_entry(entry.is_dir, entry.category),
                entry.name
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, state);
}

// src/ui/widgets/player_panel.rs
//! Player panel: track name, time labels, progress, transport and effect controls.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::audio::{
    effects::{EffectSnapshot, GAIN_DB_MAX, GAIN_DB_MIN},
    format_time,
    position::NO_TIME,
    PlaybackPosition, TransportState,
};
use crate::ui::keybindings::HELP;

/// Everything the panel shows, borrowed from the app for one frame.
pub struct PlayerView<'a> {
    pub track_name: Option<&'a str>,
    pub loaded: bool,
    pub position: PlaybackPosition,
    pub state: TransportState,
    pub effects: EffectSnapshot,
    pub status: Option<&'a str>,
}

/// Render the player panel.
pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, view: &PlayerView<'_>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Player"), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // track name
            Constraint::Length(1), // time labels
            Constraint::Length(1), // progress
            Constraint::Length(1), // transport controls
            Constraint::Length(1), // spacer
            Constraint::Length(1), // volume
            Constraint::Length(1), // reverb
            Constraint::Length(1), // status
            Constraint::Min(1),    // help
        ])
        .split(area);

    let name = view.track_name.unwrap_or("No File Loaded");
    f.render_widget(
        Paragraph::new(name)
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        inner[0],
    );

    render_time_labels(f, inner[1], view);

    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::White))
            .ratio(view.position.progress())
            .label(""),
        inner[2],
    );

    f.render_widget(
        Paragraph::new(transport_line(view)).alignment(Alignment::Center),
        inner[3],
    );

    let gain = view.effects.gain_db;
    let gain_ratio = ((gain - GAIN_DB_MIN) / (GAIN_DB_MAX - GAIN_DB_MIN)) as f64;
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(gain_ratio.clamp(0.0, 1.0))
            .label(format!("Volume {gain:+.0} dB")),
        inner[5],
    );

    let reverb_label = if view.effects.reverb_enabled {
        format!("Reverb  room {:.2}", view.effects.room_size)
    } else {
        format!("Pass  room {:.2}", view.effects.room_size)
    };
    let reverb_color = if view.effects.reverb_enabled {
        Color::Magenta
    } else {
        Color::DarkGray
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(reverb_color))
            .ratio((view.effects.room_size as f64).clamp(0.0, 1.0))
            .label(reverb_label),
        inner[6],
    );

    if let Some(status) = view.status {
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Red)),
            inner[7],
        );
    }

    f.render_widget(
        Paragraph::new(HELP)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        inner[8],
    );
}

fn render_time_labels(f: &mut Frame<'_>, area: Rect, view: &PlayerView<'_>) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (now, total) = if view.loaded {
        (
            format_time(view.position.current_secs),
            format_time(view.position.duration_secs),
        )
    } else {
        (NO_TIME.to_string(), NO_TIME.to_string())
    };

    f.render_widget(Paragraph::new(now).alignment(Alignment::Left), halves[0]);
    f.render_widget(Paragraph::new(total).alignment(Alignment::Right), halves[1]);
}

fn transport_line(view: &PlayerView<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);

    let play_style = if view.loaded {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        dim
    };
    let stop_style = if view.state.stop_enabled() {
        Style::default().fg(Color::Black).bg(Color::Red)
    } else {
        dim
    };

    Line::from(vec![
        Span::styled(" << ", Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(format!(" {} ", view.state.play_label()), play_style),
        Span::raw(" "),
        Span::styled(format!(" {} ", view.state.stop_label()), stop_style),
        Span::raw(" "),
        Span::styled(" >> ", Style::default().fg(Color::Cyan)),
    ])
}

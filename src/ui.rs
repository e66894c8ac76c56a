//! UI rendering helpers for the terminal user interface.
//!
//! Everything here reads a `PlayerSnapshot`; nothing in the UI mutates the
//! playback session.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, loop_mode_label};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::library::Track;
use crate::player::{LoopMode, PlayerSnapshot, PlayerState};

/// Everything one frame needs.
pub struct View<'a> {
    pub snapshot: &'a PlayerSnapshot,
    pub tracks: &'a [Track],
    pub app: &'a App,
    pub loop_mode: LoopMode,
    pub ui: &'a UiSettings,
    pub controls: &'a ControlsSettings,
}

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[s] stop".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{scrub_seconds}s"),
        "[-/+] volume".to_string(),
        "[r] loop mode".to_string(),
        "[K] details".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `m:ss`, truncating partial seconds.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the progress label (elapsed/total/remaining) per `UiSettings`.
fn time_text(position: Duration, duration: Duration, ui: &UiSettings) -> String {
    ui.time_fields
        .iter()
        .map(|f| match f {
            TimeField::Elapsed => format_time(position),
            TimeField::Total => format_time(duration),
            TimeField::Remaining => format!("-{}", format_time(duration.saturating_sub(position))),
        })
        .collect::<Vec<_>>()
        .join(&ui.time_separator)
}

/// Fraction of the track played, in `0.0..=1.0`.
fn progress_ratio(position: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 0.0;
    }
    (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

fn state_text(state: &PlayerState) -> String {
    match state {
        PlayerState::Error { reason, .. } => format!("Error: {reason}"),
        other => other.label().to_string(),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn details_text(track: &Track, snapshot: &PlayerSnapshot) -> String {
    format!(
        "Id: {}\nTitle: {}\nSource: {}\nArtwork: {}\nNominal duration: {}\nDuration: {}",
        track.id(),
        track.title(),
        track.source().display(),
        track.artwork().unwrap_or("-"),
        format_time(track.nominal_duration()),
        format_time(snapshot.duration),
    )
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let snap = view.snapshot;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(view.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![
        snap.title.clone(),
        format!("Track {} of {}", snap.index + 1, snap.track_count),
        format!(
            "{} • {}",
            state_text(&snap.state),
            loop_mode_label(view.loop_mode)
        ),
    ];
    if let Some(notice) = &view.app.notice {
        lines.push(notice.clone());
    }
    let now_playing = Paragraph::new(lines.join("\n"))
        .block(Block::bordered().padding(LEFT_PAD).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    let progress = Gauge::default()
        .block(Block::bordered().title(" progress "))
        .ratio(progress_ratio(snap.position, snap.duration))
        .label(time_text(snap.position, snap.duration, view.ui));
    frame.render_widget(progress, chunks[2]);

    let volume = Gauge::default()
        .block(Block::bordered().title(" volume "))
        .ratio(f64::from(snap.volume).clamp(0.0, 1.0))
        .label(format!("{:.0}%", snap.volume * 100.0));
    frame.render_widget(volume, chunks[3]);

    let items: Vec<ListItem> = view
        .tracks
        .iter()
        .map(|t| ListItem::new(t.title()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.tracks.is_empty() {
        state.select(Some(snap.index));
    }
    frame.render_stateful_widget(list, chunks[4], &mut state);

    if view.app.show_details {
        if let Some(track) = view.tracks.get(snap.index) {
            let popup_area = centered_rect_sized(72, 8, chunks[4]);
            frame.render_widget(Clear, popup_area);
            let details = Paragraph::new(details_text(track, snap))
                .block(
                    Block::default()
                        .padding(LEFT_PAD)
                        .borders(Borders::ALL)
                        .title(" details (K closes) "),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(details, popup_area);
        }
    }

    let footer = Paragraph::new(controls_text(view.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn format_time_uses_minutes_and_padded_seconds() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_millis(59_999)), "0:59");
        assert_eq!(format_time(secs(180)), "3:00");
        assert_eq!(format_time(secs(3725)), "62:05");
    }

    #[test]
    fn time_text_follows_configured_fields() {
        let mut ui = UiSettings::default();
        assert_eq!(time_text(secs(65), secs(210), &ui), "1:05 / 3:30");

        ui.time_fields = vec![TimeField::Remaining];
        assert_eq!(time_text(secs(65), secs(210), &ui), "-2:25");

        ui.time_fields.clear();
        assert_eq!(time_text(secs(65), secs(210), &ui), "");
    }

    #[test]
    fn progress_ratio_handles_zero_and_overflow() {
        assert_eq!(progress_ratio(secs(5), Duration::ZERO), 0.0);
        assert_eq!(progress_ratio(secs(90), secs(180)), 0.5);
        assert_eq!(progress_ratio(secs(200), secs(180)), 1.0);
    }

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.contains("[q] quit"));
    }

    fn rendered(view: &View<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 32)).unwrap();
        terminal.draw(|f| draw(f, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn snapshot(state: PlayerState) -> PlayerSnapshot {
        PlayerSnapshot {
            state,
            index: 1,
            track_count: 2,
            track_id: "b".into(),
            title: "Second Song".into(),
            artwork: None,
            playing: false,
            position: secs(65),
            duration: secs(210),
            volume: 0.5,
            revision: 3,
        }
    }

    #[test]
    fn draw_shows_now_playing_progress_and_playlist() {
        let tracks = vec![
            Track::new("a", "First Song", "/m/a.mp3", secs(180)),
            Track::new("b", "Second Song", "/m/b.mp3", secs(200)),
        ];
        let snap = snapshot(PlayerState::Paused);
        let app = App::new();
        let ui = UiSettings::default();
        let controls = ControlsSettings::default();
        let view = View {
            snapshot: &snap,
            tracks: &tracks,
            app: &app,
            loop_mode: LoopMode::LoopAll,
            ui: &ui,
            controls: &controls,
        };

        let screen = rendered(&view);
        assert!(screen.contains("Track 2 of 2"));
        assert!(screen.contains("Paused"));
        assert!(screen.contains("1:05 / 3:30"));
        assert!(screen.contains("50%"));
        assert!(screen.contains("> Second Song"));
        assert!(screen.contains("First Song"));
        assert!(!screen.contains("details (K closes)"));
    }

    #[test]
    fn draw_shows_errors_and_details_popup() {
        let tracks = vec![
            Track::new("a", "First Song", "/m/a.mp3", secs(180)),
            Track::new("b", "Second Song", "/m/b.mp3", secs(200)).with_artwork("cover.png"),
        ];
        let snap = snapshot(PlayerState::Error {
            track_id: "b".into(),
            reason: "corrupt".into(),
        });
        let mut app = App::new();
        app.show_details = true;
        app.notice = Some("failed to load track b: corrupt".into());
        let ui = UiSettings::default();
        let controls = ControlsSettings::default();
        let view = View {
            snapshot: &snap,
            tracks: &tracks,
            app: &app,
            loop_mode: LoopMode::NoLoop,
            ui: &ui,
            controls: &controls,
        };

        let screen = rendered(&view);
        assert!(screen.contains("Error: corrupt"));
        assert!(screen.contains("no-loop"));
        assert!(screen.contains("details (K closes)"));
        assert!(screen.contains("Artwork: cover.png"));
        assert!(screen.contains("Nominal duration: 3:20"));
    }
}

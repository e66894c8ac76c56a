use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use cadence::app::{App, intent_for_key};
use cadence::config::Settings;
use cadence::engine::AudioBackend;
use cadence::player::TrackPlayer;
use cadence::ui::{self, View};

/// Main terminal event loop: delivers engine events, drives the sampler,
/// draws and handles input. Returns `Ok(())` when the user quits.
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    player: &mut TrackPlayer<B>,
) -> anyhow::Result<()> {
    let redraw = Duration::from_millis(settings.ui.redraw_interval_ms.max(1));

    while !app.should_quit() {
        app.settle(player.pump());
        player.tick(Instant::now());
        app.sync_notice(player.state());

        let snapshot = player.snapshot();
        let view = View {
            snapshot: &snapshot,
            tracks: player.playlist().tracks(),
            app: &*app,
            loop_mode: player.loop_mode(),
            ui: &settings.ui,
            controls: &settings.controls,
        };
        terminal.draw(|f| ui::draw(f, &view))?;

        let timeout = poll_timeout(player.next_deadline(), Instant::now(), redraw);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(intent) = intent_for_key(key, &settings.controls) {
                    debug!(?intent, "key intent");
                    app.apply(intent, player);
                }
            }
        }
    }

    Ok(())
}

/// Wait until the sampler is due, but never longer than one redraw interval.
fn poll_timeout(deadline: Option<Instant>, now: Instant, redraw: Duration) -> Duration {
    match deadline {
        Some(at) => at.saturating_duration_since(now).min(redraw),
        None => redraw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_timeout_waits_for_the_sooner_of_sampler_and_redraw() {
        let now = Instant::now();
        let redraw = Duration::from_millis(250);

        assert_eq!(poll_timeout(None, now, redraw), redraw);
        assert_eq!(
            poll_timeout(Some(now + Duration::from_millis(40)), now, redraw),
            Duration::from_millis(40)
        );
        assert_eq!(
            poll_timeout(Some(now + Duration::from_secs(2)), now, redraw),
            redraw
        );
        assert_eq!(
            poll_timeout(Some(now), now + Duration::from_millis(5), redraw),
            Duration::ZERO
        );
    }
}

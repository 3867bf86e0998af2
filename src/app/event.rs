//! Terminal event abstraction and frame scheduler.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel, interleaved with `Tick` events at the frame
//! interval, so the main loop stays non-blocking.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Frame boundary.  The engine advances only on these.
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel, plus one `Tick` per `frame_interval`.
pub fn spawn_event_reader(frame_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let mut next_tick = Instant::now() + frame_interval;
        loop {
            // Wait for input at most until the next frame is due, so drags
            // do not starve the ticks.
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => Some(AppEvent::Key(k)),
                        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
                        CtEvent::Resize(_, _) => Some(AppEvent::Resize),
                        _ => None,
                    };
                    if let Some(app_event) = app_event {
                        if tx.send(app_event).is_err() {
                            break; // receiver dropped
                        }
                    }
                }
            }

            if Instant::now() >= next_tick {
                // Skip missed frames rather than bursting to catch up.
                next_tick = (next_tick + frame_interval).max(Instant::now());
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }
    });

    rx
}

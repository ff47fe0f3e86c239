//! Text renderer that prints frames to stdout.

use std::io::Write as _;

use life_core::config::RenderConfig;
use life_core::{Frame, RenderCallback};
use tracing::debug;

/// Draw a frame as text: a status line, then one line per row.
pub fn render_text(frame: &Frame, live: char, dead: char) -> String {
    let dims = frame.dimensions;
    let capacity = dims
        .width()
        .saturating_add(1)
        .saturating_mul(dims.height())
        .saturating_add(64);
    let mut out = String::with_capacity(capacity);
    out.push_str(&format!(
        "generation {} | population {} | {}\n",
        frame.generation,
        frame.population,
        if frame.playing { "playing" } else { "idle" },
    ));
    for row in frame.rows() {
        out.extend(row.map(|alive| if alive { live } else { dead }));
        out.push('\n');
    }
    out
}

/// Render callback printing a frame whenever the picture may have changed.
///
/// A frame is printed when it is dirty (edited since the previous tick) or
/// its generation differs from the last printed one, so an idle, untouched
/// grid is not redrawn every tick.
pub struct ConsoleRenderer {
    live: char,
    dead: char,
    last_generation: Option<u64>,
}

impl ConsoleRenderer {
    /// Create a renderer using the configured cell characters.
    pub const fn new(config: &RenderConfig) -> Self {
        Self {
            live: config.live_char,
            dead: config.dead_char,
            last_generation: None,
        }
    }

    /// Whether `frame` should be printed.
    fn should_draw(&self, frame: &Frame) -> bool {
        frame.dirty || self.last_generation != Some(frame.generation)
    }
}

impl RenderCallback for ConsoleRenderer {
    fn on_frame(&mut self, frame: &Frame) {
        if !self.should_draw(frame) {
            return;
        }
        self.last_generation = Some(frame.generation);

        let text = render_text(frame, self.live, self.dead);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            debug!(error = %e, "Failed to write frame");
        }
    }
}

//! Line-oriented stdin control adapter.
//!
//! Each input line is parsed into a [`Command`] and executed against the
//! engine. Parse and command errors are printed and the loop continues;
//! only `quit`, end of input, or Ctrl-C end it.
//!
//! Stdin is read on a dedicated OS thread and forwarded over a channel, so
//! a pending read never holds up runtime shutdown.

use std::io::BufRead as _;

use life_core::config::RenderConfig;
use life_core::{ControlError, LifeEngine};
use life_grid::Pattern;
use life_grid::pattern::PATTERNS;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::render::render_text;

/// Text printed by `help`.
const HELP: &str = "\
commands:
  toggle X Y       flip one cell
  set X Y 0|1      set one cell
  random [PCT]     reseed at PCT percent density (default from config)
  clear            kill every cell
  pattern NAME X Y stamp a built-in pattern
  start | pause    resume or stop advancing generations
  step             advance one generation now
  speed MS         change the tick interval
  save | load      write or restore the save file
  show             print the current grid
  quit             exit";

/// Errors raised while parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a known command.
    #[error("unknown command '{name}' (try 'help')")]
    UnknownCommand {
        /// The word that was typed.
        name: String,
    },

    /// A required argument is absent.
    #[error("{command}: missing {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// The argument that is missing.
        argument: &'static str,
    },

    /// An argument is not a valid number.
    #[error("{command}: '{value}' is not a valid {argument}")]
    InvalidArgument {
        /// The command being parsed.
        command: &'static str,
        /// The argument being parsed.
        argument: &'static str,
        /// The text that was typed.
        value: String,
    },

    /// No built-in pattern has this name.
    #[error("unknown pattern '{name}' (known: {known})")]
    UnknownPattern {
        /// The name that was typed.
        name: String,
        /// Comma-separated list of built-in patterns.
        known: String,
    },

    /// Extra words after a complete command.
    #[error("{command}: unexpected argument '{extra}'")]
    TrailingArgument {
        /// The command being parsed.
        command: &'static str,
        /// The first unexpected word.
        extra: String,
    },
}

/// A parsed console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Flip one cell.
    Toggle {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
    },
    /// Set one cell.
    Set {
        /// Column.
        x: usize,
        /// Row.
        y: usize,
        /// New state.
        alive: bool,
    },
    /// Reseed the grid; `None` uses the configured density.
    Random {
        /// Density percentage.
        density: Option<u32>,
    },
    /// Kill every cell.
    Clear,
    /// Stamp a built-in pattern.
    Pattern {
        /// The pattern to stamp.
        pattern: Pattern,
        /// Origin column.
        x: usize,
        /// Origin row.
        y: usize,
    },
    /// Begin advancing generations.
    Start,
    /// Stop advancing generations.
    Pause,
    /// Advance one generation immediately.
    Step,
    /// Change the tick interval.
    Speed {
        /// New interval in milliseconds.
        ms: u64,
    },
    /// Write the save file.
    Save,
    /// Restore from the save file.
    Load,
    /// Print the current grid.
    Show,
    /// Print the command list.
    Help,
    /// Exit the program.
    Quit,
}

/// Why the console loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// The user typed `quit`.
    Quit,
    /// Stdin reached end of input.
    EndOfInput,
    /// Ctrl-C was received.
    Interrupted,
}

/// Outcome of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this text and keep reading.
    Message(String),
    /// Stop reading commands.
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "toggle" => Self::Toggle {
                x: number(words.next(), "toggle", "x")?,
                y: number(words.next(), "toggle", "y")?,
            },
            "set" => Self::Set {
                x: number(words.next(), "set", "x")?,
                y: number(words.next(), "set", "y")?,
                alive: cell_state(words.next())?,
            },
            "random" => Self::Random {
                density: words
                    .next()
                    .map(|w| number(Some(w), "random", "density"))
                    .transpose()?,
            },
            "clear" => Self::Clear,
            "pattern" => Self::Pattern {
                pattern: pattern(words.next())?,
                x: number(words.next(), "pattern", "x")?,
                y: number(words.next(), "pattern", "y")?,
            },
            "start" => Self::Start,
            "pause" => Self::Pause,
            "step" => Self::Step,
            "speed" => Self::Speed {
                ms: number(words.next(), "speed", "interval")?,
            },
            "save" => Self::Save,
            "load" => Self::Load,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => {
                return Err(ParseError::UnknownCommand {
                    name: name.to_owned(),
                });
            }
        };

        if let Some(extra) = words.next() {
            return Err(ParseError::TrailingArgument {
                command: command.name(),
                extra: extra.to_owned(),
            });
        }
        Ok(Some(command))
    }

    /// The canonical command word.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Toggle { .. } => "toggle",
            Self::Set { .. } => "set",
            Self::Random { .. } => "random",
            Self::Clear => "clear",
            Self::Pattern { .. } => "pattern",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Step => "step",
            Self::Speed { .. } => "speed",
            Self::Save => "save",
            Self::Load => "load",
            Self::Show => "show",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn number<T: std::str::FromStr>(
    word: Option<&str>,
    command: &'static str,
    argument: &'static str,
) -> Result<T, ParseError> {
    let word = word.ok_or(ParseError::MissingArgument { command, argument })?;
    word.parse().ok().ok_or_else(|| ParseError::InvalidArgument {
        command,
        argument,
        value: word.to_owned(),
    })
}

fn cell_state(word: Option<&str>) -> Result<bool, ParseError> {
    match word {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(other) => Err(ParseError::InvalidArgument {
            command: "set",
            argument: "state (0 or 1)",
            value: other.to_owned(),
        }),
        None => Err(ParseError::MissingArgument {
            command: "set",
            argument: "state",
        }),
    }
}

fn pattern(word: Option<&str>) -> Result<Pattern, ParseError> {
    let name = word.ok_or(ParseError::MissingArgument {
        command: "pattern",
        argument: "name",
    })?;
    Pattern::by_name(name).ok_or_else(|| ParseError::UnknownPattern {
        name: name.to_owned(),
        known: PATTERNS
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Execute one command against the engine.
pub async fn execute(
    engine: &LifeEngine,
    command: Command,
    render: &RenderConfig,
) -> Result<Reply, ControlError> {
    debug!(command = command.name(), "Executing console command");
    let message = match command {
        Command::Toggle { x, y } => {
            let alive = engine.toggle_cell(x, y)?;
            format!("({x}, {y}) is now {}", if alive { "alive" } else { "dead" })
        }
        Command::Set { x, y, alive } => {
            engine.set_cell(x, y, alive)?;
            format!("({x}, {y}) set {}", if alive { "alive" } else { "dead" })
        }
        Command::Random { density } => {
            match density {
                Some(density) => engine.randomize(density)?,
                None => engine.randomize_default()?,
            }
            format!("randomized, population {}", engine.frame().population)
        }
        Command::Clear => {
            engine.clear();
            "cleared".to_owned()
        }
        Command::Pattern { pattern, x, y } => {
            engine.stamp(&pattern, x, y)?;
            format!("stamped {} at ({x}, {y})", pattern.name)
        }
        Command::Start => {
            engine.start();
            "playing".to_owned()
        }
        Command::Pause => {
            engine.pause();
            "paused".to_owned()
        }
        Command::Step => {
            let frame = engine.advance();
            render_text(&frame, render.live_char, render.dead_char)
        }
        Command::Speed { ms } => {
            let previous = engine.set_tick_interval_ms(ms)?;
            format!("tick interval {previous} ms -> {ms} ms")
        }
        Command::Save => {
            let text = engine.save().await?;
            format!(
                "saved {} bytes to {}",
                text.len(),
                engine.store().path().display()
            )
        }
        Command::Load => {
            let frame = engine.load().await?;
            format!(
                "loaded {}, population {}",
                engine.store().path().display(),
                frame.population
            )
        }
        Command::Show => render_text(&engine.frame(), render.live_char, render.dead_char),
        Command::Help => HELP.to_owned(),
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Message(message))
}

/// Start the stdin reader thread.
fn spawn_stdin_reader() -> Result<mpsc::Receiver<String>, EngineError> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("life-stdin".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Read and execute commands until `quit`, end of input, or Ctrl-C.
pub async fn run(engine: &LifeEngine, render: &RenderConfig) -> Result<ConsoleExit, EngineError> {
    let mut lines = spawn_stdin_reader()?;
    info!("Console ready, type 'help' for commands");

    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Ctrl-C received");
                return Ok(ConsoleExit::Interrupted);
            }
        };
        let Some(line) = line else {
            info!("Console input closed");
            return Ok(ConsoleExit::EndOfInput);
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        match execute(engine, command, render).await {
            Ok(Reply::Message(message)) => println!("{message}"),
            Ok(Reply::Quit) => return Ok(ConsoleExit::Quit),
            Err(e) => {
                warn!(command = command.name(), error = %e, "Command failed");
                eprintln!("error: {e}");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::unreachable)]
mod tests {
    use life_core::LifeConfig;
    use life_grid::GridError;
    use life_grid::pattern::GLIDER;

    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    fn engine() -> LifeEngine {
        let mut config = LifeConfig::default();
        config.seeding.rng_seed = Some(3);
        LifeEngine::new(&config).unwrap()
    }

    // =====================================================================
    // Parsing
    // =====================================================================

    #[test]
    fn parses_every_command() {
        assert_eq!(parse("toggle 3 4"), Command::Toggle { x: 3, y: 4 });
        assert_eq!(
            parse("set 0 39 1"),
            Command::Set {
                x: 0,
                y: 39,
                alive: true
            }
        );
        assert_eq!(parse("random"), Command::Random { density: None });
        assert_eq!(parse("random 60"), Command::Random { density: Some(60) });
        assert_eq!(parse("clear"), Command::Clear);
        assert_eq!(
            parse("pattern Glider 5 6"),
            Command::Pattern {
                pattern: GLIDER,
                x: 5,
                y: 6
            }
        );
        assert_eq!(parse("start"), Command::Start);
        assert_eq!(parse("pause"), Command::Pause);
        assert_eq!(parse("step"), Command::Step);
        assert_eq!(parse("speed 50"), Command::Speed { ms: 50 });
        assert_eq!(parse("save"), Command::Save);
        assert_eq!(parse("load"), Command::Load);
        assert_eq!(parse("show"), Command::Show);
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("quit"), Command::Quit);
    }

    #[test]
    fn command_words_are_case_insensitive() {
        assert_eq!(parse("  TOGGLE   1  2 "), Command::Toggle { x: 1, y: 2 });
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Command::parse("fly"),
            Err(ParseError::UnknownCommand { .. })
        ));
        assert_eq!(
            Command::parse("toggle 3"),
            Err(ParseError::MissingArgument {
                command: "toggle",
                argument: "y"
            })
        );
        assert!(matches!(
            Command::parse("toggle -1 2"),
            Err(ParseError::InvalidArgument { argument: "x", .. })
        ));
        assert!(matches!(
            Command::parse("set 1 1 2"),
            Err(ParseError::InvalidArgument { command: "set", .. })
        ));
        assert!(matches!(
            Command::parse("pattern spaceship 1 1"),
            Err(ParseError::UnknownPattern { .. })
        ));
        assert!(matches!(
            Command::parse("clear now"),
            Err(ParseError::TrailingArgument { command: "clear", .. })
        ));
    }

    // =====================================================================
    // Execution
    // =====================================================================

    #[tokio::test]
    async fn toggle_reports_new_state() {
        let engine = engine();
        let reply = execute(&engine, parse("toggle 1 1"), &RenderConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Message("(1, 1) is now alive".to_owned()));
        assert!(engine.get_cell(1, 1).unwrap());
    }

    #[tokio::test]
    async fn out_of_range_is_an_error() {
        let engine = engine();
        let result = execute(&engine, parse("toggle 40 40"), &RenderConfig::default()).await;
        assert!(matches!(
            result,
            Err(ControlError::Grid {
                source: GridError::OutOfBounds { .. }
            })
        ));
    }

    #[tokio::test]
    async fn speed_below_minimum_is_an_error() {
        let engine = engine();
        let result = execute(&engine, parse("speed 1"), &RenderConfig::default()).await;
        assert!(matches!(result, Err(ControlError::InvalidInterval { .. })));
    }

    #[tokio::test]
    async fn step_and_show_render_the_grid() {
        let engine = engine();
        let render = RenderConfig::default();
        execute(&engine, parse("pattern blinker 0 0"), &render)
            .await
            .unwrap();
        let Reply::Message(text) = execute(&engine, parse("step"), &render).await.unwrap() else {
            unreachable!("step never quits");
        };
        assert!(text.starts_with("generation 1 | population 3 | idle\n"));
        assert_eq!(text.lines().count(), 41);

        let Reply::Message(shown) = execute(&engine, parse("show"), &render).await.unwrap() else {
            unreachable!("show never quits");
        };
        assert_eq!(shown, text);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let engine = engine();
        let reply = execute(&engine, Command::Quit, &RenderConfig::default())
            .await
            .unwrap();
        assert_eq!(reply, Reply::Quit);
    }
}

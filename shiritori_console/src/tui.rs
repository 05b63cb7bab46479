use std::fmt;
use std::io;

use crossterm::style::{self, Stylize};
use crossterm::{cursor, execute, terminal};
use instant::Instant;
use shiritori::client::{ClientState, SessionPhase};


// Stand-ins for the two audio objects of the game screen: looping background
// music and the retry alarm. The session core decides when they toggle; the
// terminal shows them as indicators and rings the bell on cue edges.
#[derive(Default)]
pub struct CueState {
    pub music: bool,
    pub alarm: bool,
}

pub fn bell(stdout: &mut io::Stdout) -> io::Result<()> {
    execute!(stdout, style::Print('\x07'))
}

fn writeln_raw(stdout: &mut io::Stdout, v: impl fmt::Display) -> io::Result<()> {
    let s = v.to_string();
    // Note. Not using `lines()` because it removes trailing new line.
    for line in s.split('\n') {
        execute!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
    }
    Ok(())
}

pub fn render(
    stdout: &mut io::Stdout, app_start_time: Instant, state: &ClientState, keyboard_input: &str,
    alert: &Option<String>, cues: &CueState,
) -> io::Result<()> {
    let now = Instant::now();
    execute!(stdout, cursor::MoveTo(0, 0), terminal::Clear(terminal::ClearType::All))?;

    let music = if cues.music { "♪ music" } else { "        " };
    let alarm = if cues.alarm { "⏰ ALARM".red().bold().to_string() } else { String::new() };
    writeln_raw(stdout, format!("Shiritori — {}    {music} {alarm}", state.phase()))?;
    writeln_raw(stdout, "")?;

    match state.phase() {
        SessionPhase::Idle => {
            let start = &state.controls().start;
            if start.enabled {
                writeln_raw(stdout, format!("[ {} ]  press Enter", start.label))?;
            } else {
                writeln_raw(stdout, start.label)?;
            }
        }
        SessionPhase::WaitingForOpponent => {
            writeln_raw(stdout, state.controls().start.label)?;
            writeln_raw(stdout, "Waiting for everyone to join...")?;
        }
        SessionPhase::Active | SessionPhase::WaitingRetry => {
            let tick = state.tick();
            let turn = state.turn();
            writeln_raw(stdout, format!("Time left: {:>3}s", tick.remaining_seconds))?;
            writeln_raw(stdout, format!("Turn ends: {:>3}s", tick.turn_remaining_seconds))?;
            writeln_raw(stdout, "")?;
            writeln_raw(stdout, format!("Previous word: {}", turn.previous_word))?;
            if state.phase() == SessionPhase::WaitingRetry {
                writeln_raw(stdout, "")?;
                writeln_raw(stdout, "The chain broke!".white().on_red().to_string())?;
                if state.controls().retry {
                    writeln_raw(stdout, "Press Enter when you are ready to retry.")?;
                } else {
                    writeln_raw(stdout, "Waiting for the others to confirm...")?;
                }
            } else {
                let prompt =
                    if turn.is_your_turn { "Your turn:" } else { "Waiting for the other player..." };
                writeln_raw(stdout, "")?;
                writeln_raw(stdout, prompt)?;
                // Simulate cursor: real cursor blinking is broken with Show/Hide.
                let show_cursor = now.duration_since(app_start_time).as_millis() % 1000 >= 500;
                let cursor = if show_cursor { '▂' } else { ' ' };
                let input_with_cursor = format!("{keyboard_input}{cursor}");
                let input_style = if state.controls().answer_input {
                    style::Color::White
                } else {
                    style::Color::DarkGrey
                };
                writeln_raw(stdout, input_with_cursor.with(input_style))?;
            }
        }
        SessionPhase::Finished => {
            writeln_raw(stdout, "Game over".with(style::Color::Magenta))?;
            writeln_raw(stdout, "Taking you to your results...")?;
        }
    }

    writeln_raw(stdout, "")?;
    if let Some(alert) = alert {
        writeln_raw(stdout, alert.clone().with(style::Color::Red))?;
    }
    Ok(())
}

// The live game screen: one websocket, one session controller, a crossterm
// surface. Threads follow the reader/writer/terminal/tick split; the main
// loop below is the only place session state is touched.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event as term_event;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::{cursor, execute, terminal};
use instant::Instant;
use scopeguard::defer;
use shiritori::client::{ClientState, FINISH_REDIRECT_DELAY, NotableEvent, SessionPhase};
use shiritori::event::{ShiritoriClientEvent, ShiritoriServerEvent};
use shiritori::kana;
use tungstenite::protocol::Role;

use crate::backend::Backend;
use crate::network::CommunicationError;
use crate::tui::CueState;
use crate::{network, tui};


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOutcome {
    // The session ran to its final tick; the caller shows the results view.
    Finished,
    Quit,
}

enum IncomingEvent {
    Network(ShiritoriServerEvent),
    Terminal(term_event::Event),
    Disconnected,
    Tick,
}

pub fn run(backend: &Backend) -> anyhow::Result<GameOutcome> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
    }
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_local = tx.clone();
    let tx_tick = tx.clone();
    thread::spawn(move || {
        loop {
            let Ok(ev) = term_event::read() else { return };
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                return;
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(100));
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                return;
            }
        }
    });

    let mut client_state = ClientState::new();
    let mut cues = CueState::default();
    let mut keyboard_input = String::new();
    let mut alert: Option<String> = None;
    let mut finished_at: Option<Instant> = None;

    for event in &rx {
        match event {
            IncomingEvent::Network(event) => client_state.process_server_event(event),
            IncomingEvent::Disconnected => client_state.connection_closed(),
            IncomingEvent::Terminal(event) => {
                if let term_event::Event::Key(key) = event {
                    if key.code == KeyCode::Esc
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL))
                    {
                        return Ok(GameOutcome::Quit);
                    }
                    match key.code {
                        KeyCode::Char(ch) => {
                            // The answer field only ever holds folded kana,
                            // like the browser input filter.
                            if client_state.controls().answer_input {
                                if let Some(folded) = kana::fold_answer_char(ch) {
                                    keyboard_input.push(folded);
                                }
                            }
                        }
                        KeyCode::Backspace => {
                            keyboard_input.pop();
                        }
                        KeyCode::Enter => match client_state.phase() {
                            SessionPhase::Idle => {
                                if client_state.controls().start.enabled {
                                    match open_connection(backend, &tx) {
                                        Ok(events_tx) => {
                                            alert = None;
                                            client_state.connect(events_tx);
                                        }
                                        Err(err) => {
                                            log::error!("Failed to connect: {err}");
                                            alert = Some(
                                                "Failed to reach the game server.".to_owned(),
                                            );
                                        }
                                    }
                                }
                            }
                            SessionPhase::Active => {
                                if client_state.controls().send && !keyboard_input.is_empty() {
                                    client_state.send_answer(&keyboard_input);
                                    keyboard_input.clear();
                                }
                            }
                            SessionPhase::WaitingRetry => {
                                if client_state.controls().retry {
                                    client_state.confirm_retry();
                                }
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
            IncomingEvent::Tick => {
                // Repaint and finish-delay checks below.
            }
        }

        while let Some(event) = client_state.next_notable_event() {
            match event {
                NotableEvent::GameStarted => {
                    alert = None;
                    cues.music = true;
                    tui::bell(&mut stdout)?;
                }
                NotableEvent::TurnGained => {
                    tui::bell(&mut stdout)?;
                }
                NotableEvent::RetryAlarmStarted => {
                    cues.music = false;
                    cues.alarm = true;
                    tui::bell(&mut stdout)?;
                }
                NotableEvent::RetryAlarmStopped => {
                    cues.alarm = false;
                    cues.music = true;
                }
                NotableEvent::GameFinished => {
                    // Audio stops now; the navigation happens after the delay.
                    cues.music = false;
                    cues.alarm = false;
                    finished_at = Some(Instant::now());
                }
                NotableEvent::ConnectionLost => {
                    alert = Some("Lost connection to the server.".to_owned());
                }
                NotableEvent::ServerError(reason) => {
                    alert = Some(reason);
                }
            }
        }

        if let Some(at) = finished_at {
            if now_past(at, FINISH_REDIRECT_DELAY) {
                return Ok(GameOutcome::Finished);
            }
        }

        tui::render(&mut stdout, app_start_time, &client_state, &keyboard_input, &alert, &cues)?;
    }
    unreachable!("Tick sender never drops while the loop is alive");
}

fn now_past(since: Instant, delay: Duration) -> bool {
    Instant::now().saturating_duration_since(since) >= delay
}

// Opens the socket and wires both halves to the event loop. The returned
// sender is what the session controller writes through; dropping it shuts
// the writer down.
fn open_connection(
    backend: &Backend, incoming_tx: &mpsc::Sender<IncomingEvent>,
) -> Result<mpsc::Sender<ShiritoriClientEvent>, CommunicationError> {
    let mut socket_in = network::connect(backend.base_url(), backend.session_cookie().as_deref())?;
    let mut socket_out = network::clone_websocket(&socket_in, Role::Client)?;

    let tx_net = incoming_tx.clone();
    thread::spawn(move || {
        loop {
            match network::read_event(&mut socket_in) {
                Ok(Some(event)) => {
                    if tx_net.send(IncomingEvent::Network(event)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(CommunicationError::Serde(err)) => {
                    // Malformed payloads are dropped; the session survives.
                    log::error!("Malformed server message: {err}");
                }
                Err(err) => {
                    log::info!("Reader stopped: {err}");
                    let _ = tx_net.send(IncomingEvent::Disconnected);
                    return;
                }
            }
        }
    });

    let (server_tx, server_rx) = mpsc::channel();
    thread::spawn(move || {
        for event in server_rx {
            if let Err(err) = network::write_event(&mut socket_out, &event) {
                log::error!("Failed to send event: {err}");
                return;
            }
        }
        // Outgoing channel dropped: the session is over, close our half.
        let _ = socket_out.close(None);
    });
    Ok(server_tx)
}

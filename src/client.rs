use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::Duration;

use crate::event::{ShiritoriClientEvent, ShiritoriServerEvent};


// How long the finish screen stays up before the shell navigates to the
// results view. Gameplay audio stops when the game finishes, not when the
// delay elapses.
pub const FINISH_REDIRECT_DELAY: Duration = Duration::from_millis(3000);

pub const START_LABEL: &str = "Start";
pub const START_LABEL_CONNECTING: &str = "Connecting...";

#[derive(Clone, Copy, PartialEq, Eq, Debug, strum::Display)]
pub enum SessionPhase {
    Idle,
    WaitingForOpponent,
    Active,
    WaitingRetry,
    Finished,
}

// Updated only by `onChangeTurn`.
#[derive(Clone, Debug, Default)]
pub struct TurnState {
    pub is_your_turn: bool,
    pub previous_word: String,
}

// Updated only by `onTick`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickState {
    pub remaining_seconds: u32,
    pub turn_remaining_seconds: u32,
    pub waiting_retry: bool,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartControl {
    pub enabled: bool,
    pub label: &'static str,
}

// What the rendering surface needs to know about each interactive control.
// The answer input and its send button always move together.
#[derive(Clone, Debug)]
pub struct Controls {
    pub start: StartControl,
    pub answer_input: bool,
    pub send: bool,
    pub retry: bool,
}

impl Controls {
    fn new() -> Self {
        Controls {
            start: StartControl { enabled: true, label: START_LABEL },
            answer_input: false,
            send: false,
            retry: false,
        }
    }
}

// Cues for the shell to apply, in order. Alarm and finish events are
// edge-triggered: repeated ticks in the same state produce nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotableEvent {
    GameStarted,
    TurnGained,
    RetryAlarmStarted,
    RetryAlarmStopped,
    GameFinished,
    ConnectionLost,
    ServerError(String),
}

// One game attempt. Constructed fresh per session and discarded when the
// player navigates away; nothing here survives the connection.
pub struct ClientState {
    phase: SessionPhase,
    turn: TurnState,
    tick: TickState,
    controls: Controls,
    connection: Option<mpsc::Sender<ShiritoriClientEvent>>,
    finish_announced: bool,
    notable_events: VecDeque<NotableEvent>,
}

impl ClientState {
    pub fn new() -> Self {
        ClientState {
            phase: SessionPhase::Idle,
            turn: TurnState::default(),
            tick: TickState::default(),
            controls: Controls::new(),
            connection: None,
            finish_announced: false,
            notable_events: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase { self.phase }
    pub fn turn(&self) -> &TurnState { &self.turn }
    pub fn tick(&self) -> &TickState { &self.tick }
    pub fn controls(&self) -> &Controls { &self.controls }
    pub fn is_connected(&self) -> bool { self.connection.is_some() }

    // Whether `onStart` has ever been received. Decides how both server errors
    // and connection loss are presented.
    pub fn game_started(&self) -> bool {
        !matches!(self.phase, SessionPhase::Idle | SessionPhase::WaitingForOpponent)
    }

    // Binds the outgoing half of a freshly opened connection. The shell owns
    // the socket; the session only ever sees typed events.
    pub fn connect(&mut self, events_tx: mpsc::Sender<ShiritoriClientEvent>) {
        self.connection = Some(events_tx);
        self.phase = SessionPhase::WaitingForOpponent;
        self.controls.start = StartControl { enabled: false, label: START_LABEL_CONNECTING };
    }

    // The socket closed or errored out. Before `onStart` the attempt is
    // abandoned and the start control restored; a close after the final tick
    // is the server hanging up normally and stays silent.
    pub fn connection_closed(&mut self) {
        if self.connection.take().is_none() {
            return;
        }
        if !self.game_started() {
            let attempt_pending = self.phase == SessionPhase::WaitingForOpponent;
            self.phase = SessionPhase::Idle;
            self.controls.start = StartControl { enabled: true, label: START_LABEL };
            if attempt_pending {
                self.notable_events.push_back(NotableEvent::ConnectionLost);
            }
        } else if !self.finish_announced {
            self.notable_events.push_back(NotableEvent::ConnectionLost);
        }
    }

    // No-op when no connection is open.
    pub fn send_answer(&mut self, word: &str) {
        self.send_event(ShiritoriClientEvent::SendAnswer { word: word.to_owned() });
    }

    // Disables the retry control right away: the server does not acknowledge
    // the confirmation, so this is the only duplicate-send protection.
    // Total no-op when no connection is open.
    pub fn confirm_retry(&mut self) {
        if self.connection.is_none() {
            return;
        }
        self.controls.retry = false;
        self.send_event(ShiritoriClientEvent::ConfirmRetry {});
    }

    pub fn process_server_event(&mut self, event: ShiritoriServerEvent) {
        use ShiritoriServerEvent::*;
        match event {
            Start => {
                self.phase = SessionPhase::Active;
                self.notable_events.push_back(NotableEvent::GameStarted);
            }
            ChangeTurn { prev_answer, your_turn } => {
                let turn_gained = your_turn && !self.turn.is_your_turn;
                self.turn = TurnState { is_your_turn: your_turn, previous_word: prev_answer };
                self.controls.answer_input = your_turn;
                self.controls.send = your_turn;
                if turn_gained {
                    self.notable_events.push_back(NotableEvent::TurnGained);
                }
            }
            Tick { remain_sec, turn_remain_sec, waiting_retry, finished } => {
                let was_waiting_retry = self.tick.waiting_retry;
                self.tick = TickState {
                    remaining_seconds: remain_sec,
                    turn_remaining_seconds: turn_remain_sec,
                    waiting_retry,
                    finished,
                };
                if waiting_retry && !was_waiting_retry {
                    self.controls.retry = true;
                    self.notable_events.push_back(NotableEvent::RetryAlarmStarted);
                } else if !waiting_retry && was_waiting_retry {
                    self.notable_events.push_back(NotableEvent::RetryAlarmStopped);
                }
                if finished {
                    if !self.finish_announced {
                        self.finish_announced = true;
                        self.phase = SessionPhase::Finished;
                        self.notable_events.push_back(NotableEvent::GameFinished);
                    }
                } else if !self.finish_announced && self.game_started() {
                    self.phase = if waiting_retry {
                        SessionPhase::WaitingRetry
                    } else {
                        SessionPhase::Active
                    };
                }
            }
            Error { reason } => {
                if !self.game_started() {
                    self.phase = SessionPhase::Idle;
                    self.controls.start = StartControl { enabled: true, label: START_LABEL };
                }
                self.notable_events.push_back(NotableEvent::ServerError(reason));
            }
        }
    }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> {
        self.notable_events.pop_front()
    }

    fn send_event(&mut self, event: ShiritoriClientEvent) {
        // A dead receiver means the writer is gone; the reader side will
        // report the close, so the failure is not surfaced from here.
        if let Some(tx) = &self.connection {
            let _ = tx.send(event);
        }
    }
}

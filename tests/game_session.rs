// Drives the session controller with server events the way the socket reader
// would, and checks the projection the rendering shell consumes.

use std::sync::mpsc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use shiritori::client::{
    ClientState, FINISH_REDIRECT_DELAY, NotableEvent, START_LABEL, SessionPhase,
};
use shiritori::event::{ShiritoriClientEvent, ShiritoriServerEvent};


fn tick(
    remain_sec: u32, turn_remain_sec: u32, waiting_retry: bool, finished: bool,
) -> ShiritoriServerEvent {
    ShiritoriServerEvent::Tick { remain_sec, turn_remain_sec, waiting_retry, finished }
}

fn change_turn(prev_answer: &str, your_turn: bool) -> ShiritoriServerEvent {
    ShiritoriServerEvent::ChangeTurn { prev_answer: prev_answer.to_owned(), your_turn }
}

struct TestClient {
    state: ClientState,
    outgoing_rx: mpsc::Receiver<ShiritoriClientEvent>,
}

impl TestClient {
    fn connected() -> Self {
        let (tx, rx) = mpsc::channel();
        let mut state = ClientState::new();
        state.connect(tx);
        TestClient { state, outgoing_rx: rx }
    }

    fn started() -> Self {
        let mut client = Self::connected();
        client.state.process_server_event(ShiritoriServerEvent::Start);
        client.drain_notable();
        client
    }

    fn drain_notable(&mut self) -> Vec<NotableEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.state.next_notable_event() {
            events.push(event);
        }
        events
    }

    fn sent(&mut self) -> Vec<ShiritoriClientEvent> { self.outgoing_rx.try_iter().collect() }
}


#[test]
fn start_message_activates_the_session() {
    let mut client = TestClient::connected();
    assert_eq!(client.state.phase(), SessionPhase::WaitingForOpponent);
    assert!(!client.state.controls().start.enabled);

    client.state.process_server_event(ShiritoriServerEvent::Start);
    assert_eq!(client.state.phase(), SessionPhase::Active);
    assert_eq!(client.drain_notable(), vec![NotableEvent::GameStarted]);
}

#[test]
fn alarm_cue_is_edge_triggered() {
    let mut client = TestClient::started();

    client.state.process_server_event(tick(120, 20, false, false));
    assert_eq!(client.drain_notable(), vec![]);

    client.state.process_server_event(tick(120, 20, true, false));
    assert_eq!(client.state.phase(), SessionPhase::WaitingRetry);
    assert!(client.state.controls().retry);
    assert_eq!(client.drain_notable(), vec![NotableEvent::RetryAlarmStarted]);

    // The state holding produces nothing; only transitions do.
    client.state.process_server_event(tick(120, 19, true, false));
    client.state.process_server_event(tick(120, 18, true, false));
    assert_eq!(client.drain_notable(), vec![]);

    client.state.process_server_event(tick(119, 20, false, false));
    assert_eq!(client.state.phase(), SessionPhase::Active);
    assert_eq!(client.drain_notable(), vec![NotableEvent::RetryAlarmStopped]);

    client.state.process_server_event(tick(118, 19, false, false));
    assert_eq!(client.drain_notable(), vec![]);

    // A second break re-arms the alarm.
    client.state.process_server_event(tick(118, 20, true, false));
    assert_eq!(client.drain_notable(), vec![NotableEvent::RetryAlarmStarted]);
}

#[test]
fn turn_controls_follow_your_turn() {
    let mut client = TestClient::started();
    assert!(!client.state.controls().answer_input);
    assert!(!client.state.controls().send);

    client.state.process_server_event(change_turn("ごりら", true));
    assert!(client.state.controls().answer_input);
    assert!(client.state.controls().send);
    assert_eq!(client.state.turn().previous_word, "ごりら");
    assert_eq!(client.drain_notable(), vec![NotableEvent::TurnGained]);

    // Keeping the turn is not gaining it.
    client.state.process_server_event(change_turn("らっぱ", true));
    assert_eq!(client.drain_notable(), vec![]);

    client.state.process_server_event(change_turn("ぱせり", false));
    assert!(!client.state.controls().answer_input);
    assert!(!client.state.controls().send);
    assert_eq!(client.drain_notable(), vec![]);

    client.state.process_server_event(change_turn("りす", true));
    assert_eq!(client.drain_notable(), vec![NotableEvent::TurnGained]);
}

#[test]
fn finish_is_announced_exactly_once() {
    assert_eq!(FINISH_REDIRECT_DELAY, Duration::from_millis(3000));

    let mut client = TestClient::started();
    client.state.process_server_event(tick(1, 5, false, false));
    client.drain_notable();

    client.state.process_server_event(tick(0, 5, false, true));
    assert_eq!(client.state.phase(), SessionPhase::Finished);
    assert_eq!(client.drain_notable(), vec![NotableEvent::GameFinished]);

    client.state.process_server_event(tick(0, 5, false, true));
    assert_eq!(client.drain_notable(), vec![]);
    assert_eq!(client.state.phase(), SessionPhase::Finished);
}

#[test]
fn finish_during_retry_wait_still_finishes() {
    let mut client = TestClient::started();
    client.state.process_server_event(tick(30, 20, true, false));
    assert_eq!(client.drain_notable(), vec![NotableEvent::RetryAlarmStarted]);

    // No retry edge here, so the only cue is the finish itself; the shell
    // silences both audio objects on it.
    client.state.process_server_event(tick(0, 3, true, true));
    assert_eq!(client.state.phase(), SessionPhase::Finished);
    assert_eq!(client.drain_notable(), vec![NotableEvent::GameFinished]);
}

#[test]
fn server_error_before_start_restores_the_start_control() {
    let mut client = TestClient::connected();
    client.state.process_server_event(ShiritoriServerEvent::Error {
        reason: "参加可能な時間ではありません".to_owned(),
    });
    assert_eq!(client.state.phase(), SessionPhase::Idle);
    assert!(client.state.controls().start.enabled);
    assert_eq!(client.state.controls().start.label, START_LABEL);
    assert_eq!(
        client.drain_notable(),
        vec![NotableEvent::ServerError("参加可能な時間ではありません".to_owned())]
    );

    // The server hangs up after the error; the close stays silent because the
    // attempt was already abandoned.
    client.state.connection_closed();
    assert_eq!(client.drain_notable(), vec![]);
    assert_eq!(client.state.phase(), SessionPhase::Idle);
}

#[test]
fn server_error_after_start_leaves_the_start_control_alone() {
    let mut client = TestClient::started();
    let start_before = client.state.controls().start.clone();
    client.state.process_server_event(ShiritoriServerEvent::Error { reason: "oops".to_owned() });
    assert_eq!(client.state.controls().start, start_before);
    assert_eq!(client.state.phase(), SessionPhase::Active);
    assert_eq!(client.drain_notable(), vec![NotableEvent::ServerError("oops".to_owned())]);
}

#[test]
fn connection_loss_before_start_abandons_the_attempt() {
    let mut client = TestClient::connected();
    client.state.connection_closed();
    assert_eq!(client.state.phase(), SessionPhase::Idle);
    assert!(client.state.controls().start.enabled);
    assert_eq!(client.state.controls().start.label, START_LABEL);
    assert_eq!(client.drain_notable(), vec![NotableEvent::ConnectionLost]);
    assert!(!client.state.is_connected());

    // Closing twice reports nothing new.
    client.state.connection_closed();
    assert_eq!(client.drain_notable(), vec![]);
}

#[test]
fn sending_answers_goes_through_the_connection() {
    let mut client = TestClient::started();
    client.state.process_server_event(change_turn("ごりら", true));
    client.state.send_answer("らっこ");
    assert_eq!(
        client.sent(),
        vec![ShiritoriClientEvent::SendAnswer { word: "らっこ".to_owned() }]
    );
}

#[test]
fn confirm_retry_disables_the_control_and_sends_once() {
    let mut client = TestClient::started();
    client.state.process_server_event(tick(60, 20, true, false));
    client.drain_notable();
    assert!(client.state.controls().retry);

    client.state.confirm_retry();
    assert!(!client.state.controls().retry);
    assert_eq!(client.sent(), vec![ShiritoriClientEvent::ConfirmRetry {}]);

    // Later ticks in the same waiting state must not re-enable the control.
    client.state.process_server_event(tick(60, 19, true, false));
    assert!(!client.state.controls().retry);
}

#[test]
fn offline_operations_are_noops() {
    let mut state = ClientState::new();
    state.send_answer("ねこ");
    state.confirm_retry();
    assert_eq!(state.phase(), SessionPhase::Idle);
    assert!(state.controls().start.enabled);
    assert!(state.next_notable_event().is_none());
}

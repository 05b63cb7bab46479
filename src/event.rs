use serde::{Deserialize, Serialize};
use serde_json::Value;


// Client -> server. Adjacent tagging produces the `{"type": ..., "data": ...}`
// envelope; struct variants keep `data` an object even when there are no fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ShiritoriClientEvent {
    SendAnswer { word: String },
    ConfirmRetry {},
}

// Server -> client. Parsed by hand from the envelope instead of a tagged serde
// enum: the server is free to add event types, and unknown ones must be skipped
// rather than fail the whole message stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShiritoriServerEvent {
    Start,
    ChangeTurn {
        prev_answer: String,
        your_turn: bool,
    },
    Tick {
        remain_sec: u32,
        turn_remain_sec: u32,
        waiting_retry: bool,
        finished: bool,
    },
    Error {
        reason: String,
    },
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeTurnData {
    prev_answer: String,
    your_turn: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickData {
    remain_sec: u32,
    turn_remain_sec: u32,
    #[serde(default)]
    waiting_retry: bool,
    #[serde(default)]
    finished: bool,
}

#[derive(Deserialize)]
struct ErrorData {
    reason: String,
}

// Returns `Ok(None)` for event types this client does not know about. A message
// that fails to parse is an error for the caller to log and discard; it must
// never reach the session state.
pub fn parse_server_event(text: &str) -> Result<Option<ShiritoriServerEvent>, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let event = match envelope.event_type.as_str() {
        "onStart" => Some(ShiritoriServerEvent::Start),
        "onChangeTurn" => {
            let data: ChangeTurnData = serde_json::from_value(envelope.data)?;
            Some(ShiritoriServerEvent::ChangeTurn {
                prev_answer: data.prev_answer,
                your_turn: data.your_turn,
            })
        }
        "onTick" => {
            let data: TickData = serde_json::from_value(envelope.data)?;
            Some(ShiritoriServerEvent::Tick {
                remain_sec: data.remain_sec,
                turn_remain_sec: data.turn_remain_sec,
                waiting_retry: data.waiting_retry,
                finished: data.finished,
            })
        }
        "onError" => {
            let data: ErrorData = serde_json::from_value(envelope.data)?;
            Some(ShiritoriServerEvent::Error { reason: data.reason })
        }
        other => {
            log::debug!("Ignoring unknown server event type: {}", other);
            None
        }
    };
    Ok(event)
}

// Response shapes for the backend's HTTP endpoints. The contracts are owned
// by the server; this module only mirrors them.

use serde::{Deserialize, Serialize};


// `POST /users/new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

// `GET /groups/invitations` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub invitation_id: u64,
    pub inviter: String,
}

// `GET /users/statistics` entries, most recent day first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsDay {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub success: bool,
}

// The statistics endpoint answers with a bare `0` instead of an array when
// nothing has been recorded yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StatisticsResponse {
    Days(Vec<StatisticsDay>),
    NoData(u8),
}

impl StatisticsResponse {
    pub fn into_days(self) -> Vec<StatisticsDay> {
        match self {
            StatisticsResponse::Days(days) => days,
            StatisticsResponse::NoData(_) => Vec::new(),
        }
    }
}

// `POST /groups/wake_up_time` accepts zero-padded `HH:MM` only. Checked
// client-side to keep an obviously bad request from reaching the server.
pub fn is_valid_wake_up_time(time: &str) -> bool {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
    let minute = (digits[2] - b'0') * 10 + (digits[3] - b'0');
    hour <= 23 && minute <= 59
}

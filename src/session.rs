use serde::{Deserialize, Serialize};


// `GET /users/info` payload, nested the way the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub members: Vec<String>,
    pub wake_up_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_name: String,
    pub joined_group: bool,
    pub group_info: GroupInfo,
    pub success_rate: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(UserInfo),
}

impl Session {
    pub fn user_info(&self) -> Option<&UserInfo> {
        match self {
            Session::LoggedOut => None,
            Session::LoggedIn(user_info) => Some(user_info),
        }
    }
    pub fn user_name(&self) -> Option<&str> { self.user_info().map(|info| info.user_name.as_str()) }
    pub fn logout(&mut self) { *self = Session::LoggedOut; }
}

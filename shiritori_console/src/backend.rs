// Blocking HTTP client for the game backend. Form-encoded requests in,
// status codes and JSON out; the status-code conventions follow the server
// (302 = found, 201 = invited, 202 = joined).

use std::sync::Arc;

use anyhow::{Context, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use shiritori::api::{Invitation, RegisterResponse, StatisticsDay, StatisticsResponse};
use shiritori::session::UserInfo;
use url::Url;


pub struct Backend {
    base_url: Url,
    cookies: Arc<Jar>,
    client: Client,
}

impl Backend {
    pub fn new(server_address: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(server_address)
            .with_context(|| format!("Bad server address: {server_address}"))?;
        let cookies = Arc::new(Jar::default());
        let client = Client::builder()
            // `/users/find` answers with a bare 302: the status code is the
            // payload, so redirects must never be followed.
            .redirect(Policy::none())
            .cookie_provider(Arc::clone(&cookies))
            .build()?;
        Ok(Backend { base_url, cookies, client })
    }

    pub fn base_url(&self) -> &Url { &self.base_url }

    // The login session cookie, for forwarding on the websocket upgrade.
    pub fn session_cookie(&self) -> Option<String> {
        let header = self.cookies.cookies(&self.base_url)?;
        header.to_str().ok().map(|s| s.to_owned())
    }

    pub fn register(&self, user_name: &str, password: &str) -> anyhow::Result<RegisterResponse> {
        let resp = self
            .client
            .post(self.endpoint("/users/new")?)
            .form(&[("userName", user_name), ("password", password)])
            .send()
            .context("Failed to reach the server")?;
        Ok(resp.json()?)
    }

    pub fn login(&self, user_name: &str, password: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(self.endpoint("/users/login")?)
            .form(&[("userName", user_name), ("password", password)])
            .send()
            .context("Failed to reach the server")?;
        match resp.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => bail!("Login rejected: check the user name and password"),
            status => bail!("Login failed: server returned {status}"),
        }
    }

    pub fn user_info(&self) -> anyhow::Result<UserInfo> {
        let resp = self.client.get(self.endpoint("/users/info")?).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    pub fn find_user(&self, user_name: &str) -> anyhow::Result<bool> {
        let mut url = self.endpoint("/users/find")?;
        url.query_pairs_mut().append_pair("userName", user_name);
        let resp = self.client.get(url).send()?;
        Ok(resp.status() == StatusCode::FOUND)
    }

    pub fn invite(&self, player: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(self.endpoint("/groups/invite")?)
            .form(&[("player", player)])
            .send()?;
        if resp.status() != StatusCode::CREATED {
            bail!("Invitation failed: server returned {}", resp.status());
        }
        Ok(())
    }

    pub fn invitations(&self) -> anyhow::Result<Vec<Invitation>> {
        let resp = self
            .client
            .get(self.endpoint("/groups/invitations")?)
            .send()?
            .error_for_status()?;
        Ok(resp.json()?)
    }

    pub fn accept_invitation(&self, invitation_id: u64) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(self.endpoint("/groups/join")?)
            .form(&[("invitationId", invitation_id.to_string())])
            .send()?;
        if resp.status() != StatusCode::ACCEPTED {
            bail!("Could not join the group: server returned {}", resp.status());
        }
        Ok(())
    }

    pub fn decline_invitation(&self, invitation_id: u64) -> anyhow::Result<()> {
        self.client
            .post(self.endpoint("/groups/decline_invitation")?)
            .form(&[("invitationId", invitation_id.to_string())])
            .send()?
            .error_for_status()?;
        Ok(())
    }

    pub fn set_wake_up_time(&self, time: &str) -> anyhow::Result<()> {
        if !shiritori::api::is_valid_wake_up_time(time) {
            bail!("Wake-up time must be HH:MM, e.g. 07:30");
        }
        self.client
            .post(self.endpoint("/groups/wake_up_time")?)
            .form(&[("time", time)])
            .send()?
            .error_for_status()?;
        Ok(())
    }

    pub fn statistics(&self) -> anyhow::Result<Vec<StatisticsDay>> {
        let resp = self
            .client
            .get(self.endpoint("/users/statistics")?)
            .send()?
            .error_for_status()?;
        Ok(resp.json::<StatisticsResponse>()?.into_days())
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

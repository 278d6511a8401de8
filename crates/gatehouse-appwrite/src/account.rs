//! Account service: current user, sessions, identities, recovery.

use gatehouse_core::Result;
use serde_json::json;

use crate::{AppwriteClient, IdentityList, Session, SessionList, Token, User};

/// Account endpoints, scoped to the client's credentials.
#[derive(Clone, Copy, Debug)]
pub struct Account<'a> {
    client: &'a AppwriteClient,
}

impl<'a> Account<'a> {
    pub(crate) fn new(client: &'a AppwriteClient) -> Self {
        Self { client }
    }

    /// The user owning the current session.
    pub async fn get(&self) -> Result<User> {
        let url = self.client.url(&["account"])?;
        self.client
            .send_json("account.get", |http| http.get(url.clone()))
            .await
    }

    /// Create a new account.
    pub async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User> {
        let url = self.client.url(&["account"])?;
        let body = json!({
            "userId": user_id,
            "email": email,
            "password": password,
            "name": name,
        });
        self.client
            .send_json("account.create", |http| http.post(url.clone()).json(&body))
            .await
    }

    /// Log in with email and password.
    ///
    /// The session secret is only populated when the client uses an API key.
    pub async fn create_email_password_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let url = self.client.url(&["account", "sessions", "email"])?;
        let body = json!({ "email": email, "password": password });
        self.client
            .send_json("account.createEmailPasswordSession", |http| {
                http.post(url.clone()).json(&body)
            })
            .await
    }

    /// Fetch a session by id; `"current"` means the calling session.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let url = self.client.url(&["account", "sessions", session_id])?;
        self.client
            .send_json("account.getSession", |http| http.get(url.clone()))
            .await
    }

    /// Extend a session's expiry.
    pub async fn update_session(&self, session_id: &str) -> Result<Session> {
        let url = self.client.url(&["account", "sessions", session_id])?;
        self.client
            .send_json("account.updateSession", |http| http.patch(url.clone()))
            .await
    }

    /// Log a session out.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.client.url(&["account", "sessions", session_id])?;
        self.client
            .send("account.deleteSession", |http| http.delete(url.clone()))
            .await?;
        Ok(())
    }

    /// All sessions of the current user.
    pub async fn list_sessions(&self) -> Result<SessionList> {
        let url = self.client.url(&["account", "sessions"])?;
        self.client
            .send_json("account.listSessions", |http| http.get(url.clone()))
            .await
    }

    /// OAuth identities linked to the current user.
    pub async fn list_identities(&self) -> Result<IdentityList> {
        let url = self.client.url(&["account", "identities"])?;
        self.client
            .send_json("account.listIdentities", |http| http.get(url.clone()))
            .await
    }

    /// Unlink an OAuth identity.
    pub async fn delete_identity(&self, identity_id: &str) -> Result<()> {
        let url = self.client.url(&["account", "identities", identity_id])?;
        self.client
            .send("account.deleteIdentity", |http| http.delete(url.clone()))
            .await?;
        Ok(())
    }

    /// Email a password recovery link pointing at `redirect_url`.
    pub async fn create_recovery(&self, email: &str, redirect_url: &str) -> Result<Token> {
        let url = self.client.url(&["account", "recovery"])?;
        let body = json!({ "email": email, "url": redirect_url });
        self.client
            .send_json("account.createRecovery", |http| {
                http.post(url.clone()).json(&body)
            })
            .await
    }

    /// Complete password recovery with the secret from the email link.
    pub async fn update_recovery(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<Token> {
        let url = self.client.url(&["account", "recovery"])?;
        let body = json!({ "userId": user_id, "secret": secret, "password": password });
        self.client
            .send_json("account.updateRecovery", |http| {
                http.put(url.clone()).json(&body)
            })
            .await
    }
}

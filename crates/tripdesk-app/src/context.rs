//! Everything a command needs: config, REST client, session store, and a
//! way to reach the realtime feed.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tripdesk_api::{ApiClient, ApiSettings, SessionStore, SessionUser};
use tripdesk_common::{Result, TripdeskError};
use tripdesk_config::TripdeskConfig;
use tripdesk_realtime::{
    ClientConfig, ConnectionStatus, EventName, RealtimeClient, RealtimeError, RealtimeEvent,
    ReconnectPolicy,
};

pub struct AppContext {
    pub config: TripdeskConfig,
    /// `--config`, when given.
    pub config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn from_config(config: TripdeskConfig) -> Result<Self> {
        let settings = ApiSettings::new(config.api.base_url.as_str())
            .with_timeouts(config.api.connect_timeout(), config.api.request_timeout());
        let api = ApiClient::new(settings)?;
        let sessions = SessionStore::open(config.session.path_override())?;
        Ok(Self::new(config, api, sessions))
    }

    pub fn new(config: TripdeskConfig, api: ApiClient, sessions: SessionStore) -> Self {
        Self {
            config,
            config_path: None,
            api,
            sessions,
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Realtime settings taken from `[realtime]`.
    pub fn realtime_config(&self) -> ClientConfig {
        let rt = &self.config.realtime;
        ClientConfig::new(rt.url.as_str())
            .with_reconnect(ReconnectPolicy::new(
                rt.reconnect_delay(),
                rt.max_reconnect_attempts,
            ))
            .with_connect_timeout(rt.connect_timeout())
    }

    /// Client for long-lived use; reconnects per config.
    pub fn realtime_client(&self) -> RealtimeClient {
        RealtimeClient::new(self.realtime_config())
    }

    /// Client for a single send; gives up on the first failure.
    pub fn oneshot_client(&self) -> RealtimeClient {
        RealtimeClient::new(
            self.realtime_config()
                .with_reconnect(ReconnectPolicy::disabled()),
        )
    }

    pub fn require_session(&self) -> Result<SessionUser> {
        self.sessions
            .load()
            .ok_or_else(|| TripdeskError::Session("not logged in; run `tripdesk login` first".into()))
    }

    pub fn require_admin(&self) -> Result<SessionUser> {
        let user = self.require_session()?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(TripdeskError::Session(format!(
                "{} is not an administrator",
                user.username
            )))
        }
    }

    /// Tell other watchers that something changed, when `announce_mutations`
    /// is on. The mutation already happened, so failures only warn.
    pub async fn announce<T: Serialize + ?Sized>(&self, kind: &str, data: &T) {
        if !self.config.realtime.announce_mutations {
            return;
        }
        let client = self.oneshot_client();
        if let Err(e) = send_once(&client, kind, data).await {
            tracing::warn!(kind, error = %e, "Failed to announce update");
        }
    }
}

/// Connect `client`, send one envelope, and disconnect.
pub async fn send_once<T: Serialize + ?Sized>(
    client: &RealtimeClient,
    kind: &str,
    data: &T,
) -> std::result::Result<(), RealtimeError> {
    let result = async {
        wait_connected(client).await?;
        client.send(kind, data)
    }
    .await;
    client.disconnect();
    result
}

/// Start connecting and wait for the outcome of the first attempt cycle.
///
/// Resolves once the client reports `connected`, or fails when the
/// connection closes with no retry left to wait for.
pub async fn wait_connected(client: &RealtimeClient) -> std::result::Result<(), RealtimeError> {
    if client.is_connected() {
        return Ok(());
    }
    let mut events = client.event_stream(&[EventName::Connection]);
    client.connect();

    // The cause of a failed attempt is logged by the client itself.
    let limit = client.config().connect_timeout + Duration::from_secs(1);
    let outcome = tokio::time::timeout(limit, async {
        while let Some(event) = events.recv().await {
            match event {
                RealtimeEvent::Connection(ConnectionStatus::Connected) => return Ok(()),
                RealtimeEvent::Connection(ConnectionStatus::ReconnectExhausted) => break,
                _ => {}
            }
        }
        Err(RealtimeError::NotConnected)
    })
    .await;

    outcome.unwrap_or(Err(RealtimeError::Timeout(limit)))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_trait::async_trait;
    use tripdesk_realtime::{Connector, Transport};

    use super::*;

    fn context_in(dir: &Path) -> AppContext {
        let mut config = TripdeskConfig::default();
        config.session.path = dir.join("session.json").display().to_string();
        AppContext::from_config(config).unwrap()
    }

    fn user(is_admin: bool) -> SessionUser {
        SessionUser {
            user_id: 1,
            username: "ana".into(),
            is_admin,
        }
    }

    #[test]
    fn commands_need_a_session() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        let err = ctx.require_session().unwrap_err();
        assert!(err.to_string().contains("not logged in"));

        ctx.sessions.save(&user(false)).unwrap();
        assert_eq!(ctx.require_session().unwrap(), user(false));
    }

    #[test]
    fn admin_commands_reject_regular_users() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        ctx.sessions.save(&user(false)).unwrap();
        let err = ctx.require_admin().unwrap_err();
        assert_eq!(err.to_string(), "session error: ana is not an administrator");

        ctx.sessions.save(&user(true)).unwrap();
        assert!(ctx.require_admin().unwrap().is_admin);
    }

    #[test]
    fn realtime_config_follows_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.config.realtime.url = "ws://hub:9000/ws".into();
        ctx.config.realtime.reconnect_delay_ms = 250;
        ctx.config.realtime.max_reconnect_attempts = 2;

        let rt = ctx.realtime_config();
        assert_eq!(rt.url, "ws://hub:9000/ws");
        assert_eq!(rt.reconnect.delay, Duration::from_millis(250));
        assert_eq!(rt.reconnect.max_attempts, 2);
        assert_eq!(ctx.oneshot_client().config().reconnect.max_attempts, 0);
    }

    struct Refuse;

    #[async_trait]
    impl Connector for Refuse {
        async fn connect(&self, _url: &str) -> std::result::Result<Box<dyn Transport>, RealtimeError> {
            Err(RealtimeError::WebSocket("connection refused".into()))
        }
    }

    /// Accepts and then stays silent; records what the client writes.
    struct Accept(tokio::sync::mpsc::UnboundedSender<String>);

    struct Quiet(tokio::sync::mpsc::UnboundedSender<String>);

    #[async_trait]
    impl Connector for Accept {
        async fn connect(&self, _url: &str) -> std::result::Result<Box<dyn Transport>, RealtimeError> {
            Ok(Box::new(Quiet(self.0.clone())))
        }
    }

    #[async_trait]
    impl Transport for Quiet {
        async fn send_text(&mut self, text: String) -> std::result::Result<(), RealtimeError> {
            let _ = self.0.send(text);
            Ok(())
        }

        async fn next_text(&mut self) -> Option<std::result::Result<String, RealtimeError>> {
            std::future::pending().await
        }

        async fn close(&mut self) {}
    }

    fn oneshot(connector: impl Connector) -> RealtimeClient {
        RealtimeClient::with_connector(
            ClientConfig::new("ws://test/ws")
                .with_reconnect(ReconnectPolicy::disabled())
                .with_connect_timeout(Duration::from_secs(1)),
            connector,
        )
    }

    #[tokio::test]
    async fn wait_connected_fails_once_retries_run_out() {
        let client = oneshot(Refuse);
        let err = wait_connected(&client).await.unwrap_err();
        assert!(matches!(err, RealtimeError::NotConnected), "{err}");
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn send_once_delivers_then_disconnects() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let client = oneshot(Accept(tx));

        send_once(&client, "TRIP_UPDATE", &serde_json::json!({"id": 7}))
            .await
            .unwrap();

        let written: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"type": "TRIP_UPDATE", "data": {"id": 7}})
        );
        assert!(!client.is_connected());
        assert_eq!(client.listener_count(EventName::Connection), 0);
    }
}

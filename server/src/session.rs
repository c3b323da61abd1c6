//! Per-connection protocol state machine
//!
//! ```text
//! Unauthenticated -> Menu -> { Game | Leaderboard } -> Menu -> ... -> Terminated
//! ```
//!
//! Every state except `Menu` returns to `Menu` once its exchange finishes.
//! Transport failures and protocol violations end the session from any state.

use crate::corpus::PhraseCorpus;
use crate::credentials::CredentialProvider;
use crate::error::SessionError;
use crate::game::GameState;
use crate::leaderboard::Leaderboard;
use crate::pool::WorkerId;
use log::{debug, info, warn};
use shared::{
    Connection, GameStatus, MenuSelection, ACK, AUTH_ACCEPTED, AUTH_REJECTED, FIELD_DELIMITER,
    PASSWORD_PROMPT, READY, USERNAME_PROMPT,
};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Shared collaborators every session works against
#[derive(Clone)]
pub struct ServerContext {
    pub credentials: Arc<dyn CredentialProvider>,
    pub corpus: Arc<dyn PhraseCorpus>,
    pub leaderboard: Arc<Leaderboard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Menu,
    Game,
    Leaderboard,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The client quit from the menu
    Completed,
    /// Unknown username or wrong password
    Rejected,
}

pub struct Session<S> {
    conn: Connection<S>,
    context: ServerContext,
    worker_id: WorkerId,
    username: Option<String>,
    state: SessionState,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, context: ServerContext, worker_id: WorkerId) -> Self {
        Self {
            conn: Connection::new(stream),
            context,
            worker_id,
            username: None,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Drives the session until the client quits, is rejected or fails
    pub async fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        let result = self.drive().await;
        self.state = SessionState::Terminated;
        result
    }

    async fn drive(&mut self) -> Result<SessionOutcome, SessionError> {
        let Some(username) = self.authenticate().await? else {
            return Ok(SessionOutcome::Rejected);
        };
        self.state = SessionState::Menu;

        loop {
            match self.select().await? {
                MenuSelection::Play => {
                    self.state = SessionState::Game;
                    self.play(&username).await?;
                }
                MenuSelection::ShowLeaderboard => {
                    self.state = SessionState::Leaderboard;
                    self.send_leaderboard().await?;
                }
                MenuSelection::Quit => {
                    info!("Worker {}: '{}' quit", self.worker_id, username);
                    return Ok(SessionOutcome::Completed);
                }
            }
            self.state = SessionState::Menu;
        }
    }

    /// Returns the username once the client proves it owns the account
    async fn authenticate(&mut self) -> Result<Option<String>, SessionError> {
        self.conn.send(USERNAME_PROMPT).await?;
        let username = self.conn.receive().await?;
        info!("Worker {}: received username '{}'", self.worker_id, username);

        let Some(expected) = self.context.credentials.lookup(&username).map(str::to_owned) else {
            warn!("Worker {}: unknown username '{}'", self.worker_id, username);
            self.conn.send(AUTH_REJECTED).await?;
            return Ok(None);
        };

        self.conn.send(PASSWORD_PROMPT).await?;
        let password = self.conn.receive().await?;
        if password != expected {
            warn!("Worker {}: wrong password for '{}'", self.worker_id, username);
            self.conn.send(AUTH_REJECTED).await?;
            return Ok(None);
        }

        self.conn.send(AUTH_ACCEPTED).await?;
        info!("Worker {}: '{}' logged in", self.worker_id, username);
        self.username = Some(username.clone());
        Ok(Some(username))
    }

    async fn select(&mut self) -> Result<MenuSelection, SessionError> {
        let message = self.conn.receive().await?;
        let selection = MenuSelection::parse(&message)?;
        debug!("Worker {}: menu selection {:?}", self.worker_id, selection);
        Ok(selection)
    }

    /// Plays one round; the result is recorded before the final update goes out
    async fn play(&mut self, username: &str) -> Result<(), SessionError> {
        let mut game = GameState::start(self.context.corpus.as_ref())?;
        self.conn.send(&game.update().encode()).await?;

        loop {
            let message = self.conn.receive().await?;
            let status = game.guess(parse_guess(&message)?)?;

            if status.is_finished() {
                let won = status == GameStatus::Won;
                info!(
                    "Worker {}: '{}' {} a game",
                    self.worker_id,
                    username,
                    if won { "won" } else { "lost" }
                );
                self.context.leaderboard.record_result(username, won)?;
            }

            self.conn.send(&game.update().encode()).await?;
            if status.is_finished() {
                return Ok(());
            }
        }
    }

    /// Streams the ranked entries, waiting for an acknowledgement after each
    async fn send_leaderboard(&mut self) -> Result<(), SessionError> {
        let entries = self.context.leaderboard.snapshot();
        debug!(
            "Worker {}: sending {} leaderboard entries",
            self.worker_id,
            entries.len()
        );

        self.conn.send(&entries.len().to_string()).await?;
        self.receive_ack().await?;

        for entry in &entries {
            self.conn.send(&entry.to_record().encode()).await?;
            self.receive_ack().await?;
        }

        self.conn.send(READY).await?;
        Ok(())
    }

    async fn receive_ack(&mut self) -> Result<(), SessionError> {
        let message = self.conn.receive().await?;
        if message != ACK {
            debug!("Worker {}: acknowledgement was '{}'", self.worker_id, message);
        }
        Ok(())
    }
}

/// First character of a guess message
fn parse_guess(message: &str) -> Result<char, SessionError> {
    match message.chars().next() {
        None => Err(SessionError::ProtocolViolation("empty guess".to_string())),
        Some(FIELD_DELIMITER) => Err(SessionError::ProtocolViolation(format!(
            "guess '{}' is the field delimiter",
            FIELD_DELIMITER
        ))),
        Some(letter) => Ok(letter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Phrase, PhraseList};
    use crate::credentials::CredentialStore;
    use shared::TransportError;
    use std::io;
    use tokio_test::io::Builder;

    fn context(phrase: Phrase) -> ServerContext {
        ServerContext {
            credentials: Arc::new(CredentialStore::from_pairs([
                ("alice", "secret"),
                ("bob", "hunter2"),
            ])),
            corpus: Arc::new(PhraseList::new(vec![phrase]).unwrap()),
            leaderboard: Arc::new(Leaderboard::new()),
        }
    }

    fn xy() -> ServerContext {
        context(Phrase::new("x", "y"))
    }

    fn login(builder: &mut Builder) -> &mut Builder {
        builder
            .write(USERNAME_PROMPT.as_bytes())
            .read(b"alice")
            .write(PASSWORD_PROMPT.as_bytes())
            .read(b"secret")
            .write(b"true")
    }

    #[tokio::test]
    async fn test_login_then_quit() {
        let mut builder = Builder::new();
        login(&mut builder).read(b"3");

        let mut session = Session::new(builder.build(), xy(), 0);
        assert_eq!(session.state(), SessionState::Unauthenticated);

        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
        assert_eq!(session.state(), SessionState::Terminated);
        assert_eq!(session.username(), Some("alice"));
    }

    #[tokio::test]
    async fn test_line_terminated_input_accepted() {
        let mock = Builder::new()
            .write(USERNAME_PROMPT.as_bytes())
            .read(b"alice\r\n")
            .write(PASSWORD_PROMPT.as_bytes())
            .read(b"secret\n")
            .write(b"true")
            .read(b"3\n")
            .build();

        let mut session = Session::new(mock, xy(), 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
    }

    #[tokio::test]
    async fn test_unknown_username_rejected_without_password_prompt() {
        let mock = Builder::new()
            .write(USERNAME_PROMPT.as_bytes())
            .read(b"mallory")
            .write(b"false")
            .build();

        let mut session = Session::new(mock, xy(), 1);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Rejected);
        assert_eq!(session.username(), None);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let mock = Builder::new()
            .write(USERNAME_PROMPT.as_bytes())
            .read(b"bob")
            .write(PASSWORD_PROMPT.as_bytes())
            .read(b"secret")
            .write(b"false")
            .build();

        let ctx = xy();
        let mut session = Session::new(mock, ctx.clone(), 1);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Rejected);
        assert!(ctx.leaderboard.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_selection_terminates() {
        let mut builder = Builder::new();
        login(&mut builder).read(b"4");

        let mut session = Session::new(builder.build(), xy(), 0);
        assert!(matches!(
            session.run().await,
            Err(SessionError::ProtocolViolation(_))
        ));
        assert_eq!(session.state(), SessionState::Terminated);
    }

    #[tokio::test]
    async fn test_peer_close_at_menu() {
        let mut builder = Builder::new();
        login(&mut builder);

        let mut session = Session::new(builder.build(), xy(), 0);
        assert!(matches!(
            session.run().await,
            Err(SessionError::Transport(TransportError::Closed))
        ));
    }

    #[tokio::test]
    async fn test_winning_game_is_recorded() {
        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"1")
            .write(b" |12|_ _|O")
            .read(b"x")
            .write(b"x|11|x _|O")
            .read(b"yz")
            .write(b"xy|10|x y|W")
            .read(b"3");

        let ctx = xy();
        let mut session = Session::new(builder.build(), ctx.clone(), 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);

        let entries = ctx.leaderboard.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_record().encode(), "alice|1|1");
    }

    #[tokio::test]
    async fn test_finished_game_recorded_when_final_update_fails() {
        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"1")
            .write(b" |12|_ _|O")
            .read(b"x")
            .write(b"x|11|x _|O")
            .read(b"y")
            .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "peer gone"));
        let mock = builder.build();
        // Release the builder's reference to the write error so the mock can take it.
        drop(builder);

        let ctx = xy();
        let mut session = Session::new(mock, ctx.clone(), 0);
        assert!(matches!(
            session.run().await,
            Err(SessionError::Transport(_))
        ));
        assert_eq!(ctx.leaderboard.snapshot()[0].to_record().encode(), "alice|1|1");
    }

    #[tokio::test]
    async fn test_abandoned_game_is_not_recorded() {
        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"1")
            .write(b" |12|_ _|O")
            .read(b"x")
            .write(b"x|11|x _|O");

        let ctx = xy();
        let mut session = Session::new(builder.build(), ctx.clone(), 0);
        assert!(session.run().await.is_err());
        assert!(ctx.leaderboard.is_empty());
    }

    #[tokio::test]
    async fn test_losing_game_is_recorded() {
        let mut builder = Builder::new();
        login(&mut builder).read(b"1").write(b" |12|_ _|O");

        let mut guessed = String::new();
        for remaining in (0..12).rev() {
            guessed.push('q');
            let status = if remaining == 0 { 'L' } else { 'O' };
            builder
                .read(b"q")
                .write(format!("{}|{}|_ _|{}", guessed, remaining, status).as_bytes());
        }
        builder.read(b"3");

        let ctx = xy();
        let mut session = Session::new(builder.build(), ctx.clone(), 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
        assert_eq!(ctx.leaderboard.snapshot()[0].to_record().encode(), "alice|0|1");
    }

    #[tokio::test]
    async fn test_delimiter_guess_is_violation() {
        let mut builder = Builder::new();
        login(&mut builder).read(b"1").write(b" |12|_ _|O").read(b"|");

        let ctx = xy();
        let mut session = Session::new(builder.build(), ctx.clone(), 0);
        assert!(matches!(
            session.run().await,
            Err(SessionError::ProtocolViolation(_))
        ));
        assert!(ctx.leaderboard.is_empty());
    }

    #[tokio::test]
    async fn test_empty_guess_is_violation() {
        let mut builder = Builder::new();
        login(&mut builder).read(b"1").write(b" |12|_ _|O").read(b"\n");

        let mut session = Session::new(builder.build(), xy(), 0);
        assert!(matches!(
            session.run().await,
            Err(SessionError::ProtocolViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_leaderboard_streaming() {
        let ctx = xy();
        ctx.leaderboard.record_result("alice", true).unwrap();
        ctx.leaderboard.record_result("bob", false).unwrap();

        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"2")
            .write(b"2")
            .read(b"Y")
            .write(b"bob|0|1")
            .read(b"Y")
            .write(b"alice|1|1")
            .read(b"Y")
            .write(b"Y")
            .read(b"3");

        let mut session = Session::new(builder.build(), ctx, 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
    }

    #[tokio::test]
    async fn test_empty_leaderboard() {
        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"2")
            .write(b"0")
            .read(b"Y")
            .write(b"Y")
            .read(b"3");

        let mut session = Session::new(builder.build(), xy(), 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
    }

    #[tokio::test]
    async fn test_menu_loops_between_activities() {
        let mut builder = Builder::new();
        login(&mut builder)
            .read(b"1")
            .write(b" |12|_ _|O")
            .read(b"y")
            .write(b"y|11|_ y|O")
            .read(b"x")
            .write(b"yx|10|x y|W")
            .read(b"2")
            .write(b"1")
            .read(b"Y")
            .write(b"alice|1|1")
            .read(b"Y")
            .write(b"Y")
            .read(b"3");

        let mut session = Session::new(builder.build(), xy(), 0);
        assert_eq!(session.run().await.unwrap(), SessionOutcome::Completed);
    }

    #[test]
    fn test_parse_guess() {
        assert_eq!(parse_guess("a").unwrap(), 'a');
        assert_eq!(parse_guess("abc").unwrap(), 'a');
        assert!(parse_guess("").is_err());
        assert!(parse_guess("|").is_err());
    }
}

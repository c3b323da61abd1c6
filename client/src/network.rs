use crate::error::ClientError;
use crate::input::{parse_guess, parse_selection, Prompt};
use crate::rendering::Renderer;
use log::{debug, info};
use shared::{
    decode_count, Connection, GameUpdate, LeaderboardRecord, MenuSelection, ACK, AUTH_ACCEPTED,
    AUTH_REJECTED, READY,
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite};

/// Interactive hangman client over one server connection
pub struct Client<S, R, W> {
    conn: Connection<S>,
    prompt: Prompt<R>,
    renderer: Renderer<W>,
    username: String,
}

impl<S, R, W> Client<S, R, W>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(stream: S, input: R, output: W) -> Self {
        Self {
            conn: Connection::new(stream),
            prompt: Prompt::new(input),
            renderer: Renderer::new(output),
            username: String::new(),
        }
    }

    /// Logs in, then serves menu choices until the user quits
    pub async fn run(&mut self) -> Result<(), ClientError> {
        self.renderer.banner()?;
        self.authenticate().await?;
        self.renderer.welcome()?;

        loop {
            self.renderer.menu()?;
            let selection = self.read_selection().await?;
            self.conn.send(selection.as_str()).await?;

            match selection {
                MenuSelection::Play => self.play().await?,
                MenuSelection::ShowLeaderboard => self.show_leaderboard().await?,
                MenuSelection::Quit => break,
            }
        }

        info!("Quitting");
        self.renderer.goodbye()?;
        Ok(())
    }

    async fn authenticate(&mut self) -> Result<(), ClientError> {
        let prompt = self.conn.receive().await?;
        self.renderer.server_prompt(&prompt)?;
        self.username = self.prompt.next_token().await?;
        self.conn.send(&self.username).await?;

        let reply = self.conn.receive().await?;
        if reply == AUTH_REJECTED {
            return Err(ClientError::Rejected);
        }
        self.renderer.server_prompt(&reply)?;
        let password = self.prompt.next_token().await?;
        self.conn.send(&password).await?;

        if self.conn.receive().await? != AUTH_ACCEPTED {
            return Err(ClientError::Rejected);
        }
        info!("Logged in as {}", self.username);
        Ok(())
    }

    /// Re-prompts locally until the user picks a valid option
    async fn read_selection(&mut self) -> Result<MenuSelection, ClientError> {
        loop {
            self.renderer.selection_prompt()?;
            let token = self.prompt.next_token().await?;
            match parse_selection(&token) {
                Some(selection) => return Ok(selection),
                None => self.renderer.invalid_selection()?,
            }
        }
    }

    async fn play(&mut self) -> Result<(), ClientError> {
        loop {
            let update = GameUpdate::decode(&self.conn.receive().await?)?;
            self.renderer.game_update(&update)?;

            if update.status.is_finished() {
                self.renderer.game_over(update.status, &self.username)?;
                return Ok(());
            }

            let letter = loop {
                self.renderer.guess_prompt()?;
                if let Some(letter) = parse_guess(&self.prompt.next_token().await?) {
                    break letter;
                }
            };
            self.conn.send(&letter.to_string()).await?;
        }
    }

    async fn show_leaderboard(&mut self) -> Result<(), ClientError> {
        let count = decode_count(&self.conn.receive().await?)?;
        self.conn.send(ACK).await?;

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(LeaderboardRecord::decode(&self.conn.receive().await?)?);
            self.conn.send(ACK).await?;
        }
        self.renderer.leaderboard(&records)?;

        let ready = self.conn.receive().await?;
        if ready != READY {
            debug!("Unexpected ready signal '{}'", ready);
        }
        Ok(())
    }
}

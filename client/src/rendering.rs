//! Terminal output for the hangman client

use shared::{GameStatus, GameUpdate, LeaderboardRecord};
use std::io::{self, Write};

const DOUBLE_RULE: &str = "====================================================================";
const SINGLE_RULE: &str = "--------------------------------------------------------------------";

/// Writes every screen of the client to `out`
pub struct Renderer<W> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn banner(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "\n{rule}\n\nWelcome to the Online Hangman Gaming System\n\n{rule}\n\n\n",
            rule = DOUBLE_RULE
        )?;
        writeln!(self.out, "You are required to logon with your Username and Password")?;
        self.out.flush()
    }

    /// Echoes a prompt received from the server, without a newline
    pub fn server_prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "\n\n{}\n\n\nWelcome to the Hangman Gaming System\n",
            SINGLE_RULE
        )?;
        self.out.flush()
    }

    pub fn menu(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "\nPlease enter a selection\n<1> Play Hangman\n<2> Show Leaderboard\n<3> Quit\n\n"
        )?;
        self.out.flush()
    }

    pub fn selection_prompt(&mut self) -> io::Result<()> {
        write!(self.out, "Select Option 1 - 3: ")?;
        self.out.flush()
    }

    pub fn invalid_selection(&mut self) -> io::Result<()> {
        write!(self.out, "\nIncorrect Selection\nPlease ")?;
        self.out.flush()
    }

    pub fn game_update(&mut self, update: &GameUpdate) -> io::Result<()> {
        writeln!(self.out, "\n{}", SINGLE_RULE)?;
        writeln!(self.out, "\nGuessed letters: {}", update.guessed_letters)?;
        writeln!(self.out, "\nNumber of guesses left: {}", update.remaining_attempts)?;
        writeln!(self.out, "\nWord: {}", update.masked_phrase)?;
        self.out.flush()
    }

    pub fn guess_prompt(&mut self) -> io::Result<()> {
        write!(self.out, "\nEnter your guess: ")?;
        self.out.flush()
    }

    pub fn game_over(&mut self, status: GameStatus, username: &str) -> io::Result<()> {
        writeln!(self.out, "\nGame over\n")?;
        match status {
            GameStatus::Won => writeln!(
                self.out,
                "\nWell done {}! You won this round of Hangman!",
                username
            )?,
            _ => writeln!(
                self.out,
                "\nBad luck {}! You have run out of guesses. The hangman got you!",
                username
            )?,
        }
        writeln!(self.out, "Updating leaderboard...")?;
        writeln!(self.out, "\n{}", SINGLE_RULE)?;
        self.out.flush()
    }

    pub fn leaderboard(&mut self, records: &[LeaderboardRecord]) -> io::Result<()> {
        if records.is_empty() {
            writeln!(self.out, "\n{}\n", DOUBLE_RULE)?;
            writeln!(
                self.out,
                "There is no information currently stored in the Leader Board. Try again later"
            )?;
            writeln!(self.out, "\n{}", DOUBLE_RULE)?;
            return self.out.flush();
        }

        writeln!(self.out, "\n{}\n", DOUBLE_RULE)?;
        for record in records {
            writeln!(self.out, "Player - {}", record.username)?;
            writeln!(self.out, "Number of games won - {}", record.games_won)?;
            writeln!(self.out, "Number of games played - {}", record.total_games)?;
            writeln!(self.out, "\n{}\n", DOUBLE_RULE)?;
        }
        self.out.flush()
    }

    pub fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nExiting Hangman")?;
        self.out.flush()
    }
}

//! Ranked win/loss records shared by every session
//!
//! Entries are kept sorted in rank order at all times: ascending by games
//! won, then by win rate, then by username. Writers go through the gated
//! lock in [`crate::gate`], so a `snapshot` never sees a half-applied result.

use crate::gate::GatedRwLock;
use shared::LeaderboardRecord;
use std::cmp::Ordering;
use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("cannot grow leaderboard: {0}")]
    Exhausted(#[from] TryReserveError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub games_won: u32,
    pub total_games: u32,
    pub win_rate: f64,
}

impl LeaderboardEntry {
    fn first_game(username: &str, won: bool) -> Self {
        let mut entry = Self {
            username: username.to_string(),
            games_won: 0,
            total_games: 0,
            win_rate: 0.0,
        };
        entry.record(won);
        entry
    }

    fn record(&mut self, won: bool) {
        if won {
            self.games_won += 1;
        }
        self.total_games += 1;
        self.win_rate = self.games_won as f64 / self.total_games as f64;
    }

    /// Rank order: games won, then win rate, then username
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.games_won
            .cmp(&other.games_won)
            .then_with(|| self.win_rate.total_cmp(&other.win_rate))
            .then_with(|| self.username.cmp(&other.username))
    }

    pub fn to_record(&self) -> LeaderboardRecord {
        LeaderboardRecord {
            username: self.username.clone(),
            games_won: self.games_won,
            total_games: self.total_games,
        }
    }
}

#[derive(Default)]
pub struct Leaderboard {
    entries: GatedRwLock<Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished game for `username`
    pub fn record_result(&self, username: &str, won: bool) -> Result<(), LeaderboardError> {
        let mut entries = self.entries.write();

        match entries.iter().position(|entry| entry.username == username) {
            Some(index) => {
                entries[index].record(won);
                relocate(&mut entries, index);
            }
            None => {
                entries.try_reserve(1)?;
                let entry = LeaderboardEntry::first_game(username, won);
                let position = entries
                    .iter()
                    .position(|existing| existing.rank_cmp(&entry) == Ordering::Greater)
                    .unwrap_or(entries.len());
                entries.insert(position, entry);
            }
        }

        Ok(())
    }

    /// Copy of the entries in rank order
    pub fn snapshot(&self) -> Vec<LeaderboardEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Moves the entry at `index` back into rank order after its counts changed.
///
/// A win can only push an entry towards the tail and a loss only towards the
/// head, so the scan starts at the neighbour it overtook and stops as soon as
/// order is restored.
fn relocate(entries: &mut [LeaderboardEntry], index: usize) {
    let len = entries.len();

    if index + 1 < len && entries[index].rank_cmp(&entries[index + 1]) == Ordering::Greater {
        let mut target = index + 1;
        while target + 1 < len && entries[target + 1].rank_cmp(&entries[index]) == Ordering::Less
        {
            target += 1;
        }
        entries[index..=target].rotate_left(1);
    } else if index > 0 && entries[index - 1].rank_cmp(&entries[index]) == Ordering::Greater {
        let mut target = index - 1;
        while target > 0 && entries[target - 1].rank_cmp(&entries[index]) == Ordering::Greater {
            target -= 1;
        }
        entries[target..=index].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use std::thread;

    fn names(board: &Leaderboard) -> Vec<String> {
        board.snapshot().into_iter().map(|e| e.username).collect()
    }

    fn assert_sorted(entries: &[LeaderboardEntry]) {
        for pair in entries.windows(2) {
            assert_eq!(
                pair[0].rank_cmp(&pair[1]),
                Ordering::Less,
                "{:?} should rank before {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Leaderboard::new();
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn test_fewer_wins_rank_first() {
        let board = Leaderboard::new();
        board.record_result("alice", true).unwrap();
        board.record_result("bob", false).unwrap();

        assert_eq!(names(&board), vec!["bob", "alice"]);
    }

    #[test]
    fn test_full_tie_is_alphabetical() {
        let board = Leaderboard::new();
        board.record_result("carol", true).unwrap();
        board.record_result("alice", true).unwrap();
        board.record_result("bob", true).unwrap();

        assert_eq!(names(&board), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_equal_wins_order_by_rate() {
        let board = Leaderboard::new();
        // dave: 1 of 1, erin: 1 of 2
        board.record_result("dave", true).unwrap();
        board.record_result("erin", true).unwrap();
        board.record_result("erin", false).unwrap();

        assert_eq!(names(&board), vec!["erin", "dave"]);
    }

    #[test]
    fn test_wins_outrank_rate() {
        let board = Leaderboard::new();
        board.record_result("amy", true).unwrap();
        for i in 0..10 {
            board.record_result("ben", i != 0).unwrap();
        }

        // amy has the better rate (1/1 vs 9/10) but fewer wins
        assert_eq!(names(&board), vec!["amy", "ben"]);
    }

    #[test]
    fn test_counts_and_rate() {
        let board = Leaderboard::new();
        board.record_result("maolin", true).unwrap();
        board.record_result("maolin", false).unwrap();
        board.record_result("maolin", true).unwrap();

        let entries = board.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].games_won, 2);
        assert_eq!(entries[0].total_games, 3);
        assert_approx_eq!(entries[0].win_rate, 2.0 / 3.0, 1e-9);

        let record = entries[0].to_record();
        assert_eq!(record.encode(), "maolin|2|3");
    }

    #[test]
    fn test_win_moves_entry_towards_tail() {
        let board = Leaderboard::new();
        for name in ["alice", "bob", "carol"] {
            board.record_result(name, false).unwrap();
        }
        assert_eq!(names(&board), vec!["alice", "bob", "carol"]);

        board.record_result("alice", true).unwrap();
        assert_eq!(names(&board), vec!["bob", "carol", "alice"]);
    }

    #[test]
    fn test_loss_moves_entry_towards_head() {
        let board = Leaderboard::new();
        board.record_result("frank", true).unwrap();
        board.record_result("dave", true).unwrap();
        board.record_result("dave", true).unwrap();
        board.record_result("erin", true).unwrap();
        board.record_result("erin", true).unwrap();
        board.record_result("erin", false).unwrap();
        assert_eq!(names(&board), vec!["frank", "erin", "dave"]);

        // dave drops to 2/3 and now ties erin on wins and rate
        board.record_result("dave", false).unwrap();
        assert_eq!(names(&board), vec!["frank", "dave", "erin"]);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let board = Leaderboard::new();
        board.record_result("x", true).unwrap();
        board.record_result("y", false).unwrap();

        assert_eq!(board.snapshot(), board.snapshot());
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let board = Leaderboard::new();
        board.record_result("x", true).unwrap();

        let before = board.snapshot();
        board.record_result("x", true).unwrap();

        assert_eq!(before[0].games_won, 1);
        assert_eq!(board.snapshot()[0].games_won, 2);
    }

    #[test]
    fn test_random_results_keep_order_and_counts() {
        let board = Leaderboard::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut model: HashMap<String, (u32, u32)> = HashMap::new();

        for _ in 0..500 {
            let name = format!("user{}", rng.gen_range(0..12));
            let won = rng.gen_bool(0.4);
            board.record_result(&name, won).unwrap();

            let counts = model.entry(name).or_insert((0, 0));
            counts.0 += won as u32;
            counts.1 += 1;

            assert_sorted(&board.snapshot());
        }

        let entries = board.snapshot();
        assert_eq!(entries.len(), model.len());
        for entry in entries {
            assert_eq!(model[&entry.username], (entry.games_won, entry.total_games));
        }
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        const WRITERS: usize = 4;
        const GAMES_PER_WRITER: usize = 250;

        let board = Arc::new(Leaderboard::new());

        thread::scope(|scope| {
            for w in 0..WRITERS {
                let board = Arc::clone(&board);
                scope.spawn(move || {
                    for g in 0..GAMES_PER_WRITER {
                        let name = format!("player{}", (w + g) % 8);
                        board.record_result(&name, (w * g) % 3 == 0).unwrap();
                    }
                });
            }

            for _ in 0..4 {
                let board = Arc::clone(&board);
                scope.spawn(move || {
                    let mut last_total = 0;
                    for _ in 0..200 {
                        let entries = board.snapshot();
                        assert_sorted(&entries);

                        let unique: HashSet<_> = entries.iter().map(|e| &e.username).collect();
                        assert_eq!(unique.len(), entries.len());

                        let total: u32 = entries.iter().map(|e| e.total_games).sum();
                        assert!(total >= last_total);
                        assert!(total as usize <= WRITERS * GAMES_PER_WRITER);
                        last_total = total;
                    }
                });
            }
        });

        let total: u32 = board.snapshot().iter().map(|e| e.total_games).sum();
        assert_eq!(total as usize, WRITERS * GAMES_PER_WRITER);
    }
}

//! Turn-based scoring state machine for dartboard games.
//!
//! A [`GameSession`] holds the roster, the active game mode, and each
//! player's throw history. Score events arrive as
//! [`dartscore_core::ScoreResult`] values, from automatic detection or a
//! manual entry surface; the session makes no distinction between the two.
//!
//! Every mutating operation takes `&mut self`, so exclusive access is the
//! single serialization point the scoring rules need. A host sharing the
//! session between a capture callback and a UI thread wraps it in a
//! `Mutex<GameSession>`.

mod session;

pub use session::{
    GameMode, GameSession, Player, PlayerStanding, Standings, Throw, MAX_PLAYERS, THROWS_PER_TURN,
};

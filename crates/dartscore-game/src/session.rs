use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use dartscore_core::ScoreResult;

/// Largest supported roster.
pub const MAX_PLAYERS: usize = 6;
/// Throws per player turn before rotation.
pub const THROWS_PER_TURN: usize = 3;

/// Supported game modes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[serde(rename = "301")]
    ThreeOhOne,
    #[serde(rename = "501")]
    FiveOhOne,
    Cricket,
    Practice,
}

impl GameMode {
    /// Countdown start for 301/501; `None` for accumulating modes.
    pub fn starting_score(&self) -> Option<u32> {
        match self {
            GameMode::ThreeOhOne => Some(301),
            GameMode::FiveOhOne => Some(501),
            GameMode::Cricket | GameMode::Practice => None,
        }
    }
}

/// One registered throw. Immutable once appended to a player's history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Throw {
    pub id: String,
    pub value: u32,
    pub multiplier: u32,
    pub timestamp_ms: u64,
}

impl Throw {
    /// Points awarded for this throw.
    pub fn points(&self) -> u32 {
        self.value * self.multiplier
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    /// Running `sum(value * multiplier)` over this game's throws. The
    /// displayed score for cricket/practice; countdown modes derive their
    /// remainder from the throw history instead.
    pub score: u32,
    pub throws: Vec<Throw>,
}

impl Player {
    fn new(index: usize) -> Self {
        Self {
            id: format!("player-{}", index + 1),
            name: format!("Player {}", index + 1),
            score: 0,
            throws: Vec::new(),
        }
    }
}

/// Per-player snapshot for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub id: String,
    pub name: String,
    /// Countdown remainder for 301/501 (may go negative), accumulated
    /// total otherwise.
    pub display_score: i64,
    pub darts_thrown: usize,
}

/// Snapshot of the whole session for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Standings {
    pub mode: GameMode,
    pub active: bool,
    pub current_player: usize,
    pub players: Vec<PlayerStanding>,
}

/// The turn-based scoring state machine.
///
/// Two states: idle and in-progress. Mode and roster changes are only
/// honored while idle; throw registration only while in progress.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    players: Vec<Player>,
    current_player: usize,
    mode: GameMode,
    active: bool,
    #[serde(skip)]
    throw_seq: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(2, GameMode::FiveOhOne)
    }
}

impl GameSession {
    /// Create an idle session with `player_count` default-named players,
    /// clamped to `1..=MAX_PLAYERS`.
    pub fn new(player_count: usize, mode: GameMode) -> Self {
        let count = player_count.clamp(1, MAX_PLAYERS);
        Self {
            players: (0..count).map(Player::new).collect(),
            current_player: 0,
            mode,
            active: false,
            throw_seq: 0,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    /// Change the game mode. Only honored while idle; returns whether the
    /// mode was changed.
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if self.active {
            log::warn!("ignoring mode change to {mode:?} during an active game");
            return false;
        }
        self.mode = mode;
        true
    }

    /// Resize the roster while idle. Existing players keep their slot by
    /// index; added slots get default-named players; shrinking truncates.
    /// Returns whether the roster was changed.
    pub fn resize_roster(&mut self, player_count: usize) -> bool {
        if self.active {
            log::warn!("ignoring roster resize during an active game");
            return false;
        }
        if !(1..=MAX_PLAYERS).contains(&player_count) {
            log::warn!("ignoring roster resize to {player_count} players");
            return false;
        }
        if player_count < self.players.len() {
            self.players.truncate(player_count);
        } else {
            for index in self.players.len()..player_count {
                self.players.push(Player::new(index));
            }
        }
        self.current_player = self.current_player.min(self.players.len() - 1);
        true
    }

    /// Start a new game: every score and history is reset, the first
    /// player is up.
    pub fn start(&mut self) {
        for player in &mut self.players {
            player.score = 0;
            player.throws.clear();
        }
        self.current_player = 0;
        self.active = true;
        log::info!(
            "game started: {:?} with {} players",
            self.mode,
            self.players.len()
        );
    }

    /// End the game. Histories are kept for display.
    pub fn end(&mut self) {
        self.active = false;
        log::info!("game ended");
    }

    /// Register one throw for the player currently up.
    ///
    /// A no-op returning `false` while no game is in progress — automatic
    /// detection may race a manual `end()`, and a late event must not
    /// corrupt the final standings. Rotation happens exactly when the
    /// current player's own throw count reaches a multiple of
    /// [`THROWS_PER_TURN`].
    pub fn register_throw(&mut self, score: ScoreResult) -> bool {
        if !self.active {
            log::debug!("dropping throw {score:?}: no active game");
            return false;
        }

        let timestamp_ms = now_ms();
        self.throw_seq += 1;
        let throw = Throw {
            id: format!("{}-{}", timestamp_ms, self.throw_seq),
            value: score.value,
            multiplier: score.multiplier,
            timestamp_ms,
        };

        let player = &mut self.players[self.current_player];
        player.score += throw.points();
        player.throws.push(throw);

        if player.throws.len() % THROWS_PER_TURN == 0 {
            self.current_player = (self.current_player + 1) % self.players.len();
        }
        true
    }

    /// Countdown remainder for a player in 301/501; `None` in other modes
    /// or for an out-of-range index. Can go negative: this layer enforces
    /// no bust rule.
    pub fn remaining(&self, player_index: usize) -> Option<i64> {
        let starting = self.mode.starting_score()?;
        let player = self.players.get(player_index)?;
        let spent: i64 = player.throws.iter().map(|t| t.points() as i64).sum();
        Some(starting as i64 - spent)
    }

    /// Mode-appropriate display score for one player.
    pub fn display_score(&self, player_index: usize) -> Option<i64> {
        match self.mode.starting_score() {
            Some(_) => self.remaining(player_index),
            None => self
                .players
                .get(player_index)
                .map(|p| p.score as i64),
        }
    }

    /// Snapshot of the session for rendering.
    pub fn standings(&self) -> Standings {
        Standings {
            mode: self.mode,
            active: self.active,
            current_player: self.current_player,
            players: self
                .players
                .iter()
                .enumerate()
                .map(|(index, player)| PlayerStanding {
                    id: player.id.clone(),
                    name: player.name.clone(),
                    display_score: self.display_score(index).unwrap_or(0),
                    darts_thrown: player.throws.len(),
                })
                .collect(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

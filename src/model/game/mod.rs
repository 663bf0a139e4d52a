//! Minigame rules and the registry of running sessions.
//!
//! The rule types here are plain state machines; the Discord side of each game
//! (collecting messages and reactions, rendering embeds) lives in
//! `service::game`.

pub mod indian_poker;
pub mod king;
pub mod yacht;

use std::collections::HashMap;

use serenity::all::UserId;
use tokio::task::AbortHandle;

use crate::error::game::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    IndianPoker,
    Yacht,
}

/// A running game and the task driving it.
#[derive(Debug)]
pub struct Session {
    pub id: u64,
    pub kind: GameKind,
    pub players: Vec<UserId>,
    task: Option<AbortHandle>,
}

impl Session {
    /// Stops the driving task, if one was attached.
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Running sessions, at most one per player.
#[derive(Debug, Default)]
pub struct GameRegistry {
    next_id: u64,
    sessions: HashMap<u64, Session>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session for `players`.
    ///
    /// # Returns
    /// - `Ok(u64)` - Id of the new session
    /// - `Err(GameError::DuplicatePlayer)` - A player is listed twice
    /// - `Err(GameError::AlreadyPlaying)` - A player is in another session
    pub fn open(&mut self, kind: GameKind, players: &[UserId]) -> Result<u64, GameError> {
        for (index, player) in players.iter().enumerate() {
            if players[..index].contains(player) {
                return Err(GameError::DuplicatePlayer(*player));
            }
            if self.session_of(*player).is_some() {
                return Err(GameError::AlreadyPlaying(*player));
            }
        }

        self.next_id += 1;
        let id = self.next_id;
        self.sessions.insert(
            id,
            Session {
                id,
                kind,
                players: players.to_vec(),
                task: None,
            },
        );
        Ok(id)
    }

    /// Attaches the task driving session `id` so that closing it can abort the task.
    pub fn attach(&mut self, id: u64, task: AbortHandle) {
        match self.sessions.get_mut(&id) {
            Some(session) => session.task = Some(task),
            // Session already finished before the task handle was attached.
            None => task.abort(),
        }
    }

    pub fn session_of(&self, player: UserId) -> Option<&Session> {
        self.sessions
            .values()
            .find(|session| session.players.contains(&player))
    }

    /// Removes and aborts the session `player` takes part in.
    pub fn close_for(&mut self, player: UserId) -> Option<Session> {
        let id = self.session_of(player)?.id;
        let session = self.sessions.remove(&id)?;
        session.abort();
        Some(session)
    }

    /// Removes a session that ended on its own.
    pub fn finish(&mut self, id: u64) -> Option<Session> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

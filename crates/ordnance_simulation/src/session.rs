//! Состояние игровой сессии (ключ, исход)
//!
//! Явный resource вместо глобального флага: ключ у игрока,
//! сессия закончена победой или смертью.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SessionOutcome {
    /// Дверь открыта ключом
    Won,
    PlayerDied,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub has_key: bool,
    pub outcome: Option<SessionOutcome>,
}

impl SessionState {
    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    /// Зафиксировать исход (первый побеждает)
    pub fn finish(&mut self, outcome: SessionOutcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}

/// Run condition: симуляция идёт, пока исход не определён
pub fn session_running(session: Res<SessionState>) -> bool {
    session.is_running()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_outcome_wins() {
        let mut session = SessionState::default();
        assert!(session.is_running());

        assert!(session.finish(SessionOutcome::PlayerDied));
        assert!(!session.finish(SessionOutcome::Won));
        assert_eq!(session.outcome, Some(SessionOutcome::PlayerDied));
        assert!(!session.is_running());
    }
}

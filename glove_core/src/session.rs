//! Exercise session state driven by host commands.

use crate::protocol::{Command, ResistanceLevel};
use tracing::{info, warn};

/// Whether an exercise is running and at what resistance.
///
/// The resistance level can only change while no exercise is in
/// progress; a `SetResistance` received mid-session is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExerciseSession {
    started: bool,
    level: ResistanceLevel,
}

impl ExerciseSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn level(&self) -> ResistanceLevel {
        self.level
    }

    /// Duty applied while a motor pulse is active.
    pub fn duty(&self) -> u8 {
        self.level.duty()
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetResistance(level) => {
                if self.started {
                    warn!(
                        level = level.as_u8(),
                        "resistance change rejected while exercise is running"
                    );
                } else {
                    info!(level = level.as_u8(), duty = level.duty(), "resistance set");
                    self.level = level;
                }
            }
            Command::Start => {
                info!("exercise started");
                self.started = true;
            }
            Command::Stop => {
                info!("exercise stopped");
                self.started = false;
            }
        }
    }

    /// Stop triggered by a motor fault rather than a host command.
    pub fn force_stop(&mut self) {
        if self.started {
            warn!("exercise force-stopped");
        }
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_easiest_level_not_started() {
        let s = ExerciseSession::new();
        assert!(!s.started());
        assert_eq!(s.level(), ResistanceLevel::L5);
        assert_eq!(s.duty(), 100);
    }

    #[test]
    fn level_changes_only_while_stopped() {
        let mut s = ExerciseSession::new();
        s.apply(Command::SetResistance(ResistanceLevel::L3));
        assert_eq!(s.duty(), 150);
        s.apply(Command::Start);
        s.apply(Command::SetResistance(ResistanceLevel::L1));
        assert_eq!(s.duty(), 150, "mid-session change must be rejected");
        s.apply(Command::Stop);
        s.apply(Command::SetResistance(ResistanceLevel::L1));
        assert_eq!(s.duty(), 200);
    }

    #[test]
    fn force_stop_ends_the_session() {
        let mut s = ExerciseSession::new();
        s.apply(Command::Start);
        s.force_stop();
        assert!(!s.started());
    }
}

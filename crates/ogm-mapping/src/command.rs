//! Move commands issued to the robot between scans.

use ogm_odometry::Pose;

/// A rotate-then-travel command and the odometry pose it produced.
///
/// The resulting pose is relative to the start of the mapping session, not to
/// the start of this command, and is already in the map frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    rotate: i32,
    travel: i32,
    result: Option<Pose>,
}

impl MoveCommand {
    /// Creates a command that has not been executed yet.
    ///
    /// # Arguments
    /// * `rotate` - Clockwise rotation in degrees
    /// * `travel` - Forward travel in millimetres
    pub const fn new(rotate: i32, travel: i32) -> Self {
        MoveCommand {
            rotate,
            travel,
            result: None,
        }
    }

    /// Creates a command that has already been executed.
    pub const fn executed(rotate: i32, travel: i32, result: Pose) -> Self {
        MoveCommand {
            rotate,
            travel,
            result: Some(result),
        }
    }

    /// Requested rotation in degrees.
    pub fn rotate(&self) -> i32 {
        self.rotate
    }

    /// Requested travel in millimetres.
    pub fn travel(&self) -> i32 {
        self.travel
    }

    /// Map-frame pose reported after execution, if the command has run.
    pub fn result(&self) -> Option<&Pose> {
        self.result.as_ref()
    }

    /// Whether the command has been executed.
    pub fn is_executed(&self) -> bool {
        self.result.is_some()
    }

    /// Records the pose produced by executing the command.
    ///
    /// Returns `false` and leaves the command unchanged if a result was
    /// already recorded.
    pub fn record_result(&mut self, pose: Pose) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(pose);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_recorded_once() {
        let mut cmd = MoveCommand::new(90, 200);
        assert_eq!(cmd.rotate(), 90);
        assert_eq!(cmd.travel(), 200);
        assert!(!cmd.is_executed());
        assert!(cmd.result().is_none());

        assert!(cmd.record_result(Pose::new(200.0, 0.0, 90.0)));
        assert!(!cmd.record_result(Pose::new(0.0, 0.0, 0.0)));
        assert_eq!(cmd.result(), Some(&Pose::new(200.0, 0.0, 90.0)));
    }

    #[test]
    fn test_executed_constructor() {
        let cmd = MoveCommand::executed(0, 50, Pose::new(0.0, 50.0, 0.0));
        assert!(cmd.is_executed());
        assert_eq!(cmd.result().map(|p| p.y), Some(50.0));
    }
}

use std::fmt;

use serde::Serialize;

/// One of the independent workflows the coordinator drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Resume,
    Jd,
    Research,
    Persona,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Resume => "resume",
            Channel::Jd => "jd",
            Channel::Research => "research",
            Channel::Persona => "persona",
        }
    }

    /// Whether failures on this channel are shown to the user.
    /// Research and persona failures are only logged.
    pub fn surfaces_errors(&self) -> bool {
        matches!(self, Channel::Resume | Channel::Jd)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-channel state as the user sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    InProgress,
    Error(String),
}

impl WorkflowState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, WorkflowState::InProgress)
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match self {
            WorkflowState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The four channel states, addressed by `Channel`.
///
/// A channel is held from the moment an attempt claims it until the attempt
/// finishes, which can be longer than it shows `InProgress`: an upload holds
/// its channel while the file picker is open but only turns `InProgress`
/// once a file is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelBoard {
    pub resume: WorkflowState,
    pub jd: WorkflowState,
    pub research: WorkflowState,
    pub persona: WorkflowState,
    #[serde(skip)]
    held: [bool; 4],
}

impl ChannelBoard {
    pub fn get(&self, channel: Channel) -> &WorkflowState {
        match channel {
            Channel::Resume => &self.resume,
            Channel::Jd => &self.jd,
            Channel::Research => &self.research,
            Channel::Persona => &self.persona,
        }
    }

    fn get_mut(&mut self, channel: Channel) -> &mut WorkflowState {
        match channel {
            Channel::Resume => &mut self.resume,
            Channel::Jd => &mut self.jd,
            Channel::Research => &mut self.research,
            Channel::Persona => &mut self.persona,
        }
    }

    fn slot(channel: Channel) -> usize {
        match channel {
            Channel::Resume => 0,
            Channel::Jd => 1,
            Channel::Research => 2,
            Channel::Persona => 3,
        }
    }

    /// Whether an attempt owns the channel or it shows `InProgress`.
    pub fn is_busy(&self, channel: Channel) -> bool {
        self.held[Self::slot(channel)] || self.get(channel).is_in_progress()
    }

    /// Claims the channel for one attempt without touching its visible
    /// state. Returns false if the channel is busy.
    pub fn try_hold(&mut self, channel: Channel) -> bool {
        if self.is_busy(channel) {
            return false;
        }
        self.held[Self::slot(channel)] = true;
        true
    }

    /// Idle/Error -> InProgress for the holder. A prior error is dropped,
    /// never stacked.
    pub fn start(&mut self, channel: Channel) {
        debug_assert!(self.held[Self::slot(channel)], "{channel} started without a hold");
        *self.get_mut(channel) = WorkflowState::InProgress;
    }

    /// Records the terminal state of an attempt and frees the channel.
    /// Errors on channels that do not surface them collapse to Idle.
    pub fn finish(&mut self, channel: Channel, outcome: WorkflowState) {
        let outcome = match outcome {
            WorkflowState::Error(_) if !channel.surfaces_errors() => WorkflowState::Idle,
            WorkflowState::InProgress => WorkflowState::Idle,
            other => other,
        };
        *self.get_mut(channel) = outcome;
        self.held[Self::slot(channel)] = false;
    }

    /// Frees a channel whose attempt ended without `finish`. Only an
    /// `InProgress` left behind is reset; an earlier error stays.
    pub fn release(&mut self, channel: Channel) {
        self.held[Self::slot(channel)] = false;
        let slot = self.get_mut(channel);
        if slot.is_in_progress() {
            *slot = WorkflowState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin(board: &mut ChannelBoard, channel: Channel) -> bool {
        if !board.try_hold(channel) {
            return false;
        }
        board.start(channel);
        true
    }

    fn fail(board: &mut ChannelBoard, channel: Channel, message: &str) {
        assert!(board.try_hold(channel));
        board.finish(channel, WorkflowState::Error(message.to_string()));
    }

    #[test]
    fn test_hold_rejects_second_attempt_on_same_channel() {
        let mut board = ChannelBoard::default();
        assert!(begin(&mut board, Channel::Resume));
        assert!(!board.try_hold(Channel::Resume));
        assert!(board.get(Channel::Resume).is_in_progress());
    }

    #[test]
    fn test_hold_before_start_keeps_visible_state() {
        let mut board = ChannelBoard::default();
        fail(&mut board, Channel::Resume, "bad file");

        assert!(board.try_hold(Channel::Resume));
        assert!(board.is_busy(Channel::Resume));
        assert!(!board.try_hold(Channel::Resume));
        assert_eq!(board.resume.error(), Some("bad file"));

        board.release(Channel::Resume);
        assert!(!board.is_busy(Channel::Resume));
        assert_eq!(board.resume.error(), Some("bad file"));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut board = ChannelBoard::default();
        fail(&mut board, Channel::Resume, "bad file");
        assert!(begin(&mut board, Channel::Jd));
        assert!(begin(&mut board, Channel::Research));
        assert_eq!(board.get(Channel::Resume).error(), Some("bad file"));
    }

    #[test]
    fn test_start_from_error_clears_message() {
        let mut board = ChannelBoard::default();
        fail(&mut board, Channel::Jd, "unsupported format");
        assert!(begin(&mut board, Channel::Jd));
        assert_eq!(board.jd, WorkflowState::InProgress);
        assert!(board.jd.error().is_none());
    }

    #[test]
    fn test_finish_frees_the_channel() {
        let mut board = ChannelBoard::default();
        assert!(begin(&mut board, Channel::Jd));
        board.finish(Channel::Jd, WorkflowState::Error("unsupported format".to_string()));
        assert!(!board.is_busy(Channel::Jd));
        assert!(begin(&mut board, Channel::Jd));
    }

    #[test]
    fn test_silent_channels_never_hold_errors() {
        let mut board = ChannelBoard::default();
        begin(&mut board, Channel::Research);
        board.finish(Channel::Research, WorkflowState::Error("timeout".to_string()));
        assert_eq!(board.research, WorkflowState::Idle);
        fail(&mut board, Channel::Persona, "rejected");
        assert_eq!(board.persona, WorkflowState::Idle);
    }

    #[test]
    fn test_release_only_clears_in_progress() {
        let mut board = ChannelBoard::default();
        fail(&mut board, Channel::Resume, "bad file");
        board.release(Channel::Resume);
        assert_eq!(board.resume.error(), Some("bad file"));

        begin(&mut board, Channel::Jd);
        board.release(Channel::Jd);
        assert_eq!(board.jd, WorkflowState::Idle);
        assert!(!board.is_busy(Channel::Jd));
    }

    #[test]
    fn test_board_serializes_only_visible_states() {
        let mut board = ChannelBoard::default();
        board.try_hold(Channel::Resume);
        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["resume"]["state"], "idle");
        assert!(value.get("held").is_none());
    }

    #[test]
    fn test_workflow_state_serializes_tagged() {
        let value = serde_json::to_value(WorkflowState::Error("x".to_string())).unwrap();
        assert_eq!(value["state"], "error");
        assert_eq!(value["message"], "x");
        let idle = serde_json::to_value(WorkflowState::Idle).unwrap();
        assert_eq!(idle["state"], "idle");
    }
}

// LogView - core/presentation.rs
//
// Render selector for the logs view. Turns props plus a store snapshot into
// a frame description: either the loading indicator, or a content frame with
// an optional notice and the dispatched body. Recomputed every frame.

use crate::core::dispatch::{self, Body};
use crate::core::model::{LinesPerRow, LiveTailStatus, LogsState, ViewMode};
use crate::util::constants;

/// Props supplied by the parent of the logs view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogsTableProps {
    pub view_mode: ViewMode,
    pub lines_per_row: LinesPerRow,
}

/// Presentation booleans derived from the log count and live tail status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationFlags {
    /// Live tail is playing and nothing has arrived yet.
    pub is_live_tail: bool,
    /// Nothing to show and live tail is stopped.
    pub is_no_logs: bool,
}

pub fn derive_flags(log_count: usize, live_tail: LiveTailStatus) -> PresentationFlags {
    let empty = log_count == 0;
    PresentationFlags {
        is_live_tail: empty && live_tail == LiveTailStatus::Playing,
        is_no_logs: empty && live_tail == LiveTailStatus::Stopped,
    }
}

/// Message rendered above the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    WaitingForLiveLogs,
    NoLogsFound,
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::WaitingForLiveLogs => constants::LIVE_TAIL_WAITING_TEXT,
            Notice::NoLogsFound => constants::NO_LOGS_TEXT,
        }
    }
}

impl PresentationFlags {
    pub fn notice(&self) -> Option<Notice> {
        if self.is_live_tail {
            Some(Notice::WaitingForLiveLogs)
        } else if self.is_no_logs {
            Some(Notice::NoLogsFound)
        } else {
            None
        }
    }
}

/// What the logs view draws this frame.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// Spinner only. Overrides every other state.
    Loading,
    Content {
        /// "Event" heading above raw and list views.
        show_heading: bool,
        notice: Option<Notice>,
        /// Always present, even for an empty collection.
        body: Body<'a>,
    },
}

/// Select the frame for `props` against `state`.
pub fn select_frame<'a>(props: &LogsTableProps, state: &'a LogsState) -> Frame<'a> {
    if state.is_loading {
        return Frame::Loading;
    }

    let flags = derive_flags(state.logs.len(), state.live_tail);
    Frame::Content {
        show_heading: props.view_mode != ViewMode::Table,
        notice: flags.notice(),
        body: dispatch::dispatch(
            props.view_mode,
            &state.logs,
            &state.fields.selected,
            props.lines_per_row,
        ),
    }
}

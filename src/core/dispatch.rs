// LogView - core/dispatch.rs
//
// Mode dispatcher: decides which child renderer receives the log collection.
// Table mode hands every record to the table renderer in one piece; raw and
// list modes go through a virtualized list that produces one row per index.

use crate::core::model::{LinesPerRow, LogRecord, ViewMode};

/// What the table renderer is given.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec<'a> {
    /// The full, unfiltered log collection.
    pub logs: &'a [LogRecord],
    /// Selected field names, in column order.
    pub fields: &'a [String],
    pub lines_per_row: LinesPerRow,
}

/// Row style for the virtualized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Raw,
    List,
}

/// Item source for a virtualizer in raw or list mode.
#[derive(Debug, Clone, Copy)]
pub struct VirtualList<'a> {
    logs: &'a [LogRecord],
    style: RowStyle,
    lines_per_row: LinesPerRow,
}

/// A single row produced for a visible index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Row<'a> {
    /// Raw text row. The renderer also receives the expand callback.
    Raw {
        log: &'a LogRecord,
        lines_per_row: LinesPerRow,
    },
    /// Compact list row.
    List { log: &'a LogRecord },
}

impl<'a> Row<'a> {
    /// Identity of the row across frames: the record's unique id.
    pub fn key(&self) -> &'a str {
        self.log().id.as_str()
    }

    pub fn log(&self) -> &'a LogRecord {
        match self {
            Row::Raw { log, .. } | Row::List { log } => log,
        }
    }
}

impl<'a> VirtualList<'a> {
    pub fn style(&self) -> RowStyle {
        self.style
    }

    pub fn lines_per_row(&self) -> LinesPerRow {
        self.lines_per_row
    }

    /// Number of items the virtualizer must account for.
    pub fn total_count(&self) -> usize {
        self.logs.len()
    }

    /// Row for `index`, or `None` when the index is past the end.
    pub fn item_content(&self, index: usize) -> Option<Row<'a>> {
        let log = self.logs.get(index)?;
        Some(match self.style {
            RowStyle::Raw => Row::Raw {
                log,
                lines_per_row: self.lines_per_row,
            },
            RowStyle::List => Row::List { log },
        })
    }
}

/// Routed content for the current view mode.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    Table(TableSpec<'a>),
    Virtualized(VirtualList<'a>),
}

/// Route `logs` to the renderer matching `mode`.
pub fn dispatch<'a>(
    mode: ViewMode,
    logs: &'a [LogRecord],
    selected: &'a [String],
    lines_per_row: LinesPerRow,
) -> Body<'a> {
    match mode {
        ViewMode::Table => Body::Table(TableSpec {
            logs,
            fields: selected,
            lines_per_row,
        }),
        ViewMode::Raw => Body::Virtualized(VirtualList {
            logs,
            style: RowStyle::Raw,
            lines_per_row,
        }),
        ViewMode::List => Body::Virtualized(VirtualList {
            logs,
            style: RowStyle::List,
            lines_per_row,
        }),
    }
}

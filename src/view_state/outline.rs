//! Plain-text outline of event rows.
//!
//! Each line is a two-column marker gutter, the tree scaffolding and the
//! event label:
//!
//! ```text
//! *  ├─ Standard [Timer(t)] => [Wait(1)]
//!  > │  └─ Standard "beta"
//!    └─ // A comment
//! ```
//!
//! The first gutter column holds `*` for selected events, the second `>` for
//! the focused search result or `~` for other results.

use std::fmt::Write as _;

use super::flatten::EventRow;
use crate::model::{EventId, EventsSheet, InstructionId, COMMENT_EVENT_TYPE};
use crate::state::search::{PlainSentenceFormatter, SentenceFormatter};

const BRANCH: &str = "├─ ";
const LAST_BRANCH: &str = "└─ ";
const PIPE: &str = "│  ";
const BLANK: &str = "   ";

/// Renders every row.
pub fn render_outline(sheet: &EventsSheet, rows: &[EventRow]) -> String {
    render_outline_window(sheet, rows, 0..rows.len(), &PlainSentenceFormatter)
}

/// Renders the rows at `indices`, skipping indices past the end.
pub fn render_outline_window(
    sheet: &EventsSheet,
    rows: &[EventRow],
    indices: impl IntoIterator<Item = usize>,
    formatter: &dyn SentenceFormatter,
) -> String {
    let mut out = String::new();
    for row in indices.into_iter().filter_map(|index| rows.get(index)) {
        out.push_str(&outline_line(sheet, row, formatter));
        out.push('\n');
    }
    out
}

/// One outline line, without the trailing newline.
pub fn outline_line(
    sheet: &EventsSheet,
    row: &EventRow,
    formatter: &dyn SentenceFormatter,
) -> String {
    let mut line = String::new();
    line.push(if row.selected { '*' } else { ' ' });
    line.push(if row.focused {
        '>'
    } else if row.highlighted {
        '~'
    } else {
        ' '
    });
    line.push(' ');

    for continues in &row.row.ancestor_line_continuation {
        line.push_str(if *continues { PIPE } else { BLANK });
    }
    line.push_str(if row.row.is_last_sibling {
        LAST_BRANCH
    } else {
        BRANCH
    });

    if row.disabled {
        line.push_str("(disabled) ");
    }
    line.push_str(&event_label(sheet, row.event(), formatter));
    if row.row.has_children && sheet.is_folded(row.event()) {
        let _ = write!(line, " (+{})", sheet.sub_events(row.event()).len());
    }
    line
}

/// Short description of an event.
///
/// Comments show their text. Other events show their type, quoted strings
/// and bracketed condition and action sentences.
pub fn event_label(
    sheet: &EventsSheet,
    event: EventId,
    formatter: &dyn SentenceFormatter,
) -> String {
    let event_type = sheet.event_type(event).unwrap_or_default();
    if event_type == COMMENT_EVENT_TYPE {
        return format!("// {}", sheet.event_strings(event).join(" "));
    }

    let mut label = event_type.to_string();
    for text in sheet.event_strings(event) {
        let _ = write!(label, " \"{text}\"");
    }

    let conditions = sheet.conditions(event);
    let actions = sheet.actions(event);
    if !conditions.is_empty() || !actions.is_empty() {
        let sentences = |ids: &[InstructionId], is_condition: bool| {
            ids.iter()
                .map(|id| formatter.sentence(sheet, *id, is_condition))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = write!(
            label,
            " [{}] => [{}]",
            sentences(conditions, true),
            sentences(actions, false)
        );
    }
    label
}

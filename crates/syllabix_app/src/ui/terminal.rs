use std::collections::BTreeMap;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::render::{DrawCommand, Row, Tone};

const BAR_TEMPLATE: &str = "{msg:<16} [{bar:40.cyan/blue}] {pos:>3}%";

/// Applies [`DrawCommand`]s to a stack of indicatif lines.
#[derive(Default)]
pub struct TerminalView {
    multi: MultiProgress,
    rows: BTreeMap<Row, ProgressBar>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, cmds: Vec<DrawCommand>) {
        for cmd in cmds {
            match cmd {
                DrawCommand::SetText { row, text, tone } => {
                    let line = self.line(row);
                    line.set_style(text_style(tone));
                    line.set_message(text);
                }
                DrawCommand::SetBar {
                    indicator,
                    position,
                    message,
                } => {
                    let line = self.line(Row::Bar(indicator));
                    line.set_position(position);
                    line.set_message(message);
                }
            }
        }
    }

    /// Leaves the last frame on screen.
    pub fn finish(&self) {
        for line in self.rows.values() {
            line.abandon();
        }
    }

    /// Line for `row`, created in display order on first use.
    fn line(&mut self, row: Row) -> ProgressBar {
        if let Some(line) = self.rows.get(&row) {
            return line.clone();
        }
        let line = match row {
            Row::Bar(_) => ProgressBar::new(100).with_style(bar_style()),
            _ => ProgressBar::new(0),
        };
        let next = self
            .rows
            .range((std::ops::Bound::Excluded(row), std::ops::Bound::Unbounded))
            .next()
            .map(|(_, bar)| bar.clone());
        let line = match next {
            Some(next) => self.multi.insert_before(&next, line),
            None => self.multi.add(line),
        };
        self.rows.insert(row, line.clone());
        line
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
}

fn text_style(tone: Tone) -> ProgressStyle {
    let template = match tone {
        Tone::Muted => "{msg:.dim}",
        Tone::Active => "{msg:.yellow}",
        Tone::Done => "{msg:.green}",
        Tone::Error => "{msg:.red.bold}",
    };
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

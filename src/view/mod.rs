//! Presentational layer — panels rendered to plain text.
//!
//! Each panel is built from a snapshot of the store (and, for controls, the
//! action objects that drive them) and implements `Display`. A UI shell can
//! use the snapshot structs directly and ignore the text rendering.

pub mod balance;
pub mod order_book;
pub mod page;
pub mod trade_form;
pub mod trade_history;

pub use balance::BalancePanel;
pub use order_book::{LevelRow, OrderBookPanel};
pub use page::Page;
pub use trade_form::TradeFormPanel;
pub use trade_history::TradeHistoryPanel;

use std::fmt;

pub const LOADING: &str = "Loading...";

// ─── Table ───────────────────────────────────────────────────────────────────

/// Column-aligned text table with a placeholder row when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    empty: String,
}

impl Table {
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>, empty: impl Into<String>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            empty: empty.into(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", line(&self.headers))?;
        if self.rows.is_empty() {
            writeln!(f, "{}", self.empty)?;
        }
        for row in &self.rows {
            writeln!(f, "{}", line(row))?;
        }
        Ok(())
    }
}

// ─── Panel ───────────────────────────────────────────────────────────────────

/// Titled block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub body: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        write!(f, "{}", self.body)?;
        if !self.body.ends_with('\n') {
            writeln!(f)?;
        }
        Ok(())
    }
}

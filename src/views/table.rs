use owo_colors::OwoColorize;

use crate::models::link::{GateState, TrustState};
use crate::models::listing::{LinkRow, Listing};

const URL_WIDTH: usize = 48;

/// Renders a listing as a text table, one line per row.
#[derive(Debug, Clone, Copy)]
pub struct TableView {
    pub color: bool,
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

impl TableView {
    fn gate_badge(&self, gate: GateState, width: usize) -> String {
        let text = pad(&gate.to_string(), width);
        if !self.color {
            return text;
        }
        match gate {
            GateState::Countdown => text.truecolor(0xff, 0xd7, 0x00).to_string(),
            GateState::Blocked => text.truecolor(0xe1, 0x41, 0x48).to_string(),
            GateState::Reachable => text,
        }
    }

    fn trust_badge(&self, trust: TrustState) -> String {
        let text = trust.to_string();
        match trust {
            TrustState::Untrusted if self.color => text.truecolor(0x41, 0x69, 0xe1).to_string(),
            _ => text,
        }
    }

    pub fn row(&self, row: &LinkRow, now: i64, slug_width: usize) -> String {
        let gate = row.gate_state(now);
        format!(
            "{}  {}  {}  {}",
            pad(&row.slug, slug_width),
            pad(&truncate(&row.url, URL_WIDTH), URL_WIDTH),
            self.gate_badge(gate, "countdown".len()),
            self.trust_badge(row.trust_state()),
        )
    }

    pub fn render(&self, listing: &Listing, now: i64) -> String {
        if listing.is_empty() {
            return String::from("No links yet.\n");
        }
        let slug_width = listing
            .rows()
            .iter()
            .map(|row| row.slug.chars().count())
            .max()
            .unwrap_or(0)
            .max("SLUG".len());

        let mut out = format!(
            "{}  {}  {}  {}\n",
            pad("SLUG", slug_width),
            pad("URL", URL_WIDTH),
            pad("GATE", "countdown".len()),
            "TRUST"
        );
        for row in listing.rows() {
            out.push_str(self.row(row, now, slug_width).trim_end());
            out.push('\n');
        }
        out
    }
}

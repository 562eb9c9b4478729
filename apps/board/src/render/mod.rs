//! Plain-text rendering of the board and the application detail view.

use std::fmt::Write;

use crate::board::Board;
use crate::models::application::{Application, ApplicationDetail};

const TITLE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,   // ≥ 80
    Medium, // 60 – 79
    Low,    // < 60
}

impl ScoreBand {
    /// Band for a match score. `None` for missing or zero scores, which get
    /// no badge.
    pub fn for_score(score: Option<u32>) -> Option<ScoreBand> {
        match score? {
            0 => None,
            s if s >= 80 => Some(ScoreBand::High),
            s if s >= 60 => Some(ScoreBand::Medium),
            _ => Some(ScoreBand::Low),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }
}

pub fn score_badge(score: Option<u32>) -> Option<String> {
    let band = ScoreBand::for_score(score)?;
    Some(format!("[{}% {}]", score.unwrap_or_default(), band.label()))
}

/// Clamps to a single line of at most `width` characters.
pub fn single_line(text: &str, width: usize) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut clipped: String = line.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn render_card(out: &mut String, app: &Application, saving: bool) {
    let mut header = format!("  #{:<5} {}", app.id, app.candidate_name);
    if let Some(badge) = score_badge(app.score) {
        let _ = write!(header, "  {badge}");
    }
    if saving {
        header.push_str("  (saving…)");
    }
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "         {}", single_line(&app.job_title, TITLE_WIDTH));
    let _ = writeln!(out, "         → {}", app.detail_path());
}

/// Renders every column in stage order with its card count.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for column in board.columns() {
        let _ = writeln!(
            out,
            "{} ({})",
            column.stage.as_str().to_uppercase(),
            column.len()
        );
        if column.is_empty() {
            let _ = writeln!(out, "  —");
        }
        for card in &column.cards {
            render_card(&mut out, card, board.is_in_flight(card.id));
        }
        out.push('\n');
    }

    let hidden = board.hidden_count();
    if hidden > 0 {
        let _ = writeln!(out, "({hidden} application(s) with an unrecognized stage not shown)");
    }
    out
}

pub fn render_detail(detail: &ApplicationDetail) -> String {
    let mut out = String::new();
    let candidate = &detail.candidate;

    let _ = writeln!(out, "Application #{}", detail.id);
    let _ = writeln!(out, "  Candidate: {}", candidate.full_name());
    if let Some(email) = &candidate.email {
        let _ = writeln!(out, "  Email:     {email}");
    }
    if let Some(phone) = &candidate.phone {
        let _ = writeln!(out, "  Phone:     {phone}");
    }
    if let Some(linkedin) = &candidate.linkedin_url {
        let _ = writeln!(out, "  LinkedIn:  {linkedin}");
    }
    let _ = writeln!(out, "  Job:       {}", detail.job_title);
    let _ = writeln!(out, "  Stage:     {}", detail.stage);
    if let Some(badge) = score_badge(detail.score) {
        let _ = writeln!(out, "  Score:     {badge}");
    }
    if let Some(status) = &detail.status {
        let _ = writeln!(out, "  Status:    {status}");
    }
    if let Some(applied_at) = detail.applied_at {
        let _ = writeln!(out, "  Applied:   {}", applied_at.format("%Y-%m-%d"));
    }
    out
}

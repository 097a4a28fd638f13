//! Styled terminal output for scan results using anstyle.
//!
//! Renders the result card (verdict banner, score meter, explanation,
//! technical flags) and the session history table. Colors are gated on TTY
//! detection and `NO_COLOR`; the same formatter with colors disabled doubles
//! as the plain-text output path.

use std::fmt::Write;

use anstyle::{AnsiColor, Color, Style};

use crate::report::{AnalysisResult, HistoryItem};
use crate::verdict::RiskLevel;

/// Width of the score meter in characters.
const METER_WIDTH: usize = 20;

/// Longest URL rendered un-truncated in the history table.
const TABLE_URL_WIDTH: usize = 48;

/// Style definitions for different UI elements.
pub struct Styles {
    pub header: Style,
    pub subheader: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub muted: Style,
    pub bold: Style,
    pub url: Style,
    pub safe: Style,
    pub suspicious: Style,
    pub malicious: Style,
    pub unknown: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            subheader: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            success: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            error: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            bold: Style::new().bold(),
            url: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue)))
                .underline(),
            safe: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            suspicious: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            malicious: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
            unknown: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
        }
    }
}

/// Styled output formatter for scan results.
pub struct StyledFormatter {
    styles: Styles,
    use_colors: bool,
}

impl Default for StyledFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl StyledFormatter {
    /// Create a new styled formatter.
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: Self::should_use_colors(),
        }
    }

    /// Create a formatter without colors (plain output, non-interactive use).
    pub fn without_colors() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
        }
    }

    /// Determine if colors should be used based on environment.
    fn should_use_colors() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    fn risk_style(&self, level: RiskLevel) -> &Style {
        match level {
            RiskLevel::Safe => &self.styles.safe,
            RiskLevel::Suspicious => &self.styles.suspicious,
            RiskLevel::Malicious => &self.styles.malicious,
            RiskLevel::Unknown => &self.styles.unknown,
        }
    }

    /// Render one analysis result as a card.
    pub fn format_result(&self, result: &AnalysisResult) -> String {
        let mut out = String::new();

        let verdict = self.paint(self.risk_style(result.risk_level), result.risk_level.label());
        writeln!(out, "{} {}", verdict, self.paint(&self.styles.url, &result.url)).ok();

        if result.is_failure() {
            writeln!(out, "  {}", self.paint(&self.styles.muted, &result.explanation)).ok();
            return out;
        }

        writeln!(
            out,
            "  {} {}  {}",
            score_meter(result.risk_score),
            self.paint(&self.styles.bold, &format!("{:>3}/100", result.risk_score)),
            self.paint(&self.styles.subheader, &result.threat_type),
        )
        .ok();

        writeln!(out, "  {}", result.explanation).ok();

        for flag in &result.technical_flags {
            writeln!(out, "    {} {}", self.paint(&self.styles.warning, "!"), flag).ok();
        }

        writeln!(
            out,
            "  {}",
            self.paint(
                &self.styles.muted,
                &format!("analyzed at {}", result.analyzed_at.format("%H:%M:%S UTC")),
            )
        )
        .ok();

        out
    }

    /// Render the session history as a most-recent-first table.
    pub fn format_history<'a, I>(&self, items: I) -> String
    where
        I: IntoIterator<Item = &'a HistoryItem>,
    {
        let mut out = String::new();

        writeln!(out, "{}", self.paint(&self.styles.header, "Scan History")).ok();
        writeln!(
            out,
            "{}",
            self.paint(
                &self.styles.muted,
                &format!(
                    "{:<10} {:<width$} {:<12} {:>5}",
                    "Time",
                    "Analyzed Link",
                    "Verdict",
                    "Score",
                    width = TABLE_URL_WIDTH
                ),
            )
        )
        .ok();

        let mut any = false;
        for item in items {
            any = true;
            let r = &item.result;
            writeln!(
                out,
                "{:<10} {:<width$} {:<12} {:>5}",
                r.analyzed_at.format("%H:%M:%S"),
                truncate_middle(&r.url, TABLE_URL_WIDTH),
                self.paint(self.risk_style(r.risk_level), r.risk_level.label()),
                r.risk_score,
                width = TABLE_URL_WIDTH
            )
            .ok();
        }

        if !any {
            writeln!(out, "{}", self.paint(&self.styles.muted, "(no scans yet)")).ok();
        }

        out
    }

    /// Print a result card to stdout.
    pub fn print_result(&self, result: &AnalysisResult) {
        print!("{}", self.format_result(result));
    }

    /// Print the history table to stdout.
    pub fn print_history<'a, I>(&self, items: I)
    where
        I: IntoIterator<Item = &'a HistoryItem>,
    {
        print!("{}", self.format_history(items));
    }
}

/// Fixed-width bar visualizing a 0–100 score.
fn score_meter(score: u8) -> String {
    let filled = (score as usize * METER_WIDTH) / 100;
    let mut bar = String::with_capacity(METER_WIDTH + 2);
    bar.push('[');
    for i in 0..METER_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}

/// Shorten a long URL, keeping scheme+host and the path tail visible.
fn truncate_middle(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(1) / 2;
    let head: String = s.chars().take(keep).collect();
    let tail: String = s
        .chars()
        .rev()
        .take(max - keep - 1)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("{head}…{tail}")
}

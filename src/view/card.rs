//! Text rendering of analysis results.

use crate::core::session::AnalysisResult;
use std::fmt::Write as _;

/// Width of the longest chart bar, in cells.
pub const CHART_WIDTH: usize = 40;

/// Bias score shown alongside each result.
const BIAS_SCORE: f64 = 45.0;

/// Impact score shown alongside each result.
const IMPACT_SCORE: f64 = 72.0;

/// One bar of the result chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    /// Bar label.
    pub name: &'static str,

    /// Score on a 0-100 scale.
    pub score: f64,
}

/// Confidence as a percentage with one decimal place.
#[must_use]
pub fn confidence_percent(result: &AnalysisResult) -> String {
    format!("{:.1}", result.confidence * 100.0)
}

/// Plain-text summary suitable for pasting elsewhere.
#[must_use]
pub fn summary_text(result: &AnalysisResult) -> String {
    format!(
        "Sentiment: {}\nConfidence: {}%\nModels: NB({}) / LR({})",
        result.sentiment,
        confidence_percent(result),
        result.model_comparison.naive_bayes,
        result.model_comparison.logistic_regression,
    )
}

/// Bars plotted for a result.
#[must_use]
pub fn chart_bars(result: &AnalysisResult) -> Vec<ChartBar> {
    vec![
        ChartBar {
            name: "Confidence",
            score: result.confidence * 100.0,
        },
        ChartBar {
            name: "Bias",
            score: BIAS_SCORE,
        },
        ChartBar {
            name: "Impact",
            score: IMPACT_SCORE,
        },
    ]
}

/// Render bars as horizontal text, scaled so 100 fills `width` cells.
#[must_use]
pub fn render_chart(bars: &[ChartBar], width: usize) -> String {
    let label_width = bars.iter().map(|b| b.name.len()).max().unwrap_or(0);
    let mut out = String::new();

    for bar in bars {
        let filled = bar_cells(bar.score, width);
        let _ = writeln!(
            out,
            "{:<label_width$} │{}{} {:>5.1}",
            bar.name,
            "█".repeat(filled),
            " ".repeat(width - filled),
            bar.score,
        );
    }

    out
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_cells(score: f64, width: usize) -> usize {
    let clamped = score.clamp(0.0, 100.0);
    ((clamped / 100.0) * width as f64).round() as usize
}

/// Render the full result card: classification, model check, note, chart.
#[must_use]
pub fn render_card(result: &AnalysisResult) -> String {
    let comparison = &result.model_comparison;
    let agreement = if comparison.agree() {
        "models agree"
    } else {
        "models disagree"
    };

    let mut out = String::new();
    let _ = writeln!(out, "CLASSIFICATION");
    let _ = writeln!(out, "  {}", result.sentiment);
    let _ = writeln!(out, "  {}% Confidence", confidence_percent(result));
    let _ = writeln!(out);
    let _ = writeln!(out, "MODEL CHECK ({agreement})");
    let _ = writeln!(out, "  Naive Bayes   {}", comparison.naive_bayes);
    let _ = writeln!(out, "  Logistic Reg  {}", comparison.logistic_regression);
    let _ = writeln!(out);
    let _ = writeln!(out, "ANALYSIS NOTE");
    let _ = writeln!(
        out,
        "  Results are based on synthetic training data. Bias detected in {BIAS_SCORE:.0}% of similar samples."
    );
    let _ = writeln!(out);
    out.push_str(&render_chart(&chart_bars(result), CHART_WIDTH));
    out
}

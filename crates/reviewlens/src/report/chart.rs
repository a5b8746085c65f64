use std::fmt::Write;

use crate::analytics::SentimentBreakdown;

/// Characters in one full (100%) bar.
pub const BAR_WIDTH: usize = 50;

fn fill_char(sentiment: &str) -> char {
    match sentiment {
        "positive" => '+',
        "negative" => '-',
        "neutral" => '=',
        "error" => '!',
        "none" => '.',
        _ => '?',
    }
}

/// Renders a stacked 100% bar per category followed by a legend.
///
/// Segment boundaries are rounded from cumulative percentages so every bar
/// is exactly [`BAR_WIDTH`] characters wide.
pub fn render_chart(breakdown: &SentimentBreakdown) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sentiment distribution by {}", breakdown.category_column);

    if breakdown.is_empty() {
        let _ = writeln!(out, "(no data)");
        return out;
    }

    let categories = breakdown.categories();
    let label_width = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    let _ = writeln!(out);

    let mut labels: Vec<&str> = Vec::new();
    for category in &categories {
        let mut bar = String::with_capacity(BAR_WIDTH);
        let mut cumulative = 0.0;
        let mut drawn = 0;
        let mut shares = Vec::new();

        for row in breakdown.rows_for(category) {
            cumulative += row.percentage;
            let end = ((cumulative / 100.0) * BAR_WIDTH as f64).round() as usize;
            let end = end.min(BAR_WIDTH);
            let fill = fill_char(&row.sentiment);
            bar.extend(std::iter::repeat(fill).take(end.saturating_sub(drawn)));
            drawn = drawn.max(end);
            shares.push(format!("{} {:.1}%", row.sentiment, row.percentage));
            if !labels.contains(&row.sentiment.as_str()) {
                labels.push(&row.sentiment);
            }
        }
        // float drift can leave the last cell empty
        if drawn < BAR_WIDTH {
            let last = bar.chars().last().unwrap_or(' ');
            bar.extend(std::iter::repeat(last).take(BAR_WIDTH - drawn));
        }

        let _ = writeln!(
            out,
            "{:<width$} |{}| {}",
            category,
            bar,
            shares.join(", "),
            width = label_width
        );
    }

    labels.sort_unstable();
    let legend: Vec<String> = labels
        .iter()
        .map(|l| format!("{} {}", fill_char(l), l))
        .collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "Legend: {}", legend.join("  "));
    out
}

//! Terminal summaries with colors and box drawing.

use colored::Colorize;

use liftstat_core::Winner;

use crate::{conversion, revenue};

/// Labels for revenue summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricLabels {
    /// Title shown in the header.
    pub test_name: String,
    /// Name of the measured metric.
    pub metric_name: String,
    /// Currency symbol prefixed to amounts.
    pub currency: String,
}

impl MetricLabels {
    /// Labels with the given metric name and currency symbol.
    pub fn new(metric_name: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            metric_name: metric_name.into(),
            currency: currency.into(),
            ..Self::default()
        }
    }

    /// Replace the test name.
    pub fn with_test_name(mut self, test_name: impl Into<String>) -> Self {
        self.test_name = test_name.into();
        self
    }
}

impl Default for MetricLabels {
    fn default() -> Self {
        Self {
            test_name: "Revenue Test".to_string(),
            metric_name: "Average Order Value".to_string(),
            currency: "$".to_string(),
        }
    }
}

/// Format a conversion test result for the terminal.
pub fn format_conversion_result(result: &conversion::TestResult, test_name: &str) -> String {
    let mut summary = Summary::open(test_name, "RESULTS SUMMARY");

    summary.heading("Performance Comparison");
    summary.row(format!("  Control:  {} conversion rate", percent(result.control_rate)));
    summary.row(format!(
        "            ({} / {} visitors)",
        group_digits(result.control.conversions),
        group_digits(result.control.visitors)
    ));
    summary.row(format!("  Variant:  {} conversion rate", percent(result.variant_rate)));
    summary.row(format!(
        "            ({} / {} visitors)",
        group_digits(result.variant.conversions),
        group_digits(result.variant.visitors)
    ));
    summary.row(lift_row(result.lift_percent));
    summary.row(format!(
        "            {:+.2} pts absolute difference",
        result.lift_absolute * 100.0
    ));
    summary.rule();

    summary.verdict(result.is_significant, result.confidence_level, result.p_value);
    summary.row(format!(
        "  {} CI: [{:+.2}, {:+.2}] pts",
        level(result.confidence_level),
        result.confidence_interval_lower * 100.0,
        result.confidence_interval_upper * 100.0
    ));
    summary.rule();

    let improvement = (result.winner == Winner::Variant && result.lift_percent > 0.0)
        .then(|| format!("Expected improvement: {:+.1}%", result.lift_percent));
    summary.recommendation(
        result.winner,
        result.recommendation.message(),
        improvement,
        result.total_visitors(),
    );
    summary.close()
}

/// Format a conversion sample-size plan for the terminal.
pub fn format_conversion_plan(plan: &conversion::SampleSizePlan, test_name: &str) -> String {
    let mut summary = Summary::open(test_name, "PLANNING SUMMARY");

    summary.heading("Test Parameters");
    summary.row(format!("  Current conversion rate: {}", percent(plan.current_rate)));
    summary.row(format!("  Minimum lift to detect:  {:+.0}%", plan.lift_percent));
    summary.row(format!("  Expected variant rate:   {}", percent(plan.expected_rate)));
    summary.levels(plan.confidence_level, plan.statistical_power);
    summary.rule();

    summary.requirements(
        plan.visitors_per_variant,
        plan.total_visitors,
        plan.test_duration_days,
    );
    summary.meaning(
        "conversion",
        plan.lift_percent,
        plan.confidence_level,
        plan.statistical_power,
    );
    summary.close()
}

/// Format a revenue test result for the terminal.
pub fn format_revenue_result(result: &revenue::TestResult, labels: &MetricLabels) -> String {
    let currency = labels.currency.as_str();
    let mut summary = Summary::open(&labels.test_name, "RESULTS SUMMARY");

    summary.heading(&format!("Performance Comparison ({})", labels.metric_name));
    summary.row(format!("  Control:  {}", money(result.control_mean, currency, false)));
    summary.row(format!(
        "            (std dev {}, n={})",
        money(result.control.std, currency, false),
        group_digits(result.control.n)
    ));
    summary.row(format!("  Variant:  {}", money(result.variant_mean, currency, false)));
    summary.row(format!(
        "            (std dev {}, n={})",
        money(result.variant.std, currency, false),
        group_digits(result.variant.n)
    ));
    summary.row(lift_row(result.lift_percent));
    summary.row(format!(
        "            {} absolute difference",
        money(result.lift_absolute, currency, true)
    ));
    summary.rule();

    summary.verdict(result.is_significant, result.confidence_level, result.p_value);
    summary.row(format!(
        "  {} CI: [{}, {}]",
        level(result.confidence_level),
        money(result.confidence_interval_lower, currency, true),
        money(result.confidence_interval_upper, currency, true)
    ));
    summary.rule();

    let improvement = (result.winner == Winner::Variant && result.lift_absolute > 0.0).then(|| {
        format!(
            "Expected improvement: {} per transaction",
            money(result.lift_absolute, currency, true)
        )
    });
    summary.recommendation(
        result.winner,
        result.recommendation.message(),
        improvement,
        result.total_visitors(),
    );
    summary.close()
}

/// Format a revenue sample-size plan for the terminal.
pub fn format_revenue_plan(plan: &revenue::SampleSizePlan, labels: &MetricLabels) -> String {
    let currency = labels.currency.as_str();
    let mut summary = Summary::open(&labels.test_name, "PLANNING SUMMARY");

    summary.heading(&format!("Test Parameters ({})", labels.metric_name));
    summary.row(format!(
        "  Current mean:            {}",
        money(plan.current_mean, currency, false)
    ));
    summary.row(format!(
        "  Standard deviation:      {}",
        money(plan.standard_deviation, currency, false)
    ));
    summary.row(format!("  Minimum lift to detect:  {:+.0}%", plan.lift_percent));
    summary.row(format!(
        "  Expected variant mean:   {}",
        money(plan.expected_mean, currency, false)
    ));
    summary.levels(plan.confidence_level, plan.statistical_power);
    summary.rule();

    summary.requirements(
        plan.visitors_per_variant,
        plan.total_visitors,
        plan.test_duration_days,
    );
    summary.meaning(
        &labels.metric_name.to_lowercase(),
        plan.lift_percent,
        plan.confidence_level,
        plan.statistical_power,
    );
    summary.close()
}

/// Inner width of a summary frame, in visible characters.
const FRAME_WIDTH: usize = 60;

/// A framed summary built row by row.
///
/// Rows are padded to [`FRAME_WIDTH`] by visible width, so colored text
/// lines up with plain text.
struct Summary {
    text: String,
}

impl Summary {
    /// Start a frame with a `<TEST NAME> <kind>` title row.
    fn open(test_name: &str, kind: &str) -> Self {
        let mut summary = Self {
            text: border('\u{250C}', '\u{2510}'),
        };
        summary.heading(&format!("{} {}", test_name.to_uppercase(), kind));
        summary.rule();
        summary
    }

    fn row(&mut self, content: impl AsRef<str>) {
        let content = content.as_ref();
        let padding = (FRAME_WIDTH - 2).saturating_sub(visible_width(content));
        self.text.push_str("\u{2502} ");
        self.text.push_str(content);
        self.text.push_str(&" ".repeat(padding));
        self.text.push_str(" \u{2502}\n");
    }

    fn heading(&mut self, title: &str) {
        self.row(title.bold().to_string());
    }

    fn rule(&mut self) {
        self.text.push_str(&border('\u{251C}', '\u{2524}'));
    }

    fn close(mut self) -> String {
        self.text.push_str(&border('\u{2514}', '\u{2518}'));
        self.text
    }

    fn verdict(&mut self, is_significant: bool, confidence_level: f64, p_value: f64) {
        self.heading("Statistical Analysis");
        let (mark, label) = if is_significant {
            ("\u{2713}".green().bold(), "STATISTICALLY SIGNIFICANT".green().bold())
        } else {
            ("\u{2717}".yellow().bold(), "NOT SIGNIFICANT".yellow().bold())
        };
        self.row(format!("  {} {} at {} confidence", mark, label, level(confidence_level)));
        self.row(format!("  P-value: {:.4}", p_value));
    }

    fn recommendation(
        &mut self,
        winner: Winner,
        message: &str,
        improvement: Option<String>,
        total_visitors: u64,
    ) {
        self.heading("Recommendation");
        let headline = match winner {
            Winner::Variant => "WINNER: Variant".green().bold(),
            Winner::Control => "WINNER: Control".red().bold(),
            Winner::None => "NO WINNER YET".yellow().bold(),
        };
        self.row(format!("  {}", headline));
        self.row(format!("  \u{2192} {}", message));
        if let Some(improvement) = improvement {
            self.row(format!("  \u{2192} {}", improvement));
        }
        if winner == Winner::None {
            self.row(format!(
                "  \u{2192} Current sample: {} visitors",
                group_digits(total_visitors)
            ));
        }
    }

    fn levels(&mut self, confidence_level: f64, statistical_power: f64) {
        self.row(format!("  Confidence level:        {}", level(confidence_level)));
        self.row(format!("  Statistical power:       {}", level(statistical_power)));
    }

    fn requirements(&mut self, per_variant: u64, total: u64, duration_days: Option<u64>) {
        self.heading("Sample Size Requirements");
        self.row(format!("  Per variant:  {} visitors", group_digits(per_variant)));
        self.row(format!("  Total:        {} visitors", group_digits(total)));
        self.rule();

        if let Some(days) = duration_days.filter(|&d| d > 0) {
            self.heading("Estimated Duration");
            self.row(format!("  {}", format_duration(days)));
            self.rule();
        }
    }

    fn meaning(
        &mut self,
        metric: &str,
        lift_percent: f64,
        confidence_level: f64,
        statistical_power: f64,
    ) {
        self.heading("What This Means");
        self.row(format!(
            "  A true {}% lift in {} is detected",
            trim_number(lift_percent),
            metric
        ));
        self.row(format!("  with {} probability.", level(statistical_power)));
        self.row(format!(
            "  With no real difference, {} of tests",
            level(1.0 - confidence_level)
        ));
        self.row("  would still declare a winner.");
    }
}

/// A horizontal frame line between two corner glyphs.
fn border(left: char, right: char) -> String {
    format!("{}{}{}\n", left, "\u{2500}".repeat(FRAME_WIDTH), right)
}

/// Characters of `text` outside SGR escape sequences (`ESC [ ... m`).
fn visible_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    let mut in_escape = false;
    text.chars().filter(move |&c| match (in_escape, c) {
        (false, '\x1b') => {
            in_escape = true;
            false
        }
        (true, 'm') => {
            in_escape = false;
            false
        }
        (escaped, _) => !escaped,
    })
}

fn visible_width(text: &str) -> usize {
    visible_chars(text).count()
}

fn lift_row(lift_percent: f64) -> String {
    let direction = if lift_percent > 0.0 { "increase" } else { "decrease" };
    let text = format!("  Lift:     {:+.1}% ({})", lift_percent, direction);
    if lift_percent > 0.0 {
        text.green().to_string()
    } else if lift_percent < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// `~N days`, `~N.N weeks (N days)` or `~N.N months (N days)`.
fn format_duration(days: u64) -> String {
    if days < 7 {
        format!("~{} days", days)
    } else if days < 30 {
        format!("~{:.1} weeks ({} days)", days as f64 / 7.0, days)
    } else {
        format!("~{:.1} months ({} days)", days as f64 / 30.0, days)
    }
}

// Number formatting

/// Rate as a percentage with two decimals.
fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Fraction as a percentage, without decimals when whole.
fn level(fraction: f64) -> String {
    format!("{}%", trim_number(fraction * 100.0))
}

fn trim_number(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", value)
    }
}

/// `12345678` → `12,345,678`.
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Amount with a currency symbol, two decimals and grouped thousands.
fn money(value: f64, currency: &str, signed: bool) -> String {
    let sign = if value < 0.0 {
        "-"
    } else if signed {
        "+"
    } else {
        ""
    };
    if !value.is_finite() {
        let text = if value.is_nan() { "NaN" } else { "inf" };
        return format!("{}{}{}", sign, currency, text);
    }
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{}{}{}.{:02}", sign, currency, group_digits(cents / 100), cents % 100)
}

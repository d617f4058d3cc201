//! Output formatting for pipeline outcomes (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::pipeline::{PipelineOutcome, PriceReport};

/// Formats rupiah amounts with dot thousands separators.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

/// Formats pipeline outcomes for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats an outcome. The empty outcomes each get their own
    /// message; statistics are only ever rendered from a report.
    pub fn format_outcome(&self, outcome: &PipelineOutcome) -> String {
        if let OutputFormat::Json = self.format {
            return serde_json::to_string_pretty(outcome)
                .unwrap_or_else(|_| "{}".to_string());
        }

        match outcome {
            PipelineOutcome::NoResults { query } => format!(
                "Query: {}\n\nNo results found. Try a more general product name.",
                query
            ),
            PipelineOutcome::NoValidListings { query, raw_count } => format!(
                "Query: {}\n\n{} raw results, but no valid price data after \
                 filtering. Make the product name more specific and try again.",
                query, raw_count
            ),
            PipelineOutcome::TooVariable { query, qualified_count, .. } => format!(
                "Query: {}\n\n{} qualified listings, but the price sample is \
                 too variable to analyze.",
                query, qualified_count
            ),
            PipelineOutcome::Report(report) => self.format_report(report),
        }
    }

    fn format_report(&self, report: &PriceReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .unwrap_or_else(|_| "{}".to_string()),
            OutputFormat::Table => self.table_report(report),
            OutputFormat::Markdown => self.markdown_report(report),
            OutputFormat::Csv => self.csv_report(report),
        }
    }

    // Table formatting

    fn table_report(&self, report: &PriceReport) -> String {
        let title_width = 50;
        let price_width = 16;

        let mut lines = Vec::new();

        lines.push(format!("Query:   {}", report.query));
        lines.push(String::new());
        lines.push(format!(
            "Raw: {}   Qualified: {}   After outliers: {}",
            report.raw_count, report.qualified_count, report.cleaned_count
        ));
        lines.push(String::new());
        lines.push(format!("Mean:    {}", format_rupiah(report.summary.mean)));
        lines.push(format!("Median:  {}", format_rupiah(report.summary.median)));
        lines.push(format!("Lowest:  {}", format_rupiah(report.summary.min)));
        lines.push(format!("Highest: {}", format_rupiah(report.summary.max)));
        lines.push(String::new());

        lines.push(format!(
            "{:<price_width$}  {:<title_width$}  {}",
            "Price", "Title", "Link"
        ));
        lines.push(format!(
            "{:-<price_width$}  {:-<title_width$}  {:-<30}",
            "", "", ""
        ));

        for listing in &report.listings {
            lines.push(format!(
                "{:<price_width$}  {:<title_width$}  {}",
                format_rupiah(listing.price),
                truncate(&listing.title, title_width),
                listing.link
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} listings", report.listings.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_report(&self, report: &PriceReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## Price check: `{}`", report.query));
        lines.push(String::new());
        lines.push(format!(
            "- **Raw / qualified / cleaned:** {} / {} / {}",
            report.raw_count, report.qualified_count, report.cleaned_count
        ));
        lines.push(format!("- **Mean:** {}", format_rupiah(report.summary.mean)));
        lines.push(format!("- **Median:** {}", format_rupiah(report.summary.median)));
        lines.push(format!("- **Lowest:** {}", format_rupiah(report.summary.min)));
        lines.push(format!("- **Highest:** {}", format_rupiah(report.summary.max)));
        lines.push(String::new());

        lines.push("| Price | Title | Link |".to_string());
        lines.push("|-------|-------|------|".to_string());

        for listing in &report.listings {
            lines.push(format!(
                "| {} | {} | [listing]({}) |",
                format_rupiah(listing.price),
                truncate(&listing.title, 40),
                listing.link
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} listings*", report.listings.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_report(&self, report: &PriceReport) -> String {
        let mut lines = Vec::new();
        lines.push("price,title,link".to_string());

        for listing in &report.listings {
            lines.push(format!(
                "{},{},{}",
                listing.price,
                csv_escape(&listing.title),
                csv_escape(&listing.link)
            ));
        }

        lines.join("\n")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

//! Markdown and JSON report generation.
//!
//! This module renders an aggregate result as a readable Markdown
//! report or as pretty-printed JSON for the dashboard.

use crate::models::{
    AggregateResult, Bucket, CategoryCount, GroupAverage, Report, ReportMetadata, RiskLevel,
    SummaryMetrics, TrendPoint,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let result = &report.result;
    let mut output = String::new();

    // Title
    output.push_str("# Fraud Risk Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&result.summary));
    output.push_str(&generate_distribution_section(result));
    output.push_str(&generate_grouped_section(result));
    output.push_str(&generate_trend_section(&result.trend));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!("- **Documents:** {}\n", metadata.document_kind));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Loaded:** {}\n",
        metadata.records_loaded
    ));
    if metadata.records_analyzed != metadata.records_loaded {
        section.push_str(&format!(
            "- **Records After Filters:** {}\n",
            metadata.records_analyzed
        ));
    }
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(summary: &SummaryMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "| **Records** | **Avg Risk** | {} High | {} Medium | {} Low |\n",
        RiskLevel::High.emoji(),
        RiskLevel::Medium.emoji(),
        RiskLevel::Low.emoji(),
    ));
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {}% | {} | {} | {} |\n\n",
        summary.total_records,
        summary.average_risk,
        summary.high_risk_count,
        summary.medium_risk_count,
        summary.low_risk_count
    ));

    if let Some(ref recs) = summary.recommendations {
        section.push_str("### Recommendations\n\n");
        section.push_str("| Approve | Reject | Escalate | Unknown |\n");
        section.push_str("|:---:|:---:|:---:|:---:|\n");
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n\n",
            recs.approve, recs.reject, recs.escalate, recs.unknown
        ));
    }

    if let Some(repeat) = summary.repeat_offenders {
        section.push_str(&format!("**Repeat Offenders:** {}\n\n", repeat));
    }

    section
}

fn bucket_table(title: &str, buckets: &[Bucket]) -> String {
    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));
    table.push_str("| Risk | Documents |\n");
    table.push_str("|:---|:---:|\n");
    for bucket in buckets {
        table.push_str(&format!("| {} | {} |\n", bucket.label, bucket.count));
    }
    table.push('\n');

    table
}

fn count_table(title: &str, header: &str, counts: &[CategoryCount]) -> String {
    if counts.is_empty() {
        return String::new();
    }

    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));
    table.push_str(&format!("| {} | Count |\n", header));
    table.push_str("|:---|:---:|\n");
    for entry in counts {
        table.push_str(&format!("| {} | {} |\n", entry.name, entry.count));
    }
    table.push('\n');

    table
}

fn average_table(title: &str, header: &str, groups: &[GroupAverage]) -> String {
    if groups.is_empty() {
        return String::new();
    }

    let mut table = String::new();

    table.push_str(&format!("### {}\n\n", title));
    table.push_str(&format!("| {} | Avg Risk | Documents |\n", header));
    table.push_str("|:---|:---:|:---:|\n");
    for group in groups {
        table.push_str(&format!(
            "| {} | {}% | {} |\n",
            group.name, group.average_risk, group.count
        ));
    }
    table.push('\n');

    table
}

/// Generate histograms and categorical distributions.
fn generate_distribution_section(result: &AggregateResult) -> String {
    let mut section = String::new();

    section.push_str("## Risk Distribution\n\n");
    section.push_str(&bucket_table("Risk Score Ranges", &result.risk_histogram));
    section.push_str(&bucket_table(
        "Risk Score Detail",
        &result.risk_histogram_fine,
    ));
    section.push_str(&count_table("Risk Levels", "Level", &result.risk_levels));
    section.push_str(&count_table(
        "Document Types",
        "Type",
        &result.document_types,
    ));
    if let Some(ref recs) = result.recommendations {
        section.push_str(&count_table("AI Recommendations", "Recommendation", recs));
    }

    section
}

/// Generate grouped averages and ranked lists.
fn generate_grouped_section(result: &AggregateResult) -> String {
    let mut section = String::new();

    section.push_str("## Risk by Group\n\n");
    section.push_str(&average_table(
        "Risk by Document Type",
        "Type",
        &result.risk_by_document_type,
    ));
    if let Some(ref banks) = result.risk_by_bank {
        section.push_str(&average_table("Risk by Bank", "Bank", banks));
    }
    if let Some(ref payers) = result.top_payers {
        section.push_str(&average_table("Top Risky Payers", "Payer", payers));
    }
    if let Some(ref payees) = result.top_payees {
        section.push_str(&average_table("Top Risky Payees", "Payee", payees));
    }

    section
}

/// Generate the trend section.
fn generate_trend_section(trend: &[TrendPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Risk Trend\n\n");

    if trend.is_empty() {
        section.push_str("No dated records.\n\n");
        return section;
    }

    section.push_str("| Date | Avg Risk | Documents |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for point in trend {
        section.push_str(&format!(
            "| {} | {}% | {} |\n",
            point.date, point.average_risk, point.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by riskboard*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKind, RecommendationCounts};
    use chrono::Utc;

    fn create_test_report() -> Report {
        let metadata = ReportMetadata {
            source: "checks.csv".to_string(),
            document_kind: DocumentKind::Check,
            generated_at: Utc::now(),
            records_loaded: 4,
            records_analyzed: 3,
        };

        let group = |name: &str, avg: &str, count: usize| GroupAverage {
            name: name.to_string(),
            average_risk: avg.to_string(),
            count,
        };

        Report {
            metadata,
            result: AggregateResult {
                risk_histogram: vec![
                    Bucket {
                        label: "0-25%".to_string(),
                        count: 1,
                    },
                    Bucket {
                        label: "75-100%".to_string(),
                        count: 2,
                    },
                ],
                risk_histogram_fine: vec![Bucket {
                    label: "80-90%".to_string(),
                    count: 2,
                }],
                document_types: vec![CategoryCount {
                    name: "check".to_string(),
                    count: 3,
                }],
                risk_levels: vec![CategoryCount {
                    name: "HIGH".to_string(),
                    count: 2,
                }],
                recommendations: Some(vec![CategoryCount {
                    name: "REJECT".to_string(),
                    count: 2,
                }]),
                risk_by_document_type: vec![group("check", "61.7", 3)],
                risk_by_bank: Some(vec![group("First Bank", "61.7", 3)]),
                top_payers: Some(vec![group("ACME", "85.0", 2)]),
                top_payees: Some(Vec::new()),
                trend: vec![TrendPoint {
                    date: "2024-05-01".to_string(),
                    average_risk: "61.7".to_string(),
                    count: 3,
                }],
                summary: SummaryMetrics {
                    total_records: 3,
                    average_risk: "61.7".to_string(),
                    high_risk_count: 2,
                    medium_risk_count: 0,
                    low_risk_count: 1,
                    recommendations: Some(RecommendationCounts {
                        approve: 1,
                        reject: 2,
                        escalate: 0,
                        unknown: 0,
                    }),
                    repeat_offenders: Some(1),
                },
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Fraud Risk Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| 3 | 61.7% | 2 | 0 | 1 |"));
        assert!(markdown.contains("**Repeat Offenders:** 1"));
        assert!(markdown.contains("| 75-100% | 2 |"));
        assert!(markdown.contains("### Risk by Bank"));
        assert!(markdown.contains("| ACME | 85.0% | 2 |"));
        assert!(markdown.contains("| 2024-05-01 | 61.7% | 3 |"));
        // empty ranked list is skipped
        assert!(!markdown.contains("Top Risky Payees"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("checks.csv"));
        assert!(section.contains("Checks"));
        assert!(section.contains("Records Loaded:** 4"));
        assert!(section.contains("Records After Filters:** 3"));
    }

    #[test]
    fn test_trend_section_without_dates() {
        let section = generate_trend_section(&[]);
        assert!(section.contains("No dated records."));
    }

    #[test]
    fn test_generate_json_report() {
        let mut report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"document_kind\": \"check\""));
        assert!(json.contains("\"risk_histogram\""));
        assert!(json.contains("\"repeat_offenders\": 1"));

        report.result.top_payers = None;
        report.result.summary.repeat_offenders = None;
        let json = generate_json_report(&report).unwrap();
        assert!(!json.contains("\"top_payers\""));
        assert!(!json.contains("\"repeat_offenders\""));
    }
}

//! Record aggregation and statistics.
//!
//! Every view is computed independently from the full record list; no
//! intermediate state is shared between views or kept between calls.
//! Percentages are reported as strings fixed to one decimal place.

use super::views::ViewSet;
use crate::models::{
    AggregateResult, Bucket, CategoryCount, GroupAverage, NormalizedRecord, Recommendation,
    RecommendationCounts, RiskLevel, SummaryMetrics, TrendPoint, UNKNOWN,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Length cap for ranked lists and the bank table.
pub const TOP_N: usize = 10;
/// Minimum average risk (percent) for an actor to be ranked or counted
/// as a repeat offender.
pub const ACTOR_RISK_FLOOR: f64 = 50.0;
/// Number of most recent dates kept in the trend.
pub const TREND_WINDOW: usize = 30;

/// Build every view for a dataset.
///
/// Returns `None` for an empty record list so callers can tell "no data"
/// apart from a populated result.
pub fn aggregate(records: &[NormalizedRecord], views: ViewSet) -> Option<AggregateResult> {
    if records.is_empty() {
        debug!("No records to aggregate");
        return None;
    }

    debug!("Aggregating {} records with {:?}", records.len(), views);

    Some(AggregateResult {
        risk_histogram: risk_histogram(records),
        risk_histogram_fine: fine_risk_histogram(records),
        document_types: document_type_distribution(records),
        risk_levels: risk_level_distribution(records),
        recommendations: views
            .recommendations
            .then(|| recommendation_distribution(records)),
        risk_by_document_type: risk_by_document_type(records),
        risk_by_bank: views.risk_by_bank.then(|| risk_by_bank(records)),
        top_payers: views
            .top_payers
            .then(|| top_actors(records, |r| r.payer.as_str())),
        top_payees: views
            .top_payees
            .then(|| top_actors(records, |r| r.payee.as_str())),
        trend: risk_trend(records),
        summary: summary_metrics(records, views),
    })
}

/// Format a percentage for display.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Bucket index for a percentage: half-open buckets of `width`, with the
/// last bucket closed so that 100% lands in it.
fn bucket_index(percent: f64, width: f64, buckets: usize) -> usize {
    let index = (percent / width).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(buckets - 1)
    }
}

fn histogram(records: &[NormalizedRecord], buckets: usize) -> Vec<Bucket> {
    let width = 100.0 / buckets as f64;
    let mut counts = vec![0usize; buckets];

    for record in records {
        counts[bucket_index(record.risk_percent(), width, buckets)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bucket {
            label: format!(
                "{}-{}%",
                (i as f64 * width).round() as u32,
                ((i + 1) as f64 * width).round() as u32
            ),
            count,
        })
        .collect()
}

/// Four 25-point buckets. All buckets are emitted, including empty ones.
pub fn risk_histogram(records: &[NormalizedRecord]) -> Vec<Bucket> {
    histogram(records, 4)
}

/// Ten 10-point buckets, with empty buckets dropped.
pub fn fine_risk_histogram(records: &[NormalizedRecord]) -> Vec<Bucket> {
    histogram(records, 10)
        .into_iter()
        .filter(|bucket| bucket.count > 0)
        .collect()
}

/// Count per document type, most common first.
pub fn document_type_distribution(records: &[NormalizedRecord]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        *counts.entry(record.document_type.as_str()).or_default() += 1;
    }

    let mut dist: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount {
            name: name.to_string(),
            count,
        })
        .collect();

    dist.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    dist
}

/// Count per risk level over the fixed four-level domain, empty levels dropped.
pub fn risk_level_distribution(records: &[NormalizedRecord]) -> Vec<CategoryCount> {
    RiskLevel::ALL
        .iter()
        .map(|level| CategoryCount {
            name: level.as_str().to_string(),
            count: records.iter().filter(|r| r.risk_level == *level).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Count per recommendation, empty values dropped.
pub fn recommendation_distribution(records: &[NormalizedRecord]) -> Vec<CategoryCount> {
    Recommendation::ALL
        .iter()
        .map(|rec| CategoryCount {
            name: rec.as_str().to_string(),
            count: records.iter().filter(|r| r.recommendation == *rec).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

/// Raw per-group statistics before formatting.
#[derive(Debug, Clone, PartialEq)]
struct GroupStats {
    name: String,
    average: f64,
    count: usize,
}

impl GroupStats {
    fn into_average(self) -> GroupAverage {
        GroupAverage {
            name: self.name,
            average_risk: format_percent(self.average),
            count: self.count,
        }
    }
}

/// Group by key (skipping `None` keys), average risk as a percentage,
/// sorted by average descending then name ascending.
fn group_stats<'a, F>(records: &'a [NormalizedRecord], key: F) -> Vec<GroupStats>
where
    F: Fn(&'a NormalizedRecord) -> Option<&'a str>,
{
    let mut groups: HashMap<&str, (f64, usize)> = HashMap::new();

    for record in records {
        if let Some(name) = key(record) {
            let entry = groups.entry(name).or_insert((0.0, 0));
            entry.0 += record.risk_score;
            entry.1 += 1;
        }
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(name, (sum, count))| GroupStats {
            name: name.to_string(),
            average: (sum / count as f64) * 100.0,
            count,
        })
        .collect();

    stats.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    stats
}

/// Actor names usable for ranking; "Unknown" and blank are excluded.
fn known_actor(name: &str) -> Option<&str> {
    if name.is_empty() || name == UNKNOWN {
        None
    } else {
        Some(name)
    }
}

/// Average risk per document type, highest first.
pub fn risk_by_document_type(records: &[NormalizedRecord]) -> Vec<GroupAverage> {
    group_stats(records, |r| Some(r.document_type.as_str()))
        .into_iter()
        .map(GroupStats::into_average)
        .collect()
}

/// Average risk per bank, highest first, capped at [`TOP_N`] banks.
pub fn risk_by_bank(records: &[NormalizedRecord]) -> Vec<GroupAverage> {
    group_stats(records, |r| Some(r.bank.as_str()))
        .into_iter()
        .take(TOP_N)
        .map(GroupStats::into_average)
        .collect()
}

/// Ranked actors whose average risk is at least [`ACTOR_RISK_FLOOR`],
/// highest first, capped at [`TOP_N`].
pub fn top_actors<'a, F>(records: &'a [NormalizedRecord], actor: F) -> Vec<GroupAverage>
where
    F: Fn(&'a NormalizedRecord) -> &'a str,
{
    group_stats(records, |r| known_actor(actor(r)))
        .into_iter()
        .filter(|g| g.average >= ACTOR_RISK_FLOOR)
        .take(TOP_N)
        .map(GroupStats::into_average)
        .collect()
}

/// Payers with more than one record and average risk at or above
/// [`ACTOR_RISK_FLOOR`], counted over every payer (not just the ranked ones).
pub fn repeat_offenders(records: &[NormalizedRecord]) -> usize {
    group_stats(records, |r| known_actor(&r.payer))
        .iter()
        .filter(|g| g.count > 1 && g.average >= ACTOR_RISK_FLOOR)
        .count()
}

/// Average risk per date, oldest first, limited to the last
/// [`TREND_WINDOW`] dates. Undated records are skipped.
pub fn risk_trend(records: &[NormalizedRecord]) -> Vec<TrendPoint> {
    // ISO dates sort correctly as strings.
    let mut by_date: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for record in records.iter().filter(|r| !r.date.is_empty()) {
        let entry = by_date.entry(record.date.as_str()).or_insert((0.0, 0));
        entry.0 += record.risk_score;
        entry.1 += 1;
    }

    let skip = by_date.len().saturating_sub(TREND_WINDOW);

    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (sum, count))| TrendPoint {
            date: date.to_string(),
            average_risk: format_percent((sum / count as f64) * 100.0),
            count,
        })
        .collect()
}

/// Headline metrics.
pub fn summary_metrics(records: &[NormalizedRecord], views: ViewSet) -> SummaryMetrics {
    let total = records.len();
    let average = if total == 0 {
        0.0
    } else {
        records.iter().map(|r| r.risk_score).sum::<f64>() / total as f64 * 100.0
    };
    let level_count = |level: RiskLevel| records.iter().filter(|r| r.risk_level == level).count();

    SummaryMetrics {
        total_records: total,
        average_risk: format_percent(average),
        high_risk_count: level_count(RiskLevel::High),
        medium_risk_count: level_count(RiskLevel::Medium),
        low_risk_count: level_count(RiskLevel::Low),
        recommendations: views
            .recommendations
            .then(|| recommendation_counts(records)),
        repeat_offenders: views.repeat_offenders.then(|| repeat_offenders(records)),
    }
}

fn recommendation_counts(records: &[NormalizedRecord]) -> RecommendationCounts {
    let mut counts = RecommendationCounts::default();

    for record in records {
        match record.recommendation {
            Recommendation::Approve => counts.approve += 1,
            Recommendation::Reject => counts.reject += 1,
            Recommendation::Escalate => counts.escalate += 1,
            Recommendation::Unknown => counts.unknown += 1,
        }
    }

    counts
}

use serde::Serialize;

use crate::core::models::{CheckResult, PolicySummary};

/// How close a counter is to its limit, derived from the usage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Nominal,
    Warning,
    Critical,
}

/// Returns `count / limit * 100` clamped to 100 so an over-limit count never
/// reads past full.
pub fn usage_percent(count: u64, limit: u64) -> f64 {
    (count as f64 / limit as f64 * 100.0).min(100.0)
}

/// Band boundaries are exclusive on the lower end: exactly 80% is still
/// Warning, exactly 50% is still Nominal.
pub fn severity(usage_percent: f64) -> Severity {
    if usage_percent > 80.0 {
        Severity::Critical
    } else if usage_percent > 50.0 {
        Severity::Warning
    } else {
        Severity::Nominal
    }
}

/// Numeric part of the window label.
///
/// Expressed in hours when the window is an exact multiple of an hour
/// (in minutes), otherwise in minutes. Independent of [`window_unit`]; the
/// two can disagree (3660s yields 61 here but "hours" there, rendering as
/// "61 hours"), and that mismatch is kept for wire-for-wire compatibility
/// with the existing client.
pub fn window_value(window_seconds: u64) -> i64 {
    let minutes = window_seconds as f64 / 60.0;
    if minutes % 60.0 == 0.0 {
        (window_seconds as f64 / 3600.0).round() as i64
    } else {
        minutes.round() as i64
    }
}

/// Unit word of the window label, decided only by whether the window spans
/// at least an hour. See [`window_value`].
pub fn window_unit(window_seconds: u64) -> &'static str {
    if window_seconds >= 3600 {
        "hours"
    } else {
        "minutes"
    }
}

/// View of the primary policy plus verdict context, ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub allowed: bool,
    pub count: u64,
    pub limit: u64,
    pub usage_percent: f64,
    pub severity: Severity,
    pub window_value: i64,
    pub window_unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled: Option<Vec<PolicyView>>,
}

/// A fulfilled policy with the same derived fields as the primary view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyView {
    pub label: String,
    pub key: String,
    pub count: u64,
    pub limit: u64,
    pub window_seconds: u64,
    pub usage_percent: f64,
    pub severity: Severity,
    pub window_value: i64,
    pub window_unit: &'static str,
}

fn policy_view(summary: &PolicySummary) -> PolicyView {
    let percent = usage_percent(summary.count, summary.limit);
    PolicyView {
        label: summary.label.clone(),
        key: summary.key.clone(),
        count: summary.count,
        limit: summary.limit,
        window_seconds: summary.window_seconds,
        usage_percent: percent,
        severity: severity(percent),
        window_value: window_value(summary.window_seconds),
        window_unit: window_unit(summary.window_seconds),
    }
}

/// Compute the display view for a verdict. Pure; the same rule set is applied
/// to the primary policy and to each fulfilled entry independently, and the
/// fulfilled order is kept as received.
pub fn derive_view(result: &CheckResult) -> ViewModel {
    let percent = usage_percent(result.count, result.limit);
    ViewModel {
        allowed: result.allowed,
        count: result.count,
        limit: result.limit,
        usage_percent: percent,
        severity: severity(percent),
        window_value: window_value(result.window_seconds),
        window_unit: window_unit(result.window_seconds),
        cause: result.cause.clone(),
        fulfilled: result
            .fulfilled
            .as_ref()
            .map(|entries| entries.iter().map(policy_view).collect()),
    }
}

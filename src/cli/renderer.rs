use colored::{control, ColoredString, Colorize};

use crate::core::controller::Phase;
use crate::core::models::CheckRequest;
use crate::core::view::{derive_view, PolicyView, Severity, ViewModel};

const BAR_WIDTH: usize = 12;

/// Render one resolved check as a colored (or plain) string.
///
/// Layout:
/// ```text
///  gpt-4o (premium)
///   Verdict   Allowed
///   Usage     5 / 100 (5%) [█░░░░░░░░░░░]
///             1 hours window
///   Satisfied Policies
///     TENANT       5/100    1 hours window
///     USER_MODEL   9/10     30 minutes window
/// ```
pub fn render_report(request: &CheckRequest, phase: &Phase, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let header = format!(" {} ({})", request.model_id, request.model_tier);
    match phase {
        Phase::Idle => {
            lines.push(header.bold().to_string());
            lines.push("  No check submitted yet.".to_string());
        }
        Phase::Pending => {
            lines.push(header.bold().to_string());
            lines.push("  Checking...".to_string());
        }
        Phase::Failed(message) => {
            lines.push(format!(" {} (error)", request.model_id).bold().to_string());
            lines.push(format!("  {}", message).red().to_string());
        }
        Phase::Success(result) => {
            lines.push(header.bold().to_string());
            render_verdict(&mut lines, &derive_view(result));
        }
    }

    lines.join("\n")
}

fn render_verdict(lines: &mut Vec<String>, view: &ViewModel) {
    let verdict = if view.allowed {
        "Allowed".green()
    } else {
        "Blocked".red()
    };
    lines.push(format!("  {}   {}", "Verdict".cyan(), verdict));

    let usage = format!(
        "{} / {} ({}%)",
        view.count,
        view.limit,
        view.usage_percent.round() as i64
    );
    lines.push(format!(
        "  {}     {} {}",
        "Usage".cyan(),
        color_by_severity(view.severity, &usage),
        usage_bar(view.usage_percent, BAR_WIDTH).magenta()
    ));
    // 12 spaces to align under the usage value
    lines.push(format!("            {}", window_label(view.window_value, view.window_unit).dimmed()));

    if let Some(cause) = &view.cause {
        if !view.allowed {
            lines.push(format!("  {}    {}", "Reason".cyan(), cause.red()));
        }
    }

    if view.allowed {
        if let Some(fulfilled) = &view.fulfilled {
            if !fulfilled.is_empty() {
                lines.push(format!("  {}", "Satisfied Policies".cyan()));
                let label_width = fulfilled.iter().map(|p| p.label.len()).max().unwrap_or(0);
                for policy in fulfilled {
                    render_policy(lines, policy, label_width);
                }
            }
        }
    }
}

fn render_policy(lines: &mut Vec<String>, policy: &PolicyView, label_width: usize) {
    // Pad before coloring so ANSI codes don't skew the column widths.
    let label = format!("{:<width$}", policy.label, width = label_width);
    let counts = format!("{:<8}", format!("{}/{}", policy.count, policy.limit));
    lines.push(format!(
        "    {}   {} {}",
        label,
        color_by_severity(policy.severity, &counts),
        window_label(policy.window_value, policy.window_unit).dimmed()
    ));
}

fn window_label(value: i64, unit: &str) -> String {
    format!("{} {} window", value, unit)
}

/// Bracketed bar where █ marks the used portion and ░ the headroom.
fn usage_bar(used_percent: f64, width: usize) -> String {
    let used_percent = used_percent.clamp(0.0, 100.0);
    let used_blocks = ((used_percent / 100.0) * width as f64).round() as usize;
    let free_blocks = width.saturating_sub(used_blocks);

    let used: String = "█".repeat(used_blocks);
    let free: String = "░".repeat(free_blocks);

    format!("[{}{}]", used, free)
}

fn color_by_severity(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Nominal => text.green(),
        Severity::Warning => text.yellow(),
        Severity::Critical => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CheckResult, ModelTier, PolicySummary};

    fn request() -> CheckRequest {
        CheckRequest {
            tenant_id: Some("enterprise_co".to_string()),
            user_id: "ent-user-1".to_string(),
            model_id: "gpt-4o".to_string(),
            model_tier: ModelTier::Premium,
        }
    }

    fn allowed_result() -> CheckResult {
        CheckResult {
            allowed: true,
            count: 5,
            limit: 100,
            window_seconds: 3600,
            cause: None,
            fulfilled: Some(vec![
                PolicySummary {
                    label: "TENANT".to_string(),
                    key: "rl:tenant:1".to_string(),
                    count: 5,
                    limit: 100,
                    window_seconds: 3600,
                },
                PolicySummary {
                    label: "USER_MODEL".to_string(),
                    key: "rl:user:1:model:2".to_string(),
                    count: 9,
                    limit: 10,
                    window_seconds: 1800,
                },
            ]),
        }
    }

    #[test]
    fn render_allowed_contains_verdict_and_usage() {
        let output = render_report(&request(), &Phase::Success(allowed_result()), false);
        assert!(output.contains("gpt-4o (premium)"));
        assert!(output.contains("Allowed"));
        assert!(output.contains("5 / 100 (5%)"));
        assert!(output.contains("1 hours window"));
    }

    #[test]
    fn render_allowed_lists_policies_in_order() {
        let output = render_report(&request(), &Phase::Success(allowed_result()), false);
        assert!(output.contains("Satisfied Policies"));
        let tenant = output.find("TENANT").unwrap();
        let user_model = output.find("USER_MODEL").unwrap();
        assert!(tenant < user_model);
        assert!(output.contains("30 minutes window"));
    }

    #[test]
    fn render_blocked_shows_cause_verbatim() {
        let result = CheckResult {
            allowed: false,
            count: 11,
            limit: 10,
            window_seconds: 3600,
            cause: Some("USER_MODEL exceeded: 11/10".to_string()),
            fulfilled: None,
        };
        let output = render_report(&request(), &Phase::Success(result), false);
        assert!(output.contains("Blocked"));
        assert!(output.contains("USER_MODEL exceeded: 11/10"));
        assert!(output.contains("11 / 10 (100%)"));
    }

    // The 3660s label mismatch flows all the way through to the terminal.
    #[test]
    fn render_keeps_mismatched_window_label() {
        let result = CheckResult {
            allowed: true,
            count: 1,
            limit: 100,
            window_seconds: 3660,
            cause: None,
            fulfilled: Some(vec![]),
        };
        let output = render_report(&request(), &Phase::Success(result), false);
        assert!(output.contains("61 hours window"));
    }

    #[test]
    fn render_failed_shows_message() {
        let phase = Phase::Failed("Internal server error".to_string());
        let output = render_report(&request(), &phase, false);
        assert!(output.contains("gpt-4o (error)"));
        assert!(output.contains("Internal server error"));
    }

    #[test]
    fn render_no_ansi_when_color_false() {
        let output = render_report(&request(), &Phase::Success(allowed_result()), false);
        // ANSI escape sequences start with ESC (0x1b)
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }

    #[test]
    fn render_pending_and_idle() {
        assert!(render_report(&request(), &Phase::Pending, false).contains("Checking..."));
        assert!(render_report(&request(), &Phase::Idle, false).contains("No check submitted"));
    }
}

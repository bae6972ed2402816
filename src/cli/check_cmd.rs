use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::client::CheckClient;
use crate::core::config::AppConfig;
use crate::core::controller::{CheckController, CheckForm, Event, FieldChange, Phase};
use crate::core::models::ModelTier;
use crate::core::view::{derive_view, ViewModel};

/// Per-invocation overrides for the check command.
pub struct CheckArgs {
    pub tenant: Option<String>,
    pub user: Option<String>,
    pub model: Option<String>,
    pub tier: Option<String>,
    pub endpoint: Option<String>,
    pub no_tenant: bool,
    pub repeat: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckPayload {
    attempt: u32,
    checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<ViewModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn payload(attempt: u32, checked_at: DateTime<Utc>, phase: &Phase) -> CheckPayload {
    match phase {
        Phase::Success(result) => CheckPayload {
            attempt,
            checked_at,
            verdict: Some(derive_view(result)),
            error: None,
        },
        Phase::Failed(message) => CheckPayload {
            attempt,
            checked_at,
            verdict: None,
            error: Some(message.clone()),
        },
        Phase::Idle | Phase::Pending => CheckPayload {
            attempt,
            checked_at,
            verdict: None,
            error: None,
        },
    }
}

fn parse_tier_or_exit(id: &str) -> ModelTier {
    match ModelTier::from_id(id) {
        Some(tier) => tier,
        None => {
            eprintln!("Unknown model tier: '{}' (must be premium|standard|free)", id);
            std::process::exit(1);
        }
    }
}

pub async fn run(args: CheckArgs, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    let include_tenant = config.settings.include_tenant_field && !args.no_tenant;
    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config.settings.endpoint.clone());

    // Initial form from config defaults; CLI overrides land as field events.
    let form = CheckForm {
        tenant_id: include_tenant.then(|| config.defaults.tenant_id.clone()),
        user_id: config.defaults.user_id.clone(),
        model_id: config.defaults.model_id.clone(),
        model_tier: parse_tier_or_exit(&config.defaults.model_tier),
    };
    let mut controller = CheckController::new(CheckClient::new(endpoint.clone()), form);

    if include_tenant {
        if let Some(tenant) = args.tenant {
            controller.apply(Event::FieldChanged(FieldChange::Tenant(Some(tenant))));
        }
    }
    if let Some(user) = args.user {
        controller.apply(Event::FieldChanged(FieldChange::User(user)));
    }
    if let Some(model) = args.model {
        controller.apply(Event::FieldChanged(FieldChange::Model(model)));
    }
    if let Some(tier) = args.tier.as_deref() {
        controller.apply(Event::FieldChanged(FieldChange::Tier(parse_tier_or_exit(tier))));
    }

    if opts.verbose {
        let request = controller.form().to_request();
        eprintln!("POST {}", endpoint);
        eprintln!("{}", serde_json::to_string(&request)?);
    }

    // Spinner on stderr (text mode only)
    let spinner = if matches!(opts.format, OutputFormat::Text) {
        Some(tokio::spawn(async move {
            let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut i = 0usize;
            loop {
                eprint!("\r {} Checking rate limit...", frames[i % frames.len()]);
                i = i.wrapping_add(1);
                tokio::time::sleep(std::time::Duration::from_millis(80)).await;
            }
        }))
    } else {
        None
    };

    let repeat = args.repeat.max(1);
    let mut sections: Vec<String> = Vec::new();
    let mut payloads: Vec<CheckPayload> = Vec::new();

    for attempt in 1..=repeat {
        controller.submit().await;
        match opts.format {
            OutputFormat::Text => {
                let request = controller.form().to_request();
                sections.push(renderer::render_report(
                    &request,
                    controller.phase(),
                    opts.use_color,
                ));
            }
            OutputFormat::Json => {
                payloads.push(payload(attempt, Utc::now(), controller.phase()));
            }
        }
    }

    // Stop spinner and clear the line
    if let Some(s) = spinner {
        s.abort();
        eprint!("\r\x1b[2K");
    }

    match opts.format {
        OutputFormat::Text => {
            println!("{}", sections.join("\n\n"));
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&payloads)?
            } else {
                serde_json::to_string(&payloads)?
            };
            println!("{}", json);

            if opts.verbose {
                for p in &payloads {
                    if let Some(err) = &p.error {
                        eprintln!("Check {} failed: {}", p.attempt, err);
                    }
                }
            }
        }
    }

    Ok(())
}

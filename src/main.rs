use anyhow::{bail, Context};
use resume_intake::{
    config::{get_config, init_config},
    models::ResumeId,
    services::intake_service::{run_intake, IntakeDocument},
    wizard::WizardRoute,
    AppState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let config = get_config()?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: resume-intake <intake.json> [resume-id]");
    };
    let resume_id = args
        .next()
        .map(|raw| raw.parse::<ResumeId>())
        .transpose()
        .context("resume id must be an integer")?;

    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path))?;
    let document: IntakeDocument = serde_json::from_slice(&raw)?;

    let state = AppState::new(config)?;
    if !state.session.is_signed_in() {
        bail!(
            "no session token found in {}",
            config.session_store_path.display()
        );
    }

    let route = resume_id.map(WizardRoute::for_resume).unwrap_or_default();
    let mut wizard = state.open_wizard(route).await;
    info!(route = %wizard.route(), "intake started");

    match run_intake(&mut wizard, document).await {
        Ok(id) => {
            info!(resume_id = %id, route = %wizard.route(), "intake complete");
            Ok(())
        }
        Err(e) => {
            for notice in state.toasts.notices() {
                error!(level = ?notice.level, message = %notice.message, "intake notice");
            }
            Err(e.into())
        }
    }
}

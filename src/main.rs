use anyhow::Context;
use bendkit::{
    init_logging, BendRequest, BendSession, EngineConfig, EventBus, EventFilter,
    JsonProfileExporter, ProfileExporter, BUILD_DATE, VERSION,
};
use std::path::PathBuf;
use std::sync::Arc;

fn load_config() -> anyhow::Result<EngineConfig> {
    match std::env::var_os("BENDKIT_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            EngineConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("BendKit {} (built {})", VERSION, BUILD_DATE);

    let config = load_config()?;
    let bus = Arc::new(EventBus::new());
    bus.subscribe(EventFilter::All, |event| {
        tracing::info!(category = %event.category(), "{}", event.description());
    });

    let mut session = BendSession::new(
        &config,
        Arc::new(config.material_catalog()),
        Arc::new(config.tooling_catalog()),
        bus.clone(),
    )
    .context("Failed to start bend session")?;

    session.update_sheet("300", "2", "100", "Steel")?;
    session.add_bend("50", "90", "3.5", "Up")?;
    session.add_bend("150", "45", "0", "Down")?;
    if let BendRequest::NeedsConfirmation(proposal) = session.add_bend("250", "90", "1.0", "Up")? {
        session.confirm(proposal)?;
    }

    let output_dir = std::env::temp_dir().join("bendkit-profiles");
    let exporter: Arc<dyn ProfileExporter> = Arc::new(JsonProfileExporter::new(&output_dir));
    session.attach_executor(Some(exporter), config.executor.queue_capacity);

    let report = session
        .execute()
        .await
        .context("Failed to process demo job")?;
    session.detach_executor().await?;

    println!("Job '{}' processed:", report.job.name());
    for step in report.sheet.current_bends() {
        println!("  {}", step);
    }
    println!("Parts bent this session: {}", report.parts_bent_session);
    if let Some(location) = report.profile.and_then(|p| p.location) {
        println!("Profile written to {}", location.display());
    }

    Ok(())
}

use std::sync::Arc;

use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quill_llm::{CompletionFlow, FlowKind, OpenAIClient, Responder, ThreadFlow};

mod app;
mod config;
mod session;
mod worker;

use crate::app::QuillApp;
use crate::config::Config;
use crate::session::EditorSession;

fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Configuration failure is fatal at startup
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(flow = ?config.llm.flow, "starting quill");

    let runtime = tokio::runtime::Runtime::new()?;

    let mut client = OpenAIClient::new(config.openai_api_key.clone())?;
    if let Some(base_url) = &config.llm.base_url {
        client = client.with_base_url(base_url);
    }

    // A failed thread initialization is not fatal: the editor opens anyway
    // and rejects sends locally until restarted.
    let responder: Option<Arc<dyn Responder>> = match config.llm.flow {
        FlowKind::Completion => Some(Arc::new(
            CompletionFlow::new(client).max_tokens(config.llm.max_tokens),
        )),
        FlowKind::Thread => match runtime.block_on(ThreadFlow::start(client)) {
            Ok(flow) => Some(Arc::new(flow)),
            Err(err) => {
                tracing::error!(error = %err, "failed to initialize conversation thread");
                None
            }
        },
    };

    // Workers spawned from UI callbacks need the runtime context.
    let _guard = runtime.enter();

    let session = EditorSession::new(responder);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 400.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quill",
        options,
        Box::new(|_cc| Ok(Box::new(QuillApp::new(session)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the UI: {}", e))?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

use anyhow::Result;
use trigon_engine::device::GpuInit;
use trigon_engine::host::{Runtime, RuntimeConfig};
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_engine::render::Renderer;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting trigon viewer");

    Runtime::run(
        RuntimeConfig {
            title: "Trigon".to_string(),
            ..Default::default()
        },
        GpuInit::default(),
        Renderer::new(),
    )
}

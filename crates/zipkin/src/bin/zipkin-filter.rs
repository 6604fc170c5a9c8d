use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Result;

use crossstitch_zipkin::pipeline;
use crossstitch_zipkin::{FilterConfig, ZipkinFilter};

fn main() -> Result<()> {
    env_logger::init();

    // Parse config path from args; without one the defaults apply.
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .position(|arg| arg == "-c")
        .and_then(|index| args.get(index + 1))
        .map(PathBuf::from);

    let config = match config_path {
        Some(path) => FilterConfig::load(&path)?,
        None => FilterConfig::default(),
    }
    .with_env_overrides();

    log::info!(
        source = config.source.as_str(),
        target = config.target.as_str();
        "zipkin filter starting"
    );

    let filter = ZipkinFilter::with_log_sink(config);
    let stats = pipeline::run(&filter, io::stdin().lock(), io::BufWriter::new(io::stdout().lock()))?;

    log::info!(
        decoded = stats.decoded,
        failed = stats.failed,
        passed_through = stats.passed_through;
        "zipkin filter finished"
    );
    Ok(())
}

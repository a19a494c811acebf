use std::io::stderr;

use clap::Parser;
use lookout::{Command, LogOptions, Opts};
use lookout_dashboard::{print_once, start_dashboard};
use tracing::{Level, info};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::writer::MakeWriterExt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Logs go to a daily file, and to stderr when nothing else owns the terminal.
/// Stdout is left to command output.
fn log_init(
    opts: &LogOptions,
    log_prefix: &str,
    to_stderr: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = if opts.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("lookout={level}").parse()?)
        .add_directive(format!("lookout_common={level}").parse()?)
        .add_directive(format!("lookout_dashboard={level}").parse()?);

    let formatting_layer = to_stderr.then(|| {
        fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_line_number(true)
            .with_writer(stderr.with_max_level(level))
            .boxed()
    });

    let file_appender = tracing_appender::rolling::daily(
        opts.log_path.as_str(),
        format!("lookout-{log_prefix}.log"),
    );

    let file_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(file_appender.with_max_level(level));

    Registry::default()
        .with(env_filter)
        .with(formatting_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    match opts.command {
        Command::Watch(dashboard) => {
            log_init(&opts.log, "watch", false)?;
            info!("opts: {:?}", dashboard);
            start_dashboard(dashboard).await?;
        }
        Command::Once(dashboard) => {
            log_init(&opts.log, "once", true)?;
            info!("opts: {:?}", dashboard);
            print_once(dashboard).await?;
        }
    }
    Ok(())
}

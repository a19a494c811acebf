use clap::{Args, Parser, Subcommand};
use faststr::FastStr;
pub use lookout_dashboard::DashboardOptions;

#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub log: LogOptions,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// full-screen dashboard, refreshed until you quit
    Watch(DashboardOptions),
    /// fetch one snapshot and print it as a table
    Once(DashboardOptions),
}

#[derive(Args, Debug, Clone)]
pub struct LogOptions {
    #[arg(long, default_value("./target/logs"))]
    pub log_path: FastStr,
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

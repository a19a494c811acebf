use std::time::Duration;

use clap::Args;
use faststr::FastStr;

#[derive(Args, Debug, Clone)]
pub struct DashboardOptions {
    /// admin-data provider, `host:port` or a base url
    #[arg(long, default_value("127.0.0.1:20000"))]
    pub addr: FastStr,
    /// poll interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: u64,
    /// consecutive failed polls before the view is flagged as stale
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub stale_after: u32,
}

impl DashboardOptions {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            addr: FastStr::from_static_str("127.0.0.1:20000"),
            interval_ms: 1000,
            stale_after: 3,
        }
    }
}

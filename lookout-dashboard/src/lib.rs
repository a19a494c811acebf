mod args;
pub use args::DashboardOptions;

mod errors;
pub use errors::{DashboardError, FetchError};

pub mod fetcher;
mod plain;
pub use plain::{plain_table, render_once};
pub mod render;
mod session;
pub use session::{DashboardSession, refresh};
pub mod table;
pub mod view;

pub async fn start_dashboard(options: DashboardOptions) -> Result<(), Box<dyn std::error::Error>> {
    let session = DashboardSession::connect(&options)?;
    view::run(session).await?;

    Ok(())
}

pub async fn print_once(options: DashboardOptions) -> Result<(), Box<dyn std::error::Error>> {
    let table = render_once(&options).await?;
    println!("{table}");

    Ok(())
}

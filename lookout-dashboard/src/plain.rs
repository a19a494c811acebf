use comfy_table::{Cell, Table};
use tracing::info;

use crate::{
    args::DashboardOptions,
    errors::Result,
    render::{COLUMNS, NodeRow, RowKind},
    session::{DashboardSession, refresh},
};

/// Lays rows out as a plain-text table, one table row per node.
pub fn plain_table(rows: &[NodeRow]) -> Table {
    let mut table = Table::new();
    table.load_preset("||--+-++|    ++++++");
    table.set_header(COLUMNS.map(Cell::new));

    for row in rows {
        let mut cells = row.cells().map(Cell::new);
        if row.kind == RowKind::Local {
            cells[0] = Cell::new(format!("{} *", row.name));
        }
        table.add_row(cells);
    }
    table
}

/// Polls the provider once and returns the rendered table text.
pub async fn render_once(options: &DashboardOptions) -> Result<String> {
    let session = DashboardSession::connect(options)?;
    info!("fetching {}", session.endpoint());

    let table = session.table();
    refresh(session.fetcher().as_ref(), &table).await?;
    Ok(plain_table(&table.rows()).to_string())
}

use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::RwLock;
use tracing::info;

use crate::render::NodeRow;

/// `Loading` shows the placeholder, `Live` shows the table. There is no way back
/// from `Live`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Live,
}

/// What a view needs to draw one frame.
#[derive(Clone, Debug)]
pub struct TableView {
    pub phase: Phase,
    pub rows: Vec<NodeRow>,
    pub stale: bool,
    pub consecutive_failures: u32,
    pub updated_at: Option<DateTime<Local>>,
}

struct TableState {
    phase: Phase,
    rows: Vec<NodeRow>,
    consecutive_failures: u32,
    updated_at: Option<DateTime<Local>>,
}

/// Placeholder flag plus row body, with the renderer as its only writer.
pub struct DashboardTable {
    stale_after: u32,
    state: RwLock<TableState>,
}

pub type TableRef = Arc<DashboardTable>;

impl DashboardTable {
    pub fn new(stale_after: u32) -> Self {
        Self {
            stale_after: stale_after.max(1),
            state: RwLock::new(TableState {
                phase: Phase::Loading,
                rows: Vec::new(),
                consecutive_failures: 0,
                updated_at: None,
            }),
        }
    }

    /// Swaps the whole body in one step. Returns `true` only for the call that
    /// moved the table out of `Loading`.
    pub fn replace_rows(&self, rows: Vec<NodeRow>) -> bool {
        let mut state = self.state.write();
        state.rows = rows;
        state.consecutive_failures = 0;
        state.updated_at = Some(Local::now());

        let became_live = state.phase == Phase::Loading;
        if became_live {
            state.phase = Phase::Live;
            info!("first snapshot rendered, {} rows", state.rows.len());
        }
        became_live
    }

    /// Counts a failed cycle, leaving rows and phase untouched.
    pub fn record_failure(&self) -> u32 {
        let mut state = self.state.write();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.consecutive_failures
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn rows(&self) -> Vec<NodeRow> {
        self.state.read().rows.clone()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.read().consecutive_failures
    }

    pub fn stale_after(&self) -> u32 {
        self.stale_after
    }

    pub fn is_stale(&self) -> bool {
        self.consecutive_failures() >= self.stale_after
    }

    pub fn view(&self) -> TableView {
        let state = self.state.read();
        TableView {
            phase: state.phase,
            rows: state.rows.clone(),
            stale: state.consecutive_failures >= self.stale_after,
            consecutive_failures: state.consecutive_failures,
            updated_at: state.updated_at,
        }
    }
}

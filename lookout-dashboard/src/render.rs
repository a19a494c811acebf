//! Maps a cluster snapshot onto table rows.
//!
//! Rendering is pure: the same snapshot always yields the same rows, the local
//! node first and the peers after it in provider order.

use std::fmt::{Display, Formatter};

use lookout_common::types::{ClusterSnapshot, MemStats, NodeSnapshot};

pub const COLUMNS: [&str; 9] = [
    "Name",
    "Address",
    "Health",
    "State",
    "Nodes Alive",
    "Memory",
    "CPUs",
    "Goroutines",
    "Queue",
];

/// Only affects emphasis, both kinds carry the same columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Local,
    Peer,
}

/// The labelled memory cell. Values are shown exactly as received, in MB.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryBlock(pub Option<MemStats>);

impl MemoryBlock {
    pub const HEIGHT: u16 = 3;

    pub fn lines(&self) -> Vec<String> {
        match &self.0 {
            Some(stats) => vec![
                format!("Heap Size: {} MB", stats.alloc),
                format!("Total Heap Increment: {} MB", stats.total_alloc),
                format!("Currently Used: {} MB", stats.sys),
            ],
            None => Vec::new(),
        }
    }
}

impl Display for MemoryBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRow {
    pub kind: RowKind,
    pub name: String,
    pub address: String,
    pub health: String,
    pub state: String,
    pub nodes_alive: String,
    pub memory: MemoryBlock,
    pub cpus: String,
    pub goroutines: String,
    pub queue_count: String,
}

impl NodeRow {
    pub fn new(kind: RowKind, node: &NodeSnapshot) -> Self {
        Self {
            kind,
            name: node.name.to_string(),
            address: node.address.to_string(),
            health: or_blank(&node.health),
            state: node.state.to_string(),
            nodes_alive: or_blank(&node.nodes_alive),
            memory: MemoryBlock(node.mem_stats.clone()),
            cpus: or_blank(&node.cpus),
            goroutines: or_blank(&node.goroutines),
            queue_count: or_blank(&node.queue_count),
        }
    }

    /// Display cells in [`COLUMNS`] order.
    pub fn cells(&self) -> [String; 9] {
        [
            self.name.clone(),
            self.address.clone(),
            self.health.clone(),
            self.state.clone(),
            self.nodes_alive.clone(),
            self.memory.to_string(),
            self.cpus.clone(),
            self.goroutines.clone(),
            self.queue_count.clone(),
        ]
    }
}

fn or_blank<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn render_rows(snapshot: &ClusterSnapshot) -> Vec<NodeRow> {
    let mut rows = Vec::with_capacity(snapshot.node_count());
    rows.push(NodeRow::new(RowKind::Local, &snapshot.local));
    for peer in snapshot.others.iter() {
        rows.push(NodeRow::new(RowKind::Peer, peer));
    }
    rows
}

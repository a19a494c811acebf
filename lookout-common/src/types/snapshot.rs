use std::fmt::{Display, Formatter};

use faststr::FastStr;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Memory figures reported by a node, already converted to MB by the provider.
/// Kept as the provider's own numbers so fractional values display verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MemStats {
    pub alloc: Number,
    pub total_alloc: Number,
    pub sys: Number,
}

/// Health score as computed by the provider. Never interpreted, only displayed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Health {
    Score(i64),
    Ratio(f64),
    Label(FastStr),
}

impl Display for Health {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Health::Score(score) => write!(f, "{score}"),
            Health::Ratio(ratio) => write!(f, "{ratio}"),
            Health::Label(label) => write!(f, "{label}"),
        }
    }
}

/// A single node as the provider reports it. Every field may be missing, a
/// missing one leaves a blank cell instead of dropping the whole snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct NodeSnapshot {
    pub name: FastStr,
    pub address: FastStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    pub state: FastStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes_alive: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_stats: Option<MemStats>,
    #[serde(rename = "CPUs", skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    #[serde(rename = "GoRoutines", skip_serializing_if = "Option::is_none")]
    pub goroutines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_count: Option<u64>,
}

/// One poll cycle's payload: the local node inlined at the top level followed by
/// the peers it knows about, in provider order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClusterSnapshot {
    #[serde(flatten)]
    pub local: NodeSnapshot,
    #[serde(rename = "Others", default, deserialize_with = "null_as_empty")]
    pub others: Vec<NodeSnapshot>,
}

impl ClusterSnapshot {
    pub fn node_count(&self) -> usize {
        1 + self.others.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeSnapshot> {
        std::iter::once(&self.local).chain(self.others.iter())
    }
}

// the provider encodes an empty peer list as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NodeSnapshot>, D::Error>
where
    D: Deserializer<'de>,
{
    let others: Option<Vec<NodeSnapshot>> = Option::deserialize(deserializer)?;
    Ok(others.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{ClusterSnapshot, Health, MemStats, NodeSnapshot};

    const SNAPSHOT: &str = r#"{
        "Name": "node-a",
        "Address": "10.0.0.1:7000",
        "Health": 1,
        "State": "alive",
        "NodesAlive": 3,
        "MemStats": {"Alloc": 12, "TotalAlloc": 40, "Sys": 25},
        "CPUs": 4,
        "GoRoutines": 18,
        "QueueCount": 2,
        "Others": [{
            "Name": "node-b",
            "Address": "10.0.0.2:7000",
            "Health": 1,
            "State": "alive",
            "NodesAlive": 3,
            "MemStats": {"Alloc": 9, "TotalAlloc": 30, "Sys": 20},
            "CPUs": 4,
            "GoRoutines": 15,
            "Others": null
        }]
    }"#;

    #[test]
    fn test_decode_snapshot() {
        let snapshot: ClusterSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.local.name.as_str(), "node-a");
        assert_eq!(snapshot.local.address.as_str(), "10.0.0.1:7000");
        assert_eq!(snapshot.local.health, Some(Health::Score(1)));
        assert_eq!(
            snapshot.local.mem_stats,
            Some(MemStats {
                alloc: 12u64.into(),
                total_alloc: 40u64.into(),
                sys: 25u64.into()
            })
        );
        assert_eq!(snapshot.local.cpus, Some(4));
        assert_eq!(snapshot.local.goroutines, Some(18));
        assert_eq!(snapshot.local.queue_count, Some(2));

        assert_eq!(snapshot.node_count(), 2);
        let peer = &snapshot.others[0];
        assert_eq!(peer.name.as_str(), "node-b");
        assert_eq!(peer.queue_count, None);

        let names: Vec<&str> = snapshot.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["node-a", "node-b"]);
    }

    #[test]
    fn test_missing_or_null_others() {
        let local = r#""Name":"solo","Address":"127.0.0.1","Health":"ok","State":"Alive",
            "NodesAlive":1,"CPUs":2,"GoRoutines":7"#;

        let absent: ClusterSnapshot = serde_json::from_str(&format!("{{{local}}}")).unwrap();
        assert!(absent.others.is_empty());
        assert_eq!(absent.local.health, Some(Health::Label("ok".into())));
        assert_eq!(absent.local.mem_stats, None);

        let null: ClusterSnapshot =
            serde_json::from_str(&format!("{{{local},\"Others\":null}}")).unwrap();
        assert!(null.others.is_empty());

        let empty: ClusterSnapshot =
            serde_json::from_str(&format!("{{{local},\"Others\":[]}}")).unwrap();
        assert_eq!(empty.node_count(), 1);
    }

    #[test]
    fn test_partial_mem_stats_is_rejected() {
        let body = r#"{"Name":"node-a","Address":"127.0.0.1","Health":0,"State":"Alive",
            "NodesAlive":1,"MemStats":{"Alloc":1,"Sys":3},"CPUs":8,"GoRoutines":11}"#;
        assert!(serde_json::from_str::<ClusterSnapshot>(body).is_err());
    }

    #[test]
    fn test_missing_fields_decode_as_blank() {
        let mut body: serde_json::Value = serde_json::from_str(SNAPSHOT).unwrap();
        let peer = body["Others"][0].as_object_mut().unwrap();
        peer.remove("CPUs");
        peer.remove("GoRoutines");
        let snapshot: ClusterSnapshot = serde_json::from_value(body).unwrap();
        assert_eq!(snapshot.node_count(), 2);
        assert_eq!(snapshot.local.cpus, Some(4));
        assert_eq!(snapshot.others[0].cpus, None);
        assert_eq!(snapshot.others[0].goroutines, None);

        let bare: ClusterSnapshot = serde_json::from_str(r#"{"Others":[{}]}"#).unwrap();
        assert_eq!(bare.local, NodeSnapshot::default());
        assert_eq!(bare.node_count(), 2);
        assert!(bare.others[0].name.is_empty());
        assert_eq!(bare.others[0].health, None);
    }

    #[test]
    fn test_fractional_mem_stats_kept_verbatim() {
        let body = r#"{"Name":"node-a","MemStats":{"Alloc":12.5,"TotalAlloc":40,"Sys":0.25}}"#;
        let snapshot: ClusterSnapshot = serde_json::from_str(body).unwrap();
        let stats = snapshot.local.mem_stats.unwrap();
        assert_eq!(stats.alloc.to_string(), "12.5");
        assert_eq!(stats.total_alloc.to_string(), "40");
        assert_eq!(stats.sys.to_string(), "0.25");
    }

    #[test]
    fn test_health_display() {
        assert_eq!(Health::Score(-2).to_string(), "-2");
        assert_eq!(Health::Ratio(0.5).to_string(), "0.5");
        assert_eq!(Health::Label("degraded".into()).to_string(), "degraded");
    }
}

//! Typed shape of one metrics snapshot.
//!
//! The server owns this format; the dashboard only reads it. Every group and
//! every leaf is optional, and deserialization is lenient: a field that is
//! missing, `null`, or carries the wrong JSON type comes out as `None` instead
//! of failing the whole snapshot. Only a body that is not a JSON object at all
//! is rejected (see [`MetricsSnapshot::from_json`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FetchError;

// ---------------------------------------------------------------------------
// Lenient field helpers
// ---------------------------------------------------------------------------

/// Deserialize any JSON value, then keep it only if it fits `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A numeric leaf. Anything that is not a JSON number, or a number too large
/// for `f64` (bodies are parsed with arbitrary precision, so `1e400` reaches
/// here intact), becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

/// A text leaf. Numbers and booleans are kept in their JSON spelling;
/// `null`, arrays and objects become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Like [`lenient`], but for lists: a bad element becomes an all-`None`
/// entry in place so the order of the good ones is preserved.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Metric groups
// ---------------------------------------------------------------------------

/// CPU load and package temperature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Percent, 0-100.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    /// Degrees Celsius.
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Memory pressure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamMetrics {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub used_gb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub total_gb: Option<f64>,
}

/// GPU load and core temperature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuMetrics {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Primary drive fill level and temperature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetrics {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub used_gb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub total_gb: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Identity of the monitored host as the server sees itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// One row of the server's top-processes list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessEntry {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub ram: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub gpu: Option<f64>,
}

// ---------------------------------------------------------------------------
// MetricsSnapshot
// ---------------------------------------------------------------------------

/// One complete or partial metrics payload for a single poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuMetrics>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ram: Option<RamMetrics>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuMetrics>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskMetrics>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkInfo>,
    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub processes: Option<Vec<ProcessEntry>>,
}

impl MetricsSnapshot {
    /// Parse a response body.
    ///
    /// The body must be a JSON object. Anything inside it is taken
    /// leniently, so this only fails on bodies that are not JSON or whose
    /// top level is an array, string, number, bool or `null`.
    pub fn from_json(body: &[u8]) -> Result<Self, FetchError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| FetchError::MalformedBody(e.to_string()))?;
        if !value.is_object() {
            return Err(FetchError::MalformedBody(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| FetchError::MalformedBody(e.to_string()))
    }

    /// True when the payload carried none of the known groups.
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.ram.is_none()
            && self.gpu.is_none()
            && self.disk.is_none()
            && self.network.is_none()
            && self.processes.is_none()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "cpu": {"usage": 12.5, "temperature": 61.0},
        "gpu": {"usage": 3, "temperature": 40},
        "ram": {"usage": 48.2, "used_gb": 15.4, "total_gb": 31.9},
        "disk": {"usage": 71.3, "used_gb": 680.2, "total_gb": 953.9, "temperature": 38.9},
        "network": {"hostname": "rig", "ip": "192.168.0.43"},
        "processes": [
            {"name": "firefox", "cpu": 9.1, "ram": 6.2, "gpu": 0},
            {"name": "code", "cpu": 4.0, "ram": 3.3, "gpu": 0}
        ]
    }"#;

    #[test]
    fn parses_full_payload() {
        let snap = MetricsSnapshot::from_json(FULL.as_bytes()).unwrap();
        assert_eq!(snap.cpu.as_ref().unwrap().usage, Some(12.5));
        assert_eq!(snap.ram.as_ref().unwrap().total_gb, Some(31.9));
        assert_eq!(snap.disk.as_ref().unwrap().temperature, Some(38.9));
        assert_eq!(
            snap.network.as_ref().unwrap().hostname.as_deref(),
            Some("rig")
        );
        let procs = snap.processes.unwrap();
        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0].name.as_deref(), Some("firefox"));
        assert_eq!(procs[1].name.as_deref(), Some("code"));
    }

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let snap = MetricsSnapshot::from_json(b"{}").unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn null_and_wrong_typed_groups_become_none() {
        let snap = MetricsSnapshot::from_json(
            br#"{"cpu": null, "ram": 7, "gpu": "busy", "disk": [], "network": {"hostname": "a"}}"#,
        )
        .unwrap();
        assert!(snap.cpu.is_none());
        assert!(snap.ram.is_none());
        assert!(snap.gpu.is_none());
        assert!(snap.disk.is_none());
        assert_eq!(snap.network.unwrap().ip, None);
    }

    #[test]
    fn wrong_typed_leaf_only_drops_that_leaf() {
        let snap =
            MetricsSnapshot::from_json(br#"{"cpu": {"usage": "high", "temperature": 70}}"#)
                .unwrap();
        let cpu = snap.cpu.unwrap();
        assert_eq!(cpu.usage, None);
        assert_eq!(cpu.temperature, Some(70.0));
    }

    #[test]
    fn out_of_range_number_only_drops_that_leaf() {
        let snap = MetricsSnapshot::from_json(
            br#"{"cpu":{"usage":42},"disk":{"usage":10,"used_gb":1e400,"total_gb":2}}"#,
        )
        .unwrap();
        assert_eq!(snap.cpu.unwrap().usage, Some(42.0));
        let disk = snap.disk.unwrap();
        assert_eq!(disk.usage, Some(10.0));
        assert_eq!(disk.used_gb, None);
        assert_eq!(disk.total_gb, Some(2.0));
    }

    #[test]
    fn scalar_text_leaves_keep_their_spelling() {
        let snap = MetricsSnapshot::from_json(
            br#"{"network": {"hostname": 123, "ip": ["10.0.0.1"]},
                 "processes": [{"name": 4711}, {"name": true}, {"name": null}]}"#,
        )
        .unwrap();
        let network = snap.network.unwrap();
        assert_eq!(network.hostname.as_deref(), Some("123"));
        assert_eq!(network.ip, None);
        let names: Vec<Option<String>> = snap
            .processes
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec![Some("4711".into()), Some("true".into()), None]);
    }

    #[test]
    fn bad_process_entries_keep_their_slot() {
        let snap = MetricsSnapshot::from_json(
            br#"{"processes": [{"name": "a", "cpu": 1}, 42, {"name": "c"}]}"#,
        )
        .unwrap();
        let procs = snap.processes.unwrap();
        assert_eq!(procs.len(), 3);
        assert_eq!(procs[1], ProcessEntry::default());
        assert_eq!(procs[2].name.as_deref(), Some("c"));
    }

    #[test]
    fn processes_not_a_list_is_none() {
        let snap = MetricsSnapshot::from_json(br#"{"processes": {"name": "x"}}"#).unwrap();
        assert!(snap.processes.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let snap =
            MetricsSnapshot::from_json(br#"{"uptime": 99, "cpu": {"usage": 1, "cores": 8}}"#)
                .unwrap();
        assert_eq!(snap.cpu.unwrap().usage, Some(1.0));
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        for body in [&b"[]"[..], b"42", b"\"ok\"", b"null", b"<html>oops</html>", b""] {
            let err = MetricsSnapshot::from_json(body).unwrap_err();
            assert!(
                matches!(err, FetchError::MalformedBody(_)),
                "{:?} should be malformed, got {err:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn serializes_without_absent_fields() {
        let snap = MetricsSnapshot::from_json(br#"{"cpu": {"usage": 5}}"#).unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"cpu":{"usage":5.0}}"#);
    }
}

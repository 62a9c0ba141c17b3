//! Redis `INFO` parsing.
//!
//! Parsing is split in two stages. [`decode_info`] turns any `key:value`
//! status text into an untyped [`InfoMap`]. [`parse_metrics`] then projects
//! that map onto the fixed set of fields the dashboard shows.

use serde::Serialize;
use std::collections::HashMap;

/// Untyped view of a decoded `INFO` reply.
pub type InfoMap = HashMap<String, String>;

/// Fields copied verbatim from the `INFO` reply when present.
pub const METRIC_FIELDS: [&str; 5] = [
    "redis_version",
    "used_memory",
    "mem_fragmentation_ratio",
    "connected_clients",
    "blocked_clients",
];

/// Backend health metrics shown on the dashboard.
///
/// Every field is optional; fields missing from the source are left out of
/// the serialized output rather than reported as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Server version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
    /// Bytes allocated by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_memory: Option<String>,
    /// Ratio of RSS to allocated memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_fragmentation_ratio: Option<String>,
    /// Number of client connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_clients: Option<String>,
    /// Clients blocked on a blocking call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_clients: Option<String>,
    /// Host memory, or `maxmemory` when the host total is not reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_system_memory: Option<String>,
}

impl MetricsSnapshot {
    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.redis_version.is_none()
            && self.used_memory.is_none()
            && self.mem_fragmentation_ratio.is_none()
            && self.connected_clients.is_none()
            && self.blocked_clients.is_none()
            && self.total_system_memory.is_none()
    }
}

/// Decode `INFO` text into a flat key/value map.
///
/// Section headers (`# Server`), comments and lines without a `:` are
/// skipped. Values are kept as raw strings.
#[must_use]
pub fn decode_info(raw: &str) -> InfoMap {
    let mut info = InfoMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) => {
                info.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => tracing::debug!(line, "Skipping INFO line without separator"),
        }
    }

    info
}

/// Parse `INFO` text into a [`MetricsSnapshot`].
#[must_use]
pub fn parse_metrics(raw: &str) -> MetricsSnapshot {
    project(&decode_info(raw))
}

/// Project a decoded `INFO` map onto the dashboard fields.
#[must_use]
pub fn project(info: &InfoMap) -> MetricsSnapshot {
    let field = |key: &str| {
        info.get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    };

    let [redis_version, used_memory, mem_fragmentation_ratio, connected_clients, blocked_clients] =
        METRIC_FIELDS.map(field);

    MetricsSnapshot {
        redis_version,
        used_memory,
        mem_fragmentation_ratio,
        connected_clients,
        blocked_clients,
        total_system_memory: field("total_system_memory").or_else(|| field("maxmemory")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_INFO: &str = "# Server\r\n\
        redis_version:7.2.4\r\n\
        redis_mode:standalone\r\n\
        \r\n\
        # Clients\r\n\
        connected_clients:12\r\n\
        blocked_clients:3\r\n\
        \r\n\
        # Memory\r\n\
        used_memory:1048576\r\n\
        total_system_memory:17179869184\r\n\
        maxmemory:0\r\n\
        mem_fragmentation_ratio:1.23\r\n\
        \r\n\
        # Keyspace\r\n\
        db0:keys=42,expires=0,avg_ttl=0\r\n";

    #[test]
    fn test_decode_info_skips_headers_and_blank_lines() {
        let info = decode_info(SAMPLE_INFO);
        assert_eq!(info.get("redis_version").map(String::as_str), Some("7.2.4"));
        assert_eq!(info.get("db0").map(String::as_str), Some("keys=42,expires=0,avg_ttl=0"));
        assert!(!info.keys().any(|key| key.starts_with('#')));
        assert_eq!(info.len(), 9);
    }

    #[test]
    fn test_parse_full_info() {
        let metrics = parse_metrics(SAMPLE_INFO);
        assert_eq!(metrics.redis_version.as_deref(), Some("7.2.4"));
        assert_eq!(metrics.used_memory.as_deref(), Some("1048576"));
        assert_eq!(metrics.mem_fragmentation_ratio.as_deref(), Some("1.23"));
        assert_eq!(metrics.connected_clients.as_deref(), Some("12"));
        assert_eq!(metrics.blocked_clients.as_deref(), Some("3"));
        assert_eq!(metrics.total_system_memory.as_deref(), Some("17179869184"));
    }

    #[test]
    fn test_maxmemory_fallback() {
        let metrics = parse_metrics("redis_version:6.2.0\r\nused_memory:100\r\nmaxmemory:500\r\n");
        assert_eq!(
            metrics,
            MetricsSnapshot {
                redis_version: Some("6.2.0".to_string()),
                used_memory: Some("100".to_string()),
                total_system_memory: Some("500".to_string()),
                ..MetricsSnapshot::default()
            }
        );

        let json = serde_json::to_value(&metrics).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("mem_fragmentation_ratio"));
        assert!(!object.contains_key("connected_clients"));
        assert!(!object.contains_key("blocked_clients"));
    }

    #[test]
    fn test_total_system_memory_wins_over_maxmemory() {
        let metrics = parse_metrics("maxmemory:500\r\ntotal_system_memory:900\r\n");
        assert_eq!(metrics.total_system_memory.as_deref(), Some("900"));
    }

    #[test]
    fn test_empty_values_are_omitted() {
        let metrics = parse_metrics("redis_version:\r\ntotal_system_memory:\r\nmaxmemory:64\r\n");
        assert_eq!(metrics.redis_version, None);
        assert_eq!(metrics.total_system_memory.as_deref(), Some("64"));
    }

    #[test]
    fn test_malformed_input_yields_empty_snapshot() {
        assert!(parse_metrics("").is_empty());
        assert!(parse_metrics("not a status reply\nstill nothing").is_empty());
        assert_eq!(serde_json::to_string(&parse_metrics("")).unwrap(), "{}");
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let info = decode_info("executable:/usr/bin/redis-server\nconfig_file:C:\\redis.conf\n");
        assert_eq!(info.get("config_file").map(String::as_str), Some("C:\\redis.conf"));
    }
}

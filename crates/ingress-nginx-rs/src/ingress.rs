//! Ingress resource JSON parsing
//!
//! kubectl returns resources as JSON documents; the shapes here are the
//! few fields this tool reads, navigated out of `serde_json::Value` rather
//! than deserialized into the full API schema.

use crate::error::IngressNginxError;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// One routing entry within an ingress spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRule {
    pub host: String,
}

impl HostRule {
    /// Rules may be declared without a host; those are skipped when
    /// deriving per-host commands.
    pub fn is_routable(&self) -> bool {
        !self.host.is_empty()
    }
}

/// Full resource definition of one ingress, as fetched with `-o json`
#[derive(Debug, Clone)]
pub struct IngressDetail {
    pub name: String,
    pub namespace: Option<String>,
    pub rules: Vec<HostRule>,
}

/// One row of the resource tree
#[derive(Debug, Clone)]
pub struct IngressSummary {
    pub name: String,
    pub namespace: Option<String>,
    pub class: Option<String>,
    pub hosts: Vec<String>,
    pub tls_entries: usize,
    pub created: Option<DateTime<Utc>>,
}

impl IngressSummary {
    /// Compact age column, kubectl-style
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let Some(created) = self.created else {
            return "-".to_string();
        };
        let seconds = (now - created).num_seconds().max(0);
        if seconds < 60 {
            format!("{seconds}s")
        } else if seconds < 3600 {
            format!("{}m", seconds / 60)
        } else if seconds < 86_400 {
            format!("{}h", seconds / 3600)
        } else {
            format!("{}d", seconds / 86_400)
        }
    }
}

/// Parse the document returned by `get ingress <name> -o json`.
pub fn parse_ingress_detail(json: &str) -> Result<IngressDetail, IngressNginxError> {
    let doc: Value = serde_json::from_str(json)?;
    ingress_detail_from_value(&doc)
}

fn ingress_detail_from_value(doc: &Value) -> Result<IngressDetail, IngressNginxError> {
    let metadata = doc.get("metadata");

    let name = metadata
        .and_then(|m| m.get("name"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            IngressNginxError::UnexpectedPayload("ingress without metadata.name".to_string())
        })?
        .to_string();

    let namespace = metadata
        .and_then(|m| m.get("namespace"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    // Rules without a host stay in the list; iteration decides routability.
    let rules = doc
        .get("spec")
        .and_then(|s| s.get("rules"))
        .and_then(|r| r.as_array())
        .map(|rules| {
            rules
                .iter()
                .map(|rule| HostRule {
                    host: rule
                        .get("host")
                        .and_then(|h| h.as_str())
                        .unwrap_or("")
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(IngressDetail {
        name,
        namespace,
        rules,
    })
}

/// Parse the listing returned by `get ingress -o json`.
///
/// Entries without a name are skipped rather than failing the whole
/// listing.
pub fn parse_ingress_list(json: &str) -> Result<Vec<IngressSummary>, IngressNginxError> {
    let doc: Value = serde_json::from_str(json)?;
    let items = doc
        .get("items")
        .and_then(|i| i.as_array())
        .ok_or_else(|| {
            IngressNginxError::UnexpectedPayload("ingress list without items".to_string())
        })?;

    let mut rows = Vec::new();
    for item in items {
        let metadata = item.get("metadata");
        let Some(name) = metadata
            .and_then(|m| m.get("name"))
            .and_then(|v| v.as_str())
        else {
            continue;
        };

        let namespace = metadata
            .and_then(|m| m.get("namespace"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let spec = item.get("spec");

        let class = spec
            .and_then(|s| s.get("ingressClassName"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let hosts = spec
            .and_then(|s| s.get("rules"))
            .and_then(|r| r.as_array())
            .map(|rules| {
                rules
                    .iter()
                    .filter_map(|rule| rule.get("host").and_then(|h| h.as_str()))
                    .map(|h| h.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let tls_entries = spec
            .and_then(|s| s.get("tls"))
            .and_then(|t| t.as_array())
            .map(|t| t.len())
            .unwrap_or(0);

        let created = metadata
            .and_then(|m| m.get("creationTimestamp"))
            .and_then(|v| v.as_str())
            .and_then(|ts| ts.parse::<DateTime<Utc>>().ok());

        rows.push(IngressSummary {
            name: name.to_string(),
            namespace,
            class,
            hosts,
            tls_entries,
            created,
        });
    }

    Ok(rows)
}

//! Domain types for ingress-pilot

use serde::{Deserialize, Serialize};

/// A resolved selection from the resource tree.
///
/// Tagged by manifest kind so flows match on the variant instead of
/// probing fields; only the Ingress branch is actionable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandTarget {
    Ingress {
        name: String,
        namespace: Option<String>,
    },
    Other {
        kind: String,
        name: String,
    },
}

impl CommandTarget {
    pub fn name(&self) -> &str {
        match self {
            CommandTarget::Ingress { name, .. } => name,
            CommandTarget::Other { name, .. } => name,
        }
    }

    pub fn is_ingress(&self) -> bool {
        matches!(self, CommandTarget::Ingress { .. })
    }
}

/// The three user-invocable inspection actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Backends,
    HostConf,
    HostCerts,
}

impl ActionKind {
    /// Label shown next to the progress spinner while the action runs
    pub fn progress_label(&self) -> &'static str {
        match self {
            ActionKind::Backends => "Fetching ingress backends",
            ActionKind::HostConf => "Fetching host configuration",
            ActionKind::HostCerts => "Fetching host certificates",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Backends => write!(f, "list backends"),
            ActionKind::HostConf => write!(f, "show host configuration"),
            ActionKind::HostCerts => write!(f, "show host certificates"),
        }
    }
}

/// A read-only document produced by one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    /// Content-type hint for the viewer; rendering falls back to plain
    /// text when nothing is registered for it.
    pub language: String,
    pub body: String,
}

impl Document {
    /// Compose the display body: title, blank line, captured content.
    pub fn new(title: impl Into<String>, language: impl Into<String>, content: &str) -> Self {
        let title = title.into();
        Self {
            body: format!("{title}\n\n{content}"),
            title,
            language: language.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_body_is_title_blank_line_content() {
        let doc = Document::new("Ingress Backends:", "json", "[]");
        assert_eq!(doc.body, "Ingress Backends:\n\n[]");
        assert_eq!(doc.title, "Ingress Backends:");
        assert_eq!(doc.language, "json");
    }

    #[test]
    fn only_the_ingress_variant_is_actionable() {
        let ingress = CommandTarget::Ingress {
            name: "shop".to_string(),
            namespace: None,
        };
        let service = CommandTarget::Other {
            kind: "Service".to_string(),
            name: "shop-svc".to_string(),
        };
        assert!(ingress.is_ingress());
        assert!(!service.is_ingress());
        assert_eq!(service.name(), "shop-svc");
    }
}

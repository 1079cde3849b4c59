//! Command orchestration
//!
//! Drives the three inspection actions over two injected collaborators: a
//! kubectl provider and a document sink, both resolved once at startup by
//! the caller. A selection that is not an ingress is a silent no-op, a
//! failed action is an error for the caller to report, and a failed host
//! iteration is isolated so its siblings still run.

use crate::types::{ActionKind, CommandTarget, Document};
use ingress_nginx_rs::certs::decode_certificates;
use ingress_nginx_rs::kubectl::Kubectl;
use ingress_nginx_rs::plugin::{self, ControllerLocator};
use ingress_nginx_rs::IngressNginxError;

/// Receives rendered documents; the TUI pushes them onto its document
/// stack, tests collect them.
pub trait DocumentSink {
    fn present(&mut self, document: Document);
}

/// One failed host iteration, reported without aborting the siblings
#[derive(Debug)]
pub struct HostFailure {
    pub host: String,
    pub error: IngressNginxError,
}

/// What one action run amounted to
#[derive(Debug)]
pub enum Outcome {
    /// Selection missing or not an ingress; nothing was invoked.
    NotApplicable,
    /// The action ran to completion.
    Completed {
        presented: usize,
        skipped_hosts: usize,
        failures: Vec<HostFailure>,
    },
}

/// Drives the inspection actions against one controller deployment
pub struct Orchestrator {
    locator: ControllerLocator,
}

impl Orchestrator {
    pub fn new(locator: ControllerLocator) -> Self {
        Self { locator }
    }

    /// Entry point for all three actions.
    pub fn run(
        &self,
        action: ActionKind,
        target: Option<&CommandTarget>,
        kubectl: &dyn Kubectl,
        sink: &mut dyn DocumentSink,
    ) -> Result<Outcome, IngressNginxError> {
        let Some(CommandTarget::Ingress { name, .. }) = target else {
            tracing::debug!(?action, "selection is not an ingress, ignoring");
            return Ok(Outcome::NotApplicable);
        };

        match action {
            ActionKind::Backends => self.backends(kubectl, sink),
            ActionKind::HostConf => self.per_host(name, kubectl, sink, |host| {
                let output = plugin::host_conf(kubectl, &self.locator, host)?;
                Ok(Document::new(
                    format!("Configuration for ingress: {name} host: {host}"),
                    "nginx",
                    &output,
                ))
            }),
            ActionKind::HostCerts => self.per_host(name, kubectl, sink, |host| {
                let output = plugin::host_certs(kubectl, &self.locator, host)?;
                Ok(Document::new(
                    format!("Certificates for ingress: {name} host: {host}"),
                    "text",
                    &decode_certificates(&output),
                ))
            }),
        }
    }

    fn backends(
        &self,
        kubectl: &dyn Kubectl,
        sink: &mut dyn DocumentSink,
    ) -> Result<Outcome, IngressNginxError> {
        let output = plugin::backends(kubectl, &self.locator)?;
        sink.present(Document::new("Ingress Backends:", "json", &output));
        Ok(Outcome::Completed {
            presented: 1,
            skipped_hosts: 0,
            failures: Vec::new(),
        })
    }

    /// Fetch the resource definition and run one command per routable
    /// host, in rule order. Failures are collected per host.
    fn per_host<F>(
        &self,
        name: &str,
        kubectl: &dyn Kubectl,
        sink: &mut dyn DocumentSink,
        fetch: F,
    ) -> Result<Outcome, IngressNginxError>
    where
        F: Fn(&str) -> Result<Document, IngressNginxError>,
    {
        let detail = plugin::get_ingress(kubectl, name)?;

        let mut presented = 0;
        let mut skipped_hosts = 0;
        let mut failures = Vec::new();

        for rule in &detail.rules {
            if !rule.is_routable() {
                skipped_hosts += 1;
                continue;
            }
            match fetch(&rule.host) {
                Ok(document) => {
                    sink.present(document);
                    presented += 1;
                }
                Err(error) => {
                    tracing::warn!(host = %rule.host, "host command failed: {error}");
                    failures.push(HostFailure {
                        host: rule.host.clone(),
                        error,
                    });
                }
            }
        }

        Ok(Outcome::Completed {
            presented,
            skipped_hosts,
            failures,
        })
    }
}

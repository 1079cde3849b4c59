//! ingress-nginx plugin command execution
//!
//! Derives the plugin command lines from a controller locator and runs them
//! through a `Kubectl` provider. The command grammar is the plugin's own:
//! space-separated tokens, host and locator values interpolated as-is.

use crate::error::IngressNginxError;
use crate::ingress::{self, IngressDetail, IngressSummary};
use crate::kubectl::Kubectl;

/// Built-in namespace of the controller deployment
pub const DEFAULT_NAMESPACE: &str = "ingress-nginx-ns";

/// Built-in name of the controller deployment
pub const DEFAULT_DEPLOYMENT: &str = "ingress-nginx-controller";

/// Which ingress-nginx controller deployment to query.
///
/// Resolved once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerLocator {
    pub namespace: String,
    pub deployment: String,
}

impl Default for ControllerLocator {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
        }
    }
}

impl ControllerLocator {
    pub fn new(namespace: impl Into<String>, deployment: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            deployment: deployment.into(),
        }
    }

    /// `ingress-nginx backends -n <namespace> --deployment <deployment>`
    pub fn backends_command(&self) -> String {
        format!(
            "ingress-nginx backends -n {} --deployment {}",
            self.namespace, self.deployment
        )
    }

    /// `ingress-nginx conf -n <namespace> --deployment <deployment> --host <host>`
    pub fn conf_command(&self, host: &str) -> String {
        format!(
            "ingress-nginx conf -n {} --deployment {} --host {}",
            self.namespace, self.deployment, host
        )
    }

    /// `ingress-nginx certs -n <namespace> --deployment <deployment> --host <host>`
    pub fn certs_command(&self, host: &str) -> String {
        format!(
            "ingress-nginx certs -n {} --deployment {} --host {}",
            self.namespace, self.deployment, host
        )
    }
}

/// `get ingress <name> -o json`
///
/// Namespace resolution is left to the kubectl context, matching the
/// listing command below.
pub fn get_ingress_command(name: &str) -> String {
    format!("get ingress {name} -o json")
}

/// `get ingress -o json`
pub const LIST_INGRESSES_COMMAND: &str = "get ingress -o json";

/// Run one command and demand a usable result: zero exit and non-empty
/// stdout. Anything else is an invocation failure.
fn invoke_checked(kubectl: &dyn Kubectl, command: &str) -> Result<String, IngressNginxError> {
    let result = kubectl.invoke_command(command)?;
    if result.code != 0 {
        return Err(IngressNginxError::CommandFailed {
            command: command.to_string(),
            code: result.code,
            stderr: result.stderr.trim().to_string(),
        });
    }
    if result.stdout.is_empty() {
        return Err(IngressNginxError::EmptyOutput {
            command: command.to_string(),
        });
    }
    Ok(result.stdout)
}

/// Fetch the controller's backend listing.
pub fn backends(
    kubectl: &dyn Kubectl,
    locator: &ControllerLocator,
) -> Result<String, IngressNginxError> {
    invoke_checked(kubectl, &locator.backends_command())
}

/// Fetch the rendered nginx configuration for one host.
pub fn host_conf(
    kubectl: &dyn Kubectl,
    locator: &ControllerLocator,
    host: &str,
) -> Result<String, IngressNginxError> {
    invoke_checked(kubectl, &locator.conf_command(host))
}

/// Fetch the certificate chain served for one host.
///
/// Returns the raw PEM blob as printed by the plugin; decoding is the
/// caller's concern.
pub fn host_certs(
    kubectl: &dyn Kubectl,
    locator: &ControllerLocator,
    host: &str,
) -> Result<String, IngressNginxError> {
    invoke_checked(kubectl, &locator.certs_command(host))
}

/// Fetch and parse the full resource definition of one ingress.
pub fn get_ingress(kubectl: &dyn Kubectl, name: &str) -> Result<IngressDetail, IngressNginxError> {
    let stdout = invoke_checked(kubectl, &get_ingress_command(name))?;
    ingress::parse_ingress_detail(&stdout)
}

/// Fetch and parse the ingress listing for the resource tree.
pub fn list_ingresses(kubectl: &dyn Kubectl) -> Result<Vec<IngressSummary>, IngressNginxError> {
    let stdout = invoke_checked(kubectl, LIST_INGRESSES_COMMAND)?;
    ingress::parse_ingress_list(&stdout)
}

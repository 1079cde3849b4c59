//! Rust SDK for the kubectl ingress-nginx plugin
//!
//! Wraps the plugin's inspection subcommands: derives the command lines,
//! invokes kubectl, and decodes the captured output, including PEM-encoded
//! certificate chains.

pub mod certs;
pub mod error;
pub mod ingress;
pub mod kubectl;
pub mod plugin;

pub use certs::{CertificateSummary, decode_certificates};
pub use error::IngressNginxError;
pub use ingress::{HostRule, IngressDetail, IngressSummary};
pub use kubectl::{CommandResult, Kubectl, KubectlCli};
pub use plugin::{ControllerLocator, DEFAULT_DEPLOYMENT, DEFAULT_NAMESPACE};

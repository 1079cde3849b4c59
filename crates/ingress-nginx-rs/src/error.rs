//! Error types for ingress-nginx-rs

use thiserror::Error;

/// Errors that can occur when invoking kubectl or decoding its output
#[derive(Error, Debug)]
pub enum IngressNginxError {
    /// kubectl binary is not on the PATH
    #[error("kubectl not found: {0}")]
    KubectlNotFound(String),

    /// kubectl exists but did not answer the client version probe
    #[error("kubectl is not usable: {0}")]
    KubectlUnavailable(String),

    /// The ingress-nginx plugin subcommand is not installed
    #[error("ingress-nginx plugin is not available: {0}")]
    PluginUnavailable(String),

    /// Command exited with a nonzero status
    #[error("`kubectl {command}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Command exited zero but produced no output
    #[error("`kubectl {command}` produced no output")]
    EmptyOutput { command: String },

    /// Resource JSON did not parse
    #[error("Failed to parse resource JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource JSON parsed but did not carry the expected shape
    #[error("Unexpected resource payload: {0}")]
    UnexpectedPayload(String),

    /// PEM block did not decode as an X.509 certificate
    #[error("Failed to decode certificate: {0}")]
    CertificateParse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

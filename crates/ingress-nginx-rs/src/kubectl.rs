//! kubectl command execution
//!
//! Provides the invocation boundary between the tool and the cluster: every
//! piece of cluster state is read by spawning kubectl and capturing its
//! output. The `Kubectl` trait exists so flows can be exercised against a
//! recording fake instead of a live binary.

use crate::error::IngressNginxError;
use std::process::Command;

/// Outcome of one kubectl invocation
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// A usable result carries a zero exit code and non-empty stdout.
    pub fn is_success(&self) -> bool {
        self.code == 0 && !self.stdout.is_empty()
    }
}

/// Command-line invocation provider
pub trait Kubectl: Send + Sync {
    /// Run one command line against kubectl and capture its output.
    ///
    /// The command line is split on whitespace. Interpolated values (host
    /// names in particular) are not escaped or validated here; they reach
    /// the binary verbatim.
    fn invoke_command(&self, command_line: &str) -> Result<CommandResult, IngressNginxError>;
}

/// Kubectl provider backed by the real binary
#[derive(Debug, Clone)]
pub struct KubectlCli {
    program: String,
}

impl Default for KubectlCli {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

impl KubectlCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check that the binary answers at all.
    ///
    /// Executes: kubectl version --client
    pub fn probe(&self) -> Result<(), IngressNginxError> {
        let result = self.invoke_command("version --client")?;
        if result.code == 0 {
            Ok(())
        } else {
            Err(IngressNginxError::KubectlUnavailable(
                result.stderr.trim().to_string(),
            ))
        }
    }

    /// Check that the ingress-nginx plugin subcommand is installed.
    ///
    /// Executes: kubectl ingress-nginx --help
    pub fn probe_plugin(&self) -> Result<(), IngressNginxError> {
        let result = self.invoke_command("ingress-nginx --help")?;
        if result.code == 0 {
            Ok(())
        } else {
            Err(IngressNginxError::PluginUnavailable(
                result.stderr.trim().to_string(),
            ))
        }
    }
}

impl Kubectl for KubectlCli {
    fn invoke_command(&self, command_line: &str) -> Result<CommandResult, IngressNginxError> {
        let args: Vec<&str> = command_line.split_whitespace().collect();
        tracing::debug!(command = %command_line, "invoking {}", self.program);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    IngressNginxError::KubectlNotFound(self.program.clone())
                }
                _ => IngressNginxError::Io(e),
            })?;

        Ok(CommandResult {
            // code() is None when the process died to a signal
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit_and_output() {
        let ok = CommandResult {
            code: 0,
            stdout: "backend-1\n".to_string(),
            stderr: String::new(),
        };
        assert!(ok.is_success());

        let nonzero = CommandResult {
            code: 1,
            stdout: "partial".to_string(),
            stderr: "boom".to_string(),
        };
        assert!(!nonzero.is_success());

        let silent = CommandResult {
            code: 0,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!silent.is_success());
    }

    #[test]
    fn missing_binary_maps_to_not_found() {
        let cli = KubectlCli::new("ingress-pilot-test-no-such-binary");
        let err = cli.invoke_command("version --client").unwrap_err();
        assert!(matches!(err, IngressNginxError::KubectlNotFound(_)));
    }

    #[test]
    #[cfg(unix)]
    fn captures_stdout_of_real_process() {
        // Any argv-echoing binary works as a stand-in for kubectl here.
        let cli = KubectlCli::new("echo");
        let result = cli.invoke_command("ingress-nginx backends -n demo").unwrap();
        assert_eq!(result.code, 0);
        assert_eq!(result.stdout, "ingress-nginx backends -n demo\n");
        assert!(result.is_success());
    }
}

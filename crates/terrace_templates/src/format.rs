//! Infrastructure-language formatting.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::FormatError;

/// Text-to-text transform applied to every generated `.tf` file.
#[cfg_attr(test, mockall::automock)]
pub trait Formatter {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, FormatError>;
}

/// Pure-Rust formatter: parses the HCL and prints it canonically.
///
/// Comments do not survive the round trip; malformed HCL is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct HclFormatter;

impl Formatter for HclFormatter {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, FormatError> {
        let text = std::str::from_utf8(source).map_err(|e| FormatError(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let body = hcl::parse(text).map_err(|e| FormatError(e.to_string()))?;
        let mut formatted = hcl::format::to_string(&body).map_err(|e| FormatError(e.to_string()))?;
        if !formatted.ends_with('\n') {
            formatted.push('\n');
        }
        Ok(formatted.into_bytes())
    }
}

/// Pipes the source through `terraform fmt -`, keeping comments intact.
#[derive(Debug, Clone)]
pub struct TerraformFmt {
    binary: String,
}

impl Default for TerraformFmt {
    fn default() -> Self {
        Self::new()
    }
}

impl TerraformFmt {
    pub fn new() -> Self {
        Self {
            binary: "terraform".to_string(),
        }
    }

    /// Use a specific terraform binary.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Check if the terraform binary can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Formatter for TerraformFmt {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, FormatError> {
        debug!("Running {} fmt on {} bytes", self.binary, source.len());

        let mut child = Command::new(&self.binary)
            .args(["fmt", "-no-color", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FormatError(format!("Failed to run {} fmt: {}", self.binary, e)))?;

        // terraform reads all of stdin before writing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source)
                .map_err(|e| {
                    FormatError(format!("Failed to write to {} fmt: {}", self.binary, e))
                })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| FormatError(format!("Failed to wait for {} fmt: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FormatError(format!("{} fmt failed: {}", self.binary, stderr.trim())));
        }

        Ok(output.stdout)
    }
}

/// Leaves content untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Formatter for Passthrough {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, FormatError> {
        Ok(source.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hcl_formatter_normalizes() {
        let input = b"variable \"region\" {\ndefault=\"us-west-2\"\n    type = \"string\"\n}\n";
        let out = HclFormatter.format(input).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("variable \"region\" {\n"));
        assert!(out.contains("  default = \"us-west-2\""));
        assert!(out.ends_with("}\n"));

        // formatting is idempotent
        let again = HclFormatter.format(out.as_bytes()).unwrap();
        assert_eq!(String::from_utf8(again).unwrap(), out);
    }

    #[test]
    fn test_hcl_formatter_rejects_malformed() {
        assert!(HclFormatter.format(b"resource \"a\" {").is_err());
    }

    #[test]
    fn test_hcl_formatter_empty() {
        assert_eq!(HclFormatter.format(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(HclFormatter.format(b"\n\n").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(Passthrough.format(b"x = ").unwrap(), b"x = ");
    }
}

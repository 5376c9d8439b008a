//! Credential references for the tasks service.
//!
//! The daemon never mints tokens itself; it consumes an opaque bearer token
//! supplied by an external authentication provider. The config file stores a
//! *reference* describing where that token lives, resolved fresh on each use
//! so short-lived tokens stay current.

use crate::error::{Result, TaskwatchError};
use serde::{Deserialize, Serialize};

/// Reference to the bearer token used by the tasks service client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    /// No credential configured — signed out.
    #[default]
    None,
    /// Inline literal token (discouraged; use env/command/keyring when possible).
    Literal { value: String },
    /// Resolve the token from an environment variable.
    Env { var: String },
    /// Resolve the token by running a local helper command
    /// (e.g. an OAuth helper printing a fresh access token).
    Command { cmd: String },
    /// Token stored in the platform keyring.
    Keyring { service: String, account: String },
}

impl CredentialRef {
    /// Resolve the reference to a bearer token.
    ///
    /// Returns `Ok(None)` when no credential is configured or the keyring
    /// holds no entry — the caller treats that as "service unavailable,
    /// nothing to show" rather than an error.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Literal { value } => Ok(Some(value.clone())),
            Self::Env { var } => {
                let value = std::env::var(var).map_err(|_| {
                    TaskwatchError::Credential(format!("token env var is missing: {var}"))
                })?;
                if value.trim().is_empty() {
                    return Err(TaskwatchError::Credential(format!(
                        "token env var is empty: {var}"
                    )));
                }
                Ok(Some(value))
            }
            Self::Command { cmd } => {
                if cmd.trim().is_empty() {
                    return Err(TaskwatchError::Credential(
                        "token command is empty".to_owned(),
                    ));
                }
                let output = std::process::Command::new("/bin/sh")
                    .arg("-lc")
                    .arg(cmd)
                    .output()
                    .map_err(|e| {
                        TaskwatchError::Credential(format!("failed to run token command: {e}"))
                    })?;

                if !output.status.success() {
                    return Err(TaskwatchError::Credential(format!(
                        "token command failed with status {}",
                        output
                            .status
                            .code()
                            .map_or_else(|| "unknown".to_owned(), |c| c.to_string())
                    )));
                }

                let value = String::from_utf8_lossy(&output.stdout).trim().to_owned();
                if value.is_empty() {
                    return Err(TaskwatchError::Credential(
                        "token command returned empty output".to_owned(),
                    ));
                }

                Ok(Some(value))
            }
            Self::Keyring { service, account } => {
                let entry = keyring::Entry::new(service, account).map_err(|e| {
                    TaskwatchError::Credential(format!("failed to open keyring entry: {e}"))
                })?;
                match entry.get_password() {
                    Ok(token) => Ok(Some(token)),
                    Err(keyring::Error::NoEntry) => Ok(None),
                    Err(e) => Err(TaskwatchError::Credential(format!(
                        "failed to read keyring entry: {e}"
                    ))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    struct EnvGuard {
        key: &'static str,
        old: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old = std::env::var_os(key);
            unsafe { std::env::set_var(key, value) };
            Self { key, old }
        }

        fn unset(key: &'static str) -> Self {
            let old = std::env::var_os(key);
            unsafe { std::env::remove_var(key) };
            Self { key, old }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old {
                Some(v) => unsafe { std::env::set_var(self.key, v) },
                None => unsafe { std::env::remove_var(self.key) },
            }
        }
    }

    #[test]
    fn none_resolves_to_signed_out() {
        assert_eq!(CredentialRef::None.resolve().unwrap(), None);
    }

    #[test]
    fn literal_resolves() {
        let cred = CredentialRef::Literal {
            value: "ya29.token".to_owned(),
        };
        assert_eq!(cred.resolve().unwrap(), Some("ya29.token".to_owned()));
    }

    #[test]
    fn env_resolves() {
        let _env = EnvGuard::set("TASKWATCH_TEST_TOKEN", "secret-123");
        let cred = CredentialRef::Env {
            var: "TASKWATCH_TEST_TOKEN".to_owned(),
        };
        assert_eq!(cred.resolve().unwrap(), Some("secret-123".to_owned()));
    }

    #[test]
    fn env_missing_errors() {
        let _env = EnvGuard::unset("TASKWATCH_TEST_TOKEN_MISSING");
        let cred = CredentialRef::Env {
            var: "TASKWATCH_TEST_TOKEN_MISSING".to_owned(),
        };
        assert!(cred.resolve().is_err());
    }

    #[test]
    fn command_resolves_trimmed_output() {
        let cred = CredentialRef::Command {
            cmd: "printf '  tok-42  '".to_owned(),
        };
        assert_eq!(cred.resolve().unwrap(), Some("tok-42".to_owned()));
    }

    #[test]
    fn command_failure_errors() {
        let cred = CredentialRef::Command {
            cmd: "exit 3".to_owned(),
        };
        assert!(cred.resolve().is_err());
    }

    #[test]
    fn serde_round_trip_is_tagged() {
        let cred = CredentialRef::Env {
            var: "TOKEN".to_owned(),
        };
        let toml_str = toml::to_string(&cred).unwrap();
        assert!(toml_str.contains("type = \"env\""));
        let back: CredentialRef = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, cred);
    }
}

//! Relay process configuration loaded via OrthoConfig.
//!
//! Values come from `EHR_RELAY_*` environment variables, command-line flags,
//! or a config file. Every field is optional; accessors supply defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::outbound::prescription::SmtpMailerConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_SPOOL_DIR: &str = "./prescriptions";
const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";

/// Errors raised when the loaded settings cannot drive the relay.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address")]
    BindAddr { value: String },
    #[error("{field} must be set to deliver mail")]
    MissingCredential { field: &'static str },
}

/// Configuration for the prescription relay.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EHR_RELAY")]
pub struct RelaySettings {
    /// Listener address, e.g. `127.0.0.1:5000`.
    pub bind_addr: Option<String>,
    /// Directory used to stage rendered PDFs.
    pub spool_dir: Option<PathBuf>,
    /// SMTP relay host.
    pub smtp_relay: Option<String>,
    /// SMTP account name.
    pub smtp_username: Option<String>,
    /// SMTP account password.
    pub smtp_password: Option<String>,
    /// Sender mailbox; defaults to the SMTP account.
    pub mail_from: Option<String>,
}

impl RelaySettings {
    /// Listener address, falling back to all interfaces on port 5000.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn spool_dir(&self) -> PathBuf {
        self.spool_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SPOOL_DIR))
    }

    pub fn smtp_relay(&self) -> &str {
        self.smtp_relay.as_deref().unwrap_or(DEFAULT_SMTP_RELAY)
    }

    /// Mailer configuration; the account name and password are mandatory.
    pub fn mailer_config(&self) -> Result<SmtpMailerConfig, SettingsError> {
        let username = self
            .smtp_username
            .clone()
            .filter(|value| !value.trim().is_empty())
            .ok_or(SettingsError::MissingCredential {
                field: "smtp_username",
            })?;
        let password = self
            .smtp_password
            .clone()
            .filter(|value| !value.is_empty())
            .ok_or(SettingsError::MissingCredential {
                field: "smtp_password",
            })?;
        Ok(SmtpMailerConfig {
            relay: self.smtp_relay().to_owned(),
            username,
            password: Zeroizing::new(password),
            from: self.mail_from.clone().unwrap_or_default(),
        })
    }
}

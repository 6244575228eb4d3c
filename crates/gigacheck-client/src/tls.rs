//! HTTP client construction with the configured trust settings

use std::path::PathBuf;

use reqwest::{Certificate, Client};

use gigacheck_config::TlsSettings;

use crate::error::ClientError;

/// How server certificates will be checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMode {
    /// Built-in roots only
    Default,
    /// Built-in roots plus the PEM file at this path
    CustomRoot(PathBuf),
    /// Verification disabled
    Insecure,
}

/// Resolve the trust mode from the settings
///
/// An existing `cert_path` always wins; `accept_invalid_certs` only applies
/// when no certificate file is available.
pub fn trust_mode(tls: &TlsSettings) -> TrustMode {
    match &tls.cert_path {
        Some(path) if path.exists() => return TrustMode::CustomRoot(path.clone()),
        Some(path) => tracing::warn!("Certificate {:?} does not exist, ignoring it", path),
        None => {}
    }

    if tls.accept_invalid_certs {
        TrustMode::Insecure
    } else {
        TrustMode::Default
    }
}

/// Build the HTTP client shared by the token provider and the scenarios
pub fn build_http_client(tls: &TlsSettings) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    match trust_mode(tls) {
        TrustMode::CustomRoot(path) => {
            let pem = std::fs::read(&path)?;
            let cert = Certificate::from_pem(&pem)
                .map_err(|e| ClientError::Tls(format!("{}: {}", path.display(), e)))?;
            builder = builder.add_root_certificate(cert);
            tracing::info!("Trusting root certificate from {:?}", path);
        }
        TrustMode::Insecure => {
            tracing::warn!("Certificate verification is DISABLED (GIGACHAT_INSECURE_TLS)");
            builder = builder.danger_accept_invalid_certs(true);
        }
        TrustMode::Default => {}
    }

    builder.build().map_err(|e| ClientError::Tls(e.to_string()))
}

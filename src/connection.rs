//! IMAP connection and TLS helpers
//!
//! Opens plain, implicit-TLS or STARTTLS connections according to the
//! [`ImapConfig`] and logs in. Both transports are carried by
//! [`MailStream`] so the rest of the crate deals with one session type.

use crate::config::{ImapConfig, TlsOptions};
use crate::error::{Error, Result};
use async_imap::Session;
use rustls::RootCertStore;
use rustls::pki_types::ServerName;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

/// An authenticated IMAP session over either transport.
pub type ImapSession = Session<Compat<MailStream>>;

/// The transport underneath an IMAP session.
#[derive(Debug)]
pub enum MailStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for MailStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MailStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Open a fresh IMAP session and log in.
///
/// When `authTimeout` is configured the whole sequence (TCP connect,
/// TLS handshake, LOGIN) must finish within it.
///
/// # Errors
///
/// Returns an error if the connection, the TLS handshake or the LOGIN
/// fails, or if the deadline passes.
pub async fn connect(config: &ImapConfig) -> Result<ImapSession> {
    match config.auth_timeout() {
        Some(limit) => tokio::time::timeout(limit, establish(config))
            .await
            .map_err(|_| {
                Error::Timeout(format!(
                    "connecting to {}:{} took longer than {}ms",
                    config.host,
                    config.port(),
                    limit.as_millis()
                ))
            })?,
        None => establish(config).await,
    }
}

async fn establish(config: &ImapConfig) -> Result<ImapSession> {
    let addr = format!("{}:{}", config.host, config.port());
    debug!(
        "Connecting to IMAP server at {} (tls: {})",
        addr,
        config.uses_tls()
    );

    let tcp_stream = TcpStream::connect(&addr).await?;

    let stream = if config.tls {
        MailStream::Tls(Box::new(tls_handshake(config, tcp_stream).await?))
    } else if config.autotls.upgrades() {
        let mut client = async_imap::Client::new(tcp_stream.compat());

        client
            .run_command_and_check_ok("STARTTLS", None)
            .await
            .map_err(|e| Error::Tls(format!("STARTTLS failed: {e}")))?;

        let inner = client.into_inner().into_inner();
        MailStream::Tls(Box::new(tls_handshake(config, inner).await?))
    } else {
        MailStream::Plain(tcp_stream)
    };

    let client = async_imap::Client::new(stream.compat());

    let session = client
        .login(&config.user, &config.password)
        .await
        .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

    info!("Connected to IMAP server {}", addr);
    Ok(session)
}

/// SELECT a folder on an existing session.
///
/// # Errors
///
/// Returns [`Error::Imap`] if the server refuses the SELECT.
pub async fn select(session: &mut ImapSession, folder: &str) -> Result<u32> {
    let mailbox = session
        .select(folder)
        .await
        .map_err(|e| Error::Imap(format!("Failed to select {folder}: {e}")))?;
    debug!("Selected {} ({} messages)", folder, mailbox.exists);
    Ok(mailbox.exists)
}

async fn tls_handshake(config: &ImapConfig, tcp: TcpStream) -> Result<TlsStream<TcpStream>> {
    let connector = tls_connector(&config.tls_options)?;
    let server_name = ServerName::try_from(config.server_name().to_string())
        .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

    connector
        .connect(server_name, tcp)
        .await
        .map_err(|e| Error::Tls(e.to_string()))
}

/// Build a TLS connector.
///
/// Verifies against the Mozilla root set unless
/// `rejectUnauthorized` is false, in which case any certificate is
/// accepted.
fn tls_connector(options: &TlsOptions) -> Result<TlsConnector> {
    let builder = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| Error::Tls(e.to_string()))?;

    let config = if options.reject_unauthorized {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder.with_root_certificates(roots).with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCert))
            .with_no_client_auth()
    };

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Certificate verifier that accepts all certificates
/// (`rejectUnauthorized: false`).
#[derive(Debug)]
struct AcceptAnyCert;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCert {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

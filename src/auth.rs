use crate::types::Credential;
use crate::{Result, ScanError};
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Outcome of a single authentication attempt.
///
/// Rejection is a value, not an error: only the inability to invoke the
/// checking mechanism itself surfaces as `ScanError::Tooling`, which is
/// fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    Denied(Option<String>),
}

#[async_trait]
pub trait AuthCheck: Send + Sync {
    /// Try to authenticate one credential against one host.
    async fn attempt(&self, host: &str, credential: &Credential) -> Result<AttemptOutcome>;

    /// Open an interactive session for a combination that already
    /// authenticated, with stdio connected to the operator.
    async fn open_session(&self, host: &str, credential: &Credential) -> Result<()>;
}

/// Authenticator that shells out to `sshpass`/`ssh` per attempt, mirroring
/// the classic one-liner. A missing `sshpass` binary is a tooling failure,
/// not a rejected credential.
pub struct SshExecAuthenticator {
    port: u16,
    connect_timeout: Duration,
    ssh_options: Vec<String>,
}

impl SshExecAuthenticator {
    pub fn new(port: u16, connect_timeout: Duration, ssh_options: Vec<String>) -> Self {
        Self {
            port,
            connect_timeout,
            ssh_options,
        }
    }

    fn ssh_args(&self, host: &str, credential: &Credential) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            credential.password.clone(),
            "ssh".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout.as_secs().max(1)),
        ];
        args.extend(self.ssh_options.iter().cloned());
        if self.port != 22 {
            args.push("-p".to_string());
            args.push(self.port.to_string());
        }
        args.push(format!("{}@{}", credential.username, host));
        args
    }

    fn spawn_error(e: std::io::Error) -> ScanError {
        if e.kind() == ErrorKind::NotFound {
            ScanError::Tooling(
                "sshpass is not installed. Please install sshpass to proceed.".to_string(),
            )
        } else {
            ScanError::Tooling(format!("Failed to invoke sshpass: {}", e))
        }
    }
}

#[async_trait]
impl AuthCheck for SshExecAuthenticator {
    async fn attempt(&self, host: &str, credential: &Credential) -> Result<AttemptOutcome> {
        debug!("Attempting SSH login for {}@{}", credential.username, host);

        let mut args = self.ssh_args(host, credential);
        args.push("exit".to_string());

        let status = Command::new("sshpass")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(Self::spawn_error)?;

        if status.success() {
            Ok(AttemptOutcome::Accepted)
        } else {
            Ok(AttemptOutcome::Denied(Some(format!(
                "ssh exited with {}",
                status
            ))))
        }
    }

    async fn open_session(&self, host: &str, credential: &Credential) -> Result<()> {
        info!(
            "Opening interactive SSH session to {} as {}...",
            host, credential.username
        );

        let status = Command::new("sshpass")
            .args(self.ssh_args(host, credential))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(Self::spawn_error)?;

        debug!("Interactive session ended with {}", status);
        Ok(())
    }
}

/// In-process authenticator using libssh2. Connection and handshake
/// problems count as rejected attempts; only a failure to set up the SSH
/// machinery itself is a tooling failure.
pub struct LibSshAuthenticator {
    port: u16,
    connect_timeout: Duration,
    /// Interactive hand-off still goes through the system ssh client.
    exec: SshExecAuthenticator,
}

impl LibSshAuthenticator {
    pub fn new(port: u16, connect_timeout: Duration, ssh_options: Vec<String>) -> Self {
        Self {
            port,
            connect_timeout,
            exec: SshExecAuthenticator::new(port, connect_timeout, ssh_options),
        }
    }

    fn check_blocking(
        addr: SocketAddr,
        username: &str,
        password: &str,
        connect_timeout: Duration,
    ) -> Result<AttemptOutcome> {
        use ssh2::Session;
        use std::net::TcpStream;

        let tcp = match TcpStream::connect_timeout(&addr, connect_timeout) {
            Ok(tcp) => tcp,
            Err(e) => return Ok(AttemptOutcome::Denied(Some(format!("TCP connection failed: {}", e)))),
        };

        let mut session = Session::new()
            .map_err(|e| ScanError::Tooling(format!("SSH session creation failed: {}", e)))?;

        session.set_tcp_stream(tcp);
        if let Err(e) = session.handshake() {
            return Ok(AttemptOutcome::Denied(Some(format!("SSH handshake failed: {}", e))));
        }

        match session.userauth_password(username, password) {
            Ok(()) if session.authenticated() => Ok(AttemptOutcome::Accepted),
            Ok(()) => Ok(AttemptOutcome::Denied(None)),
            Err(e) => Ok(AttemptOutcome::Denied(Some(e.to_string()))),
        }
    }
}

#[async_trait]
impl AuthCheck for LibSshAuthenticator {
    async fn attempt(&self, host: &str, credential: &Credential) -> Result<AttemptOutcome> {
        debug!("Attempting SSH login for {}@{}", credential.username, host);

        let Some(addr) = (host, self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
        else {
            return Ok(AttemptOutcome::Denied(Some(format!(
                "Failed to resolve {}",
                host
            ))));
        };

        let username = credential.username.clone();
        let password = credential.password.clone();
        let connect_timeout = self.connect_timeout;

        tokio::task::spawn_blocking(move || {
            Self::check_blocking(addr, &username, &password, connect_timeout)
        })
        .await
        .map_err(|e| ScanError::Unknown(format!("Authentication task failed: {}", e)))?
    }

    async fn open_session(&self, host: &str, credential: &Credential) -> Result<()> {
        self.exec.open_session(host, credential).await
    }
}

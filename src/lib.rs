//! sshfinder - Parallel SSH Credential Validation Scanner
//!
//! This library resolves host specifications (addresses, hostnames, CIDR
//! subnets), filters them down to reachable hosts with an open SSH port,
//! and tests every (host, user, password) combination in parallel,
//! optionally stopping at the first success and opening an interactive
//! session.
//!
//! # Warning
//! This tool is designed for ethical penetration testing and security
//! assessment purposes only. Users are responsible for ensuring they have
//! proper authorization before testing credentials against any systems.

pub mod auth;
pub mod cli;
pub mod combos;
pub mod config;
pub mod display;
pub mod error;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod sources;
pub mod utils;

pub use error::{Result, ScanError};

/// Common types used throughout the application
pub mod types {
    use serde::{Deserialize, Serialize};

    /// A username/password pair. Immutable once built; duplicates in the
    /// input sequences are preserved as-is.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Credential {
        pub username: String,
        pub password: String,
    }

    /// One unit of scheduled work: a credential tried against one host.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Attempt {
        pub host: String,
        pub credential: Credential,
    }

    impl Attempt {
        pub fn new(
            host: impl Into<String>,
            username: impl Into<String>,
            password: impl Into<String>,
        ) -> Self {
            Self {
                host: host.into(),
                credential: Credential {
                    username: username.into(),
                    password: password.into(),
                },
            }
        }
    }

    /// A combination that authenticated successfully.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Login {
        pub host: String,
        pub username: String,
        pub password: String,
    }

    impl From<&Attempt> for Login {
        fn from(attempt: &Attempt) -> Self {
            Self {
                host: attempt.host.clone(),
                username: attempt.credential.username.clone(),
                password: attempt.credential.password.clone(),
            }
        }
    }
}

use crate::types::Login;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

const PASSWORD_MASK: &str = "********";

/// Summary of one completed run. Building it is pure: no I/O, no shared
/// state, nothing mutated.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub total_attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub success_rate: f64,
    pub logins: Vec<Login>,
}

impl RunReport {
    /// Build a report from the recorded successes and the number of
    /// attempts actually dispatched. Successes are sorted by host; the
    /// original discovery order is kept for equal hosts.
    pub fn build(logins: &[Login], total_attempted: u64) -> Self {
        let mut sorted = logins.to_vec();
        sorted.sort_by(|a, b| a.host.cmp(&b.host));

        let succeeded = sorted.len() as u64;
        let failed = total_attempted.saturating_sub(succeeded);
        let success_rate = if total_attempted > 0 {
            (succeeded as f64 / total_attempted as f64) * 100.0
        } else {
            0.0
        };

        Self {
            generated_at: Utc::now(),
            total_attempted,
            succeeded,
            failed,
            success_rate,
            logins: sorted,
        }
    }

    /// Render the human-readable summary block.
    pub fn render(&self, redact_passwords: bool) -> String {
        let mut lines = vec![
            "===== LOGIN ATTEMPT REPORT =====".to_string(),
            format!("Generated on: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S")),
            format!("Total combinations attempted: {}", self.total_attempted),
            format!("Successful logins: {}", self.succeeded),
            format!("Failed attempts: {}", self.failed),
            format!("Success rate: {:.2}%", self.success_rate),
            "---------------------------------".to_string(),
        ];

        if self.logins.is_empty() {
            lines.push("No successful logins recorded.".to_string());
        } else {
            lines.push("Successful Combinations:".to_string());
            for login in &self.logins {
                let password = if redact_passwords {
                    PASSWORD_MASK
                } else {
                    login.password.as_str()
                };
                lines.push(format!(
                    "  Host: {} | User: {} | Password: {}",
                    login.host, login.username, password
                ));
                lines.push(format!("      -> ssh {}@{}", login.username, login.host));
            }
        }

        lines.push("=================================".to_string());
        lines.join("\n")
    }

    pub fn to_json(&self, redact_passwords: bool) -> Result<String> {
        if redact_passwords {
            let mut redacted = self.clone();
            for login in &mut redacted.logins {
                login.password = PASSWORD_MASK.to_string();
            }
            Ok(serde_json::to_string_pretty(&redacted)?)
        } else {
            Ok(serde_json::to_string_pretty(self)?)
        }
    }
}

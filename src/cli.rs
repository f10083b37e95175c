use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sshfinder")]
#[command(about = "Parallel SSH credential validation scanner with host filtering and reporting")]
#[command(long_about = r#"
sshfinder expands host and subnet specifications, filters them down to
reachable hosts with an open SSH port, and tries every user/password
combination in parallel.

WARNING: This tool should only be used against systems you own or have
explicit permission to test. Unauthorized access attempts may be illegal.

Examples:
  sshfinder -H 192.168.1.1,192.168.1.2 -u admin -p pass123,rootpass
  sshfinder -H 192.168.1.100 -u admin -p pass123 --ssh-options "-o ConnectTimeout=5"
  sshfinder -H 192.168.1.0/30 -p pass123 --users-file users.txt
  sshfinder -H 192.168.1.1 -u admin -p pass123 --connect-on-first-success
  sshfinder -H 192.168.1.1,192.168.1.2 -p pass123 --skip-ping --skip-port-check
"#)]
#[command(version)]
pub struct Cli {
    /// Comma-separated list of hosts or subnets (e.g., 192.168.1.1,10.0.0.0/24)
    #[arg(short = 'H', long, value_name = "HOSTS", conflicts_with = "hosts_file")]
    pub hosts: Option<String>,

    /// File containing hosts/subnets, one per line
    #[arg(long, value_name = "FILE")]
    pub hosts_file: Option<PathBuf>,

    /// Comma-separated list of usernames (prompted for if omitted)
    #[arg(short = 'u', long = "users", value_name = "USERS", conflicts_with = "users_file")]
    pub users: Option<String>,

    /// File containing usernames, one per line
    #[arg(long, value_name = "FILE")]
    pub users_file: Option<PathBuf>,

    /// Comma-separated list of passwords (prompted for if omitted)
    #[arg(short = 'p', long = "passwords", value_name = "PASSWORDS", conflicts_with = "passwords_file")]
    pub passwords: Option<String>,

    /// File containing passwords, one per line
    #[arg(long, value_name = "FILE")]
    pub passwords_file: Option<PathBuf>,

    /// Extra SSH options passed to the ssh command (e.g., "-o ConnectTimeout=5")
    #[arg(long, value_name = "OPTIONS", default_value = "")]
    pub ssh_options: String,

    /// Stop after the first successful login and open an interactive SSH session
    #[arg(short = 'c', long)]
    pub connect_on_first_success: bool,

    /// Skip the liveness check for hosts
    #[arg(long)]
    pub skip_ping: bool,

    /// Liveness probe timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "1")]
    pub ping_timeout: u64,

    /// Maximum number of concurrent liveness/port probes
    #[arg(long, value_name = "N", default_value = "100")]
    pub ping_workers: usize,

    /// Skip checking whether the SSH port is open
    #[arg(long)]
    pub skip_port_check: bool,

    /// SSH port to probe and connect to
    #[arg(long, value_name = "PORT", default_value = "22")]
    pub port: u16,

    /// Port probe timeout in seconds
    #[arg(long, value_name = "SECS", default_value = "1")]
    pub port_timeout: u64,

    /// Maximum number of concurrent login attempts
    #[arg(long, value_name = "N", default_value = "100")]
    pub max_workers: usize,

    /// Use the in-process libssh2 backend instead of spawning sshpass/ssh
    #[arg(long)]
    pub library_backend: bool,

    /// Mask the password prompt and redact passwords in the report
    #[arg(short = 's', long)]
    pub secret: bool,

    /// Emit the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

use clap::Parser;
use env_logger::Env;
use sshfinder::{
    auth::{AuthCheck, LibSshAuthenticator, SshExecAuthenticator},
    cli::Cli,
    combos,
    config::{AuthBackend, Config},
    display::DisplayManager,
    probe::ReachabilityFilter,
    report::RunReport,
    resolver::HostResolver,
    scheduler::{AttemptScheduler, RunSummary},
    sources,
    utils::{progress, time},
    Result,
};
use std::process;
use std::sync::Arc;
use std::time::SystemTime;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_secs()
        .init();

    let display = DisplayManager::with_quiet(cli.quiet);

    if !cli.quiet {
        display.print_banner("SSHFINDER - Credential Validation Scanner", Some("Authorized Testing Only"));
        display.print_warning("Ensure you have proper permission before testing any systems.");
        println!();
    }

    let mut config = if let Some(config_path) = &cli.config {
        match Config::load_from_file(&config_path.to_string_lossy()) {
            Ok(config) => {
                display.print_success(&format!("Loaded configuration from {}", config_path.display()));
                config
            }
            Err(e) => {
                display.print_warning(&format!("Failed to load configuration: {}, using defaults", e));
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Apply CLI overrides to config
    config.scan.max_workers = cli.max_workers;
    config.scan.probe_workers = cli.ping_workers;
    config.discovery.skip_ping = cli.skip_ping;
    config.discovery.ping_timeout = cli.ping_timeout * 1000;
    config.discovery.skip_port_check = cli.skip_port_check;
    config.discovery.port = cli.port;
    config.discovery.port_timeout = cli.port_timeout * 1000;
    config.auth.exit_on_first_success = cli.connect_on_first_success;
    config.auth.ssh_options = sources::split_options(&cli.ssh_options);
    if cli.library_backend {
        config.auth.backend = AuthBackend::Library;
    }
    config.report.redact_passwords = cli.secret;
    config.report.json = cli.json;

    let start_time = SystemTime::now();

    let summary = match run(&cli, &config, &display).await {
        Ok(summary) => summary,
        Err(e) => {
            display.print_error(&format!("Scan failed: {}", e));
            process::exit(e.exit_code());
        }
    };

    let report = RunReport::build(&summary.logins, summary.dispatched);
    let rendered = if config.report.json {
        match report.to_json(config.report.redact_passwords) {
            Ok(json) => json,
            Err(e) => {
                display.print_error(&format!("Failed to serialize report: {}", e));
                process::exit(e.exit_code());
            }
        }
    } else {
        report.render(config.report.redact_passwords)
    };

    println!("\n{}", rendered);

    let elapsed = start_time.elapsed().unwrap_or_default();
    if !cli.quiet {
        display.print_success(&format!("Scan completed in {}", time::format_duration(elapsed)));
    }

    process::exit(if summary.logins.is_empty() { 1 } else { 0 });
}

async fn run(cli: &Cli, config: &Config, display: &DisplayManager) -> Result<RunSummary> {
    let users = sources::usernames(cli.users.as_deref(), cli.users_file.as_deref()).await?;
    let passwords =
        sources::passwords(cli.passwords.as_deref(), cli.passwords_file.as_deref(), cli.secret).await?;
    let specs = sources::host_specs(cli.hosts.as_deref(), cli.hosts_file.as_deref()).await?;

    let hosts = HostResolver::resolve(&specs)?;

    display.print_section_header("REACHABILITY FILTERING");
    let filter = ReachabilityFilter::new(config.clone());
    let hosts = filter.filter(&hosts).await?;
    display.print_host_table(&hosts);

    let attempts = combos::generate(&hosts, &users, &passwords);
    display.print_section_header("CREDENTIAL TESTING");
    display.print_info(&format!(
        "Trying {} combinations across {} hosts",
        attempts.len(),
        hosts.len()
    ));

    let auth: Arc<dyn AuthCheck> = match config.auth.backend {
        AuthBackend::Exec => Arc::new(SshExecAuthenticator::new(
            config.discovery.port,
            config.connection_timeout(),
            config.auth.ssh_options.clone(),
        )),
        AuthBackend::Library => Arc::new(LibSshAuthenticator::new(
            config.discovery.port,
            config.connection_timeout(),
            config.auth.ssh_options.clone(),
        )),
    };

    let progress_bar = if cli.quiet || cli.verbose > 0 {
        None
    } else {
        Some(progress::create_progress_bar(attempts.len() as u64, "Trying combinations"))
    };

    let scheduler = AttemptScheduler::new(
        auth,
        config.scan.max_workers,
        config.auth.exit_on_first_success,
    );
    scheduler.run(attempts, progress_bar).await
}

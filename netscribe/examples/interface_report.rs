//! Interface Report Example
//!
//! Connects to a switch, collects interface status, optics, LLDP neighbors
//! and PoE state, and prints them as JSON. Optionally runs TDR cable tests
//! on copper ports that negotiated below gigabit.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example interface_report -- --host 192.168.1.1 --user admin --password secret --vendor cisco
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use netscribe::{SessionBuilder, Switch, TemplateChoice, Vendor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let vendor: Vendor = args.vendor.parse()?;
    let profile = vendor.profile();

    println!("=== Netscribe Interface Report ===\n");
    println!("Connecting to {}:{} ({vendor})...", args.host, args.port);

    let mut builder = SessionBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .vendor(&profile)
        .timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    let mut session = builder.build()?;
    if !session.connect(3, None).await? {
        eprintln!("Could not connect to {}", args.host);
        std::process::exit(1);
    }

    let mut switch = Switch::new(session, profile);
    switch.prepare().await?;
    switch.refresh_hostname().await?;
    println!("Connected to {}\n", switch.hostname());

    let status = switch.get_interface_status(TemplateChoice::Default).await?;
    section("Interface status");
    println!("{}", serde_json::to_string_pretty(&status.records)?);

    let optics = switch.get_optics(TemplateChoice::Default).await?;
    section("Optics");
    for optic in optics.records.iter().flat_map(|r| r.values()) {
        for (parameter, alert) in optic.alerts() {
            println!("  {} {parameter}: {alert}", optic.interface);
        }
    }
    println!("{}", serde_json::to_string_pretty(&optics.records)?);

    let lldp = switch.get_lldp(TemplateChoice::Default).await?;
    section("LLDP neighbors");
    println!("{}", serde_json::to_string_pretty(&lldp.records)?);

    let poe = switch.get_poe_status(TemplateChoice::Default).await?;
    section("PoE");
    println!("{}", serde_json::to_string_pretty(&poe.records)?);

    if args.tdr {
        let statuses = status.records.map(|r| r.into_values().collect());
        let report = switch
            .get_tdr_data(statuses, true, TemplateChoice::Default)
            .await?;
        section("TDR");
        println!("{}", serde_json::to_string_pretty(&report.group.records)?);
        if !report.incomplete.is_empty() {
            println!("Incomplete: {}", report.incomplete.join(", "));
        }
    }

    switch.session_mut().disconnect().await?;
    println!("\nDone!");
    Ok(())
}

fn section(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Simple argument parser
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    vendor: String,
    tdr: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: 22,
            user: env::var("USER").unwrap_or_else(|_| "admin".to_string()),
            password: None,
            key: None,
            timeout: 30,
            vendor: "cisco".to_string(),
            tdr: false,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => parsed.host = value.unwrap_or(parsed.host),
                "--port" | "-p" => {
                    parsed.port = value.and_then(|v| v.parse().ok()).unwrap_or(22)
                }
                "--user" | "-u" => parsed.user = value.unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = value,
                "--key" | "-k" => parsed.key = value.map(PathBuf::from),
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(30)
                }
                "--vendor" => parsed.vendor = value.unwrap_or(parsed.vendor),
                "--tdr" => {
                    parsed.tdr = true;
                    i += 1;
                    continue;
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }
        parsed
    }

    fn print_help() {
        println!(
            r#"netscribe interface report example

USAGE:
    cargo run --example interface_report -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    -t, --timeout <SECS>     Connection timeout [default: 30]
    --vendor <VENDOR>        cisco or brocade [default: cisco]
    --tdr                    Run cable tests on sub-gigabit copper ports
    --help                   Print this help message"#
        );
    }
}

// ABOUTME: Command-line ITS PDU dissector for hex dumps and live UDP traffic
// ABOUTME: Prints the rendered field tree of every PDU, honouring Decode-As overrides

use argh::FromArgs;
use its::datatypes::WellKnownPort;
use its::decode_as::DecodeAs;
use its::dissector::{Dissector, DissectorConfig, NoRegionPolicy};
use its::listener::{DEFAULT_MAX_IN_FLIGHT, Listener};
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Dissect ETSI ITS application PDUs (DENM, SSEM, ...)
#[derive(FromArgs)]
struct CliArgs {
    /// force a message id to a grammar, e.g. `1=SSEM` (repeatable)
    #[argh(option, short = 'd')]
    decode_as: Vec<String>,

    /// look up regional extensions whose RegionId is noRegion instead of skipping them
    #[argh(switch)]
    attempt_no_region: bool,

    /// listen for BTP-B datagrams on this UDP address instead of reading PDUs
    #[argh(option, short = 'l')]
    listen: Option<String>,

    /// datagrams dissected concurrently while listening
    #[argh(option, default = "DEFAULT_MAX_IN_FLIGHT")]
    max_in_flight: usize,

    /// hex encoded PDUs; read one per line from stdin when none are given
    #[argh(positional)]
    pdus: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli_args: CliArgs = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let policy = if cli_args.attempt_no_region {
        NoRegionPolicy::Attempt
    } else {
        NoRegionPolicy::Skip
    };
    let dissector = Dissector::with_config(DissectorConfig::default().no_region_policy(policy))?;

    for mapping in &cli_args.decode_as {
        let (id, grammar) = mapping
            .split_once('=')
            .ok_or_else(|| format!("expected <message id>=<grammar>, got '{mapping}'"))?;
        let id: u8 = id.trim().parse()?;
        dissector.set_decode_as(id, grammar.trim())?;
    }
    for entry in dissector.decode_as_entries() {
        eprintln!(
            "{}: {} -> {}",
            DecodeAs::prompt(entry.message_id),
            entry.default.unwrap_or("(none)"),
            entry.current
        );
    }

    if let Some(addr) = cli_args.listen {
        return listen(&addr, dissector, cli_args.max_in_flight).await;
    }

    if !cli_args.pdus.is_empty() {
        for pdu in &cli_args.pdus {
            print_pdu(&dissector, pdu)?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        print_pdu(&dissector, line)?;
    }
    Ok(())
}

fn print_pdu(dissector: &Dissector, hex: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let pdu = decode_hex(hex)?;
    let dissection = dissector.dispatch(&pdu);
    print!("{}", dissection.tree);
    if let Some(prompt) = dissection.prompt() {
        println!("[{prompt} parsed as {}]", dissection.grammar.unwrap_or("data"));
    }
    println!();
    Ok(())
}

async fn listen(
    addr: &str,
    dissector: Dissector,
    max_in_flight: usize,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = Listener::bind(addr, Arc::new(dissector))
        .await?
        .max_in_flight(max_in_flight);
    let (tx, mut rx) = mpsc::channel(64);
    let capture = tokio::spawn(listener.run(tx));

    while let Some(captured) = rx.recv().await {
        let service = WellKnownPort::service(&captured.service);
        let aid = captured
            .service
            .application_id()
            .map(|aid| format!(", ITS-AID {}", aid as u32))
            .unwrap_or_default();
        println!(
            "{} -> port {} ({service}{aid})",
            captured.peer,
            captured.btp.destination_port()
        );
        print!("{}", captured.dissection.tree);
        println!();
    }
    capture.await??;
    Ok(())
}

fn decode_hex(hex: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace() && *b != b':')
        .collect();
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{hex}'"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let text = std::str::from_utf8(pair).map_err(|e| e.to_string())?;
            u8::from_str_radix(text, 16).map_err(|_| format!("invalid hex byte '{text}'"))
        })
        .collect()
}

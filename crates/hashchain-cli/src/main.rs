use anyhow::{Context, Result};
use clap::Parser;
use hashchain_core::{
    chain::Chain,
    constants::{DEFAULT_DIFFICULTY, DEMO_PAYLOADS},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hashchain")]
#[command(about = "Mine a small proof-of-work hash chain and print it")]
struct Args {
    /// Payloads to mine, one block each
    #[arg(default_values_t = DEMO_PAYLOADS.map(String::from))]
    payloads: Vec<String>,

    /// Leading zero hex digits required of every mined hash
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: usize,

    /// Give up on a block after this many hashes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_attempts: Option<u64>,

    /// Search nonces on all cores
    #[arg(long)]
    parallel: bool,

    /// Print the finished chain as JSON instead of the text listing
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut chain = Chain::new(args.difficulty)
        .context("creating chain")?
        .with_parallel_mining(args.parallel);
    if let Some(max_attempts) = args.max_attempts {
        chain = chain.with_max_attempts(max_attempts);
    }
    info!(difficulty = %chain.difficulty(), blocks = args.payloads.len(), "mining");

    for payload in args.payloads {
        let index = chain.len();
        // keep stdout pure JSON under --json
        if args.json {
            eprintln!("Mining block {index}...");
        } else {
            println!("Mining block {index}...");
        }
        let block = chain
            .append(payload)
            .with_context(|| format!("mining block {index}"))?;
        if args.json {
            eprintln!("Block mined: {}", block.hash);
        } else {
            println!("Block mined: {}", block.hash);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(chain.blocks())?);
    } else {
        println!("\nBlockchain:");
        print!("{}", chain.render());
    }
    Ok(())
}

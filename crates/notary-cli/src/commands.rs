use anyhow::{bail, Context};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use colored::Colorize;
use notary_ledger::{InMemoryLedger, LedgerReader};
use notary_rest::{
    negotiate_format, parse_request, render, render_error, resolve, NotaryServer, Rendered,
    ServerConfig,
};
use notary_types::{big_int_marshalled_size, marshal_big_int, unmarshal_big_int, BigInt, Block, Entry};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Resolve(args) => cmd_resolve(args),
        Command::Seed(args) => cmd_seed(args),
        Command::Int(args) => match args.action {
            IntAction::Encode { value } => cmd_int_encode(&value),
            IntAction::Decode { hex } => cmd_int_decode(&hex),
        },
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.ledger.is_some() {
        config.ledger_path = args.ledger;
    }

    let server = NotaryServer::from_config(config)?;
    println!(
        "{} Serving {} blocks on {}",
        "✓".green().bold(),
        server.ledger().block_count()?.to_string().bold(),
        server.config().bind_addr.to_string().cyan()
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let ledger = InMemoryLedger::open(&args.ledger)
        .with_context(|| format!("failed to open ledger {}", args.ledger.display()))?;
    let rendered = resolve_offline(&ledger, &args.path, &args.accept)?;
    print!("{}", rendered.body);
    if !rendered.body.ends_with('\n') {
        println!();
    }
    if !rendered.status.is_success() {
        bail!("request failed with status {}", rendered.status);
    }
    Ok(())
}

/// Run one request through the same parse, resolve, and render steps the
/// server uses.
pub fn resolve_offline(
    ledger: &dyn LedgerReader,
    path: &str,
    accept: &[String],
) -> anyhow::Result<Rendered> {
    let uri: Uri = path.parse().with_context(|| format!("invalid request path {path:?}"))?;
    let mut headers = HeaderMap::new();
    for value in accept {
        headers.append(ACCEPT, HeaderValue::from_str(value)?);
    }

    let request = match parse_request(&Method::GET, &uri, &headers, &[]) {
        Ok(request) => request,
        Err(err) => {
            let format = negotiate_format(&uri, &headers).unwrap_or_default();
            return Ok(render_error(&err, &format));
        }
    };
    let snapshot = ledger.snapshot()?;
    let rendered = resolve(&request.segments, &snapshot)
        .and_then(|resolved| render(&resolved, &request.format))
        .unwrap_or_else(|err| render_error(&err, &request.format));
    Ok(rendered)
}

fn cmd_seed(args: SeedArgs) -> anyhow::Result<()> {
    let blocks = seed_blocks(args.start_id, args.blocks, args.entries)?;
    let ledger = InMemoryLedger::from_blocks(blocks)?;
    ledger.save(&args.out)?;
    println!(
        "{} Wrote {} blocks to {}",
        "✓".green().bold(),
        ledger.block_count()?.to_string().bold(),
        args.out.display()
    );
    if let (Some(base), Some(head)) = (ledger.base_offset()?, ledger.head()?) {
        println!("  Block IDs: {}..={}", base.to_string().yellow(), head.to_string().yellow());
    }
    Ok(())
}

/// Demonstration blocks with consecutive IDs. Values alternate in sign so
/// both halves of the integer frame show up in the output.
pub fn seed_blocks(start_id: u64, blocks: u64, entries: u32) -> anyhow::Result<Vec<Block>> {
    let end = start_id
        .checked_add(blocks)
        .context("block ID range overflows u64")?;
    Ok((start_id..end)
        .map(|id| {
            let entries = (0..entries)
                .map(|i| {
                    let magnitude = BigInt::from(id) * 1000u32 + i;
                    let value = if i % 2 == 0 { magnitude } else { -magnitude };
                    Entry::new(i % 4, value, format!("block {id} entry {i}").into_bytes())
                })
                .collect();
            Block::new(id, entries)
        })
        .collect())
}

fn cmd_int_encode(value: &str) -> anyhow::Result<()> {
    let value: BigInt = value
        .parse()
        .with_context(|| format!("not a decimal integer: {value:?}"))?;
    let frame = marshal_big_int(&value)?;
    println!("{}", hex::encode(&frame));
    println!("  size: {} bytes", big_int_marshalled_size(&value).to_string().bold());
    Ok(())
}

fn cmd_int_decode(input: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(input.trim()).context("input is not valid hex")?;
    let (value, rest) = decode_frame(&bytes)?;
    println!("{}", value.to_string().bold());
    if !rest.is_empty() {
        println!("  {} {} trailing bytes", "!".yellow(), rest.len());
    }
    Ok(())
}

fn decode_frame(bytes: &[u8]) -> anyhow::Result<(BigInt, &[u8])> {
    Ok(unmarshal_big_int(bytes)?)
}

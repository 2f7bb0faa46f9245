use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use votecount_parser::{PlayerResolver, RawVote, ResolverConfig, VoteLocator};
use votecount_tally::{replay_phase, PhaseCounter, PhaseOutcome};

use crate::input::{Overrides, PhaseFile};

mod input;

#[derive(Parser)]
#[command(name = "votecount")]
#[command(about = "Count votes in forum mafia threads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with [resolver] / [locator] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Newline-delimited word list used for acronyms (repeatable)
    #[arg(long, global = true)]
    lexicon: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a phase file and report the outcome
    Replay(ReplayArgs),

    /// Resolve one vote string against a roster
    Resolve(ResolveArgs),

    /// List the votes declared in an HTML post
    Extract(ExtractArgs),
}

#[derive(Args)]
struct ReplayArgs {
    /// Phase file (JSON: slots, events, tally, moderators, posts)
    phase: PathBuf,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Roster name (repeatable, in roster order)
    #[arg(long = "player", required = true)]
    players: Vec<String>,

    /// Fail when the vote matches nobody
    #[arg(long)]
    strict: bool,

    /// Vote text as written in the post
    vote: String,
}

#[derive(Args)]
struct ExtractArgs {
    /// HTML fragment of one post
    post: PathBuf,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    if matches!(&cli.command, Commands::Replay(args) if args.json) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let overrides = Overrides::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Replay(args) => run_replay(args, overrides, &cli.lexicon)?,
        Commands::Resolve(args) => run_resolve(args, &overrides, &cli.lexicon)?,
        Commands::Extract(args) => run_extract(args, &overrides)?,
    }

    Ok(())
}

fn run_replay(args: ReplayArgs, overrides: Overrides, lexicon: &[PathBuf]) -> Result<()> {
    let PhaseFile { mut config, posts } = PhaseFile::load(&args.phase)?;
    overrides.apply(&mut config);

    let segmenter = input::segmenter(lexicon)?;
    let counter = PhaseCounter::new(&config, segmenter).context("Invalid phase")?;
    log::info!(
        "replaying {} posts over {} slots",
        posts.len(),
        config.slots.len()
    );

    let outcome = match replay_phase(counter, &posts, &config.moderators) {
        Ok(outcome) => outcome,
        Err(err) => {
            for line in err.audit_log() {
                eprintln!("  {line}");
            }
            return Err(err).context("Replay failed");
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

fn render_outcome(outcome: &PhaseOutcome) -> String {
    let mut out = String::new();
    match (&outcome.choice, outcome.decided_at) {
        (Some(choice), Some(post)) => out.push_str(&format!("Choice: {choice} (post {post})\n")),
        (Some(choice), None) => out.push_str(&format!("Choice: {choice}\n")),
        (None, _) => out.push_str("Choice: none\n"),
    }
    if let Some(transition) = outcome.transition {
        out.push_str(&format!(
            "Transition: posts {}-{}\n",
            transition.start, transition.end
        ));
    }
    out.push('\n');
    out.push_str(&outcome.snapshot.to_string());
    out.push_str("\nLog:\n");
    for line in &outcome.log {
        out.push_str(&format!("  {line}\n"));
    }
    out
}

fn run_resolve(args: ResolveArgs, overrides: &Overrides, lexicon: &[PathBuf]) -> Result<()> {
    let segmenter = input::segmenter(lexicon)?;
    let fallback = if args.strict {
        ResolverConfig::strict()
    } else {
        ResolverConfig::default()
    };
    let mut config = overrides.resolver_or(fallback);
    if args.strict {
        config.flag_unmatched_votes = true;
    }

    let resolver = PlayerResolver::new(&args.players, &segmenter, config)?;
    match resolver
        .resolve(&RawVote::from_text(args.vote.as_str()))
        .with_context(|| format!("Could not resolve {:?}", args.vote))?
    {
        Some(resolution) => println!("{resolution}"),
        None => log::warn!("{:?} does not name a player", args.vote),
    }
    Ok(())
}

fn run_extract(args: ExtractArgs, overrides: &Overrides) -> Result<()> {
    let content = fs::read_to_string(&args.post)
        .with_context(|| format!("Failed to read {}", args.post.display()))?;
    let locator = VoteLocator::new(overrides.locator_or_default());
    for vote in locator.find_votes(&content) {
        println!("{vote}");
    }
    Ok(())
}

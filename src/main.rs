//! Hugo CLI
//!
//! Usage:
//!   hugo --text "reply text"                  # Score one assistant reply
//!   hugo --prompt "user prompt"               # Coach one user prompt
//!   hugo --interactive                        # Replies, or prompts prefixed with '>'
//!   hugo --normalize '{"hugo_score": 82}'     # Normalize a resonance payload
//!   hugo --serve                              # HTTP API server
//!   hugo --text "text" --json                 # JSON output

use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use tracing::{error, Level};

use hugo_resonance::config::ScoringConfig;
use hugo_resonance::core::{
    normalize, run_server, AnalyzerChain, HriReading, KeywordAnalyzer, LexiconTable, ResonanceScorer, ScoringSession,
};
use hugo_resonance::types::{CoachingOutput, ExtractedMessage, OutputMessage};
use hugo_resonance::{HugoResult, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "hugo",
    version = VERSION,
    about = "Hugo Resonance - score AI replies and coach user prompts",
    long_about = "Hugo Resonance is the deterministic scoring core behind the Hugo HUD.\n\n\
                  Replies are scored for tone and a Hugo Resonance Index (HRI, 0-1),\n\
                  smoothed over time. Prompts are classified into a coaching state.\n\n\
                  Modes:\n  \
                  --text         Score one reply\n  \
                  --prompt       Coach one prompt\n  \
                  --interactive  Read lines from stdin ('>' prefix marks a prompt)\n  \
                  --normalize    Normalize a JSON resonance payload\n  \
                  --serve        HTTP API server mode\n\n\
                  Tones:\n  \
                  urgent, dissonant, resonant, reflective, calm"
)]
struct Args {
    /// Reply text to score (single mode)
    #[arg(short, long)]
    text: Option<String>,

    /// Prompt text to coach (single mode)
    #[arg(short, long)]
    prompt: Option<String>,

    /// Interactive mode - read lines from stdin
    #[arg(short, long)]
    interactive: bool,

    /// JSON payload to normalize
    #[arg(short, long)]
    normalize: Option<String>,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Scoring config file (JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show HRI breakdown and debug logs
    #[arg(long)]
    verbose: bool,
}

/// Session plus a scorer over the same lexicon, for breakdowns
struct Cli {
    session: ScoringSession,
    scorer: ResonanceScorer,
    seq: u64,
}

impl Cli {
    fn new(config: ScoringConfig) -> HugoResult<Self> {
        config.validate()?;
        let table = match &config.lexicon {
            Some(lexicon) => Arc::new(LexiconTable::from_config(lexicon)?),
            None => LexiconTable::shared(),
        };
        let analyzers = AnalyzerChain::new(KeywordAnalyzer::new(Arc::clone(&table)));
        Ok(Self {
            session: ScoringSession::with_analyzers("cli", config, analyzers),
            scorer: ResonanceScorer::new(table),
            seq: 0,
        })
    }

    fn score(&mut self, text: &str) -> (OutputMessage, HriReading) {
        self.seq += 1;
        let message = ExtractedMessage::new(format!("cli-{}", self.seq), "cli", text, Utc::now().timestamp_millis());
        let output = self.session.score_message(&message);
        let reading = self.scorer.evaluate(&output.text);
        (output, reading)
    }

    fn coach(&mut self, text: &str) -> CoachingOutput {
        self.session.analyze_prompt(text, Utc::now().timestamp_millis())
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match &args.config {
        Some(path) => match ScoringConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => ScoringConfig::default(),
    };

    if args.serve {
        if let Err(e) = run_server(&args.addr, config).await {
            error!("Server error: {}", e);
            process::exit(1);
        }
        return;
    }

    if let Some(ref payload) = args.normalize {
        run_normalize(payload, &args);
        return;
    }

    let mut cli = match Cli::new(config) {
        Ok(cli) => cli,
        Err(e) => {
            error!("Invalid scoring config: {}", e);
            process::exit(1);
        }
    };

    if args.interactive {
        run_interactive(&mut cli, &args);
    } else if let Some(ref text) = args.text {
        print_reply(&mut cli, text, &args);
    } else if let Some(ref text) = args.prompt {
        print_prompt(&mut cli, text, &args);
    } else {
        // Default to interactive if no mode specified
        run_interactive(&mut cli, &args);
    }
}

fn run_normalize(payload: &str, args: &Args) {
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            error!("Invalid JSON payload: {}", e);
            process::exit(1);
        }
    };
    let normalized = normalize(&value);
    let rendered = if args.json {
        serde_json::to_string(&normalized)
    } else {
        serde_json::to_string_pretty(&normalized)
    };
    match rendered {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Failed to render output: {}", e),
    }
}

/// Run interactive mode: plain lines are replies, '>' lines are prompts
fn run_interactive(cli: &mut Cli, args: &Args) {
    print_header();
    println!("Type a reply to score it, or '> prompt' to get coaching.");
    println!("Type 'reset' to clear drift, 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", "hugo> ".bold());
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Replies scored: {}", cli.seq);
            break;
        }
        if line.eq_ignore_ascii_case("reset") {
            cli.session.reset();
            println!("{}", "drift cleared".dimmed());
            continue;
        }
        if line.is_empty() {
            continue;
        }

        match line.strip_prefix('>') {
            Some(prompt) => print_prompt(cli, prompt.trim(), args),
            None => print_reply(cli, line, args),
        }
    }
}

fn print_reply(cli: &mut Cli, text: &str, args: &Args) {
    let (output, reading) = cli.score(text);

    if args.json {
        print_json(&output);
        return;
    }

    if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        let tone = format!("{} {}", output.tone.emoji(), output.tone)
            .as_str()
            .color(output.tone.color());
        println!(
            "{} | HRI {} | score {} | drift {:.3}",
            tone,
            output.hri.map(|h| format!("{:.3}", h)).unwrap_or_else(|| "-".into()),
            output.hugo_score.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            output.drifted_hri
        );
    }

    if args.verbose {
        print_breakdown(&reading);
    }
}

fn print_prompt(cli: &mut Cli, text: &str, args: &Args) {
    let output = cli.coach(text);

    if args.json {
        print_json(&output);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
        if output.show {
            println!("  {}", output.script.title.bold());
            println!("  {}", output.script.insight);
            for suggestion in output.script.suggestions {
                println!("    - {}", suggestion);
            }
        }
    }
}

fn print_breakdown(reading: &HriReading) {
    let h = &reading.hits;
    println!(
        "  hits: urgent={} dissonant={} resonant={} reflective={} calm={}",
        h.urgent, h.dissonant, h.resonant, h.reflective, h.calm
    );
    println!(
        "  base={:.2} cues=[{}] delta={:+.2} -> hri={:.3}",
        reading.base,
        reading.cues.join(", "),
        reading.delta,
        reading.hri
    );
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Failed to render output: {}", e),
    }
}

fn print_header() {
    println!("{}", "========================================".bold());
    println!("{}", format!("  Hugo Resonance v{}", VERSION).as_str().bold());
    println!("{}", "========================================".bold());
    println!();
}

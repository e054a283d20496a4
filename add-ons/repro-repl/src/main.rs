//! Terminal front end: reads one utterance per line and prints the engine's reply.

use repro_core::{CoreConfig, ResponseEngine, SessionStore};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REPL_SESSION: &str = "terminal";

enum Command {
    Quit,
    Reset,
    Help,
    Skip,
    Say,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "" => Command::Skip,
        "quit" | "exit" | "bye" => Command::Quit,
        "reset" => Command::Reset,
        "help" => Command::Help,
        _ => Command::Say,
    }
}

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[repro-repl] .env not loaded: {} (using system environment)", e);
    }

    // Logs go to stderr so they never interleave with the conversation on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };
    let engine = match config.build_engine() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Engine construction failed: {}", e);
            std::process::exit(1);
        }
    };
    let store = SessionStore::with_history_limit(config.history_limit);

    if let Err(e) = run(&config, &engine, &store, io::stdin().lock(), io::stdout().lock()) {
        eprintln!("Terminal I/O failed: {}", e);
        std::process::exit(1);
    }
}

fn run<I: BufRead, O: Write>(
    config: &CoreConfig,
    engine: &ResponseEngine,
    store: &SessionStore,
    input: I,
    mut out: O,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let label = &config.bot_name;

    writeln!(out, "{}: {}", label, engine.greeting(&mut rng))?;
    writeln!(out, "(type 'help' for topics, 'reset' to start over, 'quit' to leave)")?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Command::Skip => continue,
            Command::Quit => {
                writeln!(out, "{}: {}", label, engine.farewell(&mut rng))?;
                return Ok(());
            }
            Command::Reset => {
                store.reset(REPL_SESSION);
                writeln!(
                    out,
                    "{}: Let's start fresh. What would you like to discuss?",
                    label
                )?;
            }
            Command::Help => writeln!(out, "{}", engine.help_text())?,
            Command::Say => {
                let reply =
                    store.converse(engine, Some(REPL_SESSION.to_string()), line.trim(), &mut rng);
                tracing::debug!(
                    target: "repro::repl",
                    kind = ?reply.kind,
                    topic = ?reply.topic,
                    "Turn complete"
                );
                writeln!(out, "{}: {}", label, reply.response)?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use repro_core::{ComposerSettings, PhraseCategory};

    fn setup() -> (CoreConfig, ResponseEngine, SessionStore) {
        let config = CoreConfig {
            composer: ComposerSettings::plain(),
            ..CoreConfig::default()
        };
        let engine = config.build_engine().unwrap();
        (config, engine, SessionStore::new())
    }

    fn transcript(input: &str) -> (String, SessionStore) {
        let (config, engine, store) = setup();
        let mut out = Vec::new();
        run(&config, &engine, &store, input.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), store)
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert!(matches!(parse_command("  QUIT "), Command::Quit));
        assert!(matches!(parse_command("Exit"), Command::Quit));
        assert!(matches!(parse_command("bye"), Command::Quit));
        assert!(matches!(parse_command("Reset"), Command::Reset));
        assert!(matches!(parse_command("HELP"), Command::Help));
        assert!(matches!(parse_command("   "), Command::Skip));
        assert!(matches!(parse_command("bye for now"), Command::Say));
    }

    #[test]
    fn test_quit_stops_before_later_lines() {
        let (out, store) = transcript("quit\ndocker\n");
        let lines: Vec<&str> = out.lines().collect();
        // greeting, usage hint, farewell
        assert_eq!(lines.len(), 3);
        assert!(store.is_empty());
        let (_, engine, _) = setup();
        let farewell = lines[2].trim_start_matches(&format!("{}: ", repro_core::DEFAULT_BOT_NAME));
        assert!(engine.phrases().pool(PhraseCategory::Closing).contains(farewell));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (out, store) = transcript("\n   \n");
        assert_eq!(out.lines().count(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_help_lists_topics() {
        let (out, _) = transcript("help\n");
        assert!(out.contains("I can help with:"));
        assert!(out.contains("Just ask me about any of these topics!"));
    }

    #[test]
    fn test_conversation_then_reset() {
        let (out, store) = transcript("How do I make my Stata code reproducible?\nreset\n");
        assert!(out.contains("For Stata specifically: "));
        assert!(out.contains("Let's start fresh. What would you like to discuss?"));
        let snap = store.snapshot(REPL_SESSION).unwrap();
        assert!(snap.context.is_empty());
        assert!(snap.transcript.is_empty());
    }
}

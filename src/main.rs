use anyhow::Result;
use monica::ai::CompletionGateway;
use monica::companion::{ConversationOrchestrator, SessionStore};
use monica::config::{self, CompanionConfig, ProviderKind};
use monica::triage::{
    ClassificationResult, EmergencyCategory, EmergencyClassifier, GUIDANCE_DISCLAIMER, Priority,
    ScenarioCatalog,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

const HELP: &str = "\
Type anything to talk with Monica.
  /mood <feeling>   tell Monica how you feel (/mood alone clears it)
  /triage <query>   search first-aid topics
  /steps <id>       show the step-by-step guide for a category
  /contacts         emergency phone numbers
  /tip              a wellness tip for today
  /reset            start a fresh conversation
  /quit             leave";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Chat(&'a str),
    Mood(Option<&'a str>),
    Triage(&'a str),
    Steps(&'a str),
    Contacts,
    Tip,
    Reset,
    Help,
    Quit,
    Empty,
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Chat(line);
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "mood" => Command::Mood(Some(arg).filter(|mood| !mood.is_empty())),
        "triage" => Command::Triage(arg),
        "steps" => Command::Steps(arg),
        "contacts" => Command::Contacts,
        "tip" => Command::Tip,
        "reset" => Command::Reset,
        "quit" | "exit" => Command::Quit,
        _ => Command::Help,
    }
}

fn print_triage(result: &ClassificationResult) {
    if result.is_emergency {
        println!("⚠ Emergency mode - call 911 if someone is in danger.");
    }
    if result.matches.is_empty() {
        println!("No first-aid topics match that search.");
        return;
    }
    for category in &result.matches {
        let flag = if result.is_emergency && category.priority == Priority::High {
            " [HIGH PRIORITY]"
        } else {
            ""
        };
        println!("  {} - {}{}", category.id, category.title, flag);
        println!("      {}", category.scenarios.join(", "));
    }
}

fn print_guide(catalog: &ScenarioCatalog, category: &EmergencyCategory) {
    println!("{}", category.title);
    for scenario in &category.scenarios {
        println!("\n  {scenario}");
        for (index, step) in catalog.steps_for(scenario).iter().enumerate() {
            println!("    {}. {step}", index + 1);
        }
    }
    println!("\n{GUIDANCE_DISCLAIMER}");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Environment writes happen here, before the runtime spawns its workers.
    config::load_dotenv();
    let config = CompanionConfig::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: CompanionConfig) -> Result<()> {
    if config.api_key.is_none() && config.provider != ProviderKind::Ollama {
        warn!(provider = ?config.provider, "no API key configured; replies will use fallbacks");
    }

    let store = SessionStore::new(ConversationOrchestrator::new(
        CompletionGateway::from_config(&config),
    ));
    let catalog = ScenarioCatalog::builtin();
    let classifier = EmergencyClassifier::new(catalog);

    let mut session = store.start();
    let mut mood: Option<String> = None;

    println!("Hi, I'm Monica 💜 How are you feeling today? (/help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Empty => {}
            Command::Chat(text) => match store.turn(session, text, mood.as_deref()).await {
                Ok(reply) => println!("Monica: {reply}"),
                Err(err) => warn!(error = %err, "turn was not applied"),
            },
            Command::Mood(Some(feeling)) => {
                println!("Thanks for sharing that you're feeling {feeling}.");
                mood = Some(feeling.to_string());
            }
            Command::Mood(None) => mood = None,
            Command::Triage(query) => print_triage(&classifier.classify(query)),
            Command::Steps(id) => match catalog.category(id) {
                Some(category) => print_guide(catalog, category),
                None => println!(
                    "Unknown category '{id}'. Try one of: {}",
                    catalog
                        .categories()
                        .iter()
                        .map(|c| c.id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            },
            Command::Contacts => {
                for contact in catalog.emergency_contacts() {
                    println!("  {}: {}", contact.name, contact.number);
                }
            }
            Command::Tip => println!("{}", store.orchestrator().wellness_tip().await),
            Command::Reset => {
                store.end(session);
                session = store.start();
                mood = None;
                println!("Fresh start. What's on your mind?");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    store.end(session);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(parse_command("  hello there "), Command::Chat("hello there"));
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse_command("/mood  anxious"), Command::Mood(Some("anxious")));
        assert_eq!(parse_command("/mood"), Command::Mood(None));
        assert_eq!(
            parse_command("/triage severe bleeding"),
            Command::Triage("severe bleeding")
        );
        assert_eq!(parse_command("/steps cpr"), Command::Steps("cpr"));
        assert_eq!(parse_command("/exit"), Command::Quit);
    }

    #[test]
    fn unknown_commands_show_help() {
        assert_eq!(parse_command("/dance"), Command::Help);
    }
}

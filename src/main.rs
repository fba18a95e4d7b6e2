//! Line-oriented terminal driver for the advisory flow.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use innovation_board::adapters::backend::{HttpAdvisoryBackend, HttpBackendConfig};
use innovation_board::application::{AdvisoryClient, PollSettings, SessionController};
use innovation_board::config::{AppConfig, LoggingConfig};
use innovation_board::domain::advice::{attribute, PersonaMatch};
use innovation_board::domain::session::{SessionStep, MAX_QUESTION_LENGTH};

type Input = Lines<BufReader<Stdin>>;
type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let backend = HttpAdvisoryBackend::new(HttpBackendConfig::from(&config.backend))?;
    let client = AdvisoryClient::new(Arc::new(backend))
        .with_poll_settings(PollSettings::from(&config.polling));
    let mut controller = SessionController::new(Arc::new(client));
    info!(base_url = %config.backend.base_url, "Innovation Board client started");

    if let Some(warning) = controller.check_connectivity().await {
        println!("Warning: {}", warning);
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!();
        println!("Ask the board (up to {} characters, empty line to quit):", MAX_QUESTION_LENGTH);
        let Some(question) = input.next_line().await? else {
            break;
        };
        if question.trim().is_empty() {
            break;
        }

        controller.edit_question(question);
        if !controller.can_submit() {
            println!("Questions must be 1-{} characters.", MAX_QUESTION_LENGTH);
            controller.reset();
            continue;
        }

        println!("Creating your session...");
        controller.submit_question().await;
        while controller.step() == SessionStep::Probing {
            let Some(answer) = ask_probing(&controller, &mut input).await? else {
                return Ok(());
            };
            if controller.session().is_some_and(|s| s.answers().len() + 1 == s.question_count()) {
                println!("The board is deliberating...");
            }
            controller.choose_option(answer).await?;
        }

        match controller.step() {
            SessionStep::Advice => print_advice(&controller),
            SessionStep::Error => {
                if let Some(err) = controller.error() {
                    println!("Error: {}", err);
                }
            }
            _ => {}
        }
        controller.reset();
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), BoxError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(logging.env_filter())
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// Shows the current probing question and reads one answer.
///
/// A number picks the matching option; anything else is taken verbatim.
async fn ask_probing(
    controller: &SessionController,
    input: &mut Input,
) -> Result<Option<String>, BoxError> {
    let Some(session) = controller.session() else {
        return Ok(None);
    };

    println!();
    println!(
        "[{}/{}] {}",
        session.current_index() + 1,
        session.question_count(),
        session.current_question()
    );
    let options = session.current_options();
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    let Some(line) = input.next_line().await? else {
        return Ok(None);
    };
    let line = line.trim();
    let answer = line
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_else(|| line.to_string());
    Ok(Some(answer))
}

fn print_advice(controller: &SessionController) {
    for (persona, item) in attribute(controller.advice()) {
        println!();
        match persona {
            PersonaMatch::Known(p) => println!("{} ({}) - {}", p.name, p.title, item.confidence),
            PersonaMatch::Unknown(name) => println!("{} ({}) - {}", name, item.title, item.confidence),
        }
        println!("{}", item.text);
    }
}

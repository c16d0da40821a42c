//! Tijd-Detective terminal client.
//!
//! A line-oriented interface for the time-travel history game: explore a
//! scenario, gather clues, question its characters, and guess the year.
//!
//! ```bash
//! cargo run -p tijd                  # remote services when configured
//! cargo run -p tijd -- --local      # force local-only play
//! ```

use std::io::{self, BufRead, Write};

use tijd_core::{GameSession, SessionConfig};

/// Year guesses are constrained at the input surface, not in the engine.
const MIN_YEAR: i32 = 1000;
const MAX_YEAR: i32 = 2000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = SessionConfig::new();
    if args.iter().any(|a| a == "--local") {
        config = config.local_only();
    }
    if let Some(pos) = args.iter().position(|a| a == "--save") {
        if let Some(path) = args.get(pos + 1) {
            config = config.with_save_path(path);
        }
    }
    if let Some(pos) = args.iter().position(|a| a == "--start") {
        if let Some(id) = args.get(pos + 1) {
            config = config.with_starting_scenario(id.clone());
        }
    }

    let mut session = GameSession::new(config).await?;

    println!("=== Tijd-Detective ===");
    print_scenario(&session);
    println!("Typ 'help' voor de commando's.\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_commands(),
            "look" => print_scenario(&session),
            "clues" => print_clues(&session),
            "examine" => examine(&mut session, rest),
            "npcs" => print_npcs(&session),
            "talk" => talk(&mut session, rest).await,
            "guess" => guess(&mut session, rest),
            "travel" => travel(&mut session, rest),
            "scenarios" => print_scenarios(&session),
            "log" => print_log(&session),
            "score" => println!("Totaal: {} punten", session.score()),
            "continue" => {
                session.continue_playing();
                println!("De tijdmachine staat weer klaar.");
            }
            "save" => {
                let outcome = session.save_now().await;
                if outcome.is_saved() {
                    println!("Opgeslagen.");
                } else {
                    println!("Opslaan is niet gelukt; je voortgang blijft in het geheugen.");
                }
            }
            "quit" | "exit" => break,
            _ => println!("Onbekend commando '{command}'. Typ 'help'."),
        }

        if session.is_game_won() {
            println!();
            println!("🎉 Gefeliciteerd, Tijd-Detective!");
            println!("Je hebt alle historische mysteries opgelost.");
            println!("Totaal Score: {} punten", session.score());
            println!("Typ 'continue' om verder te spelen of 'quit' om te stoppen.");
        }
    }

    session.save_now().await;
    session.shutdown().await;
    Ok(())
}

fn print_scenario(session: &GameSession) {
    let scenario = session.current_scenario();
    println!();
    println!("== {} ({}) ==", scenario.title, scenario.period);
    println!("{}", scenario.description);
    println!("{}", scenario.setting);
    println!("Mysterie: {}", scenario.mystery);
    if session.is_current_scenario_complete() {
        println!("[Opgelost: het jaar was {}]", scenario.target_year);
    }
}

fn print_clues(session: &GameSession) {
    let scenario = session.current_scenario();
    println!("Aanwijzingen:");
    for clue in &scenario.clues {
        let marker = if session.state().has_discovered(&clue.id) {
            "✔"
        } else {
            " "
        };
        println!(
            "  [{marker}] {} ({}) - {}",
            clue.id, clue.kind, clue.description
        );
    }
    println!("Gebruik 'examine <id>' om een aanwijzing te onderzoeken.");
}

fn examine(session: &mut GameSession, clue_id: &str) {
    if clue_id.is_empty() {
        println!("Gebruik: examine <clue_id>");
        return;
    }

    if let Some(clue) = session.discover_clue(clue_id) {
        println!("{} — {}", clue.title, clue.content);
        println!("(+{} punten)", clue.points);
        return;
    }

    // Already discovered, or not a clue at all.
    match session.current_scenario().clue(clue_id) {
        Some(clue) => println!("{} — {}", clue.title, clue.content),
        None => println!("Hier valt niets te onderzoeken."),
    }
}

fn print_npcs(session: &GameSession) {
    println!("Aanwezig:");
    for npc in &session.current_scenario().npcs {
        println!("  {} {} ({}) - {}", npc.avatar, npc.id, npc.name, npc.role);
    }
    println!("Gebruik 'talk <npc_id> <bericht>' om een gesprek te voeren.");
}

async fn talk(session: &mut GameSession, rest: &str) {
    let Some((npc_id, message)) = rest.split_once(' ') else {
        println!("Gebruik: talk <npc_id> <bericht>");
        return;
    };
    let npc_id = npc_id.to_string();

    let Some(name) = session
        .current_scenario()
        .npc(&npc_id)
        .map(|n| n.name.clone())
    else {
        println!("Er is hier niemand met die naam.");
        return;
    };

    match session.talk_to(&npc_id, message.trim()).await {
        Some(reply) => println!("{name}: {reply}"),
        None => println!("Er is hier niemand met die naam."),
    }
}

fn guess(session: &mut GameSession, rest: &str) {
    let Ok(year) = rest.parse::<i32>() else {
        println!("Gebruik: guess <jaartal>");
        return;
    };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        println!("Kies een jaartal tussen {MIN_YEAR} en {MAX_YEAR}.");
        return;
    }

    let guess = session.guess_year(year);
    if guess.is_correct {
        println!("Juist! Het jaar was {year}. (+{} punten)", guess.points);
    } else {
        match &guess.hint {
            Some(hint) => println!("Helaas, dat is niet het juiste jaar. {hint}"),
            None => println!("Helaas, dat is niet het juiste jaar."),
        }
    }
}

fn travel(session: &mut GameSession, scenario_id: &str) {
    if scenario_id.is_empty() {
        println!("Gebruik: travel <scenario_id>");
        return;
    }
    if session.travel_to(scenario_id) {
        print_scenario(session);
    } else {
        println!("De tijdmachine kent die bestemming niet.");
    }
}

fn print_scenarios(session: &GameSession) {
    println!("Bestemmingen:");
    for scenario in session.catalog().scenarios() {
        let marker = if session.state().is_scenario_complete(&scenario.id) {
            "✔"
        } else {
            " "
        };
        println!("  [{marker}] {} - {} ({})", scenario.id, scenario.title, scenario.period);
    }
}

fn print_log(session: &GameSession) {
    let scenario = session.current_scenario();
    let guesses: Vec<_> = session.state().scenario_guesses(&scenario.id).collect();
    if guesses.is_empty() {
        println!("Nog geen gokken voor dit scenario.");
        return;
    }
    println!("Logboek voor {}:", scenario.title);
    for guess in guesses {
        let verdict = if guess.is_correct { "juist" } else { "onjuist" };
        match &guess.hint {
            Some(hint) => println!("  {} - {verdict} ({hint})", guess.year),
            None => println!("  {} - {verdict}", guess.year),
        }
    }
    println!(
        "Score in dit scenario: {} punten",
        session.current_scenario_score()
    );
}

fn print_commands() {
    println!("Commando's:");
    println!("  look               beschrijving van het huidige scenario");
    println!("  clues              lijst van aanwijzingen");
    println!("  examine <id>       onderzoek een aanwijzing");
    println!("  npcs               wie je kunt aanspreken");
    println!("  talk <id> <tekst>  praat met een personage");
    println!("  guess <jaartal>    gok het jaar ({MIN_YEAR}-{MAX_YEAR})");
    println!("  scenarios          alle bestemmingen");
    println!("  travel <id>        reis naar een ander scenario");
    println!("  log                gokken in dit scenario");
    println!("  score              totale score");
    println!("  continue           speel verder na de overwinning");
    println!("  save               sla direct op");
    println!("  quit               opslaan en stoppen");
}

fn print_help() {
    println!("Tijd-Detective - historisch tijdreisspel");
    println!();
    println!("Gebruik: tijd [OPTIES]");
    println!();
    println!("Opties:");
    println!("  --local           geen externe diensten, alleen lokaal spelen");
    println!("  --save <pad>      pad van het lokale savebestand");
    println!("  --start <id>      startscenario voor een nieuw spel");
    println!("  -h, --help        deze hulp");
    println!();
    println!("Externe diensten worden ingeschakeld via SUPABASE_URL en");
    println!("SUPABASE_ANON_KEY (bijvoorbeeld in een .env bestand).");
}

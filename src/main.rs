// Pokedex - terminal lookup tool
// Thin presentation layer over the lookup session: reads names from stdin,
// renders each resolved state and routes playback commands

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use pokedex::api::models::PokemonRecord;
use pokedex::api::ApiClient;
use pokedex::audio::CuePlayer;
use pokedex::deeplink::AddressBar;
use pokedex::lookup::{LookupSession, LookupState};

/// Terminal Pokédex backed by a remote lookup service.
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base endpoint of the lookup service.
    #[arg(short, long, default_value = "http://localhost:8000/")]
    endpoint: Url,

    /// Starting address or creature name, e.g. '?pokemon_name=charmander'.
    link: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let client = ApiClient::new(args.endpoint.clone()).context("Failed to set up API client")?;
    let address = match args.link.as_deref() {
        Some(arg) => AddressBar::from_launch_arg(arg, &args.endpoint),
        None => AddressBar::at(args.endpoint.clone()),
    };
    let mut session = LookupSession::new(client, CuePlayer::new(), address);

    println!("Pokedex da Ingridolas");
    println!("Digite o nome do Pokémon. Comandos: :play, :link, :quit");

    // A deep-linked address triggers its lookup before any user input.
    if let Some(pending) = session.submit_initial() {
        println!("Carregando...");
        session.resolve(pending).await;
        render(session.state(), session.player());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            ":quit" | ":q" => break,
            ":link" => println!("{}", session.address().current()),
            ":play" | ":p" => {
                if session.player().has_cue() {
                    if let Err(err) = session.player_mut().play() {
                        eprintln!("Não foi possível tocar o áudio: {err:#}");
                    }
                } else {
                    println!("Nenhum áudio carregado.");
                }
            }
            input => {
                if let Some(pending) = session.submit(input) {
                    println!("Carregando...");
                    session.resolve(pending).await;
                    render(session.state(), session.player());
                }
            }
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush prompt")?;
    Ok(())
}

fn render(state: &LookupState, player: &CuePlayer) {
    match state {
        LookupState::Idle => {}
        LookupState::Loading => println!("Carregando..."),
        LookupState::Failure(msg) => println!("{msg}"),
        LookupState::Success(record) => render_record(record, player),
    }
}

fn render_record(record: &PokemonRecord, player: &CuePlayer) {
    if let Some(name) = record.name.as_deref() {
        println!("\n=== {} ===", capitalize(name));
    }

    if !record.sprites.is_empty() {
        println!("Sprites:");
        for sprite in &record.sprites {
            println!("  {sprite}");
        }
    }

    match record.height {
        Some(height) => println!("Altura: {height} decímetros"),
        None => println!("Altura: Desconhecida"),
    }
    match record.weight {
        Some(weight) => println!("Peso: {weight} hectogramas"),
        None => println!("Peso: Desconhecido"),
    }
    println!("Tipo(s): {}", join_or_unknown(record.types.as_deref()));
    println!(
        "Habilidade(s): {}",
        join_or_unknown(record.abilities.as_deref())
    );

    println!("Estatísticas:");
    println!("  Ataque: {}", stat(record.stats.attack));
    println!("  Defesa: {}", stat(record.stats.defense));
    println!("  HP: {}", stat(record.stats.hp));
    println!("  Ataque Especial: {}", stat(record.stats.special_attack));
    println!("  Defesa Especial: {}", stat(record.stats.special_defense));
    println!("  Velocidade: {}", stat(record.stats.speed));

    match player.current_url() {
        Some(url) => println!("Áudio do grito: {url} (:play para ouvir)"),
        None => println!("Áudio do grito: indisponível"),
    }
}

fn stat(value: Option<u32>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "Desconhecido".to_string(),
    }
}

fn join_or_unknown(values: Option<&[String]>) -> String {
    match values {
        Some(list) if !list.is_empty() => list.join(", "),
        _ => "Desconhecido".to_string(),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

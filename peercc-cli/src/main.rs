mod loopback;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Select, theme::ColorfulTheme};
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use peercc_core::SessionState;
use peercc_session::{
    CommandQueue, JsonSettingsStore, MemorySettingsStore, NullPresenter, Session,
    SessionSettings, SessionSnapshot, SettingsStore,
};

use loopback::{LoopbackMedia, LoopbackSignaling};

#[derive(Parser)]
#[command(name = "peercc")]
#[command(about = "Peer-to-peer call session driver")]
struct Cli {
    /// JSON file with persisted settings.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings the session would start with.
    Settings,

    /// Drive a session against an in-process rendezvous server.
    Demo {
        #[arg(long, default_value = "peercc")]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store: Box<dyn SettingsStore> = match &cli.settings {
        Some(path) => Box::new(JsonSettingsStore::open_or_default(path)),
        None => Box::new(MemorySettingsStore::new()),
    };
    let settings = SessionSettings::load(store.as_ref());

    match cli.command {
        Commands::Settings => print_settings(&settings),
        Commands::Demo { name } => run_demo(&settings, name).await?,
    }

    Ok(())
}

fn print_settings(settings: &SessionSettings) {
    println!("{}", "Session settings".green().bold());
    println!("   Server:       {}", settings.server);
    println!("   Trace server: {}", settings.trace_server);
    println!("   NTP server:   {}", settings.ntp_server);
    println!(
        "   Audio codec:  {}",
        settings
            .audio_codec
            .map_or_else(|| "auto".to_owned(), |id| id.to_string())
    );
    println!(
        "   Video codec:  {}",
        settings
            .video_codec
            .map_or_else(|| "auto".to_owned(), |id| id.to_string())
    );
    println!("   ICE servers:");
    for server in &settings.ice_servers {
        let kind = if server.is_turn() { "turn" } else { "stun" };
        println!("      [{}] {}", kind.cyan(), server.urls.join(", "));
    }
}

async fn run_demo(settings: &SessionSettings, name: String) -> Result<()> {
    let queue = Arc::new(CommandQueue::new());
    let events = peercc_session::SessionEvents::new(Arc::clone(&queue));

    let session = Arc::new(Session::new(
        queue,
        Arc::new(LoopbackSignaling::new(events.clone(), name)),
        Arc::new(LoopbackMedia::new(events)),
        Arc::new(NullPresenter),
        settings,
    ));

    let consumer = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.run().await })
    };

    println!("{}", "📞 Loopback session ready".green().bold());

    let menu_session = Arc::clone(&session);
    let handle = Handle::current();
    tokio::task::spawn_blocking(move || menu(&menu_session, &handle))
        .await
        .context("Menu thread panicked")??;

    session.shutdown();
    consumer.await.context("Session loop panicked")?;
    println!("{}", "👋 Session closed".green().bold());
    Ok(())
}

#[derive(Clone, Copy)]
enum MenuItem {
    ToggleConnection,
    ToggleCall,
    SelectPeer,
    ToggleCamera,
    ToggleMicrophone,
    Refresh,
    Suspend,
    Quit,
}

impl MenuItem {
    fn label(self, snapshot: &SessionSnapshot) -> String {
        let on_off = |on: bool| if on { "off" } else { "on" };
        match self {
            Self::ToggleConnection => snapshot.labels.connect.to_owned(),
            Self::ToggleCall => snapshot.labels.call.to_owned(),
            Self::SelectPeer => "Select peer".to_owned(),
            Self::ToggleCamera => format!("Camera {}", on_off(snapshot.preferences.camera_on)),
            Self::ToggleMicrophone => {
                format!("Microphone {}", on_off(snapshot.preferences.microphone_on))
            }
            Self::Refresh => "Refresh".to_owned(),
            Self::Suspend => "Suspend".to_owned(),
            Self::Quit => "Quit".to_owned(),
        }
    }
}

const MENU: [MenuItem; 8] = [
    MenuItem::ToggleConnection,
    MenuItem::ToggleCall,
    MenuItem::SelectPeer,
    MenuItem::ToggleCamera,
    MenuItem::ToggleMicrophone,
    MenuItem::Refresh,
    MenuItem::Suspend,
    MenuItem::Quit,
];

fn menu(session: &Session, runtime: &Handle) -> Result<()> {
    let theme = ColorfulTheme::default();

    loop {
        let snapshot = session.snapshot();
        print_snapshot(&snapshot);

        let labels: Vec<String> = MENU.iter().map(|item| item.label(&snapshot)).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()?;

        let outcome = match MENU[choice] {
            MenuItem::ToggleConnection => session.toggle_connection().map(|_| ()),
            MenuItem::ToggleCall => session.toggle_call().map(|_| ()),
            MenuItem::SelectPeer => {
                if snapshot.peers.is_empty() {
                    println!("{}", "No peers listed".yellow());
                    continue;
                }
                let names: Vec<String> = snapshot.peers.iter().map(|p| p.to_string()).collect();
                let index = Select::with_theme(&theme)
                    .with_prompt("Peer")
                    .items(&names)
                    .default(snapshot.selected.unwrap_or(0))
                    .interact()?;
                session.select_peer(index).map(|_| ())
            }
            MenuItem::ToggleCamera => {
                session.set_camera_enabled(!snapshot.preferences.camera_on);
                Ok(())
            }
            MenuItem::ToggleMicrophone => {
                session.set_microphone_enabled(!snapshot.preferences.microphone_on);
                Ok(())
            }
            MenuItem::Refresh => Ok(()),
            MenuItem::Suspend => {
                runtime.block_on(session.on_app_suspending());
                Ok(())
            }
            MenuItem::Quit => {
                if session.state() != SessionState::Disconnected {
                    runtime.block_on(session.on_app_suspending());
                }
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            println!("{} {}", "⚠".yellow(), e.to_string().yellow());
        }
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let state = match snapshot.state {
        SessionState::Connected | SessionState::InCall => snapshot.state.to_string().green(),
        SessionState::Disconnected => snapshot.state.to_string().red(),
        _ => snapshot.state.to_string().yellow(),
    };
    println!();
    println!("{} {}  ({})", "●".bold(), state.bold(), snapshot.server_address);

    for (index, peer) in snapshot.peers.iter().enumerate() {
        let marker = if snapshot.selected == Some(index) { ">" } else { " " };
        println!("   {} {}", marker.cyan(), peer);
    }
    if !snapshot.tracks.is_empty() {
        let tracks: Vec<String> = snapshot
            .tracks
            .iter()
            .map(|(origin, kind)| format!("{origin:?}/{kind}"))
            .collect();
        println!("   tracks: {}", tracks.join(" "));
    }
    if let Some(stats) = &snapshot.health_stats {
        println!("   stats:  {}", stats.dimmed());
    }
}

//! Command-line surface for the LivePulse client
//!
//! Each subcommand maps to one screen's worth of behavior: `timeline`
//! is the news feed, `calendar` the date index, `artists` the watchlist
//! settings. Output is plain text; all projection logic lives in
//! [`crate::views`].

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pulse_common::config;
use pulse_common::events::EventBus;
use pulse_common::identity::{IdentityProvider, PushTokenProvider};
use pulse_common::model::Range;

use crate::backend::{BackendClient, BackendError};
use crate::notify::PushPayload;
use crate::store::Store;
use crate::views::{self, SortOrder};

/// Command-line arguments for pulse-app
#[derive(Parser, Debug)]
#[command(name = "pulse-app")]
#[command(about = "LivePulse live-event client")]
#[command(version)]
pub struct Args {
    /// Backend base URL (falls back to LIVEPULSE_BASE_URL, then the
    /// config file, then the compiled default)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the live-event timeline
    Timeline {
        /// Event window: "recent" or "all"
        #[arg(long, default_value = "recent", value_parser = parse_range)]
        range: Range,

        /// Case-insensitive keyword over title, artist, and place
        #[arg(long)]
        search: Option<String>,

        /// Sort direction: "newest" or "oldest"
        #[arg(long, default_value = "newest", value_parser = parse_order)]
        order: SortOrder,
    },

    /// Show the calendar date index and one day's events
    Calendar {
        /// Selected day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Manage the watchlist of followed artists
    Artists {
        #[command(subcommand)]
        action: ArtistsAction,
    },

    /// Register the push-notification token with the backend
    RegisterToken,

    /// Display a push payload
    Notify {
        /// Raw JSON payload: {"notification": {"title", "body"}, "data"}
        payload: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ArtistsAction {
    /// List watched artists
    List,

    /// Follow a new artist
    Add { name: String, url: String },

    /// Stop following an artist (asks for confirmation)
    Remove {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Mute or unmute announcements for an artist
    Mute {
        id: String,

        /// "on" to mute, "off" to unmute
        #[arg(value_parser = parse_on_off)]
        state: bool,
    },
}

fn parse_range(s: &str) -> std::result::Result<Range, String> {
    match s {
        "recent" => Ok(Range::Recent),
        "all" => Ok(Range::All),
        other => Err(format!("unknown range {other:?}, expected \"recent\" or \"all\"")),
    }
}

fn parse_order(s: &str) -> std::result::Result<SortOrder, String> {
    match s {
        "newest" => Ok(SortOrder::NewestFirst),
        "oldest" => Ok(SortOrder::OldestFirst),
        other => Err(format!("unknown order {other:?}, expected \"newest\" or \"oldest\"")),
    }
}

fn parse_on_off(s: &str) -> std::result::Result<bool, String> {
    match s {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("unknown state {other:?}, expected \"on\" or \"off\"")),
    }
}

/// Dispatch the parsed command
pub async fn run(args: Args) -> Result<()> {
    // Offline command: no identity, no client
    if let Command::Notify { payload } = &args.command {
        return run_notify(payload);
    }

    let base_url = config::resolve_base_url(args.base_url.as_deref(), args.config.as_deref());
    tracing::debug!(base_url = %base_url, "resolved backend base URL");

    let identity = IdentityProvider::open_default();
    let client = BackendClient::new(&base_url, identity.token())
        .context("failed to construct backend client")?;
    let store = Store::new(client, EventBus::new(100));

    match args.command {
        Command::Timeline {
            range,
            search,
            order,
        } => run_timeline(&store, range, search.as_deref().unwrap_or(""), order).await,
        Command::Calendar { date } => run_calendar(&store, date).await,
        Command::Artists { action } => run_artists(&store, action).await,
        Command::RegisterToken => {
            let push_token = PushTokenProvider::open_default().token();
            store
                .register_push_token(&push_token)
                .await
                .map_err(communication_error)?;
            println!("push token registered");
            Ok(())
        }
        Command::Notify { .. } => unreachable!("handled before client construction"),
    }
}

async fn run_timeline(store: &Store, range: Range, search: &str, order: SortOrder) -> Result<()> {
    // The home screen registers the push token before its first load;
    // failure is non-fatal and already logged by the store.
    let push_token = PushTokenProvider::open_default().token();
    let _ = store.register_push_token(&push_token).await;

    let events = store
        .refresh_events(range)
        .await
        .map_err(communication_error)?;

    let mut visible = views::filter_events(&events, search);
    views::sort_events(&mut visible, order);

    match views::placeholder(true, events.len(), visible.len()) {
        Some(views::Placeholder::NoData) => println!("no events"),
        Some(views::Placeholder::NoMatches) => println!("no matches for {search:?}"),
        Some(views::Placeholder::Initializing) => println!("initializing..."),
        None => {
            for (index, event) in visible.iter().enumerate() {
                println!(
                    "{}  {}  {} @ {}",
                    event.date, event.artist, event.title, event.place
                );
                println!("            {}", event.render_key(index));
            }
        }
    }
    Ok(())
}

async fn run_calendar(store: &Store, date: Option<String>) -> Result<()> {
    // Calendar marking needs the full set: days outside the "recent"
    // window still get their dots.
    let events = store
        .refresh_events(Range::All)
        .await
        .map_err(communication_error)?;

    let selected =
        date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let index = views::date_index(&events, &selected);

    for (day, mark) in &index {
        let dot = if mark.marked { "*" } else { " " };
        let cursor = if mark.selected { ">" } else { " " };
        println!("{cursor} {dot} {day}");
    }

    println!();
    println!("{selected}");
    let day_events = views::events_on(&events, &selected);
    if day_events.is_empty() {
        println!("no events scheduled");
    } else {
        for event in &day_events {
            println!("  {}  {}", event.place, event.title);
        }
    }
    Ok(())
}

async fn run_artists(store: &Store, action: ArtistsAction) -> Result<()> {
    match action {
        ArtistsAction::List => {
            store.refresh_artists().await.map_err(communication_error)?;
            let artists = store.artists().await.unwrap_or_default();
            if artists.is_empty() {
                println!("watchlist is empty");
                return Ok(());
            }
            for artist in &artists {
                let muted = if artist.muted { "  [muted]" } else { "" };
                println!("{}  {}{}", artist.id, artist.name, muted);
                println!("    {}", artist.url);
                if let Some(error) = &artist.last_error {
                    println!("    last error: {error}");
                }
            }
            Ok(())
        }
        ArtistsAction::Add { name, url } => {
            store.refresh_artists().await.map_err(communication_error)?;
            store.set_drafts(&name, &url).await;
            let created = store.submit_add().await?;
            println!("added {} ({})", created.name, created.id);
            Ok(())
        }
        ArtistsAction::Remove { id, yes } => {
            store.refresh_artists().await.map_err(communication_error)?;
            if !yes && !confirm_removal(&id)? {
                println!("cancelled");
                return Ok(());
            }
            store.delete_artist(&id).await?;
            println!("removed {id}");
            Ok(())
        }
        ArtistsAction::Mute { id, state } => {
            store.refresh_artists().await.map_err(communication_error)?;
            store.set_artist_muted(&id, state).await?;
            println!("{} is now {}", id, if state { "muted" } else { "unmuted" });
            Ok(())
        }
    }
}

fn run_notify(payload: &str) -> Result<()> {
    let payload = PushPayload::from_json(payload).context("invalid push payload")?;
    println!("{}", payload.format_banner());
    if !payload.data.is_null() {
        tracing::debug!(data = %payload.data, "notification data");
    }
    Ok(())
}

/// Reads yes/no from the terminal before a destructive removal
fn confirm_removal(id: &str) -> Result<bool> {
    print!("remove artist {id} from the watchlist? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Read failures surface as a communication error with a manual retry
/// affordance, never as a crash
fn communication_error(err: BackendError) -> anyhow::Error {
    anyhow::anyhow!("communication error: {err} (run the command again to retry)")
}

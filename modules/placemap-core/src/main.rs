use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use placemap_common::display::truncate_label;
use placemap_common::{Config, Neighborhood};
use placemap_core::{
    load_categories, CategoryCache, Dispatcher, FileCategoryCache, LoadState, NeighborhoodSession,
    SessionEvent, TracingObserver,
};
use venue_client::VenueClient;

#[derive(Parser)]
#[command(name = "placemap", about = "List a neighborhood's places by category")]
struct Cli {
    /// Filter places by name prefix or category name
    #[arg(long, default_value = "")]
    query: String,

    /// Hide a top-level category (repeatable)
    #[arg(long = "hide", value_name = "CATEGORY_ID")]
    hide: Vec<String>,

    /// Override the neighborhood name
    #[arg(long)]
    name: Option<String>,

    #[arg(long, requires = "lng")]
    lat: Option<f64>,

    #[arg(long, requires = "lat")]
    lng: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("placemap=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    config.log_redacted();

    let neighborhood = match (cli.lat, cli.lng) {
        (Some(lat), Some(lng)) => Neighborhood::new(
            cli.name.clone().unwrap_or_else(|| config.neighborhood.name.clone()),
            lat,
            lng,
        ),
        _ => {
            let mut n = config.neighborhood.clone();
            if let Some(name) = &cli.name {
                n.name = name.clone();
            }
            n
        }
    };

    let client = Arc::new(
        VenueClient::new(config.client_id.clone(), config.client_secret.clone())
            .with_base_url(config.base_url.clone())
            .with_version(config.api_version.clone()),
    );

    let cache = config.cache_dir.as_ref().map(|dir| FileCategoryCache::new(dir.clone()));
    let tree = Arc::new(
        load_categories(client.as_ref(), cache.as_ref().map(|c| c as &dyn CategoryCache))
            .await
            .context("Failed to load categories")?,
    );
    info!(roots = tree.roots().len(), "Category tree ready");

    let mut session = NeighborhoodSession::new(Arc::clone(&tree), neighborhood);
    session.subscribe(Arc::new(TracingObserver));

    let mut dispatcher = Dispatcher::new(client, Arc::clone(&tree));
    dispatcher.start(&mut session);
    dispatcher.run_until_idle(&mut session).await;

    if let LoadState::Failed { message } = session.load_state() {
        bail!("{message}");
    }

    dispatcher.dispatch(&mut session, SessionEvent::QueryChanged(cli.query.clone()));
    for category_id in &cli.hide {
        dispatcher.dispatch(&mut session, SessionEvent::CategoryToggled(category_id.clone()));
    }

    println!("{}", session.neighborhood().name);
    if session.load_state() == &LoadState::NoPlaces {
        println!("  (no places found)");
        return Ok(());
    }

    for root in tree.roots() {
        let hidden = !session.filter_state().is_visible(&root.id);
        let places = session.visible_places(&root.id);
        println!(
            "\n{}{} [{}]",
            root.display_name(),
            if hidden { " (hidden)" } else { "" },
            places.len()
        );
        for place in places {
            println!("  {:<22}  {}", truncate_label(&place.name), place.formatted_categories());
            for line in &place.address_lines {
                println!("      {line}");
            }
            for frame in place.hours.timeframes() {
                println!("      {}: {}", frame.days_label(), frame.hours_label());
            }
        }
    }

    Ok(())
}

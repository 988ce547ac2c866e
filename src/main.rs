//! linkfolio: console demo of the folder hierarchy engine.
//!
//! Loads settings, opens the configured SQLite library (or a throwaway
//! in-memory one with `--memory`), seeds a few folders and links when the
//! library is empty, and prints the views a UI would render.

use std::error::Error;
use std::sync::Arc;

use linkfolio::app::{open_sqlite_session, Session};
use linkfolio::logging;
use linkfolio::persistence::{InMemoryRecordStore, RecordStore};
use linkfolio::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use linkfolio::types::link::parse_tags;
use linkfolio::types::view::SortMode;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut settings_engine = SettingsEngine::new(None);
    let settings = settings_engine.load()?;
    logging::init(&settings.logging.filter);

    if std::env::args().any(|arg| arg == "--memory") {
        let session = Session::open(Arc::new(InMemoryRecordStore::new()), &settings.view).await?;
        run_demo(session).await
    } else {
        let session = open_sqlite_session(&settings).await?;
        run_demo(session).await
    }
}

async fn run_demo<S: RecordStore>(mut session: Session<S>) -> Result<(), Box<dyn Error>> {
    if session.store().folder_count() == 0 && session.store().link_count() == 0 {
        seed(&mut session).await?;
    }

    section("Your Links");
    print_listing(&session, None);

    for option in session.folder_options(None) {
        section(&format!(
            "{} ({} items)",
            session
                .breadcrumb(Some(option.id.as_str()))
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
            session.item_count(&option.id)
        ));
        print_listing(&session, Some(option.id.as_str()));
    }

    section("Folder picker");
    for option in session.folder_options(None) {
        println!("  {}", option.indented_label());
    }

    section("Tags");
    let tags: Vec<String> = session.all_tags().into_iter().collect();
    println!("  {}", tags.join(", "));

    session.set_sort_mode(SortMode::Alpha);
    section("Your Links (alphabetical)");
    print_listing(&session, None);
    Ok(())
}

async fn seed<S: RecordStore>(session: &mut Session<S>) -> Result<(), Box<dyn Error>> {
    let work = session
        .create_folder("Work", Some("Day job"), None)
        .await?;
    let rust = session
        .create_folder("Rust", Some("Language references"), Some(work.id.as_str()))
        .await?;
    session.create_folder("Reading", None, None).await?;

    session
        .create_link(
            "https://doc.rust-lang.org/book/",
            "The Rust Book",
            parse_tags("rust, docs"),
            None,
            Some(rust.id.as_str()),
        )
        .await?;
    session
        .create_link(
            "https://github.com",
            "GitHub",
            parse_tags("work, code"),
            Some("Repositories"),
            Some(work.id.as_str()),
        )
        .await?;
    session
        .create_link(
            "https://news.ycombinator.com",
            "hacker news",
            parse_tags("news"),
            None,
            None,
        )
        .await?;
    Ok(())
}

fn section(name: &str) {
    println!();
    println!("── {} ──", name);
}

fn print_listing<S: RecordStore>(session: &Session<S>, folder_id: Option<&str>) {
    let listing = session.listing(folder_id);
    if listing.is_empty() {
        println!("  (empty)");
        return;
    }
    for folder in &listing.folders {
        println!("  [+] {} ({} items)", folder.name, session.item_count(&folder.id));
    }
    for link in &listing.links {
        let tags: Vec<&str> = link.tags.iter().map(String::as_str).collect();
        println!("  {} <{}> [{}]", link.title, link.url, tags.join(", "));
    }
}

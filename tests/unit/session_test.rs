//! Unit tests for Session wiring: open, delegate, and view state.

use std::sync::Arc;

use linkfolio::app::{database_path, open_sqlite_session, Session, DEFAULT_DATABASE_FILE};
use linkfolio::persistence::InMemoryRecordStore;
use linkfolio::types::folder::FolderPatch;
use linkfolio::types::link::parse_tags;
use linkfolio::types::settings::{AppSettings, ViewSettings};
use linkfolio::types::view::{SortMode, TagFilter};

async fn setup() -> Session<InMemoryRecordStore> {
    Session::open(Arc::new(InMemoryRecordStore::new()), &ViewSettings::default())
        .await
        .expect("session should open")
}

#[tokio::test]
async fn test_open_uses_view_defaults() {
    let view = ViewSettings {
        default_sort: SortMode::Items,
        default_tag_filter: "Work".to_string(),
    };
    let session = Session::open(Arc::new(InMemoryRecordStore::new()), &view)
        .await
        .unwrap();
    assert_eq!(session.sort_mode(), SortMode::Items);
    assert_eq!(session.tag_filter(), &TagFilter::Tag("work".to_string()));

    let default_session = setup().await;
    assert_eq!(default_session.sort_mode(), SortMode::Date);
    assert_eq!(default_session.tag_filter(), &TagFilter::All);
}

#[tokio::test]
async fn test_session_mutations_update_views() {
    let mut session = setup().await;
    let work = session.create_folder("Work", None, None).await.unwrap();
    let rust = session
        .create_folder("Rust", None, Some(work.id.as_str()))
        .await
        .unwrap();
    let book = session
        .create_link(
            "https://doc.rust-lang.org/book/",
            "The Rust Book",
            parse_tags("rust"),
            None,
            Some(rust.id.as_str()),
        )
        .await
        .unwrap();

    let crumbs: Vec<&str> = session
        .breadcrumb(Some(rust.id.as_str()))
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(crumbs, vec!["Work", "Rust"]);
    assert_eq!(session.item_count(&work.id), 1);
    assert_eq!(session.item_count(&rust.id), 1);
    assert_eq!(session.search("rust book").len(), 1);
    assert_eq!(session.all_tags().into_iter().collect::<Vec<_>>(), vec!["rust"]);

    session.move_link(&book.id, None).await.unwrap();
    assert_eq!(session.listing(None).links.len(), 1);

    session
        .update_folder(&rust.id, FolderPatch::move_to(None))
        .await
        .unwrap();
    assert_eq!(session.listing(None).folders.len(), 2);
    assert_eq!(session.folder_options(Some(work.id.as_str())).len(), 1);

    session.delete_link(&book.id).await.unwrap();
    assert!(session.store().link(&book.id).is_none());
}

#[tokio::test]
async fn test_tag_filter_and_sort_drive_listing() {
    let mut session = setup().await;
    session
        .create_link("https://b", "beta", parse_tags("x"), None, None)
        .await
        .unwrap();
    session
        .create_link("https://a", "Alpha", parse_tags("y"), None, None)
        .await
        .unwrap();

    session.set_sort_mode(SortMode::Alpha);
    let titles: Vec<String> = session
        .listing(None)
        .links
        .into_iter()
        .map(|l| l.title)
        .collect();
    assert_eq!(titles, vec!["Alpha", "beta"]);

    session.set_tag_filter(TagFilter::from("x"));
    let filtered = session.listing(None);
    assert_eq!(filtered.links.len(), 1);
    assert_eq!(filtered.links[0].title, "beta");
}

#[tokio::test]
async fn test_reload_reflects_store_written_by_another_session() {
    let records = Arc::new(InMemoryRecordStore::new());
    let mut writer = Session::open(Arc::clone(&records), &ViewSettings::default())
        .await
        .unwrap();
    let mut reader = Session::open(Arc::clone(&records), &ViewSettings::default())
        .await
        .unwrap();

    let folder = writer.create_folder("Shared", None, None).await.unwrap();
    assert!(reader.store().folder(&folder.id).is_none());

    reader.reload().await.unwrap();
    assert_eq!(reader.store().folder(&folder.id), Some(&folder));

    let progress = writer.delete_folder(&folder.id).await.unwrap();
    assert!(progress.is_complete());
}

#[test]
fn test_database_path_prefers_settings() {
    let mut settings = AppSettings::default();
    assert!(database_path(&settings).ends_with(DEFAULT_DATABASE_FILE));

    settings.storage.database_path = Some("/srv/links/custom.db".to_string());
    assert_eq!(
        database_path(&settings),
        std::path::PathBuf::from("/srv/links/custom.db")
    );
}

#[tokio::test]
async fn test_open_sqlite_session_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("links.db");
    let mut settings = AppSettings::default();
    settings.storage.database_path = Some(path.to_string_lossy().to_string());

    let mut session = open_sqlite_session(&settings).await.unwrap();
    session.create_folder("Persisted", None, None).await.unwrap();
    drop(session);

    let session = open_sqlite_session(&settings).await.unwrap();
    assert!(path.exists());
    assert_eq!(session.store().folder_count(), 1);
}

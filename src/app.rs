//! Session wiring for linkfolio.
//!
//! A [`Session`] owns one [`EntityStore`] and the [`MutationEngine`] that
//! writes to it. Sessions share nothing, so several can run side by side
//! (one per test, one per open library).

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::database::Database;
use crate::managers::entity_store::EntityStore;
use crate::managers::mutation_engine::{MutationEngine, MutationEngineTrait};
use crate::managers::{tree_navigator, view_composer};
use crate::persistence::{RecordStore, SqliteRecordStore};
use crate::platform;
use crate::types::errors::{CascadeProgress, PersistenceError, Result};
use crate::types::folder::{Folder, FolderPatch};
use crate::types::link::{Link, LinkPatch};
use crate::types::settings::{AppSettings, ViewSettings};
use crate::types::view::{FolderOption, Listing, SortMode, TagFilter};

/// Database file used when settings do not name one.
pub const DEFAULT_DATABASE_FILE: &str = "linkfolio.db";

/// One user's working set of folders and links.
pub struct Session<S: RecordStore> {
    store: EntityStore,
    engine: MutationEngine<S>,
    sort: SortMode,
    tag_filter: TagFilter,
}

impl<S: RecordStore> Session<S> {
    /// Builds a session over `records` and loads everything it holds.
    pub async fn open(records: Arc<S>, view: &ViewSettings) -> Result<Self> {
        let mut session = Self {
            store: EntityStore::new(),
            engine: MutationEngine::new(records),
            sort: view.default_sort,
            tag_filter: TagFilter::parse(&view.default_tag_filter),
        };
        session.reload().await?;
        info!(
            folders = session.store.folder_count(),
            links = session.store.link_count(),
            "session: opened"
        );
        Ok(session)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn engine(&self) -> &MutationEngine<S> {
        &self.engine
    }

    pub async fn reload(&mut self) -> Result<()> {
        self.engine.reload(&mut self.store).await
    }

    // --- mutations ---

    pub async fn create_folder(
        &mut self,
        name: &str,
        description: Option<&str>,
        parent_folder_id: Option<&str>,
    ) -> Result<Folder> {
        self.engine
            .create_folder(&mut self.store, name, description, parent_folder_id)
            .await
    }

    pub async fn update_folder(&mut self, id: &str, patch: FolderPatch) -> Result<Folder> {
        self.engine.update_folder(&mut self.store, id, patch).await
    }

    pub async fn delete_folder(&mut self, id: &str) -> Result<CascadeProgress> {
        self.engine.delete_folder(&mut self.store, id).await
    }

    pub async fn create_link(
        &mut self,
        url: &str,
        title: &str,
        tags: BTreeSet<String>,
        description: Option<&str>,
        folder_id: Option<&str>,
    ) -> Result<Link> {
        self.engine
            .create_link(&mut self.store, url, title, tags, description, folder_id)
            .await
    }

    pub async fn update_link(&mut self, id: &str, patch: LinkPatch) -> Result<Link> {
        self.engine.update_link(&mut self.store, id, patch).await
    }

    pub async fn move_link(
        &mut self,
        link_id: &str,
        target_folder_id: Option<&str>,
    ) -> Result<Link> {
        self.engine
            .move_link(&mut self.store, link_id, target_folder_id)
            .await
    }

    pub async fn delete_link(&mut self, id: &str) -> Result<()> {
        self.engine.delete_link(&mut self.store, id).await
    }

    // --- views ---

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn set_sort_mode(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn tag_filter(&self) -> &TagFilter {
        &self.tag_filter
    }

    pub fn set_tag_filter(&mut self, filter: TagFilter) {
        self.tag_filter = filter;
    }

    /// Contents of `folder_id` under the session's current sort and filter.
    pub fn listing(&self, folder_id: Option<&str>) -> Listing {
        view_composer::listing(&self.store, folder_id, &self.tag_filter, self.sort)
    }

    pub fn breadcrumb(&self, folder_id: Option<&str>) -> Vec<&Folder> {
        tree_navigator::breadcrumb(&self.store, folder_id)
    }

    pub fn item_count(&self, folder_id: &str) -> usize {
        view_composer::item_count(&self.store, Some(folder_id))
    }

    pub fn all_tags(&self) -> BTreeSet<String> {
        view_composer::all_tags(&self.store)
    }

    pub fn folder_options(&self, exclude: Option<&str>) -> Vec<FolderOption> {
        view_composer::folder_options(&self.store, exclude)
    }

    pub fn search(&self, query: &str) -> Vec<Link> {
        view_composer::search_links(&self.store, query)
    }
}

/// Resolves the database file from settings, defaulting to the data dir.
pub fn database_path(settings: &AppSettings) -> PathBuf {
    match &settings.storage.database_path {
        Some(path) => PathBuf::from(path),
        None => platform::get_data_dir().join(DEFAULT_DATABASE_FILE),
    }
}

/// Opens the SQLite database named by `settings` and loads a session from it.
pub async fn open_sqlite_session(settings: &AppSettings) -> Result<Session<SqliteRecordStore>> {
    let path = database_path(settings);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PersistenceError::Unavailable(format!(
                "cannot create {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let db = Database::open(&path).map_err(PersistenceError::from)?;
    info!(path = %path.display(), "session: database opened");
    Session::open(Arc::new(SqliteRecordStore::new(db)), &settings.view).await
}

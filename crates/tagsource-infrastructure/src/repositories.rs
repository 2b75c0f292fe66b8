// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Result;
use tagsource_domain::{ItemQuery, LibraryItem};

/// Persistence of library items and their flexible attributes.
#[async_trait::async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Inserts a new item and returns it with its assigned id.
    async fn add(&self, item: LibraryItem) -> Result<LibraryItem>;
    async fn get_by_id(&self, id: i64) -> Result<Option<LibraryItem>>;
    async fn get_by_path(&self, path: &str) -> Result<Option<LibraryItem>>;
    async fn list(&self) -> Result<Vec<LibraryItem>>;
    /// Writes the item's core fields and replaces its flexible attributes.
    async fn store(&self, item: &LibraryItem) -> Result<()>;

    /// Items selected by `query`; an empty query selects everything.
    async fn find(&self, query: &ItemQuery) -> Result<Vec<LibraryItem>> {
        let items = self.list().await?;
        Ok(items.into_iter().filter(|item| query.matches(item)).collect())
    }
}

/// Writes an item's metadata into its audio file.
pub trait TagWriter: Send + Sync {
    fn write_tags(&self, item: &LibraryItem) -> Result<()>;
}

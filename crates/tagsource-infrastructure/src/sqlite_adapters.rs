// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::Row;
use sqlx::SqlitePool;
use tagsource_domain::{FieldValue, Fields, LibraryItem};
use tracing::{debug, warn};

use crate::repositories::LibraryRepository;

/// SQLx-backed library repository.
pub struct SqliteLibraryRepository {
    pool: SqlitePool,
}

impl SqliteLibraryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_fields(&self, item_id: i64) -> Result<Fields> {
        let rows = sqlx::query("SELECT key, value FROM item_attributes WHERE item_id = ? ORDER BY key")
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;

        let mut fields = Fields::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let raw: String = row.try_get("value")?;
            match serde_json::from_str::<FieldValue>(&raw) {
                Ok(value) => {
                    fields.insert(key, value);
                }
                Err(error) => {
                    warn!(target: "repository", item_id, %key, %error, "skipping unreadable attribute");
                }
            }
        }
        Ok(fields)
    }

    async fn hydrate(&self, row: &SqliteRow) -> Result<LibraryItem> {
        let mut item = row_to_item(row)?;
        item.fields = self.load_fields(item.id).await?;
        Ok(item)
    }
}

#[async_trait::async_trait]
impl LibraryRepository for SqliteLibraryRepository {
    async fn add(&self, mut item: LibraryItem) -> Result<LibraryItem> {
        let path = path_text(&item)?;
        debug!(target: "repository", %path, "adding item");
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO items (path, title, artist, album, added_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&path)
        .bind(&item.title)
        .bind(&item.artist)
        .bind(&item.album)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        item.id = result.last_insert_rowid();
        insert_attributes(&mut tx, item.id, &item.fields).await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<LibraryItem>> {
        debug!(target: "repository", id, "fetching item by id");
        let row = sqlx::query("SELECT * FROM items WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => Ok(Some(self.hydrate(&r).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_path(&self, path: &str) -> Result<Option<LibraryItem>> {
        debug!(target: "repository", path, "fetching item by path");
        let row = sqlx::query("SELECT * FROM items WHERE path = ? LIMIT 1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => Ok(Some(self.hydrate(&r).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<LibraryItem>> {
        debug!(target: "repository", "listing items");
        let rows = sqlx::query("SELECT * FROM items ORDER BY artist, album, title, id")
            .fetch_all(&self.pool)
            .await?;
        let mut out = Vec::with_capacity(rows.len());
        for r in rows {
            out.push(self.hydrate(&r).await?);
        }
        Ok(out)
    }

    async fn store(&self, item: &LibraryItem) -> Result<()> {
        debug!(target: "repository", item_id = item.id, fields = item.fields.len(), "storing item");
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE items SET path = ?, title = ?, artist = ?, album = ? WHERE id = ?")
            .bind(path_text(item)?)
            .bind(&item.title)
            .bind(&item.artist)
            .bind(&item.album)
            .bind(item.id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(anyhow!("library item {} does not exist", item.id));
        }

        sqlx::query("DELETE FROM item_attributes WHERE item_id = ?")
            .bind(item.id)
            .execute(&mut *tx)
            .await?;

        insert_attributes(&mut tx, item.id, &item.fields).await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn insert_attributes(conn: &mut SqliteConnection, item_id: i64, fields: &Fields) -> Result<()> {
    for (key, value) in fields {
        sqlx::query("INSERT INTO item_attributes (item_id, key, value) VALUES (?, ?, ?)")
            .bind(item_id)
            .bind(key)
            .bind(serde_json::to_string(value)?)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn path_text(item: &LibraryItem) -> Result<String> {
    item.path
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("path is not valid UTF-8: {}", item.path.display()))
}

fn row_to_item(row: &SqliteRow) -> Result<LibraryItem> {
    let path: String = row.try_get("path")?;
    let mut item = LibraryItem::new(
        path,
        row.try_get::<String, _>("title")?,
        row.try_get::<String, _>("artist")?,
        row.try_get::<String, _>("album")?,
    );
    item.id = row.try_get("id")?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::sqlite::SqlitePoolOptions;
    use tagsource_domain::ItemQuery;

    async fn setup_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("connect in-memory sqlite");

        sqlx::migrate!("../../migrations").run(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    async fn item_add_and_get_round_trip_with_fields() {
        let repo = SqliteLibraryRepository::new(setup_pool().await);

        let mut item = LibraryItem::new("/music/aashiqui/01.mp3", "Tum Hi Ho", "Arijit Singh", "Aashiqui 2");
        item.set("yt_track_id", "Umqb9KENgmk");
        item.set("yt_views", 1_204_331_i64);
        let updated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        item.set("yt_updated", updated_at);

        let created = repo.add(item).await.expect("add item");
        assert!(created.id > 0);

        let fetched = repo
            .get_by_id(created.id)
            .await
            .expect("fetch item")
            .expect("item exists");
        assert_eq!(fetched, created);
        assert_eq!(fetched.get("yt_views"), Some(&FieldValue::Integer(1_204_331)));
        assert_eq!(fetched.get("yt_updated"), Some(&FieldValue::Timestamp(updated_at)));

        let by_path = repo
            .get_by_path("/music/aashiqui/01.mp3")
            .await
            .expect("fetch by path");
        assert_eq!(by_path.map(|i| i.id), Some(created.id));
    }

    #[tokio::test]
    async fn store_replaces_attributes() {
        let repo = SqliteLibraryRepository::new(setup_pool().await);

        let mut item = LibraryItem::new("/music/a.flac", "A", "Artist", "Album");
        item.set("yt_track_id", "Umqb9KENgmk");
        item.set("jiosaavn_starring", "Someone");
        let mut item = repo.add(item).await.expect("add item");

        item.fields.remove("jiosaavn_starring");
        item.set("yt_views", 10_i64);
        repo.store(&item).await.expect("store item");

        let fetched = repo.get_by_id(item.id).await.expect("fetch").expect("exists");
        assert!(fetched.get("jiosaavn_starring").is_none());
        assert_eq!(fetched.get("yt_views"), Some(&FieldValue::Integer(10)));
    }

    #[tokio::test]
    async fn store_unknown_item_fails() {
        let repo = SqliteLibraryRepository::new(setup_pool().await);
        let mut item = LibraryItem::new("/music/ghost.mp3", "Ghost", "Nobody", "Nothing");
        item.id = 42;
        assert!(repo.store(&item).await.is_err());
    }

    #[tokio::test]
    async fn find_filters_by_query() {
        let repo = SqliteLibraryRepository::new(setup_pool().await);

        let mut first = LibraryItem::new("/music/1.mp3", "Tum Hi Ho", "Arijit Singh", "Aashiqui 2");
        first.set("yt_track_id", "Umqb9KENgmk");
        repo.add(first).await.expect("add");
        repo.add(LibraryItem::new("/music/2.mp3", "Kesariya", "Pritam", "Brahmastra"))
            .await
            .expect("add");

        let all = repo.find(&ItemQuery::default()).await.expect("find all");
        assert_eq!(all.len(), 2);

        let arijit = repo
            .find(&ItemQuery::parse(&["arijit"]))
            .await
            .expect("find by artist");
        assert_eq!(arijit.len(), 1);
        assert_eq!(arijit[0].title, "Tum Hi Ho");

        let by_field = repo
            .find(&ItemQuery::parse(&["yt_track_id:umqb"]))
            .await
            .expect("find by field");
        assert_eq!(by_field.len(), 1);
    }

    #[tokio::test]
    async fn failed_attribute_write_leaves_no_item() {
        let pool = setup_pool().await;
        sqlx::query(
            "CREATE TRIGGER reject_attribute BEFORE INSERT ON item_attributes \
             WHEN NEW.key = 'rejected' BEGIN SELECT RAISE(ABORT, 'attribute rejected'); END",
        )
        .execute(&pool)
        .await
        .expect("create trigger");
        let repo = SqliteLibraryRepository::new(pool);

        let mut item = LibraryItem::new("/music/1.mp3", "A", "B", "C");
        item.set("yt_track_id", "Umqb9KENgmk");
        item.set("rejected", "x");
        assert!(repo.add(item).await.is_err());

        assert!(repo.list().await.expect("list").is_empty());
        assert!(repo.get_by_path("/music/1.mp3").await.expect("fetch").is_none());
    }

    #[tokio::test]
    async fn duplicate_path_is_rejected() {
        let repo = SqliteLibraryRepository::new(setup_pool().await);
        repo.add(LibraryItem::new("/music/1.mp3", "A", "B", "C")).await.expect("add");
        assert!(repo.add(LibraryItem::new("/music/1.mp3", "A", "B", "C")).await.is_err());
    }
}

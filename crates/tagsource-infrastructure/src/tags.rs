// SPDX-License-Identifier: GPL-3.0-or-later

//! File tag writing with `lofty`.

use anyhow::{Context, Result};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::id3::v2::Id3v2Tag;
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag, TagExt, TagType};
use std::path::Path;
use tagsource_domain::LibraryItem;
use tracing::debug;

use crate::repositories::TagWriter;

/// Writes core fields and flexible attributes into the file's primary tag.
///
/// Flexible attributes are keyed by their upper-cased name. ID3v2 stores them
/// as `TXXX` user text frames, other formats as custom items.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagWriter;

impl LoftyTagWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, item: &LibraryItem) -> Result<()> {
        let path = item.path.as_path();
        let tagged_file =
            read_from_path(path).with_context(|| format!("reading tags of {}", path.display()))?;

        let tag_type = tagged_file.primary_tag_type();
        let mut tag = tagged_file
            .tag(tag_type)
            .cloned()
            .unwrap_or_else(|| Tag::new(tag_type));

        tag.set_title(item.title.clone());
        tag.set_artist(item.artist.clone());
        tag.set_album(item.album.clone());

        if tag_type == TagType::Id3v2 {
            let mut id3v2 = Id3v2Tag::from(tag);
            for (name, value) in &item.fields {
                id3v2.insert_user_text(name.to_uppercase(), value.to_string());
            }
            save(&id3v2, path)?;
        } else {
            for (name, value) in &item.fields {
                tag.insert_text(ItemKey::Unknown(name.to_uppercase()), value.to_string());
            }
            save(&tag, path)?;
        }

        debug!(target: "tags", path = %path.display(), ?tag_type, fields = item.fields.len(), "wrote tags");
        Ok(())
    }
}

fn save<T>(tag: &T, path: &Path) -> Result<()>
where
    T: TagExt,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    tag.save_to_path(path, WriteOptions::default())
        .with_context(|| format!("writing tags to {}", path.display()))
}

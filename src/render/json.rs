use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::RenderError;
use crate::discourse::PostId;
use crate::fs_utils::write_atomic;
use crate::normalize::NormalizedPost;

/// One element of the exported JSON array.
#[derive(Debug, Serialize)]
struct PostRecord<'a> {
    id: PostId,
    content: &'a str,
}

/// Write `posts` as a pretty-printed UTF-8 JSON array of `{id, content}`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_json(posts: &[NormalizedPost], destination: &Path) -> Result<(), RenderError> {
    let records: Vec<PostRecord<'_>> = posts
        .iter()
        .map(|p| PostRecord {
            id: p.id,
            content: &p.text,
        })
        .collect();

    write_atomic(destination, |writer| {
        serde_json::to_writer_pretty(&mut *writer, &records)?;
        writer.write_all(b"\n")?;
        Ok(())
    })
}

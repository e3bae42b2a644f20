//! Joining posts with the included media table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::api::decode::Document;
use crate::api::types::{MediaEntity, PostRecord};
use crate::error::{Error, Result};
use crate::media::item::{Media, Post};

/// Build a media item from an included media entity.
///
/// Falls back to the original image URL when no download URL is set.
pub fn parse_media_entity(entity: &MediaEntity) -> Media {
    let attributes = &entity.attributes;
    let download_url = if attributes.download_url.is_empty() {
        attributes.image_urls.original.clone()
    } else {
        attributes.download_url.clone()
    };

    Media {
        id: entity.id.clone(),
        download_url,
        mime_type: attributes.mimetype.clone(),
        width: attributes.metadata.dimensions.w,
        height: attributes.metadata.dimensions.h,
    }
}

/// Index a page's included media by id.
pub fn media_lookup(document: &Document) -> HashMap<&str, Media> {
    document
        .media()
        .map(|entity| (entity.id.as_str(), parse_media_entity(entity)))
        .collect()
}

/// Resolve every primary post of a page into a [`Post`].
///
/// Primary records that are not posts are ignored.
pub fn resolve_posts(document: &Document) -> Result<Vec<Post>> {
    let lookup = media_lookup(document);

    document
        .data
        .iter()
        .filter(|record| record.kind == "post")
        .map(|record| resolve_post(record, &lookup))
        .collect()
}

/// Join one post's declared media order against the lookup table.
///
/// Ids missing from the table are dropped with a warning.
pub fn resolve_post(record: &PostRecord, lookup: &HashMap<&str, Media>) -> Result<Post> {
    let attributes = &record.attributes;

    let mut media = Vec::with_capacity(attributes.post_metadata.image_order.len());
    for media_id in &attributes.post_metadata.image_order {
        match lookup.get(media_id.as_str()) {
            Some(item) => media.push(item.clone()),
            None => tracing::warn!(
                "Post {} lists media {} which is missing from the included table, dropping it",
                record.id,
                media_id
            ),
        }
    }

    Ok(Post {
        id: record.id.clone(),
        title: attributes.title.clone().unwrap_or_default(),
        published_at: parse_published_at(record)?,
        visible: attributes.current_user_can_view,
        media,
    })
}

fn parse_published_at(record: &PostRecord) -> Result<DateTime<Utc>> {
    let raw = record.attributes.published_at.as_deref().ok_or_else(|| {
        Error::Decode(format!("post {} has no publish timestamp", record.id))
    })?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            Error::Decode(format!(
                "post {} has an invalid publish timestamp '{}': {}",
                record.id, raw, e
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::decode::decode;
    use chrono::TimeZone;

    fn page(order: &str) -> Document {
        decode(&format!(
            r#"{{
                "data": [{{
                    "type": "post",
                    "id": "p1",
                    "attributes": {{
                        "title": "First",
                        "published_at": "2025-01-02T03:04:05+01:00",
                        "current_user_can_view": true,
                        "post_metadata": {{ "image_order": {order} }}
                    }}
                }}],
                "included": [
                    {{ "type": "media", "id": "m1", "attributes": {{
                        "mimetype": "image/png",
                        "download_url": "https://cdn.example.com/m1.png",
                        "metadata": {{ "dimensions": {{ "w": 10, "h": 20 }} }}
                    }} }},
                    {{ "type": "media", "id": "m2", "attributes": {{
                        "mimetype": "image/jpeg",
                        "download_url": "",
                        "image_urls": {{ "original": "https://cdn.example.com/m2-original.jpg" }}
                    }} }},
                    {{ "type": "user", "id": "u1" }}
                ]
            }}"#,
            order = order
        ))
        .unwrap()
    }

    #[test]
    fn test_resolve_preserves_declared_order() {
        let posts = resolve_posts(&page(r#"["m2", "m1"]"#)).unwrap();
        assert_eq!(posts.len(), 1);
        let ids: Vec<&str> = posts[0].media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);
    }

    #[test]
    fn test_resolve_drops_missing_media() {
        let posts = resolve_posts(&page(r#"["m1", "gone", "m2"]"#)).unwrap();
        let ids: Vec<&str> = posts[0].media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn test_resolve_post_fields() {
        let post = resolve_posts(&page(r#"["m1"]"#)).unwrap().remove(0);
        assert_eq!(post.id, "p1");
        assert_eq!(post.title, "First");
        assert!(post.visible);
        assert_eq!(
            post.published_at,
            Utc.with_ymd_and_hms(2025, 1, 2, 2, 4, 5).unwrap()
        );
        assert_eq!(post.media[0].width, 10);
        assert_eq!(post.media[0].height, 20);
    }

    #[test]
    fn test_download_url_falls_back_to_original() {
        let lookup_page = page("[]");
        let lookup = media_lookup(&lookup_page);
        assert_eq!(lookup["m1"].download_url, "https://cdn.example.com/m1.png");
        assert_eq!(
            lookup["m2"].download_url,
            "https://cdn.example.com/m2-original.jpg"
        );
    }

    #[test]
    fn test_invalid_timestamp_is_decode_error() {
        let document = decode(
            r#"{"data": {"type": "post", "id": "p", "attributes": {"published_at": "yesterday"}}}"#,
        )
        .unwrap();
        assert!(resolve_posts(&document).unwrap_err().is_decode());
    }

    #[test]
    fn test_non_post_records_ignored() {
        let document = decode(r#"{"data": [{"type": "campaign", "id": "c"}]}"#).unwrap();
        assert!(resolve_posts(&document).unwrap().is_empty());
    }
}

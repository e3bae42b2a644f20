//! Decoding of raw posts-page documents.
//!
//! Every entry of `included` is routed by its `type` discriminator to exactly
//! one record decoder. Unknown discriminators are errors, never skipped.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::api::types::*;
use crate::error::{Error, Result};

/// Closed set of entity kinds the feed may include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Media,
    Post,
    User,
    Member,
    Reward,
    Campaign,
}

impl EntityKind {
    /// Map a `type` discriminator onto its kind.
    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "media" => Some(EntityKind::Media),
            "post" => Some(EntityKind::Post),
            "user" => Some(EntityKind::User),
            "member" => Some(EntityKind::Member),
            "reward" => Some(EntityKind::Reward),
            "campaign" => Some(EntityKind::Campaign),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Media => "media",
            EntityKind::Post => "post",
            EntityKind::User => "user",
            EntityKind::Member => "member",
            EntityKind::Reward => "reward",
            EntityKind::Campaign => "campaign",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded entry of the `included` table.
#[derive(Debug, Clone, PartialEq)]
pub enum IncludedEntity {
    Media(MediaEntity),
    Post(PostRecord),
    User(UserEntity),
    Member(MemberEntity),
    Reward(RewardEntity),
    Campaign(CampaignEntity),
}

impl IncludedEntity {
    pub fn id(&self) -> &str {
        match self {
            IncludedEntity::Media(e) => &e.id,
            IncludedEntity::Post(e) => &e.id,
            IncludedEntity::User(e) => &e.id,
            IncludedEntity::Member(e) => &e.id,
            IncludedEntity::Reward(e) => &e.id,
            IncludedEntity::Campaign(e) => &e.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            IncludedEntity::Media(_) => EntityKind::Media,
            IncludedEntity::Post(_) => EntityKind::Post,
            IncludedEntity::User(_) => EntityKind::User,
            IncludedEntity::Member(_) => EntityKind::Member,
            IncludedEntity::Reward(_) => EntityKind::Reward,
            IncludedEntity::Campaign(_) => EntityKind::Campaign,
        }
    }
}

/// A fully decoded posts page.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Primary records. A single-object `data` becomes a one-element list.
    pub data: Vec<PostRecord>,
    pub included: Vec<IncludedEntity>,
    /// Cursor for the following page; `None` on the last page.
    pub next_cursor: Option<String>,
    pub next_link: Option<String>,
    pub total: Option<u64>,
}

impl Document {
    /// Iterate over the included media entities.
    pub fn media(&self) -> impl Iterator<Item = &MediaEntity> {
        self.included.iter().filter_map(|entity| match entity {
            IncludedEntity::Media(media) => Some(media),
            _ => None,
        })
    }
}

/// Raw envelope; `data` and `included` are routed by hand.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    included: Option<Vec<Value>>,
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    links: Option<Links>,
    #[serde(default)]
    errors: Option<Vec<ResponseError>>,
}

/// Decode one raw page document.
pub fn decode(raw: &str) -> Result<Document> {
    let raw: RawDocument = serde_json::from_str(raw)
        .map_err(|e| Error::Decode(format!("malformed document: {}", e)))?;

    if let Some(errors) = raw.errors.as_ref().filter(|errors| !errors.is_empty()) {
        let details: Vec<String> = errors.iter().map(ResponseError::describe).collect();
        return Err(Error::Api(details.join("; ")));
    }

    let data = decode_primary(raw.data)?;

    let included = raw
        .included
        .unwrap_or_default()
        .into_iter()
        .map(decode_entity)
        .collect::<Result<Vec<_>>>()?;

    let meta = raw.meta.unwrap_or_default();
    let next_cursor = meta
        .pagination
        .cursors
        .next
        .filter(|cursor| !cursor.is_empty());
    let next_link = raw
        .links
        .and_then(|links| links.next)
        .filter(|link| !link.is_empty());

    Ok(Document {
        data,
        included,
        next_cursor,
        next_link,
        total: meta.pagination.total,
    })
}

/// Decode primary `data`, accepting a single record or an array of them.
fn decode_primary(data: Value) -> Result<Vec<PostRecord>> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(records) => records.into_iter().map(decode_record).collect(),
        record @ Value::Object(_) => Ok(vec![decode_record(record)?]),
        other => Err(Error::Decode(format!(
            "primary data must be an object or an array, got {}",
            other
        ))),
    }
}

fn decode_record(value: Value) -> Result<PostRecord> {
    serde_json::from_value(value)
        .map_err(|e| Error::Decode(format!("failed to decode primary record: {}", e)))
}

/// Decode one `included` entry by its discriminator.
pub fn decode_entity(value: Value) -> Result<IncludedEntity> {
    let discriminator = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Decode("included entity has no type".to_string()))?;

    let kind = EntityKind::from_discriminator(discriminator)
        .ok_or_else(|| Error::UnknownEntity(discriminator.to_string()))?;

    let entity = match kind {
        EntityKind::Media => IncludedEntity::Media(decode_as(kind, value)?),
        EntityKind::Post => IncludedEntity::Post(decode_as(kind, value)?),
        EntityKind::User => IncludedEntity::User(decode_as(kind, value)?),
        EntityKind::Member => IncludedEntity::Member(decode_as(kind, value)?),
        EntityKind::Reward => IncludedEntity::Reward(decode_as(kind, value)?),
        EntityKind::Campaign => IncludedEntity::Campaign(decode_as(kind, value)?),
    };

    Ok(entity)
}

fn decode_as<T>(kind: EntityKind, value: Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value)
        .map_err(|e| Error::Decode(format!("failed to decode {} entity: {}", kind, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA: &str = r#"{
        "type": "media",
        "id": "some-id",
        "attributes": {
            "size_bytes": 123456,
            "mimetype": "image/png",
            "download_url": "https://example.com/download",
            "image_urls": {
                "url": "https://example.com/image.png",
                "original": "https://example.com/original.png",
                "thumbnail": "https://example.com/thumbnail.png"
            },
            "metadata": { "dimensions": { "w": 800, "h": 600 } }
        }
    }"#;

    const MEMBER: &str = r#"{
        "type": "member",
        "id": "member-id",
        "attributes": {
            "patron_status": "active_patron",
            "is_follower": true,
            "full_name": "Jane Roe",
            "pledge_amount_cents": 5000,
            "access_expires_at": "2025-12-31T23:59:59Z"
        },
        "relationships": {
            "campaign": { "data": { "type": "campaign", "id": "campaign-id" } }
        }
    }"#;

    const USER: &str = r#"{
        "type": "user",
        "id": "user-id",
        "attributes": { "full_name": "Jane Roe", "url": "https://example.com/jane" },
        "relationships": {
            "campaign": {
                "data": { "type": "campaign", "id": "campaign-id" },
                "links": { "related": "https://example.com/campaigns/campaign-id" }
            }
        }
    }"#;

    const REWARD: &str = r#"{
        "type": "reward",
        "id": "reward-id",
        "attributes": {
            "amount_cents": 1000,
            "title": "Supporter",
            "discord_role_ids": null,
            "unpublished_at": null,
            "published": true
        },
        "relationships": {
            "campaign": { "data": { "type": "campaign", "id": "campaign-id" } }
        }
    }"#;

    const CAMPAIGN: &str = r#"{
        "type": "campaign",
        "id": "campaign-id",
        "attributes": { "name": "Test Campaign", "vanity": "test-campaign" },
        "relationships": {
            "creator": { "data": { "type": "user", "id": "user-id" } },
            "rewards": { "data": [
                { "type": "reward", "id": "reward-id-1" },
                { "type": "reward", "id": "reward-id-2" }
            ] }
        }
    }"#;

    const POST: &str = r#"{
        "type": "post",
        "id": "post-id",
        "attributes": {
            "post_type": "image_file",
            "title": "Test Post",
            "published_at": "2025-01-01T00:00:00Z",
            "current_user_can_view": true,
            "post_metadata": { "image_order": ["media-id-1", "media-id-2"] }
        },
        "relationships": {
            "attachments": { "data": [] },
            "images": { "data": [
                { "type": "media", "id": "media-id-1" },
                { "type": "media", "id": "media-id-2" }
            ] }
        }
    }"#;

    fn entity(raw: &str) -> Result<IncludedEntity> {
        decode_entity(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_decode_media_entity() {
        let IncludedEntity::Media(media) = entity(MEDIA).unwrap() else {
            panic!("expected media");
        };
        assert_eq!(media.id, "some-id");
        assert_eq!(media.attributes.mimetype, "image/png");
        assert_eq!(media.attributes.size_bytes, 123456);
        assert_eq!(media.attributes.image_urls.original, "https://example.com/original.png");
        assert_eq!(media.attributes.metadata.dimensions, Dimensions { w: 800, h: 600 });
    }

    #[test]
    fn test_decode_every_kind() {
        let cases = [
            (MEDIA, EntityKind::Media, "some-id"),
            (MEMBER, EntityKind::Member, "member-id"),
            (USER, EntityKind::User, "user-id"),
            (POST, EntityKind::Post, "post-id"),
            (REWARD, EntityKind::Reward, "reward-id"),
            (CAMPAIGN, EntityKind::Campaign, "campaign-id"),
        ];

        for (raw, kind, id) in cases {
            let decoded = entity(raw).unwrap();
            assert_eq!(decoded.kind(), kind);
            assert_eq!(decoded.id(), id);
        }
    }

    #[test]
    fn test_decode_relationships() {
        let IncludedEntity::Campaign(campaign) = entity(CAMPAIGN).unwrap() else {
            panic!("expected campaign");
        };
        assert_eq!(campaign.relationships.rewards.data.len(), 2);
        assert_eq!(
            campaign.relationships.creator.data,
            Some(Reference {
                id: "user-id".into(),
                kind: "user".into()
            })
        );

        let IncludedEntity::User(user) = entity(USER).unwrap() else {
            panic!("expected user");
        };
        assert_eq!(
            user.relationships.campaign.links.and_then(|l| l.related).as_deref(),
            Some("https://example.com/campaigns/campaign-id")
        );
    }

    #[test]
    fn test_unknown_entity_type_is_an_error() {
        let err = entity(r#"{"type": "unknown", "id": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::UnknownEntity(ref t) if t == "unknown"));
        assert_eq!(err.to_string(), "unknown entity type: unknown");
    }

    #[test]
    fn test_missing_type_is_an_error() {
        assert!(matches!(
            entity(r#"{"id": "x"}"#),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn test_malformed_document() {
        assert!(decode(r#"{"data": ["#).unwrap_err().is_decode());
        assert!(decode(r#"{"data": 42}"#).unwrap_err().is_decode());
    }

    #[test]
    fn test_unknown_entity_fails_whole_document() {
        let raw = format!(
            r#"{{"data": [], "included": [{}, {{"type": "poll", "id": "p"}}]}}"#,
            MEDIA
        );
        assert!(matches!(decode(&raw), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_single_and_array_data_decode_alike() {
        let single = decode(&format!(r#"{{"data": {}}}"#, POST)).unwrap();
        let array = decode(&format!(r#"{{"data": [{}]}}"#, POST)).unwrap();
        assert_eq!(single.data, array.data);
        assert_eq!(single.data.len(), 1);
        assert_eq!(
            single.data[0].attributes.post_metadata.image_order,
            vec!["media-id-1", "media-id-2"]
        );
    }

    #[test]
    fn test_full_document() {
        let raw = format!(
            r#"{{
                "data": [{post}],
                "included": [{media}, {member}, {user}, {post}, {reward}, {campaign}],
                "meta": {{ "pagination": {{ "total": 42, "cursors": {{ "next": "abc" }} }} }},
                "links": {{ "next": "https://example.com/api/posts?page%5Bcursor%5D=abc" }}
            }}"#,
            post = POST,
            media = MEDIA,
            member = MEMBER,
            user = USER,
            reward = REWARD,
            campaign = CAMPAIGN,
        );

        let document = decode(&raw).unwrap();
        assert_eq!(document.data.len(), 1);
        assert_eq!(document.included.len(), 6);
        assert_eq!(document.media().count(), 1);
        assert_eq!(document.next_cursor.as_deref(), Some("abc"));
        assert!(document.next_link.is_some());
        assert_eq!(document.total, Some(42));
    }

    #[test]
    fn test_cursor_terminal_values() {
        for raw in [
            r#"{"data": []}"#,
            r#"{"data": [], "meta": {"pagination": {"cursors": {"next": null}}}}"#,
            r#"{"data": [], "meta": {"pagination": {"cursors": {"next": ""}}}}"#,
        ] {
            assert_eq!(decode(raw).unwrap().next_cursor, None, "{}", raw);
        }
    }

    #[test]
    fn test_error_document() {
        let raw = r#"{"errors": [{"code_name": "Unauthorized", "detail": "login required"}]}"#;
        assert!(matches!(decode(raw), Err(Error::Api(ref m)) if m == "login required"));
    }
}

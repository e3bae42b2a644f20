//! API response type definitions.
//!
//! The posts endpoint speaks JSON:API. Primary records live under `data`,
//! related entities of several kinds share the `included` array and are told
//! apart by their `type` field.

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `{ "type": ..., "id": ... }` pointer to another entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reference {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Links attached to a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelationshipLinks {
    #[serde(default)]
    pub related: Option<String>,
}

/// A relationship to a single entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToOne {
    #[serde(default)]
    pub data: Option<Reference>,
    #[serde(default)]
    pub links: Option<RelationshipLinks>,
}

/// A relationship to a list of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToMany {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Reference>,
    #[serde(default)]
    pub links: Option<RelationshipLinks>,
}

// ---------------------------------------------------------------------------
// post
// ---------------------------------------------------------------------------

/// A post record, either primary data or an included entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: PostAttributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: PostRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostAttributes {
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_user_can_view: bool,
    #[serde(default)]
    pub teaser_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_metadata: PostMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostMetadata {
    /// Media ids in the order the creator arranged them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_order: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PostRelationships {
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: AttachmentList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: ToMany,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: ToMany,
}

/// Attachments come in several loosely specified shapes; keep them raw.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AttachmentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// media
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: MediaAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub size_bytes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mimetype: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_urls: ImageUrls,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: MediaMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageUrls {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_blurred: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_small: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_large: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_blurred_small: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail_large: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail_small: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Dimensions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub w: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub h: u32,
}

// ---------------------------------------------------------------------------
// user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: UserAttributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: CampaignRelationship,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserAttributes {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Relationship block holding only a `campaign` pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignRelationship {
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaign: ToOne,
}

// ---------------------------------------------------------------------------
// member
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemberEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: MemberAttributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: CampaignRelationship,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemberAttributes {
    #[serde(default)]
    pub patron_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_follower: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free_member: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free_trial: bool,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pledge_amount_cents: i64,
    #[serde(default)]
    pub pledge_relationship_start: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lifetime_support_cents: i64,
    #[serde(default)]
    pub last_charge_date: Option<String>,
    #[serde(default)]
    pub last_charge_status: Option<String>,
    #[serde(default)]
    pub campaign_currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaign_pledge_amount_cents: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub campaign_lifetime_support_cents: i64,
    #[serde(default)]
    pub access_expires_at: Option<String>,
}

// ---------------------------------------------------------------------------
// reward
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RewardEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: RewardAttributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: CampaignRelationship,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RewardAttributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount_cents: i64,
    #[serde(default)]
    pub remaining: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_shipping: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub declined_patron_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub post_count: i64,
    #[serde(default)]
    pub discord_role_ids: Option<Vec<String>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub edited_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub unpublished_at: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patron_amount_cents: i64,
    #[serde(default)]
    pub patron_currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_free_tier: bool,
}

// ---------------------------------------------------------------------------
// campaign
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignEntity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: CampaignAttributes,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: CampaignRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub vanity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignRelationships {
    #[serde(default, deserialize_with = "null_as_default")]
    pub creator: ToOne,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rewards: ToMany,
}

// ---------------------------------------------------------------------------
// document envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cursors: Cursors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

/// An entry of a JSON:API `errors` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code_name: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ResponseError {
    /// Best human-readable description of the error.
    pub fn describe(&self) -> String {
        self.detail
            .as_deref()
            .or(self.title.as_deref())
            .or(self.code_name.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// Body of `/current_user`; only the error list matters.
#[derive(Debug, Default, Deserialize)]
pub struct UserErrorResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ResponseError>,
}

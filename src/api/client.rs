//! Patreon API HTTP client.

use std::time::Duration;

use regex::Regex;
use reqwest::{header, Client, Response};

use crate::api::decode::{decode, Document};
use crate::api::types::UserErrorResponse;
use crate::error::{Error, Result};

/// Patreon API base URL.
const API_BASE: &str = "https://www.patreon.com/api";

/// Patreon website base URL, used to look up campaign ids.
const WEB_BASE: &str = "https://www.patreon.com";

/// Campaign ids leak into the creator page through media URLs.
const CAMPAIGN_ID_PATTERN: &str = r"patreon-media/p/campaign/(\d+)/.";

/// Relationships requested alongside every post.
const POST_INCLUDES: &str = "attachments,images,media";

/// Post attributes requested from the API.
const POST_FIELDS: &str =
    "teaser_text,current_user_can_view,post_metadata,published_at,post_type,title,url,view_count";

/// Media attributes requested from the API.
const MEDIA_FIELDS: &str = "id,image_urls,download_url,metadata,mimetype,name,size_bytes";

/// Patreon API client authenticated with a session cookie.
#[derive(Clone)]
pub struct PatreonApi {
    client: Client,
    cookie: String,
    api_base: String,
    web_base: String,
}

impl PatreonApi {
    /// Create a new API client.
    pub fn new(cookie: String, user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cookie,
            api_base: API_BASE.to_string(),
            web_base: WEB_BASE.to_string(),
        })
    }

    /// Point the client at different hosts.
    pub fn with_base_urls(mut self, api_base: &str, web_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.web_base = web_base.trim_end_matches('/').to_string();
        self
    }

    /// Send an authenticated GET without inspecting the status.
    async fn send(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .header(header::COOKIE, &self.cookie)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request to {} failed: {}", url, e)))?;

        tracing::debug!("Response status: {}", response.status());
        Ok(response)
    }

    /// Make an authenticated GET request, failing on non-success statuses.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let response = self.send(url, query).await?;
        let status = response.status();

        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if body.is_empty() {
                    "Authentication failed"
                } else {
                    body.as_str()
                }
            )));
        }

        if !status.is_success() {
            return Err(Error::Transport(format!("unexpected status code: {}", status)));
        }

        Ok(response)
    }

    /// Resolve a creator's vanity name to their campaign id.
    pub async fn get_campaign_id(&self, creator_id: &str) -> Result<String> {
        let url = format!("{}/{}", self.web_base, creator_id);
        let response = self.get(&url, &[]).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read creator page: {}", e)))?;

        find_campaign_id(&body)?.ok_or_else(|| Error::CampaignNotFound(creator_id.to_string()))
    }

    /// Fetch one raw page of a campaign's posts.
    pub async fn get_posts(&self, campaign_id: &str, cursor: Option<&str>) -> Result<String> {
        let url = format!("{}/posts", self.api_base);
        let mut query = vec![
            ("include", POST_INCLUDES),
            ("fields[post]", POST_FIELDS),
            ("fields[media]", MEDIA_FIELDS),
            ("filter[contains_exclusive_posts]", "true"),
            ("filter[is_draft]", "false"),
            ("sort", "-published_at"),
            ("json-api-version", "1.0"),
            ("filter[campaign_id]", campaign_id),
        ];
        if let Some(cursor) = cursor {
            query.push(("page[cursor]", cursor));
        }

        let response = self.get(&url, &query).await?;
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read posts page: {}", e)))?;
        tracing::debug!("Posts response length: {} bytes", text.len());

        Ok(text)
    }

    /// Fetch and decode one page of a campaign's posts.
    pub async fn get_posts_page(&self, campaign_id: &str, cursor: Option<&str>) -> Result<Document> {
        let text = self.get_posts(campaign_id, cursor).await?;
        decode(&text)
    }

    /// Check whether the session cookie belongs to a logged-in user.
    pub async fn is_authenticated(&self) -> Result<bool> {
        let url = format!("{}/current_user", self.api_base);
        let query = [
            ("include", "active_memberships.campaign"),
            (
                "fields[campaign]",
                "avatar_photo_image_urls,name,published_at,url,vanity,is_nsfw,url_for_current_user",
            ),
            ("fields[member]", "is_free_member,is_free_trial"),
            ("json-api-version", "1.0"),
        ];

        let response = self.send(&url, &query).await?;
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read current user: {}", e)))?;

        let parsed: UserErrorResponse = serde_json::from_str(&text)
            .map_err(|e| Error::Decode(format!("failed to parse current user: {}", e)))?;

        Ok(parsed.errors.is_empty())
    }

    /// Download a file from a media URL.
    ///
    /// Media URLs are pre-signed CDN links, so no cookie is attached.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("failed to download media: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "unexpected status code: {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Extract the campaign id from a creator page body.
pub fn find_campaign_id(body: &str) -> Result<Option<String>> {
    let pattern = Regex::new(CAMPAIGN_ID_PATTERN)
        .map_err(|e| Error::Config(format!("invalid campaign pattern: {}", e)))?;

    Ok(pattern
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string()))
}

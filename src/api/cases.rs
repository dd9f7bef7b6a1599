//
//  cydarm-connector
//  api/cases.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Case operations.
//!
//! Cases are Cydarm's unit of investigation. This module covers reading and
//! writing cases, their history, tags, comments, watchers, member cases and
//! the playbooks attached to them, plus the two case searches.
//!
//! Case payloads are passed through as `serde_json::Value`; only request bodies
//! are typed.
//!
//! # Example
//!
//! ```rust,no_run
//! use cydarm_connector::api::{CydarmClient, NewCase};
//! use serde_json::json;
//!
//! # async fn example(client: CydarmClient) -> Result<(), cydarm_connector::api::ApiError> {
//! let case = NewCase::new("Suspicious login from new ASN", "Acme")
//!     .field("severity", json!(2))
//!     .field("tags", json!(["phishing"]));
//! let created = client.create_case(&case).await?;
//!
//! let uuid = created["uuid"].as_str().unwrap_or_default();
//! client.add_case_tag(uuid, "triage").await?;
//! client.create_case_data_comment(uuid, "Opened from SOAR").await?;
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use super::client::{CydarmClient, RawResponse, RequestOptions};
use super::common::{ApiError, CaseFilter, CasePage};
use crate::auth::to_base64;

/// MIME type used for every comment this crate posts.
pub const COMMENT_MIME_TYPE: &str = "text/plain";

/// Significance used for every comment this crate posts.
pub const COMMENT_SIGNIFICANCE: &str = "Comment";

/// Request body for creating a case.
///
/// `description` and `org` are required by Cydarm. The four permission flags
/// default to `true`. Anything else goes into `fields` and is merged into the
/// body verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCase {
    /// Whether the case may be deleted.
    pub deletable: bool,
    /// Case description (title).
    pub description: String,
    /// Whether the case may be edited.
    pub editable: bool,
    /// Whether the case may be managed.
    pub manageable: bool,
    /// Owning organisation.
    pub org: String,
    /// Whether the case may be read.
    pub readable: bool,
    /// Additional case fields, sent as-is.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewCase {
    /// Creates a case body with all permission flags set.
    pub fn new(description: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            deletable: true,
            description: description.into(),
            editable: true,
            manageable: true,
            org: org.into(),
            readable: true,
            fields: Map::new(),
        }
    }

    /// Adds one extra field to the body.
    ///
    /// The permission flags, `description` and `org` are struct fields; use
    /// them directly rather than through this method.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}

/// Body of a plaintext comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    /// base64 encoded comment text
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
    pub significance: &'static str,
}

impl CommentData {
    /// Encodes comment text. MIME type and significance are fixed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::api::CommentData;
    ///
    /// let comment = CommentData::plain_text("hello");
    /// assert_eq!(comment.data, "aGVsbG8=");
    /// assert_eq!(comment.mime_type, "text/plain");
    /// assert_eq!(comment.significance, "Comment");
    /// ```
    pub fn plain_text(comment: &str) -> Self {
        Self {
            data: to_base64(comment),
            mime_type: COMMENT_MIME_TYPE,
            significance: COMMENT_SIGNIFICANCE,
        }
    }
}

#[derive(Serialize)]
struct CaseHistoryUpdate<'a> {
    modified: &'a str,
    status: &'a str,
}

#[derive(Serialize)]
struct TagRequest<'a> {
    #[serde(rename = "tagValue")]
    tag_value: &'a str,
}

#[derive(Serialize)]
struct WatcherRequest<'a> {
    user_uuid: &'a str,
}

#[derive(Serialize)]
struct QuickSearchRequest<'a> {
    #[serde(rename = "searchString")]
    search_string: &'a str,
}

impl CydarmClient {
    /// `GET /case/{uuid}`
    pub async fn get_case(&self, case_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/case/{}", case_uuid), RequestOptions::new())
            .await
    }

    /// `PUT /case/{uuid}` with the given fields. Cydarm answers without a body.
    pub async fn update_case(
        &self,
        case_uuid: &str,
        fields: &Map<String, Value>,
    ) -> Result<RawResponse, ApiError> {
        self.rest_put(
            &format!("/case/{}", case_uuid),
            RequestOptions::new().json(fields)?,
        )
        .await
    }

    /// `PUT /case/{uuid}/history`
    ///
    /// Cydarm currently only accepts `status = "Event"` here.
    pub async fn update_case_history(
        &self,
        case_uuid: &str,
        modified: &str,
        status: &str,
    ) -> Result<RawResponse, ApiError> {
        self.rest_put(
            &format!("/case/{}/history", case_uuid),
            RequestOptions::new().json(&CaseHistoryUpdate { modified, status })?,
        )
        .await
    }

    /// `POST /case`
    pub async fn create_case(&self, case: &NewCase) -> Result<Value, ApiError> {
        self.rest_post("/case", RequestOptions::new().json(case)?)
            .await
    }

    /// `POST /case/{uuid}/tag`
    pub async fn add_case_tag(&self, case_uuid: &str, tag_value: &str) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/case/{}/tag", case_uuid),
            RequestOptions::new().json(&TagRequest { tag_value })?,
        )
        .await
    }

    /// `DELETE /case/{uuid}/tag` with the tag in the body.
    pub async fn delete_case_tag(
        &self,
        case_uuid: &str,
        tag_value: &str,
    ) -> Result<RawResponse, ApiError> {
        self.rest_delete(
            &format!("/case/{}/tag", case_uuid),
            RequestOptions::new().json(&TagRequest { tag_value })?,
        )
        .await
    }

    /// `POST /case/{uuid}/data` with a plaintext comment.
    pub async fn create_case_data_comment(
        &self,
        case_uuid: &str,
        comment: &str,
    ) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/case/{}/data", case_uuid),
            RequestOptions::new().json(&CommentData::plain_text(comment))?,
        )
        .await
    }

    /// `GET /case/{uuid}/data`
    pub async fn get_case_data_list(&self, case_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/case/{}/data", case_uuid), RequestOptions::new())
            .await
    }

    /// `POST /case/quick-search`, returns a JSON array of ranked matches.
    pub async fn get_case_quick_search(&self, search_string: &str) -> Result<Value, ApiError> {
        self.rest_post(
            "/case/quick-search",
            RequestOptions::new().json(&QuickSearchRequest { search_string })?,
        )
        .await
    }

    /// `GET /case` for one page of the filtered search.
    pub async fn get_cases_filtered_paginated(
        &self,
        filter: &CaseFilter,
        page_num: u32,
    ) -> Result<CasePage, ApiError> {
        let value = self
            .rest_get("/case", RequestOptions::new().queries(filter.query(page_num)))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Walks every page of the filtered search and returns all cases in order.
    ///
    /// Stops on the first page whose `links` has no `next` key. There is no
    /// page cap: a server that always advertises `next` keeps this looping.
    ///
    /// Cydarm has been seen to answer HTTP 500 when several tags are given in
    /// `tags_included` and a case carries more than one of them.
    pub async fn get_cases_filtered(&self, filter: &CaseFilter) -> Result<Vec<Value>, ApiError> {
        let mut all_data = Vec::new();
        let mut page_num = 0;

        loop {
            let page = self.get_cases_filtered_paginated(filter, page_num).await?;
            let has_next = page.has_next();
            all_data.extend(page.data);

            if !has_next {
                break;
            }
            page_num += 1;
        }

        tracing::debug!("Fetched {} cases over {} pages", all_data.len(), page_num + 1);
        Ok(all_data)
    }

    /// `POST /case/{uuid}/watch`
    pub async fn add_watcher_to_case(
        &self,
        case_uuid: &str,
        user_uuid: &str,
    ) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/case/{}/watch", case_uuid),
            RequestOptions::new().json(&WatcherRequest { user_uuid })?,
        )
        .await
    }

    /// `POST /case/{uuid}/member/{member_uuid}`
    pub async fn add_member_to_case(
        &self,
        case_uuid: &str,
        member_case_uuid: &str,
    ) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/case/{}/member/{}", case_uuid, member_case_uuid),
            RequestOptions::new(),
        )
        .await
    }

    /// `GET /case/{uuid}/playbook/{case_playbook_uuid}`
    pub async fn get_case_playbook(
        &self,
        case_uuid: &str,
        case_playbook_uuid: &str,
    ) -> Result<Value, ApiError> {
        self.rest_get(
            &format!("/case/{}/playbook/{}", case_uuid, case_playbook_uuid),
            RequestOptions::new(),
        )
        .await
    }

    /// `GET /case/{uuid}/playbook`
    pub async fn get_case_playbooks(&self, case_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/case/{}/playbook", case_uuid), RequestOptions::new())
            .await
    }

    /// `POST /case/{uuid}/playbook/{playbook_uuid}` attaches a playbook to a case.
    pub async fn create_case_playbook(
        &self,
        case_uuid: &str,
        playbook_uuid: &str,
    ) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/case/{}/playbook/{}", case_uuid, playbook_uuid),
            RequestOptions::new(),
        )
        .await
    }
}

//
//  cydarm-connector
//  api/playbooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Playbook and playbook action operations.
//!
//! A playbook is an ordered list of playbook actions. Cydarm wraps both in an
//! `atc` envelope on write. Instances of an action running inside a case
//! ("action instances") can carry comments, added here as well.

use serde::Serialize;
use serde_json::{json, Value};

use super::cases::CommentData;
use super::client::{CydarmClient, RawResponse, RequestOptions};
use super::common::ApiError;

/// The `atc` envelope shared by playbook and playbook-action creation.
///
/// Unset fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AtcFields {
    pub name: Option<String>,
    pub description: Option<String>,
    /// ACL UUID
    pub acl: Option<String>,
}

#[derive(Serialize)]
struct AtcRequest<'a> {
    atc: &'a AtcFields,
}

impl CydarmClient {
    /// `GET /playbook/{uuid}`
    pub async fn get_playbook(&self, playbook_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(&format!("/playbook/{}", playbook_uuid), RequestOptions::new())
            .await
    }

    /// `POST /playbook`
    pub async fn create_playbook(&self, fields: &AtcFields) -> Result<Value, ApiError> {
        self.rest_post(
            "/playbook",
            RequestOptions::new().json(&AtcRequest { atc: fields })?,
        )
        .await
    }

    /// `GET /playbook-action/{uuid}`
    pub async fn get_playbook_action(&self, action_uuid: &str) -> Result<Value, ApiError> {
        self.rest_get(
            &format!("/playbook-action/{}", action_uuid),
            RequestOptions::new(),
        )
        .await
    }

    /// `POST /playbook-action`
    pub async fn create_playbook_action(&self, fields: &AtcFields) -> Result<Value, ApiError> {
        self.rest_post(
            "/playbook-action",
            RequestOptions::new().json(&AtcRequest { atc: fields })?,
        )
        .await
    }

    /// `POST /playbook/{playbook_uuid}/playbook-action/{action_uuid}`
    ///
    /// Appends the action to the playbook. Cydarm answers `201 Created` with no
    /// useful body, so the raw response is returned.
    pub async fn add_action_to_playbook(
        &self,
        playbook_uuid: &str,
        action_uuid: &str,
    ) -> Result<RawResponse, ApiError> {
        self.rest_raw(
            reqwest::Method::POST,
            &format!("/playbook/{}/playbook-action/{}", playbook_uuid, action_uuid),
            RequestOptions::new().json(&json!({ "atc": {} }))?,
        )
        .await
    }

    /// `POST /action-instance/{uuid}/data` with a plaintext comment.
    pub async fn create_action_instance_data(
        &self,
        action_instance_uuid: &str,
        comment: &str,
    ) -> Result<Value, ApiError> {
        self.rest_post(
            &format!("/action-instance/{}/data", action_instance_uuid),
            RequestOptions::new().json(&CommentData::plain_text(comment))?,
        )
        .await
    }
}

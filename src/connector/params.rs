//
//  cydarm-connector
//  connector/params.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Typed action parameters.
//!
//! Hosts hand every action an untyped string-keyed map. Each action
//! deserializes that map into its own struct, which is the action's
//! allow-list: keys the struct does not name are dropped, missing required
//! keys fail here, before any request is sent.
//!
//! Case create/update get extra treatment at this boundary: `severity` must be
//! 1 to 5, and `metadata`, `tags` and `members` arrive as JSON-encoded strings
//! that are decoded into structured values.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::action::ActionId;
use crate::api::{AtcFields, CaseFilter, NewCase};

/// Fields accepted by `create_case`.
pub const CASE_FIELDS: [&str; 24] = [
    "acl",
    "assignee",
    "closed",
    "created",
    "deletable",
    "description",
    "editable",
    "locator",
    "manageable",
    "members",
    "metadata",
    "minSlaName",
    "minSlaSeconds",
    "modified",
    "org",
    "readable",
    "severity",
    "severityName",
    "status",
    "tags",
    "totalActionsInAllPlaybooks",
    "totalCompletedActionsInAllPlaybooks",
    "updateAcls",
    "uuid",
];

/// Fields accepted by `update_case`: the case UUID plus every case field.
pub const UPDATE_CASE_FIELDS: [&str; 25] = [
    "case_uuid",
    "acl",
    "assignee",
    "closed",
    "created",
    "deletable",
    "description",
    "editable",
    "locator",
    "manageable",
    "members",
    "metadata",
    "minSlaName",
    "minSlaSeconds",
    "modified",
    "org",
    "readable",
    "severity",
    "severityName",
    "status",
    "tags",
    "totalActionsInAllPlaybooks",
    "totalCompletedActionsInAllPlaybooks",
    "updateAcls",
    "uuid",
];

/// Errors raised while narrowing host parameters.
#[derive(Error, Debug)]
pub enum ParamError {
    /// A key is missing, has the wrong type, or failed validation.
    #[error("Invalid parameters for {action}: {source}")]
    Invalid {
        action: ActionId,
        #[source]
        source: serde_json::Error,
    },

    /// A key required by the remote API is missing.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Typed parameters could not be turned back into a request body.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Case severity, 1 (highest) to 5.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::connector::Severity;
///
/// assert_eq!(Severity::new(3).unwrap().get(), 3);
/// assert!(Severity::new(0).is_err());
/// assert!(Severity::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Number", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Validates a severity.
    pub fn new(value: i64) -> Result<Self, String> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!(
                "Given severity ({}) is not valid - expected {} to {}.",
                value,
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<Number> for Severity {
    type Error = String;

    fn try_from(number: Number) -> Result<Self, Self::Error> {
        // hosts send numeric params as floats, accept 3.0 but not 3.5
        let value = number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| format!("Given severity ({}) is not an integer.", number))?;
        Self::new(value)
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.0
    }
}

/// Decodes a JSON-encoded string parameter; structured values pass through.
fn decode_json_text<'de, D>(deserializer: D, field: &str) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("`{}` is not valid JSON: {}", field, e))),
        Some(other) => Ok(Some(other)),
    }
}

fn decode_members<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    decode_json_text(d, "members")
}

fn decode_metadata<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    decode_json_text(d, "metadata")
}

fn decode_tags<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    decode_json_text(d, "tags")
}

/// Case fields shared by `create_case` and `update_case`.
///
/// Serializes back to the request body, skipping unset fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manageable: Option<bool>,
    /// Member case UUIDs (JSON array)
    #[serde(default, deserialize_with = "decode_members", skip_serializing_if = "Option::is_none")]
    pub members: Option<Value>,
    /// Metadata fields (JSON object)
    #[serde(default, deserialize_with = "decode_metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sla_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sla_seconds: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Tags (JSON array)
    #[serde(default, deserialize_with = "decode_tags", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_actions_in_all_playbooks: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_completed_actions_in_all_playbooks: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_acls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl CaseFields {
    /// The fields as a JSON object, unset ones left out.
    pub fn to_body(&self) -> Result<Map<String, Value>, ParamError> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    /// Builds a case creation body.
    ///
    /// `description` and `org` are required; unset permission flags default
    /// to `true`.
    pub fn into_new_case(self) -> Result<NewCase, ParamError> {
        let description = self
            .description
            .clone()
            .ok_or(ParamError::MissingParameter("description"))?;
        let org = self.org.clone().ok_or(ParamError::MissingParameter("org"))?;

        let mut case = NewCase::new(description, org);
        case.deletable = self.deletable.unwrap_or(true);
        case.editable = self.editable.unwrap_or(true);
        case.manageable = self.manageable.unwrap_or(true);
        case.readable = self.readable.unwrap_or(true);

        let rest = CaseFields {
            description: None,
            org: None,
            deletable: None,
            editable: None,
            manageable: None,
            readable: None,
            ..self
        };
        case.fields = rest.to_body()?;
        Ok(case)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseParams {
    pub case_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CasePlaybookParams {
    pub case_uuid: String,
    pub case_playbook_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickSearchParams {
    pub search_string: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionInstanceCommentParams {
    pub action_instance_uuid: String,
    #[serde(rename = "data")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseCommentParams {
    pub case_uuid: String,
    #[serde(rename = "data")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCaseParams {
    pub case_uuid: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaseHistoryParams {
    pub case_uuid: String,
    pub modified: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttachPlaybookParams {
    pub case_uuid: String,
    pub playbook_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybookParams {
    pub playbook_uuid: String,
}

/// Name, description and ACL of a new playbook or playbook action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AtcParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub acl_uuid: Option<String>,
}

impl From<AtcParams> for AtcFields {
    fn from(params: AtcParams) -> Self {
        Self {
            name: params.name,
            description: params.description,
            acl: params.acl_uuid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybookActionParams {
    pub action_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaybookActionLinkParams {
    pub playbook_uuid: String,
    pub action_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserParams {
    pub user_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AclParams {
    pub acl_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatcherParams {
    pub case_uuid: String,
    pub user_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberParams {
    pub case_uuid: String,
    pub member_case_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagParams {
    pub case_uuid: String,
    pub tag_value: String,
}

/// A validated action invocation, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionRequest {
    TestConnectivity,
    GetCase(CaseParams),
    GetCaseQuickSearch(QuickSearchParams),
    GetCasesFiltered(CaseFilter),
    CreateActionInstanceData(ActionInstanceCommentParams),
    CreateCaseDataComment(CaseCommentParams),
    CreateCase(NewCase),
    UpdateCase(UpdateCaseParams),
    UpdateCaseHistory(CaseHistoryParams),
    CreateCasePlaybook(AttachPlaybookParams),
    GetCasePlaybook(CasePlaybookParams),
    GetCasePlaybooks(CaseParams),
    GetCaseDataList(CaseParams),
    GetPlaybook(PlaybookParams),
    CreatePlaybook(AtcFields),
    CreatePlaybookAction(AtcFields),
    GetPlaybookAction(PlaybookActionParams),
    AddActionToPlaybook(PlaybookActionLinkParams),
    GetUser(UserParams),
    GetAcl(AclParams),
    AddWatcherToCase(WatcherParams),
    AddMemberToCase(MemberParams),
    AddCaseTag(TagParams),
    DeleteCaseTag(TagParams),
}

fn narrow<T: DeserializeOwned>(action: ActionId, params: &Map<String, Value>) -> Result<T, ParamError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|source| ParamError::Invalid { action, source })
}

impl ActionRequest {
    /// Narrows a host parameter map to the typed request for `action`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::connector::{ActionId, ActionRequest};
    /// use serde_json::json;
    ///
    /// let params = json!({"case_uuid": "abc123", "context": {"guid": "x"}});
    /// let request = ActionRequest::parse(ActionId::GetCase, params.as_object().unwrap()).unwrap();
    /// assert_eq!(request.action(), ActionId::GetCase);
    /// ```
    pub fn parse(action: ActionId, params: &Map<String, Value>) -> Result<Self, ParamError> {
        let request = match action {
            ActionId::TestConnectivity => Self::TestConnectivity,
            ActionId::GetCase => Self::GetCase(narrow(action, params)?),
            ActionId::GetCaseQuickSearch => Self::GetCaseQuickSearch(narrow(action, params)?),
            ActionId::GetCasesFiltered => Self::GetCasesFiltered(narrow(action, params)?),
            ActionId::CreateActionInstanceData => {
                Self::CreateActionInstanceData(narrow(action, params)?)
            }
            ActionId::CreateCaseDataComment => Self::CreateCaseDataComment(narrow(action, params)?),
            ActionId::CreateCase => {
                let fields: CaseFields = narrow(action, params)?;
                Self::CreateCase(fields.into_new_case()?)
            }
            ActionId::UpdateCase => {
                let CaseParams { case_uuid } = narrow(action, params)?;
                let fields: CaseFields = narrow(action, params)?;
                Self::UpdateCase(UpdateCaseParams {
                    case_uuid,
                    fields: fields.to_body()?,
                })
            }
            ActionId::UpdateCaseHistory => Self::UpdateCaseHistory(narrow(action, params)?),
            ActionId::CreateCasePlaybook => Self::CreateCasePlaybook(narrow(action, params)?),
            ActionId::GetCasePlaybook => Self::GetCasePlaybook(narrow(action, params)?),
            ActionId::GetCasePlaybooks => Self::GetCasePlaybooks(narrow(action, params)?),
            ActionId::GetCaseDataList => Self::GetCaseDataList(narrow(action, params)?),
            ActionId::GetPlaybook => Self::GetPlaybook(narrow(action, params)?),
            ActionId::CreatePlaybook => {
                Self::CreatePlaybook(narrow::<AtcParams>(action, params)?.into())
            }
            ActionId::CreatePlaybookAction => {
                Self::CreatePlaybookAction(narrow::<AtcParams>(action, params)?.into())
            }
            ActionId::GetPlaybookAction => Self::GetPlaybookAction(narrow(action, params)?),
            ActionId::AddActionToPlaybook => Self::AddActionToPlaybook(narrow(action, params)?),
            ActionId::GetUser => Self::GetUser(narrow(action, params)?),
            ActionId::GetAcl => Self::GetAcl(narrow(action, params)?),
            ActionId::AddWatcherToCase => Self::AddWatcherToCase(narrow(action, params)?),
            ActionId::AddMemberToCase => Self::AddMemberToCase(narrow(action, params)?),
            ActionId::AddCaseTag => Self::AddCaseTag(narrow(action, params)?),
            ActionId::DeleteCaseTag => Self::DeleteCaseTag(narrow(action, params)?),
        };
        Ok(request)
    }

    /// The action this request belongs to.
    pub fn action(&self) -> ActionId {
        match self {
            Self::TestConnectivity => ActionId::TestConnectivity,
            Self::GetCase(_) => ActionId::GetCase,
            Self::GetCaseQuickSearch(_) => ActionId::GetCaseQuickSearch,
            Self::GetCasesFiltered(_) => ActionId::GetCasesFiltered,
            Self::CreateActionInstanceData(_) => ActionId::CreateActionInstanceData,
            Self::CreateCaseDataComment(_) => ActionId::CreateCaseDataComment,
            Self::CreateCase(_) => ActionId::CreateCase,
            Self::UpdateCase(_) => ActionId::UpdateCase,
            Self::UpdateCaseHistory(_) => ActionId::UpdateCaseHistory,
            Self::CreateCasePlaybook(_) => ActionId::CreateCasePlaybook,
            Self::GetCasePlaybook(_) => ActionId::GetCasePlaybook,
            Self::GetCasePlaybooks(_) => ActionId::GetCasePlaybooks,
            Self::GetCaseDataList(_) => ActionId::GetCaseDataList,
            Self::GetPlaybook(_) => ActionId::GetPlaybook,
            Self::CreatePlaybook(_) => ActionId::CreatePlaybook,
            Self::CreatePlaybookAction(_) => ActionId::CreatePlaybookAction,
            Self::GetPlaybookAction(_) => ActionId::GetPlaybookAction,
            Self::AddActionToPlaybook(_) => ActionId::AddActionToPlaybook,
            Self::GetUser(_) => ActionId::GetUser,
            Self::GetAcl(_) => ActionId::GetAcl,
            Self::AddWatcherToCase(_) => ActionId::AddWatcherToCase,
            Self::AddMemberToCase(_) => ActionId::AddMemberToCase,
            Self::AddCaseTag(_) => ActionId::AddCaseTag,
            Self::DeleteCaseTag(_) => ActionId::DeleteCaseTag,
        }
    }
}

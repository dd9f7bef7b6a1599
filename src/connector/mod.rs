//
//  cydarm-connector
//  connector/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SOAR Action Dispatcher
//!
//! [`CydarmConnector`] maps an action identifier and a parameter map onto one
//! client operation and packages the outcome as an [`ActionResult`].
//!
//! ## Flow
//!
//! 1. Resolve the identifier through the action table. Unknown identifiers
//!    are a hard error, not a failed result.
//! 2. Narrow the parameter map to the action's typed parameters.
//! 3. Run the client operation.
//! 4. Wrap the response: each element of a list becomes one record, an object
//!    becomes one record, anything else adds no records.
//!
//! Parameter and API failures end up in the result with status
//! [`ActionStatus::Failed`] and the error text as message.

mod action;
mod params;
mod result;

pub use action::*;
pub use params::*;
pub use result::*;

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::api::{ApiError, CydarmClient, LogFn, Reply};
use crate::config::{ConfigError, ConnectorConfig};

/// Errors that abort dispatch instead of producing a result.
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Why an action failed.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Dispatches SOAR actions against one Cydarm instance.
///
/// # Example
///
/// ```rust,no_run
/// use cydarm_connector::api::CydarmClient;
/// use cydarm_connector::connector::CydarmConnector;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), cydarm_connector::connector::ConnectorError> {
/// let client = CydarmClient::new("https://acme.cydarm.io/cydarm_api", "bot", "pw");
/// let connector = CydarmConnector::new(client).with_progress(|msg| eprintln!("{msg}"));
///
/// let params = json!({"case_uuid": "abc123"});
/// let result = connector
///     .handle_action("get_case", params.as_object().unwrap())
///     .await?;
/// println!("{}", serde_json::to_string_pretty(&result).unwrap());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CydarmConnector {
    client: CydarmClient,
    progress: Option<LogFn>,
}

impl CydarmConnector {
    pub fn new(client: CydarmClient) -> Self {
        Self {
            client,
            progress: None,
        }
    }

    /// Builds the client from connection settings.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.build_client()?))
    }

    /// Routes progress messages, including the client's request log lines, to
    /// `progress`.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let progress: LogFn = Arc::new(progress);
        self.client = self.client.with_shared_log_fn(progress.clone());
        self.progress = Some(progress);
        self
    }

    pub fn client(&self) -> &CydarmClient {
        &self.client
    }

    fn save_progress(&self, message: &str) {
        tracing::info!("{}", message);
        if let Some(progress) = &self.progress {
            progress(message);
        }
    }

    /// Runs one action.
    ///
    /// # Errors
    ///
    /// Only [`ConnectorError::UnknownAction`]. Every other failure is reported
    /// inside the returned result.
    pub async fn handle_action(
        &self,
        identifier: &str,
        params: &Map<String, Value>,
    ) -> Result<ActionResult, ConnectorError> {
        let action: ActionId = identifier.parse()?;
        self.save_progress(&format!("In action handler for: {}", action));

        let connectivity = action == ActionId::TestConnectivity;
        if connectivity {
            self.save_progress("Verifying connection & auth to Cydarm");
        }

        let mut result = ActionResult::new(params.clone());
        match (self.run_action(action, params).await, connectivity) {
            (Ok(_), true) => {
                self.save_progress("Test Connectivity Passed");
                result.set_status(
                    ActionStatus::Success,
                    Some("Test Connectivity Passed".to_string()),
                );
            }
            (Ok(reply), false) => {
                let count = collect_records(&mut result, reply);
                if count.is_none() {
                    self.save_progress("No response data.");
                }
                result.update_summary(count.unwrap_or(1));
                result.set_status(ActionStatus::Success, None);
            }
            (Err(e), true) => {
                if matches!(&e, ActionError::Api(api) if api.is_auth()) {
                    self.save_progress("Login rejected, check the Cydarm username and password");
                }
                self.save_progress("Test Connectivity Failed.");
                result.set_status(ActionStatus::Failed, Some(format!("Connection failed: {}", e)));
            }
            (Err(e), false) => {
                tracing::warn!("Action {} failed: {}", action, e);
                self.save_progress(&format!("Action {} failed: {}", action, e));
                result.set_status(ActionStatus::Failed, Some(e.to_string()));
            }
        }
        Ok(result)
    }

    async fn run_action(
        &self,
        action: ActionId,
        params: &Map<String, Value>,
    ) -> Result<Reply, ActionError> {
        let request = ActionRequest::parse(action, params)?;
        self.save_progress(&format!("Calling {} with {:?}", action, request));

        let reply = self.execute(request).await?;
        match &reply {
            Reply::Json(value) => self.save_progress(&format!("Output from {}: {}", action, value)),
            Reply::Raw(raw) => self.save_progress(&format!("Output from {}: {}", action, raw.status)),
        }
        Ok(reply)
    }

    async fn execute(&self, request: ActionRequest) -> Result<Reply, ApiError> {
        let client = &self.client;
        let reply = match request {
            ActionRequest::TestConnectivity => {
                client.generate_bearer_token().await?;
                Reply::Json(Value::Null)
            }
            ActionRequest::GetCase(p) => Reply::Json(client.get_case(&p.case_uuid).await?),
            ActionRequest::GetCaseQuickSearch(p) => {
                Reply::Json(client.get_case_quick_search(&p.search_string).await?)
            }
            ActionRequest::GetCasesFiltered(filter) => {
                Reply::Json(Value::Array(client.get_cases_filtered(&filter).await?))
            }
            ActionRequest::CreateActionInstanceData(p) => Reply::Json(
                client
                    .create_action_instance_data(&p.action_instance_uuid, &p.comment)
                    .await?,
            ),
            ActionRequest::CreateCaseDataComment(p) => Reply::Json(
                client
                    .create_case_data_comment(&p.case_uuid, &p.comment)
                    .await?,
            ),
            ActionRequest::CreateCase(case) => Reply::Json(client.create_case(&case).await?),
            ActionRequest::UpdateCase(p) => {
                Reply::Raw(client.update_case(&p.case_uuid, &p.fields).await?)
            }
            ActionRequest::UpdateCaseHistory(p) => Reply::Raw(
                client
                    .update_case_history(&p.case_uuid, &p.modified, &p.status)
                    .await?,
            ),
            ActionRequest::CreateCasePlaybook(p) => Reply::Json(
                client
                    .create_case_playbook(&p.case_uuid, &p.playbook_uuid)
                    .await?,
            ),
            ActionRequest::GetCasePlaybook(p) => Reply::Json(
                client
                    .get_case_playbook(&p.case_uuid, &p.case_playbook_uuid)
                    .await?,
            ),
            ActionRequest::GetCasePlaybooks(p) => {
                Reply::Json(client.get_case_playbooks(&p.case_uuid).await?)
            }
            ActionRequest::GetCaseDataList(p) => {
                Reply::Json(client.get_case_data_list(&p.case_uuid).await?)
            }
            ActionRequest::GetPlaybook(p) => Reply::Json(client.get_playbook(&p.playbook_uuid).await?),
            ActionRequest::CreatePlaybook(fields) => {
                Reply::Json(client.create_playbook(&fields).await?)
            }
            ActionRequest::CreatePlaybookAction(fields) => {
                Reply::Json(client.create_playbook_action(&fields).await?)
            }
            ActionRequest::GetPlaybookAction(p) => {
                Reply::Json(client.get_playbook_action(&p.action_uuid).await?)
            }
            ActionRequest::AddActionToPlaybook(p) => Reply::Raw(
                client
                    .add_action_to_playbook(&p.playbook_uuid, &p.action_uuid)
                    .await?,
            ),
            ActionRequest::GetUser(p) => Reply::Json(client.get_user(&p.user_uuid).await?),
            ActionRequest::GetAcl(p) => Reply::Json(client.get_acl(&p.acl_uuid).await?),
            ActionRequest::AddWatcherToCase(p) => Reply::Json(
                client
                    .add_watcher_to_case(&p.case_uuid, &p.user_uuid)
                    .await?,
            ),
            ActionRequest::AddMemberToCase(p) => Reply::Json(
                client
                    .add_member_to_case(&p.case_uuid, &p.member_case_uuid)
                    .await?,
            ),
            ActionRequest::AddCaseTag(p) => {
                Reply::Json(client.add_case_tag(&p.case_uuid, &p.tag_value).await?)
            }
            ActionRequest::DeleteCaseTag(p) => {
                Reply::Raw(client.delete_case_tag(&p.case_uuid, &p.tag_value).await?)
            }
        };
        Ok(reply)
    }
}

/// Appends the records of `reply` and returns how many there were, or `None`
/// when the reply carried no list or object.
fn collect_records(result: &mut ActionResult, reply: Reply) -> Option<usize> {
    match reply {
        Reply::Json(Value::Array(items)) => {
            let count = items.len();
            for item in items {
                result.add_data(item);
            }
            Some(count)
        }
        Reply::Json(object @ Value::Object(_)) => {
            result.add_data(object);
            Some(1)
        }
        _ => None,
    }
}

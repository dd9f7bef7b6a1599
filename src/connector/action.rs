//
//  cydarm-connector
//  connector/action.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The static action table.
//!
//! Every action identifier a SOAR host can send maps to exactly one
//! [`ActionId`]. The lookup index is built once, on first use.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use super::ConnectorError;

/// Every action the connector implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    TestConnectivity,
    GetCase,
    GetCaseQuickSearch,
    GetCasesFiltered,
    CreateActionInstanceData,
    CreateCaseDataComment,
    CreateCase,
    UpdateCase,
    UpdateCaseHistory,
    CreateCasePlaybook,
    GetCasePlaybook,
    GetCasePlaybooks,
    GetCaseDataList,
    GetPlaybook,
    CreatePlaybook,
    CreatePlaybookAction,
    GetPlaybookAction,
    AddActionToPlaybook,
    GetUser,
    GetAcl,
    AddWatcherToCase,
    AddMemberToCase,
    AddCaseTag,
    DeleteCaseTag,
}

static INDEX: Lazy<HashMap<&'static str, ActionId>> = Lazy::new(|| {
    ActionId::ALL
        .iter()
        .map(|action| (action.identifier(), *action))
        .collect()
});

impl ActionId {
    /// All actions, in the order they are listed to users.
    pub const ALL: [ActionId; 24] = [
        Self::TestConnectivity,
        Self::GetCase,
        Self::GetCaseQuickSearch,
        Self::GetCasesFiltered,
        Self::CreateActionInstanceData,
        Self::CreateCaseDataComment,
        Self::CreateCase,
        Self::UpdateCase,
        Self::UpdateCaseHistory,
        Self::CreateCasePlaybook,
        Self::GetCasePlaybook,
        Self::GetCasePlaybooks,
        Self::GetCaseDataList,
        Self::GetPlaybook,
        Self::CreatePlaybook,
        Self::CreatePlaybookAction,
        Self::GetPlaybookAction,
        Self::AddActionToPlaybook,
        Self::GetUser,
        Self::GetAcl,
        Self::AddWatcherToCase,
        Self::AddMemberToCase,
        Self::AddCaseTag,
        Self::DeleteCaseTag,
    ];

    /// Looks up an identifier in the action table.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cydarm_connector::connector::ActionId;
    ///
    /// assert_eq!(ActionId::from_identifier("get_case"), Some(ActionId::GetCase));
    /// assert_eq!(ActionId::from_identifier("get case"), None);
    /// ```
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        INDEX.get(identifier).copied()
    }

    /// The host identifier of this action.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::TestConnectivity => "test_connectivity",
            Self::GetCase => "get_case",
            Self::GetCaseQuickSearch => "get_case_quick_search",
            Self::GetCasesFiltered => "get_cases_filtered",
            Self::CreateActionInstanceData => "create_action_instance_data",
            Self::CreateCaseDataComment => "create_case_data_comment",
            Self::CreateCase => "create_case",
            Self::UpdateCase => "update_case",
            Self::UpdateCaseHistory => "update_case_history",
            Self::CreateCasePlaybook => "create_case_playbook",
            Self::GetCasePlaybook => "get_case_playbook",
            Self::GetCasePlaybooks => "get_case_playbooks",
            Self::GetCaseDataList => "get_case_data_list",
            Self::GetPlaybook => "get_playbook",
            Self::CreatePlaybook => "create_playbook",
            Self::CreatePlaybookAction => "create_playbook_action",
            Self::GetPlaybookAction => "get_playbook_action",
            Self::AddActionToPlaybook => "add_action_to_playbook",
            Self::GetUser => "get_user",
            Self::GetAcl => "get_acl",
            Self::AddWatcherToCase => "add_watcher_to_case",
            Self::AddMemberToCase => "add_member_to_case",
            Self::AddCaseTag => "add_case_tag",
            Self::DeleteCaseTag => "delete_case_tag",
        }
    }

    /// One-line description shown by `cydarm actions`.
    pub fn description(self) -> &'static str {
        match self {
            Self::TestConnectivity => "Validate the configuration by generating an access token",
            Self::GetCase => "Get a case by UUID",
            Self::GetCaseQuickSearch => "Query cases with a keyword filter",
            Self::GetCasesFiltered => "Query cases by text and tags, following every page",
            Self::CreateActionInstanceData => "Create a plaintext comment on an action instance",
            Self::CreateCaseDataComment => "Create a plaintext comment on a case",
            Self::CreateCase => "Create a case",
            Self::UpdateCase => "Update a case",
            Self::UpdateCaseHistory => "Update a case's history",
            Self::CreateCasePlaybook => "Attach a playbook to a case",
            Self::GetCasePlaybook => "Get one playbook instance of a case",
            Self::GetCasePlaybooks => "List the playbooks attached to a case",
            Self::GetCaseDataList => "List the data items of a case",
            Self::GetPlaybook => "Get a playbook by UUID",
            Self::CreatePlaybook => "Create a playbook",
            Self::CreatePlaybookAction => "Create a playbook action",
            Self::GetPlaybookAction => "Get a playbook action by UUID",
            Self::AddActionToPlaybook => "Append an action to a playbook",
            Self::GetUser => "Get a user by UUID",
            Self::GetAcl => "Get an ACL by UUID",
            Self::AddWatcherToCase => "Add a user as watcher of a case",
            Self::AddMemberToCase => "Add a member case to a case group",
            Self::AddCaseTag => "Add a tag to a case",
            Self::DeleteCaseTag => "Remove a tag from a case",
        }
    }

    /// Parameter names this action reads; every other key is ignored.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::TestConnectivity => &[],
            Self::GetCase | Self::GetCasePlaybooks | Self::GetCaseDataList => &["case_uuid"],
            Self::GetCaseQuickSearch => &["search_string"],
            Self::GetCasesFiltered => &["filter_text", "tags_included", "page_size"],
            Self::CreateActionInstanceData => &["action_instance_uuid", "data"],
            Self::CreateCaseDataComment => &["case_uuid", "data"],
            Self::CreateCase => &super::params::CASE_FIELDS,
            Self::UpdateCase => &super::params::UPDATE_CASE_FIELDS,
            Self::UpdateCaseHistory => &["case_uuid", "modified", "status"],
            Self::CreateCasePlaybook => &["case_uuid", "playbook_uuid"],
            Self::GetCasePlaybook => &["case_uuid", "case_playbook_uuid"],
            Self::GetPlaybook => &["playbook_uuid"],
            Self::CreatePlaybook | Self::CreatePlaybookAction => {
                &["name", "description", "acl_uuid"]
            }
            Self::GetPlaybookAction => &["action_uuid"],
            Self::AddActionToPlaybook => &["playbook_uuid", "action_uuid"],
            Self::GetUser => &["user_uuid"],
            Self::GetAcl => &["acl_uuid"],
            Self::AddWatcherToCase => &["case_uuid", "user_uuid"],
            Self::AddMemberToCase => &["case_uuid", "member_case_uuid"],
            Self::AddCaseTag | Self::DeleteCaseTag => &["case_uuid", "tag_value"],
        }
    }

    /// Whether the action only reads from Cydarm.
    pub fn read_only(self) -> bool {
        matches!(
            self,
            Self::TestConnectivity
                | Self::GetCase
                | Self::GetCaseQuickSearch
                | Self::GetCasesFiltered
                | Self::GetCasePlaybook
                | Self::GetCasePlaybooks
                | Self::GetCaseDataList
                | Self::GetPlaybook
                | Self::GetPlaybookAction
                | Self::GetUser
                | Self::GetAcl
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ActionId {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s).ok_or_else(|| ConnectorError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_action_round_trips_through_the_index() {
        for action in ActionId::ALL {
            assert_eq!(ActionId::from_identifier(action.identifier()), Some(action));
        }
    }

    #[test]
    fn test_identifiers_are_unique() {
        let identifiers: HashSet<_> = ActionId::ALL.iter().map(|a| a.identifier()).collect();
        assert_eq!(identifiers.len(), ActionId::ALL.len());
    }

    #[test]
    fn test_serialized_name_matches_identifier() {
        for action in ActionId::ALL {
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                serde_json::Value::String(action.identifier().to_string())
            );
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "_handle_get_case".parse::<ActionId>().unwrap_err();
        assert!(matches!(err, ConnectorError::UnknownAction(id) if id == "_handle_get_case"));
    }

    #[test]
    fn test_update_case_reads_case_uuid() {
        assert!(ActionId::UpdateCase.parameters().contains(&"case_uuid"));
        assert!(!ActionId::CreateCase.parameters().contains(&"case_uuid"));
    }
}

//
//  cydarm-connector
//  connector/result.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-invocation action results, in the shape SOAR hosts expect.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Final state of an action invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

/// Result record for one action invocation.
///
/// Starts out failed with no data. The dispatcher appends records, fills the
/// summary and finally sets the status.
///
/// # Example
///
/// ```rust
/// use cydarm_connector::connector::{ActionResult, ActionStatus};
/// use serde_json::{json, Map};
///
/// let mut result = ActionResult::new(Map::new());
/// result.add_data(json!({"uuid": "abc123"}));
/// result.update_summary(1);
/// result.set_status(ActionStatus::Success, None);
///
/// assert!(result.is_success());
/// assert_eq!(result.total_objects(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The parameters the action was invoked with, as received.
    #[serde(default)]
    pub parameter: Map<String, Value>,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub summary: Map<String, Value>,
}

impl ActionResult {
    pub fn new(parameter: Map<String, Value>) -> Self {
        Self {
            status: ActionStatus::Failed,
            message: None,
            parameter,
            data: Vec::new(),
            summary: Map::new(),
        }
    }

    pub fn add_data(&mut self, record: Value) {
        self.data.push(record);
    }

    /// Sets `total_objects` and `total_objects_successful` to `count`.
    pub fn update_summary(&mut self, count: usize) {
        self.summary
            .insert("total_objects".to_string(), Value::from(count));
        self.summary
            .insert("total_objects_successful".to_string(), Value::from(count));
    }

    pub fn set_status(&mut self, status: ActionStatus, message: Option<String>) {
        self.status = status;
        self.message = message;
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    pub fn total_objects(&self) -> Option<u64> {
        self.summary.get("total_objects").and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_result_is_failed_and_empty() {
        let result = ActionResult::new(Map::new());
        assert_eq!(result.status, ActionStatus::Failed);
        assert!(result.data.is_empty());
        assert!(result.summary.is_empty());
        assert_eq!(result.total_objects(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let mut params = Map::new();
        params.insert("case_uuid".to_string(), json!("c1"));
        let mut result = ActionResult::new(params);
        result.add_data(json!({"uuid": "c1"}));
        result.update_summary(1);
        result.set_status(ActionStatus::Success, None);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": "success",
                "parameter": {"case_uuid": "c1"},
                "data": [{"uuid": "c1"}],
                "summary": {"total_objects": 1, "total_objects_successful": 1}
            })
        );
    }

    #[test]
    fn test_failure_message_is_serialized() {
        let mut result = ActionResult::new(Map::new());
        result.set_status(ActionStatus::Failed, Some("boom".to_string()));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["message"], "boom");
    }
}

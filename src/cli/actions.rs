//
//  cydarm-connector
//  cli/actions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Lists the action table.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::connector::ActionId;
use crate::output::{format_bool, OutputFormat, OutputWriter, TableBuilder};

use super::GlobalOptions;

/// List supported actions
#[derive(Args, Debug)]
pub struct ActionsCommand {
    /// Only show actions that do not modify Cydarm
    #[arg(long)]
    pub read_only: bool,
}

#[derive(Debug, Serialize)]
struct ActionInfo {
    identifier: &'static str,
    description: &'static str,
    parameters: &'static [&'static str],
    read_only: bool,
}

impl From<ActionId> for ActionInfo {
    fn from(action: ActionId) -> Self {
        Self {
            identifier: action.identifier(),
            description: action.description(),
            parameters: action.parameters(),
            read_only: action.read_only(),
        }
    }
}

impl ActionsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let actions: Vec<ActionInfo> = ActionId::ALL
            .into_iter()
            .filter(|a| !self.read_only || a.read_only())
            .map(ActionInfo::from)
            .collect();

        let writer = OutputWriter::new(OutputFormat::from_json_flag(global.json));
        if writer.is_json() {
            return writer.write_json(&actions);
        }

        let color = writer.color_enabled();
        TableBuilder::new()
            .color(color)
            .headers(["ACTION", "PARAMETERS", "READ-ONLY", "DESCRIPTION"])
            .rows(actions.iter().map(|a| {
                [
                    a.identifier.to_string(),
                    a.parameters.join(", "),
                    format_bool(a.read_only, color),
                    a.description.to_string(),
                ]
            }))
            .print();
        Ok(())
    }
}

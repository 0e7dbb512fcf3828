//! Workbook triggers: run a refresh whenever the document is opened.

use serde::{Deserialize, Serialize};

use crate::{
    error::RefreshError,
    refresh::{RefreshReport, Refresher},
    workbook::Workbook,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerHandler {
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub event: TriggerEvent,
    pub handler: TriggerHandler,
}

/// Register a refresh to run on open.
///
/// Every call adds another trigger; registering twice refreshes twice.
pub fn install_on_open_trigger(workbook: &mut Workbook) {
    workbook.push_trigger(Trigger { event: TriggerEvent::Open, handler: TriggerHandler::Refresh });
    tracing::info!(count = workbook.triggers().len(), "installed on-open trigger");
}

/// Fire the open event: one refresh per registered on-open trigger, in
/// registration order, stopping at the first failure.
pub async fn open_workbook(
    workbook: &mut Workbook,
    refresher: &Refresher,
) -> Result<Vec<RefreshReport>, RefreshError> {
    let handlers: Vec<TriggerHandler> = workbook
        .triggers()
        .iter()
        .filter(|t| t.event == TriggerEvent::Open)
        .map(|t| t.handler)
        .collect();

    tracing::debug!(triggers = handlers.len(), "workbook opened");

    let mut reports = Vec::with_capacity(handlers.len());
    for handler in handlers {
        match handler {
            TriggerHandler::Refresh => reports.push(refresher.refresh(workbook).await?),
        }
    }
    Ok(reports)
}

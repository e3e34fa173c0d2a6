//! `bento transitions` and `bento set-status`.
//!
//! Both drive a [`StatusController`] end to end: fetch the server's
//! valid transitions, pick one, confirm, submit.

use std::io::{self, Write};

use bento_client::{
    ClientError, MenuOutcome, ReportsApi, StatusController, Transport,
};
use bento_core::{ReportId, ReportStatus};

pub fn transitions(transport: &Transport, report: ReportId) -> Result<(), ClientError> {
    let api = ReportsApi::new(transport);
    // The placeholder status is replaced by the server's view on fetch.
    let mut controller = StatusController::new(api, report, ReportStatus::Draft);

    match controller.open_menu()? {
        MenuOutcome::NoActions => {
            println!("no actions available for the {}", controller.report());
        }
        MenuOutcome::Transitions(list) => {
            println!("report:  {}", controller.report());
            println!("status:  {}", controller.status());
            if let Some(role) = controller.role() {
                println!("role:    {}", role);
            }
            println!("valid transitions:");
            for target in list {
                println!("  {} -> {}", controller.status(), target);
            }
        }
    }
    Ok(())
}

pub fn set_status(
    transport: &Transport,
    report: ReportId,
    target: ReportStatus,
    comment: Option<String>,
    assume_yes: bool,
) -> Result<(), ClientError> {
    let api = ReportsApi::new(transport);
    let mut controller = StatusController::new(api, report, ReportStatus::Draft);

    match controller.open_menu()? {
        MenuOutcome::NoActions => {
            println!("no actions available for the {}", controller.report());
            return Err(ClientError::InvalidTransition { target });
        }
        MenuOutcome::Transitions(_) => {}
    }

    controller.select_transition(target)?;

    if !assume_yes && !confirm_prompt(controller.status(), target) {
        controller.cancel()?;
        println!("aborted");
        return Ok(());
    }

    let new_status = controller.confirm(comment)?;
    println!("status changed: {}", new_status);
    Ok(())
}

/// Ask for confirmation on stdin. Anything but an explicit yes aborts.
fn confirm_prompt(current: ReportStatus, target: ReportStatus) -> bool {
    eprint!("change status {} -> {}? [y/N] ", current, target);
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

//! Report status workflow controller.
//!
//! One controller instance drives the status-change flow for one report:
//!
//! ```text
//! Idle → FetchingTransitions → TransitionsReady → ConfirmPending → Submitting → Idle
//! ```
//!
//! Key invariant: the transition graph is server-authoritative. The
//! controller holds only a per-interaction cache of the transitions the
//! server offered, invalidated after every successful status change so
//! the next menu open re-fetches under the then-current permissions.
//! Each operation is guarded on the state it is valid from; calling an
//! operation from any other state is an error, never a partial effect.

use std::fmt;

use bento_core::{ReportId, ReportStatus, StatusChangeRequest};

use crate::error::ClientError;
use crate::reports::ReportsBackend;

/// Client-side state of one report's status-change flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    FetchingTransitions,
    TransitionsReady,
    ConfirmPending,
    Submitting,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControllerState::Idle => "idle",
            ControllerState::FetchingTransitions => "fetching transitions",
            ControllerState::TransitionsReady => "transitions ready",
            ControllerState::ConfirmPending => "awaiting confirmation",
            ControllerState::Submitting => "submitting",
        })
    }
}

/// Result of opening the transition menu.
///
/// An empty transition list is not an error: the server answered, the
/// caller simply has nothing it may do. This is kept distinct from
/// fetch failures, which surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Transitions the user may pick from, in server order.
    Transitions(Vec<ReportStatus>),
    /// The server offered no actions for this user and report.
    NoActions,
}

/// Transitions cached for the current mount of this report.
#[derive(Debug, Clone, Default)]
struct CachedTransitions {
    transitions: Vec<ReportStatus>,
    role: Option<String>,
}

/// Drives the status-change flow for a single report.
pub struct StatusController<B: ReportsBackend> {
    backend: B,
    report: ReportId,
    status: ReportStatus,
    state: ControllerState,
    cached: Option<CachedTransitions>,
    selected: Option<ReportStatus>,
}

impl<B: ReportsBackend> StatusController<B> {
    /// Create a controller for `report`, whose last known status is
    /// `status` (display value only; the server view wins on fetch).
    pub fn new(backend: B, report: ReportId, status: ReportStatus) -> Self {
        StatusController {
            backend,
            report,
            status,
            state: ControllerState::Idle,
            cached: None,
            selected: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The cached status shown to the user. Advanced only after the
    /// server confirms a transition, or synced from a transitions fetch.
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn report(&self) -> &ReportId {
        &self.report
    }

    /// The caller's effective role, as reported by the last fetch.
    pub fn role(&self) -> Option<&str> {
        self.cached.as_ref().and_then(|c| c.role.as_deref())
    }

    /// The currently offered transitions, in server order.
    pub fn transitions(&self) -> &[ReportStatus] {
        self.cached
            .as_ref()
            .map(|c| c.transitions.as_slice())
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<ReportStatus> {
        self.selected
    }

    /// Open the transition menu. Valid only from `Idle`.
    ///
    /// The first open in a mount fetches the valid transitions from the
    /// server; later opens reuse the cache until a status change
    /// invalidates it. A fetch failure caches an empty list, so a
    /// repeated click reports [`MenuOutcome::NoActions`] instead of
    /// storming the endpoint.
    pub fn open_menu(&mut self) -> Result<MenuOutcome, ClientError> {
        self.guard("open_menu", &[ControllerState::Idle])?;
        // Liquidation without a category never reaches the network.
        self.report.validate()?;

        if let Some(cached) = &self.cached {
            if cached.transitions.is_empty() {
                return Ok(MenuOutcome::NoActions);
            }
            self.state = ControllerState::TransitionsReady;
            return Ok(MenuOutcome::Transitions(cached.transitions.clone()));
        }

        self.state = ControllerState::FetchingTransitions;
        match self.backend.valid_transitions(&self.report) {
            Ok(result) => {
                // The server's view of the current status is authoritative.
                self.status = result.current_status;
                let cached = CachedTransitions {
                    transitions: result.valid_transitions,
                    role: Some(result.role),
                };
                let outcome = if cached.transitions.is_empty() {
                    self.state = ControllerState::Idle;
                    MenuOutcome::NoActions
                } else {
                    self.state = ControllerState::TransitionsReady;
                    MenuOutcome::Transitions(cached.transitions.clone())
                };
                self.cached = Some(cached);
                Ok(outcome)
            }
            Err(e) => {
                self.cached = Some(CachedTransitions::default());
                self.state = ControllerState::Idle;
                Err(e)
            }
        }
    }

    /// Record the chosen target status and open the confirmation step.
    /// Valid only from `TransitionsReady`; the target must be one of the
    /// offered transitions.
    pub fn select_transition(&mut self, target: ReportStatus) -> Result<(), ClientError> {
        self.guard("select_transition", &[ControllerState::TransitionsReady])?;
        if !self.transitions().contains(&target) {
            return Err(ClientError::InvalidTransition { target });
        }
        self.selected = Some(target);
        self.state = ControllerState::ConfirmPending;
        Ok(())
    }

    /// Execute the confirmed transition. Valid only from `ConfirmPending`.
    ///
    /// On success the cached status advances to the target and the
    /// transition cache is cleared: the valid next states likely changed,
    /// so the next [`open_menu`](Self::open_menu) must re-fetch. On
    /// failure the cached status is left untouched and the server's
    /// detail message propagates to the caller.
    pub fn confirm(&mut self, comments: Option<String>) -> Result<ReportStatus, ClientError> {
        self.guard("confirm", &[ControllerState::ConfirmPending])?;
        let target = self.selected.take().ok_or(ClientError::InvalidState {
            operation: "confirm",
            state: self.state.to_string(),
        })?;

        self.state = ControllerState::Submitting;
        let change = StatusChangeRequest {
            new_status: target,
            comments,
        };
        match self.backend.change_status(&self.report, &change) {
            Ok(()) => {
                self.status = target;
                self.cached = None;
                self.state = ControllerState::Idle;
                Ok(target)
            }
            Err(e) => {
                self.state = ControllerState::Idle;
                Err(e)
            }
        }
    }

    /// Discard any pending selection and close the menu or dialog.
    pub fn cancel(&mut self) -> Result<(), ClientError> {
        self.guard(
            "cancel",
            &[
                ControllerState::TransitionsReady,
                ControllerState::ConfirmPending,
            ],
        )?;
        self.selected = None;
        self.state = ControllerState::Idle;
        Ok(())
    }

    fn guard(
        &self,
        operation: &'static str,
        valid_from: &[ControllerState],
    ) -> Result<(), ClientError> {
        if valid_from.contains(&self.state) {
            Ok(())
        } else {
            Err(ClientError::InvalidState {
                operation,
                state: self.state.to_string(),
            })
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

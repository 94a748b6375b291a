// Console controller: selection state, enablement rules and the date/report flow
//
// All state the browser client kept in globals lives here so it can be driven
// and inspected from tests. Network calls go through `ReportClient`; the
// controller only applies their outcomes.

use chrono::NaiveDate;
use common::export::{export_filename, save_to_dir, Branding, ExportFormat};
use common::models::{ExecutionDate, ReportFilter, ReportRow, User};
use futures::future::{AbortHandle, AbortRegistration};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::catalog::{ReportCatalog, COLLABORATOR_REPORT};
use crate::client::ReportClient;
use crate::errors::{ClientError, ConsoleError};
use crate::messages;
use crate::render;
use crate::users::UserDirectory;

/// Where the console is in the query flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    /// Report type or environment still missing
    Idle,
    /// Filters complete; dates can be looked up
    ReadyToQuery,
    LoadingDates,
    /// Dates listed, none chosen yet
    DatesLoaded,
    ReadyToGenerate,
    Generating,
    Rendered,
    Canceled,
    Failed,
}

/// Visibility and enablement of the console controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub report_selector_visible: bool,
    pub query_dates_enabled: bool,
    pub date_select_enabled: bool,
    pub generate_enabled: bool,
    pub loading_overlay: bool,
    pub exports_available: bool,
}

/// Rows fetched for one execution, kept for rendering and export
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    pub report_name: String,
    /// Execution id as selected, e.g. `"7"`
    pub execution_id: String,
    /// Label of the selected date, e.g. `"007 2024-05-01"`
    pub date_label: String,
    pub rows: Vec<ReportRow>,
}

/// An armed report generation. Pass `registration` to
/// [`ReportClient::fetch_rows`] and the outcome back with `id`.
#[derive(Debug)]
pub struct GenerationTicket {
    pub id: u64,
    pub execution_id: String,
    pub registration: AbortRegistration,
    abort_handle: AbortHandle,
}

impl GenerationTicket {
    /// Handle that cancels this generation from another task
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    report_name: String,
    date: ExecutionDate,
    abort_handle: AbortHandle,
}

#[derive(Debug)]
pub struct ConsoleController {
    users: UserDirectory,
    catalog: ReportCatalog,
    current_user: User,
    selected_report: Option<String>,
    selected_environment: Option<String>,
    dates: Vec<ExecutionDate>,
    selected_date: Option<ExecutionDate>,
    results: Option<ReportResult>,
    title: String,
    status_message: Option<String>,
    state: ConsoleState,
    in_flight: Option<InFlight>,
    next_generation: u64,
}

impl ConsoleController {
    /// Start with the first listed user (or the placeholder)
    pub fn new(users: UserDirectory) -> Self {
        let current_user = users.default_user();
        let mut controller = Self {
            users,
            catalog: ReportCatalog,
            current_user,
            selected_report: None,
            selected_environment: None,
            dates: Vec::new(),
            selected_date: None,
            results: None,
            title: String::new(),
            status_message: None,
            state: ConsoleState::Idle,
            in_flight: None,
            next_generation: 1,
        };
        controller.apply_role();
        controller
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    pub fn users(&self) -> &[User] {
        self.users.users()
    }

    pub fn selected_report(&self) -> Option<&str> {
        self.selected_report.as_deref()
    }

    pub fn selected_environment(&self) -> Option<&str> {
        self.selected_environment.as_deref()
    }

    pub fn dates(&self) -> &[ExecutionDate] {
        &self.dates
    }

    pub fn selected_date(&self) -> Option<&ExecutionDate> {
        self.selected_date.as_ref()
    }

    pub fn results(&self) -> Option<&ReportResult> {
        self.results.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn description(&self) -> String {
        self.catalog.description(&self.current_user)
    }

    /// Report names offered to the current user
    pub fn available_reports(&self) -> &'static [&'static str] {
        self.catalog.reports_for(self.current_user.role)
    }

    pub fn controls(&self) -> Controls {
        let busy = self.is_busy();
        Controls {
            report_selector_visible: !self.current_user.is_collaborator(),
            query_dates_enabled: self.can_query_dates(),
            date_select_enabled: !busy && !self.dates.is_empty(),
            generate_enabled: self.can_generate(),
            loading_overlay: self.state == ConsoleState::Generating,
            exports_available: self.results.as_ref().is_some_and(|r| !r.rows.is_empty()),
        }
    }

    fn is_busy(&self) -> bool {
        matches!(self.state, ConsoleState::LoadingDates | ConsoleState::Generating)
    }

    // ------------------------------------------------------------------
    // User and filter selection
    // ------------------------------------------------------------------

    /// Make another listed user current. Everything selected under the
    /// previous user is dropped and any running generation is aborted.
    #[instrument(skip(self))]
    pub fn switch_user(&mut self, username: &str) -> Result<(), ConsoleError> {
        let user = self
            .users
            .find(username)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownUser(username.to_string()))?;

        if self.cancel_generation() {
            self.in_flight = None;
        }
        self.current_user = user;
        self.selected_report = None;
        self.reset_date_selection();
        self.status_message = None;
        self.apply_role();

        info!(user = %self.current_user.username, role = ?self.current_user.role, "Active user switched");
        Ok(())
    }

    /// Collaborators have their report fixed; everyone else picks one
    fn apply_role(&mut self) {
        if self.current_user.is_collaborator() {
            self.selected_report = Some(COLLABORATOR_REPORT.to_string());
        }
        self.refresh_filter_state();
    }

    pub fn select_report(&mut self, report: &str) -> Result<(), ConsoleError> {
        self.ensure_not_busy("change the report")?;
        if self.current_user.is_collaborator() || !self.catalog.allows(self.current_user.role, report) {
            return Err(ConsoleError::ReportNotAllowed(report.to_string()));
        }

        self.selected_report = Some(report.to_string());
        self.reset_date_selection();
        self.refresh_filter_state();
        Ok(())
    }

    pub fn select_environment(&mut self, environment: &str) -> Result<(), ConsoleError> {
        self.ensure_not_busy("change the environment")?;

        self.selected_environment = Some(environment.to_string()).filter(|e| !e.is_empty());
        self.reset_date_selection();
        self.refresh_filter_state();
        Ok(())
    }

    fn reset_date_selection(&mut self) {
        self.dates.clear();
        self.selected_date = None;
        self.results = None;
        self.title.clear();
    }

    fn refresh_filter_state(&mut self) {
        self.state = if self.filters_complete() {
            ConsoleState::ReadyToQuery
        } else {
            ConsoleState::Idle
        };
    }

    fn filters_complete(&self) -> bool {
        self.current_user.role.is_some()
            && self.selected_report.is_some()
            && self.selected_environment.is_some()
    }

    fn ensure_not_busy(&self, action: &'static str) -> Result<(), ConsoleError> {
        if self.is_busy() {
            return Err(ConsoleError::InvalidTransition {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Filter for the date lookup; the entity is always the user's organization
    pub fn current_filter(&self) -> Option<ReportFilter> {
        ReportFilter::from_parts(
            Some(self.current_user.organization.clone()),
            self.selected_report.clone(),
            self.selected_environment.clone(),
        )
        .ok()
    }

    // ------------------------------------------------------------------
    // Date lookup
    // ------------------------------------------------------------------

    pub fn can_query_dates(&self) -> bool {
        !self.is_busy() && self.filters_complete()
    }

    pub fn begin_date_lookup(&mut self) -> Result<ReportFilter, ConsoleError> {
        let invalid = ConsoleError::InvalidTransition {
            action: "look up dates",
            state: self.state,
        };
        if !self.can_query_dates() {
            return Err(invalid);
        }
        let filter = self.current_filter().ok_or(invalid)?;

        self.reset_date_selection();
        self.status_message = None;
        self.state = ConsoleState::LoadingDates;
        Ok(filter)
    }

    /// Apply the outcome of a date lookup. A failure leaves an empty list.
    pub fn finish_date_lookup(&mut self, outcome: Result<Vec<ExecutionDate>, ClientError>) {
        if self.state != ConsoleState::LoadingDates {
            warn!(state = ?self.state, "Discarding date lookup result");
            return;
        }

        match outcome {
            Ok(dates) => {
                info!(count = dates.len(), "Execution dates loaded");
                if dates.is_empty() {
                    self.status_message = Some(messages::NO_DATES_AVAILABLE.to_string());
                }
                self.dates = dates;
                self.state = ConsoleState::DatesLoaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching dates");
                self.dates.clear();
                self.status_message = Some(messages::DATES_LOOKUP_FAILED.to_string());
                self.state = ConsoleState::ReadyToQuery;
            }
        }
    }

    /// Look up dates for the current filters
    pub async fn lookup_dates(&mut self, client: &ReportClient) -> Result<&[ExecutionDate], ConsoleError> {
        let filter = self.begin_date_lookup()?;
        let outcome = client.fetch_dates(&filter).await;
        self.finish_date_lookup(outcome);
        Ok(&self.dates)
    }

    // ------------------------------------------------------------------
    // Date selection and generation
    // ------------------------------------------------------------------

    pub fn select_date(&mut self, execution_id: i32) -> Result<(), ConsoleError> {
        self.ensure_not_busy("select a date")?;
        let date = self
            .dates
            .iter()
            .find(|d| d.id == execution_id)
            .cloned()
            .ok_or(ConsoleError::UnknownExecution(execution_id))?;

        self.selected_date = Some(date);
        if self.state == ConsoleState::DatesLoaded {
            self.state = ConsoleState::ReadyToGenerate;
        }
        Ok(())
    }

    /// Go back to the "choose a date" placeholder
    pub fn clear_date(&mut self) -> Result<(), ConsoleError> {
        self.ensure_not_busy("clear the date")?;
        self.selected_date = None;
        if !self.dates.is_empty() {
            self.state = ConsoleState::DatesLoaded;
        }
        Ok(())
    }

    pub fn can_generate(&self) -> bool {
        !self.is_busy() && self.selected_date.is_some() && self.selected_report.is_some()
    }

    /// Arm a generation: clears the previous results, disables generate and
    /// shows the overlay until [`complete_generation`](Self::complete_generation)
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, ConsoleError> {
        let invalid = ConsoleError::InvalidTransition {
            action: "generate the report",
            state: self.state,
        };
        if !self.can_generate() {
            return Err(invalid);
        }
        let (Some(date), Some(report_name)) = (self.selected_date.clone(), self.selected_report.clone()) else {
            return Err(invalid);
        };

        let (abort_handle, registration) = AbortHandle::new_pair();
        let id = self.next_generation;
        self.next_generation += 1;

        self.results = None;
        self.status_message = None;
        self.state = ConsoleState::Generating;
        self.in_flight = Some(InFlight {
            id,
            report_name,
            date: date.clone(),
            abort_handle: abort_handle.clone(),
        });

        info!(generation = id, execution_id = date.id, "Report generation started");
        Ok(GenerationTicket {
            id,
            execution_id: date.id.to_string(),
            registration,
            abort_handle,
        })
    }

    /// Abort the running generation, if any. Returns whether one was running.
    pub fn cancel_generation(&mut self) -> bool {
        match &self.in_flight {
            Some(in_flight) => {
                in_flight.abort_handle.abort();
                true
            }
            None => false,
        }
    }

    /// Apply the outcome of generation `id`. Outcomes of generations that are
    /// no longer current (for example after a user switch) are dropped.
    pub fn complete_generation(&mut self, id: u64, outcome: Result<Vec<ReportRow>, ClientError>) {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.id == id && self.state == ConsoleState::Generating => in_flight,
            other => {
                self.in_flight = other;
                warn!(generation = id, "Discarding stale generation result");
                return;
            }
        };

        match outcome {
            Ok(rows) => {
                info!(generation = id, row_count = rows.len(), "Report rendered");
                self.title = in_flight.report_name.clone();
                if rows.is_empty() {
                    self.status_message = Some(messages::NO_DATA.to_string());
                }
                self.results = Some(ReportResult {
                    report_name: in_flight.report_name,
                    execution_id: in_flight.date.id.to_string(),
                    date_label: in_flight.date.label,
                    rows,
                });
                self.state = ConsoleState::Rendered;
            }
            Err(ClientError::Canceled) => {
                info!(generation = id, "Report generation was canceled by the user");
                self.results = None;
                self.title = messages::GENERATION_CANCELED.to_string();
                self.state = ConsoleState::Canceled;
            }
            Err(e) => {
                tracing::error!(generation = id, error = %e, "Error fetching report data");
                self.results = None;
                self.status_message = Some(messages::GENERATION_FAILED.to_string());
                self.state = ConsoleState::Failed;
            }
        }
    }

    /// Fetch and apply the report for the selected date
    pub async fn generate(&mut self, client: &ReportClient) -> Result<ConsoleState, ConsoleError> {
        let ticket = self.begin_generation()?;
        let outcome = client.fetch_rows(&ticket.execution_id, ticket.registration).await;
        self.complete_generation(ticket.id, outcome);
        Ok(self.state)
    }

    // ------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------

    /// HTML of the result area; `None` before any report has been fetched
    pub fn render_html(&self) -> Result<Option<String>, ConsoleError> {
        self.results
            .as_ref()
            .map(|result| render::report_card(&result.report_name, &result.rows))
            .transpose()
    }

    /// Write the displayed dataset to `dir` and return the file path
    #[instrument(skip(self, dir, branding))]
    pub fn export(
        &self,
        format: ExportFormat,
        dir: &Path,
        generated_on: NaiveDate,
        branding: &Branding,
    ) -> Result<PathBuf, ConsoleError> {
        let result = self
            .results
            .as_ref()
            .filter(|r| !r.rows.is_empty())
            .ok_or(ConsoleError::NothingToExport)?;

        let file_name = export_filename(&result.report_name, &result.execution_id, &result.date_label, format);
        let document = branding.document(&result.report_name, &result.rows, generated_on);

        Ok(save_to_dir(format, &document, dir, &file_name)?)
    }
}

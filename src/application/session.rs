use crate::application::render::{RenderOutcome, RenderRequest};
use crate::application::system::SystemHandle;
use crate::domain::market::{COMPANIES, Company};
use crossbeam_channel::Receiver;
use std::collections::VecDeque;
use tracing::warn;

const MAX_LOG_LINES: usize = 200;

/// UI-side state of the dashboard page. Turns widget interactions into
/// render requests and keeps the latest outcome for the selected company.
pub struct DashboardSession {
    handle: SystemHandle,
    log_rx: Receiver<String>,
    selected: usize,
    in_flight: usize,
    pub outcome: Option<RenderOutcome>,
    pub logs: VecDeque<String>,
}

impl DashboardSession {
    /// Creates the session and requests the first render for the first company.
    pub fn new(handle: SystemHandle, log_rx: Receiver<String>) -> Self {
        let mut session = Self {
            handle,
            log_rx,
            selected: 0,
            in_flight: 0,
            outcome: None,
            logs: VecDeque::new(),
        };
        session.submit(RenderRequest::render(session.selected_company().symbol));
        session
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_company(&self) -> &'static Company {
        &COMPANIES[self.selected]
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Selecting another company re-renders the page for it.
    pub fn select(&mut self, index: usize) {
        if index == self.selected || index >= COMPANIES.len() {
            return;
        }
        self.selected = index;
        self.outcome = None;
        self.submit(RenderRequest::render(self.selected_company().symbol));
    }

    pub fn request_prediction(&mut self) {
        self.submit(RenderRequest::predict(self.selected_company().symbol));
    }

    fn submit(&mut self, request: RenderRequest) {
        match self.handle.request_tx.try_send(request) {
            Ok(()) => self.in_flight += 1,
            Err(e) => warn!("Failed to queue render request: {}", e),
        }
    }

    /// Drains finished renders and new log lines. Outcomes for a company that
    /// is no longer selected are discarded.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.handle.outcome_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if outcome.request.symbol == self.selected_company().symbol {
                self.outcome = Some(outcome);
            }
        }

        while let Ok(line) = self.log_rx.try_recv() {
            if self.logs.len() == MAX_LOG_LINES {
                self.logs.pop_front();
            }
            self.logs.push_back(line.trim_end().to_string());
        }
    }
}

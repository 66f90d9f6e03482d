//! Export orchestration: validate, build the payload, deliver, notify

use list_export_core::{resolve_visible_columns, IdentityTranslator, Translator};

use crate::delivery::{ClockTokens, DeliveryChannel, DeliveryForm, TokenSource, EXPORT_ENDPOINT};
use crate::error::{ExportError, Result};
use crate::notify::{Notification, Notifier};
use crate::payload::ExportPayload;
use crate::selection::SelectionMode;
use crate::source::{RecordSource, DEFAULT_PAGE_SIZE};

/// Options for the export orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Route the delivery form posts to
    pub endpoint: String,
    /// Page size assumed when the record source reports none
    pub default_page_size: u64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            endpoint: EXPORT_ENDPOINT.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Phase of an export attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Validating,
    BuildingPayload,
    Delivering,
}

/// Result of a delivered export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub mode: SelectionMode,
    pub payload: ExportPayload,
    pub token: String,
}

/// Runs one export per user action.
///
/// Every attempt walks `Idle -> Validating -> BuildingPayload -> Delivering`
/// and ends back in `Idle`, whether it succeeds or is rejected.
pub struct ExportOrchestrator<'a> {
    options: ExportOptions,
    translator: &'a dyn Translator,
    tokens: Box<dyn TokenSource + 'a>,
    state: ExportState,
    observer: Option<Box<dyn FnMut(ExportState) + 'a>>,
}

impl Default for ExportOrchestrator<'static> {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl<'a> ExportOrchestrator<'a> {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            translator: &IdentityTranslator,
            tokens: Box::new(ClockTokens::new()),
            state: ExportState::Idle,
            observer: None,
        }
    }

    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_token_source<T: TokenSource + 'a>(mut self, tokens: T) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    /// Call `observer` with every phase entered, in order
    pub fn with_state_observer<F: FnMut(ExportState) + 'a>(mut self, observer: F) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Current phase
    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Export the current selection of `source`.
    ///
    /// Validation failures are reported to `notifier` as warnings and
    /// returned as [`ExportError::EmptySelection`] or
    /// [`ExportError::NoExportableColumns`]; nothing is delivered then.
    pub fn export(
        &mut self,
        source: &dyn RecordSource,
        channel: &mut dyn DeliveryChannel,
        notifier: &mut dyn Notifier,
        csrf_token: &str,
    ) -> Result<ExportOutcome> {
        let result = self.run(source, channel, notifier, csrf_token);
        self.transition(ExportState::Idle);

        if let Err(err) = &result {
            if err.is_user_warning() {
                log::warn!("export of {} aborted: {}", source.model(), err);
                let message = self.translator.translate(&err.to_string()).into_owned();
                notifier.notify(Notification::warning(message));
            }
        }
        result
    }

    fn run(
        &mut self,
        source: &dyn RecordSource,
        channel: &mut dyn DeliveryChannel,
        notifier: &mut dyn Notifier,
        csrf_token: &str,
    ) -> Result<ExportOutcome> {
        self.transition(ExportState::Validating);

        let selection = source.selection();
        if selection.is_empty() {
            return Err(ExportError::EmptySelection);
        }

        let columns = resolve_visible_columns(source.view_columns(), source.fields());
        if columns.is_empty() {
            return Err(ExportError::NoExportableColumns);
        }

        let page_size = source
            .page_size()
            .filter(|&size| size > 0)
            .unwrap_or(self.options.default_page_size);
        let mode = SelectionMode::detect(
            selection.len() as u64,
            page_size,
            source.total_count(),
            source.full_set_signal(),
        );

        self.transition(ExportState::BuildingPayload);

        let payload = ExportPayload {
            model: source.model().to_string(),
            headers: columns.iter().map(|c| c.label.clone()).collect(),
            field_names: columns.iter().map(|c| c.name.clone()).collect(),
            domain: source.domain().clone(),
            context: source.context().clone(),
            selected_ids: selection.iter().map(|r| r.id).collect(),
            is_domain_selected: mode.is_full_set(),
            total_count: source.total_count(),
        };
        let data = payload.to_json()?;

        self.transition(ExportState::Delivering);

        let token = self.tokens.next_token();
        channel.deliver(DeliveryForm {
            endpoint: self.options.endpoint.clone(),
            payload: data,
            token: token.clone(),
            csrf_token: csrf_token.to_string(),
        });
        log::info!(
            "delivered export of {} ({} columns, {:?})",
            payload.model,
            columns.len(),
            mode
        );

        notifier.notify(Notification::success(self.success_message(mode)));

        Ok(ExportOutcome {
            mode,
            payload,
            token,
        })
    }

    fn success_message(&self, mode: SelectionMode) -> String {
        match mode {
            SelectionMode::FullSet { total } => self
                .translator
                .translate_with("Exporting all %s records to Excel...", &[&total]),
            SelectionMode::Explicit { count } => self
                .translator
                .translate_with("Exporting %s record(s) to Excel...", &[&count]),
        }
    }

    fn transition(&mut self, next: ExportState) {
        log::debug!("export state {:?} -> {:?}", self.state, next);
        self.state = next;
        if let Some(observer) = self.observer.as_mut() {
            observer(next);
        }
    }
}

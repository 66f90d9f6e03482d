//! Handing the payload to the browser-side download mechanism

use chrono::Utc;

/// Server route that renders the export
pub const EXPORT_ENDPOINT: &str = "/web/export/current_list_xls";

/// The hidden form posted to the export endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryForm {
    /// Target route
    pub endpoint: String,
    /// JSON-serialized [`ExportPayload`](crate::ExportPayload)
    pub payload: String,
    /// Per-request token, echoed back in the `fileToken` cookie
    pub token: String,
    /// Anti-forgery credential of the session
    pub csrf_token: String,
}

impl DeliveryForm {
    /// Form fields in submission order
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("data", self.payload.as_str()),
            ("token", self.token.as_str()),
            ("csrf_token", self.csrf_token.as_str()),
        ]
    }
}

/// Turns a delivery form into a download. Fire-and-forget.
pub trait DeliveryChannel {
    fn deliver(&mut self, form: DeliveryForm);
}

/// Collects forms instead of submitting them
impl DeliveryChannel for Vec<DeliveryForm> {
    fn deliver(&mut self, form: DeliveryForm) {
        self.push(form);
    }
}

/// Source of per-request tokens
pub trait TokenSource {
    fn next_token(&mut self) -> String;
}

impl<F: FnMut() -> String> TokenSource for F {
    fn next_token(&mut self) -> String {
        self()
    }
}

/// Millisecond timestamps, strictly increasing within one source
#[derive(Debug, Default)]
pub struct ClockTokens {
    last: i64,
}

impl ClockTokens {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for ClockTokens {
    fn next_token(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last.to_string()
    }
}

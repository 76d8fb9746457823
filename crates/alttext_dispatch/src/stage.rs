//! Per-request stage tracking.

/// Where a request is in the dispatch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RequestStage {
    /// Request accepted
    Received,
    /// Content category chosen
    Classified,
    /// Instruction text built
    InstructionsSelected,
    /// Inline or remote upload chosen
    TransportPlanned,
    /// Payload ready to embed
    InlineReady,
    /// Upload in progress (or cache lookup)
    Uploading,
    /// Remote handle available
    Uploaded,
    /// Backend generation requested
    BackendCalled,
    /// Terminal success
    Succeeded,
    /// Terminal failure
    Failed,
}

impl RequestStage {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStage::Succeeded | RequestStage::Failed)
    }

    fn permits(&self, next: RequestStage) -> bool {
        use RequestStage::*;

        if self.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }
        // The inline and upload branches are exclusive.
        if *self == InlineReady && matches!(next, Uploading | Uploaded) {
            return false;
        }
        if next == BackendCalled && matches!(self, Uploading) {
            return false;
        }
        next > *self
    }
}

/// Records the stages one request passes through and refuses to move backwards.
#[derive(Debug, Clone)]
pub struct StageTracker {
    request_id: String,
    current: RequestStage,
    history: Vec<RequestStage>,
}

impl StageTracker {
    /// Start tracking a request in [`RequestStage::Received`].
    pub fn new(request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        tracing::debug!(request_id = %request_id, stage = %RequestStage::Received, "Request stage");
        Self {
            request_id,
            current: RequestStage::Received,
            history: vec![RequestStage::Received],
        }
    }

    /// Move to `next`. Returns `false`, leaving the stage unchanged, when the
    /// transition would re-enter an earlier stage or leave a terminal one.
    pub fn advance(&mut self, next: RequestStage) -> bool {
        if !self.current.permits(next) {
            tracing::warn!(
                request_id = %self.request_id,
                from = %self.current,
                to = %next,
                "Refused stage transition"
            );
            return false;
        }
        tracing::debug!(request_id = %self.request_id, stage = %next, "Request stage");
        self.current = next;
        self.history.push(next);
        true
    }

    /// Current stage.
    pub fn current(&self) -> RequestStage {
        self.current
    }

    /// Every stage entered so far, in order.
    pub fn history(&self) -> &[RequestStage] {
        &self.history
    }
}

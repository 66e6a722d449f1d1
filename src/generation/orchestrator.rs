use std::fmt;

use crate::{
    assets::{photo::Photo, source::AssetSource},
    generation::{
        outcome::GenerationOutcome,
        request::GenerationRequest,
        transport::{GenerationTransport, TransportError},
        wire::GenerationResponse,
    },
    selection::store::SelectionStore,
};

/// Identity of one generation attempt. Later attempts have larger epochs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptEpoch(pub u64);

impl fmt::Display for AttemptEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the current attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Preparing,
    AwaitingResponse,
    Complete(GenerationOutcome),
}

impl GenerationState {
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        match self {
            Self::Complete(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Preparing | Self::AwaitingResponse)
    }
}

/// An attempt that passed preparation and is ready to be submitted.
#[derive(Clone, Debug)]
pub struct PendingAttempt {
    pub epoch: AttemptEpoch,
    pub request: GenerationRequest,
}

/// Drives generation attempts and keeps only the newest attempt's result.
#[derive(Clone, Debug, Default)]
pub struct GenerationOrchestrator {
    state: GenerationState,
    epoch: u64,
}

impl GenerationOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Epoch of the most recent attempt or invalidation.
    pub fn epoch(&self) -> AttemptEpoch {
        AttemptEpoch(self.epoch)
    }

    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        self.state.outcome()
    }

    /// Start an attempt.
    ///
    /// Without a photo or with nothing selected this is a no-op returning `None`. If the request
    /// cannot be assembled the attempt completes immediately as a failure and `None` is returned.
    pub fn begin(
        &mut self,
        photo: Option<&Photo>,
        store: &SelectionStore,
        source: &dyn AssetSource,
    ) -> Option<PendingAttempt> {
        let Some(photo) = photo else {
            tracing::debug!("generate ignored: no photo");
            return None;
        };
        if store.selection_count() == 0 {
            tracing::debug!("generate ignored: nothing selected");
            return None;
        }

        self.epoch += 1;
        let epoch = AttemptEpoch(self.epoch);
        self.state = GenerationState::Preparing;

        match GenerationRequest::assemble(photo, store, source) {
            Ok(Some(request)) => {
                self.state = GenerationState::AwaitingResponse;
                tracing::info!(
                    %epoch,
                    parts = request.parts.len(),
                    primary = %request.primary.id,
                    "generation attempt started"
                );
                Some(PendingAttempt { epoch, request })
            }
            Ok(None) => {
                self.state = GenerationState::Idle;
                None
            }
            Err(e) => {
                tracing::warn!(%epoch, error = %e, "generation request could not be prepared");
                self.state = GenerationState::Complete(GenerationOutcome::failure());
                None
            }
        }
    }

    /// Record the result of the attempt `epoch`.
    ///
    /// Returns `false` and discards the result if a newer attempt or an invalidation happened
    /// since.
    pub fn resolve(
        &mut self,
        epoch: AttemptEpoch,
        result: Result<GenerationResponse, TransportError>,
    ) -> bool {
        if epoch.0 != self.epoch || self.state != GenerationState::AwaitingResponse {
            tracing::debug!(%epoch, current = self.epoch, "stale generation result discarded");
            return false;
        }
        let outcome = GenerationOutcome::from_transport(result);
        tracing::info!(%epoch, outcome = outcome.kind(), "generation attempt finished");
        self.state = GenerationState::Complete(outcome);
        true
    }

    /// Drop any result and make in-flight attempts stale.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        if self.state != GenerationState::Idle {
            tracing::debug!(epoch = self.epoch, "generation result invalidated");
        }
        self.state = GenerationState::Idle;
    }

    /// Run one attempt end to end against `transport`.
    #[tracing::instrument(skip_all)]
    pub async fn generate(
        &mut self,
        photo: Option<&Photo>,
        store: &SelectionStore,
        source: &dyn AssetSource,
        transport: &dyn GenerationTransport,
    ) -> &GenerationState {
        if let Some(attempt) = self.begin(photo, store, source) {
            let result = transport.submit(&attempt.request).await;
            self.resolve(attempt.epoch, result);
        }
        &self.state
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generation/orchestrator.rs"]
mod tests;

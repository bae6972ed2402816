use crate::core::client::CheckClient;
use crate::core::models::{CheckRequest, CheckResult, ModelTier};

/// Lifecycle of the single verdict slot. No terminal state; the controller
/// is reusable indefinitely.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Pending,
    Success(CheckResult),
    Failed(String),
}

/// The four request fields, held as one value and only mutated through
/// [`Event::FieldChanged`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckForm {
    pub tenant_id: Option<String>,
    pub user_id: String,
    pub model_id: String,
    pub model_tier: ModelTier,
}

impl CheckForm {
    /// Snapshot the form into an outbound request. No validation: empty
    /// strings are sent as-is.
    pub fn to_request(&self) -> CheckRequest {
        CheckRequest {
            tenant_id: self.tenant_id.clone(),
            user_id: self.user_id.clone(),
            model_id: self.model_id.clone(),
            model_tier: self.model_tier,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    Tenant(Option<String>),
    User(String),
    Model(String),
    Tier(ModelTier),
}

/// Discrete transitions. Response events carry the sequence number of the
/// submission they belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FieldChanged(FieldChange),
    SubmitRequested { seq: u64 },
    ResponseReceived { seq: u64, result: CheckResult },
    ResponseFailed { seq: u64, message: String },
}

/// Owns one in-flight check at a time and the verdict slot it resolves into.
///
/// Overlap policy: last submission wins. Every submission takes a fresh
/// monotonically increasing sequence number, and a response event whose
/// sequence is older than the latest submission is discarded, so a slow
/// response from a superseded submission can never overwrite a newer one.
pub struct CheckController {
    client: CheckClient,
    form: CheckForm,
    phase: Phase,
    latest_seq: u64,
}

impl CheckController {
    pub fn new(client: CheckClient, form: CheckForm) -> Self {
        Self {
            client,
            form,
            phase: Phase::Idle,
            latest_seq: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn form(&self) -> &CheckForm {
        &self.form
    }

    /// Start a new submission: clears any prior result or error immediately,
    /// before the network call resolves. Returns the submission's sequence.
    pub fn begin(&mut self) -> u64 {
        let seq = self.latest_seq + 1;
        self.apply(Event::SubmitRequested { seq });
        seq
    }

    /// Apply one transition to the controller state. Stale response events
    /// are ignored; everything else replaces the relevant slot wholesale.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::FieldChanged(change) => match change {
                FieldChange::Tenant(value) => self.form.tenant_id = value,
                FieldChange::User(value) => self.form.user_id = value,
                FieldChange::Model(value) => self.form.model_id = value,
                FieldChange::Tier(value) => self.form.model_tier = value,
            },
            Event::SubmitRequested { seq } => {
                if seq <= self.latest_seq {
                    return;
                }
                self.latest_seq = seq;
                self.phase = Phase::Pending;
            }
            Event::ResponseReceived { seq, result } => {
                if seq != self.latest_seq {
                    return;
                }
                self.phase = Phase::Success(result);
            }
            Event::ResponseFailed { seq, message } => {
                if seq != self.latest_seq {
                    return;
                }
                self.phase = Phase::Failed(message);
            }
        }
    }

    /// Submit the current form contents and resolve the outcome into the
    /// next phase. Never returns an error to the caller; every failure lands
    /// in [`Phase::Failed`] with the message rules of the wire contract.
    pub async fn submit(&mut self) {
        let seq = self.begin();
        let request = self.form.to_request();
        match self.client.check(&request).await {
            Ok(result) => self.apply(Event::ResponseReceived { seq, result }),
            Err(err) => self.apply(Event::ResponseFailed {
                seq,
                message: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CheckForm {
        CheckForm {
            tenant_id: Some("enterprise_co".to_string()),
            user_id: "ent-user-1".to_string(),
            model_id: "gpt-4o".to_string(),
            model_tier: ModelTier::Premium,
        }
    }

    fn controller() -> CheckController {
        CheckController::new(CheckClient::new("http://localhost:8000/rate-limit/check"), form())
    }

    fn result(count: u64) -> CheckResult {
        CheckResult {
            allowed: true,
            count,
            limit: 100,
            window_seconds: 3600,
            cause: None,
            fulfilled: Some(vec![]),
        }
    }

    #[test]
    fn starts_idle() {
        assert_eq!(*controller().phase(), Phase::Idle);
    }

    #[test]
    fn field_changes_update_form_without_touching_phase() {
        let mut ctrl = controller();
        ctrl.apply(Event::FieldChanged(FieldChange::User("free-user-1".to_string())));
        ctrl.apply(Event::FieldChanged(FieldChange::Tier(ModelTier::Free)));
        ctrl.apply(Event::FieldChanged(FieldChange::Tenant(None)));
        assert_eq!(ctrl.form().user_id, "free-user-1");
        assert_eq!(ctrl.form().model_tier, ModelTier::Free);
        assert_eq!(ctrl.form().tenant_id, None);
        assert_eq!(*ctrl.phase(), Phase::Idle);
    }

    #[test]
    fn form_snapshot_omits_nothing() {
        let req = form().to_request();
        assert_eq!(req.tenant_id.as_deref(), Some("enterprise_co"));
        assert_eq!(req.user_id, "ent-user-1");
        assert_eq!(req.model_id, "gpt-4o");
        assert_eq!(req.model_tier, ModelTier::Premium);
    }

    #[test]
    fn begin_enters_pending() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        assert_eq!(seq, 1);
        assert_eq!(*ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn response_resolves_to_success() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        ctrl.apply(Event::ResponseReceived { seq, result: result(5) });
        assert_eq!(*ctrl.phase(), Phase::Success(result(5)));
    }

    #[test]
    fn failure_resolves_to_failed() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        ctrl.apply(Event::ResponseFailed {
            seq,
            message: "Internal server error".to_string(),
        });
        assert_eq!(*ctrl.phase(), Phase::Failed("Internal server error".to_string()));
    }

    // No stale-result flash: a new submission clears the previous payload
    // before its own response arrives.
    #[test]
    fn begin_clears_previous_success() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        ctrl.apply(Event::ResponseReceived { seq, result: result(5) });
        ctrl.begin();
        assert_eq!(*ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn begin_clears_previous_failure() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        ctrl.apply(Event::ResponseFailed { seq, message: "boom".to_string() });
        ctrl.begin();
        assert_eq!(*ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn stale_response_is_discarded_while_pending() {
        let mut ctrl = controller();
        let first = ctrl.begin();
        let _second = ctrl.begin();
        ctrl.apply(Event::ResponseReceived { seq: first, result: result(1) });
        assert_eq!(*ctrl.phase(), Phase::Pending);
    }

    #[test]
    fn stale_response_cannot_overwrite_newer_resolution() {
        let mut ctrl = controller();
        let first = ctrl.begin();
        let second = ctrl.begin();
        ctrl.apply(Event::ResponseReceived { seq: second, result: result(2) });
        ctrl.apply(Event::ResponseFailed {
            seq: first,
            message: "too late".to_string(),
        });
        assert_eq!(*ctrl.phase(), Phase::Success(result(2)));
    }

    #[test]
    fn duplicate_submit_sequence_is_ignored() {
        let mut ctrl = controller();
        let seq = ctrl.begin();
        ctrl.apply(Event::ResponseReceived { seq, result: result(3) });
        ctrl.apply(Event::SubmitRequested { seq });
        assert_eq!(*ctrl.phase(), Phase::Success(result(3)));
    }

    #[test]
    fn controller_is_reusable_across_submissions() {
        let mut ctrl = controller();
        for count in 1..=3 {
            let seq = ctrl.begin();
            ctrl.apply(Event::ResponseReceived { seq, result: result(count) });
            assert_eq!(*ctrl.phase(), Phase::Success(result(count)));
        }
    }

    // Nothing is listening on port 9; the transport error's description must
    // land in Failed rather than propagate.
    #[tokio::test]
    async fn submit_surfaces_transport_failure_as_failed() {
        let client = CheckClient::new("http://127.0.0.1:9/rate-limit/check");
        let mut ctrl = CheckController::new(client, form());
        ctrl.submit().await;
        match ctrl.phase() {
            Phase::Failed(message) => assert!(!message.is_empty()),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}

use tokio_util::sync::CancellationToken;

/// Sequential handle for one API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Default)]
pub struct RequestSeq {
    next: u64,
}

impl RequestSeq {
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Request lanes. Each lane has at most one active request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Auth,
    Dashboard,
}

#[derive(Debug, Clone)]
pub struct RequestStarted {
    pub id: RequestId,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
pub struct RequestCompleted<E> {
    pub id: RequestId,
    pub result: E,
}

/// Request lifecycle state (stored in AppState, mutated only by reducer).
///
/// The reducer claims the id when it emits the effect; the runtime's
/// `RequestStarted` only attaches the cancellation token.
#[derive(Debug, Default, Clone)]
pub struct RequestState {
    pub active: Option<RequestId>,
    pub cancel: Option<CancellationToken>,
}

impl RequestState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, id: RequestId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Stores the token if `started` is still the active request.
    pub fn on_started(&mut self, started: &RequestStarted) -> bool {
        let ok = self.active == Some(started.id);
        if ok {
            self.cancel = Some(started.cancel.clone());
        }
        ok
    }

    pub fn finish_if_active(&mut self, id: RequestId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the active request and hands back its token for cancellation.
    pub fn take_cancel(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Requests {
    pub auth: RequestState,
    pub dashboard: RequestState,
}

impl Requests {
    pub fn state_mut(&mut self, kind: RequestKind) -> &mut RequestState {
        match kind {
            RequestKind::Auth => &mut self.auth,
            RequestKind::Dashboard => &mut self.dashboard,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.auth.is_running() || self.dashboard.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_completion_is_rejected() {
        let mut seq = RequestSeq::default();
        let mut state = RequestState::default();

        let first = seq.next_id();
        state.begin(first);
        let _ = state.take_cancel();

        let second = seq.next_id();
        state.begin(second);
        assert!(!state.finish_if_active(first));
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_started_for_superseded_request_is_ignored() {
        let mut state = RequestState::default();
        state.begin(RequestId(2));

        let stale = RequestStarted {
            id: RequestId(1),
            cancel: CancellationToken::new(),
        };
        assert!(!state.on_started(&stale));
        assert!(state.cancel.is_none());
    }
}

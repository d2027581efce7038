//! Lifecycle controller for a user's print/design requests.
//!
//! The controller owns the set of the current user's requests for one
//! request kind, derives status buckets from it, and performs the
//! state-transition actions (accept, decline, accept an auction response)
//! against the backend. Local state is only touched after the corresponding
//! network call; classification is recomputed from the list on demand.

use crate::auth::AuthContext;
use crate::error::{EncargoError, Result};
use crate::http::{ApiRequest, HttpClient};
use crate::kind::RequestKind;
use crate::request::{
    AuctionResponse, PrintRequest, RequestId, RequestStatus, ResponseId, StatusBuckets,
    UserRespondAck,
};

/// Where to send the user after accepting a quote.
///
/// The backend returns at most one of these; the embedding UI performs the
/// actual navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRedirect {
    /// A payment-preference identifier, shown on the preference route.
    Preference(String),
    /// A direct payment link.
    Link(String),
}

impl PaymentRedirect {
    /// The navigation target for this redirect.
    pub fn target(&self) -> String {
        match self {
            PaymentRedirect::Preference(id) => format!("/mp_pref/{}", id),
            PaymentRedirect::Link(link) => link.clone(),
        }
    }
}

/// Controller for one request kind's lifecycle.
///
/// Bound to a single [`RequestKind`]; viewing another kind means creating
/// another controller. All mutating operations take `&mut self`, so calls
/// are inherently sequential - there is no coordination, batching, or
/// cancellation across them.
///
/// # Example
/// ```ignore
/// let http = ReqwestHttpClient::new("https://api.example.com");
/// let auth = StaticAuth::logged_in(token);
/// let mut lifecycle = RequestLifecycle::new(RequestKind::PrintRequests, http, auth);
/// lifecycle.load().await;
/// let buckets = lifecycle.buckets();
/// ```
pub struct RequestLifecycle<H: HttpClient, A: AuthContext> {
    kind: RequestKind,
    http: H,
    auth: A,
    requests: Vec<PrintRequest>,
    responses: Vec<AuctionResponse>,
    expanded: Option<RequestId>,
}

impl<H: HttpClient, A: AuthContext> RequestLifecycle<H, A> {
    /// Create a controller for the given kind. Call [`load`](Self::load) to
    /// populate it.
    pub fn new(kind: RequestKind, http: H, auth: A) -> Self {
        Self {
            kind,
            http,
            auth,
            requests: Vec::new(),
            responses: Vec::new(),
            expanded: None,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// The current request list, as last fetched/reconciled.
    pub fn requests(&self) -> &[PrintRequest] {
        &self.requests
    }

    /// The auction responses from the last successful
    /// [`responses_for`](Self::responses_for) call.
    pub fn responses(&self) -> &[AuctionResponse] {
        &self.responses
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the current user's requests and replace the local list.
    ///
    /// On any failure (transport, non-2xx, unparseable body) the failure is
    /// logged and the list is left unchanged. No retry.
    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn load(&mut self) {
        match self.fetch_mine().await {
            Ok(requests) => {
                tracing::debug!(count = requests.len(), "Loaded requests");
                self.requests = requests;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch requests");
            }
        }
    }

    async fn fetch_mine(&self) -> Result<Vec<PrintRequest>> {
        let request = ApiRequest::get(format!("/{}/mine/", self.kind.resource()));
        let response = self.http.execute(&request, self.token().as_deref()).await?;
        if !response.is_success() {
            return Err(EncargoError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    // ------------------------------------------------------------------
    // Auction responses
    // ------------------------------------------------------------------

    /// Fetch the competing responses for one request.
    ///
    /// The parsed list is stored and returned on success. Failures are
    /// logged and yield an empty list; the previously stored responses are
    /// kept. Never surfaces an error to the caller.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, request_id = %request_id))]
    pub async fn responses_for(&mut self, request_id: RequestId) -> Vec<AuctionResponse> {
        let request = ApiRequest::get(format!(
            "/{}/{}/responses/",
            self.kind.resource(),
            request_id
        ));
        let result = async {
            let response = self.http.execute(&request, self.token().as_deref()).await?;
            if !response.is_success() {
                return Err(EncargoError::UnexpectedStatus {
                    status: response.status,
                    body: response.body,
                });
            }
            response.json::<Vec<AuctionResponse>>()
        }
        .await;

        match result {
            Ok(responses) => {
                self.responses = responses.clone();
                responses
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch auction responses");
                Vec::new()
            }
        }
    }

    /// Accept one seller's response to a reverse-auction request.
    ///
    /// Branches explicitly on the response status: a non-2xx surfaces as
    /// [`EncargoError::AcceptResponseFailed`] with the backend's status and
    /// body. On success the request list is refreshed from the server, since
    /// acceptance moves lifecycle state the backend owns.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, request_id = %request_id, response_id = %response_id))]
    pub async fn accept_response(
        &mut self,
        request_id: RequestId,
        response_id: ResponseId,
    ) -> Result<()> {
        let request = ApiRequest::post(
            format!(
                "/{}/{}/accept-response/{}/",
                self.kind.resource(),
                request_id,
                response_id
            ),
            None,
        );
        let response = self.http.execute(&request, self.token().as_deref()).await?;

        if !response.is_success() {
            return Err(EncargoError::AcceptResponseFailed {
                request_id,
                response_id,
                status: response.status,
                body: response.body,
            });
        }

        tracing::info!("Accepted auction response");
        self.load().await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accept / decline
    // ------------------------------------------------------------------

    /// Accept a quote on one of the user's requests.
    ///
    /// On success the matching request's status is patched to
    /// [`RequestStatus::Quoted`] locally and the backend's acknowledgement
    /// is inspected for a way into the payment flow: a `preference_id`
    /// takes precedence over a `payment_link`. Returns `None` when the call
    /// fails (logged, state unchanged) or when the acknowledgement carries
    /// neither.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, request_id = %request_id))]
    pub async fn accept(&mut self, request_id: RequestId) -> Option<PaymentRedirect> {
        let ack = match self.user_respond(self.kind.resource(), request_id, "Accept").await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::error!(error = %e, "Failed to accept request");
                return None;
            }
        };

        for request in &mut self.requests {
            if request.request_id == request_id {
                request.status = RequestStatus::Quoted;
            }
        }

        if let Some(preference_id) = ack.preference_id {
            Some(PaymentRedirect::Preference(preference_id))
        } else {
            ack.payment_link.map(PaymentRedirect::Link)
        }
    }

    /// Decline one of the user's requests.
    ///
    /// On success the request is removed from the local list (the backend
    /// keeps it; it just leaves the visible pending set) and `true` is
    /// returned so the embedding UI can notify the user. Failures are
    /// logged and leave the list unchanged.
    #[tracing::instrument(skip(self), fields(kind = %self.kind, request_id = %request_id))]
    pub async fn decline(&mut self, request_id: RequestId) -> bool {
        match self
            .user_respond(self.kind.decline_resource(), request_id, "Reject")
            .await
        {
            Ok(_) => {
                self.requests.retain(|r| r.request_id != request_id);
                tracing::info!("Declined request");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to decline request");
                false
            }
        }
    }

    async fn user_respond(
        &self,
        resource: &str,
        request_id: RequestId,
        answer: &str,
    ) -> Result<UserRespondAck> {
        let request = ApiRequest::post(
            format!("/{}/{}/user-respond/", resource, request_id),
            Some(serde_json::json!({ "response": answer })),
        );
        let response = self.http.execute(&request, self.token().as_deref()).await?;
        if !response.is_success() {
            return Err(EncargoError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }
        response.json()
    }

    // ------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------

    /// Partition the request list by status.
    ///
    /// For auction kinds every request is pending and the remaining buckets
    /// are empty regardless of stored statuses - their lifecycle is tracked
    /// only by acceptance of a response. Recomputed on every call; the
    /// request list is the sole source of truth.
    pub fn buckets(&self) -> StatusBuckets {
        let mut buckets = StatusBuckets::default();

        if self.kind.is_auction() {
            buckets.pending = self.requests.clone();
            return buckets;
        }

        for request in &self.requests {
            let bucket = match request.status {
                RequestStatus::Pending => &mut buckets.pending,
                RequestStatus::Quoted => &mut buckets.quoted,
                RequestStatus::Accepted => &mut buckets.accepted,
                RequestStatus::Completed => &mut buckets.completed,
                RequestStatus::Delivered => &mut buckets.delivered,
            };
            bucket.push(request.clone());
        }

        buckets
    }

    // ------------------------------------------------------------------
    // Expanded-row tracking
    // ------------------------------------------------------------------

    /// The request whose detail/response row is currently expanded, if any.
    pub fn expanded(&self) -> Option<RequestId> {
        self.expanded
    }

    /// Expand the row for `request_id`, or collapse it if it was already
    /// expanded. Pure UI state; not fetched or persisted.
    pub fn toggle_expanded(&mut self, request_id: RequestId) {
        if self.expanded == Some(request_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(request_id);
        }
    }

    fn token(&self) -> Option<String> {
        self.auth.access_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticAuth;
    use crate::http::MockHttpClient;

    fn request(id: i64, status: RequestStatus) -> PrintRequest {
        PrintRequest {
            request_id: RequestId(id),
            status,
            fields: serde_json::json!({}),
        }
    }

    fn controller(kind: RequestKind) -> RequestLifecycle<MockHttpClient, StaticAuth> {
        RequestLifecycle::new(kind, MockHttpClient::new(), StaticAuth::logged_in("tok"))
    }

    #[test]
    fn test_buckets_partition_by_status() {
        let mut lifecycle = controller(RequestKind::PrintRequests);
        lifecycle.requests = vec![
            request(1, RequestStatus::Pending),
            request(2, RequestStatus::Quoted),
            request(3, RequestStatus::Accepted),
            request(4, RequestStatus::Completed),
            request(5, RequestStatus::Delivered),
            request(6, RequestStatus::Pending),
        ];

        let buckets = lifecycle.buckets();
        assert_eq!(buckets.pending.len(), 2);
        assert_eq!(buckets.quoted.len(), 1);
        assert_eq!(buckets.accepted.len(), 1);
        assert_eq!(buckets.completed.len(), 1);
        assert_eq!(buckets.delivered.len(), 1);
        assert_eq!(buckets.len(), lifecycle.requests().len());
    }

    #[test]
    fn test_auction_buckets_collapse_to_pending() {
        let mut lifecycle = controller(RequestKind::PrintReverseAuction);
        lifecycle.requests = vec![
            request(1, RequestStatus::Quoted),
            request(2, RequestStatus::Delivered),
        ];

        let buckets = lifecycle.buckets();
        assert_eq!(buckets.pending.len(), 2);
        assert!(buckets.quoted.is_empty());
        assert!(buckets.accepted.is_empty());
        assert!(buckets.completed.is_empty());
        assert!(buckets.delivered.is_empty());
    }

    #[test]
    fn test_toggle_expanded() {
        let mut lifecycle = controller(RequestKind::PrintRequests);
        assert_eq!(lifecycle.expanded(), None);

        lifecycle.toggle_expanded(RequestId(3));
        assert_eq!(lifecycle.expanded(), Some(RequestId(3)));

        // Expanding another row moves the marker
        lifecycle.toggle_expanded(RequestId(4));
        assert_eq!(lifecycle.expanded(), Some(RequestId(4)));

        // Toggling the expanded row collapses it
        lifecycle.toggle_expanded(RequestId(4));
        assert_eq!(lifecycle.expanded(), None);
    }

    #[test]
    fn test_payment_redirect_targets() {
        assert_eq!(
            PaymentRedirect::Preference("abc".to_string()).target(),
            "/mp_pref/abc"
        );
        assert_eq!(
            PaymentRedirect::Link("https://pay.example.com/x".to_string()).target(),
            "https://pay.example.com/x"
        );
    }
}

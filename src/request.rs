//! Core types for print/design requests and auction responses.
//!
//! These mirror the shapes the marketplace backend serves. The lifecycle is
//! owned server-side; the client only reflects the `status` column and the
//! identifiers it needs to act on a request.

use serde::{Deserialize, Serialize};

/// Unique identifier for a request, issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub i64);

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId(id)
    }
}

impl std::ops::Deref for RequestId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a seller's response to a reverse-auction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(pub i64);

impl From<i64> for ResponseId {
    fn from(id: i64) -> Self {
        ResponseId(id)
    }
}

impl std::ops::Deref for ResponseId {
    type Target = i64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ResponseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-side lifecycle status of a request.
///
/// The backend speaks Spanish on the wire; the serde renames pin the exact
/// strings. The enum is closed on purpose - a status this client does not
/// know is a deserialization error, not a silent extra bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Waiting for the seller to quote ("Pendiente")
    #[serde(rename = "Pendiente")]
    Pending,
    /// Seller quoted, awaiting payment ("Cotizada")
    #[serde(rename = "Cotizada")]
    Quoted,
    /// Paid and accepted for production ("Aceptada")
    #[serde(rename = "Aceptada")]
    Accepted,
    /// Production finished ("Realizada")
    #[serde(rename = "Realizada")]
    Completed,
    /// Handed over to the customer ("Entregada")
    #[serde(rename = "Entregada")]
    Delivered,
}

impl RequestStatus {
    /// The exact wire string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pendiente",
            RequestStatus::Quoted => "Cotizada",
            RequestStatus::Accepted => "Aceptada",
            RequestStatus::Completed => "Realizada",
            RequestStatus::Delivered => "Entregada",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's print or design job awaiting quotes/fulfillment.
///
/// Only the identifier and status matter to the lifecycle controller; the
/// remaining domain fields (description, files, quoted price, dates) pass
/// through untouched for the embedding UI to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintRequest {
    #[serde(rename = "requestID")]
    pub request_id: RequestId,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub fields: serde_json::Value,
}

/// A seller's competing offer against a reverse-auction request.
///
/// The price/terms payload is opaque to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionResponse {
    #[serde(rename = "responseID")]
    pub response_id: ResponseId,
    #[serde(rename = "requestID", default)]
    pub request_id: Option<RequestId>,
    #[serde(flatten)]
    pub fields: serde_json::Value,
}

/// Acknowledgement body for accepting a quote.
///
/// The backend hands back at most one way into the external payment flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserRespondAck {
    #[serde(default)]
    pub preference_id: Option<String>,
    #[serde(default)]
    pub payment_link: Option<String>,
}

/// Requests partitioned by lifecycle status.
///
/// Derived on demand from the controller's request list; never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusBuckets {
    pub pending: Vec<PrintRequest>,
    pub quoted: Vec<PrintRequest>,
    pub accepted: Vec<PrintRequest>,
    pub completed: Vec<PrintRequest>,
    pub delivered: Vec<PrintRequest>,
}

impl StatusBuckets {
    /// Total number of requests across all buckets.
    pub fn len(&self) -> usize {
        self.pending.len()
            + self.quoted.len()
            + self.accepted.len()
            + self.completed.len()
            + self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_strings() {
        let parsed: RequestStatus = serde_json::from_str(r#""Cotizada""#).unwrap();
        assert_eq!(parsed, RequestStatus::Quoted);
        assert_eq!(
            serde_json::to_string(&RequestStatus::Delivered).unwrap(),
            r#""Entregada""#
        );
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let result: Result<RequestStatus, _> = serde_json::from_str(r#""Cancelada""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_keeps_opaque_fields() {
        let raw = r#"{"requestID": 7, "status": "Pendiente", "description": "gear", "quantity": 3}"#;
        let request: PrintRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.request_id, RequestId(7));
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.fields["description"], "gear");
        assert_eq!(request.fields["quantity"], 3);
    }

    #[test]
    fn test_respond_ack_tolerates_missing_fields() {
        let ack: UserRespondAck = serde_json::from_str("{}").unwrap();
        assert_eq!(ack, UserRespondAck::default());

        let ack: UserRespondAck =
            serde_json::from_str(r#"{"preference_id": "abc", "extra": 1}"#).unwrap();
        assert_eq!(ack.preference_id.as_deref(), Some("abc"));
        assert_eq!(ack.payment_link, None);
    }
}

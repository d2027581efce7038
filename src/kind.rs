//! Request kinds and their API resource paths.
//!
//! The marketplace exposes four request flows. Two are direct quote flows
//! (one seller quotes, the user accepts or declines) and two are reverse
//! auctions (many sellers respond, the user picks one). The kind selects the
//! API resource and changes how statuses are bucketed.

use serde::{Deserialize, Serialize};

/// One of the four fixed request flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    PrintRequests,
    DesignRequests,
    DesignReverseAuctions,
    PrintReverseAuction,
}

impl RequestKind {
    /// Resource name used for listing, responses, and accepting.
    pub fn resource(&self) -> &'static str {
        match self {
            RequestKind::PrintRequests => "print-requests",
            RequestKind::DesignRequests => "design-requests",
            RequestKind::DesignReverseAuctions => "design-reverse-auctions",
            RequestKind::PrintReverseAuction => "print-reverse-auction",
        }
    }

    /// Resource name used for declining.
    ///
    /// The backend mounts the design auction decline endpoint under the
    /// singular name; every other kind declines under its listing resource.
    pub fn decline_resource(&self) -> &'static str {
        match self {
            RequestKind::DesignReverseAuctions => "design-reverse-auction",
            other => other.resource(),
        }
    }

    /// Whether this kind is a reverse auction.
    ///
    /// Auction requests have no quote lifecycle of their own; progress is
    /// tracked only by accepting one of the competing responses.
    pub fn is_auction(&self) -> bool {
        matches!(
            self,
            RequestKind::DesignReverseAuctions | RequestKind::PrintReverseAuction
        )
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.resource())
    }
}

impl std::str::FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "print-requests" => Ok(RequestKind::PrintRequests),
            "design-requests" => Ok(RequestKind::DesignRequests),
            "design-reverse-auctions" => Ok(RequestKind::DesignReverseAuctions),
            "print-reverse-auction" => Ok(RequestKind::PrintReverseAuction),
            _ => Err(format!("Invalid request kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_names_round_trip() {
        for kind in [
            RequestKind::PrintRequests,
            RequestKind::DesignRequests,
            RequestKind::DesignReverseAuctions,
            RequestKind::PrintReverseAuction,
        ] {
            assert_eq!(kind.resource().parse::<RequestKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_decline_resource_singularizes_design_auctions_only() {
        assert_eq!(
            RequestKind::DesignReverseAuctions.decline_resource(),
            "design-reverse-auction"
        );
        assert_eq!(
            RequestKind::PrintReverseAuction.decline_resource(),
            "print-reverse-auction"
        );
        assert_eq!(RequestKind::PrintRequests.decline_resource(), "print-requests");
        assert_eq!(RequestKind::DesignRequests.decline_resource(), "design-requests");
    }

    #[test]
    fn test_auction_flag() {
        assert!(RequestKind::DesignReverseAuctions.is_auction());
        assert!(RequestKind::PrintReverseAuction.is_auction());
        assert!(!RequestKind::PrintRequests.is_auction());
        assert!(!RequestKind::DesignRequests.is_auction());
    }
}

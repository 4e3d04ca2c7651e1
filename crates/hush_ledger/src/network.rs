//! Supported Hedera networks and their public endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A Hedera network reachable through the public JSON-RPC relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    /// Human-readable label for the network.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Testnet => "Hedera Testnet",
            Network::Mainnet => "Hedera Mainnet",
        }
    }

    /// EVM chain id served by the relay.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Testnet => 296,
            Network::Mainnet => 295,
        }
    }

    /// Default JSON-RPC relay endpoint (Hashio).
    pub fn relay_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://testnet.hashio.io/api",
            Network::Mainnet => "https://mainnet.hashio.io/api",
        }
    }

    /// Default mirror-node REST endpoint.
    pub fn mirror_url(&self) -> &'static str {
        match self {
            Network::Testnet => "https://testnet.mirrornode.hedera.com",
            Network::Mainnet => "https://mainnet-public.mirrornode.hedera.com",
        }
    }

    /// HashScan explorer link for a transaction.
    pub fn hashscan_tx_url(&self, tx_ref: &str) -> String {
        format!("https://hashscan.io/{}/transaction/{tx_ref}", self.slug())
    }

    fn slug(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => anyhow::bail!("unknown network {other:?} (expected testnet or mainnet)"),
        }
    }
}

/// Validate that an endpoint override is a well-formed HTTP(S) URL.
pub fn validate_endpoint(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_properties() {
        assert_eq!(Network::Testnet.chain_id(), 296);
        assert_eq!(Network::Mainnet.chain_id(), 295);
        assert_eq!(Network::Testnet.relay_url(), "https://testnet.hashio.io/api");
        assert_eq!(Network::Testnet.label(), "Hedera Testnet");
    }

    #[test]
    fn network_from_str() {
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("previewnet".parse::<Network>().is_err());
    }

    #[test]
    fn network_serde_round_trip() {
        let json = serde_json::to_string(&Network::Testnet).unwrap();
        assert_eq!(json, "\"testnet\"");
        let parsed: Network = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Network::Testnet);
    }

    #[test]
    fn hashscan_link() {
        assert_eq!(
            Network::Testnet.hashscan_tx_url("0xabc"),
            "https://hashscan.io/testnet/transaction/0xabc"
        );
    }

    #[test]
    fn validate_endpoint_accepts_http_and_https() {
        assert!(validate_endpoint("https://relay.example.com/api"));
        assert!(validate_endpoint("http://localhost:7546"));
    }

    #[test]
    fn validate_endpoint_rejects_garbage() {
        assert!(!validate_endpoint(""));
        assert!(!validate_endpoint("not a url"));
        assert!(!validate_endpoint("ftp://server.com"));
    }
}

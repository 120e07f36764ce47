//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Stable UUID namespace for deriving sale identifiers.
const SALE_ID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x8f2d_61a4_3c5e_4b0f_9a17_c2d8_54e6_90bb);

/// Tracked collection identifier - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionAddress(String);

impl CollectionAddress {
    /// Create an address from an already-normalized string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Parse user-supplied input into a collection address.
    ///
    /// Accepts a `0x` contract address, a Magic Eden collection URL
    /// (`https://magiceden.io/collections/<chain>/<address>`), or a bare
    /// collection id. Contract addresses must be `0x` + 40 hex chars.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let cleaned = input.trim().trim_matches(|c| c == '"' || c == '\'');
        if cleaned.is_empty() {
            return Err(AddressError::Empty);
        }

        if cleaned.contains("magiceden.io") {
            return Self::from_marketplace_url(cleaned);
        }

        if cleaned.starts_with("0x") {
            if !Self::is_contract_address(cleaned) {
                return Err(AddressError::MalformedContract(cleaned.to_string()));
            }
            return Ok(Self(cleaned.to_ascii_lowercase()));
        }

        // Bare collection ids pass through untouched.
        Ok(Self(cleaned.to_string()))
    }

    fn from_marketplace_url(input: &str) -> Result<Self, AddressError> {
        let url = url::Url::parse(input)
            .map_err(|_| AddressError::UnrecognizedUrl(input.to_string()))?;

        let mut segments = url
            .path_segments()
            .ok_or_else(|| AddressError::UnrecognizedUrl(input.to_string()))?;

        // Expected path: /collections/<chain>/<address>
        if segments.next() != Some("collections") {
            return Err(AddressError::UnrecognizedUrl(input.to_string()));
        }
        let _chain = segments
            .next()
            .ok_or_else(|| AddressError::UnrecognizedUrl(input.to_string()))?;
        let address = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AddressError::UnrecognizedUrl(input.to_string()))?;

        Self::parse(address)
    }

    /// Whether the string is a well-formed `0x` + 40 hex contract address.
    #[must_use]
    pub fn is_contract_address(s: &str) -> bool {
        s.len() == 42
            && s.starts_with("0x")
            && s[2..].chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display (`0x1234…cdef`).
    ///
    /// Elision counts characters, not bytes; bare collection ids are not
    /// required to be ASCII.
    #[must_use]
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for CollectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CollectionAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Subscriber identifier - an opaque handle owned by the external
/// configuration layer (a guild, a channel, a user).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the subscriber ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of an inferred sale.
///
/// Derived deterministically from the collection address and the snapshot
/// observation time, so replaying inference over the same snapshot pair
/// yields the same id. There is no upstream sale id to borrow - the
/// upstream only exposes aggregate stats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(uuid::Uuid);

impl SaleId {
    /// Derive the sale id for `(address, observed_at)`.
    ///
    /// Millisecond timestamp resolution; two distinct polls of the same
    /// collection within the same millisecond would collide, which is
    /// acceptable because snapshots within a cycle share one observation.
    #[must_use]
    pub fn derive(address: &CollectionAddress, observed_at: chrono::DateTime<chrono::Utc>) -> Self {
        let name = format!("{}:{}", address.as_str(), observed_at.timestamp_millis());
        Self(uuid::Uuid::new_v5(&SALE_ID_NAMESPACE, name.as_bytes()))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_plain_contract_address() {
        let addr = CollectionAddress::parse("0xAbCd00000000000000000000000000000000EF12").unwrap();
        assert_eq!(addr.as_str(), "0xabcd00000000000000000000000000000000ef12");
    }

    #[test]
    fn parse_rejects_short_contract_address() {
        let err = CollectionAddress::parse("0x1234").unwrap_err();
        assert!(matches!(err, AddressError::MalformedContract(_)));
    }

    #[test]
    fn parse_rejects_non_hex_contract_address() {
        let err =
            CollectionAddress::parse("0xzzzz00000000000000000000000000000000ef12").unwrap_err();
        assert!(matches!(err, AddressError::MalformedContract(_)));
    }

    #[test]
    fn parse_extracts_address_from_marketplace_url() {
        let addr = CollectionAddress::parse(
            "https://magiceden.io/collections/monad-testnet/0x00000000000000000000000000000000000000aa",
        )
        .unwrap();
        assert_eq!(
            addr.as_str(),
            "0x00000000000000000000000000000000000000aa"
        );
    }

    #[test]
    fn parse_rejects_unrecognized_marketplace_url() {
        let err = CollectionAddress::parse("https://magiceden.io/some/other/page").unwrap_err();
        assert!(matches!(err, AddressError::UnrecognizedUrl(_)));
    }

    #[test]
    fn parse_trims_quotes_and_whitespace() {
        let addr = CollectionAddress::parse("  \"my-collection\"  ").unwrap();
        assert_eq!(addr.as_str(), "my-collection");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(CollectionAddress::parse("   "), Err(AddressError::Empty));
    }

    #[test]
    fn short_form_elides_middle() {
        let addr = CollectionAddress::new("0x1234567890abcdef1234567890abcdef12345678");
        assert_eq!(addr.short(), "0x1234…5678");
    }

    #[test]
    fn short_form_keeps_short_ids() {
        let addr = CollectionAddress::new("mons");
        assert_eq!(addr.short(), "mons");
    }

    #[test]
    fn short_form_handles_multibyte_ids() {
        // Bare collection ids pass through parse untouched, so short()
        // must not assume ASCII.
        let addr = CollectionAddress::parse("ab€€€€").unwrap();
        assert_eq!(addr.short(), "ab€€€€");

        let long = CollectionAddress::new("коллекция-понад-десять");
        assert_eq!(long.short(), "коллек…сять");
    }

    #[test]
    fn sale_id_is_deterministic() {
        let addr = CollectionAddress::new("0xaa");
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(SaleId::derive(&addr, at), SaleId::derive(&addr, at));
    }

    #[test]
    fn sale_id_differs_across_collections_and_times() {
        let a = CollectionAddress::new("0xaa");
        let b = CollectionAddress::new("0xbb");
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::milliseconds(1);

        assert_ne!(SaleId::derive(&a, t0), SaleId::derive(&b, t0));
        assert_ne!(SaleId::derive(&a, t0), SaleId::derive(&a, t1));
    }
}

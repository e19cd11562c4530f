//! Published Basalam OAuth scopes
//!
//! Strategies take scopes as plain strings so new server-side scopes work
//! without a release; [`Scope`] names the ones known today.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Scope that grants every permission the client is allowed.
pub const WILDCARD_SCOPE: &str = "*";

/// OAuth scopes accepted by the Basalam authorization server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    /// Order processing
    #[serde(rename = "order-processing")]
    OrderProcessing,
    /// Read vendor profile
    #[serde(rename = "vendor.profile.read")]
    VendorProfileRead,
    /// Write vendor profile
    #[serde(rename = "vendor.profile.write")]
    VendorProfileWrite,
    /// Read customer profile
    #[serde(rename = "customer.profile.read")]
    CustomerProfileRead,
    /// Write customer profile
    #[serde(rename = "customer.profile.write")]
    CustomerProfileWrite,
    /// Read vendor products
    #[serde(rename = "vendor.product.read")]
    VendorProductRead,
    /// Write vendor products
    #[serde(rename = "vendor.product.write")]
    VendorProductWrite,
    /// Read customer orders
    #[serde(rename = "customer.order.read")]
    CustomerOrderRead,
    /// Write customer orders
    #[serde(rename = "customer.order.write")]
    CustomerOrderWrite,
    /// Read vendor parcels
    #[serde(rename = "vendor.parcel.read")]
    VendorParcelRead,
    /// Write vendor parcels
    #[serde(rename = "vendor.parcel.write")]
    VendorParcelWrite,
    /// Read customer wallet
    #[serde(rename = "customer.wallet.read")]
    CustomerWalletRead,
    /// Write customer wallet
    #[serde(rename = "customer.wallet.write")]
    CustomerWalletWrite,
    /// Read customer chats
    #[serde(rename = "customer.chat.read")]
    CustomerChatRead,
    /// Write customer chats
    #[serde(rename = "customer.chat.write")]
    CustomerChatWrite,
}

impl Scope {
    /// Every known scope, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::OrderProcessing,
        Self::VendorProfileRead,
        Self::VendorProfileWrite,
        Self::CustomerProfileRead,
        Self::CustomerProfileWrite,
        Self::VendorProductRead,
        Self::VendorProductWrite,
        Self::CustomerOrderRead,
        Self::CustomerOrderWrite,
        Self::VendorParcelRead,
        Self::VendorParcelWrite,
        Self::CustomerWalletRead,
        Self::CustomerWalletWrite,
        Self::CustomerChatRead,
        Self::CustomerChatWrite,
    ];

    /// Wire value of the scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderProcessing => "order-processing",
            Self::VendorProfileRead => "vendor.profile.read",
            Self::VendorProfileWrite => "vendor.profile.write",
            Self::CustomerProfileRead => "customer.profile.read",
            Self::CustomerProfileWrite => "customer.profile.write",
            Self::VendorProductRead => "vendor.product.read",
            Self::VendorProductWrite => "vendor.product.write",
            Self::CustomerOrderRead => "customer.order.read",
            Self::CustomerOrderWrite => "customer.order.write",
            Self::VendorParcelRead => "vendor.parcel.read",
            Self::VendorParcelWrite => "vendor.parcel.write",
            Self::CustomerWalletRead => "customer.wallet.read",
            Self::CustomerWalletWrite => "customer.wallet.write",
            Self::CustomerChatRead => "customer.chat.read",
            Self::CustomerChatWrite => "customer.chat.write",
        }
    }

    /// Scopes belonging to an entity, e.g. `customer` or `vendor`.
    #[must_use]
    pub fn entity_scopes(entity: &str) -> BTreeSet<Self> {
        let prefix = format!("{entity}.");
        Self::select(|s| s.starts_with(&prefix))
    }

    /// All `*.read` scopes.
    #[must_use]
    pub fn read_scopes() -> BTreeSet<Self> {
        Self::select(|s| s.ends_with(".read"))
    }

    /// All `*.write` scopes.
    #[must_use]
    pub fn write_scopes() -> BTreeSet<Self> {
        Self::select(|s| s.ends_with(".write"))
    }

    /// Scopes for a feature such as `wallet` or `chat`.
    #[must_use]
    pub fn feature_scopes(feature: &str) -> BTreeSet<Self> {
        let infix = format!(".{feature}.");
        Self::select(|s| s.contains(&infix))
    }

    fn select(predicate: impl Fn(&str) -> bool) -> BTreeSet<Self> {
        Self::ALL.into_iter().filter(|scope| predicate(scope.as_str())).collect()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("unknown scope: {s}"))
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

/// Join scopes into the space-delimited form used on the wire.
#[must_use]
pub fn join_scopes<I, S>(scopes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    scopes.into_iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::scope.
    use super::*;

    #[test]
    fn test_round_trip_wire_values() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>(), Ok(scope));
        }
        assert!("customer.unknown.read".parse::<Scope>().is_err());
    }

    /// Validates the scope group helpers.
    ///
    /// Assertions:
    /// - Entity, feature, read and write groups contain the expected members.
    #[test]
    fn test_scope_groups() {
        let vendor = Scope::entity_scopes("vendor");
        assert_eq!(vendor.len(), 6);
        assert!(vendor.contains(&Scope::VendorParcelWrite));
        assert!(!vendor.contains(&Scope::OrderProcessing));

        let wallet = Scope::feature_scopes("wallet");
        assert_eq!(
            wallet,
            BTreeSet::from([Scope::CustomerWalletRead, Scope::CustomerWalletWrite])
        );

        assert_eq!(Scope::read_scopes().len(), 7);
        assert_eq!(Scope::write_scopes().len(), 7);
    }

    #[test]
    fn test_join_scopes() {
        assert_eq!(join_scopes([Scope::CustomerChatRead.as_str(), "*"]), "customer.chat.read *");
        assert_eq!(join_scopes(Vec::<String>::new()), "");
    }

    #[test]
    fn test_serde_uses_wire_value() {
        let json = serde_json::to_string(&Scope::OrderProcessing).unwrap();
        assert_eq!(json, "\"order-processing\"");
    }
}

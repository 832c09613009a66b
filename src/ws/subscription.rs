//! Subscription bookkeeping for the market-data stream.
//!
//! The [`SubscriptionRegistry`] remembers which instrument tokens are
//! subscribed on each [`Venue`] so they can be replayed after a reconnect.
//! Tokens are kept as strings in ordered sets, which makes replay messages
//! deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::EaseApiError;

// ---------------------------------------------------------------------------
// Venue
// ---------------------------------------------------------------------------

/// Exchange segment a token is subscribed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Venue {
    /// NSE cash market.
    #[default]
    Nse,
    /// BSE cash market.
    Bse,
    /// NSE futures & options.
    Fno,
    /// BSE futures & options.
    Bfo,
}

impl Venue {
    /// Every supported venue.
    pub const ALL: [Venue; 4] = [Venue::Nse, Venue::Bse, Venue::Fno, Venue::Bfo];

    /// Wire identifier (`"nse"`, `"bse"`, `"fno"`, `"bfo"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nse => "nse",
            Self::Bse => "bse",
            Self::Fno => "fno",
            Self::Bfo => "bfo",
        }
    }

    /// Parse a venue, falling back to [`Venue::Nse`] with a warning when the
    /// value is not recognised.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(venue = s, "Unsupported exchange, using nse");
            Self::Nse
        })
    }

    /// The LTP action key for this venue, e.g. `"nse:ltp"`.
    pub fn action_key(self) -> String {
        format!("{}:ltp", self.as_str())
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Venue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Venue {
    type Err = EaseApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| EaseApiError::InvalidArgument(format!("unsupported exchange: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Instrument tokens normalised to strings.
///
/// Built from a single scalar (`"2885"`, `2885`) or any collection of
/// displayable values (`vec![2885, 11536]`, `["2885", "11536"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<String>);

impl Tokens {
    /// The normalised tokens, in input order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

macro_rules! scalar_tokens {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Tokens {
                fn from(v: $t) -> Self {
                    Self(vec![v.to_string()])
                }
            }
        )*
    };
}

scalar_tokens!(&str, String, &String, i32, u32, i64, u64, usize);

impl<T: ToString> From<Vec<T>> for Tokens {
    fn from(v: Vec<T>) -> Self {
        Self(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for Tokens {
    fn from(v: &[T]) -> Self {
        Self(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Tokens {
    fn from(v: [T; N]) -> Self {
        Self(v.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&BTreeSet<T>> for Tokens {
    fn from(v: &BTreeSet<T>) -> Self {
        Self(v.iter().map(ToString::to_string).collect())
    }
}

// ---------------------------------------------------------------------------
// Wire request
// ---------------------------------------------------------------------------

/// Direction of a subscription request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubscriptionMode {
    #[serde(rename = "sub")]
    Subscribe,
    #[serde(rename = "unsub")]
    Unsubscribe,
}

/// JSON subscribe/unsubscribe request sent over the WebSocket.
///
/// Serialises as `{"actions":["nse:ltp"],"token":["2885"],"mode":"sub"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRequest {
    pub actions: Vec<String>,
    pub token: Vec<String>,
    pub mode: SubscriptionMode,
}

impl SubscriptionRequest {
    pub fn new(venue: Venue, tokens: Vec<String>, mode: SubscriptionMode) -> Self {
        Self {
            actions: vec![venue.action_key()],
            token: tokens,
            mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Tokens subscribed per venue.
///
/// A venue key exists only while its token set is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionRegistry {
    venues: BTreeMap<Venue, BTreeSet<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `tokens` into the set for `venue`.
    pub fn add(&mut self, venue: Venue, tokens: &[String]) {
        if tokens.is_empty() {
            return;
        }
        self.venues
            .entry(venue)
            .or_default()
            .extend(tokens.iter().cloned());
    }

    /// Remove `tokens` from the set for `venue`, dropping the venue once it
    /// has no tokens left.
    pub fn remove(&mut self, venue: Venue, tokens: &[String]) {
        if let Some(set) = self.venues.get_mut(&venue) {
            for t in tokens {
                set.remove(t);
            }
            if set.is_empty() {
                self.venues.remove(&venue);
            }
        }
    }

    /// Tokens currently subscribed on `venue`.
    pub fn tokens(&self, venue: Venue) -> Option<&BTreeSet<String>> {
        self.venues.get(&venue)
    }

    pub fn contains(&self, venue: Venue, token: &str) -> bool {
        self.venues.get(&venue).is_some_and(|s| s.contains(token))
    }

    /// Venues with at least one token, in a stable order.
    pub fn venues(&self) -> impl Iterator<Item = Venue> + '_ {
        self.venues.keys().copied()
    }

    /// Owned copy of every non-empty venue and its tokens, used for replay.
    pub fn snapshot(&self) -> Vec<(Venue, Vec<String>)> {
        self.venues
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(v, set)| (*v, set.iter().cloned().collect()))
            .collect()
    }

    /// Total number of tracked tokens across all venues.
    pub fn len(&self) -> usize {
        self.venues.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

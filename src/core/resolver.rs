//! URL resolution - Turns a pasted product page URL into a [`ProductDescriptor`].
//!
//! Each supported store is a [`StoreResolver`]. The [`Resolver`] holds them in
//! priority order and hands the parsed URL to the first one whose host check
//! matches. Adding a store means adding one resolver to [`Resolver::default`];
//! the existing ones stay untouched.
//!
//! Path segments are taken from `url.path().split('/')`, so segment 0 is always
//! the empty string in front of the leading slash.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Maximum number of characters kept from the URL segment used as a name.
pub const NAME_MAX_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// The stores a tracked product can come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    /// flipkart.com
    Flipkart,
    /// amazon.in
    Amazon,
    /// apple.com
    Apple,
    /// croma.com
    Croma,
}

impl StoreType {
    /// Lowercase tag stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flipkart => "flipkart",
            Self::Amazon => "amazon",
            Self::Apple => "apple",
            Self::Croma => "croma",
        }
    }

    /// Capitalized name used in display labels and messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Flipkart => "Flipkart",
            Self::Amazon => "Amazon",
            Self::Apple => "Apple",
            Self::Croma => "Croma",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreType {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flipkart" => Ok(Self::Flipkart),
            "amazon" => Ok(Self::Amazon),
            "apple" => Ok(Self::Apple),
            "croma" => Ok(Self::Croma),
            other => Err(ResolveError::UnknownStoreType(other.to_string())),
        }
    }
}

/// Result of resolving a product URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductDescriptor {
    /// Display label, e.g. `(Amazon) Some Product...`
    pub name: String,
    /// Store specific identifier (PID, ASIN, numeric id or part number)
    pub product_id: String,
    /// Store the URL belongs to
    pub store_type: StoreType,
    /// Manual part number; only ever set for Apple
    pub part_number: Option<String>,
}

/// Why a URL could not be resolved. The messages are shown to the admin as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The input is not an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Flipkart URL without a usable `pid`.
    #[error("Flipkart URL is missing a \"pid\" query parameter.")]
    MissingPid,

    /// Amazon URL without a `/dp/<ASIN>` pair.
    #[error("Could not find a valid ASIN (e.g., /dp/B0CX59H5W7) in the Amazon URL.")]
    MissingAsin,

    /// Apple URL submitted without a part number.
    #[error("Apple products require a Part Number.")]
    MissingPartNumber,

    /// Croma URL whose last segment is not numeric.
    #[error("Could not find a valid product ID in the Croma URL.")]
    InvalidCromaId,

    /// No registered resolver claims the host.
    #[error("Sorry, only {} URLs are supported.", join_store_names(.supported))]
    UnsupportedStore {
        /// Stores that are registered, in priority order
        supported: Vec<StoreType>,
    },

    /// A stored tag does not name a known store.
    #[error("Unknown store type '{0}'")]
    UnknownStoreType(String),
}

fn join_store_names(stores: &[StoreType]) -> String {
    let names: Vec<&str> = stores.iter().map(|s| s.display_name()).collect();
    match names.as_slice() {
        [] => "no".to_string(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// One store's URL handling.
pub trait StoreResolver: Send + Sync {
    /// Store this resolver produces descriptors for.
    fn store_type(&self) -> StoreType;

    /// Whether the URL belongs to this store.
    fn matches(&self, url: &Url) -> bool;

    /// Extracts the descriptor. Only called after [`Self::matches`] returned true.
    ///
    /// # Errors
    /// Returns a store specific [`ResolveError`] when the URL lacks the piece
    /// the store identifies products by.
    fn extract(
        &self,
        url: &Url,
        part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError>;
}

fn host_contains(url: &Url, needle: &str) -> bool {
    url.host_str().is_some_and(|host| host.contains(needle))
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').collect()
}

/// Builds the display label shared by every store.
///
/// An absent or empty segment falls back to `"<Store> Product"`.
#[must_use]
pub fn format_display_name(store: StoreType, segment: Option<&str>) -> String {
    let fallback = format!("{} Product", store.display_name());
    let raw = segment.filter(|s| !s.is_empty()).unwrap_or(fallback.as_str());
    let label: String = raw.replace('-', " ").chars().take(NAME_MAX_CHARS).collect();
    format!("({}) {label}{ELLIPSIS}", store.display_name())
}

/// flipkart.com - identifier is the `pid` query parameter.
#[derive(Debug, Default)]
pub struct FlipkartResolver;

impl StoreResolver for FlipkartResolver {
    fn store_type(&self) -> StoreType {
        StoreType::Flipkart
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "flipkart.com")
    }

    fn extract(
        &self,
        url: &Url,
        _part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let pid = url
            .query_pairs()
            .find(|(key, _)| key == "pid")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or(ResolveError::MissingPid)?;
        let segments = path_segments(url);

        Ok(ProductDescriptor {
            name: format_display_name(StoreType::Flipkart, segments.get(1).copied()),
            product_id: pid,
            store_type: StoreType::Flipkart,
            part_number: None,
        })
    }
}

/// amazon.in - identifier is the ASIN following the `dp` segment.
#[derive(Debug, Default)]
pub struct AmazonResolver;

impl StoreResolver for AmazonResolver {
    fn store_type(&self) -> StoreType {
        StoreType::Amazon
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "amazon.in")
    }

    fn extract(
        &self,
        url: &Url,
        _part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let segments = path_segments(url);
        let dp_index = segments
            .iter()
            .position(|segment| *segment == "dp")
            .ok_or(ResolveError::MissingAsin)?;
        let asin = segments
            .get(dp_index + 1)
            .filter(|segment| !segment.is_empty())
            .ok_or(ResolveError::MissingAsin)?;
        let name_segment = dp_index
            .checked_sub(1)
            .and_then(|i| segments.get(i))
            .copied();

        Ok(ProductDescriptor {
            name: format_display_name(StoreType::Amazon, name_segment),
            product_id: (*asin).to_string(),
            store_type: StoreType::Amazon,
            part_number: None,
        })
    }
}

/// apple.com - the URL carries no usable id, so a part number must be supplied.
#[derive(Debug, Default)]
pub struct AppleResolver;

impl StoreResolver for AppleResolver {
    fn store_type(&self) -> StoreType {
        StoreType::Apple
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "apple.com")
    }

    fn extract(
        &self,
        url: &Url,
        part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let part_number = part_number
            .filter(|p| !p.is_empty())
            .ok_or(ResolveError::MissingPartNumber)?;
        let segments = path_segments(url);

        Ok(ProductDescriptor {
            name: format_display_name(StoreType::Apple, segments.get(3).copied()),
            product_id: part_number.to_string(),
            store_type: StoreType::Apple,
            part_number: Some(part_number.to_string()),
        })
    }
}

/// croma.com - identifier is the numeric last path segment.
#[derive(Debug, Default)]
pub struct CromaResolver;

impl StoreResolver for CromaResolver {
    fn store_type(&self) -> StoreType {
        StoreType::Croma
    }

    fn matches(&self, url: &Url) -> bool {
        host_contains(url, "croma.com")
    }

    fn extract(
        &self,
        url: &Url,
        _part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let segments = path_segments(url);
        let pid = segments
            .last()
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .ok_or(ResolveError::InvalidCromaId)?;

        Ok(ProductDescriptor {
            name: format_display_name(StoreType::Croma, segments.get(1).copied()),
            product_id: (*pid).to_string(),
            store_type: StoreType::Croma,
            part_number: None,
        })
    }
}

/// Ordered set of store resolvers.
pub struct Resolver {
    stores: Vec<Box<dyn StoreResolver>>,
}

impl Default for Resolver {
    /// Flipkart, Amazon, Apple, Croma.
    fn default() -> Self {
        Self::new(vec![
            Box::new(FlipkartResolver),
            Box::new(AmazonResolver),
            Box::new(AppleResolver),
            Box::new(CromaResolver),
        ])
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("stores", &self.supported_stores())
            .finish()
    }
}

impl Resolver {
    /// Creates a resolver that tries `stores` in the given order.
    #[must_use]
    pub fn new(stores: Vec<Box<dyn StoreResolver>>) -> Self {
        Self { stores }
    }

    /// Stores handled by this resolver, in priority order.
    #[must_use]
    pub fn supported_stores(&self) -> Vec<StoreType> {
        self.stores.iter().map(|s| s.store_type()).collect()
    }

    /// Resolves `raw_url` into a descriptor.
    ///
    /// `part_number` is only consulted by stores that need it (Apple).
    ///
    /// # Errors
    /// Returns [`ResolveError::InvalidUrl`] when the input is not an absolute
    /// URL, [`ResolveError::UnsupportedStore`] when no store claims the host,
    /// or the matching store's extraction error.
    pub fn resolve(
        &self,
        raw_url: &str,
        part_number: Option<&str>,
    ) -> Result<ProductDescriptor, ResolveError> {
        let url = Url::parse(raw_url)?;
        let store = self
            .stores
            .iter()
            .find(|store| store.matches(&url))
            .ok_or_else(|| ResolveError::UnsupportedStore {
                supported: self.supported_stores(),
            })?;
        store.extract(&url, part_number)
    }
}

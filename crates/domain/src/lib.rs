// Rust guideline compliant 2026-10-14

//! Shared domain types for the recommendation engine.
//!
//! Defines the catalog vocabulary (`ItemId`, `Category`, `CatalogItem`), the
//! interaction event model (`RawEvent` -> `InteractionEvent`), the per-session
//! `PreferenceProfile`, the decay helper shared by the profile and trending
//! components, and the `Catalog` hexagonal port.
//! All engine components depend on this crate; no other workspace crate is imported here.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog vocabulary
// ---------------------------------------------------------------------------

/// Stable catalog identifier. Ordering is numeric and drives every tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of storefront categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Dresses,
    Tops,
    Bottoms,
    Outerwear,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 4] = [Self::Dresses, Self::Tops, Self::Bottoms, Self::Outerwear];

    /// Display label, as used by the storefront filters.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dresses => "Dresses",
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| CatalogError::UnknownCategory { label: s.to_owned() })
    }
}

/// A product as exposed by the external catalog. Read-only to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    /// Unique, immutable identifier.
    pub id: ItemId,
    /// Display name. Never read by scoring.
    pub name: String,
    pub category: Category,
    /// Free-form labels; a set, so duplicates collapse.
    pub tags: BTreeSet<String>,
    /// Non-negative price.
    pub price: f64,
}

impl CatalogItem {
    /// Convenience constructor used by adapters and tests.
    #[must_use]
    pub fn new<I, S>(id: u64, name: &str, category: Category, tags: I, price: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: ItemId(id),
            name: name.to_owned(),
            category,
            tags: tags.into_iter().map(Into::into).collect(),
            price,
        }
    }
}

/// Errors raised while building or parsing catalog data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// The label is not one of the closed category set.
    #[error("unknown category: {label}")]
    UnknownCategory { label: String },
    /// Two items share the same id.
    #[error("duplicate item id: {id}")]
    DuplicateItem { id: ItemId },
    /// Price is negative or not finite.
    #[error("invalid price for item {id}: {price}")]
    InvalidPrice { id: ItemId, price: f64 },
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Monotonic instant expressed as an offset from an arbitrary origin chosen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The origin.
    pub const ZERO: Self = Self(Duration::ZERO);

    #[must_use]
    pub const fn from_duration(offset: Duration) -> Self {
        Self(offset)
    }

    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Offset from the origin.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Time elapsed since `earlier`; zero when `earlier` is in the future.
    #[must_use]
    pub fn saturating_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

/// Exponential decay multiplier `exp(-elapsed / half_life)`.
///
/// Always in `(0, 1]` for a non-zero `half_life`; a zero `half_life` forgets
/// everything (`0.0`) as soon as any time has passed.
#[must_use]
pub fn decay_factor(elapsed: Duration, half_life: Duration) -> f64 {
    if elapsed.is_zero() {
        return 1.0;
    }
    if half_life.is_zero() {
        return 0.0;
    }
    (-elapsed.as_secs_f64() / half_life.as_secs_f64()).exp()
}

// ---------------------------------------------------------------------------
// Event model
// ---------------------------------------------------------------------------

/// Wire names accepted for [`RawEvent::kind`].
pub const KIND_VIEW: &str = "view";
pub const KIND_VIEW_WITH_DURATION: &str = "viewWithDuration";
pub const KIND_ADD_TO_CART: &str = "addToCart";
pub const KIND_ADD_TO_WISHLIST: &str = "addToWishlist";

/// Unvalidated event description as produced by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub item_id: ItemId,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    pub timestamp: Timestamp,
}

impl RawEvent {
    /// Raw event without a duration.
    #[must_use]
    pub fn new(item_id: ItemId, kind: &str, timestamp: Timestamp) -> Self {
        Self { item_id, kind: kind.to_owned(), duration_seconds: None, timestamp }
    }

    /// Attach a duration in seconds.
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }
}

/// Closed set of interaction kinds. Only `ViewWithDuration` carries a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    View,
    ViewWithDuration { duration: Duration },
    AddToCart,
    AddToWishlist,
}

impl InteractionKind {
    /// Engagement weight before any duration bonus: view 1, cart 5, wishlist 3.
    #[must_use]
    pub fn base_weight(self) -> f64 {
        match self {
            Self::View | Self::ViewWithDuration { .. } => 1.0,
            Self::AddToCart => 5.0,
            Self::AddToWishlist => 3.0,
        }
    }

    /// `true` for kinds that signal purchase intent (cart, wishlist).
    #[must_use]
    pub fn is_intent(self) -> bool {
        matches!(self, Self::AddToCart | Self::AddToWishlist)
    }

    /// Wire name of this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::View => KIND_VIEW,
            Self::ViewWithDuration { .. } => KIND_VIEW_WITH_DURATION,
            Self::AddToCart => KIND_ADD_TO_CART,
            Self::AddToWishlist => KIND_ADD_TO_WISHLIST,
        }
    }
}

/// A validated interaction. Ephemeral: consumed once by the engine, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub item_id: ItemId,
    pub kind: InteractionKind,
    pub timestamp: Timestamp,
}

/// Validation failures of the event model. No state is touched when these occur.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// The kind string is not one of the four known kinds.
    #[error("invalid event kind: {kind}")]
    InvalidEventKind { kind: String },
    /// Duration supplied where none is allowed, missing where required, or out of range.
    #[error("invalid duration for {kind}: {reason}")]
    InvalidDuration { kind: String, reason: String },
}

impl TryFrom<RawEvent> for InteractionEvent {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let invalid_duration = |reason: &str| EventError::InvalidDuration {
            kind: raw.kind.clone(),
            reason: reason.to_owned(),
        };

        let kind = match (raw.kind.as_str(), raw.duration_seconds) {
            (KIND_VIEW_WITH_DURATION, None) => return Err(invalid_duration("duration is required")),
            (KIND_VIEW_WITH_DURATION, Some(secs)) => {
                let duration = Duration::try_from_secs_f64(secs)
                    .map_err(|e| invalid_duration(&e.to_string()))?;
                InteractionKind::ViewWithDuration { duration }
            }
            (KIND_VIEW | KIND_ADD_TO_CART | KIND_ADD_TO_WISHLIST, Some(_)) => {
                return Err(invalid_duration("duration is only allowed on viewWithDuration"));
            }
            (KIND_VIEW, None) => InteractionKind::View,
            (KIND_ADD_TO_CART, None) => InteractionKind::AddToCart,
            (KIND_ADD_TO_WISHLIST, None) => InteractionKind::AddToWishlist,
            (other, _) => return Err(EventError::InvalidEventKind { kind: other.to_owned() }),
        };

        Ok(Self { item_id: raw.item_id, kind, timestamp: raw.timestamp })
    }
}

/// An open detail view. Collapsed into a single `viewWithDuration` event by
/// [`finish`](Self::finish) so the engine never observes view lifecycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSpan {
    pub item_id: ItemId,
    pub started_at: Timestamp,
}

impl ViewSpan {
    #[must_use]
    pub fn start(item_id: ItemId, started_at: Timestamp) -> Self {
        Self { item_id, started_at }
    }

    /// Close the view at `ended_at`. An end before the start yields a zero duration.
    #[must_use]
    pub fn finish(self, ended_at: Timestamp) -> RawEvent {
        let duration = ended_at.saturating_since(self.started_at);
        RawEvent::new(self.item_id, KIND_VIEW_WITH_DURATION, ended_at)
            .with_duration(duration.as_secs_f64())
    }
}

// ---------------------------------------------------------------------------
// Preference profile
// ---------------------------------------------------------------------------

/// Decaying affinity state of one session.
///
/// Weights are non-negative and only ever compared relative to each other.
/// The field set is also the snapshot format used when a host explicitly flushes a profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceProfile {
    pub category_weight: BTreeMap<Category, f64>,
    pub tag_weight: BTreeMap<String, f64>,
    /// Exponential average of prices seen on intent events; `None` until the first one.
    pub price_affinity: Option<f64>,
    /// Timestamp of the latest contributing event; `None` for a fresh profile.
    pub last_updated: Option<Timestamp>,
}

impl PreferenceProfile {
    /// Zero-weight profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` until the first event has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_updated.is_none()
    }

    /// Accumulated weight for `category`, `0.0` when never seen.
    #[must_use]
    pub fn category_weight(&self, category: Category) -> f64 {
        self.category_weight.get(&category).copied().unwrap_or(0.0)
    }

    /// Accumulated weight for `tag`, `0.0` when never seen.
    #[must_use]
    pub fn tag_weight(&self, tag: &str) -> f64 {
        self.tag_weight.get(tag).copied().unwrap_or(0.0)
    }

    /// Sum of every category and tag weight. Upper bound for any item score.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.category_weight.values().sum::<f64>() + self.tag_weight.values().sum::<f64>()
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Hexagonal port: read-only access to the product catalog.
///
/// Implementations live outside the domain crate (e.g. in the demo binary).
/// Lookups are in-memory and synchronous; no implementation may block on I/O.
pub trait Catalog {
    /// Resolve an item by id.
    fn item(&self, id: ItemId) -> Option<&CatalogItem>;

    /// Every item, in catalog insertion order.
    fn items(&self) -> &[CatalogItem];
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------
    // Event validation
    // ------------------------------------------------------------------

    #[test]
    fn view_without_duration_is_valid() {
        let raw = RawEvent::new(ItemId(1), KIND_VIEW, Timestamp::from_secs(3));
        let event = InteractionEvent::try_from(raw).unwrap();
        assert_eq!(event.kind, InteractionKind::View);
        assert_eq!(event.item_id, ItemId(1));
        assert_eq!(event.timestamp, Timestamp::from_secs(3));
    }

    #[test]
    fn view_with_duration_carries_duration() {
        let raw = RawEvent::new(ItemId(2), KIND_VIEW_WITH_DURATION, Timestamp::ZERO).with_duration(12.5);
        let event = InteractionEvent::try_from(raw).unwrap();
        assert_eq!(
            event.kind,
            InteractionKind::ViewWithDuration { duration: Duration::from_millis(12_500) }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = RawEvent::new(ItemId(1), "purchase", Timestamp::ZERO);
        let err = InteractionEvent::try_from(raw).unwrap_err();
        assert_eq!(err, EventError::InvalidEventKind { kind: "purchase".to_owned() });
    }

    #[test]
    fn duration_on_cart_is_rejected() {
        let raw = RawEvent::new(ItemId(1), KIND_ADD_TO_CART, Timestamp::ZERO).with_duration(4.0);
        let err = InteractionEvent::try_from(raw).unwrap_err();
        assert!(matches!(err, EventError::InvalidDuration { ref kind, .. } if kind == KIND_ADD_TO_CART));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let raw = RawEvent::new(ItemId(1), KIND_VIEW_WITH_DURATION, Timestamp::ZERO).with_duration(-1.0);
        assert!(matches!(
            InteractionEvent::try_from(raw),
            Err(EventError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn nan_duration_is_rejected() {
        let raw = RawEvent::new(ItemId(1), KIND_VIEW_WITH_DURATION, Timestamp::ZERO).with_duration(f64::NAN);
        assert!(matches!(
            InteractionEvent::try_from(raw),
            Err(EventError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn missing_duration_is_rejected() {
        let raw = RawEvent::new(ItemId(1), KIND_VIEW_WITH_DURATION, Timestamp::ZERO);
        assert!(matches!(
            InteractionEvent::try_from(raw),
            Err(EventError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn raw_event_parses_camel_case_json() {
        let json = r#"{"itemId":7,"kind":"viewWithDuration","durationSeconds":3.0,"timestamp":{"secs":10,"nanos":0}}"#;
        let raw: RawEvent = serde_json::from_str(json).unwrap();
        assert_eq!(raw.item_id, ItemId(7));
        assert_eq!(raw.duration_seconds, Some(3.0));
        assert!(InteractionEvent::try_from(raw).is_ok());
    }

    // ------------------------------------------------------------------
    // Kinds, decay, view spans
    // ------------------------------------------------------------------

    #[test]
    #[expect(clippy::float_cmp, reason = "exact integer-valued literals")]
    fn base_weights() {
        assert_eq!(InteractionKind::View.base_weight(), 1.0);
        assert_eq!(
            InteractionKind::ViewWithDuration { duration: Duration::from_secs(90) }.base_weight(),
            1.0
        );
        assert_eq!(InteractionKind::AddToCart.base_weight(), 5.0);
        assert_eq!(InteractionKind::AddToWishlist.base_weight(), 3.0);
        assert!(InteractionKind::AddToCart.is_intent());
        assert!(!InteractionKind::View.is_intent());
    }

    #[test]
    fn decay_factor_bounds() {
        let hl = Duration::from_secs(3600);
        assert!((decay_factor(Duration::ZERO, hl) - 1.0).abs() < f64::EPSILON);
        let one = decay_factor(hl, hl);
        assert!((one - (-1.0_f64).exp()).abs() < 1e-12);
        assert!(decay_factor(Duration::from_secs(10 * 3600), hl) > 0.0);
        assert!(decay_factor(Duration::from_secs(1), Duration::ZERO).abs() < f64::EPSILON);
    }

    #[test]
    fn view_span_collapses_to_duration_event() {
        let span = ViewSpan::start(ItemId(4), Timestamp::from_secs(100));
        let raw = span.finish(Timestamp::from_secs(130));
        assert_eq!(raw.kind, KIND_VIEW_WITH_DURATION);
        assert_eq!(raw.duration_seconds, Some(30.0));
        assert_eq!(raw.timestamp, Timestamp::from_secs(130));
    }

    #[test]
    fn view_span_ending_early_has_zero_duration() {
        let span = ViewSpan::start(ItemId(4), Timestamp::from_secs(100));
        let raw = span.finish(Timestamp::from_secs(90));
        assert_eq!(raw.duration_seconds, Some(0.0));
    }

    // ------------------------------------------------------------------
    // Catalog vocabulary and profile
    // ------------------------------------------------------------------

    #[test]
    fn category_round_trips_through_label() {
        for c in Category::ALL {
            assert_eq!(c.label().parse::<Category>().unwrap(), c);
        }
        assert_eq!(
            "Shoes".parse::<Category>().unwrap_err(),
            CatalogError::UnknownCategory { label: "Shoes".to_owned() }
        );
    }

    #[test]
    fn catalog_item_tags_are_a_set() {
        let item = CatalogItem::new(1, "Tee", Category::Tops, ["cotton", "cotton", "basic"], 20.0);
        assert_eq!(item.tags.len(), 2);
    }

    #[test]
    fn empty_profile_has_no_weights() {
        let p = PreferenceProfile::new();
        assert!(p.is_empty());
        assert!(p.category_weight(Category::Tops).abs() < f64::EPSILON);
        assert!(p.tag_weight("denim").abs() < f64::EPSILON);
        assert!(p.total_weight().abs() < f64::EPSILON);
        assert!(p.price_affinity.is_none());
    }

    #[test]
    fn profile_snapshot_serializes_category_keys_as_labels() {
        let mut p = PreferenceProfile::new();
        p.category_weight.insert(Category::Outerwear, 2.0);
        p.last_updated = Some(Timestamp::from_secs(5));
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"Outerwear\":2.0"), "{json}");
        let back: PreferenceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    /// Verify that a minimal `Catalog` implementation satisfies the port.
    #[test]
    fn catalog_port_minimal_impl() {
        struct OneItem(Vec<CatalogItem>);

        impl Catalog for OneItem {
            fn item(&self, id: ItemId) -> Option<&CatalogItem> {
                self.0.iter().find(|i| i.id == id)
            }

            fn items(&self) -> &[CatalogItem] {
                &self.0
            }
        }

        let catalog = OneItem(vec![CatalogItem::new(9, "Coat", Category::Outerwear, ["wool"], 150.0)]);
        assert_eq!(catalog.item(ItemId(9)).map(|i| i.price), Some(150.0));
        assert!(catalog.item(ItemId(1)).is_none());
        assert_eq!(catalog.items().len(), 1);
    }
}

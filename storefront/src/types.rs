//! Core domain types for the storefront.
//!
//! Every value in this module is constructed through a smart constructor so
//! that invalid states are unrepresentable after the trust boundary, following
//! the "parse, don't validate" principle. Entity identifiers are UUIDv7
//! newtypes: time-ordered, so sorting by id reproduces creation order within
//! one run.

use chrono::{DateTime, Utc};
use nutype::nutype;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Errors produced by the smart constructors in this module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Invalid money amount
    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),
    /// Invalid quantity value
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    /// Product name validation error
    #[error("Invalid product name: {0}")]
    InvalidProductName(String),
    /// Company name validation error
    #[error("Invalid company name: {0}")]
    InvalidCompanyName(String),
    /// Comment text validation error
    #[error("Invalid comment text: {0}")]
    InvalidCommentText(String),
    /// Contact message validation error
    #[error("Invalid contact message: {0}")]
    InvalidContactMessage(String),
    /// Image reference validation error
    #[error("Invalid image reference: {0}")]
    InvalidImageRef(String),
    /// File reference validation error
    #[error("Invalid file reference: {0}")]
    InvalidFileRef(String),
}

impl From<ProductNameError> for DomainError {
    fn from(err: ProductNameError) -> Self {
        Self::InvalidProductName(err.to_string())
    }
}

impl From<CompanyNameError> for DomainError {
    fn from(err: CompanyNameError) -> Self {
        Self::InvalidCompanyName(err.to_string())
    }
}

impl From<CommentTextError> for DomainError {
    fn from(err: CommentTextError) -> Self {
        Self::InvalidCommentText(err.to_string())
    }
}

impl From<ContactMessageError> for DomainError {
    fn from(err: ContactMessageError) -> Self {
        Self::InvalidContactMessage(err.to_string())
    }
}

impl From<ImageRefError> for DomainError {
    fn from(err: ImageRefError) -> Self {
        Self::InvalidImageRef(err.to_string())
    }
}

impl From<FileRefError> for DomainError {
    fn from(err: FileRefError) -> Self {
        Self::InvalidFileRef(err.to_string())
    }
}

/// Opaque handle for an authenticated user.
///
/// The identity provider owns authentication; the storefront only compares
/// these handles for ownership checks.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct UserId(Uuid);

impl UserId {
    /// Mints a fresh handle. Test and demo convenience; production handles
    /// come from the identity provider.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a catalog product.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new time-ordered product id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a supplier.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct SupplierId(Uuid);

impl SupplierId {
    /// Creates a new time-ordered supplier id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a supplier contact submission.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct ContactId(Uuid);

impl ContactId {
    /// Creates a new time-ordered contact id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a product comment.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct CommentId(Uuid);

impl CommentId {
    /// Creates a new time-ordered comment id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a shopping cart.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct CartId(Uuid);

impl CartId {
    /// Creates a new time-ordered cart id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a cart line item.
///
/// Checkout iterates items in ascending `CartItemId` order, so the
/// time-ordered ids make shortage reporting reproducible within one run.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct CartItemId(Uuid);

impl CartItemId {
    /// Creates a new time-ordered cart item id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a completed order.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new time-ordered order id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Unique identifier for a line within an order.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct OrderLineId(Uuid);

impl OrderLineId {
    /// Creates a new time-ordered order line id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// The version of a mutable record, used for optimistic concurrency control.
///
/// Versions start at 0 and bump on every mutation of the record (or, for
/// carts, of the cart's item set). A checkout commit names the versions it
/// observed; the store rejects the commit if any of them moved.
#[nutype(
    validate(greater_or_equal = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct RecordVersion(u64);

impl RecordVersion {
    /// The version of a freshly created record (0).
    pub fn initial() -> Self {
        Self::try_new(0).expect("0 is always a valid version")
    }

    /// Returns the next version after this one.
    #[must_use]
    pub fn next(self) -> Self {
        let current: u64 = self.into();
        Self::try_new(current + 1).expect("next version should always be valid")
    }
}

/// A timestamp for when a record was created.
///
/// Wrapper over a UTC `DateTime` so the crate controls formatting and
/// serialization in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp from a UTC `DateTime`.
    pub const fn new(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying `DateTime`.
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Converts the timestamp into the underlying `DateTime`.
    pub const fn into_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.into_datetime()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Product category, from the fixed set the catalog is organized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// PlayStation accessories and furniture
    PlayStation,
    /// Xbox accessories and furniture
    Xbox,
    /// Nintendo accessories and furniture
    Nintendo,
    /// PC gaming gear
    Pc,
    /// Everything else
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::PlayStation,
        Self::Xbox,
        Self::Nintendo,
        Self::Pc,
        Self::Other,
    ];

    /// Human-readable label for the category.
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlayStation => "PlayStation",
            Self::Xbox => "Xbox",
            Self::Nintendo => "Nintendo",
            Self::Pc => "PC",
            Self::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A requested quantity of a product.
///
/// Always at least 1: a quantity of zero means "remove the item", which is a
/// separate operation, never a stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Creates a new quantity.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidQuantity(
                "Quantity must be greater than 0".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Adds two quantities, checking for overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        let value = self
            .0
            .checked_add(other.0)
            .ok_or_else(|| DomainError::InvalidQuantity("Quantity overflow".to_string()))?;
        Self::new(value)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-hand stock of a product. Zero is valid; negative is unrepresentable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct StockLevel(u32);

impl StockLevel {
    /// Creates a stock level. Any non-negative count is valid.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying count.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether this stock level can satisfy the requested quantity.
    pub const fn covers(self, requested: Quantity) -> bool {
        requested.value() <= self.0
    }

    /// Decrements the stock by the requested quantity.
    ///
    /// Returns `None` when the request exceeds the on-hand count, so the
    /// never-negative invariant cannot be violated through this type.
    pub const fn minus(self, requested: Quantity) -> Option<Self> {
        match self.0.checked_sub(requested.value()) {
            Some(rest) => Some(Self(rest)),
            None => None,
        }
    }
}

impl Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money amount with validation.
///
/// Uses `Decimal` for precise financial calculations.
/// Must be non-negative with at most 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Maximum money amount (100 million)
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Creates money from cents (avoids floating point issues).
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_cents(cents: u64) -> Result<Self, DomainError> {
        let decimal = Decimal::new(cents as i64, 2);
        Self::new(decimal)
    }

    /// Creates money from a decimal amount.
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount cannot be negative: {amount}"
            )));
        }
        if amount.scale() > 2 {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount cannot have more than 2 decimal places: {amount}"
            )));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(DomainError::InvalidMoney(format!(
                "Money amount {amount} exceeds maximum {}",
                Self::MAX_AMOUNT
            )));
        }
        Ok(Self(amount))
    }

    /// Returns the underlying decimal value.
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Converts to cents.
    pub fn to_cents(&self) -> u64 {
        (self.0 * Decimal::from(100)).to_u64().unwrap_or(0)
    }

    /// Adds money amounts, rejecting results over the maximum.
    pub fn checked_add(self, other: Self) -> Result<Self, DomainError> {
        Self::new(self.0 + other.0)
    }

    /// Multiplies the amount by a quantity.
    pub fn multiply_by_quantity(self, quantity: Quantity) -> Result<Self, DomainError> {
        Self::new(self.0 * Decimal::from(quantity.value()))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self(Decimal::new(0, 0))
    }
}

impl std::str::FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount_str = trimmed
            .strip_prefix('$')
            .map_or(trimmed, |stripped| stripped);

        let decimal = amount_str.parse::<Decimal>().map_err(|e| {
            DomainError::InvalidMoney(format!("Failed to parse money amount '{s}': {e}"))
        })?;

        Self::new(decimal)
    }
}

/// Product display name. Non-empty, trimmed, at most 100 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductName(String);

/// Supplier company name. Non-empty, trimmed, at most 150 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 150),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CompanyName(String);

/// Free-text body of a product comment. Non-empty, at most 2000 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 2000),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CommentText(String);

/// Description accompanying a supplier contact submission.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 2000),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ContactMessage(String);

/// Reference to a product image in the external blob store.
///
/// The storefront never holds image bytes, only this key.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ImageRef(String);

/// Reference to an uploaded file in the external blob store.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Display,
        AsRef,
        Deref,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct FileRef(String);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    proptest! {
        #[test]
        fn quantity_accepts_positive_values(v in 1u32..=u32::MAX) {
            let quantity = Quantity::new(v);
            prop_assert!(quantity.is_ok());
            prop_assert_eq!(quantity.unwrap().value(), v);
        }

        #[test]
        fn quantity_checked_add_sums_or_rejects(a in 1u32..=u32::MAX, b in 1u32..=u32::MAX) {
            let qa = Quantity::new(a).unwrap();
            let qb = Quantity::new(b).unwrap();
            match qa.checked_add(qb) {
                Ok(sum) => prop_assert_eq!(sum.value(), a + b),
                Err(_) => prop_assert!(a.checked_add(b).is_none()),
            }
        }

        #[test]
        fn stock_minus_never_goes_negative(stock in 0u32..=u32::MAX, requested in 1u32..=u32::MAX) {
            let level = StockLevel::new(stock);
            let quantity = Quantity::new(requested).unwrap();
            match level.minus(quantity) {
                Some(rest) => {
                    prop_assert!(level.covers(quantity));
                    prop_assert_eq!(rest.value(), stock - requested);
                }
                None => prop_assert!(!level.covers(quantity)),
            }
        }

        #[test]
        fn money_from_cents_roundtrips(cents in 0u64..10_000_000_000u64) {
            let money = Money::from_cents(cents).unwrap();
            prop_assert_eq!(money.to_cents(), cents);
        }

        #[test]
        fn money_rejects_more_than_two_decimal_places(mantissa in 1i64..1_000_000i64) {
            // Decimal keeps the given scale, so even 0.010 reads as scale 3.
            prop_assert!(Money::new(Decimal::new(mantissa, 3)).is_err());
        }

        #[test]
        fn product_name_rejects_blank_input(s in " {0,30}") {
            prop_assert!(ProductName::try_new(s).is_err());
        }

        #[test]
        fn record_version_next_increments_by_one(v in 0u64..u64::MAX) {
            let version = RecordVersion::try_new(v).unwrap();
            let next: u64 = version.next().into();
            prop_assert_eq!(next, v + 1);
        }
    }

    #[test]
    fn quantity_rejects_zero() {
        assert!(Quantity::new(0).is_err());
    }

    #[test]
    fn money_rejects_negative_amounts() {
        assert!(Money::new(dec!(-0.01)).is_err());
    }

    #[test]
    fn money_display_shows_two_decimal_places() {
        let money = Money::from_cents(1999).unwrap();
        assert_eq!(money.to_string(), "$19.99");
    }

    #[test]
    fn money_parses_with_or_without_dollar_sign() {
        let with: Money = "$12.50".parse().unwrap();
        let without: Money = "12.50".parse().unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = CartItemId::generate();
        let second = CartItemId::generate();
        // Sub-millisecond ordering of v7 ids is random, so only uniqueness
        // is guaranteed here.
        assert_ne!(first, second);
    }

    #[test]
    fn category_labels_cover_the_fixed_set() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["PlayStation", "Xbox", "Nintendo", "PC", "Other"]
        );
    }

    #[test]
    fn timestamp_now_is_monotonic_enough_for_ordering() {
        let before = Timestamp::now();
        let after = Timestamp::now();
        assert!(before <= after);
    }

    #[test]
    fn timestamp_roundtrip_serialization() {
        let timestamp = Timestamp::now();
        let json = serde_json::to_string(&timestamp).unwrap();
        let deserialized: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(timestamp, deserialized);
    }
}

//! Event discovery and ticket cart on the EventPass reducer architecture.
//!
//! - [`filter`]: the pure filter/sort engine over read-only events
//! - [`discovery`]: the filter session reducer (selections, location context)
//! - [`cart`]: the quantity-aware cart with simulated checkout
//! - [`catalog`]: fixture loading and id lookup
//!
//! # Quick Start
//!
//! ```
//! use eventpass::{Catalog, Cart, CartEnvironment, DiscoveryState, PriceFilter};
//! use eventpass_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::demo()?);
//! let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 18).ok_or("bad date")?;
//!
//! // Filter the list
//! let mut session = DiscoveryState::new("Stockholm", 20.0);
//! session.criteria.price_filter = PriceFilter::Free;
//! let free = session.visible_events(&catalog, today);
//! assert!(free.iter().all(|event| event.is_free()));
//!
//! // Fill the cart
//! let mut cart = Cart::new(CartEnvironment::new(Arc::new(SystemClock), catalog.clone()));
//! cart.add_to_cart("1", 2)?;
//! assert_eq!(cart.cart_count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod filter;
pub mod location;
pub mod types;

// Re-export commonly used types
pub use cart::{
    Cart, CartAction, CartCommandError, CartEntry, CartEnvironment, CartError, CartLine,
    CartReducer, CartState, CartStatus, PaymentField, PaymentForm, Receipt,
};
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use discovery::{DiscoveryAction, DiscoveryEnvironment, DiscoveryReducer, DiscoveryState};
pub use filter::{
    filter_and_sort, DateFilter, FilterContext, FilterCriteria, LocationFilter, PriceFilter,
    SortBy,
};
pub use location::{GeoPoint, LocationContext};
pub use types::{Event, EventId, EventLocation, CATEGORIES};

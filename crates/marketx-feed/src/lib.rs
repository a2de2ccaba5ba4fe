//! # marketx-feed
//!
//! Live data for the landing page: the gold price poller, the date/time
//! card, and the periodic ticker both run on.

pub mod clock;
pub mod price;
pub mod ticker;

pub use clock::{spawn_clock, ClockDisplay};
pub use price::{
    refresh_prices, spawn_price_poller, Commodity, HttpPriceSource, PriceSnapshot, PriceSource,
    RefreshOutcome,
};
pub use ticker::Ticker;

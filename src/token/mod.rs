mod clock;
mod record;
mod store;

pub use clock::{Clock, SystemClock};
pub use record::TokenRecord;
pub(crate) use record::flexible_timestamp;
pub use store::TokenStore;

//! Software and startup listings: records, filtering and browse sessions.

mod filter;
mod record;
mod session;
mod store;

pub use filter::{filter, matches, Facets, FilterCriteria, FilterField};
pub use record::{ListingCommon, ListingKind, ListingRecord, SoftwareListing, StartupListing};
pub use session::{BrowseSession, LoadPhase, LoadTicket};
pub use store::{Checkout, SessionStore, SharedSession, BROWSE_SESSION_COOKIE};

pub mod instrument;
pub mod user;

// Re-export the core types to provide a clean public API.
pub use instrument::{Instrument, InstrumentUpdate, LeaderboardEntry, NewInstrument, SortKey};
pub use user::User;

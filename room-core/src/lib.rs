pub mod ledger;
pub mod presence;
pub mod ranking;
pub mod room_state;
pub mod temperature;

// Re-export main components
pub use ledger::*;
pub use presence::*;
pub use ranking::*;
pub use room_state::*;
pub use temperature::*;

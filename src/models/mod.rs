pub mod checklist;
pub mod session;

pub use checklist::*;
pub use session::*;

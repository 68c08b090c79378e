pub mod instrument;
pub mod market;
pub mod order;
pub mod state;

pub use instrument::*;
pub use market::*;
pub use order::*;
pub use state::*;

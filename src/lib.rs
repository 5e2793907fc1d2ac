pub mod commands;
pub mod context;
pub mod logging;
pub mod repl;
pub mod ticker;

pub use context::AppContext;
pub use repl::readline;

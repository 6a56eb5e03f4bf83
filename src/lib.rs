pub mod config;
pub mod derive;
pub mod error;
pub mod fetch;
#[cfg(any(test, feature = "fixtures"))]
#[doc(hidden)]
pub mod fixtures;
pub mod game;
pub mod harvest;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
pub mod table;
pub mod teams;

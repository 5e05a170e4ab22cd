pub mod api;
pub mod configuration;
pub mod domain;
pub mod error;
pub mod probe;
pub mod startup;

pub use configuration::*;
pub use domain::*;
pub use error::*;
pub use probe::*;
pub use startup::*;

mod probe_result;
mod request_validator;
mod target_url;

pub use probe_result::*;
pub use request_validator::*;
pub use target_url::*;

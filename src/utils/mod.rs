pub mod error;
pub mod exitcode;
pub mod logger;
pub mod validation;

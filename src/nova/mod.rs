pub mod completion;
pub mod config;
pub mod credentials;
pub mod extract;
pub mod message;
pub mod paths;
pub mod redact;
pub mod session;
pub mod util;

pub mod record;
pub mod parser;
pub mod aggregate;
pub mod filter;
pub mod sink;
pub mod json_sink;
pub mod noop_sink;

pub mod analyzer;
pub mod env;
pub mod init;

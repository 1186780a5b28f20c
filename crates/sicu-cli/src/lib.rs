//! Library side of the `sicu-etl` binary, exposed for integration tests.

pub mod logging;
pub mod pipeline;
pub mod validate;

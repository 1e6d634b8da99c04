//! Leaf error types. Sampling, simulation and selection (C1-C9) are infallible
//! by contract; only file and argument parsing (A1/A2) can fail.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("input error: {0}")]
    Input(String),
    #[error("argument error: {0}")]
    Argument(String),
    #[error("internal consistency error: {0}")]
    Internal(String),
}

/// Errors raised by the discovery endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GsConnectError {
    #[error("http server error: {0}")]
    Io(#[from] std::io::Error),
}

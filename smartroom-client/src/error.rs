/// Failures surfaced by the typed API layer.
///
/// Empty results are not errors; they are represented as empty collections
/// or as the `Empty` state of the owning screen holder.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable HTTP response: connect failure,
    /// timeout, or an unreadable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status, either at the HTTP
    /// layer or inside the response envelope.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A successful envelope carried no payload where one is required.
    #[error("server returned an empty payload")]
    EmptyPayload,
}

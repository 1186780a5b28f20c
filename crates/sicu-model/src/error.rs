use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("waveform blob is not valid base64: {source}")]
    InvalidBase64 {
        #[source]
        source: base64::DecodeError,
    },

    #[error("waveform blob has {len} bytes, not a whole number of f64 samples")]
    InvalidSampleLength { len: usize },

    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("window of {window} around '{at}' leaves the supported date range")]
    WindowOutOfRange { at: String, window: chrono::TimeDelta },
}

pub type Result<T> = std::result::Result<T, ModelError>;

use futures_util::StreamExt;

#[derive(Debug, thiserror::Error)]
pub(crate) enum BodyError {
    #[error("response too large")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Reads the whole body, refusing anything larger than `max_bytes`.
pub(crate) async fn read_capped(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, BodyError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(BodyError::TooLarge {
                max_bytes,
                actual: Some(content_len),
            });
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(BodyError::TooLarge {
                max_bytes,
                actual: Some(next_len),
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

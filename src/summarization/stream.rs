//! Incremental decoding of the generation endpoint's streamed JSON frames.
//!
//! The runtime terminates every JSON frame with a newline, but network chunks do not line up
//! with frame boundaries. Decoding is only attempted once a chunk delivers a newline, so a large
//! frame arriving in many small chunks is parsed once rather than once per chunk. Frames are
//! decoded lazily so a consumer that stops at the `done` frame never decodes anything after it.

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::{pin_mut, stream::StreamExt};
use serde_json::{Deserializer, Map, Value};

use super::SummaryError;

/// One decoded object from the generation stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateFrame {
    /// Text fragment carried by this frame, when `response` is a string.
    pub response: Option<String>,
    /// Whether this frame marks the end of generation.
    pub done: bool,
}

impl From<Map<String, Value>> for GenerateFrame {
    fn from(mut object: Map<String, Value>) -> Self {
        let response = match object.remove("response") {
            Some(Value::String(text)) => Some(text),
            _ => None,
        };
        let done = object.get("done").and_then(Value::as_bool).unwrap_or(false);
        Self { response, done }
    }
}

/// Turn a raw body byte stream into a stream of decoded frames.
///
/// Any transport error, malformed frame, or trailing partial frame ends the stream with
/// [`SummaryError::Upstream`].
pub fn generate_frames<S, B, E>(body: S) -> impl Stream<Item = Result<GenerateFrame, SummaryError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    try_stream! {
        pin_mut!(body);
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|error| {
                SummaryError::Upstream(format!("failed to read generation stream: {error}"))
            })?;
            let chunk = chunk.as_ref();
            buffer.extend_from_slice(chunk);
            if !chunk.contains(&b'\n') {
                continue;
            }

            while let Some(frame) = next_frame(&mut buffer)? {
                yield frame;
            }
        }

        // Frames not followed by a newline are only decodable once the body ends.
        while let Some(frame) = next_frame(&mut buffer)? {
            yield frame;
        }
        if buffer.iter().any(|byte| !byte.is_ascii_whitespace()) {
            Err(SummaryError::Upstream(format!(
                "generation stream ended inside a frame ({} trailing bytes)",
                buffer.len()
            )))?;
        }
    }
}

/// Decode the first complete frame in `buffer` and drop its bytes.
///
/// Returns `Ok(None)` when the buffer holds only whitespace or an incomplete frame.
fn next_frame(buffer: &mut Vec<u8>) -> Result<Option<GenerateFrame>, SummaryError> {
    let (decoded, consumed) = {
        let mut values = Deserializer::from_slice(&buffer[..]).into_iter::<Map<String, Value>>();
        let decoded = match values.next() {
            Some(Ok(object)) => Some(object),
            Some(Err(error)) if error.is_eof() => None,
            Some(Err(error)) => {
                return Err(SummaryError::Upstream(format!(
                    "failed to decode generation frame: {error}"
                )));
            }
            None => None,
        };
        (decoded, values.byte_offset())
    };
    buffer.drain(..consumed);
    Ok(decoded.map(GenerateFrame::from))
}

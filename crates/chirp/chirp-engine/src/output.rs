use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::EngineError;

/// Serializes responses and writes each as exactly one line.
///
/// The sink is shared by every worker; the internal mutex plus the single
/// `write_all` per response keep concurrently-emitted lines whole, which is
/// the only ordering guarantee the output stream offers.
pub struct ResponseWriter<W> {
    sink: Mutex<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Encodes `response` and writes it followed by a newline in one call.
    pub fn write_line<T: Serialize>(&self, response: &T) -> Result<(), EngineError> {
        let mut line = serde_json::to_vec(response).map_err(EngineError::Encode)?;
        line.push(b'\n');

        let mut sink = self.sink.lock().unwrap();
        sink.write_all(&line).map_err(EngineError::Output)?;
        sink.flush().map_err(EngineError::Output)
    }

    /// Recovers the sink, e.g. to inspect what a test run produced.
    pub fn into_inner(self) -> W {
        self.sink.into_inner().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirp_protocol::StatusResponse;

    #[test]
    fn each_response_is_one_line() {
        let writer = ResponseWriter::new(Vec::new());
        writer
            .write_line(&StatusResponse {
                success: true,
                id: 1,
            })
            .unwrap();
        writer
            .write_line(&StatusResponse {
                success: false,
                id: 2,
            })
            .unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            output,
            "{\"success\":true,\"id\":1}\n{\"success\":false,\"id\":2}\n"
        );
    }
}

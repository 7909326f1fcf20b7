use std::io::Write;

/// Status line and headers for an SSE stream written through `Request::into_writer`.
pub const SSE_PREAMBLE: &str = "HTTP/1.1 200 OK\r\n\
                                Content-Type: text/event-stream\r\n\
                                Cache-Control: no-cache\r\n\
                                Connection: keep-alive\r\n\
                                X-Accel-Buffering: no\r\n\
                                \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format:
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Formats a keep-alive SSE comment.
/// SSE comments start with `:` and are ignored by EventSource clients
/// but prevent the connection from timing out.
pub fn format_sse_keepalive() -> &'static str {
    ": ping\n\n"
}

/// Writes a single SSE message to a writer, flushing immediately.
///
/// # Errors
/// Any I/O failure, which in practice means the client disconnected.
pub fn write_sse<W: Write + ?Sized>(writer: &mut W, msg: &str) -> std::io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_framing() {
        assert_eq!(format_sse_event("step", "{\"step\":1}"), "event: step\ndata: {\"step\":1}\n\n");
    }

    #[test]
    fn test_write_sse_flushes_into_buffer() {
        let mut buf: Vec<u8> = Vec::new();
        write_sse(&mut buf, format_sse_keepalive()).unwrap();
        assert_eq!(buf, b": ping\n\n");
    }

    #[test]
    fn test_preamble_ends_headers() {
        assert!(SSE_PREAMBLE.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(SSE_PREAMBLE.ends_with("\r\n\r\n"));
        assert!(SSE_PREAMBLE.contains("Content-Type: text/event-stream\r\n"));
    }
}

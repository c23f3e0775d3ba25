//! Minimal STOMP 1.2 framing for the notification WebSocket.
//!
//! Only what a subscriber needs: CONNECT, SUBSCRIBE, UNSUBSCRIBE and
//! DISCONNECT going out, CONNECTED, MESSAGE, RECEIPT and ERROR coming in.

use crate::error::{Error, Result};

const NULL: char = '\0';

pub const ACCEPT_VERSION: &str = "1.2";

pub fn notification_destination(user_id: i64) -> String {
    format!("/queue/notifications/{}", user_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Connected,
    Send,
    Subscribe,
    Unsubscribe,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Send => "SEND",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
            Command::Disconnect => "DISCONNECT",
        }
    }

    // CONNECT and CONNECTED headers are never escaped
    fn escapes_headers(&self) -> bool {
        !matches!(self, Command::Connect | Command::Connected)
    }
}

impl std::str::FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let command = match s {
            "CONNECT" | "STOMP" => Command::Connect,
            "CONNECTED" => Command::Connected,
            "SEND" => Command::Send,
            "SUBSCRIBE" => Command::Subscribe,
            "UNSUBSCRIBE" => Command::Unsubscribe,
            "MESSAGE" => Command::Message,
            "RECEIPT" => Command::Receipt,
            "ERROR" => Command::Error,
            "DISCONNECT" => Command::Disconnect,
            other => return Err(Error::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: vec![],
            body: String::new(),
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// First value wins when a header repeats.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn connect(host: &str, token: Option<&str>) -> Self {
        let frame = Frame::new(Command::Connect)
            .header("accept-version", ACCEPT_VERSION)
            .header("host", host)
            .header("heart-beat", "0,0");
        match token {
            Some(token) => frame.header("Authorization", &format!("Bearer {}", token)),
            None => frame,
        }
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Frame::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn unsubscribe(id: &str) -> Self {
        Frame::new(Command::Unsubscribe).header("id", id)
    }

    pub fn disconnect() -> Self {
        Frame::new(Command::Disconnect)
    }

    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');
        for (key, value) in &self.headers {
            if self.command.escapes_headers() {
                out.push_str(&escape(key));
                out.push(':');
                out.push_str(&escape(value));
            } else {
                out.push_str(key);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        if !self.body.is_empty() && self.get("content-length").is_none() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push(NULL);
        out
    }

    /// Decode one frame; `Ok(None)` for a heart-beat.
    pub fn decode(input: &str) -> Result<Option<Frame>> {
        let input = input.trim_start_matches(['\r', '\n']);
        if input.is_empty() {
            return Ok(None);
        }

        // headers end at the first empty line; the body may hold blank lines
        let mut head = vec![];
        let mut offset = 0;
        let rest = loop {
            let end = input[offset..]
                .find('\n')
                .ok_or_else(|| Error::InvalidFrame("missing header terminator".to_string()))?;
            let line = input[offset..offset + end].trim_end_matches('\r');
            offset += end + 1;
            if line.is_empty() {
                break &input[offset..];
            }
            head.push(line);
        };

        let mut lines = head.into_iter();
        let command: Command = lines
            .next()
            .ok_or_else(|| Error::InvalidFrame("missing command".to_string()))?
            .parse()?;

        let mut headers = vec![];
        for line in lines {
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| Error::InvalidFrame(format!("malformed header {line}")))?;
            if command.escapes_headers() {
                headers.push((unescape(key)?, unescape(value)?));
            } else {
                headers.push((key.to_string(), value.to_string()));
            }
        }

        let frame = Frame {
            command,
            headers,
            body: String::new(),
        };

        let body = match frame.get("content-length").and_then(|len| len.parse::<usize>().ok()) {
            Some(len) => rest.get(..len).ok_or_else(|| {
                Error::InvalidFrame("body shorter than content-length".to_string())
            })?,
            None => {
                let end = rest
                    .find(NULL)
                    .ok_or_else(|| Error::InvalidFrame("missing NULL terminator".to_string()))?;
                &rest[..end]
            }
        };

        Ok(Some(Frame {
            body: body.to_string(),
            ..frame
        }))
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            other => {
                return Err(Error::InvalidFrame(format!(
                    "invalid escape sequence \\{}",
                    other.map(String::from).unwrap_or_default()
                )));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_encode_subscribe() {
        let frame = Frame::subscribe("sub-0", &notification_destination(42));
        assert_eq!(
            frame.encode(),
            "SUBSCRIBE\nid:sub-0\ndestination:/queue/notifications/42\nack:auto\n\n\0"
        );
    }

    #[test]
    fn test_encode_connect_does_not_escape() {
        let frame = Frame::connect("localhost:8080", Some("abc"));
        let encoded = frame.encode();
        assert!(encoded.starts_with("CONNECT\naccept-version:1.2\nhost:localhost:8080\n"));
        assert!(encoded.contains("Authorization:Bearer abc\n"));
        assert!(encoded.ends_with("\n\n\0"));
    }

    #[test]
    fn test_decode_message() {
        let raw = "MESSAGE\ndestination:/queue/notifications/42\nmessage-id:7\n\
                   subscription:sub-0\ncontent-type:application/json\n\n{\"id\":1}\0\n";
        let frame = Frame::decode(raw).unwrap().unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.get("subscription"), Some("sub-0"));
        assert_eq!(frame.body, "{\"id\":1}");
    }

    #[test]
    fn test_decode_content_length_body_with_null() {
        let raw = "MESSAGE\ncontent-length:3\n\na\0b\0";
        let frame = Frame::decode(raw).unwrap().unwrap();
        assert_eq!(frame.body, "a\0b");
    }

    #[test]
    fn test_decode_unescapes_headers() {
        let frame = Frame::new(Command::Message).header("note", "a:b\\c\nd");
        let decoded = Frame::decode(&frame.encode()).unwrap().unwrap();
        assert_eq!(decoded.get("note"), Some("a:b\\c\nd"));
    }

    #[test]
    fn test_decode_heartbeat() {
        assert_eq!(Frame::decode("\n").unwrap(), None);
        assert_eq!(Frame::decode("").unwrap(), None);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            Frame::decode("BOGUS\n\n\0"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            Frame::decode("MESSAGE\nno-colon\n\n\0"),
            Err(Error::InvalidFrame(_))
        ));
        assert!(matches!(
            Frame::decode("MESSAGE\nid:1\n\nbody"),
            Err(Error::InvalidFrame(_))
        ));
        assert!(matches!(
            Frame::decode("MESSAGE\nbad:\\t\n\n\0"),
            Err(Error::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_decode_connected_keeps_raw_headers() {
        let frame = Frame::decode("CONNECTED\nversion:1.2\nserver:broker\\x\n\n\0")
            .unwrap()
            .unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.get("server"), Some("broker\\x"));
    }

    #[test]
    fn test_decode_crlf_frame_with_blank_line_in_body() {
        let raw = "MESSAGE\r\ndestination:/queue/notifications/1\r\n\r\nline one\n\nline two\0";
        let frame = Frame::decode(raw).unwrap().unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.get("destination"), Some("/queue/notifications/1"));
        assert_eq!(frame.body, "line one\n\nline two");
    }

    #[test]
    fn test_decode_lf_frame_with_blank_line_in_body() {
        let frame = Frame::decode("MESSAGE\nid:1\n\na\n\nb\0").unwrap().unwrap();
        assert_eq!(frame.get("id"), Some("1"));
        assert_eq!(frame.body, "a\n\nb");
    }
}

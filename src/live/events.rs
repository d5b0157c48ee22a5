use serde::{Deserialize, Serialize};

/// Aggregate counters shown on the monitor dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_users_count: u64,
    pub unique_users_count: u64,
    pub recent_activities_count: u64,
}

/// One connected session as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub session_id: String,
    pub user_id: String,
    pub name: String,
    pub connected_at: String,
    pub last_seen: String,
}

/// Server-push event on the monitor stream, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    Initial {
        stats: DashboardStats,
        users: Vec<ActiveUser>,
    },
    Stats {
        stats: DashboardStats,
    },
    UsersUpdate {
        users: Vec<ActiveUser>,
    },
    UserJoined {
        user: ActiveUser,
        stats: DashboardStats,
    },
    UserLeft {
        session_id: String,
    },
    Heartbeat {
        timestamp: f64,
    },
    Error {
        error: String,
    },
}

/// Serializes one event as a text/event-stream frame.
pub fn encode_frame(event: &MonitorEvent) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// Incremental text/event-stream decoder. Feed it chunks as they arrive
/// and pop complete events; partial frames stay buffered, comment lines
/// and non-`data` fields are ignored, CRLF is tolerated.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder::default()
    }

    pub fn feed(&mut self, chunk: &str) {
        self.buffer.push_str(&chunk.replace("\r\n", "\n"));
    }

    /// Next complete event, if any. Frames whose data is not a known
    /// event are skipped rather than poisoning the stream.
    pub fn pop(&mut self) -> Option<MonitorEvent> {
        while let Some(boundary) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..boundary + 2).collect();
            let data: Vec<&str> = frame
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|payload| payload.strip_prefix(' ').unwrap_or(payload))
                .collect();
            if data.is_empty() {
                continue;
            }
            if let Ok(event) = serde_json::from_str(&data.join("\n")) {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heartbeat() -> MonitorEvent {
        MonitorEvent::Heartbeat { timestamp: 1724.5 }
    }

    #[test]
    fn frames_round_trip() {
        let frame = encode_frame(&heartbeat()).unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("\n\n"));

        let mut decoder = FrameDecoder::new();
        decoder.feed(&frame);
        assert_eq!(decoder.pop(), Some(heartbeat()));
        assert_eq!(decoder.pop(), None);
    }

    #[test]
    fn event_type_tag_is_snake_case() {
        let json = serde_json::to_string(&MonitorEvent::UserLeft {
            session_id: "s-1".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"user_left\""));
    }

    #[test]
    fn partial_frames_stay_buffered() {
        let frame = encode_frame(&heartbeat()).unwrap();
        let (head, tail) = frame.split_at(10);

        let mut decoder = FrameDecoder::new();
        decoder.feed(head);
        assert_eq!(decoder.pop(), None);
        decoder.feed(tail);
        assert_eq!(decoder.pop(), Some(heartbeat()));
    }

    #[test]
    fn comments_and_other_fields_are_ignored() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(": keep-alive\n\n");
        decoder.feed("event: custom\nid: 7\n\n");
        decoder.feed("retry: 3000\ndata: {\"type\":\"heartbeat\",\"timestamp\":1.0}\n\n");
        assert_eq!(
            decoder.pop(),
            Some(MonitorEvent::Heartbeat { timestamp: 1.0 })
        );
    }

    #[test]
    fn crlf_frames_decode() {
        let mut decoder = FrameDecoder::new();
        decoder.feed("data: {\"type\":\"heartbeat\",\"timestamp\":2.0}\r\n\r\n");
        assert_eq!(
            decoder.pop(),
            Some(MonitorEvent::Heartbeat { timestamp: 2.0 })
        );
    }

    #[test]
    fn unknown_event_payload_is_skipped() {
        let mut decoder = FrameDecoder::new();
        decoder.feed("data: {\"type\":\"unknown\"}\n\n");
        decoder.feed("data: {\"type\":\"heartbeat\",\"timestamp\":3.0}\n\n");
        assert_eq!(
            decoder.pop(),
            Some(MonitorEvent::Heartbeat { timestamp: 3.0 })
        );
    }

    #[test]
    fn initial_event_decodes_users() {
        let json = r#"{"type":"initial","stats":{"active_users_count":2,"unique_users_count":2,"recent_activities_count":5},"users":[{"session_id":"s-1","user_id":"u-1","name":"Ada","connected_at":"2026-08-24T10:00:00Z","last_seen":"2026-08-24T10:05:00Z"}]}"#;
        let mut decoder = FrameDecoder::new();
        decoder.feed(&format!("data: {json}\n\n"));
        let Some(MonitorEvent::Initial { stats, users }) = decoder.pop() else {
            panic!("expected initial event");
        };
        assert_eq!(stats.active_users_count, 2);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada");
    }
}

//! Admin live-feed plumbing: event shapes, the text/event-stream codec,
//! the reconnect policy and the client-side feed state. Transport-free;
//! callers own the socket and push bytes through [`events::FrameDecoder`].

pub mod api;
pub mod backoff;
pub mod events;
pub mod feed;

pub use backoff::Backoff;
pub use events::{ActiveUser, DashboardStats, FrameDecoder, MonitorEvent, encode_frame};
pub use feed::{FeedDelta, FeedState};

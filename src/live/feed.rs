use std::collections::BTreeMap;

use super::events::{ActiveUser, DashboardStats, MonitorEvent};

/// Sessions that appeared or disappeared while applying one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDelta {
    pub joined: Vec<String>,
    pub left: Vec<String>,
}

/// Client-side mirror of the monitor stream: the latest stats, the active
/// user set keyed by session id, the last heartbeat and the last error.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub stats: DashboardStats,
    users: BTreeMap<String, ActiveUser>,
    pub last_heartbeat: Option<f64>,
    pub last_error: Option<String>,
}

impl FeedState {
    pub fn new() -> Self {
        FeedState::default()
    }

    pub fn users(&self) -> impl Iterator<Item = &ActiveUser> {
        self.users.values()
    }

    pub fn user(&self, session_id: &str) -> Option<&ActiveUser> {
        self.users.get(session_id)
    }

    /// Applies one event and reports which sessions joined or left.
    pub fn apply(&mut self, event: MonitorEvent) -> FeedDelta {
        match event {
            MonitorEvent::Initial { stats, users } => {
                self.stats = stats;
                self.replace_users(users)
            }
            MonitorEvent::Stats { stats } => {
                self.stats = stats;
                FeedDelta::default()
            }
            MonitorEvent::UsersUpdate { users } => self.replace_users(users),
            MonitorEvent::UserJoined { user, stats } => {
                self.stats = stats;
                let session_id = user.session_id.clone();
                let fresh = self.users.insert(session_id.clone(), user).is_none();
                FeedDelta {
                    joined: if fresh { vec![session_id] } else { Vec::new() },
                    left: Vec::new(),
                }
            }
            MonitorEvent::UserLeft { session_id } => {
                let removed = self.users.remove(&session_id).is_some();
                FeedDelta {
                    joined: Vec::new(),
                    left: if removed { vec![session_id] } else { Vec::new() },
                }
            }
            MonitorEvent::Heartbeat { timestamp } => {
                self.last_heartbeat = Some(timestamp);
                FeedDelta::default()
            }
            MonitorEvent::Error { error } => {
                self.last_error = Some(error);
                FeedDelta::default()
            }
        }
    }

    fn replace_users(&mut self, users: Vec<ActiveUser>) -> FeedDelta {
        let incoming: BTreeMap<String, ActiveUser> = users
            .into_iter()
            .map(|user| (user.session_id.clone(), user))
            .collect();
        let joined = incoming
            .keys()
            .filter(|id| !self.users.contains_key(*id))
            .cloned()
            .collect();
        let left = self
            .users
            .keys()
            .filter(|id| !incoming.contains_key(*id))
            .cloned()
            .collect();
        self.users = incoming;
        FeedDelta { joined, left }
    }
}

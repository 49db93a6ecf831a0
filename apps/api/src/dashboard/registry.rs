use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::dashboard::view::Dashboard;

struct Tracked {
    dashboard: Dashboard,
    touched: Instant,
}

/// Per-session dashboards, keyed by session token.
///
/// Closures passed to `with` run under the write lock and must not await;
/// handlers release the lock around every external call.
///
/// A dashboard untouched for `idle_ttl` is treated as gone: `with` starts it
/// over and `evict_idle` drops it. `idle_ttl` matches the session TTL, so
/// dashboards do not outlive the sessions they belong to.
#[derive(Clone)]
pub struct DashboardRegistry {
    sessions: Arc<RwLock<HashMap<String, Tracked>>>,
    idle_ttl: Duration,
}

impl DashboardRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Runs `f` against the session's dashboard, creating it on first use.
    pub async fn with<R>(&self, token: &str, f: impl FnOnce(&mut Dashboard) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let tracked = sessions
            .entry(token.to_string())
            .or_insert_with(|| Tracked {
                dashboard: Dashboard::new(),
                touched: now,
            });
        if now.duration_since(tracked.touched) >= self.idle_ttl {
            tracked.dashboard = Dashboard::new();
        }
        tracked.touched = now;
        f(&mut tracked.dashboard)
    }

    pub async fn snapshot(&self, token: &str) -> Dashboard {
        self.with(token, |d| d.clone()).await
    }

    /// Drops a session's dashboard (on logout).
    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drops every dashboard idle for at least `idle_ttl`. Returns how many went.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, tracked| now.duration_since(tracked.touched) < self.idle_ttl);
        before - sessions.len()
    }

    /// Runs `evict_idle` every `period` for the life of the process.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle().await;
                if evicted > 0 {
                    debug!("Evicted {evicted} idle dashboard(s)");
                }
            }
        })
    }
}

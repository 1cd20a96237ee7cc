//! Readiness classification for primary/secondary failover.
//!
//! An external traffic router polls `/api/health` and moves traffic away from
//! any instance that answers 503. A primary is only ready while its database
//! is reachable and writable; a secondary only needs the database to be
//! reachable, since it serves reads from a possibly read-only replica.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use serde::Serialize;

use crate::config::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub status: HealthStatus,
    pub code: StatusCode,
}

impl Verdict {
    const HEALTHY: Verdict = Verdict {
        status: HealthStatus::Healthy,
        code: StatusCode::OK,
    };
    const DEGRADED: Verdict = Verdict {
        status: HealthStatus::Degraded,
        code: StatusCode::SERVICE_UNAVAILABLE,
    };
}

/// Pure readiness decision. An unconnected instance is always degraded.
pub fn classify(role: Role, connected: bool, read_only: bool) -> Verdict {
    match (role, connected, read_only) {
        (_, false, _) => Verdict::DEGRADED,
        (Role::Primary, true, true) => Verdict::DEGRADED,
        (Role::Primary, true, false) => Verdict::HEALTHY,
        (Role::Secondary, true, _) => Verdict::HEALTHY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub connected: bool,
    pub read_only: bool,
}

/// Why a write was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteBlock {
    SecondaryRole,
    ReadOnly,
}

impl WriteBlock {
    pub fn reason(&self) -> &'static str {
        match self {
            WriteBlock::SecondaryRole => "writes are disabled on a secondary instance",
            WriteBlock::ReadOnly => "database is read-only",
        }
    }
}

/// Cached connectivity and read-only flags for this instance.
///
/// The flags are advisory: handlers read them as a fast-path precondition and
/// only the health probe writes them. Races between the two are benign.
#[derive(Debug)]
pub struct Readiness {
    role: Role,
    connected: AtomicBool,
    read_only: AtomicBool,
}

impl Readiness {
    pub fn new(role: Role, connected: bool, read_only: bool) -> Self {
        Self {
            role,
            connected: AtomicBool::new(connected),
            read_only: AtomicBool::new(read_only),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            connected: self.connected.load(Ordering::Acquire),
            read_only: self.read_only.load(Ordering::Acquire),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Record the outcome of a liveness probe.
    pub fn record_probe_result(&self, ok: bool) {
        let was = self.connected.swap(ok, Ordering::AcqRel);
        match (was, ok) {
            (true, false) => tracing::warn!(role = %self.role, "database connection lost"),
            (false, true) => tracing::info!(role = %self.role, "database connection restored"),
            _ => {}
        }
    }

    pub fn record_read_only(&self, read_only: bool) {
        let was = self.read_only.swap(read_only, Ordering::AcqRel);
        if was != read_only {
            tracing::warn!(role = %self.role, read_only, "database read-only state changed");
        }
    }

    pub fn verdict(&self) -> Verdict {
        let snapshot = self.snapshot();
        classify(self.role, snapshot.connected, snapshot.read_only)
    }

    /// Writes are refused on a secondary, or whenever the database was last
    /// seen read-only, regardless of whether the write would succeed.
    pub fn check_writable(&self) -> Result<(), WriteBlock> {
        if self.role == Role::Secondary {
            return Err(WriteBlock::SecondaryRole);
        }
        if self.read_only.load(Ordering::Acquire) {
            return Err(WriteBlock::ReadOnly);
        }
        Ok(())
    }
}

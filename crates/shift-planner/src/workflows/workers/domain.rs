use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::guarantee::DriverId;

/// Role a registered account holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    Driver,
    Admin,
}

impl WorkerRole {
    pub const fn label(self) -> &'static str {
        match self {
            WorkerRole::Driver => "driver",
            WorkerRole::Admin => "admin",
        }
    }
}

/// A registered gig worker (or admin) account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: DriverId,
    pub name: String,
    pub email: String,
    pub role: WorkerRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterWorker {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: WorkerRole,
}

fn default_role() -> WorkerRole {
    WorkerRole::Driver
}

/// Public shape of a worker record; same fields today, but kept separate
/// so credentials can later stay off the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerView {
    pub id: DriverId,
    pub name: String,
    pub email: String,
    pub role: &'static str,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Worker {
    pub fn to_view(&self) -> WorkerView {
        WorkerView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.label(),
            active: self.active,
            created_at: self.created_at,
        }
    }
}

//! Strongly-typed identifiers for domain entities
//!
//! Entities owned by the service platform are identified by newtype wrappers
//! around UUIDs. Records created by downstream collaborators (sales orders,
//! warranty claims) come back with identifiers whose format we do not
//! control, so those are wrapped as opaque string references instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

macro_rules! define_ref {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

// Service platform identifiers
define_id!(WorkOrderId, "WO");
define_id!(ServiceRequestId, "SR");
define_id!(AssessmentId, "BA");
define_id!(AttemptId, "ATT");

// Master data identifiers
define_id!(CustomerId, "CUS");
define_id!(ProductId, "PRD");
define_id!(TechnicianId, "TEC");
define_id!(PartId, "PRT");
define_id!(WarrantyCardId, "WC");

// References to records created by collaborators
define_ref!(SalesOrderRef);
define_ref!(WarrantyClaimRef);

/// Key that makes side-effecting collaborator calls safe to retry
///
/// Built from the work order being assessed and the attempt that is
/// assessing it. Collaborators that honour the key return the record created
/// by the first call instead of creating a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct IdempotencyKey {
    work_order_id: WorkOrderId,
    attempt_id: AttemptId,
}

impl IdempotencyKey {
    pub fn new(work_order_id: WorkOrderId, attempt_id: AttemptId) -> Self {
        Self {
            work_order_id,
            attempt_id,
        }
    }

    /// Creates a key for a fresh attempt on the given work order
    pub fn fresh(work_order_id: WorkOrderId) -> Self {
        Self::new(work_order_id, AttemptId::new_v7())
    }

    pub fn work_order_id(&self) -> WorkOrderId {
        self.work_order_id
    }

    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.work_order_id, self.attempt_id)
    }
}

impl FromStr for IdempotencyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (work_order, attempt) = s
            .split_once(':')
            .ok_or_else(|| format!("Malformed idempotency key: {}", s))?;
        let work_order_id = work_order
            .parse::<WorkOrderId>()
            .map_err(|e| format!("Malformed work order in idempotency key: {}", e))?;
        let attempt_id = attempt
            .parse::<AttemptId>()
            .map_err(|e| format!("Malformed attempt in idempotency key: {}", e))?;
        Ok(Self::new(work_order_id, attempt_id))
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> String {
        key.to_string()
    }
}

impl TryFrom<String> for IdempotencyKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

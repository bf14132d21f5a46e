//! Typed resource records returned by provider fetches

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One compute function, as shown in the function list and detail panes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,
    pub runtime: String,
    pub handler: String,
    #[serde(default)]
    pub description: String,
    pub memory_mb: i32,
    pub timeout_secs: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub status: String,
    /// Environment variables with sensitive-looking values already masked
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

/// One object-store bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// One container service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    pub cluster: String,
    pub status: String,
    pub desired_count: i32,
    pub running_count: i32,
}

/// Result of invoking a compute function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub status_code: i32,
    /// Raw response payload from the function
    pub payload: Vec<u8>,
    /// Set when the function itself errored (as opposed to the transport)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_error: Option<String>,
    /// Decoded tail of the execution log, when the provider returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tail: Option<String>,
}

/// Opaque payload stored in the cache and fanned out to subscribers.
///
/// The caching core never looks inside; only the presentation layer
/// matches on the variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceRecords {
    FunctionList(Vec<FunctionSummary>),
    Function(FunctionSummary),
    Invocation(InvocationOutcome),
    BucketList(Vec<BucketSummary>),
    ServiceList(Vec<ServiceSummary>),
}

impl ResourceRecords {
    /// Count of records, for status lines ("Loaded 12 functions")
    pub fn len(&self) -> usize {
        match self {
            ResourceRecords::FunctionList(v) => v.len(),
            ResourceRecords::BucketList(v) => v.len(),
            ResourceRecords::ServiceList(v) => v.len(),
            ResourceRecords::Function(_) | ResourceRecords::Invocation(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

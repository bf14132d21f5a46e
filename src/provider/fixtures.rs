//! Test fixtures and builders for resource record types
//!
//! Import via `use crate::provider::fixtures::*` in test modules.

#![allow(dead_code)]

use std::collections::HashMap;

use crate::provider::models::{BucketSummary, FunctionSummary, ServiceSummary};

/// Builder for test `FunctionSummary` instances with sensible defaults.
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: String,
    runtime: String,
    status: String,
    environment: HashMap<String, String>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: "python3.12".to_string(),
            status: "Active".to_string(),
            environment: HashMap::new(),
        }
    }

    pub fn runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> FunctionSummary {
        FunctionSummary {
            handler: format!("{}.handler", self.name),
            description: String::new(),
            memory_mb: 256,
            timeout_secs: 30,
            last_modified: None,
            name: self.name,
            runtime: self.runtime,
            status: self.status,
            environment: self.environment,
        }
    }
}

pub fn bucket(name: impl Into<String>) -> BucketSummary {
    BucketSummary {
        name: name.into(),
        created_at: None,
        region: Some("us-east-1".to_string()),
    }
}

pub fn service(name: impl Into<String>) -> ServiceSummary {
    ServiceSummary {
        name: name.into(),
        cluster: "default".to_string(),
        status: "ACTIVE".to_string(),
        desired_count: 2,
        running_count: 2,
    }
}

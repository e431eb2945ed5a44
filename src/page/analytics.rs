//! Analytics sink surface
//!
//! Terminal loader transitions and peripheral page interactions may emit
//! named events to an optional sink. Delivery is fire and forget: a sink
//! error is reported back as a string so the caller can log it, and never
//! influences presentation state.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::{Map, Value};

/// A named analytics event with optional category/label and free-form
/// parameters, mirroring the common `(event, {category, label, ...})` shape
/// of web analytics APIs
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub category: Option<String>,
    pub label: Option<String>,
    pub params: Map<String, Value>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            label: None,
            params: Map::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Destination for analytics events
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: AnalyticsEvent) -> Result<(), String>;
}

/// Accepts and discards every event
pub struct NoopAnalytics;

impl NoopAnalytics {
    pub fn new() -> Self {
        NoopAnalytics
    }
}

impl Default for NoopAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: AnalyticsEvent) -> Result<(), String> {
        Ok(())
    }
}

/// Stores every event for later inspection in tests
pub struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Default for RecordingAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), String> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// Rejects every event; used to verify sink failures stay contained
pub struct FailingAnalytics;

impl AnalyticsSink for FailingAnalytics {
    fn track(&self, event: AnalyticsEvent) -> Result<(), String> {
        Err(format!("sink unavailable, dropped '{}'", event.name))
    }
}

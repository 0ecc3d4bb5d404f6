//! Conversation context management
//!
//! This module tracks multi-step interactions, such as a premium user typing
//! a region name after pressing "Set Region".

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

/// Scenario started by the "Set Region" button
pub const REGION_SELECTION: &str = "region_selection";
/// Waiting for the region name as plain text
pub const AWAITING_REGION: &str = "awaiting_region";
/// How long a region prompt stays answerable
pub const REGION_SELECTION_TTL_MINUTES: i64 = 10;

/// User conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Telegram user ID this context belongs to
    pub user_id: i64,
    /// Current scenario the user is in
    pub scenario: Option<String>,
    /// Current step within the scenario
    pub step: Option<String>,
    /// Scenario-specific data
    pub data: HashMap<String, serde_json::Value>,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new conversation context for a user
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            scenario: None,
            step: None,
            data: HashMap::new(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Context for a pending region prompt
    pub fn region_selection(user_id: i64) -> Self {
        let mut context = Self::new(user_id);
        context.start_scenario(REGION_SELECTION, AWAITING_REGION, Duration::minutes(REGION_SELECTION_TTL_MINUTES));
        context
    }

    /// Start a new scenario
    pub fn start_scenario(&mut self, scenario: &str, initial_step: &str, lifetime: Duration) {
        self.scenario = Some(scenario.to_string());
        self.step = Some(initial_step.to_string());
        self.data.clear();
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + lifetime);
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Check if user is in a specific scenario and step
    pub fn is_at(&self, scenario: &str, step: &str) -> bool {
        self.scenario.as_deref() == Some(scenario) && self.step.as_deref() == Some(step)
    }

    pub fn is_awaiting_region(&self) -> bool {
        self.is_at(REGION_SELECTION, AWAITING_REGION)
    }
}

//! Yield farm types

use serde::{Deserialize, Serialize};

use crate::token::TokenRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmStatus {
    Active,
    Ended,
    Upcoming,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::Active => "active",
            FarmStatus::Ended => "ended",
            FarmStatus::Upcoming => "upcoming",
        }
    }
}

/// A staking/reward opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub staking_token: TokenRef,
    pub reward_token: TokenRef,
    /// Annual percentage yield, as a decimal string
    pub apy: String,
    pub total_staked: String,
    /// Reward emission per second in raw units
    pub reward_rate: String,
    pub start_time: i64,
    pub end_time: i64,
    pub status: FarmStatus,
}

impl Farm {
    pub fn apy_value(&self) -> f64 {
        self.apy.parse().unwrap_or(0.0)
    }

    pub fn total_staked_value(&self) -> f64 {
        self.total_staked.parse().unwrap_or(0.0)
    }
}

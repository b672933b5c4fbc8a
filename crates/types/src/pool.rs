//! Liquidity pool types and query parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;
use crate::token::TokenRef;

/// Results per page when querying pools
pub const POOL_PAGE_SIZE: usize = 100;

// ============================================================================
// Pool
// ============================================================================

/// Pool program family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    /// Constant-product pool
    Standard,
    /// Concentrated-liquidity pool
    Concentrated,
}

impl PoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Standard => "standard",
            PoolType::Concentrated => "concentrated",
        }
    }
}

/// 24h activity of a pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDayStats {
    pub volume: f64,
    pub volume_fee: f64,
    pub apr: f64,
}

/// A liquidity pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: String,
    #[serde(rename = "type")]
    pub pool_type: PoolType,
    pub program_id: String,
    pub mint_a: TokenRef,
    pub mint_b: TokenRef,
    pub lp_mint: Option<String>,
    /// Units of mint B per unit of mint A
    pub price: f64,
    pub mint_amount_a: f64,
    pub mint_amount_b: f64,
    /// Trading fee as a fraction (0.0025 = 0.25%)
    pub fee_rate: f64,
    pub tvl: f64,
    pub day: PoolDayStats,
}

impl Pool {
    pub fn contains_mint(&self, mint: &str) -> bool {
        self.mint_a.address == mint || self.mint_b.address == mint
    }

    /// Whether the pool trades exactly this pair, in either direction
    pub fn matches_pair(&self, mint1: &str, mint2: &str) -> bool {
        (self.mint_a.address == mint1 && self.mint_b.address == mint2)
            || (self.mint_a.address == mint2 && self.mint_b.address == mint1)
    }

    /// Output units per input unit when selling `input_mint` into the pool
    pub fn directional_price(&self, input_mint: &str) -> Option<f64> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return None;
        }
        if self.mint_a.address == input_mint {
            Some(self.price)
        } else if self.mint_b.address == input_mint {
            Some(1.0 / self.price)
        } else {
            None
        }
    }

    /// Reported reserve of `mint`, in UI units
    pub fn reserve_of(&self, mint: &str) -> Option<f64> {
        let reserve = if self.mint_a.address == mint {
            self.mint_amount_a
        } else if self.mint_b.address == mint {
            self.mint_amount_b
        } else {
            return None;
        };
        (reserve.is_finite() && reserve > 0.0).then_some(reserve)
    }

    /// Value of the field a pool query sorts on
    pub fn sort_value(&self, field: PoolSortField) -> f64 {
        match field {
            PoolSortField::Liquidity => self.tvl,
            PoolSortField::Volume24h => self.day.volume,
            PoolSortField::Fee24h => self.day.volume_fee,
            PoolSortField::Apr24h => self.day.apr,
        }
    }
}

/// One page of pools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPage {
    pub count: u64,
    pub data: Vec<Pool>,
    pub has_next_page: bool,
}

// ============================================================================
// Query parameters
// ============================================================================

/// Pool family filter for pair lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolTypeFilter {
    #[default]
    All,
    Standard,
    Concentrated,
}

impl PoolTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolTypeFilter::All => "all",
            PoolTypeFilter::Standard => "standard",
            PoolTypeFilter::Concentrated => "concentrated",
        }
    }

    pub fn accepts(&self, pool_type: PoolType) -> bool {
        match self {
            PoolTypeFilter::All => true,
            PoolTypeFilter::Standard => pool_type == PoolType::Standard,
            PoolTypeFilter::Concentrated => pool_type == PoolType::Concentrated,
        }
    }
}

impl FromStr for PoolTypeFilter {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PoolTypeFilter::All),
            "standard" => Ok(PoolTypeFilter::Standard),
            "concentrated" => Ok(PoolTypeFilter::Concentrated),
            other => Err(GatewayError::invalid_argument(format!(
                "Invalid pool type: {}",
                other
            ))),
        }
    }
}

/// Sort keys accepted by pair lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolSortField {
    #[default]
    Liquidity,
    Volume24h,
    Fee24h,
    Apr24h,
}

impl PoolSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolSortField::Liquidity => "liquidity",
            PoolSortField::Volume24h => "volume24h",
            PoolSortField::Fee24h => "fee24h",
            PoolSortField::Apr24h => "apr24h",
        }
    }
}

impl FromStr for PoolSortField {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liquidity" => Ok(PoolSortField::Liquidity),
            "volume24h" => Ok(PoolSortField::Volume24h),
            "fee24h" => Ok(PoolSortField::Fee24h),
            "apr24h" => Ok(PoolSortField::Apr24h),
            other => Err(GatewayError::invalid_argument(format!(
                "Invalid sort field: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(GatewayError::invalid_argument(format!(
                "Invalid sort order: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pools-by-mints lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PoolQuery {
    pub mint1: String,
    pub mint2: Option<String>,
    pub pool_type: PoolTypeFilter,
    pub sort: PoolSortField,
    pub order: SortOrder,
    /// 1-based page number
    pub page: u32,
}

impl PoolQuery {
    /// Query with default type, sort, order and page
    pub fn for_mints(mint1: impl Into<String>, mint2: Option<String>) -> Self {
        Self {
            mint1: mint1.into(),
            mint2,
            pool_type: PoolTypeFilter::default(),
            sort: PoolSortField::default(),
            order: SortOrder::default(),
            page: 1,
        }
    }

    pub fn matches(&self, pool: &Pool) -> bool {
        let pair_ok = match &self.mint2 {
            Some(mint2) => pool.matches_pair(&self.mint1, mint2),
            None => pool.contains_mint(&self.mint1),
        };
        pair_ok && self.pool_type.accepts(pool.pool_type)
    }
}

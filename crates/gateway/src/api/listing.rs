//! Pagination, filtering and sorting applied by the listing endpoints

use std::cmp::Ordering;

use swapdeck_types::{Farm, GatewayError, GatewayResult, Pool, SortOrder};

use super::responses::PoolSummary;

pub const DEFAULT_TOKEN_LIMIT: usize = 100;

/// Parse an optional numeric query parameter
pub fn parse_count(raw: Option<&str>, default: usize, name: &str) -> GatewayResult<usize> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| GatewayError::invalid_argument(format!("Invalid {}", name))),
    }
}

/// Offset/limit window over `items`; an offset past the end yields nothing
pub fn page<T: Clone>(items: &[T], offset: usize, limit: usize) -> Vec<T> {
    items.iter().skip(offset).take(limit).cloned().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmSortKey {
    Apy,
    TotalStaked,
    Name,
}

impl FarmSortKey {
    /// Unrecognized keys fall back to name order
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("apy") => FarmSortKey::Apy,
            Some("totalStaked") => FarmSortKey::TotalStaked,
            Some(_) => FarmSortKey::Name,
        }
    }
}

/// Filter by status, then sort. Numeric keys sort descending, name ascending.
pub fn select_farms(farms: Vec<Farm>, status: Option<&str>, sort: FarmSortKey) -> Vec<Farm> {
    let mut farms: Vec<Farm> = match status.filter(|s| !s.is_empty()) {
        Some(status) => farms
            .into_iter()
            .filter(|farm| farm.status.as_str() == status)
            .collect(),
        None => farms,
    };

    match sort {
        FarmSortKey::Apy => farms.sort_by(|a, b| desc(a.apy_value(), b.apy_value())),
        FarmSortKey::TotalStaked => {
            farms.sort_by(|a, b| desc(a.total_staked_value(), b.total_staked_value()))
        }
        FarmSortKey::Name => farms.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    farms
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Pools ordered by id, ascending only when asked for
pub fn sort_pools_by_id(pools: &mut [Pool], order: SortOrder) {
    pools.sort_by(|a, b| match order {
        SortOrder::Asc => a.id.cmp(&b.id),
        SortOrder::Desc => b.id.cmp(&a.id),
    });
}

impl From<Pool> for PoolSummary {
    fn from(pool: Pool) -> Self {
        PoolSummary {
            pool_type: pool.pool_type.as_str().to_string(),
            id: pool.id,
            program_id: pool.program_id,
            reserve0: pool.mint_amount_a.to_string(),
            reserve1: pool.mint_amount_b.to_string(),
            token0: pool.mint_a,
            token1: pool.mint_b,
            total_liquidity: pool.tvl.to_string(),
            volume_24h: pool.day.volume.to_string(),
            apy: pool.day.apr.to_string(),
            fee: percent(pool.fee_rate),
            lp_mint: pool.lp_mint,
        }
    }
}

/// Fraction as a percentage string, clear of float noise
fn percent(rate: f64) -> String {
    ((rate * 100.0 * 1e6).round() / 1e6).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::placeholder::farm_table;
    use chrono::Utc;
    use swapdeck_types::{PoolDayStats, PoolType, TokenRef};

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None, 100, "limit").unwrap(), 100);
        assert_eq!(parse_count(Some("5"), 100, "limit").unwrap(), 5);
        let err = parse_count(Some("five"), 100, "limit").unwrap_err();
        assert_eq!(err.to_string(), "Invalid limit");
        assert!(parse_count(Some("-1"), 0, "offset").is_err());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items = vec![1, 2, 3];
        assert_eq!(page(&items, 1, 5), vec![2, 3]);
        assert!(page(&items, 10, 5).is_empty());
    }

    #[test]
    fn test_farms_sorted_by_apy_desc() {
        let farms = select_farms(farm_table(Utc::now()), None, FarmSortKey::parse(None));
        let apys: Vec<f64> = farms.iter().map(|f| f.apy_value()).collect();
        assert!(apys.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_farms_unknown_key_sorts_by_name() {
        let farms = select_farms(farm_table(Utc::now()), None, FarmSortKey::parse(Some("bogus")));
        let names: Vec<&str> = farms.iter().map(|f| f.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_pool_summary_fields() {
        let pool = Pool {
            id: "pool".to_string(),
            pool_type: PoolType::Standard,
            program_id: "prog".to_string(),
            mint_a: TokenRef::new("RAYmint", "RAY", "Raydium", 6),
            mint_b: TokenRef::new("USDCmint", "USDC", "USD Coin", 6),
            lp_mint: None,
            price: 3.0,
            mint_amount_a: 2_000.0,
            mint_amount_b: 6_000.0,
            fee_rate: 0.0025,
            tvl: 12_000.0,
            day: PoolDayStats {
                volume: 500.0,
                volume_fee: 1.25,
                apr: 8.1,
            },
        };

        let summary = serde_json::to_value(PoolSummary::from(pool)).unwrap();
        assert_eq!(summary["token0"]["symbol"], "RAY");
        assert_eq!(summary["token1"]["address"], "USDCmint");
        assert_eq!(summary["reserve0"], "2000");
        assert_eq!(summary["totalLiquidity"], "12000");
        assert_eq!(summary["volume24h"], "500");
        assert_eq!(summary["apy"], "8.1");
        assert_eq!(summary["fee"], "0.25");
        assert_eq!(summary["type"], "standard");
    }

    #[test]
    fn test_farm_status_filter() {
        let farms = select_farms(farm_table(Utc::now()), Some("ended"), FarmSortKey::Apy);
        assert_eq!(farms.len(), 1);
        assert_eq!(farms[0].id, "ray-usdt-farm");
    }
}

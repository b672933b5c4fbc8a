//! Placeholder data not yet wired to a live source
//!
//! Farms, wallet token accounts and portfolios are constant tables. They live
//! here, apart from the chain clients, so nothing downstream mistakes them for
//! chain reads.

use chrono::{DateTime, Utc};
use swapdeck_types::{
    Allocation, Farm, FarmStatus, PoolPosition, Portfolio, PortfolioToken, TokenAccountEntry,
    TokenRef, ValueChange, WalletTokenAccounts, RAY_MINT, SOL_MINT, USDC_MINT,
};

/// Address used for LP tokens that have no known mint yet
pub const PLACEHOLDER_ADDRESS: &str = "placeholder";

pub const DEMO_WARNING: &str =
    "This is a demo implementation. Connect a real wallet for actual token accounts.";

const REWARD_RATE: &str = "100000000000000000000";
const DAY_SECS: i64 = 86_400;

fn lp_token(symbol: &str) -> TokenRef {
    TokenRef::new(PLACEHOLDER_ADDRESS, symbol, symbol, 9)
}

fn ray() -> TokenRef {
    TokenRef::new(RAY_MINT, "RAY", "Raydium", 6)
}

/// Static farm table; start and end times are relative to `now`
pub fn farm_table(now: DateTime<Utc>) -> Vec<Farm> {
    let now = now.timestamp();
    let farm = |id: &str, name: &str, staking: TokenRef, apy: &str, staked: &str, status: FarmStatus| Farm {
        id: id.to_string(),
        name: name.to_string(),
        staking_token: staking,
        reward_token: ray(),
        apy: apy.to_string(),
        total_staked: staked.to_string(),
        reward_rate: REWARD_RATE.to_string(),
        start_time: now - DAY_SECS,
        end_time: match status {
            FarmStatus::Ended => now - 1,
            _ => now + DAY_SECS * 30,
        },
        status,
    };

    vec![
        farm("ray-sol-farm", "RAY-SOL Farm", lp_token("RAY-SOL LP"), "25.5", "1000000", FarmStatus::Active),
        farm("ray-usdc-farm", "RAY-USDC Farm", lp_token("RAY-USDC LP"), "18.2", "2500000", FarmStatus::Active),
        farm("sol-usdc-farm", "SOL-USDC Farm", lp_token("SOL-USDC LP"), "12.8", "5400000", FarmStatus::Active),
        farm("ray-usdt-farm", "RAY-USDT Farm", lp_token("RAY-USDT LP"), "7.4", "640000", FarmStatus::Ended),
        farm("ray-staking", "RAY Staking", ray(), "15.6", "3200000", FarmStatus::Active),
    ]
}

/// Demo token accounts returned in place of a wallet read
pub fn demo_token_accounts(now: DateTime<Utc>) -> WalletTokenAccounts {
    WalletTokenAccounts {
        accounts: vec![
            TokenAccountEntry {
                mint: SOL_MINT.to_string(),
                symbol: "SOL".to_string(),
                balance: "1.5".to_string(),
                decimals: 9,
                ui_amount: 1.5,
            },
            TokenAccountEntry {
                mint: USDC_MINT.to_string(),
                symbol: "USDC".to_string(),
                balance: "100".to_string(),
                decimals: 6,
                ui_amount: 100.0,
            },
        ],
        total_value: "$250.50".to_string(),
        last_updated: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        warning: Some(DEMO_WARNING.to_string()),
    }
}

/// Demo portfolio for `wallet_address`
pub fn demo_portfolio(wallet_address: &str) -> Portfolio {
    let token = |symbol: &str, name: &str, balance: &str, value: &str, price: &str, change: &str| {
        PortfolioToken {
            symbol: symbol.to_string(),
            name: name.to_string(),
            balance: balance.to_string(),
            value: value.to_string(),
            price: price.to_string(),
            change_24h: change.to_string(),
        }
    };
    let position = |pool: &str, t0: &str, t1: &str, liquidity: &str, value: &str, apy: &str, share: &str| {
        PoolPosition {
            pool_name: pool.to_string(),
            token0: t0.to_string(),
            token1: t1.to_string(),
            liquidity: liquidity.to_string(),
            value: value.to_string(),
            apy: apy.to_string(),
            share: share.to_string(),
        }
    };

    Portfolio {
        wallet_address: wallet_address.to_string(),
        total_value: "$25,468.73".to_string(),
        change_24h: ValueChange {
            value: "$234.56".to_string(),
            percentage: "+2.8%".to_string(),
            is_positive: true,
        },
        tokens: vec![
            token("SOL", "Solana", "12.5678", "$2,514.36", "$200.15", "+2.4%"),
            token("RAY", "Raydium", "1,245.87", "$1,867.31", "$1.50", "-1.2%"),
            token("USDC", "USD Coin", "856.42", "$856.42", "$1.00", "0.0%"),
        ],
        pool_positions: vec![
            position("RAY-SOL", "RAY", "SOL", "1,234.56", "$2,845.32", "24.5%", "0.025%"),
            position("SOL-USDC", "SOL", "USDC", "856.23", "$1,923.14", "18.7%", "0.018%"),
        ],
        allocation: Allocation {
            tokens: 35.2,
            liquidity: 28.7,
            farming: 24.1,
            staking: 12.0,
        },
        warning: Some("Portfolio values are demo data.".to_string()),
    }
}

pub mod collect;
pub mod config;
pub mod coupon;
pub mod dashboard;
pub mod export;
pub mod http_client;
pub mod injuries;
pub mod nba_fetch;
pub mod persist;
pub mod quarters;
pub mod records;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod teams;

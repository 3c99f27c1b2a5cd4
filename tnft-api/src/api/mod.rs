//! HTTP API handlers for tnft-api

pub mod categories;
pub mod health;
pub mod nfts;

pub use categories::category_routes;
pub use health::health_routes;
pub use nfts::nft_routes;

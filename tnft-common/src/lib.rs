//! # TNFT Common Library
//!
//! Shared code for the NFT metadata services:
//! - Domain models (NFT records, users, categories, query context)
//! - Configuration resolution
//! - Common error type

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{Category, MediaRef, Nft, QueryContext, User, UNIQUE_SERIE_ID};

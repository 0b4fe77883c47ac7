//! Database models
//!
//! `FromRow` structs mirror the SQLite schema; create/update DTOs carry the
//! camelCase request bodies. Status and source are stored as TEXT and parsed
//! into enums at the API boundary.

pub mod admin;
pub mod banner;
pub mod order;
pub mod product;

pub use admin::Admin;
pub use banner::{Banner, BannerCreate, BannerUpdate};
pub use order::{Order, OrderCreate, OrderItemDetail, OrderItemInput, OrderSource, OrderStatus};
pub use product::{ColorInput, Product, ProductColor, ProductCreate, ProductUpdate, ProductWithColors};

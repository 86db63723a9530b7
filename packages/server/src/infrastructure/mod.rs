//! Infrastructure layer
//!
//! Domain 層で定義した trait（ポート）の実装と、外部との境界で使う DTO を提供します。

pub mod broadcast;
pub mod dto;
pub mod repository;
pub mod session;
pub mod store;

//! UpYun REST API client.

pub mod client;

pub use client::ApiClient;

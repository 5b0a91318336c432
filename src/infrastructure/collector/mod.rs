//! Collector notification adapters

mod http;

pub use http::HttpCollectorNotifier;

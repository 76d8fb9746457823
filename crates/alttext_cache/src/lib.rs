//! Content-addressed cache of uploaded media.
//!
//! Large payloads are uploaded to the backend's file store once and then
//! referenced by handle. This crate remembers those handles, keyed by a
//! digest of the payload and its MIME type, for a bounded time.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{
    CacheEntry, UploadCache, UploadCacheConfig, UploadCacheConfigBuilder, cache_key,
};

//! Host-facing bindings for `localeutil_core`.

pub mod api;

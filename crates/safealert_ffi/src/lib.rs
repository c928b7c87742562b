//! Flutter-facing bindings over `safealert_core`.

pub mod api;

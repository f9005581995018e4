//! Edge request middleware.
//!
//! Split into a pure decision step and an effectful layer:
//!
//! - **Classify**: Path rules yielding pass-through, redirect or rewrite
//! - **Annotate**: Diagnostic `x-*` headers derived from the decision
//! - **Edge**: Tower layer applying both to every request
//!
//! # Architecture
//!
//! ```text
//! Request → classify → ┬─ Redirect  → 307 + Location
//!                      ├─ Rewrite   → swap URI → Router
//!                      └─ PassThrough ────────→ Router
//!                               ↓
//!                  annotate (request + response headers)
//! ```
//!
//! Asset paths (`/static/*`, `/favicon.ico`, images) bypass the layer.

pub mod annotate;
pub mod classify;
pub mod edge;

pub use annotate::{RequestFacts, diagnostic_headers, merge_headers};
pub use classify::{Classification, RouteAction, RouteFlags, classify, is_asset_path};
pub use edge::{EdgeLayer, EdgeService};

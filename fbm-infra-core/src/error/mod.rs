//! Error handling for configuration loading and deployment planning
//!
//! Every failure is raised synchronously to the caller of the loader or the
//! planner. Nothing is retried or recovered internally: a malformed
//! configuration has to be fixed by whoever owns the file, so the errors
//! carry the section, field and line information needed to do that.
//!
//! ## Error Categories
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    FBM Error Taxonomy                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Source Errors        │  Shape Errors        │  Plan Errors  │
//! │  ┌────────────────┐   │  ┌────────────────┐  │  ┌──────────┐ │
//! │  │ • MissingName  │   │  │ • MissingField │  │  │ • Config │ │
//! │  │ • NotFound     │   │  │ • InvalidType  │  │  │ • Serial │ │
//! │  │ • Syntax       │   │  │ • UnknownField │  │  └──────────┘ │
//! │  │ • Io           │   │  │ • MissingSect. │  │               │
//! │  └────────────────┘   │  └────────────────┘  │               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod constructors;
pub mod types;

pub use types::{FbmError, FbmResult};

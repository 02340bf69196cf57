//! # CRUD Resolver
//!
//! Static resolution of service endpoints to the database tables they touch.
//!
//! Given facts extracted from a codebase (endpoints, method-call edges and
//! declared SQL mappings), `crud-resolver` answers "which tables does this
//! endpoint Select, Insert, Update or Delete?" It never executes code or
//! connects to a database.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌─────────────┐   ┌─────────┐   ┌────────────┐
//! │   Facts    │──▶│  Call graph  │──▶│ Reachability│──▶│ Matcher │──▶│ CRUD links │
//! └────────────┘   └──────────────┘   └─────────────┘   └─────────┘   └────────────┘
//!       │                                                    ▲
//!       └──────────────▶ SQL classifier ─────────────────────┘
//! ```
//!
//! 1. **Classification** - SQL-like mapping text, including templated
//!    fragments with `#{}` placeholders and dynamic tags, is reduced to an
//!    operation and table set through a degrading pipeline that never fails
//!    on present input.
//! 2. **Reachability** - a breadth-first search from each endpoint collects
//!    the data-access identifiers (`*Mapper`, `*Repository`, `*Dao`) it can
//!    reach.
//! 3. **Matching** - four tiers of decreasing precision pair reachable
//!    identifiers with mappings; every matched mapping yields one link per
//!    table.
//!
//! # Quick Start
//!
//! ```bash
//! crud-resolver analyze --facts facts.json
//! crud-resolver analyze --facts facts.yaml -f json --dialect mysql
//! cat facts.json | crud-resolver analyze --facts -
//! ```
//!
//! # Library Usage
//!
//! ```
//! use crud_resolver::{
//!     engine::CrudEngine,
//!     model::{CallEdge, Endpoint, Facts, Operation, SqlMapping}
//! };
//!
//! let facts = Facts {
//!     endpoints:    vec![Endpoint::new("GET", "/users", "UserController", "list", "")],
//!     call_edges:   vec![CallEdge::new("UserController", "list", "UserMapper", "findAll")],
//!     sql_mappings: vec![SqlMapping::new(
//!         "com.example.UserMapper",
//!         "findAll",
//!         Operation::Unknown,
//!         Some("SELECT * FROM users"),
//!         &[]
//!     )],
//!     batch_jobs:   vec![]
//! };
//!
//! let report = CrudEngine::default().run(&facts);
//! assert_eq!(report.links.len(), 1);
//! assert_eq!(report.links[0].table(), "users");
//! assert_eq!(report.links[0].crud_code(), 'S');
//! ```
//!
//! # Configuration
//!
//! See [`config`] for the TOML layout and environment overrides.
//!
//! # Modules
//!
//! - [`model`] - Fact model and identifier helpers
//! - [`preprocessor`] - Template normalization, repair and validation
//! - [`classify`] - SQL classification pipeline
//! - [`graph`] - Call graph and reachability
//! - [`matcher`] - Tiered mapping matcher
//! - [`engine`] - Run orchestration and statistics
//! - [`config`] - Configuration loading
//! - [`output`] - Report rendering
//! - [`cache`] - Per-classifier result cache
//! - [`error`] - Error types and constructors

pub mod app;
pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod matcher;
pub mod model;
pub mod output;
pub mod preprocessor;

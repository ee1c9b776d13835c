//! # CLI Module
//!
//! Command-line access to a route table: list it, match a request against
//! it, or generate a URL from it.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! ```bash
//! waymark routes --table routes.yaml
//! ```
//!
//! ### `match`
//!
//! Prints the matched route and its parameters as JSON:
//!
//! ```bash
//! waymark match GET /users/42
//! ```
//!
//! ### `url`
//!
//! ```bash
//! waymark url module-item module=users item=42
//! ```
//!
//! Every command takes `--table <FILE>`; without it `WAYMARK_ROUTES` is
//! used, and without that the default module/action table.

mod commands;

pub use commands::{run, run_cli, Cli, Commands};

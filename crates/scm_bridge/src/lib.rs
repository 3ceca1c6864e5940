//! scm_bridge - a vendor-neutral SCM client model.
//!
//! The [`platform`] module defines the common types (organizations,
//! repositories, pull requests, users, webhooks), one capability trait per
//! service group and the composed [`Client`]. Vendor drivers implement those
//! traits on top of the [`http`] transport boundary.
//!
//! # Features
//!
//! - `coding` (default) - Enables the Coding (e.coding.net) driver and the
//!   reqwest-backed transport.
//!
//! # Example
//!
//! ```ignore
//! use scm_bridge::coding;
//!
//! let client = coding::new_client("https://e.coding.net", "token")?;
//! let (user, resp) = client.users.find().await?;
//! println!("{} ({})", user.login, resp.id);
//!
//! let (repo, _) = client.repositories.find("acme/repo1").await?;
//! println!("{}", repo.clone);
//! ```

pub mod http;
pub mod platform;

#[cfg(feature = "coding")]
pub mod coding;

pub use platform::{Client, Driver, Response, Result, ScmError, strip_null_values};

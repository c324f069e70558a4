//! Host-based request classification for a workspace gateway.
//!
//! Every inbound request is assigned to at most one branch (blobserve, port,
//! or ide) from its hostname and path, together with the workspace
//! coordinates encoded in them. Requests no branch claims get a 404.

pub mod config;
pub mod error;
pub mod metrics;
pub mod proxy;
pub mod routing;
pub mod server;

//! Transport of finished deployment packages.
//!
//! [`DeployClient`] builds a multipart/form-data request around the archive
//! (one part, field name `file`, filename equal to the archive's base name)
//! and posts it through an injected [`HttpService`] handle bound to a named
//! base URL. Any HTTP response — success or not — comes back as an
//! [`UploadResponse`] carrying the status and the full body; only
//! connection, read, and local I/O failures are errors.
//!
//! The request body is fully buffered before sending. Bundles are one
//! static binary plus a small config tree; a deployment target with much
//! larger packages would want the body streamed from disk instead.

pub mod client;
pub mod multipart;
pub mod service;

pub use client::{DeployClient, TransportError, UploadResponse};
pub use service::{HttpError, HttpResponse, HttpService, ReqwestService};

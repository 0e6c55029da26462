//! Async client for the SevenRooms concierge API with cached bearer tokens and one-shot
//! re-authentication followed by a request replay.
//!
//! The entry point is [`engine::RequestEngine`]: build an [`config::EngineConfig`], hand it a
//! transport (reqwest by default), and call the reservation operations. The engine
//! authenticates lazily, attaches the cached token to every request, and when the API rejects
//! that token with `401` it re-authenticates and replays the same operation exactly once.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod obs;
pub mod params;
pub mod store;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _};

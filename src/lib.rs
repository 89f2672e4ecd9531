//! Session bootstrap gate for LMS clients: renew a stored credential, resolve the active
//! course, classify the route, and decide access on every navigation.
//!
//! The [`bootstrap::Orchestrator`] composes the pieces; each piece is usable on its own:
//! [`store::CredentialStore`] for fallback persistence, [`session::RenewalClient`] for the
//! credential exchange, [`course::CourseResolver`] for course context, [`route::classify`] for
//! path classification, and [`gate::decide`] for access decisions.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod backend;
pub mod bootstrap;
pub mod course;
pub mod error;
pub mod gate;
pub mod http;
pub mod obs;
pub mod route;
pub mod session;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		backend::{BackendClient, BackendDescriptor, ReqwestBackendClient},
		bootstrap::{BootstrapPhase, BootstrapStatus, Navigator, ReqwestOrchestrator},
		http::ReqwestTransport,
		store::{CredentialStore, MemoryStore},
	};

	/// Builds a backend client for `server_url` whose reqwest transport accepts the
	/// self-signed certificates produced by `httpmock`.
	pub fn test_backend(server_url: &str) -> ReqwestBackendClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");
		let descriptor =
			BackendDescriptor::parse(server_url).expect("Mock server URL should be a valid base.");

		BackendClient::with_transport(descriptor, ReqwestTransport::with_client(client))
	}

	/// Navigator that records every redirect and phase transition.
	#[derive(Debug, Default)]
	pub struct RecordingNavigator {
		redirects: Mutex<Vec<String>>,
		phases: Mutex<Vec<BootstrapPhase>>,
	}
	impl RecordingNavigator {
		/// Redirect targets in call order.
		pub fn redirects(&self) -> Vec<String> {
			self.redirects.lock().clone()
		}

		/// Observed phases in call order.
		pub fn phases(&self) -> Vec<BootstrapPhase> {
			self.phases.lock().clone()
		}
	}
	impl Navigator for RecordingNavigator {
		fn redirect(&self, path: &str) {
			self.redirects.lock().push(path.to_owned());
		}

		fn phase_changed(&self, status: &BootstrapStatus) {
			self.phases.lock().push(status.phase);
		}
	}

	/// Constructs an orchestrator over an in-memory store and a recording navigator, talking
	/// to the mock backend at `server_url`.
	pub fn build_test_orchestrator(
		server_url: &str,
	) -> (ReqwestOrchestrator, MemoryStore, Arc<RecordingNavigator>) {
		let memory = MemoryStore::default();
		let navigator = Arc::new(RecordingNavigator::default());
		let orchestrator = ReqwestOrchestrator::new(
			CredentialStore::new(Arc::new(memory.clone())),
			test_backend(server_url),
			navigator.clone(),
		);

		(orchestrator, memory, navigator)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

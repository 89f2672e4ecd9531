#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use lms_session::{
	_preludet::*,
	auth::{CourseId, CredentialSecret, UserId, UserProfile},
	course::{CourseResolver, CourseSelection},
	route::RouteClass,
	session::Session,
	store::{CredentialStore, MemoryStore},
};

fn signed_in() -> Session {
	let profile =
		UserProfile::new(UserId::new("u1").expect("User fixture should be valid."), "STUDENT", "sam");

	Session::authenticated(CredentialSecret::new("at-1"), profile)
}

fn selection(id: &str) -> CourseSelection {
	CourseSelection::new(CourseId::new(id).expect("Course fixture should be valid."))
}

fn resolver(server: &MockServer) -> (CourseResolver<lms_session::http::ReqwestTransport>, MemoryStore) {
	let memory = MemoryStore::default();
	let store = CredentialStore::new(Arc::new(memory.clone()));

	(CourseResolver::new(store, test_backend(&server.url("/"))), memory)
}

#[tokio::test]
async fn prior_selection_wins_and_skips_backend() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/course-enrollment/courses/u1");
			then.status(200).json_body(json!([{ "course": { "id": "c1" } }]));
		})
		.await;
	let (resolver, memory) = resolver(&server);
	let prior = Some(selection("c9"));

	for _ in 0..3 {
		let resolved =
			resolver.resolve(RouteClass::Dashboard, &signed_in(), prior.clone(), Some("c4")).await;

		assert_eq!(resolved, prior, "Prior selection must beat the persisted id.");
	}

	mock.assert_calls_async(0).await;

	assert!(memory.is_empty());
}

#[tokio::test]
async fn backend_order_is_authoritative() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/course-enrollment/courses/u1")
				.header("authorization", "Bearer at-1");
			then.status(200).json_body(json!([
				{ "id": "e2", "course": { "id": "z-course", "title": "Zoology" } },
				{ "id": "e1", "course": { "id": "a-course", "title": "Algebra" } },
			]));
		})
		.await;
	let (resolver, memory) = resolver(&server);
	let resolved = resolver.resolve(RouteClass::Dashboard, &signed_in(), None, None).await;

	mock.assert_async().await;

	assert_eq!(resolved, Some(selection("z-course")));
	assert_eq!(memory.peek("courseId"), Some("z-course".into()));

	let again = resolver.resolve(RouteClass::Dashboard, &signed_in(), resolved.clone(), None).await;

	assert_eq!(again, resolved);
	assert_eq!(resolver.backend_lookups(), 1);
}

#[tokio::test]
async fn malformed_trailing_enrollment_does_not_block_default() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/course-enrollment/courses/u1");
			then.status(200).json_body(json!([
				{ "course": { "id": "c1" } },
				{ "course": { "id": "bad id" } },
			]));
		})
		.await;
	let (resolver, memory) = resolver(&server);
	let resolved = resolver.resolve(RouteClass::Dashboard, &signed_in(), None, None).await;

	mock.assert_async().await;

	assert_eq!(resolved, Some(selection("c1")));
	assert_eq!(memory.peek("courseId"), Some("c1".into()));
}

#[tokio::test]
async fn listing_failures_leave_no_selection() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/course-enrollment/courses/u1");
			then.status(404).json_body(json!({ "message": "User not found" }));
		})
		.await;
	let (resolver, memory) = resolver(&server);

	assert_eq!(resolver.resolve(RouteClass::Dashboard, &signed_in(), None, None).await, None);

	mock.assert_async().await;

	assert!(memory.is_empty());
}

#[tokio::test]
async fn malformed_listing_leaves_no_selection() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/course-enrollment/courses/u1");
			then.status(200).body("<html>oops</html>");
		})
		.await;
	let (resolver, memory) = resolver(&server);

	assert_eq!(resolver.resolve(RouteClass::Dashboard, &signed_in(), None, None).await, None);

	mock.assert_async().await;

	assert!(memory.is_empty());
}

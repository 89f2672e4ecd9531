// std
use std::{
	env, fs,
	path::PathBuf,
	process,
	sync::Arc,
	time::{SystemTime, UNIX_EPOCH},
};
// self
use lms_session::store::{CredentialStore, FileStore, KeyValueStore, MemoryStore, StoreKey};

fn temp_path(label: &str) -> PathBuf {
	let unique = format!(
		"lms_session_store_it_{label}_{}_{}.json",
		process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_nanos())
			.unwrap_or_default(),
	);

	env::temp_dir().join(unique)
}

#[tokio::test]
async fn quota_overflow_spills_into_file_tier() {
	let path = temp_path("spill");
	let primary = MemoryStore::with_quota(24);
	let secondary = FileStore::open(&path).expect("File store should open.");
	let store = CredentialStore::new(Arc::new(primary.clone()))
		.with_secondary(Arc::new(secondary.clone()));

	assert!(store.set(StoreKey::CourseId, "c1").await);
	assert!(store.set(StoreKey::RefreshToken, "a-renewal-credential-too-long-for-quota").await);
	assert_eq!(primary.peek("courseId"), Some("c1".into()));
	assert_eq!(primary.peek("refreshToken"), None);

	let reopened = FileStore::open(&path).expect("File store should reopen.");

	assert_eq!(
		reopened.read("refreshToken").await.expect("Read should succeed."),
		Some("a-renewal-credential-too-long-for-quota".into())
	);
	assert_eq!(
		store.get(StoreKey::RefreshToken).await,
		Some("a-renewal-credential-too-long-for-quota".into())
	);

	store.clear().await;

	assert!(primary.is_empty());
	assert_eq!(secondary.read("refreshToken").await.expect("Read should succeed."), None);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary store snapshot {}: {e}", path.display())
	});
}

#[tokio::test]
async fn disabled_primary_reads_through_secondary() {
	let secondary = MemoryStore::default();

	secondary.write("courseId", "c3").await.expect("Seeding should succeed.");

	let store = CredentialStore::new(Arc::new(MemoryStore::disabled()))
		.with_secondary(Arc::new(secondary.clone()));

	assert_eq!(store.get(StoreKey::CourseId).await, Some("c3".into()));
	assert!(store.set(StoreKey::CourseId, "c4").await);
	assert_eq!(secondary.peek("courseId"), Some("c4".into()));

	store.remove(StoreKey::CourseId).await;

	assert_eq!(store.get(StoreKey::CourseId).await, None);
}

#[tokio::test]
async fn everything_disabled_is_a_silent_noop() {
	let store = CredentialStore::new(Arc::new(MemoryStore::disabled()))
		.with_secondary(Arc::new(MemoryStore::disabled()));

	assert!(!store.set(StoreKey::RefreshToken, "rt-1").await);
	assert_eq!(store.get(StoreKey::RefreshToken).await, None);

	store.clear().await;
}

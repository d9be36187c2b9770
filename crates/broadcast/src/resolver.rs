//! Recipient resolution per event scope.

use std::collections::HashSet;

use storage::{Profile, Storage};
use tracing::{debug, warn};

use crate::event::Role;
use crate::ids;
use crate::phone;

/// Duplicate-free collection of canonical phone numbers.
///
/// Order is irrelevant to delivery but kept stable for logs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSet {
    numbers: Vec<String>,
    seen: HashSet<String>,
}

impl RecipientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canonical number. Returns `false` when it was already present.
    pub fn insert(&mut self, number: String) -> bool {
        if !self.seen.insert(number.clone()) {
            return false;
        }
        self.numbers.push(number);
        true
    }

    /// Remove a number if present. Returns `true` when something was removed.
    pub fn remove(&mut self, number: &str) -> bool {
        if !self.seen.remove(number) {
            return false;
        }
        self.numbers.retain(|n| n != number);
        true
    }

    pub fn contains(&self, number: &str) -> bool {
        self.seen.contains(number)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// The numbers as a slice, insertion order.
    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }
}

/// Resolves an event scope into the phone numbers it should reach.
///
/// Every operation reads approved profiles, normalizes each phone, drops
/// the unusable ones and de-duplicates. Storage failures come back as an
/// empty set with a warning; the resolver never raises.
#[derive(Clone)]
pub struct RecipientResolver {
    storage: Storage,
}

impl RecipientResolver {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Every resident of a neighborhood, minus the excluded user.
    ///
    /// The exclusion removes the user's number itself, so a second profile
    /// sharing the same phone is dropped with it.
    pub async fn by_neighborhood(
        &self,
        neighborhood_id: &str,
        exclude_user_id: Option<&str>,
    ) -> RecipientSet {
        let Some(neighborhood_id) = ids::usable_id(Some(neighborhood_id)) else {
            debug!("No usable neighborhood id; resolving to nobody");
            return RecipientSet::new();
        };

        match storage::profile::profiles_by_neighborhood(self.storage.pool(), neighborhood_id).await
        {
            Ok(profiles) => collect_numbers(profiles, exclude_user_id),
            Err(err) => {
                warn!("Recipient lookup for neighborhood {} failed: {}", neighborhood_id, err);
                RecipientSet::new()
            }
        }
    }

    /// Every profile with the given role, optionally scoped to one
    /// neighborhood. An unusable neighborhood id widens to the whole role.
    pub async fn by_role(&self, role: Role, neighborhood_id: Option<&str>) -> RecipientSet {
        let hood = ids::usable_id(neighborhood_id);

        match storage::profile::profiles_by_role(self.storage.pool(), role.as_str(), hood).await {
            Ok(profiles) => collect_numbers(profiles, None),
            Err(err) => {
                warn!("Recipient lookup for role {} failed: {}", role.as_str(), err);
                RecipientSet::new()
            }
        }
    }

    /// A single profile's phone; zero or one element.
    pub async fn by_explicit_user(&self, user_id: &str) -> RecipientSet {
        let Some(user_id) = ids::usable_id(Some(user_id)) else {
            return RecipientSet::new();
        };

        match storage::profile::get_profile(self.storage.pool(), user_id).await {
            Ok(profile) => collect_numbers(vec![profile], None),
            Err(storage::StorageError::NotFound { .. }) => {
                debug!("No profile for {}; resolving to nobody", user_id);
                RecipientSet::new()
            }
            Err(err) => {
                warn!("Recipient lookup for user {} failed: {}", user_id, err);
                RecipientSet::new()
            }
        }
    }

    /// Every approved profile system-wide.
    pub async fn all(&self) -> RecipientSet {
        match storage::profile::list_approved_profiles(self.storage.pool()).await {
            Ok(profiles) => collect_numbers(profiles, None),
            Err(err) => {
                warn!("System-wide recipient lookup failed: {}", err);
                RecipientSet::new()
            }
        }
    }
}

fn collect_numbers(profiles: Vec<Profile>, exclude_user_id: Option<&str>) -> RecipientSet {
    let mut set = RecipientSet::new();
    let mut excluded_number = None;

    for profile in profiles {
        let Some(number) = phone::normalize(profile.phone.as_deref()) else {
            continue;
        };

        if exclude_user_id == Some(profile.id.as_str()) {
            excluded_number = Some(number);
            continue;
        }

        set.insert(number);
    }

    if let Some(number) = excluded_number {
        set.remove(&number);
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> Storage {
        let storage = Storage::connect("sqlite::memory:").await.unwrap();
        storage.migrate().await.unwrap();
        storage
    }

    async fn seed_profile(
        storage: &Storage,
        id: &str,
        name: &str,
        phone: Option<&str>,
        role: &str,
        hood: Option<&str>,
    ) {
        storage::profile::create_profile(storage.pool(), id, name, phone, role, hood, true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_by_neighborhood_normalizes_and_dedupes() {
        let storage = test_storage().await;
        seed_profile(&storage, "user-0001", "Ana", Some("+55 48 91111-2222"), "resident", Some("hood-centro-01")).await;
        seed_profile(&storage, "user-0002", "Bruno", Some("5548911112222"), "resident", Some("hood-centro-01")).await;
        seed_profile(&storage, "user-0003", "Carla", Some("123"), "resident", Some("hood-centro-01")).await;
        seed_profile(&storage, "user-0004", "Davi", None, "resident", Some("hood-centro-01")).await;

        let resolver = RecipientResolver::new(storage);
        let set = resolver.by_neighborhood("hood-centro-01", None).await;

        // Ana and Bruno share one canonical number; Carla and Davi have none.
        assert_eq!(set.len(), 1);
        assert!(set.contains("5548911112222"));
    }

    #[tokio::test]
    async fn test_exclusion_removes_the_number_itself() {
        let storage = test_storage().await;
        seed_profile(&storage, "user-0001", "Ana", Some("5548911112222"), "resident", Some("hood-centro-01")).await;
        seed_profile(&storage, "user-0002", "Bruno", Some("5548933334444"), "resident", Some("hood-centro-01")).await;

        let resolver = RecipientResolver::new(storage);
        let set = resolver.by_neighborhood("hood-centro-01", Some("user-0001")).await;

        assert_eq!(set.len(), 1);
        assert!(!set.contains("5548911112222"));
        assert!(set.contains("5548933334444"));
    }

    #[tokio::test]
    async fn test_sole_resident_excluded_yields_empty_set() {
        let storage = test_storage().await;
        seed_profile(&storage, "user-0001", "Ana", Some("5548911112222"), "resident", Some("hood-centro-01")).await;

        let resolver = RecipientResolver::new(storage);
        let set = resolver.by_neighborhood("hood-centro-01", Some("user-0001")).await;

        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_unusable_neighborhood_id_resolves_to_nobody() {
        let resolver = RecipientResolver::new(test_storage().await);
        assert!(resolver.by_neighborhood("", None).await.is_empty());
        assert!(resolver.by_neighborhood("  x ", None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unapproved_profiles_are_invisible() {
        let storage = test_storage().await;
        storage::profile::create_profile(
            storage.pool(),
            "user-0001",
            "Ana",
            Some("5548911112222"),
            "resident",
            Some("hood-centro-01"),
            false,
        )
        .await
        .unwrap();

        let resolver = RecipientResolver::new(storage);
        assert!(resolver.by_neighborhood("hood-centro-01", None).await.is_empty());
        assert!(resolver.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_by_role_scoping() {
        let storage = test_storage().await;
        seed_profile(&storage, "admin-001", "Ana", Some("5548911112222"), "admin", Some("hood-centro-01")).await;
        seed_profile(&storage, "admin-002", "Bruno", Some("5548933334444"), "admin", Some("hood-norte-02")).await;
        seed_profile(&storage, "scr-00001", "Rafael", Some("5548955556666"), "scr", Some("hood-centro-01")).await;

        let resolver = RecipientResolver::new(storage);

        let all_admins = resolver.by_role(Role::Admin, None).await;
        assert_eq!(all_admins.len(), 2);

        let centro_admins = resolver.by_role(Role::Admin, Some("hood-centro-01")).await;
        assert_eq!(centro_admins.len(), 1);
        assert!(centro_admins.contains("5548911112222"));

        // Unusable hood widens to the whole role.
        let widened = resolver.by_role(Role::Scr, Some("")).await;
        assert_eq!(widened.len(), 1);
    }

    #[tokio::test]
    async fn test_by_explicit_user() {
        let storage = test_storage().await;
        seed_profile(&storage, "user-0001", "Ana", Some("5548911112222"), "resident", None).await;
        seed_profile(&storage, "user-0002", "Davi", None, "resident", None).await;

        let resolver = RecipientResolver::new(storage);

        let set = resolver.by_explicit_user("user-0001").await;
        assert_eq!(set.len(), 1);

        assert!(resolver.by_explicit_user("user-0002").await.is_empty());
        assert!(resolver.by_explicit_user("user-missing-404").await.is_empty());
        assert!(resolver.by_explicit_user("short").await.is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_resolves_to_nobody() {
        let storage = test_storage().await;
        sqlx::query("DROP TABLE profiles")
            .execute(storage.pool())
            .await
            .unwrap();

        let resolver = RecipientResolver::new(storage);
        assert!(resolver.by_neighborhood("hood-centro-01", None).await.is_empty());
        assert!(resolver.by_role(Role::Admin, None).await.is_empty());
        assert!(resolver.all().await.is_empty());
    }

    #[test]
    fn test_recipient_set_basics() {
        let mut set = RecipientSet::new();
        assert!(set.insert("1111111111".to_string()));
        assert!(!set.insert("1111111111".to_string()));
        assert!(set.insert("2222222222".to_string()));
        assert_eq!(set.len(), 2);

        assert!(set.remove("1111111111"));
        assert!(!set.remove("1111111111"));
        assert_eq!(set.numbers(), ["2222222222".to_string()]);
    }
}

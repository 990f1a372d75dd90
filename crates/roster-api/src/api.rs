use roster_store::{InMemoryUserStore, InsertOutcome, User, UserId, UserStore};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::middleware::instrumented;
use crate::procedure::Procedure;
use crate::validation::{self, CreateUserInput, NewUser};

/// The user API: four procedures over an exclusively owned store.
///
/// Every public entry point validates its input before the store is
/// consulted and is wrapped by [`instrumented`].
pub struct UserApi {
    store: Box<dyn UserStore>,
}

impl UserApi {
    pub fn new(store: impl UserStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// An API over a store holding the seed users.
    pub fn seeded() -> Self {
        Self::new(InMemoryUserStore::seeded())
    }

    /// `getUsers`: every record in insertion order.
    pub fn get_users(&self) -> ApiResult<Vec<User>> {
        instrumented(Procedure::GetUsers, || self.list_users())
    }

    /// `getUserById`.
    pub fn get_user_by_id(&self, id: &str) -> ApiResult<User> {
        instrumented(Procedure::GetUserById, || {
            let id = validation::validate_id(id)?;
            self.fetch_user(id)
        })
    }

    /// `createUser`.
    pub fn create_user(&self, input: &CreateUserInput) -> ApiResult<User> {
        instrumented(Procedure::CreateUser, || {
            let new_user = validation::validate_create_user(input)?;
            self.register_user(new_user)
        })
    }

    /// `deleteUser`: returns the removed record.
    pub fn delete_user(&self, id: &str) -> ApiResult<User> {
        instrumented(Procedure::DeleteUser, || {
            let id = validation::validate_id(id)?;
            self.remove_user(id)
        })
    }

    /// Run `procedure` on a JSON input and return its JSON output.
    ///
    /// A missing input and JSON `null` are treated alike.
    pub fn call(&self, procedure: Procedure, input: Option<&Value>) -> ApiResult<Value> {
        instrumented(procedure, || match procedure {
            Procedure::GetUsers => Ok(serde_json::to_value(self.list_users()?)?),
            Procedure::GetUserById => {
                let id = validation::parse_id(input)?;
                Ok(serde_json::to_value(self.fetch_user(id)?)?)
            }
            Procedure::CreateUser => {
                let new_user = validation::parse_create_user(input)?;
                Ok(serde_json::to_value(self.register_user(new_user)?)?)
            }
            Procedure::DeleteUser => {
                let id = validation::parse_id(input)?;
                Ok(serde_json::to_value(self.remove_user(id)?)?)
            }
        })
    }

    /// Number of records in the store.
    pub fn user_count(&self) -> ApiResult<usize> {
        Ok(self.store.len()?)
    }

    fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.store.list_all()?)
    }

    fn fetch_user(&self, id: UserId) -> ApiResult<User> {
        self.store
            .find_by_id(&id)?
            .ok_or(ApiError::NotFound { id })
    }

    fn register_user(&self, new_user: NewUser) -> ApiResult<User> {
        let (name, email) = new_user.into_parts();
        match self.store.try_insert(name, email)? {
            InsertOutcome::Inserted(user) => Ok(user),
            InsertOutcome::EmailTaken(existing) => Err(ApiError::Conflict {
                email: existing.email,
            }),
        }
    }

    fn remove_user(&self, id: UserId) -> ApiResult<User> {
        self.store
            .remove_by_id(&id)?
            .ok_or(ApiError::NotFound { id })
    }
}

impl Default for UserApi {
    fn default() -> Self {
        Self::seeded()
    }
}

impl std::fmt::Debug for UserApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserApi")
            .field("user_count", &self.store.len().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use proptest::prelude::*;
    use serde_json::json;

    fn names(api: &UserApi) -> Vec<String> {
        api.get_users().unwrap().into_iter().map(|u| u.name).collect()
    }

    // -----------------------------------------------------------------------
    // Walkthrough over the seed data
    // -----------------------------------------------------------------------

    #[test]
    fn seeded_walkthrough() {
        let api = UserApi::seeded();
        assert_eq!(names(&api), ["Alice", "Bob", "Charlie"]);

        let dana = api
            .create_user(&CreateUserInput::new("Dana", "dana@x.com"))
            .unwrap();
        assert_eq!(dana, User::new("4".into(), "Dana", "dana@x.com"));

        let bob = api.delete_user("2").unwrap();
        assert_eq!(bob, User::new("2".into(), "Bob", "bob@x.com"));

        assert_eq!(names(&api), ["Alice", "Charlie", "Dana"]);
    }

    // -----------------------------------------------------------------------
    // Get
    // -----------------------------------------------------------------------

    #[test]
    fn get_existing_user() {
        let api = UserApi::seeded();
        assert_eq!(api.get_user_by_id("1").unwrap().name, "Alice");
    }

    #[test]
    fn get_missing_user_cites_id() {
        let api = UserApi::seeded();
        let err = api.get_user_by_id("42").unwrap_err();
        assert_eq!(err, ApiError::NotFound { id: "42".into() });
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn get_empty_id_is_validation_failure() {
        let api = UserApi::seeded();
        let err = api.get_user_by_id("").unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[test]
    fn created_user_is_retrievable() {
        let api = UserApi::seeded();
        let created = api
            .create_user(&CreateUserInput::new("Erin", "erin@x.com"))
            .unwrap();
        assert_eq!(api.get_user_by_id(created.id.as_str()).unwrap(), created);
    }

    #[test]
    fn duplicate_email_conflicts_and_leaves_store_unchanged() {
        let api = UserApi::seeded();
        let before = api.get_users().unwrap();
        let err = api
            .create_user(&CreateUserInput::new("Alicia", "alice@x.com"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(api.get_users().unwrap(), before);
    }

    #[test]
    fn invalid_input_fails_before_mutation() {
        let api = UserApi::seeded();
        for input in [
            CreateUserInput::new("D", "dana@x.com"),
            CreateUserInput::new("Dana", "dana-at-x.com"),
            CreateUserInput::new("", ""),
        ] {
            let err = api.create_user(&input).unwrap_err();
            assert_eq!(err.code(), ErrorCode::BadRequest);
        }
        assert_eq!(api.user_count().unwrap(), 3);

        // The counter did not move either.
        let next = api
            .create_user(&CreateUserInput::new("Dana", "dana@x.com"))
            .unwrap();
        assert_eq!(next.id.as_str(), "4");
    }

    #[test]
    fn invalid_email_on_taken_address_is_validation_not_conflict() {
        let api = UserApi::seeded();
        let err = api
            .create_user(&CreateUserInput::new("A", "alice@x.com"))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_missing_is_not_found_and_store_unchanged() {
        let api = UserApi::seeded();
        let err = api.delete_user("7").unwrap_err();
        assert_eq!(err, ApiError::NotFound { id: "7".into() });
        assert_eq!(api.user_count().unwrap(), 3);
    }

    #[test]
    fn deleted_user_is_gone() {
        let api = UserApi::seeded();
        api.delete_user("3").unwrap();
        assert_eq!(api.user_count().unwrap(), 2);
        assert_eq!(api.get_user_by_id("3").unwrap_err().code(), ErrorCode::NotFound);
        assert_eq!(api.delete_user("3").unwrap_err().code(), ErrorCode::NotFound);
    }

    #[test]
    fn recreate_after_delete_gets_fresh_id() {
        let api = UserApi::seeded();
        api.delete_user("3").unwrap();
        let again = api
            .create_user(&CreateUserInput::new("Charlie", "charlie@x.com"))
            .unwrap();
        assert_eq!(again.id.as_str(), "4");
    }

    // -----------------------------------------------------------------------
    // JSON dispatch
    // -----------------------------------------------------------------------

    #[test]
    fn call_dispatches_by_procedure() {
        let api = UserApi::seeded();

        let users = api.call(Procedure::GetUsers, None).unwrap();
        assert_eq!(users.as_array().map(|a| a.len()), Some(3));

        let alice = api.call(Procedure::GetUserById, Some(&json!("1"))).unwrap();
        assert_eq!(alice["email"], "alice@x.com");

        let dana = api
            .call(
                Procedure::CreateUser,
                Some(&json!({"name": "Dana", "email": "dana@x.com"})),
            )
            .unwrap();
        assert_eq!(dana, json!({"id": "4", "name": "Dana", "email": "dana@x.com"}));

        let bob = api.call(Procedure::DeleteUser, Some(&json!("2"))).unwrap();
        assert_eq!(bob["name"], "Bob");
    }

    #[test]
    fn call_rejects_mistyped_input() {
        let api = UserApi::seeded();
        let err = api.call(Procedure::GetUserById, Some(&json!(1))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);

        let err = api
            .call(Procedure::CreateUser, Some(&json!({"name": "Dana"})))
            .unwrap_err();
        assert_eq!(err.issues().unwrap()[0].path, "email");
        assert_eq!(api.user_count().unwrap(), 3);
    }

    #[test]
    fn get_users_ignores_input() {
        let api = UserApi::seeded();
        assert!(api.call(Procedure::GetUsers, Some(&json!({"x": 1}))).is_ok());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn create_then_get_returns_input_with_fresh_id(
            name in "[A-Za-z]{2,12}",
            local in "[a-z][a-z0-9]{0,8}",
            domain in "[a-z]{1,8}",
        ) {
            let api = UserApi::seeded();
            let email = format!("{local}@{domain}.test");
            let existing: Vec<UserId> =
                api.get_users().unwrap().into_iter().map(|u| u.id).collect();

            let input = CreateUserInput::new(name.clone(), email.clone());
            let created = api.create_user(&input).unwrap();
            prop_assert!(!existing.contains(&created.id));
            prop_assert_eq!(&created.name, &name);
            prop_assert_eq!(&created.email, &email);
            prop_assert_eq!(api.get_user_by_id(created.id.as_str()).unwrap(), created);
        }

        #[test]
        fn short_names_never_reach_the_store(name in "\\PC{0,1}") {
            let api = UserApi::seeded();
            let err = api.create_user(&CreateUserInput::new(name, "new@x.com")).unwrap_err();
            prop_assert_eq!(err.code(), ErrorCode::BadRequest);
            prop_assert_eq!(api.user_count().unwrap(), 3);
        }
    }
}

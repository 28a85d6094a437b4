//! Entities served through the caching layer
//!
//! The serialized form of these types is the cached representation, so field
//! order and names are part of the cache format.

use serde::{Deserialize, Serialize};

use crate::cache::keys;
use crate::models::requests::{NewPassenger, NewUser, PassengerChanges, UserChanges};

// == Entity Trait ==
/// An entity type owned by a repository and cached by the service layer.
pub trait Entity: Serialize + Clone + Send + Sync + 'static {
    /// Fields accepted on create
    type Draft: Send + 'static;
    /// Fields accepted on update
    type Patch: Send + 'static;

    /// Key prefix, e.g. `user` for `user_list` and `user_42`
    const KIND: &'static str;
    /// Tag carried by the collection snapshot of this entity type
    const TAG: &'static str;

    fn id(&self) -> i64;

    /// Tags attached to a cached copy of this entity. Detail copies only
    /// carry tags naming a specific owner, so every tag set stays bounded by
    /// that owner's records.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Tags whose members embed data from entity `id` and must be invalidated
    /// when it changes.
    fn dependent_tags(_id: i64) -> Vec<String> {
        Vec::new()
    }
}

// == User ==
/// Role of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Passenger,
    Driver,
    Admin,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub user_type: UserType,
}

impl Entity for User {
    type Draft = NewUser;
    type Patch = UserChanges;

    const KIND: &'static str = "user";
    const TAG: &'static str = "users";

    fn id(&self) -> i64 {
        self.id
    }

    // Passenger copies embed the user's email
    fn dependent_tags(id: i64) -> Vec<String> {
        vec![keys::user_passengers_tag(id)]
    }
}

// == Passenger ==
/// A passenger profile attached to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: i64,
    /// Id of the owning user
    pub user: i64,
    /// Email of the owning user, joined at read time
    pub user_email: String,
    pub passenger_id: String,
    pub preferred_payment_method: String,
    pub home_address: String,
}

impl Entity for Passenger {
    type Draft = NewPassenger;
    type Patch = PassengerChanges;

    const KIND: &'static str = "passenger";
    const TAG: &'static str = "passengers";

    fn id(&self) -> i64 {
        self.id
    }

    fn tags(&self) -> Vec<String> {
        vec![keys::user_passengers_tag(self.user)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_passenger() -> Passenger {
        Passenger {
            id: 1,
            user: 4,
            user_email: "ana@example.com".to_string(),
            passenger_id: "P-001".to_string(),
            preferred_payment_method: "card".to_string(),
            home_address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_user_representation() {
        let user = User {
            id: 3,
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Lima".to_string(),
            phone_number: "555-0100".to_string(),
            user_type: UserType::Driver,
        };

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "id": 3,
                "email": "ana@example.com",
                "first_name": "Ana",
                "last_name": "Lima",
                "phone_number": "555-0100",
                "user_type": "driver"
            })
        );
    }

    #[test]
    fn test_representation_is_stable() {
        let a = serde_json::to_string(&sample_passenger()).unwrap();
        let b = serde_json::to_string(&sample_passenger()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_passenger_tags_include_owner() {
        assert_eq!(
            sample_passenger().tags(),
            vec!["user_4_passengers".to_string()]
        );
    }

    #[test]
    fn test_user_copies_carry_no_tags() {
        let user = User {
            id: 1,
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: String::new(),
            phone_number: String::new(),
            user_type: UserType::Passenger,
        };
        assert!(user.tags().is_empty());
    }

    #[test]
    fn test_user_dependents() {
        assert_eq!(User::dependent_tags(4), vec!["user_4_passengers".to_string()]);
        assert!(Passenger::dependent_tags(4).is_empty());
    }
}

//! In-memory record store for users and passengers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{
    NewPassenger, NewUser, Passenger, PassengerChanges, User, UserChanges,
};
use crate::repository::Repository;

/// Passenger row as stored; `user_email` is joined in on read.
#[derive(Debug, Clone)]
struct PassengerRow {
    id: i64,
    user: i64,
    passenger_id: String,
    preferred_payment_method: String,
    home_address: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    passengers: BTreeMap<i64, PassengerRow>,
    next_user_id: i64,
    next_passenger_id: i64,
}

impl Tables {
    fn join(&self, row: &PassengerRow) -> Passenger {
        Passenger {
            id: row.id,
            user: row.user,
            user_email: self
                .users
                .get(&row.user)
                .map(|u| u.email.clone())
                .unwrap_or_default(),
            passenger_id: row.passenger_id.clone(),
            preferred_payment_method: row.preferred_payment_method.clone(),
            home_address: row.home_address.clone(),
        }
    }

    fn ensure_email_free(&self, email: &str, except: Option<i64>) -> Result<()> {
        let taken = self
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except);
        if taken {
            return Err(AppError::Validation(format!(
                "user with email '{}' already exists",
                email
            )));
        }
        Ok(())
    }

    fn ensure_user_exists(&self, user_id: i64) -> Result<()> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "user {} does not exist",
                user_id
            )))
        }
    }

    fn ensure_passenger_id_free(&self, passenger_id: &str, except: Option<i64>) -> Result<()> {
        let taken = self
            .passengers
            .values()
            .any(|p| p.passenger_id == passenger_id && Some(p.id) != except);
        if taken {
            return Err(AppError::Validation(format!(
                "passenger_id '{}' already exists",
                passenger_id
            )));
        }
        Ok(())
    }
}

// == Memory Database ==
/// Record store holding both tables behind one lock, so cross-table checks
/// and the user → passenger cascade are atomic.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<User> for MemoryDatabase {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<User> {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn create(&self, draft: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        tables.ensure_email_free(&draft.email, None)?;

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: draft.email,
            first_name: draft.first_name,
            last_name: draft.last_name,
            phone_number: draft.phone_number,
            user_type: draft.user_type,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserChanges) -> Result<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        if let Some(email) = &patch.email {
            tables.ensure_email_free(email, Some(id))?;
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(phone_number) = patch.phone_number {
            user.phone_number = phone_number;
        }
        if let Some(user_type) = patch.user_type {
            user.user_type = user_type;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("user {}", id)));
        }

        let before = tables.passengers.len();
        tables.passengers.retain(|_, p| p.user != id);
        let cascaded = before - tables.passengers.len();
        if cascaded > 0 {
            debug!(user_id = id, cascaded, "Deleted passengers of removed user");
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.tables.read().await.users.len())
    }
}

#[async_trait]
impl Repository<Passenger> for MemoryDatabase {
    async fn list(&self) -> Result<Vec<Passenger>> {
        let tables = self.tables.read().await;
        Ok(tables.passengers.values().map(|row| tables.join(row)).collect())
    }

    async fn get(&self, id: i64) -> Result<Passenger> {
        let tables = self.tables.read().await;
        tables
            .passengers
            .get(&id)
            .map(|row| tables.join(row))
            .ok_or_else(|| AppError::NotFound(format!("passenger {}", id)))
    }

    async fn create(&self, draft: NewPassenger) -> Result<Passenger> {
        let mut tables = self.tables.write().await;
        tables.ensure_user_exists(draft.user)?;
        tables.ensure_passenger_id_free(&draft.passenger_id, None)?;

        tables.next_passenger_id += 1;
        let row = PassengerRow {
            id: tables.next_passenger_id,
            user: draft.user,
            passenger_id: draft.passenger_id,
            preferred_payment_method: draft.preferred_payment_method,
            home_address: draft.home_address,
        };
        let passenger = tables.join(&row);
        tables.passengers.insert(row.id, row);
        Ok(passenger)
    }

    async fn update(&self, id: i64, patch: PassengerChanges) -> Result<Passenger> {
        let mut tables = self.tables.write().await;
        let mut row = tables
            .passengers
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("passenger {}", id)))?;

        if let Some(user) = patch.user {
            tables.ensure_user_exists(user)?;
            row.user = user;
        }
        if let Some(passenger_id) = patch.passenger_id {
            tables.ensure_passenger_id_free(&passenger_id, Some(id))?;
            row.passenger_id = passenger_id;
        }
        if let Some(method) = patch.preferred_payment_method {
            row.preferred_payment_method = method;
        }
        if let Some(address) = patch.home_address {
            row.home_address = address;
        }

        let passenger = tables.join(&row);
        tables.passengers.insert(id, row);
        Ok(passenger)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.passengers.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("passenger {}", id))),
        }
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.tables.read().await.passengers.len())
    }
}

//! Cache key naming.
//!
//! Keys are deterministic so that every worker reading or writing the same
//! entity addresses the same entry.

use crate::models::Entity;

/// Key holding the whole collection snapshot, e.g. `user_list`.
pub fn list_key<E: Entity>() -> String {
    format!("{}_list", E::KIND)
}

/// Key holding one entity, e.g. `user_42`.
pub fn detail_key<E: Entity>(id: i64) -> String {
    format!("{}_{}", E::KIND, id)
}

/// Key under which the tag index stores the member set of `tag`.
pub fn tag_key(tag: &str) -> String {
    format!("tag:{}", tag)
}

/// Tag carried by every cached passenger representation that embeds user `user_id`.
pub fn user_passengers_tag(user_id: i64) -> String {
    format!("user_{}_passengers", user_id)
}

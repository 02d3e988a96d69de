//! `auth.*` and `files.*` command handlers, one per file.
//!
//! `auth.login` is the only command open to anonymous callers. Reads need a
//! signed-in user; anything that changes records or lending state needs the
//! admin role.

use serde::Deserialize;

pub mod auth_login;
pub mod auth_logout;
pub mod auth_me;
pub mod files_add;
pub mod files_borrow;
pub mod files_delete;
pub mod files_delete_many;
pub mod files_export;
pub mod files_import;
pub mod files_list;
pub mod files_load;
pub mod files_release;
pub mod files_retain;
pub mod files_return;
pub mod files_template;
pub mod files_update;

/// Input of the commands that target a single record.
#[derive(Debug, Deserialize)]
pub struct IdInput {
    pub id: String,
}

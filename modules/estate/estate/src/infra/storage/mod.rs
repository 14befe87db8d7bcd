pub mod db;
pub mod entity;
pub mod migrations;

mod fees_sea_repo;
mod hierarchy_sea_repo;
mod members_sea_repo;

pub use migrations::Migrator;

/// SeaORM implementation of every repository in
/// [`crate::domain::repos`].
///
/// Stateless: the connection is supplied per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrmEntityStore;

impl OrmEntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

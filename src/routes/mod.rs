/// Router Module Index
///
/// Screens grouped by the access class the guard applies to them. Each group is
/// wrapped with its guard middleware in `create_router`, so a screen cannot be
/// mounted without a guard by accident.

/// Catalog, cart, summaries and session: no guard.
pub mod catalog;

/// Login and register: signed-out viewers only.
pub mod public;

/// Checkout and profile: any signed-in viewer.
pub mod authenticated;

/// Admin dashboard: admins, and sellers within the allow-list.
pub mod admin;

use rusqlite::Connection;

use crate::error::SyncError;

/// Initialize the SQLite schema for the role-graph security model.
pub fn init_graph_schema(conn: &Connection) -> Result<(), SyncError> {
    let statements = [
        // Roles: record JSON plus indexed name and admin flag
        "CREATE TABLE IF NOT EXISTS sec_roles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            is_admin INTEGER NOT NULL DEFAULT 0,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",

        // Role hierarchy: child -> parent links
        "CREATE TABLE IF NOT EXISTS sec_role_parents (
            role_id TEXT NOT NULL,
            parent_id TEXT NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (role_id, parent_id),
            FOREIGN KEY (role_id) REFERENCES sec_roles(id) ON DELETE CASCADE,
            FOREIGN KEY (parent_id) REFERENCES sec_roles(id) ON DELETE CASCADE
        )",

        // Users
        "CREATE TABLE IF NOT EXISTS sec_users (
            id TEXT PRIMARY KEY,
            user_name TEXT NOT NULL UNIQUE,
            active INTEGER NOT NULL DEFAULT 1,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",

        // User role memberships
        "CREATE TABLE IF NOT EXISTS sec_user_roles (
            user_id TEXT NOT NULL,
            role_id TEXT NOT NULL,
            added_at TEXT NOT NULL,
            PRIMARY KEY (user_id, role_id),
            FOREIGN KEY (user_id) REFERENCES sec_users(id) ON DELETE CASCADE,
            FOREIGN KEY (role_id) REFERENCES sec_roles(id) ON DELETE CASCADE
        )",

        // Grants. The unique key over all grant columns is what makes
        // re-issued grants idempotent (INSERT OR IGNORE against it).
        "CREATE TABLE IF NOT EXISTS sec_type_permissions (
            role_id TEXT NOT NULL,
            target_type TEXT NOT NULL,
            operations TEXT NOT NULL,
            modifier TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (role_id, target_type, operations, modifier),
            FOREIGN KEY (role_id) REFERENCES sec_roles(id) ON DELETE CASCADE
        )",
        "CREATE TABLE IF NOT EXISTS sec_object_permissions (
            role_id TEXT NOT NULL,
            target_type TEXT NOT NULL,
            criteria TEXT NOT NULL,
            operations TEXT NOT NULL,
            modifier TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (role_id, target_type, criteria, operations, modifier),
            FOREIGN KEY (role_id) REFERENCES sec_roles(id) ON DELETE CASCADE
        )",
        "CREATE TABLE IF NOT EXISTS sec_member_permissions (
            role_id TEXT NOT NULL,
            target_type TEXT NOT NULL,
            member_names TEXT NOT NULL,
            criteria TEXT NOT NULL,
            operations TEXT NOT NULL,
            modifier TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (role_id, target_type, member_names, criteria, operations, modifier),
            FOREIGN KEY (role_id) REFERENCES sec_roles(id) ON DELETE CASCADE
        )",
    ];

    for stmt in &statements {
        conn.execute(stmt, [])
            .map_err(|e| SyncError::Storage(e.to_string()))?;
    }

    Ok(())
}

/// Initialize the SQLite schema for the flag-based security model.
pub fn init_flag_schema(conn: &Connection) -> Result<(), SyncError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS sec_users (
            id TEXT PRIMARY KEY,
            user_name TEXT NOT NULL UNIQUE,
            active INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    ];

    for stmt in &statements {
        conn.execute(stmt, [])
            .map_err(|e| SyncError::Storage(e.to_string()))?;
    }

    Ok(())
}

//! Startup data: the college departments and, optionally, one account per role.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{password::hash_password, Role};
use crate::error::{AppError, Result};
use crate::models::{department::Department, user::User};
use crate::store::Store;

const DEPARTMENTS: [(&str, &str); 5] = [
    ("Computer Science", "CS"),
    ("Mathematics", "MATH"),
    ("Physics", "PHY"),
    ("Chemistry", "CHEM"),
    ("English", "ENG"),
];

struct DefaultUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
    department: &'static str,
    employee_id: &'static str,
}

const DEFAULT_USERS: [DefaultUser; 3] = [
    DefaultUser {
        name: "Dr. Principal",
        email: "principal@college.edu",
        password: "principal123",
        role: Role::Principal,
        department: "Administration",
        employee_id: "EMP001",
    },
    DefaultUser {
        name: "Prof. John HOD",
        email: "hod.cs@college.edu",
        password: "hod123",
        role: Role::Hod,
        department: "Computer Science",
        employee_id: "EMP002",
    },
    DefaultUser {
        name: "Dr. Sarah Teacher",
        email: "sarah.teacher@college.edu",
        password: "teacher123",
        role: Role::Teacher,
        department: "Computer Science",
        employee_id: "EMP003",
    },
];

pub async fn seed_departments(store: &dyn Store) -> Result<()> {
    if !store.list_departments().await?.is_empty() {
        return Ok(());
    }
    let now = OffsetDateTime::now_utc();
    for (name, code) in DEPARTMENTS {
        store
            .put_department(Department {
                id: Uuid::new_v4(),
                name: name.into(),
                code: code.into(),
                hod_id: None,
                is_active: true,
                created_at: now,
            })
            .await?;
    }
    tracing::info!(count = DEPARTMENTS.len(), "Seeded departments");
    Ok(())
}

/// Creates the demo accounts and links each HOD to their department.
/// Accounts that already exist are skipped.
pub async fn seed_default_users(store: &dyn Store) -> Result<()> {
    let now = OffsetDateTime::now_utc();
    for d in &DEFAULT_USERS {
        let user = User {
            id: Uuid::new_v4(),
            name: d.name.into(),
            email: d.email.into(),
            password_hash: hash_password(d.password)?,
            role: d.role,
            department: d.department.into(),
            employee_id: d.employee_id.into(),
            created_at: now,
        };
        let user_id = user.id;
        match store.insert_user(user).await {
            Ok(()) => tracing::info!(email = d.email, role = ?d.role, "Seeded default user"),
            Err(AppError::Conflict(_)) => continue,
            Err(e) => return Err(e),
        }

        if d.role == Role::Hod {
            let departments = store.list_departments().await?;
            if let Some(mut dept) = departments.into_iter().find(|dep| dep.name == d.department) {
                dept.hod_id = Some(user_id);
                store.put_department(dept).await?;
            }
        }
    }
    Ok(())
}

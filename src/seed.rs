//! Demo roster loaded into an empty store on first run.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tracing::info;

use crate::model::instruction::{Instruction, Priority};
use crate::model::role::Role;
use crate::model::task::{Task, TaskStatus};
use crate::model::user::User;
use crate::store::CollectionStore;

fn user(id: &str, name: &str, email: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        avatar: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub static DEMO_USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        user("1", "Rajesh Gote", "owner@vjgote.com", Role::Owner),
        user("2", "Priya Sharma", "hr@vjgote.com", Role::Hr),
        user("3", "Amit Kumar", "amit@vjgote.com", Role::Employee),
        user("4", "Suresh Patil", "suresh@vjgote.com", Role::Employee),
        user("5", "Ayaan", "ayaan@gmail.com", Role::Employee),
    ]
});

pub static DEMO_TASKS: Lazy<Vec<Task>> = Lazy::new(|| {
    vec![
        Task {
            id: "t1".into(),
            title: "Foundation Leveling".into(),
            description: "Level the ground for Block A foundation.".into(),
            assigned_to: "3".into(),
            assigned_to_name: "Amit Kumar".into(),
            status: TaskStatus::InProgress,
            site_location: "Skyline Heights, Sector 45".into(),
            created_at: date(2023, 10, 25),
        },
        Task {
            id: "t2".into(),
            title: "Material Procurement".into(),
            description: "Verify cement quality and quantity.".into(),
            assigned_to: "4".into(),
            assigned_to_name: "Suresh Patil".into(),
            status: TaskStatus::Pending,
            site_location: "Riverview Residency".into(),
            created_at: date(2023, 10, 26),
        },
        Task {
            id: "t3".into(),
            title: "Site Cleanup".into(),
            description: "Clear debris from the north sector for inspection.".into(),
            assigned_to: "5".into(),
            assigned_to_name: "Ayaan".into(),
            status: TaskStatus::Pending,
            site_location: "West Side Highway B".into(),
            created_at: date(2023, 10, 29),
        },
    ]
});

pub static DEMO_INSTRUCTIONS: Lazy<Vec<Instruction>> = Lazy::new(|| {
    vec![
        Instruction {
            id: "i1".into(),
            author: "Rajesh Gote".into(),
            content: "Safety helmets are mandatory for all site visits starting tomorrow.".into(),
            date: date(2023, 10, 27),
            priority: Priority::High,
        },
        Instruction {
            id: "i2".into(),
            author: "Priya Sharma".into(),
            content: "Submit your month-end reports by Friday.".into(),
            date: date(2023, 10, 28),
            priority: Priority::Medium,
        },
    ]
});

/// Load the demo roster if there are no users yet. Returns true if it did.
pub async fn seed_if_empty(store: &CollectionStore) -> bool {
    if !store.read::<User>().await.is_empty() {
        return false;
    }

    futures::join!(
        store.replace(DEMO_USERS.clone()),
        store.replace(DEMO_TASKS.clone()),
        store.replace(DEMO_INSTRUCTIONS.clone()),
    );

    info!(
        users = DEMO_USERS.len(),
        tasks = DEMO_TASKS.len(),
        instructions = DEMO_INSTRUCTIONS.len(),
        "Seeded demo data"
    );
    true
}

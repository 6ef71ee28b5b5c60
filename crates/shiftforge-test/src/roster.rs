//! Employee fixtures.
//!
//! # Example
//!
//! ```
//! use shiftforge_core::RoleTag;
//! use shiftforge_test::roster::{newsroom_roster, supervisor};
//!
//! let roster = newsroom_roster();
//! assert_eq!(roster.len(), 3);
//! assert!(supervisor("S1", 56.0).has_role(&RoleTag::new("cvd")));
//! ```

use shiftforge_core::{Employee, EmployeeFlags};

/// Serialized roster in the external record schema.
pub const EMPLOYEES_JSON: &str = r#"[
    {
        "id": "001",
        "surname": "Berger",
        "givenName": "Anna",
        "role": "Politik",
        "roles": ["CvD"],
        "weeklyHours": 56,
        "flags": {}
    },
    {
        "id": "002",
        "surname": "Keller",
        "givenName": "Jonas",
        "role": "Sport",
        "roles": ["cvd"],
        "weeklyHours": 56
    },
    {
        "id": "003",
        "surname": "Wolf",
        "givenName": "Mira",
        "role": "Kultur",
        "roles": [],
        "weeklyHours": 40,
        "flags": {"excludedWeekdays": ["Sat", "Sun"]}
    }
]"#;

/// Employee without roles.
pub fn employee(id: &str, weekly_hours: f64) -> Employee {
    Employee::new(id, weekly_hours).with_name(format!("Surname {id}"), format!("Given {id}"))
}

/// Employee holding the supervisory `cvd` role.
pub fn supervisor(id: &str, weekly_hours: f64) -> Employee {
    employee(id, weekly_hours)
        .with_department("Politik")
        .with_role("CvD")
}

/// Supervisor restricted to early shifts.
pub fn early_supervisor(id: &str, weekly_hours: f64) -> Employee {
    supervisor(id, weekly_hours).with_flags(EmployeeFlags::early_only())
}

/// Two full-week supervisors and one weekday reporter; matches
/// [`EMPLOYEES_JSON`].
pub fn newsroom_roster() -> Vec<Employee> {
    vec![
        Employee::new("001", 56.0)
            .with_name("Berger", "Anna")
            .with_department("Politik")
            .with_role("CvD"),
        Employee::new("002", 56.0)
            .with_name("Keller", "Jonas")
            .with_department("Sport")
            .with_role("cvd"),
        Employee::new("003", 40.0)
            .with_name("Wolf", "Mira")
            .with_department("Kultur")
            .with_flags(
                EmployeeFlags::default()
                    .with_excluded_weekday(chrono::Weekday::Sat)
                    .with_excluded_weekday(chrono::Weekday::Sun),
            ),
    ]
}

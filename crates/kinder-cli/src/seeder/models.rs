//! Data models for database seeding configuration.
//!
//! Seed structs hold generated rows before insertion. [`SeedConfig`]
//! controls how many of each are produced.

use kinder_models::ids::{GroupId, ParentId, ProgramId};
use kinder_models::{AgeGroup, Qualification, Role};

/// Seed data for an identity row.
pub struct IdentitySeed {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

pub struct ProgramSeed {
    pub description: String,
    pub age_category_children: i32,
}

pub struct GroupSeed {
    pub name: String,
    pub age_group: AgeGroup,
    pub educational_program_id: ProgramId,
}

/// Seed data for an employee and its identity.
pub struct EmployeeSeed {
    pub identity: IdentitySeed,
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    pub phone_number: i64,
    pub qualification: Qualification,
    pub work_experience: i32,
}

/// Seed data for a parent and its identity.
pub struct ParentSeed {
    pub identity: IdentitySeed,
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    pub phone_number: i64,
}

/// Seed data for a child and the guardian it is linked to.
pub struct ChildSeed {
    pub fname: String,
    pub lname: String,
    pub patronymic: Option<String>,
    pub gender: bool,
    pub birthday: chrono::NaiveDate,
    pub group_id: GroupId,
    pub transfer_date: chrono::NaiveDate,
    pub parent_id: ParentId,
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub programs: usize,
    pub groups_per_program: usize,
    /// Capped by the number of qualifications still free
    pub employees: usize,
    pub parents: usize,
    pub children_per_group: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            programs: 3,
            groups_per_program: 2,
            employees: Qualification::ALL.len(),
            parents: 20,
            children_per_group: 10,
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration with the specified number of programs.
    pub fn new(programs: usize) -> Self {
        Self {
            programs,
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups_per_program: usize) -> Self {
        self.groups_per_program = groups_per_program;
        self
    }

    pub fn with_employees(mut self, employees: usize) -> Self {
        self.employees = employees;
        self
    }

    pub fn with_parents(mut self, parents: usize) -> Self {
        self.parents = parents;
        self
    }

    pub fn with_children(mut self, children_per_group: usize) -> Self {
        self.children_per_group = children_per_group;
        self
    }

    pub fn total_groups(&self) -> usize {
        self.programs * self.groups_per_program
    }

    pub fn total_children(&self) -> usize {
        self.total_groups() * self.children_per_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_totals() {
        let config = SeedConfig::new(4).with_groups(3).with_children(5);
        assert_eq!(config.total_groups(), 12);
        assert_eq!(config.total_children(), 60);
    }

    #[test]
    fn test_default_employees_match_qualifications() {
        assert_eq!(SeedConfig::default().employees, 10);
    }
}

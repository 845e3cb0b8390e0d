//! # Kinder Models
//!
//! Domain models and DTOs for the Kinder API: database rows, request and
//! response bodies, validation rules, enums and typed ids.
//!
//! # Modules
//!
//! - [`ids`]: Typed UUID newtypes, one per table
//! - [`enums`]: Qualification and age group
//! - [`users`]: Identities, registration and login
//! - [`directory`]: Employee and parent profiles
//! - [`registry`]: Educational programs, groups, group assignments
//! - [`children`]: Children, guardianships, medical notes
//! - [`events`]: Events, program links, participant rosters

pub mod children;
pub mod directory;
pub mod enums;
pub mod events;
pub mod ids;
pub mod registry;
pub mod users;

pub use kinder_auth::{Claims, Role};

pub use children::{
    AddChildDto, Child, ChildData, ChildDetail, ChildFilterParams, Guardianship, LinkParentDto,
    MedicalNote, MedicalNoteData, UpdateChildDto,
};
pub use directory::{
    AddEmployeeDto, AddParentDto, Employee, EmployeeData, EmployeeProfile, Parent, ParentData,
    ParentProfile, UpdateEmployeeDto, UpdateParentDto,
};
pub use enums::{AgeGroup, Qualification};
pub use events::{
    CreateEventDto, EnrollChildDto, Event, EventData, EventParticipant, LinkProgramDto,
    ProgramEvent, UpdateEventDto,
};
pub use registry::{
    AssignEmployeeDto, CreateProgramDto, EducationalProgram, Group, GroupAssignment, GroupData,
    UpdateGroupDto,
};
pub use users::{LoginRequest, LoginResponse, NewIdentityDto, RegisterRequest, User};

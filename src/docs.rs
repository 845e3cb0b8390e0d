use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use kinder_auth::Role;
use kinder_core::ErrorResponse;
use kinder_models::children::{
    AddChildDto, Child, ChildData, ChildDetail, Guardianship, LinkParentDto, MedicalNote,
    MedicalNoteData, UpdateChildDto,
};
use kinder_models::directory::{
    AddEmployeeDto, AddParentDto, Employee, EmployeeData, EmployeeProfile, Parent, ParentData,
    ParentProfile, UpdateEmployeeDto, UpdateParentDto,
};
use kinder_models::enums::{AgeGroup, Qualification};
use kinder_models::events::{
    CreateEventDto, EnrollChildDto, Event, EventData, EventParticipant, LinkProgramDto,
    ProgramEvent, UpdateEventDto,
};
use kinder_models::registry::{
    AssignEmployeeDto, CreateProgramDto, EducationalProgram, Group, GroupAssignment, GroupData,
    UpdateGroupDto,
};
use kinder_models::users::{LoginRequest, LoginResponse, NewIdentityDto, RegisterRequest, User};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_me,
        crate::modules::employees::controller::add_employee,
        crate::modules::employees::controller::list_employees,
        crate::modules::employees::controller::get_employee_by_user,
        crate::modules::employees::controller::get_employee,
        crate::modules::employees::controller::replace_employee,
        crate::modules::employees::controller::update_employee,
        crate::modules::parents::controller::add_parent,
        crate::modules::parents::controller::list_parents,
        crate::modules::parents::controller::get_parent_by_user,
        crate::modules::parents::controller::get_parent,
        crate::modules::parents::controller::replace_parent,
        crate::modules::parents::controller::update_parent,
        crate::modules::parents::controller::get_my_profile,
        crate::modules::parents::controller::get_my_children,
        crate::modules::programs::controller::create_program,
        crate::modules::programs::controller::list_programs,
        crate::modules::programs::controller::get_program,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::list_groups,
        crate::modules::groups::controller::get_group,
        crate::modules::groups::controller::get_group_for_edit,
        crate::modules::groups::controller::replace_group,
        crate::modules::groups::controller::update_group,
        crate::modules::groups::controller::assign_employee,
        crate::modules::groups::controller::list_group_employees,
        crate::modules::children::controller::add_child,
        crate::modules::children::controller::list_children,
        crate::modules::children::controller::get_child,
        crate::modules::children::controller::get_child_for_edit,
        crate::modules::children::controller::replace_child,
        crate::modules::children::controller::update_child,
        crate::modules::children::controller::link_parent,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::list_events_by_program,
        crate::modules::events::controller::events_for_my_children,
        crate::modules::events::controller::get_event,
        crate::modules::events::controller::get_event_for_edit,
        crate::modules::events::controller::replace_event,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::link_program,
        crate::modules::events::controller::list_participants,
        crate::modules::events::controller::enroll_child,
    ),
    components(
        schemas(
            ErrorResponse,
            Role,
            Qualification,
            AgeGroup,
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            NewIdentityDto,
            Employee,
            EmployeeData,
            EmployeeProfile,
            AddEmployeeDto,
            UpdateEmployeeDto,
            Parent,
            ParentData,
            ParentProfile,
            AddParentDto,
            UpdateParentDto,
            EducationalProgram,
            CreateProgramDto,
            Group,
            GroupData,
            UpdateGroupDto,
            AssignEmployeeDto,
            GroupAssignment,
            Child,
            ChildData,
            ChildDetail,
            AddChildDto,
            UpdateChildDto,
            MedicalNote,
            MedicalNoteData,
            Guardianship,
            LinkParentDto,
            Event,
            EventData,
            CreateEventDto,
            UpdateEventDto,
            LinkProgramDto,
            ProgramEvent,
            EnrollChildDto,
            EventParticipant,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current identity"),
        (name = "Employees", description = "Staff directory"),
        (name = "Parents", description = "Parent directory and parent self-service"),
        (name = "Educational Programs", description = "Educational programs"),
        (name = "Groups", description = "Groups and employee assignments"),
        (name = "Children", description = "Children, guardians and medical notes"),
        (name = "Events", description = "Events, program links and participant rosters")
    ),
    info(
        title = "Kinder API",
        version = "0.1.0",
        description = "Kindergarten administration API: staff, parents, children, groups, programs and events.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

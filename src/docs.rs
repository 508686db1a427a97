use crate::model::{
    leave::{Leave, LeaveStatus, LeaveStatusPatch, LeaveType, LeaveWithUser, NewLeave},
    role::Role,
    task::{NewTask, Task},
    user::User,
};
use crate::policy::LeaveDraft;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leavedesk API",
        version = "1.0.0",
        description = r#"
## Leavedesk

Backend of the leave and task dashboard.

### 🔹 Key Features
- **Authentication**
  - `GET /users?email=&password=` returns the matching account with a bearer token
- **Leave Management**
  - Apply for sick or casual leave, list your leaves, approve or reject others' requests
- **Task Management**
  - Personal task list with create, update, complete and delete

### 📏 Leave rules
- Sick leave can only be applied for today
- Casual leave cannot start in the past
- A new request may not overlap any existing leave of the same user, whatever its status

### 🔐 Security
Everything except login requires **JWT Bearer authentication**.
Reviewing leaves and listing users is reserved to **admin** accounts.
"#,
    ),
    paths(
        crate::api::user::list_users,

        crate::api::leave::list_leaves,
        crate::api::leave::review_leaves,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::review_leave,

        crate::api::task::list_tasks,
        crate::api::task::get_task,
        crate::api::task::create_task,
        crate::api::task::update_task,
        crate::api::task::delete_task
    ),
    components(
        schemas(
            User,
            Role,
            Leave,
            LeaveType,
            LeaveStatus,
            LeaveWithUser,
            LeaveDraft,
            LeaveStatusPatch,
            NewLeave,
            Task,
            NewTask
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "User", description = "Login and user listing"),
        (name = "Leave", description = "Leave request and review APIs"),
        (name = "Task", description = "Task management APIs"),
    )
)]
pub struct ApiDoc;

pub struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

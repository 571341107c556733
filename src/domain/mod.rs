//! Records mirrored from the tracking backend and the request shapes sent to it.

pub mod models;

pub use models::auth::{CreatedId, LoginRequest, LoginResponse, RegisterRequest};
pub use models::company::{Company, CreateCompanyRequest, UpdateCompanyRequest};
pub use models::monitoring_setting::{
    CreateMonitoringSettingRequest, MonitoringSetting, UpdateMonitoringSettingRequest,
};
pub use models::resource::{CreateResourceRequest, Resource, ResourceStatus, UpdateResourceRequest};
pub use models::task::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};
pub use models::user::{CreateUserRequest, Role, UpdateUserRequest, User};

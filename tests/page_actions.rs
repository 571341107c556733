//! Page actions end to end: form, mutation, refetch, view.

mod common;

use serde_json::json;

use common::{
    MockBackend, ACME_ID, ALICE_ID, BOB_ID, CATALOGUE_ID, LONER_ID, STATUS_API_ID,
};
use tracking_console::application::api::companies;
use tracking_console::application::forms::{
    CreateUserForm, LoginForm, MonitoringForm, RegisterForm, TaskForm, UpdateUserForm,
};
use tracking_console::domain::TaskStatus;
use tracking_console::interfaces::console::pages::UserManagementPage;
use tracking_console::interfaces::console::{ActivePage, Severity};
use tracking_console::{NavigationOutcome, Route, Shell};

fn check_endpoint_task() -> TaskForm {
    TaskForm {
        resource_id: Some(STATUS_API_ID),
        assigned_user_id: Some(ALICE_ID),
        description: "Check endpoint".to_string(),
        status: "Opened".to_string(),
    }
}

#[tokio::test]
async fn new_task_shows_up_in_my_tasks() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Tasks).await;

    let Some(ActivePage::Tasks(page)) = shell.page_mut() else {
        panic!("tasks page expected");
    };
    assert!(page.tasks().is_empty());

    let outcome = page.add_task(&check_endpoint_task()).await;
    let banner = outcome.banner.clone().unwrap();
    assert_eq!(banner.severity, Severity::Success);
    assert_eq!(banner.message, "The task was successfully added");

    let tasks = page.tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].description.as_deref(), Some("Check endpoint"));
    assert_eq!(tasks[0].task_status, Some(TaskStatus::Opened));
    assert_eq!(tasks[0].created_by_id, Some(ALICE_ID));

    let view = shell.view().unwrap();
    let table = view.tables().next().unwrap();
    let row = table.find("Description", "Check endpoint").unwrap();
    assert!(row.contains(&"Status API".to_string()));
    assert!(row.contains(&"Opened".to_string()));
}

#[tokio::test]
async fn task_cannot_start_completed() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Tasks).await;

    let Some(ActivePage::Tasks(page)) = shell.page_mut() else {
        panic!("tasks page expected");
    };
    let form = TaskForm {
        status: "Completed".to_string(),
        ..check_endpoint_task()
    };
    let outcome = page.add_task(&form).await;

    assert_eq!(outcome.errors.field("status"), ["Incorrect status".to_string()]);
    assert_eq!(backend.hits("POST /Task"), 0);
    assert!(!page.creatable_statuses().contains(&TaskStatus::Completed));
}

#[tokio::test]
async fn completing_a_task_fetches_it_first() {
    let backend = MockBackend::start().await;
    backend.with_state(|s| {
        s.tasks.push(json!({
            "id": 50,
            "resourceId": STATUS_API_ID,
            "description": "Renew certificate",
            "assignedUserId": ALICE_ID,
            "createdById": BOB_ID,
            "taskStatus": "InProgress",
        }))
    });
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Tasks).await;

    let Some(ActivePage::Tasks(page)) = shell.page_mut() else {
        panic!("tasks page expected");
    };
    let outcome = page.complete_task(50).await;
    assert!(outcome.is_success(), "{:?}", outcome);

    let task = page.tasks().into_iter().find(|t| t.id == Some(50)).unwrap();
    assert_eq!(task.task_status, Some(TaskStatus::Completed));
    assert_eq!(task.description.as_deref(), Some("Renew certificate"));
    assert_eq!(backend.hits("GET /Task/50"), 1);
    assert_eq!(backend.hits("PUT /Task"), 1);
}

#[tokio::test]
async fn completing_a_missing_task_reports_not_found() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Tasks).await;

    let Some(ActivePage::Tasks(page)) = shell.page_mut() else {
        panic!("tasks page expected");
    };
    let outcome = page.complete_task(404).await;

    assert_eq!(outcome.banner.unwrap().message, "Task not found");
    assert_eq!(backend.hits("PUT /Task"), 0);
}

#[tokio::test]
async fn tasks_page_needs_a_company() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(LONER_ID));
    assert_eq!(shell.navigate(Route::Tasks).await, NavigationOutcome::Rendered(Route::Tasks));

    let view = shell.view().unwrap();
    assert!(view
        .notices()
        .any(|(severity, message)| severity == Severity::Error && message.contains("not an employee")));
    assert_eq!(backend.hits("GET /Company/GetCompanyUsers/1"), 0);
}

#[tokio::test]
async fn monitoring_check_replaces_not_configured() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::MonitoringSetting).await;
    assert!(shell.view().unwrap().mentions("N/A"));

    let Some(ActivePage::MonitoringSetting(page)) = shell.page_mut() else {
        panic!("monitoring page expected");
    };
    assert!(page.setting(STATUS_API_ID).is_none());

    let outcome = page.add_check(&MonitoringForm::new(STATUS_API_ID, "5m", true)).await;
    assert!(outcome.is_success(), "{:?}", outcome);

    let setting = page.setting(STATUS_API_ID).unwrap();
    assert_eq!(setting.check_interval, "5m");
    assert!(setting.mode);
    assert!(shell.view().unwrap().mentions("Enabled"));
}

#[tokio::test]
async fn membership_change_reaches_company_page() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::UserManagement).await;

    let Some(ActivePage::UserManagement(page)) = shell.page_mut() else {
        panic!("user management page expected");
    };
    let outcome = page.add_to_company(LONER_ID, ACME_ID).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    let loner = page.users().into_iter().find(|u| u.id == Some(LONER_ID)).unwrap();
    assert_eq!(loner.company_id, Some(ACME_ID));

    shell.navigate(Route::Company).await;
    let view = shell.view().unwrap();
    assert!(view.tables().next().unwrap().find("Username", "loner").is_some());
}

#[tokio::test]
async fn catalogue_service_can_be_adopted() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Resource).await;

    let Some(ActivePage::Resource(page)) = shell.page_mut() else {
        panic!("resource page expected");
    };
    assert!(page.catalogue().iter().any(|r| r.id == Some(CATALOGUE_ID)));

    let outcome = page.adopt_service(CATALOGUE_ID).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    assert!(page.company_resources().iter().any(|r| r.id == Some(CATALOGUE_ID)));
    assert!(page.catalogue().iter().all(|r| r.id != Some(CATALOGUE_ID)));
}

#[tokio::test]
async fn registration_then_sign_in() {
    let backend = MockBackend::start().await;
    let (api, _) = backend.api();
    let mut shell = Shell::new(api);
    shell.navigate(Route::Register).await;

    let form = RegisterForm {
        username: "carol".to_string(),
        first_name: "Carol".to_string(),
        last_name: "Jones".to_string(),
        patronymic: "Petrovna".to_string(),
        email: "carol@example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        password_confirmation: "Str0ng!pass".to_string(),
    };
    let Some(ActivePage::Register(page)) = shell.page_mut() else {
        panic!("register page expected");
    };
    let outcome = page.submit(&form).await;
    assert_eq!(outcome.redirect, Some(Route::Login));
    shell.follow(&outcome).await;

    let Some(ActivePage::Login(page)) = shell.page_mut() else {
        panic!("login page expected");
    };
    let outcome = page.submit(&LoginForm::new("carol", "Str0ng!pass")).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    assert_eq!(shell.follow(&outcome).await, Some(NavigationOutcome::Rendered(Route::Main)));
}

#[tokio::test]
async fn mismatched_registration_is_blocked() {
    let backend = MockBackend::start().await;
    let (api, _) = backend.api();
    let mut shell = Shell::new(api);
    shell.navigate(Route::Register).await;

    let form = RegisterForm {
        username: "dave".to_string(),
        first_name: "Dave".to_string(),
        last_name: "Brown".to_string(),
        patronymic: "Olegovich".to_string(),
        email: "dave@example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        password_confirmation: "Str0ng!pasz".to_string(),
    };
    let Some(ActivePage::Register(page)) = shell.page_mut() else {
        panic!("register page expected");
    };
    let outcome = page.submit(&form).await;

    assert!(outcome.errors.has("password_confirmation"));
    assert_eq!(backend.hits("POST /Auth/register"), 0);
    assert_eq!(shell.current_route(), Some(Route::Register));
}

fn erin() -> CreateUserForm {
    CreateUserForm {
        username: "erin".to_string(),
        first_name: "Erin".to_string(),
        last_name: "Gray".to_string(),
        patronymic: String::new(),
        email: "erin@example.com".to_string(),
        password: "Str0ng!pass".to_string(),
        role: "Moderator".to_string(),
        company_id: Some(ACME_ID),
    }
}

#[tokio::test]
async fn created_user_appears_without_reload() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::UserManagement).await;

    let Some(ActivePage::UserManagement(page)) = shell.page_mut() else {
        panic!("user management page expected");
    };
    assert_eq!(page.users().len(), 3);

    let outcome = page.create_user(&erin()).await;
    assert_eq!(outcome.banner.clone().unwrap().message, "User erin was added");

    let created = page
        .users()
        .into_iter()
        .find(|u| u.username.as_deref() == Some("erin"))
        .unwrap();
    assert_eq!(created.company_id, Some(ACME_ID));
    assert_eq!(backend.hits("POST /User"), 1);
    assert_eq!(backend.hits("GET /User"), 2);
    assert!(shell.view().unwrap().tables().next().unwrap().find("Username", "erin").is_some());
}

#[tokio::test]
async fn blank_user_names_never_reach_the_backend() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::UserManagement).await;

    let Some(ActivePage::UserManagement(page)) = shell.page_mut() else {
        panic!("user management page expected");
    };
    let form = CreateUserForm {
        first_name: "   ".to_string(),
        last_name: "\t".to_string(),
        ..erin()
    };
    let outcome = page.create_user(&form).await;

    assert!(outcome.errors.has("first_name"));
    assert!(outcome.errors.has("last_name"));
    assert_eq!(backend.hits("POST /User"), 0);
}

#[tokio::test]
async fn user_edit_and_delete_refresh_the_list() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::UserManagement).await;

    let Some(ActivePage::UserManagement(page)) = shell.page_mut() else {
        panic!("user management page expected");
    };
    let form = UpdateUserForm {
        email: Some(" bob@acme.test ".to_string()),
        ..UpdateUserForm::default()
    };
    let outcome = page.update_user(BOB_ID, &form).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    let bob = page.users().into_iter().find(|u| u.id == Some(BOB_ID)).unwrap();
    assert_eq!(bob.email.as_deref(), Some("bob@acme.test"));

    let outcome = page.delete_user(BOB_ID).await;
    assert_eq!(outcome.banner.unwrap().message, "The user has been deleted");
    assert!(page.users().iter().all(|u| u.id != Some(BOB_ID)));
    assert_eq!(backend.hits("GET /User"), 3);
}

fn loner_company(page: &UserManagementPage) -> Option<i64> {
    page.users()
        .into_iter()
        .find(|u| u.id == Some(LONER_ID))
        .and_then(|u| u.company_id)
}

#[tokio::test]
async fn join_and_leave_refetch_the_user_list() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::UserManagement).await;

    let Some(ActivePage::UserManagement(page)) = shell.page_mut() else {
        panic!("user management page expected");
    };
    let outcome = page.add_to_company(LONER_ID, ACME_ID).await;
    assert_eq!(outcome.banner.unwrap().message, "The user has been added to the company");
    assert_eq!(backend.hits("POST /Company/AddUserToCompany/9/1"), 1);
    assert_eq!(backend.hits("GET /User"), 2);
    assert_eq!(loner_company(page), Some(ACME_ID));

    let outcome = page.remove_from_company(LONER_ID, ACME_ID).await;
    assert!(outcome.is_success(), "{:?}", outcome);
    assert_eq!(backend.hits("DELETE /Company/DeleteUserFromCompany/9/1"), 1);
    assert_eq!(backend.hits("GET /User"), 3);
    assert_eq!(loner_company(page), None);

    // leaving twice is refused by the backend and shown as an error
    let outcome = page.remove_from_company(LONER_ID, ACME_ID).await;
    assert!(!outcome.is_success());
    assert_eq!(backend.hits("GET /User"), 3);
}

#[tokio::test]
async fn main_counts_skip_completed_tasks() {
    let backend = MockBackend::start().await;
    backend.with_state(|s| {
        for (id, status) in [(60, "Opened"), (61, "InProgress"), (62, "Completed")] {
            s.tasks.push(json!({
                "id": id,
                "resourceId": STATUS_API_ID,
                "description": format!("Task {}", id),
                "assignedUserId": ALICE_ID,
                "createdById": BOB_ID,
                "taskStatus": status,
            }));
        }
    });
    let mut shell = Shell::new(backend.api_for(ALICE_ID));
    shell.navigate(Route::Main).await;

    let Some(ActivePage::Main(page)) = shell.page_mut() else {
        panic!("main page expected");
    };
    assert_eq!(
        page.counts(),
        vec![
            ("Active Tasks", Some(2)),
            ("Companies", Some(1)),
            ("Resources", Some(1)),
            ("Users", Some(2)),
        ]
    );
}

#[tokio::test]
async fn mounted_page_follows_a_membership_change() {
    let backend = MockBackend::start().await;
    let mut shell = Shell::new(backend.api_for(LONER_ID));
    shell.navigate(Route::Tasks).await;
    assert!(shell.view().unwrap().mentions("not an employee"));

    // nothing changed yet
    assert!(!shell.refresh().await);

    shell
        .api()
        .cache()
        .mutate(companies::add_user_to_company(LONER_ID, ACME_ID))
        .await
        .unwrap();

    assert!(shell.refresh().await);
    assert_eq!(shell.current_route(), Some(Route::Tasks));
    assert!(!shell.view().unwrap().mentions("not an employee"));
    assert_eq!(backend.hits("GET /Company/GetCompanyUsers/1"), 1);
    assert!(!shell.refresh().await);
}

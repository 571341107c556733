//! Executes parsed actions against a navigation shell

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use tracking_console::application::forms::{
    CompanyForm, CreateUserForm, LoginForm, MonitoringForm, RegisterForm, ResourceForm, TaskForm,
    UpdateUserForm,
};
use tracking_console::interfaces::console::{
    menu, ActionOutcome, ActivePage, MenuItem, NavigationOutcome, Route, Shell,
};
use tracking_console::ConsoleError;

use crate::commands::{
    Action, CheckArgs, CheckCmd, CompanyCmd, ProfileArgs, ResourceArgs, ResourceCmd, ShellLine,
    TaskArgs, TaskCmd, UserCmd,
};

/// Borrow the mounted page as a given variant, or bail out of the action
macro_rules! page {
    ($shell:expr, $variant:ident) => {
        match $shell.page_mut() {
            Some(ActivePage::$variant(page)) => page,
            _ => return false,
        }
    };
}

/// Run one action; returns whether it succeeded
pub async fn run(shell: &mut Shell, action: Action) -> bool {
    match action {
        Action::Open { route } => {
            let outcome = shell.navigate_path(&route).await;
            report_navigation(outcome);
            render(shell);
            matches!(outcome, NavigationOutcome::Rendered(_))
        }
        Action::Menu => {
            for item in menu() {
                print_menu_item(&item, 0);
            }
            true
        }
        Action::Login { username, password } => {
            if !show(shell, Route::Login).await {
                return false;
            }
            let page = page!(shell, Login);
            let outcome = page.submit(&LoginForm::new(username, password)).await;
            finish(shell, outcome).await
        }
        Action::Logout => {
            if let Err(err) = shell.api().logout().await {
                warn!(error = %err, "Could not clear the stored token");
                println!("{}", err);
                return false;
            }
            shell.close();
            println!("Signed out");
            true
        }
        Action::Register {
            username,
            first_name,
            last_name,
            patronymic,
            email,
            password,
            password_confirmation,
        } => {
            if !show(shell, Route::Register).await {
                return false;
            }
            let form = RegisterForm {
                username,
                first_name,
                last_name,
                patronymic,
                email,
                password,
                password_confirmation,
            };
            let page = page!(shell, Register);
            let outcome = page.submit(&form).await;
            finish(shell, outcome).await
        }
        Action::Task(cmd) => run_task(shell, cmd).await,
        Action::Company(cmd) => run_company(shell, cmd).await,
        Action::User(cmd) => run_user(shell, cmd).await,
        Action::Resource(cmd) => run_resource(shell, cmd).await,
        Action::Check(cmd) => run_check(shell, cmd).await,
        Action::Account(profile) => {
            if !show(shell, Route::Account).await {
                return false;
            }
            let page = page!(shell, Account);
            let outcome = page.apply(&profile_form(profile, None)).await;
            finish(shell, outcome).await
        }
    }
}

async fn run_task(shell: &mut Shell, cmd: TaskCmd) -> bool {
    if !show(shell, Route::Tasks).await {
        return false;
    }
    let page = page!(shell, Tasks);
    let outcome = match cmd {
        TaskCmd::Add(args) => page.add_task(&task_form(args)).await,
        TaskCmd::Update { id, task } => page.update_task(id, &task_form(task)).await,
        TaskCmd::Complete { id } => page.complete_task(id).await,
        TaskCmd::Delete { id } => page.delete_task(id).await,
        TaskCmd::Reassign { id, user } => page.reassign_task(id, user).await,
    };
    finish(shell, outcome).await
}

async fn run_company(shell: &mut Shell, cmd: CompanyCmd) -> bool {
    if !show(shell, Route::CompanyManagement).await {
        return false;
    }
    let page = page!(shell, CompanyManagement);
    let outcome = match cmd {
        CompanyCmd::Add { name } => page.create_company(&CompanyForm::new(name)).await,
        CompanyCmd::Rename { id, name } => page.rename_company(id, &CompanyForm::new(name)).await,
        CompanyCmd::Delete { id } => page.delete_company(id).await,
    };
    finish(shell, outcome).await
}

async fn run_user(shell: &mut Shell, cmd: UserCmd) -> bool {
    if !show(shell, Route::UserManagement).await {
        return false;
    }
    let page = page!(shell, UserManagement);
    let outcome = match cmd {
        UserCmd::Add {
            username,
            first_name,
            last_name,
            patronymic,
            email,
            password,
            role,
            company,
        } => {
            let form = CreateUserForm {
                username,
                first_name,
                last_name,
                patronymic,
                email,
                password,
                role,
                company_id: company,
            };
            page.create_user(&form).await
        }
        UserCmd::Update { id, profile, role } => {
            page.update_user(id, &profile_form(profile, role)).await
        }
        UserCmd::Delete { id } => page.delete_user(id).await,
        UserCmd::Join { user, company } => page.add_to_company(user, company).await,
        UserCmd::Leave { user, company } => page.remove_from_company(user, company).await,
    };
    finish(shell, outcome).await
}

async fn run_resource(shell: &mut Shell, cmd: ResourceCmd) -> bool {
    if !show(shell, Route::Resource).await {
        return false;
    }
    let page = page!(shell, Resource);
    let outcome = match cmd {
        ResourceCmd::Add(args) => page.add_resource(&resource_form(args)).await,
        ResourceCmd::Update { id, resource } => {
            page.update_resource(id, &resource_form(resource)).await
        }
        ResourceCmd::Delete { id } => page.delete_resource(id).await,
        ResourceCmd::Adopt { id } => page.adopt_service(id).await,
    };
    finish(shell, outcome).await
}

async fn run_check(shell: &mut Shell, cmd: CheckCmd) -> bool {
    if !show(shell, Route::MonitoringSetting).await {
        return false;
    }
    let page = page!(shell, MonitoringSetting);
    let outcome = match cmd {
        CheckCmd::Add(args) => page.add_check(&check_form(args)).await,
        CheckCmd::Update { id, check } => page.update_check(id, &check_form(check)).await,
        CheckCmd::Delete { id } => page.delete_check(id).await,
    };
    finish(shell, outcome).await
}

fn task_form(args: TaskArgs) -> TaskForm {
    TaskForm {
        resource_id: args.resource,
        assigned_user_id: args.assignee,
        description: args.description,
        status: args.status,
    }
}

fn resource_form(args: ResourceArgs) -> ResourceForm {
    ResourceForm {
        name: args.name,
        kind: args.kind,
        source: args.source,
        status: args.status,
    }
}

fn check_form(args: CheckArgs) -> MonitoringForm {
    MonitoringForm::new(args.resource, args.interval, args.enabled)
}

fn profile_form(profile: ProfileArgs, role: Option<String>) -> UpdateUserForm {
    UpdateUserForm {
        first_name: profile.first_name,
        last_name: profile.last_name,
        patronymic: profile.patronymic,
        email: profile.email,
        password: profile.password,
        role,
        ..UpdateUserForm::default()
    }
}

/// Keep the current page when it already shows `route` so its
/// subscriptions survive between interactive commands
async fn show(shell: &mut Shell, route: Route) -> bool {
    if shell.current_route() == Some(route) {
        shell.refresh().await;
        return true;
    }
    let outcome = shell.navigate(route).await;
    report_navigation(outcome);
    if let NavigationOutcome::Redirected { .. } = outcome {
        render(shell);
        return false;
    }
    true
}

async fn finish(shell: &mut Shell, outcome: ActionOutcome) -> bool {
    for (field, messages) in outcome.errors.fields() {
        for message in messages {
            println!("  {}: {}", field, message);
        }
    }
    // a rebuilt or different page no longer carries the action's banner
    let rebuilt = outcome.redirect.is_none() && shell.refresh().await;
    if outcome.redirect.is_some() || rebuilt {
        if let Some(banner) = &outcome.banner {
            println!("{}", banner);
        }
    }
    if let Some(navigation) = shell.follow(&outcome).await {
        report_navigation(navigation);
    }
    render(shell);
    outcome.is_success()
}

fn report_navigation(outcome: NavigationOutcome) {
    if let NavigationOutcome::Redirected { from, to } = outcome {
        println!("{} needs a signed-in user, showing {}", from.path(), to.path());
    }
}

fn render(shell: &Shell) {
    if let Some(view) = shell.view() {
        println!("{}", view);
    }
}

fn print_menu_item(item: &MenuItem, depth: usize) {
    let indent = depth * 2;
    match item.route {
        Some(route) => println!("{:indent$}{} ({})", "", item.label, route.path(), indent = indent),
        None => println!("{:indent$}{}", "", item.label, indent = indent),
    }
    for child in &item.children {
        print_menu_item(child, depth + 1);
    }
}

fn prompt(shell: &Shell) -> std::io::Result<()> {
    let path = shell.current_route().map(|r| r.path()).unwrap_or("/");
    let mut out = std::io::stdout();
    write!(out, "{}> ", path)?;
    out.flush()
}

/// Read commands from stdin until `exit` or end of input
pub async fn interactive(shell: &mut Shell) -> Result<(), ConsoleError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let outcome = shell.navigate(Route::Main).await;
    report_navigation(outcome);
    render(shell);
    prompt(shell)?;

    while let Some(line) = lines.next_line().await? {
        let words = match shell_words::split(&line) {
            Ok(words) => words,
            Err(err) => {
                println!("{}", err);
                prompt(shell)?;
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => {}
            Some("exit") | Some("quit") => break,
            Some(_) => match ShellLine::try_parse_from(&words) {
                Ok(parsed) => {
                    run(shell, parsed.action).await;
                }
                Err(err) => {
                    let _ = err.print();
                }
            },
        }
        prompt(shell)?;
    }
    shell.close();
    Ok(())
}

// src/cli.rs
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::core::config_manager::Overrides;
use crate::core::{ApiClient, ConfigManager, SessionStore, ToastQueue};
use crate::error::ApiError;
use crate::render::{self, OutputFormat};
use crate::resume_validator::ResumeValidator;
use crate::router::{Resolution, Route, Router};
use crate::screens::employer::{ApplicationListScreen, JobDetailScreen, JobListScreen, JobPostingForm};
use crate::screens::talent::{
    ApplyScreen, EditProfileForm, JobBoardScreen, JobPostingDetailsScreen, MyApplicationsScreen,
    ProfileScreen,
};
use crate::screens::AuthForm;
use crate::types::{ApplicationStatus, JobApplication, Portal};

#[derive(Parser)]
#[command(name = "goodjob")]
#[command(about = "GoodJob employer and talent portals from the terminal")]
pub struct Cli {
    /// API base URL, e.g. http://localhost:8000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted portal sessions
    #[arg(long, global = true)]
    pub session_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub portal: PortalCommand,
}

#[derive(Subcommand)]
pub enum PortalCommand {
    /// Post jobs and review the applications they receive
    #[command(subcommand)]
    Employer(EmployerCommand),
    /// Browse jobs, apply and follow your applications
    #[command(subcommand)]
    Talent(TalentCommand),
}

#[derive(Subcommand)]
pub enum EmployerCommand {
    /// Create a recruiter account and sign in
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        password_confirmation: String,
    },
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List your job postings
    Jobs {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show one posting with its applications
    Show {
        id: u64,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Publish a new job posting (closes in 30 days)
    Post {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        salary: String,
        #[arg(long, default_value = "Full-time")]
        employment_type: String,
    },
    /// List applications for one of your postings
    Applications {
        job_id: u64,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Move an application to another status
    SetStatus {
        application_id: u64,
        /// pending, under review, interviewing, accepted or rejected
        status: ApplicationStatus,
    },
}

#[derive(Subcommand)]
pub enum TalentCommand {
    /// Create a talent account and sign in
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        password_confirmation: String,
    },
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    Logout,
    /// Show your profile
    Profile,
    /// Change name, email or password
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        current_password: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        password_confirmation: Option<String>,
    },
    /// Browse open positions
    Jobs {
        /// Filter by title, company or location
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show one posting
    Show { id: u64 },
    /// Apply to a posting with a PDF, DOC or DOCX resume
    Apply { id: u64, resume: PathBuf },
    /// List your applications
    Applications {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Fetch the resume attached to one of your applications
    Resume {
        application_id: u64,
        /// Save the document here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl PortalCommand {
    pub fn portal(&self) -> Portal {
        match self {
            PortalCommand::Employer(_) => Portal::Employer,
            PortalCommand::Talent(_) => Portal::Talent,
        }
    }
}

/// Everything a command needs: gateway, hydrated session and the router
struct PortalContext {
    api: ApiClient,
    session: SessionStore,
    router: Router,
}

impl PortalContext {
    /// Run the router guard for `route`. `Ok(false)` means the route
    /// redirected home because a session already exists.
    fn enter(&self, route: Route) -> Result<bool> {
        match self.router.resolve(route, &self.session) {
            Resolution::Render(_) => Ok(true),
            Resolution::Redirect(Route::Login) => Err(self.not_signed_in()),
            Resolution::Redirect(_) => {
                let who = self
                    .session
                    .user()
                    .map(|u| u.email.as_str())
                    .unwrap_or_default();
                println!("Already signed in as {}.", who);
                Ok(false)
            }
        }
    }

    /// Guard check ahead of a lookup that decides the final route
    fn require_session(&self, route: &Route) -> Result<()> {
        if self.router.requires_session(route) && !self.session.is_authenticated() {
            return Err(self.not_signed_in());
        }
        Ok(())
    }

    fn not_signed_in(&self) -> anyhow::Error {
        anyhow!(
            "Not signed in. Run `goodjob {} login` first.",
            self.router.portal()
        )
    }
}

/// Prefer the message the screen settled on over the raw gateway error.
fn failed(screen_message: Option<&str>, err: ApiError) -> anyhow::Error {
    match screen_message {
        Some(message) => anyhow!("{}", message),
        None => anyhow::Error::new(err),
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let portal = cli.portal.portal();
    let overrides = Overrides {
        api_url: cli.api_url.clone(),
        session_dir: cli.session_dir.clone(),
    };

    let config = ConfigManager::load(portal, &overrides)?;
    let mut ctx = PortalContext {
        api: config.api_client()?,
        session: config.open_session()?,
        router: Router::new(portal),
    };
    app_log!(
        info,
        "{} session file: {}",
        portal.display_name(),
        config.portal.storage_path.display()
    );

    match cli.portal {
        PortalCommand::Employer(command) => run_employer(&mut ctx, command).await,
        PortalCommand::Talent(command) => run_talent(&mut ctx, command).await,
    }
}

async fn authenticate(ctx: &mut PortalContext, route: Route, mut form: AuthForm) -> Result<()> {
    if !ctx.enter(route)? {
        return Ok(());
    }
    form.submit(&ctx.api, &mut ctx.session).await?;
    if let Some(user) = ctx.session.user() {
        println!("✅ Signed in as {} ({})", user.name, user.email);
    }
    Ok(())
}

fn logout(ctx: &mut PortalContext) -> Result<()> {
    ctx.session.logout()?;
    println!("Signed out of {}.", ctx.router.portal().display_name());
    Ok(())
}

async fn run_employer(ctx: &mut PortalContext, command: EmployerCommand) -> Result<()> {
    let mut stdout = io::stdout();

    match command {
        EmployerCommand::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let form = AuthForm::register(name, email, password, password_confirmation);
            authenticate(ctx, Route::Register, form).await
        }

        EmployerCommand::Login { email, password } => {
            authenticate(ctx, Route::Login, AuthForm::login(email, password)).await
        }

        EmployerCommand::Logout => logout(ctx),

        EmployerCommand::Whoami => match ctx.session.user() {
            Some(user) => render::user(&mut stdout, user),
            None => {
                writeln!(stdout, "Welcome to {}. Not signed in.", Portal::Employer.display_name())?;
                Ok(())
            }
        },

        EmployerCommand::Jobs { format } => {
            ctx.enter(Route::Home)?;
            if !ctx.session.is_authenticated() {
                bail!("Not signed in. Run `goodjob employer login` first.");
            }

            let mut screen = JobListScreen::new();
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.postings.error(), err));
            }
            let postings: Vec<_> = screen.postings.data().into_iter().flatten().collect();
            if postings.is_empty() && format == OutputFormat::Table {
                writeln!(stdout, "You have not posted any jobs yet.")?;
                return Ok(());
            }
            render::postings(&mut stdout, &postings, format)
        }

        EmployerCommand::Show { id, format } => {
            ctx.enter(Route::JobDetail(id))?;

            let mut screen = JobDetailScreen::new(id);
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                let message = screen
                    .posting
                    .error()
                    .or(screen.applications.applications.error());
                return Err(failed(message, err));
            }

            if let Some(posting) = screen.posting.data() {
                render::posting_detail(&mut stdout, posting)?;
            }
            writeln!(stdout)?;
            let rows = screen.applications.applications.data().cloned().unwrap_or_default();
            print_applications(&mut stdout, &ctx.api, &screen.applications, &rows, format)
        }

        EmployerCommand::Post {
            title,
            company,
            description,
            location,
            salary,
            employment_type,
        } => {
            ctx.enter(Route::PostJob)?;

            let mut form = JobPostingForm::new();
            form.title = title;
            form.company_name = company;
            form.description = description;
            form.location = location;
            form.salary = salary;
            form.employment_type = employment_type;
            let created = form
                .submit(&ctx.api, &mut ctx.session, Utc::now())
                .await
                .map_err(|err| failed(form.error(), err))?;

            writeln!(stdout, "✅ Job posted (ID {})", created.id)?;
            render::posting_detail(&mut stdout, &created)
        }

        EmployerCommand::Applications { job_id, format } => {
            ctx.enter(Route::JobDetail(job_id))?;

            let mut screen = ApplicationListScreen::new(job_id);
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.applications.error(), err));
            }
            let rows = screen.applications.data().cloned().unwrap_or_default();
            print_applications(&mut stdout, &ctx.api, &screen, &rows, format)
        }

        EmployerCommand::SetStatus {
            application_id,
            status,
        } => {
            // The posting is only known after the lookup; posting routes share one guard.
            ctx.require_session(&Route::JobDetail(application_id))?;

            let mut screen =
                ApplicationListScreen::for_application(&ctx.api, &mut ctx.session, application_id)
                    .await?;
            ctx.enter(Route::JobDetail(screen.job_posting_id()))?;

            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.applications.error(), err));
            }
            if let Err(err) = screen
                .update_status(&ctx.api, &mut ctx.session, application_id, status)
                .await
            {
                return Err(failed(screen.action_error(), err));
            }

            writeln!(
                stdout,
                "✅ Application {} is now {}",
                application_id,
                status.label()
            )?;
            Ok(())
        }
    }
}

fn print_applications<W: Write>(
    mut out: W,
    api: &ApiClient,
    screen: &ApplicationListScreen,
    rows: &[JobApplication],
    format: OutputFormat,
) -> Result<()> {
    if rows.is_empty() {
        if format == OutputFormat::Table {
            writeln!(out, "No applications yet.")?;
            return Ok(());
        }
        return render::applications(out, rows, format);
    }

    // Table output shows the resolved resume link under each row.
    if format != OutputFormat::Table {
        return render::applications(out, rows, format);
    }
    render::applications(&mut out, rows, format)?;
    writeln!(out)?;
    for row in rows {
        if let Some(link) = screen.resume_link(api, row) {
            writeln!(out, "  #{} resume: {}", row.id, link)?;
        }
    }
    Ok(())
}

async fn run_talent(ctx: &mut PortalContext, command: TalentCommand) -> Result<()> {
    let toasts = ToastQueue::new();
    let result = run_talent_command(ctx, command, &toasts).await;
    render::toasts(io::stderr(), &toasts.toasts())?;
    result
}

async fn run_talent_command(
    ctx: &mut PortalContext,
    command: TalentCommand,
    toasts: &ToastQueue,
) -> Result<()> {
    let mut stdout = io::stdout();

    match command {
        TalentCommand::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let form = AuthForm::register(name, email, password, password_confirmation);
            authenticate(ctx, Route::Register, form).await
        }

        TalentCommand::Login { email, password } => {
            authenticate(ctx, Route::Login, AuthForm::login(email, password)).await
        }

        TalentCommand::Logout => logout(ctx),

        TalentCommand::Profile => {
            ctx.enter(Route::Profile)?;

            let mut screen = ProfileScreen::new();
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.profile.error(), err));
            }
            match screen.user() {
                Some(user) => render::user(&mut stdout, user),
                None => Ok(()),
            }
        }

        TalentCommand::UpdateProfile {
            name,
            email,
            current_password,
            password,
            password_confirmation,
        } => {
            ctx.enter(Route::EditProfile)?;
            let Some(current) = ctx.session.user() else {
                bail!("Not signed in. Run `goodjob talent login` first.");
            };

            let mut form = EditProfileForm::from_user(current);
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(current_password) = current_password {
                form.change_password = true;
                form.current_password = current_password;
                form.password = password.unwrap_or_default();
                form.password_confirmation = password_confirmation.unwrap_or_default();
            }

            let user = form.submit(&ctx.api, &mut ctx.session, toasts).await?;
            render::user(&mut stdout, &user)
        }

        TalentCommand::Jobs { search, format } => {
            ctx.enter(Route::Jobs)?;

            let mut screen = JobBoardScreen::new();
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.postings.error(), err));
            }
            if let Some(term) = search {
                screen.set_search(term);
            }

            let visible = screen.visible();
            if visible.is_empty() && format == OutputFormat::Table {
                writeln!(stdout, "{}", screen.empty_message())?;
                return Ok(());
            }
            render::postings(&mut stdout, &visible, format)
        }

        TalentCommand::Show { id } => {
            ctx.enter(Route::JobDetail(id))?;

            let mut screen = JobPostingDetailsScreen::new(id);
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.posting.error(), err));
            }
            if let Some(posting) = screen.posting.data() {
                render::posting_detail(&mut stdout, posting)?;
            }
            Ok(())
        }

        TalentCommand::Apply { id, resume } => {
            ctx.enter(Route::Apply(id))?;

            let mut screen = ApplyScreen::new(id);
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.posting.error(), err));
            }
            if let Some(posting) = screen.posting.data() {
                writeln!(
                    stdout,
                    "Applying to {} at {}",
                    posting.title, posting.company_name
                )?;
            }

            let file = ResumeValidator::load(&resume)
                .await
                .map_err(|e| anyhow!("{} ({})", e.message, e.suggestion))?;
            writeln!(stdout, "Resume: {} ({})", file.file_name, file.size_label())?;
            screen.select_resume(file)?;

            screen
                .submit(&ctx.api, &mut ctx.session, toasts)
                .await
                .map_err(|err| failed(screen.error(), err))?;

            if let Some(url) = screen.uploaded_resume_url() {
                writeln!(stdout, "Uploaded resume: {}", url)?;
            }
            writeln!(
                stdout,
                "Track it with `goodjob talent applications` ({})",
                ctx.router.path(&Route::MyApplications)
            )?;
            Ok(())
        }

        TalentCommand::Applications { format } => {
            ctx.enter(Route::MyApplications)?;

            let mut screen = MyApplicationsScreen::new();
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.applications.error(), err));
            }
            let rows = screen.applications.data().cloned().unwrap_or_default();
            if rows.is_empty() && format == OutputFormat::Table {
                writeln!(stdout, "You have not applied to any jobs yet.")?;
                return Ok(());
            }
            render::applications(&mut stdout, &rows, format)
        }

        TalentCommand::Resume {
            application_id,
            out,
        } => {
            ctx.enter(Route::MyApplications)?;

            let mut screen = MyApplicationsScreen::new();
            if let Err(err) = screen.load(&ctx.api, &mut ctx.session).await {
                return Err(failed(screen.applications.error(), err));
            }
            let Some(preview) = screen.open_preview(application_id) else {
                bail!("Application {} has no resume to preview", application_id);
            };
            if let Err(err) = preview.load(&ctx.api).await {
                return Err(failed(preview.document.error(), err));
            }

            writeln!(stdout, "{} ({} pages)", preview.url(), preview.pages())?;
            if let (Some(path), Some(document)) = (out, preview.document.data()) {
                save_document(&path, &document.bytes).await?;
                writeln!(stdout, "Saved to {}", path.display())?;
            }
            screen.close_preview();
            Ok(())
        }
    }
}

async fn save_document(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_status_words() {
        let cli = Cli::try_parse_from([
            "goodjob",
            "employer",
            "set-status",
            "7",
            "under review",
        ])
        .unwrap();

        match cli.portal {
            PortalCommand::Employer(EmployerCommand::SetStatus {
                application_id,
                status,
            }) => {
                assert_eq!(application_id, 7);
                assert_eq!(status, ApplicationStatus::UnderReview);
            }
            _ => panic!("expected set-status"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "goodjob",
            "talent",
            "jobs",
            "--search",
            "acme",
            "--api-url",
            "http://127.0.0.1:9000/api",
            "--format",
            "csv",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000/api"));
        assert_eq!(cli.portal.portal(), Portal::Talent);
    }
}

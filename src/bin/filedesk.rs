use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;

use filedesk::client::{ApiClient, ClientError, FilesService, LoginService, UserService};
use filedesk::config::ClientConfig;
use filedesk::models::file::{DownloadDescriptor, FileInfo, UploadFile};
use filedesk::session::Session;
use filedesk::views::dashboard::{Column, Dashboard, SortDirection, SortState};
use filedesk::views::login::LoginView;
use filedesk::views::sign_up::{SignUpForm, SignUpView};
use filedesk::views::upload::UploadView;
use filedesk::views::{NotificationKind, Outcome, Route};

/// filedesk - terminal front end for the filedesk file manager
#[derive(Parser, Debug)]
#[command(name = "filedesk")]
#[command(about = "Upload, edit, download and list your files", long_about = None)]
struct Cli {
    /// API base URL (e.g., http://127.0.0.1:3000/v1)
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// Session file (defaults to FILEDESK_SESSION_FILE or a temp file)
    #[arg(long = "session")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        password: String,
        /// Admin selector value; only "true" grants admin
        #[arg(long, default_value = "false")]
        admin: String,
    },
    /// Log in and remember the user for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the current session
    Logout,
    /// List the current user's files
    Files {
        /// file_name, description, updated_at or created_at
        #[arg(long)]
        sort: Option<Column>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// List all users
    Users,
    /// Upload a local file
    Upload { path: PathBuf },
    /// Change the description of a file
    Edit {
        name: String,
        #[arg(long)]
        description: String,
    },
    /// Print the presigned URL of a file, or save the file with --output
    Download {
        name: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a file
    Delete { name: String },
}

struct App {
    users: UserService,
    files: FilesService,
    login: LoginService,
    session: Session,
    session_file: PathBuf,
}

impl App {
    fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.users.clone(), self.files.clone())
    }

    async fn save_session(&self) -> Result<(), ClientError> {
        self.session.save(&self.session_file).await
    }
}

fn print_outcome(outcome: &Outcome) {
    if let Some(notification) = &outcome.notification {
        match notification.kind {
            NotificationKind::Primary => println!("{}", notification),
            NotificationKind::Warn => eprintln!("{}", notification),
        }
    }
    if let Some(route) = &outcome.navigate {
        log::debug!("navigate to {:?}", route);
    }
}

/// Successful view actions always navigate somewhere.
fn outcome_status(outcome: &Outcome) -> ExitCode {
    print_outcome(outcome);
    if outcome.navigate.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_rows(rows: &[FileInfo]) {
    if rows.is_empty() {
        println!("No files");
        return;
    }
    let width = rows.iter().map(|r| r.file_name.len()).max().unwrap_or(0).max(9);
    println!(
        "{:<width$}  {:<20}  {:<20}  DESCRIPTION",
        "FILE_NAME",
        "UPDATED_AT",
        "CREATED_AT",
        width = width
    );
    for row in rows {
        println!(
            "{:<width$}  {:<20}  {:<20}  {}",
            row.file_name,
            row.updated_at.format("%Y-%m-%d %H:%M:%S"),
            row.created_at.format("%Y-%m-%d %H:%M:%S"),
            row.description,
            width = width
        );
    }
}

async fn run(app: &mut App, command: Command) -> Result<ExitCode, ClientError> {
    match command {
        Command::Register {
            email,
            first_name,
            last_name,
            password,
            admin,
        } => {
            let form = SignUpForm {
                email_address: email,
                password,
                first_name,
                last_name,
                is_admin: admin,
            };
            let outcome = SignUpView::new(app.login.clone()).register(&form).await;
            Ok(outcome_status(&outcome))
        }
        Command::Login { email, password } => {
            let outcome = LoginView::new(app.login.clone())
                .submit(&mut app.session, &email, &password)
                .await;
            if outcome.navigate == Some(Route::Dashboard) {
                app.save_session().await?;
            }
            Ok(outcome_status(&outcome))
        }
        Command::Logout => {
            Session::destroy(&app.session_file).await?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Files { sort, desc } => {
            let mut dashboard = app.dashboard();
            dashboard.subscribe(|user| {
                log::info!("Loaded {} file(s) of {}", user.files.len(), user.email_address)
            });
            dashboard.load(&app.session).await?;
            if let Some(column) = sort {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                dashboard.set_sort(SortState { column, direction });
            }
            print_rows(dashboard.rows());
            Ok(ExitCode::SUCCESS)
        }
        Command::Users => {
            let all = app.users.get_all_users().await?;
            for user in all.users {
                println!(
                    "{}  {} {}  <{}>{}  {} file(s)",
                    user.user_id,
                    user.firstname,
                    user.lastname,
                    user.username,
                    if user.is_admin { " [admin]" } else { "" },
                    user.files.len()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Upload { path } => {
            let file = UploadFile::from_path(&path).await?;
            let outcome = UploadView::new(app.files.clone())
                .upload(&app.session, file)
                .await;
            Ok(outcome_status(&outcome))
        }
        Command::Edit { name, description } => {
            let mut dashboard = app.dashboard();
            dashboard.load(&app.session).await?;
            let route = dashboard.go_to_edit(&mut app.session, &name)?;
            log::debug!("navigate to {:?}", route);
            app.save_session().await?;

            let outcome = UploadView::new(app.files.clone())
                .save_description(&mut app.session, &description)
                .await;
            app.save_session().await?;
            Ok(outcome_status(&outcome))
        }
        Command::Download { name, output } => {
            let url = app.dashboard().download_file(&app.session, &name).await?;
            match output {
                None => println!("{}", url),
                Some(path) => {
                    let bytes = app
                        .files
                        .fetch_presigned(&DownloadDescriptor {
                            presigned_url: Some(url),
                        })
                        .await?;
                    tokio::fs::write(&path, &bytes).await?;
                    println!("Saved {} bytes to {}", bytes.len(), path.display());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { name } => {
            let mut dashboard = app.dashboard();
            let outcome = dashboard.delete_file(&app.session, &name).await;
            print_outcome(&outcome);
            let still_listed = dashboard.rows().iter().any(|r| r.file_name == name);
            if dashboard.user_details().is_some() && !still_listed {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    let api_url = cli.url.unwrap_or(config.api_url);
    let session_file = cli.session.unwrap_or(config.session_file);

    let api = match ApiClient::new(&api_url) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let session = match Session::load(&session_file).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut app = App {
        users: UserService::new(api.clone()),
        files: FilesService::new(api.clone()),
        login: LoginService::new(api),
        session,
        session_file,
    };

    match run(&mut app, cli.command).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[macro_use]
extern crate log;

mod admin;
mod auth;
mod catalogue;
mod config;
mod notify;
mod output;
mod social;
mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use yomu_lib::models::{MangaStatus, Role};
use yomu_lib::search::SortBy;

use config::Config;

#[derive(Parser)]
#[clap(version, about = "Read, follow and upload manga from the terminal")]
struct Opts {
    /// Path to config.yml, defaults to $YOMU_HOME/config.yml
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    subcmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the token in the config
    Login {
        username: String,
        /// Read from stdin when omitted
        #[clap(long)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Register {
        username: String,
        email: String,
        #[clap(long)]
        password: Option<String>,
    },
    /// List manga page by page
    Browse {
        #[clap(long, default_value_t = 1)]
        page: i64,
        #[clap(long, value_parser = parse_sort, default_value = "latest")]
        sort: SortBy,
    },
    Search {
        query: Option<String>,
        #[clap(long = "genre")]
        genres: Vec<String>,
        #[clap(long, value_parser = parse_status)]
        status: Option<MangaStatus>,
        #[clap(long, default_value_t = 1)]
        page: i64,
    },
    /// Manga details and chapter list
    Show { manga_id: i64 },
    /// Print page URLs and record reading progress
    Read {
        manga_id: i64,
        chapter_id: i64,
        /// Page to record as last read, 1-based
        #[clap(long)]
        page: Option<i64>,
    },
    Comments {
        manga_id: i64,
        #[clap(long)]
        chapter: Option<i64>,
    },
    Comment {
        manga_id: i64,
        content: String,
        #[clap(long)]
        chapter: Option<i64>,
        #[clap(long)]
        reply_to: Option<i64>,
    },
    Follow { manga_id: i64 },
    Unfollow { manga_id: i64 },
    Library,
    History {
        /// Delete one entry
        #[clap(long)]
        delete: Option<i64>,
        #[clap(long)]
        clear: bool,
    },
    Notifications {
        /// Stream new notifications until interrupted
        #[clap(long)]
        watch: bool,
        #[clap(long)]
        read: Option<i64>,
        #[clap(long)]
        read_all: bool,
        #[clap(long)]
        delete: Option<i64>,
    },
    UploadManga {
        title: String,
        #[clap(long, default_value = "")]
        author: String,
        #[clap(long)]
        description: Option<String>,
        #[clap(long = "genre")]
        genres: Vec<String>,
        #[clap(long, value_parser = parse_status, default_value = "ongoing")]
        status: MangaStatus,
        #[clap(long)]
        cover: Option<PathBuf>,
    },
    /// Upload every image in `dir` as one chapter, in natural file order
    UploadChapter {
        manga_id: i64,
        dir: PathBuf,
        #[clap(long)]
        number: f64,
        #[clap(long, default_value = "")]
        title: String,
    },
    #[clap(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum AdminCommand {
    Users,
    Role {
        user_id: i64,
        #[clap(value_parser = parse_role)]
        role: Role,
    },
    DeleteUser { user_id: i64 },
    Comments {
        #[clap(long, default_value_t = 1)]
        page: i64,
    },
    DeleteComment { comment_id: i64 },
    DeleteManga { manga_id: i64 },
}

fn parse_sort(s: &str) -> Result<SortBy, String> {
    s.parse()
}

fn parse_status(s: &str) -> Result<MangaStatus, String> {
    s.parse()
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts: Opts = Opts::parse();
    let mut config = Config::open(opts.config.as_ref())?;

    match opts.subcmd {
        Command::Login { username, password } => {
            auth::login(&mut config, username, password).await?
        }
        Command::Logout => auth::logout(&mut config)?,
        Command::Whoami => auth::whoami(&config).await?,
        Command::Register {
            username,
            email,
            password,
        } => auth::register(&mut config, username, email, password).await?,
        Command::Browse { page, sort } => catalogue::browse(&config, page, sort).await?,
        Command::Search {
            query,
            genres,
            status,
            page,
        } => catalogue::search(&config, query, genres, status, page).await?,
        Command::Show { manga_id } => catalogue::show(&config, manga_id).await?,
        Command::Read {
            manga_id,
            chapter_id,
            page,
        } => catalogue::read(&config, manga_id, chapter_id, page).await?,
        Command::Comments { manga_id, chapter } => {
            social::comments(&config, manga_id, chapter).await?
        }
        Command::Comment {
            manga_id,
            content,
            chapter,
            reply_to,
        } => social::comment(&config, manga_id, chapter, reply_to, content).await?,
        Command::Follow { manga_id } => social::follow(&config, manga_id, true).await?,
        Command::Unfollow { manga_id } => social::follow(&config, manga_id, false).await?,
        Command::Library => social::library(&config).await?,
        Command::History { delete, clear } => social::history(&config, delete, clear).await?,
        Command::Notifications {
            watch,
            read,
            read_all,
            delete,
        } => notify::notifications(&config, watch, read, read_all, delete).await?,
        Command::UploadManga {
            title,
            author,
            description,
            genres,
            status,
            cover,
        } => {
            let input = yomu_lib::models::MangaInput {
                title,
                author,
                description,
                genres,
                status,
            };
            upload::upload_manga(&config, input, cover).await?
        }
        Command::UploadChapter {
            manga_id,
            dir,
            number,
            title,
        } => upload::upload_chapter(&config, manga_id, &dir, number, title).await?,
        Command::Admin(command) => match command {
            AdminCommand::Users => admin::users(&config).await?,
            AdminCommand::Role { user_id, role } => admin::set_role(&config, user_id, role).await?,
            AdminCommand::DeleteUser { user_id } => admin::delete_user(&config, user_id).await?,
            AdminCommand::Comments { page } => admin::comments(&config, page).await?,
            AdminCommand::DeleteComment { comment_id } => {
                admin::delete_comment(&config, comment_id).await?
            }
            AdminCommand::DeleteManga { manga_id } => admin::delete_manga(&config, manga_id).await?,
        },
    }

    Ok(())
}

use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use sqlx::SqlitePool;

use folio::blog::{self, NewPost, PostUpdate};
use folio::config::{Config, loader};
use folio::content::sanitize;
use folio::dashboard::dashboard;
use folio::db::init_pool;
use folio::media::{self, ImageAttachment};
use folio::project::{self, NewProject, ProjectUpdate};
use folio::sitemap::build_sitemap;
use folio::validation::slug::validate_slug;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio CLI - Manage blog posts, projects and images", long_about = None)]
struct Cli {
    /// Config file to use instead of the discovered one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Post(PostCommands),
    #[command(subcommand)]
    Project(ProjectCommands),
    #[command(subcommand)]
    Image(ImageCommands),
    /// Print the sitemap XML
    Sitemap,
    /// Print content and feedback counts
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Sanitize HTML from stdin with the configured policy
    Sanitize,
}

#[derive(Subcommand)]
enum PostCommands {
    /// Create a new blog post
    Create {
        #[arg(short, long)]
        title: String,
        /// HTML body file, `-` for stdin (stdin when omitted)
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Cover image (png, jpg, jpeg or gif)
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update an existing blog post
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        /// HTML body file, `-` for stdin
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a blog post and its feedback
    Delete { id: String },
    /// List blog posts, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Show a blog post by slug
    Show {
        slug: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ProjectFieldArgs {
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated skills
    #[arg(long)]
    skills: Option<String>,
    #[arg(long)]
    demo_link: Option<String>,
    #[arg(long)]
    case_study_link: Option<String>,
    /// HTML body file, `-` for stdin
    #[arg(long)]
    content_file: Option<PathBuf>,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Create a new project
    Create {
        #[arg(short, long)]
        title: String,
        #[command(flatten)]
        fields: ProjectFieldArgs,
    },
    /// Update an existing project
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[command(flatten)]
        fields: ProjectFieldArgs,
    },
    /// Delete a project and its feedback
    Delete { id: String },
    /// List projects, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,
    },
    /// Show a project by slug
    Show {
        slug: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ImageCommands {
    /// Store an image for use inside post or project bodies
    Upload { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => loader::load_from_file(path)?,
        None => loader::load_with_discovery()?,
    };

    let level = config
        .logging
        .level()
        .map_err(|err| anyhow::anyhow!(err))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Sanitize = cli.command {
        let raw = read_stdin()?;
        print!("{}", sanitize(&raw, &config.sanitizer));
        return Ok(());
    }

    let (pool, _) = init_pool(&config.database).await?;

    match cli.command {
        Commands::Post(cmd) => run_post(&pool, &config, cmd).await?,
        Commands::Project(cmd) => run_project(&pool, &config, cmd).await?,
        Commands::Image(ImageCommands::Upload { path }) => upload_image(&pool, &path).await?,
        Commands::Sitemap => print!("{}", build_sitemap(&pool, &config.site.base_url).await?),
        Commands::Stats { json } => print_stats(&pool, json).await?,
        Commands::Sanitize => {}
    }

    Ok(())
}

async fn run_post(pool: &SqlitePool, config: &Config, cmd: PostCommands) -> Result<()> {
    match cmd {
        PostCommands::Create {
            title,
            content_file,
            image,
        } => {
            let content = read_content(content_file.as_deref().unwrap_or(Path::new("-")))?;
            let image = load_image(image.as_deref(), config.images.blog_max).await?;
            let post = blog::create_post(pool, &config.sanitizer, NewPost { title, content, image })
                .await?;

            println!("✓ Blog post created successfully!");
            println!("  ID:   {}", post.id);
            println!("  Slug: {}", post.slug);
        }
        PostCommands::Update {
            id,
            title,
            content_file,
            image,
        } => {
            let content = content_file.as_deref().map(read_content).transpose()?;
            let image = load_image(image.as_deref(), config.images.blog_max).await?;
            let post = blog::update_post(
                pool,
                &config.sanitizer,
                &id,
                PostUpdate {
                    title,
                    content,
                    image,
                },
            )
            .await?;

            println!("✓ Blog post updated successfully!");
            println!("  ID:   {}", post.id);
            println!("  Slug: {}", post.slug);
        }
        PostCommands::Delete { id } => {
            blog::delete_post(pool, &id).await?;
            println!("✓ Blog post deleted.");
        }
        PostCommands::List { page } => {
            let page = blog::list_posts_page(pool, page).await?;
            for post in &page.items {
                println!(
                    "{}  {:<40}  {}",
                    post.date_posted.format("%Y-%m-%d"),
                    post.slug,
                    post.title
                );
            }
            println!(
                "Page {} of {} ({} posts)",
                page.page,
                page.pages().max(1),
                page.total
            );
        }
        PostCommands::Show { slug, json } => {
            validate_slug(&slug)?;
            let post = blog::get_post_by_slug(pool, &slug)
                .await?
                .with_context(|| format!("no blog post with slug '{slug}'"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                println!("{}", post.title);
                println!("  ID:     {}", post.id);
                println!("  Slug:   {}", post.slug);
                println!("  Posted: {}", post.date_posted.to_rfc3339());
                println!("  Image:  {}", post.image_filename);
                println!();
                println!("{}", post.content);
            }
        }
    }
    Ok(())
}

async fn run_project(pool: &SqlitePool, config: &Config, cmd: ProjectCommands) -> Result<()> {
    match cmd {
        ProjectCommands::Create { title, fields } => {
            let content = read_content(fields.content_file.as_deref().unwrap_or(Path::new("-")))?;
            let image = load_image(fields.image.as_deref(), config.images.project_max).await?;
            let project = project::create_project(
                pool,
                &config.sanitizer,
                NewProject {
                    title,
                    description: fields.description.unwrap_or_default(),
                    content,
                    skills_used: fields.skills,
                    demo_link: fields.demo_link,
                    case_study_link: fields.case_study_link,
                    image,
                },
            )
            .await?;

            println!("✓ Project created successfully!");
            println!("  ID:   {}", project.id);
            println!("  Slug: {}", project.slug);
        }
        ProjectCommands::Update { id, title, fields } => {
            let content = fields.content_file.as_deref().map(read_content).transpose()?;
            let image = load_image(fields.image.as_deref(), config.images.project_max).await?;
            let project = project::update_project(
                pool,
                &config.sanitizer,
                &id,
                ProjectUpdate {
                    title,
                    description: fields.description,
                    content,
                    skills_used: fields.skills,
                    demo_link: fields.demo_link,
                    case_study_link: fields.case_study_link,
                    image,
                },
            )
            .await?;

            println!("✓ Project updated successfully!");
            println!("  ID:   {}", project.id);
            println!("  Slug: {}", project.slug);
        }
        ProjectCommands::Delete { id } => {
            project::delete_project(pool, &id).await?;
            println!("✓ Project deleted.");
        }
        ProjectCommands::List { page } => {
            let page = project::list_projects_page(pool, page).await?;
            for project in &page.items {
                println!(
                    "{}  {:<40}  {}",
                    project.date_posted.format("%Y-%m-%d"),
                    project.slug,
                    project.title
                );
            }
            println!(
                "Page {} of {} ({} projects)",
                page.page,
                page.pages().max(1),
                page.total
            );
        }
        ProjectCommands::Show { slug, json } => {
            validate_slug(&slug)?;
            let project = project::get_project_by_slug(pool, &slug)
                .await?
                .with_context(|| format!("no project with slug '{slug}'"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                println!("{}", project.title);
                println!("  ID:          {}", project.id);
                println!("  Slug:        {}", project.slug);
                println!("  Description: {}", project.description);
                println!("  Skills:      {}", project.skill_tags().join(", "));
                if let Some(link) = &project.demo_link {
                    println!("  Demo:        {}", link);
                }
                if let Some(link) = &project.case_study_link {
                    println!("  Case study:  {}", link);
                }
                println!();
                println!("{}", project.content);
            }
        }
    }
    Ok(())
}

async fn upload_image(pool: &SqlitePool, path: &Path) -> Result<()> {
    let (filename, bytes, mimetype) = read_image_file(path)?;
    let id = media::store_uploaded_image(pool, &filename, bytes, mimetype).await?;

    println!("✓ Image uploaded successfully!");
    println!("  ID:       {}", id);
    println!("  Filename: {}", filename);

    Ok(())
}

async fn print_stats(pool: &SqlitePool, json: bool) -> Result<()> {
    let stats = dashboard(pool).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Posts:    {}", stats.posts);
    println!("Projects: {}", stats.projects);
    println!("Comments: {}", stats.comments);
    println!("Ratings:  {}", stats.ratings);
    println!("Likes:    {}", stats.likes);
    println!("Images:   {}", stats.uploaded_images);
    if !stats.latest_posts.is_empty() {
        println!();
        println!("Latest posts:");
        for post in &stats.latest_posts {
            println!("  {}  {}", post.date_posted.format("%Y-%m-%d"), post.title);
        }
    }
    if !stats.latest_projects.is_empty() {
        println!();
        println!("Latest projects:");
        for project in &stats.latest_projects {
            println!("  {}  {}", project.date_posted.format("%Y-%m-%d"), project.title);
        }
    }
    Ok(())
}

async fn load_image(path: Option<&Path>, max_size: (u32, u32)) -> Result<Option<ImageAttachment>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let (filename, bytes, mimetype) = read_image_file(path)?;
    let attachment = media::prepare_attachment(&filename, bytes, mimetype, Some(max_size))
        .await
        .with_context(|| format!("failed to process image: {}", path.display()))?;
    Ok(Some(attachment))
}

fn read_image_file(path: &Path) -> Result<(String, Vec<u8>, &'static str)> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("not a file path: {}", path.display()))?;
    let mimetype = media::mimetype_for_filename(&filename)
        .with_context(|| format!("unsupported image type: {}", filename))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    Ok((filename, bytes, mimetype))
}

fn read_content(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return read_stdin();
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read content file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

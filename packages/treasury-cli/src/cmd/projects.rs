//! Ministry projects

use anyhow::Result;
use clap::Subcommand;
use rust_decimal::Decimal;
use treasury_client::{format_kes, NewProject, ProjectStatus, Role};

use crate::context::AppContext;

#[derive(Subcommand)]
pub enum ProjectsCommand {
    /// List projects (your ministry's by default)
    List {
        /// Ministry id; super admins see every ministry when omitted
        #[arg(long)]
        ministry: Option<i64>,
    },

    /// Start a project under your ministry
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        budget: Decimal,

        #[arg(long)]
        description: Option<String>,

        /// Ministry id (defaults to your own)
        #[arg(long)]
        ministry: Option<i64>,
    },
}

pub async fn run(ctx: &AppContext, cmd: ProjectsCommand) -> Result<()> {
    match cmd {
        ProjectsCommand::List { ministry } => list(ctx, ministry).await,
        ProjectsCommand::Create {
            name,
            budget,
            description,
            ministry,
        } => create(ctx, name, budget, description, ministry).await,
    }
}

async fn list(ctx: &AppContext, ministry: Option<i64>) -> Result<()> {
    let session = ctx.require(Some(Role::MinistryAdmin))?;
    let ministry = ministry.or(session.ministry_id());

    let projects = ctx.client.projects(ministry).await?;

    ctx.print_header(&format!("Projects ({})", projects.len()));
    for project in &projects {
        println!(
            "{:>4}  {:<36} {:<10} budget {:>20}  spent {:>20}",
            project.id,
            project.name,
            project.status.label(),
            format_kes(project.budget),
            format_kes(project.spent)
        );
    }
    Ok(())
}

async fn create(
    ctx: &AppContext,
    name: String,
    budget: Decimal,
    description: Option<String>,
    ministry: Option<i64>,
) -> Result<()> {
    let session = ctx.require(Some(Role::MinistryAdmin))?;
    let Some(ministry_id) = ministry.or(session.ministry_id()) else {
        anyhow::bail!("No ministry on this session; pass --ministry");
    };

    let project = ctx
        .client
        .create_project(&NewProject {
            ministry_id,
            name,
            description,
            budget,
            status: ProjectStatus::Planning,
        })
        .await?;

    ctx.print_success(&format!(
        "Created project {} (id {})",
        project.name, project.id
    ));
    Ok(())
}

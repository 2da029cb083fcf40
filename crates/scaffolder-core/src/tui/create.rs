//! Interactive new-project flow

use crate::config::Settings;
use crate::project::{validate_project_name, NewProject, PackageManager, ProjectReport};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name; asked for when missing
    pub name: Option<String>,

    /// Package manager; asked for when missing
    pub package_manager: Option<PackageManager>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the new-project flow with interactive prompts.
///
/// The project lands in `<settings.destination_root>/<name>`, cloned from
/// `template_subdir` of the template root.
pub async fn run_create(args: CreateArgs, settings: &Settings, template_subdir: &str) -> Result<()> {
    cliclack::intro("Create Next App")?;

    // Step 1: Project name
    let name = select_name(&args)?;

    // Step 2: Package manager
    let package_manager = select_package_manager(&args)?;

    // Step 3: Create project
    let project = NewProject::new(name, package_manager);
    let template_root = settings.template_root.join(template_subdir);
    let report = create_project(&project, &template_root, settings).await?;

    // Step 4: Show dependencies and next steps
    print_dependencies(&report);
    print_next_steps(&project, &report.root)?;

    Ok(())
}

fn select_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        let name = validate_project_name(name).map_err(anyhow::Error::msg)?;
        cliclack::log::info(format!("Project name: {}", name))?;
        return Ok(name);
    }

    let raw: String = cliclack::input("Enter the project name")
        .validate(|raw: &String| validate_project_name(raw).map(|_| ()))
        .interact()?;

    validate_project_name(&raw).map_err(anyhow::Error::msg)
}

fn select_package_manager(args: &CreateArgs) -> Result<PackageManager> {
    if let Some(pm) = args.package_manager {
        return Ok(pm);
    }

    if args.yes {
        let pm = PackageManager::default();
        cliclack::log::info(format!("Using {} (--yes mode)", pm))?;
        return Ok(pm);
    }

    let mut select = cliclack::select("Pick a package manager");
    for pm in PackageManager::ALL {
        select = select.item(pm, pm.as_str(), "");
    }
    Ok(select.initial_value(PackageManager::default()).interact()?)
}

async fn create_project(
    project: &NewProject,
    template_root: &Path,
    settings: &Settings,
) -> Result<ProjectReport> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let result = project
        .create(template_root, &settings.destination_root, settings.clone_concurrency)
        .await;

    match result {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.files.len() + 1,
                report.root.display()
            ));
            Ok(report)
        }
        Err(e) => {
            spinner.stop("Failed to create project");
            Err(e).context("Project was not created")
        }
    }
}

fn print_dependencies(report: &ProjectReport) {
    println!();
    println!("  Dependencies");
    for dependency in &report.dependencies {
        println!("  - {}", dependency.cyan());
    }

    println!();
    println!("  Dev dependencies");
    for dependency in &report.dev_dependencies {
        println!("  - {}", dependency.cyan());
    }
}

fn print_next_steps(project: &NewProject, project_root: &Path) -> Result<()> {
    println!();
    println!(
        "  {} Created {} at {}",
        "Success!".green(),
        project.name,
        project_root.display()
    );
    println!();
    println!("  Next steps");
    println!();

    for (i, (command, explanation)) in project.next_steps(project_root).iter().enumerate() {
        println!("  {}.  {}", i + 1, command.cyan());
        println!("      {}", explanation.dimmed());
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

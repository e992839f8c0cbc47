use clap::{Parser, Subcommand};
use physio_core::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "physio")]
#[command(about = "PhysioAssist prescription API client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to $XDG_CONFIG_HOME/physio/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Override the API key
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Print raw JSON records instead of a summary
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and author exercise templates
    Templates {
        #[command(subcommand)]
        action: TemplateCommand,
    },

    /// Create, inspect, update and cancel prescriptions
    Prescriptions {
        #[command(subcommand)]
        action: PrescriptionCommand,
    },

    /// List a patient's prescriptions
    Patient {
        patient_id: String,

        /// Filter by status (active, completed, paused, cancelled)
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show template library statistics
    Stats,

    /// Walk through a typical integration: search templates, then show stats
    Demo,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List templates matching optional filters
    List {
        /// strength, flexibility, balance, endurance, plyometric, functional, rehabilitation
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        difficulty_min: Option<u8>,

        #[arg(long)]
        difficulty_max: Option<u8>,

        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show one template
    Get { template_id: String },

    /// Create a template from a JSON draft file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum PrescriptionCommand {
    /// Prescribe a template to a patient
    Create {
        #[arg(long)]
        template: String,

        #[arg(long)]
        patient: String,

        #[arg(long)]
        therapist: String,

        /// Sessions per week
        #[arg(long)]
        frequency: u32,

        #[arg(long)]
        reps: Option<u32>,

        #[arg(long)]
        sets: Option<u32>,

        #[arg(long)]
        instructions: Option<String>,

        #[arg(long)]
        joint_focus: Option<String>,
    },

    /// Show one prescription
    Get { prescription_id: String },

    /// Update status, progress or notes
    Update {
        prescription_id: String,

        #[arg(long)]
        status: Option<String>,

        /// Completion percentage (0-100)
        #[arg(long)]
        completion: Option<u8>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a prescription
    Cancel { prescription_id: String },
}

fn main() -> Result<()> {
    // Initialize logging
    physio_core::logging::init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env();
            config
        }
        None => Config::load()?,
    };
    config.apply_overrides(cli.base_url.clone(), cli.api_key.clone());

    let client = PhysioClient::from_config(&config)?;
    tracing::debug!(base_url = %config.api.base_url, "Client ready");
    let page_size = config.display.page_size;
    let json = cli.json;

    match cli.command {
        Commands::Templates { action } => cmd_templates(&client, action, page_size, json),
        Commands::Prescriptions { action } => cmd_prescriptions(&client, action, json),
        Commands::Patient {
            patient_id,
            status,
            limit,
            offset,
        } => cmd_patient(
            &client,
            &patient_id,
            status,
            limit.unwrap_or(page_size),
            offset,
            json,
        ),
        Commands::Stats => cmd_stats(&client, json),
        Commands::Demo => cmd_demo(&client),
    }
}

fn cmd_templates(
    client: &PhysioClient,
    action: TemplateCommand,
    page_size: u32,
    json: bool,
) -> Result<()> {
    match action {
        TemplateCommand::List {
            category,
            difficulty_min,
            difficulty_max,
            search,
            limit,
            offset,
        } => {
            let mut query = TemplateQuery::new()
                .limit(limit.unwrap_or(page_size))
                .offset(offset);
            if let Some(c) = category {
                query = query.category(c.parse()?);
            }
            if let Some(min) = difficulty_min {
                query = query.difficulty_min(min);
            }
            if let Some(max) = difficulty_max {
                query = query.difficulty_max(max);
            }
            if let Some(s) = search {
                query = query.search(s);
            }

            let page = client.list_templates(&query)?;
            if json {
                return print_json(&page);
            }
            println!("Found {} templates", page.total);
            for template in &page.templates {
                display_template_line(template);
            }
        }

        TemplateCommand::Get { template_id } => {
            let template = client.get_template(&template_id)?;
            if json {
                return print_json(&template);
            }
            display_template(&template);
        }

        TemplateCommand::Create { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let draft: TemplateDraft = serde_json::from_str(&contents)?;
            let template = client.create_template(&draft)?;
            if json {
                return print_json(&template);
            }
            println!("✓ Template created: {}", template.id);
            display_template(&template);
        }
    }

    Ok(())
}

fn cmd_prescriptions(client: &PhysioClient, action: PrescriptionCommand, json: bool) -> Result<()> {
    match action {
        PrescriptionCommand::Create {
            template,
            patient,
            therapist,
            frequency,
            reps,
            sets,
            instructions,
            joint_focus,
        } => {
            let mut request = NewPrescription::new(template, patient, therapist, frequency);
            request.reps = reps;
            request.sets = sets;
            request.custom_instructions = instructions;
            request.primary_joint_focus = joint_focus;

            let prescription = client.create_prescription(&request)?;
            if json {
                return print_json(&prescription);
            }
            println!("✓ Prescription created: {}", prescription.id);
            display_prescription(&prescription);
        }

        PrescriptionCommand::Get { prescription_id } => {
            let prescription = client.get_prescription(&prescription_id)?;
            if json {
                return print_json(&prescription);
            }
            display_prescription(&prescription);
        }

        PrescriptionCommand::Update {
            prescription_id,
            status,
            completion,
            notes,
        } => {
            let update = PrescriptionUpdate {
                status: status.map(|s| s.parse()).transpose()?,
                completion_percent: completion,
                therapist_notes: notes,
            };
            if update.is_empty() {
                return Err(Error::InvalidRequest(
                    "nothing to update, pass --status, --completion or --notes".into(),
                ));
            }

            let prescription = client.update_prescription(&prescription_id, &update)?;
            if json {
                return print_json(&prescription);
            }
            println!("✓ Prescription updated");
            display_prescription(&prescription);
        }

        PrescriptionCommand::Cancel { prescription_id } => {
            if client.cancel_prescription(&prescription_id)? {
                println!("✓ Prescription {} cancelled", prescription_id);
            } else {
                return Err(Error::Other(format!(
                    "prescription {} was not cancelled (server did not answer 204 No Content)",
                    prescription_id
                )));
            }
        }
    }

    Ok(())
}

fn cmd_patient(
    client: &PhysioClient,
    patient_id: &str,
    status: Option<String>,
    limit: u32,
    offset: u32,
    json: bool,
) -> Result<()> {
    let status: Option<PrescriptionStatus> = status.map(|s| s.parse()).transpose()?;
    let prescriptions = client.get_patient_prescriptions(patient_id, status.as_ref(), limit, offset)?;

    if json {
        return print_json(&prescriptions);
    }

    match status {
        Some(s) => println!("{} {} prescriptions", prescriptions.len(), s),
        None => println!("{} prescriptions", prescriptions.len()),
    }
    for prescription in &prescriptions {
        println!(
            "  - {} → {} [{}] {}% complete",
            prescription.id,
            prescription.template_id,
            prescription.status,
            prescription.completion_percent
        );
    }

    Ok(())
}

fn cmd_stats(client: &PhysioClient, json: bool) -> Result<()> {
    let stats = client.get_library_stats()?;
    if json {
        return print_json(&stats);
    }
    display_stats(&stats);
    Ok(())
}

fn cmd_demo(client: &PhysioClient) -> Result<()> {
    println!("=== List shoulder strength exercises ===");
    let query = TemplateQuery::new()
        .category(ExerciseCategory::Strength)
        .search("shoulder")
        .limit(10);
    let page = client.list_templates(&query)?;
    println!("Found {} templates", page.total);
    for template in &page.templates {
        display_template_line(template);
    }

    println!();
    println!("=== Library statistics ===");
    let stats = client.get_library_stats()?;
    display_stats(&stats);

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn display_template_line(template: &ExerciseTemplate) {
    println!(
        "  - {} (Difficulty: {}/5)",
        template.name, template.difficulty
    );
}

fn display_template(template: &ExerciseTemplate) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} TEMPLATE", template.category.as_str().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {} ({})", template.name, template.id);
    println!("  {}", template.description);
    println!(
        "  Difficulty: {}/5 · Region: {} · Joints: {}",
        template.difficulty,
        template.body_region,
        template.primary_joints.join(", ")
    );
    println!(
        "  → {} x {} reps, ~{} seconds",
        template.recommended_sets, template.recommended_reps, template.estimated_duration
    );
    if !template.active {
        println!("  (inactive)");
    }
    println!();
    println!("  ℹ {}", template.patient_instructions);
    println!();
}

fn display_prescription(prescription: &ExercisePrescription) {
    println!();
    println!("  Prescription {}", prescription.id);
    println!("  Template:  {}", prescription.template_id);
    println!("  Patient:   {}", prescription.patient_id);
    println!("  Therapist: {}", prescription.therapist_id);
    println!(
        "  → {} x {} reps, {} times per week",
        prescription.sets, prescription.reps, prescription.frequency_per_week
    );
    println!(
        "  Status: {} ({}% complete)",
        prescription.status, prescription.completion_percent
    );
    if let Some(at) = prescription.prescribed_at_utc() {
        println!("  Prescribed: {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(start) = prescription.start_date_utc() {
        println!("  Starts:     {}", start.format("%Y-%m-%d"));
    }
    if let Some(ref joint) = prescription.primary_joint_focus {
        println!("  Focus: {}", joint);
    }
    if let Some(ref instructions) = prescription.custom_instructions {
        println!("  ℹ {}", instructions);
    }
    if let Some(ref notes) = prescription.therapist_notes {
        println!("  Notes: {}", notes);
    }
    println!();
}

fn display_stats(stats: &LibraryStats) {
    println!("Total templates: {}", stats.total_templates);
    println!("Active templates: {}", stats.active_count);
    println!("By category:");
    for (category, count) in &stats.by_category {
        if *count > 0 {
            println!("  - {}: {}", category, count);
        }
    }
}

// Class scheduling commands

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Subcommand;
use gym_core::{generate_id, Class, ClassDraft, ClassStatus, Gym, GymError, Member};

use super::{parse_datetime, parse_day};
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};

#[derive(Subcommand)]
pub enum ClassesCommand {
    /// List classes, optionally only those on one day
    List {
        /// Day to show (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show a class and its members
    Get {
        /// Class ID
        class_id: i64,
    },

    /// Schedule a new class
    Create {
        /// Short description (up to 25 characters)
        #[arg(long)]
        description: String,

        /// Class type, e.g. Yoga
        #[arg(long = "type")]
        class_type: String,

        /// Start time (RFC 3339 or YYYY-MM-DD HH:MM, UTC)
        #[arg(long)]
        date: String,

        /// Maximum number of members
        #[arg(long, default_value_t = gym_core::forms::DEFAULT_CAPACITY)]
        max_capacity: u32,

        /// Status
        #[arg(long, default_value = "open")]
        status: String,

        /// Refuse enrollments after the class has started
        #[arg(long)]
        no_late_registration: bool,
    },

    /// Edit a class; omitted fields keep their value
    Edit {
        /// Class ID
        class_id: i64,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type")]
        class_type: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        max_capacity: Option<u32>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        late_registration: Option<bool>,
    },

    /// Delete a class
    Delete {
        /// Class ID
        class_id: i64,
    },

    /// Enroll roster members in a class
    AddMembers {
        /// Class ID
        class_id: i64,

        /// Member IDs to enroll
        #[arg(required = true)]
        member_ids: Vec<i64>,
    },

    /// Remove a member from a class
    RemoveMember {
        /// Class ID
        class_id: i64,

        /// Member ID
        member_id: i64,
    },

    /// List roster members who can still be enrolled
    Candidates {
        /// Class ID
        class_id: i64,
    },
}

pub async fn run(command: ClassesCommand, gym: &Gym, output: OutputFormat) -> Result<()> {
    match command {
        ClassesCommand::List { date } => list(gym, output, date).await,
        ClassesCommand::Get { class_id } => get(gym, output, class_id).await,
        ClassesCommand::Create {
            description,
            class_type,
            date,
            max_capacity,
            status,
            no_late_registration,
        } => {
            let draft = ClassDraft::new(description, class_type, parse_datetime(&date)?)
                .with_max_capacity(max_capacity)
                .with_status(parse_status(&status)?)
                .with_late_registration(!no_late_registration);
            create(gym, output, draft).await
        }
        ClassesCommand::Edit {
            class_id,
            description,
            class_type,
            date,
            max_capacity,
            status,
            late_registration,
        } => {
            let mut class = require_class(gym, class_id).await?;
            let mut draft = ClassDraft::from(&class);
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(class_type) = class_type {
                draft.class_type = class_type;
            }
            if let Some(date) = date {
                draft.date = parse_datetime(&date)?;
            }
            if let Some(max_capacity) = max_capacity {
                draft.max_capacity = max_capacity;
            }
            if let Some(status) = status {
                draft.status = parse_status(&status)?;
            }
            if let Some(late_registration) = late_registration {
                draft.allow_late_registration = late_registration;
            }
            draft.apply_to(&mut class, Utc::now())?;
            gym.classes().update(&class).await?;
            print_class(output, &class, "Class updated.")
        }
        ClassesCommand::Delete { class_id } => {
            gym.classes().delete(class_id).await?;
            if output.is_text() {
                println!("Class {class_id} deleted.");
            }
            Ok(())
        }
        ClassesCommand::AddMembers {
            class_id,
            member_ids,
        } => add_members(gym, output, class_id, member_ids).await,
        ClassesCommand::RemoveMember {
            class_id,
            member_id,
        } => {
            gym.classes().remove_member(class_id, member_id).await?;
            let class = require_class(gym, class_id).await?;
            print_class(output, &class, "Member removed.")
        }
        ClassesCommand::Candidates { class_id } => {
            let members = gym.classes().enrollable_members(class_id).await?;
            super::members::print_members(output, &members)
        }
    }
}

async fn list(gym: &Gym, output: OutputFormat, date: Option<String>) -> Result<()> {
    let date = date.as_deref().map(parse_day).transpose()?;
    let classes = gym.classes().get_by_date(date).await?;

    if !output.is_text() {
        return output.print_value(&classes);
    }

    if classes.is_empty() {
        println!("No classes found. Schedule one with `gym classes create`.");
        return Ok(());
    }

    print_table_header(&[
        ("ID", 14),
        ("DESCRIPTION", 25),
        ("TYPE", 16),
        ("DATE", 17),
        ("STATUS", 9),
        ("ENROLLED", 8),
    ]);
    for class in &classes {
        let date = class.date.format("%Y-%m-%d %H:%M").to_string();
        let enrolled = format!("{}/{}", class.member_count(), class.max_capacity);
        print_table_row(&[
            (&class.id.to_string(), 14),
            (&class.description, 25),
            (&class.class_type, 16),
            (&date, 17),
            (class.status.as_str(), 9),
            (&enrolled, 8),
        ]);
    }
    Ok(())
}

async fn get(gym: &Gym, output: OutputFormat, class_id: i64) -> Result<()> {
    let class = require_class(gym, class_id).await?;
    print_class(output, &class, "")
}

async fn create(gym: &Gym, output: OutputFormat, draft: ClassDraft) -> Result<()> {
    let now = Utc::now();
    let class = draft.into_class(generate_id(now), now)?;
    gym.classes().create(&class).await?;
    print_class(output, &class, "Class created.")
}

async fn add_members(
    gym: &Gym,
    output: OutputFormat,
    class_id: i64,
    member_ids: Vec<i64>,
) -> Result<()> {
    let class = require_class(gym, class_id).await?;
    if !class.accepts_new_members() {
        bail!(
            "class {class_id} does not take new members (status {}, late registration {})",
            class.status,
            if class.allow_late_registration {
                "allowed"
            } else {
                "not allowed"
            }
        );
    }

    let mut members: Vec<Member> = Vec::with_capacity(member_ids.len());
    for member_id in member_ids {
        if class.has_member(member_id) || members.iter().any(|m| m.id == member_id) {
            bail!("member {member_id} is already enrolled in class {class_id}");
        }
        let member = gym
            .members()
            .get(member_id)
            .await?
            .with_context(|| format!("member {member_id} not found"))?;
        members.push(member);
    }

    match gym.classes().add_members(class_id, members).await {
        Ok(()) => {}
        Err(err @ GymError::CapacityExceeded { .. }) => {
            let excess = err.excess().unwrap_or_default();
            if class.is_full() {
                bail!(
                    "class is full, the maximum of {} members was reached",
                    class.max_capacity
                );
            }
            return Err(err).with_context(|| {
                format!(
                    "remove {excess} member(s) to respect the maximum capacity of {}",
                    class.max_capacity
                )
            });
        }
        Err(err) => return Err(err.into()),
    }

    let class = require_class(gym, class_id).await?;
    print_class(output, &class, "Members added.")
}

async fn require_class(gym: &Gym, class_id: i64) -> Result<Class> {
    gym.classes()
        .get(class_id)
        .await?
        .with_context(|| format!("class {class_id} not found"))
}

fn parse_status(raw: &str) -> Result<ClassStatus> {
    raw.parse::<ClassStatus>().map_err(|e| anyhow::anyhow!(e))
}

fn print_class(output: OutputFormat, class: &Class, message: &str) -> Result<()> {
    if !output.is_text() {
        return output.print_value(class);
    }

    if !message.is_empty() {
        println!("{message}");
    }
    print_field("ID", &class.id.to_string());
    print_field("Description", &class.description);
    print_field("Type", &class.class_type);
    print_field("Date", &class.date.format("%Y-%m-%d %H:%M").to_string());
    print_field("Status", class.status.as_str());
    print_field(
        "Enrolled",
        &format!("{}/{}", class.member_count(), class.max_capacity),
    );
    print_field(
        "Late signup",
        if class.allow_late_registration {
            "allowed"
        } else {
            "not allowed"
        },
    );
    if !class.members.is_empty() {
        println!();
        for member in &class.members {
            println!("  {:<14} {}", member.id, member.name);
        }
    }
    Ok(())
}

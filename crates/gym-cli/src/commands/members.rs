// Member roster commands

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use gym_core::{generate_id, Address, Gym, Member, MemberDraft};

use super::parse_day;
use crate::output::{print_field, print_table_header, print_table_row, OutputFormat};

#[derive(Subcommand)]
pub enum MembersCommand {
    /// List members, optionally filtered by name or document
    List {
        /// Search term
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show a member
    Get {
        /// Member ID
        member_id: i64,
    },

    /// Add a member to the roster
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: String,

        /// Identity document number
        #[arg(long)]
        document: Option<String>,

        /// Payment plan name
        #[arg(long, default_value = "Monthly")]
        payment_plan: String,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Edit a member; omitted fields keep their value
    Edit {
        /// Member ID
        member_id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<String>,

        #[arg(long)]
        document: Option<String>,

        #[arg(long)]
        payment_plan: Option<String>,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Remove a member from the roster
    Delete {
        /// Member ID
        member_id: i64,
    },
}

/// Address options; all six parts are required once any is given
#[derive(Args, Debug, Default)]
pub struct AddressArgs {
    #[arg(long)]
    street: Option<String>,

    #[arg(long)]
    number: Option<String>,

    /// District, see `gym lookups districts`
    #[arg(long)]
    district: Option<String>,

    /// City, see `gym lookups cities`
    #[arg(long)]
    city: Option<String>,

    /// State, see `gym lookups states`
    #[arg(long)]
    state: Option<String>,

    #[arg(long)]
    zip_code: Option<String>,
}

impl AddressArgs {
    fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.number.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }

    /// Overlay the given parts on `current`; missing parts stay blank and fail validation
    fn merge_into(self, current: Option<Address>) -> Option<Address> {
        if self.is_empty() {
            return current;
        }
        let mut address = current.unwrap_or_else(|| Address {
            street: String::new(),
            number: String::new(),
            district: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
        });
        let overlay = [
            (self.street, &mut address.street),
            (self.number, &mut address.number),
            (self.district, &mut address.district),
            (self.city, &mut address.city),
            (self.state, &mut address.state),
            (self.zip_code, &mut address.zip_code),
        ];
        for (value, slot) in overlay {
            if let Some(value) = value {
                *slot = value;
            }
        }
        Some(address)
    }
}

pub async fn run(command: MembersCommand, gym: &Gym, output: OutputFormat) -> Result<()> {
    match command {
        MembersCommand::List { search } => {
            let members = match search {
                Some(term) => gym.members().search(&term).await?,
                None => gym.members().get_all().await?,
            };
            print_members(output, &members)
        }
        MembersCommand::Get { member_id } => {
            let member = gym
                .members()
                .get(member_id)
                .await?
                .with_context(|| format!("member {member_id} not found"))?;
            print_member(output, &member, "")
        }
        MembersCommand::Create {
            name,
            email,
            birth_date,
            document,
            payment_plan,
            address,
        } => {
            let now = Utc::now();
            let draft = MemberDraft {
                name,
                email,
                birth_date: parse_day(&birth_date)?,
                document,
                address: address.merge_into(None),
                payment_plan,
            };
            let member = draft.into_member(generate_id(now), now)?;
            gym.members().create(&member).await?;
            print_member(output, &member, "Member created.")
        }
        MembersCommand::Edit {
            member_id,
            name,
            email,
            birth_date,
            document,
            payment_plan,
            address,
        } => {
            let mut member = gym
                .members()
                .get(member_id)
                .await?
                .with_context(|| format!("member {member_id} not found"))?;
            let mut draft = MemberDraft::from(&member);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(email) = email {
                draft.email = email;
            }
            if let Some(birth_date) = birth_date {
                draft.birth_date = parse_day(&birth_date)?;
            }
            if let Some(document) = document {
                draft.document = Some(document);
            }
            if let Some(payment_plan) = payment_plan {
                draft.payment_plan = payment_plan;
            }
            draft.address = address.merge_into(draft.address);
            draft.apply_to(&mut member, Utc::now())?;
            gym.members().update(&member).await?;
            print_member(output, &member, "Member updated.")
        }
        MembersCommand::Delete { member_id } => {
            gym.members().delete(member_id).await?;
            if output.is_text() {
                println!("Member {member_id} deleted.");
            }
            Ok(())
        }
    }
}

pub fn print_members(output: OutputFormat, members: &[Member]) -> Result<()> {
    if !output.is_text() {
        return output.print_value(&members);
    }

    if members.is_empty() {
        println!("No members found.");
        return Ok(());
    }

    print_table_header(&[
        ("ID", 14),
        ("NAME", 24),
        ("EMAIL", 28),
        ("DOCUMENT", 14),
        ("PLAN", 10),
    ]);
    for member in members {
        print_table_row(&[
            (&member.id.to_string(), 14),
            (&member.name, 24),
            (&member.email, 28),
            (member.document.as_deref().unwrap_or("-"), 14),
            (&member.payment_plan, 10),
        ]);
    }
    Ok(())
}

fn print_member(output: OutputFormat, member: &Member, message: &str) -> Result<()> {
    if !output.is_text() {
        return output.print_value(member);
    }

    if !message.is_empty() {
        println!("{message}");
    }
    print_field("ID", &member.id.to_string());
    print_field("Name", &member.name);
    print_field("Email", &member.email);
    print_field("Birth date", &member.birth_date.format("%Y-%m-%d").to_string());
    print_field("Document", member.document.as_deref().unwrap_or("-"));
    print_field("Payment plan", &member.payment_plan);
    if let Some(address) = &member.address {
        print_field(
            "Address",
            &format!(
                "{}, {} - {}, {}/{} {}",
                address.street,
                address.number,
                address.district,
                address.city,
                address.state,
                address.zip_code
            ),
        );
    }
    Ok(())
}

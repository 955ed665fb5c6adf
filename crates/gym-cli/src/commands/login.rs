// Login gate command

use anyhow::Result;
use chrono::Utc;
use gym_core::LoginCredentials;

use crate::output::{print_field, OutputFormat};

pub fn run(output: OutputFormat, email: String, password: String) -> Result<()> {
    let session = LoginCredentials::new(email, password).sign_in(Utc::now())?;

    if output.is_text() {
        println!("Signed in.");
        print_field("Email", &session.email);
        print_field("Signed in at", &session.signed_in_at.to_rfc3339());
    } else {
        output.print_value(&session)?;
    }
    Ok(())
}
